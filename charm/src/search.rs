//! Search pipeline: match every track across its indexed fields, pick a
//! highlight source per track, and reconstruct highlighted renderings over
//! the original text.
//!
//! The index is an explicit value built once at startup and passed by
//! reference to queries. One search is a single synchronous pass over
//! immutable entries; there is no background work and no shared mutable
//! state.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use crate::highlight::{render_char_ranges, render_initial_letters, SegmentList, TitleSplitter};
use crate::interface::{CharSpan, CharmError, LyricsSnippet, TitleHighlight, TrackMatch};
use crate::matcher::{total_matched, FieldHit, FuzzyEngine, MatchRange};
use crate::models::{TrackEntry, TrackRecord};
use crate::tokenizer::word_spans;

/// Maximum results to return from search.
pub(crate) const MAX_RESULTS: usize = 8;

/// Weight of the raw title field relative to the letter keys when blending
/// per-field scores into a relevance value.
pub(crate) const TITLE_FIELD_WEIGHT: f64 = 0.5;

/// A full-title highlight gives way to an initials highlight with at most
/// this many disjoint ranges (the spread acronym-like signal over a
/// fragmented literal one).
pub(crate) const INITIALS_RANGE_LIMIT: usize = 3;

/// Ranges merge into one cluster when separated by at most one unmatched
/// word, i.e. a new group starts when `start > prev_end + 2`.
pub(crate) const GROUP_GAP_THRESHOLD: usize = 2;

/// Words of context before the first matched word of the chosen cluster.
pub(crate) const SNIPPET_WORDS_BEFORE: usize = 1;

/// Words of context after the last matched word of the chosen cluster.
pub(crate) const SNIPPET_WORDS_AFTER: usize = 3;

/// The search index: per-track derived entries plus the fuzzy engine.
/// Construct once at startup and pass by reference.
#[derive(Debug)]
pub struct SearchIndex {
    entries: Vec<TrackEntry>,
    engine: FuzzyEngine,
}

impl SearchIndex {
    /// Build an index over a loaded dataset.
    pub fn new(records: Vec<TrackRecord>) -> Self {
        let entries: Vec<TrackEntry> = records.into_iter().map(TrackEntry::new).collect();
        debug!("indexed {} tracks", entries.len());
        Self { entries, engine: FuzzyEngine::new() }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CharmError> {
        let records: Vec<TrackRecord> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CharmError> {
        let records: Vec<TrackRecord> = serde_json::from_reader(reader)?;
        Ok(Self::new(records))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CharmError> {
        Self::from_json_reader(BufReader::new(File::open(path)?))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run one search. Each keystroke is one complete pass: match every entry
    /// across its indexed fields, rank ascending by relevance (stable), and
    /// keep the best `MAX_RESULTS` with their display renderings.
    pub fn search(&self, query: &str) -> Vec<TrackMatch> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<TrackMatch> = self
            .entries
            .iter()
            .filter_map(|entry| self.match_entry(entry, query))
            .collect();
        matches.sort_by(|a, b| a.relevance.total_cmp(&b.relevance));
        matches.truncate(MAX_RESULTS);
        debug!("query {:?}: {} results", query, matches.len());
        matches
    }

    fn match_entry(&self, entry: &TrackEntry, query: &str) -> Option<TrackMatch> {
        let title_hit = self.engine.match_field(&entry.title, query);
        let initials_hit = self.engine.match_field(&entry.title_key, query);
        let lyrics_hit = entry
            .lyrics_key
            .as_deref()
            .and_then(|key| self.engine.match_field(key, query));
        if title_hit.is_none() && initials_hit.is_none() && lyrics_hit.is_none() {
            return None;
        }

        let relevance = relevance(title_hit.as_ref(), initials_hit.as_ref(), lyrics_hit.as_ref());
        let source = select_title_source(title_hit.as_ref(), initials_hit.as_ref());
        let (title, title_spans) = render_title(entry, source);

        let lyrics = match (&entry.lyrics_words, entry.lyrics_key.as_deref(), &lyrics_hit) {
            (Some(words), Some(key), Some(hit)) => Some(build_lyrics_snippet(words, key, hit, query)),
            _ => None,
        };

        Some(TrackMatch {
            album_id: entry.album_id.clone(),
            relevance,
            title,
            title_spans,
            lyrics,
        })
    }
}

/// Collapse per-field scores into one relevance value, lower = better. The
/// raw matcher scores higher-is-better; publishing `1 / (1 + weighted)`
/// keeps the public contract at lower-is-better. The raw title is
/// down-weighted against the letter keys, so an acronym-style hit on a key
/// outranks an equal-quality literal hit on the title.
fn relevance(title: Option<&FieldHit>, initials: Option<&FieldHit>, lyrics: Option<&FieldHit>) -> f64 {
    let weighted = |hit: Option<&FieldHit>, weight: f64| hit.map(|h| h.score as f64 * weight);
    let best = [
        weighted(title, TITLE_FIELD_WEIGHT),
        weighted(initials, 1.0),
        weighted(lyrics, 1.0),
    ]
    .into_iter()
    .flatten()
    .fold(0.0, f64::max);
    1.0 / (1.0 + best)
}

/// Which field's ranges drive the title highlight.
enum TitleSource<'a> {
    Initials(&'a [MatchRange]),
    Full(&'a [MatchRange]),
    Plain,
}

/// Pick the highlight source for a title. A fuzzy matcher scoring raw title
/// characters produces noisy, fragmented hits for acronym-style queries; the
/// initials hit wins whenever it covers at least as many characters, or when
/// the full-title hit is fragmented while the initials hit stays compact.
fn select_title_source<'a>(
    title_hit: Option<&'a FieldHit>,
    initials_hit: Option<&'a FieldHit>,
) -> TitleSource<'a> {
    let full_count = title_hit.map_or(0, |h| total_matched(&h.ranges));
    if let Some(initials) = initials_hit {
        let initials_count = total_matched(&initials.ranges);
        let fragmented_full = title_hit.map_or(false, |h| h.ranges.len() > 1)
            && initials.ranges.len() <= INITIALS_RANGE_LIMIT;
        if initials_count >= full_count || fragmented_full {
            return TitleSource::Initials(&initials.ranges);
        }
    }
    match title_hit {
        Some(hit) => TitleSource::Full(&hit.ranges),
        None => TitleSource::Plain,
    }
}

/// Render the title through the large/small splitter and report the chosen
/// highlights as character spans into the full title.
fn render_title(entry: &TrackEntry, source: TitleSource<'_>) -> (TitleHighlight, Vec<CharSpan>) {
    let mut splitter = TitleSplitter::default();
    let spans = match source {
        TitleSource::Initials(ranges) => {
            render_initial_letters(&entry.title_words, ranges, &mut |text, hl| {
                splitter.push(text, hl)
            });
            initials_spans(&entry.title_words, ranges)
        }
        TitleSource::Full(ranges) => {
            render_char_ranges(&entry.title, ranges, &mut |text, hl| splitter.push(text, hl));
            let mut sorted = ranges.to_vec();
            sorted.sort_unstable_by_key(|r| r.start);
            sorted
                .iter()
                .map(|r| CharSpan { start: r.start as u64, end: (r.end + 1) as u64 })
                .collect()
        }
        TitleSource::Plain => {
            splitter.push(&entry.title, false);
            Vec::new()
        }
    };
    (splitter.finish(), spans)
}

/// One single-character span per matched word head, in the full title.
fn initials_spans(words: &[String], key_ranges: &[MatchRange]) -> Vec<CharSpan> {
    let spans = word_spans(words);
    let mut out = Vec::new();
    for range in key_ranges {
        for key_idx in range.start..=range.end {
            if let Some(&(start, end)) = spans.get(key_idx + 1) {
                if end > start {
                    out.push(CharSpan { start: start as u64, end: start as u64 + 1 });
                }
            }
        }
    }
    out.sort_unstable_by_key(|s| s.start);
    out
}

/// Build the windowed and full lyric renderings around the best match cluster.
fn build_lyrics_snippet(words: &[String], key: &str, hit: &FieldHit, query: &str) -> LyricsSnippet {
    let (cluster, exact) = match find_verbatim(key, &query.to_lowercase()) {
        Some(range) => (vec![range], true),
        None => (select_cluster(&hit.ranges), false),
    };

    // Window bounds in word-list indices, context on both sides, clamped to
    // the ends of the lyrics.
    let cluster_start = cluster.first().map_or(0, |r| r.start);
    let cluster_end = cluster.last().map_or(0, |r| r.end);
    let last_word = words.len().saturating_sub(1);
    let first = cluster_start.saturating_sub(SNIPPET_WORDS_BEFORE);
    let last = (cluster_end + SNIPPET_WORDS_AFTER).min(last_word);

    let shifted: Vec<MatchRange> = cluster
        .iter()
        .map(|r| MatchRange {
            start: r.start.saturating_sub(first),
            end: r.end.saturating_sub(first),
        })
        .collect();
    let mut windowed = SegmentList::default();
    render_initial_letters(&words[first..=last], &shifted, &mut |text, hl| {
        windowed.push(text, hl)
    });

    // The expanded rendering always follows the matcher's reported ranges,
    // even when the verbatim fast path chose the window.
    let mut full = SegmentList::default();
    render_initial_letters(words, &hit.ranges, &mut |text, hl| full.push(text, hl));

    LyricsSnippet {
        windowed: windowed.into_vec(),
        full: full.into_vec(),
        window_at_start: first == 0,
        window_at_end: last == last_word,
        exact,
    }
}

/// Exact-match fast path: a verbatim occurrence of the query in the initials
/// key wins over fuzzy range grouping. When the query only matches fuzzily,
/// grouping governs; that is intentional, not a fallback.
fn find_verbatim(key: &str, query: &str) -> Option<MatchRange> {
    if query.is_empty() {
        return None;
    }
    let at = key.find(query)?;
    let start = key[..at].chars().count();
    Some(MatchRange { start, end: start + query.chars().count() - 1 })
}

/// Sort ranges ascending by start and merge runs separated by at most one
/// unmatched word, then pick the group covering the most matched indices.
/// The first group encountered wins ties.
fn select_cluster(ranges: &[MatchRange]) -> Vec<MatchRange> {
    let mut sorted = ranges.to_vec();
    sorted.sort_unstable_by_key(|r| r.start);

    let mut groups: Vec<Vec<MatchRange>> = Vec::new();
    let mut group: Vec<MatchRange> = Vec::new();
    for r in sorted {
        if let Some(prev) = group.last() {
            if r.start > prev.end + GROUP_GAP_THRESHOLD {
                groups.push(std::mem::take(&mut group));
            }
        }
        group.push(r);
    }
    groups.push(group);

    let mut best: Vec<MatchRange> = Vec::new();
    let mut best_size = 0;
    for g in groups {
        let size = total_matched(&g);
        if size > best_size {
            best_size = size;
            best = g;
        }
    }
    best
}
