//! Highlight reconstruction over original text.
//!
//! Matches are found against derived keys that are not character-aligned with
//! the text they came from. The renderers here walk the original words and
//! emit (text, highlighted) runs whose concatenation reproduces the input
//! exactly, whatever was matched.

use crate::interface::{HighlightSegment, TitleHighlight};
use crate::matcher::MatchRange;

/// Collects (text, highlighted) runs. Empty pushes are dropped and adjacent
/// runs with the same flag merge, so the output is in canonical form.
#[derive(Debug, Default)]
pub(crate) struct SegmentList {
    segments: Vec<HighlightSegment>,
}

impl SegmentList {
    pub(crate) fn push(&mut self, text: &str, highlighted: bool) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.segments.last_mut() {
            if last.highlighted == highlighted {
                last.text.push_str(text);
                return;
            }
        }
        self.segments.push(HighlightSegment { text: text.to_string(), highlighted });
    }

    pub(crate) fn into_vec(self) -> Vec<HighlightSegment> {
        self.segments
    }
}

/// Letter-highlight reconstruction: word 0 renders unmarked in full; for each
/// later word, its first character is marked iff the word's initials-key
/// index (word index − 1) falls in any of `key_ranges`, and the rest of the
/// word is unmarked. `key_ranges` may be unsorted.
pub(crate) fn render_initial_letters<F>(words: &[String], key_ranges: &[MatchRange], add: &mut F)
where
    F: FnMut(&str, bool),
{
    if let Some(first) = words.first() {
        add(first, false);
    }
    for (key_idx, word) in words.iter().skip(1).enumerate() {
        if key_ranges.iter().any(|r| r.start <= key_idx && key_idx <= r.end) {
            let mut rest = word.chars();
            if let Some(head) = rest.next() {
                let mut buf = [0u8; 4];
                add(head.encode_utf8(&mut buf), true);
                add(rest.as_str(), false);
            }
        } else {
            add(word, false);
        }
    }
}

/// Literal character-range highlighting over the full text. Ranges are sorted
/// before the walk; every character of `text` is emitted exactly once.
pub(crate) fn render_char_ranges<F>(text: &str, ranges: &[MatchRange], add: &mut F)
where
    F: FnMut(&str, bool),
{
    let chars: Vec<char> = text.chars().collect();
    let mut sorted = ranges.to_vec();
    sorted.sort_unstable_by_key(|r| r.start);

    let mut cursor = 0;
    for r in &sorted {
        let start = r.start.min(chars.len()).max(cursor);
        let end = (r.end + 1).min(chars.len()).max(start);
        add(&chars[cursor..start].iter().collect::<String>(), false);
        add(&chars[start..end].iter().collect::<String>(), true);
        cursor = end;
    }
    add(&chars[cursor..].iter().collect::<String>(), false);
}

/// Collect an initial-letter rendering into segments.
pub fn highlight_initial_letters(words: &[String], key_ranges: &[MatchRange]) -> Vec<HighlightSegment> {
    let mut list = SegmentList::default();
    render_initial_letters(words, key_ranges, &mut |text, hl| list.push(text, hl));
    list.into_vec()
}

/// Collect a character-range rendering into segments.
pub fn highlight_char_ranges(text: &str, ranges: &[MatchRange]) -> Vec<HighlightSegment> {
    let mut list = SegmentList::default();
    render_char_ranges(text, ranges, &mut |text, hl| list.push(text, hl));
    list.into_vec()
}

/// Routes highlighted runs into a large leading run and a small trailing run,
/// switching at the first "(" or " -" across the pushed text. A pure
/// partition: characters and flags pass through unchanged.
#[derive(Debug, Default)]
pub(crate) struct TitleSplitter {
    large: SegmentList,
    small: SegmentList,
    in_small: bool,
}

impl TitleSplitter {
    pub(crate) fn push(&mut self, text: &str, highlighted: bool) {
        if !self.in_small {
            if let Some(at) = subtitle_start(text) {
                let (head, tail) = text.split_at(at);
                self.large.push(head, highlighted);
                self.in_small = true;
                self.small.push(tail, highlighted);
            } else {
                self.large.push(text, highlighted);
            }
        } else {
            self.small.push(text, highlighted);
        }
    }

    pub(crate) fn finish(self) -> TitleHighlight {
        TitleHighlight {
            large: self.large.into_vec(),
            small: self.small.into_vec(),
        }
    }
}

/// Byte offset where the subtitle begins: the first "(" or " -" in `text`.
fn subtitle_start(text: &str) -> Option<usize> {
    match (text.find('('), text.find(" -")) {
        (Some(p), Some(d)) => Some(p.min(d)),
        (p, d) => p.or(d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn mr(start: usize, end: usize) -> MatchRange {
        MatchRange { start, end }
    }

    fn joined(segments: &[HighlightSegment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_initial_letters_marks_word_heads() {
        let words = tokenize("Love Story");
        let segments = highlight_initial_letters(&words, &[mr(0, 1)]);
        assert_eq!(
            segments,
            vec![
                HighlightSegment { text: "L".into(), highlighted: true },
                HighlightSegment { text: "ove ".into(), highlighted: false },
                HighlightSegment { text: "S".into(), highlighted: true },
                HighlightSegment { text: "tory".into(), highlighted: false },
            ]
        );
    }

    #[test]
    fn test_initial_letters_word_zero_always_unmarked() {
        let words = tokenize("...Ready For It?");
        let segments = highlight_initial_letters(&words, &[mr(0, 2)]);
        assert_eq!(segments[0], HighlightSegment { text: "...".into(), highlighted: false });
        assert_eq!(joined(&segments), "...Ready For It?");
    }

    #[test]
    fn test_initial_letters_is_lossless_with_unsorted_ranges() {
        let words = tokenize("We Are Never Ever Getting Back Together");
        let segments = highlight_initial_letters(&words, &[mr(5, 6), mr(0, 1)]);
        assert_eq!(joined(&segments), "We Are Never Ever Getting Back Together");
        let marked: Vec<&str> = segments.iter().filter(|s| s.highlighted).map(|s| s.text.as_str()).collect();
        assert_eq!(marked, vec!["W", "A", "B", "T"]);
    }

    #[test]
    fn test_initial_letters_no_ranges_renders_plain() {
        let words = tokenize("Love Story");
        let segments = highlight_initial_letters(&words, &[]);
        assert_eq!(segments, vec![HighlightSegment { text: "Love Story".into(), highlighted: false }]);
    }

    #[test]
    fn test_char_ranges_sorts_input() {
        let segments = highlight_char_ranges("Shake It Off", &[mr(9, 11), mr(0, 4)]);
        assert_eq!(
            segments,
            vec![
                HighlightSegment { text: "Shake".into(), highlighted: true },
                HighlightSegment { text: " It ".into(), highlighted: false },
                HighlightSegment { text: "Off".into(), highlighted: true },
            ]
        );
    }

    #[test]
    fn test_char_ranges_clamps_out_of_bounds() {
        let segments = highlight_char_ranges("abc", &[mr(2, 9)]);
        assert_eq!(joined(&segments), "abc");
        assert_eq!(segments.last().map(|s| s.highlighted), Some(true));
    }

    #[test]
    fn test_char_ranges_preserves_character_count() {
        let text = "caf\u{e9} lights";
        let segments = highlight_char_ranges(text, &[mr(0, 3)]);
        assert_eq!(joined(&segments), text);
    }

    #[test]
    fn test_segment_list_merges_and_drops() {
        let mut list = SegmentList::default();
        list.push("", false);
        list.push("a", false);
        list.push("b", false);
        list.push("c", true);
        assert_eq!(
            list.into_vec(),
            vec![
                HighlightSegment { text: "ab".into(), highlighted: false },
                HighlightSegment { text: "c".into(), highlighted: true },
            ]
        );
    }

    #[test]
    fn test_title_splitter_splits_at_paren() {
        let mut splitter = TitleSplitter::default();
        splitter.push("Exile (feat. Bon Iver)", false);
        let title = splitter.finish();
        assert_eq!(joined(&title.large), "Exile ");
        assert_eq!(joined(&title.small), "(feat. Bon Iver)");
    }

    #[test]
    fn test_title_splitter_splits_at_space_hyphen() {
        let mut splitter = TitleSplitter::default();
        splitter.push("Teardrops On My Guitar - Pop Version", false);
        let title = splitter.finish();
        assert_eq!(joined(&title.large), "Teardrops On My Guitar");
        assert_eq!(joined(&title.small), " - Pop Version");
    }

    #[test]
    fn test_title_splitter_first_marker_wins() {
        let mut splitter = TitleSplitter::default();
        splitter.push("Safe & Sound - Acoustic (Live)", false);
        let title = splitter.finish();
        assert_eq!(joined(&title.large), "Safe & Sound");
        assert_eq!(joined(&title.small), " - Acoustic (Live)");
    }

    #[test]
    fn test_title_splitter_preserves_flags_across_split() {
        let mut splitter = TitleSplitter::default();
        splitter.push("W", true);
        splitter.push("ell (", false);
        splitter.push("1", true);
        splitter.push("0 Minute)", false);
        let title = splitter.finish();
        assert_eq!(joined(&title.large), "Well ");
        assert_eq!(joined(&title.small), "(10 Minute)");
        assert!(title.large[0].highlighted);
        assert!(title.small[1].highlighted);
        assert_eq!(title.small[1].text, "1");
    }

    #[test]
    fn test_title_splitter_plain_title_stays_large() {
        let mut splitter = TitleSplitter::default();
        splitter.push("Anti-Hero", false);
        let title = splitter.finish();
        assert_eq!(joined(&title.large), "Anti-Hero");
        assert!(title.small.is_empty());
    }
}
