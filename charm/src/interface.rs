//! Charm Interface Definition
//!
//! This file defines the types handed to the presentation layer and acts as
//! the source of truth for shared types. Everything here serializes with
//! serde so a web front end can consume results as JSON.

use serde::Serialize;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS (Structs)
// ═══════════════════════════════════════════════════════════════════════════════

/// One run of rendered text.
///
/// Concatenating the runs of a rendering reproduces the underlying text
/// exactly; highlighting never drops or reorders characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSegment {
    pub text: String,
    pub highlighted: bool,
}

/// A half-open `[start, end)` character-offset span into the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharSpan {
    pub start: u64,
    pub end: u64,
}

/// Title rendering split for presentation grouping: a large leading run and a
/// small trailing run (subtitle in smaller type), switching at the first "("
/// or " -". The split never alters character content or highlight flags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TitleHighlight {
    pub large: Vec<HighlightSegment>,
    pub small: Vec<HighlightSegment>,
}

/// Lyrics renderings around the best match cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricsSnippet {
    /// Bounded window around the best cluster, for compact display.
    pub windowed: Vec<HighlightSegment>,
    /// The entire lyrics with every reported match highlighted, for expanded display.
    pub full: Vec<HighlightSegment>,
    /// Whether the window touches the true start of the lyrics.
    /// The presentation layer omits the leading ellipsis when set.
    pub window_at_start: bool,
    /// Whether the window reaches the true end of the lyrics.
    pub window_at_end: bool,
    /// Whether the query occurred verbatim in the lyrics initials key.
    pub exact: bool,
}

/// One matched track, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackMatch {
    pub album_id: String,
    /// Relevance score, lower = better.
    pub relevance: f64,
    pub title: TitleHighlight,
    /// Character spans of the chosen title highlights in the full title.
    /// One single-character span per matched word head for an initials-key
    /// source; the literal matched ranges for a full-title source.
    pub title_spans: Vec<CharSpan>,
    /// Absent when the track has no lyrics or the lyrics did not match.
    pub lyrics: Option<LyricsSnippet>,
}

/// Error type for charm operations. Dataset loading is the only fallible
/// surface; the search pipeline itself is total over its inputs.
#[derive(Debug, Error)]
pub enum CharmError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed dataset: {0}")]
    Json(#[from] serde_json::Error),
}
