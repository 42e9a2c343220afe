//! Dataset records and per-track derived state.

use serde::{Deserialize, Serialize};

use crate::tokenizer::{derive_initials, tokenize};

// ─────────────────────────────────────────────────────────────────────────────
// WIRE FORMAT
// ─────────────────────────────────────────────────────────────────────────────

/// One track as produced by the offline collection pipeline. Loaded wholesale
/// at startup and immutable from then on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    pub title: String,
    #[serde(default)]
    pub lyrics: Option<String>,
    pub album_id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// DERIVED ENTRY (built once at index construction)
// ─────────────────────────────────────────────────────────────────────────────

/// A track with its derived search keys. The title is indexed both raw and as
/// an initials key; lyrics are normalized first and indexed as an initials
/// key only. Zero- and one-word texts get an empty key and simply can never
/// produce an initials match.
#[derive(Debug, Clone)]
pub struct TrackEntry {
    pub title: String,
    pub title_words: Vec<String>,
    pub title_key: String,
    pub lyrics_words: Option<Vec<String>>,
    pub lyrics_key: Option<String>,
    pub album_id: String,
}

impl TrackEntry {
    pub fn new(record: TrackRecord) -> Self {
        let title_words = tokenize(&record.title);
        let title_key = derive_initials(&title_words);
        let (lyrics_words, lyrics_key) = match record.lyrics.as_deref() {
            Some(lyrics) => {
                let words = tokenize(&normalize_lyrics(lyrics));
                let key = derive_initials(&words);
                (Some(words), Some(key))
            }
            None => (None, None),
        };
        Self {
            title: record.title,
            title_words,
            title_key,
            lyrics_words,
            lyrics_key,
            album_id: record.album_id,
        }
    }
}

/// Normalize lyrics the way the collection pipeline does before deriving
/// letters: quotes and commas become spaces, whitespace runs collapse to a
/// single space, everything lowercased. Titles are never normalized.
pub fn normalize_lyrics(lyrics: &str) -> String {
    let mut out = String::with_capacity(lyrics.len());
    let mut last_was_space = false;
    for ch in lyrics.chars() {
        let ch = match ch {
            '"' | ',' => ' ',
            c if c.is_whitespace() => ' ',
            c => c,
        };
        if ch == ' ' {
            if last_was_space {
                continue;
            }
            last_was_space = true;
        } else {
            last_was_space = false;
        }
        out.extend(ch.to_lowercase());
    }
    out
}
