//! Charm - fuzzy song lookup core for friendship-bracelet letter strings.
//!
//! A user types letters; the engine finds Taylor Swift song titles (and
//! lyric snippets) whose initial letters or substrings match, and
//! reconstructs highlighted spans over the original human-readable text from
//! matches found against derived initials keys that are not
//! character-aligned with it.
//!
//! The approximate string-match primitive is an external collaborator
//! (wrapped in the `matcher` module); everything else is pure synchronous
//! transformation over an immutable [`SearchIndex`].

pub mod highlight;
pub mod interface;
pub mod matcher;
pub mod models;
pub mod search;
pub mod tokenizer;

pub use interface::*;
pub use models::TrackRecord;
pub use search::SearchIndex;
