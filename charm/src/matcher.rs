//! Adapter over the external fuzzy-match collaborator.
//!
//! The engine wraps `SkimMatcherV2` in case-insensitive mode and reshapes its
//! matched character indices into the inclusive index ranges the rest of the
//! pipeline works with. Ranges within a field are non-overlapping; the
//! collaborator contract guarantees at least one range whenever a field is
//! reported as matched.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// An inclusive `(start, end)` index range, the convention of the external
/// matcher's reported ranges. Indexes characters of a field or positions of
/// an initials key depending on the field matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRange {
    pub start: usize,
    pub end: usize,
}

impl MatchRange {
    /// Number of matched indices the range covers.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// One field's match result: the raw matcher score (higher = better) plus
/// matched index ranges.
#[derive(Debug, Clone)]
pub struct FieldHit {
    pub score: i64,
    pub ranges: Vec<MatchRange>,
}

/// The approximate string-match primitive, treated as a collaborator.
pub struct FuzzyEngine {
    matcher: SkimMatcherV2,
}

impl std::fmt::Debug for FuzzyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzyEngine").finish_non_exhaustive()
    }
}

impl FuzzyEngine {
    pub fn new() -> Self {
        Self {
            matcher: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// Match `query` against one indexed field. `None` when the field does
    /// not match (or is empty, so nothing can match).
    pub fn match_field(&self, field: &str, query: &str) -> Option<FieldHit> {
        let (score, indices) = self.matcher.fuzzy_indices(field, query)?;
        let ranges = indices_to_ranges(&indices);
        debug_assert!(!ranges.is_empty(), "matched field must report at least one range");
        if ranges.is_empty() {
            return None;
        }
        Some(FieldHit { score, ranges })
    }
}

impl Default for FuzzyEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapse matched indices into contiguous inclusive ranges.
pub(crate) fn indices_to_ranges(indices: &[usize]) -> Vec<MatchRange> {
    if indices.is_empty() {
        return Vec::new();
    }

    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut ranges = vec![MatchRange { start: sorted[0], end: sorted[0] }];
    for &idx in &sorted[1..] {
        match ranges.last_mut() {
            Some(last) if idx == last.end + 1 => last.end = idx,
            _ => ranges.push(MatchRange { start: idx, end: idx }),
        }
    }
    ranges
}

/// Total matched indices across a field's ranges.
pub(crate) fn total_matched(ranges: &[MatchRange]) -> usize {
    ranges.iter().map(MatchRange::len).sum()
}
