//! Nearest-hunk selection.
//!
//! Given a reference line (the UI anchor, e.g. where the status panel is
//! pinned) and the pending hunks, pick the hunk with the smallest line
//! distance. The reference being inside a hunk counts as distance zero;
//! ties break to the first hunk in store order, deterministically.

use std::ops::Range;

use crate::model::hunks::{Hunk, HunkId, HunkStore};

/// The currently nearest pending hunk. Derived, not stored: recomputed on
/// every store change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusCandidate {
    pub id: HunkId,
    /// Line distance from the reference line (zero when inside the hunk)
    pub distance: usize,
    /// The hunk's current-document line range
    pub current_lines: Range<usize>,
}

/// Line distance between a reference line and a hunk.
fn hunk_distance(hunk: &Hunk, reference_line: usize) -> usize {
    let start = hunk.current_lines.start;
    let last = hunk.last_current_line();
    if reference_line < start {
        start - reference_line
    } else if reference_line > last {
        reference_line - last
    } else {
        0
    }
}

/// Pick the pending hunk nearest to `reference_line`, or None when no
/// pending hunks remain (the session outcome decision is the caller's).
pub fn nearest_pending(store: &HunkStore, reference_line: usize) -> Option<FocusCandidate> {
    store
        .pending()
        .iter()
        .min_by_key(|hunk| hunk_distance(hunk, reference_line))
        .map(|hunk| FocusCandidate {
            id: hunk.id,
            distance: hunk_distance(hunk, reference_line),
            current_lines: hunk.current_lines.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::Document;

    /// Build a store whose pending hunks sit at the given line ranges.
    /// Lines are made distinct so each range diffs as its own hunk.
    fn store_with_hunks(ranges: &[Range<usize>]) -> HunkStore {
        let total = ranges.iter().map(|r| r.end).max().unwrap_or(0) + 2;
        let original: String = (0..total).map(|i| format!("line {i}\n")).collect();
        let current: String = (0..total)
            .map(|i| {
                if ranges.iter().any(|r| r.contains(&i)) {
                    format!("LINE {i}\n")
                } else {
                    format!("line {i}\n")
                }
            })
            .collect();
        let mut store = HunkStore::new();
        store.refresh(
            &Document::with_text(&original),
            &Document::with_text(&current),
        );
        assert_eq!(store.pending_count(), ranges.len());
        store
    }

    #[test]
    fn test_reference_between_hunks_picks_closer_one() {
        // Hunks at lines 10-12 and 40-42, reference at 25:
        // distance to first = 25-12 = 13, to second = 40-25 = 15
        let store = store_with_hunks(&[10..13, 40..43]);
        let candidate = nearest_pending(&store, 25).unwrap();
        assert_eq!(candidate.current_lines, 10..13);
        assert_eq!(candidate.distance, 13);
    }

    #[test]
    fn test_reference_inside_hunk_is_distance_zero() {
        let store = store_with_hunks(&[10..13, 40..43]);
        let candidate = nearest_pending(&store, 11).unwrap();
        assert_eq!(candidate.current_lines, 10..13);
        assert_eq!(candidate.distance, 0);
    }

    #[test]
    fn test_reference_above_all_hunks() {
        let store = store_with_hunks(&[10..13, 40..43]);
        let candidate = nearest_pending(&store, 2).unwrap();
        assert_eq!(candidate.current_lines, 10..13);
        assert_eq!(candidate.distance, 8);
    }

    #[test]
    fn test_reference_below_all_hunks() {
        let store = store_with_hunks(&[10..13, 40..43]);
        let candidate = nearest_pending(&store, 50).unwrap();
        assert_eq!(candidate.current_lines, 40..43);
        assert_eq!(candidate.distance, 8);
    }

    #[test]
    fn test_equidistant_tie_breaks_to_first_in_store_order() {
        // Reference at 20: both hunks are 5 lines away
        let store = store_with_hunks(&[10..16, 25..31]);
        let candidate = nearest_pending(&store, 20).unwrap();
        assert_eq!(candidate.current_lines, 10..16);

        // Deterministic across recomputation
        let again = nearest_pending(&store, 20).unwrap();
        assert_eq!(candidate, again);
    }

    #[test]
    fn test_no_pending_hunks_reports_no_candidate() {
        let store = HunkStore::new();
        assert!(nearest_pending(&store, 10).is_none());
    }

    #[test]
    fn test_resolving_nearer_hunk_promotes_farther_one() {
        let mut store = store_with_hunks(&[10..13, 40..43]);
        let nearer = nearest_pending(&store, 25).unwrap();
        store.mark_discarded(nearer.id);

        let next = nearest_pending(&store, 25).unwrap();
        assert_eq!(next.current_lines, 40..43);
    }
}
