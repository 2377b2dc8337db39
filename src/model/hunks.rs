//! Hunk store and per-hunk state machine.
//!
//! A hunk is one maximal contiguous run of changed lines between the
//! session's original snapshot and the current document. Hunks are Pending
//! until accepted or discarded; both transitions are terminal. The store
//! keeps the pending set plus a ledger of resolved hunks for reporting.
//!
//! Pending ranges are re-derived by diffing on [`HunkStore::refresh`], with
//! ids preserved for hunks whose region is unchanged on either side.
//! Between refreshes, [`HunkStore::shift_for_edit`] performs the cheap
//! tracked adjustment that keeps current-document ranges in step with
//! surrounding edits.

use std::ops::Range;

use crate::model::document::Document;
use crate::util::diff::line_hunks;

/// Stable identity of a hunk within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HunkId(u64);

/// Lifecycle state of a hunk.
///
/// `Pending -> Accepted` and `Pending -> Discarded` are the only
/// transitions; nothing leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HunkState {
    Pending,
    Accepted,
    Discarded,
}

/// A unit of change: line ranges into the original snapshot and the current
/// document, plus lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub id: HunkId,
    pub state: HunkState,
    /// Half-open line range in the original snapshot (empty for insertions)
    pub original_lines: Range<usize>,
    /// Half-open line range in the current document (empty for deletions)
    pub current_lines: Range<usize>,
}

impl Hunk {
    /// Last line covered in the current document. For an empty range (pure
    /// deletion) this is the line the deletion collapsed onto.
    pub fn last_current_line(&self) -> usize {
        if self.current_lines.is_empty() {
            self.current_lines.start
        } else {
            self.current_lines.end - 1
        }
    }
}

/// Owns the hunks of one session.
#[derive(Debug, Default)]
pub struct HunkStore {
    pending: Vec<Hunk>,
    resolved: Vec<Hunk>,
    next_id: u64,
}

impl HunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> HunkId {
        let id = HunkId(self.next_id);
        self.next_id += 1;
        id
    }

    // ========================================================================
    // Derivation
    // ========================================================================

    /// Re-derive the pending set by diffing the original snapshot against
    /// the current document.
    ///
    /// Hunks whose change disappeared (edit reverted to a no-op) drop out;
    /// new contiguous change regions become new Pending hunks. A re-derived
    /// hunk keeps its id when it matches a previous pending hunk on either
    /// the original or the current range, so accepting one hunk does not
    /// re-identify its neighbors.
    pub fn refresh(&mut self, original: &Document, current: &Document) {
        let regions = line_hunks(&original.text(), &current.text());
        let previous = std::mem::take(&mut self.pending);
        let mut leftover = previous;

        let mut pending = Vec::with_capacity(regions.len());
        for region in regions {
            let matched = leftover.iter().position(|h| {
                h.original_lines == region.original_lines || h.current_lines == region.current_lines
            });
            let id = match matched {
                Some(idx) => leftover.remove(idx).id,
                None => self.allocate_id(),
            };
            pending.push(Hunk {
                id,
                state: HunkState::Pending,
                original_lines: region.original_lines,
                current_lines: region.current_lines,
            });
        }
        self.pending = pending;
    }

    /// Shift pending current-document ranges to follow an edit at
    /// `at_line` that changed the line count by `line_delta`.
    ///
    /// This is the tracked adjustment used between full refreshes; it never
    /// creates or removes hunks.
    pub fn shift_for_edit(&mut self, at_line: usize, line_delta: isize) {
        if line_delta == 0 {
            return;
        }
        let shift = |line: usize| -> usize {
            if line_delta < 0 {
                line.saturating_sub(line_delta.unsigned_abs())
            } else {
                line + line_delta as usize
            }
        };
        for hunk in &mut self.pending {
            if hunk.current_lines.start > at_line {
                hunk.current_lines = shift(hunk.current_lines.start)..shift(hunk.current_lines.end);
            } else if at_line < hunk.current_lines.end {
                // Edit landed inside the hunk: grow or shrink its tail
                hunk.current_lines.end = shift(hunk.current_lines.end).max(hunk.current_lines.start);
            }
        }
    }

    // ========================================================================
    // State transitions
    // ========================================================================

    /// Move a pending hunk to Accepted. Returns the resolved hunk, or None
    /// if no pending hunk has this id (stale actions are no-ops).
    pub fn mark_accepted(&mut self, id: HunkId) -> Option<&Hunk> {
        self.resolve(id, HunkState::Accepted)
    }

    /// Move a pending hunk to Discarded. Returns the resolved hunk, or None
    /// if no pending hunk has this id.
    pub fn mark_discarded(&mut self, id: HunkId) -> Option<&Hunk> {
        self.resolve(id, HunkState::Discarded)
    }

    fn resolve(&mut self, id: HunkId, state: HunkState) -> Option<&Hunk> {
        let idx = self.pending.iter().position(|h| h.id == id)?;
        let mut hunk = self.pending.remove(idx);
        hunk.state = state;
        tracing::debug!(?id, ?state, "hunk resolved");
        self.resolved.push(hunk);
        self.resolved.last()
    }

    /// Move every still-pending hunk to Accepted. Returns how many moved.
    pub fn accept_all(&mut self) -> usize {
        self.resolve_all(HunkState::Accepted)
    }

    /// Move every still-pending hunk to Discarded. Returns how many moved.
    pub fn discard_all(&mut self) -> usize {
        self.resolve_all(HunkState::Discarded)
    }

    fn resolve_all(&mut self, state: HunkState) -> usize {
        let count = self.pending.len();
        for mut hunk in self.pending.drain(..) {
            hunk.state = state;
            self.resolved.push(hunk);
        }
        count
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The pending hunks, in document order
    pub fn pending(&self) -> &[Hunk] {
        &self.pending
    }

    /// Look up a pending hunk by id
    pub fn get(&self, id: HunkId) -> Option<&Hunk> {
        self.pending.iter().find(|h| h.id == id)
    }

    /// Number of pending hunks ("N changes remaining")
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether any hunk ended Accepted
    pub fn any_accepted(&self) -> bool {
        self.resolved.iter().any(|h| h.state == HunkState::Accepted)
    }

    /// All hunks, pending first then resolved, with their ranges and state
    pub fn get_info(&self) -> Vec<Hunk> {
        self.pending
            .iter()
            .chain(self.resolved.iter())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::{Document, TextEdit};

    fn store_for(original: &str, current: &str) -> (HunkStore, Document, Document) {
        let original = Document::with_text(original);
        let current = Document::with_text(current);
        let mut store = HunkStore::new();
        store.refresh(&original, &current);
        (store, original, current)
    }

    // ========================================================================
    // Derivation
    // ========================================================================

    #[test]
    fn test_refresh_derives_pending_hunks() {
        let (store, _, _) = store_for("a\nb\nc\n", "a\nX\nc\nextra\n");
        assert_eq!(store.pending_count(), 2);
        assert!(store.pending().iter().all(|h| h.state == HunkState::Pending));
    }

    #[test]
    fn test_refresh_drops_reverted_hunks() {
        let original = Document::with_text("a\nb\n");
        let mut current = Document::with_text("a\nB\n");
        let mut store = HunkStore::new();
        store.refresh(&original, &current);
        assert_eq!(store.pending_count(), 1);

        // Revert the change; the hunk must disappear
        current.mutate(&TextEdit::replace(2..3, "b")).unwrap();
        store.refresh(&original, &current);
        assert_eq!(store.pending_count(), 0);
        assert!(store.get_info().is_empty());
    }

    #[test]
    fn test_refresh_preserves_ids_of_unchanged_hunks() {
        let original = Document::with_text("a\nb\nc\nd\ne\n");
        let mut current = Document::with_text("a\nB\nc\nd\nE\n");
        let mut store = HunkStore::new();
        store.refresh(&original, &current);
        let ids: Vec<_> = store.pending().iter().map(|h| h.id).collect();
        assert_eq!(ids.len(), 2);

        // An unrelated refresh with identical content keeps both ids
        store.refresh(&original, &current);
        let after: Vec<_> = store.pending().iter().map(|h| h.id).collect();
        assert_eq!(ids, after);

        // Reverting the first change keeps the second hunk's id
        current.mutate(&TextEdit::replace(2..3, "b")).unwrap();
        store.refresh(&original, &current);
        assert_eq!(store.pending_count(), 1);
        assert_eq!(store.pending()[0].id, ids[1]);
    }

    // ========================================================================
    // State machine
    // ========================================================================

    #[test]
    fn test_accept_is_terminal() {
        let (mut store, original, current) = store_for("a\n", "A\n");
        let id = store.pending()[0].id;

        let hunk = store.mark_accepted(id).unwrap();
        assert_eq!(hunk.state, HunkState::Accepted);
        assert_eq!(store.pending_count(), 0);

        // Repeat actions on a resolved id are no-ops
        assert!(store.mark_accepted(id).is_none());
        assert!(store.mark_discarded(id).is_none());
        assert!(store.any_accepted());

        // A refresh never re-issues a resolved id as pending
        store.refresh(&original, &current);
        assert!(store.get(id).is_none());
    }

    #[test]
    fn test_discard_is_terminal() {
        let (mut store, ..) = store_for("a\n", "A\n");
        let id = store.pending()[0].id;
        assert_eq!(store.mark_discarded(id).unwrap().state, HunkState::Discarded);
        assert!(store.mark_accepted(id).is_none());
        assert!(!store.any_accepted());
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let (mut store, ..) = store_for("a\n", "A\n");
        assert!(store.mark_accepted(HunkId(999)).is_none());
        assert_eq!(store.pending_count(), 1);
    }

    #[test]
    fn test_accept_all_and_discard_all() {
        let (mut store, ..) = store_for("a\nb\nc\n", "A\nb\nC\n");
        assert_eq!(store.accept_all(), 2);
        assert_eq!(store.pending_count(), 0);
        assert!(store.any_accepted());

        let (mut store, ..) = store_for("a\nb\nc\n", "A\nb\nC\n");
        assert_eq!(store.discard_all(), 2);
        assert!(!store.any_accepted());
        assert_eq!(store.get_info().len(), 2);
    }

    #[test]
    fn test_get_info_reports_pending_and_resolved() {
        let (mut store, ..) = store_for("a\nb\nc\n", "A\nb\nC\n");
        let first = store.pending()[0].id;
        store.mark_accepted(first);

        let info = store.get_info();
        assert_eq!(info.len(), 2);
        assert_eq!(info[0].state, HunkState::Pending);
        assert_eq!(info[1].state, HunkState::Accepted);
    }

    // ========================================================================
    // Tracked range adjustment
    // ========================================================================

    #[test]
    fn test_shift_for_edit_moves_hunks_below() {
        let (mut store, ..) = store_for("a\nb\nc\nd\ne\nf\ng\n", "a\nB\nc\nd\ne\nF\ng\n");
        let before: Vec<_> = store.pending().iter().map(|h| h.current_lines.clone()).collect();
        assert_eq!(before, vec![1..2, 5..6]);

        // Two lines inserted at line 2: only the second hunk moves
        store.shift_for_edit(2, 2);
        let after: Vec<_> = store.pending().iter().map(|h| h.current_lines.clone()).collect();
        assert_eq!(after, vec![1..2, 7..8]);
    }

    #[test]
    fn test_shift_for_edit_grows_hunk_hit_inside() {
        let (mut store, ..) = store_for("a\nb\nc\nd\n", "a\nX\nY\nd\n");
        assert_eq!(store.pending()[0].current_lines, 1..3);

        store.shift_for_edit(1, 1);
        assert_eq!(store.pending()[0].current_lines, 1..4);
    }

    #[test]
    fn test_shift_for_edit_negative_delta() {
        let (mut store, ..) = store_for("a\nb\nc\nd\ne\nf\ng\n", "a\nB\nc\nd\ne\nF\ng\n");
        store.shift_for_edit(2, -2);
        let after: Vec<_> = store.pending().iter().map(|h| h.current_lines.clone()).collect();
        assert_eq!(after, vec![1..2, 3..4]);
    }
}
