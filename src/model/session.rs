//! Session model - the lifetime of one edit interaction over a target
//! document.
//!
//! A session owns the shadow snapshot of the document as it looked when the
//! interaction started, the hunk store derived from it, and the terminal
//! notification channel. The target document itself is owned by the editing
//! surface; every operation takes it as an explicit parameter.
//!
//! Accepting a hunk copies the current text of its region into the shadow
//! snapshot; discarding reverts the region in the current document to the
//! snapshot text. Either way the region then diffs clean and leaves the
//! pending set on the next refresh. When the last pending hunk resolves,
//! exactly one terminal notification fires: `Accepted` if at least one hunk
//! ended accepted, `Discarded` otherwise.

use std::sync::mpsc::{channel, Receiver, Sender};

use crate::error::SessionError;
use crate::model::document::{Document, TextEdit};
use crate::model::hunks::{HunkId, HunkStore};

/// Terminal session notifications. Exactly one fires per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// At least one hunk was accepted
    Accepted,
    /// No hunk was accepted (all discarded, cancelled, or fatal abort)
    Discarded,
}

/// One edit interaction over a target document.
#[derive(Debug)]
pub struct Session {
    /// Shadow snapshot of the target at session start
    original: Document,
    store: HunkStore,
    events_tx: Sender<SessionEvent>,
    events_rx: Option<Receiver<SessionEvent>>,
    terminated: bool,
    /// Version of the target when the session began; undo rollback target
    initial_version: u64,
}

impl Session {
    /// Start a session over a target document, snapshotting its content
    pub fn new(target: &Document) -> Self {
        let (events_tx, events_rx) = channel();
        Self {
            original: Document::with_text(&target.text()),
            store: HunkStore::new(),
            events_tx,
            events_rx: Some(events_rx),
            terminated: false,
            initial_version: target.alternative_version(),
        }
    }

    /// Take the terminal notification receiver. The owning controller
    /// subscribes once per session; subsequent calls return None.
    pub fn take_events(&mut self) -> Option<Receiver<SessionEvent>> {
        self.events_rx.take()
    }

    /// The shadow snapshot of the original content
    pub fn original(&self) -> &Document {
        &self.original
    }

    /// The hunk store
    pub fn store(&self) -> &HunkStore {
        &self.store
    }

    /// Mutable access to the hunk store (tracked range adjustment)
    pub fn store_mut(&mut self) -> &mut HunkStore {
        &mut self.store
    }

    /// Target version recorded at session start (rollback target for
    /// "discard everything")
    pub fn initial_version(&self) -> u64 {
        self.initial_version
    }

    /// Whether a terminal notification has fired
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    // ========================================================================
    // Refresh
    // ========================================================================

    /// Re-derive hunks from the diff of the snapshot against `current`.
    ///
    /// A refresh must never interrupt the user's ability to keep editing:
    /// if the current document is unusable the cycle is skipped with a
    /// warning instead of failing.
    pub fn refresh(&mut self, current: &Document) {
        if current.is_disposed() {
            tracing::warn!("skipping hunk refresh: document disposed");
            return;
        }
        self.store.refresh(&self.original, current);
    }

    // ========================================================================
    // Hunk resolution
    // ========================================================================

    /// Accept one hunk: its current text becomes the committed content for
    /// that region. Returns false when the hunk no longer exists (no-op).
    pub fn accept_hunk(&mut self, current: &Document, id: HunkId) -> bool {
        if self.terminated {
            return false;
        }
        let Some(hunk) = self.store.get(id).cloned() else {
            return false;
        };
        let text = current.lines_text(&hunk.current_lines);
        let range = self.original.line_range_to_char_range(&hunk.original_lines);
        if let Err(err) = self.original.mutate(&TextEdit::replace(range, text)) {
            tracing::warn!(%err, "skipping hunk accept: snapshot unusable");
            return false;
        }
        self.store.mark_accepted(id);
        self.refresh(current);
        self.maybe_fire_terminal();
        true
    }

    /// Discard one hunk: revert its current region to the snapshot text via
    /// a tracked, undoable mutation. Returns false when the hunk no longer
    /// exists; errors when the document mutation itself fails (fatal).
    pub fn discard_hunk(
        &mut self,
        current: &mut Document,
        id: HunkId,
    ) -> Result<bool, SessionError> {
        if self.terminated {
            return Ok(false);
        }
        let Some(hunk) = self.store.get(id).cloned() else {
            return Ok(false);
        };
        let text = self.original.lines_text(&hunk.original_lines);
        let range = current.line_range_to_char_range(&hunk.current_lines);
        current.mutate(&TextEdit::replace(range, text)).map_err(|err| {
            self.terminate_discarded();
            err
        })?;
        self.store.mark_discarded(id);
        self.refresh(current);
        self.maybe_fire_terminal();
        Ok(true)
    }

    /// Accept every still-pending hunk (finalize). Regions are spliced
    /// bottom-up so earlier snapshot ranges stay valid.
    pub fn accept_all(&mut self, current: &Document) -> usize {
        if self.terminated {
            return 0;
        }
        let mut ids: Vec<HunkId> = self.store.pending().iter().map(|h| h.id).collect();
        ids.reverse();
        let mut count = 0;
        for id in ids {
            let Some(hunk) = self.store.get(id).cloned() else {
                continue;
            };
            let text = current.lines_text(&hunk.current_lines);
            let range = self.original.line_range_to_char_range(&hunk.original_lines);
            if self.original.mutate(&TextEdit::replace(range, text)).is_ok() {
                self.store.mark_accepted(id);
                count += 1;
            }
        }
        self.refresh(current);
        self.maybe_fire_terminal();
        count
    }

    /// Discard every still-pending hunk, reverting each region bottom-up.
    pub fn discard_all(&mut self, current: &mut Document) -> Result<usize, SessionError> {
        if self.terminated {
            return Ok(0);
        }
        let mut ids: Vec<HunkId> = self.store.pending().iter().map(|h| h.id).collect();
        ids.reverse();
        let mut count = 0;
        for id in ids {
            let Some(hunk) = self.store.get(id).cloned() else {
                continue;
            };
            let text = self.original.lines_text(&hunk.original_lines);
            let range = current.line_range_to_char_range(&hunk.current_lines);
            current.mutate(&TextEdit::replace(range, text)).map_err(|err| {
                self.terminate_discarded();
                err
            })?;
            self.store.mark_discarded(id);
            count += 1;
        }
        self.refresh(current);
        self.maybe_fire_terminal();
        Ok(count)
    }

    // ========================================================================
    // Termination
    // ========================================================================

    /// Fire the terminal notification if all pending hunks are resolved.
    pub fn maybe_fire_terminal(&mut self) {
        if self.terminated || self.store.pending_count() != 0 {
            return;
        }
        let event = if self.store.any_accepted() {
            SessionEvent::Accepted
        } else {
            SessionEvent::Discarded
        };
        self.fire(event);
    }

    /// Terminate the session as discarded (fatal abort path).
    pub fn terminate_discarded(&mut self) {
        self.fire(SessionEvent::Discarded);
    }

    fn fire(&mut self, event: SessionEvent) {
        if self.terminated {
            return;
        }
        self.terminated = true;
        tracing::debug!(?event, "session terminated");
        // The controller may have dropped its receiver; that is fine
        let _ = self.events_tx.send(event);
    }
}
