//! Edit strategies - the composition layer.
//!
//! A strategy implements one full edit/accept/discard/undo cycle over a
//! session. The three variants differ only in where edits land and how
//! hunks are visualized; the core algorithms (application, hunk refresh,
//! nearest-hunk focus, undo) are shared through [`StrategyCore`], a plain
//! delegate each variant embeds.

mod live;
mod live_preview;
mod preview;

pub use live::LiveStrategy;
pub use live_preview::LivePreviewStrategy;
pub use preview::PreviewStrategy;

use crate::error::SessionError;
use crate::model::document::{Document, TextEdit};
use crate::model::session::Session;
use crate::model::Position;
use crate::ui::{EditSurface, PanelConfig, PanelPlacement};
use crate::update::apply::{ApplyObserver, ProgressSink, ProgressiveEditApplier};
use crate::update::focus::nearest_pending;
use crate::update::timeline::{FrameClock, PacingOptions};

/// One user-facing edit interaction: apply edits, review hunks, finalize.
///
/// All methods take the externally-owned target document and the host
/// surface explicitly; the strategy holds only its visual bookkeeping.
pub trait EditStrategy {
    /// Apply a batch of edits synchronously
    fn make_changes(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        edits: &[TextEdit],
        observer: &mut dyn ApplyObserver,
    ) -> Result<(), SessionError>;

    /// Apply a batch of edits paced over time
    fn make_progressive_changes(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        edits: &[TextEdit],
        observer: &mut dyn ApplyObserver,
        options: &PacingOptions,
        progress: Option<&mut ProgressSink<'_>>,
    ) -> Result<(), SessionError>;

    /// Refresh hunk-derived visuals after an edit batch and return the new
    /// focus position, if any hunk is pending
    fn render_changes(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        surface: &mut dyn EditSurface,
    ) -> Option<Position>;

    /// Accept the hunk nearest the anchor, then re-render
    fn accept_hunk(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        surface: &mut dyn EditSurface,
    ) -> Result<(), SessionError>;

    /// Discard the hunk nearest the anchor, then re-render
    fn discard_hunk(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        surface: &mut dyn EditSurface,
    ) -> Result<(), SessionError>;

    /// Roll the edited document back to a prior version, then re-render
    fn undo_changes(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        surface: &mut dyn EditSurface,
        until_version: u64,
    ) -> Result<(), SessionError>;

    /// Finalize the session, committing remaining hunks
    fn apply(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        surface: &mut dyn EditSurface,
    ) -> Result<(), SessionError>;

    /// Abandon the session, discarding all pending hunks
    fn cancel(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        surface: &mut dyn EditSurface,
    ) -> Result<(), SessionError>;

    /// Move the UI anchor the nearest-hunk selection is measured from
    fn set_anchor_line(&mut self, line: usize);
}

/// Shared implementation the variants delegate to.
pub struct StrategyCore {
    applier: ProgressiveEditApplier,
    anchor_line: usize,
    panel: PanelConfig,
}

impl std::fmt::Debug for StrategyCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyCore")
            .field("anchor_line", &self.anchor_line)
            .finish()
    }
}

impl Default for StrategyCore {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyCore {
    pub fn new() -> Self {
        Self {
            applier: ProgressiveEditApplier::new(),
            anchor_line: 0,
            panel: PanelConfig::default(),
        }
    }

    /// Core paced by a caller-supplied clock (headless hosts, tests)
    pub fn with_clock(clock: Box<dyn FrameClock>) -> Self {
        Self {
            applier: ProgressiveEditApplier::with_clock(clock),
            anchor_line: 0,
            panel: PanelConfig::default(),
        }
    }

    pub fn set_anchor_line(&mut self, line: usize) {
        self.anchor_line = line;
    }

    pub fn anchor_line(&self) -> usize {
        self.anchor_line
    }

    /// Synchronous batch application plus hunk refresh. A mutation failure
    /// is fatal: the session terminates as discarded.
    pub fn make_changes(
        &mut self,
        session: &mut Session,
        doc: &mut Document,
        edits: &[TextEdit],
        observer: &mut dyn ApplyObserver,
    ) -> Result<(), SessionError> {
        match self.applier.apply(doc, edits, observer, None, None) {
            Ok(()) => {
                session.refresh(doc);
                Ok(())
            }
            Err(err) => {
                session.terminate_discarded();
                Err(err)
            }
        }
    }

    /// Paced batch application. Between sub-edits the pending hunk ranges
    /// are shifted along with the document (the cheap tracked adjustment);
    /// a full refresh runs once the batch completes.
    pub fn make_progressive_changes(
        &mut self,
        session: &mut Session,
        doc: &mut Document,
        edits: &[TextEdit],
        observer: &mut dyn ApplyObserver,
        options: &PacingOptions,
        caller_sink: Option<&mut ProgressSink<'_>>,
    ) -> Result<(), SessionError> {
        let result = {
            let store = session.store_mut();
            let mut caller_sink = caller_sink;
            let mut sink = |d: &Document, ops: &[crate::model::EditOperation]| {
                for inverse in ops {
                    let line = d.offset_to_position(inverse.offset).line;
                    // The sink receives inverses; the applied delta is the
                    // negation of the inverse's
                    store.shift_for_edit(line, -inverse.line_delta());
                }
                if let Some(forward) = caller_sink.as_mut() {
                    forward(d, ops);
                }
            };
            self.applier
                .apply(doc, edits, observer, Some(options), Some(&mut sink))
        };
        match result {
            Ok(()) => {
                session.refresh(doc);
                Ok(())
            }
            Err(err) => {
                session.terminate_discarded();
                Err(err)
            }
        }
    }

    /// The shared half of a render cycle: re-derive hunks, recompute the
    /// nearest pending hunk, reposition the status panel, reveal the focus.
    pub fn refresh_and_focus(
        &mut self,
        session: &mut Session,
        doc: &Document,
        surface: &mut dyn EditSurface,
    ) -> Option<Position> {
        session.refresh(doc);
        let candidate = nearest_pending(session.store(), self.anchor_line)?;
        let panel_line = self.panel.compute_line(&candidate.current_lines, doc.line_count());
        surface.position_panel(PanelPlacement {
            line: panel_line,
            pending: session.store().pending_count(),
        });
        let focus = Position::new(candidate.current_lines.start, 0);
        surface.reveal(focus);
        Some(focus)
    }

    /// Accept the hunk nearest the anchor. No-op when nothing is pending
    /// or the candidate went stale.
    pub fn accept_nearest(&mut self, session: &mut Session, doc: &Document) -> bool {
        match nearest_pending(session.store(), self.anchor_line) {
            Some(candidate) => session.accept_hunk(doc, candidate.id),
            None => false,
        }
    }

    /// Discard the hunk nearest the anchor. No-op when nothing is pending;
    /// errors only when the revert mutation itself fails.
    pub fn discard_nearest(
        &mut self,
        session: &mut Session,
        doc: &mut Document,
    ) -> Result<bool, SessionError> {
        match nearest_pending(session.store(), self.anchor_line) {
            Some(candidate) => session.discard_hunk(doc, candidate.id),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::apply::NullObserver;
    use crate::update::timeline::ImmediateClock;

    fn core() -> StrategyCore {
        StrategyCore::with_clock(Box::<ImmediateClock>::default())
    }

    #[test]
    fn test_make_changes_refreshes_hunks() {
        let mut target = Document::with_text("a\nb\nc\n");
        let mut session = Session::new(&target);
        let mut core = core();

        let range = target.line_range_to_char_range(&(1..2));
        core.make_changes(
            &mut session,
            &mut target,
            &[TextEdit::replace(range, "B\n")],
            &mut NullObserver,
        )
        .unwrap();

        assert_eq!(session.store().pending_count(), 1);
        assert_eq!(session.store().pending()[0].current_lines, 1..2);
    }

    #[test]
    fn test_progressive_changes_track_ranges_between_refreshes() {
        let mut target = Document::with_text("a\nb\nc\nd\ne\n");
        let mut session = Session::new(&target);
        let mut core = core();

        // First batch creates a hunk on line 4
        let range = target.line_range_to_char_range(&(4..5));
        core.make_changes(
            &mut session,
            &mut target,
            &[TextEdit::replace(range, "E\n")],
            &mut NullObserver,
        )
        .unwrap();
        assert_eq!(session.store().pending()[0].current_lines, 4..5);

        // A paced batch inserting two lines at the top shifts it down
        let options = PacingOptions::new(std::time::Duration::from_millis(100));
        core.make_progressive_changes(
            &mut session,
            &mut target,
            &[TextEdit::insert(0, "x\ny\n")],
            &mut NullObserver,
            &options,
            None,
        )
        .unwrap();

        let hunks: Vec<_> = session
            .store()
            .pending()
            .iter()
            .map(|h| h.current_lines.clone())
            .collect();
        assert!(hunks.contains(&(6..7)), "hunks after refresh: {hunks:?}");
    }

    #[test]
    fn test_disposed_target_terminates_session() {
        let mut target = Document::with_text("a\n");
        let mut session = Session::new(&target);
        let events = session.take_events().unwrap();
        target.dispose();

        let mut core = core();
        let result = core.make_changes(
            &mut session,
            &mut target,
            &[TextEdit::insert(0, "x")],
            &mut NullObserver,
        );
        assert!(result.is_err());
        assert!(session.is_terminated());
        assert_eq!(
            events.try_recv(),
            Ok(crate::model::session::SessionEvent::Discarded)
        );
    }

    #[test]
    fn test_accept_nearest_with_no_pending_is_noop() {
        let target = Document::with_text("a\n");
        let mut session = Session::new(&target);
        let mut core = core();
        assert!(!core.accept_nearest(&mut session, &target));
    }
}
