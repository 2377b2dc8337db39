//! Preview strategy: edits land in a shadow document, the real document is
//! untouched until finalize swaps the full shadow content in as one
//! operation.

use crate::error::SessionError;
use crate::model::document::{Document, TextEdit};
use crate::model::session::Session;
use crate::model::Position;
use crate::strategy::{EditStrategy, StrategyCore};
use crate::ui::EditSurface;
use crate::update::apply::{ApplyObserver, ProgressSink};
use crate::update::timeline::{FrameClock, PacingOptions};
use crate::update::undo::undo_to;

pub struct PreviewStrategy {
    core: StrategyCore,
    /// Shadow copy of the target receiving all edits until finalize
    preview: Document,
}

impl PreviewStrategy {
    /// Build a preview strategy over a snapshot of the target
    pub fn new(target: &Document) -> Self {
        Self {
            core: StrategyCore::new(),
            preview: Document::with_text(&target.text()),
        }
    }

    /// Pace with a caller-supplied clock (headless hosts, tests)
    pub fn with_clock(target: &Document, clock: Box<dyn FrameClock>) -> Self {
        Self {
            core: StrategyCore::with_clock(clock),
            preview: Document::with_text(&target.text()),
        }
    }

    /// The shadow document edits land in
    pub fn preview(&self) -> &Document {
        &self.preview
    }
}

impl EditStrategy for PreviewStrategy {
    fn make_changes(
        &mut self,
        session: &mut Session,
        _target: &mut Document,
        edits: &[TextEdit],
        observer: &mut dyn ApplyObserver,
    ) -> Result<(), SessionError> {
        self.core
            .make_changes(session, &mut self.preview, edits, observer)
    }

    fn make_progressive_changes(
        &mut self,
        session: &mut Session,
        _target: &mut Document,
        edits: &[TextEdit],
        observer: &mut dyn ApplyObserver,
        options: &PacingOptions,
        progress: Option<&mut ProgressSink<'_>>,
    ) -> Result<(), SessionError> {
        self.core.make_progressive_changes(
            session,
            &mut self.preview,
            edits,
            observer,
            options,
            progress,
        )
    }

    fn render_changes(
        &mut self,
        session: &mut Session,
        _target: &mut Document,
        surface: &mut dyn EditSurface,
    ) -> Option<Position> {
        // The host renders the preview in its own diff view; only focus
        // and the status panel are driven from here
        self.core.refresh_and_focus(session, &self.preview, surface)
    }

    fn accept_hunk(
        &mut self,
        session: &mut Session,
        _target: &mut Document,
        surface: &mut dyn EditSurface,
    ) -> Result<(), SessionError> {
        self.core.accept_nearest(session, &self.preview);
        self.core.refresh_and_focus(session, &self.preview, surface);
        Ok(())
    }

    fn discard_hunk(
        &mut self,
        session: &mut Session,
        _target: &mut Document,
        surface: &mut dyn EditSurface,
    ) -> Result<(), SessionError> {
        self.core.discard_nearest(session, &mut self.preview)?;
        self.core.refresh_and_focus(session, &self.preview, surface);
        Ok(())
    }

    fn undo_changes(
        &mut self,
        session: &mut Session,
        _target: &mut Document,
        surface: &mut dyn EditSurface,
        until_version: u64,
    ) -> Result<(), SessionError> {
        undo_to(&mut self.preview, until_version);
        self.core.refresh_and_focus(session, &self.preview, surface);
        Ok(())
    }

    fn apply(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        _surface: &mut dyn EditSurface,
    ) -> Result<(), SessionError> {
        if !target.content_equals(&self.preview) {
            target.push_checkpoint();
            let swap = TextEdit::replace(0..target.len_chars(), self.preview.text());
            target.mutate(&swap).map_err(|err| {
                session.terminate_discarded();
                err
            })?;
        }
        session.accept_all(&self.preview);
        Ok(())
    }

    fn cancel(
        &mut self,
        session: &mut Session,
        _target: &mut Document,
        _surface: &mut dyn EditSurface,
    ) -> Result<(), SessionError> {
        session.discard_all(&mut self.preview)?;
        Ok(())
    }

    fn set_anchor_line(&mut self, line: usize) {
        self.core.set_anchor_line(line);
    }
}
