//! Live-preview strategy: edits land directly in the real document, and a
//! pool of reusable diff widgets is kept in sync, one widget per pending
//! hunk.

use std::ops::Range;

use crate::error::SessionError;
use crate::model::document::{Document, TextEdit};
use crate::model::session::Session;
use crate::model::Position;
use crate::strategy::{EditStrategy, StrategyCore};
use crate::ui::{EditSurface, WidgetPool};
use crate::update::apply::{ApplyObserver, ProgressSink};
use crate::update::timeline::{FrameClock, PacingOptions};
use crate::update::undo::undo_to;

pub struct LivePreviewStrategy {
    core: StrategyCore,
    pool: WidgetPool,
}

impl Default for LivePreviewStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl LivePreviewStrategy {
    /// Build the strategy with an empty widget pool; widgets are created
    /// on demand and recycled from then on.
    pub fn new() -> Self {
        Self {
            core: StrategyCore::new(),
            pool: WidgetPool::new(),
        }
    }

    /// Pace with a caller-supplied clock (headless hosts, tests)
    pub fn with_clock(clock: Box<dyn FrameClock>) -> Self {
        Self {
            core: StrategyCore::with_clock(clock),
            pool: WidgetPool::new(),
        }
    }

    /// Widget pool statistics, for hosts that surface them
    pub fn pool(&self) -> &WidgetPool {
        &self.pool
    }

    fn sync_widgets(&mut self, session: &Session, surface: &mut dyn EditSurface) {
        let ranges: Vec<Range<usize>> = session
            .store()
            .pending()
            .iter()
            .map(|h| h.current_lines.clone())
            .collect();
        self.pool.sync(surface, &ranges);
    }

    fn rerender(
        &mut self,
        session: &mut Session,
        target: &Document,
        surface: &mut dyn EditSurface,
    ) -> Option<Position> {
        let focus = self.core.refresh_and_focus(session, target, surface);
        if session.is_terminated() {
            self.pool.clear(surface);
        } else {
            self.sync_widgets(session, surface);
        }
        focus
    }
}

impl EditStrategy for LivePreviewStrategy {
    fn make_changes(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        edits: &[TextEdit],
        observer: &mut dyn ApplyObserver,
    ) -> Result<(), SessionError> {
        self.core.make_changes(session, target, edits, observer)
    }

    fn make_progressive_changes(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        edits: &[TextEdit],
        observer: &mut dyn ApplyObserver,
        options: &PacingOptions,
        progress: Option<&mut ProgressSink<'_>>,
    ) -> Result<(), SessionError> {
        self.core
            .make_progressive_changes(session, target, edits, observer, options, progress)
    }

    fn render_changes(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        surface: &mut dyn EditSurface,
    ) -> Option<Position> {
        self.rerender(session, target, surface)
    }

    fn accept_hunk(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        surface: &mut dyn EditSurface,
    ) -> Result<(), SessionError> {
        self.core.accept_nearest(session, target);
        self.rerender(session, target, surface);
        Ok(())
    }

    fn discard_hunk(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        surface: &mut dyn EditSurface,
    ) -> Result<(), SessionError> {
        self.core.discard_nearest(session, target)?;
        self.rerender(session, target, surface);
        Ok(())
    }

    fn undo_changes(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        surface: &mut dyn EditSurface,
        until_version: u64,
    ) -> Result<(), SessionError> {
        undo_to(target, until_version);
        self.rerender(session, target, surface);
        Ok(())
    }

    fn apply(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        surface: &mut dyn EditSurface,
    ) -> Result<(), SessionError> {
        session.accept_all(target);
        self.pool.clear(surface);
        Ok(())
    }

    fn cancel(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        surface: &mut dyn EditSurface,
    ) -> Result<(), SessionError> {
        let result = session.discard_all(target).map(|_| ());
        self.pool.clear(surface);
        result
    }

    fn set_anchor_line(&mut self, line: usize) {
        self.core.set_anchor_line(line);
    }
}
