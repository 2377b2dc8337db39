//! Live strategy: edits land directly in the real document, and each
//! pending hunk carries inline visuals attached straight to the editing
//! surface - a changed-lines highlight plus an optional collapsible
//! overlay showing the original text.

use std::collections::HashMap;

use crate::error::SessionError;
use crate::model::document::{Document, TextEdit};
use crate::model::hunks::HunkId;
use crate::model::session::Session;
use crate::model::Position;
use crate::strategy::{EditStrategy, StrategyCore};
use crate::ui::{AnnotationId, EditSurface, OverlayId};
use crate::update::apply::{ApplyObserver, ProgressSink};
use crate::update::timeline::{FrameClock, PacingOptions};
use crate::update::undo::undo_to;

pub struct LiveStrategy {
    core: StrategyCore,
    /// Highlight per pending hunk, rebuilt/diffed each refresh cycle
    annotations: HashMap<HunkId, AnnotationId>,
    /// Original-text overlay per pending hunk, with the line it sits on
    overlays: HashMap<HunkId, (OverlayId, usize)>,
    show_original: bool,
}

impl Default for LiveStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveStrategy {
    pub fn new() -> Self {
        Self {
            core: StrategyCore::new(),
            annotations: HashMap::new(),
            overlays: HashMap::new(),
            show_original: true,
        }
    }

    /// Pace with a caller-supplied clock (headless hosts, tests)
    pub fn with_clock(clock: Box<dyn FrameClock>) -> Self {
        Self {
            core: StrategyCore::with_clock(clock),
            annotations: HashMap::new(),
            overlays: HashMap::new(),
            show_original: true,
        }
    }

    /// Enable or disable the original-text overlays (builder pattern)
    pub fn with_original_overlays(mut self, show: bool) -> Self {
        self.show_original = show;
        self
    }

    fn sync_visuals(&mut self, session: &Session, surface: &mut dyn EditSurface) {
        let pending = session.store().pending().to_vec();

        // Drop visuals whose hunk resolved or disappeared
        self.annotations.retain(|id, annotation| {
            let alive = pending.iter().any(|h| h.id == *id);
            if !alive {
                surface.remove_annotation(*annotation);
            }
            alive
        });
        self.overlays.retain(|id, (overlay, _)| {
            let alive = pending.iter().any(|h| h.id == *id);
            if !alive {
                surface.remove_overlay(*overlay);
            }
            alive
        });

        for hunk in &pending {
            match self.annotations.get(&hunk.id) {
                Some(annotation) => surface.move_annotation(*annotation, hunk.current_lines.clone()),
                None => {
                    let annotation = surface.add_annotation(hunk.current_lines.clone());
                    self.annotations.insert(hunk.id, annotation);
                }
            }

            // Overlays only make sense where original text exists
            if !self.show_original || hunk.original_lines.is_empty() {
                continue;
            }
            let line = hunk.current_lines.start;
            match self.overlays.get(&hunk.id).copied() {
                Some((_, at)) if at == line => {}
                Some((overlay, _)) => {
                    surface.remove_overlay(overlay);
                    let text = session.original().lines_text(&hunk.original_lines);
                    self.overlays
                        .insert(hunk.id, (surface.add_overlay(line, text), line));
                }
                None => {
                    let text = session.original().lines_text(&hunk.original_lines);
                    self.overlays
                        .insert(hunk.id, (surface.add_overlay(line, text), line));
                }
            }
        }
    }

    fn clear_visuals(&mut self, surface: &mut dyn EditSurface) {
        for (_, annotation) in self.annotations.drain() {
            surface.remove_annotation(annotation);
        }
        for (_, (overlay, _)) in self.overlays.drain() {
            surface.remove_overlay(overlay);
        }
    }

    fn rerender(
        &mut self,
        session: &mut Session,
        target: &Document,
        surface: &mut dyn EditSurface,
    ) -> Option<Position> {
        let focus = self.core.refresh_and_focus(session, target, surface);
        if session.is_terminated() {
            self.clear_visuals(surface);
        } else {
            self.sync_visuals(session, surface);
        }
        focus
    }
}

impl EditStrategy for LiveStrategy {
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
        self.clear_visuals(surface);
        Ok(())
    }

    fn cancel(
        &mut self,
        session: &mut Session,
        target: &mut Document,
        surface: &mut dyn EditSurface,
    ) -> Result<(), SessionError> {
        let result = session.discard_all(target).map(|_| ());
        self.clear_visuals(surface);
        result
    }

    fn set_anchor_line(&mut self, line: usize) {
        self.core.set_anchor_line(line);
    }
}
