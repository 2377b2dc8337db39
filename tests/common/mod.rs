//! Shared test helpers: a recording fake of the editing surface.

use std::collections::HashMap;
use std::ops::Range;

use seam::{AnnotationId, EditSurface, OverlayId, PanelPlacement, Position};

/// Surface fake that records every call so tests can assert on the visual
/// state the library drove.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_id: u64,
    /// Live annotations by id, with their current line range
    pub annotations: HashMap<u64, Range<usize>>,
    /// Live overlays by id, with their line and original text
    pub overlays: HashMap<u64, (usize, String)>,
    /// Last status panel placement
    pub panel: Option<PanelPlacement>,
    /// Every revealed position, in order
    pub revealed: Vec<Position>,
    /// Total annotations ever created
    pub annotations_created: usize,
    /// Total annotations ever removed
    pub annotations_removed: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Line ranges of live, non-parked annotations, sorted
    pub fn visible_annotation_ranges(&self) -> Vec<Range<usize>> {
        let mut ranges: Vec<_> = self
            .annotations
            .values()
            .filter(|r| !r.is_empty())
            .cloned()
            .collect();
        ranges.sort_by_key(|r| r.start);
        ranges
    }
}

impl EditSurface for RecordingSurface {
    fn add_annotation(&mut self, lines: Range<usize>) -> AnnotationId {
        self.next_id += 1;
        self.annotations_created += 1;
        self.annotations.insert(self.next_id, lines);
        AnnotationId(self.next_id)
    }

    fn move_annotation(&mut self, id: AnnotationId, lines: Range<usize>) {
        self.annotations.insert(id.0, lines);
    }

    fn remove_annotation(&mut self, id: AnnotationId) {
        self.annotations_removed += 1;
        self.annotations.remove(&id.0);
    }

    fn add_overlay(&mut self, line: usize, original_text: String) -> OverlayId {
        self.next_id += 1;
        self.overlays.insert(self.next_id, (line, original_text));
        OverlayId(self.next_id)
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        self.overlays.remove(&id.0);
    }

    fn position_panel(&mut self, placement: PanelPlacement) {
        self.panel = Some(placement);
    }

    fn reveal(&mut self, position: Position) {
        self.revealed.push(position);
    }
}
