//! Narrow interface to the editing surface.
//!
//! The library never renders. It drives visual state through
//! [`EditSurface`]: per-hunk annotations (changed-line highlights or diff
//! widgets), inline overlays showing original text, a floating status panel
//! ("N changes remaining"), and viewport reveals. Hosts implement this
//! against their widget system; tests use a recording fake.

use std::ops::Range;

use crate::model::Position;

/// Handle to a visual annotation created by the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnnotationId(pub u64);

/// Handle to an inline overlay region created by the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u64);

/// Where the status panel should sit and what it should summarize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelPlacement {
    /// Line the panel is pinned next to
    pub line: usize,
    /// Number of pending hunks ("N changes remaining")
    pub pending: usize,
}

/// Host-side rendering surface for one editor view.
pub trait EditSurface {
    /// Create a changed-lines annotation over a current-document line range
    fn add_annotation(&mut self, lines: Range<usize>) -> AnnotationId;
    /// Reposition an existing annotation (recycling path)
    fn move_annotation(&mut self, id: AnnotationId, lines: Range<usize>);
    fn remove_annotation(&mut self, id: AnnotationId);

    /// Create a collapsible overlay showing original text next to a line
    fn add_overlay(&mut self, line: usize, original_text: String) -> OverlayId;
    fn remove_overlay(&mut self, id: OverlayId);

    /// Reposition/resize the floating status panel
    fn position_panel(&mut self, placement: PanelPlacement);

    /// Bring a position into the viewport
    fn reveal(&mut self, position: Position);
}

// ============================================================================
// Status panel placement
// ============================================================================

/// Which side of the focused hunk the status panel prefers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAnchor {
    AboveFocus,
    BelowFocus,
}

/// Placement policy for the floating status panel
#[derive(Debug, Clone, Copy)]
pub struct PanelConfig {
    /// Preferred side of the focused hunk
    pub anchor: PanelAnchor,
    /// Lines of spacing between panel and hunk
    pub margin: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            anchor: PanelAnchor::AboveFocus,
            margin: 1,
        }
    }
}

impl PanelConfig {
    pub fn new(anchor: PanelAnchor) -> Self {
        Self {
            anchor,
            margin: 1,
        }
    }

    /// Set the margin (builder pattern)
    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    /// Compute the panel line for a focused hunk, clamped to the document.
    /// Falls back to the opposite side when the preferred side runs out of
    /// room.
    pub fn compute_line(&self, focus: &Range<usize>, total_lines: usize) -> usize {
        let last = if focus.is_empty() {
            focus.start
        } else {
            focus.end - 1
        };
        match self.anchor {
            PanelAnchor::AboveFocus => {
                if focus.start >= self.margin {
                    focus.start - self.margin
                } else {
                    (last + self.margin).min(total_lines.saturating_sub(1))
                }
            }
            PanelAnchor::BelowFocus => {
                let below = last + self.margin;
                if below < total_lines {
                    below
                } else {
                    focus.start.saturating_sub(self.margin)
                }
            }
        }
    }
}

// ============================================================================
// Widget pool
// ============================================================================

/// Reusable pool of diff-widget annotations, one per pending hunk.
///
/// Widgets are recycled rather than recreated: syncing to a smaller hunk
/// set parks the surplus widgets on an empty range, and a later sync
/// reuses them before asking the surface for new ones.
#[derive(Debug, Default)]
pub struct WidgetPool {
    active: Vec<AnnotationId>,
    idle: Vec<AnnotationId>,
}

impl WidgetPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Total widgets ever created and still owned by the pool
    pub fn capacity(&self) -> usize {
        self.active.len() + self.idle.len()
    }

    /// Widgets currently bound to a hunk
    pub fn in_use(&self) -> usize {
        self.active.len()
    }

    /// Bind one widget per hunk range, growing the pool only when no idle
    /// widget is available.
    pub fn sync(&mut self, surface: &mut dyn EditSurface, hunks: &[Range<usize>]) {
        // Shrink: park surplus widgets out of sight
        while self.active.len() > hunks.len() {
            if let Some(id) = self.active.pop() {
                surface.move_annotation(id, 0..0);
                self.idle.push(id);
            }
        }
        // Rebind the widgets that stay active
        for (id, lines) in self.active.iter().zip(hunks) {
            surface.move_annotation(*id, lines.clone());
        }
        // Grow: reuse idle widgets first, create as a last resort
        for lines in hunks.iter().skip(self.active.len()) {
            let id = match self.idle.pop() {
                Some(id) => {
                    surface.move_annotation(id, lines.clone());
                    id
                }
                None => surface.add_annotation(lines.clone()),
            };
            self.active.push(id);
        }
    }

    /// Remove every widget from the surface and empty the pool
    pub fn clear(&mut self, surface: &mut dyn EditSurface) {
        for id in self.active.drain(..).chain(self.idle.drain(..)) {
            surface.remove_annotation(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Surface fake counting creation/removal and recording moves
    #[derive(Debug, Default)]
    struct CountingSurface {
        created: usize,
        removed: usize,
        moves: Vec<(AnnotationId, Range<usize>)>,
        next: u64,
    }

    impl EditSurface for CountingSurface {
        fn add_annotation(&mut self, _lines: Range<usize>) -> AnnotationId {
            self.created += 1;
            self.next += 1;
            AnnotationId(self.next)
        }
        fn move_annotation(&mut self, id: AnnotationId, lines: Range<usize>) {
            self.moves.push((id, lines));
        }
        fn remove_annotation(&mut self, _id: AnnotationId) {
            self.removed += 1;
        }
        fn add_overlay(&mut self, _line: usize, _text: String) -> OverlayId {
            OverlayId(0)
        }
        fn remove_overlay(&mut self, _id: OverlayId) {}
        fn position_panel(&mut self, _placement: PanelPlacement) {}
        fn reveal(&mut self, _position: Position) {}
    }

    // ========================================================================
    // Panel placement
    // ========================================================================

    #[test]
    fn test_panel_above_focus() {
        let config = PanelConfig::default();
        assert_eq!(config.compute_line(&(10..13), 100), 9);
    }

    #[test]
    fn test_panel_above_falls_back_below_at_document_top() {
        let config = PanelConfig::default().with_margin(2);
        assert_eq!(config.compute_line(&(0..2), 100), 3);
    }

    #[test]
    fn test_panel_below_focus() {
        let config = PanelConfig::new(PanelAnchor::BelowFocus);
        assert_eq!(config.compute_line(&(10..13), 100), 13);
    }

    #[test]
    fn test_panel_below_falls_back_above_at_document_end() {
        let config = PanelConfig::new(PanelAnchor::BelowFocus);
        assert_eq!(config.compute_line(&(98..100), 100), 97);
    }

    #[test]
    fn test_panel_empty_focus_range() {
        let config = PanelConfig::default();
        // Pure-deletion hunk: anchor relative to the collapse line
        assert_eq!(config.compute_line(&(5..5), 100), 4);
    }

    // ========================================================================
    // Widget pool
    // ========================================================================

    #[test]
    fn test_pool_creates_one_widget_per_hunk() {
        let mut surface = CountingSurface::default();
        let mut pool = WidgetPool::new();
        pool.sync(&mut surface, &[1..2, 4..6, 9..10]);
        assert_eq!(pool.in_use(), 3);
        assert_eq!(surface.created, 3);
    }

    #[test]
    fn test_pool_recycles_instead_of_recreating() {
        let mut surface = CountingSurface::default();
        let mut pool = WidgetPool::new();
        pool.sync(&mut surface, &[1..2, 4..6, 9..10]);

        // Shrink to one hunk, then grow back to three
        pool.sync(&mut surface, &[4..6]);
        assert_eq!(pool.in_use(), 1);
        assert_eq!(pool.capacity(), 3);

        pool.sync(&mut surface, &[1..2, 4..6, 9..10]);
        assert_eq!(pool.in_use(), 3);
        // No widget was ever recreated or removed
        assert_eq!(surface.created, 3);
        assert_eq!(surface.removed, 0);
    }

    #[test]
    fn test_pool_parks_surplus_widgets_out_of_sight() {
        let mut surface = CountingSurface::default();
        let mut pool = WidgetPool::new();
        pool.sync(&mut surface, &[1..2, 4..6]);
        surface.moves.clear();

        pool.sync(&mut surface, &[1..2]);
        assert!(surface.moves.iter().any(|(_, lines)| lines.is_empty()));
    }

    #[test]
    fn test_pool_clear_removes_everything() {
        let mut surface = CountingSurface::default();
        let mut pool = WidgetPool::new();
        pool.sync(&mut surface, &[1..2, 4..6]);
        pool.sync(&mut surface, &[1..2]);

        pool.clear(&mut surface);
        assert_eq!(pool.capacity(), 0);
        assert_eq!(surface.removed, 2);
    }
}
