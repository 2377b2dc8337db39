//! seam - progressive edit sessions for text documents
//!
//! This crate applies a sequence of proposed text edits to a live document
//! incrementally, tracks each contiguous change as an independently
//! acceptable/discardable hunk, keeps a focus pointer on the nearest
//! pending hunk, and coordinates undo back to any prior version.
//!
//! The pieces compose bottom-up: [`update::EditTimeline`] paces one edit
//! into word-sized sub-edits, [`update::ProgressiveEditApplier`] applies
//! batches (immediate or paced), [`model::HunkStore`] derives and tracks
//! hunks, [`update::nearest_pending`] drives focus, and the three
//! [`strategy::EditStrategy`] variants wire everything into a full
//! edit/accept/discard/undo cycle.

pub mod config;
pub mod config_paths;
pub mod error;
pub mod model;
pub mod strategy;
pub mod tracing;
pub mod ui;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use config::SeamConfig;
pub use error::SessionError;
pub use model::{
    Document, EditOperation, Hunk, HunkId, HunkState, HunkStore, Position, Session, SessionEvent,
    TextEdit,
};
pub use strategy::{EditStrategy, LivePreviewStrategy, LiveStrategy, PreviewStrategy, StrategyCore};
pub use ui::{AnnotationId, EditSurface, OverlayId, PanelPlacement, WidgetPool};
pub use update::{
    nearest_pending, ApplyObserver, CancellationToken, EditTimeline, FocusCandidate, FrameClock,
    ImmediateClock, PacingOptions, ProgressiveEditApplier, SystemClock,
};
