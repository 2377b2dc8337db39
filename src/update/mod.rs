//! Edit application and focus logic.

pub mod apply;
pub mod focus;
pub mod timeline;
pub mod undo;

pub use apply::{ApplyObserver, NullObserver, ProgressSink, ProgressiveEditApplier};
pub use focus::{nearest_pending, FocusCandidate};
pub use timeline::{
    CancellationToken, EditTimeline, FrameClock, ImmediateClock, PacingOptions, SystemClock,
};
pub use undo::undo_to;
