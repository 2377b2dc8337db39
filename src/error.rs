//! Error taxonomy for edit sessions.
//!
//! Only document mutation can fail in a way the caller must see: the target
//! (or a shadow) was disposed underneath an active session. Cancellation of
//! progressive pacing is not an error (the remaining text is applied
//! synchronously), and acting on a hunk that no longer exists is a no-op.

use thiserror::Error;

/// Fatal session-level failures.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The document backing the session is no longer usable. Any in-flight
    /// pacing stops, already-applied sub-edits stay in place, and the
    /// session terminates as discarded.
    #[error("document was disposed")]
    DocumentDisposed,
}
