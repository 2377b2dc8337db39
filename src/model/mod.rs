//! Core state: documents, hunks, and sessions.

pub mod document;
pub mod hunks;
pub mod session;

pub use document::{Document, EditOperation, TextEdit};
pub use hunks::{Hunk, HunkId, HunkState, HunkStore};
pub use session::{Session, SessionEvent};

/// A caret location in a document, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}
