//! Document model - a rope-backed text buffer with invertible mutation,
//! checkpointed undo history, and an alternative-version counter.
//!
//! Every mutation goes through [`Document::mutate`], which records the
//! inverse operation into the currently open undo transaction and bumps the
//! alternative version. [`Document::push_checkpoint`] seals the open
//! transaction so the next mutation starts a new undo-distinguishable unit;
//! [`Document::undo_step`] pops and reverts exactly one such unit.

use std::ops::Range;
use std::path::PathBuf;

use ropey::Rope;

use crate::error::SessionError;
use crate::model::Position;

/// Default cap on the number of undo transactions kept per document.
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// A proposed replacement of a char range with new text.
///
/// Ranges refer to the document state the caller observed; the applier
/// compensates ranges within a batch for the deltas of earlier edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Char range to replace (half-open)
    pub range: Range<usize>,
    /// Replacement text (empty for pure deletions)
    pub text: String,
}

impl TextEdit {
    /// Replace a range with new text
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Insert text at an offset
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: offset..offset,
            text: text.into(),
        }
    }

    /// Delete a range
    pub fn delete(range: Range<usize>) -> Self {
        Self {
            range,
            text: String::new(),
        }
    }
}

/// The applied, invertible record of a single mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOperation {
    /// Char offset where the edit occurred
    pub offset: usize,
    /// Text that was removed (empty for pure inserts)
    pub deleted_text: String,
    /// Text that was inserted (empty for pure deletes)
    pub inserted_text: String,
}

impl EditOperation {
    /// Get the inverse operation for undo
    pub fn inverse(&self) -> Self {
        Self {
            offset: self.offset,
            deleted_text: self.inserted_text.clone(),
            inserted_text: self.deleted_text.clone(),
        }
    }

    /// Replay this operation as a proposed edit
    pub fn as_edit(&self) -> TextEdit {
        TextEdit::replace(
            self.offset..self.offset + self.deleted_text.chars().count(),
            self.inserted_text.clone(),
        )
    }

    /// Net change in line count caused by this operation
    pub fn line_delta(&self) -> isize {
        let inserted = self.inserted_text.matches('\n').count() as isize;
        let deleted = self.deleted_text.matches('\n').count() as isize;
        inserted - deleted
    }
}

/// One undo-distinguishable unit: the operations applied since the last
/// checkpoint, plus the version to restore when it is undone.
#[derive(Debug, Clone)]
struct Transaction {
    version_before: u64,
    ops: Vec<EditOperation>,
}

/// Document state - the text buffer plus undo history and version stamp
#[derive(Debug, Clone)]
pub struct Document {
    /// The text buffer
    buffer: Rope,
    /// Path to the file on disk (None for in-memory documents)
    file_path: Option<PathBuf>,
    /// Undo stack of sealed and open transactions
    history: Vec<Transaction>,
    /// Whether the last history entry still accepts operations
    transaction_open: bool,
    /// Cap on retained transactions
    history_limit: usize,
    /// Alternative version: incremented on every mutation, restored by undo
    version: u64,
    /// A disposed document rejects all further mutation
    disposed: bool,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Create a document with initial text
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            file_path: None,
            history: Vec::new(),
            transaction_open: false,
            history_limit: DEFAULT_HISTORY_LIMIT,
            version: 0,
            disposed: false,
        }
    }

    /// Load a document from a file path
    pub fn from_file(path: PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let mut doc = Self::with_text(&content);
        doc.file_path = Some(path);
        Ok(doc)
    }

    /// Set the cap on retained undo transactions
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// Path to the backing file, if any
    pub fn file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    // ========================================================================
    // Content access
    // ========================================================================

    /// Full document content as a String
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Length of the document in chars
    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    /// Get the number of lines in the document
    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    /// Get a line by index, including its trailing newline
    pub fn line_text(&self, line_idx: usize) -> Option<String> {
        if line_idx < self.buffer.len_lines() {
            Some(self.buffer.line(line_idx).to_string())
        } else {
            None
        }
    }

    /// Convert a half-open line range into the corresponding char range
    ///
    /// The end of the range is the start of line `end`, or end of document
    /// when the range reaches past the last line.
    pub fn line_range_to_char_range(&self, lines: &Range<usize>) -> Range<usize> {
        let total = self.buffer.len_lines();
        let start = self.buffer.line_to_char(lines.start.min(total));
        let end = if lines.end >= total {
            self.buffer.len_chars()
        } else {
            self.buffer.line_to_char(lines.end)
        };
        start..end.max(start)
    }

    /// The text of a line range, including trailing newlines where present
    pub fn lines_text(&self, lines: &Range<usize>) -> String {
        let range = self.line_range_to_char_range(lines);
        self.buffer.slice(range).to_string()
    }

    /// Convert a char offset to a (line, column) position
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let clamped = offset.min(self.buffer.len_chars());
        let line = self.buffer.char_to_line(clamped);
        let line_start = self.buffer.line_to_char(line);
        Position::new(line, clamped - line_start)
    }

    /// Convert a (line, column) position to a char offset
    pub fn position_to_offset(&self, pos: Position) -> usize {
        if pos.line >= self.buffer.len_lines() {
            return self.buffer.len_chars();
        }
        let line_start = self.buffer.line_to_char(pos.line);
        let line_len = self.buffer.line(pos.line).len_chars();
        line_start + pos.column.min(line_len)
    }

    /// Whether two documents hold identical content
    pub fn content_equals(&self, other: &Document) -> bool {
        self.buffer == other.buffer
    }

    // ========================================================================
    // Mutation and history
    // ========================================================================

    /// Apply a replacement edit, recording its inverse for undo.
    ///
    /// The range is clamped to the document bounds. Returns the applied
    /// operation (from which the caller can take the inverse), or an error
    /// if the document was disposed.
    pub fn mutate(&mut self, edit: &TextEdit) -> Result<EditOperation, SessionError> {
        if self.disposed {
            return Err(SessionError::DocumentDisposed);
        }
        let len = self.buffer.len_chars();
        let start = edit.range.start.min(len);
        let end = edit.range.end.clamp(start, len);

        let deleted_text = self.buffer.slice(start..end).to_string();
        self.buffer.remove(start..end);
        self.buffer.insert(start, &edit.text);

        let op = EditOperation {
            offset: start,
            deleted_text,
            inserted_text: edit.text.clone(),
        };
        self.record(op.clone());
        Ok(op)
    }

    fn record(&mut self, op: EditOperation) {
        if !self.transaction_open {
            self.history.push(Transaction {
                version_before: self.version,
                ops: Vec::new(),
            });
            self.transaction_open = true;
            while self.history.len() > self.history_limit {
                self.history.remove(0);
            }
        }
        if let Some(current) = self.history.last_mut() {
            current.ops.push(op);
        }
        self.version += 1;
    }

    /// Seal the open undo transaction; the next mutation starts a new one.
    ///
    /// Pushing a checkpoint before a batch makes the whole batch one undo
    /// unit from the user's perspective, however many sub-edits it is
    /// internally split into.
    pub fn push_checkpoint(&mut self) {
        self.transaction_open = false;
    }

    /// Whether a single-step undo is available
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Undo one checkpoint group. Returns false when nothing was undone.
    pub fn undo_step(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        let Some(transaction) = self.history.pop() else {
            return false;
        };
        for op in transaction.ops.iter().rev() {
            let inserted_len = op.inserted_text.chars().count();
            self.buffer.remove(op.offset..op.offset + inserted_len);
            self.buffer.insert(op.offset, &op.deleted_text);
        }
        self.version = transaction.version_before;
        self.transaction_open = false;
        true
    }

    /// The alternative version: a monotonically increasing stamp restored by
    /// undo, used as an undo rollback target.
    pub fn alternative_version(&self) -> u64 {
        self.version
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Mark the document as unusable; all further mutation fails
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    /// Whether the document was disposed
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
