//! Progressive edit application.
//!
//! Applies a batch of proposed edits to a document, either synchronously as
//! one transaction or paced through [`EditTimeline`] so the text appears to
//! stream in. Whatever the mode, the final document content is identical
//! for the same input edits; pacing only changes the timing of intermediate
//! states.

use crate::error::SessionError;
use crate::model::document::{Document, EditOperation, TextEdit};
use crate::update::timeline::{EditTimeline, FrameClock, PacingOptions, SystemClock};

/// Notified when application starts and stops, so surrounding UI can react
/// (e.g. suppress cursor blinking, show a busy indicator). Both callbacks
/// fire even for synchronous application, to keep the contract uniform.
pub trait ApplyObserver {
    fn start(&mut self) {}
    fn stop(&mut self) {}
}

/// Observer that ignores all notifications.
#[derive(Debug, Default)]
pub struct NullObserver;

impl ApplyObserver for NullObserver {}

/// Callback invoked after each sub-edit with the document and the inverse
/// operations, enabling callers to update visuals incrementally.
pub type ProgressSink<'a> = dyn FnMut(&Document, &[EditOperation]) + 'a;

/// Applies edit batches to the current document.
///
/// The first edit of a session pushes an undo checkpoint, so the whole
/// session's edits undo as one unit however many sub-edits they were split
/// into.
pub struct ProgressiveEditApplier {
    clock: Box<dyn FrameClock>,
    session_started: bool,
}

impl std::fmt::Debug for ProgressiveEditApplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressiveEditApplier")
            .field("session_started", &self.session_started)
            .finish()
    }
}

impl Default for ProgressiveEditApplier {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressiveEditApplier {
    /// Applier paced by wall-clock sleeps
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    /// Applier paced by a caller-supplied clock
    pub fn with_clock(clock: Box<dyn FrameClock>) -> Self {
        Self {
            clock,
            session_started: false,
        }
    }

    /// Apply a batch of edits.
    ///
    /// Without `options` the batch is applied synchronously, bracketed by
    /// `observer.start()`/`stop()`. With `options` each edit is split into
    /// paced sub-edits; the progress sink (if any) runs after every
    /// sub-edit. Cancellation falls back to applying the remaining text
    /// synchronously. A disposed document aborts the batch, leaving
    /// already-applied sub-edits in place.
    pub fn apply(
        &mut self,
        doc: &mut Document,
        edits: &[TextEdit],
        observer: &mut dyn ApplyObserver,
        options: Option<&PacingOptions>,
        mut progress: Option<&mut ProgressSink<'_>>,
    ) -> Result<(), SessionError> {
        if doc.is_disposed() {
            return Err(SessionError::DocumentDisposed);
        }
        if !self.session_started {
            doc.push_checkpoint();
            self.session_started = true;
        }

        observer.start();
        let result = match options {
            None => self.apply_immediate(doc, edits, &mut progress),
            Some(opts) => self.apply_paced(doc, edits, opts, &mut progress),
        };
        observer.stop();
        result
    }

    fn apply_immediate(
        &mut self,
        doc: &mut Document,
        edits: &[TextEdit],
        progress: &mut Option<&mut ProgressSink<'_>>,
    ) -> Result<(), SessionError> {
        let mut delta: isize = 0;
        let mut inverses = Vec::with_capacity(edits.len());
        for edit in edits {
            let op = doc.mutate(&shift_edit(edit, delta))?;
            delta += edit_delta(edit);
            inverses.push(op.inverse());
        }
        if let Some(sink) = progress.as_mut() {
            sink(doc, &inverses);
        }
        Ok(())
    }

    fn apply_paced(
        &mut self,
        doc: &mut Document,
        edits: &[TextEdit],
        opts: &PacingOptions,
        progress: &mut Option<&mut ProgressSink<'_>>,
    ) -> Result<(), SessionError> {
        let total_chars: usize = edits.iter().map(|e| e.text.chars().count()).sum();
        let mut delta: isize = 0;
        let mut cancelled = opts.token.is_cancelled();

        for edit in edits {
            let shifted = shift_edit(edit, delta);
            delta += edit_delta(edit);

            // Pure deletions and post-cancellation edits land in one step
            if cancelled || total_chars == 0 || edit.text.is_empty() {
                let op = doc.mutate(&shifted)?;
                emit(progress, doc, &op);
                continue;
            }

            // Each edit gets a share of the budget proportional to its text
            let share = edit.text.chars().count() as f64 / total_chars as f64;
            let mut timeline = EditTimeline::new(&edit.text, opts.duration.mul_f64(share));
            let interval = timeline.interval();

            // The first sub-edit replaces the target range; the rest insert
            // after the previously applied chunk.
            let mut replace_range = Some(shifted.range.clone());
            let mut cursor = shifted.range.start;

            while let Some(chunk) = timeline.next() {
                // A clock reporting host shutdown counts as cancellation
                let cancel_now = opts.token.is_cancelled() || !self.clock.wait(interval);
                let text = if cancel_now {
                    cancelled = true;
                    let mut rest = chunk;
                    rest.push_str(&timeline.drain_rest());
                    rest
                } else {
                    chunk
                };
                let sub_edit = match replace_range.take() {
                    Some(range) => TextEdit::replace(range, text),
                    None => TextEdit::insert(cursor, text),
                };
                let op = doc.mutate(&sub_edit)?;
                cursor = op.offset + op.inserted_text.chars().count();
                emit(progress, doc, &op);
                if cancelled {
                    break;
                }
            }
        }
        Ok(())
    }
}

fn emit(progress: &mut Option<&mut ProgressSink<'_>>, doc: &Document, op: &EditOperation) {
    if let Some(sink) = progress.as_mut() {
        sink(doc, &[op.inverse()]);
    }
}

/// Net char delta a proposed edit causes once applied
fn edit_delta(edit: &TextEdit) -> isize {
    edit.text.chars().count() as isize - (edit.range.end - edit.range.start) as isize
}

/// Compensate a batch-relative range for the deltas of earlier edits
fn shift_edit(edit: &TextEdit, delta: isize) -> TextEdit {
    let start = edit.range.start.saturating_add_signed(delta);
    let end = edit.range.end.saturating_add_signed(delta);
    TextEdit::replace(start..end, edit.text.clone())
}
