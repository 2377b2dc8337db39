//! Programmatic rollback to a prior document version.

use crate::model::document::Document;

/// Rewind `doc` to `target_version` by repeated single-step undo.
///
/// Steps while the alternative version is still greater than the target and
/// undo is available; stops as soon as either condition fails. No pacing,
/// no cancellation - this is the fast path for "discard everything".
/// Dependent visual state (hunk annotations) is the caller's to refresh.
pub fn undo_to(doc: &mut Document, target_version: u64) {
    while doc.alternative_version() > target_version && doc.can_undo() {
        if !doc.undo_step() {
            break;
        }
    }
}
