//! Line-level diffing between an original snapshot and the current document.
//!
//! A hunk is one maximal contiguous run of changed lines. The diff is
//! computed with `similar`; every non-equal diff op is such a run, and
//! adjacent runs are merged defensively in case the backend splits a
//! replace into touching delete/insert ops.

use std::ops::Range;

use similar::{DiffTag, TextDiff};

/// One contiguous changed-line region, as half-open line ranges into the
/// original and current text.
///
/// Either side may be empty: a pure insertion has an empty original range,
/// a pure deletion an empty current range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineHunk {
    pub original_lines: Range<usize>,
    pub current_lines: Range<usize>,
}

/// Compute the contiguous changed-line regions between two texts.
///
/// Returns hunks ordered top to bottom; an empty vec means the texts are
/// line-identical.
pub fn line_hunks(original: &str, current: &str) -> Vec<LineHunk> {
    let diff = TextDiff::from_lines(original, current);
    let mut hunks: Vec<LineHunk> = Vec::new();

    for op in diff.ops() {
        if op.tag() == DiffTag::Equal {
            continue;
        }
        let old = op.old_range();
        let new = op.new_range();

        // Merge with the previous hunk when the regions touch
        if let Some(last) = hunks.last_mut() {
            if last.original_lines.end == old.start && last.current_lines.end == new.start {
                last.original_lines.end = old.end;
                last.current_lines.end = new.end;
                continue;
            }
        }
        hunks.push(LineHunk {
            original_lines: old,
            current_lines: new,
        });
    }
    hunks
}
