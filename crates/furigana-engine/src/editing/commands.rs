use std::ops::Range;

use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::{EditError, EditorState};
use crate::overlay::SelectionRange;

/// Edits and view changes a host can apply to an [`EditorState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    InsertText { at: usize, text: String },
    Delete { range: Range<usize> },
    Replace { range: Range<usize>, text: String },
    SetSelection { ranges: Vec<SelectionRange> },
    SetViewport { range: Range<usize> },
}

impl Cmd {
    /// The replaced range and inserted text for buffer edits, `None` otherwise.
    pub(crate) fn as_edit(&self) -> Option<(Range<usize>, &str)> {
        match self {
            Cmd::InsertText { at, text } => Some((*at..*at, text.as_str())),
            Cmd::Delete { range } => Some((range.clone(), "")),
            Cmd::Replace { range, text } => Some((range.clone(), text.as_str())),
            Cmd::SetSelection { .. } | Cmd::SetViewport { .. } => None,
        }
    }
}

/// Check that `range` lies within the buffer on char boundaries.
pub(crate) fn check_range(state: &EditorState, range: &Range<usize>) -> Result<(), EditError> {
    if range.start > range.end {
        return Err(EditError::InvalidRange {
            start: range.start,
            end: range.end,
        });
    }
    for offset in [range.start, range.end] {
        if offset > state.len() {
            return Err(EditError::OutOfBounds {
                offset,
                len: state.len(),
            });
        }
        if offset < state.len() && !state.buffer.is_codepoint_boundary(offset) {
            return Err(EditError::NotCharBoundary { offset });
        }
    }
    Ok(())
}

/// Compile a buffer edit into a delta over the current buffer.
pub(crate) fn compile_edit(state: &EditorState, range: Range<usize>, text: &str) -> Delta<RopeInfo> {
    Delta::simple_edit(range, Rope::from(text), state.len())
}

/// Map an offset through replacing `range` with `inserted` bytes.
///
/// Offsets inside the replaced range collapse to the end of the insertion.
pub(crate) fn map_offset(offset: usize, range: &Range<usize>, inserted: usize) -> usize {
    if offset <= range.start {
        offset
    } else if offset >= range.end {
        offset - (range.end - range.start) + inserted
    } else {
        range.start + inserted
    }
}

pub(crate) fn map_selection(
    selection: SelectionRange,
    range: &Range<usize>,
    inserted: usize,
) -> SelectionRange {
    SelectionRange::new(
        map_offset(selection.from, range, inserted),
        map_offset(selection.to, range, inserted),
    )
}
