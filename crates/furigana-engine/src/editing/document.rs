use std::ops::Range;

use xi_rope::Rope;

use crate::editing::commands::{self, Cmd};
use crate::editing::lines::{LineRef, lines_with_spans};
use crate::editing::{EditError, UpdateFlags};
use crate::overlay::SelectionRange;

/// Editable buffer state seen by view plugins.
///
/// Holds the whole document in one `xi_rope::Rope`, the active selection
/// ranges, and the byte range currently visible in the host's viewport.
/// All changes go through [`EditorState::apply`], which reports what
/// changed as [`UpdateFlags`].
#[derive(Debug, Clone)]
pub struct EditorState {
    pub(crate) buffer: Rope,
    pub(crate) selections: Vec<SelectionRange>,
    pub(crate) viewport: Range<usize>,
    /// Incremented on each buffer edit
    pub(crate) version: u64,
}

impl EditorState {
    /// New state with the cursor at the start and the whole document visible.
    pub fn new(text: &str) -> Self {
        let buffer = Rope::from(text);
        let len = buffer.len();
        Self {
            buffer,
            selections: vec![SelectionRange::cursor(0)],
            viewport: 0..len,
            version: 0,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EditError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text))
    }

    pub fn buffer(&self) -> &Rope {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn selections(&self) -> &[SelectionRange] {
        &self.selections
    }

    /// The primary selection's head position.
    pub fn cursor(&self) -> usize {
        self.selections.first().map_or(0, |s| s.to)
    }

    pub fn viewport(&self) -> Range<usize> {
        self.viewport.clone()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Lines of the document; none for an empty document.
    pub fn lines(&self) -> impl Iterator<Item = LineRef> + '_ {
        lines_with_spans(&self.buffer)
    }

    pub fn line_count(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.buffer.measure::<xi_rope::LinesMetric>() + 1
        }
    }

    pub fn line_of_offset(&self, offset: usize) -> usize {
        self.buffer.line_of_offset(offset.min(self.len()))
    }

    /// Start offset of `line`, clamped to the end of the buffer.
    pub fn offset_of_line(&self, line: usize) -> usize {
        if line >= self.line_count() {
            return self.len();
        }
        self.buffer.offset_of_line(line)
    }

    pub fn prev_char_offset(&self, offset: usize) -> Option<usize> {
        self.buffer.prev_codepoint_offset(offset.min(self.len()))
    }

    pub fn next_char_offset(&self, offset: usize) -> Option<usize> {
        self.buffer.next_codepoint_offset(offset.min(self.len()))
    }

    /// Slice the buffer, clamping the range to document bounds.
    pub fn slice(&self, range: Range<usize>) -> String {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.buffer.slice_to_cow(start..end).into_owned()
    }

    /// Apply a command and report what changed.
    ///
    /// Edits map every selection and the viewport through the change.
    /// Offsets must be in bounds and on char boundaries.
    pub fn apply(&mut self, cmd: Cmd) -> Result<UpdateFlags, EditError> {
        if let Some((range, text)) = cmd.as_edit() {
            return self.apply_edit(range, text);
        }

        match cmd {
            Cmd::SetSelection { ranges } => {
                for selection in &ranges {
                    commands::check_range(self, &(selection.from..selection.to))?;
                }
                self.selections = ranges;
                Ok(UpdateFlags {
                    selection_set: true,
                    ..Default::default()
                })
            }
            Cmd::SetViewport { range } => {
                let len = self.len();
                let start = range.start.min(len);
                let viewport = start..range.end.min(len).max(start);
                let changed = viewport != self.viewport;
                self.viewport = viewport;
                Ok(UpdateFlags {
                    viewport_changed: changed,
                    ..Default::default()
                })
            }
            Cmd::InsertText { .. } | Cmd::Delete { .. } | Cmd::Replace { .. } => {
                Ok(UpdateFlags::default())
            }
        }
    }

    fn apply_edit(&mut self, range: Range<usize>, text: &str) -> Result<UpdateFlags, EditError> {
        commands::check_range(self, &range)?;
        if range.is_empty() && text.is_empty() {
            return Ok(UpdateFlags::default());
        }

        let delta = commands::compile_edit(self, range.clone(), text);
        self.buffer = delta.apply(&self.buffer);
        self.version += 1;

        let inserted = text.len();
        for selection in &mut self.selections {
            *selection = commands::map_selection(*selection, &range, inserted);
        }

        let viewport = commands::map_offset(self.viewport.start, &range, inserted)
            ..commands::map_offset(self.viewport.end, &range, inserted);
        let viewport_changed = viewport != self.viewport;
        self.viewport = viewport;

        Ok(UpdateFlags {
            doc_changed: true,
            viewport_changed,
            selection_set: false,
        })
    }
}
