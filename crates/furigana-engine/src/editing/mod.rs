/*!
 * # Editing Host Model
 *
 * A minimal editor host for the live overlay engine.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: xi-rope Buffer
 * - The entire document is stored in one **`xi_rope::Rope`** buffer
 * - Edits compile to a **Delta** and are applied immediately
 *
 * ### 2. Command-Based Updates
 * - All changes are **Commands** (`Cmd`): text edits, selection and viewport changes
 * - Applying a command reports **`UpdateFlags`** (doc changed, viewport changed, selection set)
 *
 * ### 3. View Plugins
 * - The host owns the active plugin list and feeds every update to each plugin
 * - Plugins expose a **`DecorationSet`** the host draws over the buffer
 * - The plugin list is re-derived from an **`ExtensionConfig`** at runtime,
 *   so the furigana overlay can be switched on and off without rebuilding the view
 *
 * ## Module Structure
 *
 * - **`document`**: `EditorState` with the rope buffer, selections and viewport
 * - **`commands`**: `Cmd` enum, range checks and offset mapping
 * - **`lines`**: `LineRef` iteration over the rope
 * - **`patch`**: `UpdateFlags`
 * - **`view`**: `ViewPlugin`, `ViewUpdate`, `ExtensionConfig` and the `EditorView` host
 *
 * ## Usage Pattern
 *
 * ```rust
 * use furigana_engine::editing::*;
 * use furigana_engine::SelectionRange;
 *
 * let state = EditorState::new("{日|ひ}");
 * let mut view = EditorView::new(state, ExtensionConfig::from_preference(true)).unwrap();
 * assert_eq!(view.decorations().len(), 0); // cursor at 0 touches the markup
 *
 * view.dispatch(Cmd::InsertText { at: 0, text: "x ".to_string() }).unwrap();
 * view.dispatch(Cmd::SetSelection { ranges: vec![SelectionRange::cursor(0)] }).unwrap();
 * assert_eq!(view.decorations().len(), 1);
 * ```
 */

pub mod commands;
pub mod document;
pub mod lines;
pub mod patch;
pub mod view;

pub use commands::Cmd;
pub use document::EditorState;
pub use lines::{LineRef, lines_with_spans};
pub use patch::UpdateFlags;
pub use view::{EditorView, ExtensionConfig, ViewError, ViewPlugin, ViewUpdate};

#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("offset {offset} is out of bounds for buffer of length {len}")]
    OutOfBounds { offset: usize, len: usize },
    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
    #[error("invalid range {start}..{end}")]
    InvalidRange { start: usize, end: usize },
    #[error("buffer is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}
