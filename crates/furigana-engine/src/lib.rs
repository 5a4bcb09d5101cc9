pub mod annotate;
pub mod editing;
pub mod markup;
pub mod overlay;
pub mod render;

// Re-export key types for easier usage
pub use annotate::{RUBY_CLASS, StaticAnnotator, ruby_element};
pub use editing::{
    Cmd, EditError, EditorState, EditorView, ExtensionConfig, ViewError, ViewPlugin, ViewUpdate,
};
pub use markup::{AnnotationUnit, BaseCharset, MarkupMatch, Matcher, MatcherError};
pub use overlay::{
    DecorationError, DecorationSet, FuriganaOverlay, LineSegment, OverlayRecord, SelectionRange,
    build_decorations, layout_line,
};
pub use render::{Element, Node, PostProcessor, RenderContext, Renderer};
