//! # Rendering Pipeline
//!
//! Markdown is rendered into a small owned element tree, post-processors
//! mutate each fragment in place, and the result is serialized to HTML.
//!
//! ## Modules
//!
//! - **`tree`**: `Node` and `Element`
//! - **`markdown`**: `markdown_to_fragment()` built on `pulldown-cmark` events
//! - **`html`**: `Element::to_html()` serialization

pub mod html;
pub mod markdown;
pub mod tree;

use std::path::PathBuf;

pub use markdown::{FRAGMENT_TAG, markdown_to_fragment};
pub use tree::{Element, Node};

/// Per-fragment information handed to post-processors.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Path of the document the fragment was rendered from, when known.
    pub source_path: Option<PathBuf>,
}

/// A hook invoked once per rendered fragment. Mutates the fragment in place.
pub trait PostProcessor {
    fn process(&self, root: &mut Element, ctx: &RenderContext);
}

/// Renders Markdown and runs the registered post-processors in order.
#[derive(Default)]
pub struct Renderer {
    post_processors: Vec<Box<dyn PostProcessor>>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, processor: impl PostProcessor + 'static) -> &mut Self {
        self.post_processors.push(Box::new(processor));
        self
    }

    pub fn render_fragment(&self, markdown: &str, ctx: &RenderContext) -> Element {
        let mut root = markdown_to_fragment(markdown);
        for processor in &self.post_processors {
            processor.process(&mut root, ctx);
        }
        root
    }

    /// Render to HTML, without the wrapping fragment element.
    pub fn render_html(&self, markdown: &str, ctx: &RenderContext) -> String {
        self.render_fragment(markdown, ctx).inner_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shout;

    impl PostProcessor for Shout {
        fn process(&self, root: &mut Element, _ctx: &RenderContext) {
            root.children.push(Element::new("p").with_text("!").into());
        }
    }

    #[test]
    fn test_renderer_without_processors() {
        let renderer = Renderer::new();
        assert_eq!(
            renderer.render_html("hello", &RenderContext::default()),
            "<p>hello</p>"
        );
    }

    #[test]
    fn test_processors_run_in_order() {
        let mut renderer = Renderer::new();
        renderer.register(Shout).register(Shout);

        assert_eq!(
            renderer.render_html("hello", &RenderContext::default()),
            "<p>hello</p><p>!</p><p>!</p>"
        );
    }
}
