//! # Static Annotation
//!
//! Post-processing pass over a rendered fragment: every text node under a
//! block element (paragraphs, headings, lists, tables) is scanned for
//! furigana markup and each valid match is replaced by a ruby element.
//!
//! Code and existing ruby elements are never descended into, which keeps
//! code samples literal and makes the pass idempotent.

use crate::markup::{AnnotationUnit, Matcher};
use crate::render::{Element, Node, PostProcessor, RenderContext};

/// Class carried by every ruby element this crate produces.
pub const RUBY_CLASS: &str = "furi";

pub const DEFAULT_BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "ol", "ul", "table",
];
pub const DEFAULT_SKIP_TAGS: &[&str] = &["code", "pre", "ruby"];

/// Build `<ruby class="furi">B<rt>r</rt>...</ruby>` for validated units.
pub fn ruby_element(units: &[AnnotationUnit]) -> Element {
    let mut ruby = Element::new("ruby").with_class(RUBY_CLASS);
    for unit in units {
        ruby.push_text(unit.base.as_str());
        ruby.children
            .push(Element::new("rt").with_text(unit.reading.as_str()).into());
    }
    ruby
}

pub struct StaticAnnotator {
    matcher: Matcher,
    block_tags: Vec<String>,
    skip_tags: Vec<String>,
}

impl Default for StaticAnnotator {
    fn default() -> Self {
        Self::new(Matcher::default())
    }
}

impl StaticAnnotator {
    pub fn new(matcher: Matcher) -> Self {
        Self {
            matcher,
            block_tags: DEFAULT_BLOCK_TAGS.iter().map(|t| t.to_string()).collect(),
            skip_tags: DEFAULT_SKIP_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn with_block_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.block_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    fn is_block(&self, el: &Element) -> bool {
        self.block_tags.iter().any(|t| *t == el.tag)
    }

    fn is_skipped(&self, el: &Element) -> bool {
        self.skip_tags.iter().any(|t| *t == el.tag)
    }

    /// Annotate all block elements under `root`. No-op when there are none.
    pub fn annotate(&self, root: &mut Element) {
        if root.find(&|el| self.is_block(el)).is_none() {
            return;
        }
        self.annotate_blocks(root);
    }

    /// Finds outermost block elements; nested blocks are covered by their ancestor.
    fn annotate_blocks(&self, el: &mut Element) {
        if self.is_block(el) {
            self.annotate_children(el);
            return;
        }
        if self.is_skipped(el) {
            return;
        }
        for child in &mut el.children {
            if let Node::Element(child) = child {
                self.annotate_blocks(child);
            }
        }
    }

    fn annotate_children(&self, el: &mut Element) {
        let mut i = 0;
        while i < el.children.len() {
            let replacement = match &mut el.children[i] {
                Node::Text(text) => self.split_text(text),
                Node::Element(child) => {
                    if !self.is_skipped(child) {
                        self.annotate_children(child);
                    }
                    None
                }
                Node::Raw(_) => None,
            };

            match replacement {
                Some(nodes) => {
                    let len = nodes.len();
                    el.children.splice(i..=i, nodes);
                    i += len;
                }
                None => i += 1,
            }
        }
    }

    /// Cut `text` into alternating literal and ruby nodes.
    ///
    /// Returns `None` when no valid markup is present, so the caller leaves
    /// the original node untouched. Invalid matches stay in the literal text.
    pub fn split_text(&self, text: &str) -> Option<Vec<Node>> {
        if !Matcher::has_candidate(text) {
            return None;
        }

        let mut nodes = Vec::new();
        let mut cursor = 0;
        for found in self.matcher.find_matches(text) {
            let Some(units) = found.validate() else {
                continue;
            };
            let range = found.range();
            if range.start > cursor {
                nodes.push(Node::Text(text[cursor..range.start].to_string()));
            }
            log::trace!("annotating {:?} at {}", found.full_text, range.start);
            nodes.push(ruby_element(&units).into());
            cursor = range.end;
        }

        if nodes.is_empty() {
            return None;
        }
        if cursor < text.len() {
            nodes.push(Node::Text(text[cursor..].to_string()));
        }
        Some(nodes)
    }
}

impl PostProcessor for StaticAnnotator {
    fn process(&self, root: &mut Element, _ctx: &RenderContext) {
        self.annotate(root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::markdown_to_fragment;
    use pretty_assertions::assert_eq;

    fn annotated_html(markdown: &str) -> String {
        let mut root = markdown_to_fragment(markdown);
        StaticAnnotator::default().annotate(&mut root);
        root.inner_html()
    }

    #[test]
    fn test_single_unit() {
        assert_eq!(
            annotated_html("{日|ひ}"),
            "<p><ruby class=\"furi\">日<rt>ひ</rt></ruby></p>"
        );
    }

    #[test]
    fn test_per_character_units() {
        assert_eq!(
            annotated_html("{日本語|に|ほん|ご}"),
            "<p><ruby class=\"furi\">日<rt>に</rt>本<rt>ほん</rt>語<rt>ご</rt></ruby></p>"
        );
    }

    #[test]
    fn test_whole_span_unit() {
        assert_eq!(
            annotated_html("{日本語|にほんご}"),
            "<p><ruby class=\"furi\">日本語<rt>にほんご</rt></ruby></p>"
        );
    }

    #[test]
    fn test_invalid_markup_left_literal() {
        assert_eq!(annotated_html("{日本|に|ほん|ご}"), "<p>{日本|に|ほん|ご}</p>");
    }

    #[test]
    fn test_multiple_matches_in_one_text_node() {
        assert_eq!(
            annotated_html("a{日|ひ}b{日本|に|ほん|ご}c{月|つき}d"),
            "<p>a<ruby class=\"furi\">日<rt>ひ</rt></ruby>b{日本|に|ほん|ご}c<ruby class=\"furi\">月<rt>つき</rt></ruby>d</p>"
        );
    }

    #[test]
    fn test_adjacent_matches() {
        let mut root = markdown_to_fragment("{日|ひ}{月|つき}");
        StaticAnnotator::default().annotate(&mut root);

        let p = root.find(&|el| el.tag == "p").unwrap();
        assert_eq!(p.children.len(), 2);
        assert!(p.children.iter().all(|n| matches!(n, Node::Element(e) if e.tag == "ruby")));
    }

    #[test]
    fn test_code_is_not_annotated() {
        assert_eq!(
            annotated_html("`{日|ひ}` {月|つき}"),
            "<p><code>{日|ひ}</code> <ruby class=\"furi\">月<rt>つき</rt></ruby></p>"
        );
        assert_eq!(
            annotated_html("```\n{日|ひ}\n```\n"),
            "<pre><code>{日|ひ}\n</code></pre>"
        );
    }

    #[test]
    fn test_nested_inline_elements() {
        assert_eq!(
            annotated_html("- **{日|ひ}**"),
            "<ul><li><strong><ruby class=\"furi\">日<rt>ひ</rt></ruby></strong></li></ul>"
        );
    }

    #[test]
    fn test_headings_and_tables() {
        assert_eq!(
            annotated_html("## {空|そら}"),
            "<h2><ruby class=\"furi\">空<rt>そら</rt></ruby></h2>"
        );
        assert_eq!(
            annotated_html("| a |\n|---|\n| {日本\\|に\\|ほん} |\n"),
            "<table><thead><tr><th>a</th></tr></thead><tr><td><ruby class=\"furi\">日<rt>に</rt>本<rt>ほん</rt></ruby></td></tr></table>"
        );
    }

    #[test]
    fn test_idempotent() {
        let mut root = markdown_to_fragment("x{日本語|に|ほん|ご}y {日本|に|ほん|ご}");
        let annotator = StaticAnnotator::default();

        annotator.annotate(&mut root);
        let once = root.clone();
        annotator.annotate(&mut root);

        assert_eq!(root, once);
    }

    #[test]
    fn test_no_markup_is_noop() {
        let markdown = "# Title\n\nplain *text* here\n\n- one\n- two\n";
        let mut root = markdown_to_fragment(markdown);
        let before = root.clone();

        StaticAnnotator::default().annotate(&mut root);

        assert_eq!(root, before);
    }

    #[test]
    fn test_no_block_tags_is_noop() {
        let mut root = Element::new("div").with_text("{日|ひ}");
        let before = root.clone();

        StaticAnnotator::default().annotate(&mut root);

        assert_eq!(root, before);
    }

    #[test]
    fn test_custom_block_tags() {
        let mut root = Element::new("div")
            .with_child(Element::new("p").with_text("{日|ひ}"))
            .with_child(Element::new("aside").with_text("{月|つき}"));

        StaticAnnotator::default()
            .with_block_tags(["aside"])
            .annotate(&mut root);

        assert_eq!(
            root.inner_html(),
            "<p>{日|ひ}</p><aside><ruby class=\"furi\">月<rt>つき</rt></ruby></aside>"
        );
    }

    #[test]
    fn test_split_text() {
        let annotator = StaticAnnotator::default();

        assert_eq!(annotator.split_text("plain"), None);
        assert_eq!(annotator.split_text("{日本|に|ほん|ご}"), None);
        assert_eq!(
            annotator.split_text("前{日|ひ}後"),
            Some(vec![
                Node::Text("前".to_string()),
                ruby_element(&[AnnotationUnit::new("日", "ひ")]).into(),
                Node::Text("後".to_string()),
            ])
        );
    }

    #[test]
    fn test_ruby_element() {
        let ruby = ruby_element(&[
            AnnotationUnit::new("日", "に"),
            AnnotationUnit::new("本", "ほん"),
        ]);
        assert!(ruby.has_class(RUBY_CLASS));
        assert_eq!(
            ruby.to_html(),
            "<ruby class=\"furi\">日<rt>に</rt>本<rt>ほん</rt></ruby>"
        );
    }
}
