use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::tree::{Element, Node};

/// Tag of the root element produced by [`markdown_to_fragment`].
pub const FRAGMENT_TAG: &str = "div";

/// Render Markdown into an element tree rooted at a `div`.
///
/// Adjacent text events are merged, so markup that the parser happens to emit
/// in pieces (escapes, entity boundaries) ends up in a single text node.
pub fn markdown_to_fragment(markdown: &str) -> Element {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(markdown, options) {
        builder.event(event);
    }
    builder.finish()
}

struct TreeBuilder {
    stack: Vec<Element>,
    in_table_head: bool,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Element::new(FRAGMENT_TAG)],
            in_table_head: false,
        }
    }

    fn top(&mut self) -> &mut Element {
        // The root is never popped before `finish`.
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.top().push_text(text.as_ref()),
            Event::Code(code) => {
                let code = Element::new("code").with_text(code.as_ref());
                self.top().children.push(code.into());
            }
            Event::InlineMath(math) => {
                let math = Element::new("span")
                    .with_class("math math-inline")
                    .with_text(math.as_ref());
                self.top().children.push(math.into());
            }
            Event::DisplayMath(math) => {
                let math = Element::new("span")
                    .with_class("math math-display")
                    .with_text(math.as_ref());
                self.top().children.push(math.into());
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                self.top().children.push(Node::Raw(html.to_string()));
            }
            Event::FootnoteReference(name) => {
                let reference = Element::new("sup")
                    .with_class("footnote-reference")
                    .with_text(name.as_ref());
                self.top().children.push(reference.into());
            }
            Event::SoftBreak => self.top().push_text("\n"),
            Event::HardBreak => self.top().children.push(Element::new("br").into()),
            Event::Rule => self.top().children.push(Element::new("hr").into()),
            Event::TaskListMarker(checked) => {
                let mut input = Element::new("input")
                    .with_attr("type", "checkbox")
                    .with_attr("disabled", "");
                if checked {
                    input = input.with_attr("checked", "");
                }
                self.top().children.push(input.into());
            }
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let el = match tag {
            Tag::Paragraph => Element::new("p"),
            Tag::Heading {
                level, id, classes, ..
            } => {
                let mut el = Element::new(heading_tag(level));
                if let Some(id) = id {
                    el = el.with_attr("id", id.as_ref());
                }
                if !classes.is_empty() {
                    let classes: Vec<&str> = classes.iter().map(|c| c.as_ref()).collect();
                    el = el.with_class(classes.join(" "));
                }
                el
            }
            Tag::BlockQuote(_) => Element::new("blockquote"),
            Tag::CodeBlock(kind) => {
                self.stack.push(Element::new("pre"));
                let code = Element::new("code");
                match kind {
                    CodeBlockKind::Fenced(info) => match info.split_whitespace().next() {
                        Some(lang) => code.with_class(format!("language-{lang}")),
                        None => code,
                    },
                    CodeBlockKind::Indented => code,
                }
            }
            Tag::List(Some(start)) => {
                let el = Element::new("ol");
                if start == 1 {
                    el
                } else {
                    el.with_attr("start", start.to_string())
                }
            }
            Tag::List(None) => Element::new("ul"),
            Tag::Item => Element::new("li"),
            Tag::Table(_) => Element::new("table"),
            Tag::TableHead => {
                self.in_table_head = true;
                self.stack.push(Element::new("thead"));
                Element::new("tr")
            }
            Tag::TableRow => Element::new("tr"),
            Tag::TableCell => Element::new(if self.in_table_head { "th" } else { "td" }),
            Tag::Emphasis => Element::new("em"),
            Tag::Strong => Element::new("strong"),
            Tag::Strikethrough => Element::new("del"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let el = Element::new("a").with_attr("href", dest_url.as_ref());
                if title.is_empty() {
                    el
                } else {
                    el.with_attr("title", title.as_ref())
                }
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let el = Element::new("img").with_attr("src", dest_url.as_ref());
                if title.is_empty() {
                    el
                } else {
                    el.with_attr("title", title.as_ref())
                }
            }
            Tag::FootnoteDefinition(name) => Element::new("div")
                .with_class("footnote-definition")
                .with_attr("id", name.as_ref()),
            // Contents arrive as `Event::Html` and are spliced into the parent on close.
            Tag::HtmlBlock | Tag::MetadataBlock(_) => Element::new(""),
            _ => Element::new("span"),
        };
        self.stack.push(el);
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::CodeBlock => {
                self.close(); // code
                self.close(); // pre
            }
            TagEnd::TableHead => {
                self.close(); // tr
                self.close(); // thead
                self.in_table_head = false;
            }
            TagEnd::Image => {
                if let Some(img) = self.stack.last_mut() {
                    let alt = img.text_content();
                    img.children.clear();
                    img.attrs.push(("alt".to_string(), alt));
                }
                self.close();
            }
            _ => self.close(),
        }
    }

    fn close(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        let Some(el) = self.stack.pop() else {
            return;
        };
        let parent = self.top();
        if el.tag.is_empty() {
            parent.children.extend(el.children);
        } else {
            parent.children.push(el.into());
        }
    }

    fn finish(mut self) -> Element {
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack.swap_remove(0)
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_paragraph_text_is_one_node() {
        let root = markdown_to_fragment("今日は{日本語|に|ほん|ご}です");

        assert_eq!(
            root,
            Element::new("div").with_child(
                Element::new("p").with_text("今日は{日本語|に|ほん|ご}です")
            )
        );
    }

    #[test]
    fn test_escaped_pipe_merges_into_single_text() {
        let root = markdown_to_fragment(r"{日本|に\|ほん}");
        let p = root.find(&|el| el.tag == "p").unwrap();

        assert_eq!(p.children, vec![Node::Text("{日本|に|ほん}".to_string())]);
    }

    #[test]
    fn test_code_block_is_pre_code() {
        let root = markdown_to_fragment("```rust\nlet x = 1;\n```\n");

        assert_eq!(
            root.to_html(),
            "<div><pre><code class=\"language-rust\">let x = 1;\n</code></pre></div>"
        );
    }

    #[test]
    fn test_headings_lists_and_inline() {
        let root = markdown_to_fragment("# Title\n\n- one `two`\n- *three*\n");

        assert_eq!(
            root.to_html(),
            "<div><h1>Title</h1><ul><li>one <code>two</code></li><li><em>three</em></li></ul></div>"
        );
    }

    #[test]
    fn test_table_head_and_body() {
        let root = markdown_to_fragment("| a | b |\n|---|---|\n| c | d |\n");

        assert_eq!(
            root.to_html(),
            "<div><table><thead><tr><th>a</th><th>b</th></tr></thead><tr><td>c</td><td>d</td></tr></table></div>"
        );
    }

    #[test]
    fn test_html_block_is_raw() {
        let root = markdown_to_fragment("<div>{日|ひ}</div>\n");

        assert!(matches!(root.children.first(), Some(Node::Raw(_))));
        assert_eq!(root.inner_html(), "<div>{日|ひ}</div>\n");
    }

    #[test]
    fn test_image_alt_from_text() {
        let root = markdown_to_fragment("![a cat](cat.png)");
        let img = root.find(&|el| el.tag == "img").unwrap();

        assert_eq!(img.attr("src"), Some("cat.png"));
        assert_eq!(img.attr("alt"), Some("a cat"));
        assert!(img.children.is_empty());
    }
}
