use html_escape::{encode_double_quoted_attribute, encode_text};
use log::debug;

use crate::macros::{Dispatch, MacroCall, MacroRegistry, Placeholder};
use crate::tree::{DocKind, DocNode, ListKind};

/// Renders `doc` to an HTML fragment, running every macro through
/// `macros`.
pub fn render_html(doc: &DocNode, macros: &MacroRegistry) -> String {
    let mut renderer = HtmlRenderer::new(macros);
    renderer.render(doc);
    renderer.finish()
}

/// Stateful HTML writer. Block elements are separated by newlines;
/// inline content is written as-is.
pub struct HtmlRenderer<'m> {
    macros: &'m MacroRegistry,
    out: String,
    macro_count: usize,
    macro_failures: usize,
}

impl<'m> HtmlRenderer<'m> {
    pub fn new(macros: &'m MacroRegistry) -> Self {
        Self {
            macros,
            out: String::new(),
            macro_count: 0,
            macro_failures: 0,
        }
    }

    /// Number of macro placeholders written so far.
    pub fn macro_count(&self) -> usize {
        self.macro_count
    }

    pub fn render(&mut self, node: &DocNode) {
        match node.kind {
            DocKind::Document => self.blocks(&node.children),
            DocKind::Section => self.container("section", node),
            DocKind::Blockquote => self.container("blockquote", node),
            DocKind::List(kind) => self.container(list_tag(kind), node),
            DocKind::Table => self.container("table", node),
            DocKind::Paragraph => self.element("p", node),
            DocKind::Header => {
                let tag = format!("h{}", node.level.clamp(1, 6));
                self.element(&tag, node);
            }
            DocKind::ListItem => self.list_item(node),
            DocKind::TableRow => self.element("tr", node),
            DocKind::TableCell => self.element("td", node),
            DocKind::TableHead => self.element("th", node),
            DocKind::Preformatted => {
                match &node.args {
                    Some(lang) => self.out.push_str(&format!(
                        "<pre><code class=\"lang-{}\">",
                        encode_double_quoted_attribute(lang)
                    )),
                    None => self.out.push_str("<pre><code>"),
                }
                self.out.push_str(&encode_text(&node.content));
                self.out.push_str("</code></pre>");
            }
            DocKind::Separator => self.out.push_str("<hr />"),
            DocKind::Html => self.out.push_str(&node.content),
            DocKind::Text => self.out.push_str(&encode_text(&node.content)),
            DocKind::Code => {
                self.out.push_str("<code>");
                self.out.push_str(&encode_text(&node.content));
                self.out.push_str("</code>");
            }
            DocKind::Strong => self.element("strong", node),
            DocKind::Emphasis => self.element("em", node),
            DocKind::Break => self.out.push_str("<br />"),
            DocKind::Link => self.link(node),
            DocKind::Image => self.image(node),
            DocKind::Macro => self.macro_placeholder(node),
        }
    }

    pub fn finish(self) -> String {
        if self.macro_count > 0 {
            debug!(
                "rendered {} macro(s), {} failed",
                self.macro_count, self.macro_failures
            );
        }
        self.out
    }

    fn blocks(&mut self, nodes: &[DocNode]) {
        for (i, child) in nodes.iter().enumerate() {
            if i > 0 {
                self.out.push('\n');
            }
            self.render(child);
        }
    }

    fn container(&mut self, tag: &str, node: &DocNode) {
        self.out.push_str(&format!("<{tag}>\n"));
        self.blocks(&node.children);
        self.out.push_str(&format!("\n</{tag}>"));
    }

    fn element(&mut self, tag: &str, node: &DocNode) {
        self.out.push_str(&format!("<{tag}>"));
        for child in &node.children {
            self.render(child);
        }
        self.out.push_str(&format!("</{tag}>"));
    }

    /// Inline content first, nested lists each on a line of their own.
    fn list_item(&mut self, node: &DocNode) {
        self.out.push_str("<li>");
        for child in &node.children {
            if matches!(child.kind, DocKind::List(_)) {
                self.out.push('\n');
            }
            self.render(child);
        }
        self.out.push_str("</li>");
    }

    fn link(&mut self, node: &DocNode) {
        self.out.push_str(&format!(
            "<a href=\"{}\"",
            encode_double_quoted_attribute(&node.content)
        ));
        self.title_attr(node);
        self.out.push('>');
        for child in &node.children {
            self.render(child);
        }
        self.out.push_str("</a>");
    }

    fn image(&mut self, node: &DocNode) {
        self.out.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\"",
            encode_double_quoted_attribute(&node.content),
            encode_double_quoted_attribute(&node.text_content())
        ));
        self.title_attr(node);
        self.out.push_str(" />");
    }

    fn title_attr(&mut self, node: &DocNode) {
        if let Some(title) = &node.title {
            self.out.push_str(&format!(
                " title=\"{}\"",
                encode_double_quoted_attribute(title)
            ));
        }
    }

    fn macro_placeholder(&mut self, node: &DocNode) {
        let text = node.text_content();
        let call = MacroCall {
            name: &node.content,
            args: node.args.as_deref(),
            text: &text,
        };
        let mut placeholder = Placeholder::new(format!("macro-{}", self.macro_count));
        self.macro_count += 1;
        if self.macros.dispatch(&mut placeholder, &call) != Dispatch::Ran {
            self.macro_failures += 1;
        }

        let mut classes = vec!["macro"];
        classes.extend(placeholder.classes.iter().map(String::as_str));
        self.out.push_str(&format!(
            "<span class=\"{}\" id=\"{}\" data-macro=\"{}\">{}</span>",
            classes.join(" "),
            encode_double_quoted_attribute(&placeholder.id),
            encode_double_quoted_attribute(&node.content),
            placeholder.html
        ));
    }
}

fn list_tag(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Ordered => "ol",
        ListKind::Unordered => "ul",
    }
}
