use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// The kind of a document tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocKind {
    Document,
    Section,
    Paragraph,
    Header,
    List(ListKind),
    ListItem,
    Table,
    TableRow,
    TableCell,
    TableHead,
    Preformatted,
    Blockquote,
    Separator,
    Link,
    Image,
    Macro,
    Code,
    Emphasis,
    Strong,
    Break,
    Text,
    /// Raw HTML passed through from the source.
    Html,
}

impl DocKind {
    /// Kinds that take block-level siblings: new paragraphs, lists and
    /// tables open directly under the nearest one of these.
    pub fn is_absorbing(self) -> bool {
        matches!(self, DocKind::Document | DocKind::Section | DocKind::Blockquote)
    }

    pub fn is_inline(self) -> bool {
        matches!(
            self,
            DocKind::Link
                | DocKind::Image
                | DocKind::Macro
                | DocKind::Code
                | DocKind::Emphasis
                | DocKind::Strong
                | DocKind::Break
                | DocKind::Text
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            DocKind::Document => "document",
            DocKind::Section => "section",
            DocKind::Paragraph => "paragraph",
            DocKind::Header => "header",
            DocKind::List(ListKind::Ordered) => "list(ordered)",
            DocKind::List(ListKind::Unordered) => "list(unordered)",
            DocKind::ListItem => "list_item",
            DocKind::Table => "table",
            DocKind::TableRow => "table_row",
            DocKind::TableCell => "table_cell",
            DocKind::TableHead => "table_head",
            DocKind::Preformatted => "preformatted",
            DocKind::Blockquote => "blockquote",
            DocKind::Separator => "separator",
            DocKind::Link => "link",
            DocKind::Image => "image",
            DocKind::Macro => "macro",
            DocKind::Code => "code",
            DocKind::Emphasis => "emphasis",
            DocKind::Strong => "strong",
            DocKind::Break => "break",
            DocKind::Text => "text",
            DocKind::Html => "html",
        }
    }
}

/// A node in the parsed document tree.
///
/// The tree is single-owner: children are owned in document order and
/// there are no parent links once building is finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocNode {
    pub kind: DocKind,
    /// Raw text for `text`/`code`/`preformatted`/`html`, the target URL for
    /// `link`/`image`, the macro name for `macro`, the plain title for
    /// `header`.
    pub content: String,
    /// Heading level, or list nesting depth (1-based).
    pub level: usize,
    /// Macro arguments, or the language tag of a preformatted block.
    pub args: Option<String>,
    /// Link or image title.
    pub title: Option<String>,
    pub children: Vec<DocNode>,
}

impl DocNode {
    pub fn new(kind: DocKind) -> Self {
        Self {
            kind,
            content: String::new(),
            level: 0,
            args: None,
            title: None,
            children: vec![],
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(DocKind::Text).with_content(content)
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    pub fn push(&mut self, child: DocNode) {
        self.children.push(child);
    }

    /// Concatenated text of all `text` and `code` descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self.kind {
            DocKind::Text | DocKind::Code => out.push_str(&self.content),
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Depth-first, document-order iterator over this node and its
    /// descendants.
    pub fn descendants(&self) -> impl Iterator<Item = &DocNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// All descendants (including self) of the given kind.
    pub fn find_all(&self, kind: DocKind) -> Vec<&DocNode> {
        self.descendants().filter(|n| n.kind == kind).collect()
    }

    /// Renders the tree as an indented outline, one node per line.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(0, &mut out);
        out
    }

    fn write_outline(&self, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(self.kind.name());
        if self.level > 0 {
            out.push_str(&format!(" level={}", self.level));
        }
        if let Some(args) = &self.args {
            out.push_str(&format!(" args={args:?}"));
        }
        if let Some(title) = &self.title {
            out.push_str(&format!(" title={title:?}"));
        }
        if !self.content.is_empty() {
            out.push_str(&format!(" {:?}", self.content));
        }
        out.push('\n');
        for child in &self.children {
            child.write_outline(depth + 1, out);
        }
    }
}
