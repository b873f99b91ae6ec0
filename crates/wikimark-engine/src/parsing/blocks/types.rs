use crate::parsing::source::Span;
use crate::tree::ListKind;

/// The kind of a block unit emitted by the segmenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// A blank-line separator.
    Blank,
    /// A horizontal rule.
    Rule,
    Heading {
        level: usize,
    },
    /// A fenced or indented verbatim block. `info` is the language tag from
    /// a fence info string or a Creole `#!kind` line.
    Preformatted {
        info: Option<String>,
    },
    /// One `|`-delimited table line.
    TableRow,
    ListItem {
        kind: ListKind,
        /// Nesting level, 1 for top-level items.
        level: usize,
    },
    /// A blockquote with its recursively segmented content.
    Quote {
        children: Vec<BlockUnit>,
    },
    Paragraph,
    /// A further paragraph of the list item at `level`, after a blank line.
    ItemParagraph {
        level: usize,
    },
    /// A raw HTML block, passed through verbatim.
    Html,
}

/// An ordered block-level unit of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockUnit {
    pub kind: BlockKind,
    /// Raw lines with the block marker stripped (heading text, item text,
    /// verbatim content). Quote units keep their stripped lines here too.
    pub lines: Vec<String>,
    /// Bytes of marker stripped from the first line.
    pub marker_len: usize,
    /// Byte span of the source lines, relative to the text that was segmented.
    pub span: Span,
}

impl BlockUnit {
    pub fn new(kind: BlockKind, lines: Vec<String>, marker_len: usize, span: Span) -> Self {
        Self {
            kind,
            lines,
            marker_len,
            span,
        }
    }

    /// The unit's lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}
