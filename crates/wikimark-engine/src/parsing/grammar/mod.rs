//! # Grammars
//!
//! The segmenter and the inline scanner are shared by every markup flavor;
//! a [`Grammar`] supplies the flavor-specific answers (what a list marker
//! looks like, which fence syntax is active, which inline rules run and in
//! what order).

pub mod creole;
pub mod markdown;

use serde::{Deserialize, Serialize};

use super::blocks::kinds::{BlockQuote, FenceOpen, ListMarker, Table};
use super::inline::InlineRule;

pub use creole::Creole;
pub use markdown::Markdown;

/// Selects the markup grammar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    #[default]
    Creole,
    Markdown,
}

impl Flavor {
    pub fn grammar(self) -> &'static dyn Grammar {
        match self {
            Flavor::Creole => &Creole,
            Flavor::Markdown => &Markdown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Flavor::Creole => "creole",
            Flavor::Markdown => "markdown",
        }
    }
}

/// Flavor-specific block and inline rules.
///
/// Every recognizer is a pure function of a single line; the segmenter owns
/// all cross-line state.
pub trait Grammar: Send + Sync {
    fn flavor(&self) -> Flavor;

    /// Normalizes a raw source line before classification.
    fn prepare_line(&self, line: &str) -> String {
        line.to_string()
    }

    fn is_rule(&self, line: &str) -> bool;

    /// A single-line heading: `(level, text)`.
    fn heading(&self, line: &str) -> Option<(usize, String)>;

    /// An underline turning the preceding paragraph line into a heading.
    fn setext_level(&self, _line: &str) -> Option<usize> {
        None
    }

    fn fence_open(&self, line: &str) -> Option<FenceOpen>;

    /// Whether four-space indented lines form preformatted blocks.
    fn indented_code(&self) -> bool {
        false
    }

    fn is_table_row(&self, line: &str) -> bool {
        Table::is_row(line)
    }

    fn list_marker(&self, line: &str) -> Option<ListMarker>;

    /// Whether `marker` may start or continue a list given whether one is
    /// already open.
    fn opens_list(&self, marker: &ListMarker, in_list: bool) -> bool;

    /// Whether list levels come from indentation rather than marker count.
    fn nests_by_indent(&self) -> bool {
        false
    }

    fn quote_strip<'a>(&self, line: &'a str) -> Option<&'a str> {
        BlockQuote::strip_one(line)
    }

    fn html_block(&self, _line: &str) -> bool {
        false
    }

    /// Whether a non-blank line right after a quote line continues it.
    fn lazy_quotes(&self) -> bool {
        false
    }

    /// Whether a blank line between items keeps the list open.
    fn loose_lists(&self) -> bool {
        false
    }

    /// Whether a list marker line may interrupt an open paragraph.
    fn lists_interrupt_paragraphs(&self) -> bool {
        true
    }

    /// Whether `[id]: url` definition lines are collected before parsing.
    fn link_definitions(&self) -> bool {
        false
    }

    /// Character that makes the next character literal.
    fn escape_char(&self) -> char;

    /// Whether the escape character applies to `c`; otherwise the escape
    /// character is itself literal.
    fn is_escapable(&self, c: char) -> bool {
        !c.is_whitespace()
    }

    /// Emphasis markers only open before and close after non-whitespace.
    fn flanking_emphasis(&self) -> bool {
        false
    }

    /// Inline rules in precedence order.
    fn inline_rules(&self) -> &'static [InlineRule];

    /// The reduced rule set used inside link text.
    fn link_text_rules(&self) -> &'static [InlineRule];
}
