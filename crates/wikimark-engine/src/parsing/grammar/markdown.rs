use crate::parsing::blocks::kinds::{
    CodeFence, FenceOpen, Heading, HtmlBlock, List, ListMarker, Rule,
};
use crate::parsing::inline::InlineRule;
use crate::parsing::source::expand_tabs;

use super::{Flavor, Grammar};

const INLINE: &[InlineRule] = &[
    InlineRule::BracketLink,
    InlineRule::AngleLink,
    InlineRule::RawUrl { escape: None },
    InlineRule::Macro,
    InlineRule::CodeSpan,
    InlineRule::BracketImage,
    InlineRule::Strong("**"),
    InlineRule::Strong("__"),
    InlineRule::Emphasis("*"),
    InlineRule::Emphasis("_"),
    InlineRule::TrailingSpaceBreak,
    InlineRule::Escape(Markdown::ESCAPE),
];

const LINK_TEXT: &[InlineRule] = &[
    InlineRule::CodeSpan,
    InlineRule::BracketImage,
    InlineRule::Strong("**"),
    InlineRule::Strong("__"),
    InlineRule::Emphasis("*"),
    InlineRule::Emphasis("_"),
    InlineRule::TrailingSpaceBreak,
    InlineRule::Escape(Markdown::ESCAPE),
];

/// Markdown as understood by the classic Perl/JS converters.
pub struct Markdown;

impl Markdown {
    pub const ESCAPE: char = '\\';
    /// Characters a backslash escapes; before anything else it is literal.
    pub const ESCAPABLE: &'static str = "\\`*_{}[]()#+-.!>|<";
    /// Deepest indent of a top-level list marker.
    pub const MAX_LIST_INDENT: usize = 3;
}

impl Grammar for Markdown {
    fn flavor(&self) -> Flavor {
        Flavor::Markdown
    }

    fn prepare_line(&self, line: &str) -> String {
        expand_tabs(line)
    }

    fn is_rule(&self, line: &str) -> bool {
        Rule::markdown(line)
    }

    fn heading(&self, line: &str) -> Option<(usize, String)> {
        Heading::atx(line)
    }

    fn setext_level(&self, line: &str) -> Option<usize> {
        Heading::setext(line)
    }

    fn fence_open(&self, line: &str) -> Option<FenceOpen> {
        CodeFence::open_fenced(line)
    }

    fn indented_code(&self) -> bool {
        true
    }

    fn list_marker(&self, line: &str) -> Option<ListMarker> {
        List::markdown(line)
    }

    fn opens_list(&self, marker: &ListMarker, in_list: bool) -> bool {
        in_list || marker.indent <= Self::MAX_LIST_INDENT
    }

    fn nests_by_indent(&self) -> bool {
        true
    }

    fn html_block(&self, line: &str) -> bool {
        HtmlBlock::opens(line)
    }

    fn lazy_quotes(&self) -> bool {
        true
    }

    fn loose_lists(&self) -> bool {
        true
    }

    fn lists_interrupt_paragraphs(&self) -> bool {
        false
    }

    fn link_definitions(&self) -> bool {
        true
    }

    fn escape_char(&self) -> char {
        Self::ESCAPE
    }

    fn is_escapable(&self, c: char) -> bool {
        Self::ESCAPABLE.contains(c)
    }

    fn flanking_emphasis(&self) -> bool {
        true
    }

    fn inline_rules(&self) -> &'static [InlineRule] {
        INLINE
    }

    fn link_text_rules(&self) -> &'static [InlineRule] {
        LINK_TEXT
    }
}
