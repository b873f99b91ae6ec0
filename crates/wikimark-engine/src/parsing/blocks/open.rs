use crate::parsing::grammar::Grammar;

use super::kinds::{FenceOpen, ListMarker};

/// A block opener recognized on a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOpen {
    Rule,
    Heading { level: usize, text: String },
    Fence(FenceOpen),
    TableRow,
    ListItem(ListMarker),
    /// A quote line with one level of quoting stripped.
    Quote(String),
    Html,
}

/// Context the segmenter passes to the opener dispatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenContext {
    pub paragraph_open: bool,
    pub in_list: bool,
}

/// Tries block openers in priority order: rule, heading, fence, table row,
/// list item, blockquote, raw HTML. First match wins.
pub fn try_open(grammar: &dyn Grammar, line: &str, ctx: OpenContext) -> Option<BlockOpen> {
    if grammar.is_rule(line) {
        return Some(BlockOpen::Rule);
    }
    if let Some((level, text)) = grammar.heading(line) {
        return Some(BlockOpen::Heading { level, text });
    }
    if let Some(fence) = grammar.fence_open(line) {
        return Some(BlockOpen::Fence(fence));
    }
    if grammar.is_table_row(line) {
        return Some(BlockOpen::TableRow);
    }
    if let Some(marker) = grammar.list_marker(line) {
        let interrupts =
            !ctx.paragraph_open || ctx.in_list || grammar.lists_interrupt_paragraphs();
        if interrupts && grammar.opens_list(&marker, ctx.in_list) {
            return Some(BlockOpen::ListItem(marker));
        }
    }
    if let Some(inner) = grammar.quote_strip(line) {
        return Some(BlockOpen::Quote(inner.to_string()));
    }
    if grammar.html_block(line) {
        return Some(BlockOpen::Html);
    }
    None
}
