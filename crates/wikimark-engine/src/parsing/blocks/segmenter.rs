use log::{debug, trace};

use crate::parsing::grammar::Grammar;
use crate::parsing::refs::LinkReferenceTable;
use crate::parsing::source::{Span, lines_with_spans};
use crate::tree::ListKind;

use super::{
    classify::{LineClass, LineClassifier},
    kinds::{CodeFence, FenceKind, LinkDefinition, ListMarker},
    open::{BlockOpen, OpenContext, try_open},
    types::{BlockKind, BlockUnit},
};

/// Columns of indentation that make a Markdown code block.
const CODE_INDENT: usize = 4;

#[derive(Debug)]
enum LeafState {
    None,
    Paragraph {
        span: Span,
        lines: Vec<String>,
    },
    Fence {
        kind: FenceKind,
        info: Option<String>,
        span: Span,
        lines: Vec<String>,
    },
    Indented {
        span: Span,
        lines: Vec<String>,
    },
    Html {
        span: Span,
        lines: Vec<String>,
    },
    Quote {
        span: Span,
        lines: Vec<String>,
    },
    Item {
        kind: ListKind,
        level: usize,
        marker_len: usize,
        span: Span,
        lines: Vec<String>,
    },
    /// A later paragraph of a loose list item.
    ItemParagraph {
        level: usize,
        span: Span,
        lines: Vec<String>,
    },
}

/// The most recent list item: its level and marker indent.
#[derive(Debug, Clone, Copy)]
struct OpenItem {
    level: usize,
    indent: usize,
}

/// Line-oriented state machine that splits text into [`BlockUnit`]s.
///
/// Holds at most one open leaf (paragraph, fence, quote, list item...) plus
/// the list context needed to compute item levels.
///
/// Link definitions are taken out of the line stream here, so lines that a
/// fence, HTML block or indented code block swallows are never read as
/// definitions.
pub struct Segmenter<'g> {
    grammar: &'g dyn Grammar,
    classifier: LineClassifier<'g>,
    leaf: LeafState,
    /// A list item has been emitted and no list-closing line seen since.
    in_list: bool,
    last_item: Option<OpenItem>,
    /// Marker indents of the open list levels, for indent-nested grammars.
    indents: Vec<usize>,
    refs: LinkReferenceTable,
    /// A definition without a title, waiting to see if the next line has one.
    pending_def: Option<LinkDefinition>,
    out: Vec<BlockUnit>,
}

impl<'g> Segmenter<'g> {
    pub fn new(grammar: &'g dyn Grammar) -> Self {
        Self {
            grammar,
            classifier: LineClassifier::new(grammar),
            leaf: LeafState::None,
            in_list: false,
            last_item: None,
            indents: vec![],
            refs: LinkReferenceTable::new(),
            pending_def: None,
            out: vec![],
        }
    }

    /// Segments a whole text.
    pub fn run(self, text: &str) -> Vec<BlockUnit> {
        self.run_with_refs(text).0
    }

    /// Segments a whole text and returns the link definitions it held.
    pub fn run_with_refs(mut self, text: &str) -> (Vec<BlockUnit>, LinkReferenceTable) {
        for lr in lines_with_spans(text) {
            let c = self.classifier.classify(&lr);
            self.push(&c);
        }
        self.finish_with_refs()
    }

    pub fn push(&mut self, c: &LineClass) {
        if let Some(def) = self.pending_def.take() {
            let title = LinkDefinition::title_line(&c.text);
            let consumed = title.is_some();
            self.refs.insert(&def.id, def.url, title);
            if consumed {
                return;
            }
        }

        if self.consume_verbatim(c) || self.take_definition(c) {
            return;
        }

        if c.is_blank {
            self.flush_leaf();
            if !self.grammar.loose_lists() {
                self.close_list();
            }
            self.emit(BlockKind::Blank, vec![], 0, c.line);
            return;
        }

        if let LeafState::Paragraph { lines, .. } = &self.leaf
            && let Some(level) = self.grammar.setext_level(&c.text)
            && !lines.is_empty()
        {
            self.setext_heading(level, c.line);
            return;
        }

        if self.grammar.indented_code()
            && c.indent >= CODE_INDENT
            && !self.in_list
            && !matches!(self.leaf, LeafState::Paragraph { .. })
        {
            self.flush_leaf();
            self.leaf = LeafState::Indented {
                span: c.line,
                lines: vec![c.outdent(CODE_INDENT).to_string()],
            };
            return;
        }

        let ctx = OpenContext {
            paragraph_open: matches!(self.leaf, LeafState::Paragraph { .. }),
            in_list: self.in_list,
        };
        match try_open(self.grammar, &c.text, ctx) {
            Some(BlockOpen::ListItem(marker)) => {
                self.flush_leaf();
                self.open_item(marker, c.line);
            }
            Some(open) => {
                self.flush_leaf();
                self.close_list();
                self.open_leaf(open, c);
            }
            None => self.extend_text(c),
        }
    }

    pub fn finish(self) -> Vec<BlockUnit> {
        self.finish_with_refs().0
    }

    pub fn finish_with_refs(mut self) -> (Vec<BlockUnit>, LinkReferenceTable) {
        // EOF flush
        if matches!(self.leaf, LeafState::Fence { .. }) {
            debug!("unterminated preformatted block closed at end of input");
        }
        self.flush_leaf();
        if let Some(def) = self.pending_def.take() {
            self.refs.insert(&def.id, def.url, None);
        }
        (self.out, self.refs)
    }

    /// Records a `[id]: url` line in the reference table. Paragraphs and
    /// list items stay open around it; other leaves end.
    fn take_definition(&mut self, c: &LineClass) -> bool {
        if !self.grammar.link_definitions() {
            return false;
        }
        let Some(def) = LinkDefinition::parse(&c.text) else {
            return false;
        };
        if !matches!(
            self.leaf,
            LeafState::None | LeafState::Paragraph { .. } | LeafState::Item { .. }
        ) {
            self.flush_leaf();
        }
        trace!("link definition [{}]", def.id);
        if def.title.is_some() {
            self.refs.insert(&def.id, def.url, def.title);
        } else {
            self.pending_def = Some(def);
        }
        true
    }

    /// Feeds lines to leaves that swallow them regardless of block openers.
    /// Returns true when the line was consumed.
    fn consume_verbatim(&mut self, c: &LineClass) -> bool {
        match &mut self.leaf {
            LeafState::Fence {
                kind,
                info,
                span,
                lines,
            } => {
                *span = span.cover(c.line);
                if CodeFence::closes(*kind, &c.text) {
                    self.flush_leaf();
                    return true;
                }
                if *kind == FenceKind::Braces
                    && lines.is_empty()
                    && info.is_none()
                    && let Some(lang) = CodeFence::kind_line(&c.text)
                {
                    *info = Some(lang).filter(|l| !l.is_empty());
                    return true;
                }
                lines.push(CodeFence::unescape(*kind, &c.text));
                true
            }
            LeafState::Html { span, lines } => {
                if c.is_blank {
                    return false;
                }
                *span = span.cover(c.line);
                lines.push(c.text.clone());
                true
            }
            LeafState::Indented { span, lines } => {
                if c.is_blank {
                    lines.push(String::new());
                    return true;
                }
                if c.indent >= CODE_INDENT {
                    *span = span.cover(c.line);
                    lines.push(c.outdent(CODE_INDENT).to_string());
                    return true;
                }
                false
            }
            LeafState::Quote { span, lines } => {
                if let Some(inner) = self.grammar.quote_strip(&c.text) {
                    *span = span.cover(c.line);
                    lines.push(inner.to_string());
                    return true;
                }
                let last_blank = lines.last().is_none_or(|l| l.trim().is_empty());
                if self.grammar.lazy_quotes() && !c.is_blank && !last_blank {
                    *span = span.cover(c.line);
                    lines.push(c.text.clone());
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    fn open_leaf(&mut self, open: BlockOpen, c: &LineClass) {
        match open {
            BlockOpen::Rule => self.emit(BlockKind::Rule, vec![], c.text.len(), c.line),
            BlockOpen::Heading { level, text } => {
                let marker_len = c.text.len() - c.text.trim_start().len();
                self.emit(BlockKind::Heading { level }, vec![text], marker_len, c.line);
            }
            BlockOpen::Fence(fence) => {
                self.leaf = LeafState::Fence {
                    kind: fence.kind,
                    info: fence.info,
                    span: c.line,
                    lines: vec![],
                };
            }
            BlockOpen::TableRow => {
                self.emit(BlockKind::TableRow, vec![c.text.clone()], 0, c.line);
            }
            BlockOpen::Quote(inner) => {
                self.leaf = LeafState::Quote {
                    span: c.line,
                    lines: vec![inner],
                };
            }
            BlockOpen::Html => {
                self.leaf = LeafState::Html {
                    span: c.line,
                    lines: vec![c.text.clone()],
                };
            }
            BlockOpen::ListItem(marker) => self.open_item(marker, c.line),
        }
    }

    fn open_item(&mut self, marker: ListMarker, line: Span) {
        if !self.in_list {
            self.indents.clear();
        }
        let level = if self.grammar.nests_by_indent() {
            self.indent_level(marker.indent)
        } else {
            marker.depth
        };
        trace!("list item level {level} ({:?})", marker.kind);
        self.in_list = true;
        self.last_item = Some(OpenItem {
            level,
            indent: marker.indent,
        });
        self.leaf = LeafState::Item {
            kind: marker.kind,
            level,
            marker_len: marker.marker_len,
            span: line,
            lines: vec![marker.text],
        };
    }

    /// Maps a marker indent to a nesting level using the stack of open
    /// list indents: shallower indents close levels, deeper ones open one.
    fn indent_level(&mut self, indent: usize) -> usize {
        while self.indents.last().is_some_and(|top| indent < *top) {
            self.indents.pop();
        }
        if self.indents.last() != Some(&indent) {
            self.indents.push(indent);
        }
        self.indents.len()
    }

    fn extend_text(&mut self, c: &LineClass) {
        match &mut self.leaf {
            LeafState::Item { span, lines, .. } if c.indent > 0 => {
                *span = span.cover(c.line);
                lines.push(c.text.trim().to_string());
            }
            LeafState::Paragraph { span, lines }
            | LeafState::ItemParagraph { span, lines, .. } => {
                *span = span.cover(c.line);
                lines.push(c.text.trim_start().to_string());
            }
            _ => {
                let item_level = self.loose_item_level(c);
                self.flush_leaf();
                let lines = vec![c.text.trim_start().to_string()];
                self.leaf = match item_level {
                    Some(level) => LeafState::ItemParagraph {
                        level,
                        span: c.line,
                        lines,
                    },
                    None => {
                        self.close_list();
                        LeafState::Paragraph {
                            span: c.line,
                            lines,
                        }
                    }
                };
            }
        }
    }

    /// In loose-list grammars, a line after a blank that is indented past
    /// the last item's marker starts another paragraph of that item.
    fn loose_item_level(&self, c: &LineClass) -> Option<usize> {
        if !self.grammar.loose_lists()
            || !self.in_list
            || !matches!(self.leaf, LeafState::None)
        {
            return None;
        }
        self.last_item
            .filter(|item| c.indent > item.indent)
            .map(|item| item.level)
    }

    /// Turns the last paragraph line into a heading; earlier lines stay a
    /// paragraph of their own.
    fn setext_heading(&mut self, level: usize, underline: Span) {
        let prev = std::mem::replace(&mut self.leaf, LeafState::None);
        if let LeafState::Paragraph { span, mut lines } = prev {
            let title = lines.pop().unwrap_or_default();
            if !lines.is_empty() {
                self.emit(BlockKind::Paragraph, lines, 0, span);
            }
            self.emit(
                BlockKind::Heading { level },
                vec![title.trim().to_string()],
                0,
                span.cover(underline),
            );
        }
    }

    fn close_list(&mut self) {
        if self.in_list {
            trace!("list context closed");
        }
        self.in_list = false;
        self.last_item = None;
        self.indents.clear();
    }

    fn flush_leaf(&mut self) {
        let prev = std::mem::replace(&mut self.leaf, LeafState::None);
        match prev {
            LeafState::None => {}
            LeafState::Paragraph { span, lines } => {
                self.emit(BlockKind::Paragraph, lines, 0, span);
            }
            LeafState::Fence {
                info, span, lines, ..
            } => {
                self.emit(BlockKind::Preformatted { info }, lines, 0, span);
            }
            LeafState::Indented { span, mut lines } => {
                while lines.last().is_some_and(|l| l.trim().is_empty()) {
                    lines.pop();
                }
                self.emit(BlockKind::Preformatted { info: None }, lines, 0, span);
            }
            LeafState::Html { span, lines } => self.emit(BlockKind::Html, lines, 0, span),
            LeafState::Quote { span, lines } => {
                let (children, refs) =
                    Segmenter::new(self.grammar).run_with_refs(&lines.join("\n"));
                self.refs.merge(refs);
                self.emit(BlockKind::Quote { children }, lines, 0, span);
            }
            LeafState::Item {
                kind,
                level,
                marker_len,
                span,
                lines,
            } => self.emit(BlockKind::ListItem { kind, level }, lines, marker_len, span),
            LeafState::ItemParagraph { level, span, lines } => {
                self.emit(BlockKind::ItemParagraph { level }, lines, 0, span);
            }
        }
    }

    fn emit(&mut self, kind: BlockKind, lines: Vec<String>, marker_len: usize, span: Span) {
        self.out.push(BlockUnit::new(kind, lines, marker_len, span));
    }
}
