use log::{debug, trace};

use crate::parsing::blocks::kinds::Table;
use crate::parsing::blocks::{BlockKind, BlockUnit};
use crate::parsing::inline::{InlineContext, scan_inline};

use super::node::{DocKind, DocNode, ListKind};

const ROOT: usize = 0;

/// A child slot of an arena node: either another arena node or a finished
/// inline subtree.
#[derive(Debug)]
enum Slot {
    Node(usize),
    Inline(DocNode),
}

#[derive(Debug)]
struct BuildNode {
    /// Payload; its `children` stay empty until `finish`.
    node: DocNode,
    parent: Option<usize>,
    children: Vec<Slot>,
}

#[derive(Debug, Clone, Copy)]
struct OpenList {
    kind: ListKind,
    level: usize,
    node: usize,
}

/// Assembles block units into a document tree.
///
/// Nodes live in an arena with parent indices while the tree is being
/// built; `current` is the insertion point. It is always an absorbing node
/// (`document`, `section`, `blockquote`), the last `list_item` of the
/// innermost open list, or the open `table`. [`TreeBuilder::finish`] closes
/// every open context, returns the insertion point to the root and hands
/// back an owned [`DocNode`] tree.
pub struct TreeBuilder<'c> {
    ctx: InlineContext<'c>,
    nodes: Vec<BuildNode>,
    current: usize,
    open_lists: Vec<OpenList>,
    sections: bool,
}

impl<'c> TreeBuilder<'c> {
    pub fn new(ctx: InlineContext<'c>, sections: bool) -> Self {
        Self {
            ctx,
            nodes: vec![BuildNode {
                node: DocNode::new(DocKind::Document),
                parent: None,
                children: vec![],
            }],
            current: ROOT,
            open_lists: vec![],
            sections,
        }
    }

    /// Kind of the node new content is attached to.
    pub fn insertion_point(&self) -> DocKind {
        self.kind(self.current)
    }

    pub fn push(&mut self, unit: &BlockUnit) {
        trace!("tree: {:?} under {}", unit.kind, self.insertion_point().name());
        match &unit.kind {
            BlockKind::Blank => {
                if !(self.ctx.grammar.loose_lists() && !self.open_lists.is_empty()) {
                    self.close_context();
                }
            }
            BlockKind::ListItem { kind, level } => self.push_item(*kind, *level, &unit.text()),
            BlockKind::ItemParagraph { level } => self.push_item_paragraph(*level, &unit.text()),
            BlockKind::TableRow => self.push_row(unit),
            BlockKind::Paragraph => {
                self.close_context();
                let para = self.add(self.current, DocNode::new(DocKind::Paragraph));
                self.scan_into(para, &unit.text());
            }
            BlockKind::Heading { level } => self.push_heading(*level, &unit.text()),
            BlockKind::Rule => {
                self.close_context();
                self.add(self.current, DocNode::new(DocKind::Separator));
            }
            BlockKind::Preformatted { info } => {
                self.close_context();
                let mut pre = DocNode::new(DocKind::Preformatted).with_content(unit.text());
                pre.args = info.clone();
                self.add(self.current, pre);
            }
            BlockKind::Html => {
                self.close_context();
                self.add(
                    self.current,
                    DocNode::new(DocKind::Html).with_content(unit.text()),
                );
            }
            BlockKind::Quote { children } => {
                self.close_context();
                let outer = self.current;
                self.current = self.add(outer, DocNode::new(DocKind::Blockquote));
                for child in children {
                    self.push(child);
                }
                self.close_context();
                self.current = outer;
            }
        }
    }

    /// Closes every open context and returns the finished tree.
    pub fn finish(mut self) -> DocNode {
        self.close_context();
        while self.current != ROOT {
            self.current = self.parent(self.current);
        }
        debug!("tree built with {} block node(s)", self.nodes.len() - 1);
        materialize(&mut self.nodes, ROOT)
    }

    fn push_item(&mut self, kind: ListKind, level: usize, text: &str) {
        while self.open_lists.last().is_some_and(|top| top.level > level) {
            self.open_lists.pop();
        }

        let list = match self.open_lists.last().copied() {
            Some(top) if top.level == level && top.kind == kind => top.node,
            Some(top) if top.level == level => {
                self.open_lists.pop();
                let parent = self.parent(top.node);
                self.open_list(parent, kind, level)
            }
            Some(top) => {
                let parent = self.last_item(top.node).unwrap_or(top.node);
                self.open_list(parent, kind, level)
            }
            None => {
                self.close_context();
                self.open_list(self.current, kind, level)
            }
        };

        let item = self.add(list, DocNode::new(DocKind::ListItem).with_level(level));
        self.scan_into(item, text);
        self.current = item;
    }

    /// Adds a paragraph to the last item at `level`. The item's own inline
    /// text moves into a leading paragraph first, so a loose item holds
    /// only paragraphs and nested lists.
    fn push_item_paragraph(&mut self, level: usize, text: &str) {
        while self.open_lists.last().is_some_and(|top| top.level > level) {
            self.open_lists.pop();
        }
        let Some(item) = self
            .open_lists
            .last()
            .and_then(|top| self.last_item(top.node))
        else {
            self.close_context();
            let para = self.add(self.current, DocNode::new(DocKind::Paragraph));
            self.scan_into(para, text);
            return;
        };

        self.wrap_inline(item);
        let para = self.add(item, DocNode::new(DocKind::Paragraph));
        self.scan_into(para, text);
        self.current = item;
    }

    fn wrap_inline(&mut self, idx: usize) {
        let (inline, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.nodes[idx].children)
            .into_iter()
            .partition(|slot| matches!(slot, Slot::Inline(_)));
        if !inline.is_empty() {
            let para = self.nodes.len();
            self.nodes.push(BuildNode {
                node: DocNode::new(DocKind::Paragraph),
                parent: Some(idx),
                children: inline,
            });
            self.nodes[idx].children.push(Slot::Node(para));
        }
        self.nodes[idx].children.extend(rest);
    }

    fn open_list(&mut self, parent: usize, kind: ListKind, level: usize) -> usize {
        let node = self.add(parent, DocNode::new(DocKind::List(kind)).with_level(level));
        self.open_lists.push(OpenList { kind, level, node });
        node
    }

    fn push_row(&mut self, unit: &BlockUnit) {
        if self.kind(self.current) != DocKind::Table {
            self.close_context();
            self.current = self.add(self.current, DocNode::new(DocKind::Table));
        }
        let row = self.add(self.current, DocNode::new(DocKind::TableRow));
        let escape = self.ctx.grammar.escape_char();
        for cell in unit.lines.iter().flat_map(|line| Table::cells(line, escape)) {
            let kind = if cell.head {
                DocKind::TableHead
            } else {
                DocKind::TableCell
            };
            let node = self.add(row, DocNode::new(kind));
            self.scan_into(node, &cell.text);
        }
    }

    fn push_heading(&mut self, level: usize, text: &str) {
        self.close_context();
        if self.sections {
            while self.kind(self.current) == DocKind::Section
                && self.nodes[self.current].node.level >= level
            {
                self.current = self.parent(self.current);
            }
            self.current = self.add(
                self.current,
                DocNode::new(DocKind::Section).with_level(level),
            );
        }
        let header = DocNode::new(DocKind::Header)
            .with_level(level)
            .with_content(text.trim());
        let header = self.add(self.current, header);
        self.scan_into(header, text.trim());
    }

    /// Closes open lists and tables, moving the insertion point to the
    /// nearest absorbing ancestor.
    fn close_context(&mut self) {
        if !self.open_lists.is_empty() {
            trace!("closing {} open list(s)", self.open_lists.len());
            self.open_lists.clear();
        }
        while !self.kind(self.current).is_absorbing() {
            self.current = self.parent(self.current);
        }
    }

    fn scan_into(&mut self, idx: usize, text: &str) {
        let mut scratch = DocNode::new(self.kind(idx));
        scan_inline(text, &self.ctx, &mut scratch);
        self.nodes[idx]
            .children
            .extend(scratch.children.into_iter().map(Slot::Inline));
    }

    fn add(&mut self, parent: usize, node: DocNode) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(BuildNode {
            node,
            parent: Some(parent),
            children: vec![],
        });
        self.nodes[parent].children.push(Slot::Node(idx));
        idx
    }

    fn kind(&self, idx: usize) -> DocKind {
        self.nodes[idx].node.kind
    }

    fn parent(&self, idx: usize) -> usize {
        self.nodes[idx].parent.unwrap_or(ROOT)
    }

    fn last_item(&self, list: usize) -> Option<usize> {
        self.nodes[list].children.iter().rev().find_map(|slot| match slot {
            Slot::Node(idx) if self.kind(*idx) == DocKind::ListItem => Some(*idx),
            _ => None,
        })
    }
}

fn materialize(nodes: &mut [BuildNode], idx: usize) -> DocNode {
    let slots = std::mem::take(&mut nodes[idx].children);
    let mut node = std::mem::replace(&mut nodes[idx].node, DocNode::new(DocKind::Text));
    for slot in slots {
        let child = match slot {
            Slot::Node(child) => materialize(nodes, child),
            Slot::Inline(inline) => inline,
        };
        node.push(child);
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::refs::{InterwikiMap, LinkReferenceTable};
    use crate::parsing::{Flavor, ParseOptions, parse, segment};
    use crate::tree::invariants::violations;
    use pretty_assertions::assert_eq;

    fn tree(flavor: Flavor, src: &str) -> DocNode {
        let doc = parse(src, &ParseOptions::new(flavor));
        assert_eq!(violations(&doc), Vec::<String>::new());
        doc
    }

    fn outline(flavor: Flavor, src: &str) -> String {
        tree(flavor, src).outline()
    }

    #[test]
    fn creole_list_nesting() {
        insta::assert_snapshot!(outline(Flavor::Creole, "* a\n** b\n* c\n").trim_end(), @r#"
        document
          list(unordered) level=1
            list_item level=1
              text "a"
              list(unordered) level=2
                list_item level=2
                  text "b"
            list_item level=1
              text "c"
        "#);
    }

    #[test]
    fn markdown_list_nesting() {
        let doc = tree(Flavor::Markdown, "- a\n  - b\n- c\n");
        assert_eq!(doc.children.len(), 1);
        let list = &doc.children[0];
        assert_eq!(list.kind, DocKind::List(ListKind::Unordered));
        assert_eq!(list.children.len(), 2);
        let nested = &list.children[0].children[1];
        assert_eq!(nested.kind, DocKind::List(ListKind::Unordered));
        assert_eq!(nested.children.len(), 1);
        assert_eq!(nested.children[0].text_content(), "b");
    }

    #[test]
    fn mixed_kinds_at_one_level_never_share_a_list() {
        let doc = tree(Flavor::Creole, "* a\n# b\n");
        let kinds: Vec<_> = doc.children.iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DocKind::List(ListKind::Unordered),
                DocKind::List(ListKind::Ordered)
            ]
        );
    }

    #[test]
    fn shallower_item_closes_nested_lists() {
        let doc = tree(Flavor::Creole, "* a\n** b\n*** c\n* d\n");
        let top = &doc.children[0];
        assert_eq!(top.children.len(), 2);
        assert_eq!(top.children[1].text_content(), "d");
    }

    #[test]
    fn heading_closes_list_and_attaches_to_document() {
        let doc = tree(Flavor::Creole, "* a\n== Title ==\ntext\n");
        let kinds: Vec<_> = doc.children.iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DocKind::List(ListKind::Unordered),
                DocKind::Header,
                DocKind::Paragraph
            ]
        );
        assert_eq!(doc.children[1].level, 2);
        assert_eq!(doc.children[1].content, "Title");
    }

    #[test]
    fn table_rows_share_a_table_until_another_block() {
        insta::assert_snapshot!(outline(Flavor::Creole, "|=A|=B|\n|1|[[x|y]]|\ntext").trim_end(), @r##"
        document
          table
            table_row
              table_head
                text "A"
              table_head
                text "B"
            table_row
              table_cell
                text "1"
              table_cell
                link "#x"
                  text "y"
          paragraph
            text "text"
        "##);
    }

    #[test]
    fn blockquote_content_is_nested() {
        let doc = tree(Flavor::Markdown, "> * a\n> * b\n>\n> para\n\nafter\n");
        let quote = &doc.children[0];
        assert_eq!(quote.kind, DocKind::Blockquote);
        let kinds: Vec<_> = quote.children.iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![DocKind::List(ListKind::Unordered), DocKind::Paragraph]
        );
        assert_eq!(doc.children[1].kind, DocKind::Paragraph);
    }

    #[test]
    fn preformatted_keeps_content_and_language() {
        let doc = tree(Flavor::Markdown, "```rust\nfn main() {}\n  **x**\n```\n");
        let pre = &doc.children[0];
        assert_eq!(pre.kind, DocKind::Preformatted);
        assert_eq!(pre.args.as_deref(), Some("rust"));
        assert_eq!(pre.content, "fn main() {}\n  **x**");
        assert!(pre.children.is_empty());
    }

    #[test]
    fn sections_group_by_heading_rank() {
        let opts = ParseOptions::new(Flavor::Creole).with_sections(true);
        let doc = parse("= A =\none\n== B ==\ntwo\n= C =\n", &opts);
        insta::assert_snapshot!(doc.outline().trim_end(), @r#"
        document
          section level=1
            header level=1 "A"
              text "A"
            paragraph
              text "one"
            section level=2
              header level=2 "B"
                text "B"
              paragraph
                text "two"
          section level=1
            header level=1 "C"
              text "C"
        "#);
    }

    #[test]
    fn insertion_point_returns_to_document() {
        let refs = LinkReferenceTable::new();
        let interwiki = InterwikiMap::new();
        let grammar = Flavor::Creole.grammar();
        let ctx = InlineContext::new(grammar, &refs, &interwiki, "#");
        let mut builder = TreeBuilder::new(ctx, false);
        let opts = ParseOptions::new(Flavor::Creole);
        for unit in segment("* a\n** b\n|x|\n", &opts) {
            builder.push(&unit);
        }
        assert_eq!(builder.insertion_point(), DocKind::Table);
        let doc = builder.finish();
        assert_eq!(doc.kind, DocKind::Document);
    }

    #[test]
    fn loose_item_holds_its_later_paragraphs() {
        insta::assert_snapshot!(outline(Flavor::Markdown, "- a\n\n  more\n- b\n").trim_end(), @r#"
        document
          list(unordered) level=1
            list_item level=1
              paragraph
                text "a"
              paragraph
                text "more"
            list_item level=1
              text "b"
        "#);
    }

    #[test]
    fn loose_nested_item_keeps_paragraph_under_the_nested_item() {
        let doc = tree(Flavor::Markdown, "- a\n  - b\n\n    more\n- c\n");
        let top = &doc.children[0];
        assert_eq!(top.children.len(), 2);
        let nested_item = &top.children[0].children[1].children[0];
        let kinds: Vec<_> = nested_item.children.iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![DocKind::Paragraph, DocKind::Paragraph]);
        assert_eq!(nested_item.children[1].text_content(), "more");
    }

    #[test]
    fn loose_markdown_list_survives_blank_lines() {
        let doc = tree(Flavor::Markdown, "1. a\n\n2. b\n");
        assert_eq!(doc.children.len(), 1);
        assert_eq!(doc.children[0].children.len(), 2);
    }
}
