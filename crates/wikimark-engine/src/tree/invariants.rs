use super::node::{DocKind, DocNode};

/// Structural checks on a finished tree. Returns one message per
/// violation; an empty vector means the tree is well formed.
///
/// - the root is a `document`
/// - a `list` holds only `list_item` children
/// - a `table` holds only `table_row`, a `table_row` only cells
/// - a `list_item` holds inline content, nested lists and paragraphs
/// - inline nodes hold only inline children
pub fn violations(root: &DocNode) -> Vec<String> {
    let mut out = vec![];
    if root.kind != DocKind::Document {
        out.push(format!("root is {}, not document", root.kind.name()));
    }
    for node in root.descendants() {
        for child in &node.children {
            if !allowed(node.kind, child.kind) {
                out.push(format!(
                    "{} may not contain {}",
                    node.kind.name(),
                    child.kind.name()
                ));
            }
        }
    }
    out
}

fn allowed(parent: DocKind, child: DocKind) -> bool {
    match parent {
        DocKind::List(_) => child == DocKind::ListItem,
        DocKind::Table => child == DocKind::TableRow,
        DocKind::TableRow => matches!(child, DocKind::TableCell | DocKind::TableHead),
        DocKind::ListItem => {
            child.is_inline() || matches!(child, DocKind::List(_) | DocKind::Paragraph)
        }
        DocKind::Paragraph
        | DocKind::Header
        | DocKind::TableCell
        | DocKind::TableHead
        | DocKind::Link
        | DocKind::Image
        | DocKind::Macro
        | DocKind::Emphasis
        | DocKind::Strong => child.is_inline(),
        DocKind::Text
        | DocKind::Code
        | DocKind::Break
        | DocKind::Separator
        | DocKind::Preformatted
        | DocKind::Html => false,
        DocKind::Document | DocKind::Section | DocKind::Blockquote => !child.is_inline(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ListKind;

    #[test]
    fn list_must_hold_items() {
        let mut list = DocNode::new(DocKind::List(ListKind::Ordered));
        list.push(DocNode::new(DocKind::Paragraph));
        let mut doc = DocNode::new(DocKind::Document);
        doc.push(list);
        assert_eq!(
            violations(&doc),
            vec!["list(ordered) may not contain paragraph".to_string()]
        );
    }

    #[test]
    fn root_must_be_document() {
        assert_eq!(violations(&DocNode::text("x")).len(), 1);
    }
}
