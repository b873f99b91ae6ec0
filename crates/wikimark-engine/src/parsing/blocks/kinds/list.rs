use crate::tree::ListKind;

/// A recognized list-item marker and the item text after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMarker {
    pub kind: ListKind,
    /// Leading whitespace width before the marker.
    pub indent: usize,
    /// Number of marker characters; the nesting level for Creole items.
    pub depth: usize,
    /// Bytes consumed by indentation, marker and the following whitespace.
    pub marker_len: usize,
    pub text: String,
}

pub struct List;

impl List {
    pub const CREOLE_BULLET: char = '*';
    pub const CREOLE_NUMBER: char = '#';
    pub const MARKDOWN_BULLETS: [char; 3] = ['*', '+', '-'];
    pub const MARKDOWN_NUMBER_SUFFIX: char = '.';

    /// Creole item: a run of `*`/`#`; the last character picks the list kind
    /// and the run length is the nesting level.
    pub fn creole(line: &str) -> Option<ListMarker> {
        let indent = line.len() - line.trim_start().len();
        let rest = &line[indent..];
        let depth = rest
            .chars()
            .take_while(|c| *c == Self::CREOLE_BULLET || *c == Self::CREOLE_NUMBER)
            .count();
        let last = rest[..depth].chars().last()?;
        let kind = if last == Self::CREOLE_NUMBER {
            ListKind::Ordered
        } else {
            ListKind::Unordered
        };
        Self::finish(line, indent, depth, depth, kind)
    }

    /// Markdown item: `*`, `+`, `-` or `digits.` followed by whitespace.
    pub fn markdown(line: &str) -> Option<ListMarker> {
        let indent = line.bytes().take_while(|b| *b == b' ').count();
        let rest = &line[indent..];
        let first = rest.chars().next()?;
        if Self::MARKDOWN_BULLETS.contains(&first) {
            return Self::finish(line, indent, 1, 1, ListKind::Unordered);
        }
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 && rest[digits..].starts_with(Self::MARKDOWN_NUMBER_SUFFIX) {
            return Self::finish(line, indent, 1, digits + 1, ListKind::Ordered);
        }
        None
    }

    fn finish(
        line: &str,
        indent: usize,
        depth: usize,
        marker_bytes: usize,
        kind: ListKind,
    ) -> Option<ListMarker> {
        let after = &line[indent + marker_bytes..];
        if !after.is_empty() && !after.starts_with([' ', '\t']) {
            return None;
        }
        let text = after.trim_start_matches([' ', '\t']);
        Some(ListMarker {
            kind,
            indent,
            depth,
            marker_len: line.len() - text.len(),
            text: text.trim_end().to_string(),
        })
    }
}
