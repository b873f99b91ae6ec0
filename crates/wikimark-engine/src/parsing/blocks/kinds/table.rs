/// One cell of a table row, before inline scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub head: bool,
    pub text: String,
}

pub struct Table;

impl Table {
    pub const SEPARATOR: char = '|';
    /// Leading marker of a header cell.
    pub const HEAD: char = '=';
    /// Openers and closers of inline constructs that may contain `|`.
    const NESTED: [(&'static str, &'static str); 3] = [("[[", "]]"), ("{{", "}}"), ("<<", ">>")];

    pub fn is_row(line: &str) -> bool {
        line.trim_start().starts_with(Self::SEPARATOR)
    }

    /// Splits a row into cells on unescaped `|`.
    ///
    /// A `|` inside a link, image, macro or inline-code construct does not
    /// split. The escape character is kept in the cell text so the inline
    /// scanner can still see it; a trailing separator does not produce an
    /// empty cell.
    pub fn cells(line: &str, escape: char) -> Vec<TableCell> {
        let body = line.trim();
        let Some(body) = body.strip_prefix(Self::SEPARATOR) else {
            return vec![];
        };

        let mut raw = vec![];
        let mut current = String::new();
        let mut closers: Vec<&str> = vec![];
        let mut rest = body;
        while let Some(ch) = rest.chars().next() {
            if let Some(close) = closers.last()
                && rest.starts_with(close)
            {
                current.push_str(close);
                rest = &rest[close.len()..];
                closers.pop();
                continue;
            }
            if let Some((open, close)) = Self::NESTED.iter().find(|(open, _)| rest.starts_with(open)) {
                current.push_str(open);
                rest = &rest[open.len()..];
                closers.push(close);
                continue;
            }
            rest = &rest[ch.len_utf8()..];
            if ch == escape
                && let Some(next) = rest.chars().next()
            {
                current.push(ch);
                current.push(next);
                rest = &rest[next.len_utf8()..];
                continue;
            }
            if ch == Self::SEPARATOR && closers.is_empty() {
                raw.push(std::mem::take(&mut current));
                continue;
            }
            current.push(ch);
        }
        if !current.trim().is_empty() {
            raw.push(current);
        }

        raw.into_iter()
            .map(|cell| {
                let cell = cell.trim();
                match cell.strip_prefix(Self::HEAD) {
                    Some(head) => TableCell {
                        head: true,
                        text: head.trim_matches(Self::HEAD).trim().to_string(),
                    },
                    None => TableCell {
                        head: false,
                        text: cell.to_string(),
                    },
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(cells: &[TableCell]) -> Vec<(bool, &str)> {
        cells.iter().map(|c| (c.head, c.text.as_str())).collect()
    }

    #[test]
    fn detects_rows() {
        assert!(Table::is_row("| a | b |"));
        assert!(Table::is_row("  |a"));
        assert!(!Table::is_row("a | b"));
    }

    #[test]
    fn splits_cells_and_heads() {
        let cells = Table::cells("|= Name |= Age |", '~');
        assert_eq!(texts(&cells), vec![(true, "Name"), (true, "Age")]);

        let cells = Table::cells("| Bob | 42", '~');
        assert_eq!(texts(&cells), vec![(false, "Bob"), (false, "42")]);
    }

    #[test]
    fn separators_inside_links_do_not_split() {
        let cells = Table::cells("| [[Page|label]] | {{img.png|alt}} |", '~');
        assert_eq!(
            texts(&cells),
            vec![(false, "[[Page|label]]"), (false, "{{img.png|alt}}")]
        );
    }

    #[test]
    fn escaped_separator_stays_in_cell() {
        let cells = Table::cells(r"| a \| b | c |", '\\');
        assert_eq!(texts(&cells), vec![(false, r"a \| b"), (false, "c")]);
    }

    #[test]
    fn empty_cells_between_separators_survive() {
        let cells = Table::cells("| a || c |", '~');
        assert_eq!(texts(&cells), vec![(false, "a"), (false, ""), (false, "c")]);
    }
}
