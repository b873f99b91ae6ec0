#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    /// Creole `{{{` ... `}}}`.
    Braces,
    Backticks,
    Tildes,
}

/// An opening fence line and the info string it carried, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceOpen {
    pub kind: FenceKind,
    pub info: Option<String>,
}

pub struct CodeFence;

impl CodeFence {
    pub const BRACES_OPEN: &'static str = "{{{";
    pub const BRACES_CLOSE: &'static str = "}}}";
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";
    /// Escapes a Creole closing fence inside a preformatted block.
    pub const ESCAPE: char = '~';
    /// First-line marker naming the Creole block's language (`#!python`).
    pub const KIND_MARKER: &'static str = "#!";

    /// Creole opener: a line holding only `{{{`.
    pub fn open_braces(line: &str) -> Option<FenceOpen> {
        (line.trim_end() == Self::BRACES_OPEN).then_some(FenceOpen {
            kind: FenceKind::Braces,
            info: None,
        })
    }

    /// Markdown opener: up to three spaces, then three backticks or tildes
    /// followed by an optional info string.
    pub fn open_fenced(line: &str) -> Option<FenceOpen> {
        let indent = line.bytes().take_while(|b| *b == b' ').count();
        if indent > 3 {
            return None;
        }
        let rest = &line[indent..];
        let (kind, marker) = if rest.starts_with(Self::BACKTICKS) {
            (FenceKind::Backticks, '`')
        } else if rest.starts_with(Self::TILDES) {
            (FenceKind::Tildes, '~')
        } else {
            return None;
        };
        let info = rest.trim_start_matches(marker).trim();
        if kind == FenceKind::Backticks && info.contains('`') {
            return None;
        }
        Some(FenceOpen {
            kind,
            info: (!info.is_empty()).then(|| info.to_string()),
        })
    }

    pub fn closes(kind: FenceKind, line: &str) -> bool {
        let t = line.trim();
        match kind {
            FenceKind::Braces => line.trim_end() == Self::BRACES_CLOSE,
            FenceKind::Backticks => t.starts_with(Self::BACKTICKS) && t.chars().all(|c| c == '`'),
            FenceKind::Tildes => t.starts_with(Self::TILDES) && t.chars().all(|c| c == '~'),
        }
    }

    /// Undoes the one level of escaping that keeps a content line from
    /// closing the block: `~}}}` becomes `}}}`.
    pub fn unescape(kind: FenceKind, line: &str) -> String {
        if kind != FenceKind::Braces {
            return line.to_string();
        }
        let indent_len = line.len() - line.trim_start().len();
        let (indent, rest) = line.split_at(indent_len);
        match rest.strip_prefix(Self::ESCAPE) {
            Some(tail) if tail.trim_end() == Self::BRACES_CLOSE => format!("{indent}{tail}"),
            _ => line.to_string(),
        }
    }

    /// Reads a `#!kind` marker from the first content line of a Creole block.
    pub fn kind_line(line: &str) -> Option<String> {
        let rest = line.strip_prefix(Self::KIND_MARKER)?;
        let kind: String = rest
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        let tail = &rest[kind.len()..];
        if !tail.is_empty() && !tail.starts_with(char::is_whitespace) {
            return None;
        }
        Some(kind)
    }
}
