use std::sync::LazyLock;

use log::debug;
use regex::{Captures, Regex};

use crate::parsing::Flavor;

use super::chunk::{Chunk, TagPattern};
use super::link_defs::{add_link_def, fix_url};
use super::EditorOptions;

/// A toolbar command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Bold,
    Italic,
    /// Inserts or removes a link. `url` is the answer to the link prompt;
    /// `None` means the prompt was cancelled.
    Link { url: Option<String> },
    Image { url: Option<String> },
    Blockquote,
    Code,
    OrderedList,
    UnorderedList,
    Heading,
    HorizontalRule,
    /// Continues the list, quote or code block of the previous line after
    /// the user pressed Enter.
    Autoindent,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Bold => "bold",
            Command::Italic => "italic",
            Command::Link { .. } => "link",
            Command::Image { .. } => "image",
            Command::Blockquote => "quote",
            Command::Code => "code",
            Command::OrderedList => "olist",
            Command::UnorderedList => "ulist",
            Command::Heading => "heading",
            Command::HorizontalRule => "hr",
            Command::Autoindent => "autoindent",
        }
    }
}

/// Applies `cmd` to `chunk` in place.
pub fn apply(cmd: &Command, chunk: &mut Chunk, options: &EditorOptions) {
    debug!("applying {} command", cmd.name());
    match cmd {
        Command::Bold => do_emphasis(chunk, options, true),
        Command::Italic => do_emphasis(chunk, options, false),
        Command::Link { url } => do_link_or_image(chunk, options, url.as_deref(), false),
        Command::Image { url } => do_link_or_image(chunk, options, url.as_deref(), true),
        Command::Blockquote => do_blockquote(chunk, options, true),
        Command::Code => do_code(chunk, options, true),
        Command::OrderedList => do_list(chunk, options, true, true),
        Command::UnorderedList => do_list(chunk, options, false, true),
        Command::Heading => do_heading(chunk, options),
        Command::HorizontalRule => do_horizontal_rule(chunk, options),
        Command::Autoindent => do_autoindent(chunk, options),
    }
}

macro_rules! regex {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new($re).expect(concat!("invalid ", stringify!($name), " regex"))
        });
    };
}

macro_rules! tag {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<TagPattern> = LazyLock::new(|| {
            TagPattern::new($re).expect(concat!("invalid ", stringify!($name), " regex"))
        });
    };
}

regex!(DOUBLE_NEWLINES, r"\n{2,}");

/// Emphasis markup: a marker character repeated `count` times.
#[derive(Debug, Clone, Copy)]
struct Marker {
    ch: char,
    count: usize,
}

impl Marker {
    fn of(flavor: Flavor, bold: bool) -> Self {
        match (flavor, bold) {
            (_, true) => Marker { ch: '*', count: 2 },
            (Flavor::Markdown, false) => Marker { ch: '*', count: 1 },
            (Flavor::Creole, false) => Marker { ch: '/', count: 2 },
        }
    }

    fn text(self) -> String {
        std::iter::repeat_n(self.ch, self.count).collect()
    }
}

/// Bold and italic. The command toggles: markers already around the
/// selection are removed instead of doubled.
fn do_emphasis(chunk: &mut Chunk, options: &EditorOptions, bold: bool) {
    let marker = Marker::of(options.flavor, bold);
    let placeholder = if bold {
        "strong text"
    } else {
        "emphasized text"
    };

    chunk.trim_whitespace(false);
    chunk.selection = DOUBLE_NEWLINES.replace_all(&chunk.selection, "\n").into_owned();

    let before_run = chunk.before.chars().rev().take_while(|c| *c == marker.ch).count();
    let after_run = chunk.after.chars().take_while(|c| *c == marker.ch).count();
    let prev = before_run.min(after_run);

    // `*` inside `**` is an italic being added to bold text, not a toggle.
    if prev >= marker.count && !(prev == 2 && marker.count == 1) {
        chunk.before.truncate(chunk.before.len() - marker.count * marker.ch.len_utf8());
        chunk.after.drain(..marker.count * marker.ch.len_utf8());
    } else if chunk.selection.is_empty() && after_run > 0 {
        let stray: String = chunk.after.chars().take(after_run).collect();
        let strip = chunk
            .after
            .find(|c| c != marker.ch && c != '_')
            .unwrap_or(chunk.after.len());
        chunk.after.drain(..strip);
        let whitespace = match chunk.before.chars().last() {
            Some(c) if c.is_whitespace() => {
                chunk.before.pop();
                c.to_string()
            }
            _ => String::new(),
        };
        chunk.before.push_str(&stray);
        chunk.before.push_str(&whitespace);
    } else {
        if chunk.selection.is_empty() {
            chunk.selection = placeholder.to_string();
        }
        let markup = marker.text();
        chunk.before.push_str(&markup);
        chunk.after.insert_str(0, &markup);
    }
}

regex!(SELECTION_NEWLINES, r"^(\n*)([^\r]+?)(\n*)$");
regex!(QUOTE_MARK_AT_END, r"(>[ \t]*)$");
regex!(ONLY_QUOTE_MARKS, r"^(?:\s|>)+$");
regex!(QUOTE_BEFORE, r"(((\n|^)(\n[ \t]*)*>(.+\n)*.*)+(\n[ \t]*)*$)");
regex!(QUOTE_AFTER, r"^(((\n|^)(\n[ \t]*)*>(.+\n)*.*)+(\n[ \t]*)*)");
regex!(START_TAG_BLANKS, r"\n((?:>|\s)*)\n$");
regex!(END_TAG_BLANKS, r"^\n((?:>|\s)*)\n");
regex!(BLANK_QUOTE_LINE, r"(?m)^[ ]{0,3}>?[ \t]*$");
regex!(QUOTED_LINE, r"^[ ]{0,3}>");
regex!(QUOTE_PREFIX, r"(?m)^[ ]{0,3}> ?");
regex!(STARTS_QUOTED, r"^\n?[ ]{0,3}>");
regex!(ENDS_QUOTED, r"(?:\n|^)[ ]{0,3}>.*$");
regex!(TRAILING_NEWLINES_0_2, r"\n{0,2}$");
regex!(LEADING_NEWLINES_0_2, r"^\n{0,2}");
regex!(LEADING_QUOTE, r"^> *");

/// Quotes or unquotes the selected lines, merging with quote blocks
/// directly above and below.
fn do_blockquote(chunk: &mut Chunk, options: &EditorOptions, default_text: bool) {
    if let Some(caps) = SELECTION_NEWLINES.captures(&chunk.selection) {
        let (lead, body, trail) = (
            caps[1].to_string(),
            caps[2].to_string(),
            caps[3].to_string(),
        );
        chunk.before.push_str(&lead);
        chunk.after.insert_str(0, &trail);
        chunk.selection = body;
    }

    if let Some(m) = QUOTE_MARK_AT_END.find(&chunk.before) {
        let mark = chunk.before.split_off(m.start());
        chunk.selection.insert_str(0, &mark);
    }

    if ONLY_QUOTE_MARKS.is_match(&chunk.selection) {
        chunk.selection.clear();
    }
    if chunk.selection.is_empty() && default_text {
        chunk.selection = "Blockquote".to_string();
    }

    if !chunk.before.is_empty() && !chunk.before.ends_with('\n') {
        chunk.before.push('\n');
    }
    if !chunk.after.is_empty() && !chunk.after.starts_with('\n') {
        chunk.after.insert(0, '\n');
    }

    if let Some(m) = QUOTE_BEFORE.find(&chunk.before) {
        chunk.start_tag = chunk.before.split_off(m.start());
    }
    if let Some(m) = QUOTE_AFTER.find(&chunk.after) {
        chunk.end_tag = chunk.after.drain(..m.end()).collect();
    }

    let needs_quoting = chunk
        .selection
        .split('\n')
        .any(|line| !QUOTED_LINE.is_match(line));

    if needs_quoting {
        chunk.wrap_lines(options.line_length.saturating_sub(2));
        chunk.selection = prefix_lines(&chunk.selection, "> ");
        replace_blanks_in_tags(chunk, "> ");
        chunk.add_blank_lines(1, 1, false);
    } else {
        chunk.selection = QUOTE_PREFIX.replace_all(&chunk.selection, "").into_owned();
        chunk.unwrap_lines();
        replace_blanks_in_tags(chunk, "");

        if !STARTS_QUOTED.is_match(&chunk.selection) && !chunk.start_tag.is_empty() {
            chunk.start_tag = TRAILING_NEWLINES_0_2
                .replace(&chunk.start_tag, "\n\n")
                .into_owned();
        }
        if !ENDS_QUOTED.is_match(&chunk.selection) && !chunk.end_tag.is_empty() {
            chunk.end_tag = LEADING_NEWLINES_0_2
                .replace(&chunk.end_tag, "\n\n")
                .into_owned();
        }
    }

    if !chunk.selection.contains('\n')
        && let Some(m) = LEADING_QUOTE.find(&chunk.selection)
    {
        let marks: String = chunk.selection.drain(..m.end()).collect();
        chunk.start_tag.push_str(&marks);
    }
}

/// Rewrites blank lines at the seams between the selection and the quote
/// blocks around it.
fn replace_blanks_in_tags(chunk: &mut Chunk, replacement: &str) {
    let fix = |caps: &Captures| {
        let inner = BLANK_QUOTE_LINE.replace_all(&caps[1], replacement);
        format!("\n{inner}\n")
    };
    if !chunk.start_tag.is_empty() {
        chunk.start_tag = START_TAG_BLANKS.replace(&chunk.start_tag, fix).into_owned();
    }
    if !chunk.end_tag.is_empty() {
        chunk.end_tag = END_TAG_BLANKS.replace(&chunk.end_tag, fix).into_owned();
    }
}

fn prefix_lines(text: &str, prefix: &str) -> String {
    text.split('\n')
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

regex!(TEXT_AT_END, r"\S[ ]*$");
regex!(TEXT_AT_START, r"^[ ]*\S");
regex!(FOUR_SPACES_AT_END, r"[ ]{4}$");
regex!(CODE_LINE_BEFORE, r"\n(?:\t|[ ]{4,}).*\n$");
regex!(CODE_LINE_AFTER, r"^\n(?:\t|[ ]{4,})");
regex!(UNINDENTED_LINE, r"(?m)^[ ]{0,3}\S");
regex!(LINE_START, r"(?m)^");
regex!(CODE_INDENT, r"(?m)^[ ]{4}");
tag!(BACKTICK, "`");
tag!(NOWIKI_OPEN, r"\{\{\{");
tag!(NOWIKI_CLOSE, r"\}\}\}");
tag!(NOWIKI_BLOCK_OPEN, r"\{\{\{\n");
tag!(NOWIKI_BLOCK_CLOSE, r"\n\}\}\}");

/// Code: a block when the selection is on lines of its own or spans
/// lines, inline code otherwise. Both forms toggle.
fn do_code(chunk: &mut Chunk, options: &EditorOptions, default_text: bool) {
    let text_before = TEXT_AT_END.is_match(&chunk.before);
    let text_after = TEXT_AT_START.is_match(&chunk.after);
    let block = (!text_before && !text_after) || chunk.selection.contains('\n');
    let placeholder = if default_text { "enter code here" } else { "" };

    match (options.flavor, block) {
        (Flavor::Markdown, true) => indented_code(chunk, placeholder),
        (Flavor::Creole, true) => {
            chunk.find_tags(Some(&NOWIKI_BLOCK_OPEN), Some(&NOWIKI_BLOCK_CLOSE));
            if !chunk.start_tag.is_empty() && !chunk.end_tag.is_empty() {
                chunk.start_tag.clear();
                chunk.end_tag.clear();
            } else {
                restore_tags(chunk);
                chunk.add_blank_lines(1, 1, false);
                chunk.start_tag = "{{{\n".to_string();
                chunk.end_tag = "\n}}}".to_string();
                if chunk.selection.is_empty() {
                    chunk.selection = placeholder.to_string();
                }
            }
        }
        (flavor, false) => {
            let (open, close, open_text, close_text) = match flavor {
                Flavor::Markdown => (&*BACKTICK, &*BACKTICK, "`", "`"),
                Flavor::Creole => (&*NOWIKI_OPEN, &*NOWIKI_CLOSE, "{{{", "}}}"),
            };
            chunk.trim_whitespace(false);
            chunk.find_tags(Some(open), Some(close));
            match (chunk.start_tag.is_empty(), chunk.end_tag.is_empty()) {
                (true, true) => {
                    chunk.start_tag = open_text.to_string();
                    chunk.end_tag = close_text.to_string();
                    if chunk.selection.is_empty() {
                        chunk.selection = placeholder.to_string();
                    }
                }
                // A lone closing delimiter belongs to the text after.
                (true, false) => {
                    let end = std::mem::take(&mut chunk.end_tag);
                    chunk.after.insert_str(0, &end);
                }
                _ => {
                    chunk.start_tag.clear();
                    chunk.end_tag.clear();
                }
            }
        }
    }
}

/// Moves tags found by a failed toggle back into the text.
fn restore_tags(chunk: &mut Chunk) {
    let start = std::mem::take(&mut chunk.start_tag);
    chunk.before.push_str(&start);
    let end = std::mem::take(&mut chunk.end_tag);
    chunk.after.insert_str(0, &end);
}

fn indented_code(chunk: &mut Chunk, placeholder: &str) {
    if let Some(m) = FOUR_SPACES_AT_END.find(&chunk.before) {
        let indent = chunk.before.split_off(m.start());
        chunk.selection.insert_str(0, &indent);
    }
    let n_before = if CODE_LINE_BEFORE.is_match(&chunk.before) || chunk.after.is_empty() {
        0
    } else {
        1
    };
    let n_after = if CODE_LINE_AFTER.is_match(&chunk.after) {
        0
    } else {
        1
    };
    chunk.add_blank_lines(n_before, n_after, false);

    if chunk.selection.is_empty() {
        chunk.start_tag = "    ".to_string();
        chunk.selection = placeholder.to_string();
    } else if UNINDENTED_LINE.is_match(&chunk.selection) {
        chunk.selection = LINE_START.replace_all(&chunk.selection, "    ").into_owned();
    } else {
        chunk.selection = CODE_INDENT.replace_all(&chunk.selection, "").into_owned();
    }
}

regex!(WHITESPACE_RUNS, r"\s+");
regex!(UNDERLINE_CHARS, r"-+|=+");
tag!(ATX_OPEN, r"#+[ ]*");
tag!(ATX_CLOSE, r"[ ]*#+");
tag!(SETEXT_UNDERLINE, r"\s?(?:-+|=+)");
tag!(CREOLE_OPEN, r"=+[ ]*");
tag!(CREOLE_CLOSE, r"[ ]*=+");

/// Cycles the heading level of the selected line: none to 2, 2 to 1, 1 to
/// none.
fn do_heading(chunk: &mut Chunk, options: &EditorOptions) {
    chunk.selection = WHITESPACE_RUNS
        .replace_all(&chunk.selection, " ")
        .trim()
        .to_string();

    let (open, close, mark) = match options.flavor {
        Flavor::Markdown => (&*ATX_OPEN, &*ATX_CLOSE, '#'),
        Flavor::Creole => (&*CREOLE_OPEN, &*CREOLE_CLOSE, '='),
    };

    if chunk.selection.is_empty() {
        let bar: String = std::iter::repeat_n(mark, 2).collect();
        chunk.start_tag = format!("{bar} ");
        chunk.selection = "Heading".to_string();
        chunk.end_tag = format!(" {bar}");
        return;
    }

    chunk.find_tags(Some(open), Some(close));
    let mut level = chunk.start_tag.chars().filter(|c| *c == mark).count();
    chunk.start_tag.clear();
    chunk.end_tag.clear();

    if options.flavor == Flavor::Markdown {
        chunk.find_tags(None, Some(&SETEXT_UNDERLINE));
        if let Some(m) = UNDERLINE_CHARS.find(&chunk.end_tag) {
            level = if m.as_str().starts_with('=') { 1 } else { 2 };
        }
        chunk.end_tag.clear();
    }

    chunk.add_blank_lines(1, 1, false);

    let target = if level == 0 { 2 } else { level - 1 };
    if target == 0 {
        return;
    }
    match options.flavor {
        Flavor::Markdown => {
            let ch = if target >= 2 { '-' } else { '=' };
            let len = chunk.selection.chars().count().min(options.line_length);
            chunk.end_tag = format!("\n{}", std::iter::repeat_n(ch, len).collect::<String>());
        }
        Flavor::Creole => {
            let bar: String = std::iter::repeat_n('=', target).collect();
            chunk.start_tag = format!("{bar} ");
            chunk.end_tag = format!(" {bar}");
        }
    }
}

fn do_horizontal_rule(chunk: &mut Chunk, options: &EditorOptions) {
    chunk.start_tag = match options.flavor {
        Flavor::Markdown => "----------\n",
        Flavor::Creole => "----\n",
    }
    .to_string();
    chunk.selection.clear();
    chunk.add_blank_lines(2, 1, true);
}

/// Flavor-specific list marker syntax and the patterns derived from it.
struct ListSyntax {
    bullet_prefix: &'static str,
    numbered: bool,
    marker_tag: TagPattern,
    ordered: Regex,
    bullet: Regex,
    previous_items: Regex,
    next_items: Regex,
    item_marker: Regex,
    empty_item: Regex,
    bullet_line: Regex,
    ordered_line: Regex,
}

impl ListSyntax {
    fn new(
        bullet: &str,
        ordered: &str,
        bullet_prefix: &'static str,
        numbered: bool,
    ) -> Result<Self, regex::Error> {
        let marker = format!("(?:{bullet}|{ordered})");
        let items = format!(
            r"([ ]{{0,3}}{marker}[ \t]+.*)(?:\n.+|\n{{2,}}(?:{bullet}.*|{ordered})[ \t]+.*|\n{{2,}}[ \t]+\S.*)*"
        );
        Ok(Self {
            bullet_prefix,
            numbered,
            marker_tag: TagPattern::new(&format!(r"(?:\n|^)*[ ]{{0,3}}{marker}\s+"))?,
            ordered: Regex::new(ordered)?,
            bullet: Regex::new(&format!(r"^\s*({bullet})"))?,
            previous_items: Regex::new(&format!(r"(?:\n|^)(?:{items})\n*$"))?,
            next_items: Regex::new(&format!(r"^\n*(?:{items})\n*"))?,
            item_marker: Regex::new(&format!(r"(?m)^[ ]{{0,3}}{marker}\s"))?,
            empty_item: Regex::new(&format!(r"(?:\n|^)[ ]{{0,3}}{marker}[ \t]*\n$"))?,
            bullet_line: Regex::new(&format!(r"(?:\n|^)[ ]{{0,3}}(?:{bullet})[ \t]+.*\n$"))?,
            ordered_line: Regex::new(&format!(r"(?:\n|^)[ ]{{0,3}}(?:{ordered})[ \t]+.*\n$"))?,
        })
    }

    fn of(flavor: Flavor) -> &'static ListSyntax {
        match flavor {
            Flavor::Markdown => &MARKDOWN_LISTS,
            Flavor::Creole => &CREOLE_LISTS,
        }
    }
}

static MARKDOWN_LISTS: LazyLock<ListSyntax> = LazyLock::new(|| {
    ListSyntax::new(r"[*+-]", r"\d+[.]", "-", true).expect("invalid markdown list regex")
});

static CREOLE_LISTS: LazyLock<ListSyntax> = LazyLock::new(|| {
    ListSyntax::new(r"\*+", r"#+", "*", false).expect("invalid creole list regex")
});

/// Hands out item prefixes, numbering ordered items from 1.
struct ItemPrefixes<'s> {
    syntax: &'s ListSyntax,
    ordered: bool,
    bullet: String,
    next: usize,
}

impl ItemPrefixes<'_> {
    fn next_prefix(&mut self) -> String {
        match (self.ordered, self.syntax.numbered) {
            (true, true) => {
                let prefix = format!(" {}. ", self.next);
                self.next += 1;
                prefix
            }
            (true, false) => "# ".to_string(),
            (false, true) => format!(" {} ", self.bullet),
            (false, false) => format!("{} ", self.bullet),
        }
    }

    /// Re-marks every item in `items` with fresh prefixes.
    fn remark(&mut self, items: &str) -> String {
        let syntax = self.syntax;
        syntax
            .item_marker
            .replace_all(items, |_: &Captures| self.next_prefix())
            .into_owned()
    }
}

fn has_blank_between_lines(text: &str) -> bool {
    text.as_bytes()
        .windows(4)
        .any(|w| w[0] != b'\n' && w[1] == b'\n' && w[2] == b'\n' && w[3] != b'\n')
}

/// Makes the selection a list item, merging with and renumbering the items
/// around it. Applied to an item of the same kind it removes the marker.
fn do_list(chunk: &mut Chunk, options: &EditorOptions, ordered: bool, default_text: bool) {
    let syntax = ListSyntax::of(options.flavor);
    let mut prefixes = ItemPrefixes {
        syntax,
        ordered,
        bullet: syntax.bullet_prefix.to_string(),
        next: 1,
    };

    chunk.find_tags(Some(&syntax.marker_tag), None);

    if !chunk.before.is_empty()
        && !chunk.before.ends_with('\n')
        && !chunk.start_tag.starts_with('\n')
    {
        let tag = std::mem::take(&mut chunk.start_tag);
        chunk.before.push_str(&tag);
    }

    if !chunk.start_tag.is_empty() {
        let was_ordered = syntax.ordered.is_match(&chunk.start_tag);
        chunk.start_tag.clear();
        chunk.selection = chunk.selection.replace("\n    ", "\n");
        chunk.unwrap_lines();
        chunk.add_blank_lines(1, 1, false);

        if was_ordered {
            chunk.after = syntax
                .next_items
                .replace(&chunk.after, |caps: &Captures| prefixes.remark(&caps[0]))
                .into_owned();
        }
        if ordered == was_ordered {
            return;
        }
        prefixes.next = 1;
    }

    let mut n_before = 1;
    chunk.before = syntax
        .previous_items
        .replace(&chunk.before, |caps: &Captures| {
            let items = &caps[0];
            if let Some(b) = syntax.bullet.captures(items) {
                prefixes.bullet = b[1].to_string();
            }
            n_before = usize::from(has_blank_between_lines(items));
            prefixes.remark(items)
        })
        .into_owned();

    if chunk.selection.is_empty() {
        chunk.selection = if default_text { "List item" } else { " " }.to_string();
    }

    let prefix = prefixes.next_prefix();
    let mut n_after = 1;
    chunk.after = syntax
        .next_items
        .replace(&chunk.after, |caps: &Captures| {
            let items = &caps[0];
            n_after = usize::from(has_blank_between_lines(items));
            prefixes.remark(items)
        })
        .into_owned();

    chunk.trim_whitespace(true);
    chunk.add_blank_lines(n_before, n_after, true);
    let indent = " ".repeat(prefix.chars().count());
    chunk.start_tag = prefix;
    chunk.wrap_lines(options.line_length.saturating_sub(indent.len()));
    chunk.selection = chunk.selection.replace('\n', &format!("\n{indent}"));
}

regex!(EMPTY_QUOTE_LINE, r"(?:\n|^)[ ]{0,3}>[ \t]*\n$");
regex!(BLANK_INDENTED_LINE, r"(?:\n|^)[ \t]+\n$");
regex!(QUOTE_LINE, r"(?:\n|^)[ ]{0,3}>[ \t]+.*\n$");
regex!(CODE_LINE, r"(?:\n|^)(?:\t|[ ]{4,}).*\n$");

/// Runs after Enter: an empty item, quote or code line ends its block;
/// otherwise the block continues on the new line.
fn do_autoindent(chunk: &mut Chunk, options: &EditorOptions) {
    let syntax = ListSyntax::of(options.flavor);
    for ends_block in [&syntax.empty_item, &*EMPTY_QUOTE_LINE, &*BLANK_INDENTED_LINE] {
        chunk.before = ends_block.replace(&chunk.before, "\n\n").into_owned();
    }

    if syntax.bullet_line.is_match(&chunk.before) {
        do_list(chunk, options, false, true);
    }
    if syntax.ordered_line.is_match(&chunk.before) {
        do_list(chunk, options, true, true);
    }
    if QUOTE_LINE.is_match(&chunk.before) {
        do_blockquote(chunk, options, false);
    }
    if CODE_LINE.is_match(&chunk.before) {
        do_code(chunk, options, false);
    }
}

tag!(LINK_OPEN, r"\s*!?\[");
tag!(LINK_CLOSE, r"\][ ]?(?:\n[ ]*)?(?:\[.*?\])?");
tag!(WIKI_LINK_OPEN, r"\[\[[^\]|\n]*\|");
tag!(WIKI_LINK_CLOSE, r"\]\]");
tag!(WIKI_IMAGE_OPEN, r"\{\{[^}|\n]*\|");
tag!(WIKI_IMAGE_CLOSE, r"\}\}");
regex!(LINK_BRACKET, r"!?\[");

/// Links or unlinks the selection. An existing reference link is
/// unwrapped and its definition dropped; otherwise `url` (the prompt
/// answer) becomes a new numbered definition.
fn do_link_or_image(chunk: &mut Chunk, options: &EditorOptions, url: Option<&str>, image: bool) {
    if options.flavor == Flavor::Creole {
        wiki_link_or_image(chunk, url, image);
        return;
    }

    chunk.trim_whitespace(false);
    chunk.find_tags(Some(&LINK_OPEN), Some(&LINK_CLOSE));

    if chunk.end_tag.len() > 1 {
        chunk.start_tag = LINK_BRACKET.replace(&chunk.start_tag, "").into_owned();
        chunk.end_tag.clear();
        add_link_def(chunk, None);
        return;
    }
    if chunk.selection.contains("\n\n") {
        add_link_def(chunk, None);
        return;
    }
    let Some(url) = url else {
        return;
    };

    restore_tags(chunk);
    let def = format!(" [999]: {}", fix_url(url));
    let n = add_link_def(chunk, Some(&def));
    chunk.start_tag = if image { "![" } else { "[" }.to_string();
    chunk.end_tag = format!("][{n}]");
    if chunk.selection.is_empty() {
        chunk.selection = if image { "alt text" } else { "link text" }.to_string();
    }
}

/// Creole links carry their target inline: `[[url|text]]`, `{{url|alt}}`.
fn wiki_link_or_image(chunk: &mut Chunk, url: Option<&str>, image: bool) {
    let (open, close) = if image {
        (&*WIKI_IMAGE_OPEN, &*WIKI_IMAGE_CLOSE)
    } else {
        (&*WIKI_LINK_OPEN, &*WIKI_LINK_CLOSE)
    };
    chunk.trim_whitespace(false);
    chunk.find_tags(Some(open), Some(close));
    if !chunk.start_tag.is_empty() && !chunk.end_tag.is_empty() {
        chunk.start_tag.clear();
        chunk.end_tag.clear();
        return;
    }
    restore_tags(chunk);
    let Some(url) = url else {
        return;
    };
    let url = fix_url(url);
    if image {
        chunk.start_tag = format!("{{{{{url}|");
        chunk.end_tag = "}}".to_string();
    } else {
        chunk.start_tag = format!("[[{url}|");
        chunk.end_tag = "]]".to_string();
    }
    if chunk.selection.is_empty() {
        chunk.selection = if image { "alt text" } else { "link text" }.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn markdown() -> EditorOptions {
        EditorOptions {
            flavor: Flavor::Markdown,
            ..EditorOptions::default()
        }
    }

    fn creole() -> EditorOptions {
        EditorOptions::default()
    }

    /// Runs `cmd` on text whose selection is marked with `‹` and `›` and
    /// returns the result marked the same way.
    fn run(cmd: Command, options: &EditorOptions, marked: &str) -> String {
        let start = marked.find('‹').unwrap();
        let text = marked.replacen('‹', "", 1);
        let end = text.find('›').unwrap();
        let text = text.replacen('›', "", 1);
        let mut chunk = Chunk::new(&text, start, end, 0).unwrap();
        apply(&cmd, &mut chunk, options);
        let state = chunk.into_state();
        let mut out = state.text;
        out.insert(state.selection.end, '›');
        out.insert(state.selection.start, '‹');
        out
    }

    #[test]
    fn bold_wraps_and_unwraps() {
        assert_eq!(run(Command::Bold, &markdown(), "a ‹word› b"), "a **‹word›** b");
        assert_eq!(run(Command::Bold, &markdown(), "a **‹word›** b"), "a ‹word› b");
    }

    #[test]
    fn bold_without_selection_inserts_placeholder() {
        assert_eq!(run(Command::Bold, &markdown(), "x ‹› y"), "x **‹strong text›** y");
    }

    #[test]
    fn italic_follows_flavor() {
        assert_eq!(run(Command::Italic, &markdown(), "‹w›"), "*‹w›*");
        assert_eq!(run(Command::Italic, &creole(), "‹w›"), "//‹w›//");
        assert_eq!(run(Command::Italic, &creole(), "//‹w›//"), "‹w›");
    }

    #[test]
    fn italic_inside_bold_adds_markers() {
        assert_eq!(run(Command::Italic, &markdown(), "**‹w›**"), "***‹w›***");
    }

    #[test]
    fn heading_cycles_levels() {
        assert_eq!(run(Command::Heading, &markdown(), "‹Title›"), "‹Title›\n-----");
        assert_eq!(run(Command::Heading, &markdown(), "‹Title›\n-----"), "‹Title›\n=====");
        assert_eq!(run(Command::Heading, &markdown(), "‹Title›\n====="), "‹Title›");
        assert_eq!(run(Command::Heading, &creole(), "‹Title›"), "== ‹Title› ==");
        assert_eq!(run(Command::Heading, &creole(), "== ‹Title› =="), "= ‹Title› =");
    }

    #[test]
    fn empty_heading_gets_placeholder() {
        assert_eq!(run(Command::Heading, &markdown(), "‹›"), "## ‹Heading› ##");
    }

    #[test]
    fn horizontal_rule_is_inserted() {
        assert_eq!(
            run(Command::HorizontalRule, &markdown(), "para‹›"),
            "para\n\n\n----------\n‹›"
        );
    }

    #[test]
    fn inline_code_toggles() {
        assert_eq!(run(Command::Code, &markdown(), "a ‹b› c"), "a `‹b›` c");
        assert_eq!(run(Command::Code, &markdown(), "a `‹b›` c"), "a ‹b› c");
        assert_eq!(run(Command::Code, &creole(), "a ‹b› c"), "a {{{‹b›}}} c");
    }

    #[test]
    fn block_code_indents_lines() {
        assert_eq!(
            run(Command::Code, &markdown(), "‹let a;\nlet b;›"),
            "‹    let a;\n    let b;›"
        );
    }

    #[test]
    fn blockquote_quotes_lines() {
        assert_eq!(run(Command::Blockquote, &markdown(), "‹hello›"), "> ‹hello›");
        assert_eq!(run(Command::Blockquote, &markdown(), "> ‹hello›"), "‹hello›");
    }

    #[test]
    fn lists_number_and_toggle() {
        assert_eq!(run(Command::OrderedList, &markdown(), "‹a›"), " 1. ‹a›");
        assert_eq!(run(Command::UnorderedList, &markdown(), "‹a›"), " - ‹a›");
        assert_eq!(run(Command::UnorderedList, &markdown(), " - ‹a›"), "‹a›");
        assert_eq!(run(Command::UnorderedList, &creole(), "‹a›"), "* ‹a›");
    }

    #[test]
    fn ordered_item_continues_numbering() {
        assert_eq!(
            run(Command::OrderedList, &markdown(), " 1. one\n‹two›"),
            " 1. one\n 2. ‹two›"
        );
    }

    #[test]
    fn autoindent_continues_a_list() {
        assert_eq!(
            run(Command::Autoindent, &markdown(), " - one\n‹›"),
            " - one\n - ‹List item›"
        );
    }

    #[test]
    fn link_gets_a_numbered_definition() {
        let cmd = Command::Link {
            url: Some("example.com".into()),
        };
        assert_eq!(
            run(cmd, &markdown(), "see ‹here›"),
            "see [‹here›][1]\n\n\n  [1]: http://example.com"
        );
    }

    #[test]
    fn cancelled_link_changes_nothing() {
        assert_eq!(run(Command::Link { url: None }, &markdown(), "see ‹here›"), "see ‹here›");
    }

    #[test]
    fn creole_link_is_inline() {
        let cmd = Command::Link {
            url: Some("http://x.org".into()),
        };
        assert_eq!(run(cmd, &creole(), "a ‹b›"), "a [[http://x.org|‹b›]]");
        assert_eq!(run(Command::Link { url: None }, &creole(), "a [[http://x.org|‹b›]]"), "a ‹b›");
    }
}
