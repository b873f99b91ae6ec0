use std::sync::LazyLock;

use log::trace;
use regex::Regex;

use crate::tree::{DocKind, DocNode};

use super::{
    context::InlineContext,
    cursor::Cursor,
    kinds::{BracketLink, CodeSpan, Emphasis, MacroCall, RawUrl, WikiImage, WikiLink},
    rules::InlineRule,
};

static MACRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<<(\w+)(?:\((.*?)\))?\s*(?:\|\s*(.+?)\s*)?>>").expect("invalid macro regex")
});

static NOWIKI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{\{\{(.*?)\}\}\}").expect("invalid nowiki regex"));

static AUTOLINK_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^<((?:https?|ftp)://[^'">\s]+)>"#).expect("invalid autolink regex")
});

static AUTOLINK_MAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<(?:mailto:)?([-.\w]+@[-a-zA-Z0-9]+(?:\.[-a-zA-Z0-9]+)*\.[a-zA-Z]+)>")
        .expect("invalid mail autolink regex")
});

/// Outcome of a rule that matched at the cursor.
enum Matched {
    /// A finished node appended to the current insertion target.
    Node(DocNode),
    /// Text appended to the pending text run.
    Literal(String),
    /// A strong/emphasis marker opened or closed a node.
    Toggled,
}

/// Scans `text` left to right and appends inline children to `into`.
///
/// At each position the context's rules are tried in precedence order and
/// the first match wins; when none matches, one character is taken as
/// literal text. Strong and emphasis markers toggle: they open a node that
/// becomes the insertion target, or close the open node of that kind.
/// Nodes still open at the end are closed there.
pub fn scan_inline(text: &str, ctx: &InlineContext<'_>, into: &mut DocNode) {
    let mut scanner = Scanner {
        ctx,
        root: into,
        open: vec![],
        text: String::new(),
    };
    let mut cur = Cursor::new(text);

    while !cur.eof() {
        match scanner.try_rules(&mut cur) {
            Some(Matched::Node(node)) => scanner.push_node(node),
            Some(Matched::Literal(s)) => scanner.text.push_str(&s),
            Some(Matched::Toggled) => {}
            None => {
                if let Some(ch) = cur.bump() {
                    scanner.text.push(ch);
                }
            }
        }
    }
    scanner.finish();
}

/// An open strong/emphasis node and the marker that opened it.
struct Frame {
    node: DocNode,
    marker: &'static str,
}

struct Scanner<'c, 'n> {
    ctx: &'c InlineContext<'c>,
    root: &'n mut DocNode,
    open: Vec<Frame>,
    text: String,
}

impl Scanner<'_, '_> {
    fn try_rules(&mut self, cur: &mut Cursor<'_>) -> Option<Matched> {
        let ctx = self.ctx;
        for rule in ctx.rules() {
            let saved = cur.i;
            let matched = match *rule {
                InlineRule::WikiLink => try_parse_wikilink(cur, ctx).map(Matched::Node),
                InlineRule::BracketLink => try_parse_bracket_link(cur, ctx).map(Matched::Node),
                InlineRule::InterwikiShortcut => {
                    try_parse_interwiki_shortcut(cur, ctx).map(Matched::Node)
                }
                InlineRule::AngleLink => try_parse_autolink(cur).map(Matched::Node),
                InlineRule::RawUrl { escape } => try_parse_raw_url(cur, escape),
                InlineRule::Macro => try_parse_macro(cur).map(Matched::Node),
                InlineRule::NoWiki => try_parse_nowiki(cur).map(Matched::Node),
                InlineRule::CodeSpan => try_parse_code_span(cur),
                InlineRule::WikiImage => try_parse_wiki_image(cur, ctx).map(Matched::Node),
                InlineRule::BracketImage => try_parse_bracket_image(cur, ctx).map(Matched::Node),
                InlineRule::Strong(marker) => self.toggle(cur, marker, DocKind::Strong),
                InlineRule::Emphasis(marker) => self.toggle(cur, marker, DocKind::Emphasis),
                InlineRule::BackslashBreak => try_parse_backslash_break(cur).map(Matched::Node),
                InlineRule::TrailingSpaceBreak => {
                    try_parse_trailing_space_break(cur).map(Matched::Node)
                }
                InlineRule::Escape(escape) => try_parse_escape(cur, ctx, escape),
            };
            if matched.is_some() {
                return matched;
            }
            cur.i = saved;
        }
        None
    }

    fn target(&mut self) -> &mut DocNode {
        match self.open.last_mut() {
            Some(frame) => &mut frame.node,
            None => &mut *self.root,
        }
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        self.target().push(DocNode::text(text));
    }

    fn push_node(&mut self, node: DocNode) {
        self.flush_text();
        self.target().push(node);
    }

    fn toggle(
        &mut self,
        cur: &mut Cursor<'_>,
        marker: &'static str,
        kind: DocKind,
    ) -> Option<Matched> {
        if !cur.starts_with(marker) || Emphasis::blocked(marker, cur.prev()) {
            return None;
        }
        let open_at = self
            .open
            .iter()
            .rposition(|f| f.node.kind == kind && f.marker == marker);

        let (can_open, can_close) = if self.ctx.grammar.flanking_emphasis() {
            let mark = marker.chars().next();
            let next = cur.rest()[marker.len()..].chars().next();
            (
                next.is_some_and(|c| !c.is_whitespace() && Some(c) != mark),
                cur.prev().is_some_and(|c| !c.is_whitespace()),
            )
        } else {
            (true, true)
        };

        match open_at {
            Some(idx) if can_close => {
                cur.bump_n(marker.len());
                self.close_through(idx);
            }
            _ if can_open => {
                cur.bump_n(marker.len());
                self.flush_text();
                self.open.push(Frame {
                    node: DocNode::new(kind),
                    marker,
                });
            }
            _ => return None,
        }
        Some(Matched::Toggled)
    }

    /// Closes open frames down to and including `idx`.
    fn close_through(&mut self, idx: usize) {
        self.flush_text();
        while self.open.len() > idx {
            let Some(frame) = self.open.pop() else {
                break;
            };
            self.target().push(frame.node);
        }
    }

    fn finish(mut self) {
        if !self.open.is_empty() {
            trace!("auto-closing {} inline node(s) at block end", self.open.len());
        }
        self.close_through(0);
    }
}

/// Scans link text into `node` with the reduced link-text rules.
fn scan_link_text(node: &mut DocNode, text: &str, ctx: &InlineContext<'_>) {
    scan_inline(text, &ctx.for_link_text(), node);
}

fn link(href: String, title: Option<String>, text: &str, ctx: &InlineContext<'_>) -> DocNode {
    let mut node = DocNode::new(DocKind::Link).with_content(href);
    node.title = title;
    let text = if text.is_empty() {
        node.content.clone()
    } else {
        text.to_string()
    };
    scan_link_text(&mut node, &text, ctx);
    node
}

fn image(src: String, title: Option<String>, alt: &str) -> DocNode {
    let mut node = DocNode::new(DocKind::Image).with_content(src);
    node.title = title;
    if !alt.is_empty() {
        node.push(DocNode::text(alt));
    }
    node
}

/// Attempts to parse a `[[target|text]]` wiki link.
///
/// The target resolves through [`InlineContext::wiki_href`]; without text
/// the target itself becomes the link text.
fn try_parse_wikilink(cur: &mut Cursor<'_>, ctx: &InlineContext<'_>) -> Option<DocNode> {
    if !cur.starts_with(WikiLink::OPEN) {
        return None;
    }
    let body_start = cur.i + WikiLink::OPEN.len();
    let rest = &cur.s[body_start..];
    let close = rest.find(WikiLink::CLOSE)?;
    let body = &rest[..close];
    let (target, text) = match body.split_once(WikiLink::ALIAS) {
        Some((target, text)) => (target.trim(), text.trim()),
        None => (body.trim(), ""),
    };
    if target.is_empty() {
        return None;
    }
    cur.i = body_start + close + WikiLink::CLOSE.len();

    let href = ctx.wiki_href(target);
    Some(link(href, None, if text.is_empty() { target } else { text }, ctx))
}

/// Attempts to parse a single-bracket `[Prefix:Suffix]` interwiki link.
fn try_parse_interwiki_shortcut(
    cur: &mut Cursor<'_>,
    ctx: &InlineContext<'_>,
) -> Option<DocNode> {
    if cur.peek() != Some(WikiLink::SHORT_OPEN) || cur.starts_with(WikiLink::OPEN) {
        return None;
    }
    let body_start = cur.i + 1;
    let rest = &cur.s[body_start..];
    let close = rest.find(WikiLink::SHORT_CLOSE)?;
    let target = &rest[..close];
    if target.contains(WikiLink::SHORT_OPEN) {
        return None;
    }
    let href = ctx.interwiki.expand(target)?;
    cur.i = body_start + close + 1;
    Some(link(href, None, target, ctx))
}

/// Index of the `]` closing a bracket whose `[` was already consumed.
/// Allows nested bracket pairs and backslash escapes.
fn find_bracket_close(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut chars = s.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            BracketLink::OPEN => depth += 1,
            BracketLink::CLOSE if depth == 0 => return Some(idx),
            BracketLink::CLOSE => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Parses `(url "title")` at the start of `s`.
/// Returns (bytes consumed, url, title).
fn parse_destination(s: &str) -> Option<(usize, String, Option<String>)> {
    let inner_end = s.find(BracketLink::URL_CLOSE)?;
    let inner = s.get(1..inner_end)?.trim();

    let mut url = inner;
    let mut title = None;
    if let Some(quote) = inner.chars().last().filter(|c| *c == '"' || *c == '\'') {
        let body = &inner[..inner.len() - 1];
        if let Some(open) = body
            .match_indices(quote)
            .map(|(i, _)| i)
            .find(|i| body[..*i].ends_with(char::is_whitespace))
        {
            title = Some(body[open + 1..].to_string());
            url = body[..open].trim();
        }
    }
    let url = url
        .strip_prefix(BracketLink::AUTOLINK_OPEN)
        .and_then(|u| u.strip_suffix(BracketLink::AUTOLINK_CLOSE))
        .unwrap_or(url);
    Some((inner_end + 1, url.to_string(), title))
}

/// Length of the optional `[ ]?(\n[ ]*)?` gap between `[text]` and `[id]`.
fn reference_gap(s: &str) -> usize {
    let mut j = 0;
    if s[j..].starts_with(' ') {
        j += 1;
    }
    if s[j..].starts_with('\n') {
        j += 1;
        j += s[j..].bytes().take_while(|b| *b == b' ').count();
    }
    j
}

/// Parses `[id]` right after a link or image label. Returns the id (the
/// label itself when empty) and the bytes consumed.
fn reference_id<'s>(rest: &'s str, label: &'s str) -> Option<(&'s str, usize)> {
    let gap = reference_gap(rest);
    let tail = rest[gap..].strip_prefix(BracketLink::OPEN)?;
    let close = tail.find(BracketLink::CLOSE)?;
    let id = &tail[..close];
    let id = if id.is_empty() { label } else { id };
    Some((id, gap + 1 + close + 1))
}

/// Attempts to parse a Markdown link: inline `[text](url "title")`,
/// reference `[text][id]` or shortcut `[text]`.
///
/// Unresolved references fail so the brackets stay literal text; an
/// explicit `[text]()` is an empty link.
fn try_parse_bracket_link(cur: &mut Cursor<'_>, ctx: &InlineContext<'_>) -> Option<DocNode> {
    if cur.peek() != Some(BracketLink::OPEN) {
        return None;
    }
    let start = cur.i + 1;
    let close = find_bracket_close(&cur.s[start..])?;
    let text = &cur.s[start..start + close];
    let after = start + close + 1;
    let rest = &cur.s[after..];

    if rest.starts_with(BracketLink::URL_OPEN) {
        let (len, url, title) = parse_destination(rest)?;
        cur.i = after + len;
        let mut node = link(url, title, text, ctx);
        if text.is_empty() {
            node.children.clear();
        }
        return Some(node);
    }

    if let Some((id, len)) = reference_id(rest, text) {
        let r = ctx.refs.get(id)?;
        cur.i = after + len;
        return Some(link(r.url.clone(), r.title.clone(), text, ctx));
    }

    if let Some(r) = ctx.refs.get(text) {
        cur.i = after;
        return Some(link(r.url.clone(), r.title.clone(), text, ctx));
    }
    let href = ctx.interwiki.expand(text)?;
    cur.i = after;
    Some(link(href, None, text, ctx))
}

/// Attempts to parse `![alt](src "title")` or `![alt][id]`.
fn try_parse_bracket_image(cur: &mut Cursor<'_>, ctx: &InlineContext<'_>) -> Option<DocNode> {
    if !cur.starts_with(BracketLink::IMAGE) {
        return None;
    }
    let start = cur.i + BracketLink::IMAGE.len();
    let close = cur.s[start..].find(BracketLink::CLOSE)?;
    let alt = &cur.s[start..start + close];
    let after = start + close + 1;
    let rest = &cur.s[after..];

    if rest.starts_with(BracketLink::URL_OPEN) {
        let (len, src, title) = parse_destination(rest)?;
        cur.i = after + len;
        return Some(image(src, title, alt));
    }
    let (id, len) = reference_id(rest, alt)?;
    let r = ctx.refs.get(id)?;
    cur.i = after + len;
    Some(image(r.url.clone(), r.title.clone(), alt))
}

/// Attempts to parse `<http://...>` or `<user@host>`.
fn try_parse_autolink(cur: &mut Cursor<'_>) -> Option<DocNode> {
    if cur.peek() != Some(BracketLink::AUTOLINK_OPEN) {
        return None;
    }
    let rest = cur.rest();
    let (len, href, text) = if let Some(caps) = AUTOLINK_URL.captures(rest) {
        (caps[0].len(), caps[1].to_string(), caps[1].to_string())
    } else {
        let caps = AUTOLINK_MAIL.captures(rest)?;
        (caps[0].len(), format!("mailto:{}", &caps[1]), caps[1].to_string())
    };
    cur.bump_n(len);
    let mut node = DocNode::new(DocKind::Link).with_content(href);
    node.push(DocNode::text(text));
    Some(node)
}

/// Attempts to parse a bare URL.
///
/// Only recognized after start-of-text, whitespace or light punctuation;
/// trailing punctuation followed by whitespace is left out of the URL. With
/// an escape character in front the URL is emitted as plain text.
fn try_parse_raw_url(cur: &mut Cursor<'_>, escape: Option<char>) -> Option<Matched> {
    if !RawUrl::may_follow(cur.prev()) {
        return None;
    }
    let mut start = cur.i;
    let escaped = match escape {
        Some(e) if cur.peek() == Some(e) => {
            start += e.len_utf8();
            true
        }
        _ => false,
    };
    let rest = &cur.s[start..];
    let len = RawUrl::match_len(rest)?;
    let url = &rest[..len];
    cur.i = start + len;

    if escaped {
        return Some(Matched::Literal(url.to_string()));
    }
    let mut node = DocNode::new(DocKind::Link).with_content(url);
    node.push(DocNode::text(url));
    Some(Matched::Node(node))
}

/// Attempts to parse `<<name(args)|text>>`.
///
/// The scanner only records the call; handlers run at render time.
fn try_parse_macro(cur: &mut Cursor<'_>) -> Option<DocNode> {
    if !cur.starts_with(MacroCall::OPEN) {
        return None;
    }
    let caps = MACRO.captures(cur.rest())?;
    let name = caps[1].to_string();
    let text = caps
        .get(3)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| name.clone());
    cur.bump_n(caps[0].len());

    let mut node = DocNode::new(DocKind::Macro).with_content(name);
    node.args = caps.get(2).map(|m| m.as_str().to_string());
    node.push(DocNode::text(text));
    Some(node)
}

/// Attempts to parse Creole `{{{code}}}`.
fn try_parse_nowiki(cur: &mut Cursor<'_>) -> Option<DocNode> {
    if !cur.starts_with(CodeSpan::NOWIKI_OPEN) {
        return None;
    }
    let caps = NOWIKI.captures(cur.rest())?;
    let code = caps[1].trim().to_string();
    cur.bump_n(caps[0].len());
    Some(DocNode::new(DocKind::Code).with_content(code))
}

/// Attempts to parse a code span delimited by a run of backticks.
///
/// The span closes at the next run of the same length. An unmatched run is
/// consumed as literal text so its tail is not re-read as a shorter span.
fn try_parse_code_span(cur: &mut Cursor<'_>) -> Option<Matched> {
    if cur.peek() != Some(CodeSpan::TICK) {
        return None;
    }
    let rest = cur.rest();
    let run = rest.bytes().take_while(|b| *b == CodeSpan::TICK as u8).count();
    let body = &rest[run..];

    let mut from = 0;
    while let Some(p) = body[from..].find(CodeSpan::TICK) {
        let at = from + p;
        let len = body[at..]
            .bytes()
            .take_while(|b| *b == CodeSpan::TICK as u8)
            .count();
        if len == run {
            let code = body[..at].trim_matches([' ', '\t']).to_string();
            cur.bump_n(run + at + len);
            return Some(Matched::Node(DocNode::new(DocKind::Code).with_content(code)));
        }
        from = at + len;
    }
    cur.bump_n(run);
    Some(Matched::Literal(rest[..run].to_string()))
}

/// Attempts to parse a Creole `{{src|alt}}` image.
fn try_parse_wiki_image(cur: &mut Cursor<'_>, ctx: &InlineContext<'_>) -> Option<DocNode> {
    if !cur.starts_with(WikiImage::OPEN) {
        return None;
    }
    let body_start = cur.i + WikiImage::OPEN.len();
    let rest = &cur.s[body_start..];
    let close = rest.find(WikiImage::CLOSE)?;
    let body = &rest[..close];
    let (target, alt) = match body.split_once(WikiImage::ALIAS) {
        Some((target, alt)) => (target.trim(), alt.trim()),
        None => (body.trim(), ""),
    };
    if target.is_empty() {
        return None;
    }
    cur.i = body_start + close + WikiImage::CLOSE.len();
    let alt = if alt.is_empty() { target } else { alt };
    Some(image(ctx.image_src(target), None, alt))
}

fn try_parse_backslash_break(cur: &mut Cursor<'_>) -> Option<DocNode> {
    if !cur.starts_with("\\\\") {
        return None;
    }
    cur.bump_n(2);
    Some(DocNode::new(DocKind::Break))
}

/// Two or more spaces before a newline make a hard break.
fn try_parse_trailing_space_break(cur: &mut Cursor<'_>) -> Option<DocNode> {
    let rest = cur.rest();
    let spaces = rest.bytes().take_while(|b| *b == b' ').count();
    if spaces < 2 || !rest[spaces..].starts_with('\n') {
        return None;
    }
    cur.bump_n(spaces + 1);
    Some(DocNode::new(DocKind::Break))
}

fn try_parse_escape(
    cur: &mut Cursor<'_>,
    ctx: &InlineContext<'_>,
    escape: char,
) -> Option<Matched> {
    if cur.peek() != Some(escape) {
        return None;
    }
    let next = cur.peek_nth(1)?;
    if !ctx.grammar.is_escapable(next) {
        return None;
    }
    cur.bump();
    cur.bump();
    Some(Matched::Literal(next.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::Flavor;
    use crate::parsing::refs::{InterwikiMap, LinkReferenceTable};
    use pretty_assertions::assert_eq;

    fn scan_with(flavor: Flavor, refs: &LinkReferenceTable, text: &str) -> DocNode {
        let interwiki = InterwikiMap::with_defaults();
        let ctx = InlineContext::new(flavor.grammar(), refs, &interwiki, "#");
        let mut para = DocNode::new(DocKind::Paragraph);
        scan_inline(text, &ctx, &mut para);
        para
    }

    fn scan(flavor: Flavor, text: &str) -> DocNode {
        scan_with(flavor, &LinkReferenceTable::new(), text)
    }

    fn outline(flavor: Flavor, text: &str) -> String {
        scan(flavor, text).outline()
    }

    #[test]
    fn plain_text_is_one_node() {
        let p = scan(Flavor::Creole, "just words");
        assert_eq!(p.children, vec![DocNode::text("just words")]);
    }

    #[test]
    fn empty_text_adds_nothing() {
        assert!(scan(Flavor::Markdown, "").children.is_empty());
    }

    #[test]
    fn creole_strong_and_emphasis_nest() {
        insta::assert_snapshot!(outline(Flavor::Creole, "a **b //c// d** e").trim_end(), @r#"
        paragraph
          text "a "
          strong
            text "b "
            emphasis
              text "c"
            text " d"
          text " e"
        "#);
    }

    #[test]
    fn unclosed_markers_close_at_block_end() {
        let p = scan(Flavor::Creole, "**bold //both");
        assert_eq!(p.children.len(), 1);
        let strong = &p.children[0];
        assert_eq!(strong.kind, DocKind::Strong);
        assert_eq!(strong.children[1].kind, DocKind::Emphasis);
        assert_eq!(p.text_content(), "bold both");
    }

    #[test]
    fn closing_outer_marker_closes_inner() {
        let p = scan(Flavor::Creole, "**a //b** c");
        assert_eq!(p.children[0].kind, DocKind::Strong);
        assert_eq!(p.children[1], DocNode::text(" c"));
    }

    #[test]
    fn wikilink_with_and_without_text() {
        let p = scan(Flavor::Creole, "[[FrontPage]] and [[http://x.org|X]]");
        let links = p.find_all(DocKind::Link);
        assert_eq!(links[0].content, "#FrontPage");
        assert_eq!(links[0].text_content(), "FrontPage");
        assert_eq!(links[1].content, "http://x.org");
        assert_eq!(links[1].text_content(), "X");
    }

    #[test]
    fn link_text_is_not_scanned_for_emphasis_in_creole() {
        let p = scan(Flavor::Creole, "[[Page|**not bold**]]");
        let link = &p.children[0];
        assert!(link.find_all(DocKind::Strong).is_empty());
        assert_eq!(link.text_content(), "**not bold**");
    }

    #[test]
    fn image_inside_link_text() {
        let p = scan(Flavor::Creole, "[[Home|{{logo.png|Logo}}]]");
        let img = p.find_all(DocKind::Image);
        assert_eq!(img.len(), 1);
        assert_eq!(img[0].content, "logo.png");
    }

    #[test]
    fn interwiki_in_both_flavors() {
        for flavor in [Flavor::Creole, Flavor::Markdown] {
            let p = scan(flavor, "See [MeatBall:Test].");
            let links = p.find_all(DocKind::Link);
            assert_eq!(links.len(), 1, "{flavor:?}");
            assert_eq!(links[0].content, "http://www.usemod.com/cgi-bin/mb.pl?Test");
        }
    }

    #[test]
    fn unknown_interwiki_stays_literal() {
        let p = scan(Flavor::Creole, "[Nope:Test]");
        assert_eq!(p.children, vec![DocNode::text("[Nope:Test]")]);
    }

    #[test]
    fn raw_url_respects_surrounding_punctuation() {
        let p = scan(Flavor::Creole, "(see http://example.com/x.y) now. Done");
        let links = p.find_all(DocKind::Link);
        assert_eq!(links[0].content, "http://example.com/x.y");
        assert_eq!(p.text_content(), "(see http://example.com/x.y) now. Done");
    }

    #[test]
    fn raw_url_needs_a_boundary_before() {
        let p = scan(Flavor::Creole, "xhttp://example.com");
        assert!(p.find_all(DocKind::Link).is_empty());
    }

    #[test]
    fn escaped_url_is_text() {
        let p = scan(Flavor::Creole, "~http://example.com");
        assert_eq!(p.children, vec![DocNode::text("http://example.com")]);
    }

    #[test]
    fn url_slashes_are_not_emphasis() {
        let p = scan(Flavor::Creole, "ftp://host/path");
        assert!(p.find_all(DocKind::Emphasis).is_empty());
    }

    #[test]
    fn escape_bypasses_markers() {
        let p = scan(Flavor::Creole, "~**not bold~**");
        assert_eq!(p.children, vec![DocNode::text("**not bold**")]);

        let p = scan(Flavor::Markdown, r"\*not em\* and \q");
        assert_eq!(p.children, vec![DocNode::text(r"*not em* and \q")]);
    }

    #[test]
    fn macro_call_is_recorded_not_run() {
        let p = scan(Flavor::Creole, "<<HelloWorld(a, b)|Greeting>> <<bare>>");
        let macros = p.find_all(DocKind::Macro);
        assert_eq!(macros[0].content, "HelloWorld");
        assert_eq!(macros[0].args.as_deref(), Some("a, b"));
        assert_eq!(macros[0].text_content(), "Greeting");
        assert_eq!(macros[1].content, "bare");
        assert_eq!(macros[1].args, None);
        assert_eq!(macros[1].text_content(), "bare");
    }

    #[test]
    fn nowiki_is_a_raw_zone() {
        let p = scan(Flavor::Creole, "{{{ **x** }}}");
        assert_eq!(p.children, vec![DocNode::new(DocKind::Code).with_content("**x**")]);
    }

    #[test]
    fn creole_image() {
        let p = scan(Flavor::Creole, "{{pic.png|A picture}}");
        let img = &p.children[0];
        assert_eq!(img.kind, DocKind::Image);
        assert_eq!(img.content, "pic.png");
        assert_eq!(img.text_content(), "A picture");
    }

    #[test]
    fn creole_line_break() {
        let p = scan(Flavor::Creole, r"one\\two");
        let kinds: Vec<_> = p.children.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![DocKind::Text, DocKind::Break, DocKind::Text]);
    }

    #[test]
    fn markdown_code_spans() {
        let p = scan(Flavor::Markdown, "use `` a`b `` and `[[x]]`");
        let code = p.find_all(DocKind::Code);
        assert_eq!(code[0].content, "a`b");
        assert_eq!(code[1].content, "[[x]]");
        assert!(p.find_all(DocKind::Link).is_empty());
    }

    #[test]
    fn unmatched_backticks_are_literal() {
        let p = scan(Flavor::Markdown, "``x`");
        assert_eq!(p.children, vec![DocNode::text("``x`")]);
    }

    #[test]
    fn markdown_emphasis_needs_flanking() {
        let p = scan(Flavor::Markdown, "2 * 3 * 4 and *yes*");
        let em = p.find_all(DocKind::Emphasis);
        assert_eq!(em.len(), 1);
        assert_eq!(em[0].text_content(), "yes");
    }

    #[test]
    fn markdown_strong_variants() {
        let p = scan(Flavor::Markdown, "**a** __b__ _c_");
        assert_eq!(p.find_all(DocKind::Strong).len(), 2);
        assert_eq!(p.find_all(DocKind::Emphasis).len(), 1);
    }

    #[test]
    fn markdown_inline_link_with_title() {
        let p = scan(Flavor::Markdown, r#"[an *example*](http://example.com/ "Title")"#);
        let link = &p.children[0];
        assert_eq!(link.content, "http://example.com/");
        assert_eq!(link.title.as_deref(), Some("Title"));
        assert_eq!(link.find_all(DocKind::Emphasis).len(), 1);
    }

    #[test]
    fn markdown_reference_links() {
        let mut refs = LinkReferenceTable::new();
        refs.insert("Ex", "http://example.com/", Some("Example".into()));
        let p = scan_with(Flavor::Markdown, &refs, "[one][ex], [Ex][], [ex] and [two][missing]");
        let links = p.find_all(DocKind::Link);
        assert_eq!(links.len(), 3);
        assert!(links.iter().all(|l| l.content == "http://example.com/"));
        assert!(p.text_content().ends_with("and [two][missing]"));
    }

    #[test]
    fn explicit_empty_link() {
        let p = scan(Flavor::Markdown, "[]()");
        assert_eq!(p.children[0].kind, DocKind::Link);
        assert_eq!(p.children[0].content, "");
    }

    #[test]
    fn markdown_images() {
        let mut refs = LinkReferenceTable::new();
        refs.insert("logo", "/logo.png", None);
        let p = scan_with(Flavor::Markdown, &refs, r#"![Alt](/a.png "T") ![Logo][logo]"#);
        let imgs = p.find_all(DocKind::Image);
        assert_eq!(imgs[0].content, "/a.png");
        assert_eq!(imgs[0].title.as_deref(), Some("T"));
        assert_eq!(imgs[1].content, "/logo.png");
        assert_eq!(imgs[1].text_content(), "Logo");
    }

    #[test]
    fn markdown_autolinks() {
        let p = scan(Flavor::Markdown, "<http://x.org/a> <me@example.com>");
        let links = p.find_all(DocKind::Link);
        assert_eq!(links[0].content, "http://x.org/a");
        assert_eq!(links[1].content, "mailto:me@example.com");
        assert_eq!(links[1].text_content(), "me@example.com");
    }

    #[test]
    fn markdown_trailing_space_break() {
        let p = scan(Flavor::Markdown, "one  \ntwo\nthree");
        let kinds: Vec<_> = p.children.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![DocKind::Text, DocKind::Break, DocKind::Text]);
        assert_eq!(p.children[2].content, "two\nthree");
    }
}
