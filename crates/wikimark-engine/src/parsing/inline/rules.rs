/// One inline recognition rule. A grammar lists the rules it uses in
/// precedence order; at each cursor position the first rule that matches
/// wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineRule {
    /// `[[target|text]]`
    WikiLink,
    /// `[text](url "title")`, `[text][id]`, `[text]`
    BracketLink,
    /// `[Prefix:Suffix]` through the interwiki table.
    InterwikiShortcut,
    /// `<http://...>` and `<user@host>`
    AngleLink,
    /// A bare URL; `escape` before it keeps it literal.
    RawUrl { escape: Option<char> },
    /// `<<name(args)|text>>`
    Macro,
    /// `{{{code}}}`
    NoWiki,
    /// `` `code` `` with any backtick run length.
    CodeSpan,
    /// `{{src|alt}}`
    WikiImage,
    /// `![alt](src "title")`, `![alt][id]`
    BracketImage,
    /// Toggles a `strong` node.
    Strong(&'static str),
    /// Toggles an `emphasis` node.
    Emphasis(&'static str),
    /// `\\`
    BackslashBreak,
    /// Two or more spaces before a newline.
    TrailingSpaceBreak,
    /// Makes the following character literal.
    Escape(char),
}
