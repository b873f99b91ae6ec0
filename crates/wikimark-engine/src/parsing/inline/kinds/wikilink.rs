pub struct WikiLink;

impl WikiLink {
    pub const OPEN: &'static str = "[[";
    pub const CLOSE: &'static str = "]]";
    pub const ALIAS: char = '|';
    /// Single-bracket interwiki shortcut delimiters.
    pub const SHORT_OPEN: char = '[';
    pub const SHORT_CLOSE: char = ']';
}
