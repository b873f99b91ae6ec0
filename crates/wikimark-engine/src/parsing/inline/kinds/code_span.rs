pub struct CodeSpan;

impl CodeSpan {
    pub const TICK: char = '`';
    /// Creole inline no-wiki delimiters.
    pub const NOWIKI_OPEN: &'static str = "{{{";
    pub const NOWIKI_CLOSE: &'static str = "}}}";
}
