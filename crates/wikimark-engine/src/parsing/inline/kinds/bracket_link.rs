pub struct BracketLink;

impl BracketLink {
    pub const OPEN: char = '[';
    pub const CLOSE: char = ']';
    pub const IMAGE: &'static str = "![";
    pub const URL_OPEN: char = '(';
    pub const URL_CLOSE: char = ')';
    pub const AUTOLINK_OPEN: char = '<';
    pub const AUTOLINK_CLOSE: char = '>';
}
