pub struct HtmlBlock;

impl HtmlBlock {
    /// Block-level tags that open a raw HTML block at column zero.
    pub const TAGS: [&'static str; 22] = [
        "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "table", "dl", "ol",
        "ul", "script", "noscript", "form", "fieldset", "iframe", "math", "ins", "del",
    ];
    pub const COMMENT: &'static str = "<!--";
    pub const RULE: &'static str = "hr";

    pub fn opens(line: &str) -> bool {
        if line.starts_with(Self::COMMENT) {
            return true;
        }
        let Some(rest) = line.strip_prefix('<') else {
            return false;
        };
        let name: String = rest
            .chars()
            .take_while(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_lowercase();
        if name != Self::RULE && !Self::TAGS.contains(&name.as_str()) {
            return false;
        }
        matches!(
            rest[name.len()..].chars().next(),
            None | Some('>' | '/' | ' ' | '\t')
        )
    }
}
