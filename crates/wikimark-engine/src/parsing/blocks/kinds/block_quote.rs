/// Blockquote block type with owned delimiter constant.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: char = '>';

    /// Most spaces allowed before the prefix.
    pub const MAX_INDENT: usize = 3;

    /// Strips exactly one level of quoting from a line.
    ///
    /// Accepts up to three leading spaces, the `>` itself and at most one
    /// following space or tab. Returns the remainder, which may itself start
    /// with another `>` for nested quotes.
    pub fn strip_one(line: &str) -> Option<&str> {
        let indent = line.bytes().take_while(|b| *b == b' ').count();
        if indent > Self::MAX_INDENT {
            return None;
        }
        let rest = line[indent..].strip_prefix(Self::PREFIX)?;
        Some(
            rest.strip_prefix(' ')
                .or_else(|| rest.strip_prefix('\t'))
                .unwrap_or(rest),
        )
    }

    pub fn is_quote(line: &str) -> bool {
        Self::strip_one(line).is_some()
    }
}
