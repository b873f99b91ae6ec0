/// A cursor for character-by-character inline parsing.
///
/// Tracks a byte index into `s` that always sits on a char boundary.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being parsed.
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    /// Returns true if at end of string.
    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// The unconsumed remainder.
    pub fn rest(&self) -> &'a str {
        self.s.get(self.i..).unwrap_or("")
    }

    /// Peeks at the current character without advancing.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Peeks at the character `n` characters ahead.
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// The character just before the cursor.
    pub fn prev(&self) -> Option<char> {
        self.s.get(..self.i)?.chars().next_back()
    }

    pub fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    /// Advances by one character, returning it.
    pub fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.i += ch.len_utf8();
        Some(ch)
    }

    /// Advances by `n` bytes. Callers pass lengths of matched text, so the
    /// cursor stays on a char boundary.
    pub fn bump_n(&mut self, n: usize) {
        self.i = (self.i + n).min(self.s.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("hello");
        assert_eq!(cur.pos(), 0);
        assert!(!cur.eof());
        assert_eq!(cur.peek(), Some('h'));
        assert_eq!(cur.bump(), Some('h'));
        assert_eq!(cur.pos(), 1);
        assert_eq!(cur.prev(), Some('h'));
    }

    #[test]
    fn multibyte_characters() {
        let mut cur = Cursor::new("é**");
        assert_eq!(cur.bump(), Some('é'));
        assert_eq!(cur.pos(), 2);
        assert!(cur.starts_with("**"));
        assert_eq!(cur.prev(), Some('é'));
    }

    #[test]
    fn empty_string_input() {
        let cur = Cursor::new("");
        assert!(cur.eof());
        assert_eq!(cur.peek(), None);
        assert_eq!(cur.prev(), None);
        assert_eq!(cur.rest(), "");
    }

    #[test]
    fn bump_n_clamps_at_end() {
        let mut cur = Cursor::new("hi");
        cur.bump_n(10);
        assert!(cur.eof());
        assert_eq!(cur.peek(), None);
        assert_eq!(cur.bump(), None);
    }

    #[test]
    fn peek_nth_looks_ahead() {
        let cur = Cursor::new("abc");
        assert_eq!(cur.peek_nth(2), Some('c'));
        assert_eq!(cur.peek_nth(3), None);
    }
}
