pub struct RawUrl;

impl RawUrl {
    /// Schemes recognized in bare URLs. Longer names come first so `https`
    /// is not read as `http`.
    pub const PROTOCOLS: [&'static str; 9] = [
        "https", "http", "ftp", "nntp", "news", "mailto", "telnet", "file", "irc",
    ];
    /// Characters allowed right before a URL (besides whitespace).
    pub const LEADING: &'static str = ".,:;!?()/=";
    /// Characters that end a URL when followed by whitespace or the end.
    pub const TRAILING: &'static str = ",.:;!?()";

    pub fn may_follow(prev: Option<char>) -> bool {
        prev.is_none_or(|c| c.is_whitespace() || Self::LEADING.contains(c))
    }

    /// The scheme `s` starts with, including its `:`.
    pub fn scheme(s: &str) -> Option<&'static str> {
        Self::PROTOCOLS
            .iter()
            .find(|p| s.starts_with(*p) && s[p.len()..].starts_with(':'))
            .copied()
    }

    /// Byte length of the URL at the start of `s`, or `None` if `s` does not
    /// start with a recognized scheme followed by at least one character.
    pub fn match_len(s: &str) -> Option<usize> {
        let scheme = Self::scheme(s)?;
        let after = scheme.len() + 1;
        let first = s[after..].chars().next()?;
        if first.is_whitespace() {
            return None;
        }
        let start = after + first.len_utf8();
        let mut chars = s[start..].char_indices().peekable();
        while let Some((idx, ch)) = chars.next() {
            if ch.is_whitespace() {
                return Some(start + idx);
            }
            if Self::TRAILING.contains(ch) {
                let next = chars.peek().map(|(_, c)| *c);
                if next.is_none_or(char::is_whitespace) {
                    return Some(start + idx);
                }
            }
        }
        Some(s.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_stops_before_trailing_punctuation() {
        let s = "http://example.com/a.b. next";
        assert_eq!(&s[..RawUrl::match_len(s).unwrap()], "http://example.com/a.b");
    }

    #[test]
    fn url_runs_to_end() {
        let s = "https://x.org/?q=1";
        assert_eq!(RawUrl::match_len(s), Some(s.len()));
    }

    #[test]
    fn inner_punctuation_is_kept() {
        let s = "http://x.org/(a),b rest";
        assert_eq!(&s[..RawUrl::match_len(s).unwrap()], "http://x.org/(a),b");
    }

    #[test]
    fn unknown_scheme_or_empty_url() {
        assert_eq!(RawUrl::match_len("gopher://x"), None);
        assert_eq!(RawUrl::match_len("http: x"), None);
        assert_eq!(RawUrl::match_len("http:"), None);
    }

    #[test]
    fn leading_context() {
        assert!(RawUrl::may_follow(None));
        assert!(RawUrl::may_follow(Some(' ')));
        assert!(RawUrl::may_follow(Some('(')));
        assert!(!RawUrl::may_follow(Some('x')));
    }
}
