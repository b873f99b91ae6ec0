pub struct Rule;

impl Rule {
    /// Creole separator: exactly four dashes on their own line.
    pub const CREOLE: &'static str = "----";
    pub const MARKDOWN_CHARS: [char; 3] = ['*', '-', '_'];
    pub const MARKDOWN_MIN: usize = 3;

    pub fn creole(line: &str) -> bool {
        line.trim() == Self::CREOLE
    }

    /// Three or more of the same `*`, `-` or `_`, optionally space separated,
    /// with at most two spaces of indentation.
    pub fn markdown(line: &str) -> bool {
        let indent = line.bytes().take_while(|b| *b == b' ').count();
        if indent > 2 {
            return false;
        }
        let body = line.trim();
        let Some(mark) = body.chars().next() else {
            return false;
        };
        if !Self::MARKDOWN_CHARS.contains(&mark) {
            return false;
        }
        let mut count = 0usize;
        for c in body.chars() {
            match c {
                c if c == mark => count += 1,
                ' ' | '\t' => {}
                _ => return false,
            }
        }
        count >= Self::MARKDOWN_MIN
    }
}
