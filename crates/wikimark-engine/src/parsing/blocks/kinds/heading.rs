pub struct Heading;

impl Heading {
    /// Creole heading marker, repeated once per level.
    pub const CREOLE_MARK: char = '=';
    /// ATX (hash-style) heading marker.
    pub const ATX_MARK: char = '#';
    pub const MAX_LEVEL: usize = 6;

    /// `== Title ==`: level from the opening run, closing run optional.
    pub fn creole(line: &str) -> Option<(usize, String)> {
        let t = line.trim_start();
        let marks = t.chars().take_while(|c| *c == Self::CREOLE_MARK).count();
        if marks == 0 {
            return None;
        }
        let text = t[marks..]
            .trim()
            .trim_end_matches(Self::CREOLE_MARK)
            .trim_end();
        Some((marks.min(Self::MAX_LEVEL), text.to_string()))
    }

    /// `## Title ##`: one to six hashes at column zero, trailing hashes dropped.
    pub fn atx(line: &str) -> Option<(usize, String)> {
        let marks = line
            .chars()
            .take_while(|c| *c == Self::ATX_MARK)
            .take(Self::MAX_LEVEL)
            .count();
        if marks == 0 {
            return None;
        }
        let rest = line[marks..].trim();
        if rest.is_empty() {
            return None;
        }
        let text = rest.trim_end_matches(Self::ATX_MARK).trim_end();
        let text = if text.is_empty() { rest } else { text };
        Some((marks, text.to_string()))
    }

    /// Setext underline: `===` gives level 1, `---` level 2.
    pub fn setext(line: &str) -> Option<usize> {
        let t = line.trim_end();
        if t.is_empty() {
            return None;
        }
        if t.chars().all(|c| c == '=') {
            Some(1)
        } else if t.chars().all(|c| c == '-') {
            Some(2)
        } else {
            None
        }
    }
}
