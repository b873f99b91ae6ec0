pub struct Emphasis;

impl Emphasis {
    /// Creole emphasis marker.
    pub const SLASHES: &'static str = "//";
    /// `//` right after this character belongs to a URL, not emphasis.
    pub const URL_COLON: char = ':';

    /// Whether a marker at this position is ruled out by the character
    /// before it.
    pub fn blocked(marker: &str, prev: Option<char>) -> bool {
        marker == Self::SLASHES && prev == Some(Self::URL_COLON)
    }
}
