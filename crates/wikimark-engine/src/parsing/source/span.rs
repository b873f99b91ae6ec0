/// A byte range `[start, end)` into the text handed to the segmenter.
///
/// Block units keep the span of the source lines they were built from so a
/// host editor can map a rendered block back to the text it came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Slices `text` with this span, clamped to the text length.
    pub fn slice(self, text: &str) -> &str {
        let end = self.end.min(text.len());
        text.get(self.start.min(end)..end).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_joins_spans() {
        let a = Span::new(2, 5);
        let b = Span::new(7, 9);
        assert_eq!(a.cover(b), Span::new(2, 9));
        assert_eq!(b.cover(a), Span::new(2, 9));
    }

    #[test]
    fn slice_is_clamped() {
        assert_eq!(Span::new(1, 3).slice("abcd"), "bc");
        assert_eq!(Span::new(2, 10).slice("abcd"), "cd");
        assert_eq!(Span::new(8, 10).slice("abcd"), "");
    }

    #[test]
    fn empty_span() {
        assert!(Span::new(4, 4).is_empty());
        assert!(Span::new(5, 4).is_empty());
        assert_eq!(Span::new(5, 4).len(), 0);
    }
}
