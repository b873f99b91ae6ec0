use crate::parsing::grammar::Grammar;
use crate::parsing::source::{LineRef, Span};

/// Classification of a single line containing only local facts.
///
/// This is phase 1 of block parsing: each line is classified independently
/// without reference to surrounding context.
#[derive(Debug, Clone)]
pub struct LineClass {
    /// Full byte span of this line.
    pub line: Span,
    /// Line text after the grammar's normalization (tab expansion).
    pub text: String,
    /// Whether the line is blank (whitespace only).
    pub is_blank: bool,
    /// Width of the leading whitespace.
    pub indent: usize,
}

impl LineClass {
    /// Text with the first `n` columns of indentation removed.
    pub fn outdent(&self, n: usize) -> &str {
        let strip = self.indent.min(n);
        self.text.get(strip..).unwrap_or("")
    }
}

/// Classifies individual lines for the block segmenter.
pub struct LineClassifier<'g> {
    grammar: &'g dyn Grammar,
}

impl<'g> LineClassifier<'g> {
    pub fn new(grammar: &'g dyn Grammar) -> Self {
        Self { grammar }
    }

    pub fn classify(&self, lr: &LineRef<'_>) -> LineClass {
        let text = self.grammar.prepare_line(lr.text);
        let indent = text.bytes().take_while(|b| *b == b' ' || *b == b'\t').count();
        LineClass {
            line: lr.span,
            is_blank: text.trim().is_empty(),
            indent,
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::Flavor;
    use crate::parsing::source::lines_with_spans;

    fn classify(flavor: Flavor, src: &str) -> Vec<LineClass> {
        let classifier = LineClassifier::new(flavor.grammar());
        lines_with_spans(src).map(|lr| classifier.classify(&lr)).collect()
    }

    #[test]
    fn blank_and_indent() {
        let lines = classify(Flavor::Creole, "  text\n   \n");
        assert_eq!(lines[0].indent, 2);
        assert!(!lines[0].is_blank);
        assert!(lines[1].is_blank);
    }

    #[test]
    fn markdown_expands_tabs() {
        let lines = classify(Flavor::Markdown, "\tcode\n");
        assert_eq!(lines[0].text, "    code");
        assert_eq!(lines[0].indent, 4);
        assert_eq!(lines[0].outdent(4), "code");
    }

    #[test]
    fn creole_keeps_tabs() {
        let lines = classify(Flavor::Creole, "\tx");
        assert_eq!(lines[0].text, "\tx");
        assert_eq!(lines[0].indent, 1);
    }
}
