use super::span::Span;

/// A reference to a single source line with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef<'a> {
    /// Byte span of this line (includes the line terminator if present).
    pub span: Span,
    /// The line text without its `\n` / `\r\n` terminator.
    pub text: &'a str,
}

/// Returns an iterator over lines with their byte spans.
///
/// Terminators stay inside the spans so consecutive spans tile the input
/// exactly; the `text` field has them stripped.
pub fn lines_with_spans(text: &str) -> impl Iterator<Item = LineRef<'_>> + '_ {
    let mut offset = 0usize;
    text.split_inclusive('\n').map(move |line| {
        let start = offset;
        offset += line.len();
        LineRef {
            span: Span { start, end: offset },
            text: line.trim_end_matches(['\r', '\n']),
        }
    })
}

/// Expands tabs to the next multiple of four columns.
pub fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + 8);
    let mut col = 0usize;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = 4 - (col % 4);
            out.extend(std::iter::repeat_n(' ', pad));
            col += pad;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_tile_the_input() {
        let src = "one\r\ntwo\n\nthree";
        let lines: Vec<_> = lines_with_spans(src).collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].text, "one");
        assert_eq!(lines[0].span, Span::new(0, 5));
        assert_eq!(lines[2].text, "");
        assert_eq!(lines[3].text, "three");
        assert_eq!(lines[3].span.end, src.len());
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert_eq!(lines_with_spans("").count(), 0);
    }

    #[test]
    fn tabs_expand_to_four_columns() {
        assert_eq!(expand_tabs("\tcode"), "    code");
        assert_eq!(expand_tabs("ab\tc"), "ab  c");
        assert_eq!(expand_tabs("plain"), "plain");
    }
}
