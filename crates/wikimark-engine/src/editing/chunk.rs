use std::sync::LazyLock;

use log::warn;
use regex::{Captures, Regex};

use super::EditState;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("selection {start}..{end} is out of range for text of length {len}")]
    OutOfRange { start: usize, end: usize, len: usize },
    #[error("selection offset {0} is not on a character boundary")]
    NotCharBoundary(usize),
}

/// Line prefixes that mark a line as markup (indented code, quote, list
/// item, heading underline, link definition). Wrapping never joins or
/// splits such lines.
static MARKUP_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\s{4,}|\s*>|\s*-\s+|\s*\d+\.|=|\+|-|_|\*|#|\s*\[[^\n\]]+\]:)")
        .expect("invalid markup prefix regex")
});

/// A tag regex compiled twice: anchored at the end of a region and at the
/// start of one.
#[derive(Debug, Clone)]
pub struct TagPattern {
    at_end: Regex,
    at_start: Regex,
}

impl TagPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            at_end: Regex::new(&format!("(?:{pattern})$"))?,
            at_start: Regex::new(&format!("^(?:{pattern})"))?,
        })
    }
}

/// The editor buffer split around the selection.
///
/// `before + start_tag + selection + end_tag + after` is always a
/// rearrangement-free view of the buffer: operations that only move text
/// between regions keep that concatenation unchanged. Commands then edit
/// the regions deliberately to add or remove markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    pub before: String,
    pub start_tag: String,
    pub selection: String,
    pub end_tag: String,
    pub after: String,
    /// Opaque host value carried through unchanged.
    pub scroll_top: u64,
}

impl Chunk {
    /// Splits `text` at the byte range `start..end`.
    pub fn new(text: &str, start: usize, end: usize, scroll_top: u64) -> Result<Self, ChunkError> {
        if start > end || end > text.len() {
            return Err(ChunkError::OutOfRange {
                start,
                end,
                len: text.len(),
            });
        }
        for offset in [start, end] {
            if !text.is_char_boundary(offset) {
                return Err(ChunkError::NotCharBoundary(offset));
            }
        }
        Ok(Self {
            before: text[..start].to_string(),
            start_tag: String::new(),
            selection: text[start..end].to_string(),
            end_tag: String::new(),
            after: text[end..].to_string(),
            scroll_top,
        })
    }

    /// The reassembled buffer.
    pub fn text(&self) -> String {
        [
            self.before.as_str(),
            &self.start_tag,
            &self.selection,
            &self.end_tag,
            &self.after,
        ]
        .concat()
    }

    /// Reassembles the buffer; tags join the text around the selection.
    pub fn into_state(self) -> EditState {
        let start = self.before.len() + self.start_tag.len();
        let end = start + self.selection.len();
        EditState {
            text: self.text(),
            selection: start..end,
            scroll_top: self.scroll_top,
        }
    }

    /// Moves markup matching `start` from the end of `before` and the
    /// start of `selection` into `start_tag`, and markup matching `end`
    /// from the end of `selection` and the start of `after` into `end_tag`.
    pub fn find_tags(&mut self, start: Option<&TagPattern>, end: Option<&TagPattern>) {
        if let Some(p) = start {
            if let Some(m) = p.at_end.find(&self.before) {
                let tag = self.before.split_off(m.start());
                self.start_tag.insert_str(0, &tag);
            }
            if let Some(m) = p.at_start.find(&self.selection) {
                let tag: String = self.selection.drain(..m.end()).collect();
                self.start_tag.push_str(&tag);
            }
        }
        if let Some(p) = end {
            if let Some(m) = p.at_end.find(&self.selection) {
                let tag = self.selection.split_off(m.start());
                self.end_tag.insert_str(0, &tag);
            }
            if let Some(m) = p.at_start.find(&self.after) {
                let tag: String = self.after.drain(..m.end()).collect();
                self.end_tag.push_str(&tag);
            }
        }
    }

    /// Strips whitespace from both ends of the selection. With `remove`
    /// false it moves to `before`/`after`; otherwise it is dropped.
    pub fn trim_whitespace(&mut self, remove: bool) {
        let lead = self.selection.len() - self.selection.trim_start().len();
        let leading: String = self.selection.drain(..lead).collect();
        let keep = self.selection.trim_end().len();
        let trailing = self.selection.split_off(keep);
        if !remove {
            self.before.push_str(&leading);
            self.after.insert_str(0, &trailing);
        }
    }

    /// Normalizes the newlines between the selection and its surroundings
    /// so at least `n_before` blank lines precede it and `n_after` follow
    /// it. With `exact` the existing newlines are replaced outright.
    pub fn add_blank_lines(&mut self, n_before: usize, n_after: usize, exact: bool) {
        let n_before = n_before + 1;
        let n_after = n_after + 1;

        let lead = leading_newlines(&self.selection);
        let moved: String = self.selection.drain(..lead).collect();
        self.start_tag.push_str(&moved);
        let trail = trailing_newlines(&self.selection);
        let moved = self.selection.split_off(self.selection.len() - trail);
        self.end_tag.insert_str(0, &moved);

        let lead = leading_newlines(&self.start_tag);
        let moved: String = self.start_tag.drain(..lead).collect();
        self.before.push_str(&moved);
        let trail = trailing_newlines(&self.end_tag);
        let moved = self.end_tag.split_off(self.end_tag.len() - trail);
        self.after.insert_str(0, &moved);

        if !self.before.is_empty() {
            let have = trailing_newlines(&self.before);
            let drop = if exact { have } else { have.min(n_before) };
            self.before.truncate(self.before.len() - drop);
            self.before.push_str(&"\n".repeat(n_before));
        }
        if !self.after.is_empty() {
            let have = leading_newlines(&self.after);
            let drop = if exact { have } else { have.min(n_after) };
            self.after.replace_range(..drop, &"\n".repeat(n_after));
        }
    }

    /// Reflows the selection to lines of at most `len` characters. Lines
    /// opening with a markup prefix are left as they are.
    pub fn wrap_lines(&mut self, len: usize) {
        self.unwrap_lines();
        let pattern = format!(r"(?m)(.{{1,{}}})( +|$\n?)", len.max(1));
        let re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(e) => {
                warn!("cannot wrap at {len} columns: {e}");
                return;
            }
        };
        let wrapped = re.replace_all(&self.selection, |caps: &Captures| {
            if MARKUP_PREFIX.is_match(&caps[0]) {
                caps[0].to_string()
            } else {
                format!("{}\n", &caps[1])
            }
        });
        self.selection = wrapped.trim_end().to_string();
    }

    /// Joins soft-wrapped lines of the selection with spaces. Blank lines
    /// and lines opening with a markup prefix stay on their own line.
    pub fn unwrap_lines(&mut self) {
        let src = std::mem::take(&mut self.selection);
        let mut out = String::with_capacity(src.len());
        let mut prev: Option<char> = None;
        for (i, ch) in src.char_indices() {
            let joins = ch == '\n'
                && prev.is_some_and(|p| p != '\n')
                && !src[i + 1..].starts_with('\n')
                && !MARKUP_PREFIX.is_match(&src[i + 1..]);
            out.push(if joins { ' ' } else { ch });
            prev = Some(ch);
        }
        self.selection = out;
    }
}

fn leading_newlines(s: &str) -> usize {
    s.bytes().take_while(|b| *b == b'\n').count()
}

fn trailing_newlines(s: &str) -> usize {
    s.bytes().rev().take_while(|b| *b == b'\n').count()
}
