pub mod lines;
pub mod span;

pub use lines::{LineRef, expand_tabs, lines_with_spans};
pub use span::Span;
