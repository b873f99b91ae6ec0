//! # Inline scanning
//!
//! Turns the text of one block into inline nodes: links, images, macros,
//! code, strong/emphasis and breaks. The rules a grammar enables are tried
//! in its precedence order at every position; see [`scan_inline`].
//!
//! Recognizers live in `parser.rs` as `try_parse_*` functions over a
//! [`cursor::Cursor`]. Each one either consumes a construct or leaves the
//! cursor untouched. Delimiters come from the structs in [`kinds`].

pub mod context;
pub mod cursor;
pub mod kinds;
pub mod parser;
pub mod rules;

pub use context::InlineContext;
pub use parser::scan_inline;
pub use rules::InlineRule;
