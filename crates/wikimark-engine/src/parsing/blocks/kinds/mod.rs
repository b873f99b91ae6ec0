//! # Block Kinds
//!
//! Block-specific types that own their delimiter knowledge. The classifier,
//! grammars and segmenter ask these types whether a line opens, continues or
//! closes a block; none of them hardcode `{{{`, `>` or `|` themselves.
//!
//! ## Types
//!
//! - **`BlockQuote`**: `PREFIX = '>'`, strips one quoting level per line
//! - **`CodeFence`**: Creole `{{{`/`}}}` and Markdown ```` ``` ````/`~~~` fences
//! - **`Heading`**: Creole `=`, ATX `#` and Setext underlines
//! - **`HtmlBlock`**: block-level tags that start a raw HTML block
//! - **`LinkDefinition`**: `[id]: url "title"` reference lines
//! - **`List`**: Creole `*`/`#` runs and Markdown bullets/numbers
//! - **`Rule`**: horizontal rules
//! - **`Table`**: `|`-delimited rows and `=` header cells

pub mod block_quote;
pub mod code_fence;
pub mod heading;
pub mod html_block;
pub mod link_def;
pub mod list;
pub mod rule;
pub mod table;

pub use block_quote::BlockQuote;
pub use code_fence::{CodeFence, FenceKind, FenceOpen};
pub use heading::Heading;
pub use html_block::HtmlBlock;
pub use link_def::LinkDefinition;
pub use list::{List, ListMarker};
pub use rule::Rule;
pub use table::{Table, TableCell};
