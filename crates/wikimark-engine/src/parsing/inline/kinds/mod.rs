//! # Inline Kinds
//!
//! Inline-specific types that own their syntax delimiters. The parser calls
//! these constants; it never hardcodes `[[`, `{{{` or `<<` itself.
//!
//! ## Types
//!
//! - **`WikiLink`**: `[[target|text]]` and single-bracket interwiki shortcuts
//! - **`BracketLink`**: Markdown `[text](url)` / `[text][id]` / `![alt](src)`
//! - **`Emphasis`**: `//` guard against `scheme://` lookalikes
//! - **`CodeSpan`**: `` ` `` runs and Creole `{{{ }}}`, raw zones
//! - **`WikiImage`**: `{{src|alt}}`
//! - **`MacroCall`**: `<<name(args)|text>>`
//! - **`RawUrl`**: scheme list and the punctuation that may surround a URL

pub mod bracket_link;
pub mod code_span;
pub mod emphasis;
pub mod macro_call;
pub mod raw_url;
pub mod wiki_image;
pub mod wikilink;

pub use bracket_link::BracketLink;
pub use code_span::CodeSpan;
pub use emphasis::Emphasis;
pub use macro_call::MacroCall;
pub use raw_url::RawUrl;
pub use wiki_image::WikiImage;
pub use wikilink::WikiLink;
