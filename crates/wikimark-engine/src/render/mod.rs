//! # Rendering
//!
//! Walks a finished [`DocNode`](crate::tree::DocNode) tree and emits an
//! HTML fragment, dispatching macro placeholders as it goes.

pub mod html;

pub use html::{HtmlRenderer, render_html};
