//! Toolbar editing over a plain text buffer.
//!
//! A command runs against a [`Chunk`]: the buffer split into the text
//! before the selection, the selection itself and the text after it, plus
//! two tag slots where markup found around the selection is parked while
//! the command decides whether to add or remove it. Reassembling the chunk
//! with [`Chunk::into_state`] yields the new buffer and selection.

pub mod chunk;
pub mod commands;
pub mod link_defs;

use std::ops::Range;

use crate::parsing::Flavor;

pub use chunk::{Chunk, ChunkError, TagPattern};
pub use commands::{Command, apply};
pub use link_defs::{add_link_def, fix_eol, fix_url};

/// Buffer contents and selection after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub text: String,
    /// Byte range of the selection in `text`.
    pub selection: Range<usize>,
    pub scroll_top: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    /// Column limit used when commands reflow the selection.
    pub line_length: usize,
    pub flavor: Flavor,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            line_length: 40,
            flavor: Flavor::default(),
        }
    }
}

impl EditorOptions {
    pub fn new(flavor: Flavor) -> Self {
        Self {
            flavor,
            ..Self::default()
        }
    }
}
