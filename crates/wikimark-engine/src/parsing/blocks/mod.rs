//! # Block Segmentation
//!
//! Two-phase, line-oriented block parsing.
//!
//! ## Parsing Phases
//!
//! 1. **Line Classification** (`classify`): each line is normalized by the
//!    active grammar and classified into a `LineClass` holding local facts
//!    (indentation, blank status)
//!
//! 2. **Segmentation** (`segmenter`): a `Segmenter` state machine keeps one
//!    open leaf plus the list context and emits ordered `BlockUnit`s
//!
//! ## Modules
//!
//! - **`types`**: `BlockUnit` and `BlockKind`
//! - **`kinds`**: block types owning their delimiters (fences, quotes, lists...)
//! - **`classify`**: `LineClassifier` produces a `LineClass` for each line
//! - **`open`**: `try_open` dispatch over block openers in priority order
//! - **`segmenter`**: the `Segmenter` state machine
//!
//! ## Key Invariants
//!
//! - The segmenter never rejects input; unmatched lines become paragraph text
//! - Preformatted blocks are raw zones: no block or inline parsing inside
//! - Link definitions are collected only from lines no verbatim block owns
//! - An unterminated fence is closed at end of input
//! - Quote content is segmented recursively with the same grammar

pub mod classify;
pub mod kinds;
pub mod open;
pub mod segmenter;
pub mod types;

pub use classify::{LineClass, LineClassifier};
pub use segmenter::Segmenter;
pub use types::{BlockKind, BlockUnit};

use crate::parsing::grammar::Grammar;

/// Splits `text` into block units using `grammar`.
pub fn segment_with(text: &str, grammar: &dyn Grammar) -> Vec<BlockUnit> {
    Segmenter::new(grammar).run(text)
}
