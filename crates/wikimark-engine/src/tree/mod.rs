//! # Document tree
//!
//! [`DocNode`] is the owned tree handed to renderers; [`TreeBuilder`]
//! assembles it from block units, running the inline scanner over each
//! non-verbatim block.

pub mod builder;
pub mod invariants;
pub mod node;

pub use builder::TreeBuilder;
pub use invariants::violations;
pub use node::{DocKind, DocNode, ListKind};
