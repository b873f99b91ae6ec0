pub mod blocks;
pub mod grammar;
pub mod inline;
pub mod refs;
pub mod source;

use log::debug;

use blocks::{BlockUnit, Segmenter, segment_with};
use inline::InlineContext;

use crate::tree::{DocNode, TreeBuilder};

pub use grammar::{Flavor, Grammar};
pub use refs::{InterwikiMap, LinkRef, LinkReferenceTable};

/// Options for a single parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub flavor: Flavor,
    pub interwiki: InterwikiMap,
    /// Prefix prepended to internal page names in link targets.
    pub link_format: String,
    /// Group content under `section` nodes by heading level.
    pub sections: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            flavor: Flavor::default(),
            interwiki: InterwikiMap::with_defaults(),
            link_format: "#".to_string(),
            sections: false,
        }
    }
}

impl ParseOptions {
    pub fn new(flavor: Flavor) -> Self {
        Self {
            flavor,
            ..Self::default()
        }
    }

    pub fn with_interwiki(mut self, interwiki: InterwikiMap) -> Self {
        self.interwiki = interwiki;
        self
    }

    pub fn with_link_format(mut self, link_format: impl Into<String>) -> Self {
        self.link_format = link_format.into();
        self
    }

    pub fn with_sections(mut self, sections: bool) -> Self {
        self.sections = sections;
        self
    }
}

/// Parses `text` into a document tree.
///
/// Never fails: any input yields a `document` root. Link definitions are
/// collected per call and never leak into another parse.
pub fn parse(text: &str, options: &ParseOptions) -> DocNode {
    let grammar = options.flavor.grammar();
    let (units, refs) = Segmenter::new(grammar).run_with_refs(text);
    debug!(
        "parsed {} block unit(s) with {} link definition(s) ({})",
        units.len(),
        refs.len(),
        options.flavor.name()
    );

    let ctx = InlineContext::new(grammar, &refs, &options.interwiki, &options.link_format);
    let mut builder = TreeBuilder::new(ctx, options.sections);
    for unit in &units {
        builder.push(unit);
    }
    builder.finish()
}

/// Splits `text` into block units without building a tree. Link
/// definition lines are consumed and do not appear as units.
pub fn segment(text: &str, options: &ParseOptions) -> Vec<BlockUnit> {
    segment_with(text, options.flavor.grammar())
}
