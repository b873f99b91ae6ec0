use crate::parsing::grammar::Grammar;
use crate::parsing::refs::{InterwikiMap, LinkReferenceTable};

use super::kinds::RawUrl;
use super::rules::InlineRule;

/// Everything the inline scanner consults besides the text itself.
#[derive(Clone, Copy)]
pub struct InlineContext<'a> {
    pub grammar: &'a dyn Grammar,
    pub refs: &'a LinkReferenceTable,
    pub interwiki: &'a InterwikiMap,
    /// Prefix for internal page links (`#` gives `#PageName`).
    pub link_format: &'a str,
    rules: &'static [InlineRule],
}

impl<'a> InlineContext<'a> {
    pub fn new(
        grammar: &'a dyn Grammar,
        refs: &'a LinkReferenceTable,
        interwiki: &'a InterwikiMap,
        link_format: &'a str,
    ) -> Self {
        Self {
            grammar,
            refs,
            interwiki,
            link_format,
            rules: grammar.inline_rules(),
        }
    }

    /// The same context restricted to the rules allowed inside link text.
    pub fn for_link_text(&self) -> Self {
        Self {
            rules: self.grammar.link_text_rules(),
            ..*self
        }
    }

    pub fn rules(&self) -> &'static [InlineRule] {
        self.rules
    }

    /// Resolves a wiki link target: URLs pass through, `Prefix:Suffix`
    /// expands through the interwiki table, anything else is a page name.
    pub fn wiki_href(&self, target: &str) -> String {
        if Self::is_external(target) {
            return target.to_string();
        }
        if let Some(url) = self.interwiki.expand(target) {
            return url;
        }
        format!("{}{}", self.link_format, target)
    }

    /// Resolves an image source; only interwiki prefixes are rewritten.
    pub fn image_src(&self, target: &str) -> String {
        self.interwiki
            .expand(target)
            .unwrap_or_else(|| target.to_string())
    }

    fn is_external(target: &str) -> bool {
        target.contains("://") || target.starts_with('/') || RawUrl::scheme(target).is_some()
    }
}
