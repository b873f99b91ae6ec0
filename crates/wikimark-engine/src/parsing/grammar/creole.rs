use crate::parsing::blocks::kinds::{CodeFence, FenceOpen, Heading, List, ListMarker, Rule};
use crate::parsing::inline::InlineRule;

use super::{Flavor, Grammar};

const INLINE: &[InlineRule] = &[
    InlineRule::WikiLink,
    InlineRule::InterwikiShortcut,
    InlineRule::RawUrl {
        escape: Some(Creole::ESCAPE),
    },
    InlineRule::Macro,
    InlineRule::NoWiki,
    InlineRule::WikiImage,
    InlineRule::Strong("**"),
    InlineRule::Emphasis("//"),
    InlineRule::BackslashBreak,
    InlineRule::Escape(Creole::ESCAPE),
];

const LINK_TEXT: &[InlineRule] = &[
    InlineRule::WikiImage,
    InlineRule::BackslashBreak,
    InlineRule::Escape(Creole::ESCAPE),
];

/// WikiCreole-style wiki markup.
pub struct Creole;

impl Creole {
    pub const ESCAPE: char = '~';
}

impl Grammar for Creole {
    fn flavor(&self) -> Flavor {
        Flavor::Creole
    }

    fn is_rule(&self, line: &str) -> bool {
        Rule::creole(line)
    }

    fn heading(&self, line: &str) -> Option<(usize, String)> {
        Heading::creole(line)
    }

    fn fence_open(&self, line: &str) -> Option<FenceOpen> {
        CodeFence::open_braces(line)
    }

    fn list_marker(&self, line: &str) -> Option<ListMarker> {
        List::creole(line)
    }

    /// A list must start with a single bullet; deeper runs only nest into
    /// an already open list.
    fn opens_list(&self, marker: &ListMarker, in_list: bool) -> bool {
        in_list || marker.depth == 1
    }

    fn escape_char(&self) -> char {
        Self::ESCAPE
    }

    fn inline_rules(&self) -> &'static [InlineRule] {
        INLINE
    }

    fn link_text_rules(&self) -> &'static [InlineRule] {
        LINK_TEXT
    }
}
