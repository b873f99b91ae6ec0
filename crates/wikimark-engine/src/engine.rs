use log::debug;

use crate::events::Emitter;
use crate::macros::MacroRegistry;
use crate::parsing::{ParseOptions, parse};
use crate::render::HtmlRenderer;
use crate::tree::DocNode;

/// Announced by [`WikiEngine`] after each stage of a page render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Parsed { nodes: usize },
    Rendered { bytes: usize, macros: usize },
}

/// Parse options, the macro registry and an event emitter bundled for a
/// host that renders many pages.
#[derive(Debug, Default)]
pub struct WikiEngine {
    options: ParseOptions,
    macros: MacroRegistry,
    events: Emitter<EngineEvent>,
}

impl WikiEngine {
    pub fn new(options: ParseOptions, macros: MacroRegistry) -> Self {
        Self {
            options,
            macros,
            events: Emitter::new(),
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn macros_mut(&mut self) -> &mut MacroRegistry {
        &mut self.macros
    }

    pub fn events_mut(&mut self) -> &mut Emitter<EngineEvent> {
        &mut self.events
    }

    pub fn parse(&self, text: &str) -> DocNode {
        let doc = parse(text, &self.options);
        self.events.emit(&EngineEvent::Parsed {
            nodes: doc.descendants().count(),
        });
        doc
    }

    /// Parses and renders `text` to an HTML fragment.
    pub fn render(&self, text: &str) -> String {
        let doc = self.parse(text);
        let mut renderer = HtmlRenderer::new(&self.macros);
        renderer.render(&doc);
        let macros = renderer.macro_count();
        let html = renderer.finish();
        debug!("rendered {} byte(s) of html", html.len());
        self.events.emit(&EngineEvent::Rendered {
            bytes: html.len(),
            macros,
        });
        html
    }
}
