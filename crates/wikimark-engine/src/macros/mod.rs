//! # Macro dispatch
//!
//! `<<name(args)|text>>` tokens are recorded by the inline scanner and
//! resolved at render time. A [`MacroRegistry`] maps names to handlers;
//! it is built once by the host and passed to the renderer explicitly.
//! Each occurrence runs exactly one handler, or the not-found fallback.

pub mod builtins;

use std::collections::HashMap;

use log::warn;

/// One macro occurrence as handed to a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroCall<'a> {
    pub name: &'a str,
    /// Raw text between the parentheses.
    pub args: Option<&'a str>,
    /// Display text, the name when none was given.
    pub text: &'a str,
}

/// The element a handler fills in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholder {
    pub id: String,
    /// Inner HTML; written as-is by the renderer.
    pub html: String,
    /// Extra CSS classes besides `macro`.
    pub classes: Vec<String>,
}

impl Placeholder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn set_html(&mut self, html: impl Into<String>) {
        self.html = html.into();
    }

    /// Sets the content to escaped plain text.
    pub fn set_text(&mut self, text: &str) {
        self.html = html_escape::encode_text(text).into_owned();
    }

    /// Replaces the content with a visible error message.
    pub fn set_error(&mut self, message: &str) {
        if !self.classes.iter().any(|c| c == "error") {
            self.classes.push("error".to_string());
        }
        self.set_text(message);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MacroError {
    #[error("{0}")]
    InvalidArgs(String),
    #[error("{name}: {source}")]
    Failed {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

/// A macro implementation.
pub trait MacroHandler: Send + Sync {
    fn run(&self, node: &mut Placeholder, call: &MacroCall<'_>) -> Result<(), MacroError>;
}

impl<F> MacroHandler for F
where
    F: Fn(&mut Placeholder, &MacroCall<'_>) -> Result<(), MacroError> + Send + Sync,
{
    fn run(&self, node: &mut Placeholder, call: &MacroCall<'_>) -> Result<(), MacroError> {
        self(node, call)
    }
}

/// What happened when a macro occurrence was dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Ran,
    NotFound,
    Failed(String),
}

#[derive(Default)]
pub struct MacroRegistry {
    handlers: HashMap<String, Box<dyn MacroHandler>>,
}

impl std::fmt::Debug for MacroRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("MacroRegistry").field("handlers", &names).finish()
    }
}

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the stock `html` and `HelloWorld` macros.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register_all(&mut registry);
        registry
    }

    /// Registers `handler` under `name`, replacing any earlier one.
    pub fn register(&mut self, name: impl Into<String>, handler: impl MacroHandler + 'static) {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    pub fn lookup(&self, name: &str) -> Option<&dyn MacroHandler> {
        self.handlers.get(name).map(|h| h.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Runs the handler for `call` against `node`.
    ///
    /// Unknown names and failing handlers fill `node` with an inline error
    /// instead of propagating, so one bad macro never aborts a render.
    pub fn dispatch(&self, node: &mut Placeholder, call: &MacroCall<'_>) -> Dispatch {
        let Some(handler) = self.lookup(call.name) else {
            warn!("unknown macro {:?}", call.name);
            node.set_error(&format!("Macro {} Not Found!", call.name));
            return Dispatch::NotFound;
        };
        match handler.run(node, call) {
            Ok(()) => Dispatch::Ran,
            Err(e) => {
                warn!("macro {:?} failed: {e:#}", call.name);
                let reason = e.to_string();
                node.set_error(&format!(
                    "Error while executing macro {} ({reason})",
                    call.name
                ));
                Dispatch::Failed(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn call<'a>(name: &'a str, args: Option<&'a str>) -> MacroCall<'a> {
        MacroCall {
            name,
            args,
            text: name,
        }
    }

    #[test]
    fn unknown_macro_fills_an_error() {
        let registry = MacroRegistry::new();
        let mut node = Placeholder::new("macro-0");
        let outcome = registry.dispatch(&mut node, &call("Nope", None));
        assert_eq!(outcome, Dispatch::NotFound);
        assert_eq!(node.html, "Macro Nope Not Found!");
        assert_eq!(node.classes, vec!["error"]);
    }

    #[test]
    fn handler_runs_exactly_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let mut registry = MacroRegistry::new();
        registry.register(
            "Count",
            move |node: &mut Placeholder, _: &MacroCall<'_>| -> Result<(), MacroError> {
                seen.fetch_add(1, Ordering::SeqCst);
                node.set_text("counted");
                Ok(())
            },
        );
        let mut node = Placeholder::new("macro-0");
        assert_eq!(registry.dispatch(&mut node, &call("Count", None)), Dispatch::Ran);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(node.html, "counted");
    }

    #[test]
    fn failing_handler_is_reported_inline() {
        let mut registry = MacroRegistry::new();
        registry.register(
            "Broken",
            |_: &mut Placeholder, call: &MacroCall<'_>| -> Result<(), MacroError> {
                Err(MacroError::Failed {
                    name: call.name.to_string(),
                    source: anyhow::anyhow!("backend offline"),
                })
            },
        );
        let mut node = Placeholder::new("macro-1");
        let outcome = registry.dispatch(&mut node, &call("Broken", None));
        assert_eq!(outcome, Dispatch::Failed("Broken: backend offline".into()));
        assert_eq!(
            node.html,
            "Error while executing macro Broken (Broken: backend offline)"
        );
    }

    #[test]
    fn builtins_are_registered() {
        assert_eq!(MacroRegistry::with_builtins().names(), vec!["HelloWorld", "html"]);
    }
}
