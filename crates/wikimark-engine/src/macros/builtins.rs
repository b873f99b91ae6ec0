use super::{MacroCall, MacroError, MacroRegistry, Placeholder};

pub fn register_all(registry: &mut MacroRegistry) {
    registry.register("html", html);
    registry.register("HelloWorld", hello_world);
}

/// `<<html(markup)>>`: the arguments (or the display text) as raw HTML.
pub fn html(node: &mut Placeholder, call: &MacroCall<'_>) -> Result<(), MacroError> {
    let markup = call.args.unwrap_or(call.text);
    node.set_html(markup);
    Ok(())
}

pub fn hello_world(node: &mut Placeholder, _call: &MacroCall<'_>) -> Result<(), MacroError> {
    node.set_text("Hello World!");
    Ok(())
}
