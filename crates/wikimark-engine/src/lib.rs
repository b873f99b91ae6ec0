pub mod editing;
pub mod engine;
pub mod events;
pub mod io;
pub mod macros;
pub mod parsing;
pub mod render;
pub mod tree;

// Re-export key types for easier usage
pub use editing::{Chunk, ChunkError, Command, EditState, EditorOptions, apply};
pub use engine::{EngineEvent, WikiEngine};
pub use events::{Emitter, ListenerId};
pub use io::*;
pub use macros::{MacroCall, MacroError, MacroHandler, MacroRegistry, Placeholder};
pub use parsing::{Flavor, InterwikiMap, LinkReferenceTable, ParseOptions, parse, segment};
pub use render::render_html;
pub use tree::{DocKind, DocNode, ListKind, TreeBuilder};
