//! Rendering Adapter: renderer-agnostic scene derived from a level.
//!
//! # Invariants
//! - Renderers read the level; they never mutate it.
//! - The scene is rebuilt whenever the level is regenerated.
//!
//! Backends consume [`Scene`] boxes; [`DebugTextRenderer`] stands in for a GPU
//! backend in the CLI and tests. [`ScenePicker`] answers pointer ray queries
//! against the same boxes the backend draws.

mod picking;
mod renderer;
mod scene;

pub use picking::ScenePicker;
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use scene::{Scene, SceneBox, SceneBoxKind, enemy_color, style_color};

pub fn crate_info() -> &'static str {
    "delve-render v0.1.0"
}
