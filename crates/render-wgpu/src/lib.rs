//! wgpu render backend for dungeon scenes.
//!
//! Draws a ground grid sized to the level and one instanced box per scene
//! element. The camera is owned by the caller; frames take a view-projection
//! matrix.
//!
//! # Invariants
//! - The renderer never mutates the level or the scene.
//! - Frame rate is independent of motion updates.

mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;
