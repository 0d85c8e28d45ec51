use delve_level::Level;
use glam::Vec3;
use std::fmt::Write;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 9.0, 20.0),
            target: Vec3::ZERO,
            fov_degrees: 45.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads a level and a view configuration, then produces
/// output. It never mutates the level.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given level and view.
    fn render(&self, level: &Level, view: &RenderView) -> Self::Output;
}

/// Human-readable dump of a level, one line per path element and enemy.
/// Used by the CLI and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, level: &Level, view: &RenderView) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "=== Level (rooms={}, corridors={}, enemies={}, length={:.1}) ===",
            level.rooms().len(),
            level.corridors().len(),
            level.enemy_count(),
            level.length()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z,
            view.fov_degrees
        );

        for (i, room) in level.rooms().iter().enumerate() {
            let p = room.position;
            let _ = writeln!(
                out,
                "  room {:>2} [{:<8}] pos=({:.2}, {:.2}, {:.2}) size={:.2}x{:.2} enemies={}",
                room.id,
                room.style.name(),
                p.x,
                p.y,
                p.z,
                room.size.width,
                room.size.depth,
                room.enemies.len()
            );
            for enemy in &room.enemies {
                let e = room.enemy_world_position(enemy);
                let _ = writeln!(
                    out,
                    "      {:<7} pos=({:.2}, {:.2}, {:.2})",
                    enemy.kind.name(),
                    e.x,
                    e.y,
                    e.z
                );
            }
            if let Some(corridor) = level.corridors().get(i) {
                let c = corridor.position;
                let _ = writeln!(
                    out,
                    "  corridor {:>2} pos=({:.2}, {:.2}, {:.2}) length={:.1}",
                    corridor.id, c.x, c.y, c.z, corridor.length
                );
            }
        }

        out
    }
}
