use glam::Vec3;

/// A high-level action produced by input handling.
///
/// The host applies actions to the player rig and the level; it never looks
/// at raw pointer or key events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Walk the player to a world-space point.
    MoveTo(Vec3),
    /// Drop the current move target.
    Stop,
    /// Throw the current level away and generate a new one.
    Regenerate,
    /// Show or hide the inspector panel.
    ToggleInspector,
    /// No-op (used for input mapping that hasn't been bound yet).
    Noop,
}
