//! Level generation: a linear dungeon of rooms joined by corridors, each room
//! populated with enemies.
//!
//! # Invariants
//! - Rooms and corridors alternate along +X: room, corridor, room, ..., room.
//! - Consecutive elements never overlap along the path axis.
//! - A generated level is immutable; regeneration replaces it wholesale.
//! - All randomness flows through an injected [`RandomSource`].

pub mod config;
pub mod error;
pub mod generator;
pub mod level;
pub mod source;

pub use config::GenerationConfig;
pub use error::LevelError;
pub use generator::{LevelGenerator, generate_level, generate_level_seeded};
pub use level::{Corridor, Enemy, EnemyKind, Level, PathElement, Room, RoomSize, RoomStyle};
pub use source::{RandomSource, ScriptedSource};
