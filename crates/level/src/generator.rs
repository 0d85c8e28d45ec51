use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::GenerationConfig;
use crate::error::LevelError;
use crate::level::{Corridor, Enemy, EnemyKind, Level, Room, RoomSize, RoomStyle};
use crate::source::RandomSource;

/// Single-pass linear dungeon generator.
///
/// Each room is placed by advancing a running anchor along +X by half the
/// room's width plus a margin, so a new element never overlaps the previous
/// one no matter how large it was. A corridor follows every room but the last.
///
/// Draw order per level: room count, then for each room width, depth, style,
/// enemy count and one kind per enemy.
#[derive(Debug, Clone, Default)]
pub struct LevelGenerator {
    config: GenerationConfig,
}

impl LevelGenerator {
    /// Build a generator, rejecting parameters that could produce an invalid level.
    pub fn new(config: GenerationConfig) -> Result<Self, LevelError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generate a complete level. Consumes randomness from `rng` and nothing else.
    pub fn generate<R: RandomSource>(&self, rng: &mut R) -> Level {
        let _span = tracing::info_span!("generate_level").entered();
        let cfg = &self.config;

        let room_count = rng.range_inclusive(cfg.min_rooms, cfg.max_rooms);
        let mut rooms = Vec::with_capacity(room_count);
        let mut corridors = Vec::with_capacity(room_count.saturating_sub(1));
        let mut anchor = Vec3::ZERO;

        for id in 0..room_count {
            let size = RoomSize {
                width: rng.range_f32(cfg.min_room_extent, cfg.max_room_extent),
                depth: rng.range_f32(cfg.min_room_extent, cfg.max_room_extent),
            };
            let style = RoomStyle::ALL[rng.index(RoomStyle::ALL.len())];
            let position = anchor + Vec3::X * (size.width / 2.0 + cfg.margin);
            let enemies = self.generate_enemies(style, rng);

            tracing::debug!(
                room = id,
                width = size.width,
                depth = size.depth,
                %style,
                enemies = enemies.len(),
                x = position.x,
                "placed room"
            );

            rooms.push(Room {
                id,
                size,
                style,
                enemies,
                position,
            });
            anchor = position;

            if id + 1 < room_count {
                let half_length = cfg.corridor_length / 2.0;
                let corridor_position = anchor + Vec3::X * (size.width / 2.0 + half_length);
                corridors.push(Corridor {
                    id,
                    position: corridor_position,
                    length: cfg.corridor_length,
                });
                anchor = corridor_position + Vec3::X * (half_length + cfg.margin);
            }
        }

        let level = Level::new(rooms, corridors);
        tracing::info!(
            rooms = level.rooms().len(),
            corridors = level.corridors().len(),
            enemies = level.enemy_count(),
            length = level.length(),
            "generated level"
        );
        level
    }

    /// Populate one room. Enemies sit on a line along X centered on the room
    /// origin.
    ///
    /// `style` does not influence the count or the kinds.
    pub fn generate_enemies<R: RandomSource>(&self, _style: RoomStyle, rng: &mut R) -> Vec<Enemy> {
        let cfg = &self.config;
        let count = rng.range_inclusive(cfg.min_enemies, cfg.max_enemies);
        let center = count as f32 / 2.0;
        (0..count)
            .map(|j| Enemy {
                kind: EnemyKind::ALL[rng.index(EnemyKind::ALL.len())],
                local_position: Vec3::new(
                    (j as f32 - center) * cfg.enemy_spacing,
                    cfg.enemy_height,
                    0.0,
                ),
            })
            .collect()
    }
}

/// Generate a level with the default parameters and an entropy-seeded RNG.
pub fn generate_level() -> Level {
    LevelGenerator::default().generate(&mut rand::thread_rng())
}

/// Generate a level with the default parameters, reproducibly from `seed`.
pub fn generate_level_seeded(seed: u64) -> Level {
    LevelGenerator::default().generate(&mut ChaCha8Rng::seed_from_u64(seed))
}
