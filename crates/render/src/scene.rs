use delve_common::Aabb;
use delve_level::{EnemyKind, Level, RoomStyle};
use glam::Vec3;
use serde::Serialize;

/// Room floors are thin slabs on the ground plane so enemies and the player
/// stand on them.
const ROOM_FLOOR_THICKNESS: f32 = 0.2;
const CORRIDOR_THICKNESS: f32 = 0.1;
const ENEMY_SIZE: Vec3 = Vec3::new(1.0, 2.0, 1.0);
const PLAYER_SIZE: Vec3 = Vec3::new(1.0, 2.0, 1.0);

const CORRIDOR_COLOR: [f32; 4] = [0.05, 0.05, 0.05, 1.0];
const PLAYER_COLOR: [f32; 4] = [0.95, 0.85, 0.3, 1.0];

/// What a scene box stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneBoxKind {
    Room(usize),
    Corridor(usize),
    Enemy { room: usize, index: usize },
    Player,
}

/// One colored, axis-aligned box to draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneBox {
    pub kind: SceneBoxKind,
    pub center: Vec3,
    pub size: Vec3,
    pub color: [f32; 4],
}

impl SceneBox {
    pub fn player(position: Vec3) -> Self {
        Self {
            kind: SceneBoxKind::Player,
            center: position,
            size: PLAYER_SIZE,
            color: PLAYER_COLOR,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.center, self.size)
    }
}

/// Raise a flat footprint into a slab resting on it.
fn slab(kind: SceneBoxKind, footprint: Aabb, thickness: f32, color: [f32; 4]) -> SceneBox {
    SceneBox {
        kind,
        center: footprint.center() + Vec3::Y * (thickness / 2.0),
        size: footprint.size() + Vec3::Y * thickness,
        color,
    }
}

pub fn style_color(style: RoomStyle) -> [f32; 4] {
    match style {
        RoomStyle::Ancient => [0.55, 0.35, 0.2, 1.0],
        RoomStyle::Modern => [0.5, 0.5, 0.5, 1.0],
        RoomStyle::SciFi => [0.2, 0.35, 0.9, 1.0],
        RoomStyle::Medieval => [0.55, 0.05, 0.05, 1.0],
    }
}

pub fn enemy_color(kind: EnemyKind) -> [f32; 4] {
    match kind {
        EnemyKind::Mage => [0.5, 0.1, 0.6, 1.0],
        EnemyKind::Archer => [0.1, 0.6, 0.15, 1.0],
        EnemyKind::Warrior => [0.85, 0.1, 0.1, 1.0],
    }
}

/// Drawable description of a level. Built once per generated level.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Scene {
    boxes: Vec<SceneBox>,
    extent: f32,
}

impl Scene {
    pub fn from_level(level: &Level) -> Self {
        let mut boxes = Vec::with_capacity(
            level.rooms().len() + level.corridors().len() + level.enemy_count(),
        );

        for room in level.rooms() {
            boxes.push(slab(
                SceneBoxKind::Room(room.id),
                room.bounds(),
                ROOM_FLOOR_THICKNESS,
                style_color(room.style),
            ));
            for (index, enemy) in room.enemies.iter().enumerate() {
                boxes.push(SceneBox {
                    kind: SceneBoxKind::Enemy {
                        room: room.id,
                        index,
                    },
                    center: room.enemy_world_position(enemy),
                    size: ENEMY_SIZE,
                    color: enemy_color(enemy.kind),
                });
            }
        }

        for corridor in level.corridors() {
            boxes.push(slab(
                SceneBoxKind::Corridor(corridor.id),
                corridor.bounds(),
                CORRIDOR_THICKNESS,
                CORRIDOR_COLOR,
            ));
        }

        tracing::debug!(boxes = boxes.len(), "built scene");
        Self {
            boxes,
            extent: level.length(),
        }
    }

    pub fn boxes(&self) -> &[SceneBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Far end of the level along the path axis.
    pub fn extent(&self) -> f32 {
        self.extent
    }

    pub fn count(&self, pred: impl Fn(&SceneBoxKind) -> bool) -> usize {
        self.boxes.iter().filter(|b| pred(&b.kind)).count()
    }
}
