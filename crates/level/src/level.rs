use delve_common::Aabb;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::GenerationConfig;
use crate::error::LevelError;

/// Visual theme of a room. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomStyle {
    Ancient,
    Modern,
    SciFi,
    Medieval,
}

impl RoomStyle {
    /// All styles, in sampling order.
    pub const ALL: [RoomStyle; 4] = [
        RoomStyle::Ancient,
        RoomStyle::Modern,
        RoomStyle::SciFi,
        RoomStyle::Medieval,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RoomStyle::Ancient => "ancient",
            RoomStyle::Modern => "modern",
            RoomStyle::SciFi => "sci-fi",
            RoomStyle::Medieval => "medieval",
        }
    }
}

impl fmt::Display for RoomStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoomStyle {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomStyle::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| LevelError::UnknownStyle(s.to_string()))
    }
}

/// Enemy archetype. Cosmetic only; no combat or AI is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Mage,
    Archer,
    Warrior,
}

impl EnemyKind {
    /// All kinds, in sampling order.
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Mage, EnemyKind::Archer, EnemyKind::Warrior];

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Mage => "mage",
            EnemyKind::Archer => "archer",
            EnemyKind::Warrior => "warrior",
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnemyKind {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnemyKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| LevelError::UnknownEnemyKind(s.to_string()))
    }
}

/// An enemy placed inside a room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Offset from the owning room's position.
    pub local_position: Vec3,
}

/// Floor extents of a room. `width` runs along the path axis (X), `depth` along Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomSize {
    pub width: f32,
    pub depth: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: usize,
    pub size: RoomSize,
    pub style: RoomStyle,
    pub enemies: Vec<Enemy>,
    pub position: Vec3,
}

impl Room {
    /// World position of one of this room's enemies.
    pub fn enemy_world_position(&self, enemy: &Enemy) -> Vec3 {
        self.position + enemy.local_position
    }

    /// Interval covered along the path axis.
    pub fn axis_span(&self) -> (f32, f32) {
        let half = self.size.width / 2.0;
        (self.position.x - half, self.position.x + half)
    }

    /// Flat footprint on the ground plane.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(
            self.position,
            Vec3::new(self.size.width, 0.0, self.size.depth),
        )
    }
}

/// Walkable width of a corridor, across the path axis.
pub const CORRIDOR_WIDTH: f32 = 3.0;

/// A corridor following the room with the same id. Its length runs along X.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corridor {
    pub id: usize,
    pub position: Vec3,
    pub length: f32,
}

impl Corridor {
    pub fn axis_span(&self) -> (f32, f32) {
        let half = self.length / 2.0;
        (self.position.x - half, self.position.x + half)
    }

    /// Flat footprint on the ground plane, [`CORRIDOR_WIDTH`] across.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, Vec3::new(self.length, 0.0, CORRIDOR_WIDTH))
    }
}

/// One element of the room/corridor chain, in path order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathElement<'a> {
    Room(&'a Room),
    Corridor(&'a Corridor),
}

impl PathElement<'_> {
    pub fn position(&self) -> Vec3 {
        match self {
            PathElement::Room(r) => r.position,
            PathElement::Corridor(c) => c.position,
        }
    }

    pub fn axis_span(&self) -> (f32, f32) {
        match self {
            PathElement::Room(r) => r.axis_span(),
            PathElement::Corridor(c) => c.axis_span(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        match self {
            PathElement::Room(r) => r.bounds(),
            PathElement::Corridor(c) => c.bounds(),
        }
    }
}

impl fmt::Display for PathElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::Room(r) => write!(f, "room {}", r.id),
            PathElement::Corridor(c) => write!(f, "corridor {}", c.id),
        }
    }
}

/// Slack allowed where a corridor meets the room it follows.
pub const SEAM_TOLERANCE: f32 = 1e-3;

/// A generated dungeon: rooms joined by corridors along a single axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Level {
    rooms: Vec<Room>,
    corridors: Vec<Corridor>,
}

impl Level {
    /// Assemble a level from parts. No invariants are checked; see [`Level::validate`].
    pub fn new(rooms: Vec<Room>, corridors: Vec<Corridor>) -> Self {
        Self { rooms, corridors }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    pub fn room(&self, id: usize) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn enemy_count(&self) -> usize {
        self.rooms.iter().map(|r| r.enemies.len()).sum()
    }

    /// Rooms and corridors interleaved in path order.
    pub fn path(&self) -> Vec<PathElement<'_>> {
        let mut path = Vec::with_capacity(self.rooms.len() + self.corridors.len());
        for (i, room) in self.rooms.iter().enumerate() {
            path.push(PathElement::Room(room));
            if let Some(corridor) = self.corridors.get(i) {
                path.push(PathElement::Corridor(corridor));
            }
        }
        path
    }

    /// Distance from the path origin to the far edge of the last room.
    pub fn length(&self) -> f32 {
        self.rooms.last().map_or(0.0, |r| r.axis_span().1)
    }

    /// Check the layout invariants against the parameters it was generated with.
    pub fn validate(&self, config: &GenerationConfig) -> Result<(), LevelError> {
        let n = self.rooms.len();
        if n < config.min_rooms || n > config.max_rooms {
            return Err(invariant(format!(
                "{n} rooms outside [{}, {}]",
                config.min_rooms, config.max_rooms
            )));
        }
        if self.corridors.len() + 1 != n {
            return Err(invariant(format!(
                "{} corridors for {n} rooms",
                self.corridors.len()
            )));
        }

        for (i, room) in self.rooms.iter().enumerate() {
            if room.id != i {
                return Err(invariant(format!("room at index {i} has id {}", room.id)));
            }
            for (name, extent) in [("width", room.size.width), ("depth", room.size.depth)] {
                if !(extent > 0.0
                    && extent >= config.min_room_extent
                    && extent < config.max_room_extent)
                {
                    return Err(invariant(format!(
                        "room {i} {name} {extent} outside [{}, {})",
                        config.min_room_extent, config.max_room_extent
                    )));
                }
            }
            let enemies = room.enemies.len();
            if enemies == 0 || enemies < config.min_enemies || enemies > config.max_enemies {
                return Err(invariant(format!(
                    "room {i} has {enemies} enemies, expected [{}, {}]",
                    config.min_enemies, config.max_enemies
                )));
            }
        }

        for (i, corridor) in self.corridors.iter().enumerate() {
            if corridor.id != i {
                return Err(invariant(format!(
                    "corridor at index {i} has id {}",
                    corridor.id
                )));
            }
            if corridor.length != config.corridor_length {
                return Err(invariant(format!(
                    "corridor {i} length {} != {}",
                    corridor.length, config.corridor_length
                )));
            }
        }

        let path = self.path();
        for pair in path.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.position().x <= prev.position().x {
                return Err(invariant(format!("{next} does not advance past {prev}")));
            }
        }
        // Corridors touch the room before them; allow for f32 rounding at the seam.
        for (i, a) in path.iter().enumerate() {
            let footprint = a.bounds();
            for b in &path[i + 1..] {
                if footprint.overlaps_footprint(&b.bounds(), SEAM_TOLERANCE) {
                    return Err(invariant(format!("{b} overlaps {a}")));
                }
            }
        }

        Ok(())
    }
}

fn invariant(msg: String) -> LevelError {
    LevelError::Invariant(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: usize, x: f32, width: f32) -> Room {
        Room {
            id,
            size: RoomSize { width, depth: 12.0 },
            style: RoomStyle::Modern,
            enemies: vec![Enemy {
                kind: EnemyKind::Archer,
                local_position: Vec3::new(-1.5, 1.0, 0.0),
            }],
            position: Vec3::new(x, 0.0, 0.0),
        }
    }

    fn corridor(id: usize, x: f32) -> Corridor {
        Corridor {
            id,
            position: Vec3::new(x, 0.0, 0.0),
            length: 10.0,
        }
    }

    /// Four 10-wide rooms laid out the way the generator would.
    fn hand_built() -> Level {
        Level::new(
            vec![
                room(0, 10.0, 10.0),
                room(1, 40.0, 10.0),
                room(2, 70.0, 10.0),
                room(3, 100.0, 10.0),
            ],
            vec![corridor(0, 20.0), corridor(1, 50.0), corridor(2, 80.0)],
        )
    }

    #[test]
    fn style_names_round_trip() {
        for style in RoomStyle::ALL {
            assert_eq!(style.name().parse::<RoomStyle>().unwrap(), style);
        }
        assert_eq!("SCI-FI".parse::<RoomStyle>().unwrap(), RoomStyle::SciFi);
        assert!("baroque".parse::<RoomStyle>().is_err());
    }

    #[test]
    fn kinds_parse() {
        assert_eq!("warrior".parse::<EnemyKind>().unwrap(), EnemyKind::Warrior);
        assert!(matches!(
            "dragon".parse::<EnemyKind>(),
            Err(LevelError::UnknownEnemyKind(_))
        ));
    }

    #[test]
    fn style_serializes_kebab_case() {
        let json = serde_json::to_string(&RoomStyle::SciFi).unwrap();
        assert_eq!(json, "\"sci-fi\"");
        let json = serde_json::to_string(&EnemyKind::Mage).unwrap();
        assert_eq!(json, "\"mage\"");
    }

    #[test]
    fn path_interleaves_rooms_and_corridors() {
        let level = hand_built();
        let labels: Vec<String> = level.path().iter().map(|e| e.to_string()).collect();
        assert_eq!(
            labels,
            [
                "room 0",
                "corridor 0",
                "room 1",
                "corridor 1",
                "room 2",
                "corridor 2",
                "room 3"
            ]
        );
    }

    #[test]
    fn hand_built_level_is_valid() {
        let level = hand_built();
        level.validate(&GenerationConfig::default()).unwrap();
        assert_eq!(level.enemy_count(), 4);
        assert_eq!(level.length(), 105.0);
    }

    #[test]
    fn enemy_world_position_adds_room_origin() {
        let r = room(0, 10.0, 10.0);
        assert_eq!(r.enemy_world_position(&r.enemies[0]), Vec3::new(8.5, 1.0, 0.0));
    }

    #[test]
    fn footprints_span_the_axis() {
        let level = hand_built();
        let room = level.rooms()[1].bounds();
        assert_eq!(room.min, Vec3::new(35.0, 0.0, -6.0));
        assert_eq!(room.max, Vec3::new(45.0, 0.0, 6.0));
        let corridor = level.corridors()[1].bounds();
        assert_eq!((corridor.min.x, corridor.max.x), level.corridors()[1].axis_span());
        assert_eq!(corridor.size().z, CORRIDOR_WIDTH);
    }

    #[test]
    fn validate_rejects_missing_corridor() {
        let mut level = hand_built();
        level.corridors.pop();
        assert!(matches!(
            level.validate(&GenerationConfig::default()),
            Err(LevelError::Invariant(_))
        ));
    }

    #[test]
    fn validate_rejects_overlap() {
        let mut level = hand_built();
        // Widen room 1 so it runs into corridor 1.
        level.rooms[1].size.width = 29.0;
        let err = level.validate(&GenerationConfig::default()).unwrap_err();
        assert!(err.to_string().contains("corridor 1 overlaps room 1"), "{err}");
    }

    #[test]
    fn seam_within_tolerance_is_accepted() {
        let mut level = hand_built();
        // Corridor 0 starts a hair inside room 0.
        level.corridors[0].position.x -= SEAM_TOLERANCE / 2.0;
        level.validate(&GenerationConfig::default()).unwrap();

        level.corridors[0].position.x -= 0.5;
        let err = level.validate(&GenerationConfig::default()).unwrap_err();
        assert!(err.to_string().contains("corridor 0 overlaps room 0"), "{err}");
    }

    #[test]
    fn validate_rejects_empty_room() {
        let mut level = hand_built();
        level.rooms[2].enemies.clear();
        assert!(level.validate(&GenerationConfig::default()).is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_extent() {
        let mut level = hand_built();
        level.rooms[0].size.depth = 30.0;
        assert!(level.validate(&GenerationConfig::default()).is_err());
    }

    #[test]
    fn empty_level_is_invalid() {
        assert!(Level::default().validate(&GenerationConfig::default()).is_err());
        assert_eq!(Level::default().length(), 0.0);
    }
}
