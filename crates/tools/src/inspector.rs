use delve_level::{EnemyKind, Level, RoomStyle};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Level inspector for developer tooling.
///
/// Read-only queries against a generated level, used by the CLI and the
/// desktop debug panel.
pub struct LevelInspector;

impl LevelInspector {
    /// Produce a summary of the level.
    pub fn summary(level: &Level) -> LevelSummary {
        let mut enemies_by_kind = BTreeMap::new();
        let mut rooms_by_style = BTreeMap::new();
        for room in level.rooms() {
            *rooms_by_style.entry(room.style).or_insert(0) += 1;
            for enemy in &room.enemies {
                *enemies_by_kind.entry(enemy.kind).or_insert(0) += 1;
            }
        }

        LevelSummary {
            room_count: level.rooms().len(),
            corridor_count: level.corridors().len(),
            enemy_count: level.enemy_count(),
            enemies_by_kind,
            rooms_by_style,
            length: level.length(),
        }
    }

    /// Details of a single room, if `id` exists.
    pub fn inspect_room(level: &Level, id: usize) -> Option<RoomInfo> {
        level.room(id).map(|room| {
            let p = room.position;
            RoomInfo {
                id,
                style: room.style,
                position: [p.x, p.y, p.z],
                size: [room.size.width, room.size.depth],
                enemies: room
                    .enemies
                    .iter()
                    .map(|e| {
                        let w = room.enemy_world_position(e);
                        (e.kind, [w.x, w.y, w.z])
                    })
                    .collect(),
            }
        })
    }
}

/// Summary of a level for the inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSummary {
    pub room_count: usize,
    pub corridor_count: usize,
    pub enemy_count: usize,
    pub enemies_by_kind: BTreeMap<EnemyKind, usize>,
    pub rooms_by_style: BTreeMap<RoomStyle, usize>,
    /// Distance from the origin to the far edge of the last room.
    pub length: f32,
}

impl fmt::Display for LevelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Level: rooms={} corridors={} enemies={} length={:.1}",
            self.room_count, self.corridor_count, self.enemy_count, self.length
        )?;
        for (kind, n) in &self.enemies_by_kind {
            write!(f, " {kind}={n}")?;
        }
        Ok(())
    }
}

/// Detailed info about a single room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomInfo {
    pub id: usize,
    pub style: RoomStyle,
    pub position: [f32; 3],
    /// Width (path axis) and depth.
    pub size: [f32; 2],
    /// Kind and world position of each enemy.
    pub enemies: Vec<(EnemyKind, [f32; 3])>,
}

impl fmt::Display for RoomInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Room {} [{}] pos=({:.2}, {:.2}, {:.2}) size={:.2}x{:.2} enemies={}",
            self.id,
            self.style,
            self.position[0],
            self.position[1],
            self.position[2],
            self.size[0],
            self.size[1],
            self.enemies.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_level::{Enemy, Room, RoomSize, generate_level_seeded};
    use glam::Vec3;

    fn room(id: usize, x: f32, style: RoomStyle, kinds: &[EnemyKind]) -> Room {
        Room {
            id,
            size: RoomSize {
                width: 10.0,
                depth: 12.0,
            },
            style,
            enemies: kinds
                .iter()
                .enumerate()
                .map(|(j, kind)| Enemy {
                    kind: *kind,
                    local_position: Vec3::new(j as f32 * 3.0, 1.0, 0.0),
                })
                .collect(),
            position: Vec3::new(x, 0.0, 0.0),
        }
    }

    #[test]
    fn summary_empty_level() {
        let summary = LevelInspector::summary(&Level::default());
        assert_eq!(summary.room_count, 0);
        assert_eq!(summary.enemy_count, 0);
        assert!(summary.enemies_by_kind.is_empty());
        assert_eq!(summary.length, 0.0);
    }

    #[test]
    fn summary_counts_kinds_and_styles() {
        let level = Level::new(
            vec![
                room(0, 10.0, RoomStyle::Ancient, &[EnemyKind::Mage, EnemyKind::Mage]),
                room(1, 40.0, RoomStyle::Ancient, &[EnemyKind::Warrior]),
            ],
            Vec::new(),
        );
        let summary = LevelInspector::summary(&level);
        assert_eq!(summary.room_count, 2);
        assert_eq!(summary.enemy_count, 3);
        assert_eq!(summary.enemies_by_kind[&EnemyKind::Mage], 2);
        assert_eq!(summary.enemies_by_kind[&EnemyKind::Warrior], 1);
        assert!(!summary.enemies_by_kind.contains_key(&EnemyKind::Archer));
        assert_eq!(summary.rooms_by_style[&RoomStyle::Ancient], 2);
    }

    #[test]
    fn census_matches_generated_level() {
        let level = generate_level_seeded(77);
        let summary = LevelInspector::summary(&level);
        assert_eq!(summary.enemies_by_kind.values().sum::<usize>(), level.enemy_count());
        assert_eq!(summary.rooms_by_style.values().sum::<usize>(), level.rooms().len());
        assert_eq!(summary.corridor_count, summary.room_count - 1);
        assert_eq!(summary.length, level.length());
    }

    #[test]
    fn inspect_room_found() {
        let level = Level::new(
            vec![room(0, 10.0, RoomStyle::SciFi, &[EnemyKind::Archer])],
            Vec::new(),
        );
        let info = LevelInspector::inspect_room(&level, 0).unwrap();
        assert_eq!(info.position, [10.0, 0.0, 0.0]);
        assert_eq!(info.size, [10.0, 12.0]);
        assert_eq!(info.enemies, vec![(EnemyKind::Archer, [10.0, 1.0, 0.0])]);
    }

    #[test]
    fn inspect_room_not_found() {
        let level = generate_level_seeded(1);
        assert!(LevelInspector::inspect_room(&level, 99).is_none());
    }

    #[test]
    fn displays() {
        let level = Level::new(
            vec![room(0, 10.0, RoomStyle::Medieval, &[EnemyKind::Mage])],
            Vec::new(),
        );
        let s = LevelInspector::summary(&level).to_string();
        assert!(s.contains("rooms=1"));
        assert!(s.contains("mage=1"));
        let r = LevelInspector::inspect_room(&level, 0).unwrap().to_string();
        assert!(r.contains("[medieval]"));
    }
}
