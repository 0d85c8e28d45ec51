use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::LevelError;

/// Parameters for level generation.
///
/// The defaults reproduce the reference layout: 4 to 7 rooms, room extents in
/// `[10, 30)`, a 5 unit margin, 10 unit corridors and 1 to 5 enemies per room
/// spaced 3 units apart at height 1.
///
/// Integer ranges are inclusive; extent ranges are half-open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub min_rooms: usize,
    pub max_rooms: usize,
    pub min_room_extent: f32,
    pub max_room_extent: f32,
    /// Gap reserved between a room edge and the next element's anchor.
    pub margin: f32,
    pub corridor_length: f32,
    pub min_enemies: usize,
    pub max_enemies: usize,
    pub enemy_spacing: f32,
    pub enemy_height: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_rooms: 4,
            max_rooms: 7,
            min_room_extent: 10.0,
            max_room_extent: 30.0,
            margin: 5.0,
            corridor_length: 10.0,
            min_enemies: 1,
            max_enemies: 5,
            enemy_spacing: 3.0,
            enemy_height: 1.0,
        }
    }
}

impl GenerationConfig {
    /// Check that every range is non-empty and every length is usable.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.min_rooms == 0 || self.min_rooms > self.max_rooms {
            return Err(LevelError::InvalidRange {
                field: "rooms",
                min: self.min_rooms as f64,
                max: self.max_rooms as f64,
            });
        }
        if !(self.min_room_extent.is_finite() && self.max_room_extent.is_finite())
            || self.min_room_extent <= 0.0
            || self.min_room_extent >= self.max_room_extent
        {
            return Err(LevelError::InvalidRange {
                field: "room_extent",
                min: self.min_room_extent as f64,
                max: self.max_room_extent as f64,
            });
        }
        if self.min_enemies == 0 || self.min_enemies > self.max_enemies {
            return Err(LevelError::InvalidRange {
                field: "enemies",
                min: self.min_enemies as f64,
                max: self.max_enemies as f64,
            });
        }
        check_value("margin", self.margin, "finite and non-negative", |v| v >= 0.0)?;
        check_value("corridor_length", self.corridor_length, "finite and positive", |v| {
            v > 0.0
        })?;
        check_value("enemy_spacing", self.enemy_spacing, "finite and non-negative", |v| {
            v >= 0.0
        })?;
        check_value("enemy_height", self.enemy_height, "finite", |_| true)?;
        Ok(())
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, LevelError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file. Missing fields keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            other => return Err(LevelError::UnsupportedFormat(other.to_string())),
        };
        tracing::debug!(path = %path.display(), "loaded generation config");
        Ok(config)
    }
}

fn check_value(
    field: &'static str,
    value: f32,
    expected: &'static str,
    ok: impl Fn(f32) -> bool,
) -> Result<(), LevelError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(LevelError::InvalidValue {
            field,
            expected,
            value: value as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(GenerationConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_room_range() {
        let cfg = GenerationConfig {
            min_rooms: 8,
            max_rooms: 4,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(LevelError::InvalidRange { field: "rooms", .. })
        ));
    }

    #[test]
    fn rejects_empty_extent_range() {
        let cfg = GenerationConfig {
            min_room_extent: 20.0,
            max_room_extent: 20.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_enemies() {
        let cfg = GenerationConfig {
            min_enemies: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(LevelError::InvalidRange { field: "enemies", .. })
        ));
    }

    #[test]
    fn rejects_non_positive_corridor() {
        let cfg = GenerationConfig {
            corridor_length: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(LevelError::InvalidValue {
                field: "corridor_length",
                ..
            })
        ));
        let cfg = GenerationConfig {
            margin: f32::NAN,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn yaml_fills_missing_fields_with_defaults() {
        let cfg = GenerationConfig::from_yaml_str("max_rooms: 9\ncorridor_length: 12.5\n").unwrap();
        assert_eq!(cfg.max_rooms, 9);
        assert_eq!(cfg.corridor_length, 12.5);
        assert_eq!(cfg.min_rooms, 4);
        assert_eq!(cfg.margin, 5.0);
    }

    #[test]
    fn loads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.json");
        std::fs::write(&path, r#"{ "min_enemies": 2, "max_enemies": 3 }"#).unwrap();
        let cfg = GenerationConfig::from_path(&path).unwrap();
        assert_eq!(cfg.min_enemies, 2);
        assert_eq!(cfg.max_enemies, 3);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.toml");
        std::fs::write(&path, "min_rooms = 3").unwrap();
        assert!(matches!(
            GenerationConfig::from_path(&path),
            Err(LevelError::UnsupportedFormat(_))
        ));
    }
}
