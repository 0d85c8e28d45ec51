use glam::{Vec3, Vec3Swizzles};
use serde::{Deserialize, Serialize};

/// Rejected motion parameters.
#[derive(Debug, thiserror::Error)]
pub enum MotionConfigError {
    #[error("{field} must be {expected}, got {value}")]
    InvalidValue {
        field: &'static str,
        expected: &'static str,
        value: f32,
    },
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: Vec3 },
    #[error("camera_offset {0} has no horizontal component")]
    VerticalCameraOffset(Vec3),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Tuning for player motion and the follow camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Horizontal speed while moving to a target, in units per second.
    pub speed: f32,
    /// Horizontal distance below which the target counts as reached.
    pub arrive_threshold: f32,
    /// Camera eye offset from the body.
    pub camera_offset: Vec3,
    pub camera_fov_degrees: f32,
    pub gravity: f32,
    /// Height of the body's center when standing on the ground plane.
    pub rest_height: f32,
    pub spawn_position: Vec3,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            arrive_threshold: 0.5,
            camera_offset: Vec3::new(0.0, 30.0, 30.0),
            camera_fov_degrees: 45.0,
            gravity: -20.0,
            rest_height: 1.0,
            spawn_position: Vec3::new(0.0, 1.0, -2.0),
        }
    }
}

impl MotionConfig {
    /// Reject parameters that would make steering or the camera degenerate.
    pub fn validate(&self) -> Result<(), MotionConfigError> {
        check_value("speed", self.speed, "finite and positive", |v| v > 0.0)?;
        check_value("arrive_threshold", self.arrive_threshold, "finite and positive", |v| {
            v > 0.0
        })?;
        check_value(
            "camera_fov_degrees",
            self.camera_fov_degrees,
            "in (0, 180)",
            |v| v > 0.0 && v < 180.0,
        )?;
        check_value("gravity", self.gravity, "finite", |_| true)?;
        check_value("rest_height", self.rest_height, "finite", |_| true)?;
        check_finite("camera_offset", self.camera_offset)?;
        check_finite("spawn_position", self.spawn_position)?;
        // look_at with a straight-down view and +Y up is singular
        if self.camera_offset.xz() == glam::Vec2::ZERO {
            return Err(MotionConfigError::VerticalCameraOffset(self.camera_offset));
        }
        Ok(())
    }

    /// Parse and validate. Missing fields keep their defaults.
    pub fn from_yaml_str(s: &str) -> Result<Self, MotionConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

fn check_value(
    field: &'static str,
    value: f32,
    expected: &'static str,
    ok: impl Fn(f32) -> bool,
) -> Result<(), MotionConfigError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(MotionConfigError::InvalidValue {
            field,
            expected,
            value,
        })
    }
}

fn check_finite(field: &'static str, value: Vec3) -> Result<(), MotionConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MotionConfigError::NonFinite { field, value })
    }
}
