use delve_common::Ray;
use glam::{Mat4, Vec2, Vec3};

use crate::config::MotionConfig;

/// Camera that sits at a fixed offset from a subject and looks at it.
/// Recomputed from scratch every frame; there is no smoothing.
#[derive(Debug, Clone)]
pub struct FollowCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub offset: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self::new(&MotionConfig::default())
    }
}

impl FollowCamera {
    pub fn new(config: &MotionConfig) -> Self {
        let mut camera = Self {
            eye: Vec3::ZERO,
            target: Vec3::ZERO,
            offset: config.camera_offset,
            fov: config.camera_fov_degrees.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        };
        camera.follow(config.spawn_position);
        camera
    }

    /// Place the eye at `subject + offset` and aim at the subject.
    ///
    /// The offset is relative, so the eye rides along with the subject's
    /// height too: a body resting at y = 1 puts the default eye at y = 31,
    /// not at a fixed altitude of 30.
    pub fn follow(&mut self, subject: Vec3) {
        self.eye = subject + self.offset;
        self.target = subject;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through a point in normalized device coordinates.
    pub fn screen_ray(&self, ndc: Vec2) -> Ray {
        Ray::from_ndc(self.view_projection().inverse(), ndc)
    }
}
