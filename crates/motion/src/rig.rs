use glam::Vec3;

use crate::body::{Integrate, KinematicBody, RigidBody};
use crate::camera::FollowCamera;
use crate::config::MotionConfig;
use crate::controller::{MotionController, MotionState};

/// Player body, steering and follow camera, advanced together once per frame.
#[derive(Debug, Clone)]
pub struct PlayerRig<B = KinematicBody> {
    pub body: B,
    pub controller: MotionController,
    pub camera: FollowCamera,
}

impl PlayerRig<KinematicBody> {
    /// Rig with a [`KinematicBody`] at the configured spawn point.
    pub fn new(config: &MotionConfig) -> Self {
        let body = KinematicBody::new(config.spawn_position, config.gravity, config.rest_height);
        Self::with_body(body, config)
    }
}

impl<B: RigidBody> PlayerRig<B> {
    pub fn with_body(body: B, config: &MotionConfig) -> Self {
        let mut camera = FollowCamera::new(config);
        camera.follow(body.position());
        Self {
            body,
            controller: MotionController::new(config),
            camera,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.body.position()
    }

    pub fn move_to(&mut self, target: Vec3) {
        self.controller.set_target(target);
    }

    /// Stop where the body is. Vertical velocity is left to physics.
    pub fn stop(&mut self) {
        self.controller.clear_target();
        let v = self.body.velocity();
        self.body.set_velocity(Vec3::new(0.0, v.y, 0.0));
    }
}

impl<B: RigidBody + Integrate> PlayerRig<B> {
    /// Per-frame update: steer, step physics, then re-aim the camera.
    pub fn update(&mut self, dt: f32) -> MotionState {
        let state = self.controller.steer(&mut self.body, dt);
        self.body.integrate(dt);
        self.camera.follow(self.body.position());
        state
    }
}
