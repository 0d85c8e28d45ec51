use glam::{Vec3, Vec3Swizzles};

use crate::body::RigidBody;
use crate::config::MotionConfig;

/// What the controller is doing after a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionState {
    Idle,
    MovingTo(Vec3),
}

/// Distance between two points ignoring height.
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    a.xz().distance(b.xz())
}

/// Click-to-move steering.
///
/// Holds at most one target. Each [`steer`](Self::steer) sets the body's
/// horizontal velocity toward it at up to a fixed speed, keeping whatever
/// vertical velocity physics has produced, and stops once within the arrive
/// threshold. The speed is capped so a step of `dt` never carries the body
/// past the target.
#[derive(Debug, Clone)]
pub struct MotionController {
    target: Option<Vec3>,
    speed: f32,
    arrive_threshold: f32,
}

impl Default for MotionController {
    fn default() -> Self {
        Self::new(&MotionConfig::default())
    }
}

impl MotionController {
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            target: None,
            speed: config.speed,
            arrive_threshold: config.arrive_threshold,
        }
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    pub fn set_target(&mut self, target: Vec3) {
        tracing::debug!(x = target.x, y = target.y, z = target.z, "move target set");
        self.target = Some(target);
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    pub fn state(&self) -> MotionState {
        match self.target {
            Some(t) => MotionState::MovingTo(t),
            None => MotionState::Idle,
        }
    }

    /// One steering step against `body`, for a step of `dt` seconds.
    pub fn steer<B: RigidBody + ?Sized>(&mut self, body: &mut B, dt: f32) -> MotionState {
        let Some(target) = self.target else {
            return MotionState::Idle;
        };

        let position = body.position();
        let vertical = body.velocity().y;
        let offset = (target - position).xz();
        let remaining = offset.length();

        if remaining < self.arrive_threshold {
            self.target = None;
            body.set_velocity(Vec3::new(0.0, vertical, 0.0));
            tracing::debug!(x = position.x, z = position.z, "arrived at target");
            return MotionState::Idle;
        }

        // Land on the target rather than overshoot it.
        let speed = if dt > 0.0 {
            self.speed.min(remaining / dt)
        } else {
            self.speed
        };
        let step = offset.normalize_or_zero() * speed;
        body.wake();
        body.set_velocity(Vec3::new(step.x, vertical, step.y));
        tracing::trace!(
            remaining,
            vx = step.x,
            vz = step.y,
            "steering"
        );
        MotionState::MovingTo(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    /// Body that only records what the controller asks of it.
    #[derive(Default)]
    struct RecordingBody {
        position: Vec3,
        velocity: Vec3,
        wakes: usize,
    }

    impl RigidBody for RecordingBody {
        fn position(&self) -> Vec3 {
            self.position
        }
        fn velocity(&self) -> Vec3 {
            self.velocity
        }
        fn set_velocity(&mut self, velocity: Vec3) {
            self.velocity = velocity;
        }
        fn wake(&mut self) {
            self.wakes += 1;
        }
    }

    #[test]
    fn idle_controller_leaves_body_alone() {
        let mut body = RecordingBody {
            velocity: Vec3::new(1.0, -2.0, 3.0),
            ..Default::default()
        };
        let mut ctl = MotionController::default();
        assert_eq!(ctl.steer(&mut body, DT), MotionState::Idle);
        assert_eq!(body.velocity, Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(body.wakes, 0);
    }

    #[test]
    fn steering_points_at_target_and_keeps_vertical_velocity() {
        let mut body = RecordingBody {
            position: Vec3::new(0.0, 1.0, 0.0),
            velocity: Vec3::new(0.0, -3.0, 0.0),
            ..Default::default()
        };
        let mut ctl = MotionController::default();
        let target = Vec3::new(3.0, 0.0, 4.0);
        ctl.set_target(target);

        assert_eq!(ctl.steer(&mut body, DT), MotionState::MovingTo(target));
        assert_eq!(body.velocity.y, -3.0);
        assert!((body.velocity.x - 3.0).abs() < 1e-5);
        assert!((body.velocity.z - 4.0).abs() < 1e-5);
        assert_eq!(body.wakes, 1);
    }

    #[test]
    fn target_height_does_not_tilt_direction() {
        let mut body = RecordingBody {
            position: Vec3::new(0.0, 1.0, 0.0),
            ..Default::default()
        };
        let mut ctl = MotionController::default();
        ctl.set_target(Vec3::new(10.0, 50.0, 0.0));
        ctl.steer(&mut body, DT);
        assert!((body.velocity.x - 5.0).abs() < 1e-5);
        assert_eq!(body.velocity.z, 0.0);
    }

    #[test]
    fn arrival_clears_target_and_zeroes_horizontal_velocity() {
        let mut body = RecordingBody {
            position: Vec3::new(0.3, 1.0, 0.2),
            velocity: Vec3::new(4.0, -1.5, 2.0),
            ..Default::default()
        };
        let mut ctl = MotionController::default();
        ctl.set_target(Vec3::ZERO);

        assert_eq!(ctl.steer(&mut body, DT), MotionState::Idle);
        assert_eq!(ctl.target(), None);
        assert_eq!(body.velocity, Vec3::new(0.0, -1.5, 0.0));
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut body = RecordingBody {
            position: Vec3::new(0.5, 0.0, 0.0),
            ..Default::default()
        };
        let mut ctl = MotionController::default();
        ctl.set_target(Vec3::ZERO);
        assert!(matches!(ctl.steer(&mut body, DT), MotionState::MovingTo(_)));
    }

    #[test]
    fn long_step_is_capped_at_the_remaining_distance() {
        let mut body = RecordingBody {
            position: Vec3::new(0.0, 1.0, 0.0),
            ..Default::default()
        };
        let mut ctl = MotionController::default();
        ctl.set_target(Vec3::new(0.6, 0.0, 0.0));

        ctl.steer(&mut body, 0.25);
        // 0.6 units over a quarter second, not the full 5 units per second.
        assert!((body.velocity.x - 2.4).abs() < 1e-5);
        assert_eq!(body.velocity.z, 0.0);
    }

    #[test]
    fn horizontal_distance_ignores_height() {
        let d = horizontal_distance(Vec3::new(0.0, 100.0, 0.0), Vec3::new(3.0, -7.0, 4.0));
        assert!((d - 5.0).abs() < 1e-6);
    }
}
