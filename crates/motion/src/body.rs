use glam::Vec3;

/// Handle to a physics-driven body owned by a physics engine.
pub trait RigidBody {
    fn position(&self) -> Vec3;
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    /// Make sure a sleeping body responds to the next velocity change.
    fn wake(&mut self);
}

/// Bodies that can advance themselves by a time step.
pub trait Integrate {
    fn integrate(&mut self, dt: f32);
}

/// Minimal stand-in for a physics engine body: gravity, a flat ground plane,
/// rotation locked, and a sleep flag.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicBody {
    position: Vec3,
    velocity: Vec3,
    gravity: f32,
    rest_height: f32,
    sleeping: bool,
}

impl KinematicBody {
    pub fn new(position: Vec3, gravity: f32, rest_height: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            gravity,
            rest_height,
            sleeping: false,
        }
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }
}

impl RigidBody for KinematicBody {
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
        self.sleeping = false;
    }
}

impl Integrate for KinematicBody {
    fn integrate(&mut self, dt: f32) {
        if self.sleeping || dt <= 0.0 {
            return;
        }
        self.velocity.y += self.gravity * dt;
        self.position += self.velocity * dt;

        if self.position.y <= self.rest_height {
            self.position.y = self.rest_height;
            self.velocity.y = self.velocity.y.max(0.0);
        }
        // At rest on the ground
        if self.velocity == Vec3::ZERO {
            self.sleeping = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_to_rest_height_and_sleeps() {
        let mut body = KinematicBody::new(Vec3::new(0.0, 5.0, 0.0), -20.0, 1.0);
        for _ in 0..120 {
            body.integrate(1.0 / 60.0);
        }
        assert_eq!(body.position().y, 1.0);
        assert!(body.is_sleeping());
    }

    #[test]
    fn sleeping_body_ignores_velocity_until_woken() {
        let mut body = KinematicBody::new(Vec3::new(0.0, 1.0, 0.0), -20.0, 1.0);
        body.integrate(0.1);
        assert!(body.is_sleeping());

        body.set_velocity(Vec3::new(1.0, 0.0, 0.0));
        body.integrate(0.1);
        assert_eq!(body.position().x, 0.0);

        body.wake();
        body.integrate(0.1);
        assert!((body.position().x - 0.1).abs() < 1e-6);
        assert!(!body.is_sleeping());
    }

    #[test]
    fn horizontal_motion_survives_ground_contact() {
        let mut body = KinematicBody::new(Vec3::new(0.0, 1.0, 0.0), -20.0, 1.0);
        body.set_velocity(Vec3::new(0.0, 0.0, -5.0));
        body.integrate(0.5);
        assert_eq!(body.position(), Vec3::new(0.0, 1.0, -2.5));
        assert_eq!(body.velocity(), Vec3::new(0.0, 0.0, -5.0));
    }
}
