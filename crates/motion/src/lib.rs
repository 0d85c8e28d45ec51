//! Player motion: steer a physics body toward a clicked point and keep a
//! follow camera on it.
//!
//! # Invariants
//! - Steering only writes horizontal velocity; vertical velocity belongs to physics.
//! - The move target lives in [`MotionController`], never in input callbacks.
//! - Camera motion is a pure function of the body position; it is not simulated.

pub mod body;
pub mod camera;
pub mod config;
pub mod controller;
pub mod rig;

pub use body::{Integrate, KinematicBody, RigidBody};
pub use camera::FollowCamera;
pub use config::{MotionConfig, MotionConfigError};
pub use controller::{MotionController, MotionState, horizontal_distance};
pub use rig::PlayerRig;
