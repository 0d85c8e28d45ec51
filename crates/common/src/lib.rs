//! Shared geometry for the delve workspace: boxes, rays and the ray-query
//! capability that pointer input consumes.

pub mod geometry;

pub use geometry::{Aabb, Ray, RayQuery};
