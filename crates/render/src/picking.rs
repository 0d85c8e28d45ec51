use delve_common::{Ray, RayQuery};
use glam::{Mat4, Vec2, Vec3};

use crate::scene::Scene;

/// Answers pointer ray queries against a scene and the ground plane (y = 0).
///
/// Returns the nearest hit in front of the camera, matching what the user
/// sees under the cursor.
pub struct ScenePicker<'a> {
    scene: &'a Scene,
    inverse_view_proj: Mat4,
}

impl<'a> ScenePicker<'a> {
    pub fn new(scene: &'a Scene, view_proj: Mat4) -> Self {
        Self {
            scene,
            inverse_view_proj: view_proj.inverse(),
        }
    }

    pub fn ray(&self, ndc: Vec2) -> Ray {
        Ray::from_ndc(self.inverse_view_proj, ndc)
    }
}

impl RayQuery for ScenePicker<'_> {
    fn intersect(&self, ndc: Vec2) -> Option<Vec3> {
        let ray = self.ray(ndc);
        let nearest = self
            .scene
            .boxes()
            .iter()
            .filter_map(|b| b.bounds().intersect_ray(&ray))
            .chain(ray.intersect_plane_y(0.0))
            .min_by(|a, b| a.total_cmp(b))?;
        Some(ray.at(nearest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_level::generate_level_seeded;
    use delve_motion::FollowCamera;

    #[test]
    fn empty_scene_falls_back_to_ground() {
        let scene = Scene::default();
        let mut camera = FollowCamera::default();
        camera.follow(Vec3::new(0.0, 1.0, 0.0));
        let picker = ScenePicker::new(&scene, camera.view_projection());

        let hit = picker.intersect(Vec2::ZERO).unwrap();
        assert!(hit.y.abs() < 1e-3);
        // Center of the screen looks at the subject, so the ground hit lies
        // just behind it along the view direction.
        assert!(hit.x.abs() < 1e-3);
    }

    #[test]
    fn room_floor_is_hit_before_ground() {
        let level = generate_level_seeded(4);
        let scene = Scene::from_level(&level);
        let room = &level.rooms()[0];

        // Look at a point inside room 0, away from its enemy line.
        let mut camera = FollowCamera::default();
        camera.follow(room.position + Vec3::new(0.0, 0.0, room.size.depth / 4.0));
        let picker = ScenePicker::new(&scene, camera.view_projection());

        let hit = picker.intersect(Vec2::ZERO).unwrap();
        assert!((hit.y - 0.2).abs() < 1e-3);
        let (lo, hi) = room.axis_span();
        assert!(hit.x > lo && hit.x < hi);
    }

    #[test]
    fn looking_at_the_sky_misses() {
        let scene = Scene::default();
        // Camera looking straight up: nothing in front of it.
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::Y, Vec3::Z);
        let proj = Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0);
        let picker = ScenePicker::new(&scene, proj * view);
        assert_eq!(picker.intersect(Vec2::ZERO), None);
    }
}
