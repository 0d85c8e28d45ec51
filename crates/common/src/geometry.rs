use glam::{Mat4, Vec2, Vec3, Vec3Swizzles, Vec4};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box centered on `center` with full extents `size`.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// True when the ground-plane footprints (X and Z) intersect by more than
    /// `slack` on both axes. Height is ignored, so flat boxes compare fine.
    pub fn overlaps_footprint(&self, other: &Aabb, slack: f32) -> bool {
        let (a_min, a_max) = (self.min.xz(), self.max.xz());
        let (b_min, b_max) = (other.min.xz(), other.max.xz());
        (a_min + slack).cmplt(b_max).all() && (b_min + slack).cmplt(a_max).all()
    }

    /// Slab test. Returns the ray parameter of the entry point, or 0 when the
    /// origin is already inside the box.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let origin = ray.origin.to_array();
        let dir = ray.direction.to_array();
        let min = self.min.to_array();
        let max = self.max.to_array();

        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        for axis in 0..3 {
            if dir[axis].abs() < f32::EPSILON {
                if origin[axis] < min[axis] || origin[axis] > max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir[axis];
            let t1 = (min[axis] - origin[axis]) * inv;
            let t2 = (max[axis] - origin[axis]) * inv;
            t_enter = t_enter.max(t1.min(t2));
            t_exit = t_exit.min(t1.max(t2));
        }

        if t_exit < t_enter.max(0.0) {
            return None;
        }
        Some(t_enter.max(0.0))
    }
}

/// Half-line with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray; the direction is normalized (zero stays zero).
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray through a point in normalized device coordinates, given the inverse
    /// of a view-projection matrix with depth in `[0, 1]`. Starts on the near plane.
    pub fn from_ndc(inverse_view_proj: Mat4, ndc: Vec2) -> Self {
        let unproject = |depth: f32| {
            let p = inverse_view_proj * Vec4::new(ndc.x, ndc.y, depth, 1.0);
            p.truncate() / p.w
        };
        let near = unproject(0.0);
        let far = unproject(1.0);
        Self::new(near, far - near)
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersection with the horizontal plane `y = height`, in front of the origin.
    pub fn intersect_plane_y(&self, height: f32) -> Option<f32> {
        // Parallel to the plane
        if self.direction.y.abs() < 1e-4 {
            return None;
        }
        let t = (height - self.origin.y) / self.direction.y;
        (t >= 0.0).then_some(t)
    }
}

/// Scene intersection capability.
///
/// Given a point in normalized device coordinates (`[-1, 1]`, +Y up), return
/// the world-space point the pointer lands on, if any. Implemented by the
/// rendering layer; consumed by pointer input.
pub trait RayQuery {
    fn intersect(&self, ndc: Vec2) -> Option<Vec3>;
}

impl<F> RayQuery for F
where
    F: Fn(Vec2) -> Option<Vec3>,
{
    fn intersect(&self, ndc: Vec2) -> Option<Vec3> {
        self(ndc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_center_size_is_symmetric() {
        let b = Aabb::from_center_size(Vec3::new(10.0, 0.0, 0.0), Vec3::new(4.0, 2.0, 6.0));
        assert_eq!(b.min, Vec3::new(8.0, -1.0, -3.0));
        assert_eq!(b.max, Vec3::new(12.0, 1.0, 3.0));
        assert_eq!(b.center(), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(b.size(), Vec3::new(4.0, 2.0, 6.0));
    }

    #[test]
    fn touching_footprints_do_not_overlap() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::new(2.0, 0.0, 2.0));
        let b = Aabb::from_center_size(Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 2.0));
        assert!(!a.overlaps_footprint(&b, 0.0));
        let c = Aabb::from_center_size(Vec3::new(1.5, 5.0, 1.5), Vec3::new(2.0, 0.0, 2.0));
        assert!(a.overlaps_footprint(&c, 0.0));
        // Side by side along Z only.
        let d = Aabb::from_center_size(Vec3::new(0.0, 0.0, 3.0), Vec3::new(2.0, 0.0, 2.0));
        assert!(!a.overlaps_footprint(&d, 0.0));
    }

    #[test]
    fn slack_absorbs_small_intrusions() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::new(2.0, 0.0, 2.0));
        let b = Aabb::from_center_size(Vec3::new(1.9995, 0.0, 0.0), Vec3::new(2.0, 0.0, 2.0));
        assert!(a.overlaps_footprint(&b, 0.0));
        assert!(!a.overlaps_footprint(&b, 1e-3));
    }

    #[test]
    fn ray_hits_box_from_above() {
        let b = Aabb::from_center_size(Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0));
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y);
        let t = b.intersect_ray(&ray).unwrap();
        assert!((t - 9.0).abs() < 1e-5);
        assert!((ray.at(t).y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_box() {
        let b = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let ray = Ray::new(Vec3::new(5.0, 10.0, 0.0), Vec3::NEG_Y);
        assert!(b.intersect_ray(&ray).is_none());
        let away = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
        assert!(b.intersect_ray(&away).is_none());
    }

    #[test]
    fn ray_origin_inside_box() {
        let b = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(4.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(b.intersect_ray(&ray), Some(0.0));
    }

    #[test]
    fn ground_plane_intersection() {
        let ray = Ray::new(Vec3::new(0.0, 30.0, 30.0), Vec3::new(0.0, -1.0, -1.0));
        let t = ray.intersect_plane_y(0.0).unwrap();
        let hit = ray.at(t);
        assert!(hit.y.abs() < 1e-4);
        assert!(hit.z.abs() < 1e-3);

        let parallel = Ray::new(Vec3::Y, Vec3::X);
        assert!(parallel.intersect_plane_y(0.0).is_none());
        let behind = Ray::new(Vec3::Y, Vec3::Y);
        assert!(behind.intersect_plane_y(0.0).is_none());
    }

    #[test]
    fn from_ndc_with_identity_looks_down_depth() {
        let ray = Ray::from_ndc(Mat4::IDENTITY, Vec2::new(0.5, -0.5));
        assert_eq!(ray.origin, Vec3::new(0.5, -0.5, 0.0));
        assert_eq!(ray.direction, Vec3::Z);
    }

    #[test]
    fn closures_are_ray_queries() {
        let query = |ndc: Vec2| (ndc.x > 0.0).then_some(Vec3::ONE);
        assert_eq!(query.intersect(Vec2::new(0.5, 0.0)), Some(Vec3::ONE));
        assert_eq!(query.intersect(Vec2::new(-0.5, 0.0)), None);
    }
}
