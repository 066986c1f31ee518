//! Glint math - vectors, rays, bounds and transforms.
//!
//! The kernel does its geometry in double precision, so the glam `D*` types
//! are re-exported under the short names used throughout the workspace.

pub use glam::{DMat3 as Mat3, DMat4 as Mat4, DVec2 as Vec2, DVec3 as Vec3, DVec4 as Vec4};

mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::{Ray, RayKind};
pub use transform::{Mat4Ext, TransformArena, TransformId, TransformNode};

/// Tolerance on ray parameters used when re-launching rays from a surface.
pub const RAY_EPSILON: f64 = 0.00001;

/// Tolerance on normal offsets used when re-launching rays from a surface.
pub const NORMAL_EPSILON: f64 = 0.00001;

/// Hits at or below this ray parameter are discarded as self-intersections.
pub const SELF_INTERSECTION_THRESHOLD: f64 = RAY_EPSILON + NORMAL_EPSILON;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_is_double_precision() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let x: f64 = v.x;
        assert_eq!(x, 1.0);
        assert_eq!(v + Vec3::ONE, Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_threshold_is_sum_of_epsilons() {
        assert_eq!(SELF_INTERSECTION_THRESHOLD, RAY_EPSILON + NORMAL_EPSILON);
        assert!(SELF_INTERSECTION_THRESHOLD > 0.0);
    }
}
