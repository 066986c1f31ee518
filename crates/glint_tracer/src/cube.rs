//! Unit box primitive.

use glint_math::{Aabb, Interval, Ray, Vec2, Vec3, SELF_INTERSECTION_THRESHOLD};

use crate::shape::{LocalHit, Primitive};

/// Tolerance for deciding which face a hit point lies on.
const FACE_TOLERANCE: f64 = SELF_INTERSECTION_THRESHOLD * 3.0;

/// Axis-aligned box `[-0.5, 0.5]³` in its own frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cube;

impl Cube {
    const HALF: f64 = 0.5;

    /// Face index of a point on the surface: 0..3 are the -x, -y, -z faces and
    /// 3..6 the +x, +y, +z faces. Edges resolve in x, y, z order.
    fn face_of(p: Vec3) -> usize {
        for axis in 0..3 {
            if (p[axis] + Self::HALF).abs() <= FACE_TOLERANCE {
                return axis;
            }
            if (p[axis] - Self::HALF).abs() <= FACE_TOLERANCE {
                return axis + 3;
            }
        }

        // Numerically off every face; use the dominant axis
        let a = p.abs();
        let axis = if a.x >= a.y && a.x >= a.z {
            0
        } else if a.y >= a.z {
            1
        } else {
            2
        };
        if p[axis] < 0.0 {
            axis
        } else {
            axis + 3
        }
    }

    fn face_normal(face: usize) -> Vec3 {
        let mut n = Vec3::ZERO;
        n[face % 3] = if face < 3 { -1.0 } else { 1.0 };
        n
    }

    /// Project the hit point onto the two axes spanning the face.
    fn face_uv(face: usize, p: Vec3) -> Vec2 {
        let i1 = (face + 1) % 3;
        let i2 = (face + 2) % 3;
        let (lo, hi) = (i1.min(i2), i1.max(i2));
        let u = if face < 3 { 0.5 - p[lo] } else { 0.5 + p[lo] };
        Vec2::new(u, 0.5 + p[hi])
    }
}

impl Primitive for Cube {
    fn intersect_local(&self, ray: &Ray, t_min: f64, hit: &mut LocalHit) -> bool {
        let Some(range) = self.local_bounds().intersect(ray, Interval::UNIVERSE) else {
            return false;
        };

        // Entry point when outside, exit point when starting inside
        let t = if range.min > t_min {
            range.min
        } else if range.max > t_min {
            range.max
        } else {
            return false;
        };

        let p = ray.at(t);
        let face = Self::face_of(p);

        hit.t = t;
        hit.normal = Self::face_normal(face);
        hit.uv = Self::face_uv(face, p);
        true
    }

    fn local_bounds(&self) -> Aabb {
        Aabb::from_points(Vec3::splat(-Self::HALF), Vec3::splat(Self::HALF))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::{RayKind, SELF_INTERSECTION_THRESHOLD};

    const T_MIN: f64 = SELF_INTERSECTION_THRESHOLD;

    fn ray(origin: Vec3, direction: Vec3) -> Ray {
        Ray::new(origin, direction, RayKind::Visibility)
    }

    #[test]
    fn test_hit_from_outside_takes_near_face() {
        let mut hit = LocalHit::default();
        assert!(Cube.intersect_local(&ray(Vec3::new(0.0, 0.0, 3.0), -Vec3::Z), T_MIN, &mut hit));

        assert!((hit.t - 2.5).abs() < 1e-12);
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn test_hit_from_inside_takes_far_face() {
        let mut hit = LocalHit::default();
        assert!(Cube.intersect_local(&ray(Vec3::new(0.1, 0.0, 0.0), -Vec3::X), T_MIN, &mut hit));

        assert!((hit.t - 0.6).abs() < 1e-12);
        assert_eq!(hit.normal, -Vec3::X);
    }

    #[test]
    fn test_miss() {
        let mut hit = LocalHit::default();
        assert!(!Cube.intersect_local(&ray(Vec3::new(2.0, 0.0, 3.0), -Vec3::Z), T_MIN, &mut hit));
        assert!(!Cube.intersect_local(&ray(Vec3::new(0.0, 0.0, 3.0), Vec3::Z), T_MIN, &mut hit));
        assert_eq!(hit, LocalHit::default());
    }

    #[test]
    fn test_ray_leaving_face_does_not_self_hit() {
        let mut hit = LocalHit::default();
        assert!(!Cube.intersect_local(&ray(Vec3::new(0.0, 0.5, 0.0), Vec3::Y), T_MIN, &mut hit));
    }

    #[test]
    fn test_face_uv() {
        let mut hit = LocalHit::default();

        // +z face at (0.25, -0.25): face 5, axes (x, y)
        Cube.intersect_local(&ray(Vec3::new(0.25, -0.25, 3.0), -Vec3::Z), T_MIN, &mut hit);
        assert!((hit.uv - Vec2::new(0.75, 0.25)).length() < 1e-12);

        // -z face mirrors u
        Cube.intersect_local(&ray(Vec3::new(0.25, -0.25, -3.0), Vec3::Z), T_MIN, &mut hit);
        assert_eq!(hit.normal, -Vec3::Z);
        assert!((hit.uv - Vec2::new(0.25, 0.25)).length() < 1e-12);
    }

    #[test]
    fn test_face_normals_cover_all_sides() {
        for face in 0..6 {
            let n = Cube::face_normal(face);
            let origin = n * 3.0;
            let mut hit = LocalHit::default();
            assert!(Cube.intersect_local(&ray(origin, -n), T_MIN, &mut hit));
            assert_eq!(hit.normal, n);
        }
    }
}
