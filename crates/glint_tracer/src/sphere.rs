//! Unit sphere primitive.

use std::f64::consts::PI;

use glint_math::{Aabb, Ray, Vec2, Vec3};

use crate::shape::{LocalHit, Primitive};

/// Sphere of radius 1 centered at the origin of its frame.
///
/// Position and size come from the geometry's transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sphere;

impl Sphere {
    /// Spherical coordinates of a unit normal.
    fn sphere_uv(n: Vec3) -> Vec2 {
        Vec2::new(n.x.atan2(n.z) / (2.0 * PI) + 0.5, n.y * 0.5 + 0.5)
    }
}

impl Primitive for Sphere {
    fn intersect_local(&self, ray: &Ray, t_min: f64, hit: &mut LocalHit) -> bool {
        let o = ray.origin();
        let d = ray.direction();

        let a = d.dot(d);
        if a == 0.0 {
            return false;
        }
        let b = 2.0 * o.dot(d);
        let c = o.dot(o) - 1.0;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();
        let t_near = (-b - sqrtd) / (2.0 * a);
        let t_far = (-b + sqrtd) / (2.0 * a);

        // Nearest root past the threshold; the far root when starting inside
        let t = if t_near > t_min {
            t_near
        } else if t_far > t_min {
            t_far
        } else {
            return false;
        };

        let p = ray.at(t);
        let mut normal = p.normalize_or_zero();
        if normal.dot(d) > 0.0 {
            normal = -normal;
        }

        hit.t = t;
        hit.normal = normal;
        hit.uv = Self::sphere_uv(normal);
        true
    }

    fn local_bounds(&self) -> Aabb {
        Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0))
    }
}
