//! Triangle primitive.
//!
//! Intersects the supporting plane first, then classifies the hit point with
//! the three signed sub-triangle areas. The same areas give the barycentric
//! coordinates used as (u, v) and for normal interpolation.

use glint_math::{Aabb, Ray, Vec2, Vec3};

use crate::shape::{LocalHit, Primitive};

/// A triangle with optional per-vertex shading normals.
#[derive(Debug, Clone)]
pub struct Triangle {
    a: Vec3,
    b: Vec3,
    c: Vec3,
    /// Unnormalized face normal, `(b - a) × (c - a)`
    n: Vec3,
    normals: Option<[Vec3; 3]>,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            a,
            b,
            c,
            n: (b - a).cross(c - a),
            normals: None,
        }
    }

    /// Interpolate these vertex normals instead of using the flat face normal.
    pub fn with_vertex_normals(mut self, normals: [Vec3; 3]) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }
}

impl Primitive for Triangle {
    fn intersect_local(&self, ray: &Ray, t_min: f64, hit: &mut LocalHit) -> bool {
        let (a, b, c, n) = (self.a, self.b, self.c, self.n);
        let o = ray.origin();
        let d = ray.direction();

        let n_dot_d = n.dot(d);
        if n_dot_d == 0.0 {
            // Parallel to the plane, or a zero-area triangle
            return false;
        }

        let t = n.dot(a - o) / n_dot_d;
        // Directions are unit length, so t is also the distance to the hit
        if !(t > t_min) {
            return false;
        }

        let x = ray.at(t);
        let w_c = (b - a).cross(x - a).dot(n);
        let w_a = (c - b).cross(x - b).dot(n);
        let w_b = (a - c).cross(x - c).dot(n);

        // Zero means the point is on an edge, which counts as inside
        let inside = (w_a >= 0.0 && w_b >= 0.0 && w_c >= 0.0)
            || (w_a <= 0.0 && w_b <= 0.0 && w_c <= 0.0);
        if !inside {
            return false;
        }

        let area = n.dot(n);
        let u = w_a / area;
        let v = w_b / area;

        let normal = match self.normals {
            Some([na, nb, nc]) => {
                let interpolated = (na * u + nb * v + nc * (1.0 - u - v)).normalize_or_zero();
                if interpolated == Vec3::ZERO {
                    n.normalize()
                } else {
                    interpolated
                }
            }
            None => n.normalize(),
        };

        hit.t = t;
        hit.normal = normal;
        hit.uv = Vec2::new(u, v);
        true
    }

    fn local_bounds(&self) -> Aabb {
        Aabb::enclosing([self.a, self.b, self.c])
    }
}
