//! Canonical shapes and their local-space intersection contract.

use glint_math::{Aabb, Ray, Vec2, Vec3};

use crate::{Cube, Sphere, Triangle};

/// Result of a local-space intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalHit {
    /// Ray parameter of the hit
    pub t: f64,
    /// Unit surface normal
    pub normal: Vec3,
    /// Surface parameterization
    pub uv: Vec2,
}

impl Default for LocalHit {
    fn default() -> Self {
        Self {
            t: f64::INFINITY,
            normal: Vec3::ZERO,
            uv: Vec2::ZERO,
        }
    }
}

/// A shape that can be intersected in its own coordinate frame.
pub trait Primitive {
    /// Test the ray against the shape.
    ///
    /// Returns false and leaves `hit` untouched on a miss. On a hit the
    /// parameter is the smallest root above `t_min`, which callers scale
    /// into the shape's frame.
    fn intersect_local(&self, ray: &Ray, t_min: f64, hit: &mut LocalHit) -> bool;

    /// Bounds in the shape's own frame.
    fn local_bounds(&self) -> Aabb;
}

/// All primitive kinds.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Unit sphere at the origin
    Sphere(Sphere),
    /// Unit box `[-0.5, 0.5]³`
    Cube(Cube),
    Triangle(Triangle),
}

impl Primitive for Shape {
    fn intersect_local(&self, ray: &Ray, t_min: f64, hit: &mut LocalHit) -> bool {
        match self {
            Shape::Sphere(s) => s.intersect_local(ray, t_min, hit),
            Shape::Cube(c) => c.intersect_local(ray, t_min, hit),
            Shape::Triangle(t) => t.intersect_local(ray, t_min, hit),
        }
    }

    fn local_bounds(&self) -> Aabb {
        match self {
            Shape::Sphere(s) => s.local_bounds(),
            Shape::Cube(c) => c.local_bounds(),
            Shape::Triangle(t) => t.local_bounds(),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Shape::Sphere(s)
    }
}

impl From<Cube> for Shape {
    fn from(c: Cube) -> Self {
        Shape::Cube(c)
    }
}

impl From<Triangle> for Shape {
    fn from(t: Triangle) -> Self {
        Shape::Triangle(t)
    }
}
