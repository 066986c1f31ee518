//! Scene objects: a shape placed in the world by a transform node.

use std::sync::Arc;

use glint_core::Material;
use glint_math::{
    Aabb, Interval, Mat4Ext, Ray, TransformArena, TransformId, Vec2, Vec3,
    SELF_INTERSECTION_THRESHOLD,
};

use crate::shape::{LocalHit, Primitive, Shape};

/// Slack added around world bounds so rounding in the transformed box never
/// culls a hit the shape itself would report.
const BOUNDS_PADDING: f64 = 1e-9;

/// A shape with its transform handle and material.
#[derive(Debug, Clone)]
pub struct Geometry {
    shape: Shape,
    transform: TransformId,
    material: Arc<Material>,
    bounds: Aabb,
}

impl Geometry {
    pub fn new(
        shape: Shape,
        transform: TransformId,
        transforms: &TransformArena,
        material: Arc<Material>,
    ) -> Self {
        let xform = transforms.get(transform).xform();
        let bounds = xform.transform_aabb(&shape.local_bounds());
        let magnitude = bounds.min().abs().max(bounds.max().abs()).max_element();
        let bounds = bounds.padded(BOUNDS_PADDING * (1.0 + magnitude));

        Self {
            shape,
            transform,
            material,
            bounds,
        }
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// World-space bounds.
    pub fn bounding_box(&self) -> Aabb {
        self.bounds
    }

    /// Intersect a world-space ray.
    ///
    /// The ray is carried into the shape's frame, where its direction is
    /// renormalized; the local parameter is divided by the direction's scale
    /// so the returned `t` is measured along the world ray. The
    /// self-intersection threshold is scaled the same way, so it holds in
    /// world units.
    pub fn intersect(&self, ray: &Ray, transforms: &TransformArena, hit: &mut LocalHit) -> bool {
        if !self.bounds.hit(ray, Interval::FORWARD) {
            return false;
        }

        let node = transforms.get(self.transform);
        let origin = node.global_to_local_point(ray.origin());
        let direction = node.global_to_local_vector(ray.direction());

        let len = direction.length();
        if !(len > 0.0) || !len.is_finite() {
            return false;
        }
        let local_ray = Ray::new_unchecked(origin, direction / len, ray.kind());

        let mut local = LocalHit::default();
        let t_min = SELF_INTERSECTION_THRESHOLD * len;
        if !self.shape.intersect_local(&local_ray, t_min, &mut local) {
            return false;
        }

        let t = local.t / len;
        if t <= SELF_INTERSECTION_THRESHOLD {
            return false;
        }

        hit.t = t;
        hit.normal = node.local_to_global_normal(local.normal);
        hit.uv = local.uv;
        true
    }
}

/// The nearest hit found by a scene query.
///
/// Borrows the object it hit; the record cannot outlive the scene.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    pub t: f64,
    pub normal: Vec3,
    pub uv: Vec2,
    pub object: &'a Geometry,
}

impl<'a> Intersection<'a> {
    pub fn new(hit: LocalHit, object: &'a Geometry) -> Self {
        Self {
            t: hit.t,
            normal: hit.normal,
            uv: hit.uv,
            object,
        }
    }

    pub fn material(&self) -> &'a Material {
        self.object.material()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cube, Sphere};
    use glint_math::{Mat4, RayKind};

    fn ray(origin: Vec3, direction: Vec3) -> Ray {
        Ray::new(origin, direction, RayKind::Visibility)
    }

    fn placed(shape: Shape, local: Mat4) -> (Geometry, TransformArena) {
        let mut transforms = TransformArena::new();
        let id = transforms.create_child(TransformArena::ROOT, local);
        let geom = Geometry::new(shape, id, &transforms, Arc::new(Material::default()));
        (geom, transforms)
    }

    #[test]
    fn test_scaled_sphere_reports_world_distance() {
        let local = Mat4::from_translation(Vec3::new(0.0, 0.0, -10.0))
            * Mat4::from_scale(Vec3::splat(2.0));
        let (sphere, transforms) = placed(Sphere.into(), local);

        let mut hit = LocalHit::default();
        assert!(sphere.intersect(&ray(Vec3::ZERO, -Vec3::Z), &transforms, &mut hit));
        assert!((hit.t - 8.0).abs() < 1e-9);
        assert!((hit.normal - Vec3::Z).length() < 1e-9);
    }

    #[test]
    fn test_nonuniform_scale_keeps_normal_perpendicular() {
        let local = Mat4::from_scale(Vec3::new(4.0, 1.0, 1.0));
        let (sphere, transforms) = placed(Sphere.into(), local);

        let r = ray(Vec3::new(1.0, 5.0, 0.0), -Vec3::Y);
        let mut hit = LocalHit::default();
        assert!(sphere.intersect(&r, &transforms, &mut hit));

        // Ellipsoid x²/16 + y² + z² = 1 at x = 1
        let expected_y = (1.0f64 - 1.0 / 16.0).sqrt();
        assert!((r.at(hit.t).y - expected_y).abs() < 1e-9);

        let gradient = Vec3::new(1.0 / 16.0, expected_y, 0.0).normalize();
        assert!((hit.normal - gradient).length() < 1e-9);
    }

    #[test]
    fn test_large_sphere_keeps_near_hit() {
        let (sphere, transforms) = placed(Sphere.into(), Mat4::from_scale(Vec3::splat(1000.0)));

        // Just above the surface, well past the threshold in world units
        let r = ray(Vec3::new(0.0, 1000.02, 0.0), -Vec3::Y);
        let mut hit = LocalHit::default();
        assert!(sphere.intersect(&r, &transforms, &mut hit));
        assert!((hit.t - 0.02).abs() < 1e-6);
        assert!((hit.normal - Vec3::Y).length() < 1e-9);
    }

    #[test]
    fn test_large_cube_keeps_near_face() {
        let (cube, transforms) = placed(Cube.into(), Mat4::from_scale(Vec3::splat(1000.0)));

        let r = ray(Vec3::new(0.0, 500.02, 0.0), -Vec3::Y);
        let mut hit = LocalHit::default();
        assert!(cube.intersect(&r, &transforms, &mut hit));
        assert!((hit.t - 0.02).abs() < 1e-6);
        assert!((hit.normal - Vec3::Y).length() < 1e-9);
    }

    #[test]
    fn test_small_sphere_still_rejects_self_hit() {
        let (sphere, transforms) = placed(Sphere.into(), Mat4::from_scale(Vec3::splat(0.001)));

        // Starting on the surface and heading outward
        let r = ray(Vec3::new(0.0, 0.001, 0.0), Vec3::Y);
        let mut hit = LocalHit::default();
        assert!(!sphere.intersect(&r, &transforms, &mut hit));
    }

    #[test]
    fn test_world_bounds_follow_transform() {
        let (cube, _) = placed(Cube.into(), Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)));
        let bounds = cube.bounding_box();
        assert!((bounds.min().x - 4.5).abs() < 1e-6);
        assert!((bounds.max().x - 5.5).abs() < 1e-6);
    }

    #[test]
    fn test_bounds_miss_skips_shape() {
        let (cube, transforms) = placed(Cube.into(), Mat4::IDENTITY);
        let mut hit = LocalHit::default();
        assert!(!cube.intersect(&ray(Vec3::new(0.0, 0.0, 3.0), Vec3::Z), &transforms, &mut hit));
        assert_eq!(hit, LocalHit::default());
    }
}
