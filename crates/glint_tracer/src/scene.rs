//! The scene: objects, lights, camera and the intersection dispatcher.

use std::sync::Arc;

use glint_core::{Camera, Light, Material, Mesh, Occluder, SceneResult, TextureCache};
use glint_math::{Mat4, Ray, TransformArena, TransformId, Vec3};

use crate::bvh::BvhNode;
use crate::geometry::{Geometry, Intersection};
use crate::shape::{LocalHit, Shape};
use crate::{Cube, Sphere, Triangle};

/// Everything needed to render an image.
///
/// Adding objects invalidates the BVH; it is rebuilt by
/// [`Scene::set_bvh_enabled`] or [`Scene::build_bvh`].
pub struct Scene {
    objects: Vec<Geometry>,
    lights: Vec<Light>,
    camera: Camera,
    ambient: Vec3,
    textures: TextureCache,
    transforms: TransformArena,
    bvh: Option<BvhNode>,
    bvh_enabled: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            camera: Camera::new(),
            ambient: Vec3::ZERO,
            textures: TextureCache::new(),
            transforms: TransformArena::new(),
            bvh: None,
            bvh_enabled: false,
        }
    }

    /// Add a coordinate frame under `parent`.
    pub fn add_transform(&mut self, parent: TransformId, local: Mat4) -> TransformId {
        self.transforms.create_child(parent, local)
    }

    /// Add any shape in the frame `transform`. Returns the object index.
    pub fn add_geometry(
        &mut self,
        shape: impl Into<Shape>,
        transform: TransformId,
        material: Arc<Material>,
    ) -> usize {
        let geometry = Geometry::new(shape.into(), transform, &self.transforms, material);
        self.objects.push(geometry);
        self.bvh = None;
        self.objects.len() - 1
    }

    /// Unit sphere in the frame `transform`.
    pub fn add_sphere(&mut self, transform: TransformId, material: Arc<Material>) -> usize {
        self.add_geometry(Sphere, transform, material)
    }

    /// Unit box in the frame `transform`.
    pub fn add_cube(&mut self, transform: TransformId, material: Arc<Material>) -> usize {
        self.add_geometry(Cube, transform, material)
    }

    pub fn add_triangle(
        &mut self,
        transform: TransformId,
        vertices: [Vec3; 3],
        material: Arc<Material>,
    ) -> usize {
        let [a, b, c] = vertices;
        self.add_geometry(Triangle::new(a, b, c), transform, material)
    }

    /// Add every face of `mesh` as a triangle sharing `material`.
    ///
    /// Returns the number of triangles added. A mesh whose normals do not
    /// line up with its vertices is rejected before anything is added.
    pub fn add_mesh(
        &mut self,
        transform: TransformId,
        mesh: &Mesh,
        material: Arc<Material>,
    ) -> SceneResult<usize> {
        mesh.validate()?;

        for face in 0..mesh.faces().len() {
            let [a, b, c] = mesh.face_vertices(face);
            let mut triangle = Triangle::new(a, b, c);
            if let Some(normals) = mesh.face_normals(face) {
                triangle = triangle.with_vertex_normals(normals);
            }
            self.add_geometry(triangle, transform, material.clone());
        }

        log::debug!("Added mesh with {} triangles", mesh.faces().len());
        Ok(mesh.faces().len())
    }

    pub fn add_light(&mut self, light: impl Into<Light>) {
        self.lights.push(light.into());
    }

    /// Ambient light accumulates across calls.
    pub fn add_ambient(&mut self, ambient: Vec3) {
        self.ambient += ambient;
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn ambient(&self) -> Vec3 {
        self.ambient
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn objects(&self) -> &[Geometry] {
        &self.objects
    }

    pub fn transforms(&self) -> &TransformArena {
        &self.transforms
    }

    pub fn textures_mut(&mut self) -> &mut TextureCache {
        &mut self.textures
    }

    /// Switch BVH acceleration on or off, building the tree if needed.
    pub fn set_bvh_enabled(&mut self, enabled: bool) {
        self.bvh_enabled = enabled;
        if enabled && self.bvh.is_none() {
            self.build_bvh();
        }
    }

    pub fn bvh_enabled(&self) -> bool {
        self.bvh_enabled
    }

    pub fn bvh(&self) -> Option<&BvhNode> {
        self.bvh.as_ref()
    }

    /// Rebuild the BVH from the current objects.
    pub fn build_bvh(&mut self) {
        let start = std::time::Instant::now();
        let bvh = BvhNode::new(&self.objects);
        log::info!(
            "Built BVH over {} objects (depth {}) in {:.2?}",
            self.objects.len(),
            bvh.depth(),
            start.elapsed()
        );
        self.bvh = Some(bvh);
    }

    /// Nearest hit along `ray`, through the BVH when it is enabled and built.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        if ray.is_degenerate() {
            return None;
        }
        match (&self.bvh, self.bvh_enabled) {
            (Some(bvh), true) => bvh.intersect(ray, &self.objects, &self.transforms),
            _ => self.intersect_linear(ray),
        }
    }

    /// Nearest hit by testing every object.
    pub fn intersect_linear(&self, ray: &Ray) -> Option<Intersection<'_>> {
        let mut best: Option<Intersection<'_>> = None;

        for object in &self.objects {
            let mut hit = LocalHit::default();
            if object.intersect(ray, &self.transforms, &mut hit)
                && best.map_or(true, |b| hit.t < b.t)
            {
                best = Some(Intersection::new(hit, object));
            }
        }

        best
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Occluder for Scene {
    fn nearest_hit_distance(&self, ray: &Ray) -> Option<f64> {
        self.intersect(ray).map(|hit| hit.t)
    }
}
