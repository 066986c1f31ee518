//! Glint - recursive Whitted-style ray tracer.
//!
//! Spheres, cubes and triangles placed through a transform hierarchy,
//! shaded with Phong lighting plus mirror, glossy and refracted rays.
//! Images render in buckets spread over a rayon thread pool.

mod bucket;
mod bvh;
mod cube;
mod geometry;
mod renderer;
mod sampler;
mod scene;
mod shading;
mod shape;
mod sphere;
mod transport;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use cube::Cube;
pub use geometry::{Geometry, Intersection};
pub use renderer::{
    color_to_rgb, render, render_serial, ConfigError, ImageBuffer, RenderConfig, RenderOutput,
    RenderStats,
};
pub use sampler::{trace, trace_pixel};
pub use scene::Scene;
pub use shading::shade;
pub use shape::{LocalHit, Primitive, Shape};
pub use sphere::Sphere;
pub use transport::{refract, sample_glossy, trace_ray, Budget, TraceContext, AIR_INDEX};
pub use triangle::Triangle;

/// Re-export scene description types from glint_core
pub use glint_core::{
    Camera, DirectionalLight, Light, Material, MaterialParameter, Mesh, PointLight, Texture,
};
/// Re-export math types from glint_math
pub use glint_math::{Aabb, Interval, Mat4, Ray, RayKind, TransformArena, TransformId, Vec2, Vec3};
