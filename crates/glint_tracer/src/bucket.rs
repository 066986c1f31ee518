//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon.

use glint_math::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::renderer::RenderConfig;
use crate::sampler::trace_pixel;
use crate::scene::Scene;
use crate::transport::TraceContext;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Seed for this bucket's random generator. Depends only on the base
    /// seed and the bucket's top-left pixel.
    pub fn seed(&self, base: u64, image_width: u32) -> u64 {
        let origin = self.y as u64 * image_width as u64 + self.x as u64;
        base.wrapping_add(origin)
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted in spiral order from center.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = size.min(width - x);
            let bh = size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += size;
        }
        y += size;
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance of their centers from the image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;
    let distance = |b: &Bucket| {
        let bx = b.x as f64 + b.width as f64 / 2.0;
        let by = b.y as f64 + b.height as f64 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    // Stable sort keeps row-major order among equidistant buckets
    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Vec3>,
    pub rays_traced: u64,
    pub max_recursion: u32,
}

/// Render a single bucket with its own seeded random generator.
pub fn render_bucket(bucket: &Bucket, scene: &Scene, config: &RenderConfig) -> BucketResult {
    let mut rng = StdRng::seed_from_u64(bucket.seed(config.seed, config.width));
    let mut ctx = TraceContext::new(&mut rng);
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let (x, y) = (bucket.x + local_x, bucket.y + local_y);
            pixels.push(trace_pixel(scene, x, y, config, &mut ctx));
        }
    }

    BucketResult {
        bucket: *bucket,
        pixels,
        rays_traced: ctx.rays_traced,
        max_recursion: ctx.max_recursion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::{Camera, Material};
    use glint_math::TransformArena;
    use std::sync::Arc;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4);

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 100, 64);
        assert_eq!(buckets.len(), 4);

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 100);
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9);

        let first = &buckets[0];
        assert_eq!((first.x, first.y), (64, 64));
        assert!(buckets.iter().enumerate().all(|(i, b)| b.index == i));
    }

    #[test]
    fn test_zero_bucket_size_does_not_hang() {
        let buckets = generate_buckets(3, 2, 0);
        assert_eq!(buckets.len(), 6);
    }

    #[test]
    fn test_seed_depends_on_origin() {
        let a = Bucket::new(0, 0, 8, 8, 0);
        let b = Bucket::new(8, 0, 8, 8, 1);
        let c = Bucket::new(0, 8, 8, 8, 2);
        assert_eq!(a.seed(7, 32), 7);
        assert_eq!(b.seed(7, 32), 15);
        assert_eq!(c.seed(7, 32), 7 + 8 * 32);
        assert_eq!(Bucket::new(0, 0, 1, 1, 0).seed(u64::MAX, 4), u64::MAX);
    }

    #[test]
    fn test_render_bucket_covers_region() {
        let mut scene = Scene::new();
        scene.set_camera(
            Camera::new().with_position(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y),
        );
        scene.add_sphere(
            TransformArena::ROOT,
            Arc::new(Material::default().with_emissive(Vec3::ONE)),
        );
        let config = RenderConfig {
            width: 16,
            height: 16,
            ..RenderConfig::default()
        };

        let bucket = Bucket::new(4, 4, 8, 8, 0);
        let result = render_bucket(&bucket, &scene, &config);
        assert_eq!(result.pixels.len(), 64);
        assert_eq!(result.rays_traced, 64);
        // Bucket straddles the image center, where the sphere is
        assert!(result.pixels.iter().any(|c| *c == Vec3::ONE));
    }
}
