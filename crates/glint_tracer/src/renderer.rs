//! Render configuration, image output and the top-level render loops.
//!
//! The image is split into buckets that render in parallel with rayon. Each
//! bucket seeds its own random generator from the configured seed and its
//! position, so a render is reproducible no matter how buckets are scheduled.

use std::path::Path;
use std::time::{Duration, Instant};

use glint_math::{Interval, Vec3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::scene::Scene;

/// Errors from loading or validating a [`RenderConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Invalid sample count for {0}: must be at least 1")]
    InvalidSampleCount(&'static str),

    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Reflection/refraction recursion limit
    pub max_depth: u32,
    /// Use the BVH instead of testing every object
    pub use_bvh: bool,
    /// Supersample pixels that are not black
    pub antialiasing: bool,
    /// Jittered rays per antialiased pixel
    pub aa_samples: u32,
    /// Stochastic glossy reflection
    pub glossy: bool,
    /// Glossy recursion allowance for primary rays
    pub glossy_depth: u32,
    /// Perturbed rays traced per glossy reflection, besides the mirror ray
    pub glossy_samples: u32,
    /// Cosine-power exponent of the glossy lobe; higher is tighter
    pub glossy_exponent: f64,
    /// Base seed for per-bucket random generators
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Log every traced ray at debug level
    pub debug: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            max_depth: 2,
            use_bvh: true,
            antialiasing: false,
            aa_samples: 16,
            glossy: false,
            glossy_depth: 10,
            glossy_samples: 10,
            glossy_exponent: 128.0,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            debug: false,
        }
    }
}

impl RenderConfig {
    /// Load a JSON config. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: RenderConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        if self.aa_samples == 0 {
            return Err(ConfigError::InvalidSampleCount("aa_samples"));
        }
        Ok(())
    }

    fn effective_bucket_size(&self) -> u32 {
        if self.bucket_size == 0 {
            log::warn!("bucket_size 0 is invalid, using {}", DEFAULT_BUCKET_SIZE);
            DEFAULT_BUCKET_SIZE
        } else {
            self.bucket_size
        }
    }
}

/// Convert a colour to 8-bit RGB, clamping each channel to `[0, 1]`.
pub fn color_to_rgb(color: Vec3) -> [u8; 3] {
    [
        (255.0 * Interval::UNIT.clamp(color.x)) as u8,
        (255.0 * Interval::UNIT.clamp(color.y)) as u8,
        (255.0 * Interval::UNIT.clamp(color.z)) as u8,
    ]
}

/// Row-major image, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec3>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3::ZERO; width as usize * height as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Vec3 {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Vec3) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Three bytes per pixel, row-major.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgb(*c)).collect()
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        image::save_buffer(
            path,
            &self.to_rgb8(),
            self.width,
            self.height,
            image::ColorType::Rgb8,
        )
    }

    fn write_bucket(&mut self, result: &BucketResult) {
        let b = &result.bucket;
        for local_y in 0..b.height {
            for local_x in 0..b.width {
                let color = result.pixels[(local_y * b.width + local_x) as usize];
                self.set(b.x + local_x, b.y + local_y, color);
            }
        }
    }
}

/// Counters gathered during a render.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderStats {
    /// Camera, reflection and refraction rays
    pub rays_traced: u64,
    /// Deepest recursion level any ray reached
    pub max_recursion: u32,
    pub buckets: usize,
    pub elapsed: Duration,
}

/// A finished render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: ImageBuffer,
    pub stats: RenderStats,
}

/// Render `scene` with buckets spread across the rayon thread pool.
///
/// Applies the config's BVH setting and output aspect ratio to the scene
/// before rendering.
pub fn render(scene: &mut Scene, config: &RenderConfig) -> Result<RenderOutput, ConfigError> {
    prepare(scene, config)?;
    let scene: &Scene = scene;

    log::info!(
        "Rendering {}x{} (depth {}, bvh {}, aa {}, glossy {}) on {} threads",
        config.width,
        config.height,
        config.max_depth,
        config.use_bvh,
        config.antialiasing,
        config.glossy,
        rayon::current_num_threads()
    );

    let start = Instant::now();
    let buckets = generate_buckets(config.width, config.height, config.effective_bucket_size());
    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, scene, config))
        .collect();

    Ok(assemble(config, results, start.elapsed()))
}

/// Single-threaded [`render`]. Produces the same image.
pub fn render_serial(
    scene: &mut Scene,
    config: &RenderConfig,
) -> Result<RenderOutput, ConfigError> {
    prepare(scene, config)?;
    let scene: &Scene = scene;

    let start = Instant::now();
    let buckets = generate_buckets(config.width, config.height, config.effective_bucket_size());
    let results: Vec<BucketResult> = buckets
        .iter()
        .map(|bucket| render_bucket(bucket, scene, config))
        .collect();

    Ok(assemble(config, results, start.elapsed()))
}

fn prepare(scene: &mut Scene, config: &RenderConfig) -> Result<(), ConfigError> {
    config.validate()?;
    scene.set_bvh_enabled(config.use_bvh);
    scene
        .camera_mut()
        .set_aspect_ratio(config.width as f64 / config.height as f64);
    Ok(())
}

fn assemble(config: &RenderConfig, results: Vec<BucketResult>, elapsed: Duration) -> RenderOutput {
    let mut image = ImageBuffer::new(config.width, config.height);
    let mut stats = RenderStats {
        buckets: results.len(),
        elapsed,
        ..RenderStats::default()
    };

    for result in &results {
        image.write_bucket(result);
        stats.rays_traced += result.rays_traced;
        stats.max_recursion = stats.max_recursion.max(result.max_recursion);
    }

    log::info!(
        "Rendered {} buckets, {} rays in {:.2?}",
        stats.buckets,
        stats.rays_traced,
        stats.elapsed
    );

    RenderOutput { image, stats }
}
