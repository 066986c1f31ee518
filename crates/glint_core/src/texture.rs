//! Texture maps and the path-keyed texture cache.
//!
//! Texture maps hold 8-bit RGB samples and are sampled with nearest-pixel
//! lookup. Maps are immutable after loading and shared through `Arc`, so every
//! material referencing the same file sees the same pixels.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glint_math::{Vec2, Vec3};
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error reading texture: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Texture '{path}' has no pixels")]
    Empty { path: String },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A loaded texture map.
///
/// Rows are stored bottom row first, so `v = 0` samples the bottom of the
/// source image and `v = 1` the top.
#[derive(Clone, Debug)]
pub struct Texture {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 3]>,
}

impl Texture {
    /// Create a texture from rows ordered bottom to top.
    pub fn new(
        width: usize,
        height: usize,
        pixels: Vec<[u8; 3]>,
        path: impl Into<String>,
    ) -> TextureResult<Self> {
        if width == 0 || height == 0 || pixels.len() != width * height {
            return Err(TextureError::Empty { path: path.into() });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a 1x1 texture of a single colour.
    pub fn solid_color(rgb: [u8; 3]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![rgb],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Nearest-pixel lookup of a (u, v) coordinate in the unit square.
    ///
    /// Coordinates outside `[0, 1]` clamp to the edge pixels.
    pub fn mapped_value(&self, uv: Vec2) -> Vec3 {
        let x = Self::texel_index(uv.x, self.width);
        let y = Self::texel_index(uv.y, self.height);
        self.pixel_at(x, y)
    }

    /// Colour at integer pixel coordinates, `y = 0` being the bottom row.
    pub fn pixel_at(&self, x: usize, y: usize) -> Vec3 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let [r, g, b] = self.pixels[y * self.width + x];
        Vec3::new(r as f64, g as f64, b as f64) / 255.0
    }

    fn texel_index(coord: f64, extent: usize) -> usize {
        let scaled = (extent as f64 * coord).floor();
        if scaled.is_nan() || scaled < 0.0 {
            0
        } else {
            (scaled as usize).min(extent - 1)
        }
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[u8; 3]>()
    }
}

/// Cache for loaded textures.
///
/// Textures are loaded on first request and shared afterwards.
pub struct TextureCache {
    /// Cached textures by the path they were requested with
    textures: HashMap<String, Arc<Texture>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<Texture>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let texture = Arc::new(load_texture_file(&full_path)?);
        self.textures.insert(path.to_string(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path,
            texture.width,
            texture.height,
            texture.size_bytes() as f64 / 1024.0
        );

        Ok(texture)
    }

    /// Insert an already decoded texture under `path`.
    pub fn insert(&mut self, path: impl Into<String>, texture: Texture) -> Arc<Texture> {
        let texture = Arc::new(texture);
        self.textures.insert(path.into(), texture.clone());
        texture
    }

    /// Get a cached texture without loading.
    pub fn get(&self, path: &str) -> Option<Arc<Texture>> {
        self.textures.get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an image file into a bottom-up RGB8 texture.
fn load_texture_file(path: &Path) -> TextureResult<Texture> {
    let bytes = std::fs::read(path)?;
    let rgb = image::load_from_memory(&bytes)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    let (width, height) = (width as usize, height as usize);

    // Image rows come top to bottom
    let mut pixels = Vec::with_capacity(width * height);
    for y in (0..height).rev() {
        for x in 0..width {
            pixels.push(rgb.get_pixel(x as u32, y as u32).0);
        }
    }

    Texture::new(width, height, pixels, path.to_string_lossy())
}
