//! Glint Core - scene data for the ray tracer.
//!
//! This crate holds everything a scene is made of apart from the geometry
//! traversal itself:
//!
//! - **Materials**: `Material` with per-parameter constant or texture values
//! - **Textures**: `Texture` maps and the path-keyed `TextureCache`
//! - **Lights**: directional and point lights behind the `Light` enum
//! - **Camera**: maps normalized image coordinates to primary rays
//! - **Meshes**: indexed triangle meshes with validation

pub mod camera;
pub mod error;
pub mod light;
pub mod material;
pub mod mesh;
pub mod texture;

pub use camera::Camera;
pub use error::{SceneError, SceneResult};
pub use light::{DirectionalLight, Light, Occluder, PointLight, SHADOW_FLOOR};
pub use material::{Material, MaterialParameter};
pub use mesh::Mesh;
pub use texture::{Texture, TextureCache, TextureError, TextureResult};
