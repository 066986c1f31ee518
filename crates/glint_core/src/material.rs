//! Phong materials whose parameters may be constant or texture-mapped.

use std::sync::Arc;

use glint_math::{Vec2, Vec3};

use crate::texture::{Texture, TextureResult};

/// Shininess exponent reached by a fully white shininess texture.
pub const TEXTURED_SHININESS_SCALE: f64 = 128.0;

/// Luma weights used to collapse a colour to one scalar.
const LUMA: Vec3 = Vec3::new(0.299, 0.587, 0.114);

/// One material parameter: either a constant or a texture lookup.
#[derive(Clone, Debug)]
pub struct MaterialParameter {
    constant: Vec3,
    texture: Option<Arc<Texture>>,
}

impl MaterialParameter {
    pub fn constant(value: Vec3) -> Self {
        Self {
            constant: value,
            texture: None,
        }
    }

    /// A scalar stored as a grey colour, so its intensity is the scalar.
    pub fn scalar(value: f64) -> Self {
        Self::constant(Vec3::splat(value))
    }

    pub fn textured(texture: Arc<Texture>) -> Self {
        Self {
            constant: Vec3::ONE,
            texture: Some(texture),
        }
    }

    /// Use the texture if it loaded, otherwise keep `fallback`.
    ///
    /// A failed load is logged and is not an error for the scene.
    pub fn textured_or(fallback: Vec3, texture: TextureResult<Arc<Texture>>) -> Self {
        match texture {
            Ok(texture) => Self::textured(texture),
            Err(err) => {
                log::warn!("Texture unavailable, using constant {fallback:?}: {err}");
                Self::constant(fallback)
            }
        }
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }

    /// Colour value at the given surface coordinate.
    pub fn value(&self, uv: Vec2) -> Vec3 {
        match &self.texture {
            Some(texture) => texture.mapped_value(uv),
            None => self.constant,
        }
    }

    /// Scalar value at the given surface coordinate (luma of the colour).
    pub fn intensity_value(&self, uv: Vec2) -> f64 {
        self.value(uv).dot(LUMA)
    }
}

impl Default for MaterialParameter {
    fn default() -> Self {
        Self::constant(Vec3::ZERO)
    }
}

impl From<Vec3> for MaterialParameter {
    fn from(value: Vec3) -> Self {
        Self::constant(value)
    }
}

/// A Phong material.
///
/// - `ke`: emissive
/// - `ka`: ambient
/// - `ks`: specular
/// - `kd`: diffuse
/// - `kr`: mirror reflectance
/// - `kt`: transmittance
/// - `shininess`: specular exponent
/// - `index`: index of refraction
#[derive(Clone, Debug)]
pub struct Material {
    pub ke: MaterialParameter,
    pub ka: MaterialParameter,
    pub ks: MaterialParameter,
    pub kd: MaterialParameter,
    pub kr: MaterialParameter,
    pub kt: MaterialParameter,
    pub shininess: MaterialParameter,
    pub index: MaterialParameter,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ke: MaterialParameter::default(),
            ka: MaterialParameter::default(),
            ks: MaterialParameter::default(),
            kd: MaterialParameter::default(),
            kr: MaterialParameter::default(),
            kt: MaterialParameter::default(),
            shininess: MaterialParameter::default(),
            index: MaterialParameter::scalar(1.0),
        }
    }
}

impl Material {
    /// A plain diffuse material.
    pub fn diffuse(color: Vec3) -> Self {
        Self {
            kd: color.into(),
            ..Default::default()
        }
    }

    pub fn with_emissive(mut self, ke: impl Into<MaterialParameter>) -> Self {
        self.ke = ke.into();
        self
    }

    pub fn with_ambient(mut self, ka: impl Into<MaterialParameter>) -> Self {
        self.ka = ka.into();
        self
    }

    pub fn with_specular(mut self, ks: impl Into<MaterialParameter>, shininess: f64) -> Self {
        self.ks = ks.into();
        self.shininess = MaterialParameter::scalar(shininess);
        self
    }

    pub fn with_diffuse(mut self, kd: impl Into<MaterialParameter>) -> Self {
        self.kd = kd.into();
        self
    }

    pub fn with_reflective(mut self, kr: impl Into<MaterialParameter>) -> Self {
        self.kr = kr.into();
        self
    }

    pub fn with_transmissive(mut self, kt: impl Into<MaterialParameter>, index: f64) -> Self {
        self.kt = kt.into();
        self.index = MaterialParameter::scalar(index);
        self
    }

    pub fn ke(&self, uv: Vec2) -> Vec3 {
        self.ke.value(uv)
    }

    pub fn ka(&self, uv: Vec2) -> Vec3 {
        self.ka.value(uv)
    }

    pub fn ks(&self, uv: Vec2) -> Vec3 {
        self.ks.value(uv)
    }

    pub fn kd(&self, uv: Vec2) -> Vec3 {
        self.kd.value(uv)
    }

    pub fn kr(&self, uv: Vec2) -> Vec3 {
        self.kr.value(uv)
    }

    pub fn kt(&self, uv: Vec2) -> Vec3 {
        self.kt.value(uv)
    }

    /// Specular exponent. Texture maps are read as `0..=1` and rescaled.
    pub fn shininess(&self, uv: Vec2) -> f64 {
        let s = self.shininess.intensity_value(uv);
        if self.shininess.is_textured() {
            s * TEXTURED_SHININESS_SCALE
        } else {
            s
        }
    }

    pub fn index(&self, uv: Vec2) -> f64 {
        self.index.intensity_value(uv)
    }
}
