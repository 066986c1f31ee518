use crate::Vec3;

/// What a ray is being traced for.
///
/// Only used for diagnostics; the physics never branches on it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RayKind {
    /// Primary ray from the camera
    Visibility,
    /// Ray from a surface point toward a light
    Shadow,
    /// Mirror or glossy reflection ray
    Reflection,
    /// Ray transmitted through a surface
    Refraction,
}

/// A ray in 3D space with an origin, a unit direction and a kind tag.
///
/// The direction is normalized on construction. A zero direction stays zero;
/// every intersection routine treats such a ray as a miss.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    kind: RayKind,
}

impl Ray {
    /// Create a new ray, normalizing `direction`.
    pub fn new(origin: Vec3, direction: Vec3, kind: RayKind) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            kind,
        }
    }

    /// Create a ray whose direction is used exactly as given.
    ///
    /// Local-space intersection tests use this after they have already
    /// normalized the transformed direction themselves.
    #[inline]
    pub fn new_unchecked(origin: Vec3, direction: Vec3, kind: RayKind) -> Self {
        Self {
            origin,
            direction,
            kind,
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn kind(&self) -> RayKind {
        self.kind
    }

    /// True when the direction is zero and the ray can hit nothing.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::ZERO
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}
