//! Pinhole camera that maps normalized image coordinates to primary rays.

use glint_math::{Ray, RayKind, Vec3};

/// Pinhole camera.
///
/// Image coordinates are normalized to `[0, 1]²` with `(0, 0)` at the
/// bottom-left corner of the image.
#[derive(Clone, Debug)]
pub struct Camera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    vfov: f64,   // Vertical field of view in degrees
    aspect: f64, // width / height

    // Cached basis (set by update())
    look: Vec3,
    u: Vec3,
    v: Vec3,
}

impl Camera {
    /// Camera at the origin looking down -Z with a 45 degree field of view.
    pub fn new() -> Self {
        let mut camera = Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 45.0,
            aspect: 1.0,
            look: -Vec3::Z,
            u: Vec3::X,
            v: Vec3::Y,
        };
        camera.update();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.update();
        self
    }

    /// Set vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f64) -> Self {
        self.vfov = vfov;
        self.update();
        self
    }

    pub fn with_aspect_ratio(mut self, aspect: f64) -> Self {
        self.set_aspect_ratio(aspect);
        self
    }

    /// Match the camera to an output resolution's width / height.
    pub fn set_aspect_ratio(&mut self, aspect: f64) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
            self.update();
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.look_from
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect
    }

    /// World-space ray through normalized image coordinates `(x, y)`.
    pub fn ray_through(&self, x: f64, y: f64) -> Ray {
        let direction = self.look + (x - 0.5) * self.u + (y - 0.5) * self.v;
        Ray::new(self.look_from, direction, RayKind::Visibility)
    }

    fn update(&mut self) {
        self.look = (self.look_at - self.look_from).normalize_or_zero();
        if self.look == Vec3::ZERO {
            self.look = -Vec3::Z;
        }

        let mut right = self.look.cross(self.vup).normalize_or_zero();
        if right == Vec3::ZERO {
            // vup parallel to the view direction
            right = self.look.any_orthonormal_vector();
        }
        let up = right.cross(self.look);

        let image_height = 2.0 * (self.vfov.to_radians() / 2.0).tan();
        self.v = up * image_height;
        self.u = right * image_height * self.aspect;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
