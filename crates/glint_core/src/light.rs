//! Light sources.
//!
//! Lights only know about their own geometry. Shadow tests go through the
//! [`Occluder`] trait, which the scene implements, so this crate never needs
//! to know how rays are traced.

use glint_math::{Ray, RayKind, Vec3};

/// Fraction of a light that still reaches an occluded point.
pub const SHADOW_FLOOR: f64 = 0.2;

/// Anything that can answer "how far along this ray is the first surface?".
pub trait Occluder {
    fn nearest_hit_distance(&self, ray: &Ray) -> Option<f64>;
}

/// Light arriving from a fixed direction with no falloff.
#[derive(Clone, Debug)]
pub struct DirectionalLight {
    orientation: Vec3,
    color: Vec3,
}

impl DirectionalLight {
    /// `orientation` is the direction the light travels in.
    pub fn new(orientation: Vec3, color: Vec3) -> Self {
        Self {
            orientation: orientation.normalize_or_zero(),
            color,
        }
    }
}

/// Light radiating from a point, with constant/linear/quadratic falloff.
#[derive(Clone, Debug)]
pub struct PointLight {
    position: Vec3,
    color: Vec3,
    constant: f64,
    linear: f64,
    quadratic: f64,
}

impl PointLight {
    /// Point light without falloff.
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self {
            position,
            color,
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }

    pub fn with_attenuation(mut self, constant: f64, linear: f64, quadratic: f64) -> Self {
        self.constant = constant;
        self.linear = linear;
        self.quadratic = quadratic;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }
}

#[derive(Clone, Debug)]
pub enum Light {
    Directional(DirectionalLight),
    Point(PointLight),
}

impl Light {
    /// Unit vector from `p` toward the light.
    pub fn direction_to(&self, p: Vec3) -> Vec3 {
        match self {
            Light::Directional(light) => -light.orientation,
            Light::Point(light) => (light.position - p).normalize_or_zero(),
        }
    }

    /// Falloff factor in `[0, 1]`.
    pub fn distance_attenuation(&self, p: Vec3) -> f64 {
        match self {
            Light::Directional(_) => 1.0,
            Light::Point(light) => {
                let d = (p - light.position).length();
                let denominator = light.constant + light.linear * d + light.quadratic * d * d;
                if denominator <= 0.0 {
                    return 1.0;
                }
                (1.0 / denominator).min(1.0)
            }
        }
    }

    /// Light colour reaching `p`, dimmed to [`SHADOW_FLOOR`] if something
    /// blocks the path.
    ///
    /// For point lights only occluders strictly between `p` and the light
    /// count.
    pub fn shadow_attenuation(&self, p: Vec3, scene: &dyn Occluder) -> Vec3 {
        let shadow_ray = Ray::new(p, self.direction_to(p), RayKind::Shadow);
        let occluded = match (self, scene.nearest_hit_distance(&shadow_ray)) {
            (_, None) => false,
            (Light::Directional(_), Some(_)) => true,
            (Light::Point(light), Some(t)) => t < (light.position - p).length(),
        };

        if occluded {
            self.color() * SHADOW_FLOOR
        } else {
            self.color()
        }
    }

    pub fn color(&self) -> Vec3 {
        match self {
            Light::Directional(light) => light.color,
            Light::Point(light) => light.color,
        }
    }
}

impl From<DirectionalLight> for Light {
    fn from(light: DirectionalLight) -> Self {
        Light::Directional(light)
    }
}

impl From<PointLight> for Light {
    fn from(light: PointLight) -> Self {
        Light::Point(light)
    }
}
