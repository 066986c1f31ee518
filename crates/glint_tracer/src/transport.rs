//! Recursive light transport: direct shading plus mirror, glossy and
//! refracted rays.

use std::f64::consts::PI;

use glint_math::{Ray, RayKind, Vec3};
use rand::{Rng, RngCore};

use crate::renderer::RenderConfig;
use crate::scene::Scene;
use crate::shading::shade;

/// Index of refraction on the outside of every surface.
pub const AIR_INDEX: f64 = 1.00029;

/// Remaining recursion allowances for one ray.
///
/// Both counters drop by one for every child ray, whichever branch spawns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    pub depth: i32,
    pub glossy: i32,
}

impl Budget {
    pub fn new(depth: i32, glossy: i32) -> Self {
        Self { depth, glossy }
    }

    /// Budget handed to a child ray.
    pub fn next(self) -> Self {
        Self {
            depth: self.depth - 1,
            glossy: self.glossy - 1,
        }
    }
}

/// Per-thread state threaded through a trace.
pub struct TraceContext<'r> {
    pub rng: &'r mut dyn RngCore,
    /// Rays passed to [`trace_ray`], shadow rays excluded
    pub rays_traced: u64,
    /// Deepest recursion level reached (primary rays are level 0)
    pub max_recursion: u32,
    level: u32,
}

impl<'r> TraceContext<'r> {
    pub fn new(rng: &'r mut dyn RngCore) -> Self {
        Self {
            rng,
            rays_traced: 0,
            max_recursion: 0,
            level: 0,
        }
    }
}

/// Colour arriving along `ray`.
///
/// Misses are black. Reflection and refraction recurse while
/// `budget.depth > 0`.
pub fn trace_ray(
    scene: &Scene,
    ray: &Ray,
    budget: Budget,
    config: &RenderConfig,
    ctx: &mut TraceContext<'_>,
) -> Vec3 {
    ctx.rays_traced += 1;
    ctx.max_recursion = ctx.max_recursion.max(ctx.level);

    let Some(hit) = scene.intersect(ray) else {
        if config.debug {
            log::debug!("{:?} ray missed at depth {}", ray.kind(), budget.depth);
        }
        return Vec3::ZERO;
    };

    if config.debug {
        log::debug!(
            "{:?} ray hit t={:.5} at depth {} (glossy {})",
            ray.kind(),
            hit.t,
            budget.depth,
            budget.glossy
        );
    }

    let material = hit.material();
    let shading = shade(scene, ray, &hit);
    if budget.depth <= 0 {
        return shading;
    }

    let p = ray.at(hit.t);
    let d = ray.direction();
    let n = hit.normal;
    let child = budget.next();

    let mut reflection = Vec3::ZERO;
    let kr = material.kr(hit.uv);
    if kr != Vec3::ZERO {
        let ideal = (d - 2.0 * d.dot(n) * n).normalize_or_zero();
        let mut sum = Vec3::ZERO;
        let mut samples = 0u32;

        if config.glossy && budget.glossy > 0 {
            // Side of the surface the reflection leaves from
            let out = if ideal.dot(n) >= 0.0 { n } else { -n };
            for _ in 0..config.glossy_samples {
                let dir = sample_glossy(ideal, out, config.glossy_exponent, &mut *ctx.rng);
                let glossy_ray = Ray::new(p, dir, RayKind::Reflection);
                sum += trace_child(scene, &glossy_ray, child, config, ctx);
                samples += 1;
            }
        }

        let mirror_ray = Ray::new(p, ideal, RayKind::Reflection);
        sum += trace_child(scene, &mirror_ray, child, config, ctx);
        samples += 1;

        reflection = kr * (sum / samples as f64);
    }

    let mut refraction = Vec3::ZERO;
    let kt = material.kt(hit.uv);
    if kt != Vec3::ZERO {
        let entering = -n.dot(d) > 0.0;
        let (n_i, n_t, normal) = if entering {
            (AIR_INDEX, material.index(hit.uv), n)
        } else {
            (material.index(hit.uv), AIR_INDEX, -n)
        };

        if let Some(dir) = refract(d, normal, n_i, n_t) {
            let refracted_ray = Ray::new(p, dir, RayKind::Refraction);
            refraction = kt * trace_child(scene, &refracted_ray, child, config, ctx);
        } else if config.debug {
            log::debug!("Total internal reflection at t={:.5}", hit.t);
        }
    }

    shading + reflection + refraction
}

fn trace_child(
    scene: &Scene,
    ray: &Ray,
    budget: Budget,
    config: &RenderConfig,
    ctx: &mut TraceContext<'_>,
) -> Vec3 {
    ctx.level += 1;
    let color = trace_ray(scene, ray, budget, config, ctx);
    ctx.level -= 1;
    color
}

/// Snell's law for unit `d` arriving against unit `normal`.
///
/// Returns `None` on total internal reflection.
pub fn refract(d: Vec3, normal: Vec3, n_i: f64, n_t: f64) -> Option<Vec3> {
    if n_t == 0.0 {
        return None;
    }
    let cos_i = d.dot(normal);
    let eta = n_i / n_t;
    let radicand = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if radicand < 0.0 {
        return None;
    }
    let dir = eta * (d - normal * cos_i) - normal * radicand.sqrt();
    if dir.is_finite() {
        Some(dir)
    } else {
        None
    }
}

/// Draw a direction from a cosine-power lobe around `axis`.
///
/// Samples that fall below the surface with outward normal `out` are
/// mirrored back above it.
pub fn sample_glossy(axis: Vec3, out: Vec3, exponent: f64, rng: &mut dyn RngCore) -> Vec3 {
    let u1: f64 = rng.gen();
    let u2: f64 = rng.gen();

    let cos_theta = (1.0 - u1).powf(1.0 / (exponent + 1.0));
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * u2;

    let (tangent, bitangent) = axis.any_orthonormal_pair();
    let mut dir = tangent * (phi.cos() * sin_theta)
        + bitangent * (phi.sin() * sin_theta)
        + axis * cos_theta;

    let below = dir.dot(out);
    if below < 0.0 {
        dir -= 2.0 * below * out;
    }
    dir.normalize_or_zero()
}
