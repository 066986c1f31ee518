//! Pixel sampling: primary rays per pixel and antialiasing.

use glint_math::{Interval, Vec3};
use rand::Rng;

use crate::renderer::RenderConfig;
use crate::scene::Scene;
use crate::transport::{trace_ray, Budget, TraceContext};

/// Clamped colour seen through normalized image coordinates `(x, y)`.
pub fn trace(
    scene: &Scene,
    x: f64,
    y: f64,
    config: &RenderConfig,
    ctx: &mut TraceContext<'_>,
) -> Vec3 {
    let ray = scene.camera().ray_through(x, y);
    let glossy = if config.glossy {
        config.glossy_depth as i32
    } else {
        0
    };
    let budget = Budget::new(config.max_depth as i32, glossy);
    let color = trace_ray(scene, &ray, budget, config, ctx);
    clamp_color(color)
}

/// Colour of pixel `(i, j)`, with row 0 at the top of the image.
///
/// With antialiasing, the pixel's four corners and center are traced first.
/// A black result is kept as is; anything else is replaced by the average of
/// `aa_samples` jittered rays inside the pixel.
pub fn trace_pixel(
    scene: &Scene,
    i: u32,
    j: u32,
    config: &RenderConfig,
    ctx: &mut TraceContext<'_>,
) -> Vec3 {
    let w = config.width as f64;
    let h = config.height as f64;
    let x = (i as f64 + 0.5) / w;
    let y = 1.0 - (j as f64 + 0.5) / h;

    if !config.antialiasing {
        return trace(scene, x, y, config, ctx);
    }

    let (dx, dy) = (0.5 / w, 0.5 / h);
    let probes = [
        (x, y),
        (x - dx, y - dy),
        (x + dx, y - dy),
        (x - dx, y + dy),
        (x + dx, y + dy),
    ];
    let mut probe_sum = Vec3::ZERO;
    for (px, py) in probes {
        probe_sum += trace(scene, px, py, config, ctx);
    }
    let probe_average = probe_sum / probes.len() as f64;
    if probe_average == Vec3::ZERO {
        return probe_average;
    }

    let samples = config.aa_samples.max(1);
    let mut sum = Vec3::ZERO;
    for _ in 0..samples {
        let jx = x + (ctx.rng.gen::<f64>() - 0.5) / w;
        let jy = y + (ctx.rng.gen::<f64>() - 0.5) / h;
        sum += trace(scene, jx, jy, config, ctx);
    }
    sum / samples as f64
}

fn clamp_color(color: Vec3) -> Vec3 {
    Vec3::new(
        Interval::UNIT.clamp(color.x),
        Interval::UNIT.clamp(color.y),
        Interval::UNIT.clamp(color.z),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::{Camera, Material};
    use glint_math::{Mat4, TransformArena};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn config(width: u32, height: u32) -> RenderConfig {
        RenderConfig {
            width,
            height,
            ..RenderConfig::default()
        }
    }

    /// Bright emissive sphere filling the middle of the view.
    fn glowing_sphere(emission: Vec3) -> Scene {
        let mut scene = Scene::new();
        scene.set_camera(
            Camera::new().with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y),
        );
        scene.add_sphere(
            TransformArena::ROOT,
            Arc::new(Material::default().with_emissive(emission)),
        );
        scene
    }

    #[test]
    fn test_trace_clamps() {
        let scene = glowing_sphere(Vec3::new(3.0, 0.5, -1.0));
        let mut rng = StdRng::seed_from_u64(1);
        let mut ctx = TraceContext::new(&mut rng);

        let color = trace(&scene, 0.5, 0.5, &config(8, 8), &mut ctx);
        assert_eq!(color, Vec3::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_top_row_looks_up() {
        // Sphere above the view axis only shows in the top rows
        let mut scene = Scene::new();
        scene.set_camera(Camera::new().with_fov(90.0).with_position(Vec3::ZERO, -Vec3::Z, Vec3::Y));
        let up = scene.add_transform(
            TransformArena::ROOT,
            Mat4::from_translation(Vec3::new(0.0, 4.0, -5.0)),
        );
        scene.add_sphere(up, Arc::new(Material::default().with_emissive(Vec3::ONE)));

        let cfg = config(9, 9);
        let mut rng = StdRng::seed_from_u64(1);
        let mut ctx = TraceContext::new(&mut rng);
        assert_eq!(trace_pixel(&scene, 4, 0, &cfg, &mut ctx), Vec3::ONE);
        assert_eq!(trace_pixel(&scene, 4, 8, &cfg, &mut ctx), Vec3::ZERO);
    }

    #[test]
    fn test_antialiasing_black_precheck_skips_samples() {
        let scene = Scene::new();
        let cfg = RenderConfig {
            antialiasing: true,
            aa_samples: 16,
            ..config(4, 4)
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut ctx = TraceContext::new(&mut rng);

        assert_eq!(trace_pixel(&scene, 1, 1, &cfg, &mut ctx), Vec3::ZERO);
        assert_eq!(ctx.rays_traced, 5);
    }

    #[test]
    fn test_antialiasing_uniform_region_matches_single_sample() {
        let scene = glowing_sphere(Vec3::new(0.25, 0.5, 0.75));
        let cfg = RenderConfig {
            antialiasing: true,
            aa_samples: 8,
            ..config(64, 64)
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut ctx = TraceContext::new(&mut rng);

        // Center pixel lies well inside the sphere's silhouette
        let color = trace_pixel(&scene, 32, 32, &cfg, &mut ctx);
        assert!((color - Vec3::new(0.25, 0.5, 0.75)).length() < 1e-12);
        assert_eq!(ctx.rays_traced, 5 + 8);
    }
}
