//! Simple ray tracer example.
//!
//! Renders a mirror sphere, a glass sphere and a box over a floor and saves
//! the result as a PNG.

use std::sync::Arc;

use glint_tracer::{
    render, Camera, Mat4, Material, PointLight, RenderConfig, Scene, TransformArena, Vec3,
};

fn main() {
    env_logger::init();

    let start = std::time::Instant::now();
    let mut scene = build_scene();
    println!("Scene built in {:?} ({} objects)", start.elapsed(), scene.objects().len());

    let config = RenderConfig {
        width: 640,
        height: 360,
        max_depth: 4,
        antialiasing: true,
        aa_samples: 8,
        ..RenderConfig::default()
    };

    let output = render(&mut scene, &config).expect("valid render config");
    println!(
        "Rendered {}x{} in {:?}, {} rays",
        config.width, config.height, output.stats.elapsed, output.stats.rays_traced
    );

    let filename = "simple_render.png";
    output.image.save_png(filename).expect("Failed to save image");
    println!("Saved to {}", filename);
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();
    scene.set_camera(
        Camera::new()
            .with_position(Vec3::new(0.0, 2.0, 8.0), Vec3::new(0.0, 0.5, 0.0), Vec3::Y)
            .with_fov(40.0),
    );
    scene.add_ambient(Vec3::splat(0.15));
    scene.add_light(
        PointLight::new(Vec3::new(4.0, 6.0, 4.0), Vec3::ONE).with_attenuation(1.0, 0.02, 0.0),
    );

    let root = TransformArena::ROOT;

    let floor = scene.add_transform(
        root,
        Mat4::from_translation(Vec3::new(0.0, -0.5, 0.0))
            * Mat4::from_scale(Vec3::new(20.0, 1.0, 20.0)),
    );
    scene.add_cube(
        floor,
        Arc::new(Material::diffuse(Vec3::splat(0.6)).with_ambient(Vec3::splat(0.6))),
    );

    let mirror = scene.add_transform(root, Mat4::from_translation(Vec3::new(-1.8, 1.0, 0.0)));
    scene.add_sphere(
        mirror,
        Arc::new(
            Material::diffuse(Vec3::splat(0.1))
                .with_specular(Vec3::ONE, 64.0)
                .with_reflective(Vec3::splat(0.8)),
        ),
    );

    let glass = scene.add_transform(root, Mat4::from_translation(Vec3::new(0.6, 0.8, 1.5)));
    let glass_small = scene.add_transform(glass, Mat4::from_scale(Vec3::splat(0.8)));
    scene.add_sphere(
        glass_small,
        Arc::new(
            Material::default()
                .with_specular(Vec3::ONE, 128.0)
                .with_reflective(Vec3::splat(0.1))
                .with_transmissive(Vec3::splat(0.9), 1.5),
        ),
    );

    let block = scene.add_transform(
        root,
        Mat4::from_translation(Vec3::new(2.2, 0.5, -1.0)) * Mat4::from_rotation_y(0.6),
    );
    scene.add_cube(
        block,
        Arc::new(
            Material::diffuse(Vec3::new(0.8, 0.3, 0.2))
                .with_ambient(Vec3::new(0.8, 0.3, 0.2))
                .with_specular(Vec3::splat(0.4), 16.0),
        ),
    );

    scene
}
