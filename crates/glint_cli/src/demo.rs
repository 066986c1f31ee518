//! Built-in demo scene.

use std::sync::Arc;

use anyhow::Result;
use glint_core::{Camera, DirectionalLight, Material, MaterialParameter, Mesh, PointLight};
use glint_math::{Mat4, TransformArena, Vec3};
use glint_tracer::Scene;

/// Floor, mirror sphere, glass sphere, a crate of cubes and a mesh pyramid.
///
/// With `texture`, the floor's diffuse colour comes from that image; a
/// texture that fails to load leaves the floor a flat grey.
pub fn build(texture: Option<&str>) -> Result<Scene> {
    let mut scene = Scene::new();
    scene.set_camera(
        Camera::new()
            .with_position(Vec3::new(0.0, 2.5, 9.0), Vec3::new(0.0, 0.7, 0.0), Vec3::Y)
            .with_fov(38.0),
    );
    scene.add_ambient(Vec3::splat(0.12));
    scene.add_light(DirectionalLight::new(Vec3::new(-0.4, -1.0, -0.6), Vec3::splat(0.7)));
    scene.add_light(
        PointLight::new(Vec3::new(3.0, 5.0, 4.0), Vec3::new(1.0, 0.95, 0.85))
            .with_attenuation(1.0, 0.05, 0.01),
    );

    let root = TransformArena::ROOT;

    let floor_color = Vec3::splat(0.7);
    let floor_diffuse = match texture {
        Some(path) => MaterialParameter::textured_or(floor_color, scene.textures_mut().load(path)),
        None => MaterialParameter::constant(floor_color),
    };
    let floor = scene.add_transform(
        root,
        Mat4::from_translation(Vec3::new(0.0, -0.25, 0.0))
            * Mat4::from_scale(Vec3::new(14.0, 0.5, 14.0)),
    );
    scene.add_cube(
        floor,
        Arc::new(
            Material::default()
                .with_diffuse(floor_diffuse)
                .with_ambient(floor_color)
                .with_reflective(Vec3::splat(0.15)),
        ),
    );

    let mirror = scene.add_transform(root, Mat4::from_translation(Vec3::new(-2.2, 1.0, -0.5)));
    scene.add_sphere(
        mirror,
        Arc::new(
            Material::diffuse(Vec3::splat(0.05))
                .with_specular(Vec3::ONE, 96.0)
                .with_reflective(Vec3::splat(0.85)),
        ),
    );

    let glass = scene.add_transform(
        root,
        Mat4::from_translation(Vec3::new(0.2, 0.75, 1.8)) * Mat4::from_scale(Vec3::splat(0.75)),
    );
    scene.add_sphere(
        glass,
        Arc::new(
            Material::default()
                .with_specular(Vec3::ONE, 128.0)
                .with_reflective(Vec3::splat(0.08))
                .with_transmissive(Vec3::splat(0.9), 1.5),
        ),
    );

    // Stack of cubes sharing one parent frame
    let stack = scene.add_transform(
        root,
        Mat4::from_translation(Vec3::new(2.3, 0.0, -0.8)) * Mat4::from_rotation_y(0.5),
    );
    let red = Arc::new(
        Material::diffuse(Vec3::new(0.8, 0.25, 0.2))
            .with_ambient(Vec3::new(0.8, 0.25, 0.2))
            .with_specular(Vec3::splat(0.3), 24.0),
    );
    for level in 0..3 {
        let size = 1.0 - level as f64 * 0.25;
        let frame = scene.add_transform(
            stack,
            Mat4::from_translation(Vec3::new(0.0, level as f64 * 0.9 + size * 0.5, 0.0))
                * Mat4::from_rotation_y(level as f64 * 0.4)
                * Mat4::from_scale(Vec3::splat(size)),
        );
        scene.add_cube(frame, red.clone());
    }

    let pyramid_frame = scene.add_transform(
        root,
        Mat4::from_translation(Vec3::new(-0.6, 0.0, -2.5)) * Mat4::from_scale(Vec3::splat(1.4)),
    );
    scene.add_mesh(
        pyramid_frame,
        &pyramid()?,
        Arc::new(
            Material::diffuse(Vec3::new(0.2, 0.5, 0.85))
                .with_ambient(Vec3::new(0.2, 0.5, 0.85))
                .with_specular(Vec3::splat(0.5), 48.0)
                .with_reflective(Vec3::splat(0.2)),
        ),
    )?;

    Ok(scene)
}

/// Square pyramid with smooth vertex normals.
fn pyramid() -> Result<Mesh> {
    let mut mesh = Mesh::new();
    let apex = mesh.add_vertex(Vec3::new(0.0, 1.2, 0.0));
    let base = [
        mesh.add_vertex(Vec3::new(-0.5, 0.0, 0.5)),
        mesh.add_vertex(Vec3::new(0.5, 0.0, 0.5)),
        mesh.add_vertex(Vec3::new(0.5, 0.0, -0.5)),
        mesh.add_vertex(Vec3::new(-0.5, 0.0, -0.5)),
    ];
    for i in 0..4 {
        mesh.add_face(base[i], base[(i + 1) % 4], apex)?;
    }
    mesh.generate_normals();
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scene_builds() {
        let scene = build(None).unwrap();
        // floor + 2 spheres + 3 cubes + 4 pyramid faces
        assert_eq!(scene.objects().len(), 10);
        assert_eq!(scene.lights().len(), 2);
    }

    #[test]
    fn test_missing_texture_falls_back() {
        let scene = build(Some("/nonexistent/floor.png")).unwrap();
        assert_eq!(scene.objects().len(), 10);
        assert!(!scene.objects()[0].material().kd.is_textured());
    }
}
