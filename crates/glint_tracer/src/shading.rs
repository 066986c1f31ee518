//! Phong illumination at a surface hit.

use glint_core::Occluder;
use glint_math::{Ray, Vec3};

use crate::geometry::Intersection;
use crate::scene::Scene;

/// Direct lighting at `hit`: emissive + ambient + diffuse and specular from
/// every light, each scaled by its falloff and shadowing.
///
/// Lights behind the surface (`N·L <= 0`) contribute nothing and cast no
/// shadow ray.
pub fn shade(scene: &Scene, ray: &Ray, hit: &Intersection<'_>) -> Vec3 {
    let material = hit.material();
    let uv = hit.uv;

    let mut color = material.ke(uv) + material.ka(uv) * scene.ambient();

    let p = ray.at(hit.t);
    let n = hit.normal;
    let to_eye = (scene.camera().eye() - p).normalize_or_zero();
    let occluder: &dyn Occluder = scene;

    for light in scene.lights() {
        let l = light.direction_to(p);
        let n_dot_l = n.dot(l);
        if n_dot_l <= 0.0 {
            continue;
        }

        let diffuse = material.kd(uv) * n_dot_l;

        let reflected = (2.0 * n_dot_l * n - l).normalize_or_zero();
        let r_dot_v = reflected.dot(to_eye).max(0.0);
        let specular = material.ks(uv) * r_dot_v.powf(material.shininess(uv));

        let shadow = light.shadow_attenuation(p, occluder);
        color += light.distance_attenuation(p) * shadow * (diffuse + specular);
    }

    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::{DirectionalLight, Material, PointLight, SHADOW_FLOOR};
    use glint_math::{Mat4, RayKind, TransformArena};
    use std::sync::Arc;

    /// Unit sphere at the origin, camera looking at it from +Z.
    fn sphere_scene(material: Material) -> Scene {
        let mut scene = Scene::new();
        scene.set_camera(
            glint_core::Camera::new().with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y),
        );
        scene.add_sphere(TransformArena::ROOT, Arc::new(material));
        scene
    }

    fn shade_front(scene: &Scene) -> Vec3 {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, RayKind::Visibility);
        let hit = scene.intersect(&ray).unwrap();
        shade(scene, &ray, &hit)
    }

    #[test]
    fn test_emissive_and_ambient_only_without_lights() {
        let material = Material::diffuse(Vec3::ONE)
            .with_emissive(Vec3::new(0.1, 0.0, 0.0))
            .with_ambient(Vec3::splat(0.5));
        let mut scene = sphere_scene(material);
        scene.add_ambient(Vec3::splat(0.2));

        let color = shade_front(&scene);
        assert!((color - Vec3::new(0.2, 0.1, 0.1)).length() < 1e-12);
    }

    #[test]
    fn test_head_on_diffuse() {
        let mut scene = sphere_scene(Material::diffuse(Vec3::new(0.5, 0.25, 1.0)));
        scene.add_light(DirectionalLight::new(-Vec3::Z, Vec3::ONE));

        let color = shade_front(&scene);
        assert!((color - Vec3::new(0.5, 0.25, 1.0)).length() < 1e-9);
    }

    #[test]
    fn test_back_lit_sphere_gets_no_direct_light() {
        let material = Material::diffuse(Vec3::ONE).with_ambient(Vec3::splat(0.1));
        let mut scene = sphere_scene(material);
        scene.add_ambient(Vec3::ONE);
        // Light shining toward the camera, from behind the sphere
        scene.add_light(DirectionalLight::new(Vec3::Z, Vec3::ONE));

        let color = shade_front(&scene);
        assert!((color - Vec3::splat(0.1)).length() < 1e-12);
    }

    #[test]
    fn test_specular_highlight_toward_eye() {
        let material = Material::default().with_specular(Vec3::ONE, 20.0);
        let mut scene = sphere_scene(material);
        scene.add_light(PointLight::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ONE));

        // Light at the eye: mirror direction points straight back
        let color = shade_front(&scene);
        assert!((color - Vec3::ONE).length() < 1e-9);
    }

    #[test]
    fn test_shadowed_point_keeps_floor() {
        let mut scene = sphere_scene(Material::diffuse(Vec3::ONE));
        // Blocker between the sphere and the light
        let blocker = scene.add_transform(
            TransformArena::ROOT,
            Mat4::from_translation(Vec3::new(0.0, 0.0, 3.0)) * Mat4::from_scale(Vec3::splat(0.5)),
        );
        scene.add_cube(blocker, Arc::new(Material::default()));
        scene.add_light(PointLight::new(Vec3::new(0.0, 0.0, 4.0), Vec3::ONE));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), -Vec3::Z, RayKind::Visibility);
        let hit = scene.intersect(&ray).unwrap();
        let color = shade(&scene, &ray, &hit);
        assert!((color - Vec3::splat(SHADOW_FLOOR)).length() < 1e-9);
    }
}
