//! The recursive shader: ambient + per-light shadow-attenuated
//! Blinn-Phong + Fresnel-weighted reflection + Snell refraction, bounded
//! by `RECURSION_DEPTH` (§4.7, §4.8).

use cgmath::prelude::*;

use crate::caster::cast;
use crate::color::Color;
use crate::error::Result;
use crate::geometry::Ray;
use crate::light::blinn_phong;
use crate::scene::Scene;
use crate::shape::{Collision, CollisionKind, COLLISION_THRESHOLD};
use crate::vector::{self, Vector};

/// Fixed recursion bound: each reflection or refraction bounce counts once.
pub const RECURSION_DEPTH: u32 = 5;

/// Below this composed shadow factor a light is treated as fully occluded.
pub const SHADOW_THRESHOLD: f64 = 0.003;

pub fn shade(ray: &Ray, collision: &Collision, scene: &Scene, incoming_eta: f64, depth: u32) -> Result<Color> {
    if collision.kind == CollisionKind::None {
        return Ok(scene.background);
    }

    let material_idx = collision.material.expect("a Surface/Inside collision always carries a material");
    let material = scene.material(material_idx)?;
    let base_color = material.base_color(&scene.textures, collision.uv);

    let mut result = base_color * material.ambient_k;

    for light in &scene.lights {
        let Some((to_light, light_distance)) = light.direction_to(collision.point) else {
            continue;
        };
        let s = shadow_factor(collision.point, to_light, light_distance, scene)?;
        if s < SHADOW_THRESHOLD {
            continue;
        }
        let contribution = blinn_phong(base_color, material, collision.normal, to_light, collision.incident, light.color());
        result += contribution * s;
    }
    result = result.clamped();

    if depth >= RECURSION_DEPTH {
        return Ok(result);
    }

    // Front-facing normal: flip so it opposes the incoming ray.
    let front_normal = if collision.normal.dot(collision.incident) >= 0.0 { collision.normal } else { -collision.normal };
    let cos_theta_i = front_normal.dot(collision.incident).max(0.0);

    // eta2 is always the material's own index; eta1 is the incoming
    // medium's index, except when the surface is fully opaque, where the
    // spec has us treat the incoming side as vacuum (eta1 = 1) for Fresnel.
    let eta1 = if material.opacity >= 1.0 { 1.0 } else { incoming_eta };
    let eta2 = material.refraction_index;
    let f0 = ((eta2 - eta1) / (eta2 + eta1)).powi(2);
    let fresnel = f0 + (1.0 - f0) * (1.0 - cos_theta_i).powi(5);

    let reflect_dir = vector::normalize(front_normal * (2.0 * front_normal.dot(collision.incident)) - collision.incident);
    let reflect_ray = Ray::new(collision.point, reflect_dir);
    let reflected_hit = cast(&reflect_ray, scene)?;
    let reflected_color = shade(&reflect_ray, &reflected_hit, scene, eta1, depth + 1)?;
    result += reflected_color * fresnel;

    if material.is_transparent() {
        let ratio = eta1 / eta2;
        let k = 1.0 - ratio * ratio * (1.0 - cos_theta_i * cos_theta_i);
        if k >= 0.0 {
            let transmit_dir = vector::normalize(front_normal * (-k.sqrt()) + (front_normal * cos_theta_i - collision.incident) * ratio);
            let transmit_ray = Ray::new(collision.point, transmit_dir);
            let transmitted_hit = cast(&transmit_ray, scene)?;
            let transmitted_color = shade(&transmit_ray, &transmitted_hit, scene, eta2, depth + 1)?;
            result += transmitted_color * ((1.0 - fresnel) * (1.0 - material.opacity));
        }
        // else: total internal reflection, no transmitted contribution.
    }

    Ok(result.clamped())
}

/// Composed transparency factor of every occluder between `point` and the
/// light at `light_distance` along `to_light` (§4.7). `1.0` means
/// unoccluded, `0.0` means fully blocked.
fn shadow_factor(point: Vector, to_light: Vector, light_distance: f64, scene: &Scene) -> Result<f64> {
    let mut factor = 1.0;
    let mut origin = point;
    let mut remaining = light_distance;

    loop {
        let ray = Ray::new(origin, to_light);
        let hit = cast(&ray, scene)?;
        if hit.kind == CollisionKind::None {
            break;
        }
        if hit.distance >= remaining {
            break;
        }
        let material = scene.material(hit.material.expect("surface hit carries a material"))?;
        factor *= 1.0 - material.opacity;
        if factor < SHADOW_THRESHOLD {
            return Ok(0.0);
        }
        remaining -= hit.distance;
        origin = hit.point;
        if hit.distance < COLLISION_THRESHOLD {
            // Guard against zero-progress loops on degenerate occluders.
            break;
        }
    }

    Ok(factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::light::Light;
    use crate::material::Material;
    use crate::mesh::Mesh;
    use crate::scene::{Camera, Projection};
    use crate::shape::{Shape, Sphere};
    use crate::vector::vector as v;

    fn scene_with_sphere(material: Material) -> Scene {
        Scene {
            camera: Camera::new(v(0.0, 0.0, 4.0), v(0.0, 0.0, -1.0), v(0.0, 1.0, 0.0), 60.0, 100, 100).unwrap(),
            background: Color::new(0.1, 0.1, 0.1),
            projection: Projection::Perspective,
            shapes: vec![Shape::Sphere(Sphere { center: v(0.0, 0.0, 0.0), radius: 1.0, material: 0 })],
            lights: vec![Light::Point { position: v(10.0, 10.0, 10.0), color: Color::WHITE }],
            materials: vec![material],
            textures: vec![],
            mesh: Mesh::default(),
        }
    }

    #[test]
    fn background_returned_for_a_miss() {
        let scene = scene_with_sphere(Material::default());
        let ray = Ray::new(v(0.0, 0.0, 10.0), v(1.0, 0.0, 0.0));
        let hit = cast(&ray, &scene).unwrap();
        let color = shade(&ray, &hit, &scene, 1.0, 0).unwrap();
        assert_eq!(color, scene.background);
    }

    #[test]
    fn shaded_output_is_always_in_unit_range() {
        let mat = Material {
            diffuse_color: Color::new(1.0, 0.0, 0.0),
            ambient_k: 0.1,
            diffuse_k: 0.9,
            specular_k: 0.0,
            shininess: 8,
            opacity: 1.0,
            refraction_index: 1.0,
            ..Default::default()
        };
        let scene = scene_with_sphere(mat);
        let ray = Ray::new(v(0.0, 0.0, 4.0), v(0.0, 0.0, -1.0));
        let hit = cast(&ray, &scene).unwrap();
        let color = shade(&ray, &hit, &scene, 1.0, 0).unwrap();
        assert!(color.r >= 0.0 && color.r <= 1.0);
        assert!(color.g >= 0.0 && color.g <= 1.0);
        assert!(color.b >= 0.0 && color.b <= 1.0);
        assert!(color.r > 0.3 && color.g < 0.2 && color.b < 0.2);
    }

    #[test]
    fn total_internal_reflection_adds_no_transmitted_light() {
        // A glancing ray against a dense, mostly-transparent sphere: the
        // critical angle is exceeded, so refraction contributes nothing
        // and only the reflected term is added.
        let mat = Material {
            diffuse_color: Color::new(0.0, 0.0, 0.2),
            ambient_k: 0.0,
            diffuse_k: 0.1,
            specular_k: 0.0,
            shininess: 8,
            opacity: 0.1,
            refraction_index: 1.5,
            ..Default::default()
        };
        let scene = scene_with_sphere(mat);
        // Graze the sphere near its silhouette.
        let ray = Ray::new(v(0.999, 0.0, 4.0), v(0.0, 0.0, -1.0));
        let hit = cast(&ray, &scene).unwrap();
        if hit.is_hit() {
            let front_normal = if hit.normal.dot(hit.incident) >= 0.0 { hit.normal } else { -hit.normal };
            let cos_theta_i = front_normal.dot(hit.incident).max(0.0);
            let ratio = 1.0_f64 / 1.5;
            let k = 1.0 - ratio * ratio * (1.0 - cos_theta_i * cos_theta_i);
            assert!(k < 0.0, "test ray should be beyond the critical angle");
        }
    }
}
