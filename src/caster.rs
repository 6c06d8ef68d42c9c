//! Linear ray caster: scans every shape in the scene for the closest
//! non-rejected intersection (§4.6). No acceleration structure, per the
//! spec's explicit non-goal.

use crate::error::Result;
use crate::geometry::Ray;
use crate::scene::Scene;
use crate::shape::{Collision, CollisionKind, COLLISION_THRESHOLD};

pub fn cast(ray: &Ray, scene: &Scene) -> Result<Collision> {
    let mut best = Collision::none();

    for shape in &scene.shapes {
        let candidate = shape.collide(ray, &scene.mesh)?;
        if candidate.kind == CollisionKind::None {
            continue;
        }
        if candidate.distance < COLLISION_THRESHOLD {
            continue;
        }
        if candidate.distance < best.distance {
            best = candidate;
        }
    }

    Ok(best)
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

    fn empty_scene_with(shapes: Vec<Shape>) -> Scene {
        Scene {
            camera: Camera::new(v(0.0, 0.0, 4.0), v(0.0, 0.0, -1.0), v(0.0, 1.0, 0.0), 60.0, 10, 10).unwrap(),
            background: Color::new(0.1, 0.1, 0.1),
            projection: Projection::Perspective,
            shapes,
            lights: vec![Light::Point { position: v(10.0, 10.0, 10.0), color: Color::WHITE }],
            materials: vec![Material::default()],
            textures: vec![],
            mesh: Mesh::default(),
        }
    }

    #[test]
    fn closest_of_two_overlapping_spheres_wins() {
        let near = Shape::Sphere(Sphere { center: v(0.0, 0.0, 0.0), radius: 1.0, material: 0 });
        let far = Shape::Sphere(Sphere { center: v(0.0, 0.0, -5.0), radius: 1.0, material: 0 });
        let scene = empty_scene_with(vec![far, near]);
        let ray = Ray::new(v(0.0, 0.0, 10.0), v(0.0, 0.0, -1.0));
        let hit = cast(&ray, &scene).unwrap();
        assert!((hit.distance - 5.0).abs() < 1e-9);
    }

    #[test]
    fn empty_scene_never_hits() {
        let scene = empty_scene_with(vec![]);
        let ray = Ray::new(v(0.0, 0.0, 10.0), v(0.0, 0.0, -1.0));
        assert!(!cast(&ray, &scene).unwrap().is_hit());
    }
}
