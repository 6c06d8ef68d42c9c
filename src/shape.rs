//! Shape variants (sphere, ellipsoid, infinite plane, triangle face) and
//! the transient `Collision` record their intersection routines produce.
//!
//! §9 calls for "a sum type ... with pattern-matched methods" in place of
//! the tagged-union-plus-typeless-pointer the original used; `Shape` is
//! that sum type, with a `collide` method per spec.md §4.2.

use cgmath::prelude::*;

use crate::error::Result;
use crate::geometry::{Plane as GeomPlane, Ray};
use crate::mesh::{self, Face, Mesh};
use crate::vector::{self, Vector};

/// Rejected intersections closer than this (and the primary ray's own
/// origin) are ignored, to avoid self-hits when casting off a surface.
pub const COLLISION_THRESHOLD: f64 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionKind {
    None,
    Inside,
    Surface,
}

#[derive(Clone, Copy, Debug)]
pub struct Collision {
    pub kind: CollisionKind,
    pub point: Vector,
    pub distance: f64,
    pub normal: Vector,
    /// `normalize(-ray.direction)`: points back toward where the ray came from.
    pub incident: Vector,
    pub material: Option<usize>,
    pub uv: Option<(f64, f64)>,
}

impl Collision {
    pub fn none() -> Self {
        Collision {
            kind: CollisionKind::None,
            point: vector::zero(),
            distance: f64::INFINITY,
            normal: vector::zero(),
            incident: vector::zero(),
            material: None,
            uv: None,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.kind != CollisionKind::None
    }
}

#[derive(Clone, Debug)]
pub struct Sphere {
    pub center: Vector,
    pub radius: f64,
    pub material: usize,
}

#[derive(Clone, Debug)]
pub struct Ellipsoid {
    pub center: Vector,
    /// Per-axis semi-dimensions, all strictly positive.
    pub dim: Vector,
    pub material: usize,
}

#[derive(Clone, Debug)]
pub struct PlaneShape {
    pub plane: GeomPlane,
    pub material: usize,
}

#[derive(Clone, Debug)]
pub struct FaceShape {
    pub face: Face,
    pub material: usize,
}

#[derive(Clone, Debug)]
pub enum Shape {
    Sphere(Sphere),
    Ellipsoid(Ellipsoid),
    Plane(PlaneShape),
    Face(FaceShape),
}

impl Shape {
    pub fn material_index(&self) -> usize {
        match self {
            Shape::Sphere(s) => s.material,
            Shape::Ellipsoid(e) => e.material,
            Shape::Plane(p) => p.material,
            Shape::Face(f) => f.material,
        }
    }

    pub fn collide(&self, ray: &Ray, mesh: &Mesh) -> Result<Collision> {
        if ray.is_degenerate() {
            return Ok(Collision::none());
        }
        match self {
            Shape::Sphere(s) => Ok(collide_sphere(s, ray)),
            Shape::Ellipsoid(e) => Ok(collide_ellipsoid(e, ray)),
            Shape::Plane(p) => Ok(collide_plane(p, ray)),
            Shape::Face(f) => collide_face(f, ray, mesh),
        }
    }
}

fn spherical_uv(normal: Vector) -> (f64, f64) {
    let u = normal.x.atan2(normal.z) / (2.0 * std::f64::consts::PI);
    let u = if u < 0.0 { u + 1.0 } else { u };
    let v = normal.y.clamp(-1.0, 1.0).acos() / std::f64::consts::PI;
    (u, v)
}

fn collide_sphere(sphere: &Sphere, ray: &Ray) -> Collision {
    let d = vector::normalize(ray.direction);
    let m = ray.origin - sphere.center;
    let b = d.dot(m);
    let c = m.dot(m) - sphere.radius * sphere.radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return Collision::none();
    }
    let sqrt_disc = discriminant.sqrt();
    let t0 = -b - sqrt_disc;
    let t1 = -b + sqrt_disc;
    let t = if t0 >= 0.0 {
        t0
    } else if t1 >= 0.0 {
        t1
    } else {
        return Collision::none();
    };

    let point = ray.origin + d * t;
    let normal = vector::normalize(point - sphere.center);
    let kind = if m.magnitude() <= sphere.radius { CollisionKind::Inside } else { CollisionKind::Surface };

    Collision {
        kind,
        point,
        distance: t,
        normal,
        incident: vector::normalize(-ray.direction),
        material: Some(sphere.material),
        uv: Some(spherical_uv(normal)),
    }
}

fn collide_ellipsoid(ellipsoid: &Ellipsoid, ray: &Ray) -> Collision {
    let d = vector::normalize(ray.direction);
    let m = ray.origin - ellipsoid.center;
    let inv2 = vector::vector(
        1.0 / (ellipsoid.dim.x * ellipsoid.dim.x),
        1.0 / (ellipsoid.dim.y * ellipsoid.dim.y),
        1.0 / (ellipsoid.dim.z * ellipsoid.dim.z),
    );
    let weighted = |v: Vector| vector::vector(v.x * inv2.x, v.y * inv2.y, v.z * inv2.z);

    let a = d.dot(weighted(d));
    let b = d.dot(weighted(m));
    let c = m.dot(weighted(m)) - 1.0;
    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return Collision::none();
    }
    let sqrt_disc = discriminant.sqrt();
    let t0 = (-b - sqrt_disc) / a;
    let t1 = (-b + sqrt_disc) / a;
    let t = if t0 >= 0.0 {
        t0
    } else if t1 >= 0.0 {
        t1
    } else {
        return Collision::none();
    };

    let point = ray.origin + d * t;
    let normal = vector::normalize(weighted(point - ellipsoid.center) * 2.0);
    let inside = m.dot(weighted(m)) <= 1.0;

    Collision {
        kind: if inside { CollisionKind::Inside } else { CollisionKind::Surface },
        point,
        distance: t,
        normal,
        incident: vector::normalize(-ray.direction),
        material: Some(ellipsoid.material),
        uv: None,
    }
}

fn collide_plane(plane_shape: &PlaneShape, ray: &Ray) -> Collision {
    let plane = &plane_shape.plane;
    let n = plane.normal();
    let d = vector::normalize(ray.direction);
    let den = n.dot(d);
    let num = n.dot(plane.origin - ray.origin);

    if den.abs() <= vector::EPSILON {
        return if num.abs() <= vector::EPSILON {
            Collision {
                kind: CollisionKind::Inside,
                point: ray.origin,
                distance: 0.0,
                normal: n,
                incident: vector::normalize(-ray.direction),
                material: Some(plane_shape.material),
                uv: None,
            }
        } else {
            Collision::none()
        };
    }

    let t = num / den;
    if t < 0.0 {
        return Collision::none();
    }

    Collision {
        kind: CollisionKind::Surface,
        point: ray.origin + d * t,
        distance: t,
        normal: n,
        incident: vector::normalize(-ray.direction),
        material: Some(plane_shape.material),
        uv: None,
    }
}

fn collide_face(face_shape: &FaceShape, ray: &Ray, mesh: &Mesh) -> Result<Collision> {
    let face = &face_shape.face;
    let [v0, v1, v2] = face.positions(mesh)?;
    let geometric_normal = vector::normalize((v1 - v0).cross(v2 - v0));
    let plane = GeomPlane::new(v0, v1 - v0, v2 - v0);
    let plane_shape = PlaneShape { plane, material: face_shape.material };
    let hit = collide_plane(&plane_shape, ray);
    if !hit.is_hit() {
        return Ok(Collision::none());
    }

    let Some((a, b, c)) = mesh::barycentric(v0, v1, v2, hit.point) else {
        return Ok(Collision::none());
    };

    let normal = if face.has_normals() {
        let [n0, n1, n2] = face.normals(mesh)?;
        vector::normalize(n0 * a + n1 * b + n2 * c)
    } else {
        geometric_normal
    };

    let uv = if face.has_texcoords() {
        let [t0, t1, t2] = face.texcoords(mesh)?;
        Some((t0.0 * a + t1.0 * b + t2.0 * c, t0.1 * a + t1.1 * b + t2.1 * c))
    } else {
        None
    };

    Ok(Collision { normal, uv, material: Some(face_shape.material), ..hit })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::vector as v;

    fn ray(origin: Vector, direction: Vector) -> Ray {
        Ray::new(origin, direction)
    }

    #[test]
    fn sphere_hit_distance_matches_eye_to_center_minus_radius() {
        let sphere = Sphere { center: v(0.0, 0.0, 0.0), radius: 1.0, material: 0 };
        let eye = v(0.0, 0.0, 4.0);
        let r = ray(eye, v(0.0, 0.0, -1.0));
        let hit = collide_sphere(&sphere, &r);
        assert_eq!(hit.kind, CollisionKind::Surface);
        assert!((hit.distance - (eye.magnitude() - sphere.radius)).abs() < 1e-9);
        assert!((hit.normal - vector::normalize(hit.point - sphere.center)).magnitude() < 1e-9);
    }

    #[test]
    fn sphere_miss_returns_none_kind() {
        let sphere = Sphere { center: v(0.0, 0.0, 0.0), radius: 1.0, material: 0 };
        let r = ray(v(10.0, 10.0, 10.0), v(1.0, 0.0, 0.0));
        assert_eq!(collide_sphere(&sphere, &r).kind, CollisionKind::None);
    }

    #[test]
    fn ray_origin_inside_sphere_reports_inside() {
        let sphere = Sphere { center: v(0.0, 0.0, 0.0), radius: 5.0, material: 0 };
        let r = ray(v(0.0, 0.0, 0.0), v(0.0, 0.0, -1.0));
        assert_eq!(collide_sphere(&sphere, &r).kind, CollisionKind::Inside);
    }

    #[test]
    fn distances_are_never_negative() {
        let sphere = Sphere { center: v(0.0, 0.0, 0.0), radius: 1.0, material: 0 };
        for origin in [v(5.0, 0.0, 0.0), v(0.0, 5.0, 0.0), v(0.0, 0.0, -5.0)] {
            let r = ray(origin, -origin);
            let hit = collide_sphere(&sphere, &r);
            if hit.is_hit() {
                assert!(hit.distance >= 0.0);
            }
        }
    }

    #[test]
    fn plane_parallel_to_ray_with_ray_on_plane_is_inside_at_zero() {
        let plane = PlaneShape { plane: GeomPlane::new(v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0)), material: 0 };
        let r = ray(v(0.5, 0.5, 0.0), v(1.0, 0.0, 0.0));
        let hit = collide_plane(&plane, &r);
        assert_eq!(hit.kind, CollisionKind::Inside);
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn plane_parallel_and_offset_never_hits() {
        let plane = PlaneShape { plane: GeomPlane::new(v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0)), material: 0 };
        let r = ray(v(0.0, 0.0, 5.0), v(1.0, 0.0, 0.0));
        assert_eq!(collide_plane(&plane, &r).kind, CollisionKind::None);
    }
}
