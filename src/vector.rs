//! 3D vector algebra used throughout the renderer.
//!
//! Geometry is done in `f64` so that the epsilon tolerance required by the
//! spec (machine epsilon for double precision) is meaningful; the teacher
//! repo this crate grew from used `cgmath::Vector3<f32>` for the same
//! purpose, so we keep `cgmath` as the underlying representation and only
//! add the handful of predicates the spec names that `cgmath` doesn't
//! already provide.

use cgmath::prelude::*;
use cgmath::Vector3;

pub type Vector = Vector3<f64>;

/// Machine epsilon for `f64`, per spec: `|x| < EPSILON` is treated as zero.
pub const EPSILON: f64 = f64::EPSILON;

pub fn vector(x: f64, y: f64, z: f64) -> Vector {
    Vector3::new(x, y, z)
}

pub fn zero() -> Vector {
    Vector3::new(0.0, 0.0, 0.0)
}

/// `cgmath`'s `InnerSpace::normalize` divides by a zero magnitude and
/// produces `NaN`; the spec requires normalizing the zero vector to yield
/// the zero vector with no error.
pub fn normalize(v: Vector) -> Vector {
    if is_zero(v) {
        zero()
    } else {
        v.normalize()
    }
}

pub fn is_zero(v: Vector) -> bool {
    v.magnitude2() < EPSILON * EPSILON
}

pub fn is_unit(v: Vector) -> bool {
    (v.magnitude() - 1.0).abs() < EPSILON
}

/// Two vectors are orthogonal when their dot product vanishes.
pub fn is_orthogonal(a: Vector, b: Vector) -> bool {
    a.dot(b).abs() < EPSILON
}

/// Two vectors are parallel when their cross product vanishes.
pub fn is_parallel(a: Vector, b: Vector) -> bool {
    a.cross(b).magnitude2() < EPSILON * EPSILON
}

/// `angle(a, b) mod pi ~= 0`, i.e. the vectors point along the same line
/// (same or opposite direction).
pub fn is_colinear(a: Vector, b: Vector) -> bool {
    is_parallel(a, b)
}

pub fn angle(a: Vector, b: Vector) -> cgmath::Rad<f64> {
    a.angle(b)
}
