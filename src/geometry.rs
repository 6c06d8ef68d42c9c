//! Bare geometric primitives: an infinite ray/line, and a plane spanned by
//! two (not necessarily orthonormal) vectors.

use crate::vector::{self, Vector};

#[derive(Clone, Copy, Debug)]
pub struct Line {
    pub origin: Vector,
    pub direction: Vector,
}

impl Line {
    pub fn new(origin: Vector, direction: Vector) -> Self {
        Line { origin, direction }
    }

    pub fn is_degenerate(&self) -> bool {
        vector::is_zero(self.direction)
    }

    pub fn at(&self, t: f64) -> Vector {
        self.origin + self.direction * t
    }
}

pub type Ray = Line;

#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub origin: Vector,
    pub u: Vector,
    pub v: Vector,
}

impl Plane {
    pub fn new(origin: Vector, u: Vector, v: Vector) -> Self {
        Plane { origin, u, v }
    }

    /// `u x v`, not normalized.
    pub fn raw_normal(&self) -> Vector {
        self.u.cross(self.v)
    }

    pub fn normal(&self) -> Vector {
        vector::normalize(self.raw_normal())
    }
}
