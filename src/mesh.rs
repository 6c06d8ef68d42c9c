//! Mesh store: parallel arrays of vertex positions, vertex normals, and 2D
//! texture coordinates, addressed by 1-based indices (`0` is the "unset"
//! sentinel for the normal/texcoord slot of a face corner). `Face`s are
//! index triples into this store rather than owning or borrowing pointers
//! into it, per the borrowed-relations design note in spec.md §9: the
//! mesh lives once on the `Scene` and every face looks values up through
//! it rather than holding a reference of its own.

use crate::error::{Result, RtError};
use crate::vector::{Vector, EPSILON};

pub type TexCoord = (f64, f64);

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vector>,
    pub normals: Vec<Vector>,
    pub texcoords: Vec<TexCoord>,
}

impl Mesh {
    pub fn vertex(&self, idx: u32) -> Result<Vector> {
        self.vertices
            .get(idx as usize - 1)
            .copied()
            .ok_or_else(|| RtError::geometry(format!("vertex index {idx} out of bounds (have {})", self.vertices.len())))
    }

    pub fn normal(&self, idx: u32) -> Result<Vector> {
        self.normals
            .get(idx as usize - 1)
            .copied()
            .ok_or_else(|| RtError::geometry(format!("normal index {idx} out of bounds (have {})", self.normals.len())))
    }

    pub fn texcoord(&self, idx: u32) -> Result<TexCoord> {
        self.texcoords
            .get(idx as usize - 1)
            .copied()
            .ok_or_else(|| RtError::geometry(format!("texcoord index {idx} out of bounds (have {})", self.texcoords.len())))
    }
}

/// One corner of a triangular face: a required vertex index and optional
/// (`0` = unset) normal/texcoord indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceCorner {
    pub v: u32,
    pub n: u32,
    pub t: u32,
}

impl FaceCorner {
    pub fn new(v: u32, n: u32, t: u32) -> Self {
        FaceCorner { v, n, t }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Face {
    pub corners: [FaceCorner; 3],
    /// Cached at construction so the shader doesn't re-inspect sentinel
    /// indices on every shade call.
    has_normals: bool,
    has_texcoords: bool,
}

impl Face {
    pub fn new(corners: [FaceCorner; 3]) -> Self {
        let has_normals = corners.iter().all(|c| c.n != 0);
        let has_texcoords = corners.iter().all(|c| c.t != 0);
        Face { corners, has_normals, has_texcoords }
    }

    pub fn positions(&self, mesh: &Mesh) -> Result<[Vector; 3]> {
        Ok([
            mesh.vertex(self.corners[0].v)?,
            mesh.vertex(self.corners[1].v)?,
            mesh.vertex(self.corners[2].v)?,
        ])
    }

    pub fn has_normals(&self) -> bool {
        self.has_normals
    }

    pub fn has_texcoords(&self) -> bool {
        self.has_texcoords
    }

    pub fn normals(&self, mesh: &Mesh) -> Result<[Vector; 3]> {
        Ok([
            mesh.normal(self.corners[0].n)?,
            mesh.normal(self.corners[1].n)?,
            mesh.normal(self.corners[2].n)?,
        ])
    }

    pub fn texcoords(&self, mesh: &Mesh) -> Result<[TexCoord; 3]> {
        Ok([
            mesh.texcoord(self.corners[0].t)?,
            mesh.texcoord(self.corners[1].t)?,
            mesh.texcoord(self.corners[2].t)?,
        ])
    }

}

/// Slack added to the barycentric containment test to avoid visible gaps
/// at shared triangle edges (spec §4.3; value tuned empirically upstream,
/// flagged there as possibly needing revisiting for single precision —
/// we're in `f64` throughout, so the original value is kept as-is).
pub const BARYCENTRIC_SLACK: f64 = 1e-4;

/// Returns `(alpha, beta, gamma)` such that `p = alpha*v0 + beta*v1 + gamma*v2`
/// when `p` lies inside (or within slack of) the triangle `v0 v1 v2`.
pub fn barycentric(v0: Vector, v1: Vector, v2: Vector, p: Vector) -> Option<(f64, f64, f64)> {
    use cgmath::InnerSpace;

    let area = |a: Vector, b: Vector, c: Vector| 0.5 * (b - a).cross(c - a).magnitude();
    let total = area(v0, v1, v2);
    if total < EPSILON {
        return None;
    }
    let a = area(v1, p, v2);
    let b = area(p, v0, v2);
    let c = area(v1, v0, p);

    if a + b + c > total + BARYCENTRIC_SLACK {
        return None;
    }

    Some((a / total, b / total, c / total))
}
