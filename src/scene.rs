//! The `Scene`: camera pose and resolution, background, projection mode,
//! and the owned arrays of shapes/lights/materials/textures plus the mesh.
//! Built once by the parser and treated as immutable afterward (§5).

use crate::color::Color;
use crate::error::{Result, RtError};
use crate::image::Image;
use crate::light::Light;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::shape::Shape;
use crate::vector::{self, Vector};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Projection {
    Perspective,
    Parallel,
}

#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vector,
    pub view: Vector,
    pub up: Vector,
    pub fov_v_deg: f64,
    pub width: u32,
    pub height: u32,
}

impl Camera {
    pub fn new(eye: Vector, view: Vector, up: Vector, fov_v_deg: f64, width: u32, height: u32) -> Result<Self> {
        if vector::is_zero(view) {
            return Err(RtError::geometry("camera view direction must be nonzero"));
        }
        if vector::is_zero(up) {
            return Err(RtError::geometry("camera up vector must be nonzero"));
        }
        if vector::is_colinear(view, up) {
            return Err(RtError::geometry("camera view direction and up vector must not be colinear"));
        }
        if !(0.0 < fov_v_deg && fov_v_deg < 180.0) {
            return Err(RtError::geometry(format!("fovv {fov_v_deg} must be in (0, 180)")));
        }
        if width == 0 || height == 0 {
            return Err(RtError::geometry("image dimensions must be positive"));
        }
        Ok(Camera { eye, view, up, fov_v_deg, width, height })
    }
}

pub struct Scene {
    pub camera: Camera,
    pub background: Color,
    pub projection: Projection,
    pub shapes: Vec<Shape>,
    pub lights: Vec<Light>,
    pub materials: Vec<Material>,
    pub textures: Vec<Image>,
    pub mesh: Mesh,
}

impl Scene {
    pub fn material(&self, idx: usize) -> Result<&Material> {
        self.materials.get(idx).ok_or_else(|| RtError::geometry(format!("material index {idx} out of bounds")))
    }
}
