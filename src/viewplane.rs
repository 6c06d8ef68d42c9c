//! View plane construction and per-pixel primary ray generation (§4.9).

use cgmath::prelude::*;

use crate::error::{Result, RtError};
use crate::geometry::Ray;
use crate::scene::{Camera, Projection};
use crate::vector::{self, Vector};

/// Distance from the eye to the view plane for perspective projection;
/// `0` for parallel, per spec.
const VIEW_DISTANCE: f64 = 1.0;

pub struct ViewPlane {
    pub corner: Vector,
    pub u_basis: Vector,
    pub v_basis: Vector,
    pub width: f64,
    pub height: f64,
    pub projection: Projection,
    pub view_dir: Vector,
}

impl ViewPlane {
    pub fn build(camera: &Camera, projection: Projection) -> Result<Self> {
        let view = vector::normalize(camera.view);
        let up = camera.up;

        let u_basis = view.cross(up);
        if vector::is_zero(u_basis) {
            return Err(RtError::geometry("view direction and up vector produce a degenerate horizontal basis"));
        }
        let u_basis = vector::normalize(u_basis);

        let v_basis = u_basis.cross(view);
        if vector::is_zero(v_basis) {
            return Err(RtError::geometry("degenerate vertical basis"));
        }
        let v_basis = vector::normalize(v_basis);

        let aspect = camera.width as f64 / camera.height as f64;
        let fov = camera.fov_v_deg.to_radians();
        let plane_height = 2.0 * (fov / 2.0).tan();
        let plane_width = plane_height * aspect;

        let d = match projection {
            Projection::Perspective => VIEW_DISTANCE,
            Projection::Parallel => 0.0,
        };
        let center = camera.eye + view * d;
        let corner = center - u_basis * (plane_width / 2.0) + v_basis * (plane_height / 2.0);

        Ok(ViewPlane { corner, u_basis, v_basis, width: plane_width, height: plane_height, projection, view_dir: view })
    }

    /// Primary ray for pixel `(x, y)`, `x in [0, W)`, `y in [0, H)`.
    pub fn primary_ray(&self, eye: Vector, x: u32, y: u32, w: u32, h: u32) -> Ray {
        let x_frac = if w > 1 { x as f64 / (w - 1) as f64 } else { 0.0 };
        let y_frac = if h > 1 { y as f64 / (h - 1) as f64 } else { 0.0 };
        let target = self.corner + self.u_basis * (x_frac * self.width) - self.v_basis * (y_frac * self.height);

        match self.projection {
            Projection::Perspective => Ray::new(eye, target - eye),
            Projection::Parallel => Ray::new(target, self.view_dir),
        }
    }
}
