//! Point, directional, and spot lights: direction-to-light and the
//! Blinn-Phong direct-illumination term.

use cgmath::prelude::*;

use crate::color::Color;
use crate::material::Material;
use crate::vector::{self, Vector};

#[derive(Clone, Copy, Debug)]
pub enum Light {
    Point { position: Vector, color: Color },
    Directional { direction: Vector, color: Color },
    Spot { position: Vector, axis: Vector, half_angle_deg: f64, color: Color },
}

impl Light {
    pub fn color(&self) -> Color {
        match self {
            Light::Point { color, .. } => *color,
            Light::Directional { color, .. } => *color,
            Light::Spot { color, .. } => *color,
        }
    }

    /// `(unit direction toward the light, distance to it)`, or `None` when
    /// `p` falls outside a spotlight's cone (§4.5: "reject... when the
    /// angle ... exceeds the configured half-angle").
    pub fn direction_to(&self, p: Vector) -> Option<(Vector, f64)> {
        match self {
            Light::Point { position, .. } => {
                let l = *position - p;
                let distance = l.magnitude();
                Some((vector::normalize(l), distance))
            }
            Light::Directional { direction, .. } => Some((vector::normalize(-*direction), f64::INFINITY)),
            Light::Spot { position, axis, half_angle_deg, .. } => {
                let l = *position - p;
                let distance = l.magnitude();
                let dir = vector::normalize(l);
                let half_angle = half_angle_deg.to_radians();
                let angle_to_axis = vector::angle(dir, -vector::normalize(*axis));
                if angle_to_axis.0 > half_angle {
                    None
                } else {
                    Some((dir, distance))
                }
            }
        }
    }
}

/// Blinn-Phong diffuse + specular contribution of a single light at a hit
/// point, per §4.5. Ambient is applied once outside, by the caller.
#[allow(clippy::too_many_arguments)]
pub fn blinn_phong(
    base_color: Color,
    material: &Material,
    normal: Vector,
    to_light: Vector,
    to_eye: Vector,
    light_color: Color,
) -> Color {
    let n = normal;
    let l = to_light;
    let v = to_eye;
    let h = vector::normalize(l + v);

    let diffuse = base_color * (material.diffuse_k * n.dot(l).max(0.0));
    let specular = material.specular_color * (material.specular_k * n.dot(h).max(0.0).powi(material.shininess));

    (diffuse + specular).clamped().modulate(light_color)
}
