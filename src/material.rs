//! Per-shape material: Blinn-Phong coefficients, opacity, refraction index,
//! and an optional texture. Materials are owned once by the `Scene` and
//! shared by index between shapes (§9: "a shape borrows a material").

use crate::color::Color;
use crate::image::{Image, TextureFilter};

#[derive(Clone, Copy, Debug)]
pub struct Material {
    pub diffuse_color: Color,
    pub specular_color: Color,
    pub ambient_k: f64,
    pub diffuse_k: f64,
    pub specular_k: f64,
    pub shininess: i32,
    pub opacity: f64,
    pub refraction_index: f64,
    /// Index into `Scene.textures`, if this material has a texture bound.
    pub texture: Option<usize>,
    pub texture_filter: TextureFilter,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            diffuse_color: Color::BLACK,
            specular_color: Color::BLACK,
            ambient_k: 0.0,
            diffuse_k: 0.0,
            specular_k: 0.0,
            shininess: 1,
            opacity: 1.0,
            refraction_index: 1.0,
            texture: None,
            texture_filter: TextureFilter::Nearest,
        }
    }
}

impl Material {
    /// Base diffuse color at a hit: the sampled texture if one is bound
    /// and the surface provided valid uv, else the flat diffuse color.
    pub fn base_color(&self, textures: &[Image], uv: Option<(f64, f64)>) -> Color {
        match (self.texture, uv) {
            (Some(tex_idx), Some((u, v))) => match textures.get(tex_idx) {
                Some(tex) => tex.sample(u, v, self.texture_filter),
                None => self.diffuse_color,
            },
            _ => self.diffuse_color,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}
