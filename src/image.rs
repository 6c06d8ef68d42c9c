//! Row-major, y-down 8-bit RGB image buffer. Used both as the renderer's
//! output canvas and as the in-memory representation of a loaded texture.

use crate::color::{Color, Rgb};
use crate::error::{Result, RtError};

/// Nearest-neighbor is the spec's baseline; bilinear is the opt-in §4.4
/// allows implementations to offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TextureFilter {
    #[default]
    Nearest,
    Bilinear,
}

#[derive(Clone, Debug)]
pub struct Image {
    width: u16,
    height: u16,
    pixels: Vec<Rgb>,
}

impl Image {
    pub fn new(width: u16, height: u16) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RtError::resource("image dimensions must be positive"));
        }
        let len = width as usize * height as usize;
        Ok(Image { width, height, pixels: vec![Rgb::default(); len] })
    }

    pub fn from_pixels(width: u16, height: u16, pixels: Vec<Rgb>) -> Result<Self> {
        if pixels.len() != width as usize * height as usize {
            return Err(RtError::resource(format!(
                "expected {} pixels for a {}x{} image, got {}",
                width as usize * height as usize,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Image { width, height, pixels })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u16, y: u16) -> Rgb {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u16, y: u16, color: Rgb) {
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    /// Sample the image by `uv in [0,1]^2`, per §4.4: clamp the nearest
    /// texel indices into range rather than wrapping or erroring.
    pub fn sample(&self, u: f64, v: f64, filter: TextureFilter) -> Color {
        match filter {
            TextureFilter::Nearest => self.sample_nearest(u, v),
            TextureFilter::Bilinear => self.sample_bilinear(u, v),
        }
    }

    fn sample_nearest(&self, u: f64, v: f64) -> Color {
        let (x, y) = self.texel_coords(u, v);
        self.get(x, y).to_color()
    }

    fn texel_coords(&self, u: f64, v: f64) -> (u16, u16) {
        let w = self.width as i64;
        let h = self.height as i64;
        let x = ((u * self.width as f64).floor() as i64).clamp(0, w - 1);
        let y = ((v * self.height as f64).floor() as i64).clamp(0, h - 1);
        (x as u16, y as u16)
    }

    fn sample_bilinear(&self, u: f64, v: f64) -> Color {
        let fx = (u * self.width as f64 - 0.5).max(0.0);
        let fy = (v * self.height as f64 - 0.5).max(0.0);
        let x0 = fx.floor() as i64;
        let y0 = fy.floor() as i64;
        let w = self.width as i64;
        let h = self.height as i64;
        let x1 = (x0 + 1).min(w - 1);
        let y1 = (y0 + 1).min(h - 1);
        let x0 = x0.clamp(0, w - 1);
        let y0 = y0.clamp(0, h - 1);
        let tx = fx - x0 as f64;
        let ty = fy - y0 as f64;

        let c00 = self.get(x0 as u16, y0 as u16).to_color();
        let c10 = self.get(x1 as u16, y0 as u16).to_color();
        let c01 = self.get(x0 as u16, y1 as u16).to_color();
        let c11 = self.get(x1 as u16, y1 as u16).to_color();

        let top = c00 * (1.0 - tx) + c10 * tx;
        let bottom = c01 * (1.0 - tx) + c11 * tx;
        top * (1.0 - ty) + bottom * ty
    }
}
