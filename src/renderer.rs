//! Builds the view plane, dispatches one primary ray per pixel, and writes
//! the resulting image (§4.10). Parallelized over scanlines with `rayon`;
//! each worker writes a disjoint row of the output buffer, matching the
//! teacher repo's own `ProgressBar`-driven pixel loop (§5: no locks
//! required for a read-only scene).

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::caster::cast;
use crate::color::Rgb;
use crate::error::Result;
use crate::image::Image;
use crate::scene::Scene;
use crate::shader::shade;
use crate::viewplane::ViewPlane;

pub struct RenderOptions {
    pub show_progress: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { show_progress: true }
    }
}

pub fn render(scene: &Scene, options: &RenderOptions) -> Result<Image> {
    let view_plane = ViewPlane::build(&scene.camera, scene.projection)?;
    let (width, height) = (scene.camera.width, scene.camera.height);

    let progress = if options.show_progress {
        let bar = ProgressBar::new((width as u64) * (height as u64));
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}, {eta_precise}] {wide_bar:.green/blue} {pos:>7}/{len:7}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        Some(bar)
    } else {
        None
    };

    tracing::info!(width, height, "rendering scene");

    // One Vec<Rgb> per row, computed independently and concatenated, so each
    // worker only ever writes its own row.
    let rows: Result<Vec<Vec<Rgb>>> = (0..height)
        .into_par_iter()
        .map(|y| {
            let mut row = Vec::with_capacity(width as usize);
            for x in 0..width {
                let ray = view_plane.primary_ray(scene.camera.eye, x, y, width, height);
                let hit = cast(&ray, scene)?;
                let color = shade(&ray, &hit, scene, 1.0, 0)?;
                row.push(color.to_rgb());
            }
            if let Some(bar) = &progress {
                bar.inc(width as u64);
            }
            Ok(row)
        })
        .collect();
    let rows = rows?;

    if let Some(bar) = progress {
        bar.finish();
    }

    let pixels: Vec<Rgb> = rows.into_iter().flatten().collect();
    let image = Image::from_pixels(width as u16, height as u16, pixels)?;
    tracing::info!("render complete");
    Ok(image)
}
