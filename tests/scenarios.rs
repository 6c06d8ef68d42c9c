//! End-to-end scenarios against literal scene-file text, mirroring the
//! six concrete walkthroughs in the rendering design: a flat background,
//! a lit sphere, parallel-projection silhouette geometry, total internal
//! reflection, a textured checkerboard, and scene decode failures.

use cgmath::InnerSpace;
use raytracer::caster::cast;
use raytracer::color::Rgb;
use raytracer::geometry::Ray;
use raytracer::parser::{parse_file, parse_str};
use raytracer::ppm;
use raytracer::renderer::{render, RenderOptions};
use raytracer::shader::shade;
use raytracer::vector::vector as v;
use std::path::Path;

fn no_progress() -> RenderOptions {
    RenderOptions { show_progress: false }
}

#[test]
fn empty_scene_is_flat_background() {
    let text = "\
eye 0 0 5
viewdir 0 0 -1
updir 0 1 0
fovv 45
imsize 10 10
bkgcolor 0.1 0.1 0.1
light 10 10 10 1 1 1 1
";
    let scene = parse_str(text, Path::new(".")).unwrap();
    let image = render(&scene, &no_progress()).unwrap();
    let expected = Rgb { r: 25, g: 25, b: 25 };
    for px in image.pixels() {
        assert_eq!(*px, expected);
    }
}

#[test]
fn centered_sphere_is_lit_red_against_a_dim_background() {
    let text = "\
eye 0 0 4
viewdir 0 0 -1
updir 0 1 0
fovv 60
imsize 100 100
bkgcolor 0.1 0.1 0.1
mtlcolor 1 0 0 1 1 1 0.1 0.9 0.0 5 1 1
light 10 10 10 1 1 1 1
sphere 0 0 0 1
";
    let scene = parse_str(text, Path::new(".")).unwrap();
    let image = render(&scene, &no_progress()).unwrap();

    let center = image.get(50, 50);
    assert!(center.r > 127, "center pixel should read strongly red, got {center:?}");
    assert!(center.g < 60 && center.b < 60);

    let corner = image.get(0, 0);
    let bg = Rgb { r: 25, g: 25, b: 25 };
    assert_eq!(corner, bg);
}

#[test]
fn parallel_projection_silhouette_has_constant_radius_across_rows() {
    let text = "\
eye 0 0 4
viewdir 0 0 -1
updir 0 1 0
fovv 60
imsize 100 100
bkgcolor 0 0 0
mtlcolor 1 1 1 1 1 1 0.2 0.8 0.0 5 1 1
light 10 10 10 1 1 1 1
parallel
sphere 0 0 0 1
";
    let scene = parse_str(text, Path::new(".")).unwrap();
    let image = render(&scene, &no_progress()).unwrap();

    let row_span = |y: u16| -> Option<(i32, i32)> {
        let mut lit: Vec<i32> = Vec::new();
        for x in 0..image.width() {
            if image.get(x, y) != (Rgb { r: 0, g: 0, b: 0 }) {
                lit.push(x as i32);
            }
        }
        if lit.is_empty() {
            None
        } else {
            Some((*lit.first().unwrap(), *lit.last().unwrap()))
        }
    };

    // Rows straddling the equator of the sphere's silhouette should all
    // report the same chord width in an orthographic projection.
    let mut widths = Vec::new();
    for y in 48..53 {
        if let Some((lo, hi)) = row_span(y) {
            widths.push(hi - lo);
        }
    }
    assert!(widths.len() >= 3, "expected a lit silhouette across the central rows");
    let first = widths[0];
    for w in &widths {
        assert!((w - first).abs() <= 1, "silhouette width should stay constant near the equator: {widths:?}");
    }
}

#[test]
fn grazing_ray_on_a_dense_transparent_sphere_has_no_transmitted_light() {
    let text = "\
eye 0 0 4
viewdir 0 0 -1
updir 0 1 0
fovv 60
imsize 10 10
bkgcolor 0.1 0.1 0.1
mtlcolor 0 0 0.2 1 1 1 0.0 0.1 0.0 8 0.1 1.5
light 10 10 10 1 1 1 1
sphere 0 0 0 1
";
    let scene = parse_str(text, Path::new(".")).unwrap();

    // Graze the sphere near its silhouette, well beyond the critical angle.
    let ray = Ray::new(v(0.999, 0.0, 4.0), v(0.0, 0.0, -1.0));
    let hit = cast(&ray, &scene).unwrap();
    assert!(hit.is_hit());

    let eta1 = 1.0;
    let eta2 = 1.5;
    let front_normal = if hit.normal.dot(hit.incident) >= 0.0 { hit.normal } else { -hit.normal };
    let cos_theta_i = front_normal.dot(hit.incident).max(0.0);
    let ratio = eta1 / eta2;
    let k = 1.0 - ratio * ratio * (1.0 - cos_theta_i * cos_theta_i);
    assert!(k < 0.0, "test ray should be beyond the critical angle, k = {k}");

    // shade() must still return a finite, in-range color: the transmitted
    // branch contributes nothing, only the reflected term.
    let color = shade(&ray, &hit, &scene, eta1, 0).unwrap();
    assert!(color.r.is_finite() && (0.0..=1.0).contains(&color.r));
}

#[test]
fn textured_checkerboard_plane_samples_black_and_white_quadrants() {
    let tmp_dir = std::env::temp_dir().join("raytracer_scenario_textures");
    std::fs::create_dir_all(&tmp_dir).unwrap();
    let texture_path = tmp_dir.join("checker.ppm");

    let black = Rgb { r: 0, g: 0, b: 0 };
    let white = Rgb { r: 255, g: 255, b: 255 };
    let checker = raytracer::image::Image::from_pixels(2, 2, vec![black, white, white, black]).unwrap();
    ppm::write(&texture_path, &checker).unwrap();

    let text = "\
eye 0 0 5
viewdir 0 0 -1
updir 0 1 0
fovv 60
imsize 10 10
bkgcolor 0 0 0
mtlcolor 1 1 1 0 0 0 0.2 0.8 0.0 1 1 1
texture checker.ppm
v -10 -10 0
v 10 -10 0
v 10 10 0
v -10 10 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3
f 1/1 3/3 4/4
";
    let scene = parse_str(text, &tmp_dir).unwrap();

    // uv (0.25, 0.25) -> world (-5, -5, 0); uv (0.75, 0.25) -> world (5, -5, 0).
    let ray_black = Ray::new(v(0.0, 0.0, 5.0), v(-5.0, -5.0, 0.0) - v(0.0, 0.0, 5.0));
    let hit_black = cast(&ray_black, &scene).unwrap();
    assert!(hit_black.is_hit());
    let material = scene.material(hit_black.material.unwrap()).unwrap();
    assert_eq!(material.base_color(&scene.textures, hit_black.uv), raytracer::color::Color::new(0.0, 0.0, 0.0));

    let ray_white = Ray::new(v(0.0, 0.0, 5.0), v(5.0, -5.0, 0.0) - v(0.0, 0.0, 5.0));
    let hit_white = cast(&ray_white, &scene).unwrap();
    assert!(hit_white.is_hit());
    let material = scene.material(hit_white.material.unwrap()).unwrap();
    assert_eq!(material.base_color(&scene.textures, hit_white.uv), raytracer::color::Color::new(1.0, 1.0, 1.0));

    let _ = std::fs::remove_file(&texture_path);
}

#[test]
fn bad_scene_files_fail_to_decode() {
    let missing_required = "eye 0 0 4\n";
    assert!(parse_str(missing_required, Path::new(".")).is_err());

    let out_of_bounds = "\
eye 0 0 4
viewdir 0 0 -1
updir 0 1 0
fovv 200
imsize 10 10
bkgcolor 0 0 0
";
    assert!(parse_str(out_of_bounds, Path::new(".")).is_err());

    let extra_tokens = "\
eye 0 0 4 1
viewdir 0 0 -1
updir 0 1 0
fovv 60
imsize 10 10
bkgcolor 0 0 0
";
    assert!(parse_str(extra_tokens, Path::new(".")).is_err());

    let colinear = "\
eye 0 0 4
viewdir 0 0 -1
updir 0 0 1
fovv 60
imsize 10 10
bkgcolor 0 0 0
";
    assert!(parse_str(colinear, Path::new(".")).is_err());

    let unknown_keyword = "\
eye 0 0 4
viewdir 0 0 -1
updir 0 1 0
fovv 60
imsize 10 10
bkgcolor 0 0 0
paralell
";
    assert!(parse_str(unknown_keyword, Path::new(".")).is_err());

    assert!(parse_file(Path::new("/nonexistent/path/to/a.scene")).is_err());
}
