//! The textual scene-file parser. `spec.md` treats this as an external
//! collaborator and only specifies the interface it must expose (a
//! materialized `Scene`), but a renderer with no working parser can't
//! render anything, so it is fully implemented here.
//!
//! Grammar: line-oriented, `#`-comments, whitespace-insensitive within a
//! line. Unknown keywords, missing required keywords, out-of-range
//! numerics, or a trailing non-empty remainder on a line are all parse
//! failures.

use std::path::{Path, PathBuf};

use crate::color::Color;
use crate::error::{Result, RtError};
use crate::image::Image;
use crate::light::Light;
use crate::material::Material;
use crate::mesh::{Face, FaceCorner, Mesh};
use crate::ppm;
use crate::scene::{Camera, Projection, Scene};
use crate::shape::{Ellipsoid, FaceShape, Shape, Sphere};
use crate::vector::{self, Vector};

struct ParserState {
    base_dir: PathBuf,

    eye: Option<Vector>,
    view: Option<Vector>,
    up: Option<Vector>,
    fov: Option<f64>,
    size: Option<(u32, u32)>,
    bg: Option<Color>,
    projection: Projection,

    shapes: Vec<Shape>,
    lights: Vec<Light>,
    materials: Vec<Material>,
    textures: Vec<Image>,
    mesh: Mesh,

    current_material: Material,
    current_material_index: Option<usize>,
    current_texture_index: Option<usize>,
}

impl ParserState {
    fn new(base_dir: PathBuf) -> Self {
        ParserState {
            base_dir,
            eye: None,
            view: None,
            up: None,
            fov: None,
            size: None,
            bg: None,
            projection: Projection::Perspective,
            shapes: Vec::new(),
            lights: Vec::new(),
            materials: Vec::new(),
            textures: Vec::new(),
            mesh: Mesh::default(),
            current_material: Material::default(),
            current_material_index: None,
            current_texture_index: None,
        }
    }

    fn material_index(&mut self) -> usize {
        if let Some(idx) = self.current_material_index {
            return idx;
        }
        let mut mat = self.current_material;
        mat.texture = self.current_texture_index;
        self.materials.push(mat);
        let idx = self.materials.len() - 1;
        self.current_material_index = Some(idx);
        idx
    }

    fn invalidate_material_cache(&mut self) {
        self.current_material_index = None;
    }

    fn finish(self) -> Result<Scene> {
        let eye = self.eye.ok_or_else(|| RtError::parse(0, "missing required keyword 'eye'"))?;
        let view = self.view.ok_or_else(|| RtError::parse(0, "missing required keyword 'viewdir'"))?;
        let up = self.up.ok_or_else(|| RtError::parse(0, "missing required keyword 'updir'"))?;
        let fov = self.fov.ok_or_else(|| RtError::parse(0, "missing required keyword 'fovv'"))?;
        let (width, height) = self.size.ok_or_else(|| RtError::parse(0, "missing required keyword 'imsize'"))?;
        let background = self.bg.ok_or_else(|| RtError::parse(0, "missing required keyword 'bkgcolor'"))?;

        // §7 classifies a colinear view/up pair as a parse failure, not a
        // geometry failure, so it's checked here rather than left to
        // `Camera::new`'s more general geometry validation.
        if vector::is_colinear(view, up) {
            return Err(RtError::parse(0, "viewdir and updir must not be colinear"));
        }
        let camera = Camera::new(eye, view, up, fov, width, height)?;

        Ok(Scene {
            camera,
            background,
            projection: self.projection,
            shapes: self.shapes,
            lights: self.lights,
            materials: self.materials,
            textures: self.textures,
            mesh: self.mesh,
        })
    }
}

pub fn parse_file(path: &Path) -> Result<Scene> {
    let text = std::fs::read_to_string(path).map_err(|e| RtError::io(path, e))?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    parse_str(&text, &base_dir)
}

pub fn parse_str(text: &str, base_dir: &Path) -> Result<Scene> {
    let mut state = ParserState::new(base_dir.to_path_buf());

    for (line_no, raw_line) in text.lines().enumerate() {
        let line_no = line_no + 1;
        let line = match raw_line.find('#') {
            Some(idx) => &raw_line[..idx],
            None => raw_line,
        };
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else { continue };
        parse_line(&mut state, line_no, keyword, tokens)?;
    }

    state.finish()
}

fn parse_line<'a>(
    state: &mut ParserState,
    line_no: usize,
    keyword: &str,
    mut tokens: std::str::SplitWhitespace<'a>,
) -> Result<()> {
    match keyword {
        "eye" => state.eye = Some(vec3(&mut tokens, line_no)?),
        "viewdir" => state.view = Some(nonzero_vec3(&mut tokens, line_no, "viewdir")?),
        "updir" => state.up = Some(nonzero_vec3(&mut tokens, line_no, "updir")?),
        "fovv" => {
            let deg = number(&mut tokens, line_no, "fovv")?;
            if !(0.0 < deg && deg < 180.0) {
                return Err(RtError::parse(line_no, format!("fovv {deg} must be in (0, 180)")));
            }
            state.fov = Some(deg);
        }
        "imsize" => {
            let w = number(&mut tokens, line_no, "imsize width")?;
            let h = number(&mut tokens, line_no, "imsize height")?;
            if w <= 0.0 || h <= 0.0 {
                return Err(RtError::parse(line_no, "imsize width/height must be positive"));
            }
            state.size = Some((w as u32, h as u32));
        }
        "bkgcolor" => state.bg = Some(color(&mut tokens, line_no)?),
        "parallel" => state.projection = Projection::Parallel,
        "mtlcolor" => {
            let dr = number(&mut tokens, line_no, "mtlcolor")?;
            let dg = number(&mut tokens, line_no, "mtlcolor")?;
            let db = number(&mut tokens, line_no, "mtlcolor")?;
            let sr = number(&mut tokens, line_no, "mtlcolor")?;
            let sg = number(&mut tokens, line_no, "mtlcolor")?;
            let sb = number(&mut tokens, line_no, "mtlcolor")?;
            let ka = number(&mut tokens, line_no, "mtlcolor")?;
            let kd = number(&mut tokens, line_no, "mtlcolor")?;
            let ks = number(&mut tokens, line_no, "mtlcolor")?;
            let n = number(&mut tokens, line_no, "mtlcolor")?;
            let opacity = number(&mut tokens, line_no, "mtlcolor")?;
            let eta = number(&mut tokens, line_no, "mtlcolor")?;
            if !(0.0..=1.0).contains(&opacity) {
                return Err(RtError::parse(line_no, "mtlcolor opacity must be in [0,1]"));
            }
            if eta < 1.0 {
                return Err(RtError::parse(line_no, "mtlcolor refraction index must be >= 1"));
            }
            state.current_material = Material {
                diffuse_color: Color::new(dr, dg, db),
                specular_color: Color::new(sr, sg, sb),
                ambient_k: ka,
                diffuse_k: kd,
                specular_k: ks,
                shininess: n as i32,
                opacity,
                refraction_index: eta,
                texture: None,
                texture_filter: Default::default(),
            };
            state.invalidate_material_cache();
        }
        "texture" => {
            match tokens.next() {
                None => state.current_texture_index = None,
                Some(rel_path) => {
                    ensure_exhausted(&mut tokens, line_no, "texture")?;
                    let path = state.base_dir.join(rel_path);
                    let image = ppm::load(&path)?;
                    state.textures.push(image);
                    state.current_texture_index = Some(state.textures.len() - 1);
                }
            }
            state.invalidate_material_cache();
            return Ok(());
        }
        "sphere" => {
            let center = vec3(&mut tokens, line_no)?;
            let radius = number(&mut tokens, line_no, "sphere radius")?;
            if radius <= 0.0 {
                return Err(RtError::parse(line_no, "sphere radius must be positive"));
            }
            let material = state.material_index();
            state.shapes.push(Shape::Sphere(Sphere { center, radius, material }));
        }
        "ellipsoid" => {
            let center = vec3(&mut tokens, line_no)?;
            let dim = vec3(&mut tokens, line_no)?;
            if dim.x <= 0.0 || dim.y <= 0.0 || dim.z <= 0.0 {
                return Err(RtError::parse(line_no, "ellipsoid dimensions must all be positive"));
            }
            let material = state.material_index();
            state.shapes.push(Shape::Ellipsoid(Ellipsoid { center, dim, material }));
        }
        "light" => {
            let pos_or_dir = vec3(&mut tokens, line_no)?;
            let w = number(&mut tokens, line_no, "light w")?;
            let color = color(&mut tokens, line_no)?;
            let light = if w == 0.0 {
                if vector::is_zero(pos_or_dir) {
                    return Err(RtError::parse(line_no, "directional light direction must be nonzero"));
                }
                Light::Directional { direction: pos_or_dir, color }
            } else if w == 1.0 {
                Light::Point { position: pos_or_dir, color }
            } else {
                return Err(RtError::parse(line_no, "light w must be 0 or 1"));
            };
            state.lights.push(light);
        }
        "spotlight" => {
            let position = vec3(&mut tokens, line_no)?;
            let axis = nonzero_vec3(&mut tokens, line_no, "spotlight axis")?;
            let angle_deg = number(&mut tokens, line_no, "spotlight angle")?;
            if !(0.0..=360.0).contains(&angle_deg) {
                return Err(RtError::parse(line_no, "spotlight angle must be in [0,360]"));
            }
            let color = color(&mut tokens, line_no)?;
            state.lights.push(Light::Spot { position, axis, half_angle_deg: angle_deg, color });
        }
        "v" => state.mesh.vertices.push(vec3(&mut tokens, line_no)?),
        "vn" => state.mesh.normals.push(vec3(&mut tokens, line_no)?),
        "vt" => {
            let u = number(&mut tokens, line_no, "vt u")?;
            let v = number(&mut tokens, line_no, "vt v")?;
            state.mesh.texcoords.push((u, v));
        }
        "f" => {
            let c0 = face_corner(&mut tokens, line_no)?;
            let c1 = face_corner(&mut tokens, line_no)?;
            let c2 = face_corner(&mut tokens, line_no)?;
            let material = state.material_index();
            state.shapes.push(Shape::Face(FaceShape { face: Face::new([c0, c1, c2]), material }));
        }
        other => return Err(RtError::parse(line_no, format!("unknown keyword '{other}'"))),
    }

    ensure_exhausted(&mut tokens, line_no, keyword)?;
    Ok(())
}

fn number(tokens: &mut std::str::SplitWhitespace, line_no: usize, what: &str) -> Result<f64> {
    let tok = tokens.next().ok_or_else(|| RtError::parse(line_no, format!("missing {what}")))?;
    tok.parse().map_err(|_| RtError::parse(line_no, format!("{what}: {tok:?} is not a number")))
}

fn vec3(tokens: &mut std::str::SplitWhitespace, line_no: usize) -> Result<Vector> {
    let x = number(tokens, line_no, "vector x")?;
    let y = number(tokens, line_no, "vector y")?;
    let z = number(tokens, line_no, "vector z")?;
    Ok(vector::vector(x, y, z))
}

fn nonzero_vec3(tokens: &mut std::str::SplitWhitespace, line_no: usize, what: &str) -> Result<Vector> {
    let v = vec3(tokens, line_no)?;
    if vector::is_zero(v) {
        return Err(RtError::parse(line_no, format!("{what} must be nonzero")));
    }
    Ok(v)
}

fn color(tokens: &mut std::str::SplitWhitespace, line_no: usize) -> Result<Color> {
    let r = number(tokens, line_no, "color r")?;
    let g = number(tokens, line_no, "color g")?;
    let b = number(tokens, line_no, "color b")?;
    Ok(Color::new(r, g, b))
}

fn face_corner(tokens: &mut std::str::SplitWhitespace, line_no: usize) -> Result<FaceCorner> {
    let tok = tokens.next().ok_or_else(|| RtError::parse(line_no, "missing face corner"))?;
    let parts: Vec<&str> = tok.split('/').collect();
    // `0` is the "unset" sentinel for the n/t slots only; the vertex slot
    // is never allowed to be `0` (spec §6: "0 is not allowed in slots").
    let parse_vertex_idx = |s: &str| -> Result<u32> {
        let idx: u32 = s.parse().map_err(|_| RtError::parse(line_no, format!("face vertex index {s:?} is not an integer")))?;
        if idx == 0 {
            return Err(RtError::parse(line_no, "face vertex index must not be 0"));
        }
        Ok(idx)
    };
    let parse_idx = |s: &str| -> Result<u32> {
        s.parse().map_err(|_| RtError::parse(line_no, format!("face index {s:?} is not an integer")))
    };
    match parts.len() {
        1 => Ok(FaceCorner::new(parse_vertex_idx(parts[0])?, 0, 0)),
        2 => {
            let t_idx = if parts[1].is_empty() { 0 } else { parse_idx(parts[1])? };
            Ok(FaceCorner::new(parse_vertex_idx(parts[0])?, 0, t_idx))
        }
        3 => {
            let t_idx = if parts[1].is_empty() { 0 } else { parse_idx(parts[1])? };
            let n_idx = if parts[2].is_empty() { 0 } else { parse_idx(parts[2])? };
            Ok(FaceCorner::new(parse_vertex_idx(parts[0])?, n_idx, t_idx))
        }
        _ => Err(RtError::parse(line_no, format!("malformed face corner {tok:?}"))),
    }
}

fn ensure_exhausted(tokens: &mut std::str::SplitWhitespace, line_no: usize, keyword: &str) -> Result<()> {
    if let Some(extra) = tokens.next() {
        return Err(RtError::parse(line_no, format!("unexpected trailing token {extra:?} after '{keyword}'")));
    }
    Ok(())
}
