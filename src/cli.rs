//! Command-line surface: `<scene-file> [-o <output-file>] [--threads <n>]`.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "raytracer", about = "render a scene description to a PPM image", version)]
pub struct Cli {
    /// Scene description to render.
    pub scene_file: PathBuf,

    /// Output path; defaults to the scene file's basename with a `.ppm` extension.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Worker thread count for the rayon pool; defaults to the number of logical cores.
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Suppress the progress bar.
    #[arg(long)]
    pub quiet: bool,
}

impl Cli {
    /// Resolves the output path per spec.md §6: the scene file's basename
    /// with its extension replaced by `.ppm` (or `.ppm` appended if it has
    /// none), unless `-o` was given.
    pub fn output_path(&self) -> PathBuf {
        if let Some(path) = &self.output {
            return path.clone();
        }
        self.scene_file.with_extension("ppm")
    }
}
