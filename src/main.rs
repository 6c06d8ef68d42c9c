use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use raytracer::cli::Cli;
use raytracer::parser::parse_file;
use raytracer::renderer::{render, RenderOptions};
use raytracer::{ppm, Result};

const USAGE: &str = "\
raytracer: render a scene description to a PPM image
usage: raytracer <scene-file> [-o <output-file>] [--threads <n>]";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // spec.md §6: "With no arguments or -h/--help print usage and exit
    // non-zero" -- clap's own --help handling exits 0, so the no-args and
    // help cases are special-cased ahead of it.
    let args: Vec<String> = std::env::args().collect();
    if args.len() <= 1 || args[1] == "-h" || args[1] == "--help" {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("raytracer: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| raytracer::RtError::resource(e.to_string()))?;
    }

    tracing::info!(scene = %cli.scene_file.display(), "decoding scene");
    let scene = parse_file(&cli.scene_file)?;

    let options = RenderOptions { show_progress: !cli.quiet };
    let image = render(&scene, &options)?;

    let output_path = cli.output_path();
    ppm::write(&output_path, &image)?;
    tracing::info!(output = %output_path.display(), "wrote image");

    Ok(())
}
