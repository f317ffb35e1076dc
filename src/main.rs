#![deny(future_incompatible)]
#![deny(nonstandard_style)]
#![deny(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use gridcast::{canvas::Canvas, cfg, mesh::Mesh, render};

#[macro_use]
extern crate log;

//
// Main
//

#[derive(clap::Parser)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Builds the grid for a mesh and counts its triangle references.
    Grid(GridArgs),
    /// Renders a mesh through the camera into an image.
    Render(RenderArgs),
    /// Writes the default render config.
    Config(ConfigArgs),
}

#[derive(clap::Args)]
struct GridArgs {
    #[arg(long)]
    obj: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(clap::Args)]
struct RenderArgs {
    #[arg(long)]
    obj: PathBuf,

    #[arg(long)]
    output: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = render::Mode::Heatmap)]
    mode: render::Mode,
}

#[derive(clap::Args)]
struct ConfigArgs {
    #[arg(long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    // Init logging.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Execute command.
    match Args::parse().command {
        Commands::Grid(args) => run_grid(&args),
        Commands::Render(args) => run_render(&args),
        Commands::Config(args) => cfg::write_to_file(&args.output, &cfg::RenderConfig::default()),
    }
}

fn load_config(path: Option<&Path>) -> Result<cfg::RenderConfig> {
    match path {
        Some(path) => {
            let config = cfg::read_from_file(path)?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => {
            info!("Using default config");
            Ok(cfg::RenderConfig::default())
        }
    }
}

fn run_grid(args: &GridArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mesh = Mesh::load(&args.obj, config.grid)?;
    let grid = mesh.grid();
    let [nx, ny, nz] = grid.dimensions();
    let count = render::scan_grid(grid)?;
    info!("Grid {nx}x{ny}x{nz} holds {count} references to {} triangles", mesh.triangles().len());
    let stats = grid.stats();
    info!(
        "{} of {} cells empty, longest cell holds {} triangles",
        stats.empty_cell_count, stats.cell_count, stats.max_cell_len
    );
    Ok(())
}

fn run_render(args: &RenderArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mesh = Mesh::load(&args.obj, config.grid)?;
    let camera = config.camera.camera()?;
    let (width, height) = config.image_size();
    let mut canvas = Canvas::new(width, height);
    match args.mode {
        render::Mode::Heatmap => {
            let stats = render::heatmap(&camera, mesh.grid(), &mut canvas)?;
            info!(
                "{} of {} pixels see candidates, at most {}, {:.02} on average",
                stats.covered_pixels,
                width * height,
                stats.max_candidates,
                stats.mean_candidates
            );
        }
        render::Mode::Splat => {
            render::splat(&camera, &mesh, &mut canvas, config.znear, config.zfar)?;
        }
    }
    canvas.export(&args.output)
}
