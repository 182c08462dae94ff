use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use terrain_viewport::config::Config;
use terrain_viewport::explorer::run_explorer;
use terrain_viewport::logging::init_file_logging;

#[derive(Parser, Debug)]
#[command(name = "terrain_viewport")]
#[command(about = "Scroll around a procedurally generated terrain map in the terminal")]
struct Args {
    /// Width of the terrain grid in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the terrain grid in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON config file; flags given here override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of rings a ping expands through
    #[arg(long)]
    ping_strength: Option<usize>,

    /// Append diagnostics to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(width) = args.width {
        config.world_width = width;
    }
    if let Some(height) = args.height {
        config.world_height = height;
    }
    if let Some(strength) = args.ping_strength {
        config.ping_strength = strength;
    }
    config.validate()?;

    if let Some(path) = &args.log_file {
        init_file_logging(path)?;
    }

    let seed = args.seed.unwrap_or_else(rand::random);

    println!("Generating terrain with seed: {}", seed);
    println!("Map size: {}x{}", config.world_width, config.world_height);
    tracing::info!(seed, width = config.world_width, height = config.world_height, "starting explorer");

    run_explorer(&config, seed)
}
