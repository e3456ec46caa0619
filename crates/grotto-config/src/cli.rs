//! Command-line argument parsing for the Grotto generator.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Grotto command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "grotto", about = "Procedural cave and biome generator")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of cell columns.
    #[arg(long)]
    pub cells_x: Option<u32>,

    /// Number of cell rows.
    #[arg(long)]
    pub cells_y: Option<u32>,

    /// Cell width and height in tiles.
    #[arg(long)]
    pub cell_size: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write a PNG of the generated world.
    #[arg(long)]
    pub png: Option<PathBuf>,

    /// Print the generated world as ASCII.
    #[arg(long)]
    pub ascii: bool,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.worldgen.seed = seed;
        }
        if let Some(x) = args.cells_x {
            self.worldgen.cells_x = x;
        }
        if let Some(y) = args.cells_y {
            self.worldgen.cells_y = y;
        }
        if let Some(size) = args.cell_size {
            self.worldgen.cell_width = size;
            self.worldgen.cell_height = size;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref path) = args.png {
            self.output.png_path = Some(path.clone());
        }
        if args.ascii {
            self.output.ascii = true;
        }
    }
}
