//! Command-line driver: generates a world from `config.ron` and dumps it.
//!
//! Run with `cargo run -p grotto-demo -- --seed 7 --ascii` to print a world,
//! or `--png world.png` to write an image of it.

use clap::Parser;
use grotto_config::{CliArgs, Config, default_config_dir};
use grotto_terrain::debug_viz::{render_ascii, render_biome_map, render_tiles};
use grotto_terrain::{CellArea, World};
use grotto_tiles::{CellCoord, TileRect};
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config
        .debug
        .log_dir
        .clone()
        .unwrap_or_else(|| config_dir.join("logs"));
    grotto_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let worldgen = &config.worldgen;
    let origin = CellCoord::new(worldgen.origin_x, worldgen.origin_y);
    let mut world = World::new(&config)?;
    world.regenerate(worldgen.seed, origin, worldgen.cells_x, worldgen.cells_y)?;

    let stats = world.stats();
    info!(
        seed = stats.seed,
        tiles = stats.tiles,
        solid = stats.solid_tiles,
        decorations = stats.decoration_tiles,
        connections = stats.cell_connections,
        "generated world"
    );
    for (name, cells) in &stats.biome_cells {
        info!(biome = %name, cells, "biome coverage");
    }

    let Some(grid) = world.grid() else {
        warn!("nothing generated");
        return Ok(());
    };
    let area = CellArea::new(origin, worldgen.cells_x, worldgen.cells_y)?;
    let first = world.settings().cell_rect(area.origin)?;
    let last = world.settings().cell_rect(area.far_corner())?;
    let rect = TileRect::new(
        first.x,
        first.y,
        u32::try_from(i64::from(last.max_x()) - i64::from(first.x))?,
        u32::try_from(i64::from(last.max_y()) - i64::from(first.y))?,
    );

    if config.output.ascii {
        print!("{}", render_ascii(grid, rect));
    }

    if let Some(path) = &config.output.png_path {
        let image = render_tiles(grid, rect, config.output.pixels_per_tile);
        std::fs::write(path, image.encode_png()?)?;
        info!(path = %path.display(), "wrote tile image");

        if let Some(cells) = world.cells() {
            let map = render_biome_map(cells, area, 16);
            let map_path = path.with_extension("biomes.png");
            std::fs::write(&map_path, map.encode_png()?)?;
            info!(path = %map_path.display(), "wrote biome map");
        }
    }

    Ok(())
}
