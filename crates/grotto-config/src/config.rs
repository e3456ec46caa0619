//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use grotto_tiles::TileDef;
use serde::{Deserialize, Serialize};

use crate::biome::{
    BiomeConfig, BlendConfig, BlendMode, CaveSettings, ConnectionConfig, DecorationConfig,
    DecorationEntryConfig, DecorationPlacement, NoiseConfig, NoiseKind, RadiusRange,
    StructureConfig, StructureSpawnConfig,
};
use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World layout and global generation switches.
    pub worldgen: WorldgenConfig,
    /// Tile atlas entries (air is implicit).
    pub tiles: Vec<TileDef>,
    /// Biome definitions.
    pub biomes: Vec<BiomeConfig>,
    /// Fixed layouts available to biomes.
    pub structures: Vec<StructureConfig>,
    /// Debug/development settings.
    pub debug: DebugConfig,
    /// What the driver writes after generating.
    pub output: OutputConfig,
}

/// World layout and global generation switches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldgenConfig {
    /// World seed.
    pub seed: u64,
    /// First cell column.
    pub origin_x: i32,
    /// First cell row.
    pub origin_y: i32,
    /// Number of cell columns to generate.
    pub cells_x: u32,
    /// Number of cell rows to generate.
    pub cells_y: u32,
    /// Cell width in tiles.
    pub cell_width: u32,
    /// Cell height in tiles.
    pub cell_height: u32,
    /// Probability of adopting each assigned neighbour when a biome copies.
    pub copy_chance_of_a_biome: f64,
    /// Carve tunnels between neighbouring regions.
    pub connect_to_closest_biome: bool,
    /// Blend region borders.
    pub blend_biomes: bool,
}

impl Default for WorldgenConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            origin_x: 0,
            origin_y: 0,
            cells_x: 4,
            cells_y: 4,
            cell_width: 50,
            cell_height: 50,
            copy_chance_of_a_biome: 0.5,
            connect_to_closest_biome: true,
            blend_biomes: true,
        }
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g. "debug", "info,grotto_terrain=trace").
    pub log_level: String,
    /// Directory for JSON log files in debug builds.
    pub log_dir: Option<PathBuf>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Output of the driver binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Print the world as ASCII to stdout.
    pub ascii: bool,
    /// Write a PNG of the world here.
    pub png_path: Option<PathBuf>,
    /// Pixel size of one tile in the PNG.
    pub pixels_per_tile: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            ascii: false,
            png_path: None,
            pixels_per_tile: 2,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worldgen: WorldgenConfig::default(),
            tiles: default_tiles(),
            biomes: default_biomes(),
            structures: default_structures(),
            debug: DebugConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

fn tile(name: &str, solid: bool) -> TileDef {
    TileDef {
        name: name.to_string(),
        solid,
    }
}

fn default_tiles() -> Vec<TileDef> {
    vec![
        tile("stone", true),
        tile("mossy_stone", true),
        tile("crystal_rock", true),
        tile("brick", true),
        tile("pebbles", false),
        tile("stalactite", false),
        tile("moss", false),
        tile("mushroom", false),
        tile("vine", false),
        tile("crystal", false),
    ]
}

fn entry(tile: &str, weight: f64) -> DecorationEntryConfig {
    DecorationEntryConfig {
        tile: tile.to_string(),
        weight,
    }
}

fn default_biomes() -> Vec<BiomeConfig> {
    let stone = BiomeConfig {
        name: "stone_caves".to_string(),
        spawn_weight: 2.0,
        decorations: vec![
            DecorationConfig {
                placement: DecorationPlacement::Ceiling,
                entries: vec![entry("stalactite", 1.0)],
                ..DecorationConfig::default()
            },
            DecorationConfig {
                placement: DecorationPlacement::Ground,
                entries: vec![entry("pebbles", 3.0), entry("mushroom", 1.0)],
                ..DecorationConfig::default()
            },
        ],
        ..BiomeConfig::default()
    };

    let mossy = BiomeConfig {
        name: "mossy_grotto".to_string(),
        spawn_weight: 1.0,
        copy_chance: 0.4,
        base_tile: "mossy_stone".to_string(),
        noise: NoiseConfig {
            kind: NoiseKind::Fbm,
            frequency: 0.09,
            octaves: 3,
            threshold: 0.47,
            seed_offset: 3,
            ..NoiseConfig::default()
        },
        cave: CaveSettings {
            smoothing_iterations: 5,
            roughness_offset: 1,
            ..CaveSettings::default()
        },
        decorations: vec![
            DecorationConfig {
                placement: DecorationPlacement::Ceiling,
                entries: vec![entry("vine", 2.0), entry("moss", 1.0)],
                ..DecorationConfig::default()
            },
            DecorationConfig {
                placement: DecorationPlacement::Ground,
                density: NoiseConfig {
                    kind: NoiseKind::Perlin,
                    frequency: 0.15,
                    threshold: 0.55,
                    seed_offset: 29,
                    ..NoiseConfig::default()
                },
                entries: vec![entry("moss", 4.0), entry("mushroom", 1.0)],
            },
        ],
        blend: BlendConfig {
            mode: BlendMode::Sample,
            radius: RadiusRange { min: 2, max: 5 },
        },
        ..BiomeConfig::default()
    };

    let crystal = BiomeConfig {
        name: "crystal_hollows".to_string(),
        spawn_weight: 1.0,
        copy_chance: 0.2,
        expansion_chance: 0.1,
        base_tile: "crystal_rock".to_string(),
        noise: NoiseConfig {
            kind: NoiseKind::White,
            threshold: 0.5,
            seed_offset: 7,
            ..NoiseConfig::default()
        },
        cave: CaveSettings {
            min_room_size: 40,
            tunnel_radius: RadiusRange { min: 2, max: 3 },
            ..CaveSettings::default()
        },
        decorations: vec![DecorationConfig {
            placement: DecorationPlacement::Ground,
            entries: vec![entry("crystal", 1.0)],
            ..DecorationConfig::default()
        }],
        connection: ConnectionConfig {
            up: false,
            forced: Vec::new(),
            ..ConnectionConfig::default()
        },
        structures: vec![StructureSpawnConfig {
            name: "shrine".to_string(),
            chance: 0.5,
        }],
        ..BiomeConfig::default()
    };

    vec![stone, mossy, crystal]
}

fn default_structures() -> Vec<StructureConfig> {
    let b = || Some("brick".to_string());
    let a = || Some("air".to_string());
    let c = || Some("crystal".to_string());
    vec![StructureConfig {
        name: "shrine".to_string(),
        rows: vec![
            vec![b(), b(), b(), b(), b()],
            vec![b(), a(), a(), a(), b()],
            vec![None, a(), c(), a(), None],
            vec![b(), b(), b(), b(), b()],
        ],
    }]
}

/// Default directory for `config.ron`.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("grotto")
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(|source| ConfigError::ReadError {
                    path: config_path.clone(),
                    source,
                })?;
            let config: Config =
                ron::from_str(&contents).map_err(|source| ConfigError::ParseError {
                    path: config_path.clone(),
                    source,
                })?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::WriteError {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(5)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized = ron::ser::to_string_pretty(self, pretty)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::WriteError {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }
}
