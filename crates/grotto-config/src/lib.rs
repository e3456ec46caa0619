//! Configuration for the Grotto world generator.
//!
//! Settings persist to disk as a RON file, every section falls back to defaults
//! when missing, and command-line flags override what was loaded.

mod biome;
mod cli;
mod config;
mod error;

pub use biome::{
    BiomeConfig, BlendConfig, BlendMode, CaveSettings, ConnectionConfig, DecorationConfig,
    DecorationEntryConfig, DecorationPlacement, NoiseConfig, NoiseKind, RadiusRange,
    StructureConfig, StructureSpawnConfig,
};
pub use cli::CliArgs;
pub use config::{Config, DebugConfig, OutputConfig, WorldgenConfig, default_config_dir};
pub use error::ConfigError;
