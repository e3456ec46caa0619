//! Procedural 2D cave terrain: noise-driven cave layouts, room detection and
//! tunnelling, a biome partition of the world into cells, decoration,
//! structures and blending across cell borders.

mod cave;
mod connector;
mod error;
mod field;
mod partition;
mod room;
mod seed;
mod structure;
mod weighted;
mod world;

pub mod biome;
pub mod debug_viz;

pub use biome::{BiomeDef, BiomeId, BiomeRegion, BiomeRegistry, RegionContext};
pub use cave::{CaveGenerator, CavePhase};
pub use connector::{Passage, RoomConnector, carve_passages, carve_tunnel, disc, line};
pub use error::{ConfigurationError, ConnectError, GenerationError, GenerationStage};
pub use field::{NoiseField, NoiseSource, ThresholdField};
pub use partition::{
    BiomeCells, CellArea, FREE_EXPANSION_RINGS, WorldPartitioner, WorldSettings,
};
pub use room::{ConnectionGraph, MAIN_ROOM, Room, RoomId};
pub use seed::{derive_seed, stream_rng};
pub use structure::{StructureGrid, StructureLibrary, StructureSource};
pub use weighted::WeightedTable;
pub use world::{World, WorldStats};
