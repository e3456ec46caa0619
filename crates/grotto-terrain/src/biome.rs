//! Biome system: validated definitions, the registry and per-cell regions.
//!
//! A biome definition is built once from configuration and shared by every
//! cell assigned to it. A region runs one cell through the pipeline: cave
//! layout, cross-cell tunnel, decoration, structures, commit and blending.

mod def;
mod region;
mod registry;

pub use def::{BiomeDef, BlendRule, ConnectionRule, DecorationRule, StructureSpawn};
pub use region::{BiomeRegion, RegionContext};
pub use registry::{BiomeId, BiomeRegistry};
