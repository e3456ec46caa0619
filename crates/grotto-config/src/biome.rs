//! Raw per-biome settings as they appear in `config.ron`.
//!
//! Nothing here is validated; the terrain crate checks ranges and resolves tile
//! names when it turns these into biome definitions.

use grotto_tiles::Direction;
use serde::{Deserialize, Serialize};

/// Which noise function drives a field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NoiseKind {
    /// Independent pseudo-random value per tile.
    White,
    /// Single octave of Perlin noise.
    Perlin,
    /// Fractal sum of Perlin octaves.
    Fbm,
    /// Worley (cellular) noise.
    Cellular,
}

/// Parameters of a scalar noise field and the threshold that splits it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    /// Noise function.
    pub kind: NoiseKind,
    /// Sampling frequency for coherent noise. Must be finite and non-zero.
    pub frequency: f64,
    /// Output multiplier.
    pub scale: f64,
    /// Octave count for [`NoiseKind::Fbm`].
    pub octaves: u32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Samples at or above this value are air / "off".
    pub threshold: f64,
    /// Mixed into the world seed so fields of one biome are decorrelated.
    pub seed_offset: u64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            kind: NoiseKind::White,
            frequency: 0.08,
            scale: 1.0,
            octaves: 1,
            lacunarity: 2.0,
            persistence: 0.5,
            threshold: 0.5,
            seed_offset: 0,
        }
    }
}

/// Inclusive `[min, max]` range for randomized radii.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RadiusRange {
    /// Smallest radius.
    pub min: u32,
    /// Largest radius.
    pub max: u32,
}

impl RadiusRange {
    /// A range that always yields `radius`.
    pub const fn fixed(radius: u32) -> Self {
        Self {
            min: radius,
            max: radius,
        }
    }
}

/// Cellular-automata and room settings of a cave region.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaveSettings {
    /// Smoothing passes; more passes give smoother caves.
    pub smoothing_iterations: u32,
    /// How rough the caves are, `0..=4`. Widens the band of unchanged tiles.
    pub roughness_offset: i32,
    /// Air pockets smaller than this are filled.
    pub min_room_size: usize,
    /// How many nearest-room passes run before the main-room pass.
    pub connection_iterations: u32,
    /// Width of tunnels carved between rooms.
    pub tunnel_radius: RadiusRange,
}

impl Default for CaveSettings {
    fn default() -> Self {
        Self {
            smoothing_iterations: 4,
            roughness_offset: 0,
            min_room_size: 50,
            connection_iterations: 1,
            tunnel_radius: RadiusRange::fixed(3),
        }
    }
}

/// Where a decoration may be placed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DecorationPlacement {
    /// Air tile with solid directly above it.
    Ceiling,
    /// Air tile with solid directly below it.
    Ground,
}

/// One weighted decoration choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecorationEntryConfig {
    /// Tile name from the atlas.
    pub tile: String,
    /// Relative weight.
    pub weight: f64,
}

/// A decoration rule: where, how dense and what to place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecorationConfig {
    /// Candidate tiles.
    pub placement: DecorationPlacement,
    /// Density gate; a candidate is skipped where the field is "off".
    pub density: NoiseConfig,
    /// Weighted choices.
    pub entries: Vec<DecorationEntryConfig>,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            placement: DecorationPlacement::Ground,
            density: NoiseConfig {
                kind: NoiseKind::White,
                threshold: 0.3,
                seed_offset: 17,
                ..NoiseConfig::default()
            },
            entries: Vec::new(),
        }
    }
}

/// Cross-region tunnel settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Allow connecting to the cell on the left.
    pub left: bool,
    /// Allow connecting to the cell on the right.
    pub right: bool,
    /// Allow connecting to the cell above.
    pub up: bool,
    /// Allow connecting to the cell below.
    pub down: bool,
    /// Directions that are always connected when the neighbour exists.
    pub forced: Vec<Direction>,
    /// Tunnel radius range.
    pub radius: RadiusRange,
    /// Depth in tiles of the window searched on each side of the border.
    pub scan_size: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            left: true,
            right: true,
            up: true,
            down: true,
            forced: Vec::new(),
            radius: RadiusRange { min: 2, max: 3 },
            scan_size: 12,
        }
    }
}

/// How border tiles are sampled while blending.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BlendMode {
    /// Use the tile found at each border point.
    Sample,
    /// Like `Sample`, but air keeps the last solid sample.
    CarryForward,
    /// Open the seam with air.
    Air,
}

/// Border blending settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlendConfig {
    /// Sampling mode.
    pub mode: BlendMode,
    /// Step and disc radius range.
    pub radius: RadiusRange,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            mode: BlendMode::CarryForward,
            radius: RadiusRange { min: 2, max: 4 },
        }
    }
}

/// A structure that may be stamped into a biome's regions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructureSpawnConfig {
    /// Structure name.
    pub name: String,
    /// Probability per region.
    pub chance: f64,
}

/// Full settings of one biome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BiomeConfig {
    /// Unique biome name.
    pub name: String,
    /// Relative spawn weight.
    pub spawn_weight: f64,
    /// Probability of trying to copy a neighbouring cell's biome instead.
    pub copy_chance: f64,
    /// Probability of spreading into neighbouring cells.
    pub expansion_chance: f64,
    /// Subtracted from the expansion chance at each step outward.
    pub expansion_decay: f64,
    /// Atlas tile used for solid terrain.
    pub base_tile: String,
    /// Field that lays out raw solid and air.
    pub noise: NoiseConfig,
    /// Smoothing and room settings.
    pub cave: CaveSettings,
    /// Decoration rules, applied in order.
    pub decorations: Vec<DecorationConfig>,
    /// Cross-region tunnel settings.
    pub connection: ConnectionConfig,
    /// Border blending settings.
    pub blend: BlendConfig,
    /// Structures stamped after decoration.
    pub structures: Vec<StructureSpawnConfig>,
}

impl Default for BiomeConfig {
    fn default() -> Self {
        Self {
            name: "caves".to_string(),
            spawn_weight: 1.0,
            copy_chance: 0.3,
            expansion_chance: 0.2,
            expansion_decay: 0.1,
            base_tile: "stone".to_string(),
            noise: NoiseConfig {
                threshold: 0.48,
                ..NoiseConfig::default()
            },
            cave: CaveSettings::default(),
            decorations: Vec::new(),
            connection: ConnectionConfig::default(),
            blend: BlendConfig::default(),
            structures: Vec::new(),
        }
    }
}

/// A fixed tile layout, rows listed top to bottom. `None` leaves a tile alone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StructureConfig {
    /// Name referenced by [`StructureSpawnConfig::name`].
    pub name: String,
    /// Tile names per row.
    pub rows: Vec<Vec<Option<String>>>,
}
