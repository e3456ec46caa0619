//! Error types for world generation.

use grotto_tiles::{CellCoord, Direction, TileAtlasError, TileCoord};

use crate::cave::CavePhase;

/// Invalid generation parameters. Detected when definitions are built and fatal
/// to the run.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// Noise frequency is zero, negative or not finite.
    #[error("noise frequency must be finite and positive, got {0}")]
    InvalidFrequency(f64),
    /// Fractal noise with no octaves.
    #[error("noise octave count must be at least 1")]
    ZeroOctaves,
    /// Noise output multiplier is not finite.
    #[error("noise scale must be finite, got {0}")]
    InvalidScale(f64),
    /// Threshold outside `[0, 1]`.
    #[error("threshold must lie in [0, 1], got {0}")]
    ThresholdOutOfRange(f64),
    /// A weighted table with no entries.
    #[error("weighted table is empty")]
    EmptyWeightTable,
    /// A weight that is zero, negative or not finite.
    #[error("weights must be finite and positive, got {0}")]
    InvalidWeight(f64),
    /// A radius range with `min > max`.
    #[error("radius range is inverted: min {min} > max {max}")]
    InvalidRadius {
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },
    /// A probability outside `[0, 1]`.
    #[error("{what} must lie in [0, 1], got {value}")]
    ChanceOutOfRange {
        /// Which setting.
        what: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Roughness outside `0..=4`.
    #[error("roughness offset must lie in 0..=4, got {0}")]
    RoughnessOutOfRange(i32),
    /// A tile name that is not in the atlas.
    #[error("unknown tile: {0}")]
    UnknownTile(String),
    /// A tile used where the other class is required.
    #[error("tile {name} must be {expected}")]
    TileClassMismatch {
        /// Tile name.
        name: String,
        /// "solid" or "passable".
        expected: &'static str,
    },
    /// A structure name no source provides.
    #[error("unknown structure: {0}")]
    UnknownStructure(String),
    /// A structure with no rows or columns.
    #[error("structure {0} has no tiles")]
    EmptyStructure(String),
    /// Two biomes share a name.
    #[error("duplicate biome name: {0}")]
    DuplicateBiome(String),
    /// A biome id the registry does not know.
    #[error("unknown biome id {0}")]
    UnknownBiome(u16),
    /// No biomes configured.
    #[error("at least one biome is required")]
    NoBiomes,
    /// Cell width or height is zero.
    #[error("cell size must be non-zero, got {width}x{height}")]
    ZeroCellSize {
        /// Cell width.
        width: u32,
        /// Cell height.
        height: u32,
    },
    /// Generation area with no cells.
    #[error("generation area must be non-empty, got {width}x{height} cells")]
    EmptyArea {
        /// Area width in cells.
        width: u32,
        /// Area height in cells.
        height: u32,
    },
    /// A cell whose tile rectangle does not fit in `i32` tile space.
    #[error("cell ({x}, {y}) lies outside addressable tile space")]
    CellOutOfRange {
        /// Cell column.
        x: i32,
        /// Cell row.
        y: i32,
    },
    /// A tunnel radius range that allows zero-width tunnels.
    #[error("{0} must be at least 1")]
    ZeroTunnelRadius(&'static str),
    /// The tile atlas could not be built.
    #[error(transparent)]
    Atlas(#[from] TileAtlasError),
}

/// Stage of the per-cell pipeline, reported with invariant violations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationStage {
    /// Cellular-automata smoothing.
    Smooth,
    /// Room detection.
    FindRooms,
    /// Tile classification and decoration.
    Process,
    /// Commit to the world grid.
    Fill,
    /// Painting across cell borders.
    Blend,
}

/// Fatal failure of a generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Parameters were rejected.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// A tile that an earlier stage should have produced is absent.
    #[error("tile {coord:?} missing during {stage:?}")]
    MissingTile {
        /// Absent coordinate.
        coord: TileCoord,
        /// Stage that expected it.
        stage: GenerationStage,
    },
    /// A region operation was called before the step it depends on.
    #[error("{operation} called while the region is {phase:?}")]
    PhaseOrder {
        /// Operation name.
        operation: &'static str,
        /// Phase the region was in.
        phase: CavePhase,
    },
}

/// A connection that could not be made. Recoverable: the caller logs it and
/// moves on.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConnectError {
    /// One side of the boundary has no open tile within the scan window.
    #[error("no reachable path from cell {cell:?} towards {direction:?}")]
    NoReachablePath {
        /// The cell being connected.
        cell: CellCoord,
        /// Direction of the neighbour.
        direction: Direction,
    },
}
