//! The world facade: owns the tile atlas, biome definitions and the last
//! successfully generated world.

use std::sync::Arc;

use grotto_config::Config;
use grotto_tiles::{
    CellCoord, PlacedTile, TileAtlas, TileClass, TileCoord, TileEvent, TileEventBuffer, TileId,
    WorldGrid,
};

use crate::biome::{BiomeDef, BiomeId, BiomeRegistry};
use crate::error::{ConfigurationError, GenerationError};
use crate::partition::{BiomeCells, WorldPartitioner, WorldSettings};
use crate::structure::{StructureLibrary, StructureSource};

/// Summary of the current world.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Seed of the last successful run.
    pub seed: u64,
    /// Cells that finished generation.
    pub cells_generated: usize,
    /// Committed tiles.
    pub tiles: usize,
    /// Solid tiles.
    pub solid_tiles: usize,
    /// Plain air tiles.
    pub air_tiles: usize,
    /// Passable tiles other than air.
    pub decoration_tiles: usize,
    /// Tunnels between cells.
    pub cell_connections: usize,
    /// Assigned cells per biome name, in registration order.
    pub biome_cells: Vec<(String, usize)>,
}

/// A generated world plus everything needed to regenerate it.
pub struct World {
    atlas: TileAtlas,
    registry: Arc<BiomeRegistry>,
    structures: Arc<StructureLibrary>,
    settings: WorldSettings,
    current: Option<WorldPartitioner>,
    events: TileEventBuffer,
}

impl World {
    /// Validates `config` and builds the atlas, structures and biomes.
    /// Nothing is generated until [`regenerate`](Self::regenerate).
    pub fn new(config: &Config) -> Result<Self, ConfigurationError> {
        let atlas = TileAtlas::from_defs(config.tiles.iter().cloned())?;
        let structures = StructureLibrary::from_configs(&config.structures, &atlas)?;

        let mut registry = BiomeRegistry::new();
        for biome in &config.biomes {
            registry.register(BiomeDef::from_config(biome, &atlas, &structures)?)?;
        }
        if registry.is_empty() {
            return Err(ConfigurationError::NoBiomes);
        }
        let settings = WorldSettings::from_config(&config.worldgen)?;

        tracing::debug!(
            tiles = atlas.len(),
            biomes = registry.len(),
            structures = structures.len(),
            "world definitions loaded"
        );
        Ok(Self {
            atlas,
            registry: Arc::new(registry),
            structures: Arc::new(structures),
            settings,
            current: None,
            events: TileEventBuffer::new(),
        })
    }

    /// Generates a fresh world over `width x height` cells starting at
    /// `origin`. The previous world is only replaced if the run succeeds.
    pub fn regenerate(
        &mut self,
        seed: u64,
        origin: CellCoord,
        width: u32,
        height: u32,
    ) -> Result<(), GenerationError> {
        if width == 0 || height == 0 {
            return Err(ConfigurationError::EmptyArea { width, height }.into());
        }
        let structures: Arc<dyn StructureSource> = self.structures.clone();
        let mut next =
            WorldPartitioner::new(Arc::clone(&self.registry), structures, self.settings, seed)?;
        if let Err(err) = next.generate_world(origin, width, height) {
            tracing::warn!(%err, seed, "world generation failed, keeping previous world");
            return Err(err);
        }

        self.events.send(TileEvent::Cleared);
        for event in next.drain_events() {
            self.events.send(event);
        }
        self.current = Some(next);
        Ok(())
    }

    /// Active settings.
    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// Tile definitions.
    pub fn atlas(&self) -> &TileAtlas {
        &self.atlas
    }

    /// Biome definitions.
    pub fn registry(&self) -> &BiomeRegistry {
        &self.registry
    }

    /// Committed tiles, `None` before the first successful run.
    pub fn grid(&self) -> Option<&WorldGrid> {
        self.current.as_ref().map(WorldPartitioner::world)
    }

    /// Cell assignment of the current world.
    pub fn cells(&self) -> Option<&BiomeCells> {
        self.current.as_ref().map(WorldPartitioner::cells)
    }

    /// Solid or air at `coord`; `None` where nothing was generated.
    pub fn tile_at(&self, coord: TileCoord) -> Option<TileClass> {
        self.placed_tile_at(coord).map(|tile| tile.class)
    }

    /// The placed tile at `coord`.
    pub fn placed_tile_at(&self, coord: TileCoord) -> Option<PlacedTile> {
        self.grid().and_then(|grid| grid.get(coord).copied())
    }

    /// Biome assigned to `cell`.
    pub fn biome_at(&self, cell: CellCoord) -> Option<BiomeId> {
        self.cells().and_then(|cells| cells.biome_of(cell))
    }

    /// Name of the biome assigned to `cell`.
    pub fn biome_name_at(&self, cell: CellCoord) -> Option<&str> {
        self.biome_at(cell)
            .and_then(|id| self.registry.get(id))
            .map(|def| def.name.as_str())
    }

    /// Cells tunnelled to from or into `cell`, sorted.
    pub fn cell_connections(&self, cell: CellCoord) -> Vec<CellCoord> {
        self.current
            .as_ref()
            .map(|p| p.cell_connections().neighbors(cell))
            .unwrap_or_default()
    }

    /// Pending change batches.
    pub fn events(&self) -> &TileEventBuffer {
        &self.events
    }

    /// Takes every pending change batch.
    pub fn drain_events(&mut self) -> Vec<TileEvent> {
        self.events.drain()
    }

    /// Counts over the current world.
    pub fn stats(&self) -> WorldStats {
        let Some(current) = &self.current else {
            return WorldStats::default();
        };
        let mut stats = WorldStats {
            seed: current.seed(),
            cells_generated: current.cells().generated_count(),
            tiles: current.world().len(),
            cell_connections: current.cell_connections().edge_count(),
            ..WorldStats::default()
        };
        for (_, tile) in current.world().iter() {
            match tile.class {
                TileClass::Solid => stats.solid_tiles += 1,
                TileClass::Air if tile.id == TileId::AIR => stats.air_tiles += 1,
                TileClass::Air => stats.decoration_tiles += 1,
            }
        }
        let counts = current.cells().counts();
        stats.biome_cells = self
            .registry
            .iter()
            .map(|(id, def)| {
                let n = counts
                    .iter()
                    .find(|(biome, _)| *biome == id)
                    .map_or(0, |&(_, n)| n);
                (def.name.clone(), n)
            })
            .collect();
        stats
    }
}
