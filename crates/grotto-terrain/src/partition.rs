//! Biome partitioning of the world into fixed-size cells.
//!
//! Every cell is assigned a biome by a weighted roll, optionally replaced by
//! a neighbour's biome (copy) and optionally spread into surrounding cells
//! (expansion). Generation then runs each cell through its region pipeline
//! in row-major order, so a cell only ever sees neighbours below it or to
//! its left as generated.

use std::collections::VecDeque;
use std::sync::Arc;

use grotto_config::WorldgenConfig;
use grotto_tiles::{CellCoord, TileEventBuffer, TileRect, WorldGrid};
use hashbrown::{HashMap, HashSet};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::biome::{BiomeId, BiomeRegion, BiomeRegistry, RegionContext};
use crate::error::{ConfigurationError, GenerationError};
use crate::room::ConnectionGraph;
use crate::seed::stream_rng;
use crate::structure::StructureSource;
use crate::weighted::WeightedTable;

/// How far expansion spreads from a cell assigned outside any area.
pub const FREE_EXPANSION_RINGS: u32 = 4;

/// Partition-wide generation settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldSettings {
    /// Cell width in tiles.
    pub cell_width: u32,
    /// Cell height in tiles.
    pub cell_height: u32,
    /// Probability of adopting each assigned neighbour once a copy triggers.
    pub copy_chance_of_a_biome: f64,
    /// Tunnel between neighbouring cells.
    pub connect_to_closest_biome: bool,
    /// Blend borders between different biomes.
    pub blend_biomes: bool,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            cell_width: 50,
            cell_height: 50,
            copy_chance_of_a_biome: 0.5,
            connect_to_closest_biome: true,
            blend_biomes: true,
        }
    }
}

impl WorldSettings {
    /// Validates the generation section of the config file.
    pub fn from_config(config: &WorldgenConfig) -> Result<Self, ConfigurationError> {
        if config.cell_width == 0 || config.cell_height == 0 {
            return Err(ConfigurationError::ZeroCellSize {
                width: config.cell_width,
                height: config.cell_height,
            });
        }
        if !(0.0..=1.0).contains(&config.copy_chance_of_a_biome) {
            return Err(ConfigurationError::ChanceOutOfRange {
                what: "copy_chance_of_a_biome",
                value: config.copy_chance_of_a_biome,
            });
        }
        Ok(Self {
            cell_width: config.cell_width,
            cell_height: config.cell_height,
            copy_chance_of_a_biome: config.copy_chance_of_a_biome,
            connect_to_closest_biome: config.connect_to_closest_biome,
            blend_biomes: config.blend_biomes,
        })
    }

    /// Tile bounds of `cell`.
    ///
    /// # Errors
    ///
    /// Fails if the rectangle does not fit in `i32` tile space.
    pub fn cell_rect(&self, cell: CellCoord) -> Result<TileRect, ConfigurationError> {
        TileRect::for_cell(cell, self.cell_width, self.cell_height).ok_or(
            ConfigurationError::CellOutOfRange {
                x: cell.x,
                y: cell.y,
            },
        )
    }
}

/// A rectangle of cells, `origin` at its bottom-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellArea {
    /// First cell.
    pub origin: CellCoord,
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
}

impl CellArea {
    /// Creates an area, rejecting zero width or height and areas that run
    /// past the edge of `i32` cell space.
    pub fn new(origin: CellCoord, width: u32, height: u32) -> Result<Self, ConfigurationError> {
        if width == 0 || height == 0 {
            return Err(ConfigurationError::EmptyArea { width, height });
        }
        let far_x = i64::from(origin.x) + i64::from(width) - 1;
        let far_y = i64::from(origin.y) + i64::from(height) - 1;
        if i32::try_from(far_x).is_err() || i32::try_from(far_y).is_err() {
            return Err(ConfigurationError::CellOutOfRange {
                x: origin.x,
                y: origin.y,
            });
        }
        Ok(Self {
            origin,
            width,
            height,
        })
    }

    /// Returns `true` if `cell` lies inside the area.
    pub fn contains(&self, cell: CellCoord) -> bool {
        let dx = i64::from(cell.x) - i64::from(self.origin.x);
        let dy = i64::from(cell.y) - i64::from(self.origin.y);
        (0..i64::from(self.width)).contains(&dx) && (0..i64::from(self.height)).contains(&dy)
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// The top-right cell.
    pub fn far_corner(&self) -> CellCoord {
        // `new` guarantees both sums fit.
        CellCoord::new(
            (i64::from(self.origin.x) + i64::from(self.width) - 1) as i32,
            (i64::from(self.origin.y) + i64::from(self.height) - 1) as i32,
        )
    }

    /// Cells in row-major order, bottom row first.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + use<> {
        let (x0, y0) = (i64::from(self.origin.x), i64::from(self.origin.y));
        let (w, h) = (i64::from(self.width), i64::from(self.height));
        (0..h).flat_map(move |dy| {
            (0..w).map(move |dx| CellCoord::new((x0 + dx) as i32, (y0 + dy) as i32))
        })
    }
}

/// Biome assignment and generated flags per cell.
#[derive(Clone, Debug, Default)]
pub struct BiomeCells {
    assigned: HashMap<CellCoord, BiomeId>,
    generated: HashSet<CellCoord>,
}

impl BiomeCells {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The biome assigned to `cell`.
    pub fn biome_of(&self, cell: CellCoord) -> Option<BiomeId> {
        self.assigned.get(&cell).copied()
    }

    /// Assigns or reassigns `cell`.
    pub fn assign(&mut self, cell: CellCoord, biome: BiomeId) {
        self.assigned.insert(cell, biome);
    }

    /// Returns `true` if `cell` has a biome.
    pub fn is_assigned(&self, cell: CellCoord) -> bool {
        self.assigned.contains_key(&cell)
    }

    /// Marks `cell` as having finished its pipeline.
    pub fn mark_generated(&mut self, cell: CellCoord) {
        self.generated.insert(cell);
    }

    /// Returns `true` once `cell` has finished its pipeline.
    pub fn is_generated(&self, cell: CellCoord) -> bool {
        self.generated.contains(&cell)
    }

    /// Number of assigned cells.
    pub fn assigned_count(&self) -> usize {
        self.assigned.len()
    }

    /// Number of generated cells.
    pub fn generated_count(&self) -> usize {
        self.generated.len()
    }

    /// Assigned cell count per biome, ordered by id.
    pub fn counts(&self) -> Vec<(BiomeId, usize)> {
        let mut counts: HashMap<BiomeId, usize> = HashMap::new();
        for biome in self.assigned.values() {
            *counts.entry(*biome).or_default() += 1;
        }
        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort_unstable();
        counts
    }

    /// Forgets every cell.
    pub fn clear(&mut self) {
        self.assigned.clear();
        self.generated.clear();
    }
}

/// Owns the world grid and drives biome assignment and per-cell generation.
pub struct WorldPartitioner {
    registry: Arc<BiomeRegistry>,
    structures: Arc<dyn StructureSource>,
    settings: WorldSettings,
    seed: u64,
    spawn_table: WeightedTable<BiomeId>,
    area: Option<CellArea>,
    cells: BiomeCells,
    cell_connections: ConnectionGraph<CellCoord>,
    world: WorldGrid,
    events: TileEventBuffer,
    roll_rng: ChaCha8Rng,
    copy_rng: ChaCha8Rng,
    expansion_rng: ChaCha8Rng,
}

impl WorldPartitioner {
    /// Creates a partitioner over the registered biomes.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::NoBiomes`] for an empty registry.
    pub fn new(
        registry: Arc<BiomeRegistry>,
        structures: Arc<dyn StructureSource>,
        settings: WorldSettings,
        seed: u64,
    ) -> Result<Self, ConfigurationError> {
        if registry.is_empty() {
            return Err(ConfigurationError::NoBiomes);
        }
        let spawn_table =
            WeightedTable::new(registry.iter().map(|(id, def)| (id, def.spawn_weight)))?;
        Ok(Self {
            registry,
            structures,
            settings,
            seed,
            spawn_table,
            area: None,
            cells: BiomeCells::new(),
            cell_connections: ConnectionGraph::new(),
            world: WorldGrid::new(),
            events: TileEventBuffer::new(),
            roll_rng: stream_rng(seed, "roll", 0),
            copy_rng: stream_rng(seed, "copy", 0),
            expansion_rng: stream_rng(seed, "expansion", 0),
        })
    }

    /// World seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Active settings.
    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// Biome definitions.
    pub fn registry(&self) -> &BiomeRegistry {
        &self.registry
    }

    /// The area of the last assignment run.
    pub fn area(&self) -> Option<CellArea> {
        self.area
    }

    /// Cell assignment and generated flags.
    pub fn cells(&self) -> &BiomeCells {
        &self.cells
    }

    /// Tunnels made between cells.
    pub fn cell_connections(&self) -> &ConnectionGraph<CellCoord> {
        &self.cell_connections
    }

    /// Committed tiles.
    pub fn world(&self) -> &WorldGrid {
        &self.world
    }

    /// Pending change batches.
    pub fn events(&self) -> &TileEventBuffer {
        &self.events
    }

    /// Takes every pending change batch.
    pub fn drain_events(&mut self) -> Vec<grotto_tiles::TileEvent> {
        self.events.drain()
    }

    /// Clears assignment, generated cells, connections and tiles, and
    /// restarts every random stream.
    pub fn reset(&mut self) {
        self.area = None;
        self.cells.clear();
        self.cell_connections.clear();
        self.world.clear();
        self.events.clear();
        self.roll_rng = stream_rng(self.seed, "roll", 0);
        self.copy_rng = stream_rng(self.seed, "copy", 0);
        self.expansion_rng = stream_rng(self.seed, "expansion", 0);
    }

    /// Rolls a biome for `cell`, lets it copy a neighbour and spread, and
    /// returns the biome the cell ends up with.
    pub fn assign_biome_at(&mut self, cell: CellCoord) -> BiomeId {
        let u: f64 = self.roll_rng.random();
        let rolled = *self.spawn_table.pick(u);
        let biome = self.attempt_copy(cell, rolled);
        self.cells.assign(cell, biome);
        self.attempt_expand(cell, biome);
        tracing::trace!(?cell, ?rolled, ?biome, "assigned biome");
        biome
    }

    fn attempt_copy(&mut self, cell: CellCoord, rolled: BiomeId) -> BiomeId {
        let copy_chance = self.registry.get(rolled).map_or(0.0, |def| def.copy_chance);
        let draw: f64 = self.copy_rng.random();
        if draw > copy_chance {
            return rolled;
        }
        for neighbour in cell.moore_neighbors() {
            let Some(other) = self.cells.biome_of(neighbour) else {
                continue;
            };
            let draw: f64 = self.copy_rng.random();
            if draw <= self.settings.copy_chance_of_a_biome {
                return other;
            }
        }
        rolled
    }

    /// Spreads `biome` from `start` into unassigned surrounding cells, the
    /// chance dropping by the biome's decay per ring. Inside an area the
    /// spread stays in it; without one it stops after
    /// [`FREE_EXPANSION_RINGS`] rings.
    fn attempt_expand(&mut self, start: CellCoord, biome: BiomeId) {
        let Some(def) = self.registry.get(biome) else {
            return;
        };
        let decay = def.expansion_decay;
        let area = self.area;
        let mut queue = VecDeque::from([(start, def.expansion_chance, 0u32)]);
        while let Some((cell, chance, ring)) = queue.pop_front() {
            if chance <= 0.0 || (area.is_none() && ring >= FREE_EXPANSION_RINGS) {
                continue;
            }
            let draw: f64 = self.expansion_rng.random();
            if draw > chance {
                continue;
            }
            for neighbour in cell.moore_neighbors() {
                let allowed = area.is_none_or(|area| area.contains(neighbour));
                if !allowed || self.cells.is_assigned(neighbour) {
                    continue;
                }
                let draw: f64 = self.expansion_rng.random();
                if draw <= chance {
                    self.cells.assign(neighbour, biome);
                    queue.push_back((neighbour, chance - decay, ring + 1));
                }
            }
        }
    }

    /// Assigns every cell of the area that has no biome yet, row-major.
    pub fn assign_area(
        &mut self,
        origin: CellCoord,
        width: u32,
        height: u32,
    ) -> Result<(), ConfigurationError> {
        let area = CellArea::new(origin, width, height)?;
        self.area = Some(area);
        for cell in area.iter() {
            if !self.cells.is_assigned(cell) {
                self.assign_biome_at(cell);
            }
        }
        tracing::debug!(
            assigned = self.cells.assigned_count(),
            "biome partition assigned"
        );
        Ok(())
    }

    /// Assigns the area and generates every cell in it, row-major.
    ///
    /// # Errors
    ///
    /// Stops at the first cell that fails. Cells generated before it stay
    /// committed, so callers that need all-or-nothing should discard the
    /// partitioner.
    pub fn generate_world(
        &mut self,
        origin: CellCoord,
        width: u32,
        height: u32,
    ) -> Result<(), GenerationError> {
        let _span = tracing::info_span!(
            "generate_world",
            seed = self.seed,
            x = origin.x,
            y = origin.y,
            width,
            height
        )
        .entered();

        let area = CellArea::new(origin, width, height)?;
        self.settings.cell_rect(area.origin)?;
        self.settings.cell_rect(area.far_corner())?;
        self.assign_area(origin, width, height)?;
        for cell in area.iter() {
            self.generate_cell(cell)?;
        }

        tracing::info!(
            cells = area.cell_count(),
            tiles = self.world.len(),
            connections = self.cell_connections.edge_count(),
            "world generated"
        );
        Ok(())
    }

    fn generate_cell(&mut self, cell: CellCoord) -> Result<(), GenerationError> {
        let _span = tracing::info_span!("cell", x = cell.x, y = cell.y).entered();

        let biome = match self.cells.biome_of(cell) {
            Some(biome) => biome,
            None => self.assign_biome_at(cell),
        };
        let def = self
            .registry
            .get(biome)
            .cloned()
            .ok_or(ConfigurationError::UnknownBiome(biome.0))?;
        let rect = self.settings.cell_rect(cell)?;
        let mut region = BiomeRegion::new(biome, Arc::clone(&def), cell, rect, self.seed)?;
        region.create_area()?;

        let mut ctx = RegionContext {
            world: &mut self.world,
            events: &mut self.events,
            cells: &self.cells,
            cell_connections: &mut self.cell_connections,
        };
        let connected = if self.settings.connect_to_closest_biome {
            region.connect_to_closest_biome(&mut ctx)?
        } else {
            None
        };
        region.process()?;
        let stamped = region.stamp_structures(self.structures.as_ref())?;
        let filled = region.fill(&mut ctx)?;
        let blended = if self.settings.blend_biomes {
            region.blend_into_surrounded_biomes(&mut ctx)?
        } else {
            0
        };
        self.cells.mark_generated(cell);

        tracing::debug!(
            biome = %def.name,
            rooms = region.generator().rooms().len(),
            ?connected,
            stamped,
            filled,
            blended,
            "cell generated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grotto_config::BiomeConfig;
    use grotto_tiles::{TileAtlas, TileDef, TileEvent};

    use crate::biome::BiomeDef;
    use crate::structure::StructureLibrary;

    fn registry(configs: &[BiomeConfig]) -> Arc<BiomeRegistry> {
        let atlas = TileAtlas::from_defs([
            TileDef {
                name: "stone".into(),
                solid: true,
            },
            TileDef {
                name: "granite".into(),
                solid: true,
            },
        ])
        .unwrap();
        let mut registry = BiomeRegistry::new();
        for config in configs {
            registry
                .register(BiomeDef::from_config(config, &atlas, &StructureLibrary::new()).unwrap())
                .unwrap();
        }
        Arc::new(registry)
    }

    fn biome(name: &str, copy: f64, expansion: f64, decay: f64) -> BiomeConfig {
        BiomeConfig {
            name: name.into(),
            copy_chance: copy,
            expansion_chance: expansion,
            expansion_decay: decay,
            ..BiomeConfig::default()
        }
    }

    fn partitioner(configs: &[BiomeConfig], settings: WorldSettings, seed: u64) -> WorldPartitioner {
        WorldPartitioner::new(
            registry(configs),
            Arc::new(StructureLibrary::new()),
            settings,
            seed,
        )
        .unwrap()
    }

    fn small() -> WorldSettings {
        WorldSettings {
            cell_width: 20,
            cell_height: 20,
            ..WorldSettings::default()
        }
    }

    fn assignment(p: &WorldPartitioner, area: CellArea) -> Vec<Option<BiomeId>> {
        area.iter().map(|c| p.cells().biome_of(c)).collect()
    }

    #[test]
    fn test_area_iter_is_row_major() {
        let area = CellArea::new(CellCoord::new(1, 1), 2, 2).unwrap();
        let cells: Vec<_> = area.iter().collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(1, 1),
                CellCoord::new(2, 1),
                CellCoord::new(1, 2),
                CellCoord::new(2, 2)
            ]
        );
        assert!(area.contains(CellCoord::new(2, 2)));
        assert!(!area.contains(CellCoord::new(3, 1)));
        assert!(CellArea::new(CellCoord::new(0, 0), 0, 3).is_err());
    }

    #[test]
    fn test_empty_registry_rejected() {
        let result = WorldPartitioner::new(
            Arc::new(BiomeRegistry::new()),
            Arc::new(StructureLibrary::new()),
            small(),
            0,
        );
        assert!(matches!(result, Err(ConfigurationError::NoBiomes)));
    }

    #[test]
    fn test_settings_validated() {
        let bad_size = WorldgenConfig {
            cell_width: 0,
            ..WorldgenConfig::default()
        };
        assert!(matches!(
            WorldSettings::from_config(&bad_size),
            Err(ConfigurationError::ZeroCellSize { .. })
        ));
        let bad_chance = WorldgenConfig {
            copy_chance_of_a_biome: -0.1,
            ..WorldgenConfig::default()
        };
        assert!(matches!(
            WorldSettings::from_config(&bad_chance),
            Err(ConfigurationError::ChanceOutOfRange { .. })
        ));
    }

    #[test]
    fn test_assignment_deterministic() {
        let configs = [biome("a", 0.3, 0.2, 0.1), biome("b", 0.3, 0.2, 0.1)];
        let area = CellArea::new(CellCoord::new(-2, -2), 6, 6).unwrap();
        let mut first = partitioner(&configs, small(), 77);
        let mut second = partitioner(&configs, small(), 77);
        first.assign_area(area.origin, area.width, area.height).unwrap();
        second.assign_area(area.origin, area.width, area.height).unwrap();
        assert_eq!(assignment(&first, area), assignment(&second, area));
        assert!(assignment(&first, area).iter().all(Option::is_some));
    }

    #[test]
    fn test_expansion_stays_inside_area() {
        let configs = [biome("a", 0.0, 1.0, 0.0), biome("b", 0.0, 1.0, 0.0)];
        let mut p = partitioner(&configs, small(), 5);
        p.assign_area(CellCoord::new(0, 0), 4, 3).unwrap();

        assert_eq!(p.cells().assigned_count(), 12);
        // Certain expansion with no decay floods the area from the first cell.
        let first = p.cells().biome_of(CellCoord::new(0, 0));
        let area = CellArea::new(CellCoord::new(0, 0), 4, 3).unwrap();
        assert!(assignment(&p, area).iter().all(|b| *b == first));
        assert_eq!(p.cells().counts().len(), 1);
    }

    #[test]
    fn test_expansion_without_area_reaches_neighbours() {
        let configs = [biome("a", 0.0, 1.0, 0.5)];
        let mut p = partitioner(&configs, small(), 5);
        let start = CellCoord::new(10, -4);
        let biome = p.assign_biome_at(start);

        // The first ring is reached with certainty, the second at half chance.
        assert!(p.cells().assigned_count() >= 9);
        for neighbour in start.moore_neighbors() {
            assert_eq!(p.cells().biome_of(neighbour), Some(biome));
        }
        let far = CellArea::new(CellCoord::new(7, -7), 7, 7).unwrap();
        assert_eq!(
            p.cells().assigned_count(),
            far.iter().filter(|&c| p.cells().is_assigned(c)).count()
        );
    }

    #[test]
    fn test_expansion_without_area_terminates_without_decay() {
        let configs = [biome("a", 0.0, 1.0, 0.0)];
        let mut p = partitioner(&configs, small(), 6);
        p.assign_biome_at(CellCoord::new(0, 0));

        let side = 2 * FREE_EXPANSION_RINGS + 1;
        assert_eq!(p.cells().assigned_count(), (side * side) as usize);
        let reach = FREE_EXPANSION_RINGS as i32;
        let square = CellArea::new(CellCoord::new(-reach, -reach), side, side).unwrap();
        assert!(square.iter().all(|c| p.cells().is_assigned(c)));
    }

    #[test]
    fn test_out_of_range_cells_rejected() {
        assert!(matches!(
            CellArea::new(CellCoord::new(i32::MAX, 0), 2, 1),
            Err(ConfigurationError::CellOutOfRange { .. })
        ));
        let edge = CellArea::new(CellCoord::new(i32::MAX - 1, 0), 2, 1).unwrap();
        assert_eq!(edge.far_corner(), CellCoord::new(i32::MAX, 0));
        assert_eq!(edge.iter().count(), 2);

        let settings = small();
        assert!(settings.cell_rect(CellCoord::new(3, -2)).is_ok());
        assert!(matches!(
            settings.cell_rect(CellCoord::new(i32::MAX / 10, 0)),
            Err(ConfigurationError::CellOutOfRange { .. })
        ));

        let configs = [biome("a", 0.0, 0.0, 0.0)];
        let mut p = partitioner(&configs, settings, 2);
        let result = p.generate_world(CellCoord::new(i32::MAX / 20 - 1, 0), 3, 1);
        assert!(matches!(
            result,
            Err(GenerationError::Configuration(
                ConfigurationError::CellOutOfRange { .. }
            ))
        ));
        assert_eq!(p.cells().assigned_count(), 0);
        assert!(p.world().is_empty());
    }

    #[test]
    fn test_certain_copy_spreads_first_biome() {
        let configs = [biome("a", 1.0, 0.0, 0.0), biome("b", 1.0, 0.0, 0.0)];
        let settings = WorldSettings {
            copy_chance_of_a_biome: 1.0,
            ..small()
        };
        let mut p = partitioner(&configs, settings, 9);
        p.assign_area(CellCoord::new(0, 0), 5, 5).unwrap();
        let first = p.cells().biome_of(CellCoord::new(0, 0));
        let area = CellArea::new(CellCoord::new(0, 0), 5, 5).unwrap();
        assert!(assignment(&p, area).iter().all(|b| *b == first));
    }

    #[test]
    fn test_assign_area_keeps_existing_cells() {
        let configs = [biome("a", 0.0, 0.0, 0.0), biome("b", 0.0, 0.0, 0.0)];
        let mut p = partitioner(&configs, small(), 1);
        p.assign_area(CellCoord::new(0, 0), 3, 3).unwrap();
        let before = p.cells().counts();
        p.assign_area(CellCoord::new(0, 0), 3, 3).unwrap();
        assert_eq!(p.cells().counts(), before);
    }

    #[test]
    fn test_weighted_roll_uses_every_biome() {
        let configs = [biome("a", 0.0, 0.0, 0.0), biome("b", 0.0, 0.0, 0.0)];
        let mut p = partitioner(&configs, small(), 3);
        p.assign_area(CellCoord::new(0, 0), 20, 20).unwrap();
        let counts = p.cells().counts();
        assert_eq!(counts.len(), 2);
        assert!(counts.iter().all(|&(_, n)| n > 100));
    }

    #[test]
    fn test_generate_world_commits_every_cell() {
        let configs = [biome("a", 0.3, 0.2, 0.1), biome("b", 0.3, 0.2, 0.1)];
        let mut p = partitioner(&configs, small(), 12);
        p.generate_world(CellCoord::new(0, 0), 3, 2).unwrap();

        assert_eq!(p.world().len(), 6 * 20 * 20);
        let area = CellArea::new(CellCoord::new(0, 0), 3, 2).unwrap();
        assert!(area.iter().all(|c| p.cells().is_generated(c)));

        let events = p.drain_events();
        for cell in area.iter() {
            assert!(
                events
                    .iter()
                    .any(|e| matches!(e, TileEvent::Committed { cell: c, .. } if *c == cell))
            );
        }
        assert!(p.events().is_empty());
    }

    #[test]
    fn test_toggles_disable_connections() {
        let configs = [biome("a", 0.3, 0.2, 0.1)];
        let settings = WorldSettings {
            connect_to_closest_biome: false,
            blend_biomes: false,
            ..small()
        };
        let mut p = partitioner(&configs, settings, 12);
        p.generate_world(CellCoord::new(0, 0), 3, 3).unwrap();
        assert_eq!(p.cell_connections().edge_count(), 0);
    }

    #[test]
    fn test_generate_world_deterministic() {
        let configs = [biome("a", 0.3, 0.2, 0.1), biome("b", 0.3, 0.2, 0.1)];
        let mut first = partitioner(&configs, small(), 31);
        let mut second = partitioner(&configs, small(), 31);
        first.generate_world(CellCoord::new(0, 0), 3, 3).unwrap();
        second.generate_world(CellCoord::new(0, 0), 3, 3).unwrap();
        assert_eq!(first.world(), second.world());
    }

    #[test]
    fn test_reset_clears_everything() {
        let configs = [biome("a", 0.3, 0.2, 0.1)];
        let mut p = partitioner(&configs, small(), 4);
        p.generate_world(CellCoord::new(0, 0), 2, 2).unwrap();
        let before = p.world().clone();
        p.reset();
        assert!(p.world().is_empty());
        assert_eq!(p.cells().assigned_count(), 0);
        assert_eq!(p.cells().generated_count(), 0);
        assert_eq!(p.cell_connections().edge_count(), 0);
        assert!(p.area().is_none());

        p.generate_world(CellCoord::new(0, 0), 2, 2).unwrap();
        assert_eq!(p.world(), &before);
    }
}
