//! One partition cell run through its biome's pipeline.

use std::sync::Arc;

use grotto_config::{BlendMode, DecorationPlacement};
use grotto_tiles::{
    CellCoord, Direction, PlacedTile, TileClass, TileCoord, TileEvent, TileEventBuffer, TileGrid,
    TileRect, WorldGrid, commit_tiles,
};
use hashbrown::HashSet;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{BiomeDef, BiomeId, DecorationRule};
use crate::cave::{CaveGenerator, CavePhase};
use crate::connector::{disc, line};
use crate::error::{ConfigurationError, ConnectError, GenerationError, GenerationStage};
use crate::field::ThresholdField;
use crate::partition::BiomeCells;
use crate::room::ConnectionGraph;
use crate::seed::{derive_seed, stream_rng};
use crate::structure::StructureSource;

/// World state a region reads and writes beyond its own cell.
pub struct RegionContext<'a> {
    /// Committed tiles of every generated cell.
    pub world: &'a mut WorldGrid,
    /// Change notifications for the committed grid.
    pub events: &'a mut TileEventBuffer,
    /// Biome assignment and generated flags of all cells.
    pub cells: &'a BiomeCells,
    /// Tunnels made between cells.
    pub cell_connections: &'a mut ConnectionGraph<CellCoord>,
}

/// Nearest open pair across one cell boundary.
#[derive(Clone, Copy, Debug)]
struct BoundaryPair {
    direction: Direction,
    distance: i128,
    ours: TileCoord,
    theirs: TileCoord,
}

/// One cell of the world with its biome's generator and rules.
pub struct BiomeRegion {
    biome: BiomeId,
    def: Arc<BiomeDef>,
    cell: CellCoord,
    rect: TileRect,
    generator: CaveGenerator,
    densities: Vec<ThresholdField>,
    tiles: WorldGrid,
    processed: bool,
    connect_rng: ChaCha8Rng,
    decorate_rng: ChaCha8Rng,
    structure_rng: ChaCha8Rng,
    blend_rng: ChaCha8Rng,
}

impl BiomeRegion {
    /// Sets up the region covering `rect` for `cell`.
    ///
    /// Noise fields are seeded per biome so neighbouring cells of the same
    /// biome continue each other; random streams are seeded per cell.
    pub fn new(
        biome: BiomeId,
        def: Arc<BiomeDef>,
        cell: CellCoord,
        rect: TileRect,
        world_seed: u64,
    ) -> Result<Self, ConfigurationError> {
        let field = ThresholdField::from_config(
            &def.noise,
            derive_seed(world_seed, "noise", (&def.name, def.noise.seed_offset)),
        )?;
        let densities = def
            .decorations
            .iter()
            .map(|rule| {
                ThresholdField::from_config(
                    &rule.density,
                    derive_seed(world_seed, "density", (&def.name, rule.density.seed_offset)),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let key = (cell.x, cell.y);
        let generator = CaveGenerator::new(
            field,
            def.cave.clone(),
            derive_seed(world_seed, "tunnels", key),
        );
        Ok(Self {
            biome,
            def,
            cell,
            rect,
            generator,
            densities,
            tiles: WorldGrid::new(),
            processed: false,
            connect_rng: stream_rng(world_seed, "connect", key),
            decorate_rng: stream_rng(world_seed, "decorate", key),
            structure_rng: stream_rng(world_seed, "structure", key),
            blend_rng: stream_rng(world_seed, "blend", key),
        })
    }

    /// The cell this region covers.
    pub fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Tile bounds of the cell.
    pub fn rect(&self) -> TileRect {
        self.rect
    }

    /// Assigned biome.
    pub fn biome(&self) -> BiomeId {
        self.biome
    }

    /// The cave generator holding the region's solid/air layout.
    pub fn generator(&self) -> &CaveGenerator {
        &self.generator
    }

    /// Processed tiles, empty before [`process`](Self::process).
    pub fn tiles(&self) -> &WorldGrid {
        &self.tiles
    }

    /// The adjacent cell and its tile bounds, `None` past the edge of tile
    /// space.
    fn neighbour(&self, direction: Direction) -> Option<(CellCoord, TileRect)> {
        let cell = self.cell.step(direction)?;
        let rect = TileRect::for_cell(cell, self.rect.width, self.rect.height)?;
        Some((cell, rect))
    }

    /// Generates the cave layout of the cell.
    pub fn create_area(&mut self) -> Result<(), GenerationError> {
        self.processed = false;
        self.tiles.clear();
        self.generator.create_area(self.rect)
    }

    fn nearest_boundary_pair(
        &self,
        direction: Direction,
        neighbour_rect: TileRect,
        world: &WorldGrid,
    ) -> Result<BoundaryPair, ConnectError> {
        let scan = self.def.connection.scan_size.max(1);
        let ours = self.rect.edge_strip(direction, scan);
        let theirs = neighbour_rect.edge_strip(direction.opposite(), scan);
        let map = self.generator.map();

        let (our_air, their_air) = std::thread::scope(|s| {
            let handle = s.spawn(|| ours.iter().filter(|&c| map.is_air(c)).collect::<Vec<_>>());
            let their_air: Vec<TileCoord> = theirs.iter().filter(|&c| world.is_air(c)).collect();
            let our_air = handle
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            (our_air, their_air)
        });

        let mut best: Option<(i128, TileCoord, TileCoord)> = None;
        for &a in &our_air {
            for &b in &their_air {
                let candidate = (a.distance_squared(b), a, b);
                if best.is_none_or(|current| candidate < current) {
                    best = Some(candidate);
                }
            }
        }
        best.map(|(distance, ours, theirs)| BoundaryPair {
            direction,
            distance,
            ours,
            theirs,
        })
        .ok_or(ConnectError::NoReachablePath {
            cell: self.cell,
            direction,
        })
    }

    /// Tunnels into one generated neighbouring cell.
    ///
    /// Candidates are the allowed directions whose neighbour is generated and
    /// has an open tile near the border. Forced directions win over the rest;
    /// among the remaining pool the closest pair is used, ties broken at
    /// random. Returns the direction connected, if any.
    pub fn connect_to_closest_biome(
        &mut self,
        ctx: &mut RegionContext<'_>,
    ) -> Result<Option<Direction>, GenerationError> {
        if self.generator.phase() < CavePhase::RoomsResolved {
            return Err(GenerationError::PhaseOrder {
                operation: "connect_to_closest_biome",
                phase: self.generator.phase(),
            });
        }

        let mut found = Vec::new();
        for direction in Direction::ALL {
            if !self.def.connection.allows(direction) {
                continue;
            }
            let Some((neighbour, neighbour_rect)) = self.neighbour(direction) else {
                continue;
            };
            if !ctx.cells.is_generated(neighbour) {
                continue;
            }
            match self.nearest_boundary_pair(direction, neighbour_rect, ctx.world) {
                Ok(pair) => found.push(pair),
                Err(err) => tracing::debug!(%err, "skipping biome connection"),
            }
        }
        if found.is_empty() {
            return Ok(None);
        }

        let forced: Vec<BoundaryPair> = found
            .iter()
            .copied()
            .filter(|p| self.def.connection.is_forced(p.direction))
            .collect();
        let pool = if forced.is_empty() { found } else { forced };
        let closest = pool.iter().map(|p| p.distance).min().unwrap_or(0);
        let ties: Vec<BoundaryPair> = pool
            .into_iter()
            .filter(|p| p.distance == closest)
            .collect();
        let pick = if ties.len() > 1 {
            ties[self.connect_rng.random_range(0..ties.len())]
        } else {
            ties[0]
        };

        let Some((neighbour, neighbour_rect)) = self.neighbour(pick.direction) else {
            return Ok(None);
        };
        let radius = self.def.connection.radius;
        let mut coords = Vec::new();
        for point in line(pick.ours, pick.theirs) {
            let r = self.connect_rng.random_range(radius.min..=radius.max);
            coords.extend(disc(point, r));
        }

        let map = self.generator.map_mut();
        for &c in &coords {
            map.replace_existing(c, TileClass::Air);
        }
        let theirs: Vec<(TileCoord, PlacedTile)> = coords
            .iter()
            .copied()
            .filter(|&c| neighbour_rect.contains(c) && ctx.world.contains(c))
            .map(|c| (c, PlacedTile::AIR))
            .collect();
        let opened = commit_tiles(ctx.world, neighbour, theirs, ctx.events);
        ctx.cell_connections.connect(self.cell, neighbour);

        tracing::debug!(
            cell = ?self.cell,
            direction = ?pick.direction,
            opened,
            "connected to neighbouring biome"
        );
        Ok(Some(pick.direction))
    }

    /// Turns the layout into placed tiles: solid ground gets the base tile,
    /// open tiles under a ceiling or over the ground may get a decoration.
    pub fn process(&mut self) -> Result<(), GenerationError> {
        if self.generator.phase() < CavePhase::RoomsResolved {
            return Err(GenerationError::PhaseOrder {
                operation: "process",
                phase: self.generator.phase(),
            });
        }
        let base = PlacedTile::solid(self.def.base_tile);
        let map = self.generator.map();
        let mut tiles = WorldGrid::with_capacity(self.rect.area());
        for coord in self.rect.iter() {
            let class = map.class_at(coord).ok_or(GenerationError::MissingTile {
                coord,
                stage: GenerationStage::Process,
            })?;
            let placed = match class {
                TileClass::Solid => base,
                TileClass::Air => decorate(
                    coord,
                    map,
                    &self.def.decorations,
                    &self.densities,
                    &mut self.decorate_rng,
                ),
            };
            tiles.set(coord, placed);
        }
        self.tiles = tiles;
        self.processed = true;
        Ok(())
    }

    fn require_processed(&self, operation: &'static str) -> Result<(), GenerationError> {
        if self.processed {
            Ok(())
        } else {
            Err(GenerationError::PhaseOrder {
                operation,
                phase: self.generator.phase(),
            })
        }
    }

    /// Rolls every structure spawn of the biome and stamps the ones that hit
    /// at a random spot inside the cell. Returns the number of tiles written.
    pub fn stamp_structures(
        &mut self,
        source: &dyn StructureSource,
    ) -> Result<usize, GenerationError> {
        self.require_processed("stamp_structures")?;
        let mut written = 0;
        for spawn in &self.def.structures {
            let roll: f64 = self.structure_rng.random();
            if roll >= spawn.chance {
                continue;
            }
            let grid = source
                .structure(&spawn.name)
                .ok_or_else(|| ConfigurationError::UnknownStructure(spawn.name.clone()))?;

            let origin_x = if grid.width() <= self.rect.width {
                self.structure_rng
                    .random_range(self.rect.x..=self.rect.max_x() - grid.width() as i32)
            } else {
                self.rect.x
            };
            let origin_y = if grid.height() <= self.rect.height {
                self.structure_rng
                    .random_range(self.rect.y..=self.rect.max_y() - grid.height() as i32)
            } else {
                self.rect.y
            };

            for row in 0..grid.height() {
                for col in 0..grid.width() {
                    let Some(tile) = grid.get(col, row) else {
                        continue;
                    };
                    let coord = TileCoord::new(
                        origin_x + col as i32,
                        origin_y + (grid.height() - 1 - row) as i32,
                    );
                    if self.rect.contains(coord) {
                        self.tiles.set(coord, tile);
                        written += 1;
                    }
                }
            }
            tracing::debug!(cell = ?self.cell, structure = %spawn.name, origin_x, origin_y, "stamped structure");
        }
        Ok(written)
    }

    /// Commits the processed tiles to the world as one change batch.
    pub fn fill(&mut self, ctx: &mut RegionContext<'_>) -> Result<usize, GenerationError> {
        self.require_processed("fill")?;
        let mut batch = Vec::with_capacity(self.rect.area());
        for coord in self.rect.iter() {
            let tile = self
                .tiles
                .get(coord)
                .copied()
                .ok_or(GenerationError::MissingTile {
                    coord,
                    stage: GenerationStage::Fill,
                })?;
            batch.push((coord, tile));
        }
        Ok(commit_tiles(ctx.world, self.cell, batch, ctx.events))
    }

    /// Paints discs across every border shared with a generated cell of a
    /// different biome. Only committed tiles of the two cells change.
    /// Returns the number of tiles changed.
    pub fn blend_into_surrounded_biomes(
        &mut self,
        ctx: &mut RegionContext<'_>,
    ) -> Result<usize, GenerationError> {
        let rule = self.def.blend;
        let mut coords = Vec::new();
        let mut seen = HashSet::new();

        for direction in Direction::ALL {
            let Some((neighbour, neighbour_rect)) = self.neighbour(direction) else {
                continue;
            };
            if !ctx.cells.is_generated(neighbour) {
                continue;
            }
            match ctx.cells.biome_of(neighbour) {
                Some(other) if other != self.biome => {}
                _ => continue,
            }
            let border = self.rect.border_line(direction);

            let mut last_solid: Option<PlacedTile> = None;
            let mut i = 0;
            while i < border.len() {
                let radius = self
                    .blend_rng
                    .random_range(rule.radius.min..=rule.radius.max);
                let point = border[i];
                let sampled =
                    ctx.world
                        .get(point)
                        .copied()
                        .ok_or(GenerationError::MissingTile {
                            coord: point,
                            stage: GenerationStage::Blend,
                        })?;
                let solid_sample = Some(sampled).filter(|t| t.class.is_solid());
                let paint = match rule.mode {
                    BlendMode::Sample => solid_sample,
                    BlendMode::CarryForward => {
                        if solid_sample.is_some() {
                            last_solid = solid_sample;
                        }
                        last_solid
                    }
                    BlendMode::Air => Some(PlacedTile::AIR),
                };

                if let Some(paint) = paint {
                    for c in disc(point, radius) {
                        if !self.rect.contains(c) && !neighbour_rect.contains(c) {
                            continue;
                        }
                        let Some(existing) = ctx.world.get(c).copied() else {
                            continue;
                        };
                        let write = match rule.mode {
                            BlendMode::Air => existing != PlacedTile::AIR,
                            _ => existing.class.is_solid() && existing != paint,
                        };
                        if write {
                            ctx.world.set(c, paint);
                            if seen.insert(c) {
                                coords.push(c);
                            }
                        }
                    }
                }
                i += radius.max(1) as usize;
            }
        }

        let changed = coords.len();
        if changed > 0 {
            ctx.events.send(TileEvent::Committed {
                cell: self.cell,
                coords,
            });
        }
        Ok(changed)
    }
}

/// Picks the decoration for an open tile, or plain air.
fn decorate(
    coord: TileCoord,
    map: &TileGrid<TileClass>,
    rules: &[DecorationRule],
    densities: &[ThresholdField],
    rng: &mut ChaCha8Rng,
) -> PlacedTile {
    let ceiling = map.is_solid_or_missing(coord.offset(0, 1));
    let ground = map.is_solid_or_missing(coord.offset(0, -1));
    for (rule, density) in rules.iter().zip(densities) {
        let candidate = match rule.placement {
            DecorationPlacement::Ceiling => ceiling,
            DecorationPlacement::Ground => ground,
        };
        if !candidate || !density.is_set(coord.x, coord.y) {
            continue;
        }
        let u: f64 = rng.random();
        return PlacedTile::passable(*rule.table.pick(u));
    }
    PlacedTile::AIR
}

#[cfg(test)]
mod tests {
    use super::*;
    use grotto_config::{
        BiomeConfig, BlendConfig, CaveSettings, DecorationConfig, DecorationEntryConfig,
        NoiseConfig, NoiseKind, RadiusRange, StructureConfig, StructureSpawnConfig,
    };
    use grotto_tiles::{TileAtlas, TileDef, TileId};

    use crate::structure::StructureLibrary;

    const W: u32 = 30;
    const H: u32 = 30;

    fn atlas() -> TileAtlas {
        TileAtlas::from_defs([
            TileDef {
                name: "stone".into(),
                solid: true,
            },
            TileDef {
                name: "ice".into(),
                solid: true,
            },
            TileDef {
                name: "moss".into(),
                solid: false,
            },
            TileDef {
                name: "icicle".into(),
                solid: false,
            },
        ])
        .unwrap()
    }

    fn library() -> StructureLibrary {
        StructureLibrary::from_configs(
            &[StructureConfig {
                name: "pillar".into(),
                rows: vec![
                    vec![Some("ice".into())],
                    vec![Some("ice".into())],
                    vec![Some("ice".into())],
                ],
            }],
            &atlas(),
        )
        .unwrap()
    }

    fn biome(name: &str, base: &str) -> BiomeConfig {
        BiomeConfig {
            name: name.into(),
            base_tile: base.into(),
            noise: NoiseConfig {
                kind: NoiseKind::White,
                threshold: 0.45,
                ..NoiseConfig::default()
            },
            cave: CaveSettings {
                min_room_size: 8,
                ..CaveSettings::default()
            },
            decorations: vec![
                DecorationConfig {
                    placement: DecorationPlacement::Ceiling,
                    density: NoiseConfig {
                        kind: NoiseKind::White,
                        threshold: 1.0,
                        ..NoiseConfig::default()
                    },
                    entries: vec![DecorationEntryConfig {
                        tile: "icicle".into(),
                        weight: 1.0,
                    }],
                },
                DecorationConfig {
                    placement: DecorationPlacement::Ground,
                    density: NoiseConfig {
                        kind: NoiseKind::White,
                        threshold: 1.0,
                        ..NoiseConfig::default()
                    },
                    entries: vec![DecorationEntryConfig {
                        tile: "moss".into(),
                        weight: 1.0,
                    }],
                },
            ],
            ..BiomeConfig::default()
        }
    }

    fn def(config: &BiomeConfig) -> Arc<BiomeDef> {
        Arc::new(BiomeDef::from_config(config, &atlas(), &library()).unwrap())
    }

    fn region(id: u16, config: &BiomeConfig, cell: CellCoord, seed: u64) -> BiomeRegion {
        BiomeRegion::new(
            BiomeId(id),
            def(config),
            cell,
            TileRect::for_cell(cell, W, H).unwrap(),
            seed,
        )
        .unwrap()
    }

    struct World {
        grid: WorldGrid,
        events: TileEventBuffer,
        cells: BiomeCells,
        links: ConnectionGraph<CellCoord>,
    }

    impl World {
        fn new() -> Self {
            Self {
                grid: WorldGrid::new(),
                events: TileEventBuffer::new(),
                cells: BiomeCells::default(),
                links: ConnectionGraph::new(),
            }
        }

        fn ctx(&mut self) -> RegionContext<'_> {
            RegionContext {
                world: &mut self.grid,
                events: &mut self.events,
                cells: &self.cells,
                cell_connections: &mut self.links,
            }
        }

        /// Runs the full pipeline for one cell and marks it generated.
        fn generate(&mut self, mut region: BiomeRegion) -> BiomeRegion {
            self.cells.assign(region.cell(), region.biome());
            region.create_area().unwrap();
            region.connect_to_closest_biome(&mut self.ctx()).unwrap();
            region.process().unwrap();
            region.fill(&mut self.ctx()).unwrap();
            region.blend_into_surrounded_biomes(&mut self.ctx()).unwrap();
            self.cells.mark_generated(region.cell());
            region
        }
    }

    #[test]
    fn test_process_classifies_tiles() {
        let config = biome("caves", "stone");
        let mut region = region(0, &config, CellCoord::new(0, 0), 5);
        region.create_area().unwrap();
        region.process().unwrap();

        let map = region.generator().map();
        let mut decorations = 0;
        for c in region.rect().iter() {
            let tile = region.tiles().get(c).copied().unwrap();
            match map.class_at(c).unwrap() {
                TileClass::Solid => assert_eq!(tile, PlacedTile::solid(TileId(1))),
                TileClass::Air => {
                    assert_eq!(tile.class, TileClass::Air);
                    let ceiling = map.is_solid_or_missing(c.offset(0, 1));
                    let ground = map.is_solid_or_missing(c.offset(0, -1));
                    if ceiling {
                        // The always-on ceiling rule comes first.
                        assert_eq!(tile.id, TileId(4));
                    } else if ground {
                        assert_eq!(tile.id, TileId(3));
                    } else {
                        assert_eq!(tile, PlacedTile::AIR);
                    }
                    if tile.id != TileId::AIR {
                        decorations += 1;
                    }
                }
            }
        }
        assert!(decorations > 0);
    }

    #[test]
    fn test_density_gate_off_places_nothing() {
        let mut config = biome("bare", "stone");
        for rule in &mut config.decorations {
            rule.density.threshold = 0.0;
        }
        let mut region = region(0, &config, CellCoord::new(0, 0), 5);
        region.create_area().unwrap();
        region.process().unwrap();
        for (_, tile) in region.tiles().iter() {
            assert!(tile.class.is_solid() || *tile == PlacedTile::AIR);
        }
    }

    #[test]
    fn test_process_requires_layout() {
        let config = biome("caves", "stone");
        let mut region = region(0, &config, CellCoord::new(0, 0), 5);
        assert!(matches!(
            region.process(),
            Err(GenerationError::PhaseOrder { .. })
        ));
        let mut world = World::new();
        assert!(region.fill(&mut world.ctx()).is_err());
    }

    #[test]
    fn test_fill_commits_every_tile_as_one_batch() {
        let config = biome("caves", "stone");
        let mut world = World::new();
        let region = world.generate(region(0, &config, CellCoord::new(0, 0), 9));

        assert_eq!(world.grid.len(), (W * H) as usize);
        for c in region.rect().iter() {
            assert_eq!(world.grid.get(c), region.tiles().get(c));
        }
        let batches: Vec<_> = world.events.read().collect();
        assert_eq!(batches.len(), 1);
        assert_eq!(world.events.changed_tile_count(), (W * H) as usize);
    }

    #[test]
    fn test_connects_to_generated_neighbour() {
        let config = biome("caves", "stone");
        let mut world = World::new();
        world.generate(region(0, &config, CellCoord::new(0, 0), 3));
        let right = world.generate(region(0, &config, CellCoord::new(1, 0), 3));

        assert!(
            world
                .links
                .is_connected(CellCoord::new(0, 0), CellCoord::new(1, 0))
        );
        assert_eq!(right.cell(), CellCoord::new(1, 0));
    }

    #[test]
    fn test_no_connection_without_generated_neighbour() {
        let config = biome("caves", "stone");
        let mut world = World::new();
        world.generate(region(0, &config, CellCoord::new(0, 0), 3));
        // (2, 0) is not adjacent to (0, 0).
        world.generate(region(0, &config, CellCoord::new(2, 0), 3));
        assert_eq!(world.links.edge_count(), 0);
    }

    #[test]
    fn test_disabled_direction_not_connected() {
        let mut config = biome("caves", "stone");
        config.connection.left = false;
        let mut world = World::new();
        world.generate(region(0, &config, CellCoord::new(0, 0), 3));
        world.generate(region(0, &config, CellCoord::new(1, 0), 3));
        assert_eq!(world.links.edge_count(), 0);
    }

    const HERE: CellCoord = CellCoord::new(1, 1);
    const LEFT: CellCoord = CellCoord::new(0, 1);
    const BELOW: CellCoord = CellCoord::new(1, 0);

    /// A biome whose layout is open everywhere but the four corners.
    fn hollow(forced: Vec<Direction>) -> BiomeConfig {
        let mut config = biome("hollow", "stone");
        config.noise.threshold = 0.0;
        config.connection.forced = forced;
        config
    }

    /// Commits `cell` as an already generated neighbour.
    fn paint(world: &mut World, cell: CellCoord, tile_at: impl Fn(TileCoord) -> PlacedTile) {
        for c in TileRect::for_cell(cell, W, H).unwrap().iter() {
            world.grid.set(c, tile_at(c));
        }
        world.cells.assign(cell, BiomeId(1));
        world.cells.mark_generated(cell);
    }

    fn connect_here(world: &mut World, config: &BiomeConfig, seed: u64) -> Option<Direction> {
        let mut region = region(0, config, HERE, seed);
        world.cells.assign(region.cell(), region.biome());
        region.create_area().unwrap();
        region.connect_to_closest_biome(&mut world.ctx()).unwrap()
    }

    /// Left neighbour fully open, one distance away. The cell below is solid
    /// apart from a pocket five rows under the border.
    fn open_left_deep_pocket_below() -> World {
        let stone = PlacedTile::solid(TileId(1));
        let pocket = TileCoord::new(45, 25);
        let mut world = World::new();
        paint(&mut world, LEFT, |_| PlacedTile::AIR);
        paint(&mut world, BELOW, |c| if c == pocket { PlacedTile::AIR } else { stone });
        world
    }

    #[test]
    fn test_closest_neighbour_wins_without_forcing() {
        let mut world = open_left_deep_pocket_below();
        assert_eq!(
            connect_here(&mut world, &hollow(Vec::new()), 2),
            Some(Direction::Left)
        );
        assert!(world.links.is_connected(HERE, LEFT));
        assert!(!world.links.is_connected(HERE, BELOW));
    }

    #[test]
    fn test_forced_direction_beats_closer_neighbour() {
        let mut world = open_left_deep_pocket_below();
        assert_eq!(
            connect_here(&mut world, &hollow(vec![Direction::Down]), 2),
            Some(Direction::Down)
        );
        assert!(world.links.is_connected(HERE, BELOW));
        assert!(!world.links.is_connected(HERE, LEFT));
        // The tunnel runs straight down to the pocket.
        for y in 25..30 {
            assert_eq!(
                world.grid.get(TileCoord::new(45, y)),
                Some(&PlacedTile::AIR)
            );
        }
    }

    #[test]
    fn test_forced_direction_counts_with_its_flag_off() {
        let mut config = hollow(vec![Direction::Down]);
        config.connection.down = false;
        let mut world = open_left_deep_pocket_below();
        assert_eq!(
            connect_here(&mut world, &config, 2),
            Some(Direction::Down)
        );
    }

    #[test]
    fn test_solid_neighbour_is_skipped() {
        let stone = PlacedTile::solid(TileId(1));
        let mut world = World::new();
        paint(&mut world, LEFT, |_| stone);

        assert_eq!(connect_here(&mut world, &hollow(Vec::new()), 2), None);
        assert_eq!(world.links.edge_count(), 0);
        assert!(world.events.is_empty());
        let left = TileRect::for_cell(LEFT, W, H).unwrap();
        assert!(left.iter().all(|c| world.grid.get(c) == Some(&stone)));
    }

    #[test]
    fn test_equal_distances_broken_at_random() {
        let config = hollow(Vec::new());
        let open_pair = || {
            let mut world = World::new();
            paint(&mut world, LEFT, |_| PlacedTile::AIR);
            paint(&mut world, BELOW, |_| PlacedTile::AIR);
            world
        };

        let mut picked = HashSet::new();
        for seed in 0..32 {
            let first = connect_here(&mut open_pair(), &config, seed);
            let again = connect_here(&mut open_pair(), &config, seed);
            assert_eq!(first, again, "seed {seed}");
            picked.insert(first);
        }
        assert!(picked.contains(&Some(Direction::Left)));
        assert!(picked.contains(&Some(Direction::Down)));
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_blend_only_between_different_biomes() {
        let stone = biome("caves", "stone");
        let mut world = World::new();
        world.generate(region(0, &stone, CellCoord::new(0, 0), 4));
        let before = world.grid.clone();
        world.events.clear();

        // Same biome: no blend batch beyond fill and tunnels.
        let mut same = region(0, &stone, CellCoord::new(1, 0), 4);
        world.cells.assign(same.cell(), same.biome());
        same.create_area().unwrap();
        same.process().unwrap();
        same.fill(&mut world.ctx()).unwrap();
        let changed = same.blend_into_surrounded_biomes(&mut world.ctx()).unwrap();
        assert_eq!(changed, 0);
        for c in TileRect::for_cell(CellCoord::new(0, 0), W, H).unwrap().iter() {
            assert_eq!(world.grid.get(c), before.get(c));
        }
    }

    #[test]
    fn test_carry_forward_blend_retextures_solid_tiles() {
        let stone = biome("caves", "stone");
        let mut ice = biome("ice", "ice");
        ice.blend = BlendConfig {
            mode: BlendMode::CarryForward,
            radius: RadiusRange::fixed(3),
        };
        ice.connection.left = false;

        let mut world = World::new();
        world.generate(region(0, &stone, CellCoord::new(0, 0), 8));
        let ice_region = world.generate(region(1, &ice, CellCoord::new(1, 0), 8));

        let stone_rect = TileRect::for_cell(CellCoord::new(0, 0), W, H).unwrap();
        let ice_tile = PlacedTile::solid(TileId(2));
        let spread = stone_rect
            .iter()
            .filter(|&c| world.grid.get(c) == Some(&ice_tile))
            .count();
        assert!(spread > 0, "ice never crossed the seam");

        // Nothing outside the two cells was touched.
        assert_eq!(world.grid.len(), (2 * W * H) as usize);
        assert_eq!(ice_region.rect().x, W as i32);
    }

    #[test]
    fn test_air_blend_opens_the_seam() {
        let stone = biome("caves", "stone");
        let mut airy = biome("hollow", "stone");
        airy.blend = BlendConfig {
            mode: BlendMode::Air,
            radius: RadiusRange::fixed(2),
        };
        airy.connection.left = false;

        let mut world = World::new();
        world.generate(region(0, &stone, CellCoord::new(0, 0), 8));
        world.generate(region(1, &airy, CellCoord::new(1, 0), 8));

        for y in 0..H as i32 {
            // Border points are spaced two apart, each opening its own tile.
            if y % 2 == 0 {
                assert_eq!(
                    world.grid.get(TileCoord::new(W as i32, y)),
                    Some(&PlacedTile::AIR)
                );
            }
        }
    }

    #[test]
    fn test_structure_stamped_inside_cell() {
        let mut config = biome("ruins", "stone");
        config.structures = vec![StructureSpawnConfig {
            name: "pillar".into(),
            chance: 1.0,
        }];
        let mut region = region(0, &config, CellCoord::new(2, 1), 11);
        region.create_area().unwrap();
        region.process().unwrap();
        let written = region.stamp_structures(&library()).unwrap();
        assert_eq!(written, 3);

        let ice = PlacedTile::solid(TileId(2));
        let column: Vec<_> = region
            .rect()
            .iter()
            .filter(|&c| region.tiles().get(c) == Some(&ice))
            .collect();
        assert_eq!(column.len(), 3);
        assert!(column.iter().all(|c| c.x == column[0].x));
    }

    #[test]
    fn test_region_is_deterministic() {
        let config = biome("caves", "stone");
        let mut a = World::new();
        let mut b = World::new();
        a.generate(region(0, &config, CellCoord::new(0, 0), 21));
        a.generate(region(0, &config, CellCoord::new(0, 1), 21));
        b.generate(region(0, &config, CellCoord::new(0, 0), 21));
        b.generate(region(0, &config, CellCoord::new(0, 1), 21));
        assert_eq!(a.grid, b.grid);
    }
}
