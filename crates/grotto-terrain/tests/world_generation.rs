use grotto_config::{BiomeConfig, Config, NoiseConfig, NoiseKind};
use grotto_terrain::{
    CaveGenerator, ConfigurationError, GenerationError, MAIN_ROOM, ThresholdField, World,
};
use grotto_tiles::{CellCoord, TileClass, TileCoord, TileEvent, TileRect};

fn config(cell: u32) -> Config {
    let mut config = Config::default();
    config.worldgen.cell_width = cell;
    config.worldgen.cell_height = cell;
    config
}

fn single_biome(cell: u32) -> Config {
    let mut config = config(cell);
    config.biomes = vec![BiomeConfig {
        name: "caves".into(),
        ..BiomeConfig::default()
    }];
    config
}

#[test]
fn same_seed_reproduces_world() {
    let mut a = World::new(&config(32)).unwrap();
    let mut b = World::new(&config(32)).unwrap();
    a.regenerate(1234, CellCoord::new(0, 0), 3, 3).unwrap();
    b.regenerate(1234, CellCoord::new(0, 0), 3, 3).unwrap();

    assert_eq!(a.grid(), b.grid());
    assert_eq!(a.stats(), b.stats());
    for x in 0..3 {
        for y in 0..3 {
            let cell = CellCoord::new(x, y);
            assert_eq!(a.biome_at(cell), b.biome_at(cell));
            assert_eq!(a.cell_connections(cell), b.cell_connections(cell));
        }
    }
}

#[test]
fn different_seeds_differ() {
    let mut a = World::new(&config(32)).unwrap();
    let mut b = World::new(&config(32)).unwrap();
    a.regenerate(1, CellCoord::new(0, 0), 2, 2).unwrap();
    b.regenerate(2, CellCoord::new(0, 0), 2, 2).unwrap();
    assert_ne!(a.grid(), b.grid());
}

#[test]
fn regenerate_replaces_previous_world() {
    let mut world = World::new(&config(24)).unwrap();
    world.regenerate(5, CellCoord::new(0, 0), 2, 2).unwrap();
    world.regenerate(6, CellCoord::new(10, 10), 1, 1).unwrap();

    assert_eq!(world.tile_at(TileCoord::new(0, 0)), None);
    assert!(world.tile_at(TileCoord::new(240, 240)).is_some());
    assert_eq!(world.stats().tiles, 24 * 24);
    assert_eq!(world.stats().seed, 6);
}

#[test]
fn failed_regenerate_keeps_previous_world() {
    let mut world = World::new(&config(24)).unwrap();
    world.regenerate(5, CellCoord::new(0, 0), 2, 2).unwrap();
    world.drain_events();
    let before = world.grid().cloned();

    let err = world
        .regenerate(6, CellCoord::new(0, 0), 3, 0)
        .unwrap_err();
    assert!(matches!(
        err,
        GenerationError::Configuration(ConfigurationError::EmptyArea { .. })
    ));
    assert_eq!(world.grid().cloned(), before);
    assert!(world.events().is_empty());
}

#[test]
fn invalid_biome_config_rejected() {
    let mut config = config(24);
    config.biomes[0].noise.frequency = -1.0;
    assert!(matches!(
        World::new(&config),
        Err(ConfigurationError::InvalidFrequency(_))
    ));

    let mut config = single_biome(0);
    config.worldgen.cell_height = 10;
    assert!(matches!(
        World::new(&config),
        Err(ConfigurationError::ZeroCellSize { .. })
    ));
}

#[test]
fn events_cover_every_cell() {
    let mut world = World::new(&config(24)).unwrap();
    world.regenerate(77, CellCoord::new(-1, -1), 2, 2).unwrap();
    let events = world.drain_events();

    assert_eq!(events[0], TileEvent::Cleared);
    let area = TileRect::new(-24, -24, 48, 48);
    let mut cells = Vec::new();
    for event in &events[1..] {
        let TileEvent::Committed { cell, coords } = event else {
            panic!("unexpected second clear");
        };
        assert!(coords.iter().all(|&c| area.contains(c)));
        cells.push(*cell);
    }
    for x in -1..1 {
        for y in -1..1 {
            assert!(cells.contains(&CellCoord::new(x, y)));
        }
    }
}

#[test]
fn cell_connections_join_orthogonal_neighbours() {
    let mut config = single_biome(40);
    config.worldgen.blend_biomes = false;
    let mut world = World::new(&config).unwrap();
    world.regenerate(3, CellCoord::new(0, 0), 3, 3).unwrap();

    let mut edges = 0;
    for x in 0..3 {
        for y in 0..3 {
            let cell = CellCoord::new(x, y);
            for other in world.cell_connections(cell) {
                let dist = (other.x - cell.x).abs() + (other.y - cell.y).abs();
                assert_eq!(dist, 1, "{cell:?} joined to {other:?}");
                edges += 1;
            }
        }
    }
    assert!(edges > 0);
    assert_eq!(edges / 2, world.stats().cell_connections);
}

#[test]
fn disabled_connections_leave_cells_separate() {
    let mut config = single_biome(24);
    config.worldgen.connect_to_closest_biome = false;
    let mut world = World::new(&config).unwrap();
    world.regenerate(3, CellCoord::new(0, 0), 2, 2).unwrap();
    assert_eq!(world.stats().cell_connections, 0);
}

#[test]
fn every_room_reaches_main_room() {
    let field = ThresholdField::from_config(
        &NoiseConfig {
            kind: NoiseKind::White,
            threshold: 0.45,
            ..NoiseConfig::default()
        },
        99,
    )
    .unwrap();
    let settings = grotto_config::CaveSettings {
        min_room_size: 10,
        ..Default::default()
    };
    let mut cave = CaveGenerator::new(field, settings, 99);
    let rect = TileRect::new(0, 0, 64, 64);
    cave.create_area(rect).unwrap();

    let rooms = cave.rooms();
    assert!(!rooms.is_empty());
    let reachable = cave.room_graph().all_connected(MAIN_ROOM);
    assert_eq!(reachable.len(), rooms.len());
    for room in rooms {
        assert!(room.size() >= 10);
        assert!(
            room.tiles()
                .iter()
                .all(|&c| cave.map().class_at(c) == Some(TileClass::Air))
        );
    }
}
