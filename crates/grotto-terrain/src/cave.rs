//! Cellular-automata cave generation for one rectangular region.
//!
//! A region moves through `Empty → Generated → Smoothed → RoomsResolved`:
//! threshold noise lays out raw solid and air, smoothing passes turn it into
//! caves, small pockets are filled and the remaining rooms are tunnelled
//! together so every room is reachable from the largest one.

use std::collections::VecDeque;

use grotto_config::CaveSettings;
use grotto_tiles::{TileClass, TileCoord, TileGrid, TileRect};
use hashbrown::HashSet;

use crate::connector::{RoomConnector, carve_passages};
use crate::error::{ConfigurationError, GenerationError, GenerationStage};
use crate::field::ThresholdField;
use crate::room::{ConnectionGraph, Room, RoomId};

/// Progress of a [`CaveGenerator`] through its passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CavePhase {
    /// Nothing generated.
    Empty,
    /// Raw noise classification done.
    Generated,
    /// At least one smoothing pass done.
    Smoothed,
    /// Rooms found and small pockets filled.
    RoomsResolved,
}

/// Builds the solid/air layout of one region.
pub struct CaveGenerator {
    field: ThresholdField,
    settings: CaveSettings,
    seed: u64,
    map: TileGrid<TileClass>,
    phase: CavePhase,
    rooms: Vec<Room>,
    room_graph: ConnectionGraph<RoomId>,
}

impl CaveGenerator {
    /// A generator sampling `field`. `seed` feeds the tunnel radius streams.
    pub fn new(field: ThresholdField, settings: CaveSettings, seed: u64) -> Self {
        Self {
            field,
            settings,
            seed,
            map: TileGrid::new(),
            phase: CavePhase::Empty,
            rooms: Vec::new(),
            room_graph: ConnectionGraph::new(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> CavePhase {
        self.phase
    }

    /// The region map.
    pub fn map(&self) -> &TileGrid<TileClass> {
        &self.map
    }

    /// Mutable region map, for tunnels carved in from outside.
    pub fn map_mut(&mut self) -> &mut TileGrid<TileClass> {
        &mut self.map
    }

    /// Rooms found by the last [`find_rooms`](Self::find_rooms), largest first.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Connections between rooms made by [`connect_rooms`](Self::connect_rooms).
    pub fn room_graph(&self) -> &ConnectionGraph<RoomId> {
        &self.room_graph
    }

    /// Cave settings in use.
    pub fn settings(&self) -> &CaveSettings {
        &self.settings
    }

    /// Drops all state. Safe to call repeatedly.
    pub fn reset(&mut self) {
        self.map.clear();
        self.rooms.clear();
        self.room_graph.clear();
        self.phase = CavePhase::Empty;
    }

    fn require(
        &self,
        operation: &'static str,
        allowed: &[CavePhase],
    ) -> Result<(), GenerationError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(GenerationError::PhaseOrder {
                operation,
                phase: self.phase,
            })
        }
    }

    /// Classifies every coordinate of `rect` with the threshold field.
    pub fn generate_area(&mut self, rect: TileRect) -> Result<(), GenerationError> {
        self.require("generate_area", &[CavePhase::Empty])?;
        self.map = TileGrid::with_capacity(rect.area());
        for coord in rect.iter() {
            self.map.set(coord, self.field.classify(coord.x, coord.y));
        }
        self.phase = CavePhase::Generated;
        Ok(())
    }

    /// Runs `iterations` smoothing passes over `rect`.
    ///
    /// Each pass visits tiles row by row and rewrites them in place: more than
    /// `4 + roughness` solid tiles in the 3×3 block (centre included, missing
    /// tiles solid) make a tile solid, fewer than `4 - roughness` make it air.
    pub fn smooth(
        &mut self,
        rect: TileRect,
        iterations: u32,
        roughness: i32,
    ) -> Result<(), GenerationError> {
        self.require("smooth", &[CavePhase::Generated, CavePhase::Smoothed])?;
        let fill_above = 4 + roughness;
        let open_below = 4 - roughness;
        for _ in 0..iterations {
            for coord in rect.iter() {
                if !self.map.contains(coord) {
                    return Err(GenerationError::MissingTile {
                        coord,
                        stage: GenerationStage::Smooth,
                    });
                }
                let solid = self.map.solid_count_3x3(coord) as i32;
                if solid > fill_above {
                    self.map.set(coord, TileClass::Solid);
                } else if solid < open_below {
                    self.map.set(coord, TileClass::Air);
                }
            }
        }
        self.phase = CavePhase::Smoothed;
        Ok(())
    }

    /// Finds the 4-connected air regions inside `rect`.
    ///
    /// Regions smaller than `min_room_size` are filled with solid. The rest are
    /// kept as rooms sorted by size, largest first, ties in scan order.
    pub fn find_rooms(
        &mut self,
        rect: TileRect,
        min_room_size: usize,
    ) -> Result<&[Room], GenerationError> {
        self.require("find_rooms", &[CavePhase::Generated, CavePhase::Smoothed])?;

        let mut visited: HashSet<TileCoord> = HashSet::new();
        let mut components = Vec::new();
        for start in rect.iter() {
            match self.map.class_at(start) {
                None => {
                    return Err(GenerationError::MissingTile {
                        coord: start,
                        stage: GenerationStage::FindRooms,
                    });
                }
                Some(TileClass::Solid) => continue,
                Some(TileClass::Air) => {}
            }
            if !visited.insert(start) {
                continue;
            }

            let mut tiles = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(tile) = queue.pop_front() {
                for next in tile.orthogonal_neighbors() {
                    if rect.contains(next) && self.map.is_air(next) && visited.insert(next) {
                        tiles.push(next);
                        queue.push_back(next);
                    }
                }
            }
            components.push(tiles);
        }

        let mut filled = 0usize;
        let mut kept = Vec::new();
        for tiles in components {
            if tiles.len() < min_room_size {
                filled += tiles.len();
                for &t in &tiles {
                    self.map.set(t, TileClass::Solid);
                }
            } else {
                kept.push(tiles);
            }
        }

        let mut rooms: Vec<Room> = kept
            .into_iter()
            .map(|tiles| Room::new(tiles, &self.map))
            .collect();
        rooms.sort_by(|a, b| b.size().cmp(&a.size()));

        tracing::trace!(rooms = rooms.len(), filled, "rooms resolved");
        self.rooms = rooms;
        self.room_graph.clear();
        self.phase = CavePhase::RoomsResolved;
        Ok(&self.rooms)
    }

    /// Links every room to the main room and carves the passages.
    ///
    /// Runs the nearest-room pass `connection_iterations` times, then the
    /// main-room pass. Returns the number of passages carved.
    pub fn connect_rooms(&mut self) -> Result<usize, GenerationError> {
        self.require("connect_rooms", &[CavePhase::RoomsResolved])?;
        if self.settings.tunnel_radius.min == 0 {
            return Err(ConfigurationError::ZeroTunnelRadius("cave.tunnel_radius").into());
        }

        let connector = RoomConnector::new(&self.rooms);
        let mut passages = Vec::new();
        for _ in 0..self.settings.connection_iterations {
            passages.extend(connector.connect_nearest_pairs(&mut self.room_graph));
        }
        passages.extend(connector.connect_to_main_room(&mut self.room_graph));

        carve_passages(
            &mut self.map,
            &passages,
            self.settings.tunnel_radius,
            self.seed,
        );
        Ok(passages.len())
    }

    /// Runs every pass over `rect` with the configured settings.
    pub fn create_area(&mut self, rect: TileRect) -> Result<(), GenerationError> {
        self.reset();
        self.generate_area(rect)?;
        self.smooth(
            rect,
            self.settings.smoothing_iterations,
            self.settings.roughness_offset,
        )?;
        self.find_rooms(rect, self.settings.min_room_size)?;
        self.connect_rooms()?;
        Ok(())
    }
}
