//! Tile change notifications.
//!
//! Writers record one [`TileEvent::Committed`] batch per region pass so a renderer
//! can repaint only the coordinates that changed. Events queue up until a
//! consumer drains them.

use crate::coord::{CellCoord, TileCoord};
use crate::grid::WorldGrid;
use crate::tile::PlacedTile;

/// A change to the committed world grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TileEvent {
    /// Every tile was dropped (full regeneration).
    Cleared,
    /// Tiles written while processing `cell`.
    Committed {
        /// The partition cell whose pass produced the writes.
        cell: CellCoord,
        /// Coordinates whose tile changed, in write order.
        coords: Vec<TileCoord>,
    },
}

/// Pending [`TileEvent`]s in send order.
#[derive(Debug, Default)]
pub struct TileEventBuffer {
    pending: Vec<TileEvent>,
}

impl TileEventBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an event.
    pub fn send(&mut self, event: TileEvent) {
        self.pending.push(event);
    }

    /// Pending events, oldest first.
    pub fn read(&self) -> impl Iterator<Item = &TileEvent> {
        self.pending.iter()
    }

    /// Takes every pending event, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<TileEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if there is nothing to read.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of coordinates across pending commit batches.
    pub fn changed_tile_count(&self) -> usize {
        self.read()
            .map(|e| match e {
                TileEvent::Committed { coords, .. } => coords.len(),
                TileEvent::Cleared => 0,
            })
            .sum()
    }

    /// Drops everything.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Writes `tiles` into `grid` and records one batch for `cell` with the
/// coordinates that actually changed. Returns the number of changed tiles.
pub fn commit_tiles(
    grid: &mut WorldGrid,
    cell: CellCoord,
    tiles: impl IntoIterator<Item = (TileCoord, PlacedTile)>,
    events: &mut TileEventBuffer,
) -> usize {
    let mut coords = Vec::new();
    for (coord, tile) in tiles {
        if grid.get(coord) == Some(&tile) {
            continue;
        }
        grid.set(coord, tile);
        coords.push(coord);
    }
    let count = coords.len();
    if count > 0 {
        events.send(TileEvent::Committed { cell, coords });
    }
    count
}
