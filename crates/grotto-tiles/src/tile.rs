//! Tile classification and the visual tile placed into the world grid.

use serde::{Deserialize, Serialize};

/// The binary layout classification the generation core works with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileClass {
    /// Open, passable space.
    Air,
    /// Filled terrain.
    Solid,
}

impl TileClass {
    /// Returns `true` for [`TileClass::Solid`].
    #[inline]
    pub fn is_solid(self) -> bool {
        self == TileClass::Solid
    }
}

/// Compact visual tile identifier. Id 0 is always air.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u16);

impl TileId {
    /// The empty tile.
    pub const AIR: TileId = TileId(0);
}

/// A tile committed to the world: what it looks like and whether it blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlacedTile {
    /// Visual tile id.
    pub id: TileId,
    /// Layout classification.
    pub class: TileClass,
}

impl PlacedTile {
    /// Plain air.
    pub const AIR: PlacedTile = PlacedTile {
        id: TileId::AIR,
        class: TileClass::Air,
    };

    /// A solid tile with the given id.
    pub const fn solid(id: TileId) -> Self {
        Self {
            id,
            class: TileClass::Solid,
        }
    }

    /// A non-blocking tile (decoration) with the given id.
    pub const fn passable(id: TileId) -> Self {
        Self {
            id,
            class: TileClass::Air,
        }
    }
}

/// Anything stored in a [`TileGrid`](crate::TileGrid) that has a layout class.
pub trait Classified {
    /// The layout class of this tile.
    fn class(&self) -> TileClass;
}

impl Classified for TileClass {
    #[inline]
    fn class(&self) -> TileClass {
        *self
    }
}

impl Classified for PlacedTile {
    #[inline]
    fn class(&self) -> TileClass {
        self.class
    }
}
