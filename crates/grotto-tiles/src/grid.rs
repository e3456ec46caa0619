//! Sparse tile grid keyed by [`TileCoord`].
//!
//! An absent key means "not generated yet". Every neighbour count made through
//! this grid treats such coordinates as solid, so region edges behave like walls
//! until the neighbouring region exists.

use hashbrown::HashMap;

use crate::coord::TileCoord;
use crate::tile::{Classified, PlacedTile, TileClass};

/// Sparse map from coordinate to tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid<T> {
    tiles: HashMap<TileCoord, T>,
}

/// The committed world: visual tiles with their classes.
pub type WorldGrid = TileGrid<PlacedTile>;

impl<T> TileGrid<T> {
    /// Creates an empty grid.
    pub fn new() -> Self {
        Self {
            tiles: HashMap::new(),
        }
    }

    /// Creates an empty grid with room for `capacity` tiles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tiles: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the tile at `coord`, or `None` if it has not been generated.
    #[inline]
    pub fn get(&self, coord: TileCoord) -> Option<&T> {
        self.tiles.get(&coord)
    }

    /// Writes a tile, returning the previous one.
    #[inline]
    pub fn set(&mut self, coord: TileCoord, tile: T) -> Option<T> {
        self.tiles.insert(coord, tile)
    }

    /// Overwrites `coord` only if it already exists. Returns `true` if written.
    #[inline]
    pub fn replace_existing(&mut self, coord: TileCoord, tile: T) -> bool {
        match self.tiles.get_mut(&coord) {
            Some(slot) => {
                *slot = tile;
                true
            }
            None => false,
        }
    }

    /// Returns `true` if `coord` has been generated.
    #[inline]
    pub fn contains(&self, coord: TileCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    /// Number of generated tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns `true` if nothing has been generated.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Drops every tile.
    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// Iterates all tiles in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, &T)> {
        self.tiles.iter().map(|(c, t)| (*c, t))
    }
}

impl<T: Classified> TileGrid<T> {
    /// Layout class at `coord`, or `None` if not generated.
    #[inline]
    pub fn class_at(&self, coord: TileCoord) -> Option<TileClass> {
        self.tiles.get(&coord).map(Classified::class)
    }

    /// Returns `true` if a generated solid tile exists at `coord`.
    #[inline]
    pub fn is_solid(&self, coord: TileCoord) -> bool {
        self.class_at(coord) == Some(TileClass::Solid)
    }

    /// Returns `true` if a generated air tile exists at `coord`.
    #[inline]
    pub fn is_air(&self, coord: TileCoord) -> bool {
        self.class_at(coord) == Some(TileClass::Air)
    }

    /// Solid test where missing coordinates count as solid.
    #[inline]
    pub fn is_solid_or_missing(&self, coord: TileCoord) -> bool {
        self.class_at(coord) != Some(TileClass::Air)
    }

    /// Counts solid tiles in the 3×3 neighbourhood around `coord`, the centre
    /// included, with missing coordinates counted as solid.
    pub fn solid_count_3x3(&self, coord: TileCoord) -> u32 {
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if self.is_solid_or_missing(coord.offset(dx, dy)) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Returns `true` if any orthogonal neighbour of `coord` is solid or missing.
    pub fn touches_solid(&self, coord: TileCoord) -> bool {
        coord
            .orthogonal_neighbors()
            .into_iter()
            .any(|n| self.is_solid_or_missing(n))
    }
}

impl<T> Default for TileGrid<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::TileRect;
    use crate::tile::TileId;

    #[test]
    fn test_missing_tile_is_not_generated() {
        let grid: TileGrid<TileClass> = TileGrid::new();
        let c = TileCoord::new(3, 4);
        assert_eq!(grid.class_at(c), None);
        assert!(!grid.is_solid(c));
        assert!(!grid.is_air(c));
        assert!(grid.is_solid_or_missing(c));
    }

    #[test]
    fn test_isolated_tile_sees_nine_solids() {
        let mut grid = TileGrid::new();
        let c = TileCoord::new(0, 0);
        grid.set(c, TileClass::Air);
        // Eight missing neighbours count as solid, the centre is air.
        assert_eq!(grid.solid_count_3x3(c), 8);
        grid.set(c, TileClass::Solid);
        assert_eq!(grid.solid_count_3x3(c), 9);
    }

    #[test]
    fn test_replace_existing_does_not_create() {
        let mut grid = TileGrid::new();
        assert!(!grid.replace_existing(TileCoord::new(1, 1), TileClass::Air));
        assert!(grid.is_empty());
        grid.set(TileCoord::new(1, 1), TileClass::Solid);
        assert!(grid.replace_existing(TileCoord::new(1, 1), TileClass::Air));
        assert!(grid.is_air(TileCoord::new(1, 1)));
    }

    #[test]
    fn test_world_grid_classes() {
        let mut grid = WorldGrid::new();
        grid.set(TileCoord::new(0, 0), PlacedTile::solid(TileId(3)));
        grid.set(TileCoord::new(1, 0), PlacedTile::passable(TileId(7)));
        assert!(grid.is_solid(TileCoord::new(0, 0)));
        assert!(grid.is_air(TileCoord::new(1, 0)));
    }

    #[test]
    fn test_touches_solid() {
        let mut grid = TileGrid::new();
        for c in TileRect::new(0, 0, 3, 3).iter() {
            grid.set(c, TileClass::Air);
        }
        assert!(!grid.touches_solid(TileCoord::new(1, 1)));
        // Border tiles touch missing space.
        assert!(grid.touches_solid(TileCoord::new(0, 1)));
    }
}
