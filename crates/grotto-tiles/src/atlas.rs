//! Tile atlas: maps compact [`TileId`] values to named tile definitions.
//!
//! The atlas is built once at startup from configuration. Air is always id 0 so
//! that a zeroed id means empty space.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tile::{PlacedTile, TileClass, TileId};

/// Descriptor for one tile kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDef {
    /// Unique name (e.g. "stone", "moss").
    pub name: String,
    /// Whether the tile blocks movement.
    pub solid: bool,
}

/// Errors raised while building the atlas.
#[derive(Debug, Error)]
pub enum TileAtlasError {
    /// A tile with the same name already exists.
    #[error("duplicate tile name: {0}")]
    DuplicateName(String),
    /// All 65 536 ids are taken.
    #[error("tile atlas is full (max 65536 tiles)")]
    AtlasFull,
}

/// Maps [`TileId`] to [`TileDef`] with reverse lookup by name.
#[derive(Clone, Debug)]
pub struct TileAtlas {
    tiles: Vec<TileDef>,
    name_to_id: HashMap<String, TileId>,
}

impl TileAtlas {
    /// Creates an atlas with air pre-registered as id 0.
    pub fn new() -> Self {
        let air = TileDef {
            name: "air".to_string(),
            solid: false,
        };
        let mut name_to_id = HashMap::new();
        name_to_id.insert(air.name.clone(), TileId::AIR);
        Self {
            tiles: vec![air],
            name_to_id,
        }
    }

    /// Registers a tile and returns its id. Ids are sequential from 1.
    ///
    /// # Errors
    ///
    /// Returns [`TileAtlasError::DuplicateName`] if the name is taken and
    /// [`TileAtlasError::AtlasFull`] once every id is in use.
    pub fn register(&mut self, def: TileDef) -> Result<TileId, TileAtlasError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(TileAtlasError::DuplicateName(def.name));
        }
        if self.tiles.len() > u16::MAX as usize {
            return Err(TileAtlasError::AtlasFull);
        }
        let id = TileId(self.tiles.len() as u16);
        self.name_to_id.insert(def.name.clone(), id);
        self.tiles.push(def);
        Ok(id)
    }

    /// Builds an atlas from a list of definitions, in order.
    ///
    /// # Errors
    ///
    /// Fails on the first duplicate name.
    pub fn from_defs(defs: impl IntoIterator<Item = TileDef>) -> Result<Self, TileAtlasError> {
        let mut atlas = Self::new();
        for def in defs {
            atlas.register(def)?;
        }
        Ok(atlas)
    }

    /// Definition for `id`, or `None` if unknown.
    pub fn get(&self, id: TileId) -> Option<&TileDef> {
        self.tiles.get(id.0 as usize)
    }

    /// Id of the tile called `name`.
    pub fn lookup_by_name(&self, name: &str) -> Option<TileId> {
        self.name_to_id.get(name).copied()
    }

    /// Layout class of `id`. Unknown ids are treated as solid.
    pub fn class_of(&self, id: TileId) -> TileClass {
        match self.get(id) {
            Some(def) if !def.solid => TileClass::Air,
            _ => TileClass::Solid,
        }
    }

    /// The placed form of `id`.
    pub fn placed(&self, id: TileId) -> PlacedTile {
        PlacedTile {
            id,
            class: self.class_of(id),
        }
    }

    /// Number of tiles including air.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns `true` if only air is registered.
    pub fn is_empty(&self) -> bool {
        self.tiles.len() <= 1
    }

    /// Iterates `(id, def)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TileId, &TileDef)> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, def)| (TileId(i as u16), def))
    }
}

impl Default for TileAtlas {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &str, solid: bool) -> TileDef {
        TileDef {
            name: name.to_string(),
            solid,
        }
    }

    #[test]
    fn test_air_is_id_zero() {
        let atlas = TileAtlas::new();
        assert_eq!(atlas.lookup_by_name("air"), Some(TileId::AIR));
        assert_eq!(atlas.class_of(TileId::AIR), TileClass::Air);
        assert!(atlas.is_empty());
    }

    #[test]
    fn test_register_sequential_ids() {
        let atlas =
            TileAtlas::from_defs([def("stone", true), def("moss", false), def("ice", true)])
                .unwrap();
        assert_eq!(atlas.lookup_by_name("stone"), Some(TileId(1)));
        assert_eq!(atlas.lookup_by_name("moss"), Some(TileId(2)));
        assert_eq!(atlas.lookup_by_name("ice"), Some(TileId(3)));
        assert_eq!(atlas.len(), 4);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = TileAtlas::from_defs([def("stone", true), def("stone", false)]);
        assert!(matches!(result, Err(TileAtlasError::DuplicateName(name)) if name == "stone"));
    }

    #[test]
    fn test_class_of_unknown_is_solid() {
        let atlas = TileAtlas::new();
        assert_eq!(atlas.class_of(TileId(99)), TileClass::Solid);
    }

    #[test]
    fn test_placed_uses_definition_class() {
        let atlas = TileAtlas::from_defs([def("stone", true), def("moss", false)]).unwrap();
        assert_eq!(atlas.placed(TileId(1)), PlacedTile::solid(TileId(1)));
        assert_eq!(atlas.placed(TileId(2)), PlacedTile::passable(TileId(2)));
    }
}
