//! Biome registry: maps [`BiomeId`] to [`BiomeDef`] with name-based lookup.

use std::sync::Arc;

use hashbrown::HashMap;

use super::BiomeDef;
use crate::error::ConfigurationError;

/// Unique identifier for a biome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BiomeId(pub u16);

/// Stores all registered biome definitions with O(1) lookup by ID.
#[derive(Clone, Debug, Default)]
pub struct BiomeRegistry {
    biomes: Vec<Arc<BiomeDef>>,
    name_to_id: HashMap<String, BiomeId>,
}

impl BiomeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new biome definition, returning its assigned [`BiomeId`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicateBiome`] if a biome with the same name exists.
    pub fn register(&mut self, def: BiomeDef) -> Result<BiomeId, ConfigurationError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(ConfigurationError::DuplicateBiome(def.name));
        }
        let id = BiomeId(self.biomes.len() as u16);
        self.name_to_id.insert(def.name.clone(), id);
        self.biomes.push(Arc::new(def));
        Ok(id)
    }

    /// Returns the definition for the given biome ID.
    pub fn get(&self, id: BiomeId) -> Option<&Arc<BiomeDef>> {
        self.biomes.get(id.0 as usize)
    }

    /// Looks up a biome ID by name.
    pub fn lookup_by_name(&self, name: &str) -> Option<BiomeId> {
        self.name_to_id.get(name).copied()
    }

    /// `(id, def)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (BiomeId, &Arc<BiomeDef>)> {
        self.biomes
            .iter()
            .enumerate()
            .map(|(i, def)| (BiomeId(i as u16), def))
    }

    /// Returns the number of registered biomes.
    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    /// Returns `true` if no biomes are registered.
    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grotto_config::BiomeConfig;
    use grotto_tiles::{TileAtlas, TileDef};

    use crate::structure::StructureLibrary;

    fn def(name: &str) -> BiomeDef {
        let atlas = TileAtlas::from_defs([TileDef {
            name: "stone".into(),
            solid: true,
        }])
        .unwrap();
        BiomeDef::from_config(
            &BiomeConfig {
                name: name.into(),
                ..BiomeConfig::default()
            },
            &atlas,
            &StructureLibrary::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = BiomeRegistry::new();
        let a = registry.register(def("caves")).unwrap();
        let b = registry.register(def("ice")).unwrap();
        assert_eq!(a, BiomeId(0));
        assert_eq!(b, BiomeId(1));
        assert_eq!(registry.lookup_by_name("ice"), Some(b));
        assert_eq!(registry.get(a).map(|d| d.name.as_str()), Some("caves"));
        assert!(registry.get(BiomeId(5)).is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = BiomeRegistry::new();
        registry.register(def("caves")).unwrap();
        let result = registry.register(def("caves"));
        assert!(matches!(result, Err(ConfigurationError::DuplicateBiome(n)) if n == "caves"));
    }
}
