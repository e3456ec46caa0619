//! Fixed tile layouts stamped into regions.

use grotto_config::StructureConfig;
use grotto_tiles::{PlacedTile, TileAtlas};
use hashbrown::HashMap;

use crate::error::ConfigurationError;

/// A named rectangle of tiles. `None` cells leave the world untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructureGrid {
    name: String,
    width: u32,
    height: u32,
    /// Row-major, top row first.
    cells: Vec<Option<PlacedTile>>,
}

impl StructureGrid {
    /// Builds a grid from rows listed top to bottom. Short rows are padded
    /// with `None`.
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Option<PlacedTile>>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            let pad = width - row.len();
            cells.extend(row);
            cells.extend(std::iter::repeat_n(None, pad));
        }
        Self {
            name: name.into(),
            width: width as u32,
            height: height as u32,
            cells,
        }
    }

    /// Resolves tile names through `atlas`.
    ///
    /// # Errors
    ///
    /// Fails on an unknown tile name or a grid with no cells.
    pub fn from_config(
        config: &StructureConfig,
        atlas: &TileAtlas,
    ) -> Result<Self, ConfigurationError> {
        let mut rows = Vec::with_capacity(config.rows.len());
        for row in &config.rows {
            let mut resolved = Vec::with_capacity(row.len());
            for cell in row {
                let tile = match cell {
                    None => None,
                    Some(name) => {
                        let id = atlas
                            .lookup_by_name(name)
                            .ok_or_else(|| ConfigurationError::UnknownTile(name.clone()))?;
                        Some(atlas.placed(id))
                    }
                };
                resolved.push(tile);
            }
            rows.push(resolved);
        }
        let grid = Self::new(config.name.clone(), rows);
        if grid.width == 0 || grid.height == 0 {
            return Err(ConfigurationError::EmptyStructure(config.name.clone()));
        }
        Ok(grid)
    }

    /// Structure name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width in tiles.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tile at column `col` of row `row` (row 0 is the top).
    pub fn get(&self, col: u32, row: u32) -> Option<PlacedTile> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells[(row * self.width + col) as usize]
    }
}

/// Provides structure layouts by name.
pub trait StructureSource: Send + Sync {
    /// The structure called `name`.
    fn structure(&self, name: &str) -> Option<&StructureGrid>;
}

/// In-memory structure set.
#[derive(Clone, Debug, Default)]
pub struct StructureLibrary {
    by_name: HashMap<String, StructureGrid>,
}

impl StructureLibrary {
    /// An empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves every config entry. Later entries replace earlier ones with
    /// the same name.
    pub fn from_configs(
        configs: &[StructureConfig],
        atlas: &TileAtlas,
    ) -> Result<Self, ConfigurationError> {
        let mut library = Self::new();
        for config in configs {
            library.insert(StructureGrid::from_config(config, atlas)?);
        }
        Ok(library)
    }

    /// Adds or replaces a structure.
    pub fn insert(&mut self, grid: StructureGrid) {
        self.by_name.insert(grid.name.clone(), grid);
    }

    /// Number of structures.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if the library is empty.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl StructureSource for StructureLibrary {
    fn structure(&self, name: &str) -> Option<&StructureGrid> {
        self.by_name.get(name)
    }
}
