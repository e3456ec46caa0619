//! Tile storage shared by every generation stage: coordinates, the sparse tile grid,
//! the tile atlas and batched change events for downstream consumers.

pub mod atlas;
pub mod coord;
pub mod events;
pub mod grid;
pub mod tile;

pub use atlas::{TileAtlas, TileAtlasError, TileDef};
pub use coord::{CellCoord, Direction, TileCoord, TileRect};
pub use events::{TileEvent, TileEventBuffer, commit_tiles};
pub use grid::{TileGrid, WorldGrid};
pub use tile::{Classified, PlacedTile, TileClass, TileId};
