//! Debug visualization of generated worlds: ASCII dumps and RGBA images of
//! tiles and the biome partition, with PNG export.

mod image;
mod renderers;

pub use self::image::DebugImage;
pub use renderers::{biome_color, render_ascii, render_biome_map, render_tiles, tile_color};
