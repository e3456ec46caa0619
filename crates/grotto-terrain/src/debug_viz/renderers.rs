//! Renderers for tiles and the biome partition.

use grotto_tiles::{PlacedTile, TileClass, TileId, TileRect, WorldGrid};

use super::image::DebugImage;
use crate::biome::BiomeId;
use crate::partition::{BiomeCells, CellArea};

const MISSING: (u8, u8, u8) = (0, 0, 0);
const AIR: (u8, u8, u8) = (24, 20, 32);

const BIOME_PALETTE: [(u8, u8, u8); 8] = [
    (130, 110, 90),
    (60, 140, 70),
    (120, 90, 200),
    (200, 170, 60),
    (60, 150, 200),
    (190, 80, 70),
    (200, 200, 210),
    (90, 90, 60),
];

/// Dumps `rect` as text, top row first: `#` solid, `.` air, `*` any other
/// passable tile, space where nothing was generated.
pub fn render_ascii(grid: &WorldGrid, rect: TileRect) -> String {
    let mut out = String::with_capacity(rect.area() + rect.height as usize);
    for y in (rect.y..rect.max_y()).rev() {
        for x in rect.x..rect.max_x() {
            let c = match grid.get((x, y).into()) {
                None => ' ',
                Some(tile) if tile.class.is_solid() => '#',
                Some(tile) if tile.id == TileId::AIR => '.',
                Some(_) => '*',
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}

/// A stable color per tile id. Solid tiles get earthy shades, decorations
/// bright ones.
pub fn tile_color(tile: PlacedTile) -> (u8, u8, u8) {
    if tile.id == TileId::AIR {
        return AIR;
    }
    let h = u32::from(tile.id.0).wrapping_mul(2_654_435_761);
    let jitter = |shift: u32| ((h >> shift) & 0x3f) as u8;
    match tile.class {
        TileClass::Solid => (90 + jitter(0), 80 + jitter(8), 70 + jitter(16)),
        TileClass::Air => (150 + jitter(0), 150 + jitter(8), 100 + jitter(16)),
    }
}

/// Renders `rect` with `pixels_per_tile` square pixels per tile. Image rows
/// run top to bottom, so the highest tile row is drawn first.
pub fn render_tiles(grid: &WorldGrid, rect: TileRect, pixels_per_tile: u32) -> DebugImage {
    let scale = pixels_per_tile.max(1);
    let mut image = DebugImage::new(rect.width * scale, rect.height * scale);
    for coord in rect.iter() {
        let color = grid.get(coord).copied().map_or(MISSING, tile_color);
        let px = (coord.x - rect.x) as u32;
        let py = (rect.max_y() - 1 - coord.y) as u32;
        image.fill_block(px, py, scale, color);
    }
    image
}

/// Palette color for a biome id.
pub fn biome_color(biome: BiomeId) -> (u8, u8, u8) {
    BIOME_PALETTE[biome.0 as usize % BIOME_PALETTE.len()]
}

/// Renders one block per cell of `area`, colored by biome. Cells that were
/// assigned but never generated are drawn at half brightness.
pub fn render_biome_map(cells: &BiomeCells, area: CellArea, pixels_per_cell: u32) -> DebugImage {
    let scale = pixels_per_cell.max(1);
    let mut image = DebugImage::new(area.width * scale, area.height * scale);
    for cell in area.iter() {
        let color = match cells.biome_of(cell) {
            None => MISSING,
            Some(biome) if cells.is_generated(cell) => biome_color(biome),
            Some(biome) => {
                let (r, g, b) = biome_color(biome);
                (r / 2, g / 2, b / 2)
            }
        };
        let px = (cell.x - area.origin.x) as u32;
        let py = area.height - 1 - (cell.y - area.origin.y) as u32;
        image.fill_block(px, py, scale, color);
    }
    image
}
