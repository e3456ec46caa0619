//! Integer tile-space coordinates, rectangles and cell addressing.

use serde::{Deserialize, Serialize};

/// A tile position. `+y` points up.
///
/// The derived ordering is lexicographic `(x, y)` and is used as the fixed
/// tie-break wherever two candidates are equally good.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TileCoord {
    /// Horizontal tile index.
    pub x: i32,
    /// Vertical tile index.
    pub y: i32,
}

impl TileCoord {
    /// Creates a coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this coordinate shifted by `(dx, dy)`.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Squared Euclidean distance. Computed in 128 bits: a single axis delta
    /// squared already reaches `2^64` at the extremes of `i32`.
    #[inline]
    pub fn distance_squared(self, other: Self) -> i128 {
        let dx = i128::from(self.x) - i128::from(other.x);
        let dy = i128::from(self.y) - i128::from(other.y);
        dx * dx + dy * dy
    }

    /// The four orthogonal neighbours in up, down, left, right order.
    #[inline]
    pub fn orthogonal_neighbors(self) -> [Self; 4] {
        [
            self.offset(0, 1),
            self.offset(0, -1),
            self.offset(-1, 0),
            self.offset(1, 0),
        ]
    }
}

impl From<(i32, i32)> for TileCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Address of one cell of the biome partition grid.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    /// Cell column.
    pub x: i32,
    /// Cell row.
    pub y: i32,
}

impl CellCoord {
    /// Creates a cell address.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell in `direction`, `None` past the edge of `i32`.
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.offset();
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// The eight surrounding cells, column by column from the bottom-left.
    /// Cells past the edge of `i32` are skipped.
    pub fn moore_neighbors(self) -> impl Iterator<Item = CellCoord> {
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dy| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .filter_map(move |(dx, dy)| {
                Some(CellCoord::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
            })
    }
}

/// One of the four orthogonal directions between partition cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Towards `-x`.
    Left,
    /// Towards `+x`.
    Right,
    /// Towards `+y`.
    Up,
    /// Towards `-y`.
    Down,
}

impl Direction {
    /// All directions in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit offset `(dx, dy)` of this direction.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
        }
    }

    /// The direction pointing back.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// An axis-aligned rectangle of tiles, `[x, x + width) × [y, y + height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Bottom edge (inclusive).
    pub y: i32,
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
}

impl TileRect {
    /// Creates a rectangle.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle covered by `cell` when every cell is `width × height` tiles.
    ///
    /// `None` when the rectangle does not fit in `i32` tile space, edges
    /// included.
    pub fn for_cell(cell: CellCoord, width: u32, height: u32) -> Option<Self> {
        let w = i32::try_from(width).ok()?;
        let h = i32::try_from(height).ok()?;
        let x = cell.x.checked_mul(w)?;
        let y = cell.y.checked_mul(h)?;
        x.checked_add(w)?;
        y.checked_add(h)?;
        Some(Self::new(x, y, width, height))
    }

    /// Exclusive right edge.
    #[inline]
    pub fn max_x(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Exclusive top edge.
    #[inline]
    pub fn max_y(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Number of tiles covered.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if the rectangle covers no tiles.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if `coord` lies inside the rectangle.
    #[inline]
    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.x >= self.x && coord.x < self.max_x() && coord.y >= self.y && coord.y < self.max_y()
    }

    /// Iterates every coordinate in row-major order (`y` outer, `x` inner).
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + use<> {
        let (x0, x1, y0, y1) = (self.x, self.max_x(), self.y, self.max_y());
        (y0..y1).flat_map(move |y| (x0..x1).map(move |x| TileCoord::new(x, y)))
    }

    /// The strip of at most `depth` tiles of this rectangle that touches its
    /// side facing `direction`.
    pub fn edge_strip(&self, direction: Direction, depth: u32) -> TileRect {
        match direction {
            Direction::Left => {
                TileRect::new(self.x, self.y, depth.min(self.width), self.height)
            }
            Direction::Right => {
                let d = depth.min(self.width);
                TileRect::new(self.max_x() - d as i32, self.y, d, self.height)
            }
            Direction::Down => {
                TileRect::new(self.x, self.y, self.width, depth.min(self.height))
            }
            Direction::Up => {
                let d = depth.min(self.height);
                TileRect::new(self.x, self.max_y() - d as i32, self.width, d)
            }
        }
    }

    /// The row or column of this rectangle lying on its side facing `direction`,
    /// listed in ascending order along the border.
    pub fn border_line(&self, direction: Direction) -> Vec<TileCoord> {
        let strip = self.edge_strip(direction, 1);
        strip.iter().collect()
    }
}
