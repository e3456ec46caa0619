//! Rooms found inside a region and the connection graph shared with cells.

use std::collections::VecDeque;
use std::hash::Hash;

use grotto_tiles::{Classified, TileCoord, TileGrid};
use hashbrown::{HashMap, HashSet};

/// Index of a room in the size-sorted room list of one region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(pub usize);

/// The largest room of a region.
pub const MAIN_ROOM: RoomId = RoomId(0);

/// A 4-connected set of open tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    tiles: Vec<TileCoord>,
    edge_tiles: Vec<TileCoord>,
}

impl Room {
    /// Builds a room from its member tiles. Members with a solid or missing
    /// orthogonal neighbour in `grid` become edge tiles.
    pub fn new<T: Classified>(tiles: Vec<TileCoord>, grid: &TileGrid<T>) -> Self {
        let mut edge_tiles: Vec<TileCoord> = tiles
            .iter()
            .copied()
            .filter(|&t| grid.touches_solid(t))
            .collect();
        edge_tiles.sort_unstable();
        Self { tiles, edge_tiles }
    }

    /// Member tiles in discovery order.
    pub fn tiles(&self) -> &[TileCoord] {
        &self.tiles
    }

    /// Members bordering solid ground, sorted.
    pub fn edge_tiles(&self) -> &[TileCoord] {
        &self.edge_tiles
    }

    /// Number of member tiles.
    pub fn size(&self) -> usize {
        self.tiles.len()
    }
}

/// Symmetric adjacency between keys. Registering an edge twice is a no-op.
#[derive(Clone, Debug)]
pub struct ConnectionGraph<K> {
    edges: HashMap<K, HashSet<K>>,
}

impl<K: Copy + Eq + Hash + Ord> ConnectionGraph<K> {
    /// An empty graph.
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
        }
    }

    /// Connects `a` and `b` both ways. Returns `false` if they already were
    /// connected or `a == b`.
    pub fn connect(&mut self, a: K, b: K) -> bool {
        if a == b {
            return false;
        }
        let added = self.edges.entry(a).or_default().insert(b);
        self.edges.entry(b).or_default().insert(a);
        added
    }

    /// Returns `true` if `a` and `b` share an edge.
    pub fn is_connected(&self, a: K, b: K) -> bool {
        self.edges.get(&a).is_some_and(|set| set.contains(&b))
    }

    /// Direct neighbours of `key`, sorted.
    pub fn neighbors(&self, key: K) -> Vec<K> {
        let mut out: Vec<K> = self
            .edges
            .get(&key)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        out.sort_unstable();
        out
    }

    /// Every key reachable from `start`, `start` included.
    pub fn all_connected(&self, start: K) -> HashSet<K> {
        let mut seen = HashSet::new();
        seen.insert(start);
        let mut queue = VecDeque::from([start]);
        while let Some(key) = queue.pop_front() {
            if let Some(next) = self.edges.get(&key) {
                for &n in next {
                    if seen.insert(n) {
                        queue.push_back(n);
                    }
                }
            }
        }
        seen
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|set| set.len()).sum::<usize>() / 2
    }

    /// Removes every edge.
    pub fn clear(&mut self) {
        self.edges.clear();
    }
}

impl<K: Copy + Eq + Hash + Ord> Default for ConnectionGraph<K> {
    fn default() -> Self {
        Self::new()
    }
}
