//! Room connectivity: nearest edge pairs, passages and tunnel carving.
//!
//! Pair distances are computed on worker threads; every decision that depends
//! on the connection graph is made sequentially afterwards so the result does
//! not depend on thread scheduling.

use crossbeam_channel::unbounded;
use grotto_config::RadiusRange;
use grotto_tiles::{TileClass, TileCoord, TileGrid};
use rand::Rng;

use crate::room::{ConnectionGraph, MAIN_ROOM, Room, RoomId};
use crate::seed::stream_rng;

/// A tunnel to carve between two open tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Passage {
    /// Start tile.
    pub from: TileCoord,
    /// End tile.
    pub to: TileCoord,
}

/// Closest edge pair from one room to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PairCandidate {
    other: RoomId,
    distance: i128,
    from: TileCoord,
    to: TileCoord,
}

impl PairCandidate {
    fn key(&self) -> (i128, TileCoord, TileCoord, RoomId) {
        (self.distance, self.from, self.to, self.other)
    }
}

/// Tiles of a straight line from `from` to `to`, both ends included.
///
/// The dominant axis advances every step; the other axis advances when an
/// error accumulator that starts at half the long span reaches the long span.
pub fn line(from: TileCoord, to: TileCoord) -> Vec<TileCoord> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;

    let mut inverted = false;
    let mut step = dx.signum();
    let mut gradient_step = dy.signum();
    let mut longest = dx.abs();
    let mut shortest = dy.abs();

    if longest < shortest {
        inverted = true;
        std::mem::swap(&mut longest, &mut shortest);
        step = dy.signum();
        gradient_step = dx.signum();
    }

    let mut points = Vec::with_capacity(longest as usize + 1);
    let (mut x, mut y) = (from.x, from.y);
    let mut accumulator = longest / 2;
    for _ in 0..longest {
        points.push(TileCoord::new(x, y));
        if inverted {
            y += step;
        } else {
            x += step;
        }
        accumulator += shortest;
        if accumulator >= longest {
            if inverted {
                x += gradient_step;
            } else {
                y += gradient_step;
            }
            accumulator -= longest;
        }
    }
    points.push(TileCoord::new(x, y));
    points
}

/// Every tile with `dx² + dy² <= radius²` around `center`, row-major.
pub fn disc(center: TileCoord, radius: u32) -> impl Iterator<Item = TileCoord> {
    let r = radius as i32;
    let r2 = r * r;
    (-r..=r).flat_map(move |dy| {
        (-r..=r)
            .filter(move |dx| dx * dx + dy * dy <= r2)
            .map(move |dx| center.offset(dx, dy))
    })
}

/// Opens a tunnel from `from` to `to` by writing `fill` in a disc of `radius`
/// around every line point. Coordinates missing from `grid` are left alone.
/// Returns the number of writes.
pub fn carve_tunnel<T: Copy>(
    grid: &mut TileGrid<T>,
    from: TileCoord,
    to: TileCoord,
    radius: u32,
    fill: T,
) -> usize {
    let mut written = 0;
    for point in line(from, to) {
        for c in disc(point, radius) {
            if grid.replace_existing(c, fill) {
                written += 1;
            }
        }
    }
    written
}

fn nearest_edge_pair(a: &Room, b: &Room) -> Option<(i128, TileCoord, TileCoord)> {
    let mut best: Option<(i128, TileCoord, TileCoord)> = None;
    for &ta in a.edge_tiles() {
        for &tb in b.edge_tiles() {
            let candidate = (ta.distance_squared(tb), ta, tb);
            if best.is_none_or(|current| candidate < current) {
                best = Some(candidate);
            }
        }
    }
    best
}

fn worker_count(items: usize) -> usize {
    num_cpus::get().max(1).min(items.max(1))
}

/// Links the rooms of one region into passages.
///
/// Room 0 is the main room; rooms are expected sorted by size.
pub struct RoomConnector<'a> {
    rooms: &'a [Room],
    minima: Vec<Vec<PairCandidate>>,
}

impl<'a> RoomConnector<'a> {
    /// Computes the closest edge pair for every ordered pair of rooms.
    pub fn new(rooms: &'a [Room]) -> Self {
        let n = rooms.len();
        let workers = worker_count(n);
        let (tx, rx) = unbounded();

        std::thread::scope(|s| {
            for worker in 0..workers {
                let tx = tx.clone();
                s.spawn(move || {
                    for a in (worker..n).step_by(workers) {
                        let candidates: Vec<PairCandidate> = rooms
                            .iter()
                            .enumerate()
                            .filter(|&(b, _)| b != a)
                            .filter_map(|(b, room_b)| {
                                nearest_edge_pair(&rooms[a], room_b).map(|(distance, from, to)| {
                                    PairCandidate {
                                        other: RoomId(b),
                                        distance,
                                        from,
                                        to,
                                    }
                                })
                            })
                            .collect();
                        if tx.send((a, candidates)).is_err() {
                            return;
                        }
                    }
                });
            }
        });
        drop(tx);

        let mut minima = vec![Vec::new(); n];
        for (a, candidates) in rx.iter() {
            minima[a] = candidates;
        }
        Self { rooms, minima }
    }

    /// Connects every room to its closest room it is not yet connected to.
    pub fn connect_nearest_pairs(&self, graph: &mut ConnectionGraph<RoomId>) -> Vec<Passage> {
        let mut passages = Vec::new();
        for (a, candidates) in self.minima.iter().enumerate() {
            let room_a = RoomId(a);
            let best = candidates
                .iter()
                .filter(|c| !graph.is_connected(room_a, c.other))
                .min_by_key(|c| c.key());
            if let Some(best) = best {
                graph.connect(room_a, best.other);
                tracing::trace!(from = ?best.from, to = ?best.to, "nearest-room passage");
                passages.push(Passage {
                    from: best.from,
                    to: best.to,
                });
            }
        }
        passages
    }

    /// Connects every room the main room cannot reach to the closest room it can.
    pub fn connect_to_main_room(&self, graph: &mut ConnectionGraph<RoomId>) -> Vec<Passage> {
        let mut passages = Vec::new();
        if self.rooms.is_empty() {
            return passages;
        }
        for (a, candidates) in self.minima.iter().enumerate() {
            let reachable = graph.all_connected(MAIN_ROOM);
            let room_a = RoomId(a);
            if reachable.contains(&room_a) {
                continue;
            }
            let best = candidates
                .iter()
                .filter(|c| reachable.contains(&c.other))
                .min_by_key(|c| c.key());
            match best {
                Some(best) => {
                    graph.connect(room_a, best.other);
                    tracing::trace!(from = ?best.from, to = ?best.to, "main-room passage");
                    passages.push(Passage {
                        from: best.from,
                        to: best.to,
                    });
                }
                None => tracing::debug!(room = a, "room has no edge towards the main room"),
            }
        }
        passages
    }
}

/// Carves `passages` into `grid` as air.
///
/// Each passage is a work item with its own random stream
/// `(seed, "carve", index)` that draws a radius in `radius` per line point.
/// Workers only compute coordinates; writes happen afterwards in item order.
/// Returns the number of tiles written.
pub fn carve_passages(
    grid: &mut TileGrid<TileClass>,
    passages: &[Passage],
    radius: RadiusRange,
    seed: u64,
) -> usize {
    let n = passages.len();
    if n == 0 {
        return 0;
    }
    let workers = worker_count(n);
    let (tx, rx) = unbounded();

    {
        let view: &TileGrid<TileClass> = grid;
        std::thread::scope(|s| {
            for worker in 0..workers {
                let tx = tx.clone();
                s.spawn(move || {
                    for index in (worker..n).step_by(workers) {
                        let passage = passages[index];
                        let mut rng = stream_rng(seed, "carve", index);
                        let mut coords = Vec::new();
                        for point in line(passage.from, passage.to) {
                            let r = rng.random_range(radius.min..=radius.max);
                            coords.extend(disc(point, r).filter(|&c| view.contains(c)));
                        }
                        if tx.send((index, coords)).is_err() {
                            return;
                        }
                    }
                });
            }
        });
    }
    drop(tx);

    let mut results: Vec<Vec<TileCoord>> = vec![Vec::new(); n];
    for (index, coords) in rx.iter() {
        results[index] = coords;
    }

    let mut written = 0;
    for coords in results {
        for c in coords {
            if grid.class_at(c) != Some(TileClass::Air) {
                written += 1;
            }
            grid.replace_existing(c, TileClass::Air);
        }
    }
    written
}
