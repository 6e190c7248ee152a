/// Spatial index: actor occupancy bucketed by 10×10 world-unit cell.
///
/// Mutated in place every tick rather than rebuilt, so the per-tick
/// cost is proportional to the number of moving actors, not total
/// occupancy. That trade-off requires a single writer: the tick
/// orchestrator owns the index exclusively and nothing else holds a
/// reference to it across ticks.

use std::collections::HashMap;
use std::time::Instant;

use super::actor::{Actor, ActorId};
use super::stats::TickStats;

/// Cell edge length in world units. Nothing larger than one cell per
/// axis step is assumed by the 3×3 neighborhood query.
pub const CELL: i32 = 10;

/// Key for the cell containing `(x, y)`, shifted by `(ox, oy)` cells.
/// Negative cells clamp to 0.
///
/// The two cell coordinates are packed as `10000 * kx + ky`, so keys
/// alias once the quantized x coordinate reaches 10000 (a 100k-pixel
/// world). Accepted for the world sizes this engine targets.
pub fn cell_key(x: i32, y: i32, ox: i32, oy: i32) -> u32 {
    let kx = (x.div_euclid(CELL) + ox).max(0) as u32;
    let ky = (y.div_euclid(CELL) + oy).max(0) as u32;
    10_000 * kx + ky
}

/// What the index stores per actor: the identity plus the rectangle,
/// everything the narrow phase needs.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Occupant {
    pub id: ActorId,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl From<&Actor> for Occupant {
    fn from(a: &Actor) -> Self {
        Occupant { id: a.id, x: a.x, y: a.y, width: a.width, height: a.height }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CellIndex {
    buckets: HashMap<u32, Vec<Occupant>>,
}

impl CellIndex {
    pub fn new() -> Self {
        CellIndex { buckets: HashMap::new() }
    }

    /// Re-register an actor after a move: drop it from the previous
    /// position's bucket (matched by id), then append at the new one.
    /// Passing a `previous` that was never registered is a no-op
    /// removal — first registration takes this path.
    pub fn update(&mut self, actor: &Actor, previous: Option<&Actor>, stats: &mut TickStats) {
        let start = Instant::now();

        if let Some(prev) = previous {
            let old_key = cell_key(prev.x, prev.y, 0, 0);
            if let Some(bucket) = self.buckets.get_mut(&old_key) {
                bucket.retain(|o| o.id != prev.id);
            }
        }

        self.buckets
            .entry(cell_key(actor.x, actor.y, 0, 0))
            .or_default()
            .push(Occupant::from(actor));

        stats.index_time += start.elapsed();
    }

    /// All occupants registered in the 3×3 cell neighborhood around
    /// the actor's cell. A candidate set for the narrow phase, not a
    /// final answer: the caller still has to test overlap, and the
    /// actor itself is included if registered.
    pub fn neighbors(&self, actor: &Actor) -> Vec<Occupant> {
        let mut keys = [0u32; 9];
        let mut n = 0;
        for oy in -1..=1 {
            for ox in -1..=1 {
                let key = cell_key(actor.x, actor.y, ox, oy);
                // Clamping at the world edge makes offsets collide;
                // keep each key once.
                if !keys[..n].contains(&key) {
                    keys[n] = key;
                    n += 1;
                }
            }
        }

        let mut out = Vec::new();
        for key in &keys[..n] {
            if let Some(bucket) = self.buckets.get(key) {
                out.extend_from_slice(bucket);
            }
        }
        out
    }

    /// How many buckets currently hold this id. The index invariant is
    /// that this is at most 1 for any registered actor.
    #[allow(dead_code)]
    pub fn occurrences(&self, id: ActorId) -> usize {
        self.buckets
            .values()
            .map(|b| b.iter().filter(|o| o.id == id).count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actor::ActorKind;

    fn actor(id: u32, x: i32, y: i32) -> Actor {
        Actor::new(ActorId(id), ActorKind::Drifter, x, y, 20, 20, 5)
    }

    #[test]
    fn key_packs_cell_coordinates() {
        assert_eq!(cell_key(0, 0, 0, 0), 0);
        assert_eq!(cell_key(105, 42, 0, 0), 10_000 * 10 + 4);
        assert_eq!(cell_key(105, 42, 1, -1), 10_000 * 11 + 3);
    }

    #[test]
    fn key_clamps_negative_cells_to_zero() {
        assert_eq!(cell_key(3, 3, -1, -1), 0);
        assert_eq!(cell_key(-25, 5, 0, 0), 0);
    }

    #[test]
    fn update_moves_between_buckets() {
        let mut index = CellIndex::new();
        let mut stats = TickStats::default();

        let before = actor(1, 12, 12);
        index.update(&before, None, &mut stats);
        assert_eq!(index.occurrences(ActorId(1)), 1);

        let mut after = before.clone();
        after.x = 55;
        index.update(&after, Some(&before), &mut stats);

        // Exactly one bucket holds the actor, and it is the new one.
        assert_eq!(index.occurrences(ActorId(1)), 1);
        let found = index.neighbors(&after);
        assert!(found.iter().any(|o| o.id == ActorId(1) && o.x == 55));
    }

    #[test]
    fn first_registration_tolerates_unknown_previous() {
        let mut index = CellIndex::new();
        let mut stats = TickStats::default();

        let a = actor(1, 40, 40);
        // Previous never registered: removal is a no-op.
        index.update(&a, Some(&a), &mut stats);
        assert_eq!(index.occurrences(ActorId(1)), 1);
    }

    #[test]
    fn same_cell_neighbors_returns_both() {
        let mut index = CellIndex::new();
        let mut stats = TickStats::default();

        // Both quantize to cell (10, 1): key 10000*10 + 1.
        let a = actor(1, 102, 15);
        let b = actor(2, 108, 11);
        index.update(&a, None, &mut stats);
        index.update(&b, None, &mut stats);

        for probe in [&a, &b] {
            let found = index.neighbors(probe);
            assert!(found.iter().any(|o| o.id == ActorId(1)));
            assert!(found.iter().any(|o| o.id == ActorId(2)));
        }
    }

    #[test]
    fn neighbors_spans_adjacent_cells_only() {
        let mut index = CellIndex::new();
        let mut stats = TickStats::default();

        index.update(&actor(1, 100, 100), None, &mut stats);
        index.update(&actor(2, 95, 105), None, &mut stats); // adjacent cell
        index.update(&actor(3, 300, 300), None, &mut stats); // far away

        let found = index.neighbors(&actor(9, 101, 101));
        let ids: Vec<u32> = found.iter().map(|o| o.id.0).collect();
        assert!(ids.contains(&1));
        assert!(ids.contains(&2));
        assert!(!ids.contains(&3));
    }

    #[test]
    fn edge_clamp_does_not_duplicate_candidates() {
        let mut index = CellIndex::new();
        let mut stats = TickStats::default();

        let corner = actor(1, 0, 0);
        index.update(&corner, None, &mut stats);

        // At the origin, several of the 9 offsets clamp to the same
        // key; the occupant must still appear exactly once.
        let found = index.neighbors(&corner);
        assert_eq!(found.iter().filter(|o| o.id == ActorId(1)).count(), 1);
    }
}
