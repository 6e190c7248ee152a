/// Collision and move resolution — single source of truth.
///
/// ## Architecture
///
/// Two distinct questions:
///   1. COLLISION — would this rectangle overlap anyone or anything?
///   2. RESOLUTION — given a desired move that collides, what move is
///      actually permitted?
///
/// `collides` answers 1 in two phases: a narrow-phase sweep over the
/// spatial-index neighborhood, then a scan of the static obstacle
/// mask. `resolve_move` answers 2 by degrading the proposal step by
/// step: accept as-is, cancel one axis, slide back toward the old
/// position, or revert outright.
///
/// ## Overlap rule
///
/// The actor-vs-actor test measures from whichever rectangle's near
/// edge faces the other: the width compared is `actor.width` when the
/// candidate sits to the right of `actor`, else the candidate's own
/// width (same per axis for heights). Not a symmetric AABB test —
/// with mixed actor sizes the outcome depends on relative position,
/// and the resolver is tuned to exactly this rule.

use std::time::Instant;

use super::actor::Actor;
use super::grid::CellIndex;
use super::mask::ObstacleMask;
use super::stats::TickStats;

// ══════════════════════════════════════════════════════════════
// Collision predicate
// ══════════════════════════════════════════════════════════════

/// Would `actor` collide at its current position? Checks other actors
/// first (spatial-index neighborhood, self excluded by id), then the
/// static mask. Boolean only — callers never learn what was hit.
///
/// Counters (candidates, calls, elapsed) accumulate into `stats`.
pub fn collides(actor: &Actor, index: &CellIndex, mask: &ObstacleMask, stats: &mut TickStats) -> bool {
    let start = Instant::now();

    let candidates = index.neighbors(actor);
    stats.collision_checks += candidates.len() as u64;
    stats.collision_calls += 1;

    let mut hit = candidates.iter().any(|c| {
        if c.id == actor.id {
            return false;
        }
        let near_width = if c.x > actor.x { actor.width } else { c.width };
        let near_height = if c.y > actor.y { actor.height } else { c.height };
        (c.x - actor.x).abs() < near_width && (c.y - actor.y).abs() < near_height
    });

    if !hit {
        hit = mask.opaque_within(actor.x, actor.y, actor.width, actor.height);
    }

    stats.collision_time += start.elapsed();
    hit
}

// ══════════════════════════════════════════════════════════════
// Move resolution
// ══════════════════════════════════════════════════════════════

/// Turn a desired move into a permitted one.
///
///   1. Unchanged proposal (no move attempted) — accept untested.
///   2. Collision-free proposal — accept.
///   3. Axis cancel: freeze x to the old value, then y, accepting the
///      first collision-free single-axis variant. Each variant is
///      only tried if that axis actually moved.
///   4. With `slide`: step the proposal back toward the old position
///      one unit per axis at a time, both axes together, each clamped
///      into world bounds. First collision-free candidate wins.
///   5. Revert: the old position with `has_collision` set. Not an
///      error — callers consume the flag as ordinary data.
///
/// Termination is bounded: at most `2 + speed` collision tests beyond
/// the initial one.
pub fn resolve_move(
    current: &Actor,
    proposed: Actor,
    slide: bool,
    world_w: i32,
    world_h: i32,
    index: &CellIndex,
    mask: &ObstacleMask,
    stats: &mut TickStats,
) -> Actor {
    if proposed == *current {
        return proposed;
    }

    if !collides(&proposed, index, mask, stats) {
        return proposed;
    }

    if proposed.x != current.x {
        let mut frozen_x = proposed.clone();
        frozen_x.x = current.x;
        if !collides(&frozen_x, index, mask, stats) {
            return frozen_x;
        }
    }
    if proposed.y != current.y {
        let mut frozen_y = proposed.clone();
        frozen_y.y = current.y;
        if !collides(&frozen_y, index, mask, stats) {
            return frozen_y;
        }
    }

    if slide {
        let sign_x = (current.x - proposed.x).signum();
        let sign_y = (current.y - proposed.y).signum();
        for step in 0..proposed.speed {
            let mut candidate = proposed.clone();
            candidate.x = (proposed.x + step * sign_x).clamp(0, world_w - proposed.width);
            candidate.y = (proposed.y + step * sign_y).clamp(0, world_h - proposed.height);
            if !collides(&candidate, index, mask, stats) {
                return candidate;
            }
        }
    }

    let mut blocked = current.clone();
    blocked.has_collision = true;
    blocked
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
