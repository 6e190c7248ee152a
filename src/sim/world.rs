/// WorldState: the complete snapshot of a running simulation.
///
/// ## Ownership
///
/// The world owns the spatial index, the obstacle mask, the rng and
/// the instrumentation counters. The index is mutated in place by the
/// tick orchestrator and by nothing else; the mask never changes
/// after load. Actors are replaced wholesale each tick — the index
/// entry is their only persistent handle.
///
/// ## Camera / Viewport
///
/// World coordinates are pixels; the terminal shows one character per
/// 10×10-pixel block (the same quantum as the spatial index cell).
/// The camera tracks the player with a dead-zone approach and is
/// expressed in block units:
///   - `(x, y)` — world block of the top-left visible character
///   - renderer maps `screen(sx, sy) = block(camera.x + sx, camera.y + sy)`
///   - maps smaller than the viewport are centered

use rand::rngs::SmallRng;

use crate::domain::actor::Actor;
use crate::domain::grid::CellIndex;
use crate::domain::mask::ObstacleMask;
use crate::domain::stats::TickStats;

/// Camera: a viewport into the world, in block units.
///
/// `(view_w, view_h)` are how many blocks fit on screen; they are
/// computed from the terminal size during `render()`.
#[derive(Clone, Debug)]
pub struct Camera {
    /// World block of the top-left visible cell (can be negative for
    /// centering).
    pub x: i32,
    /// World block of the top-left visible cell.
    pub y: i32,
    /// Number of world blocks visible horizontally.
    pub view_w: i32,
    /// Number of world blocks visible vertically.
    pub view_h: i32,
}

impl Camera {
    pub fn new() -> Self {
        Camera { x: 0, y: 0, view_w: 0, view_h: 0 }
    }

    /// Follow a target block within the given world size (in blocks).
    /// Dead-zone approach: only scroll when the target nears the edge
    /// of the viewport, so small movements don't jerk the screen.
    pub fn follow(&mut self, target_x: i32, target_y: i32, world_w: i32, world_h: i32) {
        if self.view_w == 0 || self.view_h == 0 {
            return;
        }

        if world_w <= self.view_w {
            self.x = -((self.view_w - world_w) / 2);
        } else {
            let margin_x = self.view_w / 5; // 20% margin each side
            let left_bound = self.x + margin_x;
            let right_bound = self.x + self.view_w - margin_x - 1;

            if target_x < left_bound {
                self.x = target_x - margin_x;
            } else if target_x > right_bound {
                self.x = target_x - self.view_w + margin_x + 1;
            }

            self.x = self.x.max(0).min((world_w - self.view_w).max(0));
        }

        if world_h <= self.view_h {
            self.y = -((self.view_h - world_h) / 2);
        } else {
            let margin_y = self.view_h / 5;
            let top_bound = self.y + margin_y;
            let bottom_bound = self.y + self.view_h - margin_y - 1;

            if target_y < top_bound {
                self.y = target_y - margin_y;
            } else if target_y > bottom_bound {
                self.y = target_y - self.view_h + margin_y + 1;
            }

            self.y = self.y.max(0).min((world_h - self.view_h).max(0));
        }
    }

    /// World block → viewport coordinate, or None if off-screen.
    pub fn world_to_view(&self, wx: i32, wy: i32) -> Option<(u16, u16)> {
        let vx = wx - self.x;
        let vy = wy - self.y;
        if vx >= 0 && vx < self.view_w && vy >= 0 && vy < self.view_h {
            Some((vx as u16, vy as u16))
        } else {
            None
        }
    }
}

pub struct WorldState {
    // ── Geometry ──
    /// World width in pixels.
    pub width: i32,
    /// World height in pixels.
    pub height: i32,

    // ── Actors ──
    pub player: Actor,
    /// Fixed iteration order; position in this vec never changes.
    pub npcs: Vec<Actor>,

    // ── Static obstacles ──
    pub mask: ObstacleMask,

    // ── Occupancy ──
    /// Exclusively owned here, mutated in place by the orchestrator.
    pub index: CellIndex,

    // ── Instrumentation ──
    pub stats: TickStats,

    // ── Randomness ──
    pub rng: SmallRng,

    // ── Meta ──
    pub tick: u64,

    // ── Camera / Viewport ──
    pub camera: Camera,
}

impl WorldState {
    pub fn new(width: i32, height: i32, player: Actor, npcs: Vec<Actor>, mask: ObstacleMask, rng: SmallRng) -> Self {
        WorldState {
            width,
            height,
            player,
            npcs,
            mask,
            index: CellIndex::new(),
            stats: TickStats::default(),
            rng,
            tick: 0,
            camera: Camera::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(view_w: i32, view_h: i32) -> Camera {
        let mut c = Camera::new();
        c.view_w = view_w;
        c.view_h = view_h;
        c
    }

    #[test]
    fn small_world_is_centered() {
        let mut c = camera(80, 24);
        c.follow(10, 10, 40, 12);
        assert_eq!(c.x, -20);
        assert_eq!(c.y, -6);
    }

    #[test]
    fn dead_zone_holds_until_margin() {
        let mut c = camera(40, 20);
        // Target well inside the dead zone: no scroll.
        c.follow(15, 10, 200, 100);
        assert_eq!((c.x, c.y), (0, 0));
        // Target past the right margin: scroll right.
        c.follow(35, 10, 200, 100);
        assert!(c.x > 0);
    }

    #[test]
    fn camera_clamps_to_world() {
        let mut c = camera(40, 20);
        c.follow(199, 99, 200, 100);
        assert_eq!(c.x, 200 - 40);
        assert_eq!(c.y, 100 - 20);
    }

    #[test]
    fn world_to_view_rejects_offscreen() {
        let mut c = camera(40, 20);
        c.x = 10;
        c.y = 5;
        assert_eq!(c.world_to_view(10, 5), Some((0, 0)));
        assert_eq!(c.world_to_view(49, 24), Some((39, 19)));
        assert_eq!(c.world_to_view(50, 5), None);
        assert_eq!(c.world_to_view(9, 5), None);
    }
}
