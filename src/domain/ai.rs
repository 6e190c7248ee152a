/// Decision layer — desired moves for every actor kind.
///
/// Two producers:
///   1. **Player intent** — pure function of the held-key snapshot.
///   2. **NPC intent** — destination-driven wandering with two
///      overlays: chase (all destinations become the player while the
///      attack flag is up) and patrol (a rectangle the actor is pushed
///      back into, boundary hits counting as collisions).
///
/// Neither producer consults the collision state of the world; they
/// only say where an actor WANTS to go. The resolver decides what is
/// permitted.

use rand::rngs::SmallRng;
use rand::Rng;

use super::actor::{Actor, ActorKind, Facing, Point, TickInput};

// ══════════════════════════════════════════════════════════════
// Player intent
// ══════════════════════════════════════════════════════════════

/// Desired player move for this tick's input snapshot. Opposing keys
/// cancel; each axis steps by `speed` and clamps into world bounds.
/// With no directional key held, the player is returned unchanged.
pub fn player_intent(player: &Actor, world_w: i32, world_h: i32, input: &TickInput) -> Actor {
    let mut next = player.clone();
    let mut dx = 0;
    let mut dy = 0;

    if input.up && !input.down {
        next.y = (next.y - next.speed).max(0);
        dy = -1;
    }
    if input.down && !input.up {
        next.y = (next.y + next.speed).min(world_h - next.height);
        dy = 1;
    }
    if input.left && !input.right {
        next.x = (next.x - next.speed).max(0);
        dx = -1;
    }
    if input.right && !input.left {
        next.x = (next.x + next.speed).min(world_w - next.width);
        dx = 1;
    }

    next.facing = Facing::from_delta(dx, dy, next.facing);
    next
}

// ══════════════════════════════════════════════════════════════
// NPC intent
// ══════════════════════════════════════════════════════════════

/// Desired NPC move for this tick.
///
/// Order of business:
///   - spawn ramp: a fresh spawn runs at `width + 1` per tick (enough
///     to clear anything it spawned inside within one move) until its
///     first collision-free move, then drops to its nominal speed;
///   - destination refresh when there is none, the actor is within
///     `width` of it, or last tick ended in a collision;
///   - per-axis step of `sign(delta) * min(|delta|, speed)` measured
///     from the actor's center, clamped into world bounds;
///   - patrol actors outside their rectangle (chase mode excepted)
///     have the step inverted and the collision flag raised instead.
pub fn npc_intent(
    npc: &Actor,
    world_w: i32,
    world_h: i32,
    player: &Actor,
    attack: bool,
    rng: &mut SmallRng,
) -> Actor {
    let mut next = npc.clone();

    if next.is_new && next.fallback_speed.is_none() {
        next.fallback_speed = Some(next.speed);
        next.speed = next.width + 1;
    } else if next.is_new && !next.has_collision {
        if let Some(nominal) = next.fallback_speed {
            next.speed = nominal;
        }
        next.is_new = false;
    }

    let needs_destination = match next.destination {
        None => true,
        Some(dest) => distance(next.x, next.y, dest.x, dest.y) < next.width as f64 || next.has_collision,
    };
    if needs_destination {
        next.destination = Some(new_destination(world_w, world_h, player, attack, rng));
    }

    let dest = match next.destination {
        Some(d) => d,
        None => return next,
    };

    let (cx, cy) = next.center();
    let xdist = (cx - dest.x).abs();
    let xmove = (dest.x - cx).signum() * xdist.min(next.speed);
    let ydist = (cy - dest.y).abs();
    let ymove = (dest.y - cy).signum() * ydist.min(next.speed);

    if xmove != 0 || ymove != 0 {
        next.facing = Facing::from_delta(xmove, ymove, next.facing);

        if outside_patrol_bounds(&next, world_w, world_h, attack) {
            // Boundary hit: same treatment as a collision — step back
            // along the inverse of the intended delta and flag it.
            next.x = (next.x - xmove).clamp(0, world_w - next.width);
            next.y = (next.y - ymove).clamp(0, world_h - next.height);
            next.has_collision = true;
        } else {
            next.x = (next.x + xmove).clamp(0, world_w - next.width);
            next.y = (next.y + ymove).clamp(0, world_h - next.height);
            next.has_collision = false;
        }
    }

    next
}

/// Chase the player while the attack flag is up; otherwise a uniform
/// random point in world bounds.
fn new_destination(world_w: i32, world_h: i32, player: &Actor, attack: bool, rng: &mut SmallRng) -> Point {
    if attack {
        return Point { x: player.x, y: player.y };
    }
    Point {
        x: rng.random_range(0..world_w),
        y: rng.random_range(0..world_h),
    }
}

/// Patrol actors are confined to a rectangle given as fractions of
/// world size, but only while not chasing.
fn outside_patrol_bounds(npc: &Actor, world_w: i32, world_h: i32, attack: bool) -> bool {
    if npc.kind != ActorKind::Patrol || attack {
        return false;
    }
    let bounds = match npc.patrol {
        Some(b) => b,
        None => return false,
    };
    npc.x as f32 >= world_w as f32 * bounds.max_right
        || npc.x as f32 <= world_w as f32 * bounds.max_left
        || npc.y as f32 >= world_h as f32 * bounds.max_down
        || npc.y as f32 <= world_h as f32 * bounds.max_up
}

fn distance(x1: i32, y1: i32, x2: i32, y2: i32) -> f64 {
    let dx = (x1 - x2) as f64;
    let dy = (y1 - y2) as f64;
    (dx * dx + dy * dy).sqrt()
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actor::{ActorId, PatrolBounds};
    use rand::SeedableRng;

    const WORLD_W: i32 = 800;
    const WORLD_H: i32 = 600;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    fn player_at(x: i32, y: i32) -> Actor {
        Actor::new(ActorId(0), ActorKind::Player, x, y, 20, 20, 5)
    }

    fn drifter(x: i32, y: i32) -> Actor {
        Actor::new(ActorId(1), ActorKind::Drifter, x, y, 20, 20, 4)
    }

    // ── player intent ──

    #[test]
    fn player_moves_by_speed_and_faces() {
        let p = player_at(100, 100);
        let input = TickInput { right: true, down: true, ..Default::default() };
        let next = player_intent(&p, WORLD_W, WORLD_H, &input);
        assert_eq!((next.x, next.y), (105, 105));
        assert_eq!(next.facing, Facing::DownRight);
    }

    #[test]
    fn player_opposing_keys_cancel() {
        let p = player_at(100, 100);
        let input = TickInput { left: true, right: true, up: true, ..Default::default() };
        let next = player_intent(&p, WORLD_W, WORLD_H, &input);
        assert_eq!(next.x, 100);
        assert_eq!(next.y, 95);
        assert_eq!(next.facing, Facing::Up);
    }

    #[test]
    fn player_clamps_to_world_edges() {
        let mut p = player_at(2, 0);
        p.speed = 10;
        let input = TickInput { left: true, up: true, ..Default::default() };
        let next = player_intent(&p, WORLD_W, WORLD_H, &input);
        assert_eq!((next.x, next.y), (0, 0));

        let mut p = player_at(WORLD_W - 22, WORLD_H - 22);
        p.speed = 10;
        let input = TickInput { right: true, down: true, ..Default::default() };
        let next = player_intent(&p, WORLD_W, WORLD_H, &input);
        assert_eq!((next.x, next.y), (WORLD_W - 20, WORLD_H - 20));
    }

    #[test]
    fn player_idle_input_is_identity() {
        let p = player_at(100, 100);
        let next = player_intent(&p, WORLD_W, WORLD_H, &TickInput::default());
        assert_eq!(next, p);
    }

    // ── NPC: destinations ──

    #[test]
    fn npc_without_destination_picks_one_in_bounds() {
        let npc = drifter(100, 100);
        let next = npc_intent(&npc, WORLD_W, WORLD_H, &player_at(0, 0), false, &mut rng());
        let dest = next.destination.expect("destination set");
        assert!(dest.x >= 0 && dest.x < WORLD_W);
        assert!(dest.y >= 0 && dest.y < WORLD_H);
    }

    #[test]
    fn npc_near_destination_picks_a_new_one() {
        let mut npc = drifter(100, 100);
        // Within `width` of the destination.
        npc.destination = Some(Point { x: 105, y: 103 });
        let next = npc_intent(&npc, WORLD_W, WORLD_H, &player_at(0, 0), false, &mut rng());
        assert_ne!(next.destination, Some(Point { x: 105, y: 103 }));
    }

    #[test]
    fn npc_collision_forces_new_destination() {
        let mut npc = drifter(100, 100);
        npc.destination = Some(Point { x: 700, y: 500 });
        npc.has_collision = true;
        let next = npc_intent(&npc, WORLD_W, WORLD_H, &player_at(0, 0), false, &mut rng());
        assert_ne!(next.destination, Some(Point { x: 700, y: 500 }));
    }

    #[test]
    fn npc_far_destination_is_kept() {
        let mut npc = drifter(100, 100);
        npc.destination = Some(Point { x: 700, y: 500 });
        let next = npc_intent(&npc, WORLD_W, WORLD_H, &player_at(0, 0), false, &mut rng());
        assert_eq!(next.destination, Some(Point { x: 700, y: 500 }));
    }

    #[test]
    fn attack_redirects_to_player() {
        let mut npc = drifter(100, 100);
        npc.has_collision = true; // force a refresh
        let next = npc_intent(&npc, WORLD_W, WORLD_H, &player_at(432, 321), true, &mut rng());
        assert_eq!(next.destination, Some(Point { x: 432, y: 321 }));
    }

    // ── NPC: movement ──

    #[test]
    fn npc_steps_toward_destination_capped_by_speed() {
        let mut npc = drifter(100, 100);
        npc.destination = Some(Point { x: 700, y: 111 });
        let next = npc_intent(&npc, WORLD_W, WORLD_H, &player_at(0, 0), false, &mut rng());
        // Center starts at (110, 110): +4 on x (capped), +1 on y.
        assert_eq!((next.x, next.y), (104, 101));
        assert_eq!(next.facing, Facing::DownRight);
        assert!(!next.has_collision);
    }

    #[test]
    fn npc_vertical_move_gets_single_axis_facing() {
        let mut npc = drifter(100, 100);
        npc.destination = Some(Point { x: 110, y: 400 });
        let next = npc_intent(&npc, WORLD_W, WORLD_H, &player_at(0, 0), false, &mut rng());
        assert_eq!(next.x, 100);
        assert_eq!(next.facing, Facing::Down);
    }

    // ── NPC: spawn ramp ──

    #[test]
    fn fresh_spawn_gets_inflated_speed() {
        let mut npc = drifter(100, 100);
        npc.is_new = true;
        npc.destination = Some(Point { x: 700, y: 500 });
        let next = npc_intent(&npc, WORLD_W, WORLD_H, &player_at(0, 0), false, &mut rng());
        assert_eq!(next.speed, npc.width + 1);
        assert_eq!(next.fallback_speed, Some(4));
        assert!(next.is_new);
    }

    #[test]
    fn clean_move_ends_the_ramp() {
        let mut npc = drifter(100, 100);
        npc.is_new = true;
        npc.fallback_speed = Some(4);
        npc.speed = 21;
        npc.destination = Some(Point { x: 700, y: 500 });
        let next = npc_intent(&npc, WORLD_W, WORLD_H, &player_at(0, 0), false, &mut rng());
        assert_eq!(next.speed, 4);
        assert!(!next.is_new);
    }

    #[test]
    fn ramp_persists_while_colliding() {
        let mut npc = drifter(100, 100);
        npc.is_new = true;
        npc.fallback_speed = Some(4);
        npc.speed = 21;
        npc.has_collision = true;
        npc.destination = Some(Point { x: 700, y: 500 });
        let next = npc_intent(&npc, WORLD_W, WORLD_H, &player_at(0, 0), false, &mut rng());
        assert_eq!(next.speed, 21);
        assert!(next.is_new);
    }

    // ── NPC: patrol ──

    fn patroller(x: i32, y: i32) -> Actor {
        let mut npc = Actor::new(ActorId(2), ActorKind::Patrol, x, y, 20, 20, 4);
        npc.patrol = Some(PatrolBounds {
            max_left: 0.1,
            max_right: 0.5,
            max_up: 0.1,
            max_down: 0.5,
        });
        npc
    }

    #[test]
    fn patrol_boundary_reads_as_collision() {
        // x = 400 = 800 * 0.5: at the right bound.
        let mut npc = patroller(400, 200);
        npc.destination = Some(Point { x: 700, y: 210 });
        let next = npc_intent(&npc, WORLD_W, WORLD_H, &player_at(0, 0), false, &mut rng());
        // Step inverted: intended +4 on x becomes -4.
        assert_eq!(next.x, 396);
        assert!(next.has_collision);
        // The destination is NOT re-picked on the boundary tick.
        assert_eq!(next.destination, Some(Point { x: 700, y: 210 }));
    }

    #[test]
    fn patrol_inside_bounds_moves_normally() {
        let mut npc = patroller(200, 200);
        npc.destination = Some(Point { x: 300, y: 210 });
        let next = npc_intent(&npc, WORLD_W, WORLD_H, &player_at(0, 0), false, &mut rng());
        assert_eq!(next.x, 204);
        assert!(!next.has_collision);
    }

    #[test]
    fn attack_suspends_patrol_bounds() {
        let mut npc = patroller(400, 200);
        npc.destination = Some(Point { x: 700, y: 210 });
        let next = npc_intent(&npc, WORLD_W, WORLD_H, &player_at(700, 210), true, &mut rng());
        // Chasing: the boundary no longer applies.
        assert_eq!(next.x, 404);
        assert!(!next.has_collision);
    }

    // ── determinism ──

    #[test]
    fn same_seed_same_decision() {
        let npc = drifter(100, 100);
        let a = npc_intent(&npc, WORLD_W, WORLD_H, &player_at(0, 0), false, &mut rng());
        let b = npc_intent(&npc, WORLD_W, WORLD_H, &player_at(0, 0), false, &mut rng());
        assert_eq!(a, b);
    }
}
