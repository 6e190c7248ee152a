/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Player: intent → resolve (with slide) → re-register in index
///   2. Unless paused, each NPC in fixed order: intent → resolve →
///      re-register IMMEDIATELY
///
/// Registration order matters: an NPC later in the roster observes
/// the already-updated positions of everyone before it in the same
/// tick. Sequential consistency, not simultaneous — parallelizing
/// this loop would change observable behavior.
///
/// Pausing freezes NPC decisions; the player still moves. There is no
/// self-scheduling here: the caller drives `step` once per frame.

use crate::domain::actor::TickInput;
use crate::domain::ai;
use crate::domain::physics;
use super::world::WorldState;

pub fn step(world: &mut WorldState, input: &TickInput) {
    world.tick += 1;
    world.stats.frames += 1;

    // ── Player ──
    let desired = ai::player_intent(&world.player, world.width, world.height, input);
    let resolved = physics::resolve_move(
        &world.player,
        desired,
        true,
        world.width,
        world.height,
        &world.index,
        &world.mask,
        &mut world.stats,
    );
    world.index.update(&resolved, Some(&world.player), &mut world.stats);
    world.player = resolved;

    // ── NPCs ──
    if input.paused {
        return;
    }
    for i in 0..world.npcs.len() {
        let desired = ai::npc_intent(
            &world.npcs[i],
            world.width,
            world.height,
            &world.player,
            input.attack,
            &mut world.rng,
        );
        let resolved = physics::resolve_move(
            &world.npcs[i],
            desired,
            false,
            world.width,
            world.height,
            &world.index,
            &world.mask,
            &mut world.stats,
        );
        world.index.update(&resolved, Some(&world.npcs[i]), &mut world.stats);
        world.npcs[i] = resolved;
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
