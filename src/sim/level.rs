/// World layout loader.
///
/// ## Sources (priority order):
///   1. Layout file named in config (`[world] layout = "..."`)
///   2. Built-in embedded layout
///
/// ## Layout format:
///   One character per 10×10-pixel block (the spatial-index cell
///   size). Rows may have uneven length; missing trailing characters
///   are open space.
///
/// ## Legend:
///   '#' = impassable block      ' ' / '.' = open space
///   'P' = player spawn          'D' = drifter spawn
///   'V' = patrol spawn
///
/// The obstacle mask is synthesized from the '#' blocks: each block
/// contributes a 10×10 run of opaque bytes, and layout rows with no
/// block contribute nothing at all (the mask stays sparse).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;
use crate::domain::actor::{Actor, ActorId, ActorKind, PatrolBounds};
use crate::domain::grid::CELL;
use crate::domain::mask::ObstacleMask;
use crate::sim::world::WorldState;

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Build the initial world from the configured (or embedded) layout.
pub fn build_world(config: &GameConfig) -> WorldState {
    let rows = layout_rows(config);
    build_world_from_rows(&rows, config)
}

fn build_world_from_rows(rows: &[String], config: &GameConfig) -> WorldState {
    let cols = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
    let width = cols * CELL;
    let height = rows.len() as i32 * CELL;

    let mask = build_mask(rows, cols);

    let seed = config.world.seed.unwrap_or_else(rand::random);
    let mut rng = SmallRng::seed_from_u64(seed);

    // ── Spawn markers ──
    let mut player_spawn = None;
    let mut npc_spawns: Vec<(ActorKind, i32, i32)> = Vec::new();
    for (cy, row) in rows.iter().enumerate() {
        for (cx, ch) in row.chars().enumerate() {
            let x = cx as i32 * CELL;
            let y = cy as i32 * CELL;
            match ch {
                'P' => player_spawn = Some((x, y)),
                'D' => npc_spawns.push((ActorKind::Drifter, x, y)),
                'V' => npc_spawns.push((ActorKind::Patrol, x, y)),
                _ => {}
            }
        }
    }

    let a = &config.actors;
    let (px, py) = player_spawn.unwrap_or((width / 2, height / 2));
    let player = Actor::new(ActorId(0), ActorKind::Player, px, py, a.player_width, a.player_height, a.player_speed);

    let patrol_bounds = PatrolBounds {
        max_left: config.patrol.max_left,
        max_right: config.patrol.max_right,
        max_up: config.patrol.max_up,
        max_down: config.patrol.max_down,
    };

    let mut npcs = Vec::new();
    let mut next_id = 1u32;
    for (kind, x, y) in npc_spawns {
        let mut npc = Actor::new(ActorId(next_id), kind, x, y, a.npc_width, a.npc_height, a.npc_speed);
        if kind == ActorKind::Patrol {
            npc.patrol = Some(patrol_bounds);
        }
        npcs.push(npc);
        next_id += 1;
    }

    // ── Extra drifters at random free spots ──
    for _ in 0..a.extra_drifters {
        let (x, y) = free_spot(&mask, width, height, a.npc_width, a.npc_height, &mut rng);
        let mut npc = Actor::new(ActorId(next_id), ActorKind::Drifter, x, y, a.npc_width, a.npc_height, a.npc_speed);
        // Spawn ramp: the first moves get an inflated speed so a
        // drifter dropped next to (or on) someone can clear out.
        npc.is_new = true;
        npcs.push(npc);
        next_id += 1;
    }

    WorldState::new(width, height, player, npcs, mask, rng)
}

// ══════════════════════════════════════════════════════════════
// Layout sources
// ══════════════════════════════════════════════════════════════

fn layout_rows(config: &GameConfig) -> Vec<String> {
    if let Some(path) = &config.world.layout {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let rows: Vec<String> = text.lines().map(|l| l.to_string()).collect();
                if !rows.is_empty() {
                    return rows;
                }
                eprintln!("Warning: layout {} is empty, using built-in map", path.display());
            }
            Err(e) => {
                eprintln!("Warning: could not read {}: {e}", path.display());
                eprintln!("Using built-in map.");
            }
        }
    }
    EMBEDDED_LAYOUT.iter().map(|r| r.to_string()).collect()
}

/// Built-in map: an open plaza ringed by buildings. 48×32 blocks
/// (480×320 pixels).
const EMBEDDED_LAYOUT: &[&str] = &[
    "################################################",
    "#                                              #",
    "#                                              #",
    "#        ########          #########           #",
    "#        ########          #########           #",
    "#        ########          #########           #",
    "#                 V                     D      #",
    "#                                              #",
    "#                   V                          #",
    "#   ####                              ####     #",
    "#   ####                              ####     #",
    "#   ####         D                    ####     #",
    "#   ####                              ####     #",
    "#                                              #",
    "#                                              #",
    "#             ######    ######                 #",
    "#             ######    ######                 #",
    "#             ######    ######                 #",
    "#                                              #",
    "#       D                                      #",
    "#                                              #",
    "#   ####                              ####     #",
    "#   ####                              ####     #",
    "#   ####                              ####     #",
    "#                        D                     #",
    "#                                              #",
    "#                  P                           #",
    "#        ########          #########           #",
    "#        ########          #########           #",
    "#                                              #",
    "#                                              #",
    "################################################",
];

// ══════════════════════════════════════════════════════════════
// Mask synthesis
// ══════════════════════════════════════════════════════════════

fn build_mask(rows: &[String], cols: i32) -> ObstacleMask {
    let mut mask = ObstacleMask::new();
    let width = (cols * CELL) as usize;

    for (cy, row) in rows.iter().enumerate() {
        // Rows without a single block stay absent from the mask.
        if !row.contains('#') {
            continue;
        }

        let mut bytes = vec![0u8; width];
        for (cx, ch) in row.chars().enumerate() {
            if ch == '#' {
                let start = cx * CELL as usize;
                for b in &mut bytes[start..start + CELL as usize] {
                    *b = 255;
                }
            }
        }

        let base = cy as i32 * CELL;
        for y in base..base + CELL {
            mask.set_row(y, bytes.clone());
        }
    }

    mask
}

/// Random spawn position whose rectangle avoids the mask. Gives up
/// after a bounded number of draws and returns the last one — the
/// spawn ramp and the resolver deal with crowded maps.
fn free_spot(mask: &ObstacleMask, width: i32, height: i32, w: i32, h: i32, rng: &mut SmallRng) -> (i32, i32) {
    let mut x = 0;
    let mut y = 0;
    for _ in 0..32 {
        x = rng.random_range(0..(width - w).max(1));
        y = rng.random_range(0..(height - h).max(1));
        if !mask.opaque_within(x, y, w, h) {
            break;
        }
    }
    (x, y)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
