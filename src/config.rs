/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub actors: ActorConfig,
    pub patrol: PatrolConfig,
    pub speed: SpeedConfig,
}

#[derive(Clone, Debug)]
pub struct WorldConfig {
    /// Optional layout file; the embedded layout is used when absent.
    pub layout: Option<PathBuf>,
    /// Optional rng seed; drawn at random when absent.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct ActorConfig {
    pub player_width: i32,
    pub player_height: i32,
    pub player_speed: i32,
    pub npc_width: i32,
    pub npc_height: i32,
    pub npc_speed: i32,
    /// Drifters spawned at random free spots on top of the layout's
    /// own markers.
    pub extra_drifters: u32,
}

/// Patrol rectangle defaults, as fractions of world size.
#[derive(Clone, Copy, Debug)]
pub struct PatrolConfig {
    pub max_left: f32,
    pub max_right: f32,
    pub max_up: f32,
    pub max_down: f32,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
    /// Cadence of the stats sample-and-clear handoff.
    pub stats_rate_ms: u64,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    world: TomlWorld,
    #[serde(default)]
    actors: TomlActors,
    #[serde(default)]
    patrol: TomlPatrol,
    #[serde(default)]
    speed: TomlSpeed,
}

#[derive(Deserialize, Debug, Default)]
struct TomlWorld {
    layout: Option<String>,
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlActors {
    #[serde(default = "default_player_width")]
    player_width: i32,
    #[serde(default = "default_player_height")]
    player_height: i32,
    #[serde(default = "default_player_speed")]
    player_speed: i32,
    #[serde(default = "default_npc_width")]
    npc_width: i32,
    #[serde(default = "default_npc_height")]
    npc_height: i32,
    #[serde(default = "default_npc_speed")]
    npc_speed: i32,
    #[serde(default = "default_extra_drifters")]
    extra_drifters: u32,
}

#[derive(Deserialize, Debug)]
struct TomlPatrol {
    #[serde(default = "default_max_left")]
    max_left: f32,
    #[serde(default = "default_max_right")]
    max_right: f32,
    #[serde(default = "default_max_up")]
    max_up: f32,
    #[serde(default = "default_max_down")]
    max_down: f32,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_stats_rate")]
    stats_rate_ms: u64,
}

// ── Defaults ──

fn default_player_width() -> i32 { 20 }
fn default_player_height() -> i32 { 20 }
fn default_player_speed() -> i32 { 5 }
fn default_npc_width() -> i32 { 20 }
fn default_npc_height() -> i32 { 20 }
fn default_npc_speed() -> i32 { 4 }
fn default_extra_drifters() -> u32 { 8 }

fn default_max_left() -> f32 { 0.1 }
fn default_max_right() -> f32 { 0.5 }
fn default_max_up() -> f32 { 0.1 }
fn default_max_down() -> f32 { 0.5 }

fn default_tick_rate() -> u64 { 16 }     // ~60 ticks/s
fn default_stats_rate() -> u64 { 1000 }

impl Default for TomlActors {
    fn default() -> Self {
        TomlActors {
            player_width: default_player_width(),
            player_height: default_player_height(),
            player_speed: default_player_speed(),
            npc_width: default_npc_width(),
            npc_height: default_npc_height(),
            npc_speed: default_npc_speed(),
            extra_drifters: default_extra_drifters(),
        }
    }
}

impl Default for TomlPatrol {
    fn default() -> Self {
        TomlPatrol {
            max_left: default_max_left(),
            max_right: default_max_right(),
            max_up: default_max_up(),
            max_down: default_max_down(),
        }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            stats_rate_ms: default_stats_rate(),
        }
    }
}

// ── Loading ──

impl Default for GameConfig {
    /// Built-in defaults, as if config.toml were absent.
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), &[])
    }
}

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        GameConfig::from_toml(toml_cfg, &search_dirs)
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        // Resolve the layout path against the search directories.
        let layout = toml_cfg.world.layout.map(|raw| {
            let p = PathBuf::from(&raw);
            if p.is_absolute() {
                p
            } else {
                search_dirs
                    .iter()
                    .map(|d| d.join(&raw))
                    .find(|c| c.is_file())
                    .unwrap_or(p)
            }
        });

        GameConfig {
            world: WorldConfig {
                layout,
                seed: toml_cfg.world.seed,
            },
            actors: ActorConfig {
                player_width: toml_cfg.actors.player_width,
                player_height: toml_cfg.actors.player_height,
                player_speed: toml_cfg.actors.player_speed,
                npc_width: toml_cfg.actors.npc_width,
                npc_height: toml_cfg.actors.npc_height,
                npc_speed: toml_cfg.actors.npc_speed,
                extra_drifters: toml_cfg.actors.extra_drifters,
            },
            patrol: PatrolConfig {
                max_left: toml_cfg.patrol.max_left,
                max_right: toml_cfg.patrol.max_right,
                max_up: toml_cfg.patrol.max_up,
                max_down: toml_cfg.patrol.max_down,
            },
            speed: SpeedConfig {
                tick_rate_ms: toml_cfg.speed.tick_rate_ms,
                stats_rate_ms: toml_cfg.speed.stats_rate_ms,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
