/// Entry point and game loop.
///
/// The simulation core exposes only the synchronous `sim::step::step`;
/// this loop is the external driver that calls it on the configured
/// cadence. A second, coarser cadence samples-and-clears the
/// instrumentation counters for the HUD — same thread, so the
/// handoff is a plain `take()`.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use config::GameConfig;
use sim::level;
use sim::step;
use sim::world::WorldState;
use ui::input::InputState;
use ui::renderer::{HudSample, Renderer};

const FRAME_SLEEP: Duration = Duration::from_millis(2);

fn main() {
    let config = GameConfig::load();
    let mut world = level::build_world(&config);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for walking the promenade. {} ticks simulated.", world.tick);
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);
    let stats_rate = Duration::from_millis(config.speed.stats_rate_ms);
    let mut last_tick = Instant::now();
    let mut last_stats = Instant::now();

    loop {
        kb.drain_events();
        if kb.quit_requested() {
            break;
        }

        let input = kb.tick_input();

        if last_tick.elapsed() >= tick_rate {
            step::step(world, &input);
            last_tick = Instant::now();
        }

        // Coarser cadence: hand the counters to the HUD and reset.
        if last_stats.elapsed() >= stats_rate {
            let window_ms = last_stats.elapsed().as_millis() as u64;
            let sample = world.stats.take();
            renderer.set_hud(HudSample::from_stats(&sample, window_ms));
            last_stats = Instant::now();
        }

        renderer.render(world, &input)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}
