/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// One terminal cell shows one 10×10-pixel world block, so the
/// on-screen grid is exactly the spatial-index grid. Actors cover
/// width/10 × height/10 cells.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::actor::{Actor, ActorKind, TickInput};
use crate::domain::grid::CELL;
use crate::domain::stats::TickStats;
use crate::sim::world::WorldState;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 18, g: 18, b: 28 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer: differs from any
    /// real cell so every position gets diff'd on the next frame.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

/// Aggregated stats sample shown in the HUD, refreshed on the stats
/// cadence rather than every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct HudSample {
    pub fps: u64,
    pub index_us: u128,
    pub collision_us: u128,
    pub checks: u64,
    pub calls: u64,
}

impl HudSample {
    pub fn from_stats(stats: &TickStats, window_ms: u64) -> Self {
        let window_ms = window_ms.max(1);
        HudSample {
            fps: stats.frames * 1000 / window_ms,
            index_us: stats.index_time.as_micros(),
            collision_us: stats.collision_time.as_micros(),
            checks: stats.collision_checks,
            calls: stats.collision_calls,
        }
    }
}

pub struct Renderer {
    writer: BufWriter<Stdout>,
    front: Vec<Cell>,
    back: Vec<Cell>,
    term_w: usize,
    term_h: usize,
    hud: HudSample,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::new(io::stdout()),
            front: Vec::new(),
            back: Vec::new(),
            term_w: 0,
            term_h: 0,
            hud: HudSample::default(),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    /// Install a fresh stats sample for the HUD.
    pub fn set_hud(&mut self, hud: HudSample) {
        self.hud = hud;
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front = vec![Cell::BLANK; w * h];
        self.back = vec![Cell::INVALID; w * h];
    }

    pub fn render(&mut self, world: &mut WorldState, input: &TickInput) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }
        if self.term_w == 0 || self.term_h < 2 {
            return Ok(());
        }

        // Bottom line is the HUD; everything above is viewport.
        let view_h = self.term_h - 1;
        world.camera.view_w = self.term_w as i32;
        world.camera.view_h = view_h as i32;

        let blocks_w = world.width / CELL;
        let blocks_h = world.height / CELL;
        world.camera.follow(
            world.player.x / CELL,
            world.player.y / CELL,
            blocks_w,
            blocks_h,
        );

        self.front.fill(Cell::BLANK);
        self.draw_mask(world, blocks_w, blocks_h);

        // NPCs first, player on top.
        for i in 0..world.npcs.len() {
            let (ch, fg) = match world.npcs[i].kind {
                ActorKind::Patrol => ('V', Color::Yellow),
                _ => ('o', Color::Cyan),
            };
            self.stamp_actor(world, &world.npcs[i], ch, fg);
        }
        self.stamp_actor(world, &world.player, '@', Color::White);

        self.draw_hud(world, input);
        self.flush_diff()
    }

    // ── Frame building ──

    fn put(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.term_w && y + 1 < self.term_h {
            self.front[y * self.term_w + x] = cell;
        }
    }

    fn draw_mask(&mut self, world: &WorldState, blocks_w: i32, blocks_h: i32) {
        let view_h = self.term_h - 1;
        for sy in 0..view_h {
            for sx in 0..self.term_w {
                let wx = world.camera.x + sx as i32;
                let wy = world.camera.y + sy as i32;
                if wx < 0 || wx >= blocks_w || wy < 0 || wy >= blocks_h {
                    continue;
                }
                // Blocks are block-aligned, so one byte decides.
                if world.mask.opaque_within(wx * CELL, wy * CELL, 1, 1) {
                    self.put(sx, sy, Cell { ch: '█', fg: Color::DarkGrey, bg: Cell::BASE_BG });
                }
            }
        }
    }

    fn stamp_actor(&mut self, world: &WorldState, actor: &Actor, ch: char, fg: Color) {
        let fg = if actor.has_collision { Color::Red } else { fg };
        let bx0 = actor.x / CELL;
        let bx1 = (actor.x + actor.width - 1) / CELL;
        let by0 = actor.y / CELL;
        let by1 = (actor.y + actor.height - 1) / CELL;
        for by in by0..=by1 {
            for bx in bx0..=bx1 {
                if let Some((sx, sy)) = world.camera.world_to_view(bx, by) {
                    self.put(sx as usize, sy as usize, Cell { ch, fg, bg: Cell::BASE_BG });
                }
            }
        }
    }

    fn draw_hud(&mut self, world: &WorldState, input: &TickInput) {
        let mut line = format!(
            " tick {}  {} fps  idx {}us  col {}us  cand {}  calls {}",
            world.tick, self.hud.fps, self.hud.index_us, self.hud.collision_us,
            self.hud.checks, self.hud.calls,
        );
        if input.paused {
            line.push_str("  [PAUSED]");
        }
        if input.attack {
            line.push_str("  [ATTACK]");
        }

        let y = self.term_h - 1;
        for (i, ch) in line.chars().take(self.term_w).enumerate() {
            self.front[y * self.term_w + i] = Cell {
                ch,
                fg: Color::DarkGrey,
                bg: Cell::BASE_BG,
            };
        }
        for i in line.chars().count().min(self.term_w)..self.term_w {
            self.front[y * self.term_w + i] = Cell::BLANK;
        }
    }

    // ── Diff + flush ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.term_h {
            for x in 0..self.term_w {
                let idx = y * self.term_w + x;
                let cell = self.front[idx];
                if cell == self.back[idx] {
                    continue;
                }

                queue!(self.writer, MoveTo(x as u16, y as u16))?;
                if last_fg != Some(cell.fg) {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = Some(cell.fg);
                }
                if last_bg != Some(cell.bg) {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = Some(cell.bg);
                }
                queue!(self.writer, Print(cell.ch))?;
            }
        }

        std::mem::swap(&mut self.front, &mut self.back);
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn hud_sample_scales_frames_to_fps() {
        let mut stats = TickStats::default();
        stats.frames = 120;
        stats.collision_time = Duration::from_micros(500);
        let hud = HudSample::from_stats(&stats, 2000);
        assert_eq!(hud.fps, 60);
        assert_eq!(hud.collision_us, 500);
    }

    #[test]
    fn hud_sample_survives_zero_window() {
        let stats = TickStats::default();
        let hud = HudSample::from_stats(&stats, 0);
        assert_eq!(hud.fps, 0);
    }
}
