/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Reads the session and the effects; never writes to either.

use std::io::{self, BufWriter, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::grid::{Cell as GridCell, Direction, Grid};
use crate::sim::session::Session;
use crate::sim::world::{Difficulty, GameState, Phase};
use super::effects::{Effects, FOOD_COLOR, POWERUP_COLOR};
use super::layout::{Layout, MenuButton, Rect, HUD_ROW};

// ── Palette ──

const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };
const BOARD_BG: Color = Color::Rgb { r: 44, g: 62, b: 80 };
const BOARD_BG_ALT: Color = Color::Rgb { r: 48, g: 67, b: 86 };
const BORDER: Color = Color::Rgb { r: 39, g: 174, b: 96 };
const HEAD: Color = Color::Rgb { r: 46, g: 204, b: 113 };
const TEXT: Color = Color::Rgb { r: 236, g: 240, b: 241 };
const DIM: Color = Color::Rgb { r: 127, g: 140, b: 141 };
const STAR: Color = Color::Rgb { r: 241, g: 196, b: 15 };
const START_BTN: Color = Color::Rgb { r: 52, g: 152, b: 219 };
const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const OVERLAY_BG: Color = Color::Rgb { r: 30, g: 30, b: 30 };

/// The powerup blinks during its final seconds.
const POWERUP_WARN: Duration = Duration::from_secs(3);

fn difficulty_color(d: Difficulty) -> Color {
    match d {
        Difficulty::Easy => HEAD,
        Difficulty::Medium => POWERUP_COLOR,
        Difficulty::Hard => FOOD_COLOR,
    }
}

/// Body shade fades from bright to dull green along the snake.
fn body_color(i: usize) -> Color {
    let g = 255_i32.saturating_sub(i as i32 * 5).max(100) as u8;
    Color::Rgb { r: 46, g, b: 113 }
}

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: TEXT, bg: BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Replace the glyph and foreground, keeping whatever background is there.
    fn overlay(&mut self, x: u16, y: u16, ch: char, fg: Color) {
        let bg = self.get(x as usize, y as usize).bg;
        self.set(x, y, Cell::new(ch, fg, bg));
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x.saturating_add(i as u16), y, Cell::new(ch, fg, bg));
        }
    }

    /// Write `s` centred on column `cx`.
    fn put_centered(&mut self, cx: u16, y: u16, s: &str, fg: Color, bg: Color) {
        let half = (s.chars().count() / 2) as u16;
        self.put_str(cx.saturating_sub(half), y, s, fg, bg);
    }

    fn fill(&mut self, r: Rect, bg: Color) {
        for y in r.row..r.bottom() {
            for x in r.col..r.right() {
                self.set(x, y, Cell::new(' ', TEXT, bg));
            }
        }
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    layout: Layout,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new(grid: Grid) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            layout: Layout::new(80, 24, grid),
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All)
        )?;
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw, th);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Geometry of the last frame, for hit-testing pointer input.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn resize(&mut self, tw: u16, th: u16) {
        self.layout = Layout::new(tw, th, self.layout.grid);
        self.front.resize(tw as usize, th as usize);
        self.back.resize(tw as usize, th as usize);
        // Force full repaint: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);
    }

    /// Draw one frame. `notice` is an optional transient message line.
    pub fn render(
        &mut self,
        session: &Session,
        effects: &Effects,
        notice: Option<&str>,
        now: Instant,
        anim: u64,
    ) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw != self.layout.term_w || th != self.layout.term_h {
            self.resize(tw, th);
            queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
        }

        let s = &session.state;
        if self.last_phase != Some(s.phase) {
            self.back.cells.fill(Cell::INVALID);
            self.last_phase = Some(s.phase);
        }

        self.front.clear();
        match s.phase {
            Phase::Menu => self.compose_menu(s),
            _ if !self.layout.fits() => self.compose_too_small(),
            Phase::Playing => self.compose_game(s, effects, now, anim),
            Phase::Paused => {
                self.compose_game(s, effects, now, anim);
                self.compose_pause_overlay(anim);
            }
            Phase::GameOver => {
                self.compose_game(s, effects, now, anim);
                self.compose_game_over(s);
            }
        }
        if let Some(msg) = notice {
            let row = self.layout.term_h.saturating_sub(1);
            self.front.put_str(1, row, msg, POWERUP_COLOR, BASE_BG);
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = TEXT;
        let mut last_bg = BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        // Explicit base colors; ResetColor would fall back to the terminal default.
        queue!(self.writer, SetForegroundColor(TEXT), SetBackgroundColor(BASE_BG))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, s: &GameState) {
        let width = self.layout.frame.w.max(self.layout.term_w.min(80));
        self.front.fill(Rect::new(0, HUD_ROW, width, 1), HUD_BG);
        let left = format!(" Score: {:<5} High: {:<5} ", s.score, s.high_score);
        self.front.put_str(0, HUD_ROW, &left, TEXT, HUD_BG);
        let col = left.chars().count() as u16;
        self.front.put_str(col, HUD_ROW, "Difficulty: ", DIM, HUD_BG);
        self.front.put_str(col + 12, HUD_ROW, s.difficulty.label(), difficulty_color(s.difficulty), HUD_BG);
    }

    fn compose_game(&mut self, s: &GameState, effects: &Effects, now: Instant, anim: u64) {
        self.compose_hud(s);
        self.compose_frame();

        let l = self.layout.clone();
        let grid = l.grid;

        // Checkered floor
        for c in grid.cells() {
            let (col, row) = l.cell_origin(c);
            let bg = if (c.x + c.y) % 2 == 0 { BOARD_BG } else { BOARD_BG_ALT };
            self.front.set(col, row, Cell::new(' ', TEXT, bg));
            self.front.set(col + 1, row, Cell::new(' ', TEXT, bg));
        }

        if let Some(food) = s.food {
            let shade = if (anim / 8) % 2 == 0 { FOOD_COLOR } else { Color::Rgb { r: 200, g: 60, b: 48 } };
            self.put_cell(food, ('(', ')'), STAR, shade);
        }

        if let Some(p) = s.powerup {
            let left = s.rules.powerup_lifetime.saturating_sub(p.age(now));
            let hidden = left < POWERUP_WARN && (anim / 4) % 2 == 1;
            if !hidden {
                self.put_cell(p.cell, ('<', '>'), STAR, POWERUP_COLOR);
            }
        }

        // Tail first so the head wins when a powerup left duplicates
        let body: Vec<GridCell> = s.snake.cells().copied().collect();
        for (i, c) in body.iter().enumerate().skip(1).rev() {
            self.put_cell(*c, (' ', ' '), TEXT, body_color(i));
        }
        let eyes = match s.direction {
            Direction::Up => ('\'', '\''),
            Direction::Down => ('.', '.'),
            Direction::Left => (':', ' '),
            Direction::Right => (' ', ':'),
        };
        self.put_cell(s.snake.head(), eyes, Color::Black, HEAD);

        self.compose_effects(effects, &grid);
        self.compose_dpad();
        self.compose_help(s.phase);
    }

    fn put_cell(&mut self, c: GridCell, glyphs: (char, char), fg: Color, bg: Color) {
        let (col, row) = self.layout.cell_origin(c);
        self.front.set(col, row, Cell::new(glyphs.0, fg, bg));
        self.front.set(col + 1, row, Cell::new(glyphs.1, fg, bg));
    }

    fn compose_frame(&mut self) {
        let f = self.layout.frame;
        let (right, bottom) = (f.right() - 1, f.bottom() - 1);
        for x in f.col + 1..right {
            self.front.set(x, f.row, Cell::new('─', BORDER, BASE_BG));
            self.front.set(x, bottom, Cell::new('─', BORDER, BASE_BG));
        }
        for y in f.row + 1..bottom {
            self.front.set(f.col, y, Cell::new('│', BORDER, BASE_BG));
            self.front.set(right, y, Cell::new('│', BORDER, BASE_BG));
        }
        self.front.set(f.col, f.row, Cell::new('┌', BORDER, BASE_BG));
        self.front.set(right, f.row, Cell::new('┐', BORDER, BASE_BG));
        self.front.set(f.col, bottom, Cell::new('└', BORDER, BASE_BG));
        self.front.set(right, bottom, Cell::new('┘', BORDER, BASE_BG));
    }

    fn compose_effects(&mut self, effects: &Effects, grid: &Grid) {
        let board = self.layout.board;
        for p in effects.particles() {
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let c = GridCell::new(p.x as i32, p.y as i32);
            if !grid.contains(c) {
                continue;
            }
            let (col, row) = self.layout.cell_origin(c);
            let col = col + (p.x.fract() * 2.0) as u16;
            let glyph = if p.life > 0.5 { '*' } else { '·' };
            self.front.overlay(col.min(board.right() - 1), row, glyph, p.color);
        }
        for p in effects.popups() {
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let c = GridCell::new(p.x as i32, p.y as i32);
            if !grid.contains(c) {
                continue;
            }
            let (col, row) = self.layout.cell_origin(c);
            for (i, ch) in p.text.chars().enumerate() {
                let x = col + i as u16;
                if x < board.right() {
                    self.front.overlay(x, row, ch, p.color);
                }
            }
        }
    }

    fn compose_dpad(&mut self) {
        let pad = self.layout.dpad.clone();
        for (dir, r) in pad {
            let arrow = match dir {
                Direction::Up => "▲",
                Direction::Down => "▼",
                Direction::Left => "◀",
                Direction::Right => "▶",
            };
            self.front.fill(r, OVERLAY_BG);
            self.front.put_centered(r.col + r.w / 2, r.row, arrow, HEAD, OVERLAY_BG);
        }
    }

    fn compose_help(&mut self, phase: Phase) {
        let help = match phase {
            Phase::Playing => " Arrows/WASD: move   P: pause   M: menu   drag or double-click on board",
            Phase::Paused => " P: resume   M: menu",
            Phase::GameOver => " Enter/R: play again   M: menu",
            Phase::Menu => "",
        };
        self.front.put_str(0, self.layout.help_row, help, DIM, BASE_BG);
    }

    fn compose_menu(&mut self, s: &GameState) {
        let l = self.layout.clone();
        let cx = l.term_w / 2;

        self.front.put_centered(cx, l.title_row, "S N A K E", HEAD, BASE_BG);
        self.front.put_centered(cx, l.title_row + 1, "edges wrap around", DIM, BASE_BG);
        let high = format!("High Score: {}", s.high_score);
        self.front.put_centered(cx, l.title_row + 3, &high, TEXT, BASE_BG);

        for (button, r) in &l.menu {
            let (label, bg, fg) = match button {
                MenuButton::Difficulty(d) if *d == s.difficulty => {
                    (format!("▶ {} ◀", d.label()), difficulty_color(*d), Color::Black)
                }
                MenuButton::Difficulty(d) => (d.label().to_string(), OVERLAY_BG, DIM),
                MenuButton::Start => ("START".to_string(), START_BTN, TEXT),
            };
            self.front.fill(*r, bg);
            self.front.put_centered(r.col + r.w / 2, r.row, &label, fg, bg);
        }

        let hint_row = l.menu.last().map(|(_, r)| r.bottom() + 2).unwrap_or(l.term_h.saturating_sub(2));
        self.front.put_centered(cx, hint_row, "↑↓: difficulty   Enter: start   Esc: quit", DIM, BASE_BG);
        self.front.put_centered(cx, hint_row + 1, "or click a button", DIM, BASE_BG);
    }

    /// Centred box over the board; returns its rect.
    fn board_box(&mut self, w: u16, h: u16) -> Rect {
        let f = self.layout.frame;
        let w = w.min(f.w);
        let h = h.min(f.h);
        let r = Rect::new(f.col + (f.w - w) / 2, f.row + (f.h - h) / 2, w, h);
        self.front.fill(r, OVERLAY_BG);
        r
    }

    fn compose_pause_overlay(&mut self, anim: u64) {
        let r = self.board_box(30, 5);
        let cx = r.col + r.w / 2;
        let label = if (anim / 8) % 2 == 0 { "▶  PAUSED  ◀" } else { "   PAUSED   " };
        self.front.put_centered(cx, r.row + 1, label, STAR, OVERLAY_BG);
        self.front.put_centered(cx, r.row + 3, "P resume   M menu", DIM, OVERLAY_BG);
    }

    fn compose_game_over(&mut self, s: &GameState) {
        let r = self.board_box(34, 8);
        let cx = r.col + r.w / 2;
        self.front.put_centered(cx, r.row + 1, "GAME OVER", FOOD_COLOR, OVERLAY_BG);
        let score = format!("Score: {}", s.score);
        self.front.put_centered(cx, r.row + 3, &score, TEXT, OVERLAY_BG);
        if s.is_new_high_score() {
            self.front.put_centered(cx, r.row + 4, "New High Score!", STAR, OVERLAY_BG);
        }
        self.front.put_centered(cx, r.row + 6, "Enter: play again   M: menu", DIM, OVERLAY_BG);
    }

    fn compose_too_small(&mut self) {
        let (w, h) = self.layout.required_size();
        let msg = format!("Terminal too small: need {}x{}", w, h);
        let cx = self.layout.term_w / 2;
        let cy = self.layout.term_h / 2;
        self.front.put_centered(cx, cy, &msg, POWERUP_COLOR, BASE_BG);
        self.front.put_centered(cx, cy + 1, "P: pause   M: menu", DIM, BASE_BG);
    }
}
