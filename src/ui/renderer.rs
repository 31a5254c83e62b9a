/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// World → screen mapping: one 64 px tile is 2 columns × 1 row, so a
/// column covers 32 px horizontally and a row 64 px vertically. Entities
/// are drawn over every cell their rectangle touches.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use skyline_run::consts::{EDGE_EPSILON, TILE};
use skyline_run::domain::entity::{EnemyKind, Facing};
use skyline_run::domain::rect::Rect;
use skyline_run::sim::world::{Camera, Mode, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 18, g: 24, b: 44 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Never equal to a real cell; forces a full repaint.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
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

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
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

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Renderer ──

/// Terminal columns per tile.
const CELL_W: usize = 2;
/// World pixels per terminal column.
const COL_PX: f64 = TILE / CELL_W as f64;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 30, b: 70 };
const SKY: Color = Color::Rgb { r: 40, g: 90, b: 150 };
const GROUND_FG: Color = Color::Rgb { r: 120, g: 200, b: 90 };
const GROUND_BG: Color = Color::Rgb { r: 70, g: 50, b: 30 };
const ACCENT: Color = Color::Rgb { r: 255, g: 210, b: 60 };
const OK_GREEN: Color = Color::Rgb { r: 80, g: 255, b: 120 };
const DANGER: Color = Color::Rgb { r: 255, g: 80, b: 80 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_mode: Option<Mode>,
    key_release: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_mode: None,
            key_release: false,
        }
    }

    /// Enter raw mode and the alternate screen. Returns whether the
    /// terminal will report key releases.
    pub fn init(&mut self) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        self.key_release = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.key_release {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
        Ok(self.key_release)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.key_release {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    /// Draw one frame. The world is only read.
    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        if self.last_mode != Some(world.mode) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_mode = Some(world.mode);
        }

        self.front.clear();
        match world.mode {
            Mode::Loading => self.front.put_str(2, 1, "Loading...", Color::White, Color::Reset),
            Mode::Menu => self.compose_menu(world),
            Mode::Playing => self.compose_game(world),
            Mode::LevelClear => {
                self.compose_game(world);
                self.compose_banner(world, "LEVEL CLEAR", OK_GREEN);
            }
            Mode::GameOver => self.compose_game_over(world),
            Mode::Victory => self.compose_victory(world),
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
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
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: play field ──

    fn compose_game(&mut self, w: &WorldState) {
        self.compose_hud(w);

        let Some(level) = w.level.as_ref() else { return; };
        let cam_col = (window_x(w, self.front.width) / COL_PX).floor() as i64;
        let view_cols = self.front.width;
        let view_rows = level.grid.height().min(self.front.height.saturating_sub(MAP_ROW + 2));

        // Tiles
        for row in 0..view_rows {
            for col in 0..view_cols {
                let wc = cam_col + col as i64;
                let tx = wc.div_euclid(CELL_W as i64) as i32;
                let solid = wc >= 0 && level.grid.is_solid(tx, row as i32);
                let cell = if !solid {
                    Cell::new(' ', Color::White, SKY)
                } else if row == 0 || !level.grid.is_solid(tx, row as i32 - 1) {
                    Cell::new('▀', GROUND_FG, GROUND_BG)
                } else {
                    Cell::new('░', Color::Rgb { r: 110, g: 80, b: 50 }, GROUND_BG)
                };
                self.front.set(col, MAP_ROW + row, cell);
            }
        }

        // Goal flag
        let goal_fg = if level.goal_unlocked { OK_GREEN } else { DANGER };
        self.stamp(cam_col, &level.goal, view_rows, '⚑', goal_fg);

        for coin in level.coins.iter().filter(|c| !c.taken) {
            self.stamp(cam_col, &coin.rect, view_rows, '●', ACCENT);
        }

        for e in level.enemies.iter().filter(|e| e.alive) {
            let (ch, fg) = match e.kind {
                EnemyKind::Blob => ('◍', Color::Rgb { r: 200, g: 90, b: 255 }),
                EnemyKind::Beetle if e.hp > 1 => ('■', Color::Rgb { r: 255, g: 140, b: 40 }),
                EnemyKind::Beetle => ('□', Color::Rgb { r: 255, g: 140, b: 40 }),
                EnemyKind::Flyer { .. } => ('▼', Color::Rgb { r: 120, g: 230, b: 255 }),
            };
            self.stamp(cam_col, &e.body.rect(), view_rows, ch, fg);
        }

        // Blink while invulnerable.
        let blink_off = w.player.is_invulnerable() && (w.tick / 6) % 2 == 0;
        if !blink_off {
            let ch = match w.player.facing {
                Facing::Left => '◀',
                Facing::Right => '▶',
            };
            self.stamp(cam_col, &w.player.body.rect(), view_rows, ch, Color::White);
        }

        let help_row = MAP_ROW + view_rows + 1;
        if help_row < self.front.height {
            let help = " ←→/AD move  Space/W jump  Esc quit  │  F9 die  F10 coins  F11 enemies  F12 warp";
            self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
        }
    }

    fn compose_hud(&mut self, w: &WorldState) {
        let goal = if w.goal_unlocked() { "GOAL OPEN" } else { "goal locked" };
        let hud = format!(
            " L{} {:<16} Score:{:<7} Lives:{}  Time:{:.1}s  Coins:{}  Enemies:{}  {} ",
            w.level_index + 1,
            w.level_name(),
            w.score,
            w.lives,
            w.elapsed,
            w.coins_remaining(),
            w.enemies_remaining(),
            goal,
        );
        let bg = if w.coin_flash > 0.0 { Color::Rgb { r: 90, g: 80, b: 20 } } else { HUD_BG };
        self.front.fill_row(HUD_ROW, bg);
        self.front.put_str(0, HUD_ROW, &hud, Color::White, bg);
    }

    /// Fill every visible cell covered by `r` with `ch`.
    fn stamp(&mut self, cam_col: i64, r: &Rect, view_rows: usize, ch: char, fg: Color) {
        let c0 = (r.x / COL_PX).floor() as i64 - cam_col;
        let c1 = ((r.x + r.w - EDGE_EPSILON) / COL_PX).floor() as i64 - cam_col;
        let r0 = (r.y / TILE).floor() as i64;
        let r1 = ((r.y + r.h - EDGE_EPSILON) / TILE).floor() as i64;

        for row in r0.max(0)..=r1.min(view_rows as i64 - 1) {
            for col in c0.max(0)..=c1.min(self.front.width as i64 - 1) {
                let (x, y) = (col as usize, MAP_ROW + row as usize);
                let bg = self.front.get(x, y).bg;
                self.front.set(x, y, Cell::new(ch, fg, bg));
            }
        }
    }

    fn compose_banner(&mut self, w: &WorldState, text: &str, fg: Color) {
        let label = format!("  {}  +{}  ", text, w.config.rules.level_clear_bonus);
        let x = self.front.width.saturating_sub(label.chars().count()) / 2;
        self.front.put_str(x, MAP_ROW + 3, &label, Color::Black, fg);
    }

    // ── Static screens ──

    fn compose_menu(&mut self, w: &WorldState) {
        let title = [
            r"  ___ _       _ _            ___           ",
            r" / __| |___  _| (_)_ _  ___  | _ \_  _ _ _  ",
            r" \__ \ / / || | | | ' \/ -_) |   / || | ' \ ",
            r" |___/_\_\\_, |_|_|_||_\___| |_|_\\_,_|_||_|",
            r"          |__/                              ",
        ];
        for (i, line) in title.iter().enumerate() {
            self.front.put_str(2, 1 + i, line, ACCENT, Color::Reset);
        }

        let pitch = format!(
            "Run, jump, collect coins, stomp enemies and reach the flag in all {} levels.",
            w.level_count(),
        );
        self.front.put_str(4, 8, &pitch, Color::White, Color::Reset);
        self.front.put_str(8, 10, "ENTER   Start Game", OK_GREEN, Color::Reset);
        self.front.put_str(8, 11, "  Q     Quit", Color::White, Color::Reset);

        let help = [
            "Controls",
            "  ←→ / A D       Move",
            "  Space / ↑ / W  Jump",
            "  Esc / Q        Quit",
            "  F9-F12         Debug: die, clear coins, clear enemies, warp",
        ];
        for (i, line) in help.iter().enumerate() {
            let color = if i == 0 { ACCENT } else { Color::DarkGrey };
            self.front.put_str(8, 13 + i, line, color, Color::Reset);
        }
    }

    fn compose_game_over(&mut self, w: &WorldState) {
        let box_art = [
            "╔══════════════════════════╗",
            "║        GAME  OVER        ║",
            "╚══════════════════════════╝",
        ];
        for (i, l) in box_art.iter().enumerate() {
            self.front.put_str(6, 4 + i, l, DANGER, Color::Reset);
        }
        let score = format!("Score {}. Try again from level 1.", w.score);
        let level = format!("Reached level {}: {}", w.level_index + 1, w.level_name());
        self.front.put_str(8, 9, &score, Color::White, Color::Reset);
        self.front.put_str(8, 10, &level, Color::White, Color::Reset);
        self.front.put_str(8, 12, "ENTER: Retry    Q: Quit", OK_GREEN, Color::Reset);
    }

    fn compose_victory(&mut self, w: &WorldState) {
        let box_art = [
            "╔══════════════════════════╗",
            "║         YOU  WIN         ║",
            "╚══════════════════════════╝",
        ];
        for (i, l) in box_art.iter().enumerate() {
            self.front.put_str(6, 4 + i, l, ACCENT, Color::Reset);
        }
        let score = format!("Amazing run. Final score {}.", w.score);
        self.front.put_str(8, 9, &score, Color::White, Color::Reset);
        self.front.put_str(8, 11, "ENTER: Play Again    Q: Quit", OK_GREEN, Color::Reset);
    }
}

/// Left edge of the drawn window, in world pixels. The world camera is
/// used as-is when `cols` covers its whole viewport; a narrower terminal
/// follows the player with a camera of its own width.
fn window_x(w: &WorldState, cols: usize) -> f64 {
    let view_px = cols as f64 * COL_PX;
    if view_px >= w.camera.view_w {
        return w.camera.x;
    }
    let Some(level) = w.level.as_ref() else { return 0.0; };
    let mut cam = Camera::new(view_px);
    cam.follow(w.player.body.x + w.player.body.w * 0.5, level.pixel_width());
    cam.x
}
