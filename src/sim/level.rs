/// Level definitions, parsing and loading.
///
/// ## Sources (priority order):
///   1. `levels/` directory (individual `.txt` files, filename order)
///   2. Built-in embedded levels
///
/// ## Single-level format (`.txt`):
///   Line 1: `# Level Name`
///   Lines: map rows (all the same width)
///
/// ## Tile legend:
///   '.' = Empty                 '#' = Solid
///   'S' = Player spawn          'G' = Goal flag
///   'C' = Coin                  'E' = Blob
///   'B' = Beetle                'F' = Flyer
///
/// Any other symbol is empty space. A missing `S` or `G` falls back to a
/// fixed default position so the level stays playable.

use std::f64::consts::TAU;
use std::path::Path;

use rand::Rng;

use crate::config::GameConfig;
use crate::consts::TILE;
use crate::domain::entity::{Coin, Enemy};
use crate::domain::rect::Rect;
use crate::domain::tile::{Tile, TileGrid};
use crate::error::{GameError, LevelError};

pub const GOAL_W: f64 = 42.0;
pub const GOAL_H: f64 = 134.0;

/// Static level data: a name and its rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelDef {
    pub name: String,
    pub rows: Vec<String>,
}

/// A parsed, playable level. Rebuilt from its `LevelDef` on every load.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub name: String,
    pub grid: TileGrid,
    /// Player spawn, top-left of the player rectangle.
    pub spawn: (f64, f64),
    pub goal: Rect,
    pub coins: Vec<Coin>,
    pub enemies: Vec<Enemy>,
    pub goal_unlocked: bool,
}

impl Level {
    pub fn pixel_width(&self) -> f64 { self.grid.pixel_width() }

    pub fn pixel_height(&self) -> f64 { self.grid.pixel_height() }
}

// ══════════════════════════════════════════════════════════════
// Parsing
// ══════════════════════════════════════════════════════════════

impl LevelDef {
    pub fn new(name: impl Into<String>, rows: &[&str]) -> Self {
        LevelDef {
            name: name.into(),
            rows: rows.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Check the rows form a rectangle. Returns (width, height) in tiles.
    pub fn validate(&self) -> Result<(usize, usize), LevelError> {
        let first = self.rows.first().ok_or_else(|| LevelError::Empty(self.name.clone()))?;
        let width = first.chars().count();
        if width == 0 {
            return Err(LevelError::Empty(self.name.clone()));
        }
        for (row, text) in self.rows.iter().enumerate() {
            let found = text.chars().count();
            if found != width {
                return Err(LevelError::RaggedRow {
                    name: self.name.clone(),
                    row,
                    expected: width,
                    found,
                });
            }
        }
        Ok((width, self.rows.len()))
    }

    /// Build a fresh `Level`. Single pass, left to right, top to bottom;
    /// flyer phases are drawn from `rng` in that order.
    pub fn parse<R: Rng>(&self, rng: &mut R) -> Result<Level, LevelError> {
        let (width, height) = self.validate()?;

        let mut tiles = vec![vec![Tile::Empty; width]; height];
        let mut spawn = (2.0 * TILE, 5.0 * TILE);
        let mut goal = Rect::new((width as f64 - 4.0) * TILE, 6.0 * TILE, GOAL_W, GOAL_H);
        let mut coins = vec![];
        let mut enemies = vec![];

        for (ty, row) in self.rows.iter().enumerate() {
            for (tx, ch) in row.chars().enumerate() {
                let (px, py) = (tx as f64 * TILE, ty as f64 * TILE);
                match ch {
                    '#' => tiles[ty][tx] = Tile::Solid,
                    'S' => spawn = (px + 6.0, py - 14.0),
                    'G' => goal = Rect::new(px + 16.0, py - 42.0, GOAL_W, GOAL_H),
                    'C' => coins.push(Coin::at_tile(tx, ty)),
                    'E' => enemies.push(Enemy::blob(tx, ty)),
                    'B' => enemies.push(Enemy::beetle(tx, ty)),
                    'F' => enemies.push(Enemy::flyer(tx, ty, rng.random_range(0.0..TAU))),
                    _ => {}
                }
            }
        }

        Ok(Level {
            name: self.name.clone(),
            grid: TileGrid::new(tiles),
            spawn,
            goal,
            coins,
            enemies,
            goal_unlocked: false,
        })
    }
}

// ══════════════════════════════════════════════════════════════
// Level sources
// ══════════════════════════════════════════════════════════════

/// Levels for this run: the custom directory if it holds at least one
/// valid level, the built-ins otherwise.
pub fn resolve_levels(config: &GameConfig) -> Vec<LevelDef> {
    let dir = &config.levels_dir;
    if dir.is_dir() {
        match load_from_directory(dir) {
            Ok(levels) if !levels.is_empty() => {
                log::info!("Loaded {} levels from {}", levels.len(), dir.display());
                return levels;
            }
            Ok(_) => log::warn!("no usable levels in {}; using built-in levels", dir.display()),
            Err(e) => log::warn!("{e}; using built-in levels"),
        }
    }
    builtin_levels()
}

/// Load every valid `.txt` level in `dir`, sorted by filename.
/// Files that fail to read or validate are skipped with a warning.
pub fn load_from_directory(dir: &Path) -> Result<Vec<LevelDef>, GameError> {
    let entries = std::fs::read_dir(dir).map_err(|source| GameError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<_> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|e| e == "txt"))
        .collect();
    paths.sort();

    let mut levels = vec![];
    for path in paths {
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
                continue;
            }
        };
        let fallback = path.file_stem().unwrap_or_default().to_string_lossy().to_string();
        let def = parse_level_file(&content, &fallback);
        match def.validate() {
            Ok(_) => levels.push(def),
            Err(e) => log::warn!("skipping {}: {e}", path.display()),
        }
    }
    Ok(levels)
}

/// Parse a single level from text content. The name comes from a leading
/// `# Name` line, or `fallback_name` when there is none. Blank lines are
/// ignored.
pub fn parse_level_file(content: &str, fallback_name: &str) -> LevelDef {
    let mut name = String::new();
    let mut rows = vec![];

    for line in content.lines() {
        let line = line.trim_end();
        if line.is_empty() { continue; }
        if name.is_empty() && rows.is_empty() && is_name_line(line) {
            name = line[1..].trim().to_string();
        } else {
            rows.push(line.to_string());
        }
    }

    if name.is_empty() {
        name = fallback_name.to_string();
    }

    LevelDef { name, rows }
}

/// Symbols a map row may contain.
const LEGEND: &str = ".#SGCEBF";

/// Distinguish `# Level Name` from a wall row such as `#S...G#`.
/// A name line starts with `#` and has a character outside the legend.
fn is_name_line(line: &str) -> bool {
    line.starts_with('#') && line[1..].chars().any(|c| !LEGEND.contains(c))
}

// ══════════════════════════════════════════════════════════════
// Embedded levels
// ══════════════════════════════════════════════════════════════

pub fn builtin_levels() -> Vec<LevelDef> {
    vec![
        LevelDef::new("Neon Meadows", &[
            "................................................................",
            "................................................................",
            "................................................................",
            ".........................................................G......",
            "...........................................###..................",
            "...............................C................................",
            ".....................####......................F................",
            ".........C...........................................###....B...",
            "....S...........#####..........E................................",
            "..######....................................C...................",
            ".....................#######..............................C.....",
            "################################################################",
        ]),
        LevelDef::new("Cloud Foundry", &[
            "................................................................",
            "................................................................",
            "................................................................",
            "..........................................................G.....",
            "..............................................###...............",
            "............................C............................F......",
            "..............#####.....................E...........B...........",
            ".................................####...............C...........",
            "..S............E..........................####..................",
            "..######...................C....................................",
            "..................#######.....................E..........B...C..",
            "################################################################",
        ]),
        LevelDef::new("Skyline Citadel", &[
            "................................................................",
            "................................................................",
            "................................................................",
            "............................................................G.F.",
            ".........................................###..............B.....",
            "......................C.........................................",
            ".............####...................E.............F....####.....",
            "...............................................C...........B....",
            "..S.........E.........####.....E..............................F.",
            "..######.........................#####......................C...",
            "......................#######.....................E.......B.....",
            "################################################################",
        ]),
    ]
}
