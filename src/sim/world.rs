/// WorldState: the complete state of a running game.
///
/// One value owns everything a tick touches: the loaded level (grid, goal,
/// coins, enemies), the player, progression counters and the flyer RNG.
/// Nothing is global, so any number of worlds can run side by side.
///
/// ## Level lifecycle
///
/// `level` is `None` only in `Mode::Loading`. Every load (new run, life
/// lost, next stage) parses the `LevelDef` again and replaces `level` and
/// `player` wholesale; no entity survives a load.
///
/// ## Camera
///
/// Horizontal only. The player's centre is kept at 35% of the viewport
/// width, clamped to the level's pixel bounds.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::config::{GameConfig, SimConfig};
use crate::domain::entity::Player;
use crate::sim::level::{self, Level, LevelDef};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum Mode {
    #[serde(rename = "loading")]
    Loading,
    #[serde(rename = "menu")]
    Menu,
    #[serde(rename = "playing")]
    Playing,
    #[serde(rename = "level_clear")]
    LevelClear,
    #[serde(rename = "gameover")]
    GameOver,
    #[serde(rename = "victory")]
    Victory,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Loading => "loading",
            Mode::Menu => "menu",
            Mode::Playing => "playing",
            Mode::LevelClear => "level_clear",
            Mode::GameOver => "gameover",
            Mode::Victory => "victory",
        }
    }

    /// Does a start/retry request do anything here?
    pub fn accepts_start(&self) -> bool {
        matches!(self, Mode::Menu | Mode::GameOver | Mode::Victory)
    }
}

/// Fraction of the viewport left of the player's centre.
const CAMERA_FOCUS: f64 = 0.35;

/// Camera: left edge of the viewport in world pixels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Camera {
    pub x: f64,
    /// Viewport width in world pixels.
    pub view_w: f64,
}

impl Camera {
    pub fn new(view_w: f64) -> Self {
        Camera { x: 0.0, view_w }
    }

    /// Track `focus_x` inside a world `world_w` pixels wide.
    pub fn follow(&mut self, focus_x: f64, world_w: f64) {
        let target = focus_x - self.view_w * CAMERA_FOCUS;
        let max_x = (world_w - self.view_w).max(0.0);
        self.x = target.max(0.0).min(max_x);
    }
}

pub struct WorldState {
    // ── Config ──
    pub config: SimConfig,

    // ── Level set ──
    pub levels: Vec<LevelDef>,
    pub level_index: usize,
    pub level: Option<Level>,

    // ── Entities ──
    pub player: Player,

    // ── Progression ──
    pub mode: Mode,
    pub score: u32,
    pub lives: u32,
    /// Ticks left in `Mode::LevelClear`.
    pub level_clear_ticks: u32,

    // ── Presentation ──
    pub camera: Camera,
    /// Seconds left on the coin pickup flash.
    pub coin_flash: f64,

    // ── Meta ──
    /// Seconds of playing time in this run.
    pub elapsed: f64,
    /// Fixed ticks executed since construction.
    pub tick: u64,
    /// Flyer phase source. Seeded once; advances across loads.
    pub rng: Pcg32,
}

// ── Construction ──

impl WorldState {
    /// New world in `Mode::Loading`. Invalid definitions are dropped; an
    /// empty set falls back to the built-in levels.
    pub fn new(config: SimConfig, levels: Vec<LevelDef>, seed: u64) -> Self {
        let mut levels: Vec<LevelDef> = levels
            .into_iter()
            .filter(|def| match def.validate() {
                Ok(_) => true,
                Err(e) => {
                    log::warn!("dropping level: {e}");
                    false
                }
            })
            .collect();
        if levels.is_empty() {
            levels = level::builtin_levels();
        }

        WorldState {
            lives: config.rules.starting_lives,
            camera: Camera::new(config.viewport_width),
            config,
            levels,
            level_index: 0,
            level: None,
            player: Player::new(0.0, 0.0),
            mode: Mode::Loading,
            score: 0,
            level_clear_ticks: 0,
            coin_flash: 0.0,
            elapsed: 0.0,
            tick: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// World for a full game config: custom levels directory or built-ins.
    pub fn from_config(config: &GameConfig) -> Self {
        WorldState::new(config.sim.clone(), level::resolve_levels(config), config.seed)
    }
}

// ── Queries ──

impl WorldState {
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_last_level(&self) -> bool {
        self.level_index + 1 >= self.levels.len()
    }

    pub fn level_name(&self) -> &str {
        self.level.as_ref().map_or("", |l| l.name.as_str())
    }

    pub fn enemies_remaining(&self) -> usize {
        self.level.as_ref().map_or(0, |l| l.enemies.iter().filter(|e| e.alive).count())
    }

    pub fn coins_remaining(&self) -> usize {
        self.level.as_ref().map_or(0, |l| l.coins.iter().filter(|c| !c.taken).count())
    }

    pub fn goal_unlocked(&self) -> bool {
        self.level.as_ref().is_some_and(|l| l.goal_unlocked)
    }

    /// Recenter the camera on the player.
    pub fn update_camera(&mut self) {
        if let Some(level) = &self.level {
            let focus = self.player.body.x + self.player.body.w * 0.5;
            self.camera.follow(focus, level.pixel_width());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_keeps_player_at_focus() {
        let mut cam = Camera::new(1280.0);
        cam.follow(1000.0, 4096.0);
        assert!((cam.x - 552.0).abs() < 1e-9);
    }

    #[test]
    fn camera_clamps_to_world() {
        let mut cam = Camera::new(1280.0);
        cam.follow(100.0, 4096.0);
        assert_eq!(cam.x, 0.0);
        cam.follow(4000.0, 4096.0);
        assert_eq!(cam.x, 4096.0 - 1280.0);
        // Narrow level: pinned at zero.
        cam.follow(500.0, 640.0);
        assert_eq!(cam.x, 0.0);
    }

    #[test]
    fn new_world_is_loading_with_full_lives() {
        let w = WorldState::new(SimConfig::default(), level::builtin_levels(), 1);
        assert_eq!(w.mode, Mode::Loading);
        assert_eq!(w.lives, 3);
        assert!(w.level.is_none());
        assert_eq!(w.level_name(), "");
        assert_eq!(w.enemies_remaining(), 0);
        assert_eq!(w.level_count(), 3);
    }

    #[test]
    fn invalid_levels_are_dropped() {
        let defs = vec![
            LevelDef::new("ok", &["..", "##"]),
            LevelDef::new("bad", &["..", "#"]),
        ];
        let w = WorldState::new(SimConfig::default(), defs, 1);
        assert_eq!(w.level_count(), 1);
        assert_eq!(w.levels[0].name, "ok");
    }

    #[test]
    fn empty_level_set_uses_builtins() {
        let w = WorldState::new(SimConfig::default(), vec![], 1);
        assert_eq!(w.levels[0].name, "Neon Meadows");
    }

    #[test]
    fn mode_names() {
        assert_eq!(Mode::GameOver.as_str(), "gameover");
        assert_eq!(serde_json::to_string(&Mode::LevelClear).unwrap(), "\"level_clear\"");
        assert!(Mode::Victory.accepts_start());
        assert!(!Mode::Playing.accepts_start());
    }
}
