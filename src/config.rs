/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::consts::FIXED_DT;

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub sim: SimConfig,
    pub levels_dir: PathBuf,
    pub seed: u64,
}

/// Everything the simulation reads while ticking.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub physics: PhysicsConfig,
    pub rules: RulesConfig,
    /// Width in pixels of the external viewport the camera tracks for.
    pub viewport_width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    pub gravity: f64,
    pub player_speed: f64,
    pub jump_velocity: f64,
    pub max_frame_delta: f64,
    pub player_fall_margin: f64,
    pub enemy_fall_margin: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RulesConfig {
    pub starting_lives: u32,
    pub coin_points: u32,
    pub blob_points: u32,
    pub beetle_points: u32,
    pub flyer_points: u32,
    pub level_clear_bonus: u32,
    pub victory_bonus: u32,
    pub stomp_min_fall_speed: f64,
    pub stomp_max_depth: f64,
    pub stomp_bounce: f64,
    pub invulnerability_secs: f64,
    pub coin_flash_secs: f64,
    /// Length of the level-clear pause, in fixed ticks.
    pub level_clear_ticks: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: default_gravity(),
            player_speed: default_player_speed(),
            jump_velocity: default_jump_velocity(),
            max_frame_delta: default_max_frame_delta(),
            player_fall_margin: default_player_fall_margin(),
            enemy_fall_margin: default_enemy_fall_margin(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            starting_lives: default_starting_lives(),
            coin_points: default_coin_points(),
            blob_points: default_blob_points(),
            beetle_points: default_beetle_points(),
            flyer_points: default_flyer_points(),
            level_clear_bonus: default_level_clear_bonus(),
            victory_bonus: default_victory_bonus(),
            stomp_min_fall_speed: default_stomp_min_fall_speed(),
            stomp_max_depth: default_stomp_max_depth(),
            stomp_bounce: default_stomp_bounce(),
            invulnerability_secs: default_invulnerability_secs(),
            coin_flash_secs: default_coin_flash_secs(),
            level_clear_ticks: secs_to_ticks(default_level_clear_secs()),
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            physics: PhysicsConfig::default(),
            rules: RulesConfig::default(),
            viewport_width: default_viewport_width(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            sim: SimConfig::default(),
            levels_dir: PathBuf::from(default_levels_dir()),
            seed: default_seed(),
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_gravity")]
    gravity: f64,
    #[serde(default = "default_player_speed")]
    player_speed: f64,
    #[serde(default = "default_jump_velocity")]
    jump_velocity: f64,
    #[serde(default = "default_max_frame_delta")]
    max_frame_delta: f64,
    #[serde(default = "default_player_fall_margin")]
    player_fall_margin: f64,
    #[serde(default = "default_enemy_fall_margin")]
    enemy_fall_margin: f64,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_starting_lives")]
    starting_lives: u32,
    #[serde(default = "default_coin_points")]
    coin_points: u32,
    #[serde(default = "default_blob_points")]
    blob_points: u32,
    #[serde(default = "default_beetle_points")]
    beetle_points: u32,
    #[serde(default = "default_flyer_points")]
    flyer_points: u32,
    #[serde(default = "default_level_clear_bonus")]
    level_clear_bonus: u32,
    #[serde(default = "default_victory_bonus")]
    victory_bonus: u32,
    #[serde(default = "default_stomp_min_fall_speed")]
    stomp_min_fall_speed: f64,
    #[serde(default = "default_stomp_max_depth")]
    stomp_max_depth: f64,
    #[serde(default = "default_stomp_bounce")]
    stomp_bounce: f64,
    #[serde(default = "default_invulnerability_secs")]
    invulnerability_secs: f64,
    #[serde(default = "default_coin_flash_secs")]
    coin_flash_secs: f64,
    #[serde(default = "default_level_clear_secs")]
    level_clear_secs: f64,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
    #[serde(default = "default_seed")]
    seed: u64,
    #[serde(default = "default_viewport_width")]
    viewport_width: f64,
}

// ── Defaults ──

fn default_gravity() -> f64 { 2100.0 }
fn default_player_speed() -> f64 { 360.0 }
fn default_jump_velocity() -> f64 { 1040.0 }
fn default_max_frame_delta() -> f64 { 0.05 }
fn default_player_fall_margin() -> f64 { 220.0 }
fn default_enemy_fall_margin() -> f64 { 240.0 }

fn default_starting_lives() -> u32 { 3 }
fn default_coin_points() -> u32 { 100 }
fn default_blob_points() -> u32 { 250 }
fn default_beetle_points() -> u32 { 350 }
fn default_flyer_points() -> u32 { 300 }
fn default_level_clear_bonus() -> u32 { 500 }
fn default_victory_bonus() -> u32 { 1000 }
fn default_stomp_min_fall_speed() -> f64 { 180.0 }
fn default_stomp_max_depth() -> f64 { 24.0 }
fn default_stomp_bounce() -> f64 { 620.0 }
fn default_invulnerability_secs() -> f64 { 1.0 }
fn default_coin_flash_secs() -> f64 { 0.08 }
fn default_level_clear_secs() -> f64 { 1.25 }  // 75 ticks at 60 Hz

fn default_levels_dir() -> String { "levels".into() }
fn default_seed() -> u64 { 0x5eed_1e7e1 }
fn default_viewport_width() -> f64 { 1280.0 }

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            gravity: default_gravity(),
            player_speed: default_player_speed(),
            jump_velocity: default_jump_velocity(),
            max_frame_delta: default_max_frame_delta(),
            player_fall_margin: default_player_fall_margin(),
            enemy_fall_margin: default_enemy_fall_margin(),
        }
    }
}

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            starting_lives: default_starting_lives(),
            coin_points: default_coin_points(),
            blob_points: default_blob_points(),
            beetle_points: default_beetle_points(),
            flyer_points: default_flyer_points(),
            level_clear_bonus: default_level_clear_bonus(),
            victory_bonus: default_victory_bonus(),
            stomp_min_fall_speed: default_stomp_min_fall_speed(),
            stomp_max_depth: default_stomp_max_depth(),
            stomp_bounce: default_stomp_bounce(),
            invulnerability_secs: default_invulnerability_secs(),
            coin_flash_secs: default_coin_flash_secs(),
            level_clear_secs: default_level_clear_secs(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            levels_dir: default_levels_dir(),
            seed: default_seed(),
            viewport_width: default_viewport_width(),
        }
    }
}

/// Whole ticks covering `secs`, never fewer than one.
fn secs_to_ticks(secs: f64) -> u32 {
    ((secs / FIXED_DT).round() as u32).max(1)
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);

        let levels_dir_str = &toml_cfg.general.levels_dir;
        let levels_dir = if Path::new(levels_dir_str).is_absolute() {
            PathBuf::from(levels_dir_str)
        } else {
            search_dirs.iter()
                .map(|d| d.join(levels_dir_str))
                .find(|p| p.is_dir())
                .unwrap_or_else(|| PathBuf::from(levels_dir_str))
        };

        GameConfig::from_toml(toml_cfg, levels_dir)
    }

    /// Parse config text directly. Used by `load` and by tests.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        let levels_dir = PathBuf::from(&toml_cfg.general.levels_dir);
        Ok(GameConfig::from_toml(toml_cfg, levels_dir))
    }

    fn from_toml(cfg: TomlConfig, levels_dir: PathBuf) -> Self {
        GameConfig {
            sim: SimConfig {
                physics: PhysicsConfig {
                    gravity: cfg.physics.gravity,
                    player_speed: cfg.physics.player_speed,
                    jump_velocity: cfg.physics.jump_velocity,
                    max_frame_delta: cfg.physics.max_frame_delta,
                    player_fall_margin: cfg.physics.player_fall_margin,
                    enemy_fall_margin: cfg.physics.enemy_fall_margin,
                },
                rules: RulesConfig {
                    starting_lives: cfg.rules.starting_lives.max(1),
                    coin_points: cfg.rules.coin_points,
                    blob_points: cfg.rules.blob_points,
                    beetle_points: cfg.rules.beetle_points,
                    flyer_points: cfg.rules.flyer_points,
                    level_clear_bonus: cfg.rules.level_clear_bonus,
                    victory_bonus: cfg.rules.victory_bonus,
                    stomp_min_fall_speed: cfg.rules.stomp_min_fall_speed,
                    stomp_max_depth: cfg.rules.stomp_max_depth,
                    stomp_bounce: cfg.rules.stomp_bounce,
                    invulnerability_secs: cfg.rules.invulnerability_secs,
                    coin_flash_secs: cfg.rules.coin_flash_secs,
                    level_clear_ticks: secs_to_ticks(cfg.rules.level_clear_secs),
                },
                viewport_width: cfg.general.viewport_width,
            },
            levels_dir,
            seed: cfg.general.seed,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so data is found next to the real binary.
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
        if !path.exists() { continue; }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => {
                    log::info!("Loaded config from {}", path.display());
                    return cfg;
                }
                Err(e) => {
                    log::warn!("config.toml parse error: {e}; using default settings");
                    return TomlConfig::default();
                }
            },
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.sim, SimConfig::default());
        assert_eq!(cfg.levels_dir, PathBuf::from("levels"));
    }

    #[test]
    fn level_clear_defaults_to_75_ticks() {
        assert_eq!(RulesConfig::default().level_clear_ticks, 75);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse(
            "[physics]\ngravity = 1800.0\n\n[rules]\nstarting_lives = 5\nlevel_clear_secs = 2.0\n",
        ).unwrap();
        assert_eq!(cfg.sim.physics.gravity, 1800.0);
        assert_eq!(cfg.sim.physics.player_speed, 360.0);
        assert_eq!(cfg.sim.rules.starting_lives, 5);
        assert_eq!(cfg.sim.rules.level_clear_ticks, 120);
        assert_eq!(cfg.sim.rules.coin_points, 100);
    }

    #[test]
    fn zero_lives_is_clamped() {
        let cfg = GameConfig::parse("[rules]\nstarting_lives = 0\n").unwrap();
        assert_eq!(cfg.sim.rules.starting_lives, 1);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(GameConfig::parse("[physics\ngravity = ").is_err());
    }
}
