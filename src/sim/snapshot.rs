/// State introspection: a serializable, read-only view of the world.
///
/// Numbers are copied as-is, never rounded. Only living enemies and
/// untaken coins are listed. Coordinates are world pixels, origin
/// top-left, +x right, +y down.

use serde::Serialize;

use crate::consts::FIXED_DT;
use crate::domain::entity::Facing;

use super::world::{Mode, WorldState};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub mode: Mode,
    /// 1-based.
    pub level: usize,
    pub level_name: String,
    pub lives: u32,
    pub score: u32,
    pub camera_x: f64,
    pub player: PlayerView,
    pub goal: GoalView,
    pub goal_unlocked: bool,
    /// Seconds left in the level-clear pause.
    pub level_clear_timer: f64,
    pub enemies: Vec<EnemyView>,
    pub enemies_remaining: usize,
    pub coins: Vec<CoinView>,
    pub coins_remaining: usize,
    pub tick: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerView {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub on_ground: bool,
    pub facing: Facing,
    pub invuln: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GoalView {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnemyView {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub hp: u32,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoinView {
    pub x: f64,
    pub y: f64,
}

/// Build a snapshot. Safe in every mode, including `loading`.
pub fn capture(world: &WorldState) -> Snapshot {
    let p = &world.player;
    let level = world.level.as_ref();

    let enemies: Vec<EnemyView> = level
        .map(|l| {
            l.enemies.iter()
                .filter(|e| e.alive)
                .map(|e| EnemyView {
                    kind: e.kind.name(),
                    hp: e.hp,
                    x: e.body.x,
                    y: e.body.y,
                    vx: e.body.vx,
                    vy: e.body.vy,
                })
                .collect()
        })
        .unwrap_or_default();

    let coins: Vec<CoinView> = level
        .map(|l| {
            l.coins.iter()
                .filter(|c| !c.taken)
                .map(|c| CoinView { x: c.rect.x, y: c.rect.y })
                .collect()
        })
        .unwrap_or_default();

    let goal = level
        .map(|l| GoalView { x: l.goal.x, y: l.goal.y, w: l.goal.w, h: l.goal.h })
        .unwrap_or_default();

    Snapshot {
        mode: world.mode,
        level: world.level_index + 1,
        level_name: world.level_name().to_string(),
        lives: world.lives,
        score: world.score,
        camera_x: world.camera.x,
        player: PlayerView {
            x: p.body.x,
            y: p.body.y,
            vx: p.body.vx,
            vy: p.body.vy,
            on_ground: p.body.on_ground,
            facing: p.facing,
            invuln: p.invuln,
        },
        goal,
        goal_unlocked: world.goal_unlocked(),
        level_clear_timer: world.level_clear_ticks as f64 * FIXED_DT,
        enemies_remaining: enemies.len(),
        enemies,
        coins_remaining: coins.len(),
        coins,
        tick: world.tick,
    }
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::level::builtin_levels;
    use crate::sim::progression;

    #[test]
    fn loading_snapshot_is_empty() {
        let w = WorldState::new(SimConfig::default(), builtin_levels(), 1);
        let s = capture(&w);
        assert_eq!(s.mode, Mode::Loading);
        assert_eq!(s.level, 1);
        assert!(s.enemies.is_empty());
        assert_eq!(s.goal, GoalView::default());
    }

    #[test]
    fn menu_snapshot_shows_first_level() {
        let mut w = WorldState::new(SimConfig::default(), builtin_levels(), 1);
        progression::boot(&mut w);
        let s = capture(&w);
        assert_eq!(s.mode, Mode::Menu);
        assert_eq!(s.level_name, "Neon Meadows");
        assert_eq!(s.coins_remaining, 4);
        assert_eq!(s.enemies_remaining, 3);
        assert_eq!(s.player.x, 4.0 * 64.0 + 6.0);
        assert_eq!(s.player.y, 8.0 * 64.0 - 14.0);
        assert_eq!(s.goal.x, 57.0 * 64.0 + 16.0);
        assert!(!s.goal_unlocked);
    }

    #[test]
    fn json_field_names() {
        let mut w = WorldState::new(SimConfig::default(), builtin_levels(), 1);
        progression::boot(&mut w);
        let json: serde_json::Value = serde_json::from_str(&capture(&w).to_json().unwrap()).unwrap();
        assert_eq!(json["mode"], "menu");
        assert_eq!(json["level"], 1);
        assert_eq!(json["enemies"][0]["type"], "flyer");
        assert_eq!(json["player"]["on_ground"], false);
        assert_eq!(json["player"]["facing"], "right");
        assert!(json["coins"].is_array());
    }
}
