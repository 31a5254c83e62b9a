/// Progression state machine.
///
/// ```text
///   loading ──boot──▶ menu ──start──▶ playing ──goal──▶ level_clear
///                                       │  ▲                │ timer
///                          life lost,   │  └── next level ◀─┤
///                          lives == 0   ▼                   ▼ last level
///                                    gameover            victory
///                                       └──── start ───────┘──▶ playing (level 1)
/// ```
///
/// The level-clear timer is the only automatic transition. Everything else
/// is triggered by an interaction outcome or an explicit start request.

use crate::domain::entity::Player;

use super::event::GameEvent;
use super::world::{Mode, WorldState};

/// Leave `Mode::Loading`: pre-load level 1 for display and wait in the menu.
pub fn boot(world: &mut WorldState) {
    if world.mode != Mode::Loading { return; }
    let mut events = vec![];
    if load_level(world, 0, &mut events) {
        world.mode = Mode::Menu;
        log::info!("{} levels ready", world.level_count());
    }
}

/// Start a fresh run from level 1. Accepted in menu, gameover and victory;
/// returns whether anything happened.
pub fn start_game(world: &mut WorldState, events: &mut Vec<GameEvent>) -> bool {
    if !world.mode.accepts_start() { return false; }
    world.score = 0;
    world.lives = world.config.rules.starting_lives;
    world.elapsed = 0.0;
    if !load_level(world, 0, events) { return false; }
    world.mode = Mode::Playing;
    log::info!("new run started");
    true
}

/// Replace the level and player with fresh copies of level `index`.
/// Score and lives are untouched. Returns false if the definition is
/// missing or unparseable, leaving the world as it was.
pub fn load_level(world: &mut WorldState, index: usize, events: &mut Vec<GameEvent>) -> bool {
    let Some(def) = world.levels.get(index) else {
        log::error!("no level at index {index}");
        return false;
    };
    let level = match def.parse(&mut world.rng) {
        Ok(level) => level,
        Err(e) => {
            log::error!("{e}");
            return false;
        }
    };

    log::info!("Level {} loaded: {}", index + 1, level.name);
    world.player = Player::new(level.spawn.0, level.spawn.1);
    world.level = Some(level);
    world.level_index = index;
    world.level_clear_ticks = 0;
    world.coin_flash = 0.0;
    world.camera.x = 0.0;
    world.mode = Mode::Playing;
    events.push(GameEvent::LevelLoaded { level: index + 1 });
    true
}

/// Spend a life. Only acts while playing. Zero lives ends the run;
/// otherwise the current level restarts from its definition.
pub fn lose_life(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.mode != Mode::Playing { return; }
    world.lives = world.lives.saturating_sub(1);
    events.push(GameEvent::LifeLost { lives_left: world.lives });
    log::debug!("life lost, {} left", world.lives);

    if world.lives == 0 {
        world.mode = Mode::GameOver;
        events.push(GameEvent::GameOver { score: world.score });
        log::info!("Game over on level {} with score {}", world.level_index + 1, world.score);
        return;
    }
    let index = world.level_index;
    load_level(world, index, events);
}

/// Goal reached while unlocked: bonus, then a fixed pause.
pub fn begin_level_clear(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.mode != Mode::Playing { return; }
    world.mode = Mode::LevelClear;
    world.level_clear_ticks = world.config.rules.level_clear_ticks;
    world.score += world.config.rules.level_clear_bonus;
    events.push(GameEvent::LevelCleared { level: world.level_index + 1 });
    log::info!("Level {} cleared, score {}", world.level_index + 1, world.score);
}

/// One tick of the level-clear pause.
pub fn tick_level_clear(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.mode != Mode::LevelClear { return; }
    world.level_clear_ticks = world.level_clear_ticks.saturating_sub(1);
    if world.level_clear_ticks == 0 {
        win_level(world, events);
    }
}

/// Advance to the next level, or finish the run after the last one.
pub fn win_level(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.is_last_level() {
        world.score += world.config.rules.victory_bonus;
        world.mode = Mode::Victory;
        events.push(GameEvent::Victory { score: world.score });
        log::info!("Victory! Final score {}", world.score);
        return;
    }
    let next = world.level_index + 1;
    load_level(world, next, events);
}
