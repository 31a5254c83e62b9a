/// The step function: advances the world by one fixed tick.
///
/// Processing order while playing:
///   1. Player kinematics (input, gravity, collision, fall-out check)
///   2. Enemy AI
///   3. Interactions (coins, stomps, damage, goal)
///   4. Progression (life loss or level clear)
///   5. Camera
///
/// A life loss in step 1 or 3 ends the tick right after the level reload;
/// the fresh level is first simulated on the next tick.
///
/// In `level_clear` only the pause timer runs. Every other mode is inert.

use crate::consts::FIXED_DT;
use crate::domain::ai;
use crate::domain::entity::FrameInput;
use crate::domain::kinematics;
use crate::domain::rules;
use super::event::GameEvent;
use super::progression;
use super::world::{Mode, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

/// Run one tick. A queued jump in `input` is consumed by the player update,
/// and discarded in any mode that does not simulate the player.
pub fn step(world: &mut WorldState, input: &mut FrameInput) -> Vec<GameEvent> {
    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    match world.mode {
        Mode::Playing => {
            if resolve_player(world, input, &mut events) { return events; }
            resolve_enemies(world);
            if resolve_interactions(world, &mut events) { return events; }
            world.update_camera();
        }
        Mode::LevelClear => {
            input.jump = false;
            progression::tick_level_clear(world, &mut events);
        }
        _ => input.jump = false,
    }

    events
}

// ══════════════════════════════════════════════════════════════
// Phases
// ══════════════════════════════════════════════════════════════

/// Move the player. Returns true if the attempt ended.
fn resolve_player(world: &mut WorldState, input: &mut FrameInput, events: &mut Vec<GameEvent>) -> bool {
    let Some(level) = world.level.as_ref() else { return true; };
    world.elapsed += FIXED_DT;
    world.coin_flash = (world.coin_flash - FIXED_DT).max(0.0);

    let moved = kinematics::step_player(&mut world.player, input, &level.grid, &world.config.physics, FIXED_DT);
    if moved.jumped {
        events.push(GameEvent::Jumped);
    }
    if moved.fell {
        events.push(GameEvent::PlayerFell);
        progression::lose_life(world, events);
        return true;
    }
    false
}

fn resolve_enemies(world: &mut WorldState) {
    if let Some(level) = world.level.as_mut() {
        ai::update_enemies(&mut level.enemies, &level.grid, &world.config.physics, FIXED_DT);
    }
}

/// Coins, enemy contact and goal. Returns true if the tick must stop
/// (life lost or level cleared).
fn resolve_interactions(world: &mut WorldState, events: &mut Vec<GameEvent>) -> bool {
    let Some(level) = world.level.as_mut() else { return true; };
    let rules_cfg = &world.config.rules;

    let out = rules::resolve_interactions(
        &mut world.player,
        &mut level.enemies,
        &mut level.coins,
        &level.goal,
        rules_cfg,
    );

    world.score += out.points;
    if !out.coins.is_empty() {
        world.coin_flash = rules_cfg.coin_flash_secs;
    }
    for &index in &out.coins {
        events.push(GameEvent::CoinCollected { index });
    }
    for stomp in &out.stomps {
        let kind = stomp.kind.name();
        log::debug!("stomped {kind} #{} for {}", stomp.enemy, stomp.points);
        events.push(GameEvent::EnemyStomped { index: stomp.enemy, kind });
        if stomp.defeated {
            events.push(GameEvent::EnemyDefeated { index: stomp.enemy, kind });
        }
    }

    if out.damaged {
        events.push(GameEvent::PlayerDamaged);
        progression::lose_life(world, events);
        return true;
    }

    if out.goal_unlocked && !level.goal_unlocked {
        events.push(GameEvent::GoalUnlocked);
    }
    level.goal_unlocked = out.goal_unlocked;

    if out.goal_reached {
        progression::begin_level_clear(world, events);
        return true;
    }
    false
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
