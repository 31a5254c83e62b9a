/// Debug control surface.
///
/// Direct state mutations for testing, applied between ticks. None of
/// them runs a simulated tick; the next `step` sees their result. All are
/// no-ops while no level is loaded.

use super::event::GameEvent;
use super::progression;
use super::world::WorldState;

/// Spend a life exactly as enemy contact would. Only acts while playing.
pub fn force_lose_life(world: &mut WorldState) -> Vec<GameEvent> {
    let mut events = vec![];
    progression::lose_life(world, &mut events);
    events
}

/// Mark every coin taken. The goal flag is recomputed on the next tick.
pub fn clear_coins(world: &mut WorldState) {
    if let Some(level) = world.level.as_mut() {
        for coin in &mut level.coins {
            coin.taken = true;
        }
    }
}

/// Kill every enemy and open the goal immediately.
pub fn clear_enemies(world: &mut WorldState) {
    if let Some(level) = world.level.as_mut() {
        for e in &mut level.enemies {
            e.alive = false;
            e.hp = 0;
        }
        level.goal_unlocked = true;
    }
}

/// Move the player's top-left corner onto the goal's. Velocity is kept.
pub fn warp_to_goal(world: &mut WorldState) {
    if let Some(level) = world.level.as_ref() {
        world.player.body.x = level.goal.x;
        world.player.body.y = level.goal.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::level::builtin_levels;
    use crate::sim::world::Mode;

    fn playing() -> WorldState {
        let mut w = WorldState::new(SimConfig::default(), builtin_levels(), 2);
        progression::boot(&mut w);
        progression::start_game(&mut w, &mut vec![]);
        w
    }

    #[test]
    fn clears_are_noops_while_loading() {
        let mut w = WorldState::new(SimConfig::default(), builtin_levels(), 2);
        clear_coins(&mut w);
        clear_enemies(&mut w);
        warp_to_goal(&mut w);
        assert!(force_lose_life(&mut w).is_empty());
        assert_eq!(w.mode, Mode::Loading);
    }

    #[test]
    fn clear_enemies_unlocks_goal_at_once() {
        let mut w = playing();
        clear_enemies(&mut w);
        assert_eq!(w.enemies_remaining(), 0);
        assert!(w.goal_unlocked());
        let level = w.level.as_ref().unwrap();
        assert!(level.enemies.iter().all(|e| e.hp == 0));
    }

    #[test]
    fn clear_coins_leaves_goal_flag_for_next_tick() {
        let mut w = playing();
        clear_coins(&mut w);
        assert_eq!(w.coins_remaining(), 0);
        assert!(!w.goal_unlocked());
    }

    #[test]
    fn warp_moves_player_onto_goal() {
        let mut w = playing();
        w.player.body.vx = 12.0;
        warp_to_goal(&mut w);
        let goal = w.level.as_ref().unwrap().goal;
        assert_eq!((w.player.body.x, w.player.body.y), (goal.x, goal.y));
        assert_eq!(w.player.body.vx, 12.0);
    }

    #[test]
    fn forced_life_loss() {
        let mut w = playing();
        let events = force_lose_life(&mut w);
        assert_eq!(w.lives, 2);
        assert!(events.contains(&GameEvent::LifeLost { lives_left: 2 }));
    }
}
