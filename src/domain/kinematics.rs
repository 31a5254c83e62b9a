/// Player kinematics for one fixed step.
///
/// Sequence:
///   1. horizontal velocity from the input axis (no acceleration curve)
///   2. consume the queued jump (applies only when grounded)
///   3. gravity, then the two-phase collision sweep
///   4. off-level check between vertical integration and resolution
///   5. invulnerability and run-clock timers

use crate::config::PhysicsConfig;

use super::entity::{Facing, FrameInput, Player};
use super::physics;
use super::tile::TileGrid;

/// What happened to the player this step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerStep {
    pub jumped: bool,
    /// Dropped below the level; the caller must end the attempt.
    pub fell: bool,
}

/// Advance the player by `dt`. The jump request in `input` is always
/// cleared, whether or not it produced a jump.
pub fn step_player(
    player: &mut Player,
    input: &mut FrameInput,
    grid: &TileGrid,
    phys: &PhysicsConfig,
    dt: f64,
) -> PlayerStep {
    let mut out = PlayerStep::default();
    let axis = input.axis();

    player.body.vx = axis * phys.player_speed;
    if axis < 0.0 {
        player.facing = Facing::Left;
    } else if axis > 0.0 {
        player.facing = Facing::Right;
    }

    if input.jump && player.body.on_ground {
        player.body.vy = -phys.jump_velocity;
        player.body.on_ground = false;
        out.jumped = true;
    }
    input.jump = false;

    player.body.vy += phys.gravity * dt;

    physics::move_horizontal(&mut player.body, grid, dt);
    physics::integrate_vertical(&mut player.body, dt);
    if physics::below_world(&player.body, grid, phys.player_fall_margin) {
        out.fell = true;
        return out;
    }
    physics::resolve_vertical(&mut player.body, grid);

    player.invuln = (player.invuln - dt).max(0.0);
    player.run_clock += dt;
    out
}
