/// Enemy AI: one fixed-step update per living enemy.
///
/// Two behaviours:
///   1. **Ground patrol** (blob, beetle): gravity, tile collision, turn
///      around on wall contact and at ledges.
///   2. **Flyer**: no gravity and no tile collision. Horizontal patrol with
///      a look-ahead wall probe; vertical position is a sine around
///      `anchor_y`.
///
/// Patrol speed is constant; only the sign of `vx` carries state between
/// ticks. A stationary enemy resumes heading left.

use crate::config::PhysicsConfig;

use super::entity::{Enemy, EnemyKind};
use super::physics;
use super::tile::TileGrid;

/// Flyer bob amplitude, px.
pub const FLYER_AMPLITUDE: f64 = 28.0;
/// Flyer phase rate, rad/s.
pub const FLYER_PHASE_RATE: f64 = 4.0;
/// Horizontal gap between a flyer's leading edge and its wall probe.
const FLYER_PROBE: f64 = 2.0;
/// Horizontal gap between a walker's leading edge and its ledge probe.
const LEDGE_PROBE_X: f64 = 4.0;
/// Vertical gap below a walker's feet for the ledge probe.
const LEDGE_PROBE_Y: f64 = 1.0;

/// Update every living enemy in place.
pub fn update_enemies(enemies: &mut [Enemy], grid: &TileGrid, phys: &PhysicsConfig, dt: f64) {
    for e in enemies.iter_mut().filter(|e| e.alive) {
        update_enemy(e, grid, phys, dt);
    }
}

/// Update one enemy. Dead enemies are left untouched.
pub fn update_enemy(e: &mut Enemy, grid: &TileGrid, phys: &PhysicsConfig, dt: f64) {
    if !e.alive { return; }
    if e.kind.is_flyer() {
        fly(e, grid, dt);
    } else {
        patrol(e, grid, phys, dt);
    }
}

// ── Ground patrol ──

fn patrol(e: &mut Enemy, grid: &TileGrid, phys: &PhysicsConfig, dt: f64) {
    e.body.vx = e.direction() * e.speed;
    e.body.vy += phys.gravity * dt;

    let pre_vx = e.body.vx;
    physics::move_horizontal(&mut e.body, grid, dt);
    if pre_vx != 0.0 && e.body.vx == 0.0 {
        e.body.vx = -pre_vx;
    }

    physics::integrate_vertical(&mut e.body, dt);
    if physics::below_world(&e.body, grid, phys.enemy_fall_margin) {
        e.alive = false;
        return;
    }
    physics::resolve_vertical(&mut e.body, grid);

    if e.body.on_ground && !ground_ahead(e, grid) {
        e.body.vx = -e.body.vx;
    }
}

/// Is there solid ground just past the leading foot?
fn ground_ahead(e: &Enemy, grid: &TileGrid) -> bool {
    let b = &e.body;
    let foot_y = b.y + b.h + LEDGE_PROBE_Y;
    let look_x = if b.vx > 0.0 { b.x + b.w + LEDGE_PROBE_X } else { b.x - LEDGE_PROBE_X };
    grid.is_solid_px(look_x, foot_y)
}

// ── Flyer ──

fn fly(e: &mut Enemy, grid: &TileGrid, dt: f64) {
    e.body.vx = e.direction() * e.speed;
    e.body.x += e.body.vx * dt;

    if wall_ahead(e, grid) {
        e.body.vx = -e.body.vx;
    }

    if let EnemyKind::Flyer { phase, anchor_y } = &mut e.kind {
        *phase += dt * FLYER_PHASE_RATE;
        e.body.y = *anchor_y + phase.sin() * FLYER_AMPLITUDE;
    }
}

/// Probe the column just past the leading edge at the body's top and
/// bottom rows.
fn wall_ahead(e: &Enemy, grid: &TileGrid) -> bool {
    let b = &e.body;
    let probe_x = if b.vx > 0.0 { b.x + b.w + FLYER_PROBE } else { b.x - FLYER_PROBE };
    let top = b.y;
    let bottom = b.y + b.h - 1.0;
    grid.is_solid_px(probe_x, top) || grid.is_solid_px(probe_x, bottom)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FIXED_DT, TILE};
    use crate::domain::tile::Tile;

    fn grid_from(rows: &[&str]) -> TileGrid {
        TileGrid::new(
            rows.iter()
                .map(|r| r.chars().map(|c| if c == '#' { Tile::Solid } else { Tile::Empty }).collect())
                .collect(),
        )
    }

    fn settle(e: &mut Enemy, g: &TileGrid, ticks: usize) {
        let phys = PhysicsConfig::default();
        for _ in 0..ticks {
            update_enemy(e, g, &phys, FIXED_DT);
        }
    }

    #[test]
    fn blob_below_the_level_dies_without_damage() {
        let g = grid_from(&[
            "..........",
            "..........",
            "####..####",
        ]);
        let phys = PhysicsConfig::default();
        let mut e = Enemy::blob(4, 1);
        e.body.y = g.pixel_height() + phys.enemy_fall_margin;

        update_enemy(&mut e, &g, &phys, FIXED_DT);
        assert!(!e.alive);
        assert_eq!(e.hp, 1);

        // Dead enemies are skipped from then on.
        let y = e.body.y;
        update_enemies(std::slice::from_mut(&mut e), &g, &phys, FIXED_DT);
        assert_eq!(e.body.y, y);
    }

    #[test]
    fn blob_lands_and_patrols_left() {
        let g = grid_from(&[
            "..........",
            "..........",
            "##########",
        ]);
        let mut e = Enemy::blob(5, 1);
        settle(&mut e, &g, 5);
        assert!(e.body.on_ground);
        assert_eq!(e.body.y, 128.0 - 52.0);
        assert_eq!(e.body.vx, -120.0);
        assert!(e.body.x < 5.0 * TILE + 8.0);
    }

    #[test]
    fn walker_reverses_on_wall() {
        let g = grid_from(&[
            "#.........",
            "#.........",
            "##########",
        ]);
        let mut e = Enemy::blob(1, 1);
        // Starts at x = 72 heading left; wall face at x = 64.
        settle(&mut e, &g, 10);
        assert_eq!(e.body.vx, 120.0);
        assert!(e.body.x >= 64.0);
    }

    #[test]
    fn walker_turns_at_ledge() {
        let g = grid_from(&[
            "..........",
            "..........",
            "....######",
        ]);
        let mut e = Enemy::beetle(4, 1);
        e.body.y = 128.0 - 44.0;
        e.body.on_ground = true;
        // x = 264 and the floor starts at 256: the probe at x - 4 stays on
        // solid ground for one tick, then crosses the ledge.
        let mut turned = false;
        for _ in 0..30 {
            update_enemy(&mut e, &g, &PhysicsConfig::default(), FIXED_DT);
            if e.body.vx > 0.0 {
                turned = true;
                break;
            }
        }
        assert!(turned);
        assert!(e.body.x >= 256.0);
        assert!(e.body.on_ground);
    }

    #[test]
    fn airborne_walker_does_not_turn() {
        let g = grid_from(&[
            "..........",
            "..........",
            "..........",
            "##########",
        ]);
        let mut e = Enemy::blob(5, 0);
        update_enemy(&mut e, &g, &PhysicsConfig::default(), FIXED_DT);
        assert!(!e.body.on_ground);
        assert_eq!(e.body.vx, -120.0);
    }

    #[test]
    fn stationary_walker_resumes_left() {
        let g = grid_from(&["..........", "##########"]);
        let mut e = Enemy::blob(5, 0);
        e.body.vx = 0.0;
        update_enemy(&mut e, &g, &PhysicsConfig::default(), FIXED_DT);
        assert_eq!(e.body.vx, -120.0);
    }

    #[test]
    fn flyer_bobs_around_anchor() {
        let g = grid_from(&["..........", "..........", ".........."]);
        let mut e = Enemy::flyer(5, 1, 0.0);
        let mut lo = f64::MAX;
        let mut hi = f64::MIN;
        for _ in 0..120 {
            update_enemy(&mut e, &g, &PhysicsConfig::default(), FIXED_DT);
            lo = lo.min(e.body.y);
            hi = hi.max(e.body.y);
            assert_eq!(e.body.vy, 0.0);
        }
        assert!(lo >= 74.0 - FLYER_AMPLITUDE - 1e-9);
        assert!(hi <= 74.0 + FLYER_AMPLITUDE + 1e-9);
        assert!(hi - lo > 50.0);
    }

    #[test]
    fn flyer_reverses_before_wall() {
        let g = grid_from(&["..........", "#.........", ".........."]);
        let mut e = Enemy::flyer(2, 1, 0.0);
        let mut turned = false;
        for _ in 0..60 {
            update_enemy(&mut e, &g, &PhysicsConfig::default(), FIXED_DT);
            if e.body.vx > 0.0 {
                turned = true;
                break;
            }
        }
        assert!(turned);
        assert!(e.body.x > 60.0);
    }

    #[test]
    fn dead_enemies_are_skipped() {
        let g = grid_from(&["..........", "##########"]);
        let mut list = vec![Enemy::blob(3, 0), Enemy::blob(6, 0)];
        list[0].alive = false;
        let before = list[0].clone();
        update_enemies(&mut list, &g, &PhysicsConfig::default(), FIXED_DT);
        assert_eq!(list[0], before);
        assert_ne!(list[1].body.y, Enemy::blob(6, 0).body.y);
    }
}
