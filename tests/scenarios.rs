//! End-to-end runs against the public library API.

use skyline_run::domain::entity::FrameInput;
use skyline_run::sim::event::GameEvent;
use skyline_run::sim::level::{builtin_levels, LevelDef};
use skyline_run::sim::step::step;
use skyline_run::sim::{debug, progression, snapshot};
use skyline_run::{FixedStepDriver, Mode, SimConfig, WorldState};

fn playing(defs: Vec<LevelDef>) -> WorldState {
    let mut w = WorldState::new(SimConfig::default(), defs, 42);
    progression::boot(&mut w);
    assert!(progression::start_game(&mut w, &mut vec![]));
    w
}

fn idle() -> FrameInput {
    FrameInput::default()
}

#[test]
fn coin_under_resting_player_is_collected() {
    let mut w = playing(vec![LevelDef::new("coin", &[
        "G.....",
        "..S...",
        "..C...",
        "######",
    ])]);
    // Standing on the floor, overlapping the coin.
    w.player.body.y = 104.0;

    let events = step(&mut w, &mut idle());

    assert_eq!(w.score, 100);
    assert_eq!(w.coins_remaining(), 0);
    assert!(events.contains(&GameEvent::CoinCollected { index: 0 }));
    assert!(w.coin_flash > 0.0);
    assert!(w.goal_unlocked());
}

#[test]
fn clearing_enemies_opens_the_goal() {
    let mut w = playing(vec![LevelDef::new("blob", &[
        "........",
        "........",
        "S...E..G",
        "########",
    ])]);
    assert!(!w.goal_unlocked());
    assert_eq!(w.enemies_remaining(), 1);

    debug::clear_enemies(&mut w);

    assert!(w.goal_unlocked());
    assert_eq!(w.enemies_remaining(), 0);
    assert!(snapshot::capture(&w).enemies.is_empty());
}

#[test]
fn stomping_a_blob_scores_and_bounces() {
    let mut w = playing(vec![LevelDef::new("stomp", &[
        "........",
        "........",
        "S...E..G",
        "########",
    ])]);
    for _ in 0..30 {
        step(&mut w, &mut idle());
    }
    let blob = w.level.as_ref().map(|l| l.enemies[0].body).unwrap();
    assert!(blob.on_ground);

    w.player.body.x = blob.x;
    w.player.body.y = blob.y - w.player.body.h - 4.0;
    w.player.body.vy = 300.0;
    let events = step(&mut w, &mut idle());

    assert!(events.iter().any(|e| matches!(e, GameEvent::EnemyDefeated { kind: "blob", .. })));
    assert_eq!(w.score, 250);
    assert_eq!(w.enemies_remaining(), 0);
    assert!(w.player.body.vy < 0.0);
    assert_eq!(w.lives, 3);
    assert!(events.contains(&GameEvent::GoalUnlocked));
}

#[test]
fn falling_with_last_life_ends_the_run() {
    let mut w = playing(builtin_levels());
    w.lives = 1;
    let world_h = w.level.as_ref().unwrap().pixel_height();
    w.player.body.y = world_h + 300.0;

    let events = step(&mut w, &mut idle());

    assert_eq!(w.mode, Mode::GameOver);
    assert_eq!(w.lives, 0);
    assert!(events.contains(&GameEvent::PlayerFell));
    assert!(events.contains(&GameEvent::GameOver { score: 0 }));
    assert_eq!(snapshot::capture(&w).mode, Mode::GameOver);

    // Gameover is inert until a retry.
    step(&mut w, &mut FrameInput { right: true, ..Default::default() });
    assert_eq!(w.mode, Mode::GameOver);
    assert!(progression::start_game(&mut w, &mut vec![]));
    assert_eq!((w.mode, w.lives, w.level_index), (Mode::Playing, 3, 0));
}

#[test]
fn level_clear_pause_lasts_75_ticks() {
    let mut w = playing(builtin_levels());
    progression::begin_level_clear(&mut w, &mut vec![]);
    assert_eq!(w.mode, Mode::LevelClear);
    assert!((snapshot::capture(&w).level_clear_timer - 1.25).abs() < 1e-9);

    for _ in 0..74 {
        step(&mut w, &mut idle());
    }
    assert_eq!(w.mode, Mode::LevelClear);

    let events = step(&mut w, &mut idle());
    assert_eq!(w.mode, Mode::Playing);
    assert_eq!(w.level_index, 1);
    assert!(events.contains(&GameEvent::LevelLoaded { level: 2 }));
}

#[test]
fn clearing_the_last_level_is_victory() {
    let mut w = playing(vec![
        LevelDef::new("one", &["........", "S...G...", "########"]),
        LevelDef::new("two", &["........", "S...G...", "########"]),
    ]);
    let bonus = w.config.rules.level_clear_bonus;
    let victory = w.config.rules.victory_bonus;
    let mut driver = FixedStepDriver::new();

    for expected_level in 0..2 {
        assert_eq!(w.level_index, expected_level);
        debug::warp_to_goal(&mut w);
        // No coins or enemies: the goal opens and is reached on this tick.
        let events = step(&mut w, &mut idle());
        assert!(events.contains(&GameEvent::LevelCleared { level: expected_level + 1 }));
        driver.advance_time(&mut w, &mut idle(), 1250.0);
    }

    assert_eq!(w.mode, Mode::Victory);
    assert_eq!(w.score, 2 * bonus + victory);
}

#[test]
fn advance_time_runs_rounded_tick_count() {
    let mut w = playing(builtin_levels());
    let mut driver = FixedStepDriver::new();
    let start = w.tick;

    driver.advance_time(&mut w, &mut idle(), 1000.0);
    assert_eq!(w.tick - start, 60);

    driver.advance_time(&mut w, &mut idle(), 1.0);
    assert_eq!(w.tick - start, 61);
}

#[test]
fn running_right_moves_player_and_camera() {
    let floor = "#".repeat(40);
    let open = ".".repeat(40);
    let lane = format!("S{}G", ".".repeat(38));
    let mut w = playing(vec![LevelDef::new("lane", &[open.as_str(), open.as_str(), lane.as_str(), floor.as_str()])]);
    let mut driver = FixedStepDriver::new();
    let x0 = w.player.body.x;

    let mut input = FrameInput { right: true, ..Default::default() };
    driver.advance_time(&mut w, &mut input, 2000.0);

    let snap = snapshot::capture(&w);
    assert!(snap.player.x > x0 + 600.0);
    assert!(snap.camera_x > 0.0);
    assert!(snap.camera_x <= snap.player.x);
}

#[test]
fn same_seed_gives_identical_runs() {
    let mut a = playing(builtin_levels());
    let mut b = playing(builtin_levels());
    let mut driver_a = FixedStepDriver::new();
    let mut driver_b = FixedStepDriver::new();

    for ms in [16.0, 250.0, 500.0, 33.0] {
        let mut ia = FrameInput { right: true, jump: true, ..Default::default() };
        let mut ib = ia;
        driver_a.advance_time(&mut a, &mut ia, ms);
        driver_b.advance_time(&mut b, &mut ib, ms);
        assert_eq!(snapshot::capture(&a), snapshot::capture(&b));
    }
}

#[test]
fn snapshot_json_round_trip_through_serde() {
    let w = playing(builtin_levels());
    let json = snapshot::capture(&w).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["mode"], "playing");
    assert_eq!(value["lives"], 3);
    assert_eq!(value["coins_remaining"], 4);
    assert_eq!(value["enemies"].as_array().map(Vec::len), Some(3));
}
