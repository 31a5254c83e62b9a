/// Entry point: terminal game loop, or a headless scripted run.

mod ui;

use std::fs::File;
use std::time::{Duration, Instant};

use env_logger::{Env, Target};

use skyline_run::domain::entity::FrameInput;
use skyline_run::sim::snapshot;
use skyline_run::sim::{debug, progression};
use skyline_run::{FixedStepDriver, GameConfig, Mode, WorldState};
use ui::input::{Action, InputState};
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const LOG_FILE: &str = "skyline-run.log";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let headless = args.iter().any(|a| a == "--headless");
    init_logging(headless);

    let config = GameConfig::load();
    let mut world = WorldState::from_config(&config);
    progression::boot(&mut world);

    if headless {
        if let Err(e) = run_headless(&mut world, &args) {
            eprintln!("skyline-run: {e}");
            std::process::exit(2);
        }
        return;
    }

    let mut renderer = Renderer::new();
    let key_release = match renderer.init() {
        Ok(supported) => supported,
        Err(e) => {
            eprintln!("Terminal init failed: {e}");
            return;
        }
    };

    let result = game_loop(&mut world, &mut renderer, key_release);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Skyline Run!");
    println!("Final Score: {}", world.score);
}

/// Terminal mode writes to a file so log lines never land on the
/// alternate screen. Headless mode keeps stderr.
fn init_logging(headless: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if !headless {
        match File::create(LOG_FILE) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
            }
            Err(_) => {
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }
    builder.init();
}

// ── Terminal loop ──

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    key_release: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    kb.honor_release = key_release;
    let mut driver = FixedStepDriver::new();
    let mut input = FrameInput::default();
    let mut last_frame = Instant::now();

    loop {
        kb.drain_events();
        if kb.ctrl_c_pressed() || kb.was_pressed(Action::Quit) {
            break;
        }
        handle_meta(world, &kb);

        kb.update_frame_input(&mut input);
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;

        for event in driver.frame(world, &mut input, dt) {
            log::trace!("{event:?}");
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn handle_meta(world: &mut WorldState, kb: &InputState) {
    if kb.was_pressed(Action::Start) && world.mode.accepts_start() {
        progression::start_game(world, &mut vec![]);
    }
    if world.mode != Mode::Playing {
        return;
    }
    if kb.was_pressed(Action::DebugLoseLife) {
        debug::force_lose_life(world);
    }
    if kb.was_pressed(Action::DebugClearCoins) {
        debug::clear_coins(world);
    }
    if kb.was_pressed(Action::DebugClearEnemies) {
        debug::clear_enemies(world);
    }
    if kb.was_pressed(Action::DebugWarp) {
        debug::warp_to_goal(world);
    }
}

// ── Headless mode ──

/// Apply the arguments left to right, then print the snapshot as JSON.
///
/// ```text
/// --start             start (or retry) a run
/// --left / --right    hold a direction for the following advances
/// --release           release both directions
/// --jump              queue a jump for the next tick
/// --advance <ms>      run round(ms / 16.67) ticks, at least one
/// --debug <action>    lose-life | clear-coins | clear-enemies | warp
/// --pretty            pretty-print the JSON
/// ```
fn run_headless(world: &mut WorldState, args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let mut driver = FixedStepDriver::new();
    let mut input = FrameInput::default();
    let mut pretty = false;

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--headless" => {}
            "--pretty" => pretty = true,
            "--start" => {
                progression::start_game(world, &mut vec![]);
            }
            "--left" => {
                input.left = true;
                input.right = false;
            }
            "--right" => {
                input.right = true;
                input.left = false;
            }
            "--release" => {
                input.left = false;
                input.right = false;
            }
            "--jump" => input.jump = true,
            "--advance" => {
                let value = it.next().ok_or("--advance needs a value in milliseconds")?;
                let ms: f64 = value
                    .parse()
                    .map_err(|_| format!("invalid --advance value: {value}"))?;
                driver.advance_time(world, &mut input, ms);
            }
            "--debug" => {
                let action = it.next().ok_or("--debug needs an action")?;
                match action.as_str() {
                    "lose-life" => {
                        debug::force_lose_life(world);
                    }
                    "clear-coins" => debug::clear_coins(world),
                    "clear-enemies" => debug::clear_enemies(world),
                    "warp" => debug::warp_to_goal(world),
                    other => return Err(format!("unknown debug action: {other}").into()),
                }
            }
            other => return Err(format!("unknown argument: {other}").into()),
        }
    }

    let snap = snapshot::capture(world);
    let json = if pretty { snap.to_json_pretty()? } else { snap.to_json()? };
    println!("{json}");
    Ok(())
}
