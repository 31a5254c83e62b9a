/// Fixed-step driver.
///
/// Converts variable wall-clock frame deltas into whole 1/60 s ticks.
/// Each frame delta is clamped to `max_frame_delta` before it is added to
/// the accumulator, so a stall never turns into a long catch-up burst.
/// Leftover time below one tick carries over to the next frame.

use crate::consts::FIXED_DT;
use crate::domain::entity::FrameInput;

use super::event::GameEvent;
use super::step::step;
use super::world::WorldState;

/// Milliseconds per fixed tick.
const TICK_MS: f64 = 1000.0 / 60.0;

#[derive(Clone, Debug, Default)]
pub struct FixedStepDriver {
    accumulator: f64,
}

impl FixedStepDriver {
    pub fn new() -> Self {
        FixedStepDriver::default()
    }

    /// Unspent time, in seconds.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Feed one rendered frame's elapsed time and run the ticks it covers.
    pub fn frame(&mut self, world: &mut WorldState, input: &mut FrameInput, dt_secs: f64) -> Vec<GameEvent> {
        let dt = dt_secs.max(0.0).min(world.config.physics.max_frame_delta);
        self.accumulator += dt;

        let mut events = vec![];
        while self.accumulator >= FIXED_DT {
            self.accumulator -= FIXED_DT;
            events.extend(step(world, input));
        }
        events
    }

    /// Deterministic advance: run `ticks_for_ms(ms)` ticks immediately,
    /// independent of the accumulator.
    pub fn advance_time(&mut self, world: &mut WorldState, input: &mut FrameInput, ms: f64) -> Vec<GameEvent> {
        let mut events = vec![];
        for _ in 0..ticks_for_ms(ms) {
            events.extend(step(world, input));
        }
        events
    }
}

/// `round(ms / (1000/60))`, never fewer than one.
pub fn ticks_for_ms(ms: f64) -> u32 {
    ((ms / TICK_MS).round().max(0.0) as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::level::builtin_levels;
    use crate::sim::progression;

    fn world() -> WorldState {
        let mut w = WorldState::new(SimConfig::default(), builtin_levels(), 5);
        progression::boot(&mut w);
        w
    }

    #[test]
    fn tick_count_for_ms() {
        assert_eq!(ticks_for_ms(0.0), 1);
        assert_eq!(ticks_for_ms(-40.0), 1);
        assert_eq!(ticks_for_ms(16.0), 1);
        assert_eq!(ticks_for_ms(25.0), 2);
        assert_eq!(ticks_for_ms(1000.0), 60);
        assert_eq!(ticks_for_ms(1250.0), 75);
    }

    #[test]
    fn short_frame_runs_no_tick() {
        let mut w = world();
        let mut d = FixedStepDriver::new();
        d.frame(&mut w, &mut FrameInput::default(), 0.01);
        assert_eq!(w.tick, 0);
        d.frame(&mut w, &mut FrameInput::default(), 0.01);
        assert_eq!(w.tick, 1);
        assert!(d.accumulator() < FIXED_DT);
    }

    #[test]
    fn long_frame_is_clamped() {
        let mut w = world();
        let mut d = FixedStepDriver::new();
        d.frame(&mut w, &mut FrameInput::default(), 2.0);
        assert!(w.tick <= 3);
        assert!(w.tick >= 2);
    }

    #[test]
    fn advance_time_ignores_accumulator() {
        let mut w = world();
        let mut d = FixedStepDriver::new();
        d.frame(&mut w, &mut FrameInput::default(), 0.01);
        d.advance_time(&mut w, &mut FrameInput::default(), 100.0);
        assert_eq!(w.tick, 6);
        assert!((d.accumulator() - 0.01).abs() < 1e-12);
    }
}
