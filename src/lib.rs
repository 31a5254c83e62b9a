//! Skyline Run - a tile-based platformer simulation.
//!
//! Core modules:
//! - `domain`: tiles, bodies, collision, enemy AI and interaction rules
//! - `sim`: levels, world state, the per-tick step, progression and the
//!   fixed-step driver
//! - `config`: `config.toml` loading
//!
//! Rendering, audio and input devices live outside the library; they read
//! a [`sim::snapshot::Snapshot`] or the [`sim::world::WorldState`] between
//! ticks and feed [`domain::entity::FrameInput`] back in.

pub mod config;
pub mod domain;
pub mod error;
pub mod sim;

pub use config::{GameConfig, SimConfig};
pub use error::{GameError, LevelError};
pub use sim::driver::FixedStepDriver;
pub use sim::world::{Mode, WorldState};

/// Fixed simulation constants.
pub mod consts {
    /// Edge length of one grid cell, in pixels.
    pub const TILE: f64 = 64.0;
    /// Fixed simulation timestep (60 Hz).
    pub const FIXED_DT: f64 = 1.0 / 60.0;
    /// Shrinks a rectangle's far edge so exact-boundary contact does not
    /// count as covering the next tile.
    pub const EDGE_EPSILON: f64 = 0.001;
}
