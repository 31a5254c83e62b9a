pub mod debug;
pub mod driver;
pub mod event;
pub mod level;
pub mod progression;
pub mod snapshot;
pub mod step;
pub mod world;
