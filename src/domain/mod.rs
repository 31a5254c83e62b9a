pub mod ai;
pub mod entity;
pub mod kinematics;
pub mod physics;
pub mod rect;
pub mod rules;
pub mod tile;
