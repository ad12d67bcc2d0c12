//! Simulation engine for TANKRESCUE.
//!
//! Owns the hecs ECS world, runs the combat and rescue systems each tick
//! and produces SessionSnapshots for the host.

pub mod engine;
pub mod lifecycle;
pub mod live;
pub mod modes;
pub mod pool;
pub mod score;
pub mod systems;
pub mod timers;
pub mod world_setup;

pub use engine::GameSession;
pub use tankrescue_core as core;

#[cfg(test)]
mod tests;
