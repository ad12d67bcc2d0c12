//! ECS systems that operate on the session world each tick.
//!
//! Systems are plain functions that take `&mut World` (or `&World` for
//! read-only work) plus whatever session state they touch. They own no
//! state themselves.

pub mod cleanup;
pub mod collision;
pub mod enemy_ai;
pub mod movement;
pub mod pilots;
pub mod player;
pub mod progression;
pub mod snapshot;
pub mod spawner;
