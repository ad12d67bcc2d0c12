//! Kinematic integration for bullets.
//!
//! Updates Position from Velocity each tick: velocities are in pixels per
//! reference frame, so the step is scaled by `dt_ms / FRAME_MS`.

use hecs::World;

use tankrescue_core::components::Active;
use tankrescue_core::constants::FRAME_MS;
use tankrescue_core::types::{Position, Velocity};

/// Integrate every active entity with a velocity.
pub fn run(world: &mut World, dt_ms: f64) {
    let frame_scale = dt_ms / FRAME_MS;
    for (_entity, (pos, vel, _active)) in world.query_mut::<(&mut Position, &Velocity, &Active)>() {
        pos.x += vel.x * frame_scale;
        pos.y += vel.y * frame_scale;
    }
}
