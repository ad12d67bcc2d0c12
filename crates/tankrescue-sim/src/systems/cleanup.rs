//! Cleanup system: removes killed enemies and finished box wrecks.

use hecs::{Entity, World};

use tankrescue_core::components::{Crate, Destroyed, EnemyTank, Transform};

use crate::live::LiveLists;

/// Count down lingering wrecks and fade them out.
pub fn advance_wrecks(world: &mut World, dt_ms: f64) {
    for (_entity, (crate_, transform)) in world.query_mut::<(&mut Crate, &mut Transform)>() {
        if let Some(remaining) = crate_.wreck_remaining_ms.as_mut() {
            *remaining -= dt_ms;
            transform.alpha = 0.5;
        }
    }
}

/// Despawn destroyed enemies and expired wrecks, and drop them from the
/// live lists. Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, live: &mut LiveLists, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (_enemy, _destroyed)) in world.query_mut::<(&EnemyTank, &Destroyed)>() {
        despawn_buffer.push(entity);
    }

    for (entity, crate_) in world.query_mut::<&Crate>() {
        if crate_.wreck_remaining_ms.is_some_and(|ms| ms <= 0.0) {
            despawn_buffer.push(entity);
        }
    }

    for &entity in despawn_buffer.iter() {
        let _ = world.despawn(entity);
    }

    if !despawn_buffer.is_empty() {
        live.enemies.retain(|&e| world.contains(e));
        live.crates.retain(|&e| world.contains(e));
    }
    despawn_buffer.clear();
}
