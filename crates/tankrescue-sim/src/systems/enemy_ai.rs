//! Enemy AI system. Moves every live enemy tank each tick.
//!
//! Calls the behavior FSM from tankrescue-ai to compute headings and steps,
//! then writes the results back to ECS components.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use tankrescue_core::components::{EnemyTank, Transform};
use tankrescue_core::types::Position;

use tankrescue_ai::behavior::{evaluate, EnemyContext, EnemyUpdate};

use crate::live::{is_present, positions};

/// Run the enemy behavior for every live enemy, in list order.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    enemies: &[Entity],
    crates: &[Entity],
    player: Position,
    high_difficulty: bool,
    dt_ms: f64,
) {
    let obstacles: Vec<Position> = positions(world, crates);

    // Collect updates in a buffer to avoid borrow issues with hecs
    let mut updates: Vec<(Entity, EnemyUpdate)> = Vec::with_capacity(enemies.len());
    for &entity in enemies {
        if !is_present(world, entity) {
            continue;
        }
        let Ok(mut query) = world.query_one::<(&EnemyTank, &Position, &Transform)>(entity) else {
            continue;
        };
        let Some((enemy, pos, transform)) = query.get() else {
            continue;
        };

        let ctx = EnemyContext {
            policy: enemy.policy,
            position: *pos,
            rotation_deg: transform.rotation_deg,
            wander_bearing_deg: enemy.wander_bearing_deg,
            turn_timer_ms: enemy.turn_timer_ms,
            target: player,
            obstacles: &obstacles,
            high_difficulty,
            dt_ms,
        };
        updates.push((entity, evaluate(&ctx, rng)));
    }

    for (entity, update) in updates {
        if let Ok(mut enemy) = world.get::<&mut EnemyTank>(entity) {
            enemy.wander_bearing_deg = update.wander_bearing_deg;
            enemy.turn_timer_ms = update.turn_timer_ms;
        }
        if let Ok(mut pos) = world.get::<&mut Position>(entity) {
            *pos = update.position;
        }
        if let Ok(mut transform) = world.get::<&mut Transform>(entity) {
            transform.rotation_deg = update.rotation_deg;
        }
    }
}
