//! Pilot expiry, scattering and timer control.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use tankrescue_core::components::{ExpiryTimer, Pilot, Transform};
use tankrescue_core::constants::*;
use tankrescue_core::events::GameEvent;
use tankrescue_core::types::Position;

use crate::pool::EntityPool;
use crate::world_setup;

/// Advance every pilot's expiry timer, fading it out and returning it to
/// the pool when the timer fires.
pub fn run(
    world: &mut World,
    pilots: &mut Vec<Entity>,
    pool: &mut EntityPool<Pilot>,
    events: &mut Vec<GameEvent>,
    dt_ms: f64,
) -> u32 {
    let mut expired = 0;
    for i in (0..pilots.len()).rev() {
        let entity = pilots[i];
        let fired = match world.query_one_mut::<(&mut ExpiryTimer, &mut Transform)>(entity) {
            Ok((timer, transform)) => {
                let fired = timer.advance(dt_ms);
                transform.alpha = timer.alpha();
                fired
            }
            Err(_) => {
                // Released elsewhere; drop the stale entry.
                pilots.remove(i);
                continue;
            }
        };
        if !fired {
            continue;
        }

        let position = world
            .get::<&Position>(entity)
            .map(|p| *p)
            .unwrap_or_default();
        events.push(GameEvent::PilotExpired { position });
        pool.release(world, entity);
        pilots.remove(i);
        expired += 1;
    }
    expired
}

/// Drop `count` pilots on a ring around `center`.
pub fn scatter(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    pool: &mut EntityPool<Pilot>,
    pilots: &mut Vec<Entity>,
    center: Position,
    count: u32,
) {
    for _ in 0..count {
        let bearing = rng.gen_range(0.0..360.0);
        let radius = rng.gen_range(SCATTER_MIN_RADIUS..SCATTER_MAX_RADIUS);
        let spot = center
            .offset(bearing, radius)
            .clamped(WORLD_WIDTH, WORLD_HEIGHT, CLAMP_MARGIN);
        pilots.push(world_setup::place_pilot(world, pool, spot, true));
    }
    if count > 0 {
        tracing::debug!(count, "pilots scattered");
    }
}

/// Pause or resume every live pilot's expiry timer.
pub fn set_paused(world: &mut World, pilots: &[Entity], paused: bool) {
    for &entity in pilots {
        if let Ok(mut timer) = world.get::<&mut ExpiryTimer>(entity) {
            timer.paused = paused;
        }
    }
}

/// Restart every live pilot's lifetime from full.
pub fn reset_all(world: &mut World, pilots: &[Entity]) {
    for &entity in pilots {
        if let Ok((timer, transform)) = world.query_one_mut::<(&mut ExpiryTimer, &mut Transform)>(entity) {
            timer.reset();
            transform.alpha = timer.alpha();
        }
    }
}
