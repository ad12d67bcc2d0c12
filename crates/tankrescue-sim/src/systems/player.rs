//! Player tank control: steering, fire cooldown and shooting.

use hecs::{Entity, World};

use tankrescue_core::components::{Bullet, PlayerTank, Transform};
use tankrescue_core::constants::*;
use tankrescue_core::types::Position;

use tankrescue_ai::behavior::try_step;

use crate::live::positions;
use crate::pool::EntityPool;
use crate::world_setup;

/// Latest steering input. Held until replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveInput {
    pub angle_deg: f64,
    /// 0 = stopped, 1 = full speed.
    pub strength: f64,
}

impl MoveInput {
    pub fn new(angle_deg: f64, strength: f64) -> Self {
        let strength = if strength.is_finite() {
            strength.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            angle_deg: angle_deg.rem_euclid(360.0),
            strength,
        }
    }
}

/// Tick the fire cooldown and apply steering.
pub fn run(world: &mut World, player: Entity, input: &MoveInput, crates: &[Entity], dt_ms: f64) {
    if let Ok(mut tank) = world.get::<&mut PlayerTank>(player) {
        tank.fire_cooldown_ms = (tank.fire_cooldown_ms - dt_ms).max(0.0);
    }

    if input.strength <= 0.0 {
        return;
    }

    let obstacles: Vec<Position> = positions(world, crates);

    let distance = PLAYER_SPEED * input.strength * dt_ms / FRAME_MS;
    if let Ok(mut pos) = world.get::<&mut Position>(player) {
        *pos = try_step(*pos, input.angle_deg, distance, &obstacles).position;
    }
    if let Ok(mut transform) = world.get::<&mut Transform>(player) {
        transform.rotation_deg = input.angle_deg;
    }
}

/// Launch a bullet from the muzzle if the cooldown has elapsed. Returns the
/// new bullet.
pub fn fire(
    world: &mut World,
    player: Entity,
    pool: &mut EntityPool<Bullet>,
    bullets: &mut Vec<Entity>,
) -> Option<Entity> {
    let (muzzle, bearing) = {
        let mut query = world
            .query_one::<(&PlayerTank, &Position, &Transform)>(player)
            .ok()?;
        let (tank, pos, transform) = query.get()?;
        if tank.fire_cooldown_ms > 0.0 {
            return None;
        }
        (
            pos.offset(transform.rotation_deg, MUZZLE_OFFSET),
            transform.rotation_deg,
        )
    };

    let bullet = world_setup::launch_bullet(world, pool, muzzle, bearing);
    bullets.push(bullet);
    if let Ok(mut tank) = world.get::<&mut PlayerTank>(player) {
        tank.fire_cooldown_ms = FIRE_COOLDOWN_MS;
    }
    Some(bullet)
}
