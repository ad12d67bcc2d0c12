//! Entity spawn factories.
//!
//! Builds the component bundles for every entity kind. Placement rules
//! live in the spawner; these functions only assemble components at a
//! position they are given.

use hecs::{Entity, World};

use tankrescue_core::components::*;
use tankrescue_core::constants::*;
use tankrescue_core::enums::{CrateKind, EnemyPolicy};
use tankrescue_core::types::{Bounds, Position, Velocity};

use crate::pool::EntityPool;

/// Centre of the playfield, where the player starts.
pub fn player_start() -> Position {
    Position::new(WORLD_WIDTH * 0.5, WORLD_HEIGHT * 0.5)
}

/// Spawn the player's tank at the playfield centre.
pub fn spawn_player(world: &mut World) -> Entity {
    world.spawn((
        PlayerTank::default(),
        player_start(),
        Transform::default(),
        Bounds::square(TANK_SIZE),
    ))
}

/// Spawn an enemy tank facing `rotation_deg`.
pub fn spawn_enemy(
    world: &mut World,
    position: Position,
    policy: EnemyPolicy,
    rotation_deg: f64,
    spawn_tick: u64,
) -> Entity {
    world.spawn((
        EnemyTank {
            policy,
            wander_bearing_deg: rotation_deg,
            turn_timer_ms: WANDER_TURN_INTERVAL_MS,
            spawn_tick,
        },
        position,
        Transform {
            rotation_deg,
            ..Transform::default()
        },
        Bounds::square(TANK_SIZE),
    ))
}

/// Spawn a box with full hit points.
pub fn spawn_crate(world: &mut World, position: Position, kind: CrateKind) -> Entity {
    world.spawn((
        Crate::new(kind),
        position,
        Transform::default(),
        Bounds::square(CRATE_SIZE),
    ))
}

/// Check a bullet out of the pool and launch it along `bearing_deg`.
pub fn launch_bullet(
    world: &mut World,
    pool: &mut EntityPool<Bullet>,
    position: Position,
    bearing_deg: f64,
) -> Entity {
    let entity = pool.acquire(world, || {
        (
            Bullet::default(),
            position,
            Transform::default(),
            Bounds::square(BULLET_SIZE),
        )
    });
    let _ = world.insert(
        entity,
        (position, Velocity::from_bearing(bearing_deg, BULLET_SPEED)),
    );
    if let Ok(mut transform) = world.get::<&mut Transform>(entity) {
        transform.rotation_deg = bearing_deg;
    }
    entity
}

/// Check a pilot out of the pool with a fresh expiry timer.
pub fn place_pilot(
    world: &mut World,
    pool: &mut EntityPool<Pilot>,
    position: Position,
    scattered: bool,
) -> Entity {
    let entity = pool.acquire(world, || {
        (
            Pilot::default(),
            position,
            Transform::default(),
            Bounds::square(PILOT_SIZE),
        )
    });
    let _ = world.insert(
        entity,
        (position, ExpiryTimer::new(PILOT_LIFETIME_MS, PILOT_FADE_MS)),
    );
    if let Ok(mut pilot) = world.get::<&mut Pilot>(entity) {
        pilot.scattered = scattered;
    }
    entity
}
