//! Snapshot system: queries the ECS world and builds a complete SessionSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use tankrescue_core::components::*;
use tankrescue_core::enums::*;
use tankrescue_core::events::{GameEvent, Toast};
use tankrescue_core::state::*;
use tankrescue_core::types::{Position, SimTime};

/// Player state the world does not hold.
#[derive(Debug, Clone, Copy)]
pub struct PlayerStatus {
    pub state: PlayerState,
    pub shielded: bool,
    pub fire_enabled: bool,
}

/// Build a complete SessionSnapshot from the current world state.
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    mode: SessionMode,
    status: PlayerStatus,
    frozen: bool,
    stats: SessionStats,
    events: Vec<GameEvent>,
    toasts: Vec<Toast>,
) -> SessionSnapshot {
    SessionSnapshot {
        time: *time,
        phase,
        mode,
        player: build_player(world, status),
        enemies: build_enemies(world),
        crates: build_crates(world),
        bullets: build_pooled::<Bullet>(world),
        pilots: build_pooled::<Pilot>(world),
        frozen,
        stats,
        events,
        toasts,
    }
}

fn build_player(world: &World, status: PlayerStatus) -> PlayerView {
    let mut query = world.query::<(&PlayerTank, &Position, &Transform)>();
    let (position, rotation_deg, visible) = query
        .iter()
        .next()
        .map(|(_, (_, pos, transform))| (*pos, transform.rotation_deg, transform.visible))
        .unwrap_or_default();

    PlayerView {
        position,
        rotation_deg,
        visible,
        state: status.state,
        shielded: status.shielded,
        fire_enabled: status.fire_enabled,
    }
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    world
        .query::<(&EnemyTank, &Position, &Transform)>()
        .without::<&Destroyed>()
        .iter()
        .map(|(_, (enemy, pos, transform))| EnemyView {
            position: *pos,
            rotation_deg: transform.rotation_deg,
            policy: enemy.policy,
        })
        .collect()
}

fn build_crates(world: &World) -> Vec<CrateView> {
    world
        .query::<(&Crate, &Position)>()
        .iter()
        .map(|(_, (crate_, pos))| CrateView {
            position: *pos,
            kind: crate_.kind,
            hit_points: crate_.hit_points,
            wrecked: crate_.is_wreck(),
        })
        .collect()
}

/// Views of checked-out pooled entities; parked ones are skipped.
fn build_pooled<T: hecs::Component>(world: &World) -> Vec<EntityView> {
    world
        .query::<(&T, &Active, &Position, &Transform)>()
        .iter()
        .map(|(_, (_, _, pos, transform))| EntityView {
            position: *pos,
            rotation_deg: transform.rotation_deg,
            alpha: transform.alpha,
        })
        .collect()
}
