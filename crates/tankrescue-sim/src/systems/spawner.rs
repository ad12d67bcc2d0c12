//! Population control: keeps boxes, enemies and (in rescue mode) pilots at
//! their minimum counts.
//!
//! Placement is rejection sampling. When no valid spot is found within
//! `SPAWN_MAX_ATTEMPTS` the spawn is abandoned for this check and retried on
//! the next one.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use tankrescue_core::components::{Crate, PlayerTank, Pilot};
use tankrescue_core::constants::*;
use tankrescue_core::enums::{CrateKind, EnemyPolicy};
use tankrescue_core::types::Position;

use crate::live::{counts_toward_population, is_present, positions, LiveLists};
use crate::modes::ModeRules;
use crate::pool::EntityPool;
use crate::world_setup;

/// Outcome of topping up one population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopUpReport {
    pub spawned: usize,
    /// The factory gave up before the minimum was reached.
    pub abandoned: bool,
}

/// Outcome of a full spawn check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub crates: TopUpReport,
    pub enemies: TopUpReport,
    pub pilots: TopUpReport,
}

/// Drop entries that no longer exist, then call `factory` until `minimum`
/// entries count toward the population. A `None` from the factory stops
/// this top-up.
pub fn top_up<F>(
    world: &mut World,
    live: &mut Vec<Entity>,
    minimum: usize,
    label: &'static str,
    mut factory: F,
) -> TopUpReport
where
    F: FnMut(&mut World, &[Entity]) -> Option<Entity>,
{
    live.retain(|&entity| is_present(&*world, entity));

    let mut report = TopUpReport::default();
    let mut count = live
        .iter()
        .filter(|&&entity| counts_toward_population(&*world, entity))
        .count();

    while count < minimum {
        match factory(&mut *world, live.as_slice()) {
            Some(entity) => {
                live.push(entity);
                report.spawned += 1;
                count += 1;
            }
            None => {
                tracing::debug!(kind = label, live = count, minimum, "placement failed, retrying next check");
                report.abandoned = true;
                break;
            }
        }
    }
    report
}

/// Required concurrent enemies for a rank tier.
pub fn required_enemies(tier_index: usize) -> usize {
    let last = ENEMY_COUNT_BY_TIER.len() - 1;
    ENEMY_COUNT_BY_TIER[tier_index.min(last)]
}

/// Run every population top-up for the session mode.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    live: &mut LiveLists,
    pilot_pool: &mut EntityPool<Pilot>,
    rules: &ModeRules,
    tier_index: usize,
    current_tick: u64,
) -> SpawnReport {
    let player = player_position(world);
    let mut report = SpawnReport::default();

    let enemy_positions = positions(world, &live.enemies);
    report.crates = top_up(world, &mut live.crates, CRATE_MIN_COUNT, "crate", |world, crates| {
        place_crate(world, rng, player, crates, &enemy_positions)
    });

    let crates = live.crates.clone();
    report.enemies = top_up(
        world,
        &mut live.enemies,
        required_enemies(tier_index),
        "enemy",
        |world, enemies| place_enemy(world, rng, player, enemies, &crates, current_tick),
    );

    if rules.pilots {
        report.pilots = top_up(world, &mut live.pilots, rules.pilot_minimum, "pilot", |world, _| {
            place_field_pilot(world, rng, pilot_pool, player, &crates)
        });
    }

    if report.crates.spawned + report.enemies.spawned + report.pilots.spawned > 0 {
        tracing::debug!(
            crates = report.crates.spawned,
            enemies = report.enemies.spawned,
            pilots = report.pilots.spawned,
            "spawn check"
        );
    }
    report
}

/// Treasure only while none is on the field, otherwise weighted wood/metal.
pub fn pick_crate_kind(rng: &mut ChaCha8Rng, treasure_live: bool) -> CrateKind {
    if !treasure_live && rng.gen_bool(TREASURE_PROBABILITY) {
        return CrateKind::Treasure;
    }
    if rng.gen_range(0..WOOD_WEIGHT + METAL_WEIGHT) < WOOD_WEIGHT {
        CrateKind::Wood
    } else {
        CrateKind::Metal
    }
}

/// Place one box away from the player, clear of other boxes and not on
/// top of an enemy tank.
pub fn place_crate(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    player: Position,
    crates: &[Entity],
    enemies: &[Position],
) -> Option<Entity> {
    let treasure_live = crates.iter().any(|&entity| {
        world
            .get::<&Crate>(entity)
            .map(|c| c.kind == CrateKind::Treasure && !c.is_wreck())
            .unwrap_or(false)
    });
    let kind = pick_crate_kind(rng, treasure_live);
    let occupied = positions(world, crates);

    for _ in 0..SPAWN_MAX_ATTEMPTS {
        let candidate = random_point(rng);
        if candidate.distance_to(&player) < CRATE_MIN_PLAYER_DISTANCE {
            continue;
        }
        if occupied
            .iter()
            .any(|p| p.distance_to(&candidate) < CRATE_MIN_SPACING)
        {
            continue;
        }
        if enemies
            .iter()
            .any(|p| p.distance_to(&candidate) < TANK_RADIUS + CRATE_RADIUS)
        {
            continue;
        }
        return Some(world_setup::spawn_crate(world, candidate, kind));
    }
    None
}

/// Place one enemy away from the player, other enemies and boxes.
pub fn place_enemy(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    player: Position,
    enemies: &[Entity],
    crates: &[Entity],
    current_tick: u64,
) -> Option<Entity> {
    let policy = if rng.gen_bool(ENEMY_CHASE_PROBABILITY) {
        EnemyPolicy::Chasing
    } else {
        EnemyPolicy::Wandering
    };
    let other_enemies = positions(world, enemies);
    let boxes = positions(world, crates);

    for _ in 0..SPAWN_MAX_ATTEMPTS {
        let candidate = random_point(rng);
        if candidate.distance_to(&player) < ENEMY_MIN_PLAYER_DISTANCE {
            continue;
        }
        if other_enemies
            .iter()
            .any(|p| p.distance_to(&candidate) < ENEMY_MIN_SPACING)
        {
            continue;
        }
        if boxes
            .iter()
            .any(|p| p.distance_to(&candidate) < ENEMY_MIN_CRATE_DISTANCE)
        {
            continue;
        }
        let facing = candidate.bearing_to(&player);
        return Some(world_setup::spawn_enemy(
            world,
            candidate,
            policy,
            facing,
            current_tick,
        ));
    }
    None
}

/// Place a stray pilot for rescue mode's standing minimum.
fn place_field_pilot(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    pool: &mut EntityPool<Pilot>,
    player: Position,
    crates: &[Entity],
) -> Option<Entity> {
    let boxes = positions(world, crates);
    let clearance = CRATE_RADIUS + PILOT_SIZE * 0.5;

    for _ in 0..SPAWN_MAX_ATTEMPTS {
        let candidate = random_point(rng);
        if candidate.distance_to(&player) < CRATE_MIN_PLAYER_DISTANCE {
            continue;
        }
        if boxes.iter().any(|p| p.distance_to(&candidate) < clearance) {
            continue;
        }
        return Some(world_setup::place_pilot(world, pool, candidate, false));
    }
    None
}

/// Uniform point inside the playfield, inset by `CLAMP_MARGIN`.
fn random_point(rng: &mut ChaCha8Rng) -> Position {
    Position::new(
        rng.gen_range(CLAMP_MARGIN..WORLD_WIDTH - CLAMP_MARGIN),
        rng.gen_range(CLAMP_MARGIN..WORLD_HEIGHT - CLAMP_MARGIN),
    )
}

fn player_position(world: &World) -> Position {
    world
        .query::<(&PlayerTank, &Position)>()
        .iter()
        .next()
        .map(|(_, (_, pos))| *pos)
        .unwrap_or_else(world_setup::player_start)
}
