//! Collision system.
//!
//! Order within one pass:
//! 1. player tank vs enemy tanks (distance threshold)
//! 2. bullet vs enemy (AABB), then bullet vs box for bullets that survived
//! 3. bullets leaving the playfield
//! 4. player tank vs pilots (rescue mode)
//!
//! A bullet scores at most one thing. Lists are walked by descending index
//! so removals never skip or repeat an entry.

use hecs::{Entity, World};

use tankrescue_core::components::{Bullet, Crate, Destroyed, EnemyTank, Pilot};
use tankrescue_core::constants::*;
use tankrescue_core::enums::CrateKind;
use tankrescue_core::events::GameEvent;
use tankrescue_core::types::{Bounds, Position, Rect};

use crate::live::{is_present, LiveLists};
use crate::modes::ModeRules;
use crate::pool::EntityPool;
use crate::score::Scoreboard;
use crate::world_setup;

/// What one collision pass found.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionReport {
    /// Player position when a vulnerable player touched an enemy.
    pub player_hit: Option<Position>,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    live: &mut LiveLists,
    bullet_pool: &mut EntityPool<Bullet>,
    pilot_pool: &mut EntityPool<Pilot>,
    score: &mut Scoreboard,
    events: &mut Vec<GameEvent>,
    rules: &ModeRules,
    player: Entity,
    player_invincible: bool,
    current_tick: u64,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    let Some(player_pos) = world.get::<&Position>(player).ok().map(|p| *p) else {
        return report;
    };

    if !player_invincible {
        report.player_hit = check_player_vs_enemies(world, &live.enemies, player_pos);
    }

    for bi in (0..live.bullets.len()).rev() {
        let bullet = live.bullets[bi];
        let Some((bullet_pos, bullet_rect)) = placement(world, bullet) else {
            live.bullets.remove(bi);
            continue;
        };

        let consumed = if let Some((enemy, enemy_pos)) =
            find_enemy_hit(world, &live.enemies, &bullet_rect, current_tick)
        {
            let _ = world.insert_one(enemy, Destroyed);
            score.record_kill();
            events.push(GameEvent::EnemyKilled {
                position: enemy_pos,
                reward: ENEMY_KILL_SCORE,
            });
            if rules.pilots {
                let pilot = world_setup::place_pilot(world, pilot_pool, enemy_pos, false);
                live.pilots.push(pilot);
            }
            true
        } else if let Some((kind, reward)) = strike_crate(world, &live.crates, &bullet_rect) {
            // Wreck hits still consume the bullet but pay nothing.
            if reward > 0 {
                score.record_box(kind, reward);
                events.push(GameEvent::BoxDestroyed { kind, reward });
            }
            true
        } else if !bullet_pos.is_inside(WORLD_WIDTH, WORLD_HEIGHT) {
            tracing::debug!(?bullet, "bullet left the playfield");
            true
        } else {
            false
        };

        if consumed {
            bullet_pool.release(world, bullet);
            live.bullets.remove(bi);
        }
    }

    if rules.pilots {
        for pi in (0..live.pilots.len()).rev() {
            let pilot = live.pilots[pi];
            let Some((pilot_pos, _)) = placement(world, pilot) else {
                live.pilots.remove(pi);
                continue;
            };
            if pilot_pos.distance_to(&player_pos) < PILOT_RESCUE_RADIUS {
                score.record_rescue();
                events.push(GameEvent::PilotRescued {
                    position: pilot_pos,
                    reward: PILOT_RESCUE_SCORE,
                });
                pilot_pool.release(world, pilot);
                live.pilots.remove(pi);
            }
        }
    }

    report
}

/// First enemy (by descending index) within collision distance.
fn check_player_vs_enemies(world: &World, enemies: &[Entity], player_pos: Position) -> Option<Position> {
    for &enemy in enemies.iter().rev() {
        if !is_present(world, enemy) {
            continue;
        }
        let Ok(pos) = world.get::<&Position>(enemy).map(|p| *p) else {
            continue;
        };
        if pos.distance_to(&player_pos) < TANK_COLLISION_DISTANCE {
            return Some(player_pos);
        }
    }
    None
}

/// Enemy overlapping `rect`. Enemies spawned this tick are not yet
/// targetable.
fn find_enemy_hit(
    world: &World,
    enemies: &[Entity],
    rect: &Rect,
    current_tick: u64,
) -> Option<(Entity, Position)> {
    for &enemy in enemies.iter().rev() {
        if !is_present(world, enemy) {
            continue;
        }
        let spawned_now = world
            .get::<&EnemyTank>(enemy)
            .map(|e| e.spawn_tick == current_tick)
            .unwrap_or(true);
        if spawned_now {
            continue;
        }
        if let Some((pos, enemy_rect)) = placement(world, enemy) {
            if rect.intersects(&enemy_rect) {
                return Some((enemy, pos));
            }
        }
    }
    None
}

/// Apply a hit to the box overlapping `rect`, if any.
fn strike_crate(world: &World, crates: &[Entity], rect: &Rect) -> Option<(CrateKind, u64)> {
    for &entity in crates.iter().rev() {
        let Some((_, crate_rect)) = placement(world, entity) else {
            continue;
        };
        if !rect.intersects(&crate_rect) {
            continue;
        }
        if let Ok(mut hit) = world.get::<&mut Crate>(entity) {
            let reward = hit.hit();
            return Some((hit.kind, reward));
        }
    }
    None
}

/// Position and collision rectangle of a present entity.
fn placement(world: &World, entity: Entity) -> Option<(Position, Rect)> {
    if !is_present(world, entity) {
        return None;
    }
    let mut query = world.query_one::<(&Position, &Bounds)>(entity).ok()?;
    let (pos, bounds) = query.get()?;
    Some((*pos, bounds.rect_at(pos)))
}
