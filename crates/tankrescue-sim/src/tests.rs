//! Tests for the session engine: spawning, combat, pilots, player life
//! cycle, progression and pooling.

use tankrescue_core::commands::PlayerCommand;
use tankrescue_core::components::{Crate, ExpiryTimer};
use tankrescue_core::config::SessionConfig;
use tankrescue_core::constants::*;
use tankrescue_core::enums::*;
use tankrescue_core::error::SessionError;
use tankrescue_core::events::GameEvent;
use tankrescue_core::state::SessionSnapshot;
use tankrescue_core::types::Position;

use crate::engine::GameSession;
use crate::live::counts_toward_population;
use crate::timers::TimerId;

const LANE_Y: f64 = 375.0;

/// Started classic session.
fn classic() -> GameSession {
    let mut session = GameSession::new(SessionConfig::default());
    session.start().unwrap();
    session
}

/// Started classic session with nothing on the field.
fn arena() -> GameSession {
    let mut session = classic();
    session.clear_field();
    session
}

/// Classic session that reached the unlock score, restarted in rescue mode
/// with an empty field.
fn rescue_arena() -> GameSession {
    let mut session = classic();
    session.add_score(RESCUE_UNLOCK_SCORE);
    session.tick(FRAME_MS);
    session.start_session(SessionMode::Rescue).unwrap();
    session.clear_field();
    session
}

fn run(session: &mut GameSession, ticks: usize, dt_ms: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(session.tick(dt_ms).events);
    }
    events
}

/// Run `ticks` ticks and return the last snapshot.
fn run_to_snapshot(session: &mut GameSession, ticks: usize, dt_ms: f64) -> SessionSnapshot {
    run(session, ticks - 1, dt_ms);
    session.tick(dt_ms)
}

/// Kill a vulnerable player by parking an enemy on top of it.
fn kill_player(session: &mut GameSession) -> Vec<GameEvent> {
    session.expire_invincibility();
    let at = session.player_position().unwrap();
    session.place_enemy(at, EnemyPolicy::Chasing);
    session.tick(FRAME_MS).events
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = SessionConfig {
        seed: 12345,
        ..Default::default()
    };
    let mut session_a = GameSession::new(config.clone());
    let mut session_b = GameSession::new(config);
    session_a.start().unwrap();
    session_b.start().unwrap();

    for i in 0..300 {
        if i % 10 == 0 {
            let commands = [
                PlayerCommand::Move {
                    angle_deg: (i * 7) as f64,
                    strength: 1.0,
                },
                PlayerCommand::Fire,
            ];
            session_a.queue_commands(commands.clone());
            session_b.queue_commands(commands);
        }
        let snap_a = session_a.tick(FRAME_MS);
        let snap_b = session_b.tick(FRAME_MS);

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut session_a = GameSession::new(SessionConfig {
        seed: 111,
        ..Default::default()
    });
    let mut session_b = GameSession::new(SessionConfig {
        seed: 222,
        ..Default::default()
    });
    session_a.start().unwrap();
    session_b.start().unwrap();

    let json_a = serde_json::to_string(&session_a.tick(FRAME_MS)).unwrap();
    let json_b = serde_json::to_string(&session_b.tick(FRAME_MS)).unwrap();
    assert_ne!(json_a, json_b, "Different seeds should place boxes differently");
}

// ---- Session control ----

#[test]
fn test_idle_until_started() {
    let mut session = GameSession::new(SessionConfig::default());
    let snap = session.tick(FRAME_MS);
    assert_eq!(snap.phase, GamePhase::Idle);
    assert_eq!(snap.time.tick, 0);
    assert!(snap.crates.is_empty());
}

#[test]
fn test_start_command_populates_field() {
    let mut session = GameSession::new(SessionConfig::default());
    session.queue_command(PlayerCommand::StartSession {
        mode: SessionMode::Classic,
    });
    let snap = session.tick(FRAME_MS);

    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.crates.len(), CRATE_MIN_COUNT);
    assert_eq!(snap.enemies.len(), ENEMY_COUNT_BY_TIER[0]);
    assert!(snap.pilots.is_empty(), "Classic mode has no pilots");
    assert_eq!(snap.player.state, PlayerState::Alive { invincible: true });
    assert!(snap.player.shielded);
    assert!(snap.player.fire_enabled);
}

#[test]
fn test_spawn_distances_respected() {
    let session = classic();
    let player = session.player_position().unwrap();
    let world = session.world();

    for &entity in &session.live().crates {
        let pos = *world.get::<&Position>(entity).unwrap();
        assert!(pos.distance_to(&player) >= CRATE_MIN_PLAYER_DISTANCE);
    }
    for &entity in &session.live().enemies {
        let pos = *world.get::<&Position>(entity).unwrap();
        assert!(pos.distance_to(&player) >= ENEMY_MIN_PLAYER_DISTANCE);
    }
}

#[test]
fn test_rescue_mode_locked_initially() {
    let mut session = GameSession::new(SessionConfig::default());
    assert_eq!(
        session.start_session(SessionMode::Rescue),
        Err(SessionError::ModeLocked(SessionMode::Rescue))
    );
    assert_eq!(session.phase(), GamePhase::Idle);

    // The same rejection through the command queue is dropped quietly.
    session.queue_command(PlayerCommand::StartSession {
        mode: SessionMode::Rescue,
    });
    assert_eq!(session.tick(FRAME_MS).phase, GamePhase::Idle);
}

#[test]
fn test_pause_freezes_time() {
    let mut session = classic();
    session.tick(FRAME_MS);
    let before = session.time();

    session.pause().unwrap();
    assert_eq!(session.pause(), Err(SessionError::NotActive));
    let snap = session.tick(FRAME_MS);
    assert_eq!(snap.phase, GamePhase::Paused);
    assert_eq!(snap.time.tick, before.tick);

    session.resume().unwrap();
    assert_eq!(session.resume(), Err(SessionError::NotActive));
    assert_eq!(session.tick(FRAME_MS).time.tick, before.tick + 1);
}

#[test]
fn test_tick_delta_clamped() {
    let mut session = classic();
    session.tick(10_000.0);
    assert_eq!(session.time().elapsed_ms, MAX_TICK_MS);
    session.tick(f64::NAN);
    assert_eq!(session.time().elapsed_ms, MAX_TICK_MS);
}

// ---- Combat ----

#[test]
fn test_bullet_kills_enemy() {
    let mut session = arena();
    session.set_player_pose(Position::new(200.0, LANE_Y), 0.0);
    session.place_enemy(Position::new(400.0, LANE_Y), EnemyPolicy::Chasing);

    assert!(session.fire());
    let events = run(&mut session, 30, FRAME_MS);

    let stats = session.stats();
    assert_eq!(stats.kills, 1);
    assert_eq!(stats.score, ENEMY_KILL_SCORE);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::EnemyKilled { reward, .. } if *reward == ENEMY_KILL_SCORE
    )));
    assert!(session.live().enemies.is_empty(), "Killed enemy despawned");
    assert!(session.live().bullets.is_empty(), "Bullet consumed by the kill");
}

#[test]
fn test_fire_respects_cooldown() {
    let mut session = arena();
    assert!(session.fire());
    assert!(!session.fire(), "Second shot inside the cooldown");
    run(&mut session, 20, 20.0);
    assert!(session.fire());
}

#[test]
fn test_enemy_spawned_this_tick_not_hittable() {
    let mut session = arena();
    session.set_player_pose(Position::new(200.0, LANE_Y), 0.0);
    assert!(session.fire());
    session.place_fresh_enemy(Position::new(270.0, LANE_Y));

    session.tick(FRAME_MS);
    assert_eq!(session.stats().kills, 0, "Overlapping on its spawn tick");
    assert_eq!(session.live().bullets.len(), 1);

    session.tick(FRAME_MS);
    assert_eq!(session.stats().kills, 1);
}

#[test]
fn test_metal_box_takes_two_hits() {
    let mut session = arena();
    session.set_player_pose(Position::new(200.0, LANE_Y), 0.0);
    let metal = session.place_crate(Position::new(400.0, LANE_Y), CrateKind::Metal);

    assert!(session.fire());
    run(&mut session, 20, 20.0);
    assert_eq!(session.stats().score, 0);
    assert_eq!(session.world().get::<&Crate>(metal).unwrap().hit_points, 1);

    assert!(session.fire());
    let events = run(&mut session, 12, 20.0);
    let stats = session.stats();
    assert_eq!(stats.score, METAL_REWARD);
    assert_eq!(stats.metal_boxes, 1);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::BoxDestroyed {
            kind: CrateKind::Metal,
            ..
        }
    )));
}

#[test]
fn test_wreck_absorbs_bullet_without_reward() {
    let mut session = arena();
    session.set_player_pose(Position::new(300.0, LANE_Y), 0.0);
    let wood = session.place_crate(Position::new(400.0, LANE_Y), CrateKind::Wood);

    assert!(session.fire());
    while !session.fire() {
        session.tick(20.0);
    }
    assert_eq!(session.stats().score, WOOD_REWARD);
    assert!(session.world().get::<&Crate>(wood).unwrap().is_wreck());
    assert!(!counts_toward_population(session.world(), wood));

    let events = run(&mut session, 3, 20.0);
    assert!(session.live().bullets.is_empty(), "Wreck stopped the bullet");
    assert_eq!(session.stats().score, WOOD_REWARD);
    assert_eq!(session.stats().wood_boxes, 1);
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::BoxDestroyed { .. })));
}

#[test]
fn test_wreck_despawns_after_linger() {
    let mut session = arena();
    session.set_player_pose(Position::new(300.0, LANE_Y), 0.0);
    let wood = session.place_crate(Position::new(400.0, LANE_Y), CrateKind::Wood);

    session.fire();
    run(&mut session, 3, 20.0);
    assert!(session.world().contains(wood));
    run(&mut session, 20, 20.0);
    assert!(!session.world().contains(wood));
    assert!(session.live().crates.is_empty());
}

#[test]
fn test_bullet_out_of_bounds_recycled() {
    let mut session = arena();
    session.set_player_pose(Position::new(1200.0, LANE_Y), 0.0);

    assert!(session.fire());
    assert_eq!(session.live().bullets.len(), 1);
    run(&mut session, 20, 20.0);

    assert!(session.live().bullets.is_empty());
    assert_eq!(session.bullet_pool().free_len(), 1);
    assert_eq!(session.stats().score, 0);
}

#[test]
fn test_bullet_pool_reused_across_shots() {
    let mut session = arena();
    session.set_player_pose(Position::new(1200.0, LANE_Y), 0.0);

    for _ in 0..50 {
        while !session.fire() {
            session.tick(20.0);
        }
    }
    run(&mut session, 20, 20.0);

    assert_eq!(session.bullet_pool().created(), 1, "One bullet recycled for every shot");
    assert_eq!(session.bullet_pool().free_len(), 1);
}

#[test]
fn test_snapshot_hides_parked_bullets() {
    let mut session = arena();
    session.set_player_pose(Position::new(1200.0, LANE_Y), 0.0);
    session.fire();
    assert_eq!(session.tick(20.0).bullets.len(), 1);
    run(&mut session, 20, 20.0);
    assert!(session.tick(20.0).bullets.is_empty());
}

// ---- Player life cycle ----

#[test]
fn test_invincible_player_survives_contact() {
    let mut session = arena();
    let at = session.player_position().unwrap();
    session.place_enemy(at, EnemyPolicy::Chasing);

    let snap = session.tick(FRAME_MS);
    assert_eq!(snap.player.state, PlayerState::Alive { invincible: true });
    assert!(!snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::PlayerDied { .. })));
}

#[test]
fn test_invincibility_wears_off() {
    let mut session = arena();
    run(&mut session, 31, 100.0);
    let snap = session.tick(100.0);
    assert_eq!(snap.player.state, PlayerState::Alive { invincible: false });
    assert!(!snap.player.shielded);
}

#[test]
fn test_vulnerable_player_dies() {
    let mut session = arena();
    session.add_score(500);
    let events = kill_player(&mut session);

    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::PlayerDied { .. })));
    assert_eq!(
        session.player_state(),
        PlayerState::Dead {
            countdown_remaining: DEATH_COUNTDOWN_SECS
        }
    );
    assert!(session.is_frozen());
    assert!(!session.fire_enabled());
    assert!(!session.fire());
    assert!(session.timers().is_active(TimerId::DeathCountdown));
    assert_eq!(session.stats().best_score, Some(500));
}

#[test]
fn test_frozen_scene_does_not_move() {
    let mut session = arena();
    kill_player(&mut session);
    let enemy = session.place_enemy(Position::new(100.0, 100.0), EnemyPolicy::Chasing);

    run(&mut session, 10, 100.0);
    let pos = *session.world().get::<&Position>(enemy).unwrap();
    assert_eq!(pos, Position::new(100.0, 100.0));
}

#[test]
fn test_countdown_expiry_resets_session() {
    let mut session = arena();
    session.add_score(500);
    kill_player(&mut session);

    let events = run(&mut session, 95, 100.0);
    assert!(session.player_state().is_dead());
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::SessionReset)));

    let events = run(&mut session, 10, 100.0);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::SessionReset)));
    assert_eq!(session.player_state(), PlayerState::Alive { invincible: true });
    assert!(!session.is_frozen());
    assert!(session.fire_enabled());
    assert!(!session.timers().is_active(TimerId::DeathCountdown));

    let stats = session.stats();
    assert_eq!(stats.score, 0);
    assert_eq!(stats.best_score, Some(500), "Best survives the reset");
    assert_eq!(stats.kills, 0);
    assert_eq!(session.live().crates.len(), CRATE_MIN_COUNT, "Boxes topped up");
    assert_eq!(session.live().enemies.len(), ENEMY_COUNT_BY_TIER[0], "Enemies topped up");
    assert_eq!(session.player_position(), Some(crate::world_setup::player_start()));
}

#[test]
fn test_reset_clears_box_from_start_spot() {
    let mut session = arena();
    let start = crate::world_setup::player_start();
    session.place_crate(Position::new(start.x + 40.0, start.y), CrateKind::Wood);
    kill_player(&mut session);

    let events = run(&mut session, 105, 100.0);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::SessionReset)));
    assert_eq!(session.player_position(), Some(start));

    let world = session.world();
    for &entity in &session.live().crates {
        let pos = *world.get::<&Position>(entity).unwrap();
        assert!(pos.distance_to(&start) >= TANK_RADIUS + CRATE_RADIUS);
    }
    assert_eq!(session.live().crates.len(), CRATE_MIN_COUNT, "Removed box replaced");

    for angle in [0.0, 90.0, 180.0, 270.0] {
        let before = session.player_position().unwrap();
        session.move_player(angle, 1.0);
        run(&mut session, 5, FRAME_MS);
        assert_ne!(session.player_position().unwrap(), before, "Stuck at {angle}");
    }
}

#[test]
fn test_enemy_next_to_box_keeps_moving() {
    let mut session = arena();
    session.set_player_pose(Position::new(200.0, 400.0), 0.0);
    let enemy = session.place_enemy(Position::new(800.0, 400.0), EnemyPolicy::Chasing);
    session.place_crate(Position::new(830.0, 400.0), CrateKind::Metal);

    run(&mut session, 120, FRAME_MS);
    let pos = *session.world().get::<&Position>(enemy).unwrap();
    assert!(pos.x < 790.0, "Enemy backed off the box, x = {}", pos.x);
}

#[test]
fn test_spawned_boxes_keep_clear_of_enemies() {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::systems::spawner::place_crate;

    let mut world = hecs::World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut enemies = Vec::new();
    for gx in 0..9 {
        for gy in 0..5 {
            enemies.push(Position::new(
                100.0 + gx as f64 * 150.0,
                75.0 + gy as f64 * 150.0,
            ));
        }
    }

    let far_corner = Position::new(-1000.0, -1000.0);
    let mut placed = 0;
    for _ in 0..200 {
        let Some(entity) = place_crate(&mut world, &mut rng, far_corner, &[], &enemies) else {
            continue;
        };
        placed += 1;
        let pos = *world.get::<&Position>(entity).unwrap();
        for enemy in &enemies {
            assert!(pos.distance_to(enemy) >= TANK_RADIUS + CRATE_RADIUS);
        }
    }
    assert!(placed > 0);
}

#[test]
fn test_held_move_dropped_on_death() {
    let mut session = arena();
    session.set_player_pose(Position::new(300.0, LANE_Y), 0.0);
    session.move_player(0.0, 1.0);
    session.tick(FRAME_MS);
    kill_player(&mut session);
    assert!(session.player_state().is_dead());

    session.request_revival().unwrap();
    session.resolve_revival(RevivalOutcome::Granted).unwrap();
    run(&mut session, 8, 100.0);
    assert!(matches!(session.player_state(), PlayerState::Alive { .. }));

    let before = session.player_position().unwrap();
    run(&mut session, 10, FRAME_MS);
    assert_eq!(session.player_position(), Some(before), "No stale heading after revival");
}

#[test]
fn test_revival_granted() {
    let mut session = arena();
    session.add_score(700);
    kill_player(&mut session);

    session.request_revival().unwrap();
    assert_eq!(session.request_revival(), Err(SessionError::RevivalPending));
    session.resolve_revival(RevivalOutcome::Granted).unwrap();

    let snap = session.tick(100.0);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::RevivalRequested)));
    assert_eq!(snap.player.state, PlayerState::Reviving);
    assert!(!snap.frozen);
    assert!(snap.player.fire_enabled);
    assert!(snap.player.visible);
    assert!(!session.timers().is_active(TimerId::DeathCountdown));

    let events = run(&mut session, 6, 100.0);
    assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerRevived)));
    assert_eq!(session.player_state(), PlayerState::Alive { invincible: true });
    assert_eq!(session.stats().score, 700, "Revival keeps the score");
}

#[test]
fn test_revival_declined_stays_dead() {
    let mut session = arena();
    kill_player(&mut session);

    session.request_revival().unwrap();
    session.resolve_revival(RevivalOutcome::Declined).unwrap();
    session.tick(100.0);
    assert!(session.player_state().is_dead());
    assert!(session.is_frozen());

    // A fresh request is allowed after a refusal.
    assert!(session.request_revival().is_ok());
}

#[test]
fn test_failed_ad_revives_when_not_monetized() {
    let mut session = arena();
    kill_player(&mut session);

    session.request_revival().unwrap();
    session.resolve_revival(RevivalOutcome::Failed).unwrap();
    session.tick(100.0);
    assert_eq!(session.player_state(), PlayerState::Reviving);
}

#[test]
fn test_failed_ad_keeps_monetized_player_dead() {
    let mut session = GameSession::new(SessionConfig {
        monetized: true,
        ..Default::default()
    });
    session.start().unwrap();
    session.clear_field();
    kill_player(&mut session);

    session.request_revival().unwrap();
    session.resolve_revival(RevivalOutcome::Failed).unwrap();
    session.tick(100.0);
    assert!(session.player_state().is_dead());
}

#[test]
fn test_revival_requests_rejected_when_invalid() {
    let mut session = GameSession::new(SessionConfig::default());
    assert_eq!(session.request_revival(), Err(SessionError::NotActive));

    session.start().unwrap();
    assert_eq!(session.request_revival(), Err(SessionError::NotDead));
    assert_eq!(
        session.resolve_revival(RevivalOutcome::Granted),
        Err(SessionError::NoRevivalPending)
    );
}

// ---- Pilots ----

#[test]
fn test_rescue_mode_keeps_pilots_on_field() {
    let mut session = classic();
    session.add_score(RESCUE_UNLOCK_SCORE);
    session.tick(FRAME_MS);
    session.start_session(SessionMode::Rescue).unwrap();

    let snap = session.tick(FRAME_MS);
    assert_eq!(snap.mode, SessionMode::Rescue);
    assert!(snap.pilots.len() >= PILOT_MIN_COUNT);
}

#[test]
fn test_pilot_rescue_and_banking() {
    let mut session = rescue_arena();
    let player = session.player_position().unwrap();
    session.set_rescued_pilots(RESCUE_BANK_SIZE - 1);
    session.place_pilot(Position::new(player.x + 30.0, player.y));

    let events = run(&mut session, 1, FRAME_MS);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::PilotRescued { .. })));

    let stats = session.stats();
    assert_eq!(stats.score, PILOT_RESCUE_SCORE);
    assert_eq!(stats.rescued_pilots, 0);
    assert_eq!(stats.banked_pilots, RESCUE_BANK_SIZE);
    assert!(session.live().pilots.is_empty());
    let pool = session.pilot_pool();
    assert_eq!(pool.free_len(), pool.created(), "Every pilot parked");
}

#[test]
fn test_kill_in_rescue_mode_ejects_pilot() {
    let mut session = rescue_arena();
    session.set_player_pose(Position::new(200.0, LANE_Y), 0.0);
    session.place_enemy(Position::new(400.0, LANE_Y), EnemyPolicy::Wandering);

    session.fire();
    run(&mut session, 30, FRAME_MS);
    assert_eq!(session.stats().kills, 1);
    assert_eq!(session.live().pilots.len(), 1);
}

#[test]
fn test_pilot_expires() {
    let mut session = rescue_arena();
    session.place_pilot(Position::new(100.0, 100.0));

    let events = run(&mut session, 79, 100.0);
    assert_eq!(session.live().pilots.len(), 1, "Still waiting");
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::PilotExpired { .. })));

    let events = run(&mut session, 10, 100.0);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::PilotExpired { .. })));
    assert!(session.live().pilots.is_empty());
    let pool = session.pilot_pool();
    assert_eq!(pool.free_len(), pool.created(), "Every pilot parked");
}

#[test]
fn test_pilot_fades_before_expiry() {
    let mut session = rescue_arena();
    session.place_pilot(Position::new(100.0, 100.0));

    let snap = run_to_snapshot(&mut session, 83, 100.0);
    let alpha = snap.pilots[0].alpha;
    assert!(alpha < 1.0 && alpha > 0.0, "Fading, alpha = {alpha}");
}

#[test]
fn test_death_scatters_rescued_pilots_and_pauses_them() {
    let mut session = rescue_arena();
    session.set_rescued_pilots(3);
    kill_player(&mut session);

    assert_eq!(session.live().pilots.len(), 3);
    run(&mut session, 90, 100.0);
    assert_eq!(session.live().pilots.len(), 3, "Pilot timers paused while dead");
}

#[test]
fn test_death_scatter_is_capped() {
    let mut session = rescue_arena();
    session.set_rescued_pilots(20);
    kill_player(&mut session);
    assert_eq!(session.live().pilots.len(), MAX_SCATTER_PILOTS as usize);
}

#[test]
fn test_banking_held_while_dead() {
    let mut session = rescue_arena();
    session.set_rescued_pilots(RESCUE_BANK_SIZE + 2);
    kill_player(&mut session);

    assert_eq!(session.live().pilots.len(), (RESCUE_BANK_SIZE + 2) as usize);
    run(&mut session, 20, 100.0);
    let stats = session.stats();
    assert_eq!(stats.banked_pilots, 0, "Pilots carried at death are not banked");
    assert_eq!(stats.rescued_pilots, RESCUE_BANK_SIZE + 2);
}

#[test]
fn test_revival_clears_rescued_and_restarts_pilot_timers() {
    let mut session = rescue_arena();
    session.set_rescued_pilots(2);
    kill_player(&mut session);
    run(&mut session, 50, 100.0);

    session.request_revival().unwrap();
    session.resolve_revival(RevivalOutcome::Granted).unwrap();
    session.tick(100.0);
    assert_eq!(session.stats().rescued_pilots, 0);

    let pilots = session.live().pilots.clone();
    assert_eq!(pilots.len(), 2);
    for pilot in pilots {
        let timer = *session.world().get::<&ExpiryTimer>(pilot).unwrap();
        assert!(!timer.paused);
        assert_eq!(timer.remaining_ms, PILOT_LIFETIME_MS);
    }
}

// ---- Progression ----

#[test]
fn test_tier_up_event() {
    let mut session = arena();
    session.add_score(LEVEL_SPAN);
    let snap = session.tick(FRAME_MS);

    let tier_ups: Vec<_> = snap
        .events
        .iter()
        .filter_map(|e| match e {
            GameEvent::TierUp { rank } => Some(rank.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(tier_ups.len(), 1);
    assert_eq!(tier_ups[0].tier, RankTier::Bronze);
    assert_eq!(tier_ups[0].level, 2);
    assert!(snap.toasts.iter().any(|t| t.kind == ToastKind::TierUp));

    assert!(!session
        .tick(FRAME_MS)
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::TierUp { .. })));
}

#[test]
fn test_unlock_rescue_mode() {
    let mut session = arena();
    assert!(!session.is_unlocked(SessionMode::Rescue));
    session.add_score(RESCUE_UNLOCK_SCORE);

    let snap = session.tick(FRAME_MS);
    assert!(snap.events.iter().any(|e| matches!(
        e,
        GameEvent::Unlocked {
            mode: SessionMode::Rescue
        }
    )));
    assert_eq!(
        snap.toasts
            .iter()
            .filter(|t| t.kind == ToastKind::Unlock)
            .count(),
        1
    );
    assert!(session.is_unlocked(SessionMode::Rescue));

    let later = session.tick(FRAME_MS);
    assert!(!later.toasts.iter().any(|t| t.kind == ToastKind::Unlock));
}

#[test]
fn test_higher_tier_needs_more_enemies() {
    let mut session = classic();
    session.add_score(RESCUE_UNLOCK_SCORE);
    run(&mut session, 70, 20.0);
    assert_eq!(session.stats().rank.tier, RankTier::Gold);
    assert_eq!(session.live().enemies.len(), ENEMY_COUNT_BY_TIER[2]);
}

#[test]
fn test_new_best_on_death() {
    let mut session = arena();
    session.add_score(2500);
    let events = kill_player(&mut session);

    let best = events.iter().find_map(|e| match e {
        GameEvent::NewBest { snapshot } => Some(snapshot.clone()),
        _ => None,
    });
    let best = best.expect("NewBest on a first death with score");
    assert_eq!(best.score, 2500);
    assert_eq!(session.best_rank(), Some(best));
}

#[test]
fn test_zero_score_death_records_nothing() {
    let mut session = arena();
    let events = kill_player(&mut session);
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::NewBest { .. })));
    assert_eq!(session.best_rank(), None);
}

// ---- Events ----

#[test]
fn test_drain_events() {
    let mut session = arena();
    session.add_score(LEVEL_SPAN);
    session.tick(FRAME_MS);
    session.tick(FRAME_MS);

    let drained = session.drain_events();
    assert_eq!(drained.len(), 1);
    assert!(matches!(drained[0], GameEvent::TierUp { .. }));
    assert!(session.drain_events().is_empty());
}

#[test]
fn test_restart_clears_previous_session() {
    let mut session = arena();
    session.set_player_pose(Position::new(300.0, LANE_Y), 90.0);
    session.add_score(1200);
    session.fire();
    run(&mut session, 5, 20.0);

    session.start_session(SessionMode::Classic).unwrap();
    assert_eq!(session.time().tick, 0);
    assert_eq!(session.stats().score, 0);
    assert!(session.live().bullets.is_empty());
    assert_eq!(session.bullet_pool().created(), 0);
    assert_eq!(session.live().crates.len(), CRATE_MIN_COUNT);
    assert_eq!(session.player_position(), Some(crate::world_setup::player_start()));
}

#[test]
fn test_restart_records_best() {
    let mut session = arena();
    session.add_score(900);
    session.tick(FRAME_MS);

    session.start_session(SessionMode::Classic).unwrap();
    assert_eq!(session.stats().best_score, Some(900));
    let snap = session.tick(FRAME_MS);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::NewBest { snapshot } if snapshot.score == 900)));
}

#[test]
fn test_submit_score_keeps_session_running() {
    let mut session = arena();
    session.add_score(400);
    session.submit_score();

    assert_eq!(session.stats().best_score, Some(400));
    assert_eq!(session.stats().score, 400);
    assert_eq!(session.phase(), GamePhase::Active);
    assert_eq!(session.best_rank().map(|r| r.score), Some(400));
}
