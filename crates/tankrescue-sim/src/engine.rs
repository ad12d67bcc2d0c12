//! Session engine: the core of the game.
//!
//! `GameSession` owns the hecs ECS world, processes host commands, runs all
//! systems in a fixed order and produces `SessionSnapshot`s. Completely
//! headless (no renderer, no ad SDK), enabling deterministic testing.
//!
//! Order inside one tick:
//! 0. queued commands
//! 1. session timers, spawn check
//! 2. movement (player, enemies, bullets)
//! 3. collision
//! 4. pilot expiry, wreck timers
//! 5. progression
//! 6. player life cycle
//! 7. cleanup

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tankrescue_core::commands::PlayerCommand;
use tankrescue_core::components::{Bullet, Pilot, PlayerTank, Transform};
use tankrescue_core::config::SessionConfig;
use tankrescue_core::constants::*;
use tankrescue_core::enums::*;
use tankrescue_core::error::SessionError;
use tankrescue_core::events::{GameEvent, Toast};
use tankrescue_core::state::{RankSnapshot, SessionSnapshot, SessionStats};
use tankrescue_core::types::{Position, SimTime};

use tankrescue_progression::leaderboard::LeaderboardEstimator;
use tankrescue_progression::store::{KeyValueStore, MemoryStore, StoreError};
use tankrescue_progression::tier::TierUpTracker;
use tankrescue_progression::unlock::UnlockState;

use crate::lifecycle::{LifecycleAction, PlayerLifecycle};
use crate::live::LiveLists;
use crate::modes::{rules_for, ModeRules};
use crate::pool::EntityPool;
use crate::score::Scoreboard;
use crate::systems;
use crate::systems::player::MoveInput;
use crate::systems::snapshot::PlayerStatus;
use crate::systems::spawner::SpawnReport;
use crate::timers::{TimerId, Timers};
use crate::world_setup;

/// One playable session. Owns the ECS world and all session state.
pub struct GameSession {
    world: World,
    time: SimTime,
    phase: GamePhase,
    mode: SessionMode,
    rules: ModeRules,
    config: SessionConfig,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    /// Events for the next snapshot.
    events: Vec<GameEvent>,
    /// Events waiting for `drain_events`.
    outbox: Vec<GameEvent>,
    toasts: Vec<Toast>,

    // --- Entities ---
    player: Option<Entity>,
    live: LiveLists,
    bullet_pool: EntityPool<Bullet>,
    pilot_pool: EntityPool<Pilot>,

    // --- Player ---
    lifecycle: PlayerLifecycle,
    input: MoveInput,
    fire_enabled: bool,
    shielded: bool,
    frozen: bool,
    /// Revival answer waiting for the life-cycle step.
    pending_revival: Option<RevivalOutcome>,

    // --- Progress ---
    timers: Timers,
    score: Scoreboard,
    tier_tracker: TierUpTracker,
    unlocks: UnlockState,
    leaderboard: LeaderboardEstimator,
    store: Box<dyn KeyValueStore>,
}

impl GameSession {
    /// Create a session backed by a throwaway in-memory store.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_store(config, Box::new(MemoryStore::new()))
    }

    /// Create a session that reads and writes progression through `store`.
    pub fn with_store(config: SessionConfig, mut store: Box<dyn KeyValueStore>) -> Self {
        let unlocks = UnlockState::load(&*store);
        let leaderboard = LeaderboardEstimator::load(&mut *store, config.epoch_secs);

        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            mode: config.mode,
            rules: rules_for(config.mode),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            outbox: Vec::new(),
            toasts: Vec::new(),
            player: None,
            live: LiveLists::default(),
            bullet_pool: EntityPool::new(BULLET_POOL_CAPACITY),
            pilot_pool: EntityPool::new(PILOT_POOL_CAPACITY),
            lifecycle: PlayerLifecycle::new(0.0),
            input: MoveInput::default(),
            fire_enabled: false,
            shielded: false,
            frozen: false,
            pending_revival: None,
            timers: Timers::new(),
            score: Scoreboard::default(),
            tier_tracker: TierUpTracker::new(),
            unlocks,
            leaderboard,
            store,
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the session by `delta_ms` and return the resulting snapshot.
    /// Deltas are clamped to `MAX_TICK_MS`.
    pub fn tick(&mut self, delta_ms: f64) -> SessionSnapshot {
        let dt_ms = if delta_ms.is_finite() {
            delta_ms.clamp(0.0, MAX_TICK_MS)
        } else {
            0.0
        };

        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems(dt_ms);
            self.time.advance(dt_ms);
        }

        let events = std::mem::take(&mut self.events);
        self.outbox.extend(events.iter().cloned());
        let toasts = std::mem::take(&mut self.toasts);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.mode,
            self.player_status(),
            self.frozen,
            self.stats(),
            events,
            toasts,
        )
    }

    /// Start the mode named in the session config.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.start_session(self.config.mode)
    }

    /// Start (or restart) a session. Locked modes are refused.
    pub fn start_session(&mut self, mode: SessionMode) -> Result<(), SessionError> {
        if !self.unlocks.is_unlocked(mode) {
            return Err(SessionError::ModeLocked(mode));
        }
        if self.phase != GamePhase::Idle {
            self.submit_score();
        }

        self.world.clear();
        self.live.clear();
        self.bullet_pool = EntityPool::new(BULLET_POOL_CAPACITY);
        self.pilot_pool = EntityPool::new(PILOT_POOL_CAPACITY);
        self.timers.cancel_all();
        self.score.reset();
        self.tier_tracker.reset();
        self.time = SimTime::default();
        self.mode = mode;
        self.rules = rules_for(mode);
        self.lifecycle = PlayerLifecycle::new(self.time.elapsed_ms);
        self.input = MoveInput::default();
        self.fire_enabled = true;
        self.shielded = true;
        self.frozen = false;
        self.pending_revival = None;

        self.player = Some(world_setup::spawn_player(&mut self.world));
        self.timers
            .start_repeating(TimerId::SpawnCheck, SPAWN_CHECK_INTERVAL_MS);
        let spawned = self.top_up();
        self.phase = GamePhase::Active;

        tracing::info!(
            ?mode,
            seed = self.config.seed,
            crates = spawned.crates.spawned,
            enemies = spawned.enemies.spawned,
            pilots = spawned.pilots.spawned,
            "session started"
        );
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), SessionError> {
        if self.phase != GamePhase::Active {
            return Err(SessionError::NotActive);
        }
        self.phase = GamePhase::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), SessionError> {
        if self.phase != GamePhase::Paused {
            return Err(SessionError::NotActive);
        }
        self.phase = GamePhase::Active;
        Ok(())
    }

    /// Steer the player tank. Held until replaced; ignored while dead.
    pub fn move_player(&mut self, angle_deg: f64, strength: f64) {
        if self.lifecycle.state().is_dead() {
            tracing::debug!("move ignored while dead");
            return;
        }
        self.input = MoveInput::new(angle_deg, strength);
    }

    /// Fire one bullet now if firing is enabled and the cooldown elapsed.
    pub fn fire(&mut self) -> bool {
        if self.phase != GamePhase::Active || !self.fire_enabled || self.frozen {
            return false;
        }
        let Some(player) = self.player else {
            return false;
        };
        systems::player::fire(
            &mut self.world,
            player,
            &mut self.bullet_pool,
            &mut self.live.bullets,
        )
        .is_some()
    }

    /// Ask the host to show a revival ad. Emits `RevivalRequested`.
    pub fn request_revival(&mut self) -> Result<(), SessionError> {
        if self.phase == GamePhase::Idle {
            return Err(SessionError::NotActive);
        }
        let actions = self.lifecycle.request_revival()?;
        let now_ms = self.time.elapsed_ms;
        self.apply_actions(actions, now_ms);
        Ok(())
    }

    /// Deliver the ad outcome. Applied during the next tick's life-cycle
    /// step.
    pub fn resolve_revival(&mut self, outcome: RevivalOutcome) -> Result<(), SessionError> {
        if !self.lifecycle.revival_pending() {
            return Err(SessionError::NoRevivalPending);
        }
        self.pending_revival = Some(outcome);
        Ok(())
    }

    /// Offer the running score to the leaderboard without ending the
    /// session. Restarts do this automatically; call it before shutting
    /// a live session down.
    pub fn submit_score(&mut self) {
        let now_ms = self.time.elapsed_ms;
        self.record_best(now_ms);
    }

    /// Current session statistics.
    pub fn stats(&self) -> SessionStats {
        self.score.to_stats(self.leaderboard.best_score())
    }

    /// Events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Leaderboard estimate for the personal best, if any.
    pub fn best_rank(&mut self) -> Option<RankSnapshot> {
        self.leaderboard.current()
    }

    pub fn is_unlocked(&self, mode: SessionMode) -> bool {
        self.unlocks.is_unlocked(mode)
    }

    /// Persist pending store writes.
    pub fn flush_store(&mut self) -> Result<(), StoreError> {
        self.store.flush()
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        &*self.store
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn player_state(&self) -> PlayerState {
        self.lifecycle.state()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn fire_enabled(&self) -> bool {
        self.fire_enabled
    }

    pub fn player_position(&self) -> Option<Position> {
        let player = self.player?;
        self.world.get::<&Position>(player).ok().map(|p| *p)
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    // --- Test helpers ---

    /// Remove every enemy, box, bullet and pilot and stop the spawn check,
    /// leaving an empty field for hand-placed scenarios.
    #[cfg(test)]
    pub fn clear_field(&mut self) {
        self.timers.cancel(TimerId::SpawnCheck);
        for entity in self.live.enemies.drain(..).chain(self.live.crates.drain(..)) {
            let _ = self.world.despawn(entity);
        }
        for entity in std::mem::take(&mut self.live.bullets) {
            self.bullet_pool.release(&mut self.world, entity);
        }
        for entity in std::mem::take(&mut self.live.pilots) {
            self.pilot_pool.release(&mut self.world, entity);
        }
    }

    /// Place an enemy that can be shot on the next tick.
    #[cfg(test)]
    pub fn place_enemy(&mut self, position: Position, policy: EnemyPolicy) -> Entity {
        let spawn_tick = self.time.tick.wrapping_sub(1);
        let entity = world_setup::spawn_enemy(&mut self.world, position, policy, 0.0, spawn_tick);
        self.live.enemies.push(entity);
        entity
    }

    /// Place an enemy stamped with the current tick, as the spawner would.
    #[cfg(test)]
    pub fn place_fresh_enemy(&mut self, position: Position) -> Entity {
        let entity = world_setup::spawn_enemy(
            &mut self.world,
            position,
            EnemyPolicy::Chasing,
            0.0,
            self.time.tick,
        );
        self.live.enemies.push(entity);
        entity
    }

    #[cfg(test)]
    pub fn place_crate(&mut self, position: Position, kind: CrateKind) -> Entity {
        let entity = world_setup::spawn_crate(&mut self.world, position, kind);
        self.live.crates.push(entity);
        entity
    }

    #[cfg(test)]
    pub fn place_pilot(&mut self, position: Position) -> Entity {
        let entity = world_setup::place_pilot(&mut self.world, &mut self.pilot_pool, position, false);
        self.live.pilots.push(entity);
        entity
    }

    #[cfg(test)]
    pub fn set_player_pose(&mut self, position: Position, rotation_deg: f64) {
        if let Some(player) = self.player {
            if let Ok(mut pos) = self.world.get::<&mut Position>(player) {
                *pos = position;
            }
            if let Ok(mut transform) = self.world.get::<&mut Transform>(player) {
                transform.rotation_deg = rotation_deg;
            }
        }
    }

    /// End the spawn shield immediately.
    #[cfg(test)]
    pub fn expire_invincibility(&mut self) {
        let actions = self.lifecycle.update_invincibility(f64::INFINITY);
        let now_ms = self.time.elapsed_ms;
        self.apply_actions(actions, now_ms);
    }

    #[cfg(test)]
    pub fn add_score(&mut self, points: u64) {
        self.score.score += points;
    }

    #[cfg(test)]
    pub fn set_rescued_pilots(&mut self, count: u32) {
        self.score.rescued_pilots = count;
    }

    #[cfg(test)]
    pub fn live(&self) -> &LiveLists {
        &self.live
    }

    #[cfg(test)]
    pub fn bullet_pool(&self) -> &EntityPool<Bullet> {
        &self.bullet_pool
    }

    #[cfg(test)]
    pub fn pilot_pool(&self) -> &EntityPool<Pilot> {
        &self.pilot_pool
    }

    #[cfg(test)]
    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Process all queued commands. Rejected commands are logged and
    /// dropped.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        let result = match command {
            PlayerCommand::Move {
                angle_deg,
                strength,
            } => {
                self.move_player(angle_deg, strength);
                Ok(())
            }
            PlayerCommand::Fire => {
                self.fire();
                Ok(())
            }
            PlayerCommand::RequestRevival => self.request_revival(),
            PlayerCommand::ResolveRevival { outcome } => self.resolve_revival(outcome),
            PlayerCommand::StartSession { mode } => self.start_session(mode),
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Resume => self.resume(),
        };
        if let Err(error) = result {
            tracing::debug!(%error, "command ignored");
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt_ms: f64) {
        let Some(player) = self.player else {
            return;
        };
        let now_ms = self.time.elapsed_ms + dt_ms;
        let tick = self.time.tick;

        // 1. Session timers and population top-up
        let fired = self.timers.advance(dt_ms);
        if fired.contains(&TimerId::SpawnCheck) && !self.frozen {
            let spawned = self.top_up();
            if spawned.crates.abandoned || spawned.enemies.abandoned || spawned.pilots.abandoned {
                tracing::debug!(tick, "population below minimum after spawn check");
            }
        }

        // 2. Movement
        if !self.frozen {
            systems::player::run(
                &mut self.world,
                player,
                &self.input,
                &self.live.crates,
                dt_ms,
            );
            let target = self.player_position().unwrap_or_else(world_setup::player_start);
            systems::enemy_ai::run(
                &mut self.world,
                &mut self.rng,
                &self.live.enemies,
                &self.live.crates,
                target,
                self.score.high_difficulty,
                dt_ms,
            );
            systems::movement::run(&mut self.world, dt_ms);
        }

        // 3. Collision
        let mut player_hit = None;
        if !self.frozen && !self.lifecycle.state().is_dead() {
            let report = systems::collision::run(
                &mut self.world,
                &mut self.live,
                &mut self.bullet_pool,
                &mut self.pilot_pool,
                &mut self.score,
                &mut self.events,
                &self.rules,
                player,
                self.lifecycle.state().is_invincible(),
                tick,
            );
            player_hit = report.player_hit;
        }

        // 4. Pilot expiry (paused timers hold while frozen) and wrecks
        systems::pilots::run(
            &mut self.world,
            &mut self.live.pilots,
            &mut self.pilot_pool,
            &mut self.events,
            dt_ms,
        );
        if !self.frozen {
            systems::cleanup::advance_wrecks(&mut self.world, dt_ms);
        }

        // 5. Progression
        let banking_held = player_hit.is_some() || self.lifecycle.state().is_dead();
        let progress = systems::progression::run(
            &mut self.score,
            &mut self.tier_tracker,
            &mut self.unlocks,
            &mut *self.store,
            &self.rules,
            banking_held,
            &mut self.events,
            &mut self.toasts,
            tick,
        );
        if progress.store_dirty {
            self.flush_quietly();
        }

        // 6. Player life cycle
        self.run_lifecycle(player_hit, &fired, now_ms);

        // 7. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.live, &mut self.despawn_buffer);
    }

    /// Feed this tick's inputs to the life-cycle machine. A revival answer
    /// is handled before a countdown step from the same tick.
    fn run_lifecycle(&mut self, player_hit: Option<Position>, fired: &[TimerId], now_ms: f64) {
        if let Some(position) = player_hit {
            let actions = self
                .lifecycle
                .on_player_died(position, self.score.rescued_pilots);
            self.apply_actions(actions, now_ms);
        }

        if let Some(outcome) = self.pending_revival.take() {
            match self.lifecycle.resolve_revival(outcome, self.config.monetized) {
                Ok(actions) => self.apply_actions(actions, now_ms),
                Err(error) => tracing::debug!(%error, "revival outcome ignored"),
            }
        }

        for &id in fired {
            let actions = match id {
                TimerId::DeathCountdown => self.lifecycle.on_countdown_step(now_ms),
                TimerId::ReviveSequence => self.lifecycle.on_revive_sequence_done(now_ms),
                TimerId::SpawnCheck => continue,
            };
            self.apply_actions(actions, now_ms);
        }

        let actions = self.lifecycle.update_invincibility(now_ms);
        self.apply_actions(actions, now_ms);
    }

    fn apply_actions(&mut self, actions: Vec<LifecycleAction>, now_ms: f64) {
        for action in actions {
            match action {
                LifecycleAction::ShowShield => self.shielded = true,
                LifecycleAction::HideShield => self.shielded = false,
                LifecycleAction::EnableFire => self.fire_enabled = true,
                LifecycleAction::DisableFire => self.fire_enabled = false,
                LifecycleAction::FreezeScene => {
                    self.frozen = true;
                    self.input = MoveInput::default();
                }
                LifecycleAction::UnfreezeScene => self.frozen = false,
                LifecycleAction::ShowPlayer => self.set_player_visible(true),
                LifecycleAction::HidePlayer => self.set_player_visible(false),
                LifecycleAction::ScatterPilots { position, count } => {
                    if self.rules.pilots {
                        systems::pilots::scatter(
                            &mut self.world,
                            &mut self.rng,
                            &mut self.pilot_pool,
                            &mut self.live.pilots,
                            position,
                            count,
                        );
                    }
                }
                LifecycleAction::PausePilotTimers => {
                    systems::pilots::set_paused(&mut self.world, &self.live.pilots, true)
                }
                LifecycleAction::ResumePilotTimers => {
                    systems::pilots::set_paused(&mut self.world, &self.live.pilots, false)
                }
                LifecycleAction::ResetPilotTimers => {
                    systems::pilots::reset_all(&mut self.world, &self.live.pilots)
                }
                LifecycleAction::StartCountdown => self
                    .timers
                    .start_repeating(TimerId::DeathCountdown, COUNTDOWN_STEP_MS),
                LifecycleAction::CancelCountdown => {
                    self.timers.cancel(TimerId::DeathCountdown);
                }
                LifecycleAction::StartReviveSequence => self
                    .timers
                    .start_once(TimerId::ReviveSequence, REVIVE_SEQUENCE_MS),
                LifecycleAction::RecordBest => self.record_best(now_ms),
                LifecycleAction::ClearRescuedPilots => self.score.rescued_pilots = 0,
                LifecycleAction::ResetSession => self.reset_session(),
                LifecycleAction::Emit(event) => self.events.push(event),
            }
        }
    }

    /// Offer the session score to the leaderboard.
    fn record_best(&mut self, now_ms: f64) {
        let now_secs = self.config.epoch_secs + (now_ms / 1000.0) as u64;
        let Some(snapshot) =
            self.leaderboard
                .update_current_score(&mut *self.store, self.score.score, now_secs)
        else {
            return;
        };

        self.toasts.push(Toast {
            kind: ToastKind::NewBest,
            message: format!(
                "New best {}: {} {}, top {}%",
                snapshot.score,
                snapshot.rank_name,
                snapshot.level,
                100 - snapshot.percentile as u32
            ),
            tick: self.time.tick,
        });
        self.events.push(GameEvent::NewBest { snapshot });
        self.flush_quietly();
    }

    /// Zero score and statistics after the death countdown ran out.
    fn reset_session(&mut self) {
        self.score.reset();
        self.tier_tracker.reset();
        self.pending_revival = None;
        self.timers.cancel(TimerId::ReviveSequence);
        self.input = MoveInput::default();

        let start = world_setup::player_start();
        self.clear_crates_around(start);
        if let Some(player) = self.player {
            if let Ok(mut pos) = self.world.get::<&mut Position>(player) {
                *pos = start;
            }
            if let Ok(mut tank) = self.world.get::<&mut PlayerTank>(player) {
                tank.fire_cooldown_ms = 0.0;
            }
        }

        let spawned = self.top_up();
        tracing::info!(
            crates = spawned.crates.spawned,
            enemies = spawned.enemies.spawned,
            "session reset"
        );
    }

    /// Remove boxes a tank centred at `spot` would overlap. The next top-up
    /// replaces them elsewhere.
    fn clear_crates_around(&mut self, spot: Position) {
        let world = &mut self.world;
        self.live.crates.retain(|&entity| {
            let overlaps = world
                .get::<&Position>(entity)
                .map(|pos| pos.distance_to(&spot) < TANK_RADIUS + CRATE_RADIUS)
                .unwrap_or(false);
            if overlaps {
                tracing::debug!(?entity, "box cleared from the reset spot");
                let _ = world.despawn(entity);
            }
            !overlaps
        });
    }

    fn top_up(&mut self) -> SpawnReport {
        systems::spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.live,
            &mut self.pilot_pool,
            &self.rules,
            self.score.tier_index,
            self.time.tick,
        )
    }

    fn set_player_visible(&mut self, visible: bool) {
        if let Some(player) = self.player {
            if let Ok(mut transform) = self.world.get::<&mut Transform>(player) {
                transform.visible = visible;
            }
        }
    }

    fn player_status(&self) -> PlayerStatus {
        PlayerStatus {
            state: self.lifecycle.state(),
            shielded: self.shielded,
            fire_enabled: self.fire_enabled,
        }
    }

    /// Flush the store; a failure only costs durability, so it is logged.
    fn flush_quietly(&mut self) {
        if let Err(error) = self.store.flush() {
            tracing::warn!(%error, "could not persist progression");
        }
    }
}
