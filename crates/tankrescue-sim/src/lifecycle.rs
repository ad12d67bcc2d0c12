//! Player life-cycle state machine.
//!
//! `Alive { invincible }` → `Dead { countdown }` → either `Reviving` (ad
//! granted) → `Alive`, or a session reset when the countdown runs out.
//!
//! The machine is plain data. Every transition returns the list of
//! `LifecycleAction`s the engine has to apply to the world; invalid
//! transitions return no actions and leave the state untouched.

use tankrescue_core::constants::*;
use tankrescue_core::enums::{PlayerState, RevivalOutcome};
use tankrescue_core::error::SessionError;
use tankrescue_core::events::GameEvent;
use tankrescue_core::types::Position;

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleAction {
    ShowShield,
    HideShield,
    EnableFire,
    DisableFire,
    FreezeScene,
    UnfreezeScene,
    ShowPlayer,
    HidePlayer,
    /// Drop `count` pilots around the death position.
    ScatterPilots { position: Position, count: u32 },
    PausePilotTimers,
    ResumePilotTimers,
    /// Restart every pilot's lifetime from full.
    ResetPilotTimers,
    StartCountdown,
    CancelCountdown,
    StartReviveSequence,
    /// Offer the session score to the leaderboard.
    RecordBest,
    ClearRescuedPilots,
    /// Zero score and statistics, reset tier tracking, top up populations.
    ResetSession,
    Emit(GameEvent),
}

#[derive(Debug, Clone)]
pub struct PlayerLifecycle {
    state: PlayerState,
    /// Session time at which invincibility ends.
    invincible_until_ms: Option<f64>,
    revival_pending: bool,
}

impl PlayerLifecycle {
    /// Freshly spawned player, shielded for `INVINCIBLE_MS`.
    pub fn new(now_ms: f64) -> Self {
        Self {
            state: PlayerState::Alive { invincible: true },
            invincible_until_ms: Some(now_ms + INVINCIBLE_MS),
            revival_pending: false,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn invincible_until_ms(&self) -> Option<f64> {
        self.invincible_until_ms
    }

    pub fn revival_pending(&self) -> bool {
        self.revival_pending
    }

    /// Drop the shield once its deadline has passed.
    pub fn update_invincibility(&mut self, now_ms: f64) -> Vec<LifecycleAction> {
        match (self.state, self.invincible_until_ms) {
            (PlayerState::Alive { invincible: true }, Some(deadline)) if now_ms >= deadline => {
                self.state = PlayerState::Alive { invincible: false };
                self.invincible_until_ms = None;
                vec![LifecycleAction::HideShield]
            }
            _ => Vec::new(),
        }
    }

    /// Collision with an enemy. Only a vulnerable, living player dies.
    pub fn on_player_died(&mut self, position: Position, rescued_pilots: u32) -> Vec<LifecycleAction> {
        if self.state != (PlayerState::Alive { invincible: false }) {
            tracing::debug!(state = ?self.state, "death ignored");
            return Vec::new();
        }

        self.state = PlayerState::Dead {
            countdown_remaining: DEATH_COUNTDOWN_SECS,
        };
        self.revival_pending = false;
        tracing::info!(x = position.x, y = position.y, "player died");

        vec![
            LifecycleAction::DisableFire,
            LifecycleAction::FreezeScene,
            LifecycleAction::HidePlayer,
            LifecycleAction::ScatterPilots {
                position,
                count: rescued_pilots.min(MAX_SCATTER_PILOTS),
            },
            LifecycleAction::PausePilotTimers,
            LifecycleAction::StartCountdown,
            LifecycleAction::RecordBest,
            LifecycleAction::Emit(GameEvent::PlayerDied { position }),
        ]
    }

    /// Ask the ad collaborator for a revival.
    pub fn request_revival(&mut self) -> Result<Vec<LifecycleAction>, SessionError> {
        if !self.state.is_dead() {
            return Err(SessionError::NotDead);
        }
        if self.revival_pending {
            return Err(SessionError::RevivalPending);
        }
        self.revival_pending = true;
        Ok(vec![LifecycleAction::Emit(GameEvent::RevivalRequested)])
    }

    /// Apply the collaborator's answer. A failed ad still revives unless
    /// the session is monetized.
    pub fn resolve_revival(
        &mut self,
        outcome: RevivalOutcome,
        monetized: bool,
    ) -> Result<Vec<LifecycleAction>, SessionError> {
        if !self.revival_pending || !self.state.is_dead() {
            return Err(SessionError::NoRevivalPending);
        }
        self.revival_pending = false;

        let granted = match outcome {
            RevivalOutcome::Granted => true,
            RevivalOutcome::Declined => false,
            RevivalOutcome::Failed if monetized => {
                tracing::warn!("revival ad failed, player stays dead");
                false
            }
            RevivalOutcome::Failed => {
                tracing::warn!("revival ad failed, reviving anyway");
                true
            }
        };
        if !granted {
            return Ok(Vec::new());
        }

        self.state = PlayerState::Reviving;
        tracing::info!("revival granted");
        Ok(vec![
            LifecycleAction::CancelCountdown,
            LifecycleAction::UnfreezeScene,
            LifecycleAction::EnableFire,
            LifecycleAction::ShowPlayer,
            LifecycleAction::ShowShield,
            LifecycleAction::ResetPilotTimers,
            LifecycleAction::ResumePilotTimers,
            LifecycleAction::ClearRescuedPilots,
            LifecycleAction::StartReviveSequence,
        ])
    }

    /// The revival sequence finished: alive again with a fresh shield.
    pub fn on_revive_sequence_done(&mut self, now_ms: f64) -> Vec<LifecycleAction> {
        if self.state != PlayerState::Reviving {
            return Vec::new();
        }
        self.state = PlayerState::Alive { invincible: true };
        self.invincible_until_ms = Some(now_ms + INVINCIBLE_MS);
        tracing::info!("player revived");
        vec![LifecycleAction::Emit(GameEvent::PlayerRevived)]
    }

    /// One second of the death countdown elapsed. Reaching zero resets the
    /// session.
    pub fn on_countdown_step(&mut self, now_ms: f64) -> Vec<LifecycleAction> {
        let PlayerState::Dead { countdown_remaining } = self.state else {
            return Vec::new();
        };
        let remaining = countdown_remaining.saturating_sub(1);
        if remaining > 0 {
            self.state = PlayerState::Dead {
                countdown_remaining: remaining,
            };
            return Vec::new();
        }

        self.state = PlayerState::Alive { invincible: true };
        self.invincible_until_ms = Some(now_ms + INVINCIBLE_MS);
        self.revival_pending = false;
        tracing::info!("countdown expired, resetting session");
        vec![
            LifecycleAction::CancelCountdown,
            LifecycleAction::ResetSession,
            LifecycleAction::UnfreezeScene,
            LifecycleAction::EnableFire,
            LifecycleAction::ShowPlayer,
            LifecycleAction::ShowShield,
            LifecycleAction::ResumePilotTimers,
            LifecycleAction::Emit(GameEvent::SessionReset),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vulnerable() -> PlayerLifecycle {
        let mut fsm = PlayerLifecycle::new(0.0);
        fsm.update_invincibility(INVINCIBLE_MS);
        fsm
    }

    fn dead() -> PlayerLifecycle {
        let mut fsm = vulnerable();
        fsm.on_player_died(Position::new(100.0, 100.0), 3);
        fsm
    }

    fn has(actions: &[LifecycleAction], wanted: &LifecycleAction) -> bool {
        actions.iter().any(|a| a == wanted)
    }

    #[test]
    fn test_spawn_is_shielded_until_deadline() {
        let mut fsm = PlayerLifecycle::new(1000.0);
        assert!(fsm.state().is_invincible());
        assert!(fsm.update_invincibility(3999.0).is_empty());

        let actions = fsm.update_invincibility(4000.0);
        assert_eq!(actions, vec![LifecycleAction::HideShield]);
        assert_eq!(fsm.state(), PlayerState::Alive { invincible: false });
        assert!(fsm.update_invincibility(9000.0).is_empty(), "shield drops once");
    }

    #[test]
    fn test_invincible_player_cannot_die() {
        let mut fsm = PlayerLifecycle::new(0.0);
        assert!(fsm.on_player_died(Position::default(), 0).is_empty());
        assert!(!fsm.state().is_dead());
    }

    #[test]
    fn test_death_actions() {
        let mut fsm = vulnerable();
        let pos = Position::new(10.0, 20.0);
        let actions = fsm.on_player_died(pos, 12);

        assert_eq!(
            fsm.state(),
            PlayerState::Dead {
                countdown_remaining: DEATH_COUNTDOWN_SECS
            }
        );
        assert!(has(&actions, &LifecycleAction::FreezeScene));
        assert!(has(&actions, &LifecycleAction::DisableFire));
        assert!(has(&actions, &LifecycleAction::StartCountdown));
        assert!(has(&actions, &LifecycleAction::RecordBest));
        assert!(has(
            &actions,
            &LifecycleAction::ScatterPilots {
                position: pos,
                count: MAX_SCATTER_PILOTS
            }
        ));
        assert!(has(&actions, &LifecycleAction::Emit(GameEvent::PlayerDied { position: pos })));
    }

    #[test]
    fn test_death_while_dead_is_ignored() {
        let mut fsm = dead();
        assert!(fsm.on_player_died(Position::default(), 0).is_empty());
    }

    #[test]
    fn test_revival_request_rules() {
        let mut fsm = vulnerable();
        assert_eq!(fsm.request_revival(), Err(SessionError::NotDead));

        let mut fsm = dead();
        assert_eq!(
            fsm.request_revival(),
            Ok(vec![LifecycleAction::Emit(GameEvent::RevivalRequested)])
        );
        assert_eq!(fsm.request_revival(), Err(SessionError::RevivalPending));
    }

    #[test]
    fn test_resolve_without_request_is_rejected() {
        let mut fsm = dead();
        assert_eq!(
            fsm.resolve_revival(RevivalOutcome::Granted, false),
            Err(SessionError::NoRevivalPending)
        );
    }

    #[test]
    fn test_granted_revival_sequence() {
        let mut fsm = dead();
        fsm.request_revival().unwrap();
        let actions = fsm.resolve_revival(RevivalOutcome::Granted, true).unwrap();

        assert_eq!(fsm.state(), PlayerState::Reviving);
        assert!(fsm.state().is_invincible());
        assert!(has(&actions, &LifecycleAction::CancelCountdown));
        assert!(has(&actions, &LifecycleAction::ClearRescuedPilots));
        assert!(has(&actions, &LifecycleAction::ResetPilotTimers));
        assert!(has(&actions, &LifecycleAction::StartReviveSequence));

        let done = fsm.on_revive_sequence_done(5000.0);
        assert_eq!(done, vec![LifecycleAction::Emit(GameEvent::PlayerRevived)]);
        assert_eq!(fsm.state(), PlayerState::Alive { invincible: true });
        assert_eq!(fsm.invincible_until_ms(), Some(5000.0 + INVINCIBLE_MS));
    }

    #[test]
    fn test_declined_revival_stays_dead() {
        let mut fsm = dead();
        fsm.request_revival().unwrap();
        let actions = fsm.resolve_revival(RevivalOutcome::Declined, false).unwrap();
        assert!(actions.is_empty());
        assert!(fsm.state().is_dead());
        assert!(!fsm.revival_pending());
        assert!(fsm.request_revival().is_ok(), "may ask again after a decline");
    }

    #[test]
    fn test_failed_revival_depends_on_monetization() {
        let mut free = dead();
        free.request_revival().unwrap();
        free.resolve_revival(RevivalOutcome::Failed, false).unwrap();
        assert_eq!(free.state(), PlayerState::Reviving);

        let mut paid = dead();
        paid.request_revival().unwrap();
        paid.resolve_revival(RevivalOutcome::Failed, true).unwrap();
        assert!(paid.state().is_dead());
    }

    #[test]
    fn test_countdown_reaches_reset() {
        let mut fsm = dead();
        for step in 1..DEATH_COUNTDOWN_SECS {
            assert!(fsm.on_countdown_step(step as f64 * 1000.0).is_empty());
            assert_eq!(
                fsm.state(),
                PlayerState::Dead {
                    countdown_remaining: DEATH_COUNTDOWN_SECS - step
                }
            );
        }
        let actions = fsm.on_countdown_step(10_000.0);
        assert!(has(&actions, &LifecycleAction::ResetSession));
        assert!(has(&actions, &LifecycleAction::Emit(GameEvent::SessionReset)));
        assert_eq!(fsm.state(), PlayerState::Alive { invincible: true });
    }

    #[test]
    fn test_reset_drops_pending_revival() {
        let mut fsm = dead();
        fsm.request_revival().unwrap();
        for step in 0..DEATH_COUNTDOWN_SECS {
            fsm.on_countdown_step(step as f64);
        }
        assert!(!fsm.revival_pending());
        assert_eq!(
            fsm.resolve_revival(RevivalOutcome::Granted, false),
            Err(SessionError::NoRevivalPending)
        );
    }

    #[test]
    fn test_countdown_ignored_after_revival() {
        let mut fsm = dead();
        fsm.request_revival().unwrap();
        fsm.resolve_revival(RevivalOutcome::Granted, false).unwrap();
        assert!(fsm.on_countdown_step(0.0).is_empty());
        assert_eq!(fsm.state(), PlayerState::Reviving);
    }
}
