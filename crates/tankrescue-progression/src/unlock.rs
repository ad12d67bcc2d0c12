//! Mode unlocks.
//!
//! Rescue mode unlocks the first time a session score reaches
//! `RESCUE_UNLOCK_SCORE`. The unlock and the one-time "you unlocked it"
//! notification are separate persisted flags, so the notification is shown
//! once across the lifetime of the store even if the process dies between
//! the two writes.

use tankrescue_core::constants::RESCUE_UNLOCK_SCORE;
use tankrescue_core::enums::SessionMode;

use crate::store::{get_flag, set_flag, KeyValueStore};

pub const RESCUE_UNLOCKED_KEY: &str = "unlock.rescue_mode";
pub const RESCUE_NOTIFIED_KEY: &str = "unlock.rescue_mode.notified";

/// What a score check changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnlockOutcome {
    /// The flag flipped during this check.
    pub newly_unlocked: bool,
    /// Show the first-unlock notification now.
    pub notify: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnlockState {
    rescue_unlocked: bool,
    rescue_notified: bool,
}

impl UnlockState {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            rescue_unlocked: get_flag(store, RESCUE_UNLOCKED_KEY),
            rescue_notified: get_flag(store, RESCUE_NOTIFIED_KEY),
        }
    }

    pub fn is_unlocked(&self, mode: SessionMode) -> bool {
        match mode {
            SessionMode::Classic => true,
            SessionMode::Rescue => self.rescue_unlocked,
        }
    }

    /// Apply a score. Unlocking is one-way; once set the flag is never
    /// cleared by a lower score.
    pub fn check(&mut self, store: &mut dyn KeyValueStore, score: u64) -> UnlockOutcome {
        let mut outcome = UnlockOutcome::default();

        if !self.rescue_unlocked && score >= RESCUE_UNLOCK_SCORE {
            self.rescue_unlocked = true;
            set_flag(store, RESCUE_UNLOCKED_KEY, true);
            outcome.newly_unlocked = true;
            tracing::info!(score, "rescue mode unlocked");
        }

        if self.rescue_unlocked && !self.rescue_notified {
            self.rescue_notified = true;
            set_flag(store, RESCUE_NOTIFIED_KEY, true);
            outcome.notify = true;
        }

        outcome
    }
}
