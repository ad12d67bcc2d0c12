//! Game-mode rules.
//!
//! Each session mode is a fixed set of switches the systems consult:
//! whether pilots exist, how many must be kept on the field, and how rescued
//! pilots bank into session progress.

use tankrescue_core::constants::*;
use tankrescue_core::enums::SessionMode;

use crate::score::Scoreboard;

/// Switches for one game mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRules {
    pub mode: SessionMode,
    /// Killed enemies eject a pilot and the player can pick pilots up.
    pub pilots: bool,
    /// Live pilots the spawner keeps on the field.
    pub pilot_minimum: usize,
}

/// Rules for a session mode.
pub fn rules_for(mode: SessionMode) -> ModeRules {
    match mode {
        SessionMode::Classic => ModeRules {
            mode,
            pilots: false,
            pilot_minimum: 0,
        },
        SessionMode::Rescue => ModeRules {
            mode,
            pilots: true,
            pilot_minimum: PILOT_MIN_COUNT,
        },
    }
}

/// What one banking pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BankingOutcome {
    /// Full banks secured in this pass.
    pub banks: u32,
    /// The high-difficulty flag switched on in this pass.
    pub high_difficulty_reached: bool,
}

/// Move every full group of `RESCUE_BANK_SIZE` rescued pilots into the bank
/// and raise the difficulty flag once enough pilots are banked.
pub fn apply_banking(rules: &ModeRules, score: &mut Scoreboard) -> BankingOutcome {
    let mut outcome = BankingOutcome::default();
    if !rules.pilots {
        return outcome;
    }

    while score.rescued_pilots >= RESCUE_BANK_SIZE {
        score.rescued_pilots -= RESCUE_BANK_SIZE;
        score.banked_pilots += RESCUE_BANK_SIZE;
        outcome.banks += 1;
    }

    if !score.high_difficulty && score.banked_pilots >= RESCUE_HIGH_DIFFICULTY_BANKED {
        score.high_difficulty = true;
        outcome.high_difficulty_reached = true;
    }
    outcome
}
