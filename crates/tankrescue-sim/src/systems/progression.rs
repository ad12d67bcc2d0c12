//! Progression system: turns score changes into tier-ups, unlocks and
//! rescue banking.
//!
//! Banking is held while the player is down (including the tick of the
//! hit) so the pilots carried at death are the ones that scatter.

use tankrescue_core::enums::{SessionMode, ToastKind};
use tankrescue_core::events::{GameEvent, Toast};

use tankrescue_progression::rank::tier_index;
use tankrescue_progression::store::KeyValueStore;
use tankrescue_progression::tier::TierUpTracker;
use tankrescue_progression::unlock::UnlockState;

use crate::modes::{apply_banking, ModeRules};
use crate::score::Scoreboard;

/// What one progression pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressionReport {
    pub tier_ups: usize,
    /// Persistent state was written and should be flushed.
    pub store_dirty: bool,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    score: &mut Scoreboard,
    tracker: &mut TierUpTracker,
    unlocks: &mut UnlockState,
    store: &mut dyn KeyValueStore,
    rules: &ModeRules,
    banking_held: bool,
    events: &mut Vec<GameEvent>,
    toasts: &mut Vec<Toast>,
    current_tick: u64,
) -> ProgressionReport {
    let mut report = ProgressionReport::default();

    for rank in tracker.check(score.score) {
        tracing::info!(tier = rank.rank_name(), level = rank.level, score = score.score, "tier up");
        toasts.push(Toast {
            kind: ToastKind::TierUp,
            message: format!("Rank up: {} {}", rank.rank_name(), rank.level),
            tick: current_tick,
        });
        events.push(GameEvent::TierUp { rank });
        report.tier_ups += 1;
    }
    score.tier_index = tier_index(score.score);

    let unlock = unlocks.check(store, score.score);
    if unlock.newly_unlocked {
        events.push(GameEvent::Unlocked {
            mode: SessionMode::Rescue,
        });
        report.store_dirty = true;
    }
    if unlock.notify {
        toasts.push(Toast {
            kind: ToastKind::Unlock,
            message: "Rescue mode unlocked".to_string(),
            tick: current_tick,
        });
        report.store_dirty = true;
    }

    if banking_held {
        return report;
    }
    let banking = apply_banking(rules, score);
    if banking.banks > 0 {
        toasts.push(Toast {
            kind: ToastKind::Milestone,
            message: format!("{} pilots secured", score.banked_pilots),
            tick: current_tick,
        });
    }
    if banking.high_difficulty_reached {
        tracing::info!(banked = score.banked_pilots, "high difficulty engaged");
        toasts.push(Toast {
            kind: ToastKind::Milestone,
            message: "Enemies are getting faster".to_string(),
            tick: current_tick,
        });
    }

    report
}
