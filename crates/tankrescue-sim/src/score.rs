//! Running score and statistics for one session.
//!
//! Stored on `GameSession`, not in the ECS world.

use tankrescue_core::constants::{ENEMY_KILL_SCORE, PILOT_RESCUE_SCORE};
use tankrescue_core::enums::CrateKind;
use tankrescue_core::state::SessionStats;

use tankrescue_progression::rank::rank_info;

#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    /// Never decreases within a session; only a reset zeroes it.
    pub score: u64,
    pub kills: u32,
    pub wood_boxes: u32,
    pub metal_boxes: u32,
    pub treasure_boxes: u32,
    /// Rescued since the last bank or revival.
    pub rescued_pilots: u32,
    pub banked_pilots: u32,
    pub high_difficulty: bool,
    /// Rank tier index for the current score, refreshed by progression.
    pub tier_index: usize,
}

impl Scoreboard {
    pub fn record_kill(&mut self) {
        self.kills += 1;
        self.score += ENEMY_KILL_SCORE;
    }

    pub fn record_box(&mut self, kind: CrateKind, reward: u64) {
        match kind {
            CrateKind::Wood => self.wood_boxes += 1,
            CrateKind::Metal => self.metal_boxes += 1,
            CrateKind::Treasure => self.treasure_boxes += 1,
        }
        self.score += reward;
    }

    pub fn record_rescue(&mut self) {
        self.rescued_pilots += 1;
        self.score += PILOT_RESCUE_SCORE;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn to_stats(&self, best_score: Option<u64>) -> SessionStats {
        SessionStats {
            score: self.score,
            rank: rank_info(self.score),
            kills: self.kills,
            wood_boxes: self.wood_boxes,
            metal_boxes: self.metal_boxes,
            treasure_boxes: self.treasure_boxes,
            rescued_pilots: self.rescued_pilots,
            banked_pilots: self.banked_pilots,
            high_difficulty: self.high_difficulty,
            best_score,
        }
    }
}
