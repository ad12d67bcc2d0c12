//! Tier-up detection.
//!
//! Holds the ascending list of level boundaries not yet reached. Each
//! boundary is consumed the first time the score reaches it and produces
//! exactly one tier-up, in order, even when one score change crosses
//! several boundaries.

use std::collections::VecDeque;

use tankrescue_core::constants::{LEVEL_SPAN, MAX_TIER_UP_INDEX};
use tankrescue_core::state::RankInfo;

use crate::rank::rank_info;

#[derive(Debug, Clone)]
pub struct TierUpTracker {
    remaining: VecDeque<u64>,
}

impl Default for TierUpTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TierUpTracker {
    pub fn new() -> Self {
        Self {
            remaining: Self::all_thresholds().collect(),
        }
    }

    /// Every level boundary up to `MAX_TIER_UP_INDEX`, ascending.
    fn all_thresholds() -> impl Iterator<Item = u64> {
        (1..=MAX_TIER_UP_INDEX).map(|i| i * LEVEL_SPAN)
    }

    /// Consume every boundary at or below `score`, returning the rank
    /// reached at each one, lowest first.
    pub fn check(&mut self, score: u64) -> Vec<RankInfo> {
        let mut reached = Vec::new();
        while let Some(&threshold) = self.remaining.front() {
            if score < threshold {
                break;
            }
            self.remaining.pop_front();
            reached.push(rank_info(threshold));
        }
        reached
    }

    /// Restore the full list (session reset).
    pub fn reset(&mut self) {
        self.remaining = Self::all_thresholds().collect();
    }

    /// Lowest boundary not yet reached.
    pub fn next_threshold(&self) -> Option<u64> {
        self.remaining.front().copied()
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}
