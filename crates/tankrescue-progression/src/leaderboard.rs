//! Synthetic leaderboard.
//!
//! There is no real multiplayer ranking: a best score is placed against a
//! modeled population per tier, with a small jitter drawn from a generator
//! seeded by `score % LEADERBOARD_SEED_MODULUS`. Identical scores therefore
//! always produce identical positions and percentiles.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use tankrescue_core::constants::*;
use tankrescue_core::state::RankSnapshot;

use crate::rank::{progress_in_tier, rank_info, tier_index};
use crate::store::{get_u64, KeyValueStore};

pub const BEST_SCORE_KEY: &str = "leaderboard.best_score";
pub const BEST_SCORE_AT_KEY: &str = "leaderboard.best_score_at";
pub const SNAPSHOT_KEY: &str = "leaderboard.rank_snapshot";

#[derive(Debug, Clone, Default)]
pub struct LeaderboardEstimator {
    best_score: Option<u64>,
    recorded_at: Option<u64>,
    snapshot: Option<RankSnapshot>,
}

impl LeaderboardEstimator {
    /// Read the persisted record, discarding it entirely when older than
    /// `LEADERBOARD_EXPIRY_DAYS`.
    pub fn load(store: &mut dyn KeyValueStore, now_secs: u64) -> Self {
        let best_score = get_u64(store, BEST_SCORE_KEY);
        let recorded_at = get_u64(store, BEST_SCORE_AT_KEY);
        let snapshot = store
            .get(SNAPSHOT_KEY)
            .and_then(|json| match serde_json::from_str::<RankSnapshot>(&json) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding unreadable rank snapshot");
                    None
                }
            });

        let expiry_secs = LEADERBOARD_EXPIRY_DAYS * SECS_PER_DAY;
        if let Some(at) = recorded_at {
            if now_secs.saturating_sub(at) > expiry_secs {
                tracing::info!(recorded_at = at, "best score expired, clearing record");
                store.remove(BEST_SCORE_KEY);
                store.remove(BEST_SCORE_AT_KEY);
                store.remove(SNAPSHOT_KEY);
                return Self::default();
            }
        }

        Self {
            best_score,
            recorded_at,
            snapshot,
        }
    }

    pub fn best_score(&self) -> Option<u64> {
        self.best_score
    }

    pub fn recorded_at(&self) -> Option<u64> {
        self.recorded_at
    }

    /// Record `score` if it beats the stored best (an empty record counts
    /// as zero). Non-improving scores leave the store untouched and return
    /// None.
    pub fn update_current_score(
        &mut self,
        store: &mut dyn KeyValueStore,
        score: u64,
        now_secs: u64,
    ) -> Option<RankSnapshot> {
        if score <= self.best_score.unwrap_or(0) {
            return None;
        }

        let snapshot = Self::estimate(score);
        store.set(BEST_SCORE_KEY, score.to_string());
        store.set(BEST_SCORE_AT_KEY, now_secs.to_string());
        match serde_json::to_string(&snapshot) {
            Ok(json) => store.set(SNAPSHOT_KEY, json),
            Err(e) => tracing::warn!(error = %e, "could not serialize rank snapshot"),
        }

        tracing::info!(
            score,
            rank = snapshot.rank,
            percentile = snapshot.percentile,
            "new personal best"
        );

        self.best_score = Some(score);
        self.recorded_at = Some(now_secs);
        self.snapshot = Some(snapshot.clone());
        Some(snapshot)
    }

    /// Snapshot for the current best score. Served from cache when it
    /// matches, recomputed otherwise.
    pub fn current(&mut self) -> Option<RankSnapshot> {
        let best = self.best_score?;
        match &self.snapshot {
            Some(cached) if cached.score == best => Some(cached.clone()),
            _ => {
                let fresh = Self::estimate(best);
                self.snapshot = Some(fresh.clone());
                Some(fresh)
            }
        }
    }

    /// Deterministic rank estimate for a score.
    pub fn estimate(score: u64) -> RankSnapshot {
        let total: u64 = TIER_POPULATION.iter().sum();
        let tier = tier_index(score);
        let above_tiers: u64 = TIER_POPULATION[tier + 1..].iter().sum();
        let own_tier = TIER_POPULATION[tier] as f64 * (1.0 - progress_in_tier(score));

        let mut rng = ChaCha8Rng::seed_from_u64(score % LEADERBOARD_SEED_MODULUS);
        let jitter: f64 = rng.gen_range(0.9..1.1);

        let players_above = (above_tiers as f64 + own_tier) * jitter;
        let rank = (players_above.round() as u64).clamp(1, total);
        let beaten = 1.0 - rank as f64 / total as f64;
        let percentile = ((beaten * 100.0).floor() as i64).clamp(0, 99) as u8;

        let info = rank_info(score);
        RankSnapshot {
            rank,
            score,
            rank_name: info.rank_name().to_string(),
            level: info.level,
            percentile,
        }
    }
}
