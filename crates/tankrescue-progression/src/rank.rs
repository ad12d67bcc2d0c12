//! Score → rank mapping.
//!
//! Score space is split into a fixed table of named tiers, each holding a
//! fixed number of levels of `LEVEL_SPAN` points. Past the table's top
//! boundary the last tier keeps growing one level per `LEVEL_SPAN`, with no
//! cap.

use tankrescue_core::constants::LEVEL_SPAN;
use tankrescue_core::enums::RankTier;
use tankrescue_core::state::{IconSet, RankInfo};

/// One row of the rank table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierBand {
    pub tier: RankTier,
    /// First score belonging to this tier.
    pub start: u64,
    /// Levels in the tier; `None` for the open-ended top tier.
    pub levels: Option<u32>,
}

/// Ordered rank table, lowest tier first. Each bounded tier ends where the
/// next one starts.
pub static RANK_TABLE: [TierBand; 7] = [
    TierBand { tier: RankTier::Bronze, start: 0, levels: Some(3) },
    TierBand { tier: RankTier::Silver, start: 9_000, levels: Some(3) },
    TierBand { tier: RankTier::Gold, start: 18_000, levels: Some(4) },
    TierBand { tier: RankTier::Platinum, start: 30_000, levels: Some(4) },
    TierBand { tier: RankTier::Diamond, start: 42_000, levels: Some(4) },
    TierBand { tier: RankTier::Master, start: 54_000, levels: Some(4) },
    TierBand { tier: RankTier::GreatWall, start: 66_000, levels: None },
];

/// Rank for a cumulative score.
pub fn rank_info(score: u64) -> RankInfo {
    let band = band_for(score);
    let level = ((score - band.start) / LEVEL_SPAN) as u32 + 1;
    let level = match band.levels {
        Some(max) => level.min(max),
        None => level,
    };
    RankInfo {
        tier: band.tier,
        level,
        icons: icons_for(band.tier, level),
    }
}

/// Tier index (position in `RANK_TABLE`) for a score.
pub fn tier_index(score: u64) -> usize {
    band_for(score).tier.index()
}

/// First score of the given tier.
pub fn tier_start(tier: RankTier) -> u64 {
    RANK_TABLE[tier.index()].start
}

/// Where `score` sits inside its tier, in `[0, 1)`. The open top tier
/// approaches 1 asymptotically.
pub fn progress_in_tier(score: u64) -> f64 {
    let band = band_for(score);
    let into = (score - band.start) as f64;
    match band.levels {
        Some(levels) => {
            let span = (levels as u64 * LEVEL_SPAN) as f64;
            (into / span).clamp(0.0, 1.0 - f64::EPSILON)
        }
        None => {
            let levels = into / LEVEL_SPAN as f64;
            levels / (levels + 10.0)
        }
    }
}

fn band_for(score: u64) -> &'static TierBand {
    RANK_TABLE
        .iter()
        .rev()
        .find(|band| score >= band.start)
        .unwrap_or(&RANK_TABLE[0])
}

/// Badge art exists for levels 1-9; higher GreatWall levels reuse the last.
fn icons_for(tier: RankTier, level: u32) -> IconSet {
    let name = tier.name().to_ascii_lowercase();
    IconSet {
        tier_icon: format!("rank_{name}"),
        level_badge: format!("rank_{name}_level_{}", level.min(9)),
    }
}
