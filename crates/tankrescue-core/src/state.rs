//! Session snapshot: the complete visible state handed to the renderer each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{GameEvent, Toast};
use crate::types::{Position, SimTime};

/// Complete session state broadcast after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub mode: SessionMode,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub crates: Vec<CrateView>,
    pub bullets: Vec<EntityView>,
    pub pilots: Vec<EntityView>,
    /// Scene drawn greyed out and motionless (player dead).
    pub frozen: bool,
    pub stats: SessionStats,
    pub events: Vec<GameEvent>,
    pub toasts: Vec<Toast>,
}

/// Player tank view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Position,
    pub rotation_deg: f64,
    pub visible: bool,
    pub state: PlayerState,
    /// Draw the invincibility shield.
    pub shielded: bool,
    pub fire_enabled: bool,
}

/// Minimal view for pooled entities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityView {
    pub position: Position,
    pub rotation_deg: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub position: Position,
    pub rotation_deg: f64,
    pub policy: EnemyPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrateView {
    pub position: Position,
    pub kind: CrateKind,
    pub hit_points: u32,
    pub wrecked: bool,
}

/// Asset names for a rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSet {
    pub tier_icon: String,
    pub level_badge: String,
}

/// Rank derived from a cumulative score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankInfo {
    pub tier: RankTier,
    /// 1-based level inside the tier.
    pub level: u32,
    pub icons: IconSet,
}

impl RankInfo {
    pub fn rank_name(&self) -> &'static str {
        self.tier.name()
    }
}

/// Persisted leaderboard estimate for a personal best.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankSnapshot {
    /// Estimated leaderboard position (1 = top).
    pub rank: u64,
    pub score: u64,
    pub rank_name: String,
    pub level: u32,
    /// Share of the modeled population beaten, 0..=99.
    pub percentile: u8,
}

/// Running session statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub score: u64,
    pub rank: RankInfo,
    pub kills: u32,
    pub wood_boxes: u32,
    pub metal_boxes: u32,
    pub treasure_boxes: u32,
    /// Rescued pilots not yet banked (lost on death).
    pub rescued_pilots: u32,
    pub banked_pilots: u32,
    pub high_difficulty: bool,
    pub best_score: Option<u64>,
}
