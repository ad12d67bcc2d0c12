//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Destructible box variety.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrateKind {
    #[default]
    Wood,
    Metal,
    Treasure,
}

impl CrateKind {
    /// Hits needed to break a fresh box of this kind.
    pub fn hit_points(self) -> u32 {
        match self {
            CrateKind::Wood => WOOD_HIT_POINTS,
            CrateKind::Metal => METAL_HIT_POINTS,
            CrateKind::Treasure => TREASURE_HIT_POINTS,
        }
    }

    /// Score awarded when the box breaks.
    pub fn reward(self) -> u64 {
        match self {
            CrateKind::Wood => WOOD_REWARD,
            CrateKind::Metal => METAL_REWARD,
            CrateKind::Treasure => TREASURE_REWARD,
        }
    }
}

/// Enemy movement policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyPolicy {
    /// Turn toward the player every tick.
    #[default]
    Chasing,
    /// Hold a random heading, re-rolled on a fixed interval.
    Wandering,
}

/// Player life-cycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Alive { invincible: bool },
    Dead { countdown_remaining: u32 },
    /// Revival granted; short sequence before the player is alive again.
    Reviving,
}

impl Default for PlayerState {
    fn default() -> Self {
        PlayerState::Alive { invincible: true }
    }
}

impl PlayerState {
    pub fn is_dead(self) -> bool {
        matches!(self, PlayerState::Dead { .. })
    }

    pub fn is_invincible(self) -> bool {
        matches!(self, PlayerState::Alive { invincible: true } | PlayerState::Reviving)
    }
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Idle,
    Active,
    Paused,
}

/// Which game-mode driver runs the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionMode {
    /// Boxes and enemies only.
    #[default]
    Classic,
    /// Adds pilots to rescue; unlocked by score.
    Rescue,
}

/// Named rank tier, lowest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RankTier {
    #[default]
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
    GreatWall,
}

impl RankTier {
    pub const ALL: [RankTier; 7] = [
        RankTier::Bronze,
        RankTier::Silver,
        RankTier::Gold,
        RankTier::Platinum,
        RankTier::Diamond,
        RankTier::Master,
        RankTier::GreatWall,
    ];

    /// Position in `ALL`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            RankTier::Bronze => "Bronze",
            RankTier::Silver => "Silver",
            RankTier::Gold => "Gold",
            RankTier::Platinum => "Platinum",
            RankTier::Diamond => "Diamond",
            RankTier::Master => "Master",
            RankTier::GreatWall => "GreatWall",
        }
    }
}

/// Result reported by the ad collaborator for a revival request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevivalOutcome {
    Granted,
    Declined,
    /// Ad failed to load or show.
    Failed,
}

/// Category of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToastKind {
    TierUp,
    Unlock,
    Milestone,
    NewBest,
}
