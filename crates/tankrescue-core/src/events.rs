//! Events emitted by the simulation for the host, audio and UI.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::state::{RankInfo, RankSnapshot};
use crate::types::Position;

/// Everything observable that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A bullet destroyed an enemy.
    EnemyKilled { position: Position, reward: u64 },
    /// A bullet broke a box.
    BoxDestroyed { kind: CrateKind, reward: u64 },
    /// The player picked up a pilot.
    PilotRescued { position: Position, reward: u64 },
    /// An un-rescued pilot faded out.
    PilotExpired { position: Position },
    /// Score crossed a level boundary.
    TierUp { rank: RankInfo },
    /// A game mode became available.
    Unlocked { mode: SessionMode },
    /// The player collided with an enemy while vulnerable.
    PlayerDied { position: Position },
    /// The host should show a rewarded ad.
    RevivalRequested,
    /// Revival completed; the player is back.
    PlayerRevived,
    /// Countdown expired; score and statistics were zeroed.
    SessionReset,
    /// A new personal best was recorded.
    NewBest { snapshot: RankSnapshot },
}

/// Message for the toast collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub tick: u64,
}
