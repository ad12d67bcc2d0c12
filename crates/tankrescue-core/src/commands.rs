//! Player commands sent from the host to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player and host actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Input ---
    /// Steer the tank. `strength` 0 stops, 1 is full speed.
    Move { angle_deg: f64, strength: f64 },
    /// Fire one bullet if the cooldown allows.
    Fire,

    // --- Revival ---
    /// Ask the ad collaborator for a revival while dead.
    RequestRevival,
    /// Asynchronous answer from the ad collaborator.
    ResolveRevival { outcome: RevivalOutcome },

    // --- Session control ---
    /// Start (or restart) a session in the given mode.
    StartSession { mode: SessionMode },
    Pause,
    Resume,
}
