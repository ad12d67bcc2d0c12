//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::enums::SessionMode;

/// Configuration for creating a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// RNG seed for determinism. Same seed = same session.
    pub seed: u64,
    /// Mode started by `GameSession::start`.
    pub mode: SessionMode,
    /// Whether revival requires a successful ad. When false, a failed ad
    /// still grants the revival.
    pub monetized: bool,
    /// Wall clock (unix seconds) at session creation, used for persisted
    /// timestamps.
    pub epoch_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            mode: SessionMode::Classic,
            monetized: false,
            epoch_secs: 0,
        }
    }
}
