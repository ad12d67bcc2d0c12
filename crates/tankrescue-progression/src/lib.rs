//! Progression for TANKRESCUE.
//!
//! Rank tiers and levels derived from score, tier-up detection, mode
//! unlocks, the synthetic leaderboard estimate, and the key/value store
//! they persist through.

pub mod leaderboard;
pub mod rank;
pub mod store;
pub mod tier;
pub mod unlock;

pub use tankrescue_core as core;
