//! Enemy AI for TANKRESCUE.
//!
//! Implements the per-enemy chase/wander state machine with box avoidance
//! and playfield clamping.

pub mod behavior;

pub use tankrescue_core as core;
