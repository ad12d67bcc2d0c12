//! Session timers.
//!
//! Timers that belong to the session as a whole rather than to one entity
//! (per-entity timers such as pilot expiry live in components). Each timer
//! has a fixed identity, so starting one that is already running restarts
//! it instead of stacking a second copy.

use std::collections::BTreeMap;

/// Identity of a session timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerId {
    /// Population top-up.
    SpawnCheck,
    /// One step of the death countdown.
    DeathCountdown,
    /// End of the revival sequence.
    ReviveSequence,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    remaining_ms: f64,
    duration_ms: f64,
    repeating: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Timers {
    entries: BTreeMap<TimerId, Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire once after `delay_ms`.
    pub fn start_once(&mut self, id: TimerId, delay_ms: f64) {
        self.start(id, delay_ms, false);
    }

    /// Fire every `period_ms` until cancelled.
    pub fn start_repeating(&mut self, id: TimerId, period_ms: f64) {
        self.start(id, period_ms, true);
    }

    fn start(&mut self, id: TimerId, duration_ms: f64, repeating: bool) {
        self.entries.insert(
            id,
            Timer {
                remaining_ms: duration_ms,
                duration_ms,
                repeating,
            },
        );
    }

    /// Returns whether the timer was running.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn remaining_ms(&self, id: TimerId) -> Option<f64> {
        self.entries.get(&id).map(|t| t.remaining_ms)
    }

    /// Advance every running timer and return the ids that fired, in
    /// `TimerId` order. A repeating timer appears once per elapsed period;
    /// one-shot timers are removed when they fire.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<TimerId> {
        let mut fired = Vec::new();
        let mut finished = Vec::new();

        for (&id, timer) in self.entries.iter_mut() {
            timer.remaining_ms -= dt_ms;
            while timer.remaining_ms <= 0.0 {
                fired.push(id);
                if !timer.repeating || timer.duration_ms <= 0.0 {
                    finished.push(id);
                    break;
                }
                timer.remaining_ms += timer.duration_ms;
            }
        }

        for id in finished {
            self.entries.remove(&id);
        }
        fired
    }
}
