//! ECS components for hecs entities.
//!
//! Components are plain data. The few methods here only touch the
//! component's own fields; game logic lives in systems.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;

/// Visual state every entity carries. Pools restore the default on checkout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Rotation in degrees, measured from +x toward +y.
    pub rotation_deg: f64,
    pub alpha: f64,
    pub scale: f64,
    pub visible: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation_deg: 0.0,
            alpha: 1.0,
            scale: 1.0,
            visible: true,
        }
    }
}

/// Marks the player's tank.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlayerTank {
    /// Time until the next shot is allowed.
    pub fire_cooldown_ms: f64,
}

/// Present on a pooled entity exactly while it is checked out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Active;

/// Set on an enemy the moment it is killed; cleanup despawns it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Destroyed;

/// A player projectile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bullet {
    pub radius: f64,
}

impl Default for Bullet {
    fn default() -> Self {
        Self {
            radius: BULLET_RADIUS,
        }
    }
}

/// A rescuable pilot.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Pilot {
    /// Set once the pilot has been scattered from a dead player.
    pub scattered: bool,
}

/// Phase of a pilot's auto-expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryPhase {
    Waiting,
    Fading,
    Expired,
}

/// Per-entity self-expiry: wait, fade, then expire exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpiryTimer {
    pub phase: ExpiryPhase,
    pub remaining_ms: f64,
    pub lifetime_ms: f64,
    pub fade_ms: f64,
    pub paused: bool,
}

impl ExpiryTimer {
    pub fn new(lifetime_ms: f64, fade_ms: f64) -> Self {
        Self {
            phase: ExpiryPhase::Waiting,
            remaining_ms: lifetime_ms,
            lifetime_ms,
            fade_ms,
            paused: false,
        }
    }

    /// Restart the full lifetime. An already expired timer stays expired.
    pub fn reset(&mut self) {
        if self.phase == ExpiryPhase::Expired {
            return;
        }
        self.phase = ExpiryPhase::Waiting;
        self.remaining_ms = self.lifetime_ms;
    }

    /// Advance by `dt_ms`. Returns true on the single transition to `Expired`.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        if self.paused || self.phase == ExpiryPhase::Expired {
            return false;
        }
        self.remaining_ms -= dt_ms;
        while self.remaining_ms <= 0.0 {
            match self.phase {
                ExpiryPhase::Waiting => {
                    self.phase = ExpiryPhase::Fading;
                    self.remaining_ms += self.fade_ms;
                }
                ExpiryPhase::Fading => {
                    self.phase = ExpiryPhase::Expired;
                    self.remaining_ms = 0.0;
                    return true;
                }
                ExpiryPhase::Expired => return false,
            }
        }
        false
    }

    /// Opacity to render during the fade, 1.0 otherwise.
    pub fn alpha(&self) -> f64 {
        match self.phase {
            ExpiryPhase::Waiting => 1.0,
            ExpiryPhase::Fading if self.fade_ms > 0.0 => {
                (self.remaining_ms / self.fade_ms).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}

/// An enemy tank.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyTank {
    pub policy: EnemyPolicy,
    /// Heading held while wandering (degrees).
    pub wander_bearing_deg: f64,
    /// Time until the next wander re-roll.
    pub turn_timer_ms: f64,
    /// Tick on which the enemy was spawned.
    pub spawn_tick: u64,
}

/// A destructible box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Crate {
    pub kind: CrateKind,
    pub hit_points: u32,
    /// Set when the box breaks; counts down to despawn.
    pub wreck_remaining_ms: Option<f64>,
}

impl Crate {
    pub fn new(kind: CrateKind) -> Self {
        Self {
            kind,
            hit_points: kind.hit_points(),
            wreck_remaining_ms: None,
        }
    }

    /// Absorb one bullet. Returns the reward when this hit breaks the box,
    /// zero for non-lethal hits and for hits on an already broken box.
    pub fn hit(&mut self) -> u64 {
        if self.hit_points == 0 {
            return 0;
        }
        self.hit_points -= 1;
        if self.hit_points == 0 {
            self.wreck_remaining_ms = Some(CRATE_WRECK_MS);
            self.kind.reward()
        } else {
            0
        }
    }

    pub fn is_wreck(&self) -> bool {
        self.hit_points == 0
    }
}
