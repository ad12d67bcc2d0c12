//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

/// 2D position in playfield space (pixels).
/// x grows to the right, y grows downward, origin at the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 2D velocity in pixels per reference frame (see `FRAME_MS`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed session time in milliseconds.
    pub elapsed_ms: f64,
}

/// Collision extent of an entity. The pivot sits at the centre, so the
/// top-left corner is `position - size / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Bearing to another position in degrees, `[0, 360)`, measured from +x
    /// toward +y.
    pub fn bearing_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dy.atan2(dx).to_degrees().rem_euclid(360.0)
    }

    /// Position moved `distance` along `bearing_deg`.
    pub fn offset(&self, bearing_deg: f64, distance: f64) -> Position {
        let rad = bearing_deg.to_radians();
        Position::new(self.x + distance * rad.cos(), self.y + distance * rad.sin())
    }

    /// Clamp into `[margin, width - margin] x [margin, height - margin]`.
    pub fn clamped(&self, width: f64, height: f64, margin: f64) -> Position {
        Position::new(
            self.x.clamp(margin, width - margin),
            self.y.clamp(margin, height - margin),
        )
    }

    /// Whether the point lies inside the `width` x `height` playfield.
    pub fn is_inside(&self, width: f64, height: f64) -> bool {
        self.x >= 0.0 && self.x <= width && self.y >= 0.0 && self.y <= height
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Velocity of magnitude `speed` along `bearing_deg`.
    pub fn from_bearing(bearing_deg: f64, speed: f64) -> Self {
        let rad = bearing_deg.to_radians();
        Self::new(speed * rad.cos(), speed * rad.sin())
    }

    pub fn speed(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn square(side: f64) -> Self {
        Self::new(side, side)
    }

    /// Rectangle occupied when the pivot is at `pos`.
    pub fn rect_at(&self, pos: &Position) -> Rect {
        Rect {
            left: pos.x - self.width * 0.5,
            top: pos.y - self.height * 0.5,
            width: self.width,
            height: self.height,
        }
    }
}

impl Rect {
    /// Strict overlap test; touching edges do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.left + other.width
            && other.left < self.left + self.width
            && self.top < other.top + other.height
            && other.top < self.top + self.height
    }
}

impl SimTime {
    /// Advance by one tick of `delta_ms`.
    pub fn advance(&mut self, delta_ms: f64) {
        self.tick += 1;
        self.elapsed_ms += delta_ms;
    }
}
