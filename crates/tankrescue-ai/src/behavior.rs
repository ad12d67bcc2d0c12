//! Enemy movement state machine.
//!
//! Pure functions that compute heading and position updates for one enemy
//! tank from its policy and surroundings. No ECS dependency; operates on
//! plain data.

use glam::DVec2;
use rand::Rng;

use tankrescue_core::constants::*;
use tankrescue_core::enums::EnemyPolicy;
use tankrescue_core::types::Position;

/// Input to the behavior FSM for a single enemy.
pub struct EnemyContext<'a> {
    pub policy: EnemyPolicy,
    pub position: Position,
    pub rotation_deg: f64,
    pub wander_bearing_deg: f64,
    pub turn_timer_ms: f64,
    /// Current player position.
    pub target: Position,
    /// Centres of every live box.
    pub obstacles: &'a [Position],
    /// Session-scoped difficulty flag.
    pub high_difficulty: bool,
    pub dt_ms: f64,
}

/// Output from the behavior FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyUpdate {
    pub position: Position,
    pub rotation_deg: f64,
    pub wander_bearing_deg: f64,
    pub turn_timer_ms: f64,
    /// False when a box blocked the step.
    pub moved: bool,
}

/// Result of trying to move a tank one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub position: Position,
    pub moved: bool,
}

/// Effective enemy speed for the session difficulty.
pub fn enemy_speed(high_difficulty: bool) -> f64 {
    if high_difficulty {
        ENEMY_BASE_SPEED * ENEMY_BOOST_FACTOR
    } else {
        ENEMY_BASE_SPEED
    }
}

/// Evaluate one enemy for one tick.
pub fn evaluate<R: Rng + ?Sized>(ctx: &EnemyContext<'_>, rng: &mut R) -> EnemyUpdate {
    let (bearing, wander_bearing_deg, turn_timer_ms) = match ctx.policy {
        EnemyPolicy::Chasing => (
            chase_bearing(ctx),
            ctx.wander_bearing_deg,
            ctx.turn_timer_ms,
        ),
        EnemyPolicy::Wandering => {
            let mut timer = ctx.turn_timer_ms - ctx.dt_ms;
            let mut heading = ctx.wander_bearing_deg;
            if timer <= 0.0 {
                heading = rng.gen_range(0.0..360.0);
                timer = WANDER_TURN_INTERVAL_MS;
            }
            (Some(heading), heading, timer)
        }
    };

    let Some(bearing) = bearing else {
        // Sitting on the target: hold position and heading.
        return EnemyUpdate {
            position: ctx.position,
            rotation_deg: ctx.rotation_deg,
            wander_bearing_deg,
            turn_timer_ms,
            moved: false,
        };
    };

    let distance = enemy_speed(ctx.high_difficulty) * ctx.dt_ms / FRAME_MS;
    let step = try_step(ctx.position, bearing, distance, ctx.obstacles);

    EnemyUpdate {
        position: step.position,
        rotation_deg: bearing,
        wander_bearing_deg,
        turn_timer_ms,
        moved: step.moved,
    }
}

/// Move `distance` along `bearing_deg` unless the step pushes deeper into a
/// box's exclusion radius; then clamp into the playfield. A tank already
/// overlapping a box may still back away from it.
pub fn try_step(
    position: Position,
    bearing_deg: f64,
    distance: f64,
    obstacles: &[Position],
) -> StepResult {
    let origin = DVec2::new(position.x, position.y);
    let proposed = origin + DVec2::from_angle(bearing_deg.to_radians()) * distance;
    let proposed = Position::new(proposed.x, proposed.y);

    if blocks_step(&position, &proposed, obstacles) {
        return StepResult {
            position,
            moved: false,
        };
    }

    StepResult {
        position: proposed.clamped(WORLD_WIDTH, WORLD_HEIGHT, CLAMP_MARGIN),
        moved: true,
    }
}

/// Whether moving from `from` to `to` enters a box's exclusion radius
/// without getting farther from that box.
pub fn blocks_step(from: &Position, to: &Position, obstacles: &[Position]) -> bool {
    let origin = DVec2::new(from.x, from.y);
    let dest = DVec2::new(to.x, to.y);
    let min_distance = TANK_RADIUS + CRATE_RADIUS;
    obstacles.iter().any(|o| {
        let centre = DVec2::new(o.x, o.y);
        let after = dest.distance(centre);
        after < min_distance && after <= origin.distance(centre)
    })
}

/// Bearing toward the target, or None when already on top of it.
fn chase_bearing(ctx: &EnemyContext<'_>) -> Option<f64> {
    let delta = DVec2::new(ctx.target.x - ctx.position.x, ctx.target.y - ctx.position.y);
    if delta.length_squared() < 1e-6 {
        return None;
    }
    Some(ctx.position.bearing_to(&ctx.target))
}
