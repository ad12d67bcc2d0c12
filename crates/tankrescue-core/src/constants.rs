//! Simulation constants and tuning parameters.

/// Reference frame duration (ms). Per-frame speeds are scaled by
/// `delta_ms / FRAME_MS` so motion is frame-rate independent.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Largest delta accepted by a single tick; longer hitches are clamped.
pub const MAX_TICK_MS: f64 = 100.0;

// --- Playfield ---

/// Playable rectangle width (pixels).
pub const WORLD_WIDTH: f64 = 1334.0;

/// Playable rectangle height (pixels).
pub const WORLD_HEIGHT: f64 = 750.0;

/// Inset used when clamping tanks into the playfield.
pub const CLAMP_MARGIN: f64 = 40.0;

// --- Tanks ---

/// Collision radius of any tank, used for box avoidance.
pub const TANK_RADIUS: f64 = 30.0;

/// Tank sprite extent.
pub const TANK_SIZE: f64 = 64.0;

/// Player and enemy closer than this collide.
pub const TANK_COLLISION_DISTANCE: f64 = 56.0;

/// Player speed at full stick (pixels per frame).
pub const PLAYER_SPEED: f64 = 4.0;

/// Minimum time between two shots.
pub const FIRE_COOLDOWN_MS: f64 = 250.0;

/// Distance from tank centre to the muzzle.
pub const MUZZLE_OFFSET: f64 = 40.0;

/// Enemy speed without difficulty boost (pixels per frame).
pub const ENEMY_BASE_SPEED: f64 = 1.6;

/// Multiplier applied to enemy speed in high-difficulty sessions.
pub const ENEMY_BOOST_FACTOR: f64 = 1.5;

/// Wandering enemies pick a new heading this often.
pub const WANDER_TURN_INTERVAL_MS: f64 = 2000.0;

/// Probability that a new enemy chases (otherwise it wanders).
pub const ENEMY_CHASE_PROBABILITY: f64 = 2.0 / 3.0;

/// Required concurrent enemies, indexed by rank tier. Non-decreasing.
pub const ENEMY_COUNT_BY_TIER: [usize; 7] = [3, 4, 5, 6, 7, 8, 10];

// --- Bullets ---

/// Bullet speed (pixels per frame).
pub const BULLET_SPEED: f64 = 12.0;

/// Bullet sprite extent.
pub const BULLET_SIZE: f64 = 16.0;

/// Bullet bounding radius.
pub const BULLET_RADIUS: f64 = 8.0;

/// Maximum parked bullets kept for reuse.
pub const BULLET_POOL_CAPACITY: usize = 32;

// --- Boxes ---

/// Box sprite extent.
pub const CRATE_SIZE: f64 = 64.0;

/// Box radius used for tank avoidance.
pub const CRATE_RADIUS: f64 = 32.0;

/// Boxes kept alive at all times.
pub const CRATE_MIN_COUNT: usize = 10;

/// Boxes never spawn closer than this to the player.
pub const CRATE_MIN_PLAYER_DISTANCE: f64 = 150.0;

/// Boxes never spawn closer than this to another box.
pub const CRATE_MIN_SPACING: f64 = 80.0;

/// Chance of a treasure box when none is live.
pub const TREASURE_PROBABILITY: f64 = 0.1;

/// Wood boxes per metal box in the weighted pick.
pub const WOOD_WEIGHT: u32 = 2;
pub const METAL_WEIGHT: u32 = 1;

/// How long a destroyed box lingers as a collidable wreck.
pub const CRATE_WRECK_MS: f64 = 300.0;

// --- Spawning ---

/// Interval between population checks.
pub const SPAWN_CHECK_INTERVAL_MS: f64 = 1000.0;

/// Placement attempts per entity before abandoning for this check.
pub const SPAWN_MAX_ATTEMPTS: u32 = 20;

/// Enemies never spawn closer than this to the player.
pub const ENEMY_MIN_PLAYER_DISTANCE: f64 = 250.0;

/// Enemies never spawn closer than this to another enemy.
pub const ENEMY_MIN_SPACING: f64 = 120.0;

/// Enemies never spawn closer than this to a box.
pub const ENEMY_MIN_CRATE_DISTANCE: f64 = 100.0;

// --- Pilots ---

/// Pilot sprite extent.
pub const PILOT_SIZE: f64 = 32.0;

/// Player within this distance of a pilot rescues it.
pub const PILOT_RESCUE_RADIUS: f64 = 60.0;

/// Un-rescued pilots start fading after this long.
pub const PILOT_LIFETIME_MS: f64 = 8000.0;

/// Fade-out duration before the pilot returns to its pool.
pub const PILOT_FADE_MS: f64 = 500.0;

/// Maximum parked pilots kept for reuse.
pub const PILOT_POOL_CAPACITY: usize = 16;

/// Pilots kept alive in rescue mode.
pub const PILOT_MIN_COUNT: usize = 2;

/// Upper bound on pilots scattered when the player dies.
pub const MAX_SCATTER_PILOTS: u32 = 8;

/// Scatter ring around the death position.
pub const SCATTER_MIN_RADIUS: f64 = 80.0;
pub const SCATTER_MAX_RADIUS: f64 = 160.0;

/// Rescued pilots secured per bank.
pub const RESCUE_BANK_SIZE: u32 = 5;

/// Banked pilots at which enemies get the speed boost.
pub const RESCUE_HIGH_DIFFICULTY_BANKED: u32 = 20;

// --- Score ---

pub const ENEMY_KILL_SCORE: u64 = 100;
pub const PILOT_RESCUE_SCORE: u64 = 200;
pub const WOOD_REWARD: u64 = 50;
pub const METAL_REWARD: u64 = 100;
pub const TREASURE_REWARD: u64 = 1000;

/// Hits needed to break each box kind.
pub const WOOD_HIT_POINTS: u32 = 1;
pub const METAL_HIT_POINTS: u32 = 2;
pub const TREASURE_HIT_POINTS: u32 = 3;

// --- Player lifecycle ---

/// Invincibility window after spawn or revival.
pub const INVINCIBLE_MS: f64 = 3000.0;

/// Death countdown length (seconds, one step per second).
pub const DEATH_COUNTDOWN_SECS: u32 = 10;

/// Duration of one countdown step.
pub const COUNTDOWN_STEP_MS: f64 = 1000.0;

/// Revival sequence before the player is fully alive again.
pub const REVIVE_SEQUENCE_MS: f64 = 600.0;

// --- Progression ---

/// Score span of one rank level.
pub const LEVEL_SPAN: u64 = 3000;

/// Number of level boundaries tracked for tier-up events.
pub const MAX_TIER_UP_INDEX: u64 = 60;

/// Score that unlocks rescue mode (Gold, level 1).
pub const RESCUE_UNLOCK_SCORE: u64 = 18_000;

// --- Leaderboard ---

/// Best-score records older than this are discarded.
pub const LEADERBOARD_EXPIRY_DAYS: u64 = 30;

pub const SECS_PER_DAY: u64 = 86_400;

/// Modeled player population per rank tier, lowest tier first.
pub const TIER_POPULATION: [u64; 7] = [
    400_000, 250_000, 150_000, 90_000, 50_000, 25_000, 10_000,
];

/// Seed modulus for the deterministic rank jitter.
pub const LEADERBOARD_SEED_MODULUS: u64 = 10_000;
