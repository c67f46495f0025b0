//! Duel Core - deterministic 2D fighting game simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (frame data, state machine, physics, combat, CPU opponent)
//! - `settings`: Fighter stats, CPU difficulty and match configuration
//! - `error`: Configuration errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{Difficulty, FighterStats, MatchConfig};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;

    /// Arena dimensions (x grows right, y grows up, ground at y = 0)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const GROUND_Y: f32 = 0.0;

    /// Standing body (hurtbox and pushbox)
    pub const BODY_WIDTH: f32 = 40.0;
    pub const BODY_HEIGHT: f32 = 90.0;
    pub const CROUCH_HEIGHT: f32 = 60.0;

    /// Starting x positions for the two slots
    pub const P1_START_X: f32 = 300.0;
    pub const P2_START_X: f32 = 500.0;

    /// Gravity (px/tick², applied while airborne)
    pub const GRAVITY: f32 = 0.8;
    /// Upward velocity of a jump (px/tick)
    pub const JUMP_VELOCITY: f32 = 14.0;
    /// Upward velocity applied by a juggle hit
    pub const JUGGLE_VELOCITY: f32 = 12.0;
    /// Walk speed at speed multiplier 1.0 (px/tick)
    pub const WALK_SPEED: f32 = 3.0;
    /// Horizontal air dash speed (px/tick)
    pub const AIR_DASH_SPEED: f32 = 8.0;
    /// Grounded idle velocity decay per tick
    pub const FRICTION: f32 = 0.8;
    /// Air actions (air dashes / air attacks) per jump
    pub const AIR_ACTIONS: u8 = 2;

    /// Freeze window applied to both combatants on impact
    pub const HITSTOP_TICKS: u32 = 4;
    /// Hitstun = active frames + this
    pub const HITSTUN_BONUS: u32 = 8;
    /// Ground-bounce recovery after landing in hitstun
    pub const KNOCKDOWN_TICKS: u32 = 30;
    /// Ticks without a confirmed hit before a combo drops (~1 second)
    pub const COMBO_RESET_TICKS: u64 = 60;

    /// Input buffer capacity and retention window
    pub const INPUT_BUFFER_LEN: usize = 16;
    pub const INPUT_WINDOW_TICKS: u64 = 30;
}

