//! Deterministic simulation module
//!
//! All match logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to [`MatchSession::tick`] per frame)
//! - Seeded RNG only
//! - Stable slot order with simultaneous hit resolution
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod collision;
pub mod combat;
pub mod frame_data;
pub mod input;
pub mod meter;
pub mod physics;
pub mod state;
pub mod tick;

pub use ai::OpponentController;
pub use collision::Aabb;
pub use combat::HitResult;
pub use frame_data::{FrameData, FrameDataTable, Hitbox};
pub use input::{Action, InputBuffer, InputToken, Motion, MOTIONS, TickInput};
pub use meter::{Meter, METER_MAX, SPECIAL_COST};
pub use state::{
    ActionOutcome, Character, CharacterSnapshot, CharacterState, Facing, InputResult, RejectReason,
};
pub use tick::{MatchEndCallback, MatchEvent, MatchSession, Winner};
