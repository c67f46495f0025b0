//! Character state and the per-character frame-timing state machine
//!
//! Simulation state is the only source of truth. Presentation reads a
//! [`CharacterSnapshot`] and never writes back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::frame_data::FrameDataTable;
use super::input::{Action, InputBuffer, Motion, TickInput};
use super::meter::{Meter, SPECIAL_COST};
use crate::consts::*;
use crate::settings::FighterStats;

/// Character states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharacterState {
    #[default]
    Idle,
    Walking,
    Crouching,
    Jumping,
    LightAttack,
    HeavyAttack,
    SpecialMove,
    SuperMove,
    Blocking,
    HitStun,
    BlockStun,
    Knockdown,
    Launcher,
    AirCombo,
}

impl CharacterState {
    /// Every state driven by frame data
    pub const ATTACKS: [CharacterState; 6] = [
        CharacterState::LightAttack,
        CharacterState::HeavyAttack,
        CharacterState::Launcher,
        CharacterState::SpecialMove,
        CharacterState::SuperMove,
        CharacterState::AirCombo,
    ];

    pub fn is_attack(&self) -> bool {
        Self::ATTACKS.contains(self)
    }

    /// Forced non-actionable states
    pub fn is_stunned(&self) -> bool {
        matches!(
            self,
            CharacterState::HitStun | CharacterState::BlockStun | CharacterState::Knockdown
        )
    }

    /// Defender is holding guard (blockstun keeps guard up between hits)
    pub fn is_guarding(&self) -> bool {
        matches!(self, CharacterState::Blocking | CharacterState::BlockStun)
    }

    /// Grounded states that accept movement input
    fn is_neutral(&self) -> bool {
        matches!(
            self,
            CharacterState::Idle
                | CharacterState::Walking
                | CharacterState::Crouching
                | CharacterState::Blocking
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterState::Idle => "idle",
            CharacterState::Walking => "walking",
            CharacterState::Crouching => "crouching",
            CharacterState::Jumping => "jumping",
            CharacterState::LightAttack => "light_attack",
            CharacterState::HeavyAttack => "heavy_attack",
            CharacterState::SpecialMove => "special_move",
            CharacterState::SuperMove => "super_move",
            CharacterState::Blocking => "blocking",
            CharacterState::HitStun => "hit_stun",
            CharacterState::BlockStun => "block_stun",
            CharacterState::Knockdown => "knockdown",
            CharacterState::Launcher => "launcher",
            CharacterState::AirCombo => "air_combo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1.0 for left, 1.0 for right
    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing from `from_x` toward `to_x` (None when level)
    pub fn toward(from_x: f32, to_x: f32) -> Option<Self> {
        if to_x > from_x {
            Some(Facing::Right)
        } else if to_x < from_x {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

/// Why an action was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Frozen, stunned, or in a state that cannot start this action
    Busy,
    InsufficientMeter,
    NoAirActions,
    /// Ground-only action attempted in the air
    Airborne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    Applied,
    Rejected(RejectReason),
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }
}

/// Result of feeding one tick of input to a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputResult {
    /// Attack action requested this tick and what happened to it
    pub action: Option<(Action, ActionOutcome)>,
    /// The action came from a recognized motion rather than a plain press
    pub via_motion: bool,
}

/// One combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    /// Center of the feet (y = 0 on the ground)
    pub pos: Vec2,
    /// px/tick
    pub vel: Vec2,
    pub state: CharacterState,
    /// Ticks spent in the current state
    pub current_frame: u32,
    pub stun_frames: u32,
    pub hitstop: u32,
    pub health: u32,
    pub max_health: u32,
    pub meter: Meter,
    pub facing: Facing,
    pub in_air: bool,
    pub air_actions: u8,
    pub combo_count: u32,
    pub combo_damage: u32,
    /// Tick of the last confirmed (unblocked) hit this character landed
    pub last_hit_tick: Option<u64>,
    pub stats: FighterStats,
    pub input_buffer: InputBuffer,
    /// Held inputs from the previous tick (for press-edge detection)
    pub held: TickInput,
    /// Increments on every attack entry
    pub activation: u32,
    /// Slots already hit by the current activation
    pub hit_targets: Vec<usize>,
}

impl Character {
    pub fn new(stats: &FighterStats, x: f32) -> Self {
        Self {
            pos: Vec2::new(x, GROUND_Y),
            vel: Vec2::ZERO,
            state: CharacterState::Idle,
            current_frame: 0,
            stun_frames: 0,
            hitstop: 0,
            health: stats.health,
            max_health: stats.health,
            meter: Meter::default(),
            facing: Facing::Right,
            in_air: false,
            air_actions: AIR_ACTIONS,
            combo_count: 0,
            combo_damage: 0,
            last_hit_tick: None,
            stats: *stats,
            input_buffer: InputBuffer::new(),
            held: TickInput::default(),
            activation: 0,
            hit_targets: Vec::new(),
        }
    }

    /// Not frozen and not stunned
    #[inline]
    pub fn is_actionable(&self) -> bool {
        self.hitstop == 0 && self.stun_frames == 0
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Enter `state`, resetting the frame counter. Entering an attack starts a
    /// new activation.
    pub fn transition(&mut self, state: CharacterState) {
        if state.is_attack() {
            self.activation = self.activation.wrapping_add(1);
            self.hit_targets.clear();
        } else if state == self.state {
            return;
        }
        self.state = state;
        self.current_frame = 0;
    }

    /// Put the character into a stun state for `ticks`
    pub fn stun(&mut self, state: CharacterState, ticks: u32) {
        self.transition(state);
        self.current_frame = 0;
        self.stun_frames = ticks;
    }

    /// Advance the frame-timing state machine by one tick
    ///
    /// Precedence: hitstop freezes everything, then stun counts down, then
    /// the frame counter advances and finished attacks return to idle.
    pub fn advance(&mut self, table: &FrameDataTable) {
        if self.hitstop > 0 {
            self.hitstop -= 1;
            return;
        }
        if self.stun_frames > 0 {
            self.stun_frames -= 1;
            if self.stun_frames == 0 {
                self.recover();
            }
            return;
        }
        self.current_frame += 1;
        let finished = match table.lookup(self.state) {
            Some(data) => self.current_frame >= data.total_frames(),
            // An attack without frame data has no frames at all
            None => self.state.is_attack(),
        };
        if finished {
            self.transition(CharacterState::Idle);
        }
    }

    /// Leave stun: straight back to guard if block is held on the ground
    fn recover(&mut self) {
        if self.held.block && !self.in_air {
            self.vel.x = 0.0;
            self.transition(CharacterState::Blocking);
        } else {
            self.transition(CharacterState::Idle);
        }
    }

    /// Whether an attack may start from the current state
    fn can_start_attack(&self, table: &FrameDataTable) -> bool {
        if !self.is_actionable() {
            return false;
        }
        let cancel = table
            .lookup(self.state)
            .is_some_and(|data| data.cancel_window_open(self.current_frame));
        if self.in_air {
            matches!(self.state, CharacterState::Jumping | CharacterState::Idle)
                || (self.state == CharacterState::AirCombo && cancel)
        } else {
            matches!(self.state, CharacterState::Idle | CharacterState::Walking)
                || (self.state.is_attack() && cancel)
        }
    }

    /// Attempt an attack action. Rejections leave the character untouched.
    pub fn try_action(&mut self, action: Action, table: &FrameDataTable) -> ActionOutcome {
        if !self.can_start_attack(table) {
            return ActionOutcome::Rejected(RejectReason::Busy);
        }

        if self.in_air {
            if !matches!(action, Action::Light | Action::Heavy) {
                return ActionOutcome::Rejected(RejectReason::Airborne);
            }
            if self.air_actions == 0 {
                return ActionOutcome::Rejected(RejectReason::NoAirActions);
            }
            self.air_actions -= 1;
            self.transition(CharacterState::AirCombo);
            return ActionOutcome::Applied;
        }

        let next = match action {
            Action::Light => CharacterState::LightAttack,
            Action::Heavy => CharacterState::HeavyAttack,
            Action::Launcher => CharacterState::Launcher,
            Action::Special => {
                if !self.meter.try_spend(SPECIAL_COST) {
                    return ActionOutcome::Rejected(RejectReason::InsufficientMeter);
                }
                CharacterState::SpecialMove
            }
            Action::Super => {
                if !self.meter.try_spend_full() {
                    return ActionOutcome::Rejected(RejectReason::InsufficientMeter);
                }
                CharacterState::SuperMove
            }
        };
        self.vel.x = 0.0;
        self.transition(next);
        ActionOutcome::Applied
    }

    /// Feed one tick of input: buffer tokens, recognize motions, then apply
    /// an attack or movement.
    pub fn apply_input(
        &mut self,
        input: &TickInput,
        tick: u64,
        table: &FrameDataTable,
    ) -> InputResult {
        let tokens = input.tokens(&self.held);
        let pressed_button = tokens.iter().any(|t| t.action().is_some());
        for token in &tokens {
            self.input_buffer.push(*token, tick);
        }
        self.held = input.held();

        // Releasing block drops guard immediately
        if self.state == CharacterState::Blocking && !input.block {
            self.transition(CharacterState::Idle);
        }

        // Highest-priority motion that can be paid for, else the plain button
        let motions: Vec<&'static Motion> = if pressed_button {
            self.input_buffer.recognize_all().collect()
        } else {
            Vec::new()
        };
        for motion in motions {
            let outcome = self.try_action(motion.action, table);
            if outcome.is_applied() {
                self.input_buffer.clear();
                return InputResult {
                    action: Some((motion.action, outcome)),
                    via_motion: true,
                };
            }
            log::debug!("motion '{}' not applied: {:?}", motion.name, outcome);
        }
        if let Some(action) = input.pressed_action() {
            return InputResult {
                action: Some((action, self.try_action(action, table))),
                via_motion: false,
            };
        }

        if self.is_actionable() {
            self.apply_movement(input);
        }
        InputResult::default()
    }

    fn apply_movement(&mut self, input: &TickInput) {
        if self.in_air {
            let can_dash = matches!(self.state, CharacterState::Jumping | CharacterState::Idle);
            if input.dash && can_dash && self.air_actions > 0 {
                let dir = if input.back { -1.0 } else { 1.0 };
                self.air_actions -= 1;
                self.vel.x = self.facing.sign() * dir * AIR_DASH_SPEED;
                self.vel.y = self.vel.y.max(0.0);
            }
            return;
        }
        if !self.state.is_neutral() {
            return;
        }

        let walk = self.facing.sign() * WALK_SPEED * self.stats.speed;
        let walk_dir = match (input.forward, input.back) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };

        if input.block {
            self.vel.x = 0.0;
            self.transition(CharacterState::Blocking);
        } else if input.up {
            self.vel = Vec2::new(walk * walk_dir, JUMP_VELOCITY);
            self.in_air = true;
            self.transition(CharacterState::Jumping);
        } else if input.down {
            self.vel.x = 0.0;
            self.transition(CharacterState::Crouching);
        } else if walk_dir != 0.0 {
            self.vel.x = walk * walk_dir;
            self.transition(CharacterState::Walking);
        } else if matches!(
            self.state,
            CharacterState::Walking | CharacterState::Crouching
        ) {
            self.transition(CharacterState::Idle);
        }
    }

    /// Turn toward the opponent while grounded and neutral
    pub fn face_toward(&mut self, opponent_x: f32) {
        if self.in_air || !self.state.is_neutral() {
            return;
        }
        if let Some(facing) = Facing::toward(self.pos.x, opponent_x) {
            self.facing = facing;
        }
    }

    /// Drop the combo if too long has passed since the last confirmed hit
    pub fn expire_combo(&mut self, tick: u64) {
        let Some(last) = self.last_hit_tick else {
            return;
        };
        if tick.saturating_sub(last) > COMBO_RESET_TICKS {
            self.reset_combo();
        }
    }

    pub fn reset_combo(&mut self) {
        self.combo_count = 0;
        self.combo_damage = 0;
        self.last_hit_tick = None;
    }

    /// Subtract damage, flooring at zero
    pub fn take_damage(&mut self, damage: u32) {
        self.health = self.health.saturating_sub(damage);
    }

    /// Read-only view for HUD/presentation
    pub fn snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            health: self.health,
            health_pct: self.health as f32 / self.max_health.max(1) as f32,
            meter: self.meter.value(),
            meter_pct: self.meter.fraction(),
            state: self.state,
            combo_count: self.combo_count,
            pos: self.pos,
            facing: self.facing,
            in_air: self.in_air,
        }
    }
}

/// Read-only per-tick view of a character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub health: u32,
    /// 0.0 - 1.0
    pub health_pct: f32,
    pub meter: u32,
    /// 0.0 - 1.0
    pub meter_pct: f32,
    pub state: CharacterState,
    pub combo_count: u32,
    pub pos: Vec2,
    pub facing: Facing,
    pub in_air: bool,
}

impl CharacterSnapshot {
    /// Mid-attack or stunned
    pub fn is_busy(&self) -> bool {
        self.state.is_attack() || self.state.is_stunned()
    }
}
