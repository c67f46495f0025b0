//! Frame data: per-attack timing and damage parameters
//!
//! Pure data. Built once per match from [`FrameDataTable::standard`] and
//! read-only afterwards. States without an entry are not attacks.

use serde::{Deserialize, Serialize};

use super::state::CharacterState;

/// Attack hitbox, relative to the attacker's feet and facing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    /// Distance from the body center to the near edge, along facing
    pub forward: f32,
    /// Height of the bottom edge above the feet
    pub up: f32,
    pub width: f32,
    pub height: f32,
}

/// Timing and damage record for one attack state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameData {
    pub startup: u32,
    pub active: u32,
    pub recovery: u32,
    /// Base damage before combo scaling and stats
    pub damage: u32,
    /// Meter awarded to the attacker on hit or block
    pub meter_gain: u32,
    pub blockable: bool,
    /// Horizontal knockback velocity (px/tick)
    pub knockback: f32,
    /// Launches the defender into the air
    pub juggle: bool,
    /// Can be cancelled into another attack once active frames begin
    pub cancelable: bool,
    pub hitbox: Hitbox,
}

impl FrameData {
    /// Frames until the attack returns to idle
    #[inline]
    pub fn total_frames(&self) -> u32 {
        self.startup + self.active + self.recovery
    }

    /// True while `frame` is within `[startup, startup + active)`
    #[inline]
    pub fn is_active(&self, frame: u32) -> bool {
        frame >= self.startup && frame < self.startup + self.active
    }

    /// Active or recovery window has begun
    #[inline]
    pub fn cancel_window_open(&self, frame: u32) -> bool {
        self.cancelable && frame >= self.startup
    }

    /// Hitstun inflicted on a clean hit
    #[inline]
    pub fn hitstun(&self) -> u32 {
        self.active + crate::consts::HITSTUN_BONUS
    }

    /// Blockstun inflicted on a blocked hit: floor(active × 1.5)
    #[inline]
    pub fn blockstun(&self) -> u32 {
        self.active * 3 / 2
    }
}

/// Lookup table from attack state to frame data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameDataTable {
    entries: Vec<(CharacterState, FrameData)>,
}

impl FrameDataTable {
    /// Empty table (every state behaves as a non-attack)
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The default move set
    pub fn standard() -> Self {
        use CharacterState::*;

        let mut table = Self::empty();
        table.insert(
            LightAttack,
            FrameData {
                startup: 3,
                active: 4,
                recovery: 8,
                damage: 8,
                meter_gain: 8,
                blockable: true,
                knockback: 1.5,
                juggle: false,
                cancelable: true,
                hitbox: Hitbox {
                    forward: 10.0,
                    up: 50.0,
                    width: 50.0,
                    height: 25.0,
                },
            },
        );
        table.insert(
            HeavyAttack,
            FrameData {
                startup: 6,
                active: 5,
                recovery: 14,
                damage: 16,
                meter_gain: 12,
                blockable: true,
                knockback: 4.0,
                juggle: false,
                cancelable: true,
                hitbox: Hitbox {
                    forward: 10.0,
                    up: 40.0,
                    width: 65.0,
                    height: 35.0,
                },
            },
        );
        table.insert(
            Launcher,
            FrameData {
                startup: 7,
                active: 4,
                recovery: 18,
                damage: 10,
                meter_gain: 10,
                blockable: true,
                knockback: 1.0,
                juggle: true,
                cancelable: false,
                hitbox: Hitbox {
                    forward: 5.0,
                    up: 30.0,
                    width: 45.0,
                    height: 70.0,
                },
            },
        );
        table.insert(
            SpecialMove,
            FrameData {
                startup: 10,
                active: 6,
                recovery: 20,
                damage: 22,
                meter_gain: 5,
                blockable: true,
                knockback: 5.0,
                juggle: false,
                cancelable: false,
                hitbox: Hitbox {
                    forward: 10.0,
                    up: 20.0,
                    width: 90.0,
                    height: 50.0,
                },
            },
        );
        table.insert(
            SuperMove,
            FrameData {
                startup: 5,
                active: 10,
                recovery: 30,
                damage: 45,
                meter_gain: 0,
                blockable: false,
                knockback: 6.0,
                juggle: true,
                cancelable: false,
                hitbox: Hitbox {
                    forward: 0.0,
                    up: 0.0,
                    width: 120.0,
                    height: 100.0,
                },
            },
        );
        table.insert(
            AirCombo,
            FrameData {
                startup: 4,
                active: 5,
                recovery: 10,
                damage: 7,
                meter_gain: 6,
                blockable: true,
                knockback: 1.0,
                juggle: false,
                cancelable: true,
                hitbox: Hitbox {
                    forward: 5.0,
                    up: 0.0,
                    width: 50.0,
                    height: 50.0,
                },
            },
        );
        table
    }

    /// Add or replace the entry for `state`
    pub fn insert(&mut self, state: CharacterState, data: FrameData) {
        match self.entries.iter_mut().find(|(s, _)| *s == state) {
            Some(entry) => entry.1 = data,
            None => self.entries.push((state, data)),
        }
    }

    /// Frame data for `state`, or `None` for non-attack states
    pub fn lookup(&self, state: CharacterState) -> Option<&FrameData> {
        self.entries
            .iter()
            .find(|(s, _)| *s == state)
            .map(|(_, data)| data)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CharacterState, &FrameData)> {
        self.entries.iter().map(|(s, d)| (*s, d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FrameDataTable {
    fn default() -> Self {
        Self::standard()
    }
}
