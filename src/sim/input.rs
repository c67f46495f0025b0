//! Tokenized input, the per-character input buffer and motion recognition
//!
//! Directions are relative to the character's facing. The buffer is
//! tick-stamped so eviction never depends on wall-clock time.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts::{INPUT_BUFFER_LEN, INPUT_WINDOW_TICKS};

/// Abstract input token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputToken {
    Up,
    Down,
    Forward,
    Back,
    Light,
    Heavy,
    Launcher,
    Special,
    Super,
    Block,
    Dash,
}

impl InputToken {
    pub fn is_direction(&self) -> bool {
        matches!(
            self,
            InputToken::Up | InputToken::Down | InputToken::Forward | InputToken::Back
        )
    }

    /// The attack action this button requests, if any
    pub fn action(&self) -> Option<Action> {
        match self {
            InputToken::Light => Some(Action::Light),
            InputToken::Heavy => Some(Action::Heavy),
            InputToken::Launcher => Some(Action::Launcher),
            InputToken::Special => Some(Action::Special),
            InputToken::Super => Some(Action::Super),
            _ => None,
        }
    }
}

/// Attack actions a character can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Light,
    Heavy,
    Launcher,
    Special,
    Super,
}

/// Inputs for one character for a single tick (deterministic)
///
/// Direction and block fields are "held" state; the rest are presses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub forward: bool,
    pub back: bool,
    /// Hold to guard
    pub block: bool,
    pub light: bool,
    pub heavy: bool,
    pub launcher: bool,
    pub special: bool,
    pub super_move: bool,
    /// Air dash
    pub dash: bool,
}

impl TickInput {
    /// Highest-priority attack button pressed this tick
    pub fn pressed_action(&self) -> Option<Action> {
        if self.super_move {
            Some(Action::Super)
        } else if self.special {
            Some(Action::Special)
        } else if self.launcher {
            Some(Action::Launcher)
        } else if self.heavy {
            Some(Action::Heavy)
        } else if self.light {
            Some(Action::Light)
        } else {
            None
        }
    }

    /// Tokens to buffer this tick: direction/block press edges relative to
    /// `prev`, then every button pressed.
    pub fn tokens(&self, prev: &TickInput) -> Vec<InputToken> {
        let mut tokens = Vec::new();
        let edges = [
            (self.down, prev.down, InputToken::Down),
            (self.back, prev.back, InputToken::Back),
            (self.forward, prev.forward, InputToken::Forward),
            (self.up, prev.up, InputToken::Up),
            (self.block, prev.block, InputToken::Block),
        ];
        for (now, before, token) in edges {
            if now && !before {
                tokens.push(token);
            }
        }
        let presses = [
            (self.dash, InputToken::Dash),
            (self.light, InputToken::Light),
            (self.heavy, InputToken::Heavy),
            (self.launcher, InputToken::Launcher),
            (self.special, InputToken::Special),
            (self.super_move, InputToken::Super),
        ];
        tokens.extend(presses.iter().filter(|(p, _)| *p).map(|(_, t)| *t));
        tokens
    }

    /// Held state only (used as `prev` for edge detection)
    pub fn held(&self) -> TickInput {
        TickInput {
            up: self.up,
            down: self.down,
            forward: self.forward,
            back: self.back,
            block: self.block,
            ..Default::default()
        }
    }
}

/// A special-move motion
#[derive(Debug, Clone, Copy)]
pub struct Motion {
    pub name: &'static str,
    pub sequence: &'static [InputToken],
    pub action: Action,
}

/// Recognized motions in priority order (longest first)
pub const MOTIONS: &[Motion] = &[
    Motion {
        name: "double quarter-circle heavy",
        sequence: &[
            InputToken::Down,
            InputToken::Forward,
            InputToken::Down,
            InputToken::Forward,
            InputToken::Heavy,
        ],
        action: Action::Super,
    },
    Motion {
        name: "quarter-circle heavy",
        sequence: &[InputToken::Down, InputToken::Forward, InputToken::Heavy],
        action: Action::Special,
    },
    Motion {
        name: "quarter-circle light",
        sequence: &[InputToken::Down, InputToken::Forward, InputToken::Light],
        action: Action::Special,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferedInput {
    pub token: InputToken,
    pub tick: u64,
}

/// Bounded, tick-windowed queue of recent tokens (oldest first)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputBuffer {
    entries: VecDeque<BufferedInput>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(INPUT_BUFFER_LEN),
        }
    }

    /// Append a token, evicting stale entries and trimming to capacity
    pub fn push(&mut self, token: InputToken, tick: u64) {
        self.evict(tick);
        self.entries.push_back(BufferedInput { token, tick });
        while self.entries.len() > INPUT_BUFFER_LEN {
            self.entries.pop_front();
        }
    }

    /// Drop entries older than the retention window
    pub fn evict(&mut self, now: u64) {
        while let Some(front) = self.entries.front() {
            if now.saturating_sub(front.tick) > INPUT_WINDOW_TICKS {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BufferedInput> {
        self.entries.iter()
    }

    /// First motion (in priority order) whose tokens appear in order, ending
    /// on the newest buffered token.
    pub fn recognize(&self) -> Option<&'static Motion> {
        self.recognize_all().next()
    }

    /// Every matching motion, highest priority first
    pub fn recognize_all(&self) -> impl Iterator<Item = &'static Motion> + '_ {
        MOTIONS.iter().filter(|m| self.matches(m.sequence))
    }

    fn matches(&self, sequence: &[InputToken]) -> bool {
        let mut newest = self.entries.iter().rev();
        let Some((last, rest)) = sequence.split_last() else {
            return false;
        };
        if newest.next().map(|e| e.token) != Some(*last) {
            return false;
        }
        let mut wanted = rest.iter().rev().peekable();
        for entry in newest {
            match wanted.peek() {
                Some(&&token) if token == entry.token => {
                    wanted.next();
                }
                Some(_) => {}
                None => break,
            }
        }
        wanted.peek().is_none()
    }
}
