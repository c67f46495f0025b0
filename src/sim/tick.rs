//! Match session and the fixed tick pipeline
//!
//! One session per match, owned by the caller. Each tick:
//! CPU inputs → input/actions → physics → state machine → combat →
//! combo bookkeeping → win check.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ai::OpponentController;
use super::combat::{self, HitResult};
use super::frame_data::FrameDataTable;
use super::input::{Action, TickInput};
use super::physics;
use super::state::{ActionOutcome, Character, CharacterSnapshot, CharacterState, RejectReason};
use crate::consts::*;
use crate::settings::MatchConfig;

/// Match result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    First,
    Second,
    /// Both knocked out on the same tick
    Draw,
}

/// Discrete notifications for presentation consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    AttackLanded {
        attacker: usize,
        defender: usize,
        damage: u32,
        blocked: bool,
        combo_count: u32,
    },
    /// Net state change for a slot over one tick (attack re-entries included)
    StateChanged {
        slot: usize,
        from: CharacterState,
        to: CharacterState,
    },
    SpecialActivated {
        slot: usize,
        action: Action,
        via_motion: bool,
    },
    ActionRejected {
        slot: usize,
        action: Action,
        reason: RejectReason,
    },
    MatchEnded {
        winner: Winner,
    },
}

impl From<HitResult> for MatchEvent {
    fn from(hit: HitResult) -> Self {
        MatchEvent::AttackLanded {
            attacker: hit.attacker,
            defender: hit.defender,
            damage: hit.damage,
            blocked: hit.blocked,
            combo_count: hit.combo_count,
        }
    }
}

/// Called once with "did the first character win"
pub type MatchEndCallback = Box<dyn FnOnce(bool)>;

/// A single match between two characters
pub struct MatchSession {
    fighters: [Character; 2],
    table: FrameDataTable,
    /// Simulation tick counter
    tick: u64,
    arena: String,
    winner: Option<Winner>,
    controllers: [Option<OpponentController>; 2],
    on_end: Option<MatchEndCallback>,
}

impl fmt::Debug for MatchSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchSession")
            .field("tick", &self.tick)
            .field("arena", &self.arena)
            .field("winner", &self.winner)
            .field("fighters", &self.fighters)
            .finish_non_exhaustive()
    }
}

impl MatchSession {
    /// Start a match. `on_end` fires exactly once when a fighter is knocked out.
    pub fn new(config: &MatchConfig, on_end: impl FnOnce(bool) + 'static) -> Self {
        let mut p1 = Character::new(&config.fighters[0], P1_START_X);
        let mut p2 = Character::new(&config.fighters[1], P2_START_X);
        p1.face_toward(p2.pos.x);
        p2.face_toward(p1.pos.x);

        let controllers = [0usize, 1].map(|slot| {
            config.cpu[slot].map(|difficulty| {
                let seed = config
                    .seed
                    .wrapping_add((slot as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
                OpponentController::new(seed, difficulty)
            })
        });

        log::info!(
            "Match start: arena '{}', health {} vs {}, cpu {:?}",
            config.arena,
            p1.health,
            p2.health,
            config.cpu.map(|d| d.map(|d| d.as_str()))
        );

        Self {
            fighters: [p1, p2],
            table: FrameDataTable::standard(),
            tick: 0,
            arena: config.arena.clone(),
            winner: None,
            controllers,
            on_end: Some(Box::new(on_end)),
        }
    }

    /// Replace the move set (before the first tick)
    pub fn with_frame_data(mut self, table: FrameDataTable) -> Self {
        for state in CharacterState::ATTACKS {
            if table.lookup(state).is_none() {
                log::warn!("No frame data for {}: it will never hit", state.as_str());
            }
        }
        self.table = table;
        self
    }

    /// Advance the match by one tick. Inputs for CPU-driven slots are ignored.
    pub fn tick(&mut self, inputs: [TickInput; 2]) -> Vec<MatchEvent> {
        if self.winner.is_some() {
            return Vec::new();
        }
        self.tick += 1;
        let tick = self.tick;
        let mut events = Vec::new();
        let before = self.fighters.each_ref().map(|c| (c.state, c.activation));

        // CPU decisions from the same read-only view a player gets
        let views = self.snapshots();
        let mut inputs = inputs;
        for (slot, controller) in self.controllers.iter_mut().enumerate() {
            if let Some(cpu) = controller {
                inputs[slot] = cpu.decide(&views[slot], &views[1 - slot]);
            }
        }

        for slot in 0..2 {
            let opponent_x = self.fighters[1 - slot].pos.x;
            let fighter = &mut self.fighters[slot];
            fighter.face_toward(opponent_x);
            let result = fighter.apply_input(&inputs[slot], tick, &self.table);
            match result.action {
                Some((action @ (Action::Special | Action::Super), ActionOutcome::Applied)) => {
                    events.push(MatchEvent::SpecialActivated {
                        slot,
                        action,
                        via_motion: result.via_motion,
                    });
                }
                Some((action, ActionOutcome::Rejected(reason))) => {
                    log::debug!("slot {} {:?} rejected: {:?}", slot, action, reason);
                    events.push(MatchEvent::ActionRejected {
                        slot,
                        action,
                        reason,
                    });
                }
                _ => {}
            }
        }

        let [p1, p2] = &mut self.fighters;
        physics::step(p1, p2);

        for fighter in &mut self.fighters {
            fighter.advance(&self.table);
        }

        let hits = combat::resolve(&mut self.fighters, &self.table, tick);
        events.extend(hits.into_iter().map(MatchEvent::from));

        for fighter in &mut self.fighters {
            fighter.expire_combo(tick);
        }

        for (slot, fighter) in self.fighters.iter().enumerate() {
            let (from, activation) = before[slot];
            if fighter.state != from || fighter.activation != activation {
                log::debug!("slot {} {} -> {}", slot, from.as_str(), fighter.state.as_str());
                events.push(MatchEvent::StateChanged {
                    slot,
                    from,
                    to: fighter.state,
                });
            }
        }

        if let Some(winner) = self.check_winner() {
            self.finish(winner);
            events.push(MatchEvent::MatchEnded { winner });
        }

        events
    }

    fn check_winner(&self) -> Option<Winner> {
        match (self.fighters[0].is_alive(), self.fighters[1].is_alive()) {
            (true, true) => None,
            (true, false) => Some(Winner::First),
            (false, true) => Some(Winner::Second),
            (false, false) => Some(Winner::Draw),
        }
    }

    fn finish(&mut self, winner: Winner) {
        self.winner = Some(winner);
        log::info!("Match over at tick {}: {:?}", self.tick, winner);
        if let Some(on_end) = self.on_end.take() {
            on_end(winner == Winner::First);
        }
    }

    /// Read-only view of one slot (`None` past the second)
    pub fn snapshot(&self, slot: usize) -> Option<CharacterSnapshot> {
        self.fighters.get(slot).map(Character::snapshot)
    }

    pub fn snapshots(&self) -> [CharacterSnapshot; 2] {
        [self.fighters[0].snapshot(), self.fighters[1].snapshot()]
    }

    pub fn fighters(&self) -> &[Character; 2] {
        &self.fighters
    }

    pub fn frame_data(&self) -> &FrameDataTable {
        &self.table
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn arena(&self) -> &str {
        &self.arena
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }
}
