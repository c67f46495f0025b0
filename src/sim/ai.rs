//! Reactive CPU opponent
//!
//! Reads only the public snapshots of both fighters and produces a
//! [`TickInput`], exactly like a human player. Decisions use a seeded RNG so
//! matches replay identically.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::input::{Action, TickInput};
use super::meter::{METER_MAX, SPECIAL_COST};
use super::state::CharacterSnapshot;
use crate::settings::Difficulty;

/// Within this horizontal distance the CPU fights instead of walking in
pub const ENGAGE_DISTANCE: f32 = 85.0;
/// Reaction range for blocking an opponent's attack
const THREAT_DISTANCE: f32 = 140.0;

/// Ticks the CPU waits after each choice before choosing again
fn base_cooldown(choice: Choice) -> u32 {
    match choice {
        Choice::Attack(Action::Light) => 18,
        Choice::Attack(Action::Heavy) => 36,
        Choice::Attack(Action::Launcher) => 40,
        Choice::Attack(Action::Special) => 48,
        Choice::Attack(Action::Super) => 90,
        Choice::Block => 12,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Attack(Action),
    Block,
}

#[derive(Debug, Clone)]
pub struct OpponentController {
    rng: Pcg32,
    difficulty: Difficulty,
    /// Ticks until the next decision
    cooldown: u32,
    /// Ticks left to keep guard held
    block_hold: u32,
}

impl OpponentController {
    pub fn new(seed: u64, difficulty: Difficulty) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            cooldown: 0,
            block_hold: 0,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Aggression from own health: 0.3 at full health up to 0.8 near death
    pub fn aggression(health_pct: f32) -> f32 {
        let missing = (1.0 - health_pct).clamp(0.0, 1.0);
        0.3 + 0.5 * missing
    }

    /// Choose this tick's input
    pub fn decide(&mut self, me: &CharacterSnapshot, opponent: &CharacterSnapshot) -> TickInput {
        let holding = self.block_hold > 0;
        self.block_hold = self.block_hold.saturating_sub(1);
        self.cooldown = self.cooldown.saturating_sub(1);

        // Mid-attack or stunned: no new decisions, keep any guard held
        if me.is_busy() || me.in_air {
            return TickInput {
                block: holding,
                ..Default::default()
            };
        }
        if holding {
            return TickInput {
                block: true,
                ..Default::default()
            };
        }

        let distance = (opponent.pos.x - me.pos.x).abs();

        if self.cooldown == 0
            && opponent.state.is_attack()
            && distance < THREAT_DISTANCE
            && self.rng.random::<f32>() < self.difficulty.block_chance()
        {
            self.commit(Choice::Block);
            self.block_hold = base_cooldown(Choice::Block);
            return TickInput {
                block: true,
                ..Default::default()
            };
        }

        if distance > ENGAGE_DISTANCE {
            return TickInput {
                forward: true,
                ..Default::default()
            };
        }

        if self.cooldown > 0 || self.rng.random::<f32>() >= Self::aggression(me.health_pct) {
            return TickInput::default();
        }

        let action = self.pick_attack(me.meter);
        self.commit(Choice::Attack(action));
        log::debug!("cpu chose {:?} at distance {:.0}", action, distance);
        let mut input = TickInput::default();
        match action {
            Action::Light => input.light = true,
            Action::Heavy => input.heavy = true,
            Action::Launcher => input.launcher = true,
            Action::Special => input.special = true,
            Action::Super => input.super_move = true,
        }
        input
    }

    /// Weighted choice among affordable attacks
    fn pick_attack(&mut self, meter: u32) -> Action {
        let mut options = vec![(Action::Light, 5), (Action::Heavy, 3), (Action::Launcher, 2)];
        if meter >= SPECIAL_COST {
            options.push((Action::Special, 2));
        }
        if meter >= METER_MAX {
            options.push((Action::Super, 4));
        }
        let total: u32 = options.iter().map(|(_, w)| w).sum();
        let mut roll = self.rng.random_range(0..total);
        for (action, weight) in &options {
            if roll < *weight {
                return *action;
            }
            roll -= weight;
        }
        Action::Light
    }

    fn commit(&mut self, choice: Choice) {
        let scaled = base_cooldown(choice) as f32 * self.difficulty.cooldown_scale();
        self.cooldown = scaled.round() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::FighterStats;
    use crate::sim::state::{Character, CharacterState, Facing};

    fn snapshots(distance: f32) -> (Character, Character) {
        let stats = FighterStats::default();
        let mut me = Character::new(&stats, 300.0);
        let mut them = Character::new(&stats, 300.0 + distance);
        me.facing = Facing::Right;
        them.facing = Facing::Left;
        (me, them)
    }

    fn attack_of(input: &TickInput) -> Option<Action> {
        input.pressed_action()
    }

    #[test]
    fn test_approaches_when_far() {
        let (me, them) = snapshots(300.0);
        let mut cpu = OpponentController::new(1, Difficulty::Normal);
        let input = cpu.decide(&me.snapshot(), &them.snapshot());
        assert!(input.forward);
        assert!(attack_of(&input).is_none());
    }

    #[test]
    fn test_no_decisions_while_busy() {
        let (mut me, them) = snapshots(50.0);
        me.stun(CharacterState::HitStun, 10);
        let mut cpu = OpponentController::new(7, Difficulty::Hard);
        for _ in 0..50 {
            let input = cpu.decide(&me.snapshot(), &them.snapshot());
            assert_eq!(input, TickInput::default());
        }
    }

    #[test]
    fn test_cooldown_spaces_out_attacks() {
        let (me, them) = snapshots(50.0);
        let mut cpu = OpponentController::new(3, Difficulty::Hard);
        let mut last_attack: Option<u32> = None;
        let min_gap = (18.0 * Difficulty::Hard.cooldown_scale()).round() as u32;
        for tick in 0..600 {
            let input = cpu.decide(&me.snapshot(), &them.snapshot());
            if attack_of(&input).is_some() {
                if let Some(last) = last_attack {
                    assert!(tick - last >= min_gap, "attacks {} ticks apart", tick - last);
                }
                last_attack = Some(tick);
            }
        }
        assert!(last_attack.is_some(), "cpu never attacked");
    }

    #[test]
    fn test_never_spends_meter_it_lacks() {
        let (me, them) = snapshots(50.0);
        let mut cpu = OpponentController::new(11, Difficulty::Hard);
        for _ in 0..2000 {
            let input = cpu.decide(&me.snapshot(), &them.snapshot());
            assert!(!input.special && !input.super_move);
        }
    }

    #[test]
    fn test_full_meter_unlocks_super() {
        let (mut me, them) = snapshots(50.0);
        me.meter = crate::sim::meter::Meter::new(100);
        let mut cpu = OpponentController::new(5, Difficulty::Hard);
        let supers = (0..3000)
            .filter(|_| cpu.decide(&me.snapshot(), &them.snapshot()).super_move)
            .count();
        assert!(supers > 0);
    }

    #[test]
    fn test_blocks_incoming_attacks_sometimes() {
        let (me, mut them) = snapshots(60.0);
        them.transition(CharacterState::HeavyAttack);
        let mut cpu = OpponentController::new(9, Difficulty::Hard);
        let blocks = (0..500)
            .filter(|_| cpu.decide(&me.snapshot(), &them.snapshot()).block)
            .count();
        assert!(blocks > 0);
    }

    #[test]
    fn test_same_seed_same_decisions() {
        let (me, them) = snapshots(50.0);
        let mut a = OpponentController::new(42, Difficulty::Normal);
        let mut b = OpponentController::new(42, Difficulty::Normal);
        for _ in 0..300 {
            assert_eq!(
                a.decide(&me.snapshot(), &them.snapshot()),
                b.decide(&me.snapshot(), &them.snapshot())
            );
        }
    }

    #[test]
    fn test_aggression_rises_as_health_falls() {
        assert!((OpponentController::aggression(1.0) - 0.3).abs() < 1e-6);
        assert!((OpponentController::aggression(0.0) - 0.8).abs() < 1e-6);
        assert!(OpponentController::aggression(0.25) > OpponentController::aggression(0.75));
    }
}
