//! Attack resolution
//!
//! Hits are checked for both attackers against the same pre-resolution state
//! and then applied, so simultaneous hits trade instead of depending on slot
//! order.

use serde::{Deserialize, Serialize};

use super::collision::{hitbox, hurtbox};
use super::frame_data::{FrameData, FrameDataTable};
use super::state::{Character, CharacterState};
use crate::consts::*;

/// A hit detected this tick, not yet applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingHit {
    pub attacker: usize,
    pub defender: usize,
    pub data: FrameData,
    pub blocked: bool,
}

/// Outcome of an applied hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitResult {
    pub attacker: usize,
    pub defender: usize,
    pub damage: u32,
    pub blocked: bool,
    /// Attacker's combo count after this hit
    pub combo_count: u32,
}

/// Damage dealt by a clean hit: base × (1 + combo × 0.1) × attack / defense
///
/// Combo scaling increases per-hit damage as the combo grows.
pub fn hit_damage(base: u32, combo_count: u32, attack: f32, defense: f32) -> u32 {
    scaled(base * (10 + combo_count), attack, defense)
}

/// Chip damage dealt through a block: base × 0.2
pub fn chip_damage(base: u32, attack: f32, defense: f32) -> u32 {
    scaled(base * 2, attack, defense)
}

/// Floor of `tenths / 10 × attack / defense`
fn scaled(tenths: u32, attack: f32, defense: f32) -> u32 {
    let ratio = if defense > 0.0 { attack / defense } else { attack };
    let value = (tenths as f32 / 10.0 * ratio).floor();
    if value.is_finite() && value > 0.0 {
        value as u32
    } else {
        0
    }
}

/// Does `attacker`'s current attack connect with `defender` this tick?
pub fn check_hit(
    attacker: &Character,
    attacker_slot: usize,
    defender: &Character,
    defender_slot: usize,
    table: &FrameDataTable,
) -> Option<PendingHit> {
    let data = table.lookup(attacker.state)?;
    if !data.is_active(attacker.current_frame) {
        return None;
    }
    // One hit per target per activation
    if attacker.hit_targets.contains(&defender_slot) {
        return None;
    }
    if !hitbox(attacker, &data.hitbox).overlaps(&hurtbox(defender)) {
        return None;
    }
    Some(PendingHit {
        attacker: attacker_slot,
        defender: defender_slot,
        data: *data,
        blocked: data.blockable && defender.state.is_guarding(),
    })
}

/// Apply a detected hit to both combatants
pub fn apply_hit(
    attacker: &mut Character,
    defender: &mut Character,
    hit: &PendingHit,
    tick: u64,
) -> HitResult {
    let data = &hit.data;
    let damage = if hit.blocked {
        let damage = chip_damage(data.damage, attacker.stats.attack, defender.stats.defense);
        defender.stun(CharacterState::BlockStun, data.blockstun());
        defender.reset_combo();
        damage
    } else {
        let damage = hit_damage(
            data.damage,
            attacker.combo_count,
            attacker.stats.attack,
            defender.stats.defense,
        );
        defender.stun(CharacterState::HitStun, data.hitstun());
        defender.vel.x = attacker.facing.sign() * data.knockback;
        if data.juggle {
            defender.vel.y = JUGGLE_VELOCITY;
            defender.in_air = true;
        }
        attacker.combo_count += 1;
        attacker.combo_damage += damage;
        attacker.last_hit_tick = Some(tick);
        damage
    };

    attacker.hitstop = HITSTOP_TICKS;
    defender.hitstop = HITSTOP_TICKS;
    defender.take_damage(damage);
    attacker.meter.gain(data.meter_gain);
    attacker.hit_targets.push(hit.defender);

    log::trace!(
        "slot {} {} slot {} for {} (combo {})",
        hit.attacker,
        if hit.blocked { "blocked by" } else { "hit" },
        hit.defender,
        damage,
        attacker.combo_count
    );

    HitResult {
        attacker: hit.attacker,
        defender: hit.defender,
        damage,
        blocked: hit.blocked,
        combo_count: attacker.combo_count,
    }
}

/// Attacker and defender as mutable references
fn pair_mut(fighters: &mut [Character; 2], attacker: usize) -> (&mut Character, &mut Character) {
    let [a, b] = fighters;
    if attacker == 0 { (a, b) } else { (b, a) }
}

/// Detect and apply every hit for this tick
pub fn resolve(fighters: &mut [Character; 2], table: &FrameDataTable, tick: u64) -> Vec<HitResult> {
    let pending = [
        check_hit(&fighters[0], 0, &fighters[1], 1, table),
        check_hit(&fighters[1], 1, &fighters[0], 0, table),
    ];
    pending
        .iter()
        .flatten()
        .map(|hit| {
            let (attacker, defender) = pair_mut(fighters, hit.attacker);
            apply_hit(attacker, defender, hit, tick)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::FighterStats;
    use crate::sim::meter::Meter;
    use crate::sim::state::Facing;

    /// Attacker at 300 facing right, defender 50px away facing left
    fn setup() -> [Character; 2] {
        let stats = FighterStats::default();
        let mut a = Character::new(&stats, 300.0);
        let mut d = Character::new(&stats, 350.0);
        a.facing = Facing::Right;
        d.facing = Facing::Left;
        [a, d]
    }

    /// Put slot 0 into the first active frame of `state`
    fn activate(fighters: &mut [Character; 2], state: CharacterState, table: &FrameDataTable) {
        fighters[0].transition(state);
        fighters[0].current_frame = table.lookup(state).unwrap().startup;
    }

    #[test]
    fn test_clean_light_hit() {
        let table = FrameDataTable::standard();
        let mut f = setup();
        activate(&mut f, CharacterState::LightAttack, &table);

        let results = resolve(&mut f, &table, 10);
        assert_eq!(results.len(), 1);
        let hit = results[0];
        assert_eq!(hit.damage, 8);
        assert!(!hit.blocked);
        assert_eq!(f[1].health, 1000 - 8);
        assert_eq!(f[0].combo_count, 1);
        assert_eq!(f[0].meter.value(), 8);
        assert_eq!(f[1].state, CharacterState::HitStun);
        assert_eq!(f[1].stun_frames, 4 + HITSTUN_BONUS);
        assert_eq!(f[0].hitstop, HITSTOP_TICKS);
        assert_eq!(f[1].hitstop, HITSTOP_TICKS);
        // Knocked away in the attacker's facing direction
        assert!(f[1].vel.x > 0.0);
    }

    #[test]
    fn test_blocked_light_hit() {
        let table = FrameDataTable::standard();
        let mut f = setup();
        f[1].transition(CharacterState::Blocking);
        f[1].combo_count = 3;
        activate(&mut f, CharacterState::LightAttack, &table);

        let results = resolve(&mut f, &table, 10);
        assert_eq!(results[0].damage, 1);
        assert!(results[0].blocked);
        assert_eq!(f[1].health, 999);
        assert_eq!(f[1].state, CharacterState::BlockStun);
        assert_eq!(f[1].stun_frames, 6);
        assert_eq!(f[1].combo_count, 0);
        assert_eq!(f[1].vel.x, 0.0);
        assert_eq!(f[0].combo_count, 0);
        assert_eq!(f[0].meter.value(), 8);
    }

    #[test]
    fn test_unblockable_ignores_guard() {
        let table = FrameDataTable::standard();
        let mut f = setup();
        f[1].transition(CharacterState::Blocking);
        activate(&mut f, CharacterState::SuperMove, &table);
        let results = resolve(&mut f, &table, 10);
        assert!(!results[0].blocked);
        assert_eq!(results[0].damage, 45);
        assert!(f[1].in_air);
    }

    #[test]
    fn test_single_hit_per_activation() {
        let table = FrameDataTable::standard();
        let mut f = setup();
        activate(&mut f, CharacterState::LightAttack, &table);
        assert_eq!(resolve(&mut f, &table, 10).len(), 1);
        // Every remaining active frame overlaps but must not hit again
        for frame in 4..7 {
            f[0].current_frame = frame;
            f[1].pos.x = 350.0;
            assert!(resolve(&mut f, &table, 10 + frame as u64).is_empty());
        }
        assert_eq!(f[1].health, 992);
        // A new activation may hit again
        activate(&mut f, CharacterState::LightAttack, &table);
        assert_eq!(resolve(&mut f, &table, 20).len(), 1);
    }

    #[test]
    fn test_no_hit_outside_active_window() {
        let table = FrameDataTable::standard();
        let mut f = setup();
        f[0].transition(CharacterState::LightAttack);
        f[0].current_frame = 2;
        assert!(resolve(&mut f, &table, 0).is_empty());
        f[0].current_frame = 7;
        assert!(resolve(&mut f, &table, 0).is_empty());
    }

    #[test]
    fn test_out_of_range_misses() {
        let table = FrameDataTable::standard();
        let mut f = setup();
        f[1].pos.x = 500.0;
        activate(&mut f, CharacterState::LightAttack, &table);
        assert!(resolve(&mut f, &table, 0).is_empty());
    }

    #[test]
    fn test_missing_frame_data_is_harmless() {
        let table = FrameDataTable::empty();
        let mut f = setup();
        f[0].transition(CharacterState::HeavyAttack);
        f[0].current_frame = 6;
        assert!(resolve(&mut f, &table, 0).is_empty());
    }

    #[test]
    fn test_combo_scaling_increases_damage() {
        assert_eq!(hit_damage(8, 0, 1.0, 1.0), 8);
        assert_eq!(hit_damage(8, 1, 1.0, 1.0), 8);
        assert_eq!(hit_damage(8, 2, 1.0, 1.0), 9);
        assert_eq!(hit_damage(8, 5, 1.0, 1.0), 12);
        assert_eq!(hit_damage(10, 10, 1.0, 1.0), 20);
        assert_eq!(chip_damage(8, 1.0, 1.0), 1);
        assert_eq!(chip_damage(16, 1.0, 1.0), 3);
    }

    #[test]
    fn test_stats_scale_damage() {
        assert_eq!(hit_damage(10, 0, 1.5, 1.0), 15);
        assert_eq!(hit_damage(10, 0, 1.0, 2.0), 5);
    }

    #[test]
    fn test_juggle_launches_defender() {
        let table = FrameDataTable::standard();
        let mut f = setup();
        activate(&mut f, CharacterState::Launcher, &table);
        resolve(&mut f, &table, 0);
        assert!(f[1].in_air);
        assert_eq!(f[1].vel.y, JUGGLE_VELOCITY);
    }

    #[test]
    fn test_simultaneous_hits_trade() {
        let table = FrameDataTable::standard();
        let mut f = setup();
        activate(&mut f, CharacterState::LightAttack, &table);
        f[1].transition(CharacterState::LightAttack);
        f[1].current_frame = 3;
        let results = resolve(&mut f, &table, 0);
        assert_eq!(results.len(), 2);
        assert_eq!(f[0].health, 992);
        assert_eq!(f[1].health, 992);
        assert_eq!(f[0].state, CharacterState::HitStun);
        assert_eq!(f[1].state, CharacterState::HitStun);
    }

    #[test]
    fn test_meter_gain_capped() {
        let table = FrameDataTable::standard();
        let mut f = setup();
        f[0].meter = Meter::new(96);
        activate(&mut f, CharacterState::LightAttack, &table);
        resolve(&mut f, &table, 0);
        assert_eq!(f[0].meter.value(), 100);
    }
}
