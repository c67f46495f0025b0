//! Movement integration
//!
//! Per tick: gravity while airborne, friction while grounded and idle,
//! position integration, ground plane, arena walls, then pushbox separation.
//! Characters in hitstop do not move.

use super::collision::push_apart;
use super::state::{Character, CharacterState};
use crate::consts::*;

/// Velocities below this snap to zero under friction
const REST_EPSILON: f32 = 0.01;

/// Integrate one character for one tick
pub fn integrate(c: &mut Character) {
    if c.hitstop > 0 {
        return;
    }

    if c.in_air {
        c.vel.y -= GRAVITY;
    } else if c.state == CharacterState::Idle {
        c.vel.x *= FRICTION;
        if c.vel.x.abs() < REST_EPSILON {
            c.vel.x = 0.0;
        }
    }

    c.pos += c.vel;

    if c.pos.y <= GROUND_Y {
        c.pos.y = GROUND_Y;
        if c.in_air && c.vel.y <= 0.0 {
            land(c);
        }
        c.vel.y = c.vel.y.max(0.0);
    }

    clamp_to_walls(c);
}

/// Touch down: clear airborne status and refill the air-action budget
fn land(c: &mut Character) {
    c.in_air = false;
    c.air_actions = AIR_ACTIONS;
    c.vel.y = 0.0;
    match c.state {
        CharacterState::HitStun => {
            log::trace!("landed in hitstun: knockdown");
            c.vel.x = 0.0;
            c.stun(CharacterState::Knockdown, KNOCKDOWN_TICKS);
        }
        CharacterState::Jumping | CharacterState::AirCombo => {
            c.vel.x = 0.0;
            c.transition(CharacterState::Idle);
        }
        _ => {}
    }
}

/// Keep the body inside the arena; stop motion into a wall
pub fn clamp_to_walls(c: &mut Character) {
    let min_x = BODY_WIDTH / 2.0;
    let max_x = ARENA_WIDTH - BODY_WIDTH / 2.0;
    if c.pos.x < min_x {
        c.pos.x = min_x;
        c.vel.x = c.vel.x.max(0.0);
    } else if c.pos.x > max_x {
        c.pos.x = max_x;
        c.vel.x = c.vel.x.min(0.0);
    }
}

/// Step both combatants and keep their bodies apart
pub fn step(a: &mut Character, b: &mut Character) {
    integrate(a);
    integrate(b);
    push_apart(a, b);
    clamp_to_walls(a);
    clamp_to_walls(b);
}
