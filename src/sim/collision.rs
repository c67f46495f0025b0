//! Box collision for hurtboxes, hitboxes and pushboxes
//!
//! Everything is an axis-aligned box in arena space (y up). A character's
//! position is the center of its feet.

use glam::Vec2;

use super::frame_data::Hitbox;
use super::state::{Character, CharacterState};
use crate::consts::*;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box with bottom-center at `feet`
    pub fn from_feet(feet: Vec2, width: f32, height: f32) -> Self {
        Self::new(
            Vec2::new(feet.x - width / 2.0, feet.y),
            Vec2::new(feet.x + width / 2.0, feet.y + height),
        )
    }

    /// Strict overlap (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Horizontal overlap depth (0 if apart)
    pub fn overlap_x(&self, other: &Aabb) -> f32 {
        (self.max.x.min(other.max.x) - self.min.x.max(other.min.x)).max(0.0)
    }
}

/// Vulnerable area of a character
pub fn hurtbox(character: &Character) -> Aabb {
    let height = if character.state == CharacterState::Crouching {
        CROUCH_HEIGHT
    } else {
        BODY_HEIGHT
    };
    Aabb::from_feet(character.pos, BODY_WIDTH, height)
}

/// Place an attack hitbox in front of the character
pub fn hitbox(character: &Character, shape: &Hitbox) -> Aabb {
    let dir = character.facing.sign();
    let near = character.pos.x + dir * shape.forward;
    let far = near + dir * shape.width;
    let bottom = character.pos.y + shape.up;
    Aabb::new(
        Vec2::new(near, bottom),
        Vec2::new(far, bottom + shape.height),
    )
}

/// Separate two grounded bodies so they never overlap horizontally
///
/// Each body moves half the overlap away from the other.
pub fn push_apart(a: &mut Character, b: &mut Character) {
    if a.in_air || b.in_air {
        return;
    }
    let box_a = Aabb::from_feet(a.pos, BODY_WIDTH, BODY_HEIGHT);
    let box_b = Aabb::from_feet(b.pos, BODY_WIDTH, BODY_HEIGHT);
    if !box_a.overlaps(&box_b) {
        return;
    }
    let half = box_a.overlap_x(&box_b) / 2.0;
    // Equal x: resolve by facing so the result is deterministic
    let a_left = if a.pos.x == b.pos.x {
        a.facing.sign() > 0.0
    } else {
        a.pos.x < b.pos.x
    };
    let dir = if a_left { -1.0 } else { 1.0 };
    a.pos.x += dir * half;
    b.pos.x -= dir * half;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::FighterStats;
    use crate::sim::state::Facing;

    fn fighter_at(x: f32, facing: Facing) -> Character {
        let mut c = Character::new(&FighterStats::default(), x);
        c.facing = facing;
        c
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::from_feet(Vec2::new(0.0, 0.0), 40.0, 90.0);
        let b = Aabb::from_feet(Vec2::new(30.0, 0.0), 40.0, 90.0);
        let c = Aabb::from_feet(Vec2::new(40.0, 0.0), 40.0, 90.0);
        assert!(a.overlaps(&b));
        // Touching edges only
        assert!(!a.overlaps(&c));
        assert!((a.overlap_x(&b) - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_hitbox_follows_facing() {
        let shape = Hitbox {
            forward: 10.0,
            up: 50.0,
            width: 50.0,
            height: 25.0,
        };
        let right = hitbox(&fighter_at(100.0, Facing::Right), &shape);
        assert_eq!(right.min.x, 110.0);
        assert_eq!(right.max.x, 160.0);
        let left = hitbox(&fighter_at(100.0, Facing::Left), &shape);
        assert_eq!(left.min.x, 40.0);
        assert_eq!(left.max.x, 90.0);
        assert_eq!(left.min.y, 50.0);
    }

    #[test]
    fn test_crouch_shrinks_hurtbox() {
        let mut c = fighter_at(100.0, Facing::Right);
        assert_eq!(hurtbox(&c).max.y, BODY_HEIGHT);
        c.state = CharacterState::Crouching;
        assert_eq!(hurtbox(&c).max.y, CROUCH_HEIGHT);
    }

    #[test]
    fn test_push_apart() {
        let mut a = fighter_at(100.0, Facing::Right);
        let mut b = fighter_at(120.0, Facing::Left);
        push_apart(&mut a, &mut b);
        assert!((b.pos.x - a.pos.x - BODY_WIDTH).abs() < 0.001);
        assert!((a.pos.x - 90.0).abs() < 0.001);
    }

    #[test]
    fn test_push_apart_ignores_airborne() {
        let mut a = fighter_at(100.0, Facing::Right);
        let mut b = fighter_at(110.0, Facing::Left);
        b.in_air = true;
        push_apart(&mut a, &mut b);
        assert_eq!(a.pos.x, 100.0);
        assert_eq!(b.pos.x, 110.0);
    }
}
