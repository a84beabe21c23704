//! Contact detection and classification
//!
//! Detection is geometric (circle vs circle, circle vs rotated box).
//! Classification is a pure function of the two bodies' categories, built on
//! the same bitmask trick as category-masked physics engines: OR the two
//! masks together and match on the result, which makes it order-independent.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{BodyCategory, BodyId, Projectile, World};
use crate::rotate;

/// Semantic meaning of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactEvent {
    PlayerHitProjectile,
    PlayerHitPowerUp,
    NoOp,
}

const PLAYER_PROJECTILE: u32 = BodyCategory::Player.bits() | BodyCategory::Projectile.bits();
const PLAYER_POWER_UP: u32 = BodyCategory::Player.bits() | BodyCategory::PowerUp.bits();

/// Map an unordered category pair to a contact event
pub fn classify(a: BodyCategory, b: BodyCategory) -> ContactEvent {
    match a.bits() | b.bits() {
        PLAYER_PROJECTILE => ContactEvent::PlayerHitProjectile,
        PLAYER_POWER_UP => ContactEvent::PlayerHitPowerUp,
        _ => ContactEvent::NoOp,
    }
}

/// A detected overlap between two bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub a: BodyId,
    pub b: BodyId,
}

#[inline]
pub fn circle_overlaps_circle(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// Circle against a box of `half_extents` centered at `box_center` and
/// rotated by `rotation` radians
pub fn circle_overlaps_box(
    center: Vec2,
    radius: f32,
    box_center: Vec2,
    half_extents: Vec2,
    rotation: f32,
) -> bool {
    let local = rotate(center - box_center, -rotation);
    let closest = local.clamp(-half_extents, half_extents);
    local.distance_squared(closest) < radius * radius
}

/// Every contact between the balloon and a projectile or pickup, in
/// ascending id order of the other body. Tether links never make contact.
pub fn detect_contacts(world: &World) -> Vec<Contact> {
    let player = &world.player;
    let mut contacts: Vec<Contact> = Vec::new();

    for projectile in &world.projectiles {
        // Cheap bounding-circle reject first
        if !circle_overlaps_circle(player.pos, player.radius, projectile.body.pos, projectile.body.radius) {
            continue;
        }
        if circle_overlaps_box(
            player.pos,
            player.radius,
            projectile.body.pos,
            Projectile::HALF_EXTENTS,
            projectile.heading,
        ) {
            contacts.push(Contact {
                a: player.id,
                b: projectile.body.id,
            });
        }
    }

    for power_up in &world.power_ups {
        if circle_overlaps_circle(player.pos, player.radius, power_up.body.pos, power_up.body.radius) {
            contacts.push(Contact {
                a: player.id,
                b: power_up.body.id,
            });
        }
    }

    contacts.sort_by_key(|c| c.b);
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PowerUpKind;
    use crate::tuning::Tuning;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    const ALL: [BodyCategory; 5] = [
        BodyCategory::Player,
        BodyCategory::Projectile,
        BodyCategory::Boundary,
        BodyCategory::TetherLink,
        BodyCategory::PowerUp,
    ];

    #[test]
    fn test_classify_pairs() {
        use BodyCategory::*;
        assert_eq!(classify(Player, Projectile), ContactEvent::PlayerHitProjectile);
        assert_eq!(classify(PowerUp, Player), ContactEvent::PlayerHitPowerUp);
        assert_eq!(classify(Player, Boundary), ContactEvent::NoOp);
        assert_eq!(classify(Player, TetherLink), ContactEvent::NoOp);
        assert_eq!(classify(Projectile, PowerUp), ContactEvent::NoOp);
        assert_eq!(classify(Player, Player), ContactEvent::NoOp);
        assert_eq!(classify(Projectile, Projectile), ContactEvent::NoOp);
    }

    #[test]
    fn test_box_overlap_respects_rotation() {
        let half = Vec2::new(24.0, 4.5);
        // Circle 20 above a horizontal box: misses
        assert!(!circle_overlaps_box(Vec2::new(0.0, 20.0), 10.0, Vec2::ZERO, half, 0.0));
        // Same circle with the box stood upright: hits
        assert!(circle_overlaps_box(Vec2::new(0.0, 20.0), 10.0, Vec2::ZERO, half, FRAC_PI_2));
    }

    #[test]
    fn test_circle_overlap() {
        assert!(circle_overlaps_circle(Vec2::ZERO, 30.0, Vec2::new(40.0, 0.0), 18.0));
        assert!(!circle_overlaps_circle(Vec2::ZERO, 30.0, Vec2::new(50.0, 0.0), 18.0));
    }

    #[test]
    fn test_detect_contacts_sorted() {
        let mut world = World::new(&Tuning::default());
        let center = world.player.pos;
        let pickup = world.spawn_power_up(PowerUpKind::Shield, center + Vec2::new(20.0, 0.0), 0.0, 6.0);
        let arrow = world.spawn_projectile(center - Vec2::new(40.0, 0.0), center, 0.0, 250.0, 5.0);
        let far = world.spawn_projectile(Vec2::new(-40.0, 10.0), center, 0.0, 250.0, 5.0);

        let contacts = detect_contacts(&world);
        let others: Vec<BodyId> = contacts.iter().map(|c| c.b).collect();
        assert_eq!(others, vec![pickup, arrow]);
        assert!(!others.contains(&far));
        assert!(contacts.iter().all(|c| c.a == world.player.id));
    }

    proptest! {
        #[test]
        fn prop_classify_is_order_independent(a in 0usize..5, b in 0usize..5) {
            prop_assert_eq!(classify(ALL[a], ALL[b]), classify(ALL[b], ALL[a]));
        }
    }
}
