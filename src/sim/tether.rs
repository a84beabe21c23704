//! Tether chain hanging from the balloon
//!
//! Each link is a light, heavily damped point mass pinned to its parent (the
//! previous link, or the balloon's attach point for the first link). A pin
//! keeps the link at a fixed distance from its parent and limits the swing
//! relative to the parent's own direction to a symmetric cone.
//!
//! Links are solved front to back once per step, so every link sees an
//! already-corrected parent. The chain owns its links outright and exposes
//! no way to remove one, so it can never detach.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Body, BodyCategory, BodyId};
use crate::consts::{TETHER_LINK_RADIUS, TETHER_VELOCITY_RETENTION};
use crate::rotate;

/// Direction the first link hangs in when at rest
pub const REST_DIRECTION: Vec2 = Vec2::NEG_Y;

/// Signed angle (radians) that rotates `from` onto `to`
#[inline]
pub fn signed_angle(from: Vec2, to: Vec2) -> f32 {
    from.perp_dot(to).atan2(from.dot(to))
}

/// A single point mass in the chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TetherLink {
    pub body: Body,
    /// Position before this step's integration, used to derive velocity
    #[serde(skip)]
    prev_pos: Vec2,
}

impl TetherLink {
    fn new(id: BodyId, pos: Vec2) -> Self {
        Self {
            body: Body {
                id,
                pos,
                vel: Vec2::ZERO,
                radius: TETHER_LINK_RADIUS,
                category: BodyCategory::TetherLink,
                dynamic: true,
            },
            prev_pos: pos,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }
}

/// The full chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tether {
    links: Vec<TetherLink>,
    /// Where the first pin attaches (bottom of the balloon)
    anchor: Vec2,
    link_length: f32,
    angle_limit: f32,
    damping: f32,
}

impl Tether {
    /// Build a chain hanging straight down from `anchor`. Link ids are
    /// assigned sequentially starting at `first_id`.
    pub fn new(
        anchor: Vec2,
        count: usize,
        link_length: f32,
        angle_limit: f32,
        damping: f32,
        first_id: u32,
    ) -> Self {
        let links = (0..count)
            .map(|i| {
                let pos = anchor + REST_DIRECTION * link_length * (i + 1) as f32;
                TetherLink::new(BodyId(first_id + i as u32), pos)
            })
            .collect();

        Self {
            links,
            anchor,
            link_length,
            angle_limit,
            damping,
        }
    }

    pub fn links(&self) -> &[TetherLink] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn link_length(&self) -> f32 {
        self.link_length
    }

    pub fn angle_limit(&self) -> f32 {
        self.angle_limit
    }

    /// Anchor followed by every link center, in chain order
    pub fn points(&self) -> Vec<Vec2> {
        std::iter::once(self.anchor)
            .chain(self.links.iter().map(|l| l.pos()))
            .collect()
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.links.iter().any(|l| l.body.id == id)
    }

    /// Free-body step: damp velocity and move each link
    pub fn integrate(&mut self, dt: f32) {
        let keep = 1.0 / (1.0 + self.damping * dt);
        for link in &mut self.links {
            link.prev_pos = link.body.pos;
            link.body.vel *= keep;
            link.body.pos += link.body.vel * dt;
        }
    }

    /// Enforce every pin in chain order against the new `anchor`, then derive
    /// link velocities from the corrected motion. Only part of that motion is
    /// kept, otherwise a clamped swing becomes a whip on the next step.
    pub fn solve(&mut self, anchor: Vec2, dt: f32) {
        self.anchor = anchor;

        let mut parent_pos = anchor;
        let mut parent_dir = REST_DIRECTION;

        for link in &mut self.links {
            let offset = link.body.pos - parent_pos;
            let dir = offset.try_normalize().unwrap_or(parent_dir);
            let swing = signed_angle(parent_dir, dir).clamp(-self.angle_limit, self.angle_limit);
            let dir = rotate(parent_dir, swing).normalize_or(parent_dir);

            link.body.pos = parent_pos + dir * self.link_length;
            if dt > 0.0 {
                link.body.vel = (link.body.pos - link.prev_pos) / dt * TETHER_VELOCITY_RETENTION;
            }

            parent_pos = link.body.pos;
            parent_dir = dir;
        }
    }

    /// Swing of link `index` relative to its parent's direction (radians)
    pub fn deflection(&self, index: usize) -> Option<f32> {
        let link = self.links.get(index)?;
        let (parent_pos, parent_dir) = if index == 0 {
            (self.anchor, REST_DIRECTION)
        } else {
            let parent = &self.links[index - 1];
            let grandparent = if index == 1 {
                self.anchor
            } else {
                self.links[index - 2].pos()
            };
            (parent.pos(), (parent.pos() - grandparent).normalize_or(REST_DIRECTION))
        };
        let dir = (link.pos() - parent_pos).normalize_or(parent_dir);
        Some(signed_angle(parent_dir, dir))
    }

    /// Distance from link `index` to its parent
    pub fn span(&self, index: usize) -> Option<f32> {
        let link = self.links.get(index)?;
        let parent = if index == 0 {
            self.anchor
        } else {
            self.links[index - 1].pos()
        };
        Some(link.pos().distance(parent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    fn chain() -> Tether {
        Tether::new(
            Vec2::new(200.0, 370.0),
            TETHER_LINKS,
            TETHER_LINK_LENGTH,
            TETHER_ANGLE_LIMIT,
            TETHER_DAMPING,
            2,
        )
    }

    #[test]
    fn test_new_chain_hangs_straight_down() {
        let t = chain();
        assert_eq!(t.len(), TETHER_LINKS);
        let last = t.links().last().unwrap().pos();
        assert!((last.x - 200.0).abs() < 1e-4);
        assert!((last.y - (370.0 - 22.0 * 6.0)).abs() < 1e-3);
        for i in 0..t.len() {
            assert!(t.deflection(i).unwrap().abs() < 1e-5);
        }
    }

    #[test]
    fn test_ids_are_sequential() {
        let t = chain();
        assert_eq!(t.links()[0].body.id, BodyId(2));
        assert_eq!(t.links()[21].body.id, BodyId(23));
        assert!(t.contains(BodyId(10)));
        assert!(!t.contains(BodyId(1)));
    }

    #[test]
    fn test_sideways_anchor_move_is_limited() {
        let mut t = chain();
        // Yank the anchor far to the right in one step
        t.integrate(SIM_DT);
        t.solve(Vec2::new(400.0, 370.0), SIM_DT);
        let first = t.deflection(0).unwrap();
        assert!(first.abs() <= TETHER_ANGLE_LIMIT + 1e-4);
        for i in 0..t.len() {
            assert!((t.span(i).unwrap() - TETHER_LINK_LENGTH).abs() < 1e-3);
        }
    }

    #[test]
    fn test_links_trail_behind_moving_anchor() {
        let mut t = chain();
        for i in 0..60 {
            t.integrate(SIM_DT);
            t.solve(Vec2::new(200.0 + i as f32 * 3.0, 370.0), SIM_DT);
        }
        let last = t.links().last().unwrap().pos();
        // Dragged rightward, the tail lags well to the left of the anchor
        // and never swings up past it
        assert!(last.x < t.anchor().x - 100.0, "tail at {:?}", last);
        assert!(last.y <= t.anchor().y, "tail at {:?}", last);
        for link in t.links() {
            assert!(link.body.vel.length() <= 180.0, "link speed {}", link.body.vel.length());
        }
    }

    #[test]
    fn test_push_then_stop_settles_without_whip() {
        // Balloon pushed right at impulse speed for 0.3 s, then held still
        let mut t = chain();
        let mut anchor = t.anchor();
        let anchor_speed = PLAYER_IMPULSE_SPEED;
        let mut peak: f32 = 0.0;
        for step in 0..318 {
            if step < 18 {
                anchor.x += anchor_speed * SIM_DT;
            }
            t.integrate(SIM_DT);
            t.solve(anchor, SIM_DT);
            for link in t.links() {
                peak = peak.max(link.body.vel.length());
            }
        }
        assert!(peak < anchor_speed, "peak link speed {}", peak);

        for link in t.links() {
            assert!(link.body.vel.length() < 1.0);
        }
        // The tail does not fold back into the balloon
        let balloon = anchor + Vec2::new(0.0, PLAYER_RADIUS);
        for link in t.links() {
            assert!(link.pos().distance(balloon) > PLAYER_RADIUS, "link at {:?}", link.pos());
        }
    }

    #[test]
    fn test_velocity_reflects_motion() {
        let mut t = chain();
        t.integrate(SIM_DT);
        t.solve(Vec2::new(200.0, 380.0), SIM_DT);
        // Whole chain lifted 10 units this step
        assert!(t.links()[0].body.vel.y > 0.0);
    }

    proptest! {
        #[test]
        fn prop_chain_stays_connected_and_limited(
            moves in proptest::collection::vec((-30.0f32..30.0, -30.0f32..30.0), 1..120)
        ) {
            let mut t = chain();
            let mut anchor = t.anchor();
            for (dx, dy) in moves {
                anchor += Vec2::new(dx, dy);
                t.integrate(SIM_DT);
                t.solve(anchor, SIM_DT);

                prop_assert_eq!(t.len(), TETHER_LINKS);
                for i in 0..t.len() {
                    let swing = t.deflection(i).unwrap();
                    prop_assert!(swing.abs() <= TETHER_ANGLE_LIMIT + 1e-3, "link {} swing {}", i, swing);
                    let span = t.span(i).unwrap();
                    prop_assert!((span - TETHER_LINK_LENGTH).abs() < 1e-2, "link {} span {}", i, span);
                }
            }
        }
    }
}
