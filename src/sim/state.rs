//! World state and core simulation types
//!
//! The session owns exactly one `World`. Bodies live in id-sorted vectors so
//! iteration order is stable from run to run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tether::Tether;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{direction_from_angle, ease_in_out, heading_angle};

/// Stable handle to a body in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Contact category of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyCategory {
    Player,
    Projectile,
    Boundary,
    TetherLink,
    PowerUp,
}

impl BodyCategory {
    /// Single-bit mask for this category
    pub const fn bits(self) -> u32 {
        match self {
            BodyCategory::Player => 0b1,
            BodyCategory::Projectile => 0b10,
            BodyCategory::Boundary => 0b100,
            BodyCategory::TetherLink => 0b1000,
            BodyCategory::PowerUp => 0b1_0000,
        }
    }
}

/// A simulated body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Contact radius (bounding radius for non-circular shapes)
    pub radius: f32,
    pub category: BodyCategory,
    /// Whether integration moves this body
    pub dynamic: bool,
}

impl Body {
    /// Attach point for the tether (bottom of the balloon)
    pub fn attach_point(&self) -> Vec2 {
        self.pos - Vec2::new(0.0, self.radius)
    }
}

/// An arrow in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    /// Direction of travel (radians), fixed at launch
    pub heading: f32,
    /// Session time when fired
    pub spawn_time: f32,
    /// Seconds since fired
    pub age: f32,
    pub ttl: f32,
}

impl Projectile {
    /// Half size of the arrow's contact box in its local frame
    pub const HALF_EXTENTS: Vec2 = Vec2::new(ARROW_LENGTH / 2.0, ARROW_WIDTH / 2.0);

    pub fn expired(&self) -> bool {
        self.age >= self.ttl
    }

    /// Straight-line motion only
    pub fn advance(&mut self, dt: f32) {
        self.body.pos += self.body.vel * dt;
        self.age += dt;
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    /// Reserved; consumed on pickup with no effect
    SlowMo,
}

/// A stationary pickup (floats gently around its anchor)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub body: Body,
    pub kind: PowerUpKind,
    /// Rest position the pickup bobs above
    pub anchor: Vec2,
    pub spawn_time: f32,
    pub age: f32,
    pub timeout: f32,
}

impl PowerUp {
    /// Vertical float offset for a given age
    pub fn bob_offset(age: f32) -> f32 {
        let cycle = age.rem_euclid(2.0 * POWER_UP_BOB_HALF_PERIOD) / POWER_UP_BOB_HALF_PERIOD;
        let t = if cycle <= 1.0 { cycle } else { 2.0 - cycle };
        ease_in_out(t) * POWER_UP_BOB_HEIGHT
    }

    pub fn advance(&mut self, dt: f32) {
        self.age += dt;
        self.body.pos = self.anchor + Vec2::new(0.0, Self::bob_offset(self.age));
    }

    pub fn expired(&self) -> bool {
        self.age >= self.timeout
    }

    /// Opacity, fading out over the last moments of the timeout
    pub fn fade(&self) -> f32 {
        let remaining = self.timeout - self.age;
        (remaining / POWER_UP_FADE).clamp(0.0, 1.0)
    }
}

/// One-hit shield
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShieldState {
    pub active: bool,
    /// Seconds since activation, drives the breathing/spin visuals
    pub phase: f32,
}

impl ShieldState {
    /// Returns false if the shield was already up
    pub fn activate(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.phase = 0.0;
        true
    }

    /// Consume the shield. Returns false if there was nothing to consume.
    pub fn absorb(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        self.phase = 0.0;
        was_active
    }

    pub fn advance(&mut self, dt: f32) {
        if self.active {
            self.phase += dt;
        }
    }
}

/// Round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    /// Created, not yet started
    Ready,
    Running,
    /// Terminal
    Over,
}

/// Notable things that happened during a step, for audio/UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted,
    WarningShown { spawn_point: Vec2, indicator: Vec2 },
    ProjectileFired { id: BodyId, from: Vec2 },
    ProjectileSurvived { id: BodyId },
    PowerUpSpawned { id: BodyId, kind: PowerUpKind },
    PowerUpExpired { id: BodyId },
    PowerUpConsumed { id: BodyId, kind: PowerUpKind },
    ShieldActivated,
    ShieldAbsorbed { projectile: BodyId },
    GameOver { final_score: u64 },
}

/// Every body in play
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub size: Vec2,
    pub player: Body,
    pub tether: Tether,
    /// Sorted by id
    pub projectiles: Vec<Projectile>,
    /// Sorted by id
    pub power_ups: Vec<PowerUp>,
    next_id: u32,
}

impl World {
    /// Balloon at the center with its tether hanging below
    pub fn new(tuning: &Tuning) -> Self {
        let size = tuning.world_size;
        let player = Body {
            id: BodyId(1),
            pos: size / 2.0,
            vel: Vec2::ZERO,
            radius: tuning.player_radius,
            category: BodyCategory::Player,
            dynamic: true,
        };
        let tether = Tether::new(
            player.attach_point(),
            tuning.tether_links,
            tuning.tether_link_length,
            tuning.tether_angle_limit,
            tuning.tether_damping,
            2,
        );
        let next_id = 2 + tuning.tether_links as u32;

        Self {
            size,
            player,
            tether,
            projectiles: Vec::new(),
            power_ups: Vec::new(),
            next_id,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn center(&self) -> Vec2 {
        self.size / 2.0
    }

    /// Fire an arrow from `from` toward `target` (aim is fixed at launch)
    pub fn spawn_projectile(&mut self, from: Vec2, target: Vec2, now: f32, speed: f32, ttl: f32) -> BodyId {
        let id = self.next_entity_id();
        let heading = heading_angle(target - from);
        let body = Body {
            id,
            pos: from,
            vel: direction_from_angle(heading) * speed,
            radius: Projectile::HALF_EXTENTS.length(),
            category: BodyCategory::Projectile,
            dynamic: true,
        };
        self.projectiles.push(Projectile {
            body,
            heading,
            spawn_time: now,
            age: 0.0,
            ttl,
        });
        id
    }

    pub fn spawn_power_up(&mut self, kind: PowerUpKind, at: Vec2, now: f32, timeout: f32) -> BodyId {
        let id = self.next_entity_id();
        let body = Body {
            id,
            pos: at,
            vel: Vec2::ZERO,
            radius: POWER_UP_RADIUS,
            category: BodyCategory::PowerUp,
            dynamic: false,
        };
        self.power_ups.push(PowerUp {
            body,
            kind,
            anchor: at,
            spawn_time: now,
            age: 0.0,
            timeout,
        });
        id
    }

    /// Category of a live body, `None` if it no longer exists
    pub fn category_of(&self, id: BodyId) -> Option<BodyCategory> {
        if id == self.player.id {
            Some(BodyCategory::Player)
        } else if self.projectiles.iter().any(|p| p.body.id == id) {
            Some(BodyCategory::Projectile)
        } else if self.power_ups.iter().any(|p| p.body.id == id) {
            Some(BodyCategory::PowerUp)
        } else if self.tether.contains(id) {
            Some(BodyCategory::TetherLink)
        } else {
            None
        }
    }

    pub fn projectile(&self, id: BodyId) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.body.id == id)
    }

    pub fn power_up(&self, id: BodyId) -> Option<&PowerUp> {
        self.power_ups.iter().find(|p| p.body.id == id)
    }

    /// Remove a projectile or pickup. The balloon and tether links are
    /// permanent and are never removed.
    pub fn remove(&mut self, id: BodyId) -> Option<BodyCategory> {
        if let Some(i) = self.projectiles.iter().position(|p| p.body.id == id) {
            self.projectiles.remove(i);
            return Some(BodyCategory::Projectile);
        }
        if let Some(i) = self.power_ups.iter().position(|p| p.body.id == id) {
            self.power_ups.remove(i);
            return Some(BodyCategory::PowerUp);
        }
        None
    }

    /// Move the balloon, damping its velocity and bouncing it off the edges
    pub fn integrate_player(&mut self, dt: f32, damping: f32, restitution: f32) {
        let player = &mut self.player;
        player.vel *= 1.0 / (1.0 + damping * dt);
        player.pos += player.vel * dt;

        let r = player.radius;
        let min = Vec2::splat(r);
        let max = (self.size - Vec2::splat(r)).max(min);

        if player.pos.x < min.x || player.pos.x > max.x {
            player.pos.x = player.pos.x.clamp(min.x, max.x);
            player.vel.x = -player.vel.x * restitution;
        }
        if player.pos.y < min.y || player.pos.y > max.y {
            player.pos.y = player.pos.y.clamp(min.y, max.y);
            player.vel.y = -player.vel.y * restitution;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_layout() {
        let world = World::new(&Tuning::default());
        assert_eq!(world.player.pos, Vec2::new(200.0, 400.0));
        assert_eq!(world.tether.len(), TETHER_LINKS);
        assert_eq!(world.tether.anchor(), Vec2::new(200.0, 370.0));
    }

    #[test]
    fn test_ids_never_collide_with_tether() {
        let mut world = World::new(&Tuning::default());
        let id = world.next_entity_id();
        assert_eq!(world.category_of(id), None);
        assert!(!world.tether.contains(id));
        assert_ne!(id, world.player.id);
    }

    #[test]
    fn test_category_bits_are_distinct() {
        let all = [
            BodyCategory::Player,
            BodyCategory::Projectile,
            BodyCategory::Boundary,
            BodyCategory::TetherLink,
            BodyCategory::PowerUp,
        ];
        let combined = all.iter().fold(0, |acc, c| acc | c.bits());
        assert_eq!(combined.count_ones(), all.len() as u32);
    }

    #[test]
    fn test_projectile_aims_at_target() {
        let mut world = World::new(&Tuning::default());
        let id = world.spawn_projectile(Vec2::new(-40.0, 300.0), Vec2::new(200.0, 400.0), 0.0, 250.0, 5.0);
        let p = world.projectile(id).unwrap();
        let expected = Vec2::new(240.0, 100.0).normalize() * 250.0;
        assert!((p.body.vel - expected).length() < 1e-3);
        assert_eq!(world.category_of(id), Some(BodyCategory::Projectile));
    }

    #[test]
    fn test_remove_only_transient_bodies() {
        let mut world = World::new(&Tuning::default());
        let id = world.spawn_power_up(PowerUpKind::Shield, Vec2::new(150.0, 150.0), 0.0, 6.0);
        assert_eq!(world.remove(id), Some(BodyCategory::PowerUp));
        assert_eq!(world.remove(id), None);
        let player = world.player.id;
        assert_eq!(world.remove(player), None);
        let link = world.tether.links()[0].body.id;
        assert_eq!(world.remove(link), None);
        assert_eq!(world.tether.len(), TETHER_LINKS);
    }

    #[test]
    fn test_player_bounces_off_left_edge() {
        let mut world = World::new(&Tuning::default());
        world.player.pos = Vec2::new(31.0, 400.0);
        world.player.vel = Vec2::new(-450.0, 0.0);
        world.integrate_player(SIM_DT, 0.0, 0.2);
        assert_eq!(world.player.pos.x, PLAYER_RADIUS);
        assert!((world.player.vel.x - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_power_up_bob_and_fade() {
        assert_eq!(PowerUp::bob_offset(0.0), 0.0);
        assert!((PowerUp::bob_offset(1.5) - POWER_UP_BOB_HEIGHT).abs() < 1e-4);
        assert!(PowerUp::bob_offset(3.0).abs() < 1e-4);

        let mut world = World::new(&Tuning::default());
        let id = world.spawn_power_up(PowerUpKind::Shield, Vec2::new(150.0, 150.0), 0.0, 6.0);
        let p = world.power_ups.iter_mut().find(|p| p.body.id == id).unwrap();
        assert_eq!(p.fade(), 1.0);
        p.advance(5.75);
        assert!((p.fade() - 0.5).abs() < 1e-4);
        assert!(!p.expired());
        p.advance(0.25);
        assert!(p.expired());
    }

    #[test]
    fn test_shield_transitions() {
        let mut shield = ShieldState::default();
        assert!(!shield.absorb());
        assert!(shield.activate());
        assert!(!shield.activate());
        shield.advance(0.5);
        assert_eq!(shield.phase, 0.5);
        assert!(shield.absorb());
        assert!(!shield.active);
    }
}
