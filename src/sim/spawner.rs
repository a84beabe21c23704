//! Timed emitters for arrows and power-ups
//!
//! Spawners only keep their own timers. Everything they create goes through
//! the session's `World`, using the session's RNG.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, PowerUpKind, World};
use crate::consts::{INDICATOR_INSET, WARNING_MIN_ALPHA};
use crate::tuning::Tuning;

/// Screen edge an arrow enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Bottom, Edge::Top];
}

/// Point `margin` outside `edge`, `along` (0..=1) of the way along it
pub fn edge_spawn_point(edge: Edge, along: f32, size: Vec2, margin: f32) -> Vec2 {
    let along = along.clamp(0.0, 1.0);
    match edge {
        Edge::Left => Vec2::new(-margin, along * size.y),
        Edge::Right => Vec2::new(size.x + margin, along * size.y),
        Edge::Bottom => Vec2::new(along * size.x, -margin),
        Edge::Top => Vec2::new(along * size.x, size.y + margin),
    }
}

/// Pull an off-screen point back inside the visible area
pub fn clamp_indicator(point: Vec2, size: Vec2) -> Vec2 {
    let lo = Vec2::splat(INDICATOR_INSET).min(size / 2.0);
    let hi = (size - Vec2::splat(INDICATOR_INSET)).max(lo);
    point.clamp(lo, hi)
}

/// A blinking cue announcing an arrow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    /// Where the arrow will appear
    pub spawn_point: Vec2,
    /// Where the cue is drawn (on screen)
    pub indicator: Vec2,
    pub elapsed: f32,
}

impl Warning {
    /// Opacity for the current blink: full, down to dim, back to full
    pub fn alpha(&self, blink_period: f32) -> f32 {
        if blink_period <= 0.0 {
            return 1.0;
        }
        let half = blink_period / 2.0;
        let t = self.elapsed.rem_euclid(blink_period);
        if t < half {
            1.0 + (WARNING_MIN_ALPHA - 1.0) * (t / half)
        } else {
            WARNING_MIN_ALPHA + (1.0 - WARNING_MIN_ALPHA) * ((t - half) / half)
        }
    }
}

/// Idle -> Warning -> Active, restarting every `arrow_interval`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreatSpawner {
    since_cycle: f32,
    warnings: Vec<Warning>,
}

impl ThreatSpawner {
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn advance(
        &mut self,
        dt: f32,
        now: f32,
        world: &mut World,
        rng: &mut Pcg32,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        // Finish cues that have blinked out
        let duration = tuning.warning_duration();
        for warning in &mut self.warnings {
            warning.elapsed += dt;
        }
        let (ready, pending): (Vec<Warning>, Vec<Warning>) =
            self.warnings.drain(..).partition(|w| w.elapsed >= duration);
        self.warnings = pending;

        for warning in ready {
            // Aim at where the balloon is right now; never re-aimed
            let target = world.player.pos;
            let id = world.spawn_projectile(
                warning.spawn_point,
                target,
                now,
                tuning.arrow_speed,
                tuning.arrow_ttl,
            );
            log::debug!("Arrow {:?} fired from {:?} at {:?}", id, warning.spawn_point, target);
            events.push(GameEvent::ProjectileFired {
                id,
                from: warning.spawn_point,
            });
        }

        // Start new cycles
        self.since_cycle += dt;
        while self.since_cycle >= tuning.arrow_interval {
            self.since_cycle -= tuning.arrow_interval;

            let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];
            let along: f32 = rng.random_range(0.0..=1.0);
            let spawn_point = edge_spawn_point(edge, along, world.size, tuning.arrow_spawn_margin);
            let indicator = clamp_indicator(spawn_point, world.size);

            events.push(GameEvent::WarningShown {
                spawn_point,
                indicator,
            });
            self.warnings.push(Warning {
                spawn_point,
                indicator,
                // Carry the overshoot so cadence stays exact
                elapsed: self.since_cycle,
            });
        }
    }
}

/// Drops a Shield pickup every `power_up_interval`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUpSpawner {
    since_spawn: f32,
}

impl PowerUpSpawner {
    pub fn advance(
        &mut self,
        dt: f32,
        now: f32,
        world: &mut World,
        rng: &mut Pcg32,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        self.since_spawn += dt;
        while self.since_spawn >= tuning.power_up_interval {
            self.since_spawn -= tuning.power_up_interval;

            let at = random_position(rng, world.size, tuning.power_up_inset);
            let kind = PowerUpKind::Shield;
            let id = world.spawn_power_up(kind, at, now, tuning.power_up_timeout);
            log::debug!("Power-up {:?} spawned at {:?}", id, at);
            events.push(GameEvent::PowerUpSpawned { id, kind });
        }
    }
}

/// Uniform point inside the playfield shrunk by `inset` on every side.
/// An axis too small for the inset collapses to its midpoint.
pub fn random_position(rng: &mut Pcg32, size: Vec2, inset: f32) -> Vec2 {
    let axis = |rng: &mut Pcg32, extent: f32| {
        let lo = inset;
        let hi = extent - inset;
        if hi > lo {
            rng.random_range(lo..=hi)
        } else {
            extent / 2.0
        }
    };
    let x = axis(rng, size.x);
    let y = axis(rng, size.y);
    Vec2::new(x, y)
}
