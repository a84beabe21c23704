//! Game balance parameters
//!
//! Defaults come from [`crate::consts`]; any subset may be overridden from JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance values read by the session and its spawners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Playfield size in world units
    pub world_size: Vec2,

    // === Balloon ===
    pub player_radius: f32,
    pub impulse_speed: f32,
    pub touch_slop: f32,
    pub player_damping: f32,
    pub boundary_restitution: f32,

    // === Tether ===
    pub tether_links: usize,
    pub tether_link_length: f32,
    pub tether_angle_limit: f32,
    pub tether_damping: f32,

    // === Arrows ===
    pub arrow_interval: f32,
    pub arrow_speed: f32,
    pub arrow_ttl: f32,
    pub arrow_spawn_margin: f32,
    pub warning_blinks: u32,
    pub warning_blink_period: f32,

    // === Power-ups ===
    pub power_up_interval: f32,
    pub power_up_timeout: f32,
    pub power_up_inset: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_size: WORLD_SIZE,

            player_radius: PLAYER_RADIUS,
            impulse_speed: PLAYER_IMPULSE_SPEED,
            touch_slop: TOUCH_SLOP,
            player_damping: PLAYER_LINEAR_DAMPING,
            boundary_restitution: BOUNDARY_RESTITUTION,

            tether_links: TETHER_LINKS,
            tether_link_length: TETHER_LINK_LENGTH,
            tether_angle_limit: TETHER_ANGLE_LIMIT,
            tether_damping: TETHER_DAMPING,

            arrow_interval: ARROW_INTERVAL,
            arrow_speed: ARROW_SPEED,
            arrow_ttl: ARROW_TTL,
            arrow_spawn_margin: ARROW_SPAWN_MARGIN,
            warning_blinks: WARNING_BLINKS,
            warning_blink_period: WARNING_BLINK_PERIOD,

            power_up_interval: POWER_UP_INTERVAL,
            power_up_timeout: POWER_UP_TIMEOUT,
            power_up_inset: POWER_UP_INSET,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Total warning duration before an arrow fires
    pub fn warning_duration(&self) -> f32 {
        self.warning_blinks as f32 * self.warning_blink_period
    }

    /// Clamp values into ranges the simulation can run with
    pub fn sanitized(mut self) -> Self {
        self.world_size = self.world_size.max(Vec2::splat(1.0));
        self.player_radius = self.player_radius.max(1.0);
        self.impulse_speed = self.impulse_speed.max(0.0);
        self.touch_slop = self.touch_slop.max(0.0);
        self.player_damping = self.player_damping.max(0.0);
        self.boundary_restitution = self.boundary_restitution.clamp(0.0, 1.0);
        self.tether_links = self.tether_links.clamp(1, TETHER_MAX_LINKS);
        self.tether_link_length = self.tether_link_length.max(0.1);
        self.tether_angle_limit = self.tether_angle_limit.clamp(0.0, std::f32::consts::PI);
        self.tether_damping = self.tether_damping.max(0.0);
        self.arrow_interval = self.arrow_interval.max(SIM_DT);
        self.arrow_speed = self.arrow_speed.max(0.0);
        self.arrow_ttl = self.arrow_ttl.max(0.0);
        self.warning_blink_period = self.warning_blink_period.max(0.0);
        self.power_up_interval = self.power_up_interval.max(SIM_DT);
        self.power_up_timeout = self.power_up_timeout.max(0.0);
        self.power_up_inset = self.power_up_inset.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let t = Tuning::default();
        assert_eq!(t.world_size, Vec2::new(400.0, 800.0));
        assert_eq!(t.tether_links, 22);
        assert!((t.warning_duration() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "arrow_speed": 300.0 }"#).unwrap();
        assert_eq!(t.arrow_speed, 300.0);
        assert_eq!(t.arrow_ttl, ARROW_TTL);
        assert_eq!(t.power_up_interval, POWER_UP_INTERVAL);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let t = Tuning::from_json(r#"{ "tether_links": 0, "boundary_restitution": 4.0 }"#).unwrap();
        assert_eq!(t.tether_links, 1);
        assert_eq!(t.boundary_restitution, 1.0);
    }

    #[test]
    fn test_link_count_is_capped() {
        let t = Tuning::from_json(r#"{ "tether_links": 4000000000 }"#).unwrap();
        assert_eq!(t.tether_links, TETHER_MAX_LINKS);

        let t = Tuning {
            tether_links: usize::MAX,
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(t.tether_links, TETHER_MAX_LINKS);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }
}
