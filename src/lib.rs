//! Balloon Dodge - simulation core
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (tether physics, spawners, contacts, scoring)
//! - `render`: One-way projection of simulation state into drawable primitives
//! - `appearance`: Cosmetic configuration supplied by the presentation layer
//! - `tuning`: Data-driven game balance

pub mod appearance;
pub mod render;
pub mod sim;
pub mod tuning;

pub use appearance::{AppearanceConfig, Color};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest delta a single step will accept
    pub const MAX_STEP_DT: f32 = 0.1;

    /// World dimensions (origin bottom-left, +Y up)
    pub const WORLD_SIZE: Vec2 = Vec2::new(400.0, 800.0);

    /// Balloon defaults
    pub const PLAYER_RADIUS: f32 = 30.0;
    pub const PLAYER_IMPULSE_SPEED: f32 = 450.0;
    /// Extra touchable distance beyond the balloon's radius
    pub const TOUCH_SLOP: f32 = 30.0;
    /// Linear damping applied to the balloon (per second)
    pub const PLAYER_LINEAR_DAMPING: f32 = 0.1;
    /// Bounce factor off the world edge
    pub const BOUNDARY_RESTITUTION: f32 = 0.2;

    /// Tether defaults
    pub const TETHER_LINKS: usize = 22;
    pub const TETHER_LINK_LENGTH: f32 = 6.0;
    /// Symmetric swing limit per pin (±60°)
    pub const TETHER_ANGLE_LIMIT: f32 = std::f32::consts::FRAC_PI_3;
    pub const TETHER_DAMPING: f32 = 0.8;
    pub const TETHER_LINK_RADIUS: f32 = 1.0;
    /// Share of each step's solved motion a link keeps as velocity
    pub const TETHER_VELOCITY_RETENTION: f32 = 0.5;
    /// Upper bound on configurable link count
    pub const TETHER_MAX_LINKS: usize = 256;

    /// Arrow defaults
    pub const ARROW_INTERVAL: f32 = 1.5;
    pub const ARROW_SPEED: f32 = 250.0;
    pub const ARROW_TTL: f32 = 5.0;
    /// Distance outside the visible edge where arrows spawn
    pub const ARROW_SPAWN_MARGIN: f32 = 40.0;
    pub const ARROW_LENGTH: f32 = 48.0;
    pub const ARROW_WIDTH: f32 = 9.0;

    /// Warning indicator
    pub const WARNING_BLINKS: u32 = 3;
    /// One fade-down plus fade-up
    pub const WARNING_BLINK_PERIOD: f32 = 0.2;
    pub const WARNING_MIN_ALPHA: f32 = 0.2;
    pub const INDICATOR_RADIUS: f32 = 12.0;
    pub const INDICATOR_INSET: f32 = 15.0;

    /// Power-up defaults
    pub const POWER_UP_INTERVAL: f32 = 10.0;
    pub const POWER_UP_TIMEOUT: f32 = 6.0;
    pub const POWER_UP_FADE: f32 = 0.5;
    pub const POWER_UP_RADIUS: f32 = 18.0;
    /// Keep pickups this far from every edge
    pub const POWER_UP_INSET: f32 = 100.0;
    pub const POWER_UP_BOB_HEIGHT: f32 = 15.0;
    pub const POWER_UP_BOB_HALF_PERIOD: f32 = 1.5;

    /// Shield visuals
    pub const SHIELD_RING_OFFSET: f32 = 12.0;
    pub const SHIELD_DASH_OFFSET: f32 = 8.0;
    pub const SHIELD_BREATHE_HALF_PERIOD: f32 = 1.0;
    pub const SHIELD_SPIN_PERIOD: f32 = 4.0;

    /// Trail
    pub const TRAIL_INTERVAL: f32 = 0.06;
    pub const TRAIL_FADE: f32 = 0.5;
    pub const TRAIL_DOT_RADIUS: f32 = 4.0;
    pub const TRAIL_DOT_ALPHA: f32 = 0.4;
}

/// Heading of a vector in radians, 0 for the zero vector
#[inline]
pub fn heading_angle(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Unit vector pointing along `angle`
#[inline]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Rotate `v` by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Smooth ease-in-ease-out curve on [0, 1]
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_heading_of_zero_is_zero() {
        assert_eq!(heading_angle(Vec2::ZERO), 0.0);
    }

    #[test]
    fn test_direction_roundtrip() {
        let d = direction_from_angle(FRAC_PI_2);
        assert!(d.x.abs() < 1e-6);
        assert!((d.y - 1.0).abs() < 1e-6);
        assert!((heading_angle(d) - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let r = rotate(Vec2::X, FRAC_PI_2);
        assert!(r.x.abs() < 1e-6);
        assert!((r.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ease_in_out_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(ease_in_out(2.0), 1.0);
    }
}
