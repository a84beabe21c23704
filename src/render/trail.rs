//! Fading marker trail behind the balloon

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{TRAIL_FADE, TRAIL_INTERVAL};

/// A single marker left behind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailDot {
    pub pos: Vec2,
    /// Seconds since it was dropped
    pub age: f32,
}

impl TrailDot {
    /// 1.0 when fresh, 0.0 when fully faded
    pub fn opacity(&self) -> f32 {
        (1.0 - self.age / TRAIL_FADE).clamp(0.0, 1.0)
    }
}

/// Emits a marker at most every `TRAIL_INTERVAL` while enabled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trail {
    dots: Vec<TrailDot>,
    since_emit: f32,
}

impl Default for Trail {
    fn default() -> Self {
        Self {
            dots: Vec::new(),
            // First step drops a marker straight away
            since_emit: TRAIL_INTERVAL,
        }
    }
}

impl Trail {
    pub fn dots(&self) -> &[TrailDot] {
        &self.dots
    }

    pub fn advance(&mut self, dt: f32, at: Vec2, enabled: bool) {
        for dot in &mut self.dots {
            dot.age += dt;
        }
        self.dots.retain(|d| d.age < TRAIL_FADE);

        if !enabled {
            return;
        }

        self.since_emit += dt;
        if self.since_emit >= TRAIL_INTERVAL {
            self.since_emit = 0.0;
            self.dots.push(TrailDot { pos: at, age: 0.0 });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_trail_stays_empty() {
        let mut trail = Trail::default();
        for _ in 0..30 {
            trail.advance(0.02, Vec2::ZERO, false);
        }
        assert!(trail.dots().is_empty());
    }

    #[test]
    fn test_emission_interval() {
        let mut trail = Trail::default();
        trail.advance(0.025, Vec2::new(1.0, 0.0), true);
        assert_eq!(trail.dots().len(), 1);
        trail.advance(0.025, Vec2::new(2.0, 0.0), true);
        trail.advance(0.025, Vec2::new(3.0, 0.0), true);
        assert_eq!(trail.dots().len(), 1);
        trail.advance(0.025, Vec2::new(4.0, 0.0), true);
        assert_eq!(trail.dots().len(), 2);
        assert_eq!(trail.dots()[1].pos, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_dots_fade_out() {
        let mut trail = Trail::default();
        trail.advance(0.01, Vec2::ZERO, true);
        assert_eq!(trail.dots()[0].opacity(), 1.0);
        trail.advance(0.25, Vec2::ZERO, false);
        assert!((trail.dots()[0].opacity() - 0.5).abs() < 1e-4);
        trail.advance(0.25, Vec2::ZERO, false);
        assert!(trail.dots().is_empty());
    }
}
