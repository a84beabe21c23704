//! Fixed timestep driver
//!
//! Accumulates real frame time and hands out whole simulation steps.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_STEP_DT, MAX_SUBSTEPS, SIM_DT};

/// Frame-time accumulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepClock {
    accumulator: f32,
    step: f32,
    max_substeps: u32,
}

impl Default for StepClock {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl StepClock {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            step: step.max(f32::EPSILON),
            max_substeps,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed one frame's elapsed time and return how many fixed steps to run.
    /// Long frames are clamped so a stall cannot trigger a spiral of death.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_STEP_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        substeps
    }

    /// Fraction of a step left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = StepClock::new(0.01, 8);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 1);
        assert!(clock.alpha() > 0.1 && clock.alpha() < 0.3);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut clock = StepClock::new(1.0 / 64.0, 4);
        // 5 s stall counts as MAX_STEP_DT and is capped at max_substeps
        assert_eq!(clock.advance(5.0), 4);
        // Remainder drains on the next frame
        assert_eq!(clock.advance(0.0), 2);
    }

    #[test]
    fn test_non_finite_frame_is_ignored() {
        let mut clock = StepClock::default();
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.advance(-1.0), 0);
    }
}
