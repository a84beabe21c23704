//! Cosmetic configuration for a round
//!
//! Chosen by the presentation layer from its catalog and handed to the
//! session before the round starts. Never affects physics.

use serde::{Deserialize, Serialize};

/// Linear RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const BLACK: Color = Color([0.0, 0.0, 0.0, 1.0]);
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);
    pub const RED: Color = Color([1.0, 0.0, 0.0, 1.0]);
    pub const CLEAR: Color = Color([0.0, 0.0, 0.0, 0.0]);
    pub const SYSTEM_RED: Color = Color([1.0, 0.231, 0.188, 1.0]);
    pub const SYSTEM_BLUE: Color = Color([0.0, 0.478, 1.0, 1.0]);
    pub const SYSTEM_GREEN: Color = Color([0.204, 0.78, 0.349, 1.0]);
    pub const SYSTEM_CYAN: Color = Color([0.196, 0.678, 0.902, 1.0]);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color([r, g, b, 1.0])
    }

    /// Same color with alpha replaced
    pub fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, _] = self.0;
        Color([r, g, b, alpha.clamp(0.0, 1.0)])
    }

    /// Same color with alpha scaled by `factor`
    pub fn faded(self, factor: f32) -> Self {
        let a = self.0[3];
        self.with_alpha(a * factor)
    }

    pub fn alpha(self) -> f32 {
        self.0[3]
    }
}

impl From<Color> for [f32; 4] {
    fn from(c: Color) -> Self {
        c.0
    }
}

/// Colors and flags applied to the round's visuals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    pub body_color: Color,
    pub projectile_shaft_color: Color,
    pub projectile_head_color: Color,
    pub projectile_accent_color: Color,
    pub background_color: Color,
    pub trail_enabled: bool,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            body_color: Color::SYSTEM_RED,
            projectile_shaft_color: Color::rgb(0.82, 0.65, 0.40),
            projectile_head_color: Color::rgb(0.75, 0.75, 0.80),
            projectile_accent_color: Color::rgb(0.85, 0.20, 0.20),
            background_color: Color::BLACK,
            trail_enabled: false,
        }
    }
}

impl AppearanceConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stock_look() {
        let config = AppearanceConfig::default();
        assert_eq!(config.background_color, Color::BLACK);
        assert!(!config.trail_enabled);
    }

    #[test]
    fn test_partial_json_overrides() {
        let config =
            AppearanceConfig::from_json(r#"{ "trail_enabled": true, "body_color": [0.0, 0.0, 1.0, 0.5] }"#)
                .unwrap();
        assert!(config.trail_enabled);
        assert_eq!(config.body_color, Color([0.0, 0.0, 1.0, 0.5]));
        assert_eq!(config.background_color, Color::BLACK);
    }

    #[test]
    fn test_with_alpha_clamps() {
        assert_eq!(Color::WHITE.with_alpha(2.0).alpha(), 1.0);
        assert!((Color::WHITE.with_alpha(0.5).faded(0.5).alpha() - 0.25).abs() < 1e-6);
    }
}
