//! Per-frame drawable snapshot of a session

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_4, FRAC_PI_8, PI, TAU};

use super::path::{PathCommand, flatten, rope_path};
use super::shapes;
use super::vertex::Vertex;
use crate::appearance::Color;
use crate::consts::*;
use crate::sim::GameSession;
use crate::sim::state::{PowerUp, PowerUpKind, RoundStatus};

/// Fixed colors that are not part of the appearance config
pub mod palette {
    use crate::appearance::Color;

    pub const BALLOON_STROKE: Color = Color::WHITE;
    pub const ROPE: Color = Color::WHITE;
    pub const INDICATOR_FILL: Color = Color::RED;
    pub const INDICATOR_STROKE: Color = Color::WHITE;
    pub const SHIELD_RING: Color = Color::SYSTEM_CYAN;
    pub const SHIELD_DASH: Color = Color::WHITE;
    pub const POWER_UP_SHIELD: Color = Color::SYSTEM_BLUE;
    pub const POWER_UP_SLOW_MO: Color = Color::SYSTEM_GREEN;
    pub const SCORE_TEXT: Color = Color::WHITE;
}

pub const BALLOON_STROKE_WIDTH: f32 = 2.0;
pub const ROPE_WIDTH: f32 = 1.5;
pub const INDICATOR_STROKE_WIDTH: f32 = 2.0;
pub const POWER_UP_GLOW_RADIUS: f32 = 20.0;
pub const POWER_UP_CORE_RADIUS: f32 = 12.0;
pub const POWER_UP_ORBIT_SIZE: f32 = 25.0;
pub const SHIELD_DASHES: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleShape {
    pub center: Vec2,
    pub radius: f32,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShieldVisual {
    pub center: Vec2,
    pub ring_radius: f32,
    pub ring_alpha: f32,
    pub dash_radius: f32,
    /// (start angle, sweep) of each dash, already rotated
    pub dashes: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowVisual {
    pub center: Vec2,
    pub rotation: f32,
    pub shaft: Color,
    pub head: Color,
    pub fletching: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpVisual {
    pub center: Vec2,
    pub kind: PowerUpKind,
    pub color: Color,
    pub glow_scale: f32,
    /// Rotation of the two orbiting squares
    pub orbits: [f32; 2],
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameDot {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
}

/// Everything the external renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub world_size: Vec2,
    pub background: Color,
    pub balloon: CircleShape,
    pub shield: Option<ShieldVisual>,
    pub rope: Vec<PathCommand>,
    pub arrows: Vec<ArrowVisual>,
    pub indicators: Vec<CircleShape>,
    pub power_ups: Vec<PowerUpVisual>,
    pub trail: Vec<FrameDot>,
    pub score_text: String,
    pub game_over: bool,
    /// Fraction of a step banked since this state, for hosts that blend
    /// between frames
    pub interpolation: f32,
}

/// Triangle wave on [0, 1] with the given half period
fn triangle(t: f32, half_period: f32) -> f32 {
    if half_period <= 0.0 {
        return 0.0;
    }
    let cycle = t.rem_euclid(2.0 * half_period) / half_period;
    if cycle <= 1.0 { cycle } else { 2.0 - cycle }
}

impl RenderFrame {
    pub fn capture(session: &GameSession) -> Self {
        let world = session.world();
        let look = session.appearance();
        let player = &world.player;

        let balloon = CircleShape {
            center: player.pos,
            radius: player.radius,
            fill: look.body_color,
            stroke: palette::BALLOON_STROKE,
            stroke_width: BALLOON_STROKE_WIDTH,
        };

        let shield = session.shield().active.then(|| {
            let phase = session.shield().phase;
            // Breathes 0.7 -> 0.3 -> 0.7
            let ring_alpha = 0.7 - 0.4 * triangle(phase, SHIELD_BREATHE_HALF_PERIOD);
            let spin = TAU * phase / SHIELD_SPIN_PERIOD;
            let dashes = (0..SHIELD_DASHES)
                .map(|i| (i as f32 * FRAC_PI_4 + spin, FRAC_PI_8))
                .collect();
            ShieldVisual {
                center: player.pos,
                ring_radius: player.radius + SHIELD_RING_OFFSET,
                ring_alpha,
                dash_radius: player.radius + SHIELD_DASH_OFFSET,
                dashes,
            }
        });

        let arrows = world
            .projectiles
            .iter()
            .map(|p| ArrowVisual {
                center: p.body.pos,
                rotation: p.heading,
                shaft: look.projectile_shaft_color,
                head: look.projectile_head_color,
                fletching: look.projectile_accent_color,
            })
            .collect();

        let blink_period = session.tuning().warning_blink_period;
        let indicators = session
            .warnings()
            .iter()
            .map(|w| {
                let alpha = w.alpha(blink_period);
                CircleShape {
                    center: w.indicator,
                    radius: INDICATOR_RADIUS,
                    fill: palette::INDICATOR_FILL.faded(alpha),
                    stroke: palette::INDICATOR_STROKE.faded(alpha),
                    stroke_width: INDICATOR_STROKE_WIDTH,
                }
            })
            .collect();

        let power_ups = world.power_ups.iter().map(power_up_visual).collect();

        let trail = session
            .trail()
            .dots()
            .iter()
            .map(|d| FrameDot {
                center: d.pos,
                radius: TRAIL_DOT_RADIUS,
                color: look.body_color.with_alpha(TRAIL_DOT_ALPHA * d.opacity()),
            })
            .collect();

        Self {
            world_size: world.size,
            background: look.background_color,
            balloon,
            shield,
            rope: rope_path(&world.tether.points()),
            arrows,
            indicators,
            power_ups,
            trail,
            score_text: format!("Score: {}", session.score()),
            game_over: session.status() == RoundStatus::Over,
            interpolation: session.interpolation_alpha(),
        }
    }

    /// Tessellate the frame back to front. The background is left to the
    /// renderer's clear color.
    pub fn vertices(&self) -> Vec<Vertex> {
        let mut out = Vec::new();

        for dot in &self.trail {
            out.extend(shapes::circle(dot.center, dot.radius, dot.color, 12));
        }

        out.extend(shapes::polyline(&flatten(&self.rope, 4), ROPE_WIDTH, palette::ROPE));

        push_stroked_circle(&mut out, &self.balloon, 32);

        if let Some(shield) = &self.shield {
            out.extend(shapes::ring(
                shield.center,
                shield.ring_radius - 1.0,
                shield.ring_radius + 1.0,
                palette::SHIELD_RING.with_alpha(shield.ring_alpha),
                48,
            ));
            for &(start, sweep) in &shield.dashes {
                out.extend(shapes::arc_band(
                    shield.center,
                    shield.dash_radius - 0.5,
                    shield.dash_radius + 0.5,
                    start,
                    sweep,
                    palette::SHIELD_DASH.with_alpha(shield.ring_alpha),
                    4,
                ));
            }
        }

        for p in &self.power_ups {
            let glow = p.color.with_alpha(0.3 * p.alpha);
            out.extend(shapes::circle(p.center, POWER_UP_GLOW_RADIUS * p.glow_scale, glow, 24));
            out.extend(shapes::circle(p.center, POWER_UP_CORE_RADIUS, p.color.faded(p.alpha), 20));
            let half = POWER_UP_ORBIT_SIZE / 2.0;
            for rotation in p.orbits {
                let corners = [
                    Vec2::new(-half, -half),
                    Vec2::new(half, -half),
                    Vec2::new(half, half),
                    Vec2::new(-half, half),
                    Vec2::new(-half, -half),
                ]
                .map(|c| p.center + crate::rotate(c, rotation));
                out.extend(shapes::polyline(&corners, 1.0, Color::WHITE.with_alpha(0.6 * p.alpha)));
            }
        }

        for a in &self.arrows {
            out.extend(shapes::arrow(a.center, a.rotation, a.shaft, a.head, a.fletching));
        }

        for indicator in &self.indicators {
            push_stroked_circle(&mut out, indicator, 20);
        }

        out
    }
}

fn power_up_visual(p: &PowerUp) -> PowerUpVisual {
    let color = match p.kind {
        PowerUpKind::Shield => palette::POWER_UP_SHIELD,
        PowerUpKind::SlowMo => palette::POWER_UP_SLOW_MO,
    };
    // Half a turn every two seconds, in opposite directions
    let spin = PI * p.age / 2.0;
    PowerUpVisual {
        center: p.body.pos,
        kind: p.kind,
        color,
        glow_scale: 1.0 + 0.5 * triangle(p.age, 0.8),
        orbits: [spin, FRAC_PI_4 - spin],
        alpha: p.fade(),
    }
}

fn push_stroked_circle(out: &mut Vec<Vertex>, c: &CircleShape, segments: u32) {
    out.extend(shapes::circle(c.center, c.radius, c.fill, segments));
    out.extend(shapes::ring(
        c.center,
        c.radius - c.stroke_width / 2.0,
        c.radius + c.stroke_width / 2.0,
        c.stroke,
        segments,
    ));
}
