//! Triangle-list generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::appearance::Color;
use crate::rotate;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(center + Vec2::from_angle(theta1) * radius, color));
        vertices.push(Vertex::at(center + Vec2::from_angle(theta2) * radius, color));
    }

    vertices
}

/// Generate vertices for a band between two radii, sweeping `sweep` radians
/// from `start`
pub fn arc_band(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    start: f32,
    sweep: f32,
    color: Color,
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(1);
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = start + (i as f32 / segments as f32) * sweep;
        let theta2 = start + ((i + 1) as f32 / segments as f32) * sweep;

        let inner1 = center + Vec2::from_angle(theta1) * inner_radius;
        let outer1 = center + Vec2::from_angle(theta1) * outer_radius;
        let inner2 = center + Vec2::from_angle(theta2) * inner_radius;
        let outer2 = center + Vec2::from_angle(theta2) * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::at(inner1, color));
        vertices.push(Vertex::at(outer1, color));
        vertices.push(Vertex::at(inner2, color));

        vertices.push(Vertex::at(inner2, color));
        vertices.push(Vertex::at(outer1, color));
        vertices.push(Vertex::at(outer2, color));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(center: Vec2, inner_radius: f32, outer_radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    arc_band(center, inner_radius, outer_radius, 0.0, 2.0 * PI, color, segments.max(3))
}

/// Thick line through `points`, one quad per segment
pub fn polyline(points: &[Vec2], width: f32, color: Color) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }

    let half = width / 2.0;
    let mut vertices = Vec::with_capacity((points.len() - 1) * 6);

    for pair in points.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        let dir = (p2 - p1).normalize_or_zero();
        if dir == Vec2::ZERO {
            continue;
        }
        let perp = dir.perp() * half;

        let v1a = p1 + perp;
        let v1b = p1 - perp;
        let v2a = p2 + perp;
        let v2b = p2 - perp;

        vertices.push(Vertex::at(v1a, color));
        vertices.push(Vertex::at(v1b, color));
        vertices.push(Vertex::at(v2a, color));

        vertices.push(Vertex::at(v2a, color));
        vertices.push(Vertex::at(v1b, color));
        vertices.push(Vertex::at(v2b, color));
    }

    vertices
}

/// Quad given in local space, placed at `origin` and rotated by `rotation`
pub fn quad(corners: [Vec2; 4], origin: Vec2, rotation: f32, color: Color) -> Vec<Vertex> {
    let [a, b, c, d] = corners.map(|p| origin + rotate(p, rotation));
    vec![
        Vertex::at(a, color),
        Vertex::at(b, color),
        Vertex::at(c, color),
        Vertex::at(a, color),
        Vertex::at(c, color),
        Vertex::at(d, color),
    ]
}

/// Axis-aligned rectangle in local space
pub fn rect(min: Vec2, max: Vec2, origin: Vec2, rotation: f32, color: Color) -> Vec<Vertex> {
    quad(
        [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
        origin,
        rotation,
        color,
    )
}

/// Arrow dimensions
pub const SHAFT_LENGTH: f32 = 36.0;
pub const SHAFT_WIDTH: f32 = 3.0;
pub const HEAD_LENGTH: f32 = 12.0;
pub const HEAD_HALF_WIDTH: f32 = 9.0;
pub const FLETCH_LENGTH: f32 = 10.0;
pub const FLETCH_SPREAD: f32 = 5.0;
pub const FLETCH_WIDTH: f32 = 2.0;

/// Arrow pointing along +x in local space, centered on its midpoint:
/// shaft, triangular head and two fletching strokes at the tail
pub fn arrow(center: Vec2, rotation: f32, shaft: Color, head: Color, fletching: Color) -> Vec<Vertex> {
    let total = SHAFT_LENGTH + HEAD_LENGTH;
    let tail_x = -total / 2.0;
    let base_x = tail_x + SHAFT_LENGTH;
    let tip_x = tail_x + total;
    let place = |p: Vec2| center + rotate(p, rotation);

    let mut vertices = rect(
        Vec2::new(tail_x, -SHAFT_WIDTH / 2.0),
        Vec2::new(base_x, SHAFT_WIDTH / 2.0),
        center,
        rotation,
        shaft,
    );

    vertices.push(Vertex::at(place(Vec2::new(tip_x, 0.0)), head));
    vertices.push(Vertex::at(place(Vec2::new(base_x, HEAD_HALF_WIDTH)), head));
    vertices.push(Vertex::at(place(Vec2::new(base_x, -HEAD_HALF_WIDTH)), head));

    for sign in [-1.0, 1.0] {
        let from = place(Vec2::new(tail_x, 0.0));
        let to = place(Vec2::new(tail_x + FLETCH_LENGTH, sign * FLETCH_SPREAD));
        vertices.extend(polyline(&[from, to], FLETCH_WIDTH, fletching));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertex_count() {
        assert_eq!(circle(Vec2::ZERO, 10.0, Color::WHITE, 16).len(), 48);
        // Degenerate segment counts are bumped up
        assert_eq!(circle(Vec2::ZERO, 10.0, Color::WHITE, 0).len(), 9);
    }

    #[test]
    fn test_ring_stays_between_radii() {
        for v in ring(Vec2::new(5.0, 5.0), 8.0, 10.0, Color::WHITE, 12) {
            let r = (Vec2::from(v.position) - Vec2::new(5.0, 5.0)).length();
            assert!(r > 7.99 && r < 10.01);
        }
    }

    #[test]
    fn test_polyline_skips_zero_length() {
        let pts = [Vec2::ZERO, Vec2::ZERO, Vec2::new(10.0, 0.0)];
        assert_eq!(polyline(&pts, 2.0, Color::WHITE).len(), 6);
        assert!(polyline(&pts[..1], 2.0, Color::WHITE).is_empty());
    }

    #[test]
    fn test_arrow_tip_follows_rotation() {
        let verts = arrow(Vec2::ZERO, PI / 2.0, Color::WHITE, Color::RED, Color::BLACK);
        // Head triangle tip is the seventh vertex
        let tip = Vec2::from(verts[6].position);
        assert!(tip.x.abs() < 1e-4);
        assert!((tip.y - 24.0).abs() < 1e-4);
    }
}
