//! Smooth rope curve through the tether points
//!
//! Each link center acts as the control point of a quadratic curve ending at
//! the midpoint to the next link, which rounds the corners between links.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Vector path command, in the order a canvas-style API expects them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(Vec2),
    QuadTo { control: Vec2, to: Vec2 },
    LineTo(Vec2),
}

/// Build the rope path. `points[0]` is the attach point, the rest are link
/// centers in chain order.
pub fn rope_path(points: &[Vec2]) -> Vec<PathCommand> {
    let Some((&start, _)) = points.split_first() else {
        return Vec::new();
    };

    let mut path = Vec::with_capacity(points.len() + 1);
    path.push(PathCommand::MoveTo(start));
    for pair in points.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        path.push(PathCommand::QuadTo {
            control: prev,
            to: (prev + curr) / 2.0,
        });
    }
    if let Some(&last) = points.last() {
        path.push(PathCommand::LineTo(last));
    }
    path
}

/// Sample a path into a polyline, `segments` points per curve
pub fn flatten(path: &[PathCommand], segments: u32) -> Vec<Vec2> {
    let segments = segments.max(1);
    let mut points = Vec::new();
    let mut cursor = Vec2::ZERO;

    for command in path {
        match *command {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => {
                points.push(p);
                cursor = p;
            }
            PathCommand::QuadTo { control, to } => {
                for s in 1..=segments {
                    let t = s as f32 / segments as f32;
                    let u = 1.0 - t;
                    points.push(cursor * (u * u) + control * (2.0 * u * t) + to * (t * t));
                }
                cursor = to;
            }
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_single_point() {
        assert!(rope_path(&[]).is_empty());
        let one = rope_path(&[Vec2::ONE]);
        assert_eq!(one, vec![PathCommand::MoveTo(Vec2::ONE), PathCommand::LineTo(Vec2::ONE)]);
    }

    #[test]
    fn test_path_shape() {
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(0.0, -6.0), Vec2::new(0.0, -12.0)];
        let path = rope_path(&pts);
        assert_eq!(path.len(), 4);
        assert_eq!(path[0], PathCommand::MoveTo(pts[0]));
        assert_eq!(
            path[2],
            PathCommand::QuadTo {
                control: pts[1],
                to: Vec2::new(0.0, -9.0)
            }
        );
        assert_eq!(path[3], PathCommand::LineTo(pts[2]));
    }

    #[test]
    fn test_flatten_straight_rope_stays_straight() {
        let pts: Vec<Vec2> = (0..5).map(|i| Vec2::new(10.0, -(i as f32) * 6.0)).collect();
        let line = flatten(&rope_path(&pts), 4);
        assert_eq!(line.len(), 1 + 4 * 4 + 1);
        assert!(line.iter().all(|p| (p.x - 10.0).abs() < 1e-4));
        assert_eq!(*line.last().unwrap(), pts[4]);
    }
}
