//! Freehand strokes.

use crate::color::SerializableColor;
use crate::layers::LayerId;
use kurbo::{BezPath, Line, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique identifier for a committed stroke.
pub type StrokeId = Uuid;

/// Milliseconds since the Unix epoch, used to timestamp committed actions.
pub(crate) fn timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Build the smoothed outline of a sampled point sequence.
///
/// Two points give a single straight segment. Longer runs go through each
/// interior point as a quadratic control point, ending at the midpoint to the
/// next sample, and finish with a straight segment into the last point.
pub fn smoothed_path(points: &[Point]) -> Option<BezPath> {
    let (first, rest) = points.split_first()?;
    let last = rest.last()?;

    let mut path = BezPath::new();
    path.move_to(*first);
    if rest.len() == 1 {
        path.line_to(*last);
        return Some(path);
    }

    for pair in points[1..].windows(2) {
        let current = pair[0];
        let next = pair[1];
        path.quad_to(current, current.midpoint(next));
    }
    path.line_to(*last);
    Some(path)
}

/// A committed freehand stroke. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub(crate) id: StrokeId,
    pub(crate) points: Vec<Point>,
    pub(crate) color: SerializableColor,
    pub(crate) width: f64,
    pub(crate) timestamp: u64,
    pub(crate) layer_id: LayerId,
}

impl Stroke {
    pub fn id(&self) -> StrokeId {
        self.id
    }

    /// Sampled points in canvas space.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> SerializableColor {
        self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Commit time in milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Layer this stroke is painted on.
    pub fn layer_id(&self) -> LayerId {
        self.layer_id
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smoothed outline for rendering.
    pub fn to_path(&self) -> Option<BezPath> {
        smoothed_path(&self.points)
    }
}

/// One straight piece of an in-progress stroke, painted directly onto the
/// surface while the pointer moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub line: Line,
    pub color: SerializableColor,
    pub width: f64,
}

/// A stroke that is still receiving points.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveStroke {
    points: Vec<Point>,
    color: SerializableColor,
    width: f64,
    layer_id: LayerId,
}

impl ActiveStroke {
    /// Start a stroke at `start`.
    pub fn begin(start: Point, color: SerializableColor, width: f64, layer_id: LayerId) -> Self {
        Self {
            points: vec![start],
            color,
            width,
            layer_id,
        }
    }

    /// Append a sampled point and return the segment joining it to the
    /// previous sample.
    pub fn add_point(&mut self, point: Point) -> Option<Segment> {
        let previous = self.points.last().copied();
        self.points.push(point);
        previous.map(|from| Segment {
            line: Line::new(from, point),
            color: self.color,
            width: self.width,
        })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> SerializableColor {
        self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smoothed outline of the points collected so far.
    pub fn to_path(&self) -> Option<BezPath> {
        smoothed_path(&self.points)
    }

    /// Finish the stroke. Strokes with fewer than two points are discarded.
    pub fn finish(self) -> Option<Stroke> {
        if self.points.len() < 2 {
            return None;
        }
        Some(Stroke {
            id: Uuid::new_v4(),
            points: self.points,
            color: self.color,
            width: self.width,
            timestamp: timestamp_millis(),
            layer_id: self.layer_id,
        })
    }
}

#[cfg(test)]
pub(crate) fn test_stroke(points: &[(f64, f64)], layer_id: LayerId) -> Stroke {
    let mut iter = points.iter().map(|&(x, y)| Point::new(x, y));
    let first = iter.next().unwrap_or(Point::ZERO);
    let mut active = ActiveStroke::begin(first, SerializableColor::black(), 3.0, layer_id);
    for p in iter {
        active.add_point(p);
    }
    active.finish().expect("test strokes need at least two points")
}
