//! Geometric shapes defined by two anchor points.

use crate::color::SerializableColor;
use crate::layers::LayerId;
use crate::stroke::timestamp_millis;
use kurbo::{BezPath, Circle, Point, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use uuid::Uuid;

/// Unique identifier for a committed shape.
pub type ShapeId = Uuid;

/// Tolerance used when flattening circles into Béziers.
const PATH_TOLERANCE: f64 = 0.1;

/// Available shape primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Circle,
    Square,
    Rectangle,
    Triangle,
}

impl ShapeKind {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Circle => "Circle",
            ShapeKind::Square => "Square",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Triangle => "Triangle",
        }
    }

    /// Build the outline for this kind from an anchor and a live/final point.
    pub fn outline(self, start: Point, end: Point) -> BezPath {
        match self {
            ShapeKind::Circle => circle(start, end).to_path(PATH_TOLERANCE),
            ShapeKind::Rectangle => rectangle_path(start, end.x - start.x, end.y - start.y),
            ShapeKind::Square => {
                let side = square_side(start, end);
                rectangle_path(start, side, side)
            }
            ShapeKind::Triangle => {
                let [a, b, c] = triangle_vertices(start, end);
                let mut path = BezPath::new();
                path.move_to(a);
                path.line_to(b);
                path.line_to(c);
                path.close_path();
                path
            }
        }
    }
}

/// Circle centered on `start` passing through `end`.
pub fn circle(start: Point, end: Point) -> Circle {
    Circle::new(start, (end - start).hypot())
}

/// Side of the square spanned by the anchors: the larger absolute extent.
///
/// The square always grows in +x/+y from `start`, whatever the drag direction.
pub fn square_side(start: Point, end: Point) -> f64 {
    let delta = end - start;
    delta.x.abs().max(delta.y.abs())
}

/// Vertices of the triangle spanned by the anchors.
///
/// The apex sits `r = |end - start|` above `start`; the other two vertices
/// are at 210° and 330° around `start` at the same radius.
pub fn triangle_vertices(start: Point, end: Point) -> [Point; 3] {
    let radius = (end - start).hypot();
    let at = |angle: f64| {
        Point::new(
            start.x + radius * angle.cos(),
            start.y + radius * angle.sin(),
        )
    };
    [
        Point::new(start.x, start.y - radius),
        at(7.0 * PI / 6.0),
        at(11.0 * PI / 6.0),
    ]
}

/// Closed box path from `origin` with signed width/height.
fn rectangle_path(origin: Point, width: f64, height: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(origin);
    path.line_to((origin.x + width, origin.y));
    path.line_to((origin.x + width, origin.y + height));
    path.line_to((origin.x, origin.y + height));
    path.close_path();
    path
}

/// A committed shape. Fully determined by its two anchors; immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub(crate) id: ShapeId,
    pub(crate) kind: ShapeKind,
    pub(crate) start: Point,
    pub(crate) end: Point,
    pub(crate) color: SerializableColor,
    pub(crate) width: f64,
    pub(crate) timestamp: u64,
    pub(crate) layer_id: LayerId,
}

impl Shape {
    /// Create a shape from its anchors, stamped with the current time.
    pub fn new(
        kind: ShapeKind,
        start: Point,
        end: Point,
        color: SerializableColor,
        width: f64,
        layer_id: LayerId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            start,
            end,
            color,
            width,
            timestamp: timestamp_millis(),
            layer_id,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn color(&self) -> SerializableColor {
        self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn layer_id(&self) -> LayerId {
        self.layer_id
    }

    /// Outline for rendering.
    pub fn to_path(&self) -> BezPath {
        self.kind.outline(self.start, self.end)
    }
}
