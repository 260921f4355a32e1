//! Tool system for the drawing surface.

use crate::color::SerializableColor;
use crate::shapes::ShapeKind;
use crate::stroke::ActiveStroke;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Thinnest brush width offered.
pub const MIN_WIDTH: f64 = 1.0;
/// Widest brush width offered.
pub const MAX_WIDTH: f64 = 20.0;
/// Brush width for a fresh session.
pub const DEFAULT_WIDTH: f64 = 3.0;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Brush,
    Pan,
}

/// What a pointer press does, derived from the tool and shape selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Brush,
    Pan,
    Shape(ShapeKind),
}

/// State of a pointer interaction.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    /// Tool is idle, waiting for interaction.
    #[default]
    Idle,
    /// Dragging the view. `anchor` is the pointer position minus the pan
    /// offset at press time, in screen pixels.
    Panning { anchor: Vec2 },
    /// Dragging out a shape, in canvas space.
    Shaping { start: Point, end: Point },
    /// Drawing a freehand stroke.
    Drawing(ActiveStroke),
}

/// Manages the current tool, its settings and the interaction in progress.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Shape primitive armed for the next drag, if any.
    shape: Option<ShapeKind>,
    /// Current state of the tool.
    pub state: ToolState,
    color: SerializableColor,
    width: f64,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self {
            current_tool: ToolKind::default(),
            shape: None,
            state: ToolState::default(),
            color: SerializableColor::default(),
            width: DEFAULT_WIDTH,
        }
    }
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool. Disarms any shape and cancels the interaction.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.shape = None;
        self.state = ToolState::Idle;
    }

    /// Arm a shape primitive. Arming a shape switches back to the brush tool.
    pub fn set_shape(&mut self, shape: Option<ShapeKind>) {
        if shape.is_some() {
            self.current_tool = ToolKind::Brush;
        }
        self.shape = shape;
        self.state = ToolState::Idle;
    }

    pub fn shape(&self) -> Option<ShapeKind> {
        self.shape
    }

    /// Dispatch mode for pointer events.
    pub fn mode(&self) -> Mode {
        match (self.current_tool, self.shape) {
            (ToolKind::Pan, _) => Mode::Pan,
            (ToolKind::Brush, Some(kind)) => Mode::Shape(kind),
            (ToolKind::Brush, None) => Mode::Brush,
        }
    }

    pub fn color(&self) -> SerializableColor {
        self.color
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.color = color;
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Set the brush width, clamped to `[MIN_WIDTH, MAX_WIDTH]`.
    pub fn set_width(&mut self, width: f64) {
        if width.is_finite() {
            self.width = width.clamp(MIN_WIDTH, MAX_WIDTH);
        }
    }

    /// Whether a pointer interaction is underway.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, ToolState::Idle)
    }

    /// Freehand stroke being drawn, if any.
    pub fn active_stroke(&self) -> Option<&ActiveStroke> {
        match &self.state {
            ToolState::Drawing(stroke) => Some(stroke),
            _ => None,
        }
    }

    /// Shape being dragged out: kind and both anchors.
    pub fn shape_preview(&self) -> Option<(ShapeKind, Point, Point)> {
        match (&self.state, self.shape) {
            (ToolState::Shaping { start, end }, Some(kind)) => Some((kind, *start, *end)),
            _ => None,
        }
    }

    /// End the interaction, returning the state it was in.
    pub fn take_state(&mut self) -> ToolState {
        std::mem::take(&mut self.state)
    }
}
