//! Canvas engine state and the operations the UI drives it with.

use crate::camera::Camera;
use crate::color::SerializableColor;
use crate::history::{DEFAULT_HISTORY_CAPACITY, History, HistoryStats};
use crate::input::{KeyEvent, PointerEvent};
use crate::layers::{LayerId, LayerRegistry};
use crate::scheduler::{FrameHandle, RedrawScheduler};
use crate::shapes::{Shape, ShapeKind};
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::stroke::{ActiveStroke, Segment};
use crate::tools::{DEFAULT_WIDTH, Mode, ToolKind, ToolManager, ToolState};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Number of strokes the timeline ring keeps.
    pub history_capacity: usize,
    /// Initial brush color.
    pub color: SerializableColor,
    /// Initial brush width.
    pub width: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            color: SerializableColor::default(),
            width: DEFAULT_WIDTH,
        }
    }
}

/// Size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Size in logical pixels.
    pub size: Size,
    /// Device pixel ratio.
    pub scale_factor: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            size: Size::new(800.0, 600.0),
            scale_factor: 1.0,
        }
    }
}

impl Viewport {
    /// Size in device pixels.
    pub fn physical_size(&self) -> Size {
        Size::new(
            (self.size.width * self.scale_factor).round(),
            (self.size.height * self.scale_factor).round(),
        )
    }

    /// True when there is no device pixel to draw into, e.g. a minimized window.
    pub fn is_empty(&self) -> bool {
        let physical = self.physical_size();
        physical.width < 1.0 || physical.height < 1.0
    }
}

/// Read-only counters for the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanvasStats {
    #[serde(flatten)]
    pub history: HistoryStats,
    pub layer_count: usize,
    pub zoom_percent: u32,
}

/// Runtime canvas state.
///
/// Every mutation goes through a method on this type, so a renderer that
/// borrows the canvas never sees a half-applied update.
#[derive(Debug, Clone)]
pub struct Canvas {
    layers: LayerRegistry,
    history: History,
    camera: Camera,
    tools: ToolManager,
    viewport: Viewport,
    redraw: RedrawScheduler,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a new canvas with default configuration.
    pub fn new() -> Self {
        Self::with_config(&CanvasConfig::default())
    }

    /// Create a canvas from a configuration.
    pub fn with_config(config: &CanvasConfig) -> Self {
        let mut tools = ToolManager::new();
        tools.set_color(config.color);
        tools.set_width(config.width);
        let mut redraw = RedrawScheduler::new();
        redraw.request();
        Self {
            layers: LayerRegistry::new(),
            history: History::new(config.history_capacity),
            camera: Camera::new(),
            tools,
            viewport: Viewport::default(),
            redraw,
        }
    }

    pub fn layers(&self) -> &LayerRegistry {
        &self.layers
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    // --- Redraw scheduling -------------------------------------------------

    /// Ask for a full-frame redraw at the next display refresh.
    pub fn request_redraw(&mut self) -> FrameHandle {
        self.redraw.request()
    }

    /// Frame currently waiting to be painted.
    pub fn pending_redraw(&self) -> Option<FrameHandle> {
        self.redraw.pending()
    }

    /// Fire a scheduled frame. Returns true if the host should paint now.
    pub fn fire_redraw(&mut self, handle: FrameHandle) -> bool {
        self.redraw.fire(handle)
    }

    /// Consume the pending frame. Returns true if the host should paint now.
    pub fn take_redraw(&mut self) -> bool {
        self.redraw.take()
    }

    /// Reconfigure the surface size and force a full redraw.
    pub fn resize(&mut self, width: f64, height: f64, scale_factor: f64) {
        let scale_factor = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            log::warn!("Ignoring invalid scale factor {}", scale_factor);
            self.viewport.scale_factor
        };
        self.viewport = Viewport {
            size: Size::new(width.max(0.0), height.max(0.0)),
            scale_factor,
        };
        self.redraw.request();
    }

    // --- Tools ---------------------------------------------------------------

    /// Switch between brush and pan. Finishes any interaction in progress.
    pub fn select_tool(&mut self, tool: ToolKind) {
        self.end_interaction();
        self.tools.set_tool(tool);
    }

    /// Arm a shape primitive, or disarm with `None`.
    pub fn select_shape(&mut self, shape: Option<ShapeKind>) {
        self.end_interaction();
        self.tools.set_shape(shape);
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.tools.set_color(color);
    }

    pub fn set_width(&mut self, width: f64) {
        self.tools.set_width(width);
    }

    // --- History -------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        let changed = self.history.undo();
        if changed {
            log::debug!("Undo ({} left)", self.history.undo_depth());
            self.redraw.request();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.history.redo();
        if changed {
            log::debug!("Redo ({} left)", self.history.redo_depth());
            self.redraw.request();
        }
        changed
    }

    /// Remove every stroke and shape; the next frame paints background only.
    pub fn clear(&mut self) {
        log::debug!("Clearing canvas");
        self.history.clear();
        self.redraw.request();
    }

    /// Show the timeline ring up to and including `index`.
    pub fn scrub_to(&mut self, index: usize) {
        self.history.scrub_to(index);
        self.redraw.request();
    }

    /// Return to the live stroke list.
    pub fn exit_scrub(&mut self) -> bool {
        let changed = self.history.exit_scrub();
        if changed {
            self.redraw.request();
        }
        changed
    }

    // --- Layers --------------------------------------------------------------

    pub fn add_layer(&mut self) -> LayerId {
        self.layers.add_layer()
    }

    pub fn delete_layer(&mut self, id: LayerId) -> bool {
        self.changed_if(|canvas| canvas.layers.delete_layer(id))
    }

    pub fn toggle_layer_visibility(&mut self, id: LayerId) -> bool {
        self.changed_if(|canvas| canvas.layers.toggle_visibility(id))
    }

    pub fn set_layer_opacity(&mut self, id: LayerId, opacity: f64) -> bool {
        self.changed_if(|canvas| canvas.layers.set_opacity(id, opacity))
    }

    pub fn rename_layer(&mut self, id: LayerId, name: impl Into<String>) -> bool {
        self.layers.rename(id, name)
    }

    pub fn set_active_layer(&mut self, id: LayerId) -> bool {
        self.layers.set_active(id)
    }

    // --- View ----------------------------------------------------------------

    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        self.changed_if(|canvas| canvas.camera.set_zoom(zoom))
    }

    pub fn zoom_in(&mut self) -> bool {
        self.changed_if(|canvas| canvas.camera.zoom_in())
    }

    pub fn zoom_out(&mut self) -> bool {
        self.changed_if(|canvas| canvas.camera.zoom_out())
    }

    /// Reset zoom and pan.
    pub fn reset_view(&mut self) {
        self.camera.reset();
        self.redraw.request();
    }

    // --- Input ---------------------------------------------------------------

    /// Feed a pointer event. Returns the segment to paint incrementally while
    /// a freehand stroke is being drawn.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<Segment> {
        match event {
            PointerEvent::Down { position } => {
                self.begin_interaction(position);
                None
            }
            PointerEvent::Move { position } => self.update_interaction(position),
            PointerEvent::Up { .. } | PointerEvent::Leave => {
                self.end_interaction();
                None
            }
        }
    }

    /// Feed a key press. Returns the shortcut action it triggered.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Option<ShortcutAction> {
        let shortcut = ShortcutRegistry::find(event)?;
        log::debug!("{} ({})", shortcut.description, shortcut.format());
        let action = shortcut.action;
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
        };
        Some(action)
    }

    fn begin_interaction(&mut self, position: Point) {
        if self.tools.is_active() {
            self.end_interaction();
        }
        let state = match self.tools.mode() {
            Mode::Pan => ToolState::Panning {
                anchor: position.to_vec2() - self.camera.offset,
            },
            Mode::Shape(_) => {
                let anchor = self.camera.screen_to_canvas(position);
                ToolState::Shaping {
                    start: anchor,
                    end: anchor,
                }
            }
            Mode::Brush => {
                if self.history.exit_scrub() {
                    self.redraw.request();
                }
                ToolState::Drawing(ActiveStroke::begin(
                    self.camera.screen_to_canvas(position),
                    self.tools.color(),
                    self.tools.width(),
                    self.layers.active_id(),
                ))
            }
        };
        self.tools.state = state;
    }

    fn update_interaction(&mut self, position: Point) -> Option<Segment> {
        let canvas_point = self.camera.screen_to_canvas(position);
        match &mut self.tools.state {
            ToolState::Idle => None,
            ToolState::Panning { anchor } => {
                self.camera.offset = position.to_vec2() - *anchor;
                self.redraw.request();
                None
            }
            ToolState::Shaping { end, .. } => {
                *end = canvas_point;
                self.redraw.request();
                None
            }
            ToolState::Drawing(stroke) => stroke.add_point(canvas_point),
        }
    }

    fn end_interaction(&mut self) {
        match self.tools.take_state() {
            ToolState::Idle | ToolState::Panning { .. } => {}
            ToolState::Shaping { start, end } => {
                if let Some(kind) = self.tools.shape() {
                    self.history.commit_shape(Shape::new(
                        kind,
                        start,
                        end,
                        self.tools.color(),
                        self.tools.width(),
                        self.layers.active_id(),
                    ));
                }
                self.redraw.request();
            }
            ToolState::Drawing(active) => match active.finish() {
                Some(stroke) => {
                    self.history.commit_stroke(stroke);
                    self.redraw.request();
                }
                None => log::debug!("Discarded stroke with fewer than two points"),
            },
        }
    }

    // --- Stats ---------------------------------------------------------------

    pub fn stats(&self) -> CanvasStats {
        CanvasStats {
            history: self.history.stats(),
            layer_count: self.layers.len(),
            zoom_percent: self.camera.zoom_percent(),
        }
    }

    /// Stats as pretty-printed JSON.
    pub fn stats_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.stats())
    }

    fn changed_if(&mut self, op: impl FnOnce(&mut Self) -> bool) -> bool {
        let changed = op(self);
        if changed {
            self.redraw.request();
        }
        changed
    }
}
