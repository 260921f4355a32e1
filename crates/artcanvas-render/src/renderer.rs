//! Renderer trait abstraction and the backend-agnostic frame algorithm.

use artcanvas_core::canvas::{Canvas, Viewport};
use artcanvas_core::stroke::Segment;
use kurbo::{Affine, BezPath, Cap, Join, Line, Shape as KurboShape, Size, Stroke};
use peniko::Color;
use thiserror::Error;

/// Alpha applied to the live shape preview.
pub const PREVIEW_ALPHA: f64 = 0.5;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid surface size {width}x{height}")]
    InvalidSurface { width: f64, height: f64 },
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Viewport size in logical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a render context sized from the canvas viewport.
    pub fn new(canvas: &'a Canvas) -> Self {
        let Viewport { size, scale_factor } = canvas.viewport();
        Self {
            canvas,
            viewport_size: size,
            scale_factor,
            background_color: Color::WHITE,
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Canvas space to device pixels: DPR scale applied after the camera.
    pub fn view_transform(&self) -> Affine {
        Affine::scale(self.scale_factor) * self.canvas.camera().transform()
    }

    /// Surface size in device pixels.
    pub fn physical_size(&self) -> Size {
        Size::new(
            (self.viewport_size.width * self.scale_factor).round(),
            (self.viewport_size.height * self.scale_factor).round(),
        )
    }
}

/// Round-capped, round-joined brush outline style.
pub fn brush_style(width: f64) -> Stroke {
    Stroke::new(width).with_caps(Cap::Round).with_join(Join::Round)
}

/// Drawing primitives a backend must provide to paint a frame.
pub trait Painter {
    /// Fill the whole surface with an opaque color.
    fn clear(&mut self, color: Color);

    /// Stroke `path` (canvas space) under `transform` with round caps and joins.
    fn stroke_path(&mut self, path: &BezPath, transform: Affine, color: Color, width: f64);
}

/// Paint a full frame.
///
/// Order: background, committed strokes grouped by layer position, committed
/// shapes in commit order, the stroke being drawn, then the shape preview.
pub fn paint_frame(ctx: &RenderContext<'_>, painter: &mut dyn Painter) {
    painter.clear(ctx.background_color);

    let canvas = ctx.canvas;
    let layers = canvas.layers();
    let transform = ctx.view_transform();

    let mut strokes: Vec<_> = canvas
        .history()
        .visible_strokes()
        .filter_map(|stroke| {
            let position = layers.position(stroke.layer_id())?;
            let layer = layers.get(stroke.layer_id())?;
            layer.is_visible().then_some((position, layer.opacity(), stroke))
        })
        .collect();
    // Stable: strokes within a layer keep commit order.
    strokes.sort_by_key(|(position, _, _)| *position);

    for (_, opacity, stroke) in strokes {
        if let Some(path) = stroke.to_path() {
            painter.stroke_path(
                &path,
                transform,
                stroke.color().with_alpha_factor(opacity),
                stroke.width(),
            );
        }
    }

    for shape in canvas.history().shapes() {
        let Some(layer) = layers.get(shape.layer_id()) else {
            continue;
        };
        if !layer.is_visible() {
            continue;
        }
        painter.stroke_path(
            &shape.to_path(),
            transform,
            shape.color().with_alpha_factor(layer.opacity()),
            shape.width(),
        );
    }

    let tools = canvas.tools();
    if let Some(active) = tools.active_stroke() {
        if let Some(path) = active.to_path() {
            painter.stroke_path(&path, transform, active.color().into(), active.width());
        }
    }

    if let Some((kind, start, end)) = tools.shape_preview() {
        painter.stroke_path(
            &kind.outline(start, end),
            transform,
            tools.color().with_alpha_factor(PREVIEW_ALPHA),
            tools.width(),
        );
    }
}

/// Paint one incremental segment on top of whatever the surface holds.
pub fn paint_segment(ctx: &RenderContext<'_>, segment: &Segment, painter: &mut dyn Painter) {
    painter.stroke_path(
        &line_path(segment.line),
        ctx.view_transform(),
        segment.color.into(),
        segment.width,
    );
}

fn line_path(line: Line) -> BezPath {
    line.to_path(0.1)
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, the CPU rasterizer or a plain recorder.
pub trait Renderer {
    /// Build the scene/command buffer for a full frame.
    ///
    /// Called once per fired redraw; replaces whatever was drawn before.
    fn build_scene(&mut self, ctx: &RenderContext<'_>);

    /// Draw one segment of the stroke in progress without clearing.
    fn paint_segment(&mut self, ctx: &RenderContext<'_>, segment: &Segment);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext<'_>) -> Color {
        ctx.background_color
    }
}
