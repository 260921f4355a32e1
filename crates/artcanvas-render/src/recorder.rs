//! Display-list renderer.
//!
//! Records the drawing calls of a frame instead of rasterizing them. Handy for
//! inspecting what a frame will contain without a GPU or pixel buffer.

use crate::renderer::{Painter, RenderContext, Renderer, paint_frame, paint_segment};
use artcanvas_core::stroke::Segment;
use kurbo::{Affine, BezPath};
use peniko::Color;

/// One recorded drawing call.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Clear(Color),
    Stroke {
        path: BezPath,
        transform: Affine,
        color: Color,
        width: f64,
    },
}

/// Renderer that records draw commands.
#[derive(Debug, Default)]
pub struct SceneRecorder {
    commands: Vec<DrawCommand>,
}

impl SceneRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since the last full frame.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of stroke commands recorded.
    pub fn stroke_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Stroke { .. }))
            .count()
    }
}

impl Painter for SceneRecorder {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn stroke_path(&mut self, path: &BezPath, transform: Affine, color: Color, width: f64) {
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            transform,
            color,
            width,
        });
    }
}

impl Renderer for SceneRecorder {
    fn build_scene(&mut self, ctx: &RenderContext<'_>) {
        self.commands.clear();
        paint_frame(ctx, self);
    }

    fn paint_segment(&mut self, ctx: &RenderContext<'_>, segment: &Segment) {
        paint_segment(ctx, segment, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artcanvas_core::canvas::Canvas;
    use artcanvas_core::color::SerializableColor;
    use artcanvas_core::input::PointerEvent;
    use artcanvas_core::shapes::ShapeKind;
    use kurbo::{Point, Shape as KurboShape};

    const RED: SerializableColor = SerializableColor::new(255, 0, 0, 255);
    const GREEN: SerializableColor = SerializableColor::new(0, 255, 0, 255);

    fn drag(canvas: &mut Canvas, from: (f64, f64), to: (f64, f64)) {
        canvas.handle_pointer(PointerEvent::Down {
            position: Point::new(from.0, from.1),
        });
        canvas.handle_pointer(PointerEvent::Move {
            position: Point::new(to.0, to.1),
        });
        canvas.handle_pointer(PointerEvent::Up {
            position: Point::new(to.0, to.1),
        });
    }

    fn record(canvas: &Canvas) -> SceneRecorder {
        let mut recorder = SceneRecorder::new();
        recorder.build_scene(&RenderContext::new(canvas));
        recorder
    }

    /// Stroke colors as RGBA8 tuples, in paint order.
    fn stroke_colors(recorder: &SceneRecorder) -> Vec<(u8, u8, u8, u8)> {
        recorder
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Stroke { color, .. } => {
                    let rgba = color.to_rgba8();
                    Some((rgba.r, rgba.g, rgba.b, rgba.a))
                }
                DrawCommand::Clear(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_canvas_is_background_only() {
        let canvas = Canvas::new();
        let recorder = record(&canvas);
        assert_eq!(recorder.commands().len(), 1);
        match &recorder.commands()[0] {
            DrawCommand::Clear(color) => assert_eq!(color.to_rgba8().a, 255),
            other => panic!("expected clear, got {other:?}"),
        }
    }

    #[test]
    fn test_strokes_grouped_by_layer_position() {
        let mut canvas = Canvas::new();
        let first = canvas.layers().active_id();
        canvas.add_layer();

        canvas.set_color(RED);
        drag(&mut canvas, (0.0, 0.0), (10.0, 10.0));
        canvas.set_active_layer(first);
        canvas.set_color(GREEN);
        drag(&mut canvas, (0.0, 0.0), (10.0, 10.0));

        // Committed red (layer 2) before green (layer 1), painted the other way round.
        let colors = stroke_colors(&record(&canvas));
        assert_eq!(colors, vec![(0, 255, 0, 255), (255, 0, 0, 255)]);
    }

    #[test]
    fn test_layer_visibility_and_opacity() {
        let mut canvas = Canvas::new();
        let first = canvas.layers().active_id();
        canvas.set_color(RED);
        drag(&mut canvas, (0.0, 0.0), (10.0, 10.0));
        let second = canvas.add_layer();
        canvas.set_color(GREEN);
        drag(&mut canvas, (0.0, 0.0), (10.0, 10.0));

        canvas.set_layer_opacity(first, 0.5);
        canvas.toggle_layer_visibility(second);
        let colors = stroke_colors(&record(&canvas));
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].0, 255);
        assert!((i32::from(colors[0].3) - 128).abs() <= 1);
    }

    #[test]
    fn test_strokes_on_deleted_layer_are_dropped() {
        let mut canvas = Canvas::new();
        drag(&mut canvas, (0.0, 0.0), (10.0, 10.0));
        let second = canvas.add_layer();
        drag(&mut canvas, (0.0, 0.0), (10.0, 10.0));
        canvas.delete_layer(second);

        assert_eq!(canvas.history().strokes().len(), 2);
        assert_eq!(record(&canvas).stroke_count(), 1);
    }

    #[test]
    fn test_shapes_follow_strokes_and_preview_is_last() {
        let mut canvas = Canvas::new();
        canvas.select_shape(Some(ShapeKind::Square));
        canvas.set_color(GREEN);
        drag(&mut canvas, (0.0, 0.0), (20.0, 20.0));
        canvas.select_shape(None);
        canvas.set_color(RED);
        drag(&mut canvas, (5.0, 5.0), (15.0, 15.0));

        canvas.select_shape(Some(ShapeKind::Circle));
        canvas.handle_pointer(PointerEvent::Down {
            position: Point::new(50.0, 50.0),
        });
        canvas.handle_pointer(PointerEvent::Move {
            position: Point::new(60.0, 50.0),
        });

        let colors = stroke_colors(&record(&canvas));
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[0], (255, 0, 0, 255), "stroke first");
        assert_eq!(colors[1], (0, 255, 0, 255), "committed shape second");
        assert_eq!((colors[2].0, colors[2].1), (255, 0));
        assert!((i32::from(colors[2].3) - 128).abs() <= 1, "preview at half alpha");
    }

    #[test]
    fn test_stroke_in_progress_is_painted() {
        let mut canvas = Canvas::new();
        canvas.handle_pointer(PointerEvent::Down {
            position: Point::new(0.0, 0.0),
        });
        canvas.handle_pointer(PointerEvent::Move {
            position: Point::new(8.0, 8.0),
        });
        assert_eq!(record(&canvas).stroke_count(), 1);
    }

    #[test]
    fn test_scrub_paints_prefix() {
        let mut canvas = Canvas::new();
        for i in 0..3 {
            let y = i as f64 * 10.0;
            drag(&mut canvas, (0.0, y), (10.0, y));
        }
        canvas.scrub_to(1);
        assert_eq!(record(&canvas).stroke_count(), 2);
        canvas.exit_scrub();
        assert_eq!(record(&canvas).stroke_count(), 3);
    }

    #[test]
    fn test_scrub_keeps_every_shape() {
        let mut canvas = Canvas::new();
        for i in 0..3 {
            let y = i as f64 * 10.0;
            drag(&mut canvas, (0.0, y), (10.0, y));
        }
        canvas.select_shape(Some(ShapeKind::Circle));
        canvas.set_color(GREEN);
        drag(&mut canvas, (50.0, 50.0), (60.0, 50.0));
        drag(&mut canvas, (80.0, 80.0), (85.0, 80.0));

        canvas.scrub_to(0);
        let colors = stroke_colors(&record(&canvas));
        assert_eq!(colors.len(), 3, "one stroke plus both shapes");
        assert_eq!(&colors[1..], &[(0, 255, 0, 255), (0, 255, 0, 255)]);
    }

    #[test]
    fn test_transform_includes_scale_factor() {
        let mut canvas = Canvas::new();
        canvas.resize(400.0, 300.0, 2.0);
        canvas.set_zoom(1.5);
        drag(&mut canvas, (0.0, 0.0), (10.0, 10.0));

        let recorder = record(&canvas);
        let transform = recorder
            .commands()
            .iter()
            .find_map(|command| match command {
                DrawCommand::Stroke { transform, .. } => Some(*transform),
                DrawCommand::Clear(_) => None,
            })
            .unwrap();
        let mapped = transform * Point::new(10.0, 10.0);
        assert!((mapped.x - 30.0).abs() < 1e-9);
        assert!((mapped.y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_paint_segment_does_not_clear() {
        let mut canvas = Canvas::new();
        let mut recorder = record(&canvas);
        canvas.handle_pointer(PointerEvent::Down {
            position: Point::new(0.0, 0.0),
        });
        let segment = canvas
            .handle_pointer(PointerEvent::Move {
                position: Point::new(4.0, 3.0),
            })
            .unwrap();
        recorder.paint_segment(&RenderContext::new(&canvas), &segment);

        assert_eq!(recorder.commands().len(), 2);
        match &recorder.commands()[1] {
            DrawCommand::Stroke { path, width, .. } => {
                assert!((path.perimeter(0.1) - 5.0).abs() < 1e-9);
                assert!((*width - 3.0).abs() < f64::EPSILON);
            }
            other => panic!("expected stroke, got {other:?}"),
        }
    }
}
