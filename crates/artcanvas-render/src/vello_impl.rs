//! Vello-based renderer implementation.

use crate::renderer::{Painter, RenderContext, Renderer, brush_style, paint_frame, paint_segment};
use artcanvas_core::stroke::Segment;
use kurbo::{Affine, BezPath, Rect, Size};
use peniko::{Color, Fill};
use vello::Scene;

/// Vello-based renderer for GPU-accelerated 2D graphics.
///
/// Builds a `vello::Scene`; the host owns the device and surface and submits
/// the scene to a `vello::Renderer`.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Surface size in device pixels for the current frame.
    surface_size: Size,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            surface_size: Size::ZERO,
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Surface size the last frame was built for.
    pub fn surface_size(&self) -> Size {
        self.surface_size
    }
}

struct ScenePainter<'a> {
    scene: &'a mut Scene,
    size: Size,
}

impl Painter for ScenePainter<'_> {
    fn clear(&mut self, color: Color) {
        self.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            color.with_alpha(1.0),
            None,
            &Rect::from_origin_size((0.0, 0.0), self.size),
        );
    }

    fn stroke_path(&mut self, path: &BezPath, transform: Affine, color: Color, width: f64) {
        self.scene
            .stroke(&brush_style(width), transform, color, None, path);
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext<'_>) {
        self.scene.reset();
        self.surface_size = ctx.physical_size();
        paint_frame(
            ctx,
            &mut ScenePainter {
                scene: &mut self.scene,
                size: self.surface_size,
            },
        );
    }

    fn paint_segment(&mut self, ctx: &RenderContext<'_>, segment: &Segment) {
        paint_segment(
            ctx,
            segment,
            &mut ScenePainter {
                scene: &mut self.scene,
                size: self.surface_size,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artcanvas_core::canvas::Canvas;
    use artcanvas_core::input::PointerEvent;
    use kurbo::Point;

    #[test]
    fn test_renderer_creation() {
        let renderer = VelloRenderer::new();
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_empty_scene() {
        let mut renderer = VelloRenderer::new();
        let mut canvas = Canvas::new();
        canvas.resize(800.0, 600.0, 2.0);
        let ctx = RenderContext::new(&canvas);

        renderer.build_scene(&ctx);
        // Background fill at minimum
        assert!(!renderer.scene().encoding().is_empty());
        assert_eq!(renderer.surface_size(), Size::new(1600.0, 1200.0));
    }

    #[test]
    fn test_segment_appends_to_scene() {
        let mut renderer = VelloRenderer::new();
        let mut canvas = Canvas::new();
        renderer.build_scene(&RenderContext::new(&canvas));
        let before = renderer.scene().encoding().n_paths;

        canvas.handle_pointer(PointerEvent::Down {
            position: Point::new(0.0, 0.0),
        });
        let segment = canvas
            .handle_pointer(PointerEvent::Move {
                position: Point::new(20.0, 20.0),
            })
            .unwrap();
        renderer.paint_segment(&RenderContext::new(&canvas), &segment);
        assert!(renderer.scene().encoding().n_paths > before);

        let scene = renderer.take_scene();
        assert!(!scene.encoding().is_empty());
        assert!(renderer.scene().encoding().is_empty());
    }
}
