//! Headless application host.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::session::{Session, SessionAction};
use artcanvas_core::canvas::{Canvas, CanvasStats};
use artcanvas_core::layers::LayerId;
use artcanvas_render::{CpuRenderer, RenderContext, Renderer};
use chrono::Utc;
use peniko::Color;
use serde::Serialize;

/// Summary written after a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Full frames painted.
    pub frames: usize,
    /// Incremental stroke segments painted between frames.
    pub segments: usize,
    #[serde(flatten)]
    pub stats: CanvasStats,
}

/// Main application struct: one canvas, one CPU surface.
pub struct App {
    config: AppConfig,
    canvas: Canvas,
    renderer: CpuRenderer,
    frames: usize,
    segments: usize,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> AppResult<Self> {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> AppResult<Self> {
        let mut canvas = Canvas::with_config(&config.canvas_config());
        canvas.resize(
            f64::from(config.width),
            f64::from(config.height),
            config.scale_factor,
        );
        let physical = canvas.viewport().physical_size();
        let renderer = CpuRenderer::new(physical.width as u32, physical.height as u32)?;
        log::info!(
            "{}: {}x{} surface at {}x",
            config.title,
            config.width,
            config.height,
            canvas.viewport().scale_factor
        );
        Ok(Self {
            config,
            canvas,
            renderer,
            frames: 0,
            segments: 0,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn renderer(&self) -> &CpuRenderer {
        &self.renderer
    }

    fn background(&self) -> Color {
        self.config.background_color.into()
    }

    fn layer_at(&self, index: usize) -> AppResult<LayerId> {
        self.canvas
            .layers()
            .as_slice()
            .get(index)
            .map(|layer| layer.id())
            .ok_or(AppError::UnknownLayer(index))
    }

    /// Paint the pending frame, if one is due.
    ///
    /// Without a drawing surface the frame stays pending until the next
    /// resize gives it one.
    pub fn frame(&mut self) -> AppResult<bool> {
        if self.canvas.pending_redraw().is_none() {
            return Ok(false);
        }
        if self.canvas.viewport().is_empty() {
            log::debug!("No drawing surface, skipping frame");
            return Ok(false);
        }
        self.canvas.take_redraw();
        let ctx = RenderContext::new(&self.canvas).with_background(self.background());
        self.renderer.render(&ctx)?;
        self.frames += 1;
        Ok(true)
    }

    /// Apply one scripted action.
    pub fn apply(&mut self, action: &SessionAction) -> AppResult<()> {
        if let Some(event) = action.pointer_event() {
            let segment = self.canvas.handle_pointer(event);
            if let Some(segment) = segment.filter(|_| !self.canvas.viewport().is_empty()) {
                let ctx = RenderContext::new(&self.canvas).with_background(self.background());
                self.renderer.paint_segment(&ctx, &segment);
                self.segments += 1;
            }
            return Ok(());
        }
        if let Some(event) = action.key_event() {
            if let Some(triggered) = self.canvas.handle_key(&event) {
                log::debug!("Shortcut {:?}", triggered);
            }
            return Ok(());
        }

        match action {
            SessionAction::SelectTool { tool } => self.canvas.select_tool(*tool),
            SessionAction::SelectShape { shape } => self.canvas.select_shape(*shape),
            SessionAction::SetColor { color } => self.canvas.set_color(*color),
            SessionAction::SetWidth { width } => self.canvas.set_width(*width),
            SessionAction::Undo => {
                self.canvas.undo();
            }
            SessionAction::Redo => {
                self.canvas.redo();
            }
            SessionAction::Clear => self.canvas.clear(),
            SessionAction::AddLayer => {
                self.canvas.add_layer();
            }
            SessionAction::DeleteLayer { index } => {
                let id = self.layer_at(*index)?;
                if !self.canvas.delete_layer(id) {
                    log::warn!("Refusing to delete the last layer");
                }
            }
            SessionAction::ToggleLayer { index } => {
                let id = self.layer_at(*index)?;
                self.canvas.toggle_layer_visibility(id);
            }
            SessionAction::SetLayerOpacity { index, opacity } => {
                let id = self.layer_at(*index)?;
                self.canvas.set_layer_opacity(id, *opacity);
            }
            SessionAction::RenameLayer { index, name } => {
                let id = self.layer_at(*index)?;
                self.canvas.rename_layer(id, name.clone());
            }
            SessionAction::SetActiveLayer { index } => {
                let id = self.layer_at(*index)?;
                self.canvas.set_active_layer(id);
            }
            SessionAction::SetZoom { zoom } => {
                self.canvas.set_zoom(*zoom);
            }
            SessionAction::ZoomIn => {
                self.canvas.zoom_in();
            }
            SessionAction::ZoomOut => {
                self.canvas.zoom_out();
            }
            SessionAction::ResetView => self.canvas.reset_view(),
            SessionAction::ScrubTo { index } => self.canvas.scrub_to(*index),
            SessionAction::ExitScrub => {
                self.canvas.exit_scrub();
            }
            SessionAction::Resize {
                width,
                height,
                scale_factor,
            } => self.canvas.resize(*width, *height, *scale_factor),
            SessionAction::Frame => {
                self.frame()?;
            }
            SessionAction::PointerDown { .. }
            | SessionAction::PointerMove { .. }
            | SessionAction::PointerUp { .. }
            | SessionAction::PointerLeave
            | SessionAction::Key { .. } => {}
        }
        Ok(())
    }

    /// Replay a whole session, then paint whatever frame is still pending.
    pub fn run(&mut self, session: &Session) -> AppResult<ReplayReport> {
        for (step, action) in session.actions.iter().enumerate() {
            log::trace!("Step {}: {:?}", step, action);
            self.apply(action)?;
        }
        self.frame()?;
        Ok(self.report())
    }

    pub fn report(&self) -> ReplayReport {
        ReplayReport {
            frames: self.frames,
            segments: self.segments,
            stats: self.canvas.stats(),
        }
    }

    /// Write the PNG and, if configured, the stats summary.
    pub fn export(&self) -> AppResult<()> {
        let png_path = self.config.png_path(Utc::now());
        self.renderer.export_png_file(&png_path)?;
        log::info!(
            "Exported {}x{} PNG to {:?}",
            self.renderer.width(),
            self.renderer.height(),
            png_path
        );
        if let Some(path) = &self.config.output_stats {
            std::fs::write(path, serde_json::to_string_pretty(&self.report())?)?;
            log::info!("Wrote stats to {:?}", path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artcanvas_core::color::SerializableColor;

    fn small_config() -> AppConfig {
        AppConfig {
            width: 100,
            height: 80,
            brush_width: 10.0,
            brush_color: SerializableColor::new(255, 0, 0, 255),
            ..AppConfig::default()
        }
    }

    fn session(json: &str) -> Session {
        Session::from_json_str(json).unwrap()
    }

    #[test]
    fn test_replay_paints_stroke() {
        let mut app = App::with_config(small_config()).unwrap();
        let report = app
            .run(&session(
                r#"{"actions": [
                    {"action": "frame"},
                    {"action": "pointer_down", "x": 10.0, "y": 40.0},
                    {"action": "pointer_move", "x": 50.0, "y": 40.0},
                    {"action": "pointer_move", "x": 90.0, "y": 40.0},
                    {"action": "pointer_up", "x": 90.0, "y": 40.0}
                ]}"#,
            ))
            .unwrap();

        assert_eq!(report.frames, 2);
        assert_eq!(report.segments, 2);
        assert_eq!(report.stats.history.total_actions, 1);
        assert_eq!(report.stats.history.total_points, 3);
        let px = app.renderer().raster().pixel(50, 40).unwrap();
        assert!(px[0] > 250 && px[1] < 5 && px[3] == 255, "got {px:?}");
    }

    #[test]
    fn test_redraws_coalesce_between_frames() {
        let mut app = App::with_config(small_config()).unwrap();
        let report = app
            .run(&session(
                r#"{"actions": [
                    {"action": "zoom_in"},
                    {"action": "zoom_in"},
                    {"action": "add_layer"},
                    {"action": "toggle_layer", "index": 0},
                    {"action": "frame"},
                    {"action": "frame"}
                ]}"#,
            ))
            .unwrap();
        assert_eq!(report.frames, 1);
        assert_eq!(report.stats.zoom_percent, 120);
        assert_eq!(report.stats.layer_count, 2);
    }

    #[test]
    fn test_undo_shortcut_and_layer_errors() {
        let mut app = App::with_config(small_config()).unwrap();
        app.run(&session(
            r#"{"actions": [
                {"action": "pointer_down", "x": 10.0, "y": 10.0},
                {"action": "pointer_move", "x": 20.0, "y": 20.0},
                {"action": "pointer_leave"},
                {"action": "key", "key": "z", "modifiers": {"meta": true}}
            ]}"#,
        ))
        .unwrap();
        assert!(app.canvas().history().strokes().is_empty());
        assert_eq!(app.canvas().history().redo_depth(), 1);

        let err = app
            .apply(&SessionAction::DeleteLayer { index: 3 })
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownLayer(3)));
    }

    #[test]
    fn test_resize_reallocates_surface() {
        let mut app = App::with_config(small_config()).unwrap();
        app.run(&session(
            r#"{"actions": [
                {"action": "resize", "width": 60.0, "height": 40.0, "scale_factor": 2.0}
            ]}"#,
        ))
        .unwrap();
        assert_eq!((app.renderer().width(), app.renderer().height()), (120, 80));
    }

    #[test]
    fn test_empty_surface_skips_frame_until_resized() {
        let mut app = App::with_config(small_config()).unwrap();
        let report = app
            .run(&session(
                r#"{"actions": [
                    {"action": "pointer_down", "x": 10.0, "y": 40.0},
                    {"action": "pointer_move", "x": 50.0, "y": 40.0},
                    {"action": "pointer_up", "x": 50.0, "y": 40.0},
                    {"action": "resize", "width": 0.0, "height": 0.0},
                    {"action": "pointer_down", "x": 10.0, "y": 10.0},
                    {"action": "pointer_move", "x": 20.0, "y": 10.0},
                    {"action": "pointer_up", "x": 20.0, "y": 10.0},
                    {"action": "frame"}
                ]}"#,
            ))
            .unwrap();
        assert_eq!(report.frames, 0);
        assert_eq!(report.segments, 1);
        assert!(app.canvas().pending_redraw().is_some());

        app.apply(&SessionAction::Resize {
            width: 100.0,
            height: 80.0,
            scale_factor: 1.0,
        })
        .unwrap();
        assert!(app.frame().unwrap());
        assert_eq!(app.report().frames, 1);
        assert_eq!(app.report().stats.history.total_actions, 2);
        let px = app.renderer().raster().pixel(30, 40).unwrap();
        assert!(px[0] > 250 && px[1] < 5, "got {px:?}");
    }

    #[test]
    fn test_export_writes_png_and_stats() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            output_png: Some(dir.path().join("out.png")),
            output_stats: Some(dir.path().join("stats.json")),
            ..small_config()
        };
        let mut app = App::with_config(config).unwrap();
        app.run(&session(
            r#"{"actions": [
                {"action": "select_shape", "shape": "rectangle"},
                {"action": "pointer_down", "x": 10.0, "y": 10.0},
                {"action": "pointer_move", "x": 60.0, "y": 50.0},
                {"action": "pointer_up", "x": 60.0, "y": 50.0}
            ]}"#,
        ))
        .unwrap();
        app.export().unwrap();

        let png = std::fs::read(dir.path().join("out.png")).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let stats = std::fs::read_to_string(dir.path().join("stats.json")).unwrap();
        let stats: serde_json::Value = serde_json::from_str(&stats).unwrap();
        assert_eq!(stats["total_actions"], 1);
        assert_eq!(stats["undo_depth"], 0);
        assert_eq!(stats["frames"], 1);
    }

    #[test]
    fn test_demo_session_replays() {
        let demo = session(include_str!("../../../demos/session.json"));
        let mut app = App::with_config(small_config()).unwrap();
        let report = app.run(&demo).unwrap();

        assert_eq!(report.stats.history.total_actions, 4);
        assert_eq!(report.stats.history.undo_depth, 2);
        assert_eq!(report.stats.layer_count, 2);
        assert!(!report.stats.history.scrubbing);
        assert_eq!(report.stats.zoom_percent, 110);
    }
}
