//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom level that corresponds to "100%" in the UI.
pub const DEFAULT_ZOOM: f64 = 1.0;
/// Minimum allowed zoom level.
pub const MIN_ZOOM: f64 = 0.5;
/// Maximum allowed zoom level.
pub const MAX_ZOOM: f64 = 3.0;
/// Zoom change applied by a single zoom-in/zoom-out step.
pub const ZOOM_STEP: f64 = 0.1;

/// Map a screen point to canvas space: `(screen - pan) / zoom`.
pub fn to_canvas_space(screen: Point, pan: Vec2, zoom: f64) -> Point {
    Point::new((screen.x - pan.x) / zoom, (screen.y - pan.y) / zoom)
}

/// Map a canvas point to screen space: `canvas * zoom + pan`.
pub fn to_screen_space(canvas: Point, pan: Vec2, zoom: f64) -> Point {
    Point::new(canvas.x * zoom + pan.x, canvas.y * zoom + pan.y)
}

/// Camera manages the view transform for the canvas.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and canvas coordinates.
/// The zoom level is kept within `[MIN_ZOOM, MAX_ZOOM]`; pan is unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
    /// Current zoom level.
    zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current zoom level.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Zoom as a rounded percentage for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts canvas coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to canvas coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        to_canvas_space(screen_point, self.offset, self.zoom)
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        to_screen_space(canvas_point, self.offset, self.zoom)
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Set the zoom level, clamped to the valid range.
    /// Returns true if the zoom level changed.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let new_zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        self.zoom = new_zoom;
        true
    }

    /// Step the zoom level up by `ZOOM_STEP`.
    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom + ZOOM_STEP)
    }

    /// Step the zoom level down by `ZOOM_STEP`.
    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom - ZOOM_STEP)
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = DEFAULT_ZOOM;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert!((camera.zoom() - DEFAULT_ZOOM).abs() < f64::EPSILON);
        assert_eq!(camera.zoom_percent(), 100);
    }

    #[test]
    fn test_screen_to_canvas_identity() {
        let camera = Camera::new();
        let screen = Point::new(100.0, 200.0);
        let canvas = camera.screen_to_canvas(screen);
        assert!((canvas.x - screen.x).abs() < f64::EPSILON);
        assert!((canvas.y - screen.y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_canvas_with_offset() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(50.0, 100.0);
        let canvas = camera.screen_to_canvas(Point::new(100.0, 200.0));
        assert!((canvas.x - 50.0).abs() < f64::EPSILON);
        assert!((canvas.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_canvas_with_zoom() {
        let mut camera = Camera::new();
        camera.set_zoom(2.0);
        let canvas = camera.screen_to_canvas(Point::new(100.0, 200.0));
        assert!((canvas.x - 50.0).abs() < f64::EPSILON);
        assert!((canvas.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        for &zoom in &[0.5, 0.75, 1.0, 1.5, 2.3, 3.0] {
            for &pan in &[Vec2::ZERO, Vec2::new(30.0, -20.0), Vec2::new(-812.5, 1e4)] {
                let original = Point::new(123.0, 456.0);
                let canvas = to_canvas_space(original, pan, zoom);
                let back = to_screen_space(canvas, pan, zoom);
                assert!((back.x - original.x).abs() < 1e-9);
                assert!((back.y - original.y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_transform_matches_free_functions() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(12.0, -7.0);
        camera.set_zoom(1.7);
        let p = Point::new(40.0, 90.0);

        let via_affine = camera.transform() * p;
        let via_fn = camera.canvas_to_screen(p);
        assert!((via_affine.x - via_fn.x).abs() < 1e-9);
        assert!((via_affine.y - via_fn.y).abs() < 1e-9);

        let back = camera.inverse_transform() * via_affine;
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut camera = Camera::new();
        camera.set_zoom(0.01);
        assert!((camera.zoom() - MIN_ZOOM).abs() < f64::EPSILON);

        camera.set_zoom(1000.0);
        assert!((camera.zoom() - MAX_ZOOM).abs() < f64::EPSILON);

        assert!(!camera.set_zoom(f64::NAN));
        assert!((camera.zoom() - MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_steps_saturate() {
        let mut camera = Camera::new();
        for _ in 0..100 {
            camera.zoom_in();
            assert!(camera.zoom() <= MAX_ZOOM);
        }
        assert!((camera.zoom() - MAX_ZOOM).abs() < f64::EPSILON);
        assert!(!camera.zoom_in());

        for _ in 0..100 {
            camera.zoom_out();
            assert!(camera.zoom() >= MIN_ZOOM);
        }
        assert!((camera.zoom() - MIN_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_step_size() {
        let mut camera = Camera::new();
        assert!(camera.zoom_in());
        assert!((camera.zoom() - 1.1).abs() < 1e-9);
        assert_eq!(camera.zoom_percent(), 110);
    }

    #[test]
    fn test_pan_and_reset() {
        let mut camera = Camera::new();
        camera.pan(Vec2::new(10.0, 20.0));
        camera.set_zoom(2.0);
        assert!((camera.offset.x - 10.0).abs() < f64::EPSILON);
        assert!((camera.offset.y - 20.0).abs() < f64::EPSILON);

        camera.reset();
        assert_eq!(camera, Camera::default());
    }
}
