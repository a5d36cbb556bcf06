//! Canvas camera.
//!
//! The canvas is drawn as `translate(x, y) scale(zoom)`, so a graph point `g`
//! lands on screen at `g * zoom + (x, y)`.

use crate::config::EditorConfig;
use crate::model::EditorData;

/// Tolerance for zoom bounds, wheel steps accumulate float error.
const ZOOM_EPSILON: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, zoom: 1.0 }
    }
}

impl From<EditorData> for Camera {
    fn from(data: EditorData) -> Self {
        Self { x: data.x, y: data.y, zoom: data.zoom }
    }
}

impl From<Camera> for EditorData {
    fn from(camera: Camera) -> Self {
        Self { x: camera.x, y: camera.y, zoom: camera.zoom }
    }
}

impl Camera {
    pub fn new(x: f32, y: f32, zoom: f32) -> Self {
        Self { x, y, zoom }
    }

    pub fn screen_to_graph(&self, sx: f32, sy: f32) -> (f32, f32) {
        ((sx - self.x) / self.zoom, (sy - self.y) / self.zoom)
    }

    pub fn graph_to_screen(&self, gx: f32, gy: f32) -> (f32, f32) {
        (gx * self.zoom + self.x, gy * self.zoom + self.y)
    }

    /// Convert a screen-space pointer delta into graph units.
    pub fn scale_delta(&self, dx: f32, dy: f32) -> (f32, f32) {
        (dx / self.zoom, dy / self.zoom)
    }

    /// Camera that puts the middle of the canvas in the middle of the viewport
    /// at zoom 1.
    pub fn centered(viewport_width: f32, viewport_height: f32, config: &EditorConfig) -> Self {
        Self {
            x: viewport_width / 2.0 - config.canvas_size / 2.0,
            y: viewport_height / 2.0 - config.canvas_size / 2.0,
            zoom: 1.0,
        }
    }

    /// Zoom for one wheel notch: scrolling up (`delta_y < 0`) zooms in.
    ///
    /// Returns `None` when the step would leave `[min_zoom, max_zoom]` or the
    /// delta is zero.
    pub fn wheel_zoom(&self, delta_y: f32, config: &EditorConfig) -> Option<f32> {
        if delta_y < 0.0 {
            let zoom = self.zoom + config.zoom_step;
            (zoom <= config.max_zoom + ZOOM_EPSILON).then_some(zoom)
        } else if delta_y > 0.0 {
            let zoom = self.zoom - config.zoom_step;
            (zoom >= config.min_zoom - ZOOM_EPSILON).then_some(zoom)
        } else {
            None
        }
    }
}
