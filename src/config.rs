//! Editor tuning knobs.
//!
//! Every field has a default, so a host can deserialize a partial JSON object
//! and only override what it cares about:
//!
//! ```ignore
//! let config = EditorConfig::from_json_str(r#"{ "max_zoom": 4.0 }"#)?;
//! let ctrl = GraphController::with_config(registry, config);
//! ```

use crate::error::EditorError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Smallest horizontal control-point offset of a persisted connection curve.
    pub min_curve_offset: f32,
    /// Fraction of the horizontal endpoint distance used as control-point offset.
    pub curve_factor: f32,
    /// Zoom change per wheel notch.
    pub zoom_step: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Side length of the square canvas, in graph units.
    pub canvas_size: f32,
    /// Default node width used to place output sockets before geometry is reported.
    pub node_width: f32,
    /// Height of the node header; the flow-input socket sits centered in it.
    pub header_height: f32,
    /// Vertical spacing between consecutive sockets.
    pub row_height: f32,
    pub socket_hit_radius: f32,
    pub connection_hover_distance: f32,
    /// Samples per curve for connection hit testing.
    pub hit_samples: usize,
    /// Hit-test sockets on every `pointer_move` instead of relying on
    /// enter/leave notifications from the host.
    pub auto_hover: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_curve_offset: 100.0,
            curve_factor: 0.5,
            zoom_step: 0.05,
            min_zoom: 0.05,
            max_zoom: 2.0,
            canvas_size: 10_000.0,
            node_width: 150.0,
            header_height: 40.0,
            row_height: 24.0,
            socket_hit_radius: 10.0,
            connection_hover_distance: 8.0,
            hit_samples: 20,
            auto_hover: false,
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) JSON configuration object.
    pub fn from_json_str(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }
}
