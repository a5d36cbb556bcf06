//! Connection path geometry.
//!
//! Paths are emitted as SVG path commands in graph space. A preview
//! (transient) connection is a straight segment that follows the pointer; a
//! persisted connection is a horizontal cubic bezier whose control points
//! extend out of the output side and into the input side.

/// Horizontal control-point offset for a curve between `start_x` and `end_x`.
///
/// The offset grows with the horizontal distance but never drops below
/// `min_offset`, so short edges still bend visibly.
pub fn curve_offset(start_x: f32, end_x: f32, min_offset: f32, factor: f32) -> f32 {
    ((end_x - start_x).abs() * factor).max(min_offset)
}

/// Straight segment used while dragging a new connection.
pub fn straight_path(start: (f32, f32), end: (f32, f32)) -> String {
    format!("M {} {} L {} {}", start.0, start.1, end.0, end.1)
}

/// Generate SVG path command for a persisted connection
///
/// # Arguments
/// * `start` - Output-side endpoint (socket center)
/// * `end` - Input-side endpoint (socket center)
/// * `min_offset` - Minimum control point offset (default: 100.0)
/// * `factor` - Share of the horizontal distance used as offset (default: 0.5)
///
/// # Returns
/// SVG path command string (e.g., "M 0 0 C 100 0 100 50 200 50")
pub fn bezier_path(start: (f32, f32), end: (f32, f32), min_offset: f32, factor: f32) -> String {
    let curve = CubicBezier::from_endpoints(start, end, min_offset, factor);
    format!(
        "M {} {} C {} {} {} {} {} {}",
        curve.p0.0, curve.p0.1, curve.p1.0, curve.p1.1, curve.p2.0, curve.p2.1, curve.p3.0, curve.p3.1
    )
}

/// Path for a connection in either mode.
pub fn connection_path(
    start: (f32, f32),
    end: (f32, f32),
    transient: bool,
    min_offset: f32,
    factor: f32,
) -> String {
    if transient {
        straight_path(start, end)
    } else {
        bezier_path(start, end, min_offset, factor)
    }
}

/// Cubic bezier curve defined by 4 control points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: (f32, f32),
    pub p1: (f32, f32),
    pub p2: (f32, f32),
    pub p3: (f32, f32),
}

impl CubicBezier {
    /// Build the horizontal curve used for persisted connections.
    pub fn from_endpoints(start: (f32, f32), end: (f32, f32), min_offset: f32, factor: f32) -> Self {
        let offset = curve_offset(start.0, end.0, min_offset, factor);
        Self {
            p0: start,
            p1: (start.0 + offset, start.1),
            p2: (end.0 - offset, end.1),
            p3: end,
        }
    }

    /// Evaluate the curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> (f32, f32) {
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;
        let t2 = t * t;
        let t3 = t2 * t;

        (
            mt3 * self.p0.0 + 3.0 * mt2 * t * self.p1.0 + 3.0 * mt * t2 * self.p2.0 + t3 * self.p3.0,
            mt3 * self.p0.1 + 3.0 * mt2 * t * self.p1.1 + 3.0 * mt * t2 * self.p2.1 + t3 * self.p3.1,
        )
    }
}

/// Squared distance from a point to a line segment
fn distance_to_line_segment_sq(point: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let ab = (b.0 - a.0, b.1 - a.1);
    let ap = (point.0 - a.0, point.1 - a.1);

    let ab_len_sq = ab.0 * ab.0 + ab.1 * ab.1;

    if ab_len_sq < f32::EPSILON {
        return ap.0 * ap.0 + ap.1 * ap.1;
    }

    let t = ((ap.0 * ab.0 + ap.1 * ab.1) / ab_len_sq).clamp(0.0, 1.0);
    let closest = (a.0 + t * ab.0, a.1 + t * ab.1);

    let dx = point.0 - closest.0;
    let dy = point.1 - closest.1;
    dx * dx + dy * dy
}

/// Calculate the minimum distance from a point to a cubic bezier curve
///
/// Samples the curve into `num_samples` segments (20 when 0 is passed) and
/// returns the distance to the closest one.
pub fn distance_to_bezier(point: (f32, f32), bezier: &CubicBezier, num_samples: usize) -> f32 {
    let num_samples = if num_samples == 0 { 20 } else { num_samples };

    let mut min_dist_sq = f32::MAX;
    let mut prev_point = bezier.eval(0.0);

    for i in 1..=num_samples {
        let t = i as f32 / num_samples as f32;
        let curr_point = bezier.eval(t);

        let dist_sq = distance_to_line_segment_sq(point, prev_point, curr_point);
        if dist_sq < min_dist_sq {
            min_dist_sq = dist_sq;
        }

        prev_point = curr_point;
    }

    min_dist_sq.sqrt()
}

/// Distance from a point to a straight segment (preview connections).
pub fn distance_to_segment(point: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    distance_to_line_segment_sq(point, a, b).sqrt()
}
