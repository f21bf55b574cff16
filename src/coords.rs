use crate::Node;

/// Convert a stored percentage coordinate (0-100) to a pixel coordinate
/// on an axis of the given size
pub fn to_canvas(percent: f64, axis_size: f64) -> f64 {
    (percent / 100.0) * axis_size
}

/// Convert a pixel coordinate back to a percentage of the axis size
pub fn to_percent(pixel: f64, axis_size: f64) -> f64 {
    (pixel / axis_size) * 100.0
}

/// Convert a pixel coordinate to the stored integer percent, rounded
/// and clamped to [0, 100]. Used when edits come from canvas space.
pub fn to_percent_clamped(pixel: f64, axis_size: f64) -> u8 {
    to_percent(pixel, axis_size).round().clamp(0.0, 100.0) as u8
}

/// Fixed-size drawing surface the percentage coordinates map onto
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub width: f64,
    pub height: f64,
}

/// The site's SVG viewBox
pub const DEFAULT_VIEW: ViewBox = ViewBox {
    width: 1200.0,
    height: 700.0,
};

impl ViewBox {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A node's pixel position on this surface
    pub fn node_position(&self, node: &Node) -> (f64, f64) {
        (
            to_canvas(node.x as f64, self.width),
            to_canvas(node.y as f64, self.height),
        )
    }
}

impl Default for ViewBox {
    fn default() -> Self {
        DEFAULT_VIEW
    }
}
