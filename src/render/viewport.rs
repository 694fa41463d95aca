//! Per-chart viewport: size, pan offset and zoom

use serde::{Deserialize, Serialize};

/// Smallest allowed zoom factor
pub const MIN_ZOOM: f64 = 0.5;

/// Largest allowed zoom factor
pub const MAX_ZOOM: f64 = 5.0;

/// Visible window onto a chart.
///
/// Each chart instance owns its own viewport; a new chart starts with no
/// offset and a zoom of one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
    pub zoom_scale: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            width,
            height,
            zoom_scale: 1.0,
        }
    }

    /// Multiply the zoom by `factor`, clamped to `[MIN_ZOOM, MAX_ZOOM]`
    pub fn zoom_by(&mut self, factor: f64) {
        self.zoom_scale = (self.zoom_scale * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Update the dimensions, returning whether they changed
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    /// Back to no offset and unit zoom, keeping the size
    pub fn reset(&mut self) {
        self.offset_x = 0.0;
        self.offset_y = 0.0;
        self.zoom_scale = 1.0;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 400.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let viewport = Viewport::default();
        assert_eq!(viewport.zoom_scale, 1.0);
        assert_eq!((viewport.offset_x, viewport.offset_y), (0.0, 0.0));
    }

    #[test]
    fn test_zoom_clamped() {
        let mut viewport = Viewport::default();
        for _ in 0..50 {
            viewport.zoom_by(1.1);
        }
        assert_eq!(viewport.zoom_scale, MAX_ZOOM);

        for _ in 0..50 {
            viewport.zoom_by(0.9);
        }
        assert_eq!(viewport.zoom_scale, MIN_ZOOM);
    }

    #[test]
    fn test_resize_reports_change() {
        let mut viewport = Viewport::new(100.0, 50.0);
        assert!(!viewport.resize(100.0, 50.0));
        assert!(viewport.resize(200.0, 50.0));
        assert_eq!(viewport.width, 200.0);
    }

    #[test]
    fn test_reset_keeps_size() {
        let mut viewport = Viewport::new(300.0, 200.0);
        viewport.pan_by(10.0, -5.0);
        viewport.zoom_by(2.0);
        viewport.reset();
        assert_eq!(viewport, Viewport::new(300.0, 200.0));
    }
}
