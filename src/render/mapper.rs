//! Data → surface coordinate mapping
//!
//! ```text
//! x = padL + (t - xMin) / xRange · plotW · zoom + offsetX
//! y = padT + (1 - (v - yMin) / yRange) · plotH · zoom + offsetY
//! ```
//!
//! A zero range is replaced by 1, so flat or single-point series map to
//! finite coordinates.

use serde::{Deserialize, Serialize};

use super::config::ChartConfig;
use super::viewport::Viewport;
use crate::stream::Sample;

/// A point in surface coordinates (origin top-left, y grows downwards)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Horizontal surface position of a timestamp
pub fn map_time(timestamp: i64, config: &ChartConfig, viewport: &Viewport) -> f64 {
    config.padding.left
        + config.x.fraction(timestamp as f64) * config.plot_width(viewport) * viewport.zoom_scale
        + viewport.offset_x
}

/// Vertical surface position of a value
pub fn map_value(value: f64, config: &ChartConfig, viewport: &Viewport) -> f64 {
    config.padding.top
        + (1.0 - config.y.fraction(value)) * config.plot_height(viewport) * viewport.zoom_scale
        + viewport.offset_y
}

/// Project a sample onto the drawing surface
pub fn map_to_surface(sample: &Sample, config: &ChartConfig, viewport: &Viewport) -> Point {
    Point::new(
        map_time(sample.timestamp, config, viewport),
        map_value(sample.value, config, viewport),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::config::Scale;

    fn config() -> ChartConfig {
        ChartConfig {
            x: Scale::new(0.0, 1_000.0),
            y: Scale::new(0.0, 100.0),
            ..ChartConfig::default()
        }
    }

    #[test]
    fn test_domain_corners() {
        let viewport = Viewport::new(800.0, 400.0);
        let config = config();

        let origin = map_to_surface(&Sample::new(0, 0.0), &config, &viewport);
        assert_eq!(origin, Point::new(60.0, 360.0));

        let far = map_to_surface(&Sample::new(1_000, 100.0), &config, &viewport);
        assert_eq!(far, Point::new(780.0, 20.0));
    }

    #[test]
    fn test_monotonic_in_time_and_value() {
        let viewport = Viewport::new(640.0, 480.0);
        let config = config();

        let xs: Vec<f64> = (0..20).map(|t| map_time(t * 50, &config, &viewport)).collect();
        assert!(xs.windows(2).all(|w| w[0] <= w[1]));

        let ys: Vec<f64> = (0..20).map(|v| map_value(v as f64 * 5.0, &config, &viewport)).collect();
        assert!(ys.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_zoom_and_offset() {
        let mut viewport = Viewport::new(800.0, 400.0);
        viewport.zoom_by(2.0);
        viewport.pan_by(-10.0, 5.0);

        let p = map_to_surface(&Sample::new(500, 50.0), &config(), &viewport);
        assert_eq!(p, Point::new(60.0 + 0.5 * 720.0 * 2.0 - 10.0, 20.0 + 0.5 * 340.0 * 2.0 + 5.0));
    }

    #[test]
    fn test_degenerate_domain_is_finite() {
        let config = ChartConfig {
            x: Scale::new(42.0, 42.0),
            y: Scale::new(7.0, 7.0),
            ..ChartConfig::default()
        };
        let p = map_to_surface(&Sample::new(42, 7.0), &config, &Viewport::default());
        assert!(p.x.is_finite() && p.y.is_finite());
    }
}
