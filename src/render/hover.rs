//! Nearest-sample lookup for pointer hover
//!
//! Line and bar charts match on horizontal distance only; scatter plots use
//! the full Euclidean distance. Heatmaps have no per-sample hover.
//!
//! Large, time-sorted buffers switch from a linear scan to a binary search
//! on the projected x coordinate, which is monotonic in the timestamp.

use super::chart::{ChartKind, ChartStyle};
use super::config::ChartConfig;
use super::mapper::{map_time, map_to_surface, Point};
use super::surface::{Surface, TextAnchor, TextStyle};
use super::viewport::Viewport;
use crate::stream::Sample;

/// Above this many samples the x-distance lookup uses binary search
pub const BINARY_SEARCH_THRESHOLD: usize = 4096;

/// Index of the sample nearest to `pointer`, if the chart supports hover
pub fn find_nearest(
    kind: ChartKind,
    samples: &[Sample],
    config: &ChartConfig,
    viewport: &Viewport,
    pointer: Point,
) -> Option<usize> {
    if samples.is_empty() || !kind.supports_hover() {
        return None;
    }

    match kind {
        ChartKind::Scatter => nearest_euclidean(samples, config, viewport, pointer),
        _ if samples.len() > BINARY_SEARCH_THRESHOLD => {
            nearest_by_x_sorted(samples, config, viewport, pointer.x)
        }
        _ => nearest_by_x(samples, config, viewport, pointer.x),
    }
}

fn nearest_by_x(
    samples: &[Sample],
    config: &ChartConfig,
    viewport: &Viewport,
    x: f64,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, sample) in samples.iter().enumerate() {
        let distance = (map_time(sample.timestamp, config, viewport) - x).abs();
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}

/// Binary search variant; `samples` must be sorted by timestamp
fn nearest_by_x_sorted(
    samples: &[Sample],
    config: &ChartConfig,
    viewport: &Viewport,
    x: f64,
) -> Option<usize> {
    let project = |i: usize| map_time(samples[i].timestamp, config, viewport);
    let idx = samples.partition_point(|s| map_time(s.timestamp, config, viewport) < x);

    if idx == 0 {
        return Some(0);
    }
    if idx == samples.len() {
        return Some(samples.len() - 1);
    }

    let before = (project(idx - 1) - x).abs();
    let after = (project(idx) - x).abs();
    Some(if before <= after { idx - 1 } else { idx })
}

fn nearest_euclidean(
    samples: &[Sample],
    config: &ChartConfig,
    viewport: &Viewport,
    pointer: Point,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, sample) in samples.iter().enumerate() {
        let distance = map_to_surface(sample, config, viewport).distance_squared(&pointer);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}

/// Marker for the hovered sample: a guide line with the value for
/// line and bar charts, a ring for scatter plots
pub fn draw_hover_marker<S: Surface + ?Sized>(
    surface: &mut S,
    kind: ChartKind,
    sample: &Sample,
    config: &ChartConfig,
    viewport: &Viewport,
    style: &ChartStyle,
) {
    let p = map_to_surface(sample, config, viewport);
    let text = TextStyle {
        color: style.label_color,
        font_size: style.font_size,
        anchor: TextAnchor::Middle,
    };

    match kind {
        ChartKind::Line | ChartKind::Bar => {
            surface.stroke_line(
                Point::new(p.x, config.padding.top),
                Point::new(p.x, viewport.height - config.padding.bottom),
                style.label_color,
                style.grid_line_width,
            );
            surface.fill_text(&format!("{:.1}", sample.value), Point::new(p.x, p.y - 10.0), text);
        }
        ChartKind::Scatter => {
            surface.fill_circle(p, style.point_radius * 2.0, style.label_color);
            surface.fill_circle(p, style.point_radius, style.scatter_color);
            surface.fill_text(&format!("{:.1}", sample.value), Point::new(p.x, p.y - 10.0), text);
        }
        ChartKind::Heatmap => {}
    }
}
