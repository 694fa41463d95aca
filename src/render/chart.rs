//! Chart kinds and frame drawing
//!
//! Every chart kind draws from the same inputs: samples, the derived
//! [`ChartConfig`], the [`Viewport`] and a [`ChartStyle`]. A full frame is
//! background, grid, chart and axis labels; heatmap cells go under the
//! grid so the lines stay visible.

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::config::ChartConfig;
use super::mapper::{map_to_surface, map_value, Point};
use super::surface::{Color, Surface, TextAnchor, TextStyle};
use super::viewport::Viewport;
use crate::aggregate::bucket::non_zero;
use crate::stream::Sample;

/// Grid lines per axis (including both edges)
pub const GRID_LINES: usize = 6;

/// Axis labels per axis
pub const AXIS_LABELS: usize = 6;

const MIN_BAR_WIDTH: f64 = 2.0;
const MIN_HEATMAP_CELL: f64 = 5.0;
const MAX_HEATMAP_CELL: f64 = 20.0;

/// The supported chart kinds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Scatter,
    Heatmap,
}

impl ChartKind {
    pub fn all() -> &'static [ChartKind] {
        &[
            ChartKind::Line,
            ChartKind::Bar,
            ChartKind::Scatter,
            ChartKind::Heatmap,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Scatter => "scatter",
            ChartKind::Heatmap => "heatmap",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "line" => Some(ChartKind::Line),
            "bar" => Some(ChartKind::Bar),
            "scatter" => Some(ChartKind::Scatter),
            "heatmap" => Some(ChartKind::Heatmap),
            _ => None,
        }
    }

    /// Whether hovering picks out individual samples
    pub fn supports_hover(&self) -> bool {
        !matches!(self, ChartKind::Heatmap)
    }

    /// Draw the data layer only
    pub fn draw<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        samples: &[Sample],
        config: &ChartConfig,
        viewport: &Viewport,
        style: &ChartStyle,
    ) {
        if samples.is_empty() {
            return;
        }
        match self {
            ChartKind::Line => draw_line(surface, samples, config, viewport, style),
            ChartKind::Bar => draw_bars(surface, samples, config, viewport, style),
            ChartKind::Scatter => draw_scatter(surface, samples, config, viewport, style),
            ChartKind::Heatmap => draw_heatmap(surface, samples, config, viewport),
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Colours and sizes used when drawing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartStyle {
    pub background: Color,
    pub line_color: Color,
    pub bar_color: Color,
    pub scatter_color: Color,
    pub grid_color: Color,
    pub label_color: Color,
    pub line_width: f64,
    pub grid_line_width: f64,
    pub point_radius: f64,
    pub font_size: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            line_color: Color::rgb(0x3b, 0x82, 0xf6),
            bar_color: Color::rgb(0x10, 0xb9, 0x81),
            scatter_color: Color::rgb(0xf5, 0x9e, 0x0b),
            grid_color: Color::rgb(0xe5, 0xe7, 0xeb),
            label_color: Color::rgb(0x6b, 0x72, 0x80),
            line_width: 2.0,
            grid_line_width: 1.0,
            point_radius: 4.0,
            font_size: 12.0,
        }
    }
}

fn draw_line<S: Surface + ?Sized>(
    surface: &mut S,
    samples: &[Sample],
    config: &ChartConfig,
    viewport: &Viewport,
    style: &ChartStyle,
) {
    let points: Vec<Point> = samples
        .iter()
        .map(|s| map_to_surface(s, config, viewport))
        .collect();
    surface.stroke_path(&points, style.line_color, style.line_width);
}

/// Bar width for `count` bars
pub fn bar_width(count: usize, config: &ChartConfig, viewport: &Viewport) -> f64 {
    (config.plot_width(viewport) / count.max(1) as f64 / 2.0).max(MIN_BAR_WIDTH)
}

fn draw_bars<S: Surface + ?Sized>(
    surface: &mut S,
    samples: &[Sample],
    config: &ChartConfig,
    viewport: &Viewport,
    style: &ChartStyle,
) {
    let width = bar_width(samples.len(), config, viewport);
    let baseline = map_value(config.y.min, config, viewport);

    for sample in samples {
        let p = map_to_surface(sample, config, viewport);
        let top = p.y.min(baseline);
        let height = (baseline - p.y).abs();
        surface.fill_rect(p.x - width / 2.0, top, width, height, style.bar_color);
    }
}

fn draw_scatter<S: Surface + ?Sized>(
    surface: &mut S,
    samples: &[Sample],
    config: &ChartConfig,
    viewport: &Viewport,
    style: &ChartStyle,
) {
    for sample in samples {
        let p = map_to_surface(sample, config, viewport);
        surface.fill_circle(p, style.point_radius, style.scatter_color);
    }
}

/// Heatmap cell edge length for `count` samples
pub fn heatmap_cell_size(count: usize, config: &ChartConfig, viewport: &Viewport) -> f64 {
    (config.plot_width(viewport) / (count.max(1) as f64).sqrt())
        .clamp(MIN_HEATMAP_CELL, MAX_HEATMAP_CELL)
}

/// Blue (0) → yellow (0.5) → red (1)
pub fn heatmap_color(intensity: f64) -> Color {
    let r = (intensity * 510.0).min(255.0);
    let g = (255.0 - (intensity - 0.5).abs() * 510.0).min(255.0);
    let b = (255.0 - intensity * 510.0).max(0.0);
    Color::rgb(channel(r), channel(g), channel(b))
}

fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn draw_heatmap<S: Surface + ?Sized>(
    surface: &mut S,
    samples: &[Sample],
    config: &ChartConfig,
    viewport: &Viewport,
) {
    let cell = heatmap_cell_size(samples.len(), config, viewport);

    let (min, max) = samples.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
        (lo.min(s.value), hi.max(s.value))
    });
    let range = non_zero(max - min);

    // (col, row) → (sum, count)
    let mut grid: BTreeMap<(i64, i64), (f64, usize)> = BTreeMap::new();
    for sample in samples {
        let p = map_to_surface(sample, config, viewport);
        let col = ((p.x - config.padding.left) / cell).floor() as i64;
        let row = ((p.y - config.padding.top) / cell).floor() as i64;
        let entry = grid.entry((col, row)).or_insert((0.0, 0));
        entry.0 += sample.value;
        entry.1 += 1;
    }

    for ((col, row), (sum, count)) in grid {
        let intensity = (sum / count as f64 - min) / range;
        surface.fill_rect(
            config.padding.left + col as f64 * cell,
            config.padding.top + row as f64 * cell,
            cell,
            cell,
            heatmap_color(intensity),
        );
    }
}

/// Evenly spaced grid lines across the plot area
pub fn draw_grid<S: Surface + ?Sized>(
    surface: &mut S,
    config: &ChartConfig,
    viewport: &Viewport,
    style: &ChartStyle,
) {
    let left = config.padding.left;
    let right = viewport.width - config.padding.right;
    let top = config.padding.top;
    let bottom = viewport.height - config.padding.bottom;
    let steps = (GRID_LINES - 1) as f64;

    for i in 0..GRID_LINES {
        let x = left + (i as f64 / steps) * config.plot_width(viewport);
        surface.stroke_line(
            Point::new(x, top),
            Point::new(x, bottom),
            style.grid_color,
            style.grid_line_width,
        );
    }

    for i in 0..GRID_LINES {
        let y = top + (i as f64 / steps) * config.plot_height(viewport);
        surface.stroke_line(
            Point::new(left, y),
            Point::new(right, y),
            style.grid_color,
            style.grid_line_width,
        );
    }
}

/// Time labels along the bottom, `HH:MM:SS` (UTC)
pub fn time_labels(config: &ChartConfig) -> Vec<String> {
    let steps = (AXIS_LABELS - 1) as f64;
    (0..AXIS_LABELS)
        .map(|i| {
            let t = config.x.min + (config.x.max - config.x.min) * (i as f64 / steps);
            match Utc.timestamp_millis_opt(t as i64).single() {
                Some(dt) => dt.format("%H:%M:%S").to_string(),
                None => String::new(),
            }
        })
        .collect()
}

/// Value labels up the left side, one decimal
pub fn value_labels(config: &ChartConfig) -> Vec<String> {
    let steps = (AXIS_LABELS - 1) as f64;
    (0..AXIS_LABELS)
        .map(|i| {
            let v = config.y.min + (config.y.max - config.y.min) * (i as f64 / steps);
            format!("{:.1}", v)
        })
        .collect()
}

pub fn draw_axes<S: Surface + ?Sized>(
    surface: &mut S,
    config: &ChartConfig,
    viewport: &Viewport,
    style: &ChartStyle,
) {
    let steps = (AXIS_LABELS - 1) as f64;
    let x_step = config.plot_width(viewport) / steps;
    let y_step = config.plot_height(viewport) / steps;

    let below_axis = TextStyle {
        color: style.label_color,
        font_size: style.font_size,
        anchor: TextAnchor::Middle,
    };
    let label_y = viewport.height - config.padding.bottom + 5.0 + style.font_size;
    for (i, label) in time_labels(config).iter().enumerate() {
        let x = config.padding.left + i as f64 * x_step;
        surface.fill_text(label, Point::new(x, label_y), below_axis);
    }

    let left_of_axis = TextStyle {
        anchor: TextAnchor::End,
        ..below_axis
    };
    let labels = value_labels(config);
    for (i, label) in labels.iter().enumerate() {
        let y = config.padding.top + (labels.len() - 1 - i) as f64 * y_step;
        surface.fill_text(
            label,
            Point::new(config.padding.left - 10.0, y + style.font_size / 3.0),
            left_of_axis,
        );
    }
}

/// One complete frame: background, grid, chart and labels
pub fn draw_frame<S: Surface + ?Sized>(
    surface: &mut S,
    kind: ChartKind,
    samples: &[Sample],
    config: &ChartConfig,
    viewport: &Viewport,
    style: &ChartStyle,
) {
    surface.clear(viewport.width, viewport.height, style.background);

    if kind == ChartKind::Heatmap {
        kind.draw(surface, samples, config, viewport, style);
        draw_grid(surface, config, viewport, style);
    } else {
        draw_grid(surface, config, viewport, style);
        kind.draw(surface, samples, config, viewport, style);
    }

    draw_axes(surface, config, viewport, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::config::Scale;
    use crate::render::surface::{DrawCommand, RecordingSurface};

    fn config() -> ChartConfig {
        ChartConfig {
            x: Scale::new(0.0, 1_000.0),
            y: Scale::new(0.0, 100.0),
            ..ChartConfig::default()
        }
    }

    fn samples(n: i64) -> Vec<Sample> {
        (0..n).map(|i| Sample::new(i * 100, (i * 10) as f64)).collect()
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(ChartKind::parse("Heatmap"), Some(ChartKind::Heatmap));
        assert_eq!(ChartKind::parse("pie"), None);
        assert!(!ChartKind::Heatmap.supports_hover());
        assert!(ChartKind::Line.supports_hover());
    }

    #[test]
    fn test_line_draws_one_path() {
        let mut surface = RecordingSurface::new();
        ChartKind::Line.draw(&mut surface, &samples(5), &config(), &Viewport::default(), &ChartStyle::default());

        match surface.commands() {
            [DrawCommand::Path { points, color, .. }] => {
                assert_eq!(points.len(), 5);
                assert_eq!(color.to_hex(), "#3b82f6");
            }
            other => panic!("unexpected commands: {:?}", other),
        }
    }

    #[test]
    fn test_empty_data_draws_nothing() {
        let mut surface = RecordingSurface::new();
        for kind in ChartKind::all() {
            kind.draw(&mut surface, &[], &config(), &Viewport::default(), &ChartStyle::default());
        }
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_bars_rise_from_baseline() {
        let mut surface = RecordingSurface::new();
        let viewport = Viewport::default();
        ChartKind::Bar.draw(&mut surface, &samples(4), &config(), &viewport, &ChartStyle::default());

        assert_eq!(surface.commands().len(), 4);
        let baseline = map_value(0.0, &config(), &viewport);
        for command in surface.commands() {
            match command {
                DrawCommand::Rect { y, height, width, .. } => {
                    assert!((y + height - baseline).abs() < 1e-9);
                    assert_eq!(*width, 90.0);
                }
                other => panic!("unexpected command: {:?}", other),
            }
        }
    }

    #[test]
    fn test_bar_width_has_minimum() {
        assert_eq!(bar_width(10_000, &config(), &Viewport::default()), 2.0);
    }

    #[test]
    fn test_scatter_radius() {
        let mut surface = RecordingSurface::new();
        ChartKind::Scatter.draw(&mut surface, &samples(3), &config(), &Viewport::default(), &ChartStyle::default());
        assert!(surface
            .commands()
            .iter()
            .all(|c| matches!(c, DrawCommand::Circle { radius, .. } if *radius == 4.0)));
    }

    #[test]
    fn test_heatmap_cell_size_bounds() {
        let viewport = Viewport::default();
        assert_eq!(heatmap_cell_size(1, &config(), &viewport), 20.0);
        assert_eq!(heatmap_cell_size(1_000_000, &config(), &viewport), 5.0);
        // 720 / sqrt(3600) = 12
        assert_eq!(heatmap_cell_size(3_600, &config(), &viewport), 12.0);
    }

    #[test]
    fn test_heatmap_gradient() {
        assert_eq!(heatmap_color(0.0), Color::rgb(0, 0, 255));
        assert_eq!(heatmap_color(0.5), Color::rgb(255, 255, 0));
        assert_eq!(heatmap_color(1.0), Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_heatmap_merges_points_into_cells() {
        let mut surface = RecordingSurface::new();
        let same_cell = vec![Sample::new(0, 10.0), Sample::new(1, 10.5), Sample::new(1_000, 100.0)];
        ChartKind::Heatmap.draw(&mut surface, &same_cell, &config(), &Viewport::default(), &ChartStyle::default());
        assert_eq!(surface.commands().len(), 2);
    }

    #[test]
    fn test_frame_order() {
        let mut surface = RecordingSurface::new();
        let viewport = Viewport::default();
        let style = ChartStyle::default();
        draw_frame(&mut surface, ChartKind::Line, &samples(3), &config(), &viewport, &style);

        let commands = surface.commands();
        assert!(matches!(commands[0], DrawCommand::Clear { .. }));
        let grid_lines = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(grid_lines, GRID_LINES * 2);
        let path_at = commands.iter().position(|c| matches!(c, DrawCommand::Path { .. })).unwrap();
        let last_grid = commands.iter().rposition(|c| matches!(c, DrawCommand::Line { .. })).unwrap();
        assert!(path_at > last_grid);
        let labels = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { .. }))
            .count();
        assert_eq!(labels, AXIS_LABELS * 2);
    }

    #[test]
    fn test_heatmap_cells_under_grid() {
        let mut surface = RecordingSurface::new();
        draw_frame(
            &mut surface,
            ChartKind::Heatmap,
            &samples(10),
            &config(),
            &Viewport::default(),
            &ChartStyle::default(),
        );

        let commands = surface.commands();
        let last_cell = commands
            .iter()
            .skip(1)
            .rposition(|c| matches!(c, DrawCommand::Rect { .. }))
            .unwrap()
            + 1;
        let first_grid = commands.iter().position(|c| matches!(c, DrawCommand::Line { .. })).unwrap();
        assert!(last_cell < first_grid);
    }

    #[test]
    fn test_axis_labels() {
        let config = ChartConfig {
            x: Scale::new(0.0, 5_000.0),
            y: Scale::new(0.0, 50.0),
            ..ChartConfig::default()
        };
        assert_eq!(
            time_labels(&config),
            vec!["00:00:00", "00:00:01", "00:00:02", "00:00:03", "00:00:04", "00:00:05"]
        );
        assert_eq!(value_labels(&config), vec!["0.0", "10.0", "20.0", "30.0", "40.0", "50.0"]);
    }
}
