//! Chart layout: padding and scale domains

use serde::{Deserialize, Serialize};

use super::chart::ChartKind;
use super::viewport::Viewport;
use crate::aggregate::bucket::non_zero;
use crate::aggregate::SeriesStats;

/// Default x window when there is no data
const EMPTY_WINDOW_MS: i64 = 3_600_000;

/// Bar chart y maximum when the data gives none
const EMPTY_BAR_MAX: f64 = 100.0;

/// Space reserved around the plot area
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 40.0,
            left: 60.0,
        }
    }
}

/// Closed numeric domain of one axis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
}

impl Scale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `max - min`, or 1 when the domain is degenerate
    pub fn range(&self) -> f64 {
        non_zero(self.max - self.min)
    }

    /// Position of `value` within the domain, 0 at `min` and 1 at `max`
    pub fn fraction(&self, value: f64) -> f64 {
        (value - self.min) / self.range()
    }
}

/// Layout derived from the current data
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChartConfig {
    pub padding: Padding,
    pub x: Scale,
    pub y: Scale,
}

impl ChartConfig {
    /// Derive domains from series statistics.
    ///
    /// The y domain gets 10% headroom on both sides and never dips below
    /// zero; bar charts always start at zero. An empty series shows the
    /// hour ending at `now_ms`.
    pub fn from_stats(stats: &SeriesStats, kind: ChartKind, now_ms: i64) -> Self {
        let range = stats.value_range();
        let headroom = range * 0.1;

        let y = match kind {
            ChartKind::Bar => {
                let max = stats.max + headroom;
                Scale::new(0.0, if max == 0.0 { EMPTY_BAR_MAX } else { max })
            }
            _ => Scale::new((stats.min - headroom).max(0.0), stats.max + headroom),
        };

        let x = if stats.is_empty() {
            Scale::new((now_ms - EMPTY_WINDOW_MS) as f64, now_ms as f64)
        } else {
            Scale::new(stats.start_time as f64, stats.end_time as f64)
        };

        Self {
            padding: Padding::default(),
            x,
            y,
        }
    }

    /// Width available to data
    pub fn plot_width(&self, viewport: &Viewport) -> f64 {
        viewport.width - self.padding.left - self.padding.right
    }

    /// Height available to data
    pub fn plot_height(&self, viewport: &Viewport) -> f64 {
        viewport.height - self.padding.top - self.padding.bottom
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            padding: Padding::default(),
            x: Scale::new(0.0, 1.0),
            y: Scale::new(0.0, 1.0),
        }
    }
}
