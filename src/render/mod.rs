//! Chart Rendering
//!
//! Turns sample series into drawings:
//!
//! - **viewport**: Per-chart size, pan offset and zoom
//! - **config**: Padding and x/y scale domains derived from series stats
//! - **mapper**: Data → surface coordinate projection
//! - **surface**: The `Surface` drawing seam plus SVG and recording backends
//! - **chart**: Line, bar, scatter and heatmap drawing, grid and axes
//! - **hover**: Nearest-sample lookup under the pointer
//! - **interaction**: Wheel zoom and drag pan
//! - **renderer**: Stateful, frame-throttled chart renderer
//! - **error**: Error types
//!
//! # Frame
//!
//! ```text
//! clear → grid → chart → axis labels → hover marker
//!                (heatmap: chart → grid)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use pulseboard::render::{render_svg, ChartKind};
//! use pulseboard::stream::Sample;
//!
//! let samples: Vec<Sample> = (0..100).map(|i| Sample::new(i * 100, 60.0)).collect();
//! let svg = render_svg(ChartKind::Line, &samples, 800.0, 400.0);
//! assert!(svg.starts_with("<svg"));
//! ```

pub mod chart;
pub mod config;
pub mod error;
pub mod hover;
pub mod interaction;
pub mod mapper;
pub mod renderer;
pub mod surface;
pub mod viewport;

pub use chart::{draw_frame, ChartKind, ChartStyle};
pub use config::{ChartConfig, Padding, Scale};
pub use error::{RenderError, RenderResult};
pub use hover::find_nearest;
pub use interaction::{Interaction, PointerEvent};
pub use mapper::{map_to_surface, Point};
pub use renderer::{render_svg, ChartRenderer, FrameThrottle};
pub use surface::{Color, DrawCommand, RecordingSurface, Surface, SvgSurface, TextAnchor, TextStyle};
pub use viewport::Viewport;
