//! Stateful chart renderer
//!
//! A [`ChartRenderer`] owns everything one on-screen chart needs: the
//! current samples and derived [`ChartConfig`], its [`Viewport`], pointer
//! [`Interaction`] state and an optional [`Surface`].
//!
//! Redraws are driven by [`ChartRenderer::on_frame`] and throttled to one
//! per frame interval. Structural changes (data length, size) redraw
//! immediately. Without a ready surface every redraw is skipped.

use chrono::Utc;
use std::time::{Duration, Instant};

use super::chart::{draw_frame, ChartKind, ChartStyle};
use super::config::ChartConfig;
use super::error::{RenderError, RenderResult};
use super::hover::{draw_hover_marker, find_nearest};
use super::interaction::{Interaction, PointerEvent};
use super::surface::{Surface, SvgSurface};
use super::viewport::Viewport;
use crate::aggregate::calculate_stats;
use crate::stream::Sample;

/// Default minimum time between redraws (~60 fps)
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Allows at most one frame per interval
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    interval: Duration,
    last_frame: Option<Instant>,
}

impl FrameThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_frame: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a frame may be drawn at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_frame {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Record that a frame was drawn at `now`
    pub fn mark(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }
}

impl Default for FrameThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

/// Renders one chart onto a surface
pub struct ChartRenderer<S: Surface> {
    kind: ChartKind,
    style: ChartStyle,
    viewport: Viewport,
    interaction: Interaction,
    surface: Option<S>,
    samples: Vec<Sample>,
    config: ChartConfig,
    throttle: FrameThrottle,
    hovered: Option<usize>,
    frames: u64,
}

impl<S: Surface> ChartRenderer<S> {
    /// Create a renderer with no surface attached
    pub fn new(kind: ChartKind, width: f64, height: f64) -> Self {
        let now_ms = Utc::now().timestamp_millis();
        Self {
            kind,
            style: ChartStyle::default(),
            viewport: Viewport::new(width, height),
            interaction: Interaction::new(),
            surface: None,
            samples: Vec::new(),
            config: ChartConfig::from_stats(&calculate_stats(&[]), kind, now_ms),
            throttle: FrameThrottle::default(),
            hovered: None,
            frames: 0,
        }
    }

    /// Builder: attach a surface
    pub fn with_surface(mut self, surface: S) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Builder: override the frame interval
    pub fn frame_interval(mut self, interval: Duration) -> Self {
        self.throttle = FrameThrottle::new(interval);
        self
    }

    /// Builder: override colours and sizes
    pub fn style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    pub fn attach(&mut self, surface: S) {
        self.surface = Some(surface);
    }

    pub fn detach(&mut self) -> Option<S> {
        self.surface.take()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of frames drawn so far
    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    /// Sample currently under the pointer
    pub fn hovered(&self) -> Option<&Sample> {
        self.hovered.and_then(|i| self.samples.get(i))
    }

    /// Replace the data. A change in length redraws immediately.
    pub fn set_data(&mut self, samples: Vec<Sample>) {
        let length_changed = samples.len() != self.samples.len();
        self.samples = samples;
        self.config = ChartConfig::from_stats(
            &calculate_stats(&self.samples),
            self.kind,
            Utc::now().timestamp_millis(),
        );
        self.update_hover();

        if length_changed {
            self.redraw_now();
        }
    }

    /// Change the chart size. New dimensions redraw immediately.
    pub fn resize(&mut self, width: f64, height: f64) -> RenderResult<()> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        if self.viewport.resize(width, height) {
            self.redraw_now();
        }
        Ok(())
    }

    /// Feed a pointer event
    pub fn handle_event(&mut self, event: PointerEvent) {
        self.interaction.handle(event, &mut self.viewport);
        self.update_hover();
    }

    /// Per-frame tick; redraws if a frame interval has passed since the
    /// last redraw. Returns whether a frame was drawn.
    pub fn on_frame(&mut self, now: Instant) -> bool {
        if !self.throttle.is_due(now) {
            return false;
        }
        match self.render() {
            Ok(()) => {
                self.throttle.mark(now);
                true
            }
            Err(_) => false,
        }
    }

    /// Draw one full frame now
    pub fn render(&mut self) -> RenderResult<()> {
        let surface = self.surface.as_mut().ok_or(RenderError::SurfaceUnavailable)?;
        if !surface.is_ready() {
            return Err(RenderError::SurfaceNotReady);
        }

        draw_frame(
            surface,
            self.kind,
            &self.samples,
            &self.config,
            &self.viewport,
            &self.style,
        );
        if let Some(sample) = self.hovered.and_then(|i| self.samples.get(i)) {
            draw_hover_marker(surface, self.kind, sample, &self.config, &self.viewport, &self.style);
        }

        self.frames += 1;
        Ok(())
    }

    fn redraw_now(&mut self) {
        match self.render() {
            Ok(()) => self.throttle.mark(Instant::now()),
            Err(e) => tracing::trace!(error = %e, kind = %self.kind, "Skipping redraw"),
        }
    }

    fn update_hover(&mut self) {
        self.hovered = self.interaction.pointer().and_then(|pointer| {
            find_nearest(self.kind, &self.samples, &self.config, &self.viewport, pointer)
        });
    }
}

/// Render samples as a standalone SVG document
pub fn render_svg(kind: ChartKind, samples: &[Sample], width: f64, height: f64) -> String {
    let mut renderer =
        ChartRenderer::new(kind, width, height).with_surface(SvgSurface::new(width, height));
    renderer.set_data(samples.to_vec());
    if renderer.frames_drawn() == 0 {
        // Empty data leaves the length unchanged, so nothing was drawn yet
        if let Err(e) = renderer.render() {
            tracing::trace!(error = %e, kind = %kind, "Skipping SVG render");
        }
    }
    renderer
        .surface()
        .map(SvgSurface::finish)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::{DrawCommand, RecordingSurface};

    fn samples(n: i64) -> Vec<Sample> {
        (0..n).map(|i| Sample::new(1_000 + i * 100, 50.0 + i as f64)).collect()
    }

    fn renderer() -> ChartRenderer<RecordingSurface> {
        ChartRenderer::new(ChartKind::Line, 800.0, 400.0).with_surface(RecordingSurface::new())
    }

    fn frames(renderer: &ChartRenderer<RecordingSurface>) -> usize {
        renderer.surface().map(|s| s.frame_count()).unwrap_or(0)
    }

    #[test]
    fn test_throttle() {
        let mut throttle = FrameThrottle::new(Duration::from_millis(16));
        let start = Instant::now();
        assert!(throttle.is_due(start));
        throttle.mark(start);
        assert!(!throttle.is_due(start + Duration::from_millis(15)));
        assert!(throttle.is_due(start + Duration::from_millis(16)));
    }

    #[test]
    fn test_on_frame_is_throttled() {
        let mut renderer = renderer();
        let start = Instant::now();

        assert!(renderer.on_frame(start));
        assert!(!renderer.on_frame(start + Duration::from_millis(5)));
        assert!(!renderer.on_frame(start + Duration::from_millis(15)));
        assert!(renderer.on_frame(start + Duration::from_millis(16)));
        assert_eq!(frames(&renderer), 2);
    }

    #[test]
    fn test_length_change_forces_redraw() {
        let mut renderer = renderer();
        renderer.set_data(samples(10));
        assert_eq!(frames(&renderer), 1);

        // Same length: waits for the next frame
        renderer.set_data(samples(10));
        assert_eq!(frames(&renderer), 1);

        renderer.set_data(samples(11));
        assert_eq!(frames(&renderer), 2);
        assert_eq!(renderer.config().x.min, 1_000.0);
    }

    #[test]
    fn test_resize_forces_redraw() {
        let mut renderer = renderer();
        renderer.resize(800.0, 400.0).unwrap();
        assert_eq!(frames(&renderer), 0);

        renderer.resize(1024.0, 400.0).unwrap();
        assert_eq!(frames(&renderer), 1);
        assert_eq!(renderer.viewport().width, 1024.0);

        assert_eq!(
            renderer.resize(0.0, 10.0),
            Err(RenderError::InvalidDimensions { width: 0.0, height: 10.0 })
        );
    }

    #[test]
    fn test_missing_surface_is_noop() {
        let mut renderer: ChartRenderer<RecordingSurface> =
            ChartRenderer::new(ChartKind::Bar, 800.0, 400.0);
        renderer.set_data(samples(5));
        assert!(!renderer.on_frame(Instant::now()));
        assert_eq!(renderer.render(), Err(RenderError::SurfaceUnavailable));
        assert_eq!(renderer.frames_drawn(), 0);
    }

    #[test]
    fn test_unready_surface_is_noop() {
        let mut renderer = ChartRenderer::new(ChartKind::Scatter, 800.0, 400.0)
            .with_surface(RecordingSurface::detached());
        renderer.set_data(samples(5));
        assert!(!renderer.on_frame(Instant::now()));
        assert_eq!(frames(&renderer), 0);

        if let Some(surface) = renderer.surface_mut() {
            surface.set_ready(true);
        }
        assert!(renderer.on_frame(Instant::now()));
    }

    #[test]
    fn test_hover_marker_drawn() {
        let mut renderer = renderer();
        renderer.set_data(samples(10));
        renderer.handle_event(PointerEvent::Move { x: 61.0, y: 100.0 });
        assert_eq!(renderer.hovered().map(|s| s.timestamp), Some(1_000));

        if let Some(surface) = renderer.surface_mut() {
            surface.take_commands();
        }
        renderer.render().unwrap();
        let texts = renderer
            .surface()
            .unwrap()
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { text, .. } if text == "50.0"))
            .count();
        assert_eq!(texts, 1);

        renderer.handle_event(PointerEvent::Leave);
        assert!(renderer.hovered().is_none());
    }

    #[test]
    fn test_interaction_moves_viewport() {
        let mut renderer = renderer();
        renderer.handle_event(PointerEvent::Wheel { delta_y: -1.0 });
        assert!((renderer.viewport().zoom_scale - 1.1).abs() < 1e-12);

        renderer.handle_event(PointerEvent::Down { x: 0.0, y: 0.0 });
        renderer.handle_event(PointerEvent::Move { x: 12.0, y: 3.0 });
        renderer.handle_event(PointerEvent::Up);
        assert_eq!(renderer.viewport().offset_x, 12.0);
    }

    #[test]
    fn test_render_svg() {
        let svg = render_svg(ChartKind::Line, &samples(20), 640.0, 320.0);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<polyline"));

        let empty = render_svg(ChartKind::Heatmap, &[], 640.0, 320.0);
        assert!(empty.contains("<line"));
        assert!(!empty.contains("<polyline"));
    }
}
