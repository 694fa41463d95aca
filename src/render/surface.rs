//! Drawing surfaces
//!
//! [`Surface`] is the seam between chart drawing and the drawing target.
//! Two backends ship with the crate:
//!
//! - [`SvgSurface`]: builds an SVG document, served by the chart endpoint
//! - [`RecordingSurface`]: records every call as a [`DrawCommand`]

use serde::Serialize;
use std::fmt::Write as _;

use super::mapper::Point;

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Horizontal text alignment relative to the anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn as_svg(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub color: Color,
    pub font_size: f64,
    pub anchor: TextAnchor,
}

/// A drawing target
pub trait Surface {
    /// Whether the surface can currently be drawn on
    fn is_ready(&self) -> bool {
        true
    }

    /// Fill the whole surface
    fn clear(&mut self, width: f64, height: f64, background: Color);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);

    /// Stroke an open polyline through `points`
    fn stroke_path(&mut self, points: &[Point], color: Color, line_width: f64);

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, line_width: f64);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);

    fn fill_text(&mut self, text: &str, at: Point, style: TextStyle);
}

/// One recorded surface call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
        background: Color,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    Path {
        points: Vec<Point>,
        color: Color,
        line_width: f64,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        line_width: f64,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Color,
    },
    Text {
        text: String,
        at: Point,
        style: TextStyle,
    },
}

/// Surface that records calls instead of drawing
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    ready: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            ready: true,
        }
    }

    /// A surface that reports itself as not ready
    pub fn detached() -> Self {
        Self {
            commands: Vec::new(),
            ready: false,
        }
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of `Clear` calls, i.e. full redraws
    pub fn frame_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear { .. }))
            .count()
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for RecordingSurface {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn clear(&mut self, width: f64, height: f64, background: Color) {
        self.commands.push(DrawCommand::Clear {
            width,
            height,
            background,
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn stroke_path(&mut self, points: &[Point], color: Color, line_width: f64) {
        self.commands.push(DrawCommand::Path {
            points: points.to_vec(),
            color,
            line_width,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, line_width: f64) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            line_width,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, at: Point, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            style,
        });
    }
}

/// Surface that renders into an SVG document.
///
/// `clear` starts a new document; [`finish`](Self::finish) closes it.
#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    body: String,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    /// The complete SVG document
    pub fn finish(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{body}</svg>"#,
            w = fmt_num(self.width),
            h = fmt_num(self.height),
            body = self.body
        )
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self, width: f64, height: f64, background: Color) {
        self.width = width;
        self.height = height;
        self.body.clear();
        self.fill_rect(0.0, 0.0, width, height, background);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        let _ = write!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            fmt_num(x),
            fmt_num(y),
            fmt_num(width),
            fmt_num(height),
            color
        );
    }

    fn stroke_path(&mut self, points: &[Point], color: Color, line_width: f64) {
        if points.is_empty() {
            return;
        }
        let coords: Vec<String> = points
            .iter()
            .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
            .collect();
        let _ = write!(
            self.body,
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            coords.join(" "),
            color,
            fmt_num(line_width)
        );
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, line_width: f64) {
        let _ = write!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
            fmt_num(from.x),
            fmt_num(from.y),
            fmt_num(to.x),
            fmt_num(to.y),
            color,
            fmt_num(line_width)
        );
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        let _ = write!(
            self.body,
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            fmt_num(center.x),
            fmt_num(center.y),
            fmt_num(radius),
            color
        );
    }

    fn fill_text(&mut self, text: &str, at: Point, style: TextStyle) {
        let _ = write!(
            self.body,
            r#"<text x="{}" y="{}" fill="{}" font-size="{}" font-family="sans-serif" text-anchor="{}">{}</text>"#,
            fmt_num(at.x),
            fmt_num(at.y),
            style.color,
            fmt_num(style.font_size),
            style.anchor.as_svg(),
            escape_xml(text)
        );
    }
}

/// Two decimals, trailing zeros trimmed
fn fmt_num(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        let blue = Color::from_hex("#3b82f6").unwrap();
        assert_eq!(blue, Color::rgb(0x3b, 0x82, 0xf6));
        assert_eq!(blue.to_hex(), "#3b82f6");
        assert_eq!(Color::from_hex("3b82f6"), None);
        assert_eq!(Color::from_hex("#3b82"), None);
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(1.256), "1.26");
        assert_eq!(fmt_num(-0.001), "0");
        assert_eq!(fmt_num(120.5), "120.5");
    }

    #[test]
    fn test_svg_document() {
        let mut svg = SvgSurface::new(100.0, 50.0);
        svg.clear(100.0, 50.0, Color::WHITE);
        svg.stroke_path(
            &[Point::new(0.0, 0.0), Point::new(10.0, 5.5)],
            Color::rgb(0, 0, 0),
            2.0,
        );
        svg.fill_text(
            "a<b",
            Point::new(1.0, 2.0),
            TextStyle {
                color: Color::rgb(1, 2, 3),
                font_size: 12.0,
                anchor: TextAnchor::Middle,
            },
        );

        let doc = svg.finish();
        assert!(doc.starts_with("<svg"));
        assert!(doc.ends_with("</svg>"));
        assert!(doc.contains(r##"<rect x="0" y="0" width="100" height="50" fill="#ffffff"/>"##));
        assert!(doc.contains(r#"points="0,0 10,5.5""#));
        assert!(doc.contains("a&lt;b"));
    }

    #[test]
    fn test_clear_restarts_document() {
        let mut svg = SvgSurface::new(10.0, 10.0);
        svg.fill_circle(Point::new(1.0, 1.0), 4.0, Color::WHITE);
        svg.clear(20.0, 20.0, Color::WHITE);
        assert!(!svg.finish().contains("<circle"));
    }

    #[test]
    fn test_recording_surface() {
        let mut surface = RecordingSurface::new();
        assert!(surface.is_ready());
        surface.clear(10.0, 10.0, Color::WHITE);
        surface.fill_circle(Point::new(1.0, 1.0), 4.0, Color::WHITE);
        assert_eq!(surface.frame_count(), 1);
        assert_eq!(surface.commands().len(), 2);
        assert_eq!(surface.take_commands().len(), 2);
        assert!(surface.commands().is_empty());

        assert!(!RecordingSurface::detached().is_ready());
    }
}
