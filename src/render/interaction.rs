//! Pointer interaction: wheel zoom, drag pan, hover tracking

use serde::{Deserialize, Serialize};

use super::mapper::Point;
use super::viewport::Viewport;

/// Zoom factor for a wheel step away from the user
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// Zoom factor for a wheel step towards the user
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// Pointer input in surface coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Wheel { delta_y: f64 },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Leave,
}

/// Drag and hover state of one chart
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    drag_origin: Option<Point>,
    pointer: Option<Point>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    /// Last pointer position over the chart
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Apply an event, returning whether the viewport changed
    pub fn handle(&mut self, event: PointerEvent, viewport: &mut Viewport) -> bool {
        match event {
            PointerEvent::Wheel { delta_y } => {
                let before = viewport.zoom_scale;
                viewport.zoom_by(if delta_y > 0.0 { ZOOM_OUT_FACTOR } else { ZOOM_IN_FACTOR });
                viewport.zoom_scale != before
            }
            PointerEvent::Down { x, y } => {
                self.drag_origin = Some(Point::new(x, y));
                self.pointer = Some(Point::new(x, y));
                false
            }
            PointerEvent::Move { x, y } => {
                self.pointer = Some(Point::new(x, y));
                match self.drag_origin {
                    Some(origin) => {
                        viewport.pan_by(x - origin.x, y - origin.y);
                        self.drag_origin = Some(Point::new(x, y));
                        x != origin.x || y != origin.y
                    }
                    None => false,
                }
            }
            PointerEvent::Up => {
                self.drag_origin = None;
                false
            }
            PointerEvent::Leave => {
                self.drag_origin = None;
                self.pointer = None;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::viewport::{MAX_ZOOM, MIN_ZOOM};

    #[test]
    fn test_wheel_zoom_direction() {
        let mut viewport = Viewport::default();
        let mut interaction = Interaction::new();

        assert!(interaction.handle(PointerEvent::Wheel { delta_y: 120.0 }, &mut viewport));
        assert!((viewport.zoom_scale - 0.9).abs() < 1e-12);

        interaction.handle(PointerEvent::Wheel { delta_y: -120.0 }, &mut viewport);
        assert!((viewport.zoom_scale - 0.99).abs() < 1e-12);
    }

    #[test]
    fn test_wheel_zoom_clamped() {
        let mut viewport = Viewport::default();
        let mut interaction = Interaction::new();
        for _ in 0..100 {
            interaction.handle(PointerEvent::Wheel { delta_y: -1.0 }, &mut viewport);
        }
        assert_eq!(viewport.zoom_scale, MAX_ZOOM);
        assert!(!interaction.handle(PointerEvent::Wheel { delta_y: -1.0 }, &mut viewport));

        for _ in 0..100 {
            interaction.handle(PointerEvent::Wheel { delta_y: 1.0 }, &mut viewport);
        }
        assert_eq!(viewport.zoom_scale, MIN_ZOOM);
    }

    #[test]
    fn test_drag_pans_only_while_held() {
        let mut viewport = Viewport::default();
        let mut interaction = Interaction::new();

        assert!(!interaction.handle(PointerEvent::Move { x: 10.0, y: 10.0 }, &mut viewport));
        assert_eq!(viewport.offset_x, 0.0);

        interaction.handle(PointerEvent::Down { x: 10.0, y: 10.0 }, &mut viewport);
        assert!(interaction.handle(PointerEvent::Move { x: 25.0, y: 5.0 }, &mut viewport));
        assert!(interaction.handle(PointerEvent::Move { x: 30.0, y: 5.0 }, &mut viewport));
        assert_eq!((viewport.offset_x, viewport.offset_y), (20.0, -5.0));

        interaction.handle(PointerEvent::Up, &mut viewport);
        interaction.handle(PointerEvent::Move { x: 100.0, y: 100.0 }, &mut viewport);
        assert_eq!((viewport.offset_x, viewport.offset_y), (20.0, -5.0));
    }

    #[test]
    fn test_leave_ends_drag() {
        let mut viewport = Viewport::default();
        let mut interaction = Interaction::new();
        interaction.handle(PointerEvent::Down { x: 0.0, y: 0.0 }, &mut viewport);
        interaction.handle(PointerEvent::Leave, &mut viewport);

        assert!(!interaction.is_dragging());
        assert_eq!(interaction.pointer(), None);
        interaction.handle(PointerEvent::Move { x: 50.0, y: 50.0 }, &mut viewport);
        assert_eq!(viewport.offset_x, 0.0);
    }

    #[test]
    fn test_event_deserialize() {
        let event: PointerEvent = serde_json::from_str(r#"{"type":"wheel","delta_y":-3.0}"#).unwrap();
        assert_eq!(event, PointerEvent::Wheel { delta_y: -3.0 });
    }
}
