use crate::draw::model::Point;

/// On-screen rectangle the canvas occupies, in client (CSS) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub client_x: f64,
    pub client_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Mouse { client_x: f64, client_y: f64 },
    Touch { touches: Vec<TouchPoint> },
}

impl PointerEvent {
    pub fn mouse(client_x: f64, client_y: f64) -> Self {
        Self::Mouse { client_x, client_y }
    }

    pub fn touch(client_x: f64, client_y: f64) -> Self {
        Self::Touch {
            touches: vec![TouchPoint { client_x, client_y }],
        }
    }

    fn client_position(&self) -> Option<(f64, f64)> {
        match self {
            Self::Mouse { client_x, client_y } => Some((*client_x, *client_y)),
            Self::Touch { touches } => touches.first().map(|t| (t.client_x, t.client_y)),
        }
    }
}

/// Maps a client-space event into raster buffer space, scaling each axis by
/// `buffer / displayed` independently. Malformed or out-of-bounds events
/// yield `None`.
pub fn normalize(event: &PointerEvent, rect: CanvasRect, buffer: (u32, u32)) -> Option<Point> {
    let (client_x, client_y) = event.client_position()?;
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return None;
    }
    let scale_x = buffer.0 as f64 / rect.width;
    let scale_y = buffer.1 as f64 / rect.height;
    let x = (client_x - rect.left) * scale_x;
    let y = (client_y - rect.top) * scale_y;
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    if x < 0.0 || y < 0.0 || x > buffer.0 as f64 || y > buffer.1 as f64 {
        return None;
    }
    Some(Point::new(x, y))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokePhase {
    Idle,
    Drawing,
}

/// Pen state machine. Produces the segments to paint; it never touches the
/// raster or history itself.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeInput {
    phase: StrokePhase,
    cursor: Option<Point>,
}

impl Default for StrokeInput {
    fn default() -> Self {
        Self {
            phase: StrokePhase::Idle,
            cursor: None,
        }
    }
}

impl StrokeInput {
    pub fn phase(&self) -> StrokePhase {
        self.phase
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.phase, StrokePhase::Drawing)
    }

    pub fn begin(&mut self, point: Point) {
        self.phase = StrokePhase::Drawing;
        self.cursor = Some(point);
    }

    /// Returns the segment to paint, or `None` when no stroke is active.
    pub fn extend(&mut self, point: Point) -> Option<(Point, Point)> {
        if !self.is_drawing() {
            return None;
        }
        let from = self.cursor.replace(point)?;
        Some((from, point))
    }

    /// Finishes the active stroke. Returns `true` only for the first end
    /// signal of a stroke so callers snapshot exactly once.
    pub fn end(&mut self) -> bool {
        let was_drawing = self.is_drawing();
        self.phase = StrokePhase::Idle;
        self.cursor = None;
        was_drawing
    }

    pub fn cancel(&mut self) {
        self.phase = StrokePhase::Idle;
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_size_display_doubles_coordinates() {
        let rect = CanvasRect::new(0.0, 0.0, 50.0, 50.0);
        let point = normalize(&PointerEvent::mouse(5.0, 5.0), rect, (100, 100));
        assert_eq!(point, Some(Point::new(10.0, 10.0)));
    }

    #[test]
    fn axes_scale_independently_and_respect_offset() {
        let rect = CanvasRect::new(20.0, 10.0, 100.0, 400.0);
        let point = normalize(&PointerEvent::mouse(70.0, 110.0), rect, (200, 200));
        assert_eq!(point, Some(Point::new(100.0, 50.0)));
    }

    #[test]
    fn touch_uses_first_contact() {
        let rect = CanvasRect::new(0.0, 0.0, 100.0, 100.0);
        let event = PointerEvent::Touch {
            touches: vec![
                TouchPoint {
                    client_x: 3.0,
                    client_y: 4.0,
                },
                TouchPoint {
                    client_x: 90.0,
                    client_y: 90.0,
                },
            ],
        };
        assert_eq!(normalize(&event, rect, (100, 100)), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn malformed_events_are_ignored() {
        let rect = CanvasRect::new(0.0, 0.0, 100.0, 100.0);
        let empty = PointerEvent::Touch { touches: vec![] };
        assert_eq!(normalize(&empty, rect, (100, 100)), None);
        assert_eq!(
            normalize(&PointerEvent::mouse(f64::NAN, 1.0), rect, (100, 100)),
            None
        );
        assert_eq!(
            normalize(&PointerEvent::mouse(150.0, 1.0), rect, (100, 100)),
            None
        );
        let collapsed = CanvasRect::new(0.0, 0.0, 0.0, 100.0);
        assert_eq!(
            normalize(&PointerEvent::mouse(1.0, 1.0), collapsed, (100, 100)),
            None
        );
    }

    #[test]
    fn move_while_idle_is_a_no_op() {
        let mut input = StrokeInput::default();
        assert_eq!(input.extend(Point::new(1.0, 1.0)), None);
        assert_eq!(input.phase(), StrokePhase::Idle);
    }

    #[test]
    fn stroke_yields_connected_segments() {
        let mut input = StrokeInput::default();
        input.begin(Point::new(0.0, 0.0));
        assert_eq!(
            input.extend(Point::new(1.0, 0.0)),
            Some((Point::new(0.0, 0.0), Point::new(1.0, 0.0)))
        );
        assert_eq!(
            input.extend(Point::new(2.0, 1.0)),
            Some((Point::new(1.0, 0.0), Point::new(2.0, 1.0)))
        );
    }

    #[test]
    fn repeated_end_signals_finish_once() {
        let mut input = StrokeInput::default();
        input.begin(Point::new(0.0, 0.0));
        assert!(input.end());
        assert!(!input.end());
        assert!(!input.is_drawing());
    }
}
