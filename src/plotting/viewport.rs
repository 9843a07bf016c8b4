//! Pannable view rectangle.
//!
//! The x-bounds are also the sampling interval; the y-bounds only scale the chart.

/// pointer button mask of the primary button
pub const PRIMARY_BUTTON: u8 = 1;
/// pointer movement (in pixels) that shifts the view by one unit
pub const DEFAULT_DRAG_SPEED: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x_min: -10.0,
            x_max: 10.0,
            y_min: -10.0,
            y_max: 10.0,
        }
    }
}

/// One pointer-move event of a drag gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEvent {
    pub movement_x: f64,
    pub movement_y: f64,
    /// bit mask of the buttons held during the move
    pub buttons: u8,
}

impl DragEvent {
    pub fn primary(movement_x: f64, movement_y: f64) -> Self {
        Self {
            movement_x,
            movement_y,
            buttons: PRIMARY_BUTTON,
        }
    }
}

/// nearest integer, halves towards +infinity (-0.5 -> 0, 0.5 -> 1)
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

impl Viewport {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Bounds typed by the user, rounded to integers. Ordering is not validated: an
    /// inverted x-range samples to nothing.
    pub fn set_bounds(&mut self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
        self.x_min = round_half_up(x_min);
        self.x_max = round_half_up(x_max);
        self.y_min = round_half_up(y_min);
        self.y_max = round_half_up(y_max);
    }

    /// Pans the view for a pointer move. Only acts while exactly the primary button is
    /// held. Dragging right moves the window left, dragging down moves it up.
    /// Returns true if the bounds were updated; a move that would leave any bound
    /// non-finite is ignored.
    pub fn drag(&mut self, event: &DragEvent, drag_speed: f64) -> bool {
        if event.buttons != PRIMARY_BUTTON {
            return false;
        }
        let dx = event.movement_x / drag_speed;
        let dy = event.movement_y / drag_speed;
        let moved = Viewport {
            x_min: round_half_up(self.x_min - dx),
            x_max: round_half_up(self.x_max - dx),
            y_min: round_half_up(self.y_min + dy),
            y_max: round_half_up(self.y_max + dy),
        };
        if !moved.is_finite() {
            return false;
        }
        *self = moved;
        true
    }

    pub fn is_finite(&self) -> bool {
        [self.x_min, self.x_max, self.y_min, self.y_max]
            .iter()
            .all(|v| v.is_finite())
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.x_min, self.x_max)
    }

    pub fn y_range(&self) -> (f64, f64) {
        (self.y_min, self.y_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_right_moves_window_left() {
        let mut viewport = Viewport::default();
        assert!(viewport.drag(&DragEvent::primary(25.0, 0.0), DEFAULT_DRAG_SPEED));
        assert_eq!(viewport.x_range(), (-11.0, 9.0));
        assert_eq!(viewport.y_range(), (-10.0, 10.0));
    }

    #[test]
    fn test_drag_down_moves_window_up() {
        let mut viewport = Viewport::default();
        viewport.drag(&DragEvent::primary(0.0, 50.0), DEFAULT_DRAG_SPEED);
        assert_eq!(viewport.y_range(), (-8.0, 12.0));
        assert_eq!(viewport.x_range(), (-10.0, 10.0));
    }

    #[test]
    fn test_small_moves_are_rounded_away() {
        let mut viewport = Viewport::default();
        viewport.drag(&DragEvent::primary(5.0, -5.0), DEFAULT_DRAG_SPEED);
        assert_eq!(viewport, Viewport::default());
    }

    #[test]
    fn test_drag_without_primary_button_is_ignored() {
        let mut viewport = Viewport::default();
        let event = DragEvent {
            movement_x: 100.0,
            movement_y: 100.0,
            buttons: 0,
        };
        assert!(!viewport.drag(&event, DEFAULT_DRAG_SPEED));
        let event = DragEvent { buttons: 3, ..event };
        assert!(!viewport.drag(&event, DEFAULT_DRAG_SPEED));
        assert_eq!(viewport, Viewport::default());
    }

    #[test]
    fn test_non_finite_drag_is_ignored() {
        let mut viewport = Viewport::default();
        for (mx, my) in [(f64::NAN, 0.0), (0.0, f64::INFINITY), (f64::NEG_INFINITY, 0.0)] {
            assert!(!viewport.drag(&DragEvent::primary(mx, my), DEFAULT_DRAG_SPEED));
            assert_eq!(viewport, Viewport::default());
        }
        assert!(!viewport.drag(&DragEvent::primary(25.0, 0.0), 0.0));
        assert_eq!(viewport, Viewport::default());
        assert!(!Viewport::new(f64::NAN, 1.0, 0.0, 1.0).is_finite());
    }

    #[test]
    fn test_set_bounds_rounds() {
        let mut viewport = Viewport::default();
        viewport.set_bounds(-2.4, 3.5, -0.5, 7.6);
        assert_eq!(viewport, Viewport::new(-2.0, 4.0, 0.0, 8.0));
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }
}
