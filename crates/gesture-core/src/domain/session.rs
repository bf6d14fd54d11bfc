//! State of the single in-flight secondary-button gesture.
//!
//! The state machine has three states:
//!
//! ```text
//!            Down                 Dragged (≥ threshold)
//!   Idle ──────────▶ Pressed ─────────────────────────▶ Dragging
//!    ▲                  │                                  │
//!    └──────── Up ──────┴─────────────── Up ───────────────┘
//! ```
//!
//! Being in `Pressed` or `Dragging` is what makes a release eligible to fire;
//! an `Up` seen while `Idle` (a duplicate release, or one whose press was
//! never observed) is passed through without classification.

use std::time::Duration;

use super::geometry::Point;

/// Minimum pointer travel, in pixels, that turns a press into a drag.
pub const DRAG_THRESHOLD_PX: f64 = 8.0;

/// [`DRAG_THRESHOLD_PX`] squared, compared against squared distances.
pub const DRAG_THRESHOLD_SQUARED: f64 = DRAG_THRESHOLD_PX * DRAG_THRESHOLD_PX;

/// The drag state owned by the gesture session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SessionState {
    /// No secondary-button press is being tracked.
    #[default]
    Idle,
    /// The button is down but has not travelled past the drag threshold.
    Pressed { origin: Point, pressed_at: Duration },
    /// The button is down and has travelled past the drag threshold.
    Dragging { origin: Point, pressed_at: Duration },
}

impl SessionState {
    /// The press origin, if a press is in flight.
    pub fn origin(&self) -> Option<Point> {
        match *self {
            SessionState::Idle => None,
            SessionState::Pressed { origin, .. } | SessionState::Dragging { origin, .. } => {
                Some(origin)
            }
        }
    }

    /// Returns `true` if a release would be eligible to fire an action.
    pub fn is_pending_fire(&self) -> bool {
        !matches!(self, SessionState::Idle)
    }

    /// Returns `true` once the drag threshold has been exceeded.
    pub fn exceeded_threshold(&self) -> bool {
        matches!(self, SessionState::Dragging { .. })
    }

    /// Applies a pointer move.
    ///
    /// Returns `true` exactly once per press: on the move that first carries
    /// the pointer [`DRAG_THRESHOLD_PX`] or further from the origin.
    pub fn on_drag(&mut self, point: Point) -> bool {
        if let SessionState::Pressed { origin, pressed_at } = *self {
            if origin.distance_squared(point) >= DRAG_THRESHOLD_SQUARED {
                *self = SessionState::Dragging { origin, pressed_at };
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed_at(x: f64, y: f64) -> SessionState {
        SessionState::Pressed {
            origin: Point::new(x, y),
            pressed_at: Duration::ZERO,
        }
    }

    #[test]
    fn test_idle_has_no_origin_and_is_not_pending() {
        let s = SessionState::default();
        assert_eq!(s.origin(), None);
        assert!(!s.is_pending_fire());
        assert!(!s.exceeded_threshold());
    }

    #[test]
    fn test_small_moves_stay_pressed() {
        // Arrange
        let mut s = pressed_at(100.0, 100.0);

        // Act – 5,5 is ~7.07 px away, under the 8 px threshold
        let crossed = s.on_drag(Point::new(105.0, 105.0));

        // Assert
        assert!(!crossed);
        assert!(!s.exceeded_threshold());
        assert!(s.is_pending_fire());
    }

    #[test]
    fn test_threshold_is_inclusive_and_reported_once() {
        // Arrange
        let mut s = pressed_at(0.0, 0.0);

        // Act / Assert – exactly 8 px crosses
        assert!(s.on_drag(Point::new(8.0, 0.0)));
        assert!(s.exceeded_threshold());
        // Later moves do not report a second crossing.
        assert!(!s.on_drag(Point::new(80.0, 0.0)));
        assert_eq!(s.origin(), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_drag_while_idle_is_ignored() {
        let mut s = SessionState::Idle;
        assert!(!s.on_drag(Point::new(500.0, 500.0)));
        assert_eq!(s, SessionState::Idle);
    }
}
