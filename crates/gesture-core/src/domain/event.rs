//! Secondary-button events as seen by the gesture pipeline.

use std::time::Duration;

use super::geometry::Point;

/// A secondary-button transition delivered by the event source.
///
/// `at` is a monotonic timestamp measured from an arbitrary epoch chosen by
/// the event source; only differences between timestamps are meaningful.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ButtonEvent {
    /// The secondary button went down.
    Down { point: Point, at: Duration },
    /// The pointer moved while the secondary button was held.
    Dragged { point: Point, at: Duration },
    /// The secondary button was released.
    Up { point: Point, at: Duration },
    /// The platform disabled the monitoring facility (timeout or user input).
    TapSuspended { at: Duration },
}

impl ButtonEvent {
    /// The event's monotonic timestamp.
    pub fn at(&self) -> Duration {
        match *self {
            ButtonEvent::Down { at, .. }
            | ButtonEvent::Dragged { at, .. }
            | ButtonEvent::Up { at, .. }
            | ButtonEvent::TapSuspended { at } => at,
        }
    }

    /// The pointer location, if the event carries one.
    pub fn point(&self) -> Option<Point> {
        match *self {
            ButtonEvent::Down { point, .. }
            | ButtonEvent::Dragged { point, .. }
            | ButtonEvent::Up { point, .. } => Some(point),
            ButtonEvent::TapSuspended { .. } => None,
        }
    }
}

/// What the event source must do with the event it just delivered.
///
/// Button events are never suppressed: a plain click must reach the platform
/// untouched so the native context menu still opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Forward the event to the platform unmodified.
    PassThrough,
    /// Re-enable the monitoring facility, then continue.
    Rearm,
}
