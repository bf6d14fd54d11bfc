//! Gesture outcomes and the displacement classifier.
//!
//! A completed drag is reduced to its displacement `(dx, dy)` from the press
//! origin to the release point (Y grows downward) and mapped onto one of a
//! fixed set of directional outcomes.

use std::fmt;

/// Horizontal travel needed for a left/right swipe.
const SWIPE_MIN: f64 = 50.0;
/// Maximum vertical wobble tolerated by a left/right swipe.
const SWIPE_MAX_WOBBLE: f64 = 50.0;
/// Maximum horizontal drift for a straight-up swipe.
const UP_MAX_DRIFT: f64 = 30.0;
/// Upward travel needed for a straight-up swipe.
const UP_MIN: f64 = 50.0;
/// Horizontal travel needed for a diagonal up-left / up-right swipe.
const DIAGONAL_MIN_X: f64 = 30.0;
/// Upward travel needed for a diagonal swipe.
const DIAGONAL_MIN_UP: f64 = 25.0;

/// The result of classifying one press-drag-release cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureOutcome {
    /// Swipe left.
    Back,
    /// Swipe right.
    Forward,
    /// Swipe up-left.
    CloseTab,
    /// Swipe up-right.
    NewTab,
    /// Swipe straight up.
    MissionControl,
    /// The displacement matched no rule.
    None,
}

impl GestureOutcome {
    /// Every outcome that can be bound to an action.
    pub const ACTIONABLE: [GestureOutcome; 5] = [
        GestureOutcome::Back,
        GestureOutcome::Forward,
        GestureOutcome::CloseTab,
        GestureOutcome::NewTab,
        GestureOutcome::MissionControl,
    ];
}

impl fmt::Display for GestureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GestureOutcome::Back => "back",
            GestureOutcome::Forward => "forward",
            GestureOutcome::CloseTab => "close-tab",
            GestureOutcome::NewTab => "new-tab",
            GestureOutcome::MissionControl => "mission-control",
            GestureOutcome::None => "none",
        };
        f.write_str(name)
    }
}

/// Maps a drag displacement onto a [`GestureOutcome`].
///
/// Rules are evaluated in order and the first match wins.  The bands overlap
/// and also leave gaps (e.g. `dx = -40, dy = -60` is too far left for a
/// straight-up swipe and too far up for a back swipe, yet still lands in
/// close-tab); the order below is the tie-break and must not be rewritten as
/// disjoint regions.
///
/// ```
/// use gesture_core::{classify, GestureOutcome};
///
/// assert_eq!(classify(-60.0, 0.0), GestureOutcome::Back);
/// assert_eq!(classify(0.0, -80.0), GestureOutcome::MissionControl);
/// assert_eq!(classify(5.0, 5.0), GestureOutcome::None);
/// ```
pub fn classify(dx: f64, dy: f64) -> GestureOutcome {
    if dx < -SWIPE_MIN && dy.abs() < SWIPE_MAX_WOBBLE {
        GestureOutcome::Back
    } else if dx > SWIPE_MIN && dy.abs() < SWIPE_MAX_WOBBLE {
        GestureOutcome::Forward
    } else if dx.abs() < UP_MAX_DRIFT && dy < -UP_MIN {
        GestureOutcome::MissionControl
    } else if dx < -DIAGONAL_MIN_X && dy < -DIAGONAL_MIN_UP {
        GestureOutcome::CloseTab
    } else if dx > DIAGONAL_MIN_X && dy < -DIAGONAL_MIN_UP {
        GestureOutcome::NewTab
    } else {
        GestureOutcome::None
    }
}
