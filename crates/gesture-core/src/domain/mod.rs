//! Domain entities for Mouse Gestures.
//!
//! Pure logic with no OS dependencies: the types here can be constructed and
//! exercised in any test without a display, an event tap, or a keyboard.

/// Button events delivered by the event source and the pass-through decision.
pub mod event;
/// Points and display frames in global screen coordinates.
pub mod geometry;
/// Gesture outcomes and the displacement classifier.
pub mod gesture;
/// The drag state machine's state.
pub mod session;
