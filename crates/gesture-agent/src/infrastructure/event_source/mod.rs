//! Sources of secondary-button events.
//!
//! An [`EventSource`] owns the delivery loop: it blocks the calling thread,
//! hands each event to a [`ButtonEventHandler`] in the order the platform
//! produced them, and acts on the returned
//! [`Disposition`](gesture_core::Disposition).
//!
//! | Module     | Platform | Mechanism                                   |
//! |------------|----------|---------------------------------------------|
//! | `macos`    | macOS    | `CGEventTapCreate` on the current run loop  |
//! | `scripted` | any      | a fixed list of events, for tests           |

use thiserror::Error;

use crate::application::gesture_session::ButtonEventHandler;

pub mod scripted;

#[cfg(target_os = "macos")]
pub mod macos;

/// Error type for installing or running an event source.
#[derive(Debug, Error)]
pub enum EventSourceError {
    /// The process lacks the accessibility / input-monitoring grant.
    #[error(
        "not trusted for accessibility; grant access in System Settings > \
         Privacy & Security > Accessibility and restart"
    )]
    NotTrusted,
    /// The platform refused to create the event tap.
    #[error("failed to create the event tap")]
    TapCreation,
    /// The run-loop source for the tap could not be created.
    #[error("failed to create the run loop source for the event tap")]
    RunLoopSource,
    /// No event source exists for this platform.
    #[error("no event source is available on this platform")]
    Unsupported,
}

/// Delivers button events to a handler until the source stops.
pub trait EventSource {
    /// Runs the delivery loop on the current thread.
    ///
    /// # Errors
    ///
    /// Returns [`EventSourceError`] if the source cannot be installed.
    /// Handler failures never surface here.
    fn run(&mut self, handler: &mut dyn ButtonEventHandler) -> Result<(), EventSourceError>;
}
