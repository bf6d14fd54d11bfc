//! An event source that replays a fixed list of events.
//!
//! Used by integration tests to drive a [`GestureSession`] end to end without
//! a display server.  Every disposition the handler returns is recorded, and
//! a [`Disposition::Rearm`] is counted the way the macOS tap would re-enable
//! itself.
//!
//! [`GestureSession`]: crate::application::gesture_session::GestureSession

use std::sync::Mutex;

use gesture_core::{ButtonEvent, Disposition};
use tracing::trace;

use super::{EventSource, EventSourceError};
use crate::application::gesture_session::ButtonEventHandler;

/// Replays a scripted event sequence.
#[derive(Default)]
pub struct ScriptedEventSource {
    events: Vec<ButtonEvent>,
    /// Disposition returned for each delivered event, in order.
    pub dispositions: Mutex<Vec<Disposition>>,
    /// Number of times the source re-armed itself.
    pub rearms: Mutex<usize>,
}

impl ScriptedEventSource {
    pub fn new(events: Vec<ButtonEvent>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }
}

impl EventSource for ScriptedEventSource {
    fn run(&mut self, handler: &mut dyn ButtonEventHandler) -> Result<(), EventSourceError> {
        for event in self.events.drain(..) {
            let disposition = handler.handle_event(event);
            trace!("scripted {event:?} -> {disposition:?}");
            if disposition == Disposition::Rearm {
                *self.rearms.lock().unwrap_or_else(|p| p.into_inner()) += 1;
            }
            self.dispositions
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .push(disposition);
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
