//! macOS key injection via Core Graphics.
//!
//! Each transition is a `CGEventCreateKeyboardEvent` from an HID-system-state
//! event source, with its flags replaced by exactly the requested modifiers,
//! posted at `kCGHIDEventTap` so it enters the stream like hardware input.
//!
//! Posting requires the Accessibility grant; without it `CGEventPost`
//! silently drops the event.

#![cfg(target_os = "macos")]

use core_graphics::event::{CGEvent, CGEventFlags, CGEventTapLocation};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use gesture_core::{KeyCode, ModifierFlags};
use tracing::trace;

use crate::application::synthesize_input::{InjectionError, KeyInjector};

/// Posts keyboard events through `CGEventPost`.
#[derive(Debug, Default)]
pub struct CgKeyInjector;

impl CgKeyInjector {
    pub fn new() -> Self {
        Self
    }
}

/// Maps our modifier set onto `CGEventFlags`.
fn cg_flags(modifiers: ModifierFlags) -> CGEventFlags {
    let mut flags = CGEventFlags::CGEventFlagNull;
    if modifiers.shift() {
        flags |= CGEventFlags::CGEventFlagShift;
    }
    if modifiers.control() {
        flags |= CGEventFlags::CGEventFlagControl;
    }
    if modifiers.option() {
        flags |= CGEventFlags::CGEventFlagAlternate;
    }
    if modifiers.command() {
        flags |= CGEventFlags::CGEventFlagCommand;
    }
    flags
}

impl KeyInjector for CgKeyInjector {
    fn post_key(
        &self,
        code: KeyCode,
        modifiers: ModifierFlags,
        key_down: bool,
    ) -> Result<(), InjectionError> {
        let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState)
            .map_err(|_| InjectionError::SourceUnavailable)?;
        let event = CGEvent::new_keyboard_event(source, code.0, key_down)
            .map_err(|_| InjectionError::EventCreation(code))?;
        event.set_flags(cg_flags(modifiers));
        event.post(CGEventTapLocation::HID);
        trace!("posted key {code} [{modifiers}] down={key_down}");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
