//! macOS event source: a Quartz event tap on the current run loop.
//!
//! The tap watches right-mouse down / dragged / up at the session level,
//! converts each into a [`ButtonEvent`] and hands it to the handler
//! synchronously inside the tap callback.  Every event is returned to the
//! system unchanged.
//!
//! Event times come from `CGEventGetTimestamp` (nanoseconds since boot), so
//! they reflect when the input happened rather than when the callback ran.
//!
//! # Tap suspension
//!
//! macOS disables a tap whose callback is too slow
//! (`kCGEventTapDisabledByTimeout`) or when secure input is toggled
//! (`kCGEventTapDisabledByUserInput`).  Both arrive as pseudo-events; they are
//! forwarded as [`ButtonEvent::TapSuspended`] and, when the handler answers
//! [`Disposition::Rearm`], the tap is re-enabled on the spot.
//!
//! # Threading
//!
//! [`MacosEventTap::run`] must be called on the thread whose run loop should
//! service the tap (normally the main thread).  It blocks in `CFRunLoopRun`
//! and the handler is only ever touched from that thread.

#![cfg(target_os = "macos")]

use std::cell::{Cell, RefCell};
use std::ffi::c_void;
use std::ptr;
use std::time::Duration;

use core_foundation::base::{CFRelease, CFTypeRef};
use core_foundation::runloop::kCFRunLoopCommonModes;
use core_foundation::string::CFStringRef;
use core_graphics::geometry::CGPoint;
use gesture_core::{ButtonEvent, Disposition, Point};
use tracing::{info, trace, warn};

use super::{EventSource, EventSourceError};
use crate::application::gesture_session::ButtonEventHandler;

type CGEventRef = CFTypeRef;
type CGEventTapProxy = *const c_void;
type CGEventMask = u64;
type TapCallback = extern "C" fn(CGEventTapProxy, u32, CGEventRef, *mut c_void) -> CGEventRef;

// CGEventTapLocation / CGEventTapPlacement / CGEventTapOptions
const SESSION_EVENT_TAP: u32 = 1;
const HEAD_INSERT_EVENT_TAP: u32 = 0;
const DEFAULT_TAP: u32 = 0;

// CGEventType
const RIGHT_MOUSE_DOWN: u32 = 3;
const RIGHT_MOUSE_UP: u32 = 4;
const RIGHT_MOUSE_DRAGGED: u32 = 7;
const TAP_DISABLED_BY_TIMEOUT: u32 = 0xFFFF_FFFE;
const TAP_DISABLED_BY_USER_INPUT: u32 = 0xFFFF_FFFF;

const EVENT_MASK: CGEventMask =
    (1 << RIGHT_MOUSE_DOWN) | (1 << RIGHT_MOUSE_UP) | (1 << RIGHT_MOUSE_DRAGGED);

#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGEventTapCreate(
        tap: u32,
        place: u32,
        options: u32,
        events_of_interest: CGEventMask,
        callback: TapCallback,
        user_info: *mut c_void,
    ) -> CFTypeRef;
    fn CGEventTapEnable(tap: CFTypeRef, enable: bool);
    fn CGEventGetLocation(event: CGEventRef) -> CGPoint;
    fn CGEventGetTimestamp(event: CGEventRef) -> u64;
}

#[link(name = "CoreFoundation", kind = "framework")]
extern "C" {
    fn CFMachPortCreateRunLoopSource(
        allocator: CFTypeRef,
        port: CFTypeRef,
        order: isize,
    ) -> CFTypeRef;
    fn CFRunLoopGetCurrent() -> CFTypeRef;
    fn CFRunLoopAddSource(rl: CFTypeRef, source: CFTypeRef, mode: CFStringRef);
    fn CFRunLoopRun();
}

/// State reachable from the tap callback through its `user_info` pointer.
struct TapContext<'a, 'h> {
    handler: RefCell<&'a mut (dyn ButtonEventHandler + 'h)>,
    /// The tap's mach port, set once the tap exists; used to re-arm it.
    tap: Cell<CFTypeRef>,
}

/// Disables and releases the tap on drop.
struct EventTapGuard(CFTypeRef);

impl Drop for EventTapGuard {
    fn drop(&mut self) {
        unsafe {
            CGEventTapEnable(self.0, false);
            CFRelease(self.0);
        }
    }
}

/// Releases the run-loop source on drop.
struct RunLoopSourceGuard(CFTypeRef);

impl Drop for RunLoopSourceGuard {
    fn drop(&mut self) {
        unsafe { CFRelease(self.0) }
    }
}

/// Quartz event tap delivering secondary-button events.
#[derive(Debug, Default)]
pub struct MacosEventTap;

impl MacosEventTap {
    pub fn new() -> Self {
        Self
    }
}

impl EventSource for MacosEventTap {
    fn run(&mut self, handler: &mut dyn ButtonEventHandler) -> Result<(), EventSourceError> {
        let context = TapContext {
            handler: RefCell::new(handler),
            tap: Cell::new(ptr::null()),
        };
        let user_info = &context as *const TapContext<'_, '_> as *mut c_void;

        let tap = unsafe {
            CGEventTapCreate(
                SESSION_EVENT_TAP,
                HEAD_INSERT_EVENT_TAP,
                DEFAULT_TAP,
                EVENT_MASK,
                tap_callback,
                user_info,
            )
        };
        if tap.is_null() {
            return Err(EventSourceError::TapCreation);
        }
        let _tap_guard = EventTapGuard(tap);
        context.tap.set(tap);

        let source = unsafe { CFMachPortCreateRunLoopSource(ptr::null(), tap, 0) };
        if source.is_null() {
            return Err(EventSourceError::RunLoopSource);
        }
        let _source_guard = RunLoopSourceGuard(source);

        unsafe {
            CFRunLoopAddSource(CFRunLoopGetCurrent(), source, kCFRunLoopCommonModes);
            CGEventTapEnable(tap, true);
        }

        info!("event tap installed; watching secondary-button gestures");
        unsafe { CFRunLoopRun() };
        info!("event tap run loop exited");
        Ok(())
    }
}

extern "C" fn tap_callback(
    _proxy: CGEventTapProxy,
    event_type: u32,
    event: CGEventRef,
    user_info: *mut c_void,
) -> CGEventRef {
    if user_info.is_null() {
        return event;
    }
    let context = unsafe { &*(user_info as *const TapContext<'_, '_>) };
    let at = timestamp(event);

    let button_event = match event_type {
        RIGHT_MOUSE_DOWN => ButtonEvent::Down { point: location(event), at },
        RIGHT_MOUSE_DRAGGED => ButtonEvent::Dragged { point: location(event), at },
        RIGHT_MOUSE_UP => ButtonEvent::Up { point: location(event), at },
        TAP_DISABLED_BY_TIMEOUT | TAP_DISABLED_BY_USER_INPUT => {
            ButtonEvent::TapSuspended { at }
        }
        other => {
            trace!("ignoring event type {other}");
            return event;
        }
    };

    let disposition = match context.handler.try_borrow_mut() {
        Ok(mut handler) => handler.handle_event(button_event),
        Err(_) => {
            warn!("re-entrant tap callback; passing {button_event:?} through");
            return event;
        }
    };

    if disposition == Disposition::Rearm {
        let tap = context.tap.get();
        if !tap.is_null() {
            unsafe { CGEventTapEnable(tap, true) };
            info!("event tap re-armed");
        }
    }
    event
}

/// Global top-left location of a mouse event.
fn location(event: CGEventRef) -> Point {
    let p = unsafe { CGEventGetLocation(event) };
    Point::new(p.x, p.y)
}

/// Time the event was generated; zero for the null event some tap
/// notifications carry.
fn timestamp(event: CGEventRef) -> Duration {
    if event.is_null() {
        return Duration::ZERO;
    }
    Duration::from_nanos(unsafe { CGEventGetTimestamp(event) })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
