//! macOS keyboard layout via Text Input Sources (Carbon).
//!
//! `TISCopyCurrentKeyboardLayoutInputSource` yields the active layout; its
//! `kTISPropertyUnicodeKeyLayoutData` is the `UCKeyboardLayout` blob that
//! `UCKeyTranslate` consults to turn `(key code, modifiers)` into text.  The
//! input source is retained for as long as a [`TisLayout`] borrows its data.

#![cfg(target_os = "macos")]

use std::ffi::c_void;
use std::ptr;

use core_foundation::base::{CFRelease, CFTypeRef, TCFType};
use core_foundation::string::{CFString, CFStringRef};
use gesture_core::{
    KeyCode, KeyboardLayoutSource, LayoutError, LayoutInvalidator, LayoutTable, ModifierFlags,
};
use tracing::{debug, trace};

type TISInputSourceRef = CFTypeRef;
type CFDataRef = CFTypeRef;
type CFNotificationCenterRef = CFTypeRef;
type CFNotificationCallback = extern "C" fn(
    center: CFNotificationCenterRef,
    observer: *mut c_void,
    name: CFStringRef,
    object: *const c_void,
    user_info: CFTypeRef,
);

const K_UC_KEY_ACTION_DOWN: u16 = 0;
const K_UC_KEY_TRANSLATE_NO_DEAD_KEYS_MASK: u32 = 1;
/// Carbon `shiftKey` / `optionKey`, already shifted right by 8 as
/// `UCKeyTranslate` expects.
const CARBON_SHIFT: u32 = 0x0200 >> 8;
const CARBON_OPTION: u32 = 0x0800 >> 8;
/// `CFNotificationSuspensionBehaviorDeliverImmediately`.
const DELIVER_IMMEDIATELY: isize = 4;

#[link(name = "Carbon", kind = "framework")]
extern "C" {
    fn TISCopyCurrentKeyboardLayoutInputSource() -> TISInputSourceRef;
    fn TISGetInputSourceProperty(source: TISInputSourceRef, key: CFStringRef) -> *const c_void;
    fn UCKeyTranslate(
        key_layout: *const u8,
        virtual_key_code: u16,
        key_action: u16,
        modifier_key_state: u32,
        keyboard_type: u32,
        key_translate_options: u32,
        dead_key_state: *mut u32,
        max_string_length: usize,
        actual_string_length: *mut usize,
        unicode_string: *mut u16,
    ) -> i32;
    fn LMGetKbdType() -> u8;

    static kTISPropertyUnicodeKeyLayoutData: CFStringRef;
    static kTISPropertyInputSourceID: CFStringRef;
    static kTISNotifySelectedKeyboardInputSourceChanged: CFStringRef;
}

#[link(name = "CoreFoundation", kind = "framework")]
extern "C" {
    fn CFDataGetBytePtr(data: CFDataRef) -> *const u8;
    fn CFNotificationCenterGetDistributedCenter() -> CFNotificationCenterRef;
    fn CFNotificationCenterAddObserver(
        center: CFNotificationCenterRef,
        observer: *const c_void,
        callback: CFNotificationCallback,
        name: CFStringRef,
        object: *const c_void,
        suspension_behavior: isize,
    );
    fn CFNotificationCenterRemoveObserver(
        center: CFNotificationCenterRef,
        observer: *const c_void,
        name: CFStringRef,
        object: *const c_void,
    );
}

/// Reads the active keyboard layout from Text Input Sources.
#[derive(Debug, Default)]
pub struct MacosLayoutSource;

impl MacosLayoutSource {
    pub fn new() -> Self {
        Self
    }
}

impl KeyboardLayoutSource for MacosLayoutSource {
    fn current_layout(&self) -> Result<Box<dyn LayoutTable>, LayoutError> {
        let source = unsafe { TISCopyCurrentKeyboardLayoutInputSource() };
        if source.is_null() {
            return Err(LayoutError::NoActiveLayout);
        }
        // Owns the +1 reference from the Copy call from here on.
        let source = RetainedSource(source);

        let id_ref = unsafe { TISGetInputSourceProperty(source.0, kTISPropertyInputSourceID) };
        let id = if id_ref.is_null() {
            String::from("unknown")
        } else {
            unsafe { CFString::wrap_under_get_rule(id_ref as CFStringRef) }.to_string()
        };

        let data = unsafe { TISGetInputSourceProperty(source.0, kTISPropertyUnicodeKeyLayoutData) };
        if data.is_null() {
            return Err(LayoutError::NoLayoutData(id));
        }
        let bytes = unsafe { CFDataGetBytePtr(data) };
        if bytes.is_null() {
            return Err(LayoutError::NoLayoutData(id));
        }

        trace!("current keyboard layout is {id}");
        Ok(Box::new(TisLayout {
            _source: source,
            layout: bytes,
            keyboard_type: u32::from(unsafe { LMGetKbdType() }),
            id,
        }))
    }
}

/// Releases a TIS input source on drop.
struct RetainedSource(TISInputSourceRef);

impl Drop for RetainedSource {
    fn drop(&mut self) {
        unsafe { CFRelease(self.0) }
    }
}

/// One snapshot of the active layout.
struct TisLayout {
    /// Keeps `layout` alive.
    _source: RetainedSource,
    layout: *const u8,
    keyboard_type: u32,
    id: String,
}

impl LayoutTable for TisLayout {
    fn layout_id(&self) -> &str {
        &self.id
    }

    fn translate(&self, code: KeyCode, modifiers: ModifierFlags) -> Option<char> {
        let mut carbon = 0;
        if modifiers.shift() {
            carbon |= CARBON_SHIFT;
        }
        if modifiers.option() {
            carbon |= CARBON_OPTION;
        }

        let mut dead_key_state = 0u32;
        let mut buf = [0u16; 4];
        let mut len = 0usize;
        let status = unsafe {
            UCKeyTranslate(
                self.layout,
                code.0,
                K_UC_KEY_ACTION_DOWN,
                carbon,
                self.keyboard_type,
                K_UC_KEY_TRANSLATE_NO_DEAD_KEYS_MASK,
                &mut dead_key_state,
                buf.len(),
                &mut len,
                buf.as_mut_ptr(),
            )
        };
        if status != 0 || len == 0 {
            return None;
        }

        let mut chars = char::decode_utf16(buf[..len.min(buf.len())].iter().copied());
        match (chars.next(), chars.next()) {
            (Some(Ok(ch)), None) => Some(ch),
            _ => None,
        }
    }
}

/// Keeps a distributed-notification observer registered for input-source
/// changes.  Dropping it unregisters the observer.
///
/// Notifications are delivered on the run loop of the thread that created
/// the subscription, so it must be created on the event-tap thread.
pub struct LayoutChangeSubscription {
    observer: *mut LayoutInvalidator,
}

impl LayoutChangeSubscription {
    /// Starts raising `invalidator` whenever the selected input source changes.
    pub fn subscribe(invalidator: LayoutInvalidator) -> Self {
        let observer = Box::into_raw(Box::new(invalidator));
        unsafe {
            CFNotificationCenterAddObserver(
                CFNotificationCenterGetDistributedCenter(),
                observer as *const c_void,
                on_input_source_changed,
                kTISNotifySelectedKeyboardInputSourceChanged,
                ptr::null(),
                DELIVER_IMMEDIATELY,
            );
        }
        debug!("subscribed to keyboard input source changes");
        Self { observer }
    }
}

impl Drop for LayoutChangeSubscription {
    fn drop(&mut self) {
        unsafe {
            CFNotificationCenterRemoveObserver(
                CFNotificationCenterGetDistributedCenter(),
                self.observer as *const c_void,
                kTISNotifySelectedKeyboardInputSourceChanged,
                ptr::null(),
            );
            drop(Box::from_raw(self.observer));
        }
    }
}

extern "C" fn on_input_source_changed(
    _center: CFNotificationCenterRef,
    observer: *mut c_void,
    _name: CFStringRef,
    _object: *const c_void,
    _user_info: CFTypeRef,
) {
    if observer.is_null() {
        return;
    }
    let invalidator = unsafe { &*(observer as *const LayoutInvalidator) };
    debug!("keyboard input source changed");
    invalidator.notify();
}
