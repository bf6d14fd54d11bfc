//! Infrastructure layer for the gesture agent.
//!
//! Contains the OS-facing adapters behind the application-layer traits and
//! the `gesture_core` seams, plus configuration storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `gesture_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`event_source`** – delivers secondary-button events.  On macOS a
//!   Quartz event tap; everywhere a `ScriptedEventSource` for tests.
//! - **`key_injection`** – posts keyboard events (`CGEventPost` on macOS,
//!   `MockKeyInjector` for tests).
//! - **`keyboard_layout`** – the live keyboard layout via Text Input Sources
//!   and the layout-change notification subscription.
//! - **`displays`** – active display frames via `CGDisplay`.
//! - **`permissions`** – the accessibility trust check.
//! - **`launcher`** – opens Mission Control.
//! - **`overlay_surface`** – overlay surfaces that log or record instead of
//!   drawing.
//! - **`storage`** – TOML configuration file.

pub mod displays;
pub mod event_source;
pub mod key_injection;
pub mod keyboard_layout;
pub mod launcher;
pub mod overlay_surface;
pub mod permissions;
pub mod storage;
