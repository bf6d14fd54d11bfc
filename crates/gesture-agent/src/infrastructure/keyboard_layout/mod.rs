//! The live keyboard layout.
//!
//! On macOS [`macos::MacosLayoutSource`] reads the current input source
//! through Text Input Sources and translates key codes with
//! `UCKeyTranslate`; [`macos::LayoutChangeSubscription`] raises a
//! [`LayoutInvalidator`](gesture_core::LayoutInvalidator) whenever the user
//! switches input source.
//!
//! Elsewhere the agent has no live layout and
//! [`StaticLayoutSource`](gesture_core::StaticLayoutSource) stands in.

#[cfg(target_os = "macos")]
pub mod macos;
