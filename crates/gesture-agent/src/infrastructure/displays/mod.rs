//! Display enumeration for the trajectory overlay.
//!
//! | Module  | OS    | API used                                     |
//! |---------|-------|----------------------------------------------|
//! | `macos` | macOS | `CGGetActiveDisplayList` + `CGDisplayBounds` |
//!
//! A [`MockDisplayProvider`] is always compiled (not guarded by `#[cfg]`) so
//! tests on any platform can use it without a physical display.

use gesture_core::{DisplayFrame, DisplayProvider};

#[cfg(target_os = "macos")]
pub mod macos;

/// A display provider returning a fixed list of frames.
pub struct MockDisplayProvider {
    /// The frames returned by `displays()`.
    pub frames: Vec<DisplayFrame>,
}

impl MockDisplayProvider {
    pub fn new(frames: Vec<DisplayFrame>) -> Self {
        Self { frames }
    }

    /// A single 1920×1080 primary display at the origin.
    pub fn single_1080p() -> Self {
        Self::new(vec![DisplayFrame {
            display_id: 1,
            x: 0.0,
            y: 0.0,
            width: 1920.0,
            height: 1080.0,
            is_primary: true,
        }])
    }
}

impl DisplayProvider for MockDisplayProvider {
    fn displays(&self) -> Vec<DisplayFrame> {
        self.frames.clone()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
