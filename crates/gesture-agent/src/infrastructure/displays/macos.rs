//! macOS display enumeration via Core Graphics (`CGDisplay`).
//!
//! `CGDisplay::bounds` (`CGDisplayBounds`) already reports frames in the global display space with
//! the origin at the top-left of the main display and Y growing down, the
//! same space event-tap locations use, so no flip is applied.

#![cfg(target_os = "macos")]

use core_graphics::display::CGDisplay;
use gesture_core::{DisplayFrame, DisplayProvider};
use tracing::warn;

/// Enumerates active displays with Core Graphics.
#[derive(Debug, Default)]
pub struct CgDisplayProvider;

impl CgDisplayProvider {
    pub fn new() -> Self {
        Self
    }
}

impl DisplayProvider for CgDisplayProvider {
    fn displays(&self) -> Vec<DisplayFrame> {
        let ids = match CGDisplay::active_displays() {
            Ok(ids) => ids,
            Err(e) => {
                warn!("CGGetActiveDisplayList failed: {e}");
                return Vec::new();
            }
        };
        let main_id = CGDisplay::main().id;

        let mut frames: Vec<DisplayFrame> = ids
            .into_iter()
            .map(|id| {
                let bounds = CGDisplay::new(id).bounds();
                DisplayFrame {
                    display_id: id,
                    x: bounds.origin.x,
                    y: bounds.origin.y,
                    width: bounds.size.width,
                    height: bounds.size.height,
                    is_primary: id == main_id,
                }
            })
            .collect();

        frames.sort_by_key(|f| !f.is_primary);
        frames
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Smoke test: on a macOS machine with a display the primary comes first.
    #[test]
    fn test_primary_display_is_first() {
        let frames = CgDisplayProvider::new().displays();
        if let Some(first) = frames.first() {
            assert!(first.is_primary, "first entry must be the main display");
            assert_eq!((first.x, first.y), (0.0, 0.0));
        }
    }
}
