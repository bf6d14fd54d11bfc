//! Overlay surfaces.
//!
//! The agent does not draw the trail on screen.  A visible surface (one
//! borderless, click-through, always-on-top window per display) belongs to
//! whatever implements [`OverlaySurface`] outside this crate.
//!
//! [`TracingOverlaySurface`] is the surface the agent wires in: it reports the
//! overlay's lifecycle through `tracing` and nothing else.
//! [`RecordingOverlaySurface`] records every call for tests.

use std::sync::Mutex;

use gesture_core::{DisplayFrame, OverlaySurface, Point, StrokeStyle};
use tracing::{debug, trace};

/// Logs show / render / hide calls.
#[derive(Debug, Default)]
pub struct TracingOverlaySurface;

impl TracingOverlaySurface {
    pub fn new() -> Self {
        Self
    }
}

impl OverlaySurface for TracingOverlaySurface {
    fn show(&self, frame: &DisplayFrame, style: &StrokeStyle) {
        debug!(
            "overlay shown on display {} ({}x{} at {}, {}), stroke {} {}",
            frame.display_id, frame.width, frame.height, frame.x, frame.y, style.width, style.color
        );
    }

    fn render(&self, path: &[Point]) {
        if let Some(last) = path.last() {
            trace!("overlay path: {} points, head at ({:.0}, {:.0})", path.len(), last.x, last.y);
        }
    }

    fn hide(&self) {
        debug!("overlay hidden");
    }
}

/// One call made on a [`RecordingOverlaySurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayCall {
    Show { display_id: u32 },
    Render { path: Vec<Point> },
    Hide,
}

/// Surface that records every call.
#[derive(Debug, Default)]
pub struct RecordingOverlaySurface {
    pub calls: Mutex<Vec<OverlayCall>>,
}

impl RecordingOverlaySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<OverlayCall> {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn shows(&self) -> usize {
        self.count(|c| matches!(c, OverlayCall::Show { .. }))
    }

    pub fn hides(&self) -> usize {
        self.count(|c| matches!(c, OverlayCall::Hide))
    }

    /// The path passed to the most recent `render`.
    pub fn last_path(&self) -> Option<Vec<Point>> {
        self.calls().into_iter().rev().find_map(|c| match c {
            OverlayCall::Render { path } => Some(path),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&OverlayCall) -> bool) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .filter(|c| pred(c))
            .count()
    }

    fn push(&self, call: OverlayCall) {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).push(call);
    }
}

impl OverlaySurface for RecordingOverlaySurface {
    fn show(&self, frame: &DisplayFrame, _style: &StrokeStyle) {
        self.push(OverlayCall::Show {
            display_id: frame.display_id,
        });
    }

    fn render(&self, path: &[Point]) {
        self.push(OverlayCall::Render {
            path: path.to_vec(),
        });
    }

    fn hide(&self) {
        self.push(OverlayCall::Hide);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
