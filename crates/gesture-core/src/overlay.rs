//! Trajectory overlay bookkeeping.
//!
//! [`TrajectoryOverlay`] keeps the path of the gesture in flight and drives an
//! [`OverlaySurface`].  It makes no decisions about gestures; the session only
//! tells it to start, extend and clear.  Drawing is up to the surface.
//!
//! # Coordinate spaces
//!
//! Points arrive in global screen coordinates.  On [`start`](TrajectoryOverlay::start)
//! the overlay picks the display containing the origin (falling back to the
//! primary display) and every point of that gesture is stored relative to
//! that display's top-left corner, even after the pointer leaves it.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::domain::geometry::{DisplayFrame, Point};

/// Error returned when parsing a `#RRGGBB` / `#RRGGBBAA` color string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid color '{0}': expected #RRGGBB or #RRGGBBAA")]
pub struct ColorParseError(pub String);

/// An sRGB color with alpha, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { channel(6)? } else { 0xFF };
        Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.to_string()
    }
}

/// How the trajectory line is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Line width in points.
    pub width: f64,
    pub color: Rgba,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 4.0,
            color: Rgba::new(0x3B, 0x82, 0xF6, 0xCC),
        }
    }
}

/// The window the trajectory is drawn into.
///
/// Implementations present a borderless, click-through, always-on-top surface
/// covering one display, which never takes keyboard focus.
pub trait OverlaySurface: Send + Sync {
    /// Sizes the surface to `frame` and makes it visible.
    fn show(&self, frame: &DisplayFrame, style: &StrokeStyle);

    /// Replaces the drawn path with `path` (display-local coordinates).
    fn render(&self, path: &[Point]);

    /// Hides the surface.
    fn hide(&self);
}

/// Enumerates the attached displays.
pub trait DisplayProvider: Send + Sync {
    /// Frames of all active displays in global top-left coordinates,
    /// primary display first.
    fn displays(&self) -> Vec<DisplayFrame>;
}

/// Tracks the path of the current gesture and keeps the surface in sync.
pub struct TrajectoryOverlay {
    surface: Arc<dyn OverlaySurface>,
    displays: Arc<dyn DisplayProvider>,
    style: StrokeStyle,
    display: Option<DisplayFrame>,
    path: Vec<Point>,
    visible: bool,
}

impl TrajectoryOverlay {
    pub fn new(
        surface: Arc<dyn OverlaySurface>,
        displays: Arc<dyn DisplayProvider>,
        style: StrokeStyle,
    ) -> Self {
        Self {
            surface,
            displays,
            style,
            display: None,
            path: Vec::new(),
            visible: false,
        }
    }

    /// Begins a new path at `origin`, discarding any previous one.
    ///
    /// If no display can be found the overlay stays hidden and ignores
    /// points until the next `start`.
    pub fn start(&mut self, origin: Point) {
        self.path.clear();
        self.display = pick_display(&self.displays.displays(), origin);

        let Some(frame) = self.display else {
            debug!("no display for overlay at ({:.0}, {:.0})", origin.x, origin.y);
            if self.visible {
                self.surface.hide();
                self.visible = false;
            }
            return;
        };

        trace!("overlay on display {} at ({:.0}, {:.0})", frame.display_id, origin.x, origin.y);
        self.surface.show(&frame, &self.style);
        self.visible = true;
        self.path.push(frame.to_local(origin));
        self.surface.render(&self.path);
    }

    /// Appends `point` to the path and re-renders.
    pub fn extend(&mut self, point: Point) {
        let Some(frame) = self.display else {
            return;
        };
        self.path.push(frame.to_local(point));
        self.surface.render(&self.path);
    }

    /// Empties the path and hides the surface.  Does nothing if already clear.
    pub fn clear(&mut self) {
        if self.path.is_empty() && !self.visible {
            return;
        }
        self.path.clear();
        self.display = None;
        if self.visible {
            self.surface.hide();
            self.visible = false;
        }
    }

    /// The current path in the chosen display's local coordinates.
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// The display chosen for the current gesture.
    pub fn display(&self) -> Option<&DisplayFrame> {
        self.display.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// The display containing `origin`, else the primary display.
fn pick_display(displays: &[DisplayFrame], origin: Point) -> Option<DisplayFrame> {
    displays
        .iter()
        .find(|d| d.contains(origin))
        .or_else(|| displays.iter().find(|d| d.is_primary))
        .copied()
}
