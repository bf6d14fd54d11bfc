//! # gesture-core
//!
//! Platform-independent heart of Mouse Gestures: the secondary-button drag
//! classifier, the drag state machine data, layout-aware key resolution, and
//! the trajectory overlay bookkeeping.
//!
//! This crate makes no OS calls.  Everything that touches the platform (the
//! global event tap, key injection, the live keyboard layout, the display
//! list, the overlay window) is reached through a trait defined here or in
//! `gesture-agent` and implemented in the agent's infrastructure layer.
//!
//! # Architecture overview
//!
//! ```text
//! EventSource ──ButtonEvent──▶ GestureSession ──▶ SyntheticInputSender ──▶ KeyInjector
//!                                   │                    │
//!                                   │                    └──▶ KeyLayoutResolver ──▶ KeyboardLayoutSource
//!                                   └──▶ TrajectoryOverlay ──▶ OverlaySurface
//! ```
//!
//! - **`domain`** – geometry, button events, gesture outcomes and the
//!   ordered-first-match [`classify`] policy, and the drag [`SessionState`].
//! - **`keymap`** – physical key codes, modifier sets, shortcut strings and
//!   the [`KeyLayoutResolver`] that reverse-maps characters to key combos.
//! - **`overlay`** – the [`TrajectoryOverlay`] path tracker.

pub mod domain;
pub mod keymap;
pub mod overlay;

pub use domain::event::{ButtonEvent, Disposition};
pub use domain::geometry::{DisplayFrame, Point};
pub use domain::gesture::{classify, GestureOutcome};
pub use domain::session::SessionState;
pub use keymap::ansi::StaticLayout;
pub use keymap::layout::{
    probe, KeyCombo, KeyLayoutResolver, KeyboardLayoutSource, LayoutError, LayoutInvalidator,
    LayoutTable, StaticLayoutSource,
};
pub use keymap::{KeyCode, ModifierFlags, Shortcut, ShortcutParseError};
pub use overlay::{
    ColorParseError, DisplayProvider, OverlaySurface, Rgba, StrokeStyle, TrajectoryOverlay,
};
