//! Application layer use cases for the gesture agent.
//!
//! - **`gesture_session`** – the drag state machine.  Consumes
//!   [`ButtonEvent`](gesture_core::ButtonEvent)s from the event source,
//!   classifies completed drags, and fires the bound action.
//!
//! - **`synthesize_input`** – turns a character shortcut into a physical key
//!   press under the active keyboard layout and posts it through a
//!   [`KeyInjector`](synthesize_input::KeyInjector).
//!
//! - **`actions`** – what each gesture does: a shortcut, an application
//!   launch, or nothing.
//!
//! Everything here depends only on `gesture_core` and on traits; OS adapters
//! are injected at construction time from the infrastructure layer.

pub mod actions;
pub mod gesture_session;
pub mod synthesize_input;
