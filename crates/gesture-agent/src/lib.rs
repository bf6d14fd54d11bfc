//! gesture-agent library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! - **`application`** – the [`GestureSession`] state machine, the
//!   layout-aware [`SyntheticInputSender`] and gesture bindings.
//! - **`infrastructure`** – OS adapters (event tap, key posting, keyboard
//!   layouts, displays, trust check, launcher), test doubles and config
//!   storage.
//!
//! [`GestureSession`]: application::gesture_session::GestureSession
//! [`SyntheticInputSender`]: application::synthesize_input::SyntheticInputSender

pub mod application;
pub mod infrastructure;
