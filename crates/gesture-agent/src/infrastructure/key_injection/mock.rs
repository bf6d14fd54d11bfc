//! Mock key injector for tests.
//!
//! Records every posted key transition in a `Mutex<Vec<...>>` instead of
//! touching the OS, so tests can assert exactly what would have been typed
//! and in which order.  Set `should_fail` to exercise injection-failure paths.

use std::sync::Mutex;

use gesture_core::{KeyCode, ModifierFlags};

use crate::application::synthesize_input::{InjectionError, KeyInjector};

/// One recorded key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostedKey {
    pub code: KeyCode,
    pub modifiers: ModifierFlags,
    pub key_down: bool,
}

/// A key injector that records calls without performing OS calls.
#[derive(Default)]
pub struct MockKeyInjector {
    /// Every transition passed to `post_key`, in order.
    pub posted: Mutex<Vec<PostedKey>>,
    /// When `true`, `post_key` fails with `InjectionError::Platform`.
    pub should_fail: bool,
}

impl MockKeyInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the recorded transitions.
    pub fn posted(&self) -> Vec<PostedKey> {
        self.posted.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// `(code, modifiers)` of every key-down, excluding Escape.
    pub fn shortcuts(&self) -> Vec<(KeyCode, ModifierFlags)> {
        self.posted()
            .into_iter()
            .filter(|k| k.key_down && k.code != KeyCode::ESCAPE)
            .map(|k| (k.code, k.modifiers))
            .collect()
    }

    /// Number of Escape key-downs.
    pub fn escapes(&self) -> usize {
        self.posted()
            .iter()
            .filter(|k| k.key_down && k.code == KeyCode::ESCAPE)
            .count()
    }
}

impl KeyInjector for MockKeyInjector {
    fn post_key(
        &self,
        code: KeyCode,
        modifiers: ModifierFlags,
        key_down: bool,
    ) -> Result<(), InjectionError> {
        if self.should_fail {
            return Err(InjectionError::Platform("mock failure".into()));
        }
        self.posted
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(PostedKey {
                code,
                modifiers,
                key_down,
            });
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
