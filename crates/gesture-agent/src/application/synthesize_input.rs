//! SyntheticInputSender: posts keyboard shortcuts as press/release pairs.
//!
//! Shortcuts are requested by character.  The sender asks the
//! [`KeyLayoutResolver`] which physical key produces the character on the
//! active layout, adds any shift/option the layout needs on top of the
//! requested modifiers, and hands the result to a [`KeyInjector`].

use std::sync::Arc;

use gesture_core::{KeyCode, KeyLayoutResolver, LayoutInvalidator, ModifierFlags};
use thiserror::Error;
use tracing::debug;

/// Error type for OS-level key injection.
#[derive(Debug, Error)]
pub enum InjectionError {
    /// The platform refused to create an event source.
    #[error("could not create a keyboard event source")]
    SourceUnavailable,
    /// The platform refused to create the keyboard event.
    #[error("could not create keyboard event for key {0}")]
    EventCreation(KeyCode),
    #[error("platform error: {0}")]
    Platform(String),
}

/// Error type for [`SyntheticInputSender::send_character_with_modifier`].
#[derive(Debug, Error)]
pub enum SendError {
    /// No key on the active layout produces the character.
    #[error("no key on the active keyboard layout types {0:?}")]
    Unresolvable(char),
    #[error("key injection failed: {0}")]
    Injection(#[from] InjectionError),
}

/// Posts a single key transition into the system input stream.
///
/// The macOS implementation posts a `CGEvent` at the HID tap location; tests
/// use a recording double.
pub trait KeyInjector: Send + Sync {
    /// Posts a key-down (`key_down = true`) or key-up event for `code` with
    /// exactly `modifiers` held.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] if the event could not be created or posted.
    fn post_key(
        &self,
        code: KeyCode,
        modifiers: ModifierFlags,
        key_down: bool,
    ) -> Result<(), InjectionError>;
}

/// Sends keyboard shortcuts on behalf of the gesture session.
pub struct SyntheticInputSender {
    injector: Arc<dyn KeyInjector>,
    resolver: KeyLayoutResolver,
}

impl SyntheticInputSender {
    pub fn new(injector: Arc<dyn KeyInjector>, resolver: KeyLayoutResolver) -> Self {
        Self { injector, resolver }
    }

    /// Types `ch` with `base` modifiers held, e.g. `('[', cmd)` for "back".
    ///
    /// The posted modifier set is `base` plus whatever shift/option the
    /// active layout needs for `ch`; the key-down and key-up carry the same
    /// set.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Unresolvable`] (nothing is posted) if no key
    /// types `ch`, or [`SendError::Injection`] if posting fails.
    pub fn send_character_with_modifier(
        &mut self,
        ch: char,
        base: ModifierFlags,
    ) -> Result<(), SendError> {
        let combo = self.resolver.resolve(ch).ok_or(SendError::Unresolvable(ch))?;
        let modifiers = combo.modifiers_with(base);
        debug!("sending {ch:?} as key {} with [{modifiers}]", combo.code);
        self.press_and_release(combo.code, modifiers)?;
        Ok(())
    }

    /// Presses and releases a layout-independent key such as Escape.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] if posting fails.
    pub fn send_physical_key(
        &self,
        code: KeyCode,
        modifiers: ModifierFlags,
    ) -> Result<(), InjectionError> {
        self.press_and_release(code, modifiers)
    }

    /// Handle for the layout-change subscription.
    pub fn layout_invalidator(&self) -> LayoutInvalidator {
        self.resolver.invalidator()
    }

    pub fn resolver(&self) -> &KeyLayoutResolver {
        &self.resolver
    }

    fn press_and_release(
        &self,
        code: KeyCode,
        modifiers: ModifierFlags,
    ) -> Result<(), InjectionError> {
        self.injector.post_key(code, modifiers, true)?;
        self.injector.post_key(code, modifiers, false)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_core::{StaticLayout, StaticLayoutSource};
    use std::sync::Mutex;

    // ── Recording injector ────────────────────────────────────────────────────

    #[derive(Default)]
    struct RecordingInjector {
        posts: Mutex<Vec<(KeyCode, ModifierFlags, bool)>>,
        should_fail: bool,
    }

    impl KeyInjector for RecordingInjector {
        fn post_key(
            &self,
            code: KeyCode,
            modifiers: ModifierFlags,
            key_down: bool,
        ) -> Result<(), InjectionError> {
            if self.should_fail {
                return Err(InjectionError::Platform("injected failure".to_string()));
            }
            self.posts.lock().unwrap().push((code, modifiers, key_down));
            Ok(())
        }
    }

    fn cmd() -> ModifierFlags {
        ModifierFlags::from_bits(ModifierFlags::COMMAND)
    }

    fn sender_with(
        injector: Arc<RecordingInjector>,
        layout: StaticLayout,
    ) -> SyntheticInputSender {
        let resolver = KeyLayoutResolver::new(Arc::new(StaticLayoutSource::new(layout)));
        SyntheticInputSender::new(injector, resolver)
    }

    #[test]
    fn test_character_is_sent_as_press_then_release() {
        // Arrange
        let injector = Arc::new(RecordingInjector::default());
        let mut sender = sender_with(Arc::clone(&injector), StaticLayout::us_ansi());

        // Act
        sender.send_character_with_modifier('[', cmd()).expect("send");

        // Assert
        let posts = injector.posts.lock().unwrap();
        assert_eq!(
            *posts,
            vec![(KeyCode(0x21), cmd(), true), (KeyCode(0x21), cmd(), false)]
        );
    }

    #[test]
    fn test_layout_required_modifiers_are_added() {
        // Arrange – '[' is option+5 on this layout
        let layout = StaticLayout::new("de").with_key(
            KeyCode(0x17),
            ModifierFlags::from_bits(ModifierFlags::OPTION),
            '[',
        );
        let injector = Arc::new(RecordingInjector::default());
        let mut sender = sender_with(Arc::clone(&injector), layout);

        // Act
        sender.send_character_with_modifier('[', cmd()).expect("send");

        // Assert
        let posts = injector.posts.lock().unwrap();
        let expected = cmd().with(ModifierFlags::OPTION);
        assert!(posts.iter().all(|&(code, mods, _)| code == KeyCode(0x17) && mods == expected));
        assert_eq!(posts.len(), 2);
    }

    #[test]
    fn test_unresolvable_character_posts_nothing() {
        let injector = Arc::new(RecordingInjector::default());
        let mut sender = sender_with(Arc::clone(&injector), StaticLayout::us_ansi());

        let result = sender.send_character_with_modifier('€', cmd());

        assert!(matches!(result, Err(SendError::Unresolvable('€'))));
        assert!(injector.posts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_physical_key_bypasses_resolution() {
        // An empty layout resolves nothing, yet Escape still goes out.
        let injector = Arc::new(RecordingInjector::default());
        let sender = sender_with(Arc::clone(&injector), StaticLayout::new("empty"));

        sender
            .send_physical_key(KeyCode::ESCAPE, ModifierFlags::empty())
            .expect("send");

        let posts = injector.posts.lock().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0], (KeyCode::ESCAPE, ModifierFlags::empty(), true));
        assert_eq!(sender.resolver().probe_count(), 0);
    }

    #[test]
    fn test_injection_failure_is_reported() {
        let injector = Arc::new(RecordingInjector {
            should_fail: true,
            ..Default::default()
        });
        let mut sender = sender_with(injector, StaticLayout::us_ansi());

        let result = sender.send_character_with_modifier('w', cmd());

        assert!(matches!(result, Err(SendError::Injection(_))));
    }
}
