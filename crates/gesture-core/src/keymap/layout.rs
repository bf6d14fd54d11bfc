//! Character → physical key reverse lookup under the active keyboard layout.
//!
//! The platform can only answer the forward question ("what does key `k`
//! type with modifiers `m`?").  [`probe`] answers the reverse one by brute
//! force: every key code below [`KeyCode::PROBE_LIMIT`] is tried under four
//! modifier combinations, at most 512 translations.  [`KeyLayoutResolver`]
//! puts a per-layout cache in front of it so the probe only runs on a miss.
//!
//! # Cache invariant
//!
//! Every cached [`KeyCombo`] was computed under the layout whose identifier
//! the resolver currently records.  The cache is emptied together with the
//! identifier update, both when a [`LayoutInvalidator`] is notified of an
//! input-source switch and, as a backstop, whenever a lookup observes a
//! layout identifier different from the recorded one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, warn};

use super::ansi::StaticLayout;
use super::{KeyCode, ModifierFlags};

/// Modifier combinations tried for each key, in priority order.
const PROBE_MODIFIERS: [u8; 4] = [
    0,
    ModifierFlags::SHIFT,
    ModifierFlags::OPTION,
    ModifierFlags::SHIFT | ModifierFlags::OPTION,
];

/// Errors raised by a [`KeyboardLayoutSource`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The platform reported no current keyboard layout.
    #[error("no active keyboard layout is available")]
    NoActiveLayout,
    /// The active input source carries no character mapping data
    /// (typically an input method rather than a plain layout).
    #[error("input source '{0}' has no key layout data")]
    NoLayoutData(String),
}

/// A physical key plus the extra modifiers needed to type a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub needs_shift: bool,
    pub needs_option: bool,
}

impl KeyCombo {
    /// The modifier set to post: `base` plus whatever the layout requires.
    pub fn modifiers_with(&self, base: ModifierFlags) -> ModifierFlags {
        let mut flags = base;
        if self.needs_shift {
            flags = flags.with(ModifierFlags::SHIFT);
        }
        if self.needs_option {
            flags = flags.with(ModifierFlags::OPTION);
        }
        flags
    }
}

/// A snapshot of one keyboard layout's forward mapping.
pub trait LayoutTable {
    /// Stable identifier of the input source, e.g. `com.apple.keylayout.German`.
    fn layout_id(&self) -> &str;

    /// The character typed by `code` with `modifiers` held, if any.
    fn translate(&self, code: KeyCode, modifiers: ModifierFlags) -> Option<char>;
}

impl<T: LayoutTable + ?Sized> LayoutTable for Arc<T> {
    fn layout_id(&self) -> &str {
        (**self).layout_id()
    }

    fn translate(&self, code: KeyCode, modifiers: ModifierFlags) -> Option<char> {
        (**self).translate(code, modifiers)
    }
}

/// Provides the currently active keyboard layout.
///
/// The macOS implementation reads the current input source through Text
/// Input Sources; [`StaticLayoutSource`] serves an in-memory table.
pub trait KeyboardLayoutSource: Send + Sync {
    /// Returns a snapshot of the layout active right now.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if the platform cannot describe the layout.
    fn current_layout(&self) -> Result<Box<dyn LayoutTable>, LayoutError>;
}

/// Reverse-maps `target` to the first key combo that types it on `table`.
///
/// Keys are tried in increasing code order and, for each key, modifiers in
/// the order none, shift, option, shift+option.  Returns `None` if no key on
/// the layout produces the character.
pub fn probe(table: &dyn LayoutTable, target: char) -> Option<KeyCombo> {
    (0..KeyCode::PROBE_LIMIT).find_map(|raw| {
        let code = KeyCode(raw);
        PROBE_MODIFIERS.iter().find_map(|&bits| {
            let modifiers = ModifierFlags::from_bits(bits);
            (table.translate(code, modifiers) == Some(target)).then(|| KeyCombo {
                code,
                needs_shift: modifiers.shift(),
                needs_option: modifiers.option(),
            })
        })
    })
}

/// Shared flag raised by the layout-change subscription.
///
/// Cloning yields another handle to the same flag.  The subscription calls
/// [`notify`](Self::notify) from its notification callback; the owning
/// resolver drops its cache before the next lookup.
#[derive(Debug, Clone, Default)]
pub struct LayoutInvalidator {
    pending: Arc<AtomicBool>,
}

impl LayoutInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the active input source changed.
    pub fn notify(&self) {
        self.pending.store(true, Ordering::SeqCst);
    }

    /// Returns `true` (and clears the flag) if a change was recorded.
    fn take(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }
}

/// Cached reverse lookup of characters under the live keyboard layout.
pub struct KeyLayoutResolver {
    source: Arc<dyn KeyboardLayoutSource>,
    invalidator: LayoutInvalidator,
    layout_id: Option<String>,
    cache: HashMap<char, KeyCombo>,
    probe_count: u64,
}

impl KeyLayoutResolver {
    /// Creates a resolver over `source` with an empty cache.
    pub fn new(source: Arc<dyn KeyboardLayoutSource>) -> Self {
        Self {
            source,
            invalidator: LayoutInvalidator::new(),
            layout_id: None,
            cache: HashMap::new(),
            probe_count: 0,
        }
    }

    /// A handle that layout-change notifications use to invalidate this cache.
    pub fn invalidator(&self) -> LayoutInvalidator {
        self.invalidator.clone()
    }

    /// Empties the cache and forgets the recorded layout immediately.
    pub fn invalidate(&mut self) {
        self.reset(None);
    }

    /// Resolves `ch` to the key combo that types it on the active layout.
    ///
    /// Returns `None` if the layout cannot be read or no key produces `ch`;
    /// both cases are logged and nothing is cached.
    pub fn resolve(&mut self, ch: char) -> Option<KeyCombo> {
        if self.invalidator.take() {
            debug!("input source changed; dropping {} cached key combos", self.cache.len());
            self.reset(None);
        }

        let table = match self.source.current_layout() {
            Ok(table) => table,
            Err(e) => {
                warn!("cannot read keyboard layout to resolve {ch:?}: {e}");
                return None;
            }
        };

        if self.layout_id.as_deref() != Some(table.layout_id()) {
            if self.layout_id.is_some() {
                debug!(
                    "layout changed from {:?} to {}; clearing cache",
                    self.layout_id,
                    table.layout_id()
                );
            }
            self.reset(Some(table.layout_id().to_string()));
        }

        if let Some(combo) = self.cache.get(&ch) {
            return Some(*combo);
        }

        self.probe_count += 1;
        let Some(combo) = probe(table.as_ref(), ch) else {
            debug!("no key types {ch:?} on {}", table.layout_id());
            return None;
        };
        debug!(
            "resolved {ch:?} to key {} (shift={}, option={}) on {}",
            combo.code,
            combo.needs_shift,
            combo.needs_option,
            table.layout_id()
        );
        self.cache.insert(ch, combo);
        Some(combo)
    }

    /// Number of times the brute-force probe has run.
    pub fn probe_count(&self) -> u64 {
        self.probe_count
    }

    /// Number of characters currently cached.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// The layout identifier the cache was computed under.
    pub fn layout_id(&self) -> Option<&str> {
        self.layout_id.as_deref()
    }

    fn reset(&mut self, layout_id: Option<String>) {
        self.cache.clear();
        self.layout_id = layout_id;
    }
}

/// A [`KeyboardLayoutSource`] serving an in-memory layout that can be swapped.
pub struct StaticLayoutSource {
    current: Mutex<Arc<StaticLayout>>,
}

impl StaticLayoutSource {
    pub fn new(layout: StaticLayout) -> Self {
        Self {
            current: Mutex::new(Arc::new(layout)),
        }
    }

    /// A source serving [`StaticLayout::us_ansi`].
    pub fn us_ansi() -> Self {
        Self::new(StaticLayout::us_ansi())
    }

    /// Makes `layout` the active layout, as if the user switched input source.
    pub fn switch_to(&self, layout: StaticLayout) {
        let mut guard = self.current.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Arc::new(layout);
    }
}

impl KeyboardLayoutSource for StaticLayoutSource {
    fn current_layout(&self) -> Result<Box<dyn LayoutTable>, LayoutError> {
        let guard = self.current.lock().unwrap_or_else(|p| p.into_inner());
        Ok(Box::new(Arc::clone(&guard)))
    }
}
