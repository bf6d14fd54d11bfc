//! In-memory keyboard layouts.
//!
//! [`StaticLayout`] is a plain `(key code, modifiers) → character` table.  It
//! backs the built-in US ANSI layout used on platforms without a live layout
//! source, and lets tests describe arbitrary layouts (German, Dvorak, …)
//! without touching the OS.
//!
//! Key codes are the macOS `kVK_ANSI_*` positions from HIToolbox `Events.h`.

use std::collections::HashMap;

use super::layout::LayoutTable;
use super::{KeyCode, ModifierFlags};

/// Only shift and option change the produced character; command and
/// control are stripped before lookup.
const TRANSLATING_MODIFIERS: u8 = ModifierFlags::SHIFT | ModifierFlags::OPTION;

/// A fixed keyboard layout held in memory.
#[derive(Debug, Clone)]
pub struct StaticLayout {
    id: String,
    entries: HashMap<(KeyCode, u8), char>,
}

impl StaticLayout {
    /// Creates an empty layout with the given input-source identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entries: HashMap::new(),
        }
    }

    /// Adds (or replaces) the character produced by `code` under `modifiers`.
    pub fn with_key(mut self, code: KeyCode, modifiers: ModifierFlags, ch: char) -> Self {
        self.entries
            .insert((code, modifiers.0 & TRANSLATING_MODIFIERS), ch);
        self
    }

    /// Adds the unshifted and shifted characters of one key.
    pub fn with_pair(self, code: u16, base: char, shifted: char) -> Self {
        self.with_key(KeyCode(code), ModifierFlags::empty(), base)
            .with_key(
                KeyCode(code),
                ModifierFlags::from_bits(ModifierFlags::SHIFT),
                shifted,
            )
    }

    /// The standard U.S. layout (`com.apple.keylayout.US`), printable keys only.
    pub fn us_ansi() -> Self {
        let option = ModifierFlags::from_bits(ModifierFlags::OPTION);
        US_ANSI_PAIRS
            .iter()
            .fold(Self::new("com.apple.keylayout.US"), |layout, &(code, base, shifted)| {
                layout.with_pair(code, base, shifted)
            })
            .with_key(KeyCode(0x31), ModifierFlags::empty(), ' ')
            .with_key(KeyCode(0x13), option, '™') // opt+2
            .with_key(KeyCode(0x05), option, '©') // opt+g
            .with_key(KeyCode(0x0F), option, '®') // opt+r
    }

    /// Number of `(key, modifiers)` entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LayoutTable for StaticLayout {
    fn layout_id(&self) -> &str {
        &self.id
    }

    fn translate(&self, code: KeyCode, modifiers: ModifierFlags) -> Option<char> {
        self.entries
            .get(&(code, modifiers.0 & TRANSLATING_MODIFIERS))
            .copied()
    }
}

/// `(kVK_ANSI_* code, unshifted, shifted)` for every printable ANSI key.
const US_ANSI_PAIRS: &[(u16, char, char)] = &[
    // Letters
    (0x00, 'a', 'A'),
    (0x0B, 'b', 'B'),
    (0x08, 'c', 'C'),
    (0x02, 'd', 'D'),
    (0x0E, 'e', 'E'),
    (0x03, 'f', 'F'),
    (0x05, 'g', 'G'),
    (0x04, 'h', 'H'),
    (0x22, 'i', 'I'),
    (0x26, 'j', 'J'),
    (0x28, 'k', 'K'),
    (0x25, 'l', 'L'),
    (0x2E, 'm', 'M'),
    (0x2D, 'n', 'N'),
    (0x1F, 'o', 'O'),
    (0x23, 'p', 'P'),
    (0x0C, 'q', 'Q'),
    (0x0F, 'r', 'R'),
    (0x01, 's', 'S'),
    (0x11, 't', 'T'),
    (0x20, 'u', 'U'),
    (0x09, 'v', 'V'),
    (0x0D, 'w', 'W'),
    (0x07, 'x', 'X'),
    (0x10, 'y', 'Y'),
    (0x06, 'z', 'Z'),
    // Digit row
    (0x12, '1', '!'),
    (0x13, '2', '@'),
    (0x14, '3', '#'),
    (0x15, '4', '$'),
    (0x17, '5', '%'),
    (0x16, '6', '^'),
    (0x1A, '7', '&'),
    (0x1C, '8', '*'),
    (0x19, '9', '('),
    (0x1D, '0', ')'),
    // Punctuation
    (0x1B, '-', '_'),
    (0x18, '=', '+'),
    (0x21, '[', '{'),
    (0x1E, ']', '}'),
    (0x2A, '\\', '|'),
    (0x29, ';', ':'),
    (0x27, '\'', '"'),
    (0x32, '`', '~'),
    (0x2B, ',', '<'),
    (0x2F, '.', '>'),
    (0x2C, '/', '?'),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_us_layout_brackets() {
        let us = StaticLayout::us_ansi();
        assert_eq!(us.translate(KeyCode(0x21), ModifierFlags::empty()), Some('['));
        assert_eq!(us.translate(KeyCode(0x1E), ModifierFlags::empty()), Some(']'));
        assert_eq!(
            us.translate(KeyCode(0x21), ModifierFlags::from_bits(ModifierFlags::SHIFT)),
            Some('{')
        );
    }

    #[test]
    fn test_command_and_control_do_not_change_the_character() {
        let us = StaticLayout::us_ansi();
        let cmd_ctrl = ModifierFlags::from_bits(ModifierFlags::COMMAND | ModifierFlags::CONTROL);
        assert_eq!(us.translate(KeyCode(0x0D), cmd_ctrl), Some('w'));
    }

    #[test]
    fn test_unmapped_key_translates_to_none() {
        let us = StaticLayout::us_ansi();
        assert_eq!(us.translate(KeyCode::ESCAPE, ModifierFlags::empty()), None);
        assert_eq!(us.translate(KeyCode(0x7F), ModifierFlags::empty()), None);
    }

    #[test]
    fn test_every_ascii_letter_is_reachable() {
        let us = StaticLayout::us_ansi();
        for ch in 'a'..='z' {
            let found = (0..KeyCode::PROBE_LIMIT)
                .any(|c| us.translate(KeyCode(c), ModifierFlags::empty()) == Some(ch));
            assert!(found, "'{ch}' should be typeable on the US layout");
        }
    }

    #[test]
    fn test_layout_id_and_size() {
        let us = StaticLayout::us_ansi();
        assert_eq!(us.layout_id(), "com.apple.keylayout.US");
        // 47 keys × 2 layers + space + 3 option characters
        assert_eq!(us.len(), 47 * 2 + 1 + 3);
        assert!(StaticLayout::new("empty").is_empty());
    }
}
