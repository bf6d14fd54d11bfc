//! Key vocabulary for synthesized shortcuts.
//!
//! Shortcuts are specified by *character* (`cmd+[`), not by physical key,
//! because the key that produces `[` differs between keyboard layouts.  The
//! [`layout::KeyLayoutResolver`] turns a character into a physical
//! [`KeyCode`] plus whatever extra modifiers the active layout needs.

pub mod ansi;
pub mod layout;

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A physical key position (macOS virtual key code, `kVK_*`).
///
/// Key codes identify positions on the keyboard, not the characters printed
/// on them; `0x21` is the key right of `P` whether it types `[` (US) or `ü`
/// (German).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u16);

impl KeyCode {
    /// `kVK_Escape`: layout independent, used to dismiss a native menu.
    pub const ESCAPE: KeyCode = KeyCode(0x35);

    /// Exclusive upper bound of the key codes probed during reverse lookup.
    pub const PROBE_LIMIT: u16 = 128;
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// A set of held modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierFlags(pub u8);

impl ModifierFlags {
    pub const SHIFT: u8 = 1 << 0;
    pub const CONTROL: u8 = 1 << 1;
    pub const OPTION: u8 = 1 << 2;
    pub const COMMAND: u8 = 1 << 3;

    /// No modifiers held.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// A set holding exactly the modifiers in `bits`.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Returns this set with the modifiers in `bits` added.
    pub const fn with(self, bits: u8) -> Self {
        Self(self.0 | bits)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn shift(&self) -> bool {
        self.0 & Self::SHIFT != 0
    }

    pub fn control(&self) -> bool {
        self.0 & Self::CONTROL != 0
    }

    pub fn option(&self) -> bool {
        self.0 & Self::OPTION != 0
    }

    pub fn command(&self) -> bool {
        self.0 & Self::COMMAND != 0
    }
}

impl BitOr for ModifierFlags {
    type Output = ModifierFlags;

    fn bitor(self, rhs: ModifierFlags) -> ModifierFlags {
        ModifierFlags(self.0 | rhs.0)
    }
}

impl fmt::Display for ModifierFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(4);
        if self.control() {
            parts.push("ctrl");
        }
        if self.option() {
            parts.push("opt");
        }
        if self.shift() {
            parts.push("shift");
        }
        if self.command() {
            parts.push("cmd");
        }
        f.write_str(&parts.join("+"))
    }
}

/// Errors produced when parsing a shortcut string such as `"cmd+shift+t"`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShortcutParseError {
    #[error("shortcut is empty")]
    Empty,
    #[error("unknown modifier '{0}' (expected cmd, shift, opt or ctrl)")]
    UnknownModifier(String),
    #[error("shortcut key '{0}' must be exactly one character")]
    KeyNotSingleCharacter(String),
    #[error("shortcut has modifiers but no key")]
    MissingKey,
}

/// A character plus the modifiers the user intends to hold with it.
///
/// The modifiers here are the *base* set: the resolver may add shift or
/// option on top if the active layout only produces the character that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Shortcut {
    pub key: char,
    pub modifiers: ModifierFlags,
}

impl Shortcut {
    pub const fn new(key: char, modifiers: ModifierFlags) -> Self {
        Self { key, modifiers }
    }

    /// `cmd` + `key`, the shape of every default binding.
    pub const fn command(key: char) -> Self {
        Self::new(key, ModifierFlags::from_bits(ModifierFlags::COMMAND))
    }
}

impl FromStr for Shortcut {
    type Err = ShortcutParseError;

    /// Parses `"[mod+]*key"`.  The key is the text after the last `+`, so
    /// `"cmd++"` binds the plus key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ShortcutParseError::Empty);
        }

        let (mods, key) = if s == "+" {
            ("", "+")
        } else if let Some(rest) = s.strip_suffix("++") {
            (rest, "+")
        } else {
            match s.rfind('+') {
                Some(idx) if idx + 1 == s.len() => return Err(ShortcutParseError::MissingKey),
                Some(idx) => (&s[..idx], &s[idx + 1..]),
                None => ("", s),
            }
        };

        let mut chars = key.chars();
        let ch = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(ShortcutParseError::KeyNotSingleCharacter(key.to_string())),
        };

        let mut modifiers = ModifierFlags::empty();
        for token in mods.split('+').filter(|t| !t.is_empty()) {
            let bit = match token.to_ascii_lowercase().as_str() {
                "cmd" | "command" => ModifierFlags::COMMAND,
                "shift" => ModifierFlags::SHIFT,
                "opt" | "option" | "alt" => ModifierFlags::OPTION,
                "ctrl" | "control" => ModifierFlags::CONTROL,
                other => return Err(ShortcutParseError::UnknownModifier(other.to_string())),
            };
            modifiers = modifiers.with(bit);
        }

        Ok(Shortcut::new(ch, modifiers))
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.modifiers, self.key)
        }
    }
}

impl TryFrom<String> for Shortcut {
    type Error = ShortcutParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Shortcut> for String {
    fn from(value: Shortcut) -> Self {
        value.to_string()
    }
}
