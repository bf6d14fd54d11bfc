//! TOML-based configuration for the gesture agent.
//!
//! Reads [`AppConfig`] from the platform-appropriate config file:
//! - macOS:    `~/Library/Application Support/MouseGestures/config.toml`
//! - Linux:    `~/.config/mousegestures/config.toml`
//!
//! ```toml
//! [general]
//! log_level = "info"
//! cooldown_ms = 100
//!
//! [bindings]
//! back = "cmd+["
//! mission_control = "launch"
//!
//! [overlay]
//! stroke_color = "#3B82F6CC"
//! ```
//!
//! Every field carries a `#[serde(default = "...")]`, so a missing file, a
//! missing section and a missing key all fall back to the built-in values.
//! A binding that does not parse as a shortcut is a [`ConfigError::Parse`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use gesture_core::{Rgba, StrokeStyle};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::actions::{GestureBindings, LaunchTarget};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub bindings: GestureBindings,
    /// Application opened by gestures bound to `"launch"`.
    #[serde(default)]
    pub mission_control: LaunchTarget,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

/// General agent behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Minimum gap between two fired gestures, in milliseconds.  `0` disables.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    /// Whether to show the system's Accessibility prompt when not trusted.
    #[serde(default = "default_true")]
    pub prompt_for_trust: bool,
}

/// Trajectory overlay appearance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Line width in points.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "default_stroke_color")]
    pub stroke_color: Rgba,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_cooldown_ms() -> u64 {
    100
}
fn default_true() -> bool {
    true
}
fn default_stroke_width() -> f64 {
    StrokeStyle::default().width
}
fn default_stroke_color() -> Rgba {
    StrokeStyle::default().color
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            cooldown_ms: default_cooldown_ms(),
            prompt_for_trust: default_true(),
        }
    }
}

impl GeneralConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            stroke_width: default_stroke_width(),
            stroke_color: default_stroke_color(),
        }
    }
}

impl OverlayConfig {
    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            width: self.stroke_width,
            color: self.stroke_color,
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads the config from the platform config file.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed or a binding is invalid.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Renders `config` as pretty TOML.
///
/// # Errors
///
/// Returns [`ConfigError::Serialize`] if serialization fails.
pub fn to_toml(config: &AppConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}

/// Resolves the platform config directory, including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/MouseGestures
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("MouseGestures")
        })
    }

    #[cfg(not(target_os = "macos"))]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("mousegestures"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
