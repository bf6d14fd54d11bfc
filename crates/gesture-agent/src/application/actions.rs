//! Gesture bindings: what each recognised gesture does.
//!
//! A binding is written in the config file as a string:
//!
//! | Value                 | Action                                   |
//! |-----------------------|------------------------------------------|
//! | `"cmd+["` (any shortcut) | [`GestureAction::Shortcut`]           |
//! | `"launch"`            | [`GestureAction::Launch`] (Mission Control) |
//! | `"none"` or `""`      | [`GestureAction::Disabled`]              |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use gesture_core::{GestureOutcome, Shortcut, ShortcutParseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when an application launch fails.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Neither the bundle identifier nor the fallback path could be opened.
    #[error("could not launch '{bundle_id}' or '{}': {reason}", .fallback_path.display())]
    Failed {
        bundle_id: String,
        fallback_path: PathBuf,
        reason: String,
    },
    /// The helper thread that runs the launch could not be started.
    #[error("could not start the launch thread: {0}")]
    Spawn(#[source] std::io::Error),
    /// Launching applications is not supported on this platform.
    #[error("application launch is not supported on this platform")]
    Unsupported,
}

/// The application opened by [`GestureAction::Launch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchTarget {
    /// Bundle identifier tried first.
    #[serde(default = "default_bundle_id")]
    pub bundle_id: String,
    /// Application path tried when the bundle identifier cannot be resolved.
    #[serde(default = "default_fallback_path")]
    pub fallback_path: PathBuf,
}

fn default_bundle_id() -> String {
    "com.apple.exposelauncher".to_string()
}

fn default_fallback_path() -> PathBuf {
    PathBuf::from("/System/Applications/Mission Control.app")
}

impl Default for LaunchTarget {
    fn default() -> Self {
        Self {
            bundle_id: default_bundle_id(),
            fallback_path: default_fallback_path(),
        }
    }
}

/// Opens applications.
///
/// Called from the event tap callback, so `launch` must return without
/// waiting for the application to open. The macOS implementation hands the
/// `open` invocation to a helper thread and logs its outcome there.
#[cfg_attr(test, mockall::automock)]
pub trait AppLauncher: Send + Sync {
    /// Starts launching `target`, trying its bundle identifier before its path.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError`] if the launch could not be started.
    fn launch(&self, target: &LaunchTarget) -> Result<(), LaunchError>;
}

/// What a gesture does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GestureAction {
    /// Type a keyboard shortcut.
    Shortcut(Shortcut),
    /// Open the configured [`LaunchTarget`].
    Launch,
    /// Do nothing.
    Disabled,
}

impl FromStr for GestureAction {
    type Err = ShortcutParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(GestureAction::Disabled),
            t if t.eq_ignore_ascii_case("none") => Ok(GestureAction::Disabled),
            t if t.eq_ignore_ascii_case("launch") => Ok(GestureAction::Launch),
            t => t.parse().map(GestureAction::Shortcut),
        }
    }
}

impl fmt::Display for GestureAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureAction::Shortcut(s) => write!(f, "{s}"),
            GestureAction::Launch => f.write_str("launch"),
            GestureAction::Disabled => f.write_str("none"),
        }
    }
}

impl TryFrom<String> for GestureAction {
    type Error = ShortcutParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GestureAction> for String {
    fn from(value: GestureAction) -> Self {
        value.to_string()
    }
}

/// The action bound to each actionable gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureBindings {
    #[serde(default = "default_back")]
    pub back: GestureAction,
    #[serde(default = "default_forward")]
    pub forward: GestureAction,
    #[serde(default = "default_close_tab")]
    pub close_tab: GestureAction,
    #[serde(default = "default_new_tab")]
    pub new_tab: GestureAction,
    #[serde(default = "default_mission_control")]
    pub mission_control: GestureAction,
}

fn default_back() -> GestureAction {
    GestureAction::Shortcut(Shortcut::command('['))
}
fn default_forward() -> GestureAction {
    GestureAction::Shortcut(Shortcut::command(']'))
}
fn default_close_tab() -> GestureAction {
    GestureAction::Shortcut(Shortcut::command('w'))
}
fn default_new_tab() -> GestureAction {
    GestureAction::Shortcut(Shortcut::command('t'))
}
fn default_mission_control() -> GestureAction {
    GestureAction::Launch
}

impl Default for GestureBindings {
    fn default() -> Self {
        Self {
            back: default_back(),
            forward: default_forward(),
            close_tab: default_close_tab(),
            new_tab: default_new_tab(),
            mission_control: default_mission_control(),
        }
    }
}

impl GestureBindings {
    /// The action bound to `outcome`; `None` for [`GestureOutcome::None`].
    pub fn action_for(&self, outcome: GestureOutcome) -> Option<GestureAction> {
        match outcome {
            GestureOutcome::Back => Some(self.back),
            GestureOutcome::Forward => Some(self.forward),
            GestureOutcome::CloseTab => Some(self.close_tab),
            GestureOutcome::NewTab => Some(self.new_tab),
            GestureOutcome::MissionControl => Some(self.mission_control),
            GestureOutcome::None => None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings_match_browser_shortcuts() {
        let b = GestureBindings::default();
        assert_eq!(b.action_for(GestureOutcome::Back).map(|a| a.to_string()), Some("cmd+[".into()));
        assert_eq!(b.action_for(GestureOutcome::Forward).map(|a| a.to_string()), Some("cmd+]".into()));
        assert_eq!(b.action_for(GestureOutcome::CloseTab).map(|a| a.to_string()), Some("cmd+w".into()));
        assert_eq!(b.action_for(GestureOutcome::NewTab).map(|a| a.to_string()), Some("cmd+t".into()));
        assert_eq!(b.action_for(GestureOutcome::MissionControl), Some(GestureAction::Launch));
        assert_eq!(b.action_for(GestureOutcome::None), None);
    }

    #[test]
    fn test_every_actionable_outcome_has_a_binding() {
        let b = GestureBindings::default();
        for outcome in GestureOutcome::ACTIONABLE {
            assert!(b.action_for(outcome).is_some(), "{outcome} unbound");
        }
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("launch".parse::<GestureAction>(), Ok(GestureAction::Launch));
        assert_eq!("NONE".parse::<GestureAction>(), Ok(GestureAction::Disabled));
        assert_eq!("".parse::<GestureAction>(), Ok(GestureAction::Disabled));
        assert_eq!(
            "cmd+shift+t".parse::<GestureAction>(),
            Ok(GestureAction::Shortcut("cmd+shift+t".parse().expect("shortcut")))
        );
        assert!("cmd+tab".parse::<GestureAction>().is_err());
    }

    #[test]
    fn test_launch_target_defaults() {
        let t = LaunchTarget::default();
        assert_eq!(t.bundle_id, "com.apple.exposelauncher");
        assert!(t.fallback_path.ends_with("Mission Control.app"));
    }

    #[test]
    fn test_automock_launcher_reports_failure() {
        // Arrange
        let mut launcher = MockAppLauncher::new();
        launcher
            .expect_launch()
            .times(1)
            .returning(|_| Err(LaunchError::Unsupported));

        // Act
        let result = launcher.launch(&LaunchTarget::default());

        // Assert
        assert!(matches!(result, Err(LaunchError::Unsupported)));
    }
}
