//! Application launcher backed by the `open` command.
//!
//! `open -b <bundle id>` is tried first; if LaunchServices cannot resolve the
//! identifier, `open <path>` is tried with the fallback path.  There are no
//! retries.
//!
//! [`AppLauncher::launch`] runs on the event tap thread, so the two attempts
//! happen on a short-lived `app-launcher` thread and their outcome is only
//! logged.  [`OpenCommandLauncher::launch_blocking`] performs them inline.

use std::ffi::OsStr;
use std::process::Command;
use std::thread;

use tracing::{debug, error, info};

use crate::application::actions::{AppLauncher, LaunchError, LaunchTarget};

/// Launches applications with `/usr/bin/open`.
#[derive(Debug, Clone)]
pub struct OpenCommandLauncher {
    program: String,
}

impl Default for OpenCommandLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenCommandLauncher {
    pub fn new() -> Self {
        Self::with_program("open")
    }

    /// Uses `program` in place of `open`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Opens `target` on the calling thread, waiting for each `open` to exit.
    ///
    /// # Errors
    ///
    /// [`LaunchError::Failed`] carries the reasons of both attempts.
    pub fn launch_blocking(&self, target: &LaunchTarget) -> Result<(), LaunchError> {
        if !cfg!(target_os = "macos") {
            return Err(LaunchError::Unsupported);
        }

        let by_id = self.run(&["-b".as_ref(), target.bundle_id.as_ref()]);
        let Err(first) = by_id else {
            info!("launched {}", target.bundle_id);
            return Ok(());
        };
        debug!("open -b {} failed ({first}); trying {}", target.bundle_id, target.fallback_path.display());

        self.run(&[target.fallback_path.as_os_str()])
            .map(|()| info!("launched {}", target.fallback_path.display()))
            .map_err(|second| LaunchError::Failed {
                bundle_id: target.bundle_id.clone(),
                fallback_path: target.fallback_path.clone(),
                reason: format!("{first}; {second}"),
            })
    }

    fn run(&self, args: &[&OsStr]) -> Result<(), String> {
        let status = Command::new(&self.program)
            .args(args)
            .status()
            .map_err(|e| format!("{}: {e}", self.program))?;
        if status.success() {
            Ok(())
        } else {
            Err(format!("{} exited with {status}", self.program))
        }
    }
}

impl AppLauncher for OpenCommandLauncher {
    fn launch(&self, target: &LaunchTarget) -> Result<(), LaunchError> {
        if !cfg!(target_os = "macos") {
            return Err(LaunchError::Unsupported);
        }

        let launcher = self.clone();
        let target = target.clone();
        thread::Builder::new()
            .name("app-launcher".to_string())
            .spawn(move || {
                if let Err(e) = launcher.launch_blocking(&target) {
                    error!("{e}");
                }
            })
            .map(drop)
            .map_err(LaunchError::Spawn)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
