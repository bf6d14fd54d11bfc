//! Mouse Gestures agent entry point.
//!
//! Watches secondary-button drags system-wide and turns them into keyboard
//! shortcuts.  A plain secondary click is left alone so the context menu
//! still opens.
//!
//! # Usage
//!
//! ```text
//! gesture-agent [OPTIONS]
//!
//! Options:
//!   --config <PATH>       Config file [default: platform config dir]
//!   --log-level <LEVEL>   Overrides general.log_level
//!   --no-overlay          Skip trajectory tracking (the trail is logged, never drawn)
//!   --no-prompt           Do not show the Accessibility prompt
//!   --print-config        Print the effective config as TOML and exit
//! ```
//!
//! `RUST_LOG` takes precedence over both `--log-level` and the config file.
//!
//! # Startup
//!
//! ```text
//! main()
//!  └─ load config
//!  └─ check accessibility trust ── denied ──▶ log and exit
//!  └─ build SyntheticInputSender (live layout source + CGEvent injector)
//!  └─ subscribe to layout-change notifications
//!  └─ build GestureSession (+ logged trajectory overlay)
//!  └─ MacosEventTap::run  (blocks on the main run loop)
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gesture_agent::infrastructure::storage::config::{self, AppConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Secondary-button drag gestures for back, forward, tabs and Mission Control.
#[derive(Debug, Parser)]
#[command(name = "gesture-agent", version)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, env = "GESTURE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (`error`, `warn`, `info`, `debug`, `trace`).
    #[arg(long, env = "GESTURE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Skip trajectory tracking (the trail is logged, never drawn).
    ///
    /// The agent ships no drawing surface; with tracking on, the gesture path
    /// is reported at debug and trace level.
    #[arg(long)]
    no_overlay: bool,

    /// Do not show the system Accessibility prompt when not yet trusted.
    #[arg(long)]
    no_prompt: bool,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    /// Loads the config file and applies the command-line overrides.
    fn into_app_config(self) -> anyhow::Result<(AppConfig, bool)> {
        let mut cfg = match &self.config {
            Some(path) => config::load_config_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => config::load_config().context("failed to load config")?,
        };

        if let Some(level) = self.log_level {
            cfg.general.log_level = level;
        }
        if self.no_overlay {
            cfg.overlay.enabled = false;
        }
        if self.no_prompt {
            cfg.general.prompt_for_trust = false;
        }
        Ok((cfg, self.print_config))
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let (cfg, print_config) = Cli::parse().into_app_config()?;

    if print_config {
        print!("{}", config::to_toml(&cfg).context("failed to render config")?);
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.general.log_level)),
        )
        .init();

    info!("Mouse Gestures agent starting (v{})", env!("CARGO_PKG_VERSION"));
    run(cfg)?;
    info!("Mouse Gestures agent stopped");
    Ok(())
}

#[cfg(target_os = "macos")]
fn run(cfg: AppConfig) -> anyhow::Result<()> {
    use std::sync::Arc;

    use gesture_agent::application::gesture_session::GestureSession;
    use gesture_agent::application::synthesize_input::SyntheticInputSender;
    use gesture_agent::infrastructure::displays::macos::CgDisplayProvider;
    use gesture_agent::infrastructure::event_source::{macos::MacosEventTap, EventSource};
    use gesture_agent::infrastructure::key_injection::macos::CgKeyInjector;
    use gesture_agent::infrastructure::keyboard_layout::macos::{
        LayoutChangeSubscription, MacosLayoutSource,
    };
    use gesture_agent::infrastructure::launcher::OpenCommandLauncher;
    use gesture_agent::infrastructure::overlay_surface::TracingOverlaySurface;
    use gesture_agent::infrastructure::permissions::ensure_trusted;
    use gesture_core::{KeyLayoutResolver, TrajectoryOverlay};

    // Nothing is installed without the grant.
    if let Err(e) = ensure_trusted(cfg.general.prompt_for_trust) {
        tracing::error!("{e}");
        return Ok(());
    }

    let resolver = KeyLayoutResolver::new(Arc::new(MacosLayoutSource::new()));
    let sender = SyntheticInputSender::new(Arc::new(CgKeyInjector::new()), resolver);
    let _layout_subscription = LayoutChangeSubscription::subscribe(sender.layout_invalidator());

    let mut session = GestureSession::new(
        sender,
        Arc::new(OpenCommandLauncher::new()),
        cfg.mission_control.clone(),
        cfg.bindings.clone(),
    )
    .with_cooldown(cfg.general.cooldown());

    if cfg.overlay.enabled {
        session = session.with_overlay(TrajectoryOverlay::new(
            Arc::new(TracingOverlaySurface::new()),
            Arc::new(CgDisplayProvider::new()),
            cfg.overlay.stroke_style(),
        ));
    }

    MacosEventTap::new()
        .run(&mut session)
        .context("event tap failed")
}

#[cfg(not(target_os = "macos"))]
fn run(_cfg: AppConfig) -> anyhow::Result<()> {
    use gesture_agent::infrastructure::event_source::EventSourceError;

    tracing::warn!("{}; exiting", EventSourceError::Unsupported);
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
