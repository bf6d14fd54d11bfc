//! End-to-end tests: scripted button events through a [`GestureSession`]
//! into recorded key posts, launches and overlay calls.
//!
//! Uses the always-compiled infrastructure doubles (`ScriptedEventSource`,
//! `MockKeyInjector`, `RecordingOverlaySurface`, `MockDisplayProvider`) and an
//! in-memory keyboard layout, so nothing here touches the OS.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use gesture_agent::application::actions::{AppLauncher, LaunchError, LaunchTarget};
use gesture_agent::application::gesture_session::GestureSession;
use gesture_agent::application::synthesize_input::{KeyInjector, SyntheticInputSender};
use gesture_agent::infrastructure::displays::MockDisplayProvider;
use gesture_agent::infrastructure::event_source::scripted::ScriptedEventSource;
use gesture_agent::infrastructure::event_source::EventSource;
use gesture_agent::infrastructure::key_injection::mock::MockKeyInjector;
use gesture_agent::infrastructure::overlay_surface::{OverlayCall, RecordingOverlaySurface};
use gesture_agent::infrastructure::storage::config::AppConfig;
use gesture_core::{
    ButtonEvent, Disposition, KeyCode, KeyLayoutResolver, KeyboardLayoutSource, ModifierFlags,
    OverlaySurface, Point, SessionState, StaticLayout, StaticLayoutSource, StrokeStyle, TrajectoryOverlay,
};

// ── Harness ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingLauncher {
    launched: Mutex<Vec<String>>,
}

impl AppLauncher for RecordingLauncher {
    fn launch(&self, target: &LaunchTarget) -> Result<(), LaunchError> {
        self.launched.lock().unwrap().push(target.bundle_id.clone());
        Ok(())
    }
}

struct Pipeline {
    session: GestureSession,
    injector: Arc<MockKeyInjector>,
    surface: Arc<RecordingOverlaySurface>,
    launcher: Arc<RecordingLauncher>,
    layouts: Arc<StaticLayoutSource>,
}

impl Pipeline {
    fn new(cfg: &AppConfig) -> Self {
        let injector = Arc::new(MockKeyInjector::new());
        let surface = Arc::new(RecordingOverlaySurface::new());
        let launcher = Arc::new(RecordingLauncher::default());
        let layouts = Arc::new(StaticLayoutSource::us_ansi());

        let resolver = KeyLayoutResolver::new(Arc::clone(&layouts) as Arc<dyn KeyboardLayoutSource>);
        let sender = SyntheticInputSender::new(Arc::clone(&injector) as Arc<dyn KeyInjector>, resolver);
        let overlay = TrajectoryOverlay::new(
            Arc::clone(&surface) as Arc<dyn OverlaySurface>,
            Arc::new(MockDisplayProvider::single_1080p()),
            StrokeStyle::default(),
        );
        let session = GestureSession::new(
            sender,
            Arc::clone(&launcher) as Arc<dyn AppLauncher>,
            cfg.mission_control.clone(),
            cfg.bindings.clone(),
        )
        .with_overlay(overlay)
        .with_cooldown(cfg.general.cooldown());

        Self {
            session,
            injector,
            surface,
            launcher,
            layouts,
        }
    }

    fn run(&mut self, events: Vec<ButtonEvent>) -> ScriptedEventSource {
        let mut source = ScriptedEventSource::new(events);
        source.run(&mut self.session).expect("scripted source never fails");
        source
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn down(x: f64, y: f64, t: u64) -> ButtonEvent {
    ButtonEvent::Down { point: Point::new(x, y), at: ms(t) }
}

fn drag(x: f64, y: f64, t: u64) -> ButtonEvent {
    ButtonEvent::Dragged { point: Point::new(x, y), at: ms(t) }
}

fn up(x: f64, y: f64, t: u64) -> ButtonEvent {
    ButtonEvent::Up { point: Point::new(x, y), at: ms(t) }
}

fn cmd() -> ModifierFlags {
    ModifierFlags::from_bits(ModifierFlags::COMMAND)
}

/// German layout: `[` is option+5, the key right of P types `ü`.
fn german() -> StaticLayout {
    StaticLayout::new("com.apple.keylayout.German")
        .with_pair(0x0D, 'w', 'W')
        .with_pair(0x11, 't', 'T')
        .with_pair(0x17, '5', '%')
        .with_key(KeyCode(0x17), ModifierFlags::from_bits(ModifierFlags::OPTION), '[')
        .with_pair(0x21, 'ü', 'Ü')
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_plain_click_passes_through_without_synthesis() {
    // Arrange
    let mut p = Pipeline::new(&AppConfig::default());

    // Act: jitter below the drag threshold
    let source = p.run(vec![down(500.0, 500.0, 0), drag(503.0, 502.0, 10), up(503.0, 502.0, 40)]);

    // Assert
    assert!(p.injector.posted().is_empty());
    assert_eq!(*p.session.state(), SessionState::Idle);
    assert!(source
        .dispositions
        .lock()
        .unwrap()
        .iter()
        .all(|d| *d == Disposition::PassThrough));
    assert_eq!(p.surface.hides(), 1);
}

#[test]
fn test_left_drag_sends_back_once() {
    // Arrange
    let mut p = Pipeline::new(&AppConfig::default());

    // Act
    p.run(vec![down(500.0, 500.0, 0), drag(440.0, 500.0, 30), up(440.0, 500.0, 60)]);

    // Assert
    assert_eq!(p.injector.escapes(), 1);
    assert_eq!(p.injector.shortcuts(), vec![(KeyCode(0x21), cmd())]);
    assert_eq!(p.surface.hides(), 1);
    assert_eq!(*p.session.state(), SessionState::Idle);
}

#[test]
fn test_two_drags_fire_one_action_and_draw_three_points() {
    // Arrange
    let mut p = Pipeline::new(&AppConfig::default());

    // Act
    p.run(vec![
        down(500.0, 500.0, 0),
        drag(440.0, 500.0, 20),
        drag(430.0, 505.0, 40),
        up(430.0, 505.0, 60),
    ]);

    // Assert
    assert_eq!(p.injector.shortcuts().len(), 1);
    assert_eq!(p.injector.escapes(), 1);
    assert_eq!(
        p.surface.last_path(),
        Some(vec![
            Point::new(500.0, 500.0),
            Point::new(440.0, 500.0),
            Point::new(430.0, 505.0),
        ])
    );
    assert_eq!(p.surface.calls().last(), Some(&OverlayCall::Hide));
}

#[test]
fn test_tap_suspension_mid_gesture_keeps_origin() {
    // Arrange
    let mut p = Pipeline::new(&AppConfig::default());

    // Act
    let source = p.run(vec![
        down(500.0, 500.0, 0),
        drag(560.0, 500.0, 20),
        ButtonEvent::TapSuspended { at: ms(30) },
        up(570.0, 500.0, 50),
    ]);

    // Assert: forward is cmd+]
    assert_eq!(*source.rearms.lock().unwrap(), 1);
    assert_eq!(p.injector.shortcuts(), vec![(KeyCode(0x1E), cmd())]);
}

#[test]
fn test_duplicate_release_fires_once() {
    let mut p = Pipeline::new(&AppConfig::default());

    p.run(vec![
        down(500.0, 500.0, 0),
        drag(440.0, 500.0, 20),
        up(440.0, 500.0, 40),
        up(440.0, 500.0, 41),
    ]);

    assert_eq!(p.injector.shortcuts().len(), 1);
}

#[test]
fn test_upward_drag_launches_mission_control() {
    let mut p = Pipeline::new(&AppConfig::default());

    p.run(vec![down(500.0, 500.0, 0), drag(505.0, 420.0, 20), up(505.0, 420.0, 40)]);

    assert_eq!(*p.launcher.launched.lock().unwrap(), vec!["com.apple.exposelauncher".to_string()]);
    assert!(p.injector.shortcuts().is_empty());
}

#[test]
fn test_layout_switch_changes_key_combo() {
    // Arrange
    let mut p = Pipeline::new(&AppConfig::default());
    p.run(vec![down(500.0, 500.0, 0), drag(440.0, 500.0, 20), up(440.0, 500.0, 40)]);

    // Act
    p.layouts.switch_to(german());
    p.session.sender().layout_invalidator().notify();
    p.run(vec![down(500.0, 500.0, 1000), drag(440.0, 500.0, 1020), up(440.0, 500.0, 1040)]);

    // Assert
    let option_cmd = cmd().with(ModifierFlags::OPTION);
    assert_eq!(
        p.injector.shortcuts(),
        vec![(KeyCode(0x21), cmd()), (KeyCode(0x17), option_cmd)]
    );
    assert_eq!(
        p.session.sender().resolver().layout_id(),
        Some("com.apple.keylayout.German")
    );
}

#[test]
fn test_config_driven_bindings() {
    // Arrange
    let cfg: AppConfig = toml::from_str(
        r#"
[general]
cooldown_ms = 0

[bindings]
back = "cmd+shift+t"
forward = "none"
"#,
    )
    .expect("valid config");
    let mut p = Pipeline::new(&cfg);

    // Act: back, then forward immediately after
    p.run(vec![
        down(500.0, 500.0, 0),
        drag(440.0, 500.0, 10),
        up(440.0, 500.0, 20),
        down(500.0, 500.0, 25),
        drag(560.0, 500.0, 30),
        up(560.0, 500.0, 35),
    ]);

    // Assert: 't' on key 0x11 with shift added from the binding
    let cmd_shift = cmd().with(ModifierFlags::SHIFT);
    assert_eq!(p.injector.shortcuts(), vec![(KeyCode(0x11), cmd_shift)]);
    assert_eq!(p.injector.escapes(), 2);
}

#[test]
fn test_cooldown_suppresses_rapid_second_gesture() {
    let mut p = Pipeline::new(&AppConfig::default());

    p.run(vec![
        down(500.0, 500.0, 0),
        drag(440.0, 500.0, 10),
        up(440.0, 500.0, 20),
        down(500.0, 500.0, 30),
        drag(440.0, 500.0, 40),
        up(440.0, 500.0, 50),
    ]);

    assert_eq!(p.injector.shortcuts().len(), 1);
    assert_eq!(p.session.last_fire(), Some(ms(20)));
}
