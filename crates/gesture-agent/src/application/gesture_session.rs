//! GestureSession: the secondary-button drag state machine.
//!
//! The session consumes every [`ButtonEvent`] the event source delivers and
//! decides, on release, whether the press was a click or a gesture.
//!
//! # Transitions
//!
//! - **Down** – record the origin, start the overlay.
//! - **Dragged** – extend the overlay; the first move that reaches the drag
//!   threshold posts one Escape to dismiss the context menu the platform may
//!   already have opened for the press.
//! - **Up** after a drag – classify `(up - origin)` and fire the bound action.
//!   **Up** after a click, or with no press recorded, classifies nothing.
//!   Either way the overlay is cleared and the state returns to idle.
//! - **TapSuspended** – ask the event source to re-arm; the press in flight
//!   (if any) is kept.
//!
//! Every event is passed through to the platform unmodified.  Failures in
//! the action path are logged and swallowed here so they can never tear down
//! the event-tap thread.

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use gesture_core::{
    classify, ButtonEvent, Disposition, GestureOutcome, KeyCode, ModifierFlags, Point,
    SessionState, TrajectoryOverlay,
};
use tracing::{debug, error, info, trace, warn};

use super::actions::{AppLauncher, GestureAction, GestureBindings, LaunchTarget};
use super::synthesize_input::SyntheticInputSender;

/// Default advisory gap between two fired gestures: 100 ms.
///
/// A release that lands less than this long after the previous fired gesture
/// is still classified and logged at debug, but its action is not fired.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(100);

/// Receives button events from an event source.
///
/// The event source calls this synchronously on its own thread and acts on
/// the returned [`Disposition`] before delivering the next event.
pub trait ButtonEventHandler {
    fn handle_event(&mut self, event: ButtonEvent) -> Disposition;
}

/// The gesture state machine and its collaborators.
pub struct GestureSession {
    state: SessionState,
    sender: SyntheticInputSender,
    overlay: Option<TrajectoryOverlay>,
    launcher: Arc<dyn AppLauncher>,
    launch_target: LaunchTarget,
    bindings: GestureBindings,
    cooldown: Duration,
    last_fire: Option<Duration>,
}

impl GestureSession {
    /// Creates an idle session without an overlay and with [`DEFAULT_COOLDOWN`].
    pub fn new(
        sender: SyntheticInputSender,
        launcher: Arc<dyn AppLauncher>,
        launch_target: LaunchTarget,
        bindings: GestureBindings,
    ) -> Self {
        Self {
            state: SessionState::Idle,
            sender,
            overlay: None,
            launcher,
            launch_target,
            bindings,
            cooldown: DEFAULT_COOLDOWN,
            last_fire: None,
        }
    }

    /// Attaches a trajectory overlay.
    pub fn with_overlay(mut self, overlay: TrajectoryOverlay) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Sets the advisory cooldown; `Duration::ZERO` disables it.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn overlay(&self) -> Option<&TrajectoryOverlay> {
        self.overlay.as_ref()
    }

    pub fn sender(&self) -> &SyntheticInputSender {
        &self.sender
    }

    /// Timestamp of the last release that fired an action.
    pub fn last_fire(&self) -> Option<Duration> {
        self.last_fire
    }

    fn on_down(&mut self, point: Point, at: Duration) {
        if self.state.is_pending_fire() {
            debug!("secondary press without release; restarting gesture");
        }
        self.state = SessionState::Pressed {
            origin: point,
            pressed_at: at,
        };
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.start(point);
        }
    }

    fn on_drag(&mut self, point: Point) {
        if !self.state.is_pending_fire() {
            return;
        }
        if self.state.on_drag(point) {
            debug!("drag threshold crossed at ({:.0}, {:.0})", point.x, point.y);
            // Best effort: there is no way to confirm a menu was open or closed.
            if let Err(e) = self
                .sender
                .send_physical_key(KeyCode::ESCAPE, ModifierFlags::empty())
            {
                warn!("could not send menu-dismiss Escape: {e}");
            }
        }
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.extend(point);
        }
    }

    fn on_up(&mut self, point: Point, at: Duration) {
        match mem::take(&mut self.state) {
            SessionState::Idle => trace!("release without a recorded press; ignoring"),
            SessionState::Pressed { .. } => trace!("plain click; leaving context menu alone"),
            SessionState::Dragging { origin, .. } => {
                let (dx, dy) = point - origin;
                let outcome = classify(dx, dy);
                info!("gesture dx={dx:.0} dy={dy:.0} -> {outcome}");
                if outcome != GestureOutcome::None {
                    self.fire(outcome, at);
                }
            }
        }
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.clear();
        }
    }

    fn fire(&mut self, outcome: GestureOutcome, at: Duration) {
        if let Some(last) = self.last_fire {
            if !self.cooldown.is_zero() && at.saturating_sub(last) < self.cooldown {
                debug!("{outcome} suppressed: within {:?} of the previous gesture", self.cooldown);
                return;
            }
        }

        let Some(action) = self.bindings.action_for(outcome) else {
            return;
        };

        match action {
            GestureAction::Shortcut(shortcut) => {
                if let Err(e) = self
                    .sender
                    .send_character_with_modifier(shortcut.key, shortcut.modifiers)
                {
                    warn!("{outcome} ({shortcut}) skipped: {e}");
                }
            }
            GestureAction::Launch => {
                if let Err(e) = self.launcher.launch(&self.launch_target) {
                    error!("{outcome} launch failed: {e}");
                }
            }
            GestureAction::Disabled => {
                debug!("{outcome} is disabled");
                return;
            }
        }
        self.last_fire = Some(at);
    }
}

impl ButtonEventHandler for GestureSession {
    fn handle_event(&mut self, event: ButtonEvent) -> Disposition {
        match event {
            ButtonEvent::Down { point, at } => self.on_down(point, at),
            ButtonEvent::Dragged { point, .. } => self.on_drag(point),
            ButtonEvent::Up { point, at } => self.on_up(point, at),
            ButtonEvent::TapSuspended { .. } => {
                warn!("event tap suspended by the system; re-arming");
                return Disposition::Rearm;
            }
        }
        Disposition::PassThrough
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
