//! Main application state management

use std::sync::{Arc, Mutex};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::TimeoutPolicy;
use super::{EngineEvent, InteractionKind, WarningState, ACTIVITY_THROTTLE};

/// Main application state shared between the timer task and the API
#[derive(Debug)]
pub struct AppState {
    /// Validated timeout/warning configuration
    pub policy: TimeoutPolicy,
    /// Current warning visibility and countdown
    pub warning_state: Arc<Mutex<WarningState>>,
    /// Instant of the last qualifying interaction
    pub last_activity: Arc<Mutex<Instant>>,
    /// Whether the auth provider currently reports a session
    pub session_present: Arc<Mutex<bool>>,
    /// Server metadata
    pub start_time: std::time::Instant,
    /// Last observed event tracking
    pub last_event: Arc<Mutex<Option<String>>>,
    pub last_event_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for timer reset events
    pub event_tx: broadcast::Sender<EngineEvent>,
    /// Channel for warning state updates
    pub warning_update_tx: watch::Sender<WarningState>,
    /// Keep the receiver alive to prevent channel closure
    pub _warning_update_rx: watch::Receiver<WarningState>,
}

impl AppState {
    /// Create a new AppState for the given policy
    pub fn new(policy: TimeoutPolicy) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let (warning_update_tx, warning_update_rx) = watch::channel(WarningState::new());

        Self {
            policy,
            warning_state: Arc::new(Mutex::new(WarningState::new())),
            last_activity: Arc::new(Mutex::new(Instant::now())),
            session_present: Arc::new(Mutex::new(false)),
            start_time: std::time::Instant::now(),
            last_event: Arc::new(Mutex::new(None)),
            last_event_time: Arc::new(Mutex::new(None)),
            event_tx,
            warning_update_tx,
            _warning_update_rx: warning_update_rx,
        }
    }

    /// Subscribe to timer reset events
    pub fn subscribe_events(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Subscribe to warning state updates
    pub fn subscribe_warning(&self) -> watch::Receiver<WarningState> {
        self.warning_update_tx.subscribe()
    }

    /// Record a user interaction and emit the matching timer resets.
    ///
    /// The idle reset is throttled: it fires only when more than one second
    /// has passed since the last recorded activity, except for the
    /// visibility-return event which always counts. Dismiss-category events
    /// additionally emit an unthrottled warning reset.
    pub fn record_interaction(&self, kind: InteractionKind) -> Result<(), String> {
        let now = Instant::now();
        let mut idle_reset = false;
        {
            let mut last = self.last_activity.lock()
                .map_err(|e| format!("Failed to lock activity timestamp: {}", e))?;

            if kind.bypasses_throttle() || now.duration_since(*last) > ACTIVITY_THROTTLE {
                *last = now;
                idle_reset = true;
            }
        }

        self.note_event(kind.as_str());

        if idle_reset {
            debug!("Qualifying activity: {}", kind);
            self.send_event(EngineEvent::IdleReset);
        } else {
            debug!("Throttled activity: {}", kind);
        }

        if kind.dismisses() {
            self.send_event(EngineEvent::WarningReset);
        }

        Ok(())
    }

    /// Extend the session from an explicit user action.
    ///
    /// Hides the warning immediately; the timer task restarts the idle and
    /// warning deadlines when it observes the event.
    pub fn extend_session(&self) -> Result<(), String> {
        self.note_event("extend");
        self.clear_warning()?;

        {
            let mut last = self.last_activity.lock()
                .map_err(|e| format!("Failed to lock activity timestamp: {}", e))?;
            *last = Instant::now();
        }

        self.send_event(EngineEvent::Extend);
        Ok(())
    }

    /// Make the warning visible and start its countdown
    pub fn show_warning(&self, seconds: u64) -> Result<(), String> {
        let mut warning = self.warning_state.lock()
            .map_err(|e| format!("Failed to lock warning state: {}", e))?;

        warning.visible = true;
        warning.seconds_remaining = Some(seconds);
        let snapshot = warning.clone();
        drop(warning);

        self.publish_warning(snapshot);
        Ok(())
    }

    /// Advance the countdown by one second.
    ///
    /// Returns the new remaining value, or `None` once the countdown has
    /// stopped. Reaching zero clears the remaining seconds but leaves the
    /// warning visible; idle expiry resolves the visibility.
    pub fn countdown_tick(&self) -> Result<Option<u64>, String> {
        let mut warning = self.warning_state.lock()
            .map_err(|e| format!("Failed to lock warning state: {}", e))?;

        if !warning.visible {
            return Ok(None);
        }

        let next = match warning.seconds_remaining {
            Some(seconds) if seconds > 1 => Some(seconds - 1),
            _ => None,
        };
        warning.seconds_remaining = next;
        let snapshot = warning.clone();
        drop(warning);

        self.publish_warning(snapshot);
        Ok(next)
    }

    /// Hide the warning and stop its countdown
    pub fn clear_warning(&self) -> Result<(), String> {
        let mut warning = self.warning_state.lock()
            .map_err(|e| format!("Failed to lock warning state: {}", e))?;

        if !warning.visible && warning.seconds_remaining.is_none() {
            return Ok(());
        }

        *warning = WarningState::hidden();
        let snapshot = warning.clone();
        drop(warning);

        self.publish_warning(snapshot);
        Ok(())
    }

    /// Get the current warning state
    pub fn get_warning_state(&self) -> Result<WarningState, String> {
        self.warning_state.lock()
            .map(|state| state.clone())
            .map_err(|e| format!("Failed to lock warning state: {}", e))
    }

    /// Record whether a session is currently present
    pub fn set_session_present(&self, present: bool) -> Result<(), String> {
        let mut session = self.session_present.lock()
            .map_err(|e| format!("Failed to lock session presence: {}", e))?;
        *session = present;
        Ok(())
    }

    /// Check whether a session is currently present
    pub fn is_session_present(&self) -> Result<bool, String> {
        self.session_present.lock()
            .map(|present| *present)
            .map_err(|e| format!("Failed to lock session presence: {}", e))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last event information
    pub fn get_last_event(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_event = self.last_event.lock().ok().and_then(|e| e.clone());
        let last_event_time = self.last_event_time.lock().ok().and_then(|t| *t);
        (last_event, last_event_time)
    }

    fn note_event(&self, name: &str) {
        if let Ok(mut last_event) = self.last_event.lock() {
            *last_event = Some(name.to_string());
        }
        if let Ok(mut last_time) = self.last_event_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn send_event(&self, event: EngineEvent) {
        if let Err(e) = self.event_tx.send(event) {
            warn!("No timer task listening for {:?}: {}", event, e);
        }
    }

    fn publish_warning(&self, snapshot: WarningState) {
        if let Err(e) = self.warning_update_tx.send(snapshot) {
            warn!("Failed to send warning update: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::advance;

    fn test_state() -> AppState {
        let policy = TimeoutPolicy::new(Duration::from_secs(30), Duration::from_secs(10))
            .expect("valid policy");
        AppState::new(policy)
    }

    #[tokio::test(start_paused = true)]
    async fn click_emits_idle_and_warning_resets() {
        let state = test_state();
        let mut events = state.subscribe_events();

        advance(Duration::from_secs(5)).await;
        state.record_interaction(InteractionKind::Click).expect("recorded");

        assert!(matches!(events.try_recv(), Ok(EngineEvent::IdleReset)));
        assert!(matches!(events.try_recv(), Ok(EngineEvent::WarningReset)));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn idle_reset_is_throttled_but_warning_reset_is_not() {
        let state = test_state();
        let mut events = state.subscribe_events();

        advance(Duration::from_secs(5)).await;
        state.record_interaction(InteractionKind::Click).expect("recorded");
        assert!(matches!(events.try_recv(), Ok(EngineEvent::IdleReset)));
        assert!(matches!(events.try_recv(), Ok(EngineEvent::WarningReset)));

        // Within the one second throttle only the warning reset goes out.
        advance(Duration::from_millis(500)).await;
        state.record_interaction(InteractionKind::Click).expect("recorded");
        assert!(matches!(events.try_recv(), Ok(EngineEvent::WarningReset)));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn pointer_move_never_emits_warning_reset() {
        let state = test_state();
        let mut events = state.subscribe_events();

        advance(Duration::from_secs(5)).await;
        state.record_interaction(InteractionKind::PointerMove).expect("recorded");
        assert!(matches!(events.try_recv(), Ok(EngineEvent::IdleReset)));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn visibility_return_bypasses_the_throttle() {
        let state = test_state();
        let mut events = state.subscribe_events();

        advance(Duration::from_secs(5)).await;
        state.record_interaction(InteractionKind::PointerMove).expect("recorded");
        assert!(matches!(events.try_recv(), Ok(EngineEvent::IdleReset)));

        state.record_interaction(InteractionKind::VisibilityVisible).expect("recorded");
        assert!(matches!(events.try_recv(), Ok(EngineEvent::IdleReset)));
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_counts_down_and_stops_at_zero() {
        let state = test_state();
        state.show_warning(3).expect("shown");

        assert_eq!(state.countdown_tick().expect("tick"), Some(2));
        assert_eq!(state.countdown_tick().expect("tick"), Some(1));
        assert_eq!(state.countdown_tick().expect("tick"), None);

        // Seconds cleared but visibility left for idle expiry to resolve.
        let warning = state.get_warning_state().expect("state");
        assert!(warning.visible);
        assert_eq!(warning.seconds_remaining, None);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_tick_is_a_noop_while_hidden() {
        let state = test_state();
        assert_eq!(state.countdown_tick().expect("tick"), None);
        assert!(!state.get_warning_state().expect("state").visible);
    }

    #[tokio::test(start_paused = true)]
    async fn extend_hides_warning_and_emits_extend() {
        let state = test_state();
        let mut events = state.subscribe_events();
        state.show_warning(10).expect("shown");

        state.extend_session().expect("extended");

        let warning = state.get_warning_state().expect("state");
        assert!(!warning.visible);
        assert_eq!(warning.seconds_remaining, None);
        assert!(matches!(events.try_recv(), Ok(EngineEvent::Extend)));
    }

    #[tokio::test(start_paused = true)]
    async fn warning_updates_are_published_on_the_watch_channel() {
        let state = test_state();
        let mut updates = state.subscribe_warning();

        state.show_warning(10).expect("shown");
        assert!(updates.has_changed().expect("open channel"));
        assert!(updates.borrow_and_update().visible);

        state.clear_warning().expect("cleared");
        assert!(!updates.borrow_and_update().visible);
    }
}
