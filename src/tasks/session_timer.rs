//! Idle session timer background task

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, warn};

use crate::{
    session::{Navigator, SessionProvider},
    state::{AppState, EngineEvent},
};

/// Optional callback invoked after a successful forced sign-out
pub type OnTimeout = Box<dyn Fn() + Send + Sync>;

/// Countdown tick interval
const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Background task that owns every idle/warning deadline.
///
/// The task is the single owner of the three scheduled instants (idle
/// deadline, warning deadline, countdown tick); every reset replaces the
/// previous deadline, so at most one of each is ever pending. It is inert
/// whenever no session is present and re-arms with fresh timers when one is
/// detected.
pub async fn session_timer_task(
    state: Arc<AppState>,
    provider: Arc<dyn SessionProvider>,
    navigator: Arc<dyn Navigator>,
    on_timeout: Option<OnTimeout>,
) {
    if !state.policy.enabled {
        info!("Idle timeout disabled by configuration, timer task not starting");
        return;
    }

    info!("Starting session timer task");

    let mut events = state.subscribe_events();
    let mut session_changes = provider.subscribe();

    // Initial session check; a failed check counts as no session.
    let mut gate = match provider.current_session().await {
        Ok(session) => session.is_some(),
        Err(e) => {
            warn!("Initial session check failed, assuming signed out: {}", e);
            false
        }
    };
    if let Err(e) = state.set_session_present(gate) {
        error!("Failed to record session presence: {}", e);
    }

    let timeout = state.policy.timeout;
    let lead = state.policy.warning_lead();

    let mut idle_at: Option<Instant> = None;
    let mut warn_at: Option<Instant> = None;
    let mut tick_at: Option<Instant> = None;

    if gate {
        let now = Instant::now();
        idle_at = Some(now + timeout);
        warn_at = Some(now + lead);
        info!("Session detected, idle timer armed for {}s", timeout.as_secs());
    }

    loop {
        tokio::select! {
            _ = sleep_until(warn_at.unwrap_or_else(far_future)), if gate && warn_at.is_some() => {
                warn_at = None;
                let seconds = state.policy.warning_seconds();
                info!("Warning deadline reached, {}s until sign-out", seconds);
                if let Err(e) = state.show_warning(seconds) {
                    error!("Failed to show warning: {}", e);
                }
                tick_at = Some(Instant::now() + COUNTDOWN_TICK);
            }

            _ = sleep_until(tick_at.unwrap_or_else(far_future)), if gate && tick_at.is_some() => {
                match state.countdown_tick() {
                    Ok(Some(remaining)) => {
                        debug!("Warning countdown at {}s", remaining);
                        tick_at = tick_at.map(|at| at + COUNTDOWN_TICK);
                    }
                    Ok(None) => {
                        // Countdown exhausted; idle expiry resolves the rest.
                        tick_at = None;
                    }
                    Err(e) => {
                        error!("Failed to tick warning countdown: {}", e);
                        tick_at = None;
                    }
                }
            }

            _ = sleep_until(idle_at.unwrap_or_else(far_future)), if gate && idle_at.is_some() => {
                idle_at = None;
                tick_at = None;

                // Sign-out may already have happened through another path, so
                // re-check before acting.
                match provider.current_session().await {
                    Ok(None) => {
                        info!("Idle deadline passed but no session remains");
                        disarm(&state, &mut gate, &mut idle_at, &mut warn_at, &mut tick_at);
                    }
                    Err(e) => {
                        warn!("Session re-check failed at idle expiry, assuming signed out: {}", e);
                        disarm(&state, &mut gate, &mut idle_at, &mut warn_at, &mut tick_at);
                    }
                    Ok(Some(session)) => {
                        info!("Idle timeout reached for {}, signing out", session.user);
                        match provider.sign_out().await {
                            Ok(()) => {
                                if let Some(callback) = on_timeout.as_ref() {
                                    callback();
                                }
                                navigator.redirect_to(&state.policy.login_path);
                                disarm(&state, &mut gate, &mut idle_at, &mut warn_at, &mut tick_at);
                            }
                            Err(e) => {
                                // Known gap: the user stays signed in and the
                                // timer re-arms only on the next activity.
                                error!("Sign-out failed at idle expiry: {}", e);
                            }
                        }
                    }
                }
            }

            changed = session_changes.recv() => match changed {
                Ok(true) => {
                    if !gate {
                        gate = true;
                        if let Err(e) = state.set_session_present(true) {
                            error!("Failed to record session presence: {}", e);
                        }
                        let now = Instant::now();
                        idle_at = Some(now + timeout);
                        warn_at = Some(now + lead);
                        tick_at = None;
                        info!("Session detected, idle timer armed for {}s", timeout.as_secs());
                    }
                }
                Ok(false) => {
                    if gate {
                        info!("Session ended, cancelling idle timers");
                    }
                    disarm(&state, &mut gate, &mut idle_at, &mut warn_at, &mut tick_at);
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!("Missed {} session change notifications", missed);
                }
                Err(RecvError::Closed) => {
                    warn!("Session provider channel closed, stopping timer task");
                    break;
                }
            },

            event = events.recv() => match event {
                Ok(EngineEvent::IdleReset) => if gate {
                    let now = Instant::now();
                    idle_at = Some(now + timeout);
                    // A visible warning is left alone; only a pending warning
                    // deadline moves with the activity.
                    if !warning_visible(&state) {
                        warn_at = Some(now + lead);
                    }
                    debug!("Activity observed, idle deadline reset");
                }
                Ok(EngineEvent::WarningReset) => if gate {
                    let now = Instant::now();
                    if warning_visible(&state) {
                        if let Err(e) = state.clear_warning() {
                            error!("Failed to hide warning: {}", e);
                        }
                        tick_at = None;
                        idle_at = Some(now + timeout);
                        debug!("Visible warning dismissed by activity");
                    }
                    warn_at = Some(now + lead);
                }
                Ok(EngineEvent::Extend) => if gate {
                    if let Err(e) = state.clear_warning() {
                        error!("Failed to hide warning: {}", e);
                    }
                    tick_at = None;
                    let now = Instant::now();
                    idle_at = Some(now + timeout);
                    warn_at = Some(now + lead);
                    info!("Session extended by user action");
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!("Missed {} timer reset events", missed);
                }
                Err(RecvError::Closed) => {
                    warn!("Event channel closed, stopping timer task");
                    break;
                }
            },
        }
    }
}

/// Cancel every pending deadline and clear session-scoped state
fn disarm(
    state: &AppState,
    gate: &mut bool,
    idle_at: &mut Option<Instant>,
    warn_at: &mut Option<Instant>,
    tick_at: &mut Option<Instant>,
) {
    *gate = false;
    *idle_at = None;
    *warn_at = None;
    *tick_at = None;

    if let Err(e) = state.set_session_present(false) {
        error!("Failed to record session presence: {}", e);
    }
    if let Err(e) = state.clear_warning() {
        error!("Failed to clear warning state: {}", e);
    }
}

fn warning_visible(state: &AppState) -> bool {
    state.get_warning_state().map(|warning| warning.visible).unwrap_or(false)
}

/// Placeholder deadline for disabled select branches; never actually awaited
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86_400 * 365)
}
