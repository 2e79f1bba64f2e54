//! Session Sentry - A state-managed HTTP service for idle session timeout control
//!
//! This library provides an idle-session-timeout engine: it tracks user
//! activity, arms an idle timer, surfaces a pre-expiry warning countdown, and
//! forces sign-out through an injected session provider when the idle
//! deadline passes. The whole mechanism is gated on an authenticated session
//! being present.

pub mod api;
pub mod config;
pub mod session;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, TimeoutPolicy};
pub use session::{LocalSessionProvider, LogNavigator, Navigator, Session, SessionProvider};
pub use state::{AppState, EngineEvent, InteractionKind, WarningState};
pub use tasks::{session_timer_task, OnTimeout};
pub use utils::signals::shutdown_signal;
