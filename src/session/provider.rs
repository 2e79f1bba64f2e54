//! Session provider abstraction
//!
//! The timer logic never talks to a concrete auth backend; it goes through
//! this trait so the service can run against the in-process provider and
//! tests can substitute their own.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// An authenticated session as reported by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user: String,
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Create a session starting now for the given user
    pub fn for_user(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            started_at: Utc::now(),
        }
    }
}

/// External authentication provider consumed by the timer task
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Fetch the current session, if any. Callers treat an error the same as
    /// no session.
    async fn current_session(&self) -> Result<Option<Session>, String>;

    /// End the current session
    async fn sign_out(&self) -> Result<(), String>;

    /// Subscribe to session-presence change notifications
    fn subscribe(&self) -> broadcast::Receiver<bool>;
}

/// Navigation side effect performed after a successful forced sign-out
pub trait Navigator: Send + Sync {
    fn redirect_to(&self, path: &str);
}

/// Navigator that records the redirect in the log
#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect_to(&self, path: &str) {
        tracing::info!("Redirecting to {}", path);
    }
}
