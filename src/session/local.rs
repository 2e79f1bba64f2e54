//! In-process session provider
//!
//! Backs the HTTP service: /login and /logout mutate this provider, which in
//! turn notifies the timer task through its change channel.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::info;

use super::provider::{Session, SessionProvider};

/// Session provider holding a single process-local session
#[derive(Debug)]
pub struct LocalSessionProvider {
    session: Mutex<Option<Session>>,
    change_tx: broadcast::Sender<bool>,
    /// Keep one receiver alive to prevent channel closure
    _change_rx: broadcast::Receiver<bool>,
}

impl LocalSessionProvider {
    /// Create a provider with no active session
    pub fn new() -> Self {
        let (change_tx, change_rx) = broadcast::channel(16);
        Self {
            session: Mutex::new(None),
            change_tx,
            _change_rx: change_rx,
        }
    }

    /// Create a provider that already holds a session for the given user
    pub fn signed_in(user: impl Into<String>) -> Result<Self, String> {
        let provider = Self::new();
        provider.login(user)?;
        Ok(provider)
    }

    /// Start a session for the given user and notify subscribers
    pub fn login(&self, user: impl Into<String>) -> Result<Session, String> {
        let session = Session::for_user(user);
        {
            let mut current = self.session.lock()
                .map_err(|e| format!("Failed to lock session: {}", e))?;
            *current = Some(session.clone());
        }

        info!("Session started for {}", session.user);
        let _ = self.change_tx.send(true);
        Ok(session)
    }
}

impl Default for LocalSessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionProvider for LocalSessionProvider {
    async fn current_session(&self) -> Result<Option<Session>, String> {
        self.session.lock()
            .map(|session| session.clone())
            .map_err(|e| format!("Failed to lock session: {}", e))
    }

    async fn sign_out(&self) -> Result<(), String> {
        let previous = {
            let mut current = self.session.lock()
                .map_err(|e| format!("Failed to lock session: {}", e))?;
            current.take()
        };

        match previous {
            Some(session) => info!("Session ended for {}", session.user),
            None => info!("Sign-out requested with no active session"),
        }

        let _ = self.change_tx.send(false);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<bool> {
        self.change_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn login_creates_a_session_and_notifies() {
        let provider = LocalSessionProvider::new();
        let mut changes = provider.subscribe();

        assert!(provider.current_session().await.expect("checked").is_none());

        provider.login("alice").expect("logged in");
        let session = provider.current_session().await.expect("checked").expect("present");
        assert_eq!(session.user, "alice");
        assert!(matches!(changes.try_recv(), Ok(true)));
    }

    #[tokio::test]
    async fn sign_out_clears_the_session_and_notifies() {
        let provider = LocalSessionProvider::signed_in("alice").expect("signed in");
        let mut changes = provider.subscribe();

        provider.sign_out().await.expect("signed out");
        assert!(provider.current_session().await.expect("checked").is_none());
        assert!(matches!(changes.try_recv(), Ok(false)));
    }

    #[tokio::test]
    async fn sign_out_without_a_session_is_idempotent() {
        let provider = LocalSessionProvider::new();
        provider.sign_out().await.expect("signed out");
        assert!(provider.current_session().await.expect("checked").is_none());
    }
}
