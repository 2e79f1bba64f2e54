//! Session provider module
//!
//! This module contains the auth-provider abstraction the timer task depends
//! on and the in-process implementation used by the HTTP service.

pub mod local;
pub mod provider;

// Re-export main types
pub use local::LocalSessionProvider;
pub use provider::{LogNavigator, Navigator, Session, SessionProvider};
