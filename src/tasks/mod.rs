//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod session_timer;

// Re-export main functions
pub use session_timer::{session_timer_task, OnTimeout};
