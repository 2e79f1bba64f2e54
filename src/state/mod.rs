//! State management module
//!
//! This module contains all state-related structures and their management logic.

pub mod activity;
pub mod app_state;
pub mod warning_state;

// Re-export main types
pub use activity::{EngineEvent, InteractionKind, ACTIVITY_THROTTLE};
pub use app_state::AppState;
pub use warning_state::WarningState;
