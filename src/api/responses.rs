//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::WarningState;

/// API response structure for session and activity endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session_present: bool,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, session_present: bool) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            session_present,
        }
    }

    /// Create a signed-in response
    pub fn signed_in(message: String) -> Self {
        Self::new("signed-in".to_string(), message, true)
    }

    /// Create a signed-out response
    pub fn signed_out(message: String) -> Self {
        Self::new("signed-out".to_string(), message, false)
    }

    /// Create an accepted response for activity/extend reports
    pub fn accepted(message: String, session_present: bool) -> Self {
        Self::new("accepted".to_string(), message, session_present)
    }
}

/// Status response with session and warning information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub session_present: bool,
    pub warning: WarningState,
    pub timeout_secs: u64,
    pub warning_secs: u64,
    pub enabled: bool,
    pub login_path: String,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_event: Option<String>,
    pub last_event_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
