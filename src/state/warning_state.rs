//! Warning countdown state structure

use serde::{Deserialize, Serialize};

/// State of the pre-expiry warning shown to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningState {
    pub visible: bool,
    pub seconds_remaining: Option<u64>,
}

impl WarningState {
    /// Create a new hidden warning state
    pub fn new() -> Self {
        Self {
            visible: false,
            seconds_remaining: None,
        }
    }

    /// Create a visible warning state with a running countdown
    pub fn visible(seconds_remaining: u64) -> Self {
        Self {
            visible: true,
            seconds_remaining: Some(seconds_remaining),
        }
    }

    /// Create a hidden warning state
    pub fn hidden() -> Self {
        Self {
            visible: false,
            seconds_remaining: None,
        }
    }

    /// Check if the warning is visible
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Get remaining seconds if the warning is visible
    pub fn seconds_remaining(&self) -> Option<u64> {
        if self.visible {
            self.seconds_remaining
        } else {
            None
        }
    }
}

impl Default for WarningState {
    fn default() -> Self {
        Self::new()
    }
}
