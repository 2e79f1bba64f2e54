//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "session-sentry")]
#[command(about = "A state-managed HTTP service for idle session timeout control")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20890")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Idle timeout in seconds before forced sign-out
    #[arg(short, long, default_value = "300")]
    pub timeout_secs: u64,

    /// Warning window in seconds before the idle timeout expires
    #[arg(short, long, default_value = "60")]
    pub warning_secs: u64,

    /// Path the user is redirected to after a forced sign-out
    #[arg(long, default_value = "/auth/login")]
    pub login_path: String,

    /// Disable the idle timeout mechanism entirely
    #[arg(long)]
    pub disabled: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Build the validated timeout policy from the CLI arguments
    pub fn policy(&self) -> Result<TimeoutPolicy, String> {
        Ok(TimeoutPolicy::new(
            Duration::from_secs(self.timeout_secs),
            Duration::from_secs(self.warning_secs),
        )?
        .with_enabled(!self.disabled)
        .with_login_path(self.login_path.clone()))
    }
}

/// Validated idle timeout policy shared by the timer task and the API
#[derive(Debug, Clone)]
pub struct TimeoutPolicy {
    /// Duration of inactivity after which the session is forcibly ended
    pub timeout: Duration,
    /// Trailing portion of the timeout during which the warning is shown
    pub warning: Duration,
    /// Whether the mechanism is active at all
    pub enabled: bool,
    /// Redirect destination after a successful forced sign-out
    pub login_path: String,
}

impl TimeoutPolicy {
    /// Create a policy, rejecting invalid timeout/warning combinations.
    ///
    /// A warning window equal to or longer than the timeout would make the
    /// warning deadline zero or negative, so it is rejected rather than
    /// clamped.
    pub fn new(timeout: Duration, warning: Duration) -> Result<Self, String> {
        if timeout.is_zero() || warning.is_zero() {
            return Err("idle timeout and warning window must both be positive".to_string());
        }
        if warning >= timeout {
            return Err(format!(
                "warning window ({}s) must be shorter than the idle timeout ({}s)",
                warning.as_secs(),
                timeout.as_secs()
            ));
        }
        Ok(Self {
            timeout,
            warning,
            enabled: true,
            login_path: "/auth/login".to_string(),
        })
    }

    /// Set whether the mechanism is enabled
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the post-sign-out redirect destination
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Time from a reset until the warning becomes visible
    pub fn warning_lead(&self) -> Duration {
        self.timeout - self.warning
    }

    /// Countdown start value in whole seconds (floored)
    pub fn warning_seconds(&self) -> u64 {
        self.warning.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_warning_shorter_than_timeout() {
        let policy = TimeoutPolicy::new(Duration::from_secs(30), Duration::from_secs(10))
            .expect("valid policy");
        assert_eq!(policy.warning_lead(), Duration::from_secs(20));
        assert_eq!(policy.warning_seconds(), 10);
        assert!(policy.enabled);
    }

    #[test]
    fn rejects_warning_equal_to_timeout() {
        assert!(TimeoutPolicy::new(Duration::from_secs(60), Duration::from_secs(60)).is_err());
    }

    #[test]
    fn rejects_warning_longer_than_timeout() {
        assert!(TimeoutPolicy::new(Duration::from_secs(60), Duration::from_secs(90)).is_err());
    }

    #[test]
    fn rejects_zero_durations() {
        assert!(TimeoutPolicy::new(Duration::ZERO, Duration::from_secs(10)).is_err());
        assert!(TimeoutPolicy::new(Duration::from_secs(10), Duration::ZERO).is_err());
    }

    #[test]
    fn countdown_seconds_are_floored() {
        let policy = TimeoutPolicy::new(Duration::from_secs(30), Duration::from_millis(10_500))
            .expect("valid policy");
        assert_eq!(policy.warning_seconds(), 10);
    }
}
