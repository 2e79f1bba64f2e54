//! Interaction event categories and timer reset events

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Minimum gap between two idle-timer resets caused by activity
pub const ACTIVITY_THROTTLE: Duration = Duration::from_secs(1);

/// Categories of user interaction that count as activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionKind {
    PointerPress,
    PointerMove,
    KeyPress,
    KeyDown,
    Scroll,
    TouchStart,
    Click,
    Focus,
    /// The page/tab transitioned from hidden back to visible
    VisibilityVisible,
}

impl InteractionKind {
    /// Every monitored interaction category
    pub const ALL: [InteractionKind; 9] = [
        InteractionKind::PointerPress,
        InteractionKind::PointerMove,
        InteractionKind::KeyPress,
        InteractionKind::KeyDown,
        InteractionKind::Scroll,
        InteractionKind::TouchStart,
        InteractionKind::Click,
        InteractionKind::Focus,
        InteractionKind::VisibilityVisible,
    ];

    /// Whether this event also dismisses a visible warning.
    ///
    /// The dismiss set is narrower than the qualifying set: pointer movement
    /// and focus changes reset the idle timer but leave a visible warning
    /// alone.
    pub fn dismisses(&self) -> bool {
        matches!(
            self,
            InteractionKind::PointerPress
                | InteractionKind::KeyPress
                | InteractionKind::Scroll
                | InteractionKind::TouchStart
                | InteractionKind::Click
        )
    }

    /// Returning to the tab always counts as activity, throttle or not
    pub fn bypasses_throttle(&self) -> bool {
        matches!(self, InteractionKind::VisibilityVisible)
    }

    /// Kebab-case name used in the HTTP API and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::PointerPress => "pointer-press",
            InteractionKind::PointerMove => "pointer-move",
            InteractionKind::KeyPress => "key-press",
            InteractionKind::KeyDown => "key-down",
            InteractionKind::Scroll => "scroll",
            InteractionKind::TouchStart => "touch-start",
            InteractionKind::Click => "click",
            InteractionKind::Focus => "focus",
            InteractionKind::VisibilityVisible => "visibility-visible",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InteractionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown interaction kind: {}", s))
    }
}

/// Timer reset events flowing from the activity tracker to the timer task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// Qualifying activity past the throttle; reschedule the idle deadline
    IdleReset,
    /// Dismiss-category activity; reschedule the warning deadline and hide a
    /// visible warning
    WarningReset,
    /// Explicit "continue session" action from the user
    Extend,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in InteractionKind::ALL {
            let parsed: InteractionKind = kind.as_str().parse().expect("parses back");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!("mouse-wheel".parse::<InteractionKind>().is_err());
    }

    #[test]
    fn dismiss_set_is_narrower_than_qualifying_set() {
        assert!(InteractionKind::Click.dismisses());
        assert!(InteractionKind::PointerPress.dismisses());
        assert!(InteractionKind::Scroll.dismisses());
        assert!(!InteractionKind::PointerMove.dismisses());
        assert!(!InteractionKind::Focus.dismisses());
        assert!(!InteractionKind::KeyDown.dismisses());
        assert!(!InteractionKind::VisibilityVisible.dismisses());
    }

    #[test]
    fn only_visibility_bypasses_the_throttle() {
        for kind in InteractionKind::ALL {
            assert_eq!(
                kind.bypasses_throttle(),
                kind == InteractionKind::VisibilityVisible
            );
        }
    }
}
