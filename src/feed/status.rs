//! Feed status and update types.

use chrono::{DateTime, Utc};

use crate::vehicle::VehiclePosition;

/// Lifecycle phase of the position feed.
///
/// `Initializing` until a route is selected; then `Live` while telemetry is
/// healthy or `Simulating` while synthetic positions cover for it; `Stopped`
/// after teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    /// Route not selected yet; nothing published.
    Initializing,
    /// Publishing real telemetry positions.
    Live,
    /// Publishing synthetic positions from the simulation.
    Simulating,
    /// Torn down; no further publishes.
    Stopped,
}

impl std::fmt::Display for FeedPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initializing => write!(f, "Initializing"),
            Self::Live => write!(f, "Live"),
            Self::Simulating => write!(f, "Simulating"),
            Self::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Connectivity and data-source metadata, owned by the feed.
///
/// `connected` reports real upstream health only; `using_simulation` flags
/// synthetic output. The two are deliberately independent so consumers can
/// show "displaying simulated positions, telemetry down" instead of a
/// misleading "connected".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedStatus {
    /// Whether the last telemetry poll succeeded.
    pub connected: bool,

    /// Whether the last poll failed and the feed will poll again.
    pub retrying: bool,

    /// Whether the published positions are synthetic.
    pub using_simulation: bool,

    /// Wall-clock time of the last published update.
    pub last_update: Option<DateTime<Utc>>,

    /// Message of the last telemetry failure, cleared on success.
    pub last_error: Option<String>,
}

/// One published frame: the current positions plus status metadata.
#[derive(Debug, Clone, Default)]
pub struct FeedUpdate {
    pub positions: Vec<VehiclePosition>,
    pub status: FeedStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status() {
        let status = FeedStatus::default();
        assert!(!status.connected);
        assert!(!status.retrying);
        assert!(!status.using_simulation);
        assert!(status.last_update.is_none());
        assert!(status.last_error.is_none());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(FeedPhase::Initializing.to_string(), "Initializing");
        assert_eq!(FeedPhase::Live.to_string(), "Live");
        assert_eq!(FeedPhase::Simulating.to_string(), "Simulating");
        assert_eq!(FeedPhase::Stopped.to_string(), "Stopped");
    }
}
