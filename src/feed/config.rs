//! Configuration for the position feed.

use std::time::Duration;

/// Default telemetry poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default simulation tick interval.
pub const DEFAULT_SIM_TICK_INTERVAL: Duration = Duration::from_secs(3);

/// Default capacity of the update broadcast channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Configuration for the position feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// How often to poll the telemetry endpoint.
    pub poll_interval: Duration,

    /// How often to advance the simulation while telemetry is down.
    ///
    /// Much shorter than the poll interval so displayed motion stays smooth
    /// between infrequent polls.
    pub sim_tick_interval: Duration,

    /// Whether to publish synthetic positions when telemetry is unavailable.
    ///
    /// With this off a failed poll still updates the status metadata, but
    /// no synthetic positions are produced.
    pub simulation_fallback: bool,

    /// Capacity of the update broadcast channel. Must be at least 1.
    pub channel_capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            sim_tick_interval: DEFAULT_SIM_TICK_INTERVAL,
            simulation_fallback: true,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}
