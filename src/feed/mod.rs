//! Position feed - the orchestrator publishing best-available positions.
//!
//! The feed combines the telemetry source and the simulation into a single
//! always-available stream:
//!
//! - On route selection the simulation is seeded and a first synthetic
//!   frame is published immediately; the display never waits on the
//!   network.
//! - A poll task fetches telemetry every 30 seconds. A successful poll with
//!   at least one unit switches the feed to `Live` and publishes the real
//!   positions verbatim; a failed or empty poll switches it to `Simulating`.
//! - While simulating, a tick task advances the synthetic fleet every
//!   3 seconds so displayed motion stays smooth between polls.
//! - Swapping routes cancels both tasks and reseeds; publishes from the
//!   superseded route can never surface afterwards.
//!
//! Consumers either subscribe to the broadcast stream (push) or read the
//! current [`FeedUpdate`] snapshot (pull).
//!
//! # Components
//!
//! - [`config`] - poll/tick intervals and the fallback switch
//! - [`status`] - `FeedPhase`, `FeedStatus`, `FeedUpdate`
//! - [`feed`] - `PositionFeed` and its tasks

mod config;
mod feed;
mod status;

pub use config::{
    FeedConfig, DEFAULT_CHANNEL_CAPACITY, DEFAULT_POLL_INTERVAL, DEFAULT_SIM_TICK_INTERVAL,
};
pub use feed::PositionFeed;
pub use status::{FeedPhase, FeedStatus, FeedUpdate};
