//! Synthetic fleet simulation driven by route geometry.
//!
//! When telemetry is down the feed publishes positions from a simulated
//! fleet of six units advancing along the route path. Motion is cyclic:
//! each unit walks the path and wraps back to the start after a full cycle
//! of 100 steps, which models a round-trip route without explicit reversal.
//!
//! Speed and heading are cosmetic display values drawn uniformly per tick,
//! not derived from the bearing between path points. State is an owned
//! [`SimulationState`] threaded through `seed`/`advance`, and the engine's
//! RNG is seedable, so trajectories are reproducible in tests.

mod engine;

pub use engine::{
    SimulationEngine, SimulationState, CYCLE_STEPS, FLEET_SIZE, MAX_SPEED_KMH, MIN_SPEED_KMH,
};
