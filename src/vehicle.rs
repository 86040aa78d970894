//! Vehicle position snapshot type.

use crate::geo::Coordinate;

/// Position report for one tracked unit.
///
/// Produced either by the telemetry source (real) or by the simulation
/// (synthetic); consumers cannot tell the two apart from the value alone.
/// Whether the feed is currently publishing synthetic data is reported
/// separately through [`FeedStatus`](crate::feed::FeedStatus).
#[derive(Debug, Clone, PartialEq)]
pub struct VehiclePosition {
    /// Unit identifier. `"auto"` for the all-units telemetry selector,
    /// `unit_001`.. for simulated units.
    pub unit_id: String,

    /// Current location.
    pub position: Coordinate,

    /// Reported speed in km/h, never negative.
    pub speed_kmh: f64,

    /// Heading in degrees, [0, 360).
    pub heading_degrees: f64,

    /// Whether the upstream reported the unit as in service.
    pub available: bool,
}
