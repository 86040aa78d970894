//! Route geometry: the static path and stop sequence for one transit route.
//!
//! A [`RouteGeometry`] is loaded once when a route is selected and never
//! mutated afterwards; selecting a different route replaces it wholesale.
//! The feed shares it between the simulation and the next-stop resolver via
//! `Arc`.

use std::future::Future;

use thiserror::Error;

use crate::geo::{Coordinate, GeometryError};

/// A named stop along a route.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    /// Display name of the stop.
    pub name: String,

    /// Location of the stop.
    pub position: Coordinate,

    /// Position of the stop within the route (0-based, strictly increasing).
    pub sequence_index: u32,
}

/// Ordered path and stop sequence for one route.
///
/// The path is in travel order and may be empty; with an empty path the
/// simulation seeds zero units and the next-stop resolver reports no data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteGeometry {
    path: Vec<Coordinate>,
    stops: Vec<Stop>,
}

impl RouteGeometry {
    /// Create a route geometry, validating the stop sequence.
    ///
    /// Stop `sequence_index` values must start at 0 and increase strictly;
    /// anything else is rejected so downstream tie-breaking stays total.
    pub fn new(path: Vec<Coordinate>, stops: Vec<Stop>) -> Result<Self, GeometryError> {
        for (position, pair) in stops.windows(2).enumerate() {
            if pair[1].sequence_index <= pair[0].sequence_index {
                return Err(GeometryError::StopSequence {
                    position: position + 1,
                    found: pair[1].sequence_index,
                });
            }
        }
        if let Some(first) = stops.first() {
            if first.sequence_index != 0 {
                return Err(GeometryError::StopSequence {
                    position: 0,
                    found: first.sequence_index,
                });
            }
        }
        Ok(Self { path, stops })
    }

    /// Geometry with no path and no stops.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Path coordinates in travel order.
    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    /// Stops in sequence order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// True when the path has no points.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Errors from a route geometry backend.
#[derive(Debug, Error)]
pub enum RouteSourceError {
    /// No route with the requested identifier.
    #[error("route {0} not found")]
    NotFound(String),

    /// The backend failed to answer.
    #[error("route backend error: {0}")]
    Backend(String),

    /// The backend answered with geometry that fails validation.
    #[error("invalid route geometry: {0}")]
    InvalidGeometry(#[from] GeometryError),
}

/// Trait for the external collaborator that supplies route geometry.
///
/// Implementations live outside this crate (database service, file import).
/// Hot-swap on selection change is handled by the feed: load the new
/// geometry through this trait, then hand it to
/// [`PositionFeed::select_route`](crate::feed::PositionFeed::select_route).
pub trait RouteSource: Send + Sync {
    /// Fetch the geometry for one route.
    fn route_geometry(
        &self,
        route_id: &str,
    ) -> impl Future<Output = Result<RouteGeometry, RouteSourceError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn stop(name: &str, lat: f64, lon: f64, sequence_index: u32) -> Stop {
        Stop {
            name: name.to_string(),
            position: coord(lat, lon),
            sequence_index,
        }
    }

    #[test]
    fn test_valid_geometry() {
        let geometry = RouteGeometry::new(
            vec![coord(0.0, 0.0), coord(1.0, 1.0)],
            vec![stop("A", 0.0, 0.0, 0), stop("B", 1.0, 1.0, 1)],
        )
        .unwrap();

        assert_eq!(geometry.path().len(), 2);
        assert_eq!(geometry.stops().len(), 2);
        assert!(!geometry.is_empty());
    }

    #[test]
    fn test_empty_geometry() {
        let geometry = RouteGeometry::empty();
        assert!(geometry.is_empty());
        assert!(geometry.stops().is_empty());
    }

    #[test]
    fn test_empty_path_with_stops_is_valid() {
        // Degenerate but allowed: features depending on the path report no data.
        let geometry = RouteGeometry::new(Vec::new(), vec![stop("A", 0.0, 0.0, 0)]).unwrap();
        assert!(geometry.is_empty());
        assert_eq!(geometry.stops().len(), 1);
    }

    #[test]
    fn test_sequence_must_start_at_zero() {
        let result = RouteGeometry::new(Vec::new(), vec![stop("A", 0.0, 0.0, 1)]);
        assert_eq!(
            result,
            Err(GeometryError::StopSequence {
                position: 0,
                found: 1
            })
        );
    }

    #[test]
    fn test_sequence_must_increase_strictly() {
        let result = RouteGeometry::new(
            Vec::new(),
            vec![
                stop("A", 0.0, 0.0, 0),
                stop("B", 1.0, 1.0, 2),
                stop("C", 2.0, 2.0, 2),
            ],
        );
        assert_eq!(
            result,
            Err(GeometryError::StopSequence {
                position: 2,
                found: 2
            })
        );
    }

    #[test]
    fn test_sequence_gaps_allowed() {
        // Increasing but non-contiguous indices are accepted.
        let geometry = RouteGeometry::new(
            Vec::new(),
            vec![stop("A", 0.0, 0.0, 0), stop("B", 1.0, 1.0, 5)],
        );
        assert!(geometry.is_ok());
    }
}
