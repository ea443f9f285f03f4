//! Travel-time oracle seam.
//!
//! The engine never computes travel times itself; it consumes a
//! [`DistanceOracle`] supplied by the caller. The oracle must be total:
//! any pair of location names yields an estimate, never a panic.

use std::collections::HashMap;

/// Estimates travel time in minutes between named locations.
///
/// Implementations must be total and side-effect free so plans sharing no
/// mutable state can be evaluated concurrently.
pub trait DistanceOracle {
    /// Travel time in minutes from one location to another.
    fn minutes(&self, from: &str, to: &str) -> f64;
}

impl<F> DistanceOracle for F
where
    F: Fn(&str, &str) -> f64,
{
    fn minutes(&self, from: &str, to: &str) -> f64 {
        self(from, to)
    }
}

/// A table-backed travel-time oracle.
///
/// Known pairs are looked up directly; unknown pairs fall back to a fixed
/// default so the oracle stays total. Identical locations always cost zero.
///
/// # Examples
///
/// ```
/// use haul_routing::distance::{DistanceOracle, TravelMatrix};
///
/// let matrix = TravelMatrix::new(10.0).with_leg("A", "B", 4.0);
/// assert_eq!(matrix.minutes("A", "B"), 4.0);
/// assert_eq!(matrix.minutes("B", "A"), 4.0);
/// assert_eq!(matrix.minutes("A", "A"), 0.0);
/// // Unknown pair falls back to the default
/// assert_eq!(matrix.minutes("A", "Z"), 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct TravelMatrix {
    times: HashMap<(String, String), f64>,
    default_minutes: f64,
}

impl TravelMatrix {
    /// Creates an empty matrix with the given default for unknown pairs.
    pub fn new(default_minutes: f64) -> Self {
        Self {
            times: HashMap::new(),
            default_minutes,
        }
    }

    /// Records a leg in both directions (builder style).
    pub fn with_leg(mut self, from: &str, to: &str, minutes: f64) -> Self {
        self.set(from, to, minutes);
        self.set(to, from, minutes);
        self
    }

    /// Records a one-directional travel time.
    pub fn set(&mut self, from: &str, to: &str, minutes: f64) {
        self.times
            .insert((from.to_string(), to.to_string()), minutes);
    }

    /// Default applied to unknown pairs.
    pub fn default_minutes(&self) -> f64 {
        self.default_minutes
    }
}

impl DistanceOracle for TravelMatrix {
    fn minutes(&self, from: &str, to: &str) -> f64 {
        if from == to {
            return 0.0;
        }
        self.times
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .unwrap_or(self.default_minutes)
    }
}
