//! Borrowed problem context shared by the search components.

use crate::distance::DistanceOracle;
use crate::models::{PlanNode, Request};

use super::{is_feasible, plan_cost};

/// The fixed inputs of one planning call: the request slice, the hold
/// capacity, the injected travel-time oracle, and the optional starting
/// location.
///
/// Construction, local search, and ALNS all evaluate plans through this
/// context, so cost and feasibility are computed in exactly one way.
pub struct SearchContext<'a> {
    requests: &'a [Request],
    capacity: u32,
    oracle: &'a dyn DistanceOracle,
    start: Option<&'a str>,
}

impl<'a> SearchContext<'a> {
    /// Bundles the inputs of a planning call.
    pub fn new(
        requests: &'a [Request],
        capacity: u32,
        oracle: &'a dyn DistanceOracle,
        start: Option<&'a str>,
    ) -> Self {
        Self {
            requests,
            capacity,
            oracle,
            start,
        }
    }

    /// The requests being planned.
    pub fn requests(&self) -> &'a [Request] {
        self.requests
    }

    /// Hold capacity in SCU.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Optional starting location.
    pub fn start(&self) -> Option<&'a str> {
        self.start
    }

    /// Travel time between two locations, via the injected oracle.
    pub fn minutes(&self, from: &str, to: &str) -> f64 {
        self.oracle.minutes(from, to)
    }

    /// Total travel time of a plan.
    pub fn cost(&self, plan: &[PlanNode]) -> f64 {
        plan_cost(plan, self.requests, self.oracle, self.start)
    }

    /// Whether a plan respects capacity and precedence.
    pub fn feasible(&self, plan: &[PlanNode]) -> bool {
        is_feasible(plan, self.requests, self.capacity)
    }
}
