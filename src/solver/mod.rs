//! The sequencing facade.
//!
//! [`Sequencer`] turns a request set into a feasible stop-based
//! [`Route`], dispatching over [`Quality`] levels:
//!
//! - `Basic` — nearest-neighbor construction only
//! - `Medium` — nearest-neighbor plus local search
//! - `Advanced` — regret-2 construction, local search, and an ALNS burst
//!
//! Infeasibility is a typed result, never a panic: an objective larger
//! than the hold is rejected before construction, and a construction that
//! cannot place every request reports how many were left out.

use std::time::Duration;

use tracing::{debug, info};

use crate::alns::{alns_improve, AlnsConfig};
use crate::construction::{feasible_insertions, insert_pair, nearest_neighbor, regret_insertion};
use crate::distance::DistanceOracle;
use crate::evaluation::SearchContext;
use crate::local_search::{improve, DEFAULT_BUDGET};
use crate::models::{Mission, Request, Route};

/// Why a request set could not be sequenced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    /// A single cargo objective exceeds the hold outright.
    #[error("request {request_id} needs {size} SCU but the hold fits {capacity} SCU")]
    OversizedRequest {
        /// The offending request.
        request_id: u64,
        /// Its cargo size in SCU.
        size: u32,
        /// The hold capacity in SCU.
        capacity: u32,
    },
    /// No capacity-respecting sequence could place every request.
    #[error("could not schedule {unsequenced} request(s) within the hold capacity")]
    Unschedulable {
        /// How many requests had no feasible insertion.
        unsequenced: usize,
    },
}

/// How much optimization effort to spend on a request set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    /// Construction only.
    Basic,
    /// Construction plus local search.
    Medium,
    /// Regret-2 construction, local search, and an ALNS burst.
    Advanced,
}

/// Sequences pickup-delivery requests for one capacity-constrained hauler.
///
/// Holds the per-call fixed inputs: hold capacity, optional starting
/// location, and the injected travel-time oracle. Every call is a pure
/// function of its arguments; nothing persists between calls.
///
/// # Examples
///
/// ```
/// use haul_routing::distance::TravelMatrix;
/// use haul_routing::models::Request;
/// use haul_routing::solver::{Quality, Sequencer};
///
/// let requests = vec![
///     Request::new(0, "A", "B", 5, 9_000.0).unwrap(),
///     Request::new(1, "B", "C", 3, 4_000.0).unwrap(),
/// ];
/// let matrix = TravelMatrix::new(10.0)
///     .with_leg("A", "B", 4.0)
///     .with_leg("B", "C", 6.0);
///
/// let sequencer = Sequencer::new(6, Some("A"), &matrix);
/// let route = sequencer
///     .sequence(&requests, Quality::Medium, None)
///     .unwrap();
/// assert!(route.peak_load() <= 6);
/// ```
pub struct Sequencer<'a> {
    capacity: u32,
    start: Option<String>,
    oracle: &'a dyn DistanceOracle,
}

impl<'a> Sequencer<'a> {
    /// Creates a sequencer for the given hold and oracle.
    pub fn new(capacity: u32, start: Option<&str>, oracle: &'a dyn DistanceOracle) -> Self {
        Self {
            capacity,
            start: start.map(str::to_string),
            oracle,
        }
    }

    /// Hold capacity in SCU.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Optional starting location.
    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    /// Sequences a request set into a feasible route.
    ///
    /// `time_budget_ms` bounds the `Advanced` ALNS burst (default 1200 ms);
    /// `Basic` and `Medium` ignore it. A budget-bounded result is still
    /// returned, flagged via [`Route::time_limited`].
    pub fn sequence(
        &self,
        requests: &[Request],
        quality: Quality,
        time_budget_ms: Option<u64>,
    ) -> Result<Route, SolveError> {
        if requests.is_empty() {
            return Ok(Route::empty(self.start()));
        }
        self.check_sizes(requests)?;

        debug!(
            requests = requests.len(),
            capacity = self.capacity,
            ?quality,
            "sequencing request set"
        );
        let ctx = SearchContext::new(requests, self.capacity, self.oracle, self.start());

        let built = match quality {
            Quality::Basic | Quality::Medium => nearest_neighbor(&ctx),
            Quality::Advanced => regret_insertion(&ctx),
        };
        if !built.is_complete() {
            return Err(SolveError::Unschedulable {
                unsequenced: built.unscheduled.len(),
            });
        }

        let (plan, time_limited) = match quality {
            Quality::Basic => (built.plan, false),
            Quality::Medium => {
                let improved = improve(built.plan, &ctx, DEFAULT_BUDGET);
                (improved.plan, improved.time_limited)
            }
            Quality::Advanced => {
                let improved = improve(built.plan, &ctx, DEFAULT_BUDGET);
                let config = AlnsConfig::default().with_time_budget(Duration::from_millis(
                    time_budget_ms.unwrap_or(1200),
                ));
                let outcome = alns_improve(improved.plan, &ctx, &config);
                (outcome.plan, improved.time_limited || outcome.time_limited)
            }
        };

        Ok(Route::from_plan(&plan, requests, self.start(), time_limited))
    }

    /// Inserts one new mission into an already-sequenced route.
    ///
    /// Each of the mission's requests is placed by cheapest insertion over
    /// all feasible `(pickup, delivery)` position pairs; the existing visit
    /// order is otherwise preserved. Fails without modifying anything if a
    /// request has no feasible slot.
    pub fn insert(&self, route: &Route, mission: &Mission) -> Result<Route, SolveError> {
        if mission.max_objective_size() > self.capacity {
            return Err(SolveError::OversizedRequest {
                request_id: mission.id(),
                size: mission.max_objective_size(),
                capacity: self.capacity,
            });
        }

        let mut requests = route.requests().to_vec();
        let mut plan = route.to_plan();

        let next_id = requests.iter().map(|r| r.id() + 1).max().unwrap_or(0);
        let value = mission.reward() / mission.objectives().len() as f64;
        let first_new = requests.len();
        for (offset, objective) in mission.objectives().iter().enumerate() {
            requests.push(Request::from_parts(
                next_id + offset as u64,
                objective.pickup().to_string(),
                objective.delivery().to_string(),
                objective.size(),
                value,
            ));
        }

        let ctx = SearchContext::new(&requests, self.capacity, self.oracle, self.start());
        for (placed, index) in (first_new..requests.len()).enumerate() {
            let Some(point) = feasible_insertions(&plan, index, &ctx).into_iter().next() else {
                return Err(SolveError::Unschedulable {
                    unsequenced: requests.len() - first_new - placed,
                });
            };
            plan = insert_pair(&plan, index, point.pickup_pos, point.delivery_pos);
        }

        info!(
            mission = mission.id(),
            stops = plan.len(),
            "inserted mission into existing route"
        );
        Ok(Route::from_plan(&plan, &requests, self.start(), false))
    }

    /// Rejects any request that can never fit in the hold.
    fn check_sizes(&self, requests: &[Request]) -> Result<(), SolveError> {
        for request in requests {
            if request.size() > self.capacity {
                return Err(SolveError::OversizedRequest {
                    request_id: request.id(),
                    size: request.size(),
                    capacity: self.capacity,
                });
            }
        }
        Ok(())
    }
}
