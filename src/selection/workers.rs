//! Independent units of selection-search work.
//!
//! Each unit is a pure function over serializable inputs (pool indices and
//! scalar parameters) returning an optional candidate, so units can fan
//! out across worker threads with no shared mutable state and no locks. A
//! unit that finds nothing, trips the stop budget, or starts past the
//! wall-clock deadline simply contributes no candidate; it can never fail
//! the overall search.

use std::collections::HashSet;
use std::time::Instant;

use tracing::debug;

use crate::distance::DistanceOracle;
use crate::models::{flatten_requests, Mission};
use crate::solver::{Quality, Sequencer};

use super::scoring::{CandidateRoute, RouteMetrics};

/// Evaluates one mission subset into a candidate route.
///
/// Returns `None` when the subset cannot beat the stop budget, cannot be
/// sequenced, or the deadline has already passed.
pub(crate) fn evaluate_subset<D>(
    pool: &[Mission],
    subset: &[usize],
    capacity: u32,
    start: Option<&str>,
    max_stops: usize,
    oracle: &D,
    deadline: Instant,
) -> Option<CandidateRoute>
where
    D: DistanceOracle,
{
    if Instant::now() >= deadline {
        debug!(subset = subset.len(), "search unit skipped past deadline");
        return None;
    }

    let missions: Vec<&Mission> = subset.iter().map(|&index| &pool[index]).collect();

    // Unique locations bound the stop count from below; skip the
    // sequencing work when the subset cannot fit the budget.
    let locations: HashSet<&str> = missions.iter().flat_map(|m| m.locations()).collect();
    if locations.len() > max_stops {
        return None;
    }

    let requests = flatten_requests(missions.iter().copied());
    let sequencer = Sequencer::new(capacity, start, oracle);
    let route = match sequencer.sequence(&requests, Quality::Medium, None) {
        Ok(route) => route,
        Err(error) => {
            debug!(%error, "subset discarded as infeasible");
            return None;
        }
    };
    if route.stop_count() > max_stops {
        return None;
    }

    let metrics = RouteMetrics::measure(&route, missions.len(), oracle);
    let mission_ids = missions.iter().map(|m| m.id()).collect();
    Some(CandidateRoute::new(mission_ids, route, metrics))
}
