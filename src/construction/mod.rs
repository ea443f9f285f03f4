//! Constructive heuristics that turn an unordered request set into an
//! initial feasible plan.
//!
//! - [`nearest_neighbor`] — fast greedy builder
//! - [`regret_insertion`] — regret-2 builder used by the advanced solver

mod nearest_neighbor;
mod regret;

pub use nearest_neighbor::nearest_neighbor;
pub(crate) use regret::insert_pair;
pub use regret::{feasible_insertions, regret_insert_into, regret_insertion, InsertionPoint};

use crate::models::PlanNode;

/// Result of a construction heuristic: the plan built so far and the
/// requests that could not be placed.
///
/// An incomplete construction is not an error; the caller decides whether
/// a partial plan is acceptable for its request set.
#[derive(Debug, Clone)]
pub struct Construction {
    /// The constructed node plan.
    pub plan: Vec<PlanNode>,
    /// Indices of requests with no feasible insertion.
    pub unscheduled: Vec<usize>,
}

impl Construction {
    /// Returns `true` if every request was placed.
    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }
}
