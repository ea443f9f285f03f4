//! Local search operators that improve a feasible plan.
//!
//! - [`two_opt`] — sub-sequence reversal
//! - [`relocate`] — single-node move
//! - [`pd_relocate`] — pickup-delivery pair move
//! - [`pd_exchange`] — pickup-delivery pair exchange via reinsertion
//! - [`or_opt`] — short-segment relocation
//!
//! [`improve`] drives the operators in a fixed priority order under a time
//! budget. Every operator consults the shared evaluator before accepting a
//! move, so an infeasible plan is never produced.

mod or_opt;
mod pd_exchange;
mod pd_relocate;
mod relocate;
mod two_opt;

pub use or_opt::or_opt;
pub use pd_exchange::pd_exchange;
pub use pd_relocate::pd_relocate;
pub use relocate::relocate;
pub use two_opt::two_opt;

use std::time::{Duration, Instant};

use tracing::debug;

use crate::evaluation::SearchContext;
use crate::models::{Action, PlanNode};

/// Minimum cost decrease for a move to count as an improvement.
pub(crate) const EPSILON: f64 = 1e-10;

/// Default time budget for one [`improve`] run.
pub const DEFAULT_BUDGET: Duration = Duration::from_millis(300);

/// A scheduled request's node positions within a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PdPair {
    pub request: usize,
    pub pickup_pos: usize,
    pub delivery_pos: usize,
}

/// Lists every request with both nodes present, with their positions.
pub(crate) fn pd_pairs(plan: &[PlanNode]) -> Vec<PdPair> {
    let mut pickup_at: Vec<Option<usize>> = Vec::new();
    let mut pairs = Vec::new();
    for (i, node) in plan.iter().enumerate() {
        if pickup_at.len() <= node.request {
            pickup_at.resize(node.request + 1, None);
        }
        match node.action {
            Action::Pickup => pickup_at[node.request] = Some(i),
            Action::Delivery => {
                if let Some(pickup_pos) = pickup_at[node.request] {
                    pairs.push(PdPair {
                        request: node.request,
                        pickup_pos,
                        delivery_pos: i,
                    });
                }
            }
        }
    }
    pairs
}

/// Result of a local search run.
#[derive(Debug, Clone)]
pub struct Improvement {
    /// The best plan found.
    pub plan: Vec<PlanNode>,
    /// Travel time of that plan.
    pub cost: f64,
    /// `true` if the run stopped on its time budget rather than converging.
    pub time_limited: bool,
}

/// The operators in driver priority order.
const PRIORITY: [fn(&[PlanNode], f64, &SearchContext) -> Option<(Vec<PlanNode>, f64)>; 5] =
    [two_opt, relocate, pd_relocate, pd_exchange, or_opt];

/// Improves a feasible plan by repeated operator application.
///
/// Operators are tried in a fixed priority order; the first one that finds
/// an improving move restarts the cycle from the top. The run ends when a
/// full cycle yields no improvement or when `budget` elapses, whichever
/// comes first. The input plan must be feasible; the result always is.
pub fn improve(plan: Vec<PlanNode>, ctx: &SearchContext, budget: Duration) -> Improvement {
    let started = Instant::now();
    let mut plan = plan;
    let mut cost = ctx.cost(&plan);

    'cycle: loop {
        for operator in PRIORITY {
            if started.elapsed() >= budget {
                debug!(cost, "local search stopped on time budget");
                return Improvement {
                    plan,
                    cost,
                    time_limited: true,
                };
            }
            if let Some((better, better_cost)) = operator(&plan, cost, ctx) {
                plan = better;
                cost = better_cost;
                continue 'cycle;
            }
        }
        return Improvement {
            plan,
            cost,
            time_limited: false,
        };
    }
}
