//! Pickup-delivery pair relocation.
//!
//! # Algorithm
//!
//! For each scheduled request, remove its pickup and delivery as a unit and
//! reinsert the pair at the cheapest feasible `(pickup, delivery)` position
//! pair found by exhaustive enumeration over the remaining plan. Keeps
//! precedence intact by construction; capacity is re-checked per candidate
//! by the shared insertion enumeration. The best improving relocation
//! across all requests is applied.
//!
//! # Complexity
//!
//! O(n³) insertion candidates per call in the worst case.

use crate::construction::{feasible_insertions, insert_pair};
use crate::evaluation::SearchContext;
use crate::models::PlanNode;

use super::{pd_pairs, EPSILON};

/// Tries the best improving pair relocation (best-improvement).
pub fn pd_relocate(
    plan: &[PlanNode],
    cost: f64,
    ctx: &SearchContext,
) -> Option<(Vec<PlanNode>, f64)> {
    let pairs = pd_pairs(plan);
    if pairs.len() < 2 {
        return None;
    }

    let mut best: Option<(Vec<PlanNode>, f64)> = None;
    for pair in &pairs {
        let mut remaining = plan.to_vec();
        remaining.remove(pair.delivery_pos);
        remaining.remove(pair.pickup_pos);

        let base_cost = ctx.cost(&remaining);
        let Some(point) = feasible_insertions(&remaining, pair.request, ctx)
            .into_iter()
            .next()
        else {
            continue;
        };

        let candidate_cost = base_cost + point.delta_cost;
        let bar = best.as_ref().map_or(cost, |(_, c)| *c);
        if candidate_cost < bar - EPSILON {
            let candidate = insert_pair(&remaining, pair.request, point.pickup_pos, point.delivery_pos);
            best = Some((candidate, candidate_cost));
        }
    }
    best
}
