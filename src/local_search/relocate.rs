//! Single-node relocation.
//!
//! # Algorithm
//!
//! Moves one plan node to every other position and accepts the first
//! feasible move that strictly lowers travel time. First-improvement keeps
//! the scan cheap; the driver restarts the operator cycle after every
//! accepted move, so later positions are revisited anyway.
//!
//! # Complexity
//!
//! O(n²) candidate moves per call, each with an O(n) replay.

use crate::evaluation::SearchContext;
use crate::models::PlanNode;

use super::EPSILON;

/// Tries one improving single-node move (first-improvement).
pub fn relocate(
    plan: &[PlanNode],
    cost: f64,
    ctx: &SearchContext,
) -> Option<(Vec<PlanNode>, f64)> {
    let n = plan.len();
    if n < 2 {
        return None;
    }

    for from in 0..n {
        for to in 0..n {
            if to == from {
                continue;
            }
            let mut candidate = plan.to_vec();
            let node = candidate.remove(from);
            candidate.insert(to, node);
            if !ctx.feasible(&candidate) {
                continue;
            }
            let candidate_cost = ctx.cost(&candidate);
            if candidate_cost < cost - EPSILON {
                return Some((candidate, candidate_cost));
            }
        }
    }
    None
}
