//! Plan 2-opt improvement.
//!
//! # Algorithm
//!
//! For every pair of positions `i < j`, reverse the sub-sequence
//! `(i+1..=j)` and accept the first reversal that keeps the plan feasible
//! and strictly lowers travel time. Unlike classical TSP 2-opt, a reversal
//! here can flip a pickup past its own delivery or reshape the load
//! profile, so every candidate is re-checked by full replay before its cost
//! is even computed.
//!
//! # Complexity
//!
//! O(n²) candidate reversals per call, each with an O(n) replay.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::evaluation::SearchContext;
use crate::models::PlanNode;

use super::EPSILON;

/// Tries one improving 2-opt reversal (first-improvement).
///
/// Returns the improved plan and its cost, or `None` when no feasible
/// reversal beats `cost`.
pub fn two_opt(
    plan: &[PlanNode],
    cost: f64,
    ctx: &SearchContext,
) -> Option<(Vec<PlanNode>, f64)> {
    let n = plan.len();
    if n < 3 {
        return None;
    }

    for i in 0..n - 1 {
        for j in (i + 2)..n {
            let mut candidate = plan.to_vec();
            candidate[i + 1..=j].reverse();
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
