//! Plan Or-opt improvement.
//!
//! # Algorithm
//!
//! Tries moving contiguous segments of 1, 2, or 3 plan nodes to a
//! different position, accepting the first feasible move that strictly
//! lowers travel time. A segment may span parts of several requests, so
//! unlike [`pd_relocate`](super::pd_relocate) the move can split a pair
//! across the plan; precedence is preserved only because every candidate
//! is replayed before acceptance.
//!
//! # Complexity
//!
//! O(n²) candidate moves per segment length, each with an O(n) replay.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use crate::evaluation::SearchContext;
use crate::models::PlanNode;

use super::EPSILON;

/// Tries one improving segment relocation (first-improvement).
pub fn or_opt(
    plan: &[PlanNode],
    cost: f64,
    ctx: &SearchContext,
) -> Option<(Vec<PlanNode>, f64)> {
    let n = plan.len();
    if n < 2 {
        return None;
    }

    for seg_len in 1..=3usize.min(n - 1) {
        for from in 0..=(n - seg_len) {
            for to in 0..=(n - seg_len) {
                if to == from {
                    continue;
                }
                let mut candidate = plan.to_vec();
                let segment: Vec<PlanNode> = candidate.drain(from..from + seg_len).collect();
                for (offset, &node) in segment.iter().enumerate() {
                    candidate.insert(to + offset, node);
                }
                if !ctx.feasible(&candidate) {
                    continue;
                }
                let candidate_cost = ctx.cost(&candidate);
                if candidate_cost < cost - EPSILON {
                    return Some((candidate, candidate_cost));
                }
            }
        }
    }
    None
}
