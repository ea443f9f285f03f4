//! Pickup-delivery pair exchange.
//!
//! # Algorithm
//!
//! For each pair of scheduled requests, remove both pickup-delivery pairs
//! and rebuild with regret-2 reinsertion of the two requests. Accepts the
//! first rebuild that reinserts both and strictly lowers travel time.
//!
//! Implemented as remove-then-reinsert rather than a positional swap: the
//! reinsertion path already enforces precedence and capacity, where a
//! direct four-index swap would need its own feasibility reasoning. The
//! neighborhood is a superset of the strict swap, since reinsertion may
//! place the pairs anywhere.
//!
//! # Complexity
//!
//! O(p²) rebuilds per call over p scheduled pairs, each rebuild O(n³).

use crate::construction::regret_insert_into;
use crate::evaluation::SearchContext;
use crate::models::PlanNode;

use super::{pd_pairs, EPSILON};

/// Tries one improving pair exchange (first-improvement).
pub fn pd_exchange(
    plan: &[PlanNode],
    cost: f64,
    ctx: &SearchContext,
) -> Option<(Vec<PlanNode>, f64)> {
    let pairs = pd_pairs(plan);
    if pairs.len() < 2 {
        return None;
    }

    for i in 0..pairs.len() {
        for j in (i + 1)..pairs.len() {
            let removed = [pairs[i].request, pairs[j].request];
            let remaining: Vec<PlanNode> = plan
                .iter()
                .copied()
                .filter(|node| !removed.contains(&node.request))
                .collect();

            let (rebuilt, leftover) = regret_insert_into(remaining, &removed, ctx);
            if !leftover.is_empty() {
                // Both requests fit before the removal, so a rebuild that
                // cannot reinsert them is discarded, not accepted partially.
                continue;
            }
            let rebuilt_cost = ctx.cost(&rebuilt);
            if rebuilt_cost < cost - EPSILON {
                return Some((rebuilt, rebuilt_cost));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::TravelMatrix;
    use crate::evaluation::is_feasible;
    use crate::models::Request;

    fn matrix() -> TravelMatrix {
        TravelMatrix::new(20.0)
            .with_leg("A", "B", 4.0)
            .with_leg("B", "C", 6.0)
            .with_leg("A", "C", 9.0)
            .with_leg("C", "D", 3.0)
            .with_leg("B", "D", 8.0)
            .with_leg("A", "D", 11.0)
    }

    #[test]
    fn test_exchange_untangles_interleaved_pairs() {
        // Requests 0 and 1 both run A->B, request 2 runs C->D; starting the
        // tour with the C->D pair forces a backtrack that reordering fixes.
        let requests = vec![
            Request::new(0, "A", "B", 2, 1.0).expect("valid"),
            Request::new(1, "A", "B", 2, 1.0).expect("valid"),
            Request::new(2, "C", "D", 2, 1.0).expect("valid"),
        ];
        let matrix = matrix();
        let ctx = SearchContext::new(&requests, 10, &matrix, Some("A"));
        let plan = vec![
            PlanNode::pickup(2),
            PlanNode::delivery(2),
            PlanNode::pickup(0),
            PlanNode::delivery(0),
            PlanNode::pickup(1),
            PlanNode::delivery(1),
        ];
        let cost = ctx.cost(&plan);
        let (improved, improved_cost) = pd_exchange(&plan, cost, &ctx).expect("improves");
        assert!(improved_cost < cost);
        assert!(is_feasible(&improved, &requests, 10));
        assert_eq!(improved.len(), 6);
    }

    #[test]
    fn test_no_improvement_when_already_good() {
        let requests = vec![
            Request::new(0, "A", "B", 2, 1.0).expect("valid"),
            Request::new(1, "B", "C", 2, 1.0).expect("valid"),
        ];
        let matrix = matrix();
        let ctx = SearchContext::new(&requests, 10, &matrix, Some("A"));
        let plan = vec![
            PlanNode::pickup(0),
            PlanNode::delivery(0),
            PlanNode::pickup(1),
            PlanNode::delivery(1),
        ];
        let cost = ctx.cost(&plan);
        assert!(pd_exchange(&plan, cost, &ctx).is_none());
    }

    #[test]
    fn test_single_pair_is_a_no_op() {
        let requests = vec![Request::new(0, "A", "B", 2, 1.0).expect("valid")];
        let matrix = matrix();
        let ctx = SearchContext::new(&requests, 10, &matrix, Some("A"));
        let plan = vec![PlanNode::pickup(0), PlanNode::delivery(0)];
        assert!(pd_exchange(&plan, ctx.cost(&plan), &ctx).is_none());
    }
}
