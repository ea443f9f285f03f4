//! Regret-2 insertion heuristic.
//!
//! # Algorithm
//!
//! For every unscheduled request, enumerate all feasible
//! `(pickup_position, delivery_position)` pairs in the current plan and
//! record the cheapest and second-cheapest insertion cost. The regret of a
//! request is the gap between the two; a request with only one feasible
//! insertion gets infinite regret, because its last option must not be
//! built over. The request with the highest regret is inserted at its
//! cheapest position, and the cycle repeats until nothing fits.
//!
//! Also serves as the repair step of the ALNS loop and of the
//! pair-exchange neighborhood.
//!
//! # Reference
//!
//! Ropke, S. & Pisinger, D. (2006). "An Adaptive Large Neighborhood Search
//! Heuristic for the Pickup and Delivery Problem with Time Windows",
//! *Transportation Science* 40(4), 455-472.

use tracing::warn;

use crate::evaluation::SearchContext;
use crate::models::PlanNode;

use super::Construction;

/// One feasible way to insert a request into a plan.
#[derive(Debug, Clone, Copy)]
pub struct InsertionPoint {
    /// Index the pickup node is inserted at.
    pub pickup_pos: usize,
    /// Index the delivery node is inserted at, after the pickup is in place.
    pub delivery_pos: usize,
    /// Cost increase relative to the unmodified plan.
    pub delta_cost: f64,
}

/// Returns the plan with `request`'s pickup and delivery spliced in at the
/// given positions.
pub(crate) fn insert_pair(
    plan: &[PlanNode],
    request: usize,
    pickup_pos: usize,
    delivery_pos: usize,
) -> Vec<PlanNode> {
    let mut candidate = Vec::with_capacity(plan.len() + 2);
    candidate.extend_from_slice(plan);
    candidate.insert(pickup_pos, PlanNode::pickup(request));
    candidate.insert(delivery_pos, PlanNode::delivery(request));
    candidate
}

/// Enumerates every feasible insertion of `request` into `plan`, cheapest
/// first.
///
/// Positions satisfy `pickup_pos < delivery_pos`; each candidate plan is
/// feasibility-checked before its cost delta is recorded.
pub fn feasible_insertions(
    plan: &[PlanNode],
    request: usize,
    ctx: &SearchContext,
) -> Vec<InsertionPoint> {
    let base_cost = ctx.cost(plan);
    let mut points = Vec::new();

    for pickup_pos in 0..=plan.len() {
        for delivery_pos in (pickup_pos + 1)..=(plan.len() + 1) {
            let candidate = insert_pair(plan, request, pickup_pos, delivery_pos);
            if !ctx.feasible(&candidate) {
                continue;
            }
            points.push(InsertionPoint {
                pickup_pos,
                delivery_pos,
                delta_cost: ctx.cost(&candidate) - base_cost,
            });
        }
    }

    points.sort_by(|a, b| a.delta_cost.total_cmp(&b.delta_cost));
    points
}

/// Builds a plan from scratch with regret-2 insertion.
pub fn regret_insertion(ctx: &SearchContext) -> Construction {
    let all: Vec<usize> = (0..ctx.requests().len()).collect();
    let (plan, unscheduled) = regret_insert_into(Vec::new(), &all, ctx);
    if !unscheduled.is_empty() {
        warn!(
            unscheduled = unscheduled.len(),
            "regret insertion could not place every request"
        );
    }
    Construction { plan, unscheduled }
}

/// Inserts the given requests into an existing plan by maximum regret.
///
/// Returns the extended plan and the requests that had no feasible
/// insertion. The input plan is assumed feasible; every intermediate plan
/// stays feasible by construction.
pub fn regret_insert_into(
    plan: Vec<PlanNode>,
    requests_to_insert: &[usize],
    ctx: &SearchContext,
) -> (Vec<PlanNode>, Vec<usize>) {
    let mut plan = plan;
    let mut pending: Vec<usize> = requests_to_insert.to_vec();

    while !pending.is_empty() {
        let mut chosen: Option<(usize, InsertionPoint, f64)> = None;

        for (slot, &request) in pending.iter().enumerate() {
            let points = feasible_insertions(&plan, request, ctx);
            let Some(&best) = points.first() else {
                continue;
            };
            // A single option means infinite regret: insert it now or
            // risk losing it.
            let regret = match points.get(1) {
                Some(second) => second.delta_cost - best.delta_cost,
                None => f64::INFINITY,
            };

            let replace = match &chosen {
                None => true,
                Some((_, incumbent, incumbent_regret)) => {
                    regret > *incumbent_regret
                        || (regret == *incumbent_regret && best.delta_cost < incumbent.delta_cost)
                }
            };
            if replace {
                chosen = Some((slot, best, regret));
            }
        }

        let Some((slot, point, _)) = chosen else {
            break;
        };
        let request = pending.remove(slot);
        plan = insert_pair(&plan, request, point.pickup_pos, point.delivery_pos);
    }

    (plan, pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::TravelMatrix;
    use crate::evaluation::is_feasible;
    use crate::models::Request;

    fn matrix() -> TravelMatrix {
        TravelMatrix::new(10.0)
            .with_leg("A", "B", 4.0)
            .with_leg("B", "C", 6.0)
            .with_leg("A", "C", 9.0)
    }

    #[test]
    fn test_insert_pair_positions() {
        let plan = vec![PlanNode::pickup(0), PlanNode::delivery(0)];
        let out = insert_pair(&plan, 1, 1, 2);
        assert_eq!(out[1], PlanNode::pickup(1));
        assert_eq!(out[2], PlanNode::delivery(1));
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_feasible_insertions_sorted() {
        let requests = vec![
            Request::new(0, "A", "B", 3, 1.0).expect("valid"),
            Request::new(1, "B", "C", 3, 1.0).expect("valid"),
        ];
        let matrix = matrix();
        let ctx = SearchContext::new(&requests, 10, &matrix, Some("A"));
        let plan = vec![PlanNode::pickup(0), PlanNode::delivery(0)];
        let points = feasible_insertions(&plan, 1, &ctx);
        assert!(!points.is_empty());
        for pair in points.windows(2) {
            assert!(pair[0].delta_cost <= pair[1].delta_cost);
        }
    }

    #[test]
    fn test_builds_complete_feasible_plan() {
        let requests = vec![
            Request::new(0, "A", "B", 5, 1.0).expect("valid"),
            Request::new(1, "B", "C", 3, 1.0).expect("valid"),
        ];
        let matrix = matrix();
        let ctx = SearchContext::new(&requests, 6, &matrix, Some("A"));
        let built = regret_insertion(&ctx);
        assert!(built.unscheduled.is_empty());
        assert_eq!(built.plan.len(), 4);
        assert!(is_feasible(&built.plan, &requests, 6));
    }

    #[test]
    fn test_empty_plan_has_exactly_one_insertion_point() {
        // The infinite-regret branch fires whenever a request is down to a
        // single slot; an empty plan is the canonical case.
        let requests = vec![Request::new(0, "A", "B", 3, 1.0).expect("valid")];
        let matrix = matrix();
        let ctx = SearchContext::new(&requests, 10, &matrix, Some("A"));
        let points = feasible_insertions(&[], 0, &ctx);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].pickup_pos, 0);
        assert_eq!(points[0].delivery_pos, 1);
    }

    #[test]
    fn test_single_option_request_inserted_first() {
        // Request 0 fills the hold entirely: once anything else is on
        // board its pickup has far fewer slots. With an empty plan every
        // request has many options, so force the squeeze: capacity 10,
        // request 0 is size 10, requests 1 and 2 are size 1.
        let requests = vec![
            Request::new(0, "A", "B", 10, 1.0).expect("valid"),
            Request::new(1, "A", "B", 1, 1.0).expect("valid"),
            Request::new(2, "A", "B", 1, 1.0).expect("valid"),
        ];
        let matrix = matrix();
        let ctx = SearchContext::new(&requests, 10, &matrix, Some("A"));
        let built = regret_insertion(&ctx);
        assert!(built.unscheduled.is_empty());
        assert!(is_feasible(&built.plan, &requests, 10));
    }

    #[test]
    fn test_oversized_request_reported() {
        let requests = vec![
            Request::new(0, "A", "B", 20, 1.0).expect("valid"),
            Request::new(1, "A", "B", 2, 1.0).expect("valid"),
        ];
        let matrix = matrix();
        let ctx = SearchContext::new(&requests, 10, &matrix, Some("A"));
        let built = regret_insertion(&ctx);
        assert_eq!(built.unscheduled, vec![0]);
        assert_eq!(built.plan.len(), 2);
    }

    #[test]
    fn test_insert_into_existing_plan() {
        let requests = vec![
            Request::new(0, "A", "B", 3, 1.0).expect("valid"),
            Request::new(1, "B", "C", 3, 1.0).expect("valid"),
        ];
        let matrix = matrix();
        let ctx = SearchContext::new(&requests, 10, &matrix, Some("A"));
        let plan = vec![PlanNode::pickup(0), PlanNode::delivery(0)];
        let (extended, leftover) = regret_insert_into(plan, &[1], &ctx);
        assert!(leftover.is_empty());
        assert_eq!(extended.len(), 4);
        assert!(is_feasible(&extended, &requests, 10));
    }
}
