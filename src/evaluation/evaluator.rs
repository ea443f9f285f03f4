//! Plan feasibility replay and cost evaluation.
//!
//! Stateless functions shared by every construction, local search, and
//! ALNS component. Feasibility is always checked proactively before a
//! modified plan is accepted; nothing here raises on a bad plan.

use crate::distance::DistanceOracle;
use crate::models::{CargoState, PlanNode, Request};

/// Returns `true` if the plan respects capacity and pickup-before-delivery
/// precedence at every prefix.
///
/// Replays [`CargoState`] across the plan and fails on the first capacity
/// breach or on any delivery whose matching pickup has not yet occurred.
///
/// # Examples
///
/// ```
/// use haul_routing::evaluation::is_feasible;
/// use haul_routing::models::{PlanNode, Request};
///
/// let requests = vec![Request::new(0, "A", "B", 5, 100.0).unwrap()];
/// let good = vec![PlanNode::pickup(0), PlanNode::delivery(0)];
/// let bad = vec![PlanNode::delivery(0), PlanNode::pickup(0)];
/// assert!(is_feasible(&good, &requests, 10));
/// assert!(!is_feasible(&bad, &requests, 10));
/// ```
pub fn is_feasible(plan: &[PlanNode], requests: &[Request], capacity: u32) -> bool {
    let mut state = CargoState::new();
    for &node in plan {
        if !state.apply(node, requests, capacity) {
            return false;
        }
    }
    true
}

/// Total travel time of a plan in minutes.
///
/// Sums the oracle's estimate over consecutive nodes, seeding the previous
/// location with `start` (or the first node's location when no start is
/// given, making the first leg free). Deterministic and side-effect free:
/// the same plan always costs the same.
pub fn plan_cost<D>(plan: &[PlanNode], requests: &[Request], oracle: &D, start: Option<&str>) -> f64
where
    D: DistanceOracle + ?Sized,
{
    let Some(first) = plan.first() else {
        return 0.0;
    };

    let mut prev = start.unwrap_or_else(|| first.location(requests));
    let mut cost = 0.0;
    for node in plan {
        let location = node.location(requests);
        cost += oracle.minutes(prev, location);
        prev = location;
    }
    cost
}

/// Highest hold load reached at any prefix of the plan.
///
/// Assumes the plan is precedence-valid; capacity is not enforced here.
pub fn peak_load(plan: &[PlanNode], requests: &[Request]) -> u32 {
    let mut state = CargoState::new();
    let mut peak = 0;
    for &node in plan {
        // Replay with an unbounded hold to observe the true peak.
        state.apply(node, requests, u32::MAX);
        peak = peak.max(state.load());
    }
    peak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::TravelMatrix;

    fn requests() -> Vec<Request> {
        vec![
            Request::new(0, "A", "B", 5, 1.0).expect("valid"),
            Request::new(1, "B", "C", 3, 1.0).expect("valid"),
        ]
    }

    fn matrix() -> TravelMatrix {
        TravelMatrix::new(10.0)
            .with_leg("A", "B", 4.0)
            .with_leg("B", "C", 6.0)
            .with_leg("A", "C", 9.0)
    }

    #[test]
    fn test_feasible_sequence() {
        let requests = requests();
        let plan = vec![
            PlanNode::pickup(0),
            PlanNode::delivery(0),
            PlanNode::pickup(1),
            PlanNode::delivery(1),
        ];
        assert!(is_feasible(&plan, &requests, 5));
    }

    #[test]
    fn test_capacity_breach_detected() {
        let requests = requests();
        // Both on board at once needs 8
        let plan = vec![
            PlanNode::pickup(0),
            PlanNode::pickup(1),
            PlanNode::delivery(0),
            PlanNode::delivery(1),
        ];
        assert!(!is_feasible(&plan, &requests, 6));
        assert!(is_feasible(&plan, &requests, 8));
    }

    #[test]
    fn test_delivery_before_pickup_detected() {
        let requests = requests();
        let plan = vec![PlanNode::delivery(0), PlanNode::pickup(0)];
        assert!(!is_feasible(&plan, &requests, 100));
    }

    #[test]
    fn test_cost_with_start() {
        let requests = requests();
        let matrix = matrix();
        let plan = vec![
            PlanNode::pickup(0),   // A
            PlanNode::delivery(0), // B
            PlanNode::pickup(1),   // B
            PlanNode::delivery(1), // C
        ];
        // A→A + A→B + B→B + B→C = 0 + 4 + 0 + 6
        assert!((plan_cost(&plan, &requests, &matrix, Some("A")) - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_cost_without_start_first_leg_free() {
        let requests = requests();
        let matrix = matrix();
        let plan = vec![PlanNode::pickup(1), PlanNode::delivery(1)];
        // Seeded at B: B→B + B→C
        assert!((plan_cost(&plan, &requests, &matrix, None) - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_cost_empty_plan() {
        let requests = requests();
        assert_eq!(plan_cost(&[], &requests, &matrix(), Some("A")), 0.0);
    }

    #[test]
    fn test_cost_is_deterministic() {
        let requests = requests();
        let matrix = matrix();
        let plan = vec![
            PlanNode::pickup(0),
            PlanNode::pickup(1),
            PlanNode::delivery(0),
            PlanNode::delivery(1),
        ];
        let a = plan_cost(&plan, &requests, &matrix, Some("A"));
        let b = plan_cost(&plan, &requests, &matrix, Some("A"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_peak_load() {
        let requests = requests();
        let plan = vec![
            PlanNode::pickup(0),
            PlanNode::pickup(1),
            PlanNode::delivery(0),
            PlanNode::delivery(1),
        ];
        assert_eq!(peak_load(&plan, &requests), 8);
    }
}
