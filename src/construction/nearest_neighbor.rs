//! Nearest-neighbor constructive heuristic.
//!
//! # Algorithm
//!
//! Starting from the given location, repeatedly visit the feasible node
//! (capacity-respecting pickup, or delivery of cargo already on board)
//! with the smallest travel time. Pickups get a small preference
//! multiplier so the hauler keeps collecting work when distances tie.
//! Stops when no feasible node remains; requests never picked up are
//! reported as unscheduled rather than raised as an error.
//!
//! # Complexity
//!
//! O(n²) over plan nodes.

use tracing::warn;

use crate::evaluation::SearchContext;
use crate::models::{Action, CargoState, PlanNode};

use super::Construction;

/// Distance multiplier applied to pickup nodes so they win ties.
const PICKUP_PREFERENCE: f64 = 0.9;

/// Builds an initial plan by always visiting the nearest feasible node.
///
/// # Examples
///
/// ```
/// use haul_routing::construction::nearest_neighbor;
/// use haul_routing::distance::TravelMatrix;
/// use haul_routing::evaluation::SearchContext;
/// use haul_routing::models::Request;
///
/// let requests = vec![Request::new(0, "A", "B", 5, 100.0).unwrap()];
/// let matrix = TravelMatrix::new(10.0).with_leg("A", "B", 4.0);
/// let ctx = SearchContext::new(&requests, 8, &matrix, Some("A"));
///
/// let built = nearest_neighbor(&ctx);
/// assert_eq!(built.plan.len(), 2);
/// assert!(built.unscheduled.is_empty());
/// ```
pub fn nearest_neighbor(ctx: &SearchContext) -> Construction {
    let requests = ctx.requests();
    let mut nodes: Vec<PlanNode> = Vec::with_capacity(requests.len() * 2);
    for i in 0..requests.len() {
        nodes.push(PlanNode::pickup(i));
        nodes.push(PlanNode::delivery(i));
    }

    let mut unvisited: Vec<bool> = vec![true; nodes.len()];
    let mut remaining = nodes.len();
    let mut plan: Vec<PlanNode> = Vec::with_capacity(nodes.len());
    let mut cargo = CargoState::new();
    let mut current: Option<String> = ctx.start().map(str::to_string);

    while remaining > 0 {
        let mut best: Option<(usize, f64)> = None;
        for (idx, node) in nodes.iter().enumerate() {
            if !unvisited[idx] {
                continue;
            }
            let size = requests[node.request].size();
            let feasible = match node.action {
                Action::Pickup => cargo.can_add(size, ctx.capacity()),
                Action::Delivery => cargo.is_holding(node.request),
            };
            if !feasible {
                continue;
            }

            let location = node.location(requests);
            let mut distance = match current.as_deref() {
                Some(from) => ctx.minutes(from, location),
                None => 0.0,
            };
            if node.action == Action::Pickup {
                distance *= PICKUP_PREFERENCE;
            }

            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((idx, distance));
            }
        }

        let Some((idx, _)) = best else {
            // No feasible node left: remaining pickups do not fit.
            break;
        };

        let node = nodes[idx];
        unvisited[idx] = false;
        remaining -= 1;
        cargo.apply(node, requests, ctx.capacity());
        current = Some(node.location(requests).to_string());
        plan.push(node);
    }

    let mut unscheduled: Vec<usize> = Vec::new();
    for (idx, node) in nodes.iter().enumerate() {
        if unvisited[idx] && node.action == Action::Pickup {
            unscheduled.push(node.request);
        }
    }
    if !unscheduled.is_empty() {
        warn!(
            unscheduled = unscheduled.len(),
            "nearest neighbor could not place every request"
        );
    }

    Construction { plan, unscheduled }
}
