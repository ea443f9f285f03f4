//! Stops and the compressed display route.
//!
//! A [`Route`] is produced by compressing a feasible node plan: consecutive
//! nodes that share a location merge into one [`Stop`] carrying the cargo
//! level before and after the visit. Routes are display/output objects;
//! search always operates on the underlying node plan.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{Action, PlanNode, Request};

/// One visit in a route: a location plus everything picked up and
/// delivered there.
///
/// Within a stop, deliveries are accounted before pickups — freeing hold
/// space first is the order a hauler would actually service the stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    location: String,
    pickups: Vec<u64>,
    deliveries: Vec<u64>,
    pickup_size: u32,
    delivery_size: u32,
    cargo_before: u32,
    cargo_after: u32,
}

impl Stop {
    /// Location visited.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// IDs of requests picked up here.
    pub fn pickups(&self) -> &[u64] {
        &self.pickups
    }

    /// IDs of requests delivered here.
    pub fn deliveries(&self) -> &[u64] {
        &self.deliveries
    }

    /// Total SCU collected at this stop.
    pub fn pickup_size(&self) -> u32 {
        self.pickup_size
    }

    /// Total SCU dropped off at this stop.
    pub fn delivery_size(&self) -> u32 {
        self.delivery_size
    }

    /// Hold load on arrival, in SCU.
    pub fn cargo_before(&self) -> u32 {
        self.cargo_before
    }

    /// Hold load on departure, in SCU.
    pub fn cargo_after(&self) -> u32 {
        self.cargo_after
    }

    /// Net SCU change at this stop.
    pub fn net_change(&self) -> i64 {
        self.pickup_size as i64 - self.delivery_size as i64
    }
}

/// An ordered list of stops plus route-level aggregates.
///
/// Produced only from a feasible plan; immutable once returned. The route
/// owns the requests it schedules so it can later be re-expanded into a
/// node plan (for incremental insertion) without outside bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    stops: Vec<Stop>,
    requests: Vec<Request>,
    start: Option<String>,
    total_reward: f64,
    total_size: u32,
    time_limited: bool,
}

impl Route {
    /// An empty route (nothing to haul).
    pub fn empty(start: Option<&str>) -> Self {
        Self {
            stops: Vec::new(),
            requests: Vec::new(),
            start: start.map(str::to_string),
            total_reward: 0.0,
            total_size: 0,
            time_limited: false,
        }
    }

    /// Compresses a feasible node plan into a stop-based route.
    ///
    /// Consecutive nodes at the same location merge into one stop. The
    /// caller is responsible for only passing feasible plans.
    pub(crate) fn from_plan(
        plan: &[PlanNode],
        requests: &[Request],
        start: Option<&str>,
        time_limited: bool,
    ) -> Self {
        let mut scheduled: Vec<Request> = Vec::new();
        let mut seen: HashSet<usize> = HashSet::new();
        for node in plan {
            if seen.insert(node.request) {
                scheduled.push(requests[node.request].clone());
            }
        }

        let mut stops: Vec<Stop> = Vec::new();
        let mut load: u32 = 0;
        let mut i = 0;
        while i < plan.len() {
            let location = plan[i].location(requests);
            let mut j = i;
            while j < plan.len() && plan[j].location(requests) == location {
                j += 1;
            }

            let mut pickups = Vec::new();
            let mut deliveries = Vec::new();
            let mut pickup_size = 0;
            let mut delivery_size = 0;
            for node in &plan[i..j] {
                let request = &requests[node.request];
                match node.action {
                    Action::Pickup => {
                        pickups.push(request.id());
                        pickup_size += request.size();
                    }
                    Action::Delivery => {
                        deliveries.push(request.id());
                        delivery_size += request.size();
                    }
                }
            }

            let cargo_before = load;
            load = load - delivery_size + pickup_size;
            stops.push(Stop {
                location: location.to_string(),
                pickups,
                deliveries,
                pickup_size,
                delivery_size,
                cargo_before,
                cargo_after: load,
            });
            i = j;
        }

        let total_reward = scheduled.iter().map(|r| r.value()).sum();
        let total_size = scheduled.iter().map(|r| r.size()).sum();
        Self {
            stops,
            requests: scheduled,
            start: start.map(str::to_string),
            total_reward,
            total_size,
            time_limited,
        }
    }

    /// Re-expands this route into a node plan over [`Route::requests`].
    ///
    /// Within each stop, deliveries come before pickups, preserving the
    /// load-minimizing service order the compression assumed.
    pub(crate) fn to_plan(&self) -> Vec<PlanNode> {
        let index_of: HashMap<u64, usize> = self
            .requests
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id(), i))
            .collect();

        let mut plan = Vec::new();
        for stop in &self.stops {
            for id in &stop.deliveries {
                plan.push(PlanNode::delivery(index_of[id]));
            }
            for id in &stop.pickups {
                plan.push(PlanNode::pickup(index_of[id]));
            }
        }
        plan
    }

    /// The stops, in visiting order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Number of stops.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// The requests this route schedules.
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Starting location, if one was given.
    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    /// Total reward across scheduled requests.
    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    /// Total SCU moved by this route.
    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    /// Highest hold load reached at any stop.
    pub fn peak_load(&self) -> u32 {
        self.stops.iter().map(|s| s.cargo_after).max().unwrap_or(0)
    }

    /// Returns `true` if the route visits nothing.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Returns `true` if optimization stopped on its time budget rather
    /// than converging.
    pub fn time_limited(&self) -> bool {
        self.time_limited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requests() -> Vec<Request> {
        vec![
            Request::new(0, "A", "B", 5, 1_000.0).expect("valid"),
            Request::new(1, "B", "C", 3, 500.0).expect("valid"),
        ]
    }

    #[test]
    fn test_compress_merges_same_location() {
        let requests = requests();
        // P0@A, D0@B, P1@B, D1@C — B nodes merge into one stop
        let plan = vec![
            PlanNode::pickup(0),
            PlanNode::delivery(0),
            PlanNode::pickup(1),
            PlanNode::delivery(1),
        ];
        let route = Route::from_plan(&plan, &requests, Some("A"), false);
        assert_eq!(route.stop_count(), 3);
        assert_eq!(route.stops()[1].location(), "B");
        assert_eq!(route.stops()[1].pickups(), &[1]);
        assert_eq!(route.stops()[1].deliveries(), &[0]);
    }

    #[test]
    fn test_cargo_accounting_deliveries_first() {
        let requests = requests();
        let plan = vec![
            PlanNode::pickup(0),
            PlanNode::delivery(0),
            PlanNode::pickup(1),
            PlanNode::delivery(1),
        ];
        let route = Route::from_plan(&plan, &requests, Some("A"), false);
        let b = &route.stops()[1];
        assert_eq!(b.cargo_before(), 5);
        // Deliver 5, then pick up 3
        assert_eq!(b.cargo_after(), 3);
        assert_eq!(route.peak_load(), 5);
    }

    #[test]
    fn test_route_totals() {
        let requests = requests();
        let plan = vec![
            PlanNode::pickup(0),
            PlanNode::delivery(0),
            PlanNode::pickup(1),
            PlanNode::delivery(1),
        ];
        let route = Route::from_plan(&plan, &requests, None, false);
        assert_eq!(route.total_reward(), 1_500.0);
        assert_eq!(route.total_size(), 8);
        assert_eq!(route.requests().len(), 2);
    }

    #[test]
    fn test_to_plan_round_trip_is_feasible_order() {
        let requests = requests();
        let plan = vec![
            PlanNode::pickup(0),
            PlanNode::pickup(1),
            PlanNode::delivery(0),
            PlanNode::delivery(1),
        ];
        let route = Route::from_plan(&plan, &requests, Some("A"), false);
        let rebuilt = route.to_plan();
        assert_eq!(rebuilt.len(), 4);
        // Every request appears exactly once per action
        let pickups = rebuilt.iter().filter(|n| n.action == Action::Pickup).count();
        assert_eq!(pickups, 2);
    }

    #[test]
    fn test_empty_route() {
        let route = Route::empty(Some("A"));
        assert!(route.is_empty());
        assert_eq!(route.peak_load(), 0);
        assert_eq!(route.total_size(), 0);
        assert_eq!(route.start(), Some("A"));
    }
}
