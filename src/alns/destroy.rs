//! Destroy operators for the ALNS loop.
//!
//! # Operators
//!
//! - [`RandomRemoval`] — removes random requests
//! - [`WorstRemoval`] — removes the requests with the largest marginal cost
//! - [`RelatedRemoval`] — removes requests adjacent in the current plan
//!
//! Each operator removes whole pickup-delivery pairs, never a lone node,
//! so the partial plan stays precedence-valid for the repair step.
//!
//! # Reference
//!
//! Ropke, S. & Pisinger, D. (2006). "An Adaptive Large Neighborhood Search
//! Heuristic for the Pickup and Delivery Problem with Time Windows",
//! *Transportation Science* 40(4), 455-472.

use rand::seq::index::sample;
use rand::Rng;

use crate::evaluation::SearchContext;
use crate::local_search::pd_pairs;
use crate::models::PlanNode;

/// Removes whole requests from a plan, leaving a precedence-valid remnant.
pub trait DestroyOperator {
    /// Operator name for logs.
    fn name(&self) -> &str;

    /// Removes roughly `fraction` of the scheduled requests.
    ///
    /// Returns the partial plan and the removed request indices. At least
    /// one request is removed from a non-empty plan.
    fn destroy<R: Rng>(
        &self,
        plan: &[PlanNode],
        fraction: f64,
        ctx: &SearchContext,
        rng: &mut R,
    ) -> (Vec<PlanNode>, Vec<usize>);
}

/// Number of requests to remove for a given fraction, at least one.
fn removal_count(pairs: usize, fraction: f64) -> usize {
    (((pairs as f64) * fraction).round() as usize).clamp(1, pairs)
}

/// Splits a plan into the nodes of kept requests and the removed set.
fn split_out(plan: &[PlanNode], removed: &[usize]) -> Vec<PlanNode> {
    plan.iter()
        .copied()
        .filter(|node| !removed.contains(&node.request))
        .collect()
}

/// Removes a uniformly random selection of requests.
///
/// The baseline operator; keeps the search diverse when the guided
/// operators stall.
pub struct RandomRemoval;

impl DestroyOperator for RandomRemoval {
    fn name(&self) -> &str {
        "random_removal"
    }

    fn destroy<R: Rng>(
        &self,
        plan: &[PlanNode],
        fraction: f64,
        _ctx: &SearchContext,
        rng: &mut R,
    ) -> (Vec<PlanNode>, Vec<usize>) {
        let pairs = pd_pairs(plan);
        if pairs.is_empty() {
            return (plan.to_vec(), Vec::new());
        }
        let count = removal_count(pairs.len(), fraction);
        let removed: Vec<usize> = sample(rng, pairs.len(), count)
            .into_iter()
            .map(|slot| pairs[slot].request)
            .collect();
        (split_out(plan, &removed), removed)
    }
}

/// Removes the requests whose marginal contribution to travel time is
/// largest.
///
/// The contribution of a request is `cost(plan) - cost(plan without it)`;
/// a little noise breaks ties so repeated calls do not always pick the
/// same victims.
pub struct WorstRemoval;

impl DestroyOperator for WorstRemoval {
    fn name(&self) -> &str {
        "worst_removal"
    }

    fn destroy<R: Rng>(
        &self,
        plan: &[PlanNode],
        fraction: f64,
        ctx: &SearchContext,
        rng: &mut R,
    ) -> (Vec<PlanNode>, Vec<usize>) {
        let pairs = pd_pairs(plan);
        if pairs.is_empty() {
            return (plan.to_vec(), Vec::new());
        }
        let count = removal_count(pairs.len(), fraction);
        let full_cost = ctx.cost(plan);

        let mut contributions: Vec<(usize, f64)> = pairs
            .iter()
            .map(|pair| {
                let without = split_out(plan, &[pair.request]);
                let saving = full_cost - ctx.cost(&without);
                let noise = rng.random_range(0.0..0.01f64);
                (pair.request, saving + noise)
            })
            .collect();
        contributions.sort_by(|a, b| b.1.total_cmp(&a.1));

        let removed: Vec<usize> = contributions
            .into_iter()
            .take(count)
            .map(|(request, _)| request)
            .collect();
        (split_out(plan, &removed), removed)
    }
}

/// Removes a cluster of requests that sit near each other in the plan.
///
/// Seeds with a random scheduled request, then repeatedly removes the
/// request whose pickup index is nearest to any already-removed request's
/// pickup index. Index proximity stands in for spatial relatedness, since
/// nodes adjacent in a good plan are adjacent in space.
pub struct RelatedRemoval;

impl DestroyOperator for RelatedRemoval {
    fn name(&self) -> &str {
        "related_removal"
    }

    fn destroy<R: Rng>(
        &self,
        plan: &[PlanNode],
        fraction: f64,
        _ctx: &SearchContext,
        rng: &mut R,
    ) -> (Vec<PlanNode>, Vec<usize>) {
        let pairs = pd_pairs(plan);
        if pairs.is_empty() {
            return (plan.to_vec(), Vec::new());
        }
        let count = removal_count(pairs.len(), fraction);

        let seed_slot = rng.random_range(0..pairs.len());
        let mut removed_pickups = vec![pairs[seed_slot].pickup_pos];
        let mut removed = vec![pairs[seed_slot].request];
        let mut candidates: Vec<_> = pairs
            .iter()
            .filter(|pair| pair.request != removed[0])
            .copied()
            .collect();

        while removed.len() < count {
            let Some((slot, _)) = candidates
                .iter()
                .enumerate()
                .map(|(slot, pair)| {
                    let nearest = removed_pickups
                        .iter()
                        .map(|&p| p.abs_diff(pair.pickup_pos))
                        .min()
                        .unwrap_or(usize::MAX);
                    (slot, nearest)
                })
                .min_by_key(|&(_, nearest)| nearest)
            else {
                break;
            };
            let pair = candidates.remove(slot);
            removed_pickups.push(pair.pickup_pos);
            removed.push(pair.request);
        }

        (split_out(plan, &removed), removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::distance::TravelMatrix;
    use crate::models::Request;

    fn setup() -> (Vec<Request>, TravelMatrix) {
        let requests = vec![
            Request::new(0, "A", "B", 2, 1.0).expect("valid"),
            Request::new(1, "B", "C", 2, 1.0).expect("valid"),
            Request::new(2, "C", "D", 2, 1.0).expect("valid"),
            Request::new(3, "D", "E", 2, 1.0).expect("valid"),
        ];
        let matrix = TravelMatrix::new(10.0)
            .with_leg("A", "B", 1.0)
            .with_leg("B", "C", 1.0)
            .with_leg("C", "D", 1.0)
            .with_leg("D", "E", 1.0);
        (requests, matrix)
    }

    fn chain_plan() -> Vec<PlanNode> {
        (0..4)
            .flat_map(|r| [PlanNode::pickup(r), PlanNode::delivery(r)])
            .collect()
    }

    #[test]
    fn test_random_removal_removes_whole_pairs() {
        let (requests, matrix) = setup();
        let ctx = SearchContext::new(&requests, 10, &matrix, Some("A"));
        let plan = chain_plan();
        let mut rng = StdRng::seed_from_u64(42);
        let (partial, removed) = RandomRemoval.destroy(&plan, 0.5, &ctx, &mut rng);
        assert_eq!(removed.len(), 2);
        assert_eq!(partial.len(), 4);
        for node in &partial {
            assert!(!removed.contains(&node.request));
        }
    }

    #[test]
    fn test_worst_removal_picks_expensive_request() {
        let (mut requests, matrix) = setup();
        // Request 3 now detours far off the A-E chain.
        requests[3] = Request::new(3, "A", "Z", 2, 1.0).expect("valid");
        let ctx = SearchContext::new(&requests, 10, &matrix, Some("A"));
        let plan = chain_plan();
        let mut rng = StdRng::seed_from_u64(42);
        let (_, removed) = WorstRemoval.destroy(&plan, 0.25, &ctx, &mut rng);
        assert_eq!(removed, vec![3]);
    }

    #[test]
    fn test_related_removal_takes_neighbors() {
        let (requests, matrix) = setup();
        let ctx = SearchContext::new(&requests, 10, &matrix, Some("A"));
        let plan = chain_plan();
        let mut rng = StdRng::seed_from_u64(7);
        let (_, removed) = RelatedRemoval.destroy(&plan, 0.5, &ctx, &mut rng);
        assert_eq!(removed.len(), 2);
        // Pickup indices in the chain are 0, 2, 4, 6; neighbors differ by 2.
        let pairs = pd_pairs(&plan);
        let pickup_of = |r: usize| pairs.iter().find(|p| p.request == r).unwrap().pickup_pos;
        assert_eq!(pickup_of(removed[0]).abs_diff(pickup_of(removed[1])), 2);
    }

    #[test]
    fn test_removes_at_least_one() {
        let (requests, matrix) = setup();
        let ctx = SearchContext::new(&requests, 10, &matrix, Some("A"));
        let plan = chain_plan();
        let mut rng = StdRng::seed_from_u64(1);
        let (_, removed) = RandomRemoval.destroy(&plan, 0.0, &ctx, &mut rng);
        assert_eq!(removed.len(), 1);
    }

    #[test]
    fn test_empty_plan_is_untouched() {
        let (requests, matrix) = setup();
        let ctx = SearchContext::new(&requests, 10, &matrix, None);
        let mut rng = StdRng::seed_from_u64(1);
        let (partial, removed) = RelatedRemoval.destroy(&[], 0.3, &ctx, &mut rng);
        assert!(partial.is_empty());
        assert!(removed.is_empty());
    }
}
