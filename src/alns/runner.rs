//! Time-boxed adaptive large neighborhood search.
//!
//! # Algorithm
//!
//! Each iteration destroys a random fraction of the current plan with one
//! of three operators and rebuilds the remnant with regret-2 reinsertion.
//! A rebuilt plan replaces the current one when it is cheaper than the
//! best seen, or with a small probability even when it is not, which lets
//! the search climb out of local optima. The best plan ever seen is
//! tracked separately and returned regardless of where the walk ends.
//!
//! A rebuild that fails to reinsert every removed request is discarded for
//! that iteration: comparing a plan that silently dropped cargo against a
//! complete one would bias the walk toward shedding requests.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::construction::regret_insert_into;
use crate::evaluation::SearchContext;
use crate::local_search::EPSILON;
use crate::models::PlanNode;

use super::destroy::{DestroyOperator, RandomRemoval, RelatedRemoval, WorstRemoval};

/// Tuning knobs for one ALNS run.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use haul_routing::alns::AlnsConfig;
///
/// let config = AlnsConfig::default()
///     .with_time_budget(Duration::from_millis(500))
///     .with_max_iterations(20);
/// assert_eq!(config.max_iterations(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct AlnsConfig {
    time_budget: Duration,
    max_iterations: usize,
    destroy_min: f64,
    destroy_max: f64,
    acceptance_probability: f64,
    seed: u64,
}

impl Default for AlnsConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_millis(1200),
            max_iterations: 50,
            destroy_min: 0.15,
            destroy_max: 0.35,
            acceptance_probability: 0.1,
            seed: 42,
        }
    }
}

impl AlnsConfig {
    /// Wall-clock budget for the whole run.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Iteration cap, applied alongside the time budget.
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Bounds of the per-iteration destroy fraction.
    pub fn with_destroy_fraction(mut self, min: f64, max: f64) -> Self {
        self.destroy_min = min;
        self.destroy_max = max;
        self
    }

    /// Probability of accepting a non-improving rebuild.
    pub fn with_acceptance_probability(mut self, probability: f64) -> Self {
        self.acceptance_probability = probability;
        self
    }

    /// RNG seed, for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Configured iteration cap.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Configured time budget.
    pub fn time_budget(&self) -> Duration {
        self.time_budget
    }
}

/// Result of an ALNS run.
#[derive(Debug, Clone)]
pub struct AlnsOutcome {
    /// Best plan seen across all iterations.
    pub plan: Vec<PlanNode>,
    /// Travel time of that plan.
    pub cost: f64,
    /// Iterations completed.
    pub iterations: usize,
    /// `true` if the run stopped on its time budget.
    pub time_limited: bool,
}

/// Improves a feasible plan with a destroy-and-repair burst.
///
/// The input plan must schedule every request it mentions completely; the
/// returned plan schedules exactly the same set.
pub fn alns_improve(plan: Vec<PlanNode>, ctx: &SearchContext, config: &AlnsConfig) -> AlnsOutcome {
    let started = Instant::now();
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut best = plan.clone();
    let mut best_cost = ctx.cost(&best);
    let mut current = plan;
    let mut iterations = 0;

    // Fewer than two scheduled requests leaves nothing to recombine.
    if current.len() >= 4 {
        while started.elapsed() < config.time_budget && iterations < config.max_iterations {
            iterations += 1;

            let fraction = rng.random_range(config.destroy_min..=config.destroy_max);
            let (partial, removed) = match rng.random_range(0..3u8) {
                0 => RelatedRemoval.destroy(&current, fraction, ctx, &mut rng),
                1 => WorstRemoval.destroy(&current, fraction, ctx, &mut rng),
                _ => RandomRemoval.destroy(&current, fraction, ctx, &mut rng),
            };

            let (rebuilt, leftover) = regret_insert_into(partial, &removed, ctx);
            if !leftover.is_empty() {
                continue;
            }

            let rebuilt_cost = ctx.cost(&rebuilt);
            if rebuilt_cost < best_cost - EPSILON {
                best = rebuilt.clone();
                best_cost = rebuilt_cost;
                current = rebuilt;
            } else if rng.random::<f64>() < config.acceptance_probability {
                current = rebuilt;
            }
        }
    }

    let time_limited = started.elapsed() >= config.time_budget;
    debug!(iterations, best_cost, time_limited, "alns burst finished");
    AlnsOutcome {
        plan: best,
        cost: best_cost,
        iterations,
        time_limited,
    }
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

    fn requests() -> Vec<Request> {
        vec![
            Request::new(0, "A", "B", 2, 1.0).expect("valid"),
            Request::new(1, "A", "B", 2, 1.0).expect("valid"),
            Request::new(2, "B", "C", 2, 1.0).expect("valid"),
            Request::new(3, "C", "D", 2, 1.0).expect("valid"),
        ]
    }

    #[test]
    fn test_never_worsens_and_stays_feasible() {
        let requests = requests();
        let matrix = matrix();
        let ctx = SearchContext::new(&requests, 6, &matrix, Some("A"));
        // Deliberately shuffled order
        let plan = vec![
            PlanNode::pickup(2),
            PlanNode::delivery(2),
            PlanNode::pickup(0),
            PlanNode::delivery(0),
            PlanNode::pickup(3),
            PlanNode::delivery(3),
            PlanNode::pickup(1),
            PlanNode::delivery(1),
        ];
        let initial_cost = ctx.cost(&plan);
        let outcome = alns_improve(plan, &ctx, &AlnsConfig::default());
        assert!(outcome.cost <= initial_cost + EPSILON);
        assert!(is_feasible(&outcome.plan, &requests, 6));
        assert_eq!(outcome.plan.len(), 8);
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let requests = requests();
        let matrix = matrix();
        let ctx = SearchContext::new(&requests, 6, &matrix, Some("A"));
        let plan: Vec<PlanNode> = (0..4)
            .flat_map(|r| [PlanNode::pickup(r), PlanNode::delivery(r)])
            .collect();
        let config = AlnsConfig::default().with_seed(7).with_max_iterations(10);
        let a = alns_improve(plan.clone(), &ctx, &config);
        let b = alns_improve(plan, &ctx, &config);
        assert_eq!(a.plan, b.plan);
        assert_eq!(a.cost, b.cost);
    }

    #[test]
    fn test_tiny_plan_returned_unchanged() {
        let requests = vec![Request::new(0, "A", "B", 2, 1.0).expect("valid")];
        let matrix = matrix();
        let ctx = SearchContext::new(&requests, 6, &matrix, Some("A"));
        let plan = vec![PlanNode::pickup(0), PlanNode::delivery(0)];
        let outcome = alns_improve(plan.clone(), &ctx, &AlnsConfig::default());
        assert_eq!(outcome.plan, plan);
        assert_eq!(outcome.iterations, 0);
    }

    #[test]
    fn test_iteration_cap_respected() {
        let requests = requests();
        let matrix = matrix();
        let ctx = SearchContext::new(&requests, 6, &matrix, Some("A"));
        let plan: Vec<PlanNode> = (0..4)
            .flat_map(|r| [PlanNode::pickup(r), PlanNode::delivery(r)])
            .collect();
        let config = AlnsConfig::default().with_max_iterations(3);
        let outcome = alns_improve(plan, &ctx, &config);
        assert!(outcome.iterations <= 3);
    }
}
