//! Mission selection search.
//!
//! Explores subsets of an available mission pool and ranks the results by
//! a weighted multi-objective score:
//!
//! - [`Strategy::Combinatorial`] — exhaustive enumeration, for small pools
//! - [`Strategy::Greedy`] — affinity-guided construction from high-value seeds
//! - [`Strategy::Beam`] — breadth-limited search under a proxy score
//!
//! Each surviving subset is sequenced for real by the
//! [`solver`](crate::solver) and scored in [`scoring`]; infeasible or
//! over-budget subsets are silently discarded. Subset evaluation fans out
//! over a worker pool of independent units, so a failed or timed-out unit
//! costs one candidate, never the search.

mod beam;
mod combinatorial;
mod greedy;
mod scoring;
mod workers;

pub use scoring::{CandidateRoute, ObjectiveWeights, RouteMetrics};

use std::collections::HashSet;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::distance::DistanceOracle;
use crate::models::Mission;

/// How the mission pool is explored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Enumerate every subset. Exact, only tractable for small pools.
    Combinatorial,
    /// Grow subsets greedily from high-value seeds with location affinity.
    Greedy,
    /// Beam search under a reward-based proxy score.
    Beam,
}

impl Strategy {
    /// The strategy the pool size calls for: exhaustive enumeration up to
    /// eight missions, greedy construction beyond.
    pub fn for_pool(size: usize) -> Self {
        if size <= 8 {
            Self::Combinatorial
        } else {
            Self::Greedy
        }
    }
}

/// Reward bounds and capacity screening applied before any strategy runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolFilter {
    min_reward: Option<f64>,
    max_reward: Option<f64>,
}

impl PoolFilter {
    /// A filter that admits everything the hold can carry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects missions paying less than `reward`.
    pub fn with_min_reward(mut self, reward: f64) -> Self {
        self.min_reward = Some(reward);
        self
    }

    /// Rejects missions paying more than `reward`.
    pub fn with_max_reward(mut self, reward: f64) -> Self {
        self.max_reward = Some(reward);
        self
    }

    /// Whether a mission may enter the search at all.
    ///
    /// A mission with any objective larger than the hold is screened out
    /// here so no strategy wastes units on it.
    pub fn admits(&self, mission: &Mission, capacity: u32) -> bool {
        if mission.max_objective_size() > capacity {
            return false;
        }
        if self.min_reward.is_some_and(|min| mission.reward() < min) {
            return false;
        }
        if self.max_reward.is_some_and(|max| mission.reward() > max) {
            return false;
        }
        true
    }
}

/// Tuning for one [`select_routes`] call.
#[derive(Debug, Clone)]
pub struct SelectionConfig {
    strategy: Strategy,
    max_stops: usize,
    top_k: usize,
    offset: usize,
    beam_width: usize,
    greedy_seeds: usize,
    unit_timeout: Duration,
    filter: PoolFilter,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Combinatorial,
            max_stops: 5,
            top_k: 10,
            offset: 0,
            beam_width: beam::DEFAULT_BEAM_WIDTH,
            greedy_seeds: 10,
            unit_timeout: Duration::from_secs(30),
            filter: PoolFilter::default(),
        }
    }
}

impl SelectionConfig {
    /// Uses the given search strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Caps the number of stops a candidate route may have.
    pub fn with_max_stops(mut self, max_stops: usize) -> Self {
        self.max_stops = max_stops;
        self
    }

    /// Number of ranked candidates to return.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Skips the first `offset` ranked candidates (paging).
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Beam width for [`Strategy::Beam`].
    pub fn with_beam_width(mut self, width: usize) -> Self {
        self.beam_width = width;
        self
    }

    /// Seed count for [`Strategy::Greedy`].
    pub fn with_greedy_seeds(mut self, seeds: usize) -> Self {
        self.greedy_seeds = seeds;
        self
    }

    /// Wall-clock allowance for the search's work units.
    pub fn with_unit_timeout(mut self, timeout: Duration) -> Self {
        self.unit_timeout = timeout;
        self
    }

    /// Applies a pool filter before any strategy runs.
    pub fn with_filter(mut self, filter: PoolFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Configured strategy.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Configured stop budget.
    pub fn max_stops(&self) -> usize {
        self.max_stops
    }
}

/// Searches the mission pool and returns the top-K candidate routes.
///
/// Every candidate's route is produced by actually sequencing its subset;
/// ranking min-max normalizes each objective across the surviving pool
/// before applying `weights`. Returns an empty list when nothing passes
/// the filter or no subset sequences feasibly.
pub fn select_routes<D>(
    pool: &[Mission],
    capacity: u32,
    start: Option<&str>,
    oracle: &D,
    weights: &ObjectiveWeights,
    config: &SelectionConfig,
) -> Vec<CandidateRoute>
where
    D: DistanceOracle + Sync,
{
    let eligible: Vec<usize> = pool
        .iter()
        .enumerate()
        .filter(|(_, mission)| config.filter.admits(mission, capacity))
        .map(|(index, _)| index)
        .collect();
    if eligible.is_empty() {
        info!(pool = pool.len(), "no mission passes the pool filter");
        return Vec::new();
    }
    info!(
        eligible = eligible.len(),
        strategy = ?config.strategy,
        max_stops = config.max_stops,
        "selecting routes"
    );

    let deadline = Instant::now() + config.unit_timeout;
    let mut candidates: Vec<CandidateRoute> = match config.strategy {
        Strategy::Combinatorial => {
            let subsets: Vec<Vec<usize>> =
                combinatorial::enumerate_subsets(eligible.len(), config.max_stops)
                    .into_iter()
                    .map(|subset| subset.into_iter().map(|pos| eligible[pos]).collect())
                    .collect();
            subsets
                .par_iter()
                .filter_map(|subset| {
                    workers::evaluate_subset(
                        pool,
                        subset,
                        capacity,
                        start,
                        config.max_stops,
                        oracle,
                        deadline,
                    )
                })
                .collect()
        }
        Strategy::Greedy => {
            let seeds = greedy::top_seeds(pool, &eligible, config.greedy_seeds);
            seeds
                .par_iter()
                .filter_map(|&seed| {
                    greedy::greedy_seed_expansion(
                        pool,
                        &eligible,
                        seed,
                        capacity,
                        start,
                        config.max_stops,
                        weights,
                        oracle,
                        deadline,
                    )
                })
                .collect()
        }
        Strategy::Beam => {
            let subsets = beam::beam_subsets(
                pool,
                &eligible,
                config.max_stops,
                config.beam_width,
                weights,
            );
            subsets
                .par_iter()
                .filter_map(|subset| {
                    workers::evaluate_subset(
                        pool,
                        subset,
                        capacity,
                        start,
                        config.max_stops,
                        oracle,
                        deadline,
                    )
                })
                .collect()
        }
    };

    if candidates.is_empty() {
        warn!(
            eligible = eligible.len(),
            "selection search produced no candidate routes"
        );
        return Vec::new();
    }

    dedup(&mut candidates);
    scoring::rank(&mut candidates, weights);
    candidates
        .into_iter()
        .skip(config.offset)
        .take(config.top_k)
        .collect()
}

/// Drops later candidates covering a subset already seen.
fn dedup(candidates: &mut Vec<CandidateRoute>) {
    let mut seen: HashSet<Vec<u64>> = HashSet::with_capacity(candidates.len());
    candidates.retain(|candidate| seen.insert(candidate.identity()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::TravelMatrix;
    use crate::models::Objective;

    fn mission(id: u64, reward: f64, pickup: &str, delivery: &str, size: u32) -> Mission {
        Mission::new(
            id,
            reward,
            "N/A",
            vec![Objective::new(pickup, delivery, size).expect("valid")],
        )
        .expect("valid")
    }

    fn matrix() -> TravelMatrix {
        TravelMatrix::new(10.0)
            .with_leg("A", "B", 4.0)
            .with_leg("B", "C", 6.0)
            .with_leg("A", "C", 9.0)
    }

    fn pool() -> Vec<Mission> {
        vec![
            mission(1, 8_000.0, "A", "B", 4),
            mission(2, 5_000.0, "B", "C", 3),
            mission(3, 2_000.0, "A", "C", 2),
        ]
    }

    #[test]
    fn test_combinatorial_finds_and_ranks() {
        let pool = pool();
        let matrix = matrix();
        let config = SelectionConfig::default().with_strategy(Strategy::Combinatorial);
        let results = select_routes(
            &pool,
            8,
            Some("A"),
            &matrix,
            &ObjectiveWeights::max_reward(),
            &config,
        );
        assert!(!results.is_empty());
        // Best by raw reward is the full pool.
        assert_eq!(results[0].mission_ids().len(), 3);
        for pair in results.windows(2) {
            assert!(pair[0].score() >= pair[1].score());
        }
    }

    #[test]
    fn test_all_strategies_produce_candidates() {
        let pool = pool();
        let matrix = matrix();
        for strategy in [Strategy::Combinatorial, Strategy::Greedy, Strategy::Beam] {
            let config = SelectionConfig::default().with_strategy(strategy);
            let results = select_routes(
                &pool,
                8,
                Some("A"),
                &matrix,
                &ObjectiveWeights::balanced(),
                &config,
            );
            assert!(!results.is_empty(), "{strategy:?} found nothing");
            for candidate in &results {
                assert!(candidate.route().peak_load() <= 8);
                assert!(candidate.route().stop_count() <= config.max_stops());
            }
        }
    }

    #[test]
    fn test_filter_screens_pool() {
        let pool = pool();
        let matrix = matrix();
        let config = SelectionConfig::default()
            .with_filter(PoolFilter::new().with_min_reward(4_000.0));
        let results = select_routes(
            &pool,
            8,
            Some("A"),
            &matrix,
            &ObjectiveWeights::max_reward(),
            &config,
        );
        for candidate in &results {
            assert!(!candidate.mission_ids().contains(&3));
        }
    }

    #[test]
    fn test_oversized_mission_never_enters_search() {
        let mut pool = pool();
        pool.push(mission(4, 50_000.0, "A", "B", 99));
        let matrix = matrix();
        let results = select_routes(
            &pool,
            8,
            Some("A"),
            &matrix,
            &ObjectiveWeights::max_reward(),
            &SelectionConfig::default(),
        );
        assert!(!results.is_empty());
        for candidate in &results {
            assert!(!candidate.mission_ids().contains(&4));
        }
    }

    #[test]
    fn test_paging() {
        let pool = pool();
        let matrix = matrix();
        let all = select_routes(
            &pool,
            8,
            Some("A"),
            &matrix,
            &ObjectiveWeights::max_reward(),
            &SelectionConfig::default().with_top_k(100),
        );
        let page = select_routes(
            &pool,
            8,
            Some("A"),
            &matrix,
            &ObjectiveWeights::max_reward(),
            &SelectionConfig::default().with_top_k(2).with_offset(1),
        );
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].mission_ids(), all[1].mission_ids());
        assert_eq!(page[1].mission_ids(), all[2].mission_ids());
    }

    #[test]
    fn test_no_duplicate_subsets() {
        let pool = pool();
        let matrix = matrix();
        let results = select_routes(
            &pool,
            8,
            Some("A"),
            &matrix,
            &ObjectiveWeights::balanced(),
            &SelectionConfig::default().with_top_k(100),
        );
        let identities: HashSet<Vec<u64>> = results
            .iter()
            .map(|c| {
                let mut ids = c.mission_ids().to_vec();
                ids.sort_unstable();
                ids
            })
            .collect();
        assert_eq!(identities.len(), results.len());
    }

    #[test]
    fn test_empty_pool_yields_empty_result() {
        let matrix = matrix();
        let results = select_routes(
            &[],
            8,
            Some("A"),
            &matrix,
            &ObjectiveWeights::balanced(),
            &SelectionConfig::default(),
        );
        assert!(results.is_empty());
    }

    #[test]
    fn test_strategy_for_pool_size() {
        assert_eq!(Strategy::for_pool(3), Strategy::Combinatorial);
        assert_eq!(Strategy::for_pool(8), Strategy::Combinatorial);
        assert_eq!(Strategy::for_pool(9), Strategy::Greedy);
    }
}
