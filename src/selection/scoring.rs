//! Multi-objective candidate scoring.
//!
//! Raw metrics live on wildly different scales (an aUEC reward against a
//! stop count), so ranking min-max normalizes each objective across the
//! candidate pool before applying the caller's weights. An objective on
//! which every candidate agrees contributes a constant 1.0 instead of a
//! division by zero.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceOracle;
use crate::models::Route;

/// Caller-supplied weights over the five ranking objectives.
///
/// Weights need not sum to one; they scale normalized [0, 1] objective
/// values, so only their relative sizes matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    /// Total reward.
    pub reward: f64,
    /// Reward per stop.
    pub reward_per_stop: f64,
    /// Reward per travel minute.
    pub reward_per_distance: f64,
    /// Reward per SCU hauled.
    pub reward_per_scu: f64,
    /// Fewer stops outright.
    pub fewest_stops: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self::balanced()
    }
}

impl ObjectiveWeights {
    /// Chase the biggest payout regardless of route shape.
    pub fn max_reward() -> Self {
        Self {
            reward: 1.0,
            reward_per_stop: 0.0,
            reward_per_distance: 0.0,
            reward_per_scu: 0.0,
            fewest_stops: 0.0,
        }
    }

    /// Prefer short, dense routes over raw payout.
    pub fn fewest_stops() -> Self {
        Self {
            reward: 0.2,
            reward_per_stop: 0.0,
            reward_per_distance: 0.0,
            reward_per_scu: 0.0,
            fewest_stops: 0.8,
        }
    }

    /// Equal pull on every objective.
    pub fn balanced() -> Self {
        Self {
            reward: 0.2,
            reward_per_stop: 0.2,
            reward_per_distance: 0.2,
            reward_per_scu: 0.2,
            fewest_stops: 0.2,
        }
    }

    /// Returns `true` if the weights can rank anything: all finite, none
    /// negative, at least one positive.
    pub fn is_valid(&self) -> bool {
        let all = [
            self.reward,
            self.reward_per_stop,
            self.reward_per_distance,
            self.reward_per_scu,
            self.fewest_stops,
        ];
        all.iter().all(|w| w.is_finite() && *w >= 0.0) && all.iter().any(|w| *w > 0.0)
    }
}

/// Raw per-route measurements the ranking objectives are drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    total_reward: f64,
    total_size: u32,
    stop_count: usize,
    mission_count: usize,
    travel_minutes: f64,
    reward_per_stop: f64,
    reward_per_scu: f64,
    reward_per_minute: f64,
}

impl RouteMetrics {
    /// Measures a sequenced route, estimating travel via the oracle.
    pub fn measure<D>(route: &Route, mission_count: usize, oracle: &D) -> Self
    where
        D: DistanceOracle + ?Sized,
    {
        let mut travel_minutes = 0.0;
        let mut prev = route
            .start()
            .or_else(|| route.stops().first().map(|s| s.location()));
        for stop in route.stops() {
            if let Some(from) = prev {
                travel_minutes += oracle.minutes(from, stop.location());
            }
            prev = Some(stop.location());
        }

        let total_reward = route.total_reward();
        let total_size = route.total_size();
        let stop_count = route.stop_count();
        Self {
            total_reward,
            total_size,
            stop_count,
            mission_count,
            travel_minutes,
            reward_per_stop: ratio(total_reward, stop_count as f64),
            reward_per_scu: ratio(total_reward, total_size as f64),
            reward_per_minute: ratio(total_reward, travel_minutes),
        }
    }

    /// Total reward across the subset.
    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    /// Total SCU hauled.
    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    /// Stops in the sequenced route.
    pub fn stop_count(&self) -> usize {
        self.stop_count
    }

    /// Missions contributing to the subset.
    pub fn mission_count(&self) -> usize {
        self.mission_count
    }

    /// Estimated travel time in minutes.
    pub fn travel_minutes(&self) -> f64 {
        self.travel_minutes
    }

    /// Reward per stop.
    pub fn reward_per_stop(&self) -> f64 {
        self.reward_per_stop
    }

    /// Reward per SCU.
    pub fn reward_per_scu(&self) -> f64 {
        self.reward_per_scu
    }

    /// Reward per travel minute.
    pub fn reward_per_minute(&self) -> f64 {
        self.reward_per_minute
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// A ranked mission subset: the subset, its sequenced route, raw metrics,
/// and the combined weighted score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRoute {
    mission_ids: Vec<u64>,
    route: Route,
    metrics: RouteMetrics,
    score: f64,
}

impl CandidateRoute {
    pub(crate) fn new(mission_ids: Vec<u64>, route: Route, metrics: RouteMetrics) -> Self {
        Self {
            mission_ids,
            route,
            metrics,
            score: 0.0,
        }
    }

    /// IDs of the missions in this subset.
    pub fn mission_ids(&self) -> &[u64] {
        &self.mission_ids
    }

    /// The sequenced route.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Raw metrics the score was computed from.
    pub fn metrics(&self) -> &RouteMetrics {
        &self.metrics
    }

    /// Combined weighted score; comparable only within one ranking call.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Subset identity for deduplication.
    pub(crate) fn identity(&self) -> Vec<u64> {
        let mut ids = self.mission_ids.clone();
        ids.sort_unstable();
        ids
    }
}

/// Spread below which an objective is treated as constant.
const SPREAD_EPSILON: f64 = 1e-9;

/// Scores and sorts candidates by min-max normalized weighted objectives.
///
/// `fewest_stops` is inverted before weighting, so fewer stops normalizes
/// toward 1.0.
pub(crate) fn rank(candidates: &mut [CandidateRoute], weights: &ObjectiveWeights) {
    if candidates.is_empty() {
        return;
    }

    let reward = Scale::over(candidates, |c| c.metrics.total_reward);
    let per_stop = Scale::over(candidates, |c| c.metrics.reward_per_stop);
    let per_minute = Scale::over(candidates, |c| c.metrics.reward_per_minute);
    let per_scu = Scale::over(candidates, |c| c.metrics.reward_per_scu);
    let stops = Scale::over(candidates, |c| c.metrics.stop_count as f64);

    for candidate in candidates.iter_mut() {
        candidate.score = weights.reward * reward.ascending(candidate.metrics.total_reward)
            + weights.reward_per_stop * per_stop.ascending(candidate.metrics.reward_per_stop)
            + weights.reward_per_distance
                * per_minute.ascending(candidate.metrics.reward_per_minute)
            + weights.reward_per_scu * per_scu.ascending(candidate.metrics.reward_per_scu)
            + weights.fewest_stops * stops.descending(candidate.metrics.stop_count as f64);
    }

    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.metrics.total_reward.total_cmp(&a.metrics.total_reward))
    });
}

/// Observed range of one objective across a candidate pool.
struct Scale {
    min: f64,
    max: f64,
}

impl Scale {
    fn over(candidates: &[CandidateRoute], metric: impl Fn(&CandidateRoute) -> f64) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for candidate in candidates {
            let value = metric(candidate);
            min = min.min(value);
            max = max.max(value);
        }
        Self { min, max }
    }

    /// Normalizes with larger-is-better orientation.
    fn ascending(&self, value: f64) -> f64 {
        if self.max - self.min <= SPREAD_EPSILON {
            1.0
        } else {
            (value - self.min) / (self.max - self.min)
        }
    }

    /// Normalizes with smaller-is-better orientation.
    fn descending(&self, value: f64) -> f64 {
        if self.max - self.min <= SPREAD_EPSILON {
            1.0
        } else {
            (self.max - value) / (self.max - self.min)
        }
    }
}
