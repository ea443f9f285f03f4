//! Greedy subset construction with location affinity.
//!
//! # Algorithm
//!
//! Each of the top-N highest-reward missions seeds one expansion. A seed
//! grows by repeatedly adding the unselected mission with the best
//! `reward + affinity`, where affinity rewards overlap with locations the
//! subset already visits and penalizes dragging in new ones. Expansion
//! stops at the stop budget, when nothing fits, or when the growing subset
//! turns infeasible. Every prefix of the expansion is evaluated and the
//! best candidate along the chain is returned, so overgrowing a subset
//! never loses an earlier, better route.

use std::collections::HashSet;
use std::time::Instant;

use crate::distance::DistanceOracle;
use crate::models::Mission;

use super::scoring::{CandidateRoute, ObjectiveWeights};
use super::workers::evaluate_subset;

/// Bonus per already-visited location a mission shares with the subset.
const AFFINITY_OVERLAP_BONUS: f64 = 0.15;
/// Penalty per new location a mission would add.
const AFFINITY_NEW_PENALTY: f64 = 0.05;

/// Location-affinity bonus of adding `mission` to a subset already
/// visiting `selected` locations.
///
/// Scaled by the caller's fewest-stops weight (floored at 0.1 so overlap
/// still guides the search when the caller does not care about stops).
pub(crate) fn affinity_score(
    mission: &Mission,
    selected: &HashSet<&str>,
    fewest_stops_weight: f64,
) -> f64 {
    if selected.is_empty() {
        return 0.0;
    }
    let locations = mission.locations();
    let overlap = locations.iter().filter(|l| selected.contains(*l)).count() as f64;
    let fresh = locations.len() as f64 - overlap;
    let stop_weight = fewest_stops_weight.max(0.1);

    overlap * mission.reward() * AFFINITY_OVERLAP_BONUS * stop_weight
        - fresh * mission.reward() * AFFINITY_NEW_PENALTY * stop_weight
}

/// Positions in `eligible` of the `count` highest-reward missions.
pub(crate) fn top_seeds(pool: &[Mission], eligible: &[usize], count: usize) -> Vec<usize> {
    let mut seeds: Vec<usize> = (0..eligible.len()).collect();
    seeds.sort_by(|&a, &b| {
        pool[eligible[b]]
            .reward()
            .total_cmp(&pool[eligible[a]].reward())
    });
    seeds.truncate(count);
    seeds
}

/// One greedy work unit: expands a single seed and returns the best
/// candidate found along the way.
#[allow(clippy::too_many_arguments)]
pub(crate) fn greedy_seed_expansion<D>(
    pool: &[Mission],
    eligible: &[usize],
    seed: usize,
    capacity: u32,
    start: Option<&str>,
    max_stops: usize,
    weights: &ObjectiveWeights,
    oracle: &D,
    deadline: Instant,
) -> Option<CandidateRoute>
where
    D: DistanceOracle,
{
    let mut selected: Vec<usize> = vec![eligible[seed]];
    let mut selected_locations: HashSet<&str> = pool[eligible[seed]].locations();
    let mut available: Vec<usize> = eligible
        .iter()
        .copied()
        .filter(|&index| index != eligible[seed])
        .collect();

    let mut best = evaluate_subset(pool, &selected, capacity, start, max_stops, oracle, deadline);

    while !available.is_empty() && selected_locations.len() < max_stops {
        if Instant::now() >= deadline {
            break;
        }

        let mut chosen: Option<(usize, f64)> = None;
        for (slot, &index) in available.iter().enumerate() {
            let mission = &pool[index];
            let union: HashSet<&str> = selected_locations
                .union(&mission.locations())
                .copied()
                .collect();
            if union.len() > max_stops {
                continue;
            }
            let combined =
                mission.reward() + affinity_score(mission, &selected_locations, weights.fewest_stops);
            if chosen.is_none_or(|(_, score)| combined > score) {
                chosen = Some((slot, combined));
            }
        }
        let Some((slot, _)) = chosen else {
            break;
        };

        let index = available.remove(slot);
        selected.push(index);
        selected_locations.extend(pool[index].locations());

        match evaluate_subset(pool, &selected, capacity, start, max_stops, oracle, deadline) {
            Some(candidate) => {
                let better = best.as_ref().is_none_or(|incumbent| {
                    candidate.metrics().total_reward() > incumbent.metrics().total_reward()
                });
                if better {
                    best = Some(candidate);
                }
            }
            // The subset stopped sequencing; adding more will not help.
            None if best.is_some() => break,
            None => {}
        }
    }

    best
}
