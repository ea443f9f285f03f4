//! Beam search over mission subsets.
//!
//! # Algorithm
//!
//! Keeps the top-B partial subsets by an estimated score and repeatedly
//! expands every beam entry by every not-yet-included mission whose
//! addition keeps the unique-location count within the stop budget. Full
//! sequencing is deferred to the worker harness, so the estimate is a
//! proxy built from reward and `reward / stops^1.5`, weighted by the
//! caller's reward and stop preferences. The search runs for
//! `min(pool, 2 x stop budget)` iterations and every subset that ever made
//! the beam is handed back for real evaluation.

use std::collections::HashSet;

use crate::models::Mission;

use super::scoring::ObjectiveWeights;

/// Width of the beam.
pub(crate) const DEFAULT_BEAM_WIDTH: usize = 10;

/// One partial solution in the beam.
struct BeamEntry<'a> {
    /// Pool indices, in insertion order.
    members: Vec<usize>,
    locations: HashSet<&'a str>,
    reward: f64,
    estimate: f64,
}

/// Proxy score for a partial subset.
///
/// Reward and the stop-discounted reward are the only objectives cheap
/// enough to estimate without sequencing; when the caller weights neither,
/// raw reward keeps the beam ordered.
fn estimate(reward: f64, stops: usize, weights: &ObjectiveWeights) -> f64 {
    let stop_proxy = if stops > 0 {
        reward / (stops as f64).powf(1.5)
    } else {
        0.0
    };
    let guided = weights.reward * reward
        + (weights.fewest_stops + weights.reward_per_stop) * stop_proxy;
    if guided > 0.0 {
        guided
    } else {
        reward
    }
}

/// Runs the beam and returns every subset that survived any iteration.
pub(crate) fn beam_subsets(
    pool: &[Mission],
    eligible: &[usize],
    max_stops: usize,
    width: usize,
    weights: &ObjectiveWeights,
) -> Vec<Vec<usize>> {
    let mut beam: Vec<BeamEntry> = eligible
        .iter()
        .filter_map(|&index| {
            let mission = &pool[index];
            let locations = mission.locations();
            if locations.len() > max_stops {
                return None;
            }
            let reward = mission.reward();
            Some(BeamEntry {
                estimate: estimate(reward, locations.len(), weights),
                members: vec![index],
                locations,
                reward,
            })
        })
        .collect();
    beam.sort_by(|a, b| b.estimate.total_cmp(&a.estimate));
    beam.truncate(width);

    let mut seen: HashSet<Vec<usize>> = beam.iter().map(|e| identity(&e.members)).collect();
    let mut surviving: Vec<Vec<usize>> = beam.iter().map(|e| e.members.clone()).collect();

    let iterations = eligible.len().min(2 * max_stops);
    for _ in 0..iterations {
        let mut expanded = false;
        let mut next: Vec<BeamEntry> = Vec::new();

        for entry in &beam {
            for &index in eligible {
                if entry.members.contains(&index) {
                    continue;
                }
                let mission = &pool[index];
                let union: HashSet<&str> =
                    entry.locations.union(&mission.locations()).copied().collect();
                if union.len() > max_stops {
                    continue;
                }
                let mut members = entry.members.clone();
                members.push(index);
                if !seen.insert(identity(&members)) {
                    continue;
                }
                let reward = entry.reward + mission.reward();
                next.push(BeamEntry {
                    estimate: estimate(reward, union.len(), weights),
                    members,
                    locations: union,
                    reward,
                });
                expanded = true;
            }
        }
        if !expanded {
            break;
        }

        next.extend(beam);
        next.sort_by(|a, b| b.estimate.total_cmp(&a.estimate));
        next.truncate(width);
        beam = next;

        for entry in &beam {
            if entry.members.len() > 1 {
                surviving.push(entry.members.clone());
            }
        }
    }

    surviving.sort();
    surviving.dedup();
    surviving
}

/// Order-independent subset key.
fn identity(members: &[usize]) -> Vec<usize> {
    let mut key = members.to_vec();
    key.sort_unstable();
    key
}
