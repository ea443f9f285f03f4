//! Hauling missions and their cargo objectives.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Request, RequestError};

/// Error produced when a mission fails structural validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MissionError {
    /// Reward was zero or negative.
    #[error("mission reward must be positive")]
    NonPositiveReward,
    /// The mission carried no objectives.
    #[error("mission must have at least one objective")]
    NoObjectives,
}

/// A single cargo objective within a mission: move `size` SCU from one
/// location to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pickup: String,
    delivery: String,
    size: u32,
}

impl Objective {
    /// Creates an objective, validating the same invariants as [`Request`].
    pub fn new(pickup: &str, delivery: &str, size: u32) -> Result<Self, RequestError> {
        if pickup.is_empty() || delivery.is_empty() {
            return Err(RequestError::EmptyLocation);
        }
        if pickup == delivery {
            return Err(RequestError::SameLocation);
        }
        if size == 0 {
            return Err(RequestError::ZeroSize);
        }
        Ok(Self {
            pickup: pickup.to_string(),
            delivery: delivery.to_string(),
            size,
        })
    }

    /// Location where the cargo is collected.
    pub fn pickup(&self) -> &str {
        &self.pickup
    }

    /// Location where the cargo is dropped off.
    pub fn delivery(&self) -> &str {
        &self.delivery
    }

    /// Cargo size in SCU.
    pub fn size(&self) -> u32 {
        self.size
    }
}

/// A hauling mission: a reward, an availability note, and one or more
/// cargo objectives.
///
/// # Examples
///
/// ```
/// use haul_routing::models::{Mission, Objective};
///
/// let mission = Mission::new(
///     1,
///     9_000.0,
///     "02:15:00",
///     vec![Objective::new("Everus Harbor", "Lorville", 8).unwrap()],
/// )
/// .unwrap();
/// assert_eq!(mission.total_size(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    id: u64,
    reward: f64,
    availability: String,
    objectives: Vec<Objective>,
}

impl Mission {
    /// Creates a mission, validating its structural invariants.
    pub fn new(
        id: u64,
        reward: f64,
        availability: &str,
        objectives: Vec<Objective>,
    ) -> Result<Self, MissionError> {
        if reward <= 0.0 {
            return Err(MissionError::NonPositiveReward);
        }
        if objectives.is_empty() {
            return Err(MissionError::NoObjectives);
        }
        Ok(Self {
            id,
            reward,
            availability: availability.to_string(),
            objectives,
        })
    }

    /// Mission ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Total reward for completing every objective.
    pub fn reward(&self) -> f64 {
        self.reward
    }

    /// Remaining availability, as reported by the mission source.
    pub fn availability(&self) -> &str {
        &self.availability
    }

    /// The mission's cargo objectives.
    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// Total SCU across all objectives.
    pub fn total_size(&self) -> u32 {
        self.objectives.iter().map(|o| o.size()).sum()
    }

    /// Every location this mission touches.
    pub fn locations(&self) -> HashSet<&str> {
        self.objectives
            .iter()
            .flat_map(|o| [o.pickup(), o.delivery()])
            .collect()
    }

    /// Largest single objective, in SCU.
    pub fn max_objective_size(&self) -> u32 {
        self.objectives.iter().map(|o| o.size()).max().unwrap_or(0)
    }
}

/// Flattens missions into requests, assigning sequential IDs.
///
/// Each objective becomes one request; a mission's reward is apportioned
/// evenly across its objectives.
pub fn flatten_requests<'a, I>(missions: I) -> Vec<Request>
where
    I: IntoIterator<Item = &'a Mission>,
{
    let mut requests = Vec::new();
    for mission in missions {
        let value = mission.reward() / mission.objectives().len() as f64;
        for objective in mission.objectives() {
            requests.push(Request::from_parts(
                requests.len() as u64,
                objective.pickup().to_string(),
                objective.delivery().to_string(),
                objective.size(),
                value,
            ));
        }
    }
    requests
}
