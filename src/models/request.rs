//! Pickup-delivery request and plan-node types.

use serde::{Deserialize, Serialize};

/// Error produced when a request or objective fails structural validation.
///
/// Malformed cargo data is rejected here, before it can enter any search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Cargo size was zero.
    #[error("cargo size must be positive")]
    ZeroSize,
    /// Pickup and delivery name the same location.
    #[error("pickup and delivery location must differ")]
    SameLocation,
    /// A location name was empty.
    #[error("location name must not be empty")]
    EmptyLocation,
}

/// A single pickup-delivery cargo request.
///
/// One request moves `size` SCU from its pickup location to its delivery
/// location and is worth `value` to whoever hauls it. Requests are immutable
/// once created.
///
/// # Examples
///
/// ```
/// use haul_routing::models::Request;
///
/// let r = Request::new(0, "Everus Harbor", "Lorville", 12, 4_500.0).unwrap();
/// assert_eq!(r.size(), 12);
/// assert!(Request::new(1, "Lorville", "Lorville", 5, 100.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    id: u64,
    pickup: String,
    delivery: String,
    size: u32,
    value: f64,
}

impl Request {
    /// Creates a new request, validating its structural invariants.
    pub fn new(
        id: u64,
        pickup: &str,
        delivery: &str,
        size: u32,
        value: f64,
    ) -> Result<Self, RequestError> {
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
            id,
            pickup: pickup.to_string(),
            delivery: delivery.to_string(),
            size,
            value,
        })
    }

    /// Builds a request from fields already validated elsewhere.
    pub(crate) fn from_parts(
        id: u64,
        pickup: String,
        delivery: String,
        size: u32,
        value: f64,
    ) -> Self {
        Self {
            id,
            pickup,
            delivery,
            size,
            value,
        }
    }

    /// Request ID, unique within one planning call.
    pub fn id(&self) -> u64 {
        self.id
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

    /// Reward value attributed to this request.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Location visited for the given action.
    pub fn location_for(&self, action: Action) -> &str {
        match action {
            Action::Pickup => &self.pickup,
            Action::Delivery => &self.delivery,
        }
    }
}

/// What happens at a plan node: cargo is either collected or dropped off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Collect the request's cargo.
    Pickup,
    /// Drop off the request's cargo.
    Delivery,
}

/// One node of a visiting plan: a request index plus an action tag.
///
/// Plans are `Vec<PlanNode>` over a shared `&[Request]` slice; the node
/// stores the request's index in that slice, not the request itself, so
/// search operators can splice plans without cloning cargo data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanNode {
    /// Index of the request in the planning slice.
    pub request: usize,
    /// Whether this node picks up or delivers.
    pub action: Action,
}

impl PlanNode {
    /// Pickup node for the request at `request`.
    pub fn pickup(request: usize) -> Self {
        Self {
            request,
            action: Action::Pickup,
        }
    }

    /// Delivery node for the request at `request`.
    pub fn delivery(request: usize) -> Self {
        Self {
            request,
            action: Action::Delivery,
        }
    }

    /// Location this node visits.
    pub fn location<'a>(&self, requests: &'a [Request]) -> &'a str {
        requests[self.request].location_for(self.action)
    }
}
