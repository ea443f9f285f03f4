//! Domain model types for hauling route optimization.
//!
//! Provides the core abstractions: missions with cargo objectives,
//! pickup-delivery requests, node plans, running cargo state, and the
//! compressed stop-based route returned to callers.

mod cargo;
mod mission;
mod request;
mod stop;

pub use cargo::CargoState;
pub use mission::{flatten_requests, Mission, MissionError, Objective};
pub use request::{Action, PlanNode, Request, RequestError};
pub use stop::{Route, Stop};
