//! # haul-routing
//!
//! Pickup-and-delivery route optimization for a capacity-constrained
//! hauler: constructive heuristics, local search, ALNS, and a
//! multi-objective mission selection search.
//!
//! ## Modules
//!
//! - [`models`] — Domain types (Mission, Request, plan nodes, cargo state, Route)
//! - [`distance`] — Travel-time oracle trait and table-backed implementation
//! - [`evaluation`] — Plan feasibility checking and cost evaluation
//! - [`construction`] — Constructive heuristics (nearest neighbor, regret-2)
//! - [`local_search`] — Improvement operators (2-opt, relocates, pair moves, Or-opt)
//! - [`alns`] — Adaptive large neighborhood search burst
//! - [`solver`] — The sequencing facade with quality levels
//! - [`selection`] — Subset search over a mission pool, scored and ranked

pub mod alns;
pub mod construction;
pub mod distance;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod selection;
pub mod solver;
