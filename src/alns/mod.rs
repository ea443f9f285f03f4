//! Adaptive large neighborhood search over pickup-delivery plans.
//!
//! - [`destroy`] — destroy operators (random, worst, related)
//! - [`alns_improve`] — the time-boxed destroy-and-repair loop
//!
//! Repair reuses the regret-2 insertion from
//! [`construction`](crate::construction), so a rebuilt plan is feasible by
//! the same rules as a freshly constructed one.

pub mod destroy;
mod runner;

pub use destroy::{DestroyOperator, RandomRemoval, RelatedRemoval, WorstRemoval};
pub use runner::{alns_improve, AlnsConfig, AlnsOutcome};
