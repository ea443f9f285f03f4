//! Travel-time oracle trait and table-backed implementation.

mod oracle;

pub use oracle::{DistanceOracle, TravelMatrix};
