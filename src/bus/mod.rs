//! Broadcast dispatch engine: registration table, fan-out, statistics.
//!
//! ## Contents
//! - [`Bus`] — topic-keyed subscriber table with snapshot dispatch
//! - [`StatsSnapshot`] — read-only view of the bus-lifetime delivery counters
//!
//! See `bus.rs` for the dispatch rules and `stats.rs` for counter semantics.

mod bus;
mod stats;

pub use bus::Bus;
pub use stats::StatsSnapshot;
