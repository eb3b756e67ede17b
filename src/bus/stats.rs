//! # Delivery statistics.
//!
//! Three monotonically non-decreasing counters owned by one bus instance:
//! - `sent` — publish calls accepted (including those that reached nobody);
//! - `delivered` — handler invocations that returned normally;
//! - `failed` — handler invocations that returned an error or panicked.
//!
//! Counters reset only by constructing a new bus. Buses do not share state:
//! two buses in one process count independently.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use serde::{Deserialize, Serialize};

/// Internal counter block; lives inside the bus, updated during dispatch.
#[derive(Debug, Default)]
pub(crate) struct BusStats {
    sent: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
}

impl BusStats {
    #[inline]
    pub(crate) fn record_sent(&self) {
        self.sent.fetch_add(1, AtomicOrdering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_delivered(&self) {
        self.delivered.fetch_add(1, AtomicOrdering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            sent: self.sent.load(AtomicOrdering::Relaxed),
            delivered: self.delivered.load(AtomicOrdering::Relaxed),
            failed: self.failed.load(AtomicOrdering::Relaxed),
        }
    }
}

/// Point-in-time view of a bus's delivery counters.
///
/// Returned by [`Bus::stats`](crate::Bus::stats); reading it has no side
/// effects. Serializable so harnesses can dump it alongside assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Publish calls accepted by the bus.
    pub sent: u64,
    /// Handler invocations that returned normally.
    pub delivered: u64,
    /// Handler invocations that errored or panicked.
    pub failed: u64,
}
