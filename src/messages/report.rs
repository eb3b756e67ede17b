//! # Delivery report: the structured result of one publish call.
//!
//! [`DeliveryReport`] summarizes a single fan-out: how many subscribers were
//! scheduled (the pre-dispatch snapshot), how many returned normally, and
//! which ones failed. Publishing to a topic with zero subscribers is a normal
//! outcome, reported as zero recipients rather than an error.

use std::sync::Arc;

use crate::error::HandlerError;

/// One failed delivery within a fan-out.
#[derive(Debug, Clone)]
pub struct DeliveryFailure {
    /// Name of the failing subscriber (as reported by [`Subscribe::name`](crate::Subscribe::name)).
    pub subscriber: Arc<str>,
    /// What went wrong.
    pub error: HandlerError,
}

/// Result of a single [`Bus::publish`](crate::Bus::publish) call.
///
/// Counters here are per-publish; the bus-lifetime aggregates live in
/// [`StatsSnapshot`](crate::StatsSnapshot).
#[derive(Debug, Clone)]
pub struct DeliveryReport {
    /// Topic the message was published to.
    pub topic: Arc<str>,
    /// Sequence number of the published message.
    pub seq: u64,
    /// Subscribers scheduled at the moment dispatch began.
    pub recipients: usize,
    /// Subscribers that returned normally.
    pub delivered: usize,
    /// Failures, in delivery order.
    pub failures: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    pub(crate) fn new(topic: Arc<str>, seq: u64, recipients: usize) -> Self {
        Self {
            topic,
            seq,
            recipients,
            delivered: 0,
            failures: Vec::new(),
        }
    }

    /// True if no subscriber was registered for the topic when dispatch began.
    #[must_use]
    pub fn reached_none(&self) -> bool {
        self.recipients == 0
    }

    /// Number of failed deliveries.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True if every scheduled subscriber returned normally.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.delivered == self.recipients
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_reached_none() {
        let report = DeliveryReport::new(Arc::from("t"), 0, 0);
        assert!(report.reached_none());
        assert!(report.is_clean(), "zero of zero is clean");
        assert_eq!(report.failed(), 0);
    }

    #[test]
    fn test_failure_breaks_clean() {
        let mut report = DeliveryReport::new(Arc::from("t"), 0, 2);
        report.delivered = 1;
        report.failures.push(DeliveryFailure {
            subscriber: Arc::from("bad"),
            error: HandlerError::fail("boom"),
        });
        assert!(!report.reached_none());
        assert!(!report.is_clean());
        assert_eq!(report.failed(), 1);
    }
}
