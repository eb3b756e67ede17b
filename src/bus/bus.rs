//! # Broadcast bus with snapshot dispatch.
//!
//! [`Bus`] owns the topic → subscriber-list table and performs registration,
//! unregistration and synchronous fan-out delivery.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                       Subscribers (per topic, ordered):
//!   Endpoint A ──┐
//!   Endpoint B ──┼──► publish(Message) ──► snapshot ──► handle 1.on_message()
//!   harness    ──┘         │                   │    ──► handle 2.on_message()
//!                          │                   │    ──► handle N.on_message()
//!                      stats.sent++        taken under the read lock,
//!                                          iterated with no lock held
//! ```
//!
//! ## Rules
//! - **Snapshot dispatch**: `publish` copies the topic's subscriber sequence
//!   before any callback runs. A callback that registers or unregisters
//!   handles mid-dispatch changes future publishes, never the one in flight.
//! - **Failure isolation**: an `Err` or a panic from one handler is counted,
//!   recorded in the report, and delivery continues with the next handler.
//! - **No residue**: unregistering removes the bus's only reference to the
//!   handle; a topic whose last subscriber is removed disappears from the
//!   table entirely.
//! - **No lock across callbacks**: the table lock guards mutation and
//!   snapshot-taking only, so a handler may freely call back into
//!   `register`/`unregister` (or tear down its owner) without deadlocking.
//!
//! ## Permissive registration
//! The table does not deduplicate: registering the identical handle twice for
//! one topic schedules two deliveries per publish. `unregister` removes one
//! occurrence at a time (the first match).

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::RwLock;

use super::stats::{BusStats, StatsSnapshot};
use crate::error::HandlerError;
use crate::messages::{DeliveryFailure, DeliveryReport, Message};
use crate::subscribers::HandleRef;

/// Topic-keyed broadcast bus.
///
/// Cheap to clone (internally holds an `Arc`-backed table and counters);
/// clones observe the same registrations and statistics. Separate
/// `Bus::new()` instances are fully independent.
#[derive(Clone, Default)]
pub struct Bus {
    inner: Arc<BusInner>,
}

#[derive(Default)]
struct BusInner {
    topics: RwLock<HashMap<String, Vec<HandleRef>>>,
    stats: BusStats,
}

impl Bus {
    /// Creates an empty bus with zeroed statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handle for a topic.
    ///
    /// Always succeeds: any non-empty string is a valid topic, and the handle
    /// is appended to the topic's sequence (insertion order is delivery
    /// order). Registering the same handle again before unregistering it
    /// schedules a second delivery per publish; the table does not
    /// deduplicate.
    pub async fn register(&self, topic: impl Into<String>, handle: HandleRef) {
        let topic = topic.into();
        let mut topics = self.inner.topics.write().await;
        tracing::debug!(topic = %topic, subscriber = handle.name(), "subscriber registered");
        topics.entry(topic).or_default().push(handle);
    }

    /// Removes the first registration of exactly this handle from a topic.
    ///
    /// Identity is pointer identity (`Arc::ptr_eq`): only the registration
    /// made with a clone of the same `Arc` is removed. A no-op if the topic
    /// is unknown or the handle is not registered. Safe to call from within
    /// a callback invoked during this topic's own in-flight delivery.
    pub async fn unregister(&self, topic: &str, handle: &HandleRef) {
        let mut topics = self.inner.topics.write().await;
        let Some(handles) = topics.get_mut(topic) else {
            tracing::debug!(topic = %topic, "unregister for unknown topic ignored");
            return;
        };
        let Some(pos) = handles.iter().position(|h| Arc::ptr_eq(h, handle)) else {
            tracing::debug!(topic = %topic, subscriber = handle.name(), "unregister without registration ignored");
            return;
        };
        handles.remove(pos);
        tracing::debug!(topic = %topic, subscriber = handle.name(), "subscriber unregistered");
        if handles.is_empty() {
            topics.remove(topic);
        }
    }

    /// Publishes a message to every subscriber of its topic.
    ///
    /// Increments `sent`, snapshots the topic's subscriber sequence, then
    /// invokes each snapshotted handle in registration order on the caller's
    /// task. Returns only after every scheduled handle has been invoked.
    ///
    /// Zero subscribers is a normal outcome: the report says
    /// [`reached_none`](DeliveryReport::reached_none) and neither `delivered`
    /// nor `failed` moves. A handle that returns `Err` or panics is counted
    /// in `failed` and recorded in the report; delivery continues.
    pub async fn publish(&self, message: Message) -> DeliveryReport {
        self.inner.stats.record_sent();

        let snapshot: Vec<HandleRef> = {
            let topics = self.inner.topics.read().await;
            topics
                .get(message.topic.as_ref())
                .cloned()
                .unwrap_or_default()
        };

        let mut report = DeliveryReport::new(Arc::clone(&message.topic), message.seq, snapshot.len());
        if snapshot.is_empty() {
            tracing::debug!(topic = %message.topic, sender = %message.sender, "no subscribers for topic");
            return report;
        }

        tracing::debug!(
            topic = %message.topic,
            sender = %message.sender,
            recipients = snapshot.len(),
            "dispatching broadcast"
        );

        for handle in snapshot {
            match AssertUnwindSafe(handle.on_message(&message)).catch_unwind().await {
                Ok(Ok(())) => {
                    self.inner.stats.record_delivered();
                    report.delivered += 1;
                }
                Ok(Err(error)) => {
                    self.inner.stats.record_failed();
                    tracing::warn!(
                        topic = %message.topic,
                        subscriber = handle.name(),
                        error = %error,
                        "delivery failed"
                    );
                    report.failures.push(DeliveryFailure {
                        subscriber: Arc::from(handle.name()),
                        error,
                    });
                }
                Err(panic) => {
                    let info = panic_info(panic);
                    self.inner.stats.record_failed();
                    tracing::warn!(
                        topic = %message.topic,
                        subscriber = handle.name(),
                        panic = %info,
                        "subscriber panicked during delivery"
                    );
                    report.failures.push(DeliveryFailure {
                        subscriber: Arc::from(handle.name()),
                        error: HandlerError::Panicked { info },
                    });
                }
            }
        }

        report
    }

    /// Number of handles currently registered for a topic.
    ///
    /// A topic whose last subscriber was removed reports zero, exactly like
    /// one that was never registered.
    pub async fn subscriber_count(&self, topic: &str) -> usize {
        let topics = self.inner.topics.read().await;
        topics.get(topic).map_or(0, Vec::len)
    }

    /// Returns the sorted list of topics with at least one subscriber.
    pub async fn topics(&self) -> Vec<String> {
        let topics = self.inner.topics.read().await;
        let mut names: Vec<String> = topics.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Current `{sent, delivered, failed}` counters; read-only, no side effects.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }
}

/// Extracts a printable message from a caught panic payload.
fn panic_info(payload: Box<dyn Any + Send>) -> String {
    let any = &*payload;
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
