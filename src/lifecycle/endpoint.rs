//! # Lifecycle-bound publisher/subscriber.
//!
//! [`Endpoint`] is a named bus participant with a state machine and a private
//! record of everything it registered. Subscriptions happen during the active
//! phase; teardown unregisters them all, deterministically and exactly once.
//!
//! ## Architecture
//! ```text
//! Endpoint "main" ── publish("EXIT") ──► Bus ──► snapshot fan-out
//!                                                    │
//! Endpoint "dummy" ◄── finish_on handler ◄───────────┘
//!     │ finish():
//!     ├─ state ⇒ destroyed            (idempotence gate, first caller wins)
//!     ├─ drain owned registrations    (under the lock, no await)
//!     └─ bus.unregister(each)         (lock released, safe mid-dispatch)
//! ```
//!
//! ## Rules
//! - Step methods (`start`/`pause`/`resume`/`stop`) follow the
//!   [`State`] transition table and report misuse as
//!   [`LifecycleError::InvalidTransition`].
//! - `publish`/`subscribe`/`finish_on` on a destroyed endpoint report
//!   [`LifecycleError::Destroyed`]; destruction is never silent.
//! - `finish` is idempotent and safe to call from within a handler that is
//!   being delivered to by an in-flight publish — including a handler owned
//!   by the endpoint being finished.

use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use uuid::Uuid;

use super::state::State;
use crate::bus::Bus;
use crate::error::{HandlerError, LifecycleError};
use crate::messages::{DeliveryReport, Message, Payload};
use crate::subscribers::{HandleRef, Subscribe};

/// A lifecycle-bound bus participant.
///
/// Cheap to clone (`Arc`-backed); clones share identity, state, and the
/// owned-registration record, so a handler can carry one into its closure
/// and drive the same endpoint the caller holds.
#[derive(Clone)]
pub struct Endpoint {
    inner: Arc<EndpointInner>,
}

struct EndpointInner {
    /// Human-readable label, chosen by the caller.
    name: Arc<str>,
    /// Unique per instance; stamped into every message this endpoint publishes.
    id: Arc<str>,
    bus: Bus,
    state: Mutex<State>,
    /// Private record of (topic, handle) pairs driving deterministic cleanup.
    registrations: Mutex<Vec<(String, HandleRef)>>,
}

impl Endpoint {
    /// Creates an endpoint in the `created` state, bound to `bus`.
    pub fn new(name: impl Into<Arc<str>>, bus: Bus) -> Self {
        let name = name.into();
        let id = short_id();
        tracing::debug!(endpoint = %name, id = %id, "endpoint created");
        Self {
            inner: Arc::new(EndpointInner {
                name,
                id,
                bus,
                state: Mutex::new(State::Created),
                registrations: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Unique instance identity; the `sender` of every message it publishes.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> State {
        *self.inner.state.lock().unwrap()
    }

    /// The bus this endpoint is bound to.
    #[must_use]
    pub fn bus(&self) -> &Bus {
        &self.inner.bus
    }

    /// Number of registrations this endpoint currently owns.
    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.inner.registrations.lock().unwrap().len()
    }

    /// Brings the endpoint to its active phase: `created → started → resumed`.
    ///
    /// Subscriptions are wired afterwards with [`subscribe`](Endpoint::subscribe)
    /// and [`finish_on`](Endpoint::finish_on).
    pub fn start(&self) -> Result<(), LifecycleError> {
        self.advance(State::Started)?;
        self.advance(State::Resumed)
    }

    /// `resumed → paused`.
    pub fn pause(&self) -> Result<(), LifecycleError> {
        self.advance(State::Paused)
    }

    /// `paused → resumed`.
    pub fn resume(&self) -> Result<(), LifecycleError> {
        self.advance(State::Resumed)
    }

    /// `paused → stopped`.
    pub fn stop(&self) -> Result<(), LifecycleError> {
        self.advance(State::Stopped)
    }

    /// Registers a handle with the bus and records it for cleanup.
    ///
    /// Rejected with [`LifecycleError::Destroyed`] after teardown; a destroyed
    /// endpoint accepts no new registrations.
    pub async fn subscribe(
        &self,
        topic: impl Into<String>,
        handle: HandleRef,
    ) -> Result<(), LifecycleError> {
        self.guard("subscribe")?;
        let topic = topic.into();
        self.inner.bus.register(topic.clone(), Arc::clone(&handle)).await;
        self.inner.registrations.lock().unwrap().push((topic, handle));
        Ok(())
    }

    /// Installs a built-in handler that finishes this endpoint when any
    /// message arrives on `topic` — the remote-shutdown pattern.
    ///
    /// The handler holds a weak back-reference, so it never keeps its owner
    /// alive; it is removed from the bus by the very teardown it triggers.
    pub async fn finish_on(&self, topic: impl Into<String>) -> Result<(), LifecycleError> {
        let handle: HandleRef = Arc::new(FinishOnMessage {
            endpoint: Arc::downgrade(&self.inner),
        });
        self.subscribe(topic, handle).await
    }

    /// Publishes a message stamped with this endpoint's identity.
    ///
    /// Returns the bus's [`DeliveryReport`] unchanged. Rejected with
    /// [`LifecycleError::Destroyed`] after teardown.
    pub async fn publish(
        &self,
        topic: impl Into<String>,
        payload: Option<Payload>,
    ) -> Result<DeliveryReport, LifecycleError> {
        self.guard("publish")?;
        let mut message = Message::new(topic.into(), Arc::clone(&self.inner.id));
        if let Some(payload) = payload {
            message = message.with_payload(payload);
        }
        Ok(self.inner.bus.publish(message).await)
    }

    /// Idempotent teardown.
    ///
    /// The first call unregisters every owned registration from the bus,
    /// clears the record, and moves the endpoint to `destroyed`. Subsequent
    /// calls are no-ops — teardown must be safe to invoke twice, e.g. once
    /// from an external caller and once from within a handler reacting to a
    /// message this endpoint indirectly sent itself.
    pub async fn finish(&self) {
        {
            let mut state = self.inner.state.lock().unwrap();
            if *state == State::Destroyed {
                tracing::debug!(endpoint = %self.inner.name, "finish on destroyed endpoint is a no-op");
                return;
            }
            *state = State::Destroyed;
        }

        let owned: Vec<(String, HandleRef)> = {
            let mut registrations = self.inner.registrations.lock().unwrap();
            registrations.drain(..).collect()
        };

        tracing::debug!(
            endpoint = %self.inner.name,
            id = %self.inner.id,
            registrations = owned.len(),
            "endpoint finishing"
        );

        for (topic, handle) in owned {
            self.inner.bus.unregister(&topic, &handle).await;
        }
    }

    fn advance(&self, next: State) -> Result<(), LifecycleError> {
        let mut state = self.inner.state.lock().unwrap();
        if !state.allows(next) {
            return Err(LifecycleError::InvalidTransition {
                endpoint: self.inner.name.to_string(),
                from: *state,
                to: next,
            });
        }
        tracing::debug!(endpoint = %self.inner.name, from = %*state, to = %next, "state transition");
        *state = next;
        Ok(())
    }

    fn guard(&self, op: &'static str) -> Result<(), LifecycleError> {
        let state = self.inner.state.lock().unwrap();
        if state.is_terminal() {
            return Err(LifecycleError::Destroyed {
                endpoint: self.inner.name.to_string(),
                op,
            });
        }
        Ok(())
    }
}

/// Built-in handler behind [`Endpoint::finish_on`]: tears down its owner on
/// any message. Weak back-reference; the owner's registrations own the handle.
struct FinishOnMessage {
    endpoint: Weak<EndpointInner>,
}

#[async_trait]
impl Subscribe for FinishOnMessage {
    async fn on_message(&self, message: &Message) -> Result<(), HandlerError> {
        let Some(inner) = self.endpoint.upgrade() else {
            return Err(HandlerError::fail("owning endpoint already dropped"));
        };
        tracing::debug!(
            endpoint = %inner.name,
            sender = %message.sender,
            topic = %message.topic,
            "teardown requested over the bus"
        );
        Endpoint { inner }.finish().await;
        Ok(())
    }

    fn name(&self) -> &str {
        "finish_on"
    }
}

fn short_id() -> Arc<str> {
    let hex = Uuid::new_v4().simple().to_string();
    Arc::from(&hex[..8])
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

    use super::*;
    use crate::subscribers::HandlerFn;

    fn active(name: &str, bus: &Bus) -> Endpoint {
        let ep = Endpoint::new(name.to_string(), bus.clone());
        ep.start().expect("fresh endpoint must start");
        ep
    }

    #[test]
    fn test_identity_is_unique_per_instance() {
        let bus = Bus::new();
        let a = Endpoint::new("a", bus.clone());
        let b = Endpoint::new("b", bus);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id().len(), 8);
        assert_eq!(a.state(), State::Created);
    }

    #[test]
    fn test_start_reaches_resumed() {
        let bus = Bus::new();
        let ep = Endpoint::new("main", bus);
        ep.start().expect("created endpoint starts");
        assert_eq!(ep.state(), State::Resumed);
    }

    #[test]
    fn test_step_methods_follow_table() {
        let bus = Bus::new();
        let ep = active("main", &bus);

        ep.pause().expect("resumed -> paused");
        ep.resume().expect("paused -> resumed");
        ep.pause().expect("the resumed/paused cycle repeats");
        ep.stop().expect("paused -> stopped");
        assert_eq!(ep.state(), State::Stopped);
    }

    #[test]
    fn test_illegal_steps_are_reported() {
        let bus = Bus::new();
        let ep = Endpoint::new("main", bus);

        let err = ep.pause().expect_err("created endpoint cannot pause");
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
        assert_eq!(err.as_label(), "lifecycle_invalid_transition");

        ep.start().expect("start still fine");
        let err = ep.start().expect_err("start is not re-enterable");
        assert!(matches!(
            err,
            LifecycleError::InvalidTransition { from: State::Resumed, .. }
        ));
    }

    #[tokio::test]
    async fn test_subscribe_records_ownership() {
        let bus = Bus::new();
        let ep = active("dummy", &bus);

        let noop: HandleRef = HandlerFn::arc("noop", |_msg: Message| async { Ok(()) });
        ep.subscribe("EXIT", noop).await.expect("active endpoint subscribes");

        assert_eq!(ep.registration_count(), 1);
        assert_eq!(bus.subscriber_count("EXIT").await, 1);
    }

    #[tokio::test]
    async fn test_finish_unregisters_everything() {
        let bus = Bus::new();
        let ep = active("dummy", &bus);

        let noop: HandleRef = HandlerFn::arc("noop", |_msg: Message| async { Ok(()) });
        ep.subscribe("EXIT", Arc::clone(&noop)).await.expect("subscribe EXIT");
        ep.subscribe("PING", noop).await.expect("subscribe PING");

        ep.finish().await;

        assert_eq!(ep.state(), State::Destroyed);
        assert_eq!(ep.registration_count(), 0);
        assert!(bus.topics().await.is_empty(), "no residual registrations in the bus");
    }

    #[tokio::test]
    async fn test_finish_is_idempotent() {
        let bus = Bus::new();
        let ep = active("dummy", &bus);
        ep.finish_on("EXIT").await.expect("wire exit handler");

        ep.finish().await;
        let after_first = (ep.state(), ep.registration_count(), bus.stats());

        ep.finish().await;
        let after_second = (ep.state(), ep.registration_count(), bus.stats());

        assert_eq!(after_first, after_second, "second finish must observe no change");
    }

    #[tokio::test]
    async fn test_destroyed_endpoint_rejects_operations() {
        let bus = Bus::new();
        let ep = active("dummy", &bus);
        ep.finish().await;

        let err = ep
            .publish("EXIT", None)
            .await
            .expect_err("publish after destruction is misuse");
        assert!(matches!(err, LifecycleError::Destroyed { op: "publish", .. }));
        assert_eq!(err.as_label(), "lifecycle_destroyed");

        let noop: HandleRef = HandlerFn::arc("noop", |_msg: Message| async { Ok(()) });
        let err = ep
            .subscribe("EXIT", noop)
            .await
            .expect_err("subscribe after destruction is misuse");
        assert!(matches!(err, LifecycleError::Destroyed { op: "subscribe", .. }));

        let err = ep.start().expect_err("start after destruction is misuse");
        assert!(matches!(err, LifecycleError::InvalidTransition { from: State::Destroyed, .. }));

        assert_eq!(bus.stats().sent, 0, "rejected publish never reached the bus");
    }

    #[tokio::test]
    async fn test_publish_stamps_sender_identity() {
        let bus = Bus::new();
        let publisher = active("main", &bus);
        let observer = active("observer", &bus);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_handler = Arc::clone(&seen);
        let probe: HandleRef = HandlerFn::arc("probe", move |msg: Message| {
            let seen = Arc::clone(&seen_in_handler);
            async move {
                seen.lock().unwrap().push(msg.sender.to_string());
                Ok(())
            }
        });
        observer.subscribe("PING", probe).await.expect("subscribe PING");

        let report = publisher
            .publish("PING", None)
            .await
            .expect("active endpoint publishes");
        assert_eq!(report.delivered, 1);
        assert_eq!(*seen.lock().unwrap(), vec![publisher.id().to_string()]);
    }

    // End-to-end scenario A: one publisher, one subscriber wired for remote
    // shutdown; a single publish destroys the subscriber.
    #[tokio::test]
    async fn test_scenario_remote_shutdown() {
        let bus = Bus::new();
        let main = active("main", &bus);
        let dummy = active("dummy", &bus);
        dummy.finish_on("EXIT").await.expect("dummy listens for EXIT");

        let report = main
            .publish(
                "EXIT",
                Some(Payload::from_iter([(
                    "requester".to_string(),
                    serde_json::Value::from(main.name()),
                )])),
            )
            .await
            .expect("publish EXIT");

        assert_eq!(report.recipients, 1);
        assert_eq!(report.delivered, 1);
        assert_eq!(dummy.state(), State::Destroyed);
        assert_eq!(dummy.registration_count(), 0);
        assert_eq!(bus.subscriber_count("EXIT").await, 0);

        let stats = bus.stats();
        assert_eq!((stats.sent, stats.delivered, stats.failed), (1, 1, 0));
    }

    // End-to-end scenario B: two subscribers on the same topic; one publish
    // reaches both in registration order.
    #[tokio::test]
    async fn test_scenario_two_subscribers_one_publish() {
        let bus = Bus::new();
        let main = active("main", &bus);
        let d1 = active("dummy-1", &bus);
        let d2 = active("dummy-2", &bus);
        d1.finish_on("EXIT").await.expect("d1 listens");
        d2.finish_on("EXIT").await.expect("d2 listens");

        let report = main.publish("EXIT", None).await.expect("publish EXIT");

        assert_eq!(report.delivered, 2);
        assert_eq!(d1.state(), State::Destroyed);
        assert_eq!(d2.state(), State::Destroyed);
        assert_eq!(bus.stats().delivered, 2);
    }

    // End-to-end scenario C: the subscriber is torn down before any publish;
    // the broadcast reaches nobody.
    #[tokio::test]
    async fn test_scenario_teardown_before_publish() {
        let bus = Bus::new();
        let main = active("main", &bus);
        let dummy = active("dummy", &bus);
        dummy.finish_on("EXIT").await.expect("dummy listens");

        dummy.finish().await;

        let report = main.publish("EXIT", None).await.expect("publish EXIT");
        assert!(report.reached_none());

        let stats = bus.stats();
        assert_eq!(stats.sent, 1);
        assert_eq!(stats.delivered, 0);
        assert_eq!(stats.failed, 0);
    }

    // The self-shutdown variant: the handler finishing the endpoint is being
    // delivered to by that endpoint's own publish call.
    #[tokio::test]
    async fn test_self_shutdown_does_not_deadlock() {
        let bus = Bus::new();
        let dummy = active("dummy", &bus);
        dummy.finish_on("EXIT").await.expect("dummy listens");

        let report = dummy.publish("EXIT", None).await.expect("publish to itself");

        assert_eq!(report.delivered, 1);
        assert_eq!(dummy.state(), State::Destroyed);
        assert_eq!(bus.subscriber_count("EXIT").await, 0);
    }

    // A handler error during remote shutdown stays contained; later
    // subscribers of the same fan-out still tear down.
    #[tokio::test]
    async fn test_failing_neighbor_does_not_block_shutdown() {
        let bus = Bus::new();
        let main = active("main", &bus);
        let flaky = active("flaky", &bus);
        let dummy = active("dummy", &bus);

        let counter = Arc::new(AtomicU64::new(0));
        let counter_in_handler = Arc::clone(&counter);
        let failing: HandleRef = HandlerFn::arc("failing", move |_msg: Message| {
            let counter = Arc::clone(&counter_in_handler);
            async move {
                counter.fetch_add(1, AtomicOrdering::Relaxed);
                Err(HandlerError::fail("simulated receiver crash"))
            }
        });
        flaky.subscribe("EXIT", failing).await.expect("flaky subscribes");
        dummy.finish_on("EXIT").await.expect("dummy listens");

        let report = main.publish("EXIT", None).await.expect("publish EXIT");

        assert_eq!(report.recipients, 2);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(counter.load(AtomicOrdering::Relaxed), 1);
        assert_eq!(dummy.state(), State::Destroyed, "failure upstream never blocks delivery");

        let stats = bus.stats();
        assert_eq!((stats.sent, stats.delivered, stats.failed), (1, 1, 1));
    }
}
