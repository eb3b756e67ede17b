//! # Broadcast message value.
//!
//! A [`Message`] is created once per publish call, delivered by reference to
//! every subscriber scheduled for its topic, and dropped when the fan-out
//! completes. It is never mutated and never retained by the bus.
//!
//! ## Ordering
//! Each message carries a globally unique sequence number (`seq`) that
//! increases monotonically across all buses in the process. Use `seq` to
//! correlate reports and handler observations in a deterministic order.
//!
//! ## Example
//! ```rust
//! use scopecast::Message;
//!
//! let msg = Message::new("EXIT", "a1b2c3d4")
//!     .with_entry("requester", "main")
//!     .with_entry("attempt", 1);
//!
//! assert_eq!(msg.topic.as_ref(), "EXIT");
//! assert_eq!(msg.sender.as_ref(), "a1b2c3d4");
//! assert_eq!(msg.entry("requester").and_then(|v| v.as_str()), Some("main"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use serde_json::Value;

/// Global sequence counter for message ordering.
static MESSAGE_SEQ: AtomicU64 = AtomicU64::new(0);

/// String-keyed mapping of arbitrary values attached to a message.
pub type Payload = serde_json::Map<String, Value>;

/// Immutable broadcast value routed by exact topic match.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - `topic`/`sender` are `Arc<str>`, so clones are cheap
#[derive(Clone, Debug)]
pub struct Message {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Routing key; subscribers registered for exactly this string receive the message.
    pub topic: Arc<str>,
    /// Identity of the publishing endpoint.
    pub sender: Arc<str>,
    /// Optional payload; absent payload is valid and common.
    pub payload: Option<Payload>,
}

impl Message {
    /// Creates a new message with the current timestamp and next sequence number.
    pub fn new(topic: impl Into<Arc<str>>, sender: impl Into<Arc<str>>) -> Self {
        Self {
            seq: MESSAGE_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            topic: topic.into(),
            sender: sender.into(),
            payload: None,
        }
    }

    /// Attaches a full payload, replacing any existing one.
    #[inline]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Inserts a single payload entry, creating the payload if absent.
    #[inline]
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload
            .get_or_insert_with(Payload::new)
            .insert(key.into(), value.into());
        self
    }

    /// Looks up a payload entry by key.
    #[inline]
    pub fn entry(&self, key: &str) -> Option<&Value> {
        self.payload.as_ref().and_then(|p| p.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Message::new("t", "s");
        let b = Message::new("t", "s");
        let c = Message::new("other", "s");
        assert!(a.seq < b.seq, "seq must increase per message");
        assert!(b.seq < c.seq, "seq is global, not per-topic");
    }

    #[test]
    fn test_with_entry_creates_payload() {
        let msg = Message::new("t", "s").with_entry("k", "v");
        assert_eq!(msg.entry("k").and_then(|v| v.as_str()), Some("v"));
        assert!(msg.entry("missing").is_none());
    }

    #[test]
    fn test_with_payload_replaces() {
        let mut payload = Payload::new();
        payload.insert("a".into(), Value::from(1));
        let msg = Message::new("t", "s").with_entry("old", true).with_payload(payload);
        assert!(msg.entry("old").is_none(), "with_payload replaces prior entries");
        assert_eq!(msg.entry("a").and_then(|v| v.as_i64()), Some(1));
    }

    #[test]
    fn test_absent_payload_is_valid() {
        let msg = Message::new("t", "s");
        assert!(msg.payload.is_none());
        assert!(msg.entry("anything").is_none());
    }
}
