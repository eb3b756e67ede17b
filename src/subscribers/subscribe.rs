//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging message handlers into the
//! bus. A handle is an `Arc<dyn Subscribe>` ([`HandleRef`]); the bus keeps a
//! clone only while the registration lives, and removal matches by pointer
//! identity, so the owning component decides exactly which registration goes.
//!
//! ## Contract
//! - `on_message` runs on the publisher's task, one handler at a time, in
//!   registration order. Keep it short; there is no per-subscriber queue.
//! - Returning `Err` marks this delivery failed without affecting the other
//!   subscribers of the same fan-out.
//! - A handler may call back into the bus (`register`, `unregister`) or tear
//!   down its own endpoint; the in-flight snapshot is not disturbed.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::messages::Message;

/// Shared handle to a subscriber; what the bus stores per registration.
pub type HandleRef = Arc<dyn Subscribe>;

/// Contract for message subscribers.
///
/// Invoked synchronously within [`Bus::publish`](crate::Bus::publish): the
/// publish call does not return until every scheduled handler has run.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single message delivered for a topic this handle registered on.
    ///
    /// # Parameters
    /// - `message`: reference to the broadcast value (does not transfer ownership)
    async fn on_message(&self, message: &Message) -> Result<(), HandlerError>;

    /// Human-readable name (for reports and logs).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
