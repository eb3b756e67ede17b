//! # Function-backed subscriber (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(Message) -> Fut`, producing a fresh
//! future per delivery. The closure receives its own clone of the message
//! (clones are cheap, the string fields are `Arc<str>`), so the future is
//! `'static` and may be awaited across the handler's own bus calls.
//!
//! ## Example
//! ```rust
//! use scopecast::{HandleRef, HandlerError, HandlerFn, Message, Subscribe};
//!
//! let h: HandleRef = HandlerFn::arc("greeter", |msg: Message| async move {
//!     if msg.topic.as_ref() == "HELLO" {
//!         return Ok(());
//!     }
//!     Err(HandlerError::fail("unexpected topic"))
//! });
//!
//! assert_eq!(h.name(), "greeter");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use super::subscribe::Subscribe;
use crate::error::HandlerError;
use crate::messages::Message;

/// Function-backed subscriber implementation.
///
/// Wraps a closure that *creates* a new future per delivery. Shared state
/// between deliveries goes through an explicit `Arc<...>` inside the closure.
#[derive(Debug)]
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed subscriber.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a [`HandleRef`](crate::HandleRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the subscriber and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Subscribe for HandlerFn<F>
where
    F: Fn(Message) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn on_message(&self, message: &Message) -> Result<(), HandlerError> {
        (self.f)(message.clone()).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
