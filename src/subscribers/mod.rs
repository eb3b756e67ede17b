//! # Message subscribers.
//!
//! This module provides the [`Subscribe`] trait — the capability interface a
//! handle must implement to receive broadcasts — and the closure-backed
//! [`HandlerFn`] adapter for the common case.
//!
//! ## Subscriber types
//! - **Typed subscribers** — any struct implementing [`Subscribe`] (metrics,
//!   state trackers, teardown triggers).
//! - **Function subscribers** — ad hoc closures wrapped in [`HandlerFn`].
//!
//! ## Implementing a custom subscriber
//! ```rust
//! use scopecast::{HandlerError, Message, Subscribe};
//! use async_trait::async_trait;
//!
//! struct Counter(std::sync::atomic::AtomicU64);
//!
//! #[async_trait]
//! impl Subscribe for Counter {
//!     async fn on_message(&self, _message: &Message) -> Result<(), HandlerError> {
//!         self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "counter"
//!     }
//! }
//! ```

mod handler_fn;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use handler_fn::HandlerFn;
pub use subscribe::{HandleRef, Subscribe};

#[cfg(feature = "logging")]
pub use log::LogWriter;
