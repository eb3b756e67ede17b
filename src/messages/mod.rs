//! Broadcast messages: the value published over the bus and the per-publish result.
//!
//! This module groups the message **data model** and the **report** returned
//! by [`Bus::publish`](crate::Bus::publish).
//!
//! ## Contents
//! - [`Message`], [`Payload`] — immutable broadcast value with topic, sender
//!   identity, optional payload, sequence number and timestamp.
//! - [`DeliveryReport`], [`DeliveryFailure`] — how a single fan-out went:
//!   recipients scheduled, deliveries completed, failures recorded.
//!
//! ## Quick reference
//! - **Producers**: [`Endpoint::publish`](crate::Endpoint::publish) stamps a
//!   `Message` with its identity; harnesses may also build one directly.
//! - **Consumers**: [`Subscribe::on_message`](crate::Subscribe::on_message)
//!   receives a borrowed `Message`; the publisher receives the report.

mod message;
mod report;

pub use message::{Message, Payload};
pub use report::{DeliveryFailure, DeliveryReport};
