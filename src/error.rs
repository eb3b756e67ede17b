//! Error types used by the scopecast bus and lifecycle endpoints.
//!
//! This module defines two main error enums:
//!
//! - [`HandlerError`] — errors raised by subscriber callbacks during dispatch.
//! - [`LifecycleError`] — misuse of a lifecycle endpoint, surfaced to the caller.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//!
//! ## Propagation policy
//! A [`HandlerError`] never escapes [`Bus::publish`](crate::Bus::publish): the bus
//! records it in the [`DeliveryReport`](crate::DeliveryReport), counts it, and keeps
//! delivering to the remaining subscribers. Only [`LifecycleError`] reaches the
//! caller, and only for operations an endpoint cannot legally perform.

use thiserror::Error;

use crate::lifecycle::State;

/// # Errors produced by subscriber callbacks.
///
/// These represent failures of individual message handlers during a fan-out.
/// They are contained within the dispatch loop: one handler's failure never
/// prevents delivery to the remaining handlers, and is never retried.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum HandlerError {
    /// Handler returned an explicit error for this delivery.
    #[error("handler failed: {reason}")]
    Fail {
        /// The underlying error message.
        reason: String,
    },

    /// Handler panicked while processing the message.
    ///
    /// Constructed by the bus from a caught panic; handlers do not return this
    /// variant themselves.
    #[error("handler panicked: {info}")]
    Panicked {
        /// The panic payload, if it carried a message.
        info: String,
    },
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Fail`].
    pub fn fail(reason: impl Into<String>) -> Self {
        HandlerError::Fail {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use scopecast::HandlerError;
    ///
    /// let err = HandlerError::fail("boom");
    /// assert_eq!(err.as_label(), "handler_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Fail { .. } => "handler_failed",
            HandlerError::Panicked { .. } => "handler_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Fail { reason } => format!("error: {reason}"),
            HandlerError::Panicked { info } => format!("panic: {info}"),
        }
    }
}

/// # Errors produced by lifecycle endpoint misuse.
///
/// Acting on a destroyed endpoint or stepping the state machine off its
/// allowed transitions is a programming error and is reported to the caller
/// rather than silently ignored. Double teardown is explicitly *not* an
/// error; see [`Endpoint::finish`](crate::Endpoint::finish).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Operation attempted on an endpoint that has already been destroyed.
    #[error("endpoint {endpoint} is destroyed: {op} rejected")]
    Destroyed {
        /// Name of the endpoint.
        endpoint: String,
        /// The rejected operation.
        op: &'static str,
    },

    /// State transition not allowed by the lifecycle table.
    #[error("endpoint {endpoint}: invalid transition {from} -> {to}")]
    InvalidTransition {
        /// Name of the endpoint.
        endpoint: String,
        /// State the endpoint was in.
        from: State,
        /// State the caller tried to enter.
        to: State,
    },
}

impl LifecycleError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use scopecast::{LifecycleError, State};
    ///
    /// let err = LifecycleError::InvalidTransition {
    ///     endpoint: "dummy".into(),
    ///     from: State::Created,
    ///     to: State::Paused,
    /// };
    /// assert_eq!(err.as_label(), "lifecycle_invalid_transition");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            LifecycleError::Destroyed { .. } => "lifecycle_destroyed",
            LifecycleError::InvalidTransition { .. } => "lifecycle_invalid_transition",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            LifecycleError::Destroyed { endpoint, op } => {
                format!("{op} on destroyed endpoint {endpoint}")
            }
            LifecycleError::InvalidTransition { endpoint, from, to } => {
                format!("{endpoint}: {from} -> {to} is not a legal transition")
            }
        }
    }
}
