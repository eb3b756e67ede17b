//! # scopecast
//!
//! **Scopecast** is a lightweight in-process broadcast bus for Rust.
//!
//! It decouples independently-lived components: one side publishes a message
//! on a topic, the other receives it without either holding a direct
//! reference to the other. Registrations are scoped to a component lifecycle,
//! so tearing a component down deterministically unsubscribes everything it
//! registered.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌──────────────┐      ┌──────────────┐      ┌──────────────┐
//!   │   Endpoint   │      │   Endpoint   │      │   harness    │
//!   │    "main"    │      │   "dummy"    │      │  (any code)  │
//!   └──────┬───────┘      └──────┬───────┘      └──────┬───────┘
//!          │ publish             │ subscribe / finish_on│
//!          ▼                     ▼                      ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Bus                                                            │
//! │  - topic → [handle, handle, ...]   (insertion order = delivery) │
//! │  - publish: snapshot, then fan out with no lock held            │
//! │  - stats: sent / delivered / failed                             │
//! └──────────────────────────────┬──────────────────────────────────┘
//!                                ▼
//!                  handle.on_message(&Message)
//!                  (one at a time, failures isolated)
//! ```
//!
//! ### Dispatch
//! ```text
//! publish(msg):
//!   ├─► stats.sent += 1
//!   ├─► snapshot = topics[msg.topic].clone()     (under the read lock)
//!   ├─► snapshot empty ──► report: reached_none  (normal outcome)
//!   └─► for handle in snapshot:                  (no lock held)
//!         ├─ Ok(())      ─► delivered += 1
//!         ├─ Err(e)      ─► failed += 1, recorded, continue
//!         └─ panic       ─► failed += 1, recorded, continue
//!
//! A handler may register, unregister, or finish() its owner mid-dispatch:
//! the snapshot taken before the first callback is never disturbed.
//! ```
//!
//! ## Features
//! | Area            | Description                                               | Key types / traits              |
//! |-----------------|-----------------------------------------------------------|---------------------------------|
//! | **Bus**         | Topic-keyed registration and snapshot fan-out.            | [`Bus`], [`StatsSnapshot`]      |
//! | **Messages**    | Immutable broadcast values and per-publish reports.       | [`Message`], [`DeliveryReport`] |
//! | **Subscribers** | Capability trait and closure adapter for handlers.        | [`Subscribe`], [`HandlerFn`]    |
//! | **Lifecycle**   | Stateful endpoints with deterministic teardown.           | [`Endpoint`], [`State`]         |
//! | **Errors**      | Typed errors for handlers and lifecycle misuse.           | [`HandlerError`], [`LifecycleError`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use scopecast::{Bus, Endpoint};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus = Bus::new();
//!
//!     // A component that tears itself down when told to.
//!     let dummy = Endpoint::new("dummy", bus.clone());
//!     dummy.start()?;
//!     dummy.finish_on("EXIT").await?;
//!
//!     // Another component signals it without holding a reference.
//!     let main_ep = Endpoint::new("main", bus.clone());
//!     main_ep.start()?;
//!     let report = main_ep.publish("EXIT", None).await?;
//!
//!     assert_eq!(report.delivered, 1);
//!     assert!(dummy.state().is_terminal());
//!
//!     let stats = bus.stats();
//!     assert_eq!((stats.sent, stats.delivered, stats.failed), (1, 1, 0));
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod lifecycle;
mod messages;
mod subscribers;

// ---- Public re-exports ----

pub use bus::{Bus, StatsSnapshot};
pub use error::{HandlerError, LifecycleError};
pub use lifecycle::{Endpoint, State};
pub use messages::{DeliveryFailure, DeliveryReport, Message, Payload};
pub use subscribers::{HandleRef, HandlerFn, Subscribe};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
