//! # Example: custom_subscriber
//!
//! Demonstrates how to build and attach a typed subscriber.
//!
//! Shows how to:
//! - Implement the [`Subscribe`] trait on your own struct.
//! - Observe failure isolation: one failing handler never blocks the rest.
//! - Read per-publish failures from the [`DeliveryReport`].
//!
//! ## Run
//! ```bash
//! cargo run --example custom_subscriber
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use scopecast::{Bus, HandleRef, HandlerError, HandlerFn, Message, Subscribe};

/// Counts deliveries per topic. In real life you could export metrics,
/// ship logs, or trigger alerts.
struct CountingSubscriber {
    hits: AtomicU64,
}

#[async_trait::async_trait]
impl Subscribe for CountingSubscriber {
    async fn on_message(&self, message: &Message) -> Result<(), HandlerError> {
        let n = self.hits.fetch_add(1, Ordering::Relaxed) + 1;
        println!("[counter] {} delivery #{n}", message.topic);
        Ok(())
    }

    fn name(&self) -> &str {
        "counter"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let bus = Bus::new();

    let counter = Arc::new(CountingSubscriber {
        hits: AtomicU64::new(0),
    });
    let flaky: HandleRef = HandlerFn::arc("flaky", |_msg: Message| async {
        Err::<(), HandlerError>(HandlerError::fail("boom (demo failure)"))
    });

    let counting: HandleRef = counter.clone();
    bus.register("work", flaky).await;
    bus.register("work", counting).await;

    for _ in 0..3 {
        let report = bus.publish(Message::new("work", "demo")).await;
        for failure in &report.failures {
            println!("[report] {} failed: {}", failure.subscriber, failure.error);
        }
    }

    println!("\ncounter saw {} deliveries", counter.hits.load(Ordering::Relaxed));

    let stats = bus.stats();
    println!(
        "stats: sent={} delivered={} failed={}",
        stats.sent, stats.delivered, stats.failed
    );
    Ok(())
}
