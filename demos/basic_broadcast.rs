//! # Example: basic_broadcast
//!
//! Demonstrates topic-keyed fan-out in registration order.
//!
//! Shows how to:
//! - Register closure handlers with [`HandlerFn`].
//! - Publish a [`Message`] with a payload.
//! - Inspect the [`DeliveryReport`] and the bus statistics.
//!
//! ## Run
//! ```bash
//! cargo run --example basic_broadcast
//! ```

use scopecast::{Bus, HandleRef, HandlerFn, Message};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let bus = Bus::new();

    let first: HandleRef = HandlerFn::arc("first", |msg: Message| async move {
        println!("[first]  got {} from {}", msg.topic, msg.sender);
        Ok(())
    });
    let second: HandleRef = HandlerFn::arc("second", |msg: Message| async move {
        let note = msg
            .entry("note")
            .and_then(|v| v.as_str())
            .unwrap_or("<none>");
        println!("[second] got {} note={note}", msg.topic);
        Ok(())
    });

    bus.register("tick", first).await;
    bus.register("tick", second).await;

    let report = bus
        .publish(Message::new("tick", "demo").with_entry("note", "hello"))
        .await;
    println!(
        "\nreport: recipients={} delivered={} failed={}",
        report.recipients,
        report.delivered,
        report.failed()
    );

    // Publishing where nobody listens is a normal outcome.
    let report = bus.publish(Message::new("silence", "demo")).await;
    println!("silent topic reached_none={}", report.reached_none());

    let stats = bus.stats();
    println!(
        "stats: sent={} delivered={} failed={}",
        stats.sent, stats.delivered, stats.failed
    );
    Ok(())
}
