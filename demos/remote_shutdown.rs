//! # Example: remote_shutdown
//!
//! Re-enacts the pattern this crate exists for: one component signals another
//! to tear itself down, with no direct reference between them.
//!
//! ## Flow
//! ```text
//! Endpoint "main" ──► publish("EXIT") ──► Bus
//!                                          │ snapshot fan-out
//! Endpoint "dummy" ◄── finish_on handler ◄─┘
//!     └─► finish(): unregisters itself, state ⇒ destroyed
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=scopecast=debug cargo run --example remote_shutdown
//! ```

use scopecast::{Bus, Endpoint, Payload};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let bus = Bus::new();

    let dummy = Endpoint::new("dummy", bus.clone());
    dummy.start()?;
    dummy.finish_on("EXIT").await?;
    println!("dummy {} listening for EXIT, state={}", dummy.id(), dummy.state());

    let main_ep = Endpoint::new("main", bus.clone());
    main_ep.start()?;

    let mut payload = Payload::new();
    payload.insert("requester".into(), main_ep.name().into());
    let report = main_ep.publish("EXIT", Some(payload)).await?;

    println!(
        "publish: recipients={} delivered={} failed={}",
        report.recipients,
        report.delivered,
        report.failed()
    );
    println!("dummy state={}", dummy.state());

    // A second EXIT reaches nobody: the registration died with the endpoint.
    let report = main_ep.publish("EXIT", None).await?;
    println!("second publish reached_none={}", report.reached_none());

    // Teardown is idempotent; this is a no-op.
    dummy.finish().await;

    let stats = bus.stats();
    println!(
        "stats: sent={} delivered={} failed={}",
        stats.sent, stats.delivered, stats.failed
    );
    Ok(())
}
