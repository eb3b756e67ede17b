//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints delivered messages to stdout in a human-readable
//! format. This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [EXIT] sender=a1b2c3d4 seq=7 payload=yes
//! [tick] sender=f00dcafe seq=8 payload=no
//! ```

use async_trait::async_trait;

use super::subscribe::Subscribe;
use crate::error::HandlerError;
use crate::messages::Message;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Register it on the topics you want to
/// watch. Not intended for production use - implement a custom
/// [`Subscribe`] for structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_message(&self, message: &Message) -> Result<(), HandlerError> {
        println!(
            "[{}] sender={} seq={} payload={}",
            message.topic,
            message.sender,
            message.seq,
            if message.payload.is_some() { "yes" } else { "no" }
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log_writer"
    }
}
