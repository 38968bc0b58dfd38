//! Ready-made event handlers.

use std::sync::Arc;

use async_trait::async_trait;

use tradedesk_events::{DomainEvent, EventHandler, HandlerResult};

/// Logs every event it receives at `info`. Useful as an audit tap.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEventHandler;

#[async_trait]
impl EventHandler for LoggingEventHandler {
    fn name(&self) -> &str {
        "logging"
    }

    async fn handle(&self, event: Arc<dyn DomainEvent>) -> HandlerResult {
        tracing::info!(
            event_type = event.event_type(),
            event_version = event.version(),
            aggregate_id = %event.aggregate_id(),
            occurred_at = %event.occurred_at().to_rfc3339(),
            "domain event"
        );
        Ok(())
    }
}
