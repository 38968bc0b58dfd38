//! In-process publish/subscribe event bus.
//!
//! Handlers are registered per event type. `publish` runs every handler for the
//! event's type concurrently and waits until all of them have settled. A failing
//! (or panicking) handler is logged and otherwise ignored: it can neither abort
//! delivery to the other handlers nor surface an error to the publisher.
//!
//! Events should only be published after the aggregate that produced them has
//! been persisted; the bus keeps no record of what it delivered.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::FutureExt;
use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::EventBusConfig;
use crate::event::DomainEvent;
use crate::handler::EventHandler;

/// Longest accepted event type identifier.
pub const MAX_EVENT_TYPE_LEN: usize = 100;

/// Registration failures. These indicate programming errors in the caller and
/// are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventBusError {
    #[error("invalid event type {event_type:?}: {reason}")]
    InvalidEventType {
        event_type: String,
        reason: &'static str,
    },

    #[error("handler {handler} is already subscribed to {event_type}")]
    DuplicateHandler { event_type: String, handler: String },

    #[error("handler {handler} is not subscribed to {event_type}")]
    HandlerNotRegistered { event_type: String, handler: String },
}

/// Summary of one `publish` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Handlers that completed successfully.
    pub succeeded: usize,
    /// Handlers that returned an error or panicked.
    pub failed: usize,
}

impl PublishReport {
    pub fn handlers(&self) -> usize {
        self.succeeded + self.failed
    }
}

type Registry = HashMap<String, Vec<Arc<dyn EventHandler>>>;

pub struct EventBus {
    handlers: RwLock<Registry>,
    config: EventBusConfig,
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let registry = self.read_registry();
        let topics: HashMap<&str, usize> = registry
            .iter()
            .map(|(topic, handlers)| (topic.as_str(), handlers.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("handlers", &topics)
            .field("config", &self.config)
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Bus configured from the process environment (see [`EventBusConfig::from_env`]).
    pub fn from_env() -> Self {
        Self::with_config(EventBusConfig::from_env())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    /// Register `handler` for `event_type`.
    ///
    /// The same handler (same `Arc`) cannot be registered twice for one type.
    pub fn subscribe(
        &self,
        event_type: &str,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), EventBusError> {
        validate_event_type(event_type)?;

        let mut registry = self.write_registry();
        let handlers = registry.entry(event_type.to_string()).or_default();
        if handlers.iter().any(|h| same_handler(h, &handler)) {
            return Err(EventBusError::DuplicateHandler {
                event_type: event_type.to_string(),
                handler: handler.name().to_string(),
            });
        }

        debug!(event_type, handler = handler.name(), "handler subscribed");
        handlers.push(handler);
        Ok(())
    }

    /// Remove a previously registered handler.
    ///
    /// Unsubscribing from a type nobody listens to is only a warning.
    pub fn unsubscribe(
        &self,
        event_type: &str,
        handler: &Arc<dyn EventHandler>,
    ) -> Result<(), EventBusError> {
        let mut registry = self.write_registry();
        let Some(handlers) = registry.get_mut(event_type) else {
            warn!(event_type, "no handlers registered for event type; nothing to unsubscribe");
            return Ok(());
        };

        let Some(position) = handlers.iter().position(|h| same_handler(h, handler)) else {
            return Err(EventBusError::HandlerNotRegistered {
                event_type: event_type.to_string(),
                handler: handler.name().to_string(),
            });
        };

        handlers.remove(position);
        if handlers.is_empty() {
            registry.remove(event_type);
        }
        debug!(event_type, handler = handler.name(), "handler unsubscribed");
        Ok(())
    }

    /// Number of handlers currently registered for `event_type`.
    pub fn handler_count(&self, event_type: &str) -> usize {
        self.read_registry().get(event_type).map_or(0, Vec::len)
    }

    /// Deliver `event` to every handler subscribed to its type.
    ///
    /// Resolves once all handlers have settled, whatever their outcome.
    pub async fn publish(&self, event: Arc<dyn DomainEvent>) -> PublishReport {
        let event_type = event.event_type().to_string();

        // Clone the handler list so the lock is not held across awaits.
        let handlers = self
            .read_registry()
            .get(&event_type)
            .cloned()
            .unwrap_or_default();

        if handlers.is_empty() {
            warn!(event_type = %event_type, "no handlers registered for event type");
            return PublishReport::default();
        }

        let started = Instant::now();
        let threshold = self.config.slow_handler_threshold;
        let outcomes = join_all(
            handlers
                .iter()
                .map(|handler| run_handler(handler.as_ref(), Arc::clone(&event), threshold)),
        )
        .await;

        let succeeded = outcomes.iter().filter(|ok| **ok).count();
        let report = PublishReport {
            succeeded,
            failed: outcomes.len() - succeeded,
        };

        debug!(
            event_type = %event_type,
            handlers = report.handlers(),
            failed = report.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "event published"
        );
        report
    }

    /// Publish a concrete event value.
    pub async fn publish_event<E: DomainEvent>(&self, event: E) -> PublishReport {
        self.publish(Arc::new(event)).await
    }

    /// Publish events one after another, preserving their order.
    pub async fn publish_all<E, I>(&self, events: I) -> PublishReport
    where
        E: DomainEvent,
        I: IntoIterator<Item = E>,
    {
        let mut total = PublishReport::default();
        for event in events {
            let report = self.publish_event(event).await;
            total.succeeded += report.succeeded;
            total.failed += report.failed;
        }
        total
    }

    fn read_registry(&self) -> std::sync::RwLockReadGuard<'_, Registry> {
        // The registry is only ever pushed to / removed from, so a panic while the
        // lock was held cannot leave it half-updated.
        self.handlers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_registry(&self) -> std::sync::RwLockWriteGuard<'_, Registry> {
        self.handlers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Run one handler, logging its failure or slowness. Returns whether it succeeded.
async fn run_handler(
    handler: &dyn EventHandler,
    event: Arc<dyn DomainEvent>,
    slow_threshold: Duration,
) -> bool {
    let started = Instant::now();
    let outcome = AssertUnwindSafe(handler.handle(Arc::clone(&event)))
        .catch_unwind()
        .await;
    let elapsed = started.elapsed();

    if elapsed > slow_threshold {
        warn!(
            event_type = event.event_type(),
            handler = handler.name(),
            aggregate_id = %event.aggregate_id(),
            elapsed_ms = elapsed.as_millis() as u64,
            threshold_ms = slow_threshold.as_millis() as u64,
            "slow event handler"
        );
    }

    let failure = match outcome {
        Ok(Ok(())) => return true,
        Ok(Err(err)) => format!("{err:#}"),
        Err(panic) => panic_message(panic.as_ref()),
    };

    error!(
        event_type = event.event_type(),
        handler = handler.name(),
        error = %failure,
        timestamp = %Utc::now().to_rfc3339(),
        aggregate_id = %event.aggregate_id(),
        "event handler failed"
    );
    false
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("handler panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("handler panicked: {msg}")
    } else {
        "handler panicked".to_string()
    }
}

fn same_handler(a: &Arc<dyn EventHandler>, b: &Arc<dyn EventHandler>) -> bool {
    // Compare data pointers only; vtable pointers are not guaranteed unique.
    core::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

fn validate_event_type(event_type: &str) -> Result<(), EventBusError> {
    let reason = if event_type.is_empty() {
        Some("must not be empty")
    } else if event_type.chars().count() > MAX_EVENT_TYPE_LEN {
        Some("must be at most 100 characters")
    } else if event_type.chars().any(char::is_whitespace) {
        Some("must not contain whitespace")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(EventBusError::InvalidEventType {
            event_type: event_type.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
