//! `tradedesk-events` — domain event contract and the in-process event bus.
//!
//! Aggregates stage events; the application layer persists the aggregate,
//! drains the staged events and hands them to [`EventBus::publish`], which fans
//! them out to every handler subscribed to the event's type.

pub mod bus;
pub mod config;
pub mod event;
pub mod handler;

pub use bus::{EventBus, EventBusError, PublishReport, MAX_EVENT_TYPE_LEN};
pub use config::EventBusConfig;
pub use event::DomainEvent;
pub use handler::{handler_fn, EventHandler, FnHandler, HandlerResult};
