use std::any::Any;

use chrono::{DateTime, Utc};

/// A domain event: an immutable record of something that happened to an aggregate.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **versioned** (schema evolution)
/// - routed by [`event_type`](DomainEvent::event_type), which is the bus topic
pub trait DomainEvent: core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "products.product.created").
    ///
    /// Matching against subscriptions is exact and case-sensitive.
    fn event_type(&self) -> &str;

    /// Schema version for this event type.
    fn version(&self) -> u32 {
        1
    }

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Identifier of the aggregate the event belongs to.
    fn aggregate_id(&self) -> String;

    /// Access to the concrete type, for handlers that need the payload.
    fn as_any(&self) -> &dyn Any;
}

impl dyn DomainEvent {
    /// Borrow the concrete event if it is a `T`.
    pub fn downcast_ref<T: DomainEvent>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}
