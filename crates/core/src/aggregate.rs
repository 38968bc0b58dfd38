//! Aggregate root trait and the aggregate-owned pending event buffer.

/// Aggregate root marker + minimal interface.
///
/// Aggregates in this workspace are immutable snapshots: every business
/// operation returns a new instance. The only state an aggregate mutates in
/// place is its queue of not-yet-published domain events, which the calling
/// layer drains once per successful persistence.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Domain events staged by this aggregate.
    type Event: Clone + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Events staged but not yet drained, oldest first.
    fn pending_events(&self) -> &[Self::Event];

    /// Return all staged events and empty the queue.
    ///
    /// A second call without intervening changes returns an empty list.
    fn clear_events(&mut self) -> Vec<Self::Event>;
}

/// Ordered buffer of staged domain events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQueue<E> {
    events: Vec<E>,
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn record(&mut self, event: E) {
        self.events.push(event);
    }

    pub fn as_slice(&self) -> &[E] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take every staged event, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_in_order_and_empties() {
        let mut queue = EventQueue::new();
        queue.record("a");
        queue.record("b");
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.drain(), vec!["a", "b"]);
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }
}
