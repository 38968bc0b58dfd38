//! Event handler contract.
//!
//! A handler is any `Send + Sync` value that reacts to exactly one event at a
//! time. The single-argument signature is fixed by the trait, so malformed
//! handlers are rejected at compile time rather than at subscription.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::event::DomainEvent;

/// Outcome of a handler invocation. Errors are logged by the bus, never re-raised.
pub type HandlerResult = anyhow::Result<()>;

#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Name used in log records.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn handle(&self, event: Arc<dyn DomainEvent>) -> HandlerResult;
}

/// Adapter turning an async closure into an [`EventHandler`].
pub struct FnHandler<F> {
    name: String,
    f: F,
}

impl<F> core::fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnHandler").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<F, Fut> EventHandler for FnHandler<F>
where
    F: Fn(Arc<dyn DomainEvent>) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, event: Arc<dyn DomainEvent>) -> HandlerResult {
        (self.f)(event).await
    }
}

/// Wrap a closure as a shareable handler.
///
/// Keep the returned `Arc`: the same `Arc` is needed to unsubscribe.
pub fn handler_fn<F, Fut>(name: impl Into<String>, f: F) -> Arc<dyn EventHandler>
where
    F: Fn(Arc<dyn DomainEvent>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(FnHandler {
        name: name.into(),
        f,
    })
}
