//! Application service for the product aggregate.
//!
//! Every command runs the same pipeline:
//!
//! ```text
//! load → mutate (copy-on-write) → save → drain staged events → publish
//! ```
//!
//! Events are published only after `save` succeeded, so a failed write never
//! announces a change that did not happen. Handler failures are contained by
//! the bus and do not fail the command.

use std::sync::Arc;

use thiserror::Error;

use tradedesk_core::{AggregateRoot, DomainError, DomainResult};
use tradedesk_events::EventBus;
use tradedesk_products::{
    Category, CategoryId, NewProduct, Price, Product, ProductDetail, ProductId,
};

use crate::repository::{ProductRepository, RepositoryError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("product not found: {0}")]
    NotFound(ProductId),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Partial product edit. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub detail: ProductDetail,
    pub is_recoverable: Option<bool>,
}

#[derive(Debug)]
pub struct ProductService<R> {
    repository: R,
    bus: Arc<EventBus>,
}

impl<R> ProductService<R> {
    pub fn new(repository: R, bus: Arc<EventBus>) -> Self {
        Self { repository, bus }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub async fn create(&self, new: NewProduct) -> Result<Product, ServiceError> {
        let product = Product::create(new)?;
        self.commit(product).await
    }

    pub async fn get(&self, id: ProductId) -> Result<Product, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    pub async fn rename(&self, id: ProductId, name: &str) -> Result<Product, ServiceError> {
        self.execute(id, |p| p.update_name(Some(name))).await
    }

    /// Apply name, then detail, then recoverable flag as one command.
    pub async fn update(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, ServiceError> {
        let ProductChanges {
            name,
            detail,
            is_recoverable,
        } = changes;
        self.execute(id, |p| {
            p.update_name(name.as_deref())?
                .update_product_detail(detail)?
                .set_recoverable(is_recoverable)
        })
        .await
    }

    pub async fn update_price(&self, id: ProductId, price: Price) -> Result<Product, ServiceError> {
        self.execute(id, |p| p.update_price(Some(price))).await
    }

    pub async fn discontinue(&self, id: ProductId) -> Result<Product, ServiceError> {
        self.execute(id, Product::discontinue).await
    }

    pub async fn resume(&self, id: ProductId) -> Result<Product, ServiceError> {
        self.execute(id, Product::resume).await
    }

    pub async fn delete(&self, id: ProductId) -> Result<Product, ServiceError> {
        self.execute(id, Product::delete).await
    }

    pub async fn add_category(
        &self,
        id: ProductId,
        category: Category,
    ) -> Result<Product, ServiceError> {
        self.execute(id, |p| p.add_category(category)).await
    }

    pub async fn remove_category(
        &self,
        id: ProductId,
        category_id: CategoryId,
    ) -> Result<Product, ServiceError> {
        self.execute(id, |p| p.remove_category(category_id)).await
    }

    async fn execute<F>(&self, id: ProductId, change: F) -> Result<Product, ServiceError>
    where
        F: FnOnce(&Product) -> DomainResult<Product>,
    {
        let current = self.get(id).await?;
        let next = change(&current).map_err(|err| {
            tracing::debug!(product_id = %id, error = %err, "product command rejected");
            err
        })?;
        self.commit(next).await
    }

    /// Save, then drain and publish staged events in order.
    async fn commit(&self, mut product: Product) -> Result<Product, ServiceError> {
        self.repository.save(&product).await?;

        let events = product.clear_events();
        let count = events.len();
        let report = self.bus.publish_all(events).await;

        tracing::debug!(
            product_id = %product.id_typed(),
            events = count,
            handlers_failed = report.failed,
            "product committed"
        );
        Ok(product)
    }
}
