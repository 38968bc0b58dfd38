//! Product persistence port and its in-memory adapter.

mod in_memory;

use async_trait::async_trait;
use thiserror::Error;

use tradedesk_core::DomainError;
use tradedesk_products::{Product, ProductId};

pub use in_memory::InMemoryProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Another product already uses this code.
    #[error("product code already in use: {0}")]
    DuplicateCode(String),

    /// Stored state no longer satisfies the domain rules.
    #[error("stored product is invalid: {0}")]
    Corrupt(#[source] DomainError),

    #[error("storage failure: {0}")]
    Storage(String),
}

/// Storage port for the product aggregate.
///
/// Implementations persist state only; staged events are the caller's to
/// drain and publish once `save` succeeded.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<Product>, RepositoryError>;

    /// Insert or replace the product.
    async fn save(&self, product: &Product) -> Result<(), RepositoryError>;
}
