use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use tradedesk_products::{Product, ProductId, ProductSnapshot};

use super::{ProductRepository, RepositoryError};

/// In-memory product store keyed by id.
///
/// Intended for tests/dev. Holds snapshots, so pending events never leak
/// into storage and every load rehydrates through validation.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<ProductId, ProductSnapshot>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Storage("lock poisoned".to_string())
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().map_err(poisoned)?;
        products
            .get(&id)
            .cloned()
            .map(Product::from_snapshot)
            .transpose()
            .map_err(RepositoryError::Corrupt)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().map_err(poisoned)?;
        products
            .values()
            .find(|p| p.code == code)
            .cloned()
            .map(Product::from_snapshot)
            .transpose()
            .map_err(RepositoryError::Corrupt)
    }

    async fn save(&self, product: &Product) -> Result<(), RepositoryError> {
        let snapshot = product.to_snapshot();
        let mut products = self.products.write().map_err(poisoned)?;

        let taken = products
            .values()
            .any(|p| p.code == snapshot.code && p.id != snapshot.id);
        if taken {
            return Err(RepositoryError::DuplicateCode(snapshot.code));
        }

        products.insert(snapshot.id, snapshot);
        Ok(())
    }
}
