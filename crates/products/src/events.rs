//! Product domain events.

use std::any::Any;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradedesk_events::DomainEvent;

use crate::price::Price;
use crate::product::{ProductId, ProductSnapshot};

pub const PRODUCT_CREATED: &str = "products.product.created";
pub const PRODUCT_PRICE_UPDATED: &str = "products.product.price_updated";
pub const PRODUCT_DELETED: &str = "products.product.deleted";

/// Event: ProductCreated. Carries the full product as created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCreated {
    pub product_id: ProductId,
    pub product: ProductSnapshot,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductPriceUpdated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPriceUpdated {
    pub product_id: ProductId,
    pub old_price: Price,
    pub new_price: Price,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductDeleted (status transition, the record is kept).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDeleted {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProductEvent {
    ProductCreated(ProductCreated),
    ProductPriceUpdated(ProductPriceUpdated),
    ProductDeleted(ProductDeleted),
}

impl ProductEvent {
    pub fn product_id(&self) -> ProductId {
        match self {
            ProductEvent::ProductCreated(e) => e.product_id,
            ProductEvent::ProductPriceUpdated(e) => e.product_id,
            ProductEvent::ProductDeleted(e) => e.product_id,
        }
    }
}

impl DomainEvent for ProductEvent {
    fn event_type(&self) -> &str {
        match self {
            ProductEvent::ProductCreated(_) => PRODUCT_CREATED,
            ProductEvent::ProductPriceUpdated(_) => PRODUCT_PRICE_UPDATED,
            ProductEvent::ProductDeleted(_) => PRODUCT_DELETED,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductEvent::ProductCreated(e) => e.occurred_at,
            ProductEvent::ProductPriceUpdated(e) => e.occurred_at,
            ProductEvent::ProductDeleted(e) => e.occurred_at,
        }
    }

    fn aggregate_id(&self) -> String {
        self.product_id().to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
