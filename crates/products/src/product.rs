use chrono::Utc;
use serde::{Deserialize, Serialize};

use tradedesk_core::{AggregateId, AggregateRoot, DomainError, DomainResult, EventQueue};

use crate::category::{Category, CategoryId};
use crate::events::{ProductCreated, ProductDeleted, ProductEvent, ProductPriceUpdated};
use crate::policy::ProductPolicy;
use crate::price::Price;

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Validated product code (uppercase letters and digits, at least 3 long).
///
/// Only obtainable through [`ProductPolicy::validate_code`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductCode(pub(crate) String);

impl ProductCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Product status lifecycle: `OnSale ⇄ Discontinued → Deleted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    OnSale,
    Discontinued,
    /// Terminal. The product is kept, only marked deleted.
    Deleted,
}

/// Free-form descriptive attributes. In a patch, `None` means "keep".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub unit: Option<String>,
    pub capacity: Option<String>,
    pub specification: Option<String>,
    pub description: Option<String>,
}

impl ProductDetail {
    fn merged(&self, patch: ProductDetail) -> ProductDetail {
        ProductDetail {
            unit: patch.unit.or_else(|| self.unit.clone()),
            capacity: patch.capacity.or_else(|| self.capacity.clone()),
            specification: patch.specification.or_else(|| self.specification.clone()),
            description: patch.description.or_else(|| self.description.clone()),
        }
    }
}

/// Input for [`Product::create`], as gathered by the application layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub price: Option<Price>,
    #[serde(default)]
    pub detail: ProductDetail,
    #[serde(default)]
    pub is_recoverable: bool,
    pub categories: Vec<Category>,
}

/// Full persisted state of a product, without pending events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub code: String,
    pub name: String,
    pub price: Price,
    #[serde(flatten)]
    pub detail: ProductDetail,
    pub is_recoverable: bool,
    pub status: ProductStatus,
    pub categories: Vec<Category>,
}

/// Unvalidated full property set; every `Product` is built from one.
struct ProductProps {
    id: ProductId,
    code: String,
    name: String,
    price: Option<Price>,
    detail: ProductDetail,
    is_recoverable: bool,
    status: ProductStatus,
    categories: Vec<Category>,
}

/// Aggregate root: Product.
///
/// Immutable apart from its pending-event queue. Every business operation
/// returns a new, re-validated `Product`; the receiver is left untouched, so a
/// failed operation never leaves a half-applied change behind.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    code: ProductCode,
    name: String,
    price: Price,
    detail: ProductDetail,
    is_recoverable: bool,
    status: ProductStatus,
    categories: Vec<Category>,
    events: EventQueue<ProductEvent>,
}

impl Product {
    /// Create a new product (status `OnSale`) and stage `ProductCreated`.
    pub fn create(new: NewProduct) -> DomainResult<Self> {
        let props = ProductProps {
            id: ProductId::new(AggregateId::new()),
            code: new.code,
            name: new.name,
            price: new.price,
            detail: new.detail,
            is_recoverable: new.is_recoverable,
            status: ProductStatus::OnSale,
            categories: new.categories,
        };

        let mut product = Self::build(props, EventQueue::new())?;
        let created = ProductCreated {
            product_id: product.id,
            product: product.to_snapshot(),
            occurred_at: Utc::now(),
        };
        product.events.record(ProductEvent::ProductCreated(created));
        Ok(product)
    }

    /// Rehydrate from persisted state. Validated; stages no events.
    pub fn from_snapshot(snapshot: ProductSnapshot) -> DomainResult<Self> {
        let props = ProductProps {
            id: snapshot.id,
            code: snapshot.code,
            name: snapshot.name,
            price: Some(snapshot.price),
            detail: snapshot.detail,
            is_recoverable: snapshot.is_recoverable,
            status: snapshot.status,
            categories: snapshot.categories,
        };
        Self::build(props, EventQueue::new())
    }

    pub fn to_snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id,
            code: self.code.as_str().to_string(),
            name: self.name.clone(),
            price: self.price,
            detail: self.detail.clone(),
            is_recoverable: self.is_recoverable,
            status: self.status,
            categories: self.categories.clone(),
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn code(&self) -> &ProductCode {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn detail(&self) -> &ProductDetail {
        &self.detail
    }

    pub fn unit(&self) -> Option<&str> {
        self.detail.unit.as_deref()
    }

    pub fn capacity(&self) -> Option<&str> {
        self.detail.capacity.as_deref()
    }

    pub fn specification(&self) -> Option<&str> {
        self.detail.specification.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.detail.description.as_deref()
    }

    pub fn is_recoverable(&self) -> bool {
        self.is_recoverable
    }

    pub fn status(&self) -> ProductStatus {
        self.status
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn has_category(&self, category_id: CategoryId) -> bool {
        self.categories.iter().any(|c| c.id_typed() == category_id)
    }

    /// Only products on sale can be sold.
    pub fn can_be_sold(&self) -> bool {
        self.status == ProductStatus::OnSale
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;
    type Event = ProductEvent;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn pending_events(&self) -> &[ProductEvent] {
        self.events.as_slice()
    }

    fn clear_events(&mut self) -> Vec<ProductEvent> {
        self.events.drain()
    }
}

// Mutators. `None` arguments mean "leave as is" and return an unchanged copy.
impl Product {
    pub fn update_name(&self, name: Option<&str>) -> DomainResult<Self> {
        let Some(name) = name else {
            return Ok(self.clone());
        };
        self.evolve(|props| props.name = name.to_string())
    }

    /// Change the price and stage `ProductPriceUpdated`.
    pub fn update_price(&self, price: Option<Price>) -> DomainResult<Self> {
        let Some(price) = price else {
            return Ok(self.clone());
        };

        let mut next = self.evolve(|props| props.price = Some(price))?;
        next.events
            .record(ProductEvent::ProductPriceUpdated(ProductPriceUpdated {
                product_id: self.id,
                old_price: self.price,
                new_price: price,
                occurred_at: Utc::now(),
            }));
        Ok(next)
    }

    /// Overwrite the descriptive fields that are `Some` in `patch`.
    pub fn update_product_detail(&self, patch: ProductDetail) -> DomainResult<Self> {
        let detail = self.detail.merged(patch);
        self.evolve(|props| props.detail = detail)
    }

    pub fn set_recoverable(&self, is_recoverable: Option<bool>) -> DomainResult<Self> {
        let Some(is_recoverable) = is_recoverable else {
            return Ok(self.clone());
        };
        self.evolve(|props| props.is_recoverable = is_recoverable)
    }

    /// Put a discontinued product back on sale.
    pub fn resume(&self) -> DomainResult<Self> {
        match self.status {
            ProductStatus::OnSale => Err(DomainError::conflict("product is already on sale")),
            ProductStatus::Deleted => Err(DomainError::invariant(
                "deleted products cannot be resumed",
            )),
            ProductStatus::Discontinued => {
                self.evolve(|props| props.status = ProductStatus::OnSale)
            }
        }
    }

    /// Stop selling the product.
    pub fn discontinue(&self) -> DomainResult<Self> {
        match self.status {
            ProductStatus::Discontinued => {
                Err(DomainError::conflict("product is already discontinued"))
            }
            ProductStatus::Deleted => Err(DomainError::invariant(
                "deleted products cannot be discontinued",
            )),
            ProductStatus::OnSale => {
                self.evolve(|props| props.status = ProductStatus::Discontinued)
            }
        }
    }

    /// Mark the product deleted and stage `ProductDeleted`.
    pub fn delete(&self) -> DomainResult<Self> {
        if self.status == ProductStatus::Deleted {
            return Err(DomainError::conflict("product is already deleted"));
        }

        let mut next = self.evolve(|props| props.status = ProductStatus::Deleted)?;
        next.events
            .record(ProductEvent::ProductDeleted(ProductDeleted {
                product_id: self.id,
                occurred_at: Utc::now(),
            }));
        Ok(next)
    }

    pub fn add_category(&self, category: Category) -> DomainResult<Self> {
        if self.has_category(category.id_typed()) {
            return Err(DomainError::validation(format!(
                "category {} is already assigned to this product",
                category.id_typed()
            )));
        }
        self.evolve(|props| props.categories.push(category))
    }

    pub fn remove_category(&self, category_id: CategoryId) -> DomainResult<Self> {
        if !self.has_category(category_id) {
            return Err(DomainError::validation(format!(
                "category {category_id} is not assigned to this product"
            )));
        }
        if self.categories.len() == 1 {
            return Err(DomainError::validation(
                "cannot remove the last category of a product",
            ));
        }
        self.evolve(|props| props.categories.retain(|c| c.id_typed() != category_id))
    }
}

// Construction internals.
impl Product {
    fn props(&self) -> ProductProps {
        ProductProps {
            id: self.id,
            code: self.code.as_str().to_string(),
            name: self.name.clone(),
            price: Some(self.price),
            detail: self.detail.clone(),
            is_recoverable: self.is_recoverable,
            status: self.status,
            categories: self.categories.clone(),
        }
    }

    /// Copy-on-write step: snapshot, apply `change`, rebuild with validation.
    /// Events not yet drained travel with the new instance.
    fn evolve(&self, change: impl FnOnce(&mut ProductProps)) -> DomainResult<Self> {
        let mut props = self.props();
        change(&mut props);
        Self::build(props, self.events.clone())
    }

    /// Validate in fixed order: code, name, categories, price.
    fn build(props: ProductProps, events: EventQueue<ProductEvent>) -> DomainResult<Self> {
        let code = ProductPolicy::validate_code(&props.code)?;
        let name = ProductPolicy::validate_name(&props.name)?;
        let categories = ProductPolicy::validate_categories(&props.categories)?;
        let price = ProductPolicy::validate_price(props.price.as_ref())?;

        Ok(Self {
            id: props.id,
            code,
            name,
            price,
            detail: props.detail,
            is_recoverable: props.is_recoverable,
            status: props.status,
            categories,
            events,
        })
    }
}
