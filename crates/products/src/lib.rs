//! Products domain module (catalog, pricing, categories).
//!
//! This crate contains business rules for products, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage). Aggregates are
//! copy-on-write: every mutator returns a new, fully validated `Product`.

pub mod category;
pub mod events;
pub mod policy;
pub mod price;
pub mod product;

pub use category::{Category, CategoryId};
pub use events::{ProductCreated, ProductDeleted, ProductEvent, ProductPriceUpdated};
pub use policy::ProductPolicy;
pub use price::{DEFAULT_TAX_RATE, Price};
pub use product::{
    NewProduct, Product, ProductCode, ProductDetail, ProductId, ProductSnapshot, ProductStatus,
};
