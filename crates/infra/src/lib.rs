//! Infrastructure layer: storage adapters and the application services that
//! drive aggregates through the persist → drain → publish cycle.

pub mod handlers;
pub mod product_service;
pub mod repository;

pub use handlers::LoggingEventHandler;
pub use product_service::{ProductChanges, ProductService, ServiceError};
pub use repository::{InMemoryProductRepository, ProductRepository, RepositoryError};
