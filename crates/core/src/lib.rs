//! `tradedesk-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error model, identifiers, entity/aggregate/value-object traits, the
//! shared policy result type and the `Money` value object.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod policy;
pub mod value_object;

pub use aggregate::{AggregateRoot, EventQueue};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AggregateId, EntityId};
pub use money::Money;
pub use policy::PolicyResult;
pub use value_object::ValueObject;
