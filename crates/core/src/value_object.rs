//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" a value
/// object, create a new one with the new values; every constructor validates, so an
/// instance that exists is always valid.
///
/// - `Money::of(10_000)` is a value object
/// - `Product { id: ProductId(...), .. }` is an entity
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
