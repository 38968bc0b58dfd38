//! Staff domain module (employees and their roles).
//!
//! Pure domain logic, no IO. `Staff` follows the same copy-on-write model as
//! the product aggregate: mutators return a new validated instance and stage
//! events for the application layer to publish.

pub mod events;
pub mod phone;
pub mod policy;
pub mod role;
pub mod staff;

pub use events::{StaffCreated, StaffEvent, StaffStatusChanged};
pub use phone::PhoneNumber;
pub use policy::{RolePolicy, StaffPolicy};
pub use role::Role;
pub use staff::{NewStaff, Staff, StaffId, StaffInfo, StaffSnapshot, StaffStatus};
