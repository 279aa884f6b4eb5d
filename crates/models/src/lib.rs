//! Domain types for the parent registry.
//! - Entity and input shapes with their field-level validation.
//! - Wire field names follow the public API (`ID`, `Name`, `Email`).

pub mod errors;
pub mod parent;
pub mod profile;

pub use parent::{NewParent, Parent, ParentUpdate};
pub use profile::Profile;
