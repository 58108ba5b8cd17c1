//! Domain layer for the parc asset inventory.
//!
//! Holds the entity-schema abstraction that drives the generic CRUD
//! endpoints, the static catalog of managed entities, the role
//! enumeration, and the domain error type shared by every crate.

pub mod catalog;
pub mod error;
pub mod roles;
pub mod schema;
pub mod types;
