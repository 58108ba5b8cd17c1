//! Typed entity models and DTOs.
//!
//! Schema-driven entities (sites, equipment, vendors) have no typed model;
//! their rows travel as JSON maps produced by the generic entity
//! repository. The modules here cover the entities with behavior beyond
//! plain CRUD: users (auth, soft deactivation), sessions (refresh
//! tokens), and work orders (filters, joined labels).

pub mod session;
pub mod user;
pub mod work_order;
