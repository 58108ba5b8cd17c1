//! HTTP handlers, one module per resource.

pub mod auth;
pub mod entity;
pub mod setup;
pub mod users;
pub mod work_orders;
