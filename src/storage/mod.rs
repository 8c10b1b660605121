//! Storage Layer - SQLite-backed persistence
//!
//! One database file holds the five dataset tables:
//! - distribution_centers(id, name, latitude, longitude)
//! - users(id, first_name, last_name, email, ...)
//! - products(id, cost, category, name, ..., distribution_center_id)
//! - orders(order_id, user_id, status, ...)
//! - order_items(id, order_id, user_id, product_id, ...)

pub mod schema;
pub mod sqlite;

pub use schema::create_schema;
pub use sqlite::{DbStats, ReferenceCheck, Row, Store, TableCount};
