//! Database connectivity
//!
//! - `pool`: PostgreSQL pool creation and health checks
//! - `migrations`: embedded schema migrations
//!
//! Entity queries live in [`crate::models`].

pub mod migrations;
pub mod pool;
