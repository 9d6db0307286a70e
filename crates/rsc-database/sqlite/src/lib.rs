//! # rsc-database-sqlite
//!
//! SQLite persistence for the crawler. The schema is embedded and migrated on
//! connect. Models carry their own queries and take `&mut SqliteConnection`;
//! grouping several calls into one commit is left to the caller.

pub mod connection;
pub mod error;
pub mod models;
pub mod schema;

// Re-export commonly used items
pub use connection::{establish_connection, establish_in_memory_connection, run_migrations};
pub use diesel::prelude::*;
pub use error::{RepositoryError, RepositoryResult};
