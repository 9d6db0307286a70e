use anyhow::{Context, Result};
use diesel::sqlite::SqliteConnection;
use rsc_database_sqlite::establish_connection;

pub mod crawl;
pub mod export;
pub mod report;
pub mod whitelist;

/// Open the database, creating and migrating it when needed
pub fn connect(database_url: &str) -> Result<SqliteConnection> {
  establish_connection(database_url)
    .with_context(|| format!("Failed to open database {}", database_url))
}
