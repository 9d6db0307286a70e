use crate::error::{RepositoryError, RepositoryResult};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Commits may wait this long on a locked database
const BUSY_TIMEOUT_MS: u32 = 60_000;

/// Open (or create) the database, enable foreign keys and bring the schema up to date
pub fn establish_connection(database_url: &str) -> RepositoryResult<SqliteConnection> {
  let mut conn = SqliteConnection::establish(database_url)?;
  configure(&mut conn)?;
  run_migrations(&mut conn)?;
  Ok(conn)
}

/// Private in-memory database with the full schema, mostly for tests
pub fn establish_in_memory_connection() -> RepositoryResult<SqliteConnection> {
  establish_connection(":memory:")
}

fn configure(conn: &mut SqliteConnection) -> RepositoryResult<()> {
  conn.batch_execute(&format!(
    "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
    BUSY_TIMEOUT_MS
  ))?;
  Ok(())
}

/// Apply pending migrations, returning how many ran
pub fn run_migrations(conn: &mut SqliteConnection) -> RepositoryResult<usize> {
  let applied = conn
    .run_pending_migrations(MIGRATIONS)
    .map_err(|e| RepositoryError::MigrationError(e.to_string()))?;

  if !applied.is_empty() {
    info!("Applied {} database migration(s)", applied.len());
  }

  Ok(applied.len())
}
