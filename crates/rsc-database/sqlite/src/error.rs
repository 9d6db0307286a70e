//! Errors raised while opening or migrating the database

use diesel::result::Error as DieselError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
  #[error("Connection error: {0}")]
  ConnectionError(String),

  #[error("Migration error: {0}")]
  MigrationError(String),

  #[error("Database query error: {0}")]
  QueryError(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Constraint violation: {0}")]
  ConstraintViolation(String),
}

impl From<DieselError> for RepositoryError {
  fn from(err: DieselError) -> Self {
    match err {
      DieselError::NotFound => RepositoryError::NotFound("Record not found".to_string()),
      DieselError::DatabaseError(kind, info) => match kind {
        diesel::result::DatabaseErrorKind::UniqueViolation
        | diesel::result::DatabaseErrorKind::ForeignKeyViolation
        | diesel::result::DatabaseErrorKind::CheckViolation => {
          RepositoryError::ConstraintViolation(info.message().to_string())
        }
        _ => RepositoryError::QueryError(info.message().to_string()),
      },
      _ => RepositoryError::QueryError(err.to_string()),
    }
  }
}

impl From<diesel::ConnectionError> for RepositoryError {
  fn from(err: diesel::ConnectionError) -> Self {
    RepositoryError::ConnectionError(err.to_string())
  }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_not_found_conversion() {
    let err = RepositoryError::from(DieselError::NotFound);
    assert!(matches!(err, RepositoryError::NotFound(_)));
  }

  #[test]
  fn test_display() {
    let err = RepositoryError::MigrationError("table exists".to_string());
    assert_eq!(err.to_string(), "Migration error: table exists");
  }
}
