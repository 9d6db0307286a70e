/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum LoaderError {
  #[error("API error: {0}")]
  ApiError(String),

  #[error("CSV parsing error: {0}")]
  CsvError(String),

  #[error("IO error: {0}")]
  IoError(String),

  #[error("Serialization error: {0}")]
  SerializationError(String),

  #[error("Database error: {0}")]
  DatabaseError(String),

  #[error("Rate limit exceeded, retry after {retry_after} seconds")]
  RateLimitExceeded { retry_after: u64 },

  #[error("Invalid data: {0}")]
  InvalidData(String),

  #[error("Source {source_name} failed after {attempts} attempt(s): {message}")]
  SourceFailed { source_name: String, attempts: u32, message: String },

  #[error("Configuration error: {0}")]
  ConfigurationError(String),
}

// Implement conversions manually
impl From<csv::Error> for LoaderError {
  fn from(err: csv::Error) -> Self {
    LoaderError::CsvError(err.to_string())
  }
}

impl From<std::io::Error> for LoaderError {
  fn from(err: std::io::Error) -> Self {
    LoaderError::IoError(err.to_string())
  }
}

impl From<serde_json::Error> for LoaderError {
  fn from(err: serde_json::Error) -> Self {
    LoaderError::SerializationError(err.to_string())
  }
}

impl From<reqwest::Error> for LoaderError {
  fn from(err: reqwest::Error) -> Self {
    LoaderError::ApiError(err.to_string())
  }
}

impl From<rsc_core::Error> for LoaderError {
  fn from(err: rsc_core::Error) -> Self {
    match err {
      rsc_core::Error::RateLimited { retry_after } => LoaderError::RateLimitExceeded { retry_after },
      other => LoaderError::ApiError(other.to_string()),
    }
  }
}

impl From<diesel::result::Error> for LoaderError {
  fn from(err: diesel::result::Error) -> Self {
    LoaderError::DatabaseError(err.to_string())
  }
}

impl From<rsc_database_sqlite::RepositoryError> for LoaderError {
  fn from(err: rsc_database_sqlite::RepositoryError) -> Self {
    LoaderError::DatabaseError(err.to_string())
  }
}

pub type LoaderResult<T> = Result<T, LoaderError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_loader_error_display_source_failed() {
    let err = LoaderError::SourceFailed {
      source_name: "nasdaq".to_string(),
      attempts: 3,
      message: "HTTP 503".to_string(),
    };
    assert_eq!(err.to_string(), "Source nasdaq failed after 3 attempt(s): HTTP 503");
  }

  #[test]
  fn test_loader_error_display_rate_limit_exceeded() {
    let err = LoaderError::RateLimitExceeded { retry_after: 60 };
    assert_eq!(err.to_string(), "Rate limit exceeded, retry after 60 seconds");
  }

  #[test]
  fn test_loader_error_from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = LoaderError::from(io_err);
    assert!(matches!(err, LoaderError::IoError(_)));
    assert!(err.to_string().contains("file missing"));
  }

  #[test]
  fn test_loader_error_from_core_rate_limit() {
    let err = LoaderError::from(rsc_core::Error::RateLimited { retry_after: 7 });
    assert!(matches!(err, LoaderError::RateLimitExceeded { retry_after: 7 }));

    let err = LoaderError::from(rsc_core::Error::Config("bad config".to_string()));
    assert!(matches!(err, LoaderError::ApiError(_)));
    assert!(err.to_string().contains("Configuration error"));
  }

  #[test]
  fn test_loader_error_from_diesel() {
    let err = LoaderError::from(diesel::result::Error::NotFound);
    assert!(matches!(err, LoaderError::DatabaseError(_)));
  }
}
