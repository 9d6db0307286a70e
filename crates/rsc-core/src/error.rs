use thiserror::Error;

/// The main error type for rsc-* crates
#[derive(Error, Debug)]
pub enum Error {
  /// Environment variable error
  #[error("Environment variable error: {0}")]
  EnvVar(#[from] std::env::VarError),

  /// Configuration error
  #[error("Configuration error: {0}")]
  Config(String),

  /// Serialization/Deserialization error
  #[error("Serialization error")]
  Serde(#[from] serde_json::Error),

  /// I/O error while reading lexicon or word list files
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  /// Remote resource does not exist (deleted user, banned subreddit, ...)
  #[error("Not found: {0}")]
  NotFound(String),

  /// Remote side asked us to slow down
  #[error("Rate limited, retry after {retry_after} seconds")]
  RateLimited { retry_after: u64 },

  /// Invalid response from API
  #[error("Invalid API response: {0}")]
  InvalidResponse(String),

  /// HTTP transport error
  #[error("HTTP error: {0}")]
  Http(String),

  /// API error reported by the remote service
  #[error("API error: {0}")]
  Api(String),

  /// Parse error for data processing
  #[error("Parse error: {0}")]
  Parse(String),
}

impl Error {
  /// Whether the failure is worth another attempt
  pub fn is_transient(&self) -> bool {
    matches!(self, Error::Http(_))
  }
}

/// Result type alias for rsc-* crates
pub type Result<T> = std::result::Result<T, Error>;
