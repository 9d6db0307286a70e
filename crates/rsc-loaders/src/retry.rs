//! Bounded retry with linear backoff for one-shot downloads

use crate::{LoaderError, LoaderResult};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Attempt `n` failing waits `base_delay * n` before attempt `n + 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  pub max_attempts: u32,
  pub base_delay: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self { max_attempts: 3, base_delay: Duration::from_secs(3) }
  }
}

impl RetryPolicy {
  pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
    Self { max_attempts: max_attempts.max(1), base_delay }
  }

  /// Delay after the given failed attempt (1-based)
  pub fn delay_after(&self, attempt: u32) -> Duration {
    self.base_delay * attempt
  }

  /// Run `op` until it succeeds or the attempts are used up. The last error
  /// comes back as [`LoaderError::SourceFailed`] naming `what`.
  pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> LoaderResult<T>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = LoaderResult<T>>,
  {
    let max_attempts = self.max_attempts.max(1);
    let mut attempt = 1;

    loop {
      match op().await {
        Ok(value) => return Ok(value),
        Err(e) if attempt < max_attempts => {
          let delay = self.delay_after(attempt);
          warn!("{} failed ({}), retry {}/{} in {:?}", what, e, attempt, max_attempts, delay);
          tokio::time::sleep(delay).await;
          attempt += 1;
        }
        Err(e) => {
          return Err(LoaderError::SourceFailed {
            source_name: what.to_string(),
            attempts: attempt,
            message: e.to_string(),
          });
        }
      }
    }
  }
}
