//! Configuration management for the forum client

use crate::error::{Error, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

/// Main configuration struct for the Reddit client
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
  /// User agent sent with each request. Reddit throttles generic agents hard.
  pub user_agent: String,

  /// API rate limit (requests per minute)
  pub rate_limit: u32,

  /// Request timeout in seconds
  pub timeout_secs: u64,

  /// Maximum retries for failed requests
  pub max_retries: u32,

  /// Base URL for the Reddit JSON API
  pub base_url: String,
}

impl Config {
  /// Load configuration from environment variables
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let user_agent =
      env::var("REDDIT_USER_AGENT").unwrap_or_else(|_| crate::DEFAULT_USER_AGENT.to_string());

    let rate_limit = env::var("RSC_RATE_LIMIT")
      .unwrap_or_else(|_| crate::DEFAULT_RATE_LIMIT.to_string())
      .parse()
      .map_err(|_| Error::Config("Invalid RSC_RATE_LIMIT".to_string()))?;

    let timeout_secs = env::var("RSC_TIMEOUT_SECS")
      .unwrap_or_else(|_| "30".to_string())
      .parse()
      .map_err(|_| Error::Config("Invalid RSC_TIMEOUT_SECS".to_string()))?;

    let max_retries = env::var("RSC_MAX_RETRIES")
      .unwrap_or_else(|_| "3".to_string())
      .parse()
      .map_err(|_| Error::Config("Invalid RSC_MAX_RETRIES".to_string()))?;

    let base_url =
      env::var("REDDIT_BASE_URL").unwrap_or_else(|_| crate::REDDIT_BASE_URL.to_string());
    Url::parse(&base_url)
      .map_err(|e| Error::Config(format!("Invalid REDDIT_BASE_URL {}: {}", base_url, e)))?;

    Ok(Config { user_agent, rate_limit, timeout_secs, max_retries, base_url })
  }

  /// Create a config with default values and the given user agent
  pub fn default_with_agent(user_agent: impl Into<String>) -> Self {
    Config {
      user_agent: user_agent.into(),
      rate_limit: crate::DEFAULT_RATE_LIMIT,
      timeout_secs: 30,
      max_retries: 3,
      base_url: crate::REDDIT_BASE_URL.to_string(),
    }
  }
}

impl Default for Config {
  fn default() -> Self {
    Self::default_with_agent(crate::DEFAULT_USER_AGENT)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  fn clear_env() {
    for key in
      ["REDDIT_USER_AGENT", "RSC_RATE_LIMIT", "RSC_TIMEOUT_SECS", "RSC_MAX_RETRIES", "REDDIT_BASE_URL"]
    {
      env::remove_var(key);
    }
  }

  #[test]
  #[serial]
  fn test_config_from_env_defaults() {
    clear_env();
    let config = Config::from_env().unwrap();
    assert_eq!(config.rate_limit, crate::DEFAULT_RATE_LIMIT);
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.base_url, crate::REDDIT_BASE_URL);
  }

  #[test]
  #[serial]
  fn test_config_from_env_overrides() {
    clear_env();
    env::set_var("REDDIT_USER_AGENT", "test-agent/0.1");
    env::set_var("RSC_RATE_LIMIT", "10");
    let config = Config::from_env().unwrap();
    assert_eq!(config.user_agent, "test-agent/0.1");
    assert_eq!(config.rate_limit, 10);
    clear_env();
  }

  #[test]
  #[serial]
  fn test_config_rejects_bad_numbers() {
    clear_env();
    env::set_var("RSC_TIMEOUT_SECS", "soon");
    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    clear_env();
  }
}
