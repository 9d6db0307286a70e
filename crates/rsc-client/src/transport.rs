//! HTTP transport layer for Reddit API requests

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use rsc_core::{Config, Error, Result};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};
use url::Url;

/// Seconds to wait when a 429 carries no usable hint
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// HTTP transport layer for making requests to the Reddit JSON API
pub struct Transport {
  client: Client,
  base_url: Url,
  timeout: Duration,
  max_retries: u32,
  retry_base: Duration,
  calls: AtomicU64,
}

impl Transport {
  /// Create a new transport instance
  pub fn new(config: &Config) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(config.user_agent.clone())
      .build()
      .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

    let base_url = Url::parse(&config.base_url)
      .map_err(|e| Error::Config(format!("Invalid base URL {}: {}", config.base_url, e)))?;

    Ok(Self {
      client,
      base_url,
      timeout: Duration::from_secs(config.timeout_secs),
      max_retries: config.max_retries,
      retry_base: Duration::from_secs(1),
      calls: AtomicU64::new(0),
    })
  }

  /// Override the first backoff step (doubles per attempt)
  pub fn with_retry_base(mut self, retry_base: Duration) -> Self {
    self.retry_base = retry_base;
    self
  }

  /// GET a JSON document.
  ///
  /// Transport failures and 5xx answers are retried with exponential backoff.
  /// 404 and 429 come back immediately as [`Error::NotFound`] and
  /// [`Error::RateLimited`].
  #[instrument(skip(self, params))]
  pub async fn get<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T>
  where
    T: DeserializeOwned,
  {
    let url = self.build_url(path, params)?;
    debug!("Making request to: {}", url);

    let mut attempt = 0;

    loop {
      if attempt > 0 {
        let delay = self.retry_base * 2_u32.pow(attempt);
        warn!("Retrying request in {}ms (attempt {})", delay.as_millis(), attempt + 1);
        tokio::time::sleep(delay).await;
      }

      let outcome = match self.make_request(&url).await {
        Ok(response) => self.read_body(response).await,
        Err(e) => Err(e),
      };

      match outcome {
        Ok(data) => return Ok(data),
        Err(e) if e.is_transient() && attempt < self.max_retries => {
          warn!("Request failed (attempt {}): {}", attempt + 1, e);
          attempt += 1;
        }
        Err(e) => return Err(e),
      }
    }
  }

  /// Build the full URL for an API request
  fn build_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
    let mut url = self
      .base_url
      .join(path)
      .map_err(|e| Error::Http(format!("Invalid request path {}: {}", path, e)))?;

    {
      let mut query_pairs = url.query_pairs_mut();
      // keeps &, < and > unescaped in bodies
      query_pairs.append_pair("raw_json", "1");
      for (key, value) in params {
        query_pairs.append_pair(key, value);
      }
    }

    Ok(url)
  }

  /// Make the actual HTTP request and map the status
  async fn make_request(&self, url: &Url) -> Result<Response> {
    self.calls.fetch_add(1, Ordering::Relaxed);

    let response = self
      .client
      .get(url.clone())
      .send()
      .await
      .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

    let status = response.status();

    if status.is_success() {
      debug!("Request successful with status: {}", status);
      return Ok(response);
    }

    match status {
      StatusCode::NOT_FOUND => Err(Error::NotFound(url.path().to_string())),
      StatusCode::TOO_MANY_REQUESTS => {
        let retry_after = retry_after_secs(response.headers());
        warn!("Rate limited by server, retry after {}s", retry_after);
        Err(Error::RateLimited { retry_after })
      }
      s if s.is_server_error() => {
        error!("Request failed with status: {}", s);
        Err(Error::Http(format!("HTTP error: {}", s)))
      }
      s => {
        error!("Request rejected with status: {}", s);
        Err(Error::Api(format!("{} for {}", s, url.path())))
      }
    }
  }

  async fn read_body<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
    let text = response
      .text()
      .await
      .map_err(|e| Error::Http(format!("Failed to read response body: {}", e)))?;

    debug!("Response body length: {} bytes", text.len());

    check_api_error(&text)?;

    serde_json::from_str::<T>(&text).map_err(|e| {
      error!("Failed to parse JSON response: {}", e);
      let preview: String = text.chars().take(200).collect();
      Error::Parse(format!("Failed to parse response: {}. Response: {}", e, preview))
    })
  }

  /// Number of HTTP requests sent so far, retries included
  pub fn calls(&self) -> u64 {
    self.calls.load(Ordering::Relaxed)
  }

  /// Get the base URL being used
  pub fn base_url(&self) -> &str {
    self.base_url.as_str()
  }

  /// Get request timeout duration
  pub fn timeout(&self) -> Duration {
    self.timeout
  }
}

impl std::fmt::Debug for Transport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Transport")
      .field("base_url", &self.base_url.as_str())
      .field("timeout", &self.timeout)
      .field("max_retries", &self.max_retries)
      .finish()
  }
}

/// Reddit sometimes answers 200 with `{"error": 403, "message": "Forbidden"}`
fn check_api_error(response_text: &str) -> Result<()> {
  if !response_text.trim_start().starts_with('{') || !response_text.contains("\"error\"") {
    return Ok(());
  }

  let Ok(value) = serde_json::from_str::<serde_json::Value>(response_text) else {
    return Ok(());
  };

  match (value.get("error").and_then(|e| e.as_u64()), value.get("message")) {
    (Some(404), _) => Err(Error::NotFound(
      value.get("message").and_then(|m| m.as_str()).unwrap_or("Not Found").to_string(),
    )),
    (Some(429), _) => Err(Error::RateLimited { retry_after: DEFAULT_RETRY_AFTER_SECS }),
    (Some(code), message) => Err(Error::Api(format!(
      "{} {}",
      code,
      message.and_then(|m| m.as_str()).unwrap_or_default()
    ))),
    (None, _) => Ok(()),
  }
}

/// `Retry-After` in seconds, falling back to Reddit's `x-ratelimit-reset`
fn retry_after_secs(headers: &HeaderMap) -> u64 {
  [RETRY_AFTER.as_str(), "x-ratelimit-reset"]
    .iter()
    .filter_map(|name| headers.get(*name))
    .filter_map(|value| value.to_str().ok())
    .filter_map(|value| value.trim().parse::<f64>().ok())
    .map(|secs| secs.ceil().max(0.0) as u64)
    .next()
    .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

#[cfg(test)]
mod tests {
  use super::*;
  use reqwest::header::HeaderValue;
  use wiremock::matchers::{method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn transport_for(base_url: &str) -> Transport {
    let mut config = Config::default_with_agent("rsc-test/0.1");
    config.base_url = base_url.to_string();
    config.max_retries = 2;
    Transport::new(&config).unwrap().with_retry_base(Duration::from_millis(1))
  }

  #[test]
  fn test_build_url() {
    let transport = transport_for("https://mock.reddit.test");
    let url = transport.build_url("/r/stocks/new.json", &[("limit", "25".to_string())]).unwrap();

    assert_eq!(url.path(), "/r/stocks/new.json");
    assert!(url.as_str().contains("raw_json=1"));
    assert!(url.as_str().contains("limit=25"));
  }

  #[test]
  fn test_check_api_error_in_body() {
    assert!(matches!(
      check_api_error(r#"{"error": 404, "message": "Not Found"}"#),
      Err(Error::NotFound(_))
    ));
    assert!(matches!(
      check_api_error(r#"{"error": 403, "message": "Forbidden"}"#),
      Err(Error::Api(_))
    ));
    assert!(check_api_error(r#"{"kind": "Listing", "data": {"children": []}}"#).is_ok());
    assert!(check_api_error(r#"[{"kind": "Listing"}]"#).is_ok());
  }

  #[test]
  fn test_retry_after_header_parsing() {
    let mut headers = HeaderMap::new();
    assert_eq!(retry_after_secs(&headers), DEFAULT_RETRY_AFTER_SECS);

    headers.insert("x-ratelimit-reset", HeaderValue::from_static("12.4"));
    assert_eq!(retry_after_secs(&headers), 13);

    headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
    assert_eq!(retry_after_secs(&headers), 7);
  }

  #[tokio::test]
  async fn test_get_retries_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/r/test/about.json"))
      .respond_with(ResponseTemplate::new(503))
      .up_to_n_times(1)
      .mount(&server)
      .await;
    Mock::given(method("GET"))
      .and(path("/r/test/about.json"))
      .and(query_param("raw_json", "1"))
      .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok": true}"#))
      .mount(&server)
      .await;

    let transport = transport_for(&server.uri());
    let value: serde_json::Value = transport.get("/r/test/about.json", &[]).await.unwrap();

    assert_eq!(value["ok"], true);
    assert_eq!(transport.calls(), 2);
  }

  #[tokio::test]
  async fn test_get_maps_not_found_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(404))
      .expect(1)
      .mount(&server)
      .await;

    let transport = transport_for(&server.uri());
    let result: Result<serde_json::Value> = transport.get("/user/ghost/about.json", &[]).await;

    assert!(matches!(result, Err(Error::NotFound(_))));
  }

  #[tokio::test]
  async fn test_get_maps_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
      .expect(1)
      .mount(&server)
      .await;

    let transport = transport_for(&server.uri());
    let result: Result<serde_json::Value> = transport.get("/r/test/new.json", &[]).await;

    assert!(matches!(result, Err(Error::RateLimited { retry_after: 30 })));
  }

  #[tokio::test]
  async fn test_get_reports_parse_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
      .mount(&server)
      .await;

    let transport = transport_for(&server.uri());
    let result: Result<serde_json::Value> = transport.get("/r/test/new.json", &[]).await;

    assert!(matches!(result, Err(Error::Parse(_))));
    assert_eq!(transport.calls(), 1);
  }
}
