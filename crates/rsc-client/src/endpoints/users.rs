//! Redditor profiles

use super::{impl_endpoint_base, ClientRateLimiter, EndpointBase};
use crate::transport::Transport;
use rsc_core::Result;
use rsc_models::reddit::{Thing, UserData};
use std::sync::Arc;
use tracing::instrument;

pub struct UserEndpoints {
  transport: Arc<Transport>,
  rate_limiter: Arc<ClientRateLimiter>,
}

impl_endpoint_base!(UserEndpoints);

impl UserEndpoints {
  pub fn new(transport: Arc<Transport>, rate_limiter: Arc<ClientRateLimiter>) -> Self {
    Self { transport, rate_limiter }
  }

  /// `/user/{name}/about.json`. Deleted accounts come back as `Error::NotFound`.
  #[instrument(skip(self))]
  pub async fn about(&self, name: &str) -> Result<UserData> {
    self.wait_for_rate_limit().await;

    let about: Thing<UserData> =
      self.transport().get(&format!("/user/{}/about.json", name), &[]).await?;
    Ok(about.data)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::endpoints::test_support::parts;
  use rsc_core::Error;
  use serde_json::json;
  use wiremock::matchers::{method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  #[tokio::test]
  async fn test_about_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/user/alice/about.json"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "kind": "t2",
        "data": {"name": "alice", "link_karma": 120, "comment_karma": 4500, "created_utc": 1.5e9}
      })))
      .mount(&server)
      .await;
    Mock::given(method("GET"))
      .and(path("/user/ghost/about.json"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&server)
      .await;

    let (transport, limiter) = parts(&server.uri());
    let users = UserEndpoints::new(transport, limiter);

    let alice = users.about("alice").await.unwrap();
    assert_eq!(alice.link_karma, Some(120));

    assert!(matches!(users.about("ghost").await, Err(Error::NotFound(_))));
  }
}
