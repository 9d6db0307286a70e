//! Comment trees of single submissions

use super::{impl_endpoint_base, ClientRateLimiter, EndpointBase};
use crate::transport::Transport;
use rsc_core::Result;
use rsc_models::reddit::{CommentData, CommentListing, PostListing};
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct CommentEndpoints {
  transport: Arc<Transport>,
  rate_limiter: Arc<ClientRateLimiter>,
}

impl_endpoint_base!(CommentEndpoints);

impl CommentEndpoints {
  pub fn new(transport: Arc<Transport>, rate_limiter: Arc<ClientRateLimiter>) -> Self {
    Self { transport, rate_limiter }
  }

  /// Every comment Reddit returns inline for a post, flattened parents first.
  /// Collapsed "load more" branches are not expanded.
  #[instrument(skip(self))]
  pub async fn for_post(&self, post_id: &str) -> Result<Vec<CommentData>> {
    self.wait_for_rate_limit().await;

    let (_post, comments): (PostListing, CommentListing) = self
      .transport()
      .get(&format!("/comments/{}.json", post_id), &[("limit", "500".to_string())])
      .await?;

    let flat = comments.flatten();
    debug!("Post {} has {} loaded comments", post_id, flat.len());
    Ok(flat)
  }
}
