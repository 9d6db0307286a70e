//! Subreddit metadata and the "new" feed

use super::{impl_endpoint_base, ClientRateLimiter, EndpointBase};
use crate::transport::Transport;
use rsc_core::Result;
use rsc_models::reddit::{PostData, PostListing, SubredditData, Thing};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Reddit caps listing pages at 100 items
pub const MAX_PAGE_SIZE: usize = 100;

pub struct SubredditEndpoints {
  transport: Arc<Transport>,
  rate_limiter: Arc<ClientRateLimiter>,
}

impl_endpoint_base!(SubredditEndpoints);

impl SubredditEndpoints {
  pub fn new(transport: Arc<Transport>, rate_limiter: Arc<ClientRateLimiter>) -> Self {
    Self { transport, rate_limiter }
  }

  /// `/r/{name}/about.json`
  #[instrument(skip(self))]
  pub async fn about(&self, name: &str) -> Result<SubredditData> {
    self.wait_for_rate_limit().await;

    let about: Thing<SubredditData> =
      self.transport().get(&format!("/r/{}/about.json", name), &[]).await?;
    Ok(about.data)
  }

  /// Newest `limit` submissions, following the `after` cursor across pages
  #[instrument(skip(self))]
  pub async fn new_posts(&self, name: &str, limit: usize) -> Result<Vec<PostData>> {
    let path = format!("/r/{}/new.json", name);
    let mut posts = Vec::with_capacity(limit);
    let mut after: Option<String> = None;

    while posts.len() < limit {
      self.wait_for_rate_limit().await;

      let page_size = (limit - posts.len()).min(MAX_PAGE_SIZE);
      let mut params = vec![("limit", page_size.to_string())];
      if let Some(cursor) = &after {
        params.push(("after", cursor.clone()));
      }

      let listing: PostListing = self.transport().get(&path, &params).await?;
      after = listing.data.after.clone();
      let page = listing.into_items();
      debug!("Fetched {} posts from r/{}", page.len(), name);

      if page.is_empty() {
        break;
      }
      posts.extend(page);

      if after.is_none() {
        break;
      }
    }

    posts.truncate(limit);
    Ok(posts)
  }
}
