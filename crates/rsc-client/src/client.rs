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

use crate::endpoints::{
  comments::CommentEndpoints, subreddit::SubredditEndpoints, users::UserEndpoints,
  ClientRateLimiter,
};
use crate::transport::Transport;
use governor::{Quota, RateLimiter};
use rsc_core::{Config, Result};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Reddit API client
///
/// Groups the endpoints the crawler needs. Every request waits on a shared
/// rate limiter before it reaches the transport.
///
/// # Examples
///
/// ```ignore
/// use rsc_client::RedditClient;
/// use rsc_core::Config;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = RedditClient::new(Config::from_env()?)?;
///     let posts = client.subreddit().new_posts("wallstreetbets", 25).await?;
///     for post in posts {
///         let comments = client.comments().for_post(&post.id).await?;
///         println!("{}: {} comments", post.title, comments.len());
///     }
///     Ok(())
/// }
/// ```
pub struct RedditClient {
  rate_limiter: Arc<ClientRateLimiter>,
  transport: Arc<Transport>,
}

impl RedditClient {
  /// Create a new client
  ///
  /// # Errors
  ///
  /// Returns an error if the HTTP client cannot be created or the base URL is invalid.
  pub fn new(config: Config) -> Result<Self> {
    let rate_limit_value = NonZeroU32::new(config.rate_limit)
      .or(NonZeroU32::new(rsc_core::DEFAULT_RATE_LIMIT))
      .unwrap_or(NonZeroU32::MIN);
    let quota = Quota::per_minute(rate_limit_value);
    let rate_limiter = Arc::new(RateLimiter::direct(quota));

    let transport = Arc::new(Transport::new(&config)?);

    Ok(Self { transport, rate_limiter })
  }

  /// Create a new client with custom rate limiting
  pub fn with_rate_limiter(config: Config, rate_limiter: Arc<ClientRateLimiter>) -> Result<Self> {
    Ok(Self { transport: Arc::new(Transport::new(&config)?), rate_limiter })
  }

  /// Subreddit metadata and submission feeds
  pub fn subreddit(&self) -> SubredditEndpoints {
    SubredditEndpoints::new(self.transport.clone(), self.rate_limiter.clone())
  }

  /// Comment trees
  pub fn comments(&self) -> CommentEndpoints {
    CommentEndpoints::new(self.transport.clone(), self.rate_limiter.clone())
  }

  /// User profiles
  pub fn users(&self) -> UserEndpoints {
    UserEndpoints::new(self.transport.clone(), self.rate_limiter.clone())
  }

  /// HTTP requests sent so far
  pub fn api_calls(&self) -> u64 {
    self.transport.calls()
  }

  /// Wait for rate limit to allow next request
  pub async fn wait_for_rate_limit(&self) {
    self.rate_limiter.until_ready().await;
  }
}

impl std::fmt::Debug for RedditClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RedditClient")
      .field("transport", &self.transport)
      .field("rate_limiter", &"RateLimiter")
      .finish()
  }
}
