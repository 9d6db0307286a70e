//! # rsc-client
//!
//! Client for the public (unauthenticated) Reddit JSON API.
//!
//! ## Features
//!
//! - **Rate Limiting**: a governor quota shared by all endpoints
//! - **Retries**: transport failures and 5xx answers are retried with backoff
//! - **Typed Errors**: 404 and 429 surface as `Error::NotFound` and `Error::RateLimited`
//! - **Typed Responses**: documents deserialize into `rsc-models` types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rsc_client::RedditClient;
//! use rsc_core::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RedditClient::new(Config::from_env()?)?;
//!     let about = client.subreddit().about("stocks").await?;
//!     println!("{} subscribers", about.subscribers.unwrap_or_default());
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod client;
pub mod endpoints;
pub mod transport;

pub use client::RedditClient;
pub use rsc_core::{Config, Error, Result};

pub use endpoints::{
  comments::CommentEndpoints, subreddit::SubredditEndpoints, users::UserEndpoints,
};
