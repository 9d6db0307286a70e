//! # rsc-models
//!
//! Data models for the JSON documents the crawler consumes.
//!
//! - [`reddit`]: subreddit, post, comment tree and user documents from the
//!   public Reddit JSON API
//! - [`sources`]: NASDAQ screener and CoinGecko market responses used to build
//!   the ticker whitelist
//! - [`yahoo`]: Yahoo Finance chart responses used to verify symbols
//!
//! ## Usage
//!
//! ```ignore
//! use rsc_models::reddit::PostListing;
//!
//! let listing: PostListing = serde_json::from_str(&body)?;
//! for post in listing.into_items() {
//!     println!("{} by {:?}", post.title, post.author());
//! }
//! ```

#![warn(clippy::all)]

pub mod reddit;
pub mod sources;
pub mod yahoo;

pub use reddit::*;
pub use sources::*;
pub use yahoo::*;
