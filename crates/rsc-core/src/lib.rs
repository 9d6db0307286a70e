//! # rsc-core
//!
//! Shared building blocks for the reddit stock crawler:
//!
//! - [`Config`] loaded from the environment
//! - the crate-wide [`Error`] type
//! - [`SymbolNormalizer`] which decides whether a raw listing entry is a usable ticker
//! - [`Whitelist`], the set of symbols a crawl is allowed to count
//! - [`MentionExtractor`] which pulls whitelisted tickers out of free text
//!
//! Everything in here is synchronous. Normalizing and extracting are pure;
//! [`Config::from_env`] reads the process environment (and a `.env` file) and
//! [`WordFrequencyTable::load`] reads a file from disk. Network and database
//! access live in the `rsc-client` and `rsc-database-sqlite` crates.

pub mod config;
pub mod error;
pub mod extract;
pub mod lexicon;
pub mod symbol;
pub mod whitelist;
pub mod wordfreq;

pub use config::Config;
pub use error::{Error, Result};
pub use extract::{MentionExtractor, TickerMatch};
pub use symbol::{Rejection, SymbolNormalizer, SymbolRules, TickerSymbol};
pub use whitelist::Whitelist;
pub use wordfreq::WordFrequencyTable;

/// Base URL for the public Reddit JSON API
pub const REDDIT_BASE_URL: &str = "https://www.reddit.com";

/// User agent sent with every forum request unless overridden
pub const DEFAULT_USER_AGENT: &str = "reddit_stock_crawler/1.0 (ticker mention counter)";

/// Forum request budget (requests per minute)
pub const DEFAULT_RATE_LIMIT: u32 = 30;

/// Longest symbol (without share class) accepted anywhere in the pipeline
pub const MAX_SYMBOL_LEN: usize = 5;
