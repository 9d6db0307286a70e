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

//! # rsc-loaders
//!
//! The moving parts of the crawler:
//! - whitelist building from exchange listings, index tables and coin rankings
//! - the subreddit crawl that stores posts, comments and ticker mentions
//! - author enrichment
//! - daily rollups, alerts and exports

pub mod aggregate;
pub mod crawl;
pub mod csv_processor;
pub mod error;
pub mod export;
pub mod retry;
pub mod whitelist;

// Re-export commonly used types
pub use crawl::{
  enrich_authors, CrawlConfig, CrawlSummary, Crawler, EnrichConfig, EnrichSummary, ForumSource,
};
pub use csv_processor::CsvProcessor;
pub use error::{LoaderError, LoaderResult};
pub use export::{export_mentions, ExportSummary};
pub use retry::RetryPolicy;
pub use whitelist::{BuildOptions, BuildReport, Market, WhitelistBuilder};

pub mod prelude {
  pub use crate::{
    CrawlConfig, Crawler, CsvProcessor, ForumSource, LoaderError, LoaderResult, WhitelistBuilder,
  };
}
