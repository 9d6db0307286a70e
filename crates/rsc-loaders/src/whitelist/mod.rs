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

//! Whitelist Builder
//!
//! Pulls raw symbols from the selected markets' sources, normalizes them,
//! optionally verifies them against a quote service and hands back the
//! resulting [`Whitelist`] with a [`BuildReport`].

pub mod html_table;
pub mod sources;
pub mod verify;

use crate::retry::RetryPolicy;
use crate::{LoaderError, LoaderResult};
use rayon::prelude::*;
use reqwest::Client;
use rsc_core::{Rejection, SymbolNormalizer, TickerSymbol, Whitelist};
use sources::{
  CoinGeckoSource, NasdaqScreenerSource, SourceEndpoints, WhitelistSource, WikipediaTableSource,
  BROWSER_USER_AGENT,
};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use verify::{verify_whitelist, SymbolVerifier, DEFAULT_VERIFY_WORKERS};

pub use sources::ColumnMatch;

/// Default `--markets`
pub const DEFAULT_MARKETS: &str = "us,de,cn";
pub const DEFAULT_TOP_CRYPTO: u32 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Market {
  Us,
  Germany,
  China,
  Crypto,
}

impl Market {
  pub fn parse(name: &str) -> Option<Self> {
    match name.trim().to_lowercase().as_str() {
      "us" => Some(Market::Us),
      "de" => Some(Market::Germany),
      "cn" => Some(Market::China),
      "crypto" => Some(Market::Crypto),
      _ => None,
    }
  }

  /// Parse a comma list. Unknown names are logged and skipped; duplicates collapse.
  pub fn parse_list(list: &str) -> Vec<Self> {
    let mut markets = BTreeSet::new();
    for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
      match Market::parse(name) {
        Some(market) => {
          markets.insert(market);
        }
        None => warn!("Unknown market '{}' ignored", name),
      }
    }
    markets.into_iter().collect()
  }

  /// Sources that make up this market
  pub fn sources(&self, endpoints: &SourceEndpoints, top_crypto: u32) -> Vec<Box<dyn WhitelistSource>> {
    match self {
      Market::Us => vec![
        Box::new(NasdaqScreenerSource::new(endpoints)),
        Box::new(WikipediaTableSource::sp500(endpoints)),
      ],
      Market::Germany => vec![Box::new(WikipediaTableSource::germany(endpoints))],
      Market::China => vec![Box::new(WikipediaTableSource::china_adr(endpoints))],
      Market::Crypto => vec![Box::new(CoinGeckoSource::new(endpoints, top_crypto))],
    }
  }
}

impl fmt::Display for Market {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Market::Us => "us",
      Market::Germany => "de",
      Market::China => "cn",
      Market::Crypto => "crypto",
    })
  }
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
  pub markets: Vec<Market>,
  pub top_crypto: u32,
  pub verify: bool,
  pub workers: usize,
  /// Fail the build when any single source fails
  pub strict: bool,
  pub show_progress: bool,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      markets: Market::parse_list(DEFAULT_MARKETS),
      top_crypto: DEFAULT_TOP_CRYPTO,
      verify: false,
      workers: DEFAULT_VERIFY_WORKERS,
      strict: false,
      show_progress: true,
    }
  }
}

/// What happened during a build
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
  pub succeeded_sources: Vec<String>,
  /// Source name and the final error
  pub failed_sources: Vec<(String, String)>,
  /// Distinct raw symbols across all sources
  pub raw_count: usize,
  pub rejected: HashMap<Rejection, usize>,
  pub normalized_count: usize,
  /// Set when verification ran: (kept, checked)
  pub verified: Option<(usize, usize)>,
  pub final_count: usize,
}

impl BuildReport {
  pub fn rejected_total(&self) -> usize {
    self.rejected.values().sum()
  }
}

pub struct WhitelistBuilder {
  client: Client,
  endpoints: SourceEndpoints,
  normalizer: SymbolNormalizer,
  retry: RetryPolicy,
  verifier: Option<Arc<dyn SymbolVerifier>>,
}

impl WhitelistBuilder {
  pub fn new(normalizer: SymbolNormalizer) -> LoaderResult<Self> {
    let client = Client::builder()
      .user_agent(BROWSER_USER_AGENT)
      .timeout(Duration::from_secs(30))
      .build()?;

    Ok(Self {
      client,
      endpoints: SourceEndpoints::default(),
      normalizer,
      retry: RetryPolicy::default(),
      verifier: None,
    })
  }

  pub fn with_endpoints(mut self, endpoints: SourceEndpoints) -> Self {
    self.endpoints = endpoints;
    self
  }

  pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
    self.retry = retry;
    self
  }

  pub fn with_verifier(mut self, verifier: Arc<dyn SymbolVerifier>) -> Self {
    self.verifier = Some(verifier);
    self
  }

  /// Build from the sources of the selected markets
  pub async fn build(&self, options: &BuildOptions) -> LoaderResult<(Whitelist, BuildReport)> {
    info!(
      "Markets: {}",
      options.markets.iter().map(Market::to_string).collect::<Vec<_>>().join(", ")
    );

    let sources: Vec<Box<dyn WhitelistSource>> = options
      .markets
      .iter()
      .flat_map(|market| market.sources(&self.endpoints, options.top_crypto))
      .collect();

    self.build_from_sources(&sources, options).await
  }

  /// Build from an explicit source list
  pub async fn build_from_sources(
    &self,
    sources: &[Box<dyn WhitelistSource>],
    options: &BuildOptions,
  ) -> LoaderResult<(Whitelist, BuildReport)> {
    if sources.is_empty() {
      return Err(LoaderError::ConfigurationError("no whitelist sources selected".to_string()));
    }

    let mut report = BuildReport::default();
    let mut raw: BTreeSet<String> = BTreeSet::new();

    for source in sources {
      let name = source.name().to_string();
      match self.retry.run(&name, || source.fetch(&self.client)).await {
        Ok(symbols) => {
          info!("{}: {} raw symbols", name, symbols.len());
          raw.extend(symbols);
          report.succeeded_sources.push(name);
        }
        Err(e) if options.strict => {
          error!("{} failed, aborting (strict): {}", name, e);
          return Err(e);
        }
        Err(e) => {
          error!("{} failed, continuing without it: {}", name, e);
          report.failed_sources.push((name, e.to_string()));
        }
      }
    }

    if report.succeeded_sources.is_empty() {
      return Err(LoaderError::InvalidData(format!(
        "all {} whitelist sources failed",
        report.failed_sources.len()
      )));
    }

    report.raw_count = raw.len();
    info!("Raw universe: {} symbols", report.raw_count);

    let (whitelist, rejected) = self.normalize_all(raw);
    report.rejected = rejected;
    report.normalized_count = whitelist.len();
    info!("{} symbols after cleaning ({} rejected)", whitelist.len(), report.rejected_total());

    let whitelist = if options.verify {
      let checked = whitelist.len();
      let verified = verify_whitelist(
        self.verifier.as_deref(),
        whitelist,
        options.workers,
        options.show_progress,
      )
      .await;
      report.verified = Some((verified.len(), checked));
      verified
    } else {
      whitelist
    };

    report.final_count = whitelist.len();
    Ok((whitelist, report))
  }

  /// Normalize in parallel, counting rejections by reason
  fn normalize_all(&self, raw: BTreeSet<String>) -> (Whitelist, HashMap<Rejection, usize>) {
    let results: Vec<Result<TickerSymbol, Rejection>> =
      raw.into_par_iter().map(|s| self.normalizer.normalize(&s)).collect();

    let mut whitelist = Whitelist::new();
    let mut rejected: HashMap<Rejection, usize> = HashMap::new();
    for result in results {
      match result {
        Ok(symbol) => {
          whitelist.insert_symbol(symbol);
        }
        Err(reason) => *rejected.entry(reason).or_default() += 1,
      }
    }
    (whitelist, rejected)
  }
}
