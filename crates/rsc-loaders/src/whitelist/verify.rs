//! Optional existence check of every symbol against a quote service

use super::sources::BROWSER_USER_AGENT;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use rsc_core::Whitelist;
use rsc_models::yahoo::ChartResponse;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_VERIFY_WORKERS: usize = 32;

#[async_trait]
pub trait SymbolVerifier: Send + Sync {
  fn name(&self) -> &str;

  /// Whether the service can be used at all
  async fn is_available(&self) -> bool;

  /// True iff the symbol resolves to a quoted instrument. Any failure is `false`.
  async fn verify(&self, symbol: &str) -> bool;
}

/// Yahoo Finance chart endpoint
#[derive(Debug, Clone)]
pub struct YahooVerifier {
  client: Client,
  base_url: String,
}

impl YahooVerifier {
  pub const DEFAULT_BASE_URL: &'static str = "https://query1.finance.yahoo.com";
  /// Symbol probed before a run to see whether the service answers
  pub const PROBE_SYMBOL: &'static str = "AAPL";

  pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
    let client = Client::builder()
      .user_agent(BROWSER_USER_AGENT)
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, base_url: base_url.into() })
  }

  /// Yahoo spells share classes with a dash: BRK/B -> BRK-B
  pub fn yahoo_symbol(symbol: &str) -> String {
    symbol.replace('/', "-")
  }

  async fn lookup(&self, symbol: &str) -> Result<ChartResponse, reqwest::Error> {
    let url = format!(
      "{}/v8/finance/chart/{}",
      self.base_url.trim_end_matches('/'),
      Self::yahoo_symbol(symbol)
    );
    self
      .client
      .get(url)
      .query(&[("range", "1d"), ("interval", "1d")])
      .send()
      .await?
      .error_for_status()?
      .json::<ChartResponse>()
      .await
  }
}

#[async_trait]
impl SymbolVerifier for YahooVerifier {
  fn name(&self) -> &str {
    "yahoo"
  }

  async fn is_available(&self) -> bool {
    match self.lookup(Self::PROBE_SYMBOL).await {
      Ok(_) => true,
      Err(e) => {
        warn!("Yahoo Finance probe failed: {}", e);
        false
      }
    }
  }

  async fn verify(&self, symbol: &str) -> bool {
    match self.lookup(symbol).await {
      Ok(response) => response.has_quote(),
      Err(e) => {
        debug!("{}: lookup failed: {}", symbol, e);
        false
      }
    }
  }
}

/// Keep the symbols the verifier confirms, `workers` lookups at a time.
/// Without a usable verifier the set is returned unchanged.
pub async fn verify_whitelist(
  verifier: Option<&dyn SymbolVerifier>,
  whitelist: Whitelist,
  workers: usize,
  show_progress: bool,
) -> Whitelist {
  let Some(verifier) = verifier else {
    warn!("No symbol verifier configured, skipping verification");
    return whitelist;
  };

  if !verifier.is_available().await {
    warn!("{} is not reachable, skipping verification", verifier.name());
    return whitelist;
  }

  let total = whitelist.len();
  let progress = if show_progress {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
      .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
    {
      pb.set_style(style.progress_chars("##-"));
    }
    pb.set_message("verifying");
    pb
  } else {
    ProgressBar::hidden()
  };

  let results: Vec<(String, bool)> = stream::iter(whitelist)
    .map(|symbol| {
      let progress = &progress;
      async move {
        let ok = verifier.verify(&symbol).await;
        progress.inc(1);
        (symbol, ok)
      }
    })
    .buffer_unordered(workers.max(1))
    .collect()
    .await;

  progress.finish_with_message("verification complete");

  let verified: Whitelist =
    results.into_iter().filter(|(_, ok)| *ok).map(|(symbol, _)| symbol).collect();
  info!("Verify: {} / {} symbols valid", verified.len(), total);
  verified
}
