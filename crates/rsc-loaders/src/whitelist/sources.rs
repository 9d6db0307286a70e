//! Listing sources the whitelist is assembled from

use super::html_table;
use crate::{LoaderError, LoaderResult};
use async_trait::async_trait;
use reqwest::Client;
use rsc_models::sources::{CoinGeckoMarketCoin, NasdaqScreenerResponse};
use tracing::{debug, info};

/// Listing sites reject the default reqwest agent
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
  (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Where each source lives. Tests point these at a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEndpoints {
  pub nasdaq_screener: String,
  pub wikipedia: String,
  pub coingecko: String,
}

impl Default for SourceEndpoints {
  fn default() -> Self {
    Self {
      nasdaq_screener: "https://api.nasdaq.com/api/screener/stocks".to_string(),
      wikipedia: "https://en.wikipedia.org".to_string(),
      coingecko: "https://api.coingecko.com/api/v3".to_string(),
    }
  }
}

impl SourceEndpoints {
  /// All sources below one base URL
  pub fn with_base(base: &str) -> Self {
    let base = base.trim_end_matches('/');
    Self {
      nasdaq_screener: format!("{}/api/screener/stocks", base),
      wikipedia: base.to_string(),
      coingecko: format!("{}/api/v3", base),
    }
  }

  pub fn wiki_page(&self, title: &str) -> String {
    format!("{}/wiki/{}", self.wikipedia.trim_end_matches('/'), title)
  }
}

/// One provider of raw symbols
#[async_trait]
pub trait WhitelistSource: Send + Sync {
  fn name(&self) -> &str;

  /// Raw symbols, unfiltered
  async fn fetch(&self, client: &Client) -> LoaderResult<Vec<String>>;
}

async fn get_text(client: &Client, url: &str) -> LoaderResult<String> {
  debug!("GET {}", url);
  let response = client.get(url).send().await?;
  let status = response.status();
  if !status.is_success() {
    return Err(LoaderError::ApiError(format!("HTTP {} for {}", status, url)));
  }
  Ok(response.text().await?)
}

// ===== NASDAQ screener =====
#[derive(Debug, Clone)]
pub struct NasdaqScreenerSource {
  url: String,
}

impl NasdaqScreenerSource {
  pub fn new(endpoints: &SourceEndpoints) -> Self {
    Self { url: endpoints.nasdaq_screener.clone() }
  }
}

#[async_trait]
impl WhitelistSource for NasdaqScreenerSource {
  fn name(&self) -> &str {
    "nasdaq"
  }

  async fn fetch(&self, client: &Client) -> LoaderResult<Vec<String>> {
    let body = get_text(client, &format!("{}?download=true", self.url)).await?;
    let response: NasdaqScreenerResponse = serde_json::from_str(&body)?;
    let symbols: Vec<String> = response.symbols().into_iter().map(|s| s.to_uppercase()).collect();
    if symbols.is_empty() {
      return Err(LoaderError::InvalidData("NASDAQ screener returned no rows".to_string()));
    }
    info!("NASDAQ screener: {} symbols", symbols.len());
    Ok(symbols)
  }
}

// ===== Wikipedia tables =====
/// Which header cells mark a ticker column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnMatch {
  /// Header equals the text, ignoring case
  Exact(&'static str),
  /// Header contains the text, ignoring case
  Contains(&'static str),
}

impl ColumnMatch {
  fn matches(&self, header: &str) -> bool {
    let header = header.to_lowercase();
    match self {
      ColumnMatch::Exact(name) => header == name.to_lowercase(),
      ColumnMatch::Contains(part) => header.contains(&part.to_lowercase()),
    }
  }
}

/// Ticker columns scraped from one or more Wikipedia pages
#[derive(Debug, Clone)]
pub struct WikipediaTableSource {
  name: String,
  pages: Vec<String>,
  column: ColumnMatch,
  first_table_only: bool,
  strip_suffix: Option<&'static str>,
}

impl WikipediaTableSource {
  /// S&P 500 constituents: the `Symbol` column of the first table
  pub fn sp500(endpoints: &SourceEndpoints) -> Self {
    Self {
      name: "sp500".to_string(),
      pages: vec![endpoints.wiki_page("List_of_S%26P_500_companies")],
      column: ColumnMatch::Exact("Symbol"),
      first_table_only: true,
      strip_suffix: None,
    }
  }

  /// DAX, MDAX, SDAX and TecDAX members, Xetra suffix removed
  pub fn germany(endpoints: &SourceEndpoints) -> Self {
    Self {
      name: "germany".to_string(),
      pages: ["DAX", "MDAX", "SDAX", "TecDAX"].iter().map(|p| endpoints.wiki_page(p)).collect(),
      column: ColumnMatch::Contains("ticker"),
      first_table_only: false,
      strip_suffix: Some(".DE"),
    }
  }

  /// Chinese companies listed in New York
  pub fn china_adr(endpoints: &SourceEndpoints) -> Self {
    Self {
      name: "china_adr".to_string(),
      pages: vec![
        endpoints.wiki_page("List_of_Chinese_companies_listed_on_the_Nasdaq"),
        endpoints.wiki_page("List_of_Chinese_companies_listed_on_the_New_York_Stock_Exchange"),
      ],
      column: ColumnMatch::Contains("ticker"),
      first_table_only: false,
      strip_suffix: None,
    }
  }

  /// Symbols found in one page's markup
  pub fn extract(&self, html: &str) -> Vec<String> {
    let tables = html_table::parse_tables(html);
    let take = if self.first_table_only { 1 } else { tables.len() };

    tables
      .iter()
      .take(take)
      .flat_map(|table| table.column_values(|h| self.column.matches(h)))
      .map(|value| {
        let upper = value.to_uppercase();
        match self.strip_suffix {
          Some(suffix) => upper.replace(suffix, ""),
          None => upper,
        }
      })
      .collect()
  }
}

#[async_trait]
impl WhitelistSource for WikipediaTableSource {
  fn name(&self) -> &str {
    &self.name
  }

  async fn fetch(&self, client: &Client) -> LoaderResult<Vec<String>> {
    let mut symbols = Vec::new();
    for page in &self.pages {
      info!("Loading {} ...", page);
      let html = get_text(client, page).await?;
      symbols.extend(self.extract(&html));
    }

    if symbols.is_empty() {
      return Err(LoaderError::InvalidData(format!("no ticker column found for {}", self.name)));
    }
    info!("{}: {} symbols", self.name, symbols.len());
    Ok(symbols)
  }
}

// ===== CoinGecko =====
/// Top coins by market capitalisation
#[derive(Debug, Clone)]
pub struct CoinGeckoSource {
  base_url: String,
  top: u32,
}

impl CoinGeckoSource {
  pub fn new(endpoints: &SourceEndpoints, top: u32) -> Self {
    Self { base_url: endpoints.coingecko.clone(), top }
  }
}

/// Alphabetic coin symbols of length 2-5, upper-cased
pub fn crypto_symbols(coins: &[CoinGeckoMarketCoin]) -> Vec<String> {
  coins
    .iter()
    .map(|coin| coin.symbol.as_str())
    .filter(|s| (2..=rsc_core::MAX_SYMBOL_LEN).contains(&s.chars().count()))
    .filter(|s| s.chars().all(char::is_alphabetic))
    .map(str::to_uppercase)
    .collect()
}

#[async_trait]
impl WhitelistSource for CoinGeckoSource {
  fn name(&self) -> &str {
    "coingecko"
  }

  async fn fetch(&self, client: &Client) -> LoaderResult<Vec<String>> {
    let url = format!(
      "{}/coins/markets?vs_currency=usd&order=market_cap_desc&sparkline=false&per_page={}&page=1",
      self.base_url.trim_end_matches('/'),
      self.top
    );
    let body = get_text(client, &url).await?;
    let coins: Vec<CoinGeckoMarketCoin> = serde_json::from_str(&body)?;
    let symbols = crypto_symbols(&coins);
    info!("CoinGecko: {} of {} coins usable", symbols.len(), coins.len());
    Ok(symbols)
  }
}
