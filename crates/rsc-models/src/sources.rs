//! Responses from the listing services the whitelist is built from

use serde::{Deserialize, Serialize};

/// `GET https://api.nasdaq.com/api/screener/stocks?download=true`
#[derive(Debug, Clone, Deserialize)]
pub struct NasdaqScreenerResponse {
  #[serde(default)]
  pub data: Option<NasdaqScreenerData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NasdaqScreenerData {
  #[serde(default)]
  pub rows: Option<Vec<NasdaqScreenerRow>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NasdaqScreenerRow {
  pub symbol: String,

  #[serde(default)]
  pub name: Option<String>,

  #[serde(default)]
  pub country: Option<String>,

  #[serde(default)]
  pub sector: Option<String>,

  #[serde(default)]
  pub industry: Option<String>,
}

impl NasdaqScreenerResponse {
  /// Symbols of every row, empty when the payload has no table
  pub fn symbols(self) -> Vec<String> {
    self
      .data
      .and_then(|d| d.rows)
      .unwrap_or_default()
      .into_iter()
      .map(|row| row.symbol)
      .collect()
  }
}

/// One entry of CoinGecko `/coins/markets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinGeckoMarketCoin {
  pub id: String,
  pub symbol: String,
  pub name: String,

  #[serde(default)]
  pub market_cap: Option<f64>,

  #[serde(default)]
  pub market_cap_rank: Option<u32>,
}
