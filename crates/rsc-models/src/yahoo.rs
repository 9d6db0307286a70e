//! Yahoo Finance chart endpoint, used as an existence check for symbols

use serde::{Deserialize, Serialize};

/// `GET /v8/finance/chart/{symbol}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResponse {
  pub chart: Chart,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chart {
  #[serde(default)]
  pub result: Option<Vec<ChartResult>>,

  #[serde(default)]
  pub error: Option<ChartError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResult {
  pub meta: ChartMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
  pub symbol: String,

  #[serde(default)]
  pub currency: Option<String>,

  #[serde(default)]
  pub exchange_name: Option<String>,

  #[serde(default)]
  pub instrument_type: Option<String>,

  #[serde(default)]
  pub regular_market_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartError {
  pub code: String,

  #[serde(default)]
  pub description: Option<String>,
}

impl ChartResponse {
  /// True when the symbol resolved to an instrument with a market price
  pub fn has_quote(&self) -> bool {
    self.chart.error.is_none()
      && self
        .chart
        .result
        .as_deref()
        .is_some_and(|results| results.iter().any(|r| r.meta.regular_market_price.is_some()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_chart_with_price() {
    let body = r#"{"chart": {"result": [{"meta": {"symbol": "AAPL", "currency": "USD",
      "exchangeName": "NMS", "instrumentType": "EQUITY", "regularMarketPrice": 227.5},
      "timestamp": [1], "indicators": {}}], "error": null}}"#;
    let response: ChartResponse = serde_json::from_str(body).unwrap();
    assert!(response.has_quote());
  }

  #[test]
  fn test_chart_not_found() {
    let body = r#"{"chart": {"result": null, "error": {"code": "Not Found",
      "description": "No data found, symbol may be delisted"}}}"#;
    let response: ChartResponse = serde_json::from_str(body).unwrap();
    assert!(!response.has_quote());
  }

  #[test]
  fn test_chart_empty_result() {
    let response: ChartResponse =
      serde_json::from_str(r#"{"chart": {"result": [], "error": null}}"#).unwrap();
    assert!(!response.has_quote());
  }
}
