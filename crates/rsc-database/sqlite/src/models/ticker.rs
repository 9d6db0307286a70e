//! Known ticker symbols

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::tickers;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = tickers)]
#[diesel(primary_key(symbol))]
pub struct Ticker {
  pub symbol: String,
  pub company_name: Option<String>,
  pub sector: Option<String>,
  pub industry: Option<String>,
  pub active: bool,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = tickers)]
pub struct NewTicker<'a> {
  pub symbol: &'a str,
  pub company_name: Option<&'a str>,
  pub sector: Option<&'a str>,
  pub industry: Option<&'a str>,
  pub active: bool,
}

/// Seed rows so a fresh database has something to match against
pub const SAMPLE_TICKERS: &[NewTicker<'static>] = &[
  NewTicker {
    symbol: "AAPL",
    company_name: Some("Apple Inc."),
    sector: Some("Technology"),
    industry: Some("Consumer Electronics"),
    active: true,
  },
  NewTicker {
    symbol: "TSLA",
    company_name: Some("Tesla Inc."),
    sector: Some("Automotive"),
    industry: Some("Auto Manufacturers"),
    active: true,
  },
];

impl Ticker {
  /// Insert the given tickers unless a row for the symbol exists
  pub fn ensure(
    conn: &mut SqliteConnection,
    new_tickers: &[NewTicker<'_>],
  ) -> Result<usize, diesel::result::Error> {
    let mut inserted = 0;
    for ticker in new_tickers {
      inserted +=
        diesel::insert_into(tickers::table).values(ticker).on_conflict_do_nothing().execute(conn)?;
    }
    Ok(inserted)
  }

  pub fn active_symbols(conn: &mut SqliteConnection) -> Result<Vec<String>, diesel::result::Error> {
    tickers::table
      .filter(tickers::active.eq(true))
      .order(tickers::symbol.asc())
      .select(tickers::symbol)
      .load(conn)
  }

  pub fn find(conn: &mut SqliteConnection, symbol: &str) -> Result<Option<Self>, diesel::result::Error> {
    tickers::table.find(symbol).select(Ticker::as_select()).first(conn).optional()
  }

  pub fn set_active(
    conn: &mut SqliteConnection,
    symbol: &str,
    active: bool,
  ) -> Result<usize, diesel::result::Error> {
    diesel::update(tickers::table.find(symbol)).set(tickers::active.eq(active)).execute(conn)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::connection::establish_in_memory_connection;

  #[test]
  fn test_sample_tickers_are_active() {
    let mut conn = establish_in_memory_connection().unwrap();
    assert_eq!(Ticker::ensure(&mut conn, SAMPLE_TICKERS).unwrap(), 2);
    assert_eq!(Ticker::ensure(&mut conn, SAMPLE_TICKERS).unwrap(), 0);

    assert_eq!(Ticker::active_symbols(&mut conn).unwrap(), vec!["AAPL", "TSLA"]);
    let apple = Ticker::find(&mut conn, "AAPL").unwrap().unwrap();
    assert_eq!(apple.company_name.as_deref(), Some("Apple Inc."));
  }

  #[test]
  fn test_ensure_keeps_existing_rows() {
    let mut conn = establish_in_memory_connection().unwrap();
    Ticker::ensure(&mut conn, SAMPLE_TICKERS).unwrap();
    Ticker::set_active(&mut conn, "TSLA", false).unwrap();

    Ticker::ensure(&mut conn, SAMPLE_TICKERS).unwrap();
    assert_eq!(Ticker::active_symbols(&mut conn).unwrap(), vec!["AAPL"]);
  }
}
