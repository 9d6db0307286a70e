//! The set of symbols a crawl is allowed to count.

use crate::symbol::TickerSymbol;
use std::collections::BTreeSet;

/// Upper-case symbols, kept sorted so that writing the set out is deterministic.
///
/// The set does not validate what it holds. [`Whitelist::insert_symbol`] takes
/// a [`TickerSymbol`] that already passed the normalizer; the string entry
/// points only trim and upper-case, for symbols that were checked elsewhere
/// (stored tickers, or whitelist files filtered on load).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
  symbols: BTreeSet<String>,
}

impl Whitelist {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert a normalized symbol as is. Returns false if it was already present.
  pub fn insert_symbol(&mut self, symbol: TickerSymbol) -> bool {
    self.symbols.insert(symbol.into_inner())
  }

  /// Insert a symbol, upper-casing it. Returns false if it was already present.
  pub fn insert(&mut self, symbol: impl AsRef<str>) -> bool {
    self.symbols.insert(symbol.as_ref().trim().to_uppercase())
  }

  pub fn contains(&self, symbol: &str) -> bool {
    self.symbols.contains(symbol)
  }

  /// Merge another whitelist into this one
  pub fn merge(&mut self, other: Whitelist) {
    self.symbols.extend(other.symbols);
  }

  pub fn len(&self) -> usize {
    self.symbols.len()
  }

  pub fn is_empty(&self) -> bool {
    self.symbols.is_empty()
  }

  /// Symbols in ascending order
  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.symbols.iter().map(String::as_str)
  }
}

impl<S: AsRef<str>> FromIterator<S> for Whitelist {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    let mut whitelist = Whitelist::new();
    for symbol in iter {
      whitelist.insert(symbol);
    }
    whitelist
  }
}

impl<S: AsRef<str>> Extend<S> for Whitelist {
  fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
    for symbol in iter {
      self.insert(symbol);
    }
  }
}

impl From<BTreeSet<TickerSymbol>> for Whitelist {
  fn from(symbols: BTreeSet<TickerSymbol>) -> Self {
    Self { symbols: symbols.into_iter().map(TickerSymbol::into_inner).collect() }
  }
}

impl IntoIterator for Whitelist {
  type Item = String;
  type IntoIter = std::collections::btree_set::IntoIter<String>;

  fn into_iter(self) -> Self::IntoIter {
    self.symbols.into_iter()
  }
}
