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

//! Ticker mention extraction from post and comment text.

use crate::lexicon;
use crate::whitelist::Whitelist;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Optional cashtag followed by 1-5 capitals on word boundaries. Group 1 is the symbol.
static TICKER_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\b\$?([A-Z]{1,5})\b").unwrap());

/// A whitelisted ticker found in a piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerMatch {
  pub symbol: String,
  /// Byte offset of the symbol in the upper-cased text
  pub offset: usize,
}

#[derive(Debug, Clone)]
pub struct MentionExtractor {
  pattern: Regex,
  ambiguous: HashSet<String>,
}

impl Default for MentionExtractor {
  fn default() -> Self {
    Self::new(lexicon::AMBIGUOUS.iter().copied())
  }
}

impl MentionExtractor {
  /// Extractor with the stock pattern and the given ambiguous-word list
  pub fn new<I, S>(ambiguous: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    Self::with_pattern(TICKER_PATTERN.clone(), ambiguous)
  }

  /// Extractor with a custom pattern. Capture group 1 is used when present,
  /// the whole match otherwise.
  pub fn with_pattern<I, S>(pattern: Regex, ambiguous: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let ambiguous = ambiguous.into_iter().map(|s| s.as_ref().to_uppercase()).collect();
    Self { pattern, ambiguous }
  }

  /// Every token the pattern picks up, before any filtering
  pub fn candidates(&self, text: &str) -> Vec<String> {
    let upper = text.to_uppercase();
    self
      .pattern
      .captures_iter(&upper)
      .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
      .map(|m| m.as_str().to_string())
      .collect()
  }

  /// Whitelisted, unambiguous tickers with their offsets, in text order.
  /// Repeats are kept: "AAPL AAPL" is two mentions.
  pub fn find(&self, text: &str, whitelist: &Whitelist) -> Vec<TickerMatch> {
    let upper = text.to_uppercase();
    self
      .pattern
      .captures_iter(&upper)
      .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
      .filter(|m| whitelist.contains(m.as_str()) && !self.ambiguous.contains(m.as_str()))
      .map(|m| TickerMatch { symbol: m.as_str().to_string(), offset: m.start() })
      .collect()
  }

  /// Symbols only, see [`MentionExtractor::find`]
  pub fn extract(&self, text: &str, whitelist: &Whitelist) -> Vec<String> {
    self.find(text, whitelist).into_iter().map(|m| m.symbol).collect()
  }

  pub fn is_ambiguous(&self, token: &str) -> bool {
    self.ambiguous.contains(token)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn whitelist(symbols: &[&str]) -> Whitelist {
    symbols.iter().collect()
  }

  #[test]
  fn test_extract_cashtag_and_plain() {
    let extractor = MentionExtractor::default();
    let found = extractor.extract("Buy $AAPL or go all-in on TSLA!", &whitelist(&["AAPL", "TSLA"]));
    assert_eq!(found, vec!["AAPL", "TSLA"]);
  }

  #[test]
  fn test_long_words_yield_no_candidates() {
    let extractor = MentionExtractor::default();
    assert!(extractor.candidates("BANANAS").is_empty());
    assert!(extractor.extract("BANANAS", &whitelist(&["BANAN", "BANANAS"])).is_empty());
  }

  #[test]
  fn test_text_is_upper_cased_first() {
    let extractor = MentionExtractor::default();
    assert_eq!(extractor.extract("gme to the moon", &whitelist(&["GME"])), vec!["GME"]);
  }

  #[test]
  fn test_duplicates_and_order_preserved() {
    let extractor = MentionExtractor::default();
    let found = extractor.extract("TSLA AAPL TSLA", &whitelist(&["AAPL", "TSLA"]));
    assert_eq!(found, vec!["TSLA", "AAPL", "TSLA"]);
  }

  #[test]
  fn test_never_returns_unlisted_or_ambiguous_tokens() {
    let extractor = MentionExtractor::default();
    let wl = whitelist(&["ON", "AI", "NVDA", "F"]);
    let text = "Now ON sale: AI chips from NVDA, F is fine, XYZ is not listed";
    let found = extractor.extract(text, &wl);
    assert_eq!(found, vec!["NVDA"]);
    for symbol in &found {
      assert!(wl.contains(symbol));
      assert!(!extractor.is_ambiguous(symbol));
    }
  }

  #[test]
  fn test_offsets_point_into_upper_cased_text() {
    let extractor = MentionExtractor::default();
    let text = "buy $amd now";
    let matches = extractor.find(text, &whitelist(&["AMD"]));
    assert_eq!(matches, vec![TickerMatch { symbol: "AMD".to_string(), offset: 5 }]);
    assert_eq!(&text.to_uppercase()[5..8], "AMD");
  }

  #[test]
  fn test_custom_ambiguous_list() {
    let extractor = MentionExtractor::new(["gme"]);
    assert!(extractor.extract("GME GME", &whitelist(&["GME"])).is_empty());
    // the default list no longer applies
    assert_eq!(extractor.extract("ON", &whitelist(&["ON"])), vec!["ON"]);
  }

  #[test]
  fn test_custom_pattern_without_groups() {
    let extractor = MentionExtractor::with_pattern(Regex::new(r"\$[A-Z]+").unwrap(), Vec::<String>::new());
    assert_eq!(extractor.candidates("$abc and def"), vec!["$ABC"]);
  }

  #[test]
  fn test_word_boundaries() {
    let extractor = MentionExtractor::default();
    let wl = whitelist(&["AAPL"]);
    assert!(extractor.extract("AAPLE", &wl).is_empty());
    assert!(extractor.extract("XAAPL", &wl).is_empty());
    assert_eq!(extractor.extract("(AAPL)", &wl), vec!["AAPL"]);
    assert_eq!(extractor.extract("AAPL's earnings", &wl), vec!["AAPL"]);
  }
}
