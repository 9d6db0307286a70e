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

//! Ticker symbol normalization.
//!
//! Raw listing entries arrive in every shape: lower case, padded, with
//! exchange suffixes already stripped or not, with `.` or `/` share classes.
//! [`SymbolNormalizer::normalize`] turns one entry into a canonical
//! [`TickerSymbol`] or says why it was rejected.

use crate::lexicon;
use crate::wordfreq::WordFrequencyTable;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Canonical ticker: upper-case ASCII letters, optionally `BASE/C` for a share class
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickerSymbol(String);

impl TickerSymbol {
  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }

  pub fn has_share_class(&self) -> bool {
    self.0.contains('/')
  }
}

impl fmt::Display for TickerSymbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl AsRef<str> for TickerSymbol {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl Borrow<str> for TickerSymbol {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl From<TickerSymbol> for String {
  fn from(symbol: TickerSymbol) -> Self {
    symbol.0
  }
}

/// Why a raw entry did not make it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Rejection {
  #[error("empty symbol")]
  Empty,

  #[error("single letter not in keep-list")]
  SingleLetter,

  #[error("malformed share class")]
  ShareClass,

  #[error("length outside 2..=5")]
  Length,

  #[error("non-alphabetic characters")]
  NonAlphabetic,

  #[error("manual stop word")]
  StopWord,

  #[error("common English word")]
  CommonWord,
}

/// Lists and thresholds the normalizer checks against
#[derive(Debug, Clone)]
pub struct SymbolRules {
  /// Single letters that are accepted as-is
  pub keep_single: HashSet<String>,

  /// Upper-case entries that are always rejected
  pub manual_stop: HashSet<String>,

  /// English frequency table used for the common-word check
  pub word_freq: WordFrequencyTable,

  /// Zipf score above which an entry counts as an English word
  pub common_word_threshold: f64,
}

impl Default for SymbolRules {
  fn default() -> Self {
    Self {
      keep_single: lexicon::KEEP_SINGLE.iter().map(|s| s.to_string()).collect(),
      manual_stop: lexicon::MANUAL_STOP.iter().map(|s| s.to_string()).collect(),
      word_freq: WordFrequencyTable::builtin(),
      common_word_threshold: lexicon::COMMON_WORD_THRESHOLD,
    }
  }
}

impl SymbolRules {
  pub fn with_word_freq(mut self, word_freq: WordFrequencyTable) -> Self {
    self.word_freq = word_freq;
    self
  }

  pub fn with_threshold(mut self, threshold: f64) -> Self {
    self.common_word_threshold = threshold;
    self
  }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolNormalizer {
  rules: SymbolRules,
}

impl SymbolNormalizer {
  pub fn new(rules: SymbolRules) -> Self {
    Self { rules }
  }

  pub fn rules(&self) -> &SymbolRules {
    &self.rules
  }

  /// Normalize one raw listing entry.
  ///
  /// Single letters and share classes are decided on shape alone; the stop
  /// list and the common-word check only apply to plain 2–5 letter symbols.
  pub fn normalize(&self, raw: &str) -> Result<TickerSymbol, Rejection> {
    let s = raw.trim().to_uppercase().replace('.', "/");

    if s.is_empty() {
      return Err(Rejection::Empty);
    }

    if s.chars().count() == 1 {
      return if self.rules.keep_single.contains(&s) {
        Ok(TickerSymbol(s))
      } else {
        Err(Rejection::SingleLetter)
      };
    }

    if s.contains('/') {
      return match s.split_once('/') {
        Some((left, right))
          if (1..=4).contains(&left.len())
            && is_ascii_letters(left)
            && right.len() == 1
            && is_ascii_letters(right) =>
        {
          Ok(TickerSymbol(s))
        }
        _ => Err(Rejection::ShareClass),
      };
    }

    if !(2..=crate::MAX_SYMBOL_LEN).contains(&s.chars().count()) {
      return Err(Rejection::Length);
    }
    if !is_ascii_letters(&s) {
      return Err(Rejection::NonAlphabetic);
    }
    if self.rules.manual_stop.contains(&s) {
      return Err(Rejection::StopWord);
    }
    if self.rules.word_freq.zipf(&s.to_lowercase()) > self.rules.common_word_threshold {
      return Err(Rejection::CommonWord);
    }

    Ok(TickerSymbol(s))
  }

  pub fn is_valid(&self, raw: &str) -> bool {
    self.normalize(raw).is_ok()
  }
}

fn is_ascii_letters(s: &str) -> bool {
  !s.is_empty() && s.bytes().all(|b| b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn normalizer() -> SymbolNormalizer {
    SymbolNormalizer::default()
  }

  #[test]
  fn test_trims_and_upper_cases() {
    let n = normalizer();
    assert_eq!(n.normalize("  aapl ").unwrap().as_str(), "AAPL");
    assert_eq!(n.normalize("Nvda").unwrap().to_string(), "NVDA");
  }

  #[test]
  fn test_empty_input() {
    assert_eq!(normalizer().normalize("   "), Err(Rejection::Empty));
  }

  #[test]
  fn test_single_letters_only_from_keep_list() {
    let n = normalizer();
    for letter in ('A'..='Z').map(|c| c.to_string()) {
      let expected = ["F", "T", "O", "K"].contains(&letter.as_str());
      assert_eq!(n.is_valid(&letter), expected, "letter {letter}");
    }
    assert_eq!(n.normalize("x"), Err(Rejection::SingleLetter));
    assert_eq!(n.normalize("f").unwrap().as_str(), "F");
  }

  #[test]
  fn test_dot_share_class_becomes_slash() {
    let symbol = normalizer().normalize("brk.b").unwrap();
    assert_eq!(symbol.as_str(), "BRK/B");
    assert!(symbol.has_share_class());
  }

  #[test]
  fn test_share_class_shape() {
    let n = normalizer();
    assert!(n.is_valid("BF/B"));
    assert!(n.is_valid("A/B"));
    assert!(n.is_valid("GOOG/A"));
    assert_eq!(n.normalize("ABCDE/B"), Err(Rejection::ShareClass));
    assert_eq!(n.normalize("BRK/BB"), Err(Rejection::ShareClass));
    assert_eq!(n.normalize("BRK/"), Err(Rejection::ShareClass));
    assert_eq!(n.normalize("/B"), Err(Rejection::ShareClass));
    assert_eq!(n.normalize("A/B/C"), Err(Rejection::ShareClass));
    assert_eq!(n.normalize("B1/A"), Err(Rejection::ShareClass));
  }

  #[test]
  fn test_length_and_alphabet() {
    let n = normalizer();
    assert_eq!(n.normalize("GOOGLE"), Err(Rejection::Length));
    assert_eq!(n.normalize("ABC1"), Err(Rejection::NonAlphabetic));
    assert_eq!(n.normalize("AB-C"), Err(Rejection::NonAlphabetic));
    assert!(n.is_valid("GME"));
    assert!(n.is_valid("PLTR"));
  }

  #[test]
  fn test_manual_stop_words() {
    let n = normalizer();
    for word in ["MOON", "YOLO", "DD", "CEO", "buy"] {
      assert_eq!(n.normalize(word), Err(Rejection::StopWord), "{word}");
    }
  }

  #[test]
  fn test_common_english_words() {
    let n = normalizer();
    for word in ["THE", "WITH", "YOU", "HAVE", "ABOUT"] {
      assert_eq!(n.normalize(word), Err(Rejection::CommonWord), "{word}");
    }
  }

  #[test]
  fn test_everyday_words_are_common_words() {
    let n = normalizer();
    for word in ["BEST", "NEWS", "FUN", "YEARS", "KIDS", "WORDS", "BABY", "AREA", "SHALL"] {
      assert_eq!(n.normalize(word), Err(Rejection::CommonWord), "{word}");
    }
    for ticker in ["GME", "PLTR", "NVDA", "TSLA", "AMD"] {
      assert!(n.is_valid(ticker), "{ticker}");
    }
  }

  #[test]
  fn test_threshold_is_strict() {
    let table: WordFrequencyTable = [("edge", 4.0), ("over", 4.01)].into_iter().collect();
    let n = SymbolNormalizer::new(SymbolRules::default().with_word_freq(table));
    assert!(n.is_valid("EDGE"));
    assert_eq!(n.normalize("OVER"), Err(Rejection::CommonWord));
  }

  #[test]
  fn test_custom_rules() {
    let rules = SymbolRules {
      keep_single: HashSet::from(["X".to_string()]),
      manual_stop: HashSet::from(["AAPL".to_string()]),
      word_freq: WordFrequencyTable::default(),
      common_word_threshold: 4.0,
    };
    let n = SymbolNormalizer::new(rules);
    assert!(n.is_valid("X"));
    assert!(!n.is_valid("F"));
    assert_eq!(n.normalize("AAPL"), Err(Rejection::StopWord));
    // without a frequency table nothing is a common word
    assert!(n.is_valid("THE"));
  }

  #[test]
  fn test_rejection_display() {
    assert_eq!(Rejection::CommonWord.to_string(), "common English word");
  }
}
