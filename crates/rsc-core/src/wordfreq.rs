//! English word frequencies on the Zipf scale.
//!
//! A Zipf value is `log10` of how often a word appears per billion words:
//! "the" sits near 7.7, everyday words are above 4, rare words below 3.
//! Unknown words score 0.0.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;

const BUILTIN_TABLE: &str = include_str!("../data/en_common_words.txt");

#[derive(Debug, Clone, Default)]
pub struct WordFrequencyTable {
  zipf: HashMap<String, f64>,
}

impl WordFrequencyTable {
  /// Table bundled with the crate
  pub fn builtin() -> Self {
    Self::parse(BUILTIN_TABLE).unwrap_or_default()
  }

  /// Load a table from a `word zipf` per line file. `#` starts a comment.
  pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
    let contents = std::fs::read_to_string(path)?;
    Self::parse(&contents)
  }

  pub fn parse(contents: &str) -> Result<Self> {
    let mut zipf = HashMap::new();

    for (idx, raw) in contents.lines().enumerate() {
      let line = raw.split('#').next().unwrap_or("").trim();
      if line.is_empty() {
        continue;
      }

      let mut parts = line.split_whitespace();
      let (Some(word), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::Parse(format!("line {}: expected `word zipf`, got {:?}", idx + 1, raw)));
      };

      let value: f64 = value
        .parse()
        .map_err(|_| Error::Parse(format!("line {}: bad zipf value {:?}", idx + 1, value)))?;

      zipf.insert(word.to_lowercase(), value);
    }

    Ok(Self { zipf })
  }

  /// Zipf frequency of `word`, case-insensitive
  pub fn zipf(&self, word: &str) -> f64 {
    self.zipf.get(&word.to_lowercase()).copied().unwrap_or(0.0)
  }

  pub fn len(&self) -> usize {
    self.zipf.len()
  }

  pub fn is_empty(&self) -> bool {
    self.zipf.is_empty()
  }
}

impl<S: Into<String>> FromIterator<(S, f64)> for WordFrequencyTable {
  fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
    Self { zipf: iter.into_iter().map(|(w, z)| (w.into().to_lowercase(), z)).collect() }
  }
}
