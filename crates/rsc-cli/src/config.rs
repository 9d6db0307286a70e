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

use anyhow::{Context, Result};
use rsc_core::Config as CoreConfig;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "reddit_stock.db";
pub const DEFAULT_TICKER_FILE: &str = "tickers_nasdaq.csv";
pub const DEFAULT_EXPORT_DIR: &str = "exports";

#[derive(Debug, Clone)]
pub struct Config {
  pub client_config: CoreConfig,
  pub database_url: String,
  pub ticker_file: PathBuf,
  pub export_dir: PathBuf,
  /// Replaces the built-in English frequency table when set
  pub word_freq_file: Option<PathBuf>,
}

impl Config {
  pub fn from_env() -> Result<Self> {
    let client_config = CoreConfig::from_env().context("Invalid forum client configuration")?;

    let database_url =
      env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let ticker_file =
      env::var("TICKER_FILE").unwrap_or_else(|_| DEFAULT_TICKER_FILE.to_string()).into();

    let export_dir = env::var("EXPORT_DIR").unwrap_or_else(|_| DEFAULT_EXPORT_DIR.to_string()).into();

    let word_freq_file = env::var("WORD_FREQ_FILE").ok().filter(|p| !p.is_empty()).map(PathBuf::from);

    Ok(Self { client_config, database_url, ticker_file, export_dir, word_freq_file })
  }

  /// `--db` wins over `DATABASE_URL`
  pub fn database_url<'a>(&'a self, flag: Option<&'a str>) -> &'a str {
    flag.unwrap_or(&self.database_url)
  }
}
