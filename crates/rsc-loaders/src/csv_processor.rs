//! Whitelist file IO
//!
//! The builder writes a one-column CSV (`symbol` header, sorted). The crawler
//! reads it back tolerantly: the delimiter is sniffed from the header line and
//! only the first column is used, so hand-edited exports with extra columns
//! still load.

use crate::LoaderResult;
use csv::{ReaderBuilder, WriterBuilder};
use rsc_core::Whitelist;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

pub struct CsvProcessor;

impl Default for CsvProcessor {
  fn default() -> Self {
    Self::new()
  }
}

impl CsvProcessor {
  pub fn new() -> Self {
    Self
  }

  /// Read a whitelist file. A missing file is not an error: it logs a
  /// warning and yields an empty set.
  pub fn read_whitelist<P: AsRef<Path>>(&self, path: P) -> LoaderResult<Whitelist> {
    let path = path.as_ref();
    if !path.exists() {
      warn!("Ticker file {} not found, continuing without it", path.display());
      return Ok(Whitelist::new());
    }

    let delimiter = sniff_delimiter(path)?;
    let mut reader = ReaderBuilder::new()
      .delimiter(delimiter)
      .has_headers(true)
      .flexible(true)
      .from_reader(File::open(path)?);

    let mut whitelist = Whitelist::new();
    for result in reader.records() {
      let record = result?;
      if let Some(value) = record.get(0) {
        let symbol = value.trim().to_uppercase();
        if is_plain_symbol(&symbol) {
          whitelist.insert(symbol);
        }
      }
    }

    info!("Loaded {} symbols from {}", whitelist.len(), path.display());
    Ok(whitelist)
  }

  /// Write the whitelist sorted under a `symbol` header, creating parent directories
  pub fn write_whitelist<P: AsRef<Path>>(&self, whitelist: &Whitelist, path: P) -> LoaderResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(["symbol"])?;
    for symbol in whitelist.iter() {
      writer.write_record([symbol])?;
    }
    writer.flush()?;

    info!("Wrote {} symbols to {}", whitelist.len(), path.display());
    Ok(())
  }
}

/// Pick the candidate delimiter that occurs most often in the header line,
/// comma when none does
fn sniff_delimiter(path: &Path) -> LoaderResult<u8> {
  let mut header = String::new();
  BufReader::new(File::open(path)?).read_line(&mut header)?;

  Ok(
    CANDIDATE_DELIMITERS
      .iter()
      .map(|&d| (d, header.bytes().filter(|&b| b == d).count()))
      .filter(|&(_, count)| count > 0)
      .max_by_key(|&(_, count)| count)
      .map(|(d, _)| d)
      .unwrap_or(b','),
  )
}

/// 1-5 ASCII capitals
fn is_plain_symbol(s: &str) -> bool {
  (1..=rsc_core::MAX_SYMBOL_LEN).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
  }

  #[test]
  fn test_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let wl = CsvProcessor::new().read_whitelist(dir.path().join("nope.csv")).unwrap();
    assert!(wl.is_empty());
  }

  #[test]
  fn test_reads_first_column_and_filters() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
      dir.path(),
      "t.csv",
      "symbol,name\naapl,Apple\n TSLA ,Tesla\nBRK/B,Berkshire\nTOOLONG,x\nA1,x\n,empty\nF,Ford\n",
    );
    let wl = CsvProcessor::new().read_whitelist(&path).unwrap();
    assert_eq!(wl.iter().collect::<Vec<_>>(), vec!["AAPL", "F", "TSLA"]);
  }

  #[test]
  fn test_sniffs_semicolon_and_tab() {
    let dir = tempfile::tempdir().unwrap();
    let semi = write_file(dir.path(), "semi.csv", "Symbol;Name\nGME;GameStop\nAMC;AMC\n");
    let tab = write_file(dir.path(), "tab.csv", "Symbol\tName\nNVDA\tNvidia\n");

    let processor = CsvProcessor::new();
    assert_eq!(processor.read_whitelist(&semi).unwrap().len(), 2);
    assert!(processor.read_whitelist(&tab).unwrap().contains("NVDA"));
  }

  #[test]
  fn test_single_column_without_delimiter() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "one.csv", "symbol\nPLTR\n");
    assert_eq!(sniff_delimiter(&path).unwrap(), b',');
    assert!(CsvProcessor::new().read_whitelist(&path).unwrap().contains("PLTR"));
  }

  #[test]
  fn test_write_then_read_back_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/out/tickers.csv");
    let wl: Whitelist = ["TSLA", "AAPL", "BRK/B"].into_iter().collect();

    let processor = CsvProcessor::new();
    processor.write_whitelist(&wl, &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "symbol\nAAPL\nBRK/B\nTSLA\n");
  }
}
