//! Mention export to JSON lines and CSV

use crate::aggregate::day_bounds;
use crate::LoaderResult;
use chrono::NaiveDate;
use csv::WriterBuilder;
use diesel::sqlite::SqliteConnection;
use rsc_database_sqlite::models::mention::Mention;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const JSON_FILE: &str = "mentions.json";
pub const CSV_FILE: &str = "mentions.csv";

const COLUMNS: [&str; 8] =
  ["id", "symbol", "post_id", "comment_id", "source", "context", "position", "created_at"];

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
  pub rows: usize,
  pub json_path: PathBuf,
  pub csv_path: PathBuf,
}

/// Write the mentions of `day` (all mentions when `None`) to
/// `mentions.json` and `mentions.csv` under `out_dir`
pub fn export_mentions(
  conn: &mut SqliteConnection,
  out_dir: &Path,
  day: Option<NaiveDate>,
) -> LoaderResult<ExportSummary> {
  let mentions = match day {
    Some(day) => {
      let (from, to) = day_bounds(day)?;
      Mention::created_between(conn, from, to)?
    }
    None => Mention::all(conn)?,
  };

  fs::create_dir_all(out_dir)?;
  let json_path = out_dir.join(JSON_FILE);
  let csv_path = out_dir.join(CSV_FILE);

  write_json_lines(&mentions, &json_path)?;
  write_csv(&mentions, &csv_path)?;

  info!("Exported {} mentions to {}", mentions.len(), out_dir.display());
  Ok(ExportSummary { rows: mentions.len(), json_path, csv_path })
}

/// One JSON object per line
fn write_json_lines(mentions: &[Mention], path: &Path) -> LoaderResult<()> {
  let mut out = BufWriter::new(File::create(path)?);
  for mention in mentions {
    serde_json::to_writer(&mut out, mention)?;
    out.write_all(b"\n")?;
  }
  out.flush()?;
  Ok(())
}

/// Header row always present, also for an empty export
fn write_csv(mentions: &[Mention], path: &Path) -> LoaderResult<()> {
  let mut writer = WriterBuilder::new().from_path(path)?;
  writer.write_record(COLUMNS)?;
  for m in mentions {
    writer.write_record([
      m.id.to_string(),
      m.symbol.clone(),
      m.post_id.clone().unwrap_or_default(),
      m.comment_id.clone().unwrap_or_default(),
      m.source.clone(),
      m.context.clone().unwrap_or_default(),
      m.position.to_string(),
      m.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ])?;
  }
  writer.flush()?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::aggregate::tests::{at, day, seed_content};
  use rsc_database_sqlite::establish_in_memory_connection;
  use rsc_database_sqlite::models::mention::NewMention;

  #[test]
  fn test_export_writes_both_files() {
    let mut conn = establish_in_memory_connection().unwrap();
    seed_content(&mut conn);
    NewMention::for_post("TSLA", "p1", "TSLA, to the moon", 0, at(day(), 3)).insert(&mut conn).unwrap();
    NewMention::for_comment("GME", "c1", "GME", 4, at(day().pred_opt().unwrap(), 3))
      .insert(&mut conn)
      .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let summary = export_mentions(&mut conn, dir.path(), None).unwrap();
    assert_eq!(summary.rows, 2);

    let json = fs::read_to_string(&summary.json_path).unwrap();
    let lines: Vec<serde_json::Value> =
      json.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["symbol"], "TSLA");
    assert_eq!(lines[1]["comment_id"], "c1");

    let mut reader = csv::Reader::from_path(&summary.csv_path).unwrap();
    assert_eq!(reader.headers().unwrap().iter().collect::<Vec<_>>(), COLUMNS.to_vec());
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(&records[0][5], "TSLA, to the moon");
    assert_eq!(&records[1][4], "comment");
  }

  #[test]
  fn test_export_single_day_and_empty() {
    let mut conn = establish_in_memory_connection().unwrap();
    seed_content(&mut conn);
    NewMention::for_post("TSLA", "p1", "TSLA", 0, at(day(), 3)).insert(&mut conn).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("exports");

    assert_eq!(export_mentions(&mut conn, &out, Some(day())).unwrap().rows, 1);

    let empty = export_mentions(&mut conn, &out, day().succ_opt()).unwrap();
    assert_eq!(empty.rows, 0);
    assert_eq!(fs::read_to_string(&empty.csv_path).unwrap().lines().count(), 1);
    assert!(fs::read_to_string(&empty.json_path).unwrap().is_empty());
  }
}
