use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use diesel::sqlite::SqliteConnection;
use rsc_database_sqlite::models::crawl_log::CrawlLog;
use rsc_loaders::aggregate::{growth, top_mentions, DEFAULT_MIN_MENTIONS, DEFAULT_TOP_N};
use rsc_loaders::crawl::today;
use tracing::info;

use crate::config::Config;

const BAR_WIDTH: usize = 30;

#[derive(Args, Debug)]
pub struct ReportArgs {
  /// SQLite database file (defaults to DATABASE_URL)
  #[arg(long)]
  db: Option<String>,

  /// Rows in the top mentions table
  #[arg(long, default_value_t = DEFAULT_TOP_N)]
  top: i64,

  /// Minimum mentions today for the growth table
  #[arg(long, default_value_t = DEFAULT_MIN_MENTIONS)]
  min_mentions: i32,

  /// Also list the latest N crawl runs
  #[arg(long, default_value_t = 0)]
  runs: i64,
}

pub fn execute(args: ReportArgs, config: Config) -> Result<()> {
  let mut conn = super::connect(config.database_url(args.db.as_deref()))?;
  print_report(&mut conn, today(), args.top, args.min_mentions)?;
  if args.runs > 0 {
    print_runs(&mut conn, args.runs)?;
  }
  Ok(())
}

/// Top mentions and biggest movers of `date`
pub fn print_report(
  conn: &mut SqliteConnection,
  date: NaiveDate,
  top: i64,
  min_mentions: i32,
) -> Result<()> {
  let rows = top_mentions(conn, date, top)?;
  if rows.is_empty() {
    info!("No mention data for {}", date);
  } else {
    let max = rows.iter().map(|r| r.mention_count).max().unwrap_or(0);
    println!("\n📊 Top {} mentions {}", top, date);
    println!("{}", "=".repeat(64));
    println!("{:<8} {:>8} {:>6} {:>9} {:>8}  ", "Symbol", "Mentions", "Posts", "Comments", "Authors");
    for row in &rows {
      println!(
        "{:<8} {:>8} {:>6} {:>9} {:>8}  {}",
        row.symbol,
        row.mention_count,
        row.post_mentions,
        row.comment_mentions,
        row.unique_authors,
        bar(row.mention_count, max)
      );
    }
  }

  let movers = growth(conn, date, min_mentions, top.max(0) as usize)?;
  if movers.is_empty() {
    info!("No growth data (min {} mentions)", min_mentions);
  } else {
    let max = movers.iter().map(|r| r.today).max().unwrap_or(0);
    println!("\n🚀 Biggest increase vs yesterday (min {} mentions)", min_mentions);
    println!("{}", "=".repeat(64));
    println!("{:<8} {:>6} {:>10} {:>8}  ", "Symbol", "Today", "Yesterday", "Growth");
    for row in &movers {
      let yesterday = row.yesterday.map_or_else(|| "-".to_string(), |n| n.to_string());
      let factor = row.growth_factor.map_or_else(|| "new".to_string(), |g| format!("{:.2}x", g));
      println!(
        "{:<8} {:>6} {:>10} {:>8}  {}",
        row.symbol,
        row.today,
        yesterday,
        factor,
        bar(row.today, max)
      );
    }
  }

  Ok(())
}

fn print_runs(conn: &mut SqliteConnection, limit: i64) -> Result<()> {
  let runs = CrawlLog::recent(conn, limit)?;
  if runs.is_empty() {
    info!("No crawl runs recorded");
    return Ok(());
  }

  println!("\n🕷  Recent crawl runs");
  println!("{}", "=".repeat(64));
  for run in runs {
    println!(
      "{}  r/{:<16} {:<22} posts {:>4}  comments {:>5}  mentions {:>5}  errors {:>3}",
      run.started_at.format("%Y-%m-%d %H:%M"),
      run.subreddit_id,
      run.status,
      run.posts_processed,
      run.comments_processed,
      run.tickers_found,
      run.error_count
    );
  }
  Ok(())
}

/// Bar proportional to `value / max`, at least one block for non-zero values
fn bar(value: i32, max: i32) -> String {
  if max <= 0 || value <= 0 {
    return String::new();
  }
  let width = (f64::from(value) / f64::from(max) * BAR_WIDTH as f64).round() as usize;
  "█".repeat(width.clamp(1, BAR_WIDTH))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_bar_is_proportional() {
    assert_eq!(bar(10, 10).chars().count(), BAR_WIDTH);
    assert_eq!(bar(5, 10).chars().count(), BAR_WIDTH / 2);
    assert_eq!(bar(1, 1000).chars().count(), 1);
    assert_eq!(bar(0, 10), "");
    assert_eq!(bar(3, 0), "");
  }

  #[test]
  fn test_report_on_empty_database() {
    let mut conn = rsc_database_sqlite::establish_in_memory_connection().unwrap();
    print_report(&mut conn, today(), DEFAULT_TOP_N, DEFAULT_MIN_MENTIONS).unwrap();
    print_runs(&mut conn, 5).unwrap();
  }
}
