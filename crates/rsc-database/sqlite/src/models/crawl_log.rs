//! One row per crawl run

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::crawl_logs;

pub const STATUS_RUNNING: &str = "running";
pub const STATUS_SUCCESS: &str = "success";
/// Finished, but some posts were skipped
pub const STATUS_COMPLETED_WITH_ERRORS: &str = "completed_with_errors";
pub const STATUS_FAILED: &str = "failed";

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crawl_logs, primary_key(run_id))]
pub struct CrawlLog {
  pub run_id: String,
  pub subreddit_id: String,
  pub started_at: NaiveDateTime,
  pub finished_at: Option<NaiveDateTime>,
  pub posts_processed: i32,
  pub comments_processed: i32,
  pub tickers_found: i32,
  pub error_count: i32,
  pub status: String,
  pub error_message: Option<String>,
  pub api_calls: i64,
  pub elapsed_seconds: Option<f64>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crawl_logs)]
pub struct NewCrawlLog<'a> {
  pub run_id: &'a str,
  pub subreddit_id: &'a str,
  pub started_at: NaiveDateTime,
  pub status: &'a str,
}

impl<'a> NewCrawlLog<'a> {
  /// Record the start of a run
  pub fn start(
    conn: &mut SqliteConnection,
    run_id: &'a str,
    subreddit: &'a str,
    started_at: NaiveDateTime,
  ) -> Result<usize, diesel::result::Error> {
    let row = NewCrawlLog { run_id, subreddit_id: subreddit, started_at, status: STATUS_RUNNING };
    diesel::insert_into(crawl_logs::table).values(&row).execute(conn)
  }
}

/// Final counters of a run
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crawl_logs)]
pub struct CrawlLogUpdate {
  pub finished_at: Option<NaiveDateTime>,
  pub posts_processed: i32,
  pub comments_processed: i32,
  pub tickers_found: i32,
  pub error_count: i32,
  pub status: String,
  pub error_message: Option<String>,
  pub api_calls: i64,
  pub elapsed_seconds: Option<f64>,
}

impl CrawlLog {
  pub fn finish(
    conn: &mut SqliteConnection,
    run_id: &str,
    update: &CrawlLogUpdate,
  ) -> Result<usize, diesel::result::Error> {
    diesel::update(crawl_logs::table.find(run_id)).set(update).execute(conn)
  }

  pub fn find(conn: &mut SqliteConnection, run_id: &str) -> Result<Option<Self>, diesel::result::Error> {
    crawl_logs::table.find(run_id).select(CrawlLog::as_select()).first(conn).optional()
  }

  /// Latest runs first
  pub fn recent(conn: &mut SqliteConnection, limit: i64) -> Result<Vec<Self>, diesel::result::Error> {
    crawl_logs::table
      .order(crawl_logs::started_at.desc())
      .limit(limit)
      .select(CrawlLog::as_select())
      .load(conn)
  }
}
