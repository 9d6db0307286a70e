//! Author profile enrichment
//!
//! Redditors are queued by the crawl with empty karma. This pass fetches a
//! batch of profiles at a fixed pace and stops at the first rate limit.

use super::ForumSource;
use crate::LoaderResult;
use chrono::Utc;
use diesel::prelude::*;
use rsc_core::Error;
use rsc_database_sqlite::models::content::Redditor;
use rsc_models::reddit::utc_from_epoch;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct EnrichConfig {
  /// Profiles fetched per pass
  pub batch_size: i64,
  /// Successful lookups allowed per minute
  pub per_minute: u32,
}

impl Default for EnrichConfig {
  fn default() -> Self {
    Self { batch_size: 50, per_minute: 50 }
  }
}

impl EnrichConfig {
  /// Pause after each successful lookup
  pub fn pace(&self) -> Duration {
    Duration::from_secs(60) / self.per_minute.max(1)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichSummary {
  pub updated: usize,
  pub unavailable: usize,
  pub failed: usize,
  /// The pass was cut short by a 429
  pub rate_limited: bool,
}

/// Fetch profiles for queued authors.
///
/// Missing and suspended accounts are marked so they are not retried. A rate
/// limit waits out the advertised delay and ends the pass; the remaining names
/// stay queued for the next run.
pub async fn enrich_authors<F: ForumSource + ?Sized>(
  forum: &F,
  conn: &mut SqliteConnection,
  config: &EnrichConfig,
) -> LoaderResult<EnrichSummary> {
  let pending = Redditor::pending_enrichment(conn, config.batch_size)?;
  let mut summary = EnrichSummary::default();
  if pending.is_empty() {
    debug!("No authors waiting for enrichment");
    return Ok(summary);
  }
  info!("Enriching {} authors", pending.len());

  for name in &pending {
    match forum.user_about(name).await {
      Ok(user) if user.is_suspended => {
        Redditor::mark_unavailable(conn, name)?;
        summary.unavailable += 1;
      }
      Ok(user) => {
        Redditor::update_profile(
          conn,
          name,
          user.link_karma.unwrap_or(0),
          user.comment_karma.unwrap_or(0),
          user.created_utc.map(utc_from_epoch),
          Utc::now().naive_utc(),
        )?;
        summary.updated += 1;
        tokio::time::sleep(config.pace()).await;
      }
      Err(Error::NotFound(_)) => {
        Redditor::mark_unavailable(conn, name)?;
        summary.unavailable += 1;
      }
      Err(Error::RateLimited { retry_after }) => {
        warn!("Rate limited while enriching {}, waiting {}s and stopping", name, retry_after + 1);
        tokio::time::sleep(Duration::from_secs(retry_after + 1)).await;
        summary.rate_limited = true;
        break;
      }
      Err(e) => {
        warn!("Profile lookup for {} failed: {}", name, e);
        summary.failed += 1;
      }
    }
  }

  info!(
    "Enrichment: {} updated, {} unavailable, {} failed",
    summary.updated, summary.unavailable, summary.failed
  );
  Ok(summary)
}
