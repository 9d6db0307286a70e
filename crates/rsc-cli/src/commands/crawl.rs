use anyhow::{Context, Result};
use clap::Args;
use rsc_client::RedditClient;
use rsc_loaders::aggregate::{DEFAULT_MIN_MENTIONS, DEFAULT_TOP_N};
use rsc_loaders::crawl::{
  today, DEFAULT_ALERT_THRESHOLD, DEFAULT_COMMENT_LIMIT, DEFAULT_POST_LIMIT, DEFAULT_SUBREDDIT,
};
use rsc_loaders::{enrich_authors, CrawlConfig, Crawler, CsvProcessor, EnrichConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct CrawlArgs {
  /// SQLite database file (defaults to DATABASE_URL)
  #[arg(long)]
  db: Option<String>,

  /// Subreddit to crawl
  #[arg(short, long, default_value = DEFAULT_SUBREDDIT)]
  subreddit: String,

  /// Newest posts to fetch
  #[arg(short, long, default_value_t = DEFAULT_POST_LIMIT)]
  posts: usize,

  /// Comments kept per post
  #[arg(short, long, default_value_t = DEFAULT_COMMENT_LIMIT)]
  comments: usize,

  /// Daily mentions that raise an alert
  #[arg(short, long, default_value_t = DEFAULT_ALERT_THRESHOLD)]
  threshold: i32,

  /// Seconds to wait between posts
  #[arg(long, default_value_t = 1.0)]
  delay: f64,

  /// Whitelist CSV merged with the active tickers (defaults to TICKER_FILE)
  #[arg(long)]
  ticker_file: Option<PathBuf>,

  /// Skip the report after the crawl
  #[arg(long)]
  no_report: bool,

  /// Skip the mention export after the crawl
  #[arg(long)]
  no_export: bool,

  /// Only fetch profiles of queued authors
  #[arg(long)]
  enrich_only: bool,
}

pub async fn execute(args: CrawlArgs, config: Config) -> Result<()> {
  let mut conn = super::connect(config.database_url(args.db.as_deref()))?;
  let client = RedditClient::new(config.client_config.clone())
    .context("Failed to create forum client")?;

  if args.enrich_only {
    enrich_authors(&client, &mut conn, &EnrichConfig::default()).await?;
    return Ok(());
  }

  let delay = Duration::try_from_secs_f64(args.delay)
    .with_context(|| format!("Invalid --delay {}", args.delay))?;
  let ticker_file = args.ticker_file.clone().unwrap_or_else(|| config.ticker_file.clone());
  let whitelist = CsvProcessor::new().read_whitelist(&ticker_file)?;
  info!("Loaded {} symbols from {}", whitelist.len(), ticker_file.display());

  let crawl_config = CrawlConfig {
    subreddit: args.subreddit.clone(),
    post_limit: args.posts,
    comment_limit: args.comments,
    alert_threshold: args.threshold,
    delay,
    export_dir: (!args.no_export).then(|| config.export_dir.clone()),
    show_progress: true,
  };

  let summary = Crawler::new(&client, crawl_config).run(&mut conn, &whitelist).await?;

  println!("\n✅ Crawl of r/{} finished ({})", args.subreddit, summary.status());
  println!("  Posts:      {} ({} new, {} failed)", summary.posts_processed, summary.new_posts, summary.failed_posts);
  println!("  Comments:   {}", summary.comments_processed);
  println!("  Mentions:   {}", summary.mentions);
  println!("  Whitelist:  {} symbols", summary.whitelist_size);
  println!("  Alerts:     {} new", summary.alerts_raised);
  println!("  API calls:  {}", summary.api_calls);
  println!("  Elapsed:    {:.1}s", summary.elapsed.as_secs_f64());
  if let Some(export) = &summary.export {
    println!("  Exported:   {} rows to {}", export.rows, export.csv_path.display());
  }

  if !args.no_report {
    super::report::print_report(&mut conn, today(), DEFAULT_TOP_N, DEFAULT_MIN_MENTIONS)?;
  }

  enrich_authors(&client, &mut conn, &EnrichConfig::default()).await?;
  Ok(())
}
