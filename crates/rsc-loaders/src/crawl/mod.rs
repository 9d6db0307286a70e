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

//! Crawl pipeline
//!
//! One run walks the newest posts of a subreddit, stores posts, comments and
//! every whitelisted ticker mention (one transaction per post), then rolls the
//! day up, raises alerts and exports the day's mentions.

pub mod enrich;

use crate::aggregate;
use crate::export::{export_mentions, ExportSummary};
use crate::{LoaderError, LoaderResult};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};
use rsc_client::RedditClient;
use rsc_core::{MentionExtractor, Whitelist};
use rsc_database_sqlite::models::content::{NewComment, NewPost, NewSubreddit, Redditor};
use rsc_database_sqlite::models::crawl_log::{
  CrawlLog, CrawlLogUpdate, NewCrawlLog, STATUS_COMPLETED_WITH_ERRORS, STATUS_FAILED, STATUS_SUCCESS,
};
use rsc_database_sqlite::models::mention::NewMention;
use rsc_database_sqlite::models::ticker::{Ticker, SAMPLE_TICKERS};
use rsc_models::reddit::{utc_from_epoch, CommentData, PostData, SubredditData, UserData};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub use enrich::{enrich_authors, EnrichConfig, EnrichSummary};

pub const DEFAULT_SUBREDDIT: &str = "wallstreetbets";
pub const DEFAULT_POST_LIMIT: usize = 25;
pub const DEFAULT_COMMENT_LIMIT: usize = 100;
pub const DEFAULT_ALERT_THRESHOLD: i32 = 10;

/// The forum as the crawler sees it
#[async_trait]
pub trait ForumSource: Send + Sync {
  async fn subreddit_about(&self, name: &str) -> rsc_core::Result<SubredditData>;

  /// Newest posts first
  async fn new_posts(&self, subreddit: &str, limit: usize) -> rsc_core::Result<Vec<PostData>>;

  /// Every loaded comment of the post, parents before replies
  async fn comments(&self, post_id: &str) -> rsc_core::Result<Vec<CommentData>>;

  async fn user_about(&self, name: &str) -> rsc_core::Result<UserData>;

  /// Requests issued so far
  fn api_calls(&self) -> u64 {
    0
  }
}

#[async_trait]
impl ForumSource for RedditClient {
  async fn subreddit_about(&self, name: &str) -> rsc_core::Result<SubredditData> {
    self.subreddit().about(name).await
  }

  async fn new_posts(&self, subreddit: &str, limit: usize) -> rsc_core::Result<Vec<PostData>> {
    self.subreddit().new_posts(subreddit, limit).await
  }

  async fn comments(&self, post_id: &str) -> rsc_core::Result<Vec<CommentData>> {
    self.comments().for_post(post_id).await
  }

  async fn user_about(&self, name: &str) -> rsc_core::Result<UserData> {
    self.users().about(name).await
  }

  fn api_calls(&self) -> u64 {
    RedditClient::api_calls(self)
  }
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
  pub subreddit: String,
  pub post_limit: usize,
  /// Comments kept per post, shallowest first
  pub comment_limit: usize,
  pub alert_threshold: i32,
  /// Pause after each post
  pub delay: Duration,
  /// Where the day's mentions are exported, `None` to skip the export
  pub export_dir: Option<PathBuf>,
  pub show_progress: bool,
}

impl Default for CrawlConfig {
  fn default() -> Self {
    Self {
      subreddit: DEFAULT_SUBREDDIT.to_string(),
      post_limit: DEFAULT_POST_LIMIT,
      comment_limit: DEFAULT_COMMENT_LIMIT,
      alert_threshold: DEFAULT_ALERT_THRESHOLD,
      delay: Duration::from_secs(1),
      export_dir: Some(PathBuf::from("exports")),
      show_progress: true,
    }
  }
}

/// Counters of one run
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
  pub run_id: String,
  pub posts_processed: usize,
  pub new_posts: usize,
  pub comments_processed: usize,
  pub mentions: usize,
  pub failed_posts: usize,
  pub whitelist_size: usize,
  pub symbols_rolled_up: usize,
  pub alerts_raised: usize,
  pub export: Option<ExportSummary>,
  pub api_calls: u64,
  pub elapsed: Duration,
}

impl CrawlSummary {
  pub fn status(&self) -> &'static str {
    if self.failed_posts > 0 {
      STATUS_COMPLETED_WITH_ERRORS
    } else {
      STATUS_SUCCESS
    }
  }
}

#[derive(Debug, Default)]
struct PostOutcome {
  new_post: bool,
  comments: usize,
  mentions: usize,
}

pub struct Crawler<'a, F: ForumSource + ?Sized> {
  forum: &'a F,
  extractor: MentionExtractor,
  config: CrawlConfig,
}

impl<'a, F: ForumSource + ?Sized> Crawler<'a, F> {
  pub fn new(forum: &'a F, config: CrawlConfig) -> Self {
    Self { forum, extractor: MentionExtractor::default(), config }
  }

  pub fn with_extractor(mut self, extractor: MentionExtractor) -> Self {
    self.extractor = extractor;
    self
  }

  pub fn config(&self) -> &CrawlConfig {
    &self.config
  }

  /// Run a full crawl. `file_whitelist` is merged with the active tickers
  /// stored in the database.
  pub async fn run(
    &self,
    conn: &mut SqliteConnection,
    file_whitelist: &Whitelist,
  ) -> LoaderResult<CrawlSummary> {
    let started = Instant::now();
    let run_id = uuid::Uuid::new_v4().to_string();
    NewCrawlLog::start(conn, &run_id, &self.config.subreddit, now())?;
    info!("Crawl run {} started (r/{})", run_id, self.config.subreddit);

    let mut summary = CrawlSummary { run_id: run_id.clone(), ..Default::default() };
    let outcome = self.crawl(conn, file_whitelist, &mut summary).await;

    summary.api_calls = self.forum.api_calls();
    summary.elapsed = started.elapsed();

    let update = CrawlLogUpdate {
      finished_at: Some(now()),
      posts_processed: summary.posts_processed as i32,
      comments_processed: summary.comments_processed as i32,
      tickers_found: summary.mentions as i32,
      error_count: summary.failed_posts as i32,
      status: match &outcome {
        Ok(()) => summary.status().to_string(),
        Err(_) => STATUS_FAILED.to_string(),
      },
      error_message: outcome.as_ref().err().map(|e| e.to_string()),
      api_calls: summary.api_calls as i64,
      elapsed_seconds: Some(summary.elapsed.as_secs_f64()),
    };
    if let Err(e) = CrawlLog::finish(conn, &run_id, &update) {
      error!("Failed to finish crawl log {}: {}", run_id, e);
    }

    outcome?;
    info!(
      "Done: {} posts | {} comments | {} mentions | {:.1}s",
      summary.posts_processed,
      summary.comments_processed,
      summary.mentions,
      summary.elapsed.as_secs_f64()
    );
    Ok(summary)
  }

  async fn crawl(
    &self,
    conn: &mut SqliteConnection,
    file_whitelist: &Whitelist,
    summary: &mut CrawlSummary,
  ) -> LoaderResult<()> {
    Ticker::ensure(conn, SAMPLE_TICKERS)?;

    let mut whitelist: Whitelist = Ticker::active_symbols(conn)?.into_iter().collect();
    whitelist.merge(file_whitelist.clone());
    summary.whitelist_size = whitelist.len();
    if whitelist.is_empty() {
      warn!("Whitelist is empty, no mentions will be detected");
    } else {
      info!("Whitelist: {} symbols", whitelist.len());
    }

    let about = self.forum.subreddit_about(&self.config.subreddit).await?;
    let subreddit_id = about.display_name.clone();
    NewSubreddit {
      id: &subreddit_id,
      title: about.title.as_deref(),
      description: about.public_description.as_deref(),
      subscribers: about.subscribers,
      created_utc: about.created_utc.map(utc_from_epoch),
      quarantined: about.quarantine,
      crawled_at: now(),
    }
    .upsert(conn)?;

    let posts = self.forum.new_posts(&self.config.subreddit, self.config.post_limit).await?;
    let progress = self.progress_bar(posts.len());

    for (i, post) in posts.iter().enumerate() {
      match self.process_post(conn, &whitelist, &subreddit_id, post).await {
        Ok(outcome) => {
          summary.posts_processed += 1;
          summary.new_posts += usize::from(outcome.new_post);
          summary.comments_processed += outcome.comments;
          summary.mentions += outcome.mentions;
        }
        Err(e) => {
          error!("Post {} skipped: {}", post.id, e);
          summary.failed_posts += 1;
        }
      }
      progress.inc(1);

      if i + 1 < posts.len() && !self.config.delay.is_zero() {
        tokio::time::sleep(self.config.delay).await;
      }
    }
    progress.finish_with_message("posts done");

    let today = today();
    summary.symbols_rolled_up = aggregate::rollup(conn, today)?;
    summary.alerts_raised = aggregate::evaluate_alerts(conn, today, self.config.alert_threshold)?;

    if let Some(dir) = &self.config.export_dir {
      summary.export = Some(export_mentions(conn, dir, Some(today))?);
    }

    Ok(())
  }

  /// Fetch the post's comments, then store post, comments and mentions in
  /// one transaction
  async fn process_post(
    &self,
    conn: &mut SqliteConnection,
    whitelist: &Whitelist,
    subreddit_id: &str,
    post: &PostData,
  ) -> LoaderResult<PostOutcome> {
    let mut comments = self.forum.comments(&post.id).await?;
    comments.sort_by_key(|c| c.depth);
    comments.truncate(self.config.comment_limit);
    debug!("Post {}: {} comments", post.id, comments.len());

    let seen_at = now();
    conn.transaction::<_, LoaderError, _>(|conn| {
      let mut outcome = PostOutcome::default();

      if let Some(author) = post.author() {
        Redditor::queue(conn, author, seen_at)?;
      }
      outcome.new_post = new_post_row(post, subreddit_id, seen_at).insert_if_absent(conn)? == 1;

      let text = format!("{} {}", post.title, post.selftext);
      for found in self.extractor.find(&text, whitelist) {
        NewMention::for_post(&found.symbol, &post.id, &post.title, found.offset, seen_at)
          .insert(conn)?;
        outcome.mentions += 1;
      }

      for comment in &comments {
        if let Some(author) = comment.author() {
          Redditor::queue(conn, author, seen_at)?;
        }
        new_comment_row(comment, &post.id, seen_at).insert_if_absent(conn)?;
        outcome.comments += 1;

        for found in self.extractor.find(&comment.body, whitelist) {
          NewMention::for_comment(&found.symbol, &comment.id, &comment.body, found.offset, seen_at)
            .insert(conn)?;
          outcome.mentions += 1;
        }
      }

      Ok(outcome)
    })
  }

  fn progress_bar(&self, len: usize) -> ProgressBar {
    if !self.config.show_progress {
      return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
      .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
    {
      pb.set_style(style.progress_chars("##-"));
    }
    pb.set_message("posts");
    pb
  }
}

fn new_post_row<'p>(post: &'p PostData, subreddit_id: &'p str, crawled_at: NaiveDateTime) -> NewPost<'p> {
  NewPost {
    id: &post.id,
    subreddit_id,
    author_id: post.author(),
    title: &post.title,
    selftext: &post.selftext,
    url: post.url.as_deref(),
    permalink: &post.permalink,
    flair: post.link_flair_text.as_deref(),
    is_self: post.is_self,
    over_18: post.over_18,
    spoiler: post.spoiler,
    stickied: post.stickied,
    locked: post.locked,
    score: post.score,
    upvote_ratio: post.upvote_ratio,
    num_comments: post.num_comments,
    created_utc: post.created_at(),
    crawled_at,
  }
}

fn new_comment_row<'c>(comment: &'c CommentData, post_id: &'c str, crawled_at: NaiveDateTime) -> NewComment<'c> {
  NewComment {
    id: &comment.id,
    post_id,
    parent_id: comment.parent_post_id(),
    author_id: comment.author(),
    body: &comment.body,
    score: comment.score,
    created_utc: comment.created_at(),
    distinguished: comment.distinguished.as_deref(),
    is_submitter: comment.is_submitter,
    stickied: comment.stickied,
    locked: comment.locked,
    depth: comment.depth,
    crawled_at,
  }
}

fn now() -> NaiveDateTime {
  Utc::now().naive_utc()
}

/// Current UTC date, the day mentions are rolled up into
pub fn today() -> NaiveDate {
  Utc::now().date_naive()
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use rsc_core::Error;
  use rsc_database_sqlite::establish_in_memory_connection;
  use rsc_database_sqlite::models::content::{Comment, Post};
  use rsc_database_sqlite::models::mention::Mention;
  use rsc_database_sqlite::models::stats::{DailyStat, TrendAlert};
  use std::collections::{HashMap, HashSet};
  use std::sync::atomic::{AtomicU64, Ordering};

  /// In-memory forum
  #[derive(Default)]
  pub(crate) struct FakeForum {
    pub posts: Vec<PostData>,
    pub comments: HashMap<String, Vec<CommentData>>,
    pub users: HashMap<String, UserData>,
    pub rate_limited_users: HashSet<String>,
    pub failing_posts: HashSet<String>,
    pub calls: AtomicU64,
  }

  #[async_trait]
  impl ForumSource for FakeForum {
    async fn subreddit_about(&self, name: &str) -> rsc_core::Result<SubredditData> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Ok(serde_json::from_value(serde_json::json!({
        "display_name": name, "title": "Test", "subscribers": 100, "created_utc": 1500000000.0
      }))?)
    }

    async fn new_posts(&self, _subreddit: &str, limit: usize) -> rsc_core::Result<Vec<PostData>> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Ok(self.posts.iter().take(limit).cloned().collect())
    }

    async fn comments(&self, post_id: &str) -> rsc_core::Result<Vec<CommentData>> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      if self.failing_posts.contains(post_id) {
        return Err(Error::Http("connection reset".to_string()));
      }
      Ok(self.comments.get(post_id).cloned().unwrap_or_default())
    }

    async fn user_about(&self, name: &str) -> rsc_core::Result<UserData> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      if self.rate_limited_users.contains(name) {
        return Err(Error::RateLimited { retry_after: 5 });
      }
      self.users.get(name).cloned().ok_or_else(|| Error::NotFound(format!("/user/{}", name)))
    }

    fn api_calls(&self) -> u64 {
      self.calls.load(Ordering::SeqCst)
    }
  }

  pub(crate) fn post(id: &str, author: Option<&str>, title: &str, selftext: &str) -> PostData {
    serde_json::from_value(serde_json::json!({
      "id": id, "subreddit": "stocks", "author": author, "title": title,
      "selftext": selftext, "created_utc": 1700000000.0
    }))
    .unwrap()
  }

  pub(crate) fn comment(id: &str, post_id: &str, author: Option<&str>, body: &str, depth: i32) -> CommentData {
    serde_json::from_value(serde_json::json!({
      "id": id, "parent_id": format!("t3_{}", post_id), "author": author,
      "body": body, "depth": depth, "created_utc": 1700000100.0
    }))
    .unwrap()
  }

  fn config(dir: Option<PathBuf>) -> CrawlConfig {
    CrawlConfig {
      subreddit: "stocks".to_string(),
      delay: Duration::ZERO,
      export_dir: dir,
      show_progress: false,
      alert_threshold: 2,
      ..CrawlConfig::default()
    }
  }

  fn forum() -> FakeForum {
    let mut forum = FakeForum {
      posts: vec![
        post("p1", Some("alice"), "$GME squeeze", "GME and AAPL both"),
        post("p2", None, "Nothing here", "just words"),
      ],
      ..Default::default()
    };
    forum.comments.insert(
      "p1".to_string(),
      vec![
        comment("c2", "p1", Some("carol"), "reply about TSLA", 1),
        comment("c1", "p1", Some("bob"), "GME to the moon", 0),
        comment("c3", "p1", Some("[deleted]"), "AAPL", 2),
      ],
    );
    forum
  }

  #[tokio::test]
  async fn test_crawl_stores_everything() {
    let mut conn = establish_in_memory_connection().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let forum = forum();
    let file: Whitelist = ["GME"].into_iter().collect();

    let crawler = Crawler::new(&forum, config(Some(dir.path().to_path_buf())));
    let summary = crawler.run(&mut conn, &file).await.unwrap();

    assert_eq!(summary.posts_processed, 2);
    assert_eq!(summary.new_posts, 2);
    assert_eq!(summary.comments_processed, 3);
    // post: GME GME AAPL, comments: TSLA, GME, AAPL
    assert_eq!(summary.mentions, 6);
    assert_eq!(summary.failed_posts, 0);
    assert_eq!(summary.status(), STATUS_SUCCESS);
    assert!(summary.whitelist_size >= 3);

    assert_eq!(Post::count_for_subreddit(&mut conn, "stocks").unwrap(), 2);
    let stored = Comment::for_post(&mut conn, "p1").unwrap();
    assert_eq!(stored.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["c1", "c2", "c3"]);
    assert_eq!(stored[2].author_id, None);

    let mentions = Mention::all(&mut conn).unwrap();
    assert_eq!(mentions[0].symbol, "GME");
    assert_eq!(mentions[0].context.as_deref(), Some("$GME squeeze"));
    assert_eq!(mentions[0].position, 1);

    let gme = DailyStat::for_date(&mut conn, today())
      .unwrap()
      .into_iter()
      .find(|s| s.symbol == "GME")
      .unwrap();
    assert_eq!(gme.mention_count, 3);
    assert_eq!(gme.unique_authors, 2);
    assert_eq!(summary.alerts_raised, 2);
    assert_eq!(TrendAlert::for_date(&mut conn, today()).unwrap().len(), 2);

    let export = summary.export.unwrap();
    assert_eq!(export.rows, 6);
    assert!(export.csv_path.exists());

    let log = CrawlLog::find(&mut conn, &summary.run_id).unwrap().unwrap();
    assert_eq!(log.status, STATUS_SUCCESS);
    assert_eq!(log.tickers_found, 6);
    assert_eq!(log.api_calls, 4);

    assert!(Redditor::find(&mut conn, "alice").unwrap().is_some());
    assert!(Redditor::find(&mut conn, "[deleted]").unwrap().is_none());
  }

  #[tokio::test]
  async fn test_comment_limit_keeps_shallowest() {
    let mut conn = establish_in_memory_connection().unwrap();
    let forum = forum();
    let config = CrawlConfig { comment_limit: 2, ..config(None) };

    let summary = Crawler::new(&forum, config).run(&mut conn, &Whitelist::new()).await.unwrap();

    assert_eq!(summary.comments_processed, 2);
    let ids: Vec<_> =
      Comment::for_post(&mut conn, "p1").unwrap().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["c1", "c2"]);
    assert!(summary.export.is_none());
  }

  #[tokio::test]
  async fn test_failing_post_is_skipped() {
    let mut conn = establish_in_memory_connection().unwrap();
    let mut forum = forum();
    forum.failing_posts.insert("p1".to_string());

    let summary = Crawler::new(&forum, config(None)).run(&mut conn, &Whitelist::new()).await.unwrap();

    assert_eq!(summary.failed_posts, 1);
    assert_eq!(summary.posts_processed, 1);
    assert_eq!(summary.status(), STATUS_COMPLETED_WITH_ERRORS);
    // nothing of p1 was written
    assert_eq!(Post::count_for_subreddit(&mut conn, "stocks").unwrap(), 1);
    assert!(Mention::all(&mut conn).unwrap().is_empty());

    let log = CrawlLog::find(&mut conn, &summary.run_id).unwrap().unwrap();
    assert_eq!(log.status, STATUS_COMPLETED_WITH_ERRORS);
    assert_eq!(log.error_count, 1);
  }

  #[tokio::test]
  async fn test_recrawl_keeps_rows_unique() {
    let mut conn = establish_in_memory_connection().unwrap();
    let forum = forum();
    let crawler = Crawler::new(&forum, config(None));

    crawler.run(&mut conn, &Whitelist::new()).await.unwrap();
    let second = crawler.run(&mut conn, &Whitelist::new()).await.unwrap();

    assert_eq!(second.new_posts, 0);
    assert_eq!(Post::count_for_subreddit(&mut conn, "stocks").unwrap(), 2);
    assert_eq!(Comment::for_post(&mut conn, "p1").unwrap().len(), 3);
    assert_eq!(CrawlLog::recent(&mut conn, 10).unwrap().len(), 2);
  }

  #[tokio::test]
  async fn test_subreddit_failure_marks_run_failed() {
    struct DownForum;

    #[async_trait]
    impl ForumSource for DownForum {
      async fn subreddit_about(&self, name: &str) -> rsc_core::Result<SubredditData> {
        Err(Error::NotFound(format!("/r/{}", name)))
      }
      async fn new_posts(&self, _: &str, _: usize) -> rsc_core::Result<Vec<PostData>> {
        Ok(Vec::new())
      }
      async fn comments(&self, _: &str) -> rsc_core::Result<Vec<CommentData>> {
        Ok(Vec::new())
      }
      async fn user_about(&self, name: &str) -> rsc_core::Result<UserData> {
        Err(Error::NotFound(name.to_string()))
      }
    }

    let mut conn = establish_in_memory_connection().unwrap();
    let err = Crawler::new(&DownForum, config(None)).run(&mut conn, &Whitelist::new()).await.unwrap_err();
    assert!(matches!(err, LoaderError::ApiError(_)));

    let log = &CrawlLog::recent(&mut conn, 1).unwrap()[0];
    assert_eq!(log.status, STATUS_FAILED);
    assert!(log.error_message.as_deref().unwrap_or_default().contains("/r/stocks"));
  }
}
