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

//! Daily rollups, threshold alerts and the two report queries

use crate::{LoaderError, LoaderResult};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use diesel::prelude::*;
use rsc_database_sqlite::models::mention::Mention;
use rsc_database_sqlite::models::stats::{DailyStat, NewDailyStat, NewTrendAlert};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

pub const ALERT_MENTION_SPIKE: &str = "mention_spike";
pub const ALERT_PRIORITY: &str = "medium";
pub const ALERT_WINDOW_MINUTES: i32 = 1440;

pub const DEFAULT_TOP_N: i64 = 15;
pub const DEFAULT_MIN_MENTIONS: i32 = 5;

/// `[date 00:00, date + 1 00:00)`
pub fn day_bounds(date: NaiveDate) -> LoaderResult<(NaiveDateTime, NaiveDateTime)> {
  let next = date
    .checked_add_days(Days::new(1))
    .ok_or_else(|| LoaderError::InvalidData(format!("date out of range: {}", date)))?;
  Ok((date.and_time(NaiveTime::MIN), next.and_time(NaiveTime::MIN)))
}

#[derive(Debug, Default)]
struct Tally {
  total: i32,
  from_posts: i32,
  from_comments: i32,
  authors: HashSet<String>,
}

/// Recompute the DailyStat rows of `date` from its mentions, overwriting
/// earlier counts. Returns the number of symbols written.
pub fn rollup(conn: &mut SqliteConnection, date: NaiveDate) -> LoaderResult<usize> {
  let (from, to) = day_bounds(date)?;
  let updated_at = Utc::now().naive_utc();

  let written = conn.transaction::<_, LoaderError, _>(|conn| {
    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();
    for mention in Mention::attributed_between(conn, from, to)? {
      let tally = tallies.entry(mention.symbol).or_default();
      tally.total += 1;
      if mention.from_post {
        tally.from_posts += 1;
      }
      if mention.from_comment {
        tally.from_comments += 1;
      }
      // mentions without a resolvable author are counted but add no author
      if let Some(author) = mention.author {
        tally.authors.insert(author);
      }
    }

    for (symbol, tally) in &tallies {
      NewDailyStat {
        symbol: symbol.clone(),
        date,
        mention_count: tally.total,
        post_mentions: tally.from_posts,
        comment_mentions: tally.from_comments,
        unique_authors: tally.authors.len() as i32,
        updated_at,
      }
      .upsert(conn)?;
    }

    Ok(tallies.len())
  })?;

  info!("Daily stats updated for {} ({} symbols)", date, written);
  Ok(written)
}

/// Raise a `mention_spike` alert for every symbol of `date` at or above
/// `threshold`. Returns how many alerts are new.
pub fn evaluate_alerts(conn: &mut SqliteConnection, date: NaiveDate, threshold: i32) -> LoaderResult<usize> {
  let created_at = Utc::now().naive_utc();
  let mut raised = 0;

  for stat in DailyStat::at_least(conn, date, threshold)? {
    let alert = NewTrendAlert {
      symbol: &stat.symbol,
      alert_type: ALERT_MENTION_SPIKE,
      threshold: f64::from(threshold),
      current_value: f64::from(stat.mention_count),
      percent_change: None,
      window_minutes: ALERT_WINDOW_MINUTES,
      message: format!("{} mentioned {} times today", stat.symbol, stat.mention_count),
      priority: ALERT_PRIORITY,
      active: true,
      alert_date: date,
      created_at,
    };

    if alert.insert_if_absent(conn)? == 1 {
      info!("Alert: {}", alert.message);
      raised += 1;
    } else {
      debug!("{}: alert already raised for {}", stat.symbol, date);
    }
  }

  Ok(raised)
}

/// One row of the growth report
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthRow {
  pub symbol: String,
  pub today: i32,
  pub yesterday: Option<i32>,
  /// today / yesterday rounded to two places; `None` without a usable base
  pub growth_factor: Option<f64>,
}

/// Symbols with at least `min_mentions` today that are new or more than
/// doubled against yesterday. Highest factor first, new symbols after the
/// ones with a factor, then by today's count.
pub fn growth(
  conn: &mut SqliteConnection,
  date: NaiveDate,
  min_mentions: i32,
  limit: usize,
) -> LoaderResult<Vec<GrowthRow>> {
  let today = DailyStat::at_least(conn, date, min_mentions)?;
  let yesterday: HashMap<String, i32> = match date.checked_sub_days(Days::new(1)) {
    Some(prev) => DailyStat::for_date(conn, prev)?
      .into_iter()
      .map(|stat| (stat.symbol, stat.mention_count))
      .collect(),
    None => HashMap::new(),
  };

  let mut rows: Vec<GrowthRow> = today
    .into_iter()
    .filter_map(|stat| {
      let prev = yesterday.get(&stat.symbol).copied();
      if prev.is_some_and(|y| stat.mention_count <= 2 * y) {
        return None;
      }
      let growth_factor = prev
        .filter(|&y| y != 0)
        .map(|y| (f64::from(stat.mention_count) / f64::from(y) * 100.0).round() / 100.0);
      Some(GrowthRow { symbol: stat.symbol, today: stat.mention_count, yesterday: prev, growth_factor })
    })
    .collect();

  rows.sort_by(|a, b| {
    let by_factor = match (a.growth_factor, b.growth_factor) {
      (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
      (Some(_), None) => Ordering::Less,
      (None, Some(_)) => Ordering::Greater,
      (None, None) => Ordering::Equal,
    };
    by_factor.then_with(|| b.today.cmp(&a.today)).then_with(|| a.symbol.cmp(&b.symbol))
  });
  rows.truncate(limit);

  Ok(rows)
}

/// Busiest symbols of the day
pub fn top_mentions(conn: &mut SqliteConnection, date: NaiveDate, limit: i64) -> LoaderResult<Vec<DailyStat>> {
  Ok(DailyStat::top(conn, date, limit)?)
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use rsc_database_sqlite::establish_in_memory_connection;
  use rsc_database_sqlite::models::content::{NewComment, NewPost, NewSubreddit};
  use rsc_database_sqlite::models::mention::NewMention;
  use rsc_database_sqlite::models::stats::TrendAlert;

  pub(crate) fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 20).unwrap()
  }

  pub(crate) fn at(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, 0, 0).unwrap()
  }

  /// Subreddit `stocks` with post `p1` by alice, comment `c1` by bob and
  /// comment `c2` by a deleted account
  pub(crate) fn seed_content(conn: &mut SqliteConnection) {
    NewSubreddit {
      id: "stocks",
      title: None,
      description: None,
      subscribers: None,
      created_utc: None,
      quarantined: false,
      crawled_at: at(day(), 0),
    }
    .upsert(conn)
    .unwrap();

    NewPost {
      id: "p1",
      subreddit_id: "stocks",
      author_id: Some("alice"),
      title: "GME and AAPL",
      selftext: "",
      url: None,
      permalink: "/r/stocks/comments/p1",
      flair: None,
      is_self: true,
      over_18: false,
      spoiler: false,
      stickied: false,
      locked: false,
      score: 10,
      upvote_ratio: 0.9,
      num_comments: 2,
      created_utc: at(day(), 1),
      crawled_at: at(day(), 2),
    }
    .insert_if_absent(conn)
    .unwrap();

    for (id, author) in [("c1", Some("bob")), ("c2", None)] {
      NewComment {
        id,
        post_id: "p1",
        parent_id: Some("p1"),
        author_id: author,
        body: "GME",
        score: 1,
        created_utc: at(day(), 1),
        distinguished: None,
        is_submitter: false,
        stickied: false,
        locked: false,
        depth: 0,
        crawled_at: at(day(), 2),
      }
      .insert_if_absent(conn)
      .unwrap();
    }
  }

  fn mention_post(conn: &mut SqliteConnection, symbol: &str, when: NaiveDateTime) {
    NewMention::for_post(symbol, "p1", "ctx", 0, when).insert(conn).unwrap();
  }

  fn mention_comment(conn: &mut SqliteConnection, symbol: &str, comment: &str, when: NaiveDateTime) {
    NewMention::for_comment(symbol, comment, "ctx", 0, when).insert(conn).unwrap();
  }

  fn stat(conn: &mut SqliteConnection, symbol: &str) -> DailyStat {
    DailyStat::for_date(conn, day()).unwrap().into_iter().find(|s| s.symbol == symbol).unwrap()
  }

  #[test]
  fn test_day_bounds() {
    let (from, to) = day_bounds(day()).unwrap();
    assert_eq!(from.to_string(), "2025-08-20 00:00:00");
    assert_eq!(to.to_string(), "2025-08-21 00:00:00");
  }

  #[test]
  fn test_rollup_counts_and_authors() {
    let mut conn = establish_in_memory_connection().unwrap();
    seed_content(&mut conn);
    mention_post(&mut conn, "GME", at(day(), 3));
    mention_comment(&mut conn, "GME", "c1", at(day(), 4));
    mention_comment(&mut conn, "GME", "c1", at(day(), 5));
    mention_comment(&mut conn, "GME", "c2", at(day(), 6));
    mention_post(&mut conn, "AAPL", at(day(), 7));
    // other days are ignored
    mention_post(&mut conn, "AAPL", at(day().pred_opt().unwrap(), 23));

    assert_eq!(rollup(&mut conn, day()).unwrap(), 2);

    let gme = stat(&mut conn, "GME");
    assert_eq!(gme.mention_count, 4);
    assert_eq!(gme.post_mentions, 1);
    assert_eq!(gme.comment_mentions, 3);
    // alice and bob; the deleted account adds nothing
    assert_eq!(gme.unique_authors, 2);

    let aapl = stat(&mut conn, "AAPL");
    assert_eq!(aapl.mention_count, 1);
  }

  #[test]
  fn test_rollup_is_idempotent() {
    let mut conn = establish_in_memory_connection().unwrap();
    seed_content(&mut conn);
    mention_post(&mut conn, "GME", at(day(), 3));
    mention_comment(&mut conn, "GME", "c1", at(day(), 4));

    rollup(&mut conn, day()).unwrap();
    let first = stat(&mut conn, "GME");
    rollup(&mut conn, day()).unwrap();
    let second = stat(&mut conn, "GME");

    assert_eq!(first.mention_count, second.mention_count);
    assert_eq!(first.post_mentions, second.post_mentions);
    assert_eq!(first.comment_mentions, second.comment_mentions);
    assert_eq!(first.unique_authors, second.unique_authors);
    assert_eq!(DailyStat::for_date(&mut conn, day()).unwrap().len(), 1);
  }

  #[test]
  fn test_alerts_raised_once() {
    let mut conn = establish_in_memory_connection().unwrap();
    seed_content(&mut conn);
    for hour in 0..3 {
      mention_post(&mut conn, "GME", at(day(), hour));
    }
    mention_post(&mut conn, "AAPL", at(day(), 5));
    rollup(&mut conn, day()).unwrap();

    assert_eq!(evaluate_alerts(&mut conn, day(), 3).unwrap(), 1);
    assert_eq!(evaluate_alerts(&mut conn, day(), 3).unwrap(), 0);

    let alerts = TrendAlert::for_date(&mut conn, day()).unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].symbol, "GME");
    assert_eq!(alerts[0].message, "GME mentioned 3 times today");
    assert_eq!(alerts[0].alert_type, ALERT_MENTION_SPIKE);
    assert_eq!(alerts[0].window_minutes, 1440);
  }

  #[test]
  fn test_growth_filters_and_orders() {
    let mut conn = establish_in_memory_connection().unwrap();
    let yesterday = day().pred_opt().unwrap();
    let write = |conn: &mut SqliteConnection, symbol: &str, date: NaiveDate, count: i32| {
      NewDailyStat {
        symbol: symbol.to_string(),
        date,
        mention_count: count,
        post_mentions: count,
        comment_mentions: 0,
        unique_authors: 1,
        updated_at: at(date, 12),
      }
      .upsert(conn)
      .unwrap();
    };

    write(&mut conn, "GME", day(), 30);
    write(&mut conn, "GME", yesterday, 10);
    write(&mut conn, "AMC", day(), 9);
    write(&mut conn, "AMC", yesterday, 2);
    write(&mut conn, "NEW", day(), 12);
    write(&mut conn, "FLAT", day(), 20);
    write(&mut conn, "FLAT", yesterday, 10);
    write(&mut conn, "TINY", day(), 4);
    write(&mut conn, "ZERO", day(), 6);
    write(&mut conn, "ZERO", yesterday, 0);

    let rows = growth(&mut conn, day(), 5, 15).unwrap();
    let symbols: Vec<_> = rows.iter().map(|r| r.symbol.as_str()).collect();
    // FLAT only doubled, TINY is below the minimum
    assert_eq!(symbols, vec!["AMC", "GME", "NEW", "ZERO"]);
    assert_eq!(rows[0].growth_factor, Some(4.5));
    assert_eq!(rows[1].growth_factor, Some(3.0));
    assert_eq!(rows[2].growth_factor, None);
    assert_eq!(rows[2].yesterday, None);
    assert_eq!(rows[3].yesterday, Some(0));

    assert_eq!(growth(&mut conn, day(), 5, 1).unwrap().len(), 1);
  }

  #[test]
  fn test_top_mentions() {
    let mut conn = establish_in_memory_connection().unwrap();
    seed_content(&mut conn);
    mention_post(&mut conn, "GME", at(day(), 1));
    mention_post(&mut conn, "GME", at(day(), 2));
    mention_post(&mut conn, "AAPL", at(day(), 3));
    rollup(&mut conn, day()).unwrap();

    let top = top_mentions(&mut conn, day(), 1).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].symbol, "GME");
  }
}
