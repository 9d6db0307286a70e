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

//! Forum content rows: subreddits, redditors, posts and comments

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{comments, posts, redditors, subreddits};

// ===== Subreddit =====
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = subreddits)]
pub struct Subreddit {
  pub id: String,
  pub title: Option<String>,
  pub description: Option<String>,
  pub subscribers: Option<i64>,
  pub created_utc: Option<NaiveDateTime>,
  pub quarantined: bool,
  pub crawled_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = subreddits)]
pub struct NewSubreddit<'a> {
  pub id: &'a str,
  pub title: Option<&'a str>,
  pub description: Option<&'a str>,
  pub subscribers: Option<i64>,
  pub created_utc: Option<NaiveDateTime>,
  pub quarantined: bool,
  pub crawled_at: NaiveDateTime,
}

impl NewSubreddit<'_> {
  /// Insert or refresh the subreddit row
  pub fn upsert(&self, conn: &mut SqliteConnection) -> Result<usize, diesel::result::Error> {
    diesel::insert_into(subreddits::table)
      .values(self)
      .on_conflict(subreddits::id)
      .do_update()
      .set(self)
      .execute(conn)
  }
}

impl Subreddit {
  pub fn find(conn: &mut SqliteConnection, name: &str) -> Result<Option<Self>, diesel::result::Error> {
    subreddits::table.find(name).select(Subreddit::as_select()).first(conn).optional()
  }
}

// ===== Redditor =====
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = redditors)]
pub struct Redditor {
  pub id: String,
  pub link_karma: Option<i64>,
  pub comment_karma: Option<i64>,
  pub created_utc: Option<NaiveDateTime>,
  pub crawled_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = redditors)]
struct NewRedditor<'a> {
  id: &'a str,
  crawled_at: NaiveDateTime,
}

impl Redditor {
  /// Register an author for later enrichment. Existing rows are left alone.
  pub fn queue(
    conn: &mut SqliteConnection,
    name: &str,
    seen_at: NaiveDateTime,
  ) -> Result<usize, diesel::result::Error> {
    diesel::insert_into(redditors::table)
      .values(NewRedditor { id: name, crawled_at: seen_at })
      .on_conflict_do_nothing()
      .execute(conn)
  }

  /// Names still waiting for a profile lookup, oldest name first
  pub fn pending_enrichment(
    conn: &mut SqliteConnection,
    limit: i64,
  ) -> Result<Vec<String>, diesel::result::Error> {
    redditors::table
      .filter(redditors::link_karma.is_null())
      .order(redditors::id.asc())
      .select(redditors::id)
      .limit(limit)
      .load(conn)
  }

  pub fn update_profile(
    conn: &mut SqliteConnection,
    name: &str,
    link_karma: i64,
    comment_karma: i64,
    created_utc: Option<NaiveDateTime>,
    fetched_at: NaiveDateTime,
  ) -> Result<usize, diesel::result::Error> {
    diesel::update(redditors::table.find(name))
      .set((
        redditors::link_karma.eq(Some(link_karma)),
        redditors::comment_karma.eq(Some(comment_karma)),
        redditors::created_utc.eq(created_utc),
        redditors::crawled_at.eq(fetched_at),
      ))
      .execute(conn)
  }

  /// Deleted or suspended account: zero karma so it is not retried
  pub fn mark_unavailable(
    conn: &mut SqliteConnection,
    name: &str,
  ) -> Result<usize, diesel::result::Error> {
    diesel::update(redditors::table.find(name))
      .set(redditors::link_karma.eq(Some(0_i64)))
      .execute(conn)
  }

  pub fn find(conn: &mut SqliteConnection, name: &str) -> Result<Option<Self>, diesel::result::Error> {
    redditors::table.find(name).select(Redditor::as_select()).first(conn).optional()
  }
}

// ===== Post =====
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = posts)]
pub struct Post {
  pub id: String,
  pub subreddit_id: String,
  pub author_id: Option<String>,
  pub title: String,
  pub selftext: String,
  pub url: Option<String>,
  pub permalink: String,
  pub flair: Option<String>,
  pub is_self: bool,
  pub over_18: bool,
  pub spoiler: bool,
  pub stickied: bool,
  pub locked: bool,
  pub score: i64,
  pub upvote_ratio: f64,
  pub num_comments: i64,
  pub created_utc: NaiveDateTime,
  pub crawled_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = posts)]
pub struct NewPost<'a> {
  pub id: &'a str,
  pub subreddit_id: &'a str,
  pub author_id: Option<&'a str>,
  pub title: &'a str,
  pub selftext: &'a str,
  pub url: Option<&'a str>,
  pub permalink: &'a str,
  pub flair: Option<&'a str>,
  pub is_self: bool,
  pub over_18: bool,
  pub spoiler: bool,
  pub stickied: bool,
  pub locked: bool,
  pub score: i64,
  pub upvote_ratio: f64,
  pub num_comments: i64,
  pub created_utc: NaiveDateTime,
  pub crawled_at: NaiveDateTime,
}

impl NewPost<'_> {
  /// Insert unless already stored; returns rows inserted (0 or 1)
  pub fn insert_if_absent(&self, conn: &mut SqliteConnection) -> Result<usize, diesel::result::Error> {
    diesel::insert_into(posts::table).values(self).on_conflict_do_nothing().execute(conn)
  }
}

impl Post {
  pub fn count_for_subreddit(
    conn: &mut SqliteConnection,
    subreddit: &str,
  ) -> Result<i64, diesel::result::Error> {
    posts::table.filter(posts::subreddit_id.eq(subreddit)).count().get_result(conn)
  }
}

// ===== Comment =====
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = comments)]
pub struct Comment {
  pub id: String,
  pub post_id: String,
  pub parent_id: Option<String>,
  pub author_id: Option<String>,
  pub body: String,
  pub score: i64,
  pub created_utc: NaiveDateTime,
  pub distinguished: Option<String>,
  pub is_submitter: bool,
  pub stickied: bool,
  pub locked: bool,
  pub depth: i32,
  pub crawled_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = comments)]
pub struct NewComment<'a> {
  pub id: &'a str,
  pub post_id: &'a str,
  /// Only set for top-level comments (the parent post id)
  pub parent_id: Option<&'a str>,
  pub author_id: Option<&'a str>,
  pub body: &'a str,
  pub score: i64,
  pub created_utc: NaiveDateTime,
  pub distinguished: Option<&'a str>,
  pub is_submitter: bool,
  pub stickied: bool,
  pub locked: bool,
  pub depth: i32,
  pub crawled_at: NaiveDateTime,
}

impl NewComment<'_> {
  pub fn insert_if_absent(&self, conn: &mut SqliteConnection) -> Result<usize, diesel::result::Error> {
    diesel::insert_into(comments::table).values(self).on_conflict_do_nothing().execute(conn)
  }
}

impl Comment {
  pub fn for_post(
    conn: &mut SqliteConnection,
    post: &str,
  ) -> Result<Vec<Self>, diesel::result::Error> {
    comments::table
      .filter(comments::post_id.eq(post))
      .order((comments::depth.asc(), comments::id.asc()))
      .select(Comment::as_select())
      .load(conn)
  }
}
