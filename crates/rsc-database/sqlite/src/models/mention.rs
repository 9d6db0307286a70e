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

//! Ticker mentions, one row per occurrence

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{comments, mentions, posts};

/// Longest context snippet stored with a mention
pub const CONTEXT_LEN: usize = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionSource {
  Post,
  Comment,
}

impl MentionSource {
  pub fn as_str(&self) -> &'static str {
    match self {
      MentionSource::Post => "post",
      MentionSource::Comment => "comment",
    }
  }
}

impl std::fmt::Display for MentionSource {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = mentions)]
pub struct Mention {
  pub id: i32,
  pub symbol: String,
  pub post_id: Option<String>,
  pub comment_id: Option<String>,
  pub source: String,
  pub context: Option<String>,
  pub position: i32,
  pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = mentions)]
pub struct NewMention<'a> {
  pub symbol: &'a str,
  pub post_id: Option<&'a str>,
  pub comment_id: Option<&'a str>,
  pub source: &'a str,
  pub context: Option<String>,
  pub position: i32,
  pub created_at: NaiveDateTime,
}

impl<'a> NewMention<'a> {
  pub fn for_post(
    symbol: &'a str,
    post_id: &'a str,
    context: &str,
    position: usize,
    created_at: NaiveDateTime,
  ) -> Self {
    Self {
      symbol,
      post_id: Some(post_id),
      comment_id: None,
      source: MentionSource::Post.as_str(),
      context: snippet(context),
      position: position as i32,
      created_at,
    }
  }

  pub fn for_comment(
    symbol: &'a str,
    comment_id: &'a str,
    context: &str,
    position: usize,
    created_at: NaiveDateTime,
  ) -> Self {
    Self {
      symbol,
      post_id: None,
      comment_id: Some(comment_id),
      source: MentionSource::Comment.as_str(),
      context: snippet(context),
      position: position as i32,
      created_at,
    }
  }

  pub fn insert(&self, conn: &mut SqliteConnection) -> Result<usize, diesel::result::Error> {
    diesel::insert_into(mentions::table).values(self).execute(conn)
  }
}

/// First [`CONTEXT_LEN`] characters, trimmed; `None` when nothing is left
fn snippet(text: &str) -> Option<String> {
  let cut: String = text.chars().take(CONTEXT_LEN).collect();
  let trimmed = cut.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A mention joined with whoever wrote the text it came from
#[derive(Debug, Clone, PartialEq)]
pub struct AttributedMention {
  pub symbol: String,
  pub from_post: bool,
  pub from_comment: bool,
  pub author: Option<String>,
}

impl Mention {
  /// Mentions created in `[from, to)`, oldest first
  pub fn created_between(
    conn: &mut SqliteConnection,
    from: NaiveDateTime,
    to: NaiveDateTime,
  ) -> Result<Vec<Self>, diesel::result::Error> {
    mentions::table
      .filter(mentions::created_at.ge(from))
      .filter(mentions::created_at.lt(to))
      .order(mentions::id.asc())
      .select(Mention::as_select())
      .load(conn)
  }

  pub fn all(conn: &mut SqliteConnection) -> Result<Vec<Self>, diesel::result::Error> {
    mentions::table.order(mentions::id.asc()).select(Mention::as_select()).load(conn)
  }

  /// Mentions in `[from, to)` with the author of the post or comment they
  /// were found in (post author first, then comment author).
  pub fn attributed_between(
    conn: &mut SqliteConnection,
    from: NaiveDateTime,
    to: NaiveDateTime,
  ) -> Result<Vec<AttributedMention>, diesel::result::Error> {
    let rows: Vec<(String, Option<String>, Option<String>, Option<String>, Option<String>)> =
      mentions::table
        .left_join(posts::table.on(mentions::post_id.eq(posts::id.nullable())))
        .left_join(comments::table.on(mentions::comment_id.eq(comments::id.nullable())))
        .filter(mentions::created_at.ge(from))
        .filter(mentions::created_at.lt(to))
        .order(mentions::id.asc())
        .select((
          mentions::symbol,
          mentions::post_id,
          mentions::comment_id,
          posts::author_id.nullable(),
          comments::author_id.nullable(),
        ))
        .load(conn)?;

    Ok(
      rows
        .into_iter()
        .map(|(symbol, post_id, comment_id, post_author, comment_author)| AttributedMention {
          symbol,
          from_post: post_id.is_some(),
          from_comment: comment_id.is_some(),
          author: post_author.or(comment_author),
        })
        .collect(),
    )
  }
}
