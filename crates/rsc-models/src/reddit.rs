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

//! Documents returned by the public Reddit JSON API
//!
//! Every object is wrapped in a "thing" envelope (`{"kind": "t3", "data": {...}}`)
//! and collections come as listings with an `after` cursor for paging.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Author placeholder Reddit uses for removed accounts
pub const DELETED_AUTHOR: &str = "[deleted]";

/// Generic `{"kind", "data"}` envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thing<T> {
  pub kind: String,
  pub data: T,
}

/// Paged collection
#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
  #[serde(default)]
  pub kind: String,
  pub data: ListingData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData<T> {
  /// Cursor for the next page, absent on the last one
  #[serde(default)]
  pub after: Option<String>,

  #[serde(default)]
  pub before: Option<String>,

  #[serde(default = "Vec::new")]
  pub children: Vec<T>,
}

pub type PostListing = Listing<Thing<PostData>>;
pub type CommentListing = Listing<CommentNode>;

impl<T> Listing<Thing<T>> {
  /// Unwrap the envelopes
  pub fn into_items(self) -> Vec<T> {
    self.data.children.into_iter().map(|thing| thing.data).collect()
  }
}

/// Subreddit metadata (`/r/{name}/about.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubredditData {
  pub display_name: String,

  #[serde(default)]
  pub title: Option<String>,

  #[serde(default)]
  pub public_description: Option<String>,

  #[serde(default)]
  pub subscribers: Option<i64>,

  #[serde(default)]
  pub created_utc: Option<f64>,

  #[serde(default)]
  pub quarantine: bool,
}

/// Submission (`t3`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostData {
  pub id: String,

  #[serde(default)]
  pub subreddit: String,

  #[serde(default)]
  pub author: Option<String>,

  #[serde(default)]
  pub title: String,

  #[serde(default)]
  pub selftext: String,

  #[serde(default)]
  pub is_self: bool,

  #[serde(default)]
  pub url: Option<String>,

  #[serde(default)]
  pub permalink: String,

  #[serde(default)]
  pub score: i64,

  #[serde(default)]
  pub upvote_ratio: f64,

  #[serde(default)]
  pub num_comments: i64,

  #[serde(default)]
  pub created_utc: f64,

  #[serde(default)]
  pub over_18: bool,

  #[serde(default)]
  pub spoiler: bool,

  #[serde(default)]
  pub stickied: bool,

  #[serde(default)]
  pub locked: bool,

  #[serde(default)]
  pub is_original_content: bool,

  #[serde(default)]
  pub is_video: bool,

  #[serde(default)]
  pub distinguished: Option<String>,

  #[serde(default)]
  pub link_flair_text: Option<String>,
}

impl PostData {
  /// Author name, `None` for deleted accounts
  pub fn author(&self) -> Option<&str> {
    live_author(self.author.as_deref())
  }

  pub fn created_at(&self) -> NaiveDateTime {
    utc_from_epoch(self.created_utc)
  }

  /// Fullname as used in `parent_id` references
  pub fn fullname(&self) -> String {
    format!("t3_{}", self.id)
  }
}

/// Node of a comment tree. `more` stubs stand for unloaded children.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum CommentNode {
  #[serde(rename = "t1")]
  Comment(Box<CommentData>),

  #[serde(rename = "more")]
  More(MoreData),
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoreData {
  #[serde(default)]
  pub count: i64,

  #[serde(default)]
  pub children: Vec<String>,
}

/// Comment (`t1`)
#[derive(Debug, Clone, Deserialize)]
pub struct CommentData {
  pub id: String,

  /// Fullname of the parent: `t3_` for top level, `t1_` for replies
  pub parent_id: String,

  #[serde(default)]
  pub link_id: String,

  #[serde(default)]
  pub author: Option<String>,

  #[serde(default)]
  pub body: String,

  #[serde(default)]
  pub score: i64,

  #[serde(default)]
  pub created_utc: f64,

  #[serde(default)]
  pub distinguished: Option<String>,

  #[serde(default)]
  pub is_submitter: bool,

  #[serde(default)]
  pub stickied: bool,

  #[serde(default)]
  pub locked: bool,

  #[serde(default)]
  pub depth: i32,

  /// Reddit sends `""` when there are no replies
  #[serde(default, deserialize_with = "replies_or_empty")]
  pub replies: Option<CommentListing>,
}

impl CommentData {
  pub fn author(&self) -> Option<&str> {
    live_author(self.author.as_deref())
  }

  pub fn created_at(&self) -> NaiveDateTime {
    utc_from_epoch(self.created_utc)
  }

  /// Parent post id when this is a top-level comment
  pub fn parent_post_id(&self) -> Option<&str> {
    self.parent_id.strip_prefix("t3_")
  }
}

impl CommentListing {
  /// All loaded comments of the tree, parents before their replies.
  /// `more` stubs are dropped.
  pub fn flatten(self) -> Vec<CommentData> {
    let mut out = Vec::new();
    let mut stack: Vec<CommentNode> = self.data.children.into_iter().rev().collect();

    while let Some(node) = stack.pop() {
      if let CommentNode::Comment(mut comment) = node {
        if let Some(replies) = comment.replies.take() {
          stack.extend(replies.data.children.into_iter().rev());
        }
        out.push(*comment);
      }
    }

    out
  }
}

/// User profile (`/user/{name}/about.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
  pub name: String,

  #[serde(default)]
  pub link_karma: Option<i64>,

  #[serde(default)]
  pub comment_karma: Option<i64>,

  #[serde(default)]
  pub created_utc: Option<f64>,

  #[serde(default)]
  pub is_suspended: bool,
}

fn live_author(author: Option<&str>) -> Option<&str> {
  author.filter(|name| !name.is_empty() && *name != DELETED_AUTHOR)
}

/// Reddit timestamps are float seconds since the epoch
pub fn utc_from_epoch(secs: f64) -> NaiveDateTime {
  let whole = secs.trunc() as i64;
  let nanos = ((secs - secs.trunc()) * 1e9) as u32;
  DateTime::<Utc>::from_timestamp(whole, nanos).unwrap_or_default().naive_utc()
}

fn replies_or_empty<'de, D>(deserializer: D) -> Result<Option<CommentListing>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = serde_json::Value::deserialize(deserializer)?;
  if value.is_object() {
    serde_json::from_value(value).map(Some).map_err(serde::de::Error::custom)
  } else {
    Ok(None)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const COMMENTS: &str = r#"[
    {"kind": "Listing", "data": {"after": null, "children": [
      {"kind": "t3", "data": {"id": "abc", "title": "GME thread", "author": "poster", "created_utc": 1700000000.0}}
    ]}},
    {"kind": "Listing", "data": {"after": null, "children": [
      {"kind": "t1", "data": {"id": "c1", "parent_id": "t3_abc", "author": "alice", "body": "AAPL", "depth": 0,
        "replies": {"kind": "Listing", "data": {"children": [
          {"kind": "t1", "data": {"id": "c2", "parent_id": "t1_c1", "author": "[deleted]", "body": "TSLA", "depth": 1, "replies": ""}},
          {"kind": "more", "data": {"count": 4, "children": ["c9"]}}
        ]}}}},
      {"kind": "t1", "data": {"id": "c3", "parent_id": "t3_abc", "author": "bob", "body": "nope", "depth": 0, "replies": ""}},
      {"kind": "more", "data": {"count": 10, "children": ["c4", "c5"]}}
    ]}}
  ]"#;

  #[test]
  fn test_comment_tree_flattens_depth_first() {
    let (post, comments): (PostListing, CommentListing) = serde_json::from_str(COMMENTS).unwrap();
    let posts = post.into_items();
    assert_eq!(posts[0].fullname(), "t3_abc");

    let flat = comments.flatten();
    let ids: Vec<_> = flat.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c2", "c3"]);
    assert_eq!(flat[0].parent_post_id(), Some("abc"));
    assert_eq!(flat[1].parent_post_id(), None);
    assert_eq!(flat[1].author(), None);
    assert_eq!(flat[2].author(), Some("bob"));
  }

  #[test]
  fn test_post_listing_with_cursor() {
    let body = r#"{"kind": "Listing", "data": {"after": "t3_zzz", "children": [
      {"kind": "t3", "data": {"id": "p1", "subreddit": "wallstreetbets", "title": "t", "selftext": "", "score": 5,
        "upvote_ratio": 0.9, "num_comments": 2, "created_utc": 1700000000.5, "over_18": false, "edited": false}}
    ]}}"#;
    let listing: PostListing = serde_json::from_str(body).unwrap();
    assert_eq!(listing.data.after.as_deref(), Some("t3_zzz"));
    let posts = listing.into_items();
    assert_eq!(posts[0].score, 5);
    assert_eq!(posts[0].author(), None);
  }

  #[test]
  fn test_epoch_conversion() {
    let ts = utc_from_epoch(1700000000.0);
    assert_eq!(ts.to_string(), "2023-11-14 22:13:20");
  }

  #[test]
  fn test_suspended_user_has_no_karma() {
    let user: Thing<UserData> =
      serde_json::from_str(r#"{"kind": "t2", "data": {"name": "gone", "is_suspended": true}}"#)
        .unwrap();
    assert!(user.data.is_suspended);
    assert_eq!(user.data.link_karma, None);
  }
}
