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

//! Daily per-symbol aggregates and the alerts raised from them

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{daily_stats, trend_alerts};

// ===== DailyStat =====
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = daily_stats)]
pub struct DailyStat {
  pub symbol: String,
  pub date: NaiveDate,
  pub mention_count: i32,
  pub post_mentions: i32,
  pub comment_mentions: i32,
  pub unique_authors: i32,
  pub trend_score: Option<f64>,
  pub rank: Option<i32>,
  pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = daily_stats)]
pub struct NewDailyStat {
  pub symbol: String,
  pub date: NaiveDate,
  pub mention_count: i32,
  pub post_mentions: i32,
  pub comment_mentions: i32,
  pub unique_authors: i32,
  pub updated_at: NaiveDateTime,
}

impl NewDailyStat {
  /// Write the row, replacing the counts of an existing (symbol, date) row
  pub fn upsert(&self, conn: &mut SqliteConnection) -> Result<usize, diesel::result::Error> {
    diesel::insert_into(daily_stats::table)
      .values(self)
      .on_conflict((daily_stats::symbol, daily_stats::date))
      .do_update()
      .set((
        daily_stats::mention_count.eq(self.mention_count),
        daily_stats::post_mentions.eq(self.post_mentions),
        daily_stats::comment_mentions.eq(self.comment_mentions),
        daily_stats::unique_authors.eq(self.unique_authors),
        daily_stats::updated_at.eq(self.updated_at),
      ))
      .execute(conn)
  }
}

impl DailyStat {
  /// All rows of a day, busiest symbol first
  pub fn for_date(
    conn: &mut SqliteConnection,
    day: NaiveDate,
  ) -> Result<Vec<Self>, diesel::result::Error> {
    daily_stats::table
      .filter(daily_stats::date.eq(day))
      .order((daily_stats::mention_count.desc(), daily_stats::symbol.asc()))
      .select(DailyStat::as_select())
      .load(conn)
  }

  pub fn top(
    conn: &mut SqliteConnection,
    day: NaiveDate,
    limit: i64,
  ) -> Result<Vec<Self>, diesel::result::Error> {
    daily_stats::table
      .filter(daily_stats::date.eq(day))
      .order((daily_stats::mention_count.desc(), daily_stats::symbol.asc()))
      .limit(limit)
      .select(DailyStat::as_select())
      .load(conn)
  }

  /// Rows of a day with at least `min_count` mentions
  pub fn at_least(
    conn: &mut SqliteConnection,
    day: NaiveDate,
    min_count: i32,
  ) -> Result<Vec<Self>, diesel::result::Error> {
    daily_stats::table
      .filter(daily_stats::date.eq(day))
      .filter(daily_stats::mention_count.ge(min_count))
      .order((daily_stats::mention_count.desc(), daily_stats::symbol.asc()))
      .select(DailyStat::as_select())
      .load(conn)
  }
}

// ===== TrendAlert =====
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = trend_alerts)]
pub struct TrendAlert {
  pub id: i32,
  pub symbol: String,
  pub alert_type: String,
  pub threshold: f64,
  pub current_value: f64,
  pub percent_change: Option<f64>,
  pub window_minutes: i32,
  pub message: String,
  pub priority: String,
  pub active: bool,
  pub alert_date: NaiveDate,
  pub created_at: NaiveDateTime,
  pub closed_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = trend_alerts)]
pub struct NewTrendAlert<'a> {
  pub symbol: &'a str,
  pub alert_type: &'a str,
  pub threshold: f64,
  pub current_value: f64,
  pub percent_change: Option<f64>,
  pub window_minutes: i32,
  pub message: String,
  pub priority: &'a str,
  pub active: bool,
  pub alert_date: NaiveDate,
  pub created_at: NaiveDateTime,
}

impl NewTrendAlert<'_> {
  /// Insert unless an alert of the same type exists for the symbol and day.
  /// Returns 1 for a new alert, 0 otherwise.
  pub fn insert_if_absent(&self, conn: &mut SqliteConnection) -> Result<usize, diesel::result::Error> {
    diesel::insert_into(trend_alerts::table)
      .values(self)
      .on_conflict((trend_alerts::symbol, trend_alerts::alert_type, trend_alerts::alert_date))
      .do_nothing()
      .execute(conn)
  }
}

impl TrendAlert {
  pub fn for_date(
    conn: &mut SqliteConnection,
    day: NaiveDate,
  ) -> Result<Vec<Self>, diesel::result::Error> {
    trend_alerts::table
      .filter(trend_alerts::alert_date.eq(day))
      .order(trend_alerts::id.asc())
      .select(TrendAlert::as_select())
      .load(conn)
  }
}
