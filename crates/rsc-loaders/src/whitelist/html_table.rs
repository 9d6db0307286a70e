//! Tolerant scanning of `<table>` markup into header and row text.
//!
//! Only what the listing pages need: cells are reduced to their visible text
//! (footnote markers removed, entities decoded, whitespace collapsed). A table
//! nested inside a cell is matched to its own closing tag and left out of the
//! outer table's text.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static TABLE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</?table\b[^>]*>").unwrap());
static ROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>").unwrap());
static CELL: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?is)<(th|td)\b[^>]*>(.*?)</(?:th|td)>").unwrap());
static FOOTNOTE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?is)<sup\b[^>]*>.*?</sup>").unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlTable {
  pub headers: Vec<String>,
  pub rows: Vec<Vec<String>>,
}

impl HtmlTable {
  /// Values of every column whose header satisfies `matches`, row by row
  pub fn column_values<F>(&self, matches: F) -> Vec<&str>
  where
    F: Fn(&str) -> bool,
  {
    let indexes: Vec<usize> =
      self.headers.iter().enumerate().filter(|(_, h)| matches(h)).map(|(i, _)| i).collect();

    indexes
      .iter()
      .flat_map(|&i| self.rows.iter().filter_map(move |row| row.get(i)))
      .map(String::as_str)
      .filter(|v| !v.is_empty())
      .collect()
  }
}

/// All tables of a document in order. The first row made only of `<th>`
/// cells is the header; rows before it are dropped.
pub fn parse_tables(html: &str) -> Vec<HtmlTable> {
  top_level_tables(html)
    .into_iter()
    .map(|span| parse_table(&without_nested_tables(&html[span.body])))
    .collect()
}

#[derive(Debug, PartialEq)]
struct TableSpan {
  /// From `<table` through the matching `</table>`
  outer: Range<usize>,
  /// Between the opening and the matching closing tag
  body: Range<usize>,
}

/// Outermost tables, pairing tags by depth. A table left open runs to the
/// end of the document; stray closing tags are ignored.
fn top_level_tables(html: &str) -> Vec<TableSpan> {
  let mut spans = Vec::new();
  let mut depth = 0usize;
  let mut open = 0..0;

  for tag in TABLE_TAG.find_iter(html) {
    if tag.as_str().starts_with("</") {
      match depth {
        0 => {}
        1 => {
          depth = 0;
          spans.push(TableSpan { outer: open.start..tag.end(), body: open.end..tag.start() });
        }
        _ => depth -= 1,
      }
    } else {
      if depth == 0 {
        open = tag.range();
      }
      depth += 1;
    }
  }

  if depth > 0 {
    spans.push(TableSpan { outer: open.start..html.len(), body: open.end..html.len() });
  }
  spans
}

fn without_nested_tables(body: &str) -> String {
  let mut out = String::with_capacity(body.len());
  let mut last = 0;
  for span in top_level_tables(body) {
    out.push_str(&body[last..span.outer.start]);
    out.push(' ');
    last = span.outer.end;
  }
  out.push_str(&body[last..]);
  out
}

fn parse_table(body: &str) -> HtmlTable {
  let mut table = HtmlTable::default();

  for row in ROW.captures_iter(body) {
    let cells: Vec<(bool, String)> = CELL
      .captures_iter(&row[1])
      .map(|cell| (cell[1].eq_ignore_ascii_case("th"), cell_text(&cell[2])))
      .collect();

    if cells.is_empty() {
      continue;
    }

    if table.headers.is_empty() {
      if cells.iter().all(|(is_header, _)| *is_header) {
        table.headers = cells.into_iter().map(|(_, text)| text).collect();
      }
      continue;
    }

    table.rows.push(cells.into_iter().map(|(_, text)| text).collect());
  }

  table
}

fn cell_text(fragment: &str) -> String {
  let without_notes = FOOTNOTE.replace_all(fragment, "");
  let without_tags = TAG.replace_all(&without_notes, " ");
  let decoded = html_escape::decode_html_entities(&without_tags);
  WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}
