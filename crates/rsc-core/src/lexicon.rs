//! Built-in word lists.
//!
//! The whitelist builder and the mention extractor filter for different
//! reasons and keep separate lists. A listing entry like "ON" is a real
//! symbol and survives the builder, but in forum text it is almost always the
//! preposition, so the extractor drops it.

/// Single-letter symbols worth keeping (Ford, AT&T, Realty Income, Kellanova)
pub const KEEP_SINGLE: &[&str] = &["F", "T", "O", "K"];

/// Listing entries that are real symbols but read as slang or common words
/// on a trading forum.
pub const MANUAL_STOP: &[&str] = &[
  "ALL", "ARE", "BUY", "CALL", "CEO", "CFO", "MOON", "OPEN", "PLAN", "SELL", "USA", "NEW",
  "GOOD", "LOVE", "YOLO", "DD", "BIG", "DAY", "OUT",
];

/// Tokens that are too ambiguous in conversational text to count as a
/// mention even when whitelisted.
pub const AMBIGUOUS: &[&str] = &[
  "YOU", "ON", "T", "BE", "SO", "UP", "AS", "OR", "CAN", "HAS", "NOW", "HE", "BY", "AN", "AND",
  "AM", "ANY", "BEAT", "AGO", "IS", "WHERE", "NOT", "BRO", "SAY", "POST", "PLAY", "DAY", "SEE",
  "NEXT", "WELL", "WWW", "WAY", "HOPE", "BULL", "CARE", "CASH", "COOK", "COST", "LUCK", "OP",
  "MAN", "MOVE", "TOP", "JOB", "ELSE", "EVER", "FLOW", "LOW", "LOT", "REAL", "PUMP", "ROOT",
  "HIT", "NICE", "RUN", "NEAR", "BIT", "TWO", "ONE", "ADD", "BASE", "HUT", "PAY", "TRUE", "WTF",
  "GAIN", "AREN", "DEEP", "CUZ", "EAT", "FACT", "LINE", "APP", "WOW", "AIN", "EDIT", "EXP", "FAT",
  "PLUS", "BILL", "DRUG", "MAX", "NET", "AI", "K", "F", "VS", "LINK", "FORM",
];

/// Zipf frequency above which a candidate is treated as an English word
pub const COMMON_WORD_THRESHOLD: f64 = 4.0;
