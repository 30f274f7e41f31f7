//! Lenient calendar-date decoding.
//!
//! Project bounds are calendar dates, but clients sometimes send full
//! timestamps. Anything carrying a time of day is truncated to its date so
//! that ordering checks compare dates only. Years are limited to four digits.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, de};

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Whether `date` has a year in `MIN_YEAR..=MAX_YEAR`. Only those dates
/// format as `YYYY-MM-DD` text that sorts in date order.
pub fn is_supported(date: NaiveDate) -> bool {
  (MIN_YEAR..=MAX_YEAR).contains(&date.year())
}

/// Parse `YYYY-MM-DD`, an RFC 3339 timestamp, or a naive
/// `YYYY-MM-DDTHH:MM:SS[.f]` timestamp into a calendar date.
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
  let s = s.trim();
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
    .or_else(|| {
      NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
    })
    .filter(|date| is_supported(*date))
}

/// `deserialize_with` helper for a required date field.
pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
  D: Deserializer<'de>,
{
  let s = String::deserialize(deserializer)?;
  parse_calendar_date(&s)
    .ok_or_else(|| de::Error::custom(format!("invalid date: {s:?}")))
}

/// `deserialize_with` helper for an optional date field. Pair with
/// `#[serde(default)]` so an absent field becomes `None`.
pub fn deserialize_opt<'de, D>(
  deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<String>::deserialize(deserializer)? {
    Some(s) => parse_calendar_date(&s)
      .map(Some)
      .ok_or_else(|| de::Error::custom(format!("invalid date: {s:?}"))),
    None => Ok(None),
  }
}
