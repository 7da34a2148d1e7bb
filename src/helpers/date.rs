//! Date helper functions

use chrono::{DateTime, SecondsFormat, Utc};

use crate::content::parse_date;

/// Format an authored date string for display.
///
/// Unparsable dates are shown as written.
///
/// # Examples
/// ```ignore
/// display_date("2024-01-15", "%Y년 %-m월 %-d일") // -> "2024년 1월 15일"
/// ```
pub fn display_date(date: &str, format: &str) -> String {
    match parse_date(date) {
        Some(dt) => dt.format(format).to_string(),
        None => date.trim().to_string(),
    }
}

/// Machine-readable form for `<time datetime>` attributes
pub fn datetime_attr(date: &str) -> String {
    match parse_date(date) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

/// Format a date in W3C datetime format (sitemaps, feeds)
pub fn date_xml(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}
