//! Presentation helpers for dates and source names

use chrono::{DateTime, Datelike, Utc};

const SOURCE_PREFIX: &str = "sources/github/";
const MAX_REPO_NAME_CHARS: usize = 20;

/// Formats a date as ordinal day plus short month, e.g. `19th Oct`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use julesync::display::format_ordinal_date;
///
/// let date = Utc.with_ymd_and_hms(2024, 10, 19, 9, 0, 0).unwrap();
/// assert_eq!(format_ordinal_date(&date), "19th Oct");
/// ```
pub fn format_ordinal_date(date: &DateTime<Utc>) -> String {
    let day = date.day();
    format!("{}{} {}", day, ordinal_suffix(day), date.format("%b"))
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Strips the `sources/github/` prefix from a source name.
///
/// Names without the prefix are returned unchanged.
pub fn clean_source_name(source: &str) -> &str {
    source.strip_prefix(SOURCE_PREFIX).unwrap_or(source)
}

/// Shortens a source or repository name to its last path segment, capped
/// at 20 characters followed by `...`.
///
/// # Examples
///
/// ```
/// use julesync::display::short_repo_name;
///
/// assert_eq!(short_repo_name("sources/github/acme/widgets"), "widgets");
/// assert_eq!(
///     short_repo_name("acme/an-exceedingly-long-repository"),
///     "an-exceedingly-long-..."
/// );
/// ```
pub fn short_repo_name(source: &str) -> String {
    let cleaned = clean_source_name(source).trim_end_matches('/');
    let last = cleaned.rsplit('/').next().unwrap_or(cleaned);
    if last.chars().count() > MAX_REPO_NAME_CHARS {
        let truncated: String = last.chars().take(MAX_REPO_NAME_CHARS).collect();
        format!("{}...", truncated)
    } else {
        last.to_string()
    }
}
