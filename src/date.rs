//! Formats post dates for display. Post dates are stored exactly as they
//! appear in the frontmatter; this module turns them into the long,
//! human-readable form used on listing pages (e.g., `January 5, 2024`).

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use std::fmt;

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DE_MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

const FR_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Parses a post date. Both plain dates (`2024-01-05`) and RFC 3339
/// timestamps (`2024-01-05T08:00:00Z`) are accepted; for timestamps only the
/// date part is kept.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    let date = date.trim();
    if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Ok(d);
    }
    match DateTime::parse_from_rfc3339(date) {
        Ok(dt) => Ok(dt.naive_local().date()),
        Err(_) => Err(Error::InvalidDate(date.to_owned())),
    }
}

/// Parses a post date as a point in time, which is what posts are ordered
/// by. Plain dates are taken as midnight UTC.
pub fn parse_instant(date: &str) -> Result<DateTime<Utc>> {
    let date = date.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Ok(dt.with_timezone(&Utc));
    }
    match NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        Some(midnight) => Ok(Utc.from_utc_datetime(&midnight)),
        None => Err(Error::InvalidDate(date.to_owned())),
    }
}

/// Formats `date` in the long form for `locale`. Unknown locales fall back to
/// US English.
pub fn format_date(date: &str, locale: &str) -> Result<String> {
    let d = parse_date(date)?;
    let month = d.month0() as usize;
    let (year, day) = (d.year(), d.day());

    let language = locale
        .split(|c: char| c == '-' || c == '_')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    Ok(match language.as_str() {
        "en" if day_first_english(locale) => {
            format!("{} {} {}", day, EN_MONTHS[month], year)
        }
        "zh" | "ja" => format!("{}年{}月{}日", year, month + 1, day),
        "ko" => format!("{}년 {}월 {}일", year, month + 1, day),
        "de" => format!("{}. {} {}", day, DE_MONTHS[month], year),
        "fr" => format!("{} {} {}", day, FR_MONTHS[month], year),
        _ => format!("{} {}, {}", EN_MONTHS[month], day, year),
    })
}

// English-speaking regions that write the day before the month.
fn day_first_english(locale: &str) -> bool {
    const REGIONS: [&str; 5] = ["GB", "AU", "NZ", "IE", "IN"];
    match locale.split(|c: char| c == '-' || c == '_').nth(1) {
        Some(region) => REGIONS.iter().any(|r| r.eq_ignore_ascii_case(region)),
        None => false,
    }
}

/// The result of a fallible date operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error formatting a date.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Returned when a post date is neither `YYYY-MM-DD` nor RFC 3339.
    InvalidDate(String),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidDate(date) => write!(f, "invalid date: `{}`", date),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_us_english() -> Result<()> {
        fixture("January 5, 2024", "2024-01-05", "en-US")
    }

    #[test]
    fn test_format_british_english() -> Result<()> {
        fixture("5 January 2024", "2024-01-05", "en-GB")
    }

    #[test]
    fn test_format_chinese() -> Result<()> {
        fixture("2024年1月5日", "2024-01-05", "zh-CN")
    }

    #[test]
    fn test_format_korean() -> Result<()> {
        fixture("2024년 12월 25일", "2024-12-25", "ko-KR")
    }

    #[test]
    fn test_format_german() -> Result<()> {
        fixture("1. März 2023", "2023-03-01", "de-DE")
    }

    #[test]
    fn test_format_french() -> Result<()> {
        fixture("14 juillet 2022", "2022-07-14", "fr")
    }

    #[test]
    fn test_format_unknown_locale_falls_back() -> Result<()> {
        fixture("August 9, 2021", "2021-08-09", "xx-YY")
    }

    #[test]
    fn test_format_timestamp() -> Result<()> {
        fixture("June 30, 2020", "2020-06-30T10:15:00Z", "en-US")
    }

    #[test]
    fn test_format_invalid_date() {
        assert_eq!(
            Err(Error::InvalidDate("yesterday".to_owned())),
            format_date("yesterday", "en-US"),
        );
    }

    #[test]
    fn test_parse_instant_converts_offsets() -> Result<()> {
        // 23:00 at UTC-5 is after 01:00 UTC on the following day
        assert!(
            parse_instant("2024-01-09T23:00:00-05:00")?
                > parse_instant("2024-01-10T01:00:00+00:00")?
        );
        assert_eq!(
            "2024-01-10T00:00:00+00:00",
            parse_instant("2024-01-10")?.to_rfc3339()
        );
        assert!(parse_instant("soon").is_err());
        Ok(())
    }

    fn fixture(wanted: &str, date: &str, locale: &str) -> Result<()> {
        assert_eq!(wanted, format_date(date, locale)?);
        Ok(())
    }
}
