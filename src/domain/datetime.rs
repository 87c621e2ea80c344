//! Timestamp encodings for note directory names and display strings.
//!
//! Every parse function here fails closed to the zero timestamp instead of
//! returning an error. Downstream code relies on that: an unparseable date
//! simply means "undated", and round-trip properties of note identifiers
//! depend on the sentinel never escalating into a failure.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

/// The sentinel "no date" timestamp: 2000-01-01T00:00:00Z.
pub fn zero() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
}

/// Checks whether a timestamp is the zero sentinel.
pub fn is_zero(t: DateTime<Utc>) -> bool {
    t == zero()
}

/// Renders a timestamp in display format: `13-03-23 @ 00:46:57`.
pub fn to_display_string(t: DateTime<Utc>) -> String {
    t.format("%y-%m-%d @ %H:%M:%S").to_string()
}

/// Renders a timestamp in directory-name format: `13.01.01-14.23.36`.
pub fn to_dir_string(t: DateTime<Utc>) -> String {
    t.format("%y.%m.%d-%H.%M.%S").to_string()
}

/// Parses the directory-name format back to a timestamp.
///
/// Accepts any single separator character between the six two-digit groups.
/// Returns the zero sentinel if the input is shorter than 17 characters,
/// doesn't match the pattern, or names an invalid calendar date.
pub fn from_dir_string(s: &str) -> DateTime<Utc> {
    if s.len() < 17 {
        return zero();
    }
    let re = Regex::new(r"(\d\d).(\d\d).(\d\d).(\d\d).(\d\d).(\d\d)").unwrap();
    let Some(caps) = re.captures(s) else {
        return zero();
    };
    let g = |i: usize| caps[i].parse::<u32>().unwrap();
    ymd_hms(2000 + g(1) as i32, g(2), g(3), g(4), g(5), g(6))
}

/// Parses the display format (`13-03-23 @ 00:46:57`) as UTC.
///
/// Returns the zero sentinel on any failure.
pub fn from_display_string(s: &str) -> DateTime<Utc> {
    let compact = s.replacen(" @", "", 1);
    match NaiveDateTime::parse_from_str(&format!("20{compact}"), "%Y-%m-%d %H:%M:%S") {
        Ok(naive) => Utc.from_utc_datetime(&naive),
        Err(_) => zero(),
    }
}

/// Reinterprets a local wall-clock time as UTC.
///
/// Stat-provided modification times arrive in local time; stripping the
/// offset keeps every stored timestamp comparable to the display and
/// directory encodings, which carry no zone information.
pub fn normalize_timezone(t: DateTime<Local>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&t.naive_local())
}

fn ymd_hms(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, min, sec))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or_else(zero)
}
