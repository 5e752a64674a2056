//! Dates and times, as printed by the camera's clock.
//!
//! The camera prints US-style `MM/DD/YYYY` dates and 12-hour times.  We
//! don't know the camera's timezone, so everything here is naive local time.
//! Only ASCII digits are read.

use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::rules::{first_value, Rule};

lazy_static! {
    /// Rules for finding a month-first date.
    pub static ref DATE_RULES: Vec<Rule> = vec![Rule::new(
        "month_day_year",
        Regex::new(r"\b([0-9]{2})/([0-9]{2})/([0-9]{4})\b").unwrap(),
    )];

    /// Rules for finding a 12-hour clock time.
    pub static ref TIME_RULES: Vec<Rule> = vec![Rule::new(
        "twelve_hour",
        Regex::new(r"\b([0-9]{1,2}):([0-9]{2})\s*([AP])M\b").unwrap(),
    )];
}

/// Extract a date and a time from normalized text.
///
/// Impossible dates (`13/01/2025`) and times (`13:00PM`) are treated as
/// missing.
pub fn extract_date_time(text: &str) -> (Option<NaiveDate>, Option<NaiveTime>) {
    let date = first_value(&DATE_RULES, text, parse_date);
    let time = first_value(&TIME_RULES, text, parse_time);
    (date, time)
}

fn parse_date(caps: &Captures) -> Option<NaiveDate> {
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_time(caps: &Captures) -> Option<NaiveTime> {
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }
    let hour = match (&caps[3], hour) {
        ("A", 12) => 0,
        ("A", h) => h,
        ("P", 12) => 12,
        (_, h) => h + 12,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

#[cfg(test)]
fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[cfg(test)]
fn time(h: u32, m: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0)
}

#[test]
fn reads_date_and_time() {
    assert_eq!(
        extract_date_time("12/06/2025 05:41PM"),
        (date(2025, 12, 6), time(17, 41))
    );
    assert_eq!(
        extract_date_time("01/31/2024 9:05 AM"),
        (date(2024, 1, 31), time(9, 5))
    );
}

#[test]
fn handles_noon_and_midnight() {
    assert_eq!(extract_date_time("12:00AM").1, time(0, 0));
    assert_eq!(extract_date_time("12:30PM").1, time(12, 30));
    assert_eq!(extract_date_time("11:59PM").1, time(23, 59));
}

#[test]
fn impossible_values_are_missing() {
    assert_eq!(extract_date_time("13/01/2025").0, None);
    assert_eq!(extract_date_time("02/30/2025").0, None);
    assert_eq!(extract_date_time("00/10/2025").0, None);
    assert_eq!(extract_date_time("13:00PM").1, None);
    assert_eq!(extract_date_time("0:15AM").1, None);
    assert_eq!(extract_date_time("10:60AM").1, None);
}

#[test]
fn partial_and_malformed_input() {
    assert_eq!(extract_date_time("12/6/2025 5:41").0, None);
    assert_eq!(extract_date_time("12/06/2025 5:41").1, None);
    assert_eq!(extract_date_time("12/06/20255"), (None, None));
    assert_eq!(extract_date_time(""), (None, None));
    // Without normalization, a jammed time can't be found.
    assert_eq!(
        extract_date_time("12/06/202505:41PM"),
        (None, None)
    );
}

#[test]
fn non_ascii_digits_do_not_match() {
    use crate::rules::first_captures;

    // Arabic-Indic "12/06/2025".
    let date = "\u{0661}\u{0662}/\u{0660}\u{0666}/\u{0662}\u{0660}\u{0662}\u{0665}";
    assert!(first_captures(&DATE_RULES, date).is_none());
    // Fullwidth "5:41PM".
    assert!(first_captures(&TIME_RULES, "\u{FF15}:\u{FF14}\u{FF11}PM").is_none());
    assert_eq!(extract_date_time(date), (None, None));
}
