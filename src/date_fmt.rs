//! Moment-style date formatting and week-aware date arithmetic.
//!
//! Patterns are scanned left to right. `[...]` is copied verbatim, known tokens
//! are rendered from the date, anything else passes through unchanged.

use chrono::{Datelike, Days, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FormatError;

// Alternation is leftmost-first, so longer tokens must precede their prefixes.
static RE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\[[^\]]*\]|\[|YYYY|YY|Y|GGGG|GG|MMMM|MMM|Mo|MM|M|DDDD|DDDo|DDD|Do|DD|D|dddd|ddd|do|dd|d|E|Wo|WW|W|Qo|Q|HH|H|hh|h|kk|k|mm|m|ss|s|A|a",
    )
    .unwrap()
});

const MONTHS: [&str; 12] = [
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

/// Sunday-first, matching moment's `d` numbering.
const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Render `date` with a moment-style `pattern`.
pub fn format(date: &NaiveDateTime, pattern: &str) -> Result<String, FormatError> {
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut last = 0;

    for m in RE_TOKEN.find_iter(pattern) {
        out.push_str(&pattern[last..m.start()]);
        let token = m.as_str();
        if token == "[" {
            return Err(FormatError::UnterminatedLiteral {
                pattern: pattern.to_string(),
                position: m.start(),
            });
        }
        match token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            Some(literal) => out.push_str(literal),
            None => out.push_str(&render_token(token, date)),
        }
        last = m.end();
    }
    out.push_str(&pattern[last..]);

    Ok(out)
}

fn render_token(token: &str, date: &NaiveDateTime) -> String {
    let weekday = date.weekday().num_days_from_sunday() as usize;
    let month = date.month0() as usize;
    let iso = date.iso_week();
    let quarter = date.month0() / 3 + 1;

    match token {
        "YYYY" => format!("{:04}", date.year()),
        "YY" => format!("{:02}", date.year().rem_euclid(100)),
        "Y" => date.year().to_string(),
        "GGGG" => format!("{:04}", iso.year()),
        "GG" => format!("{:02}", iso.year().rem_euclid(100)),
        "MMMM" => MONTHS[month].to_string(),
        "MMM" => MONTHS[month][..3].to_string(),
        "Mo" => ordinal(date.month()),
        "MM" => format!("{:02}", date.month()),
        "M" => date.month().to_string(),
        "DDDD" => format!("{:03}", date.ordinal()),
        "DDDo" => ordinal(date.ordinal()),
        "DDD" => date.ordinal().to_string(),
        "Do" => ordinal(date.day()),
        "DD" => format!("{:02}", date.day()),
        "D" => date.day().to_string(),
        "dddd" => WEEKDAYS[weekday].to_string(),
        "ddd" => WEEKDAYS[weekday][..3].to_string(),
        "dd" => WEEKDAYS[weekday][..2].to_string(),
        "do" => ordinal(weekday as u32),
        "d" => weekday.to_string(),
        "E" => date.weekday().number_from_monday().to_string(),
        "Wo" => ordinal(iso.week()),
        "WW" => format!("{:02}", iso.week()),
        "W" => iso.week().to_string(),
        "Qo" => ordinal(quarter),
        "Q" => quarter.to_string(),
        "HH" => format!("{:02}", date.hour()),
        "H" => date.hour().to_string(),
        "hh" => format!("{:02}", twelve_hour(date.hour())),
        "h" => twelve_hour(date.hour()).to_string(),
        "kk" => format!("{:02}", one_based_hour(date.hour())),
        "k" => one_based_hour(date.hour()).to_string(),
        "mm" => format!("{:02}", date.minute()),
        "m" => date.minute().to_string(),
        "ss" => format!("{:02}", date.second()),
        "s" => date.second().to_string(),
        "A" => meridiem(date.hour()).to_string(),
        "a" => meridiem(date.hour()).to_lowercase(),
        other => other.to_string(),
    }
}

/// English ordinal: 1st, 2nd, 3rd, 4th, 11th, 12th, 13th, 21st, ...
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

fn twelve_hour(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

fn one_based_hour(hour: u32) -> u32 {
    if hour == 0 {
        24
    } else {
        hour
    }
}

fn meridiem(hour: u32) -> &'static str {
    if hour < 12 {
        "AM"
    } else {
        "PM"
    }
}

/// A new date `days` calendar days away from `date` (negative goes back).
pub fn add_days(date: NaiveDateTime, days: i64) -> Result<NaiveDateTime, FormatError> {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.ok_or(FormatError::OutOfRange { base: date, days })
}

pub fn add_weeks(date: NaiveDateTime, weeks: i64) -> Result<NaiveDateTime, FormatError> {
    let days = weeks
        .checked_mul(7)
        .ok_or(FormatError::OutOfRange { base: date, days: i64::MAX })?;
    add_days(date, days)
}

/// Move `date` to ISO weekday `weekday` (1 = Monday … 7 = Sunday) of its own
/// ISO week. Values outside 1..=7 roll into neighbouring weeks.
pub fn iso_weekday(date: NaiveDateTime, weekday: i64) -> Result<NaiveDateTime, FormatError> {
    let current = i64::from(date.weekday().number_from_monday());
    add_days(date, weekday - current)
}
