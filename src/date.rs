//! Date detection inside task folder names.
//!
//! Task folders often carry the date the work started, in whatever shape the
//! operator typed that day:
//!
//! ```text
//! t_20230105_Design_Review   → 2023-01-05
//! t_2023-01-05_Design_Review → 2023-01-05
//! t_230105_Design_Review     → 2023-01-05  (two-digit year, 2000s)
//! ```
//!
//! The pattern is `YY[YY]-?MM-?DD`: two to four year digits, then two month
//! digits and two day digits, each optionally preceded by a hyphen. Years
//! below 100 are read as 20xx. The match is a search, not an anchored match,
//! so `v20230105` is still a date.
//!
//! Out-of-range months and days roll over into the following months, the way
//! a calendar that counts forward from January 1st would read them:
//!
//! ```text
//! 20231399   → 2024-04-08  (month 13 is next January, day 99 runs into April)
//! 2023-02-30 → 2023-03-02
//! 2023-00-15 → 2022-12-15  (month 00 is the December before)
//! 2023-03-00 → 2023-02-28  (day 00 is the last day of the month before)
//! ```
//!
//! A date-shaped component therefore always yields a date; it only falls back
//! to being part of the name when the arithmetic leaves chrono's range.

use chrono::{Datelike, Days, Months, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{2,4})-?([0-9]{2})-?([0-9]{2})").unwrap());

/// Try to read a date out of a single name component.
///
/// Returns `None` when nothing date-shaped is present.
pub fn detect_date(component: &str) -> Option<NaiveDate> {
    let caps = DATE_RE.captures(component)?;
    let mut year: i32 = caps[1].parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    normalized_date(year, month, day)
}

/// Build a date from possibly out-of-range parts, carrying overflow forward.
///
/// Month and day both count from 1; zero steps back one unit.
fn normalized_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let january = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let first_of_month = match month {
        0 => january.checked_sub_months(Months::new(1))?,
        m => january.checked_add_months(Months::new(m - 1))?,
    };
    match day {
        0 => first_of_month.checked_sub_days(Days::new(1)),
        d => first_of_month.checked_add_days(Days::new(u64::from(d - 1))),
    }
}

/// `YYYYMMDD`
pub fn compact(date: NaiveDate) -> String {
    format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
}

/// `YYYY-MM-DD`
pub fn hyphenated(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// `YYYY年MM月DD日`
pub fn kanji(date: NaiveDate) -> String {
    format!("{:04}年{:02}月{:02}日", date.year(), date.month(), date.day())
}
