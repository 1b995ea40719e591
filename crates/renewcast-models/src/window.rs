use std::fmt;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// A named time range resolved to absolute timestamps at evaluation time.
///
/// Tags are stable (they appear in cache keys); labels are what the
/// dashboard prints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    Tomorrow,
    ThisWeek,
    NextWeek,
    ThisMonth,
    NextMonth,
    ThisQuarter,
    NextQuarter,
    ThisYear,
    NextYear,
}

/// An inclusive `[begin, end]` timestamp pair in the evaluator's local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRange {
    pub begin: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Window {
    /// All windows in dashboard display order.
    pub const ALL: [Window; 9] = [
        Window::Tomorrow,
        Window::ThisWeek,
        Window::NextWeek,
        Window::ThisMonth,
        Window::NextMonth,
        Window::ThisQuarter,
        Window::NextQuarter,
        Window::ThisYear,
        Window::NextYear,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Window::Tomorrow => "tomorrow",
            Window::ThisWeek => "this_week",
            Window::NextWeek => "next_week",
            Window::ThisMonth => "this_month",
            Window::NextMonth => "next_month",
            Window::ThisQuarter => "this_quarter",
            Window::NextQuarter => "next_quarter",
            Window::ThisYear => "this_year",
            Window::NextYear => "next_year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Window::Tomorrow => "Tomorrow",
            Window::ThisWeek => "This Week",
            Window::NextWeek => "Next Week",
            Window::ThisMonth => "This Month",
            Window::NextMonth => "Next Month",
            Window::ThisQuarter => "This Quarter",
            Window::NextQuarter => "Next Quarter",
            Window::ThisYear => "This Year",
            Window::NextYear => "Next Year",
        }
    }

    /// Resolve this window relative to `now`.
    ///
    /// Both bounds are inclusive and `begin <= end` holds for any `now`.
    /// Week windows use strictly-next weekday semantics: resolved on a
    /// Sunday, `this_week` ends on the *following* Sunday.
    pub fn resolve(self, now: NaiveDateTime) -> WindowRange {
        let today = now.date();
        match self {
            Window::Tomorrow => {
                let tomorrow = plus_days(today, 1);
                range(tomorrow, tomorrow)
            }
            Window::ThisWeek => range(today, next_weekday(today, Weekday::Sun)),
            Window::NextWeek => {
                let monday = next_weekday(today, Weekday::Mon);
                range(monday, plus_days(monday, 6))
            }
            Window::ThisMonth => range(today, last_day_of_month(today.year(), today.month())),
            Window::NextMonth => {
                let (year, month) = month_after(today.year(), today.month());
                range(ymd(year, month, 1), last_day_of_month(year, month))
            }
            Window::ThisQuarter => {
                let quarter = quarter_of(today.month());
                range(today, last_day_of_month(today.year(), quarter * 3))
            }
            Window::NextQuarter => {
                let (year, quarter) = quarter_after(today.year(), quarter_of(today.month()));
                range(
                    ymd(year, quarter * 3 - 2, 1),
                    last_day_of_month(year, quarter * 3),
                )
            }
            Window::ThisYear => range(today, ymd(today.year(), 12, 31)),
            Window::NextYear => {
                range(ymd(today.year() + 1, 1, 1), ymd(today.year() + 1, 12, 31))
            }
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn range(begin: NaiveDate, end: NaiveDate) -> WindowRange {
    WindowRange {
        begin: begin.and_hms_opt(0, 0, 0).expect("valid time"),
        end: end.and_hms_opt(23, 59, 59).expect("valid time"),
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn plus_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).expect("date in range")
}

fn month_after(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Calendar quarter (1..=4) containing `month`.
fn quarter_of(month: u32) -> u32 {
    (month - 1) / 3 + 1
}

fn quarter_after(year: i32, quarter: u32) -> (i32, u32) {
    if quarter == 4 {
        (year + 1, 1)
    } else {
        (year, quarter + 1)
    }
}

fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = month_after(year, month);
    ymd(next_year, next_month, 1)
        .pred_opt()
        .expect("date in range")
}

/// Strictly-next occurrence of `target`: lands seven days out when `from`
/// already falls on `target`.
fn next_weekday(from: NaiveDate, target: Weekday) -> NaiveDate {
    let ahead = (target.num_days_from_monday() as i64
        - from.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    plus_days(from, if ahead == 0 { 7 } else { ahead as u64 })
}
