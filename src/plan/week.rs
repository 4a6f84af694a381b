//! Monday-starting target weeks and lenient date parsing.

use std::fmt;

use chrono::{Datelike, Days, Local, NaiveDate};
use serde::Serialize;

use crate::model::Weekday;

/// Date layouts accepted from schedule sheets and CLI input.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Parses a calendar date, returning `None` for blank or malformed input.
///
/// Accepts ISO dates (optionally followed by a time part, as spreadsheet
/// exports emit them) and day-first European layouts.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// The current local date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A delivery week, identified by its Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TargetWeek {
    monday: NaiveDate,
}

impl TargetWeek {
    /// The week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            monday: week_start(date),
        }
    }

    /// Parses `raw`, falling back to the week containing `fallback`.
    ///
    /// Never fails: blank or malformed input selects the fallback week.
    pub fn parse_or(raw: &str, fallback: NaiveDate) -> Self {
        match parse_date(raw) {
            Some(date) => Self::containing(date),
            None => {
                tracing::debug!(input = raw, %fallback, "unparseable target week, using fallback");
                Self::containing(fallback)
            }
        }
    }

    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    /// Concrete date of `weekday` within this week.
    pub fn date_of(&self, weekday: Weekday) -> NaiveDate {
        self.monday
            .checked_add_days(Days::new(weekday.days_from_monday()))
            .unwrap_or(self.monday)
    }

    /// Whether `date` falls in this week (Monday through Sunday).
    pub fn contains(&self, date: NaiveDate) -> bool {
        week_start(date) == self.monday
    }

    /// The preceding week.
    pub fn previous(&self) -> Self {
        Self::containing(self.monday.checked_sub_days(Days::new(7)).unwrap_or(self.monday))
    }
}

impl From<NaiveDate> for TargetWeek {
    fn from(date: NaiveDate) -> Self {
        Self::containing(date)
    }
}

impl fmt::Display for TargetWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week of {}", self.monday)
    }
}
