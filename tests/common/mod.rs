//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use school_routes::model::{ActivitySlot, Holiday, SchoolActivities, Weekday};
use school_routes::plan::TargetWeek;

/// Monday of the reference week W (2026-10-19).
pub fn week_monday() -> NaiveDate {
    date(2026, 10, 19)
}

/// The reference week W.
pub fn week() -> TargetWeek {
    TargetWeek::containing(week_monday())
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

/// "Alpha": TC1 on Monday and CO2 on Wednesday, both starting Monday of W.
pub fn alpha() -> SchoolActivities {
    let start = Some(week_monday());
    SchoolActivities::new("Alpha", "Carrer Alpha 1", week_monday())
        .with_slot(ActivitySlot::new(Weekday::Monday, "Morning", "TC1", start))
        .with_slot(ActivitySlot::new(Weekday::Wednesday, "Afternoon", "CO2", start))
}

/// "Beta": one Monday activity whose course started the week before W.
pub fn beta() -> SchoolActivities {
    let previous = date(2026, 10, 12);
    SchoolActivities::new("Beta", "Carrer Beta 2", previous)
        .with_slot(ActivitySlot::new(Weekday::Monday, "Morning", "TC9", Some(previous)))
}

/// A holiday on `weekday` of week W.
pub fn holiday_on(weekday: Weekday) -> Holiday {
    Holiday::new(week().date_of(weekday), format!("{weekday} holiday"))
}

/// Holidays covering every weekday of W.
pub fn whole_week_holidays() -> Vec<Holiday> {
    Weekday::ALL.into_iter().map(holiday_on).collect()
}
