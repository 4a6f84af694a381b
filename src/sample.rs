//! Built-in school datasets.
//!
//! [`schools`] is the fallback shown when no schedule sheet is available.
//! [`synthetic`] produces reproducible random datasets for demos and tests.

use chrono::{Days, NaiveDate, NaiveTime};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::model::{ActivitySlot, SchoolActivities, Weekday};
use crate::plan::week::{TargetWeek, week_start};

const TURNS: [&str; 2] = ["Matí", "Tarda"];
const ACTIVITY_PREFIXES: [&str; 4] = ["TC", "CO", "RB", "EX"];

/// Hard-coded sample schools whose courses start in the week of `week`.
///
/// One school started the week before, so course-start planning always
/// leaves at least one school out.
pub fn schools(week: NaiveDate) -> Vec<SchoolActivities> {
    let target = TargetWeek::containing(week);
    let monday = target.monday();
    let previous = target.previous().monday();
    let nine = NaiveTime::from_hms_opt(9, 0, 0);
    let three = NaiveTime::from_hms_opt(15, 0, 0);

    let slot = |day: Weekday,
                turn: &str,
                code: &str,
                start: NaiveDate,
                time: Option<NaiveTime>,
                students: u32| {
        let mut s = ActivitySlot::new(day, turn, code, Some(start)).with_students(students);
        s.start_time = time;
        s
    };

    vec![
        SchoolActivities::new("Escola Mediterrània", "Carrer de la Maquinista 1, Barcelona", monday)
            .with_slot(slot(Weekday::Monday, "Matí", "TC1", monday, nine, 24))
            .with_slot(slot(Weekday::Wednesday, "Tarda", "CO2", monday, three, 22)),
        SchoolActivities::new("Institut Joan Miró", "Carrer de la Diputació 15, Barcelona", monday)
            .with_slot(slot(Weekday::Tuesday, "Matí", "RB1", monday, nine, 28)),
        SchoolActivities::new("Escola Els Llorers", "Carrer d'Aribau 50, Barcelona", monday)
            .with_slot(slot(Weekday::Thursday, "Tarda", "EX3", monday, three, 19))
            .with_slot(slot(Weekday::Friday, "Matí", "TC4", monday, nine, 21)),
        SchoolActivities::new("Escola Pia Sant Antoni", "Ronda de Sant Pau 72, Barcelona", previous)
            .with_slot(slot(Weekday::Monday, "Matí", "CO1", previous, nine, 25)),
        SchoolActivities::new("Escola Bogatell", "", monday)
            .with_slot(slot(Weekday::Monday, "Tarda", "RB2", monday, three, 18))
            .with_slot(slot(Weekday::Tuesday, "Tarda", "RB3", monday, three, 17))
            .with_slot(slot(Weekday::Friday, "Matí", "TC2", monday, nine, 20)),
    ]
}

/// Generates `count` random schools around the week of `week`.
///
/// Course starts fall within two weeks either side of the target week; about
/// one slot in ten has no course-start date. Identical `seed` values yield
/// identical datasets.
pub fn synthetic(seed: u64, count: usize, week: NaiveDate) -> Vec<SchoolActivities> {
    let mut rng = StdRng::seed_from_u64(seed);
    let monday = week_start(week);

    (0..count)
        .map(|i| {
            let school_start = shift_weeks(monday, rng.random_range(-2..=2));
            let mut school = SchoolActivities::new(
                format!("School {i:03}"),
                format!("Carrer Sintètic {}, Barcelona", rng.random_range(1..=200)),
                school_start,
            );

            let slot_count = rng.random_range(1..=6);
            for _ in 0..slot_count {
                let day = Weekday::ALL[rng.random_range(0..Weekday::ALL.len())];
                let turn = TURNS[rng.random_range(0..TURNS.len())];
                let code = format!(
                    "{}{}",
                    ACTIVITY_PREFIXES[rng.random_range(0..ACTIVITY_PREFIXES.len())],
                    rng.random_range(1..=9)
                );
                let course_start = if rng.random_bool(0.1) {
                    None
                } else if rng.random_bool(0.6) {
                    Some(school_start)
                } else {
                    Some(shift_weeks(monday, rng.random_range(-2..=2)))
                };
                let mut slot = ActivitySlot::new(day, turn, code, course_start);
                let hour = if turn == TURNS[0] { 9 } else { 15 };
                if let Some(time) = NaiveTime::from_hms_opt(hour, 0, 0) {
                    slot = slot.with_start_time(time);
                }
                if rng.random_bool(0.8) {
                    slot.student_count = Some(rng.random_range(10..=30));
                }
                school.push(slot);
            }
            school
        })
        .collect()
}

fn shift_weeks(monday: NaiveDate, weeks: i64) -> NaiveDate {
    let days = Days::new(weeks.unsigned_abs() * 7);
    let shifted = if weeks >= 0 {
        monday.checked_add_days(days)
    } else {
        monday.checked_sub_days(days)
    };
    shifted.unwrap_or(monday)
}
