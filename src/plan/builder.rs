//! Weekly delivery-plan consolidation.
//!
//! Each school with eligible activities in the target week receives exactly
//! one delivery carrying the materials for every weekday it teaches that week.
//! The delivery lands on the earliest weekday that both has activities and is
//! not a holiday.
//!
//! # Filtering
//! A slot is eligible when it has a course-start date and, under
//! [`DeliveryMode::CourseStart`], that date's Monday equals the target Monday.
//! Holidays never remove materials from a delivery; they only prevent a
//! weekday from being chosen as the delivery date.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::model::{
    ActivitySlot, DeliveryMode, DeliveryPlan, Holiday, PlannedActivity, SchoolActivities, Weekday,
};

use super::week::{TargetWeek, week_start};

/// Builds one consolidated delivery per school for `week`.
///
/// Schools without eligible activities, or whose only active weekdays are
/// holidays, are omitted. The result is sorted by delivery date; schools
/// delivered on the same day keep their input order.
///
/// # Arguments
///
/// * `schools` - Per-school activity aggregates
/// * `week` - Target week (any date in it normalizes to its Monday)
/// * `mode` - Delivery timing policy
/// * `holidays` - Non-working days; only those inside `week` matter
pub fn build_delivery_plans(
    schools: &[SchoolActivities],
    week: TargetWeek,
    mode: DeliveryMode,
    holidays: &[Holiday],
) -> Vec<DeliveryPlan> {
    let eligible = eligible_weekdays(week, holidays);
    if eligible.is_empty() {
        warn!(%week, "every weekday is a holiday, no deliveries planned");
        return Vec::new();
    }

    let mut plans: Vec<DeliveryPlan> = schools
        .iter()
        .filter_map(|school| plan_school(school, week, mode, &eligible, holidays))
        .collect();

    // Vec::sort_by_key is stable, so same-day schools keep discovery order.
    plans.sort_by_key(|plan| plan.delivery_date);

    info!(
        %week,
        %mode,
        schools = schools.len(),
        plans = plans.len(),
        "delivery plans built"
    );
    plans
}

/// Weekdays of `week` that do not coincide with a holiday date.
pub fn eligible_weekdays(week: TargetWeek, holidays: &[Holiday]) -> BTreeSet<Weekday> {
    Weekday::ALL
        .into_iter()
        .filter(|day| {
            let date = week.date_of(*day);
            !holidays.iter().any(|h| h.date == date)
        })
        .collect()
}

/// Whether `slot` may be delivered in `week` under `mode`.
fn slot_is_eligible(slot: &ActivitySlot, week: TargetWeek, mode: DeliveryMode) -> bool {
    let Some(course_start) = slot.course_start else {
        return false;
    };
    match mode {
        DeliveryMode::CourseStart => week_start(course_start) == week.monday(),
        DeliveryMode::PerTerm | DeliveryMode::AdHoc => true,
    }
}

fn plan_school(
    school: &SchoolActivities,
    week: TargetWeek,
    mode: DeliveryMode,
    eligible: &BTreeSet<Weekday>,
    holidays: &[Holiday],
) -> Option<DeliveryPlan> {
    let surviving: BTreeMap<Weekday, Vec<ActivitySlot>> = school
        .iter()
        .filter_map(|(day, slots)| {
            let kept: Vec<ActivitySlot> = slots
                .iter()
                .filter(|slot| slot_is_eligible(slot, week, mode))
                .cloned()
                .collect();
            (!kept.is_empty()).then_some((day, kept))
        })
        .collect();

    if surviving.is_empty() {
        debug!(school = %school.name, "no eligible activities this week");
        return None;
    }

    let Some(delivery_weekday) = surviving.keys().copied().find(|day| eligible.contains(day)) else {
        debug!(school = %school.name, "all active weekdays are holidays, deferring");
        return None;
    };

    let activities: Vec<PlannedActivity> = surviving
        .values()
        .flatten()
        .map(PlannedActivity::from)
        .collect();
    let weekdays: Vec<Weekday> = surviving.keys().copied().collect();
    let delivery_date = week.date_of(delivery_weekday);
    let rationale = rationale(
        activities.len(),
        &weekdays,
        delivery_weekday,
        week,
        holidays,
    );

    debug!(school = %school.name, %delivery_date, activities = activities.len(), "planned");

    Some(DeliveryPlan {
        school: school.filtered(surviving),
        delivery_date,
        delivery_weekday,
        consolidated: weekdays.len() > 1,
        activities,
        rationale,
    })
}

/// Explains the chosen date in one sentence.
fn rationale(
    activity_count: usize,
    weekdays: &[Weekday],
    delivery_weekday: Weekday,
    week: TargetWeek,
    holidays: &[Holiday],
) -> String {
    let delivery_date = week.date_of(delivery_weekday);
    let activity_noun = if activity_count == 1 { "activity" } else { "activities" };

    let mut text = if weekdays.len() > 1 {
        let names: Vec<&str> = weekdays.iter().map(|d| d.as_str()).collect();
        format!(
            "Consolidated {activity_count} {activity_noun} from {} weekdays ({}) into one delivery on {delivery_weekday} {delivery_date}",
            weekdays.len(),
            names.join(", ")
        )
    } else {
        format!(
            "{activity_count} {activity_noun} on {delivery_weekday}, delivered on {delivery_weekday} {delivery_date}"
        )
    };

    let skipped: Vec<String> = weekdays
        .iter()
        .take_while(|day| **day != delivery_weekday)
        .filter_map(|day| {
            let date = week.date_of(*day);
            holidays
                .iter()
                .find(|h| h.date == date)
                .map(|h| format!("{day} is {}", h.name))
        })
        .collect();
    if !skipped.is_empty() {
        text.push_str(&format!(" ({})", skipped.join("; ")));
    }
    text
}
