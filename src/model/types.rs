//! Core domain records: activity slots, school aggregates, holidays and plans.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::weekday::Weekday;

/// One scheduled activity occurrence, built from a single schedule row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySlot {
    /// Day of the week the activity runs on.
    pub weekday: Weekday,
    /// Free-form turn label ("Matí", "Tarda", "Morning", ...).
    pub turn: String,
    /// Short activity identifier, e.g. `"TC1"`.
    pub activity_code: String,
    /// First day of the course run. `None` when missing or unparseable.
    pub course_start: Option<NaiveDate>,
    /// Optional clock time the session starts.
    pub start_time: Option<NaiveTime>,
    /// Optional number of enrolled students.
    pub student_count: Option<u32>,
}

impl ActivitySlot {
    /// Creates a slot with only the required fields set.
    pub fn new(
        weekday: Weekday,
        turn: impl Into<String>,
        activity_code: impl Into<String>,
        course_start: Option<NaiveDate>,
    ) -> Self {
        Self {
            weekday,
            turn: turn.into(),
            activity_code: activity_code.into(),
            course_start,
            start_time: None,
            student_count: None,
        }
    }

    pub fn with_start_time(mut self, start_time: NaiveTime) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn with_students(mut self, student_count: u32) -> Self {
        self.student_count = Some(student_count);
        self
    }
}

/// All activities scheduled at one school.
///
/// Slots are keyed by weekday; within a weekday they keep source row order.
/// Every weekday key present maps to a non-empty slot list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolActivities {
    /// School name, unique within a run.
    pub name: String,
    /// Street address used for routing.
    pub address: String,
    /// Course start taken from the first valid activity seen.
    pub course_start: NaiveDate,
    activities_by_weekday: BTreeMap<Weekday, Vec<ActivitySlot>>,
}

impl SchoolActivities {
    /// Creates a school with no activities.
    ///
    /// An empty `address` is replaced with a `"<name>, Barcelona"` placeholder.
    pub fn new(name: impl Into<String>, address: impl Into<String>, course_start: NaiveDate) -> Self {
        let name = name.into();
        let mut address = address.into().trim().to_string();
        if address.is_empty() {
            address = placeholder_address(&name);
        }
        Self {
            name,
            address,
            course_start,
            activities_by_weekday: BTreeMap::new(),
        }
    }

    /// Appends a slot under its weekday, preserving insertion order.
    pub fn push(&mut self, slot: ActivitySlot) {
        self.activities_by_weekday
            .entry(slot.weekday)
            .or_default()
            .push(slot);
    }

    /// Builder-style variant of [`SchoolActivities::push`].
    pub fn with_slot(mut self, slot: ActivitySlot) -> Self {
        self.push(slot);
        self
    }

    /// Slots scheduled on `weekday`, empty when there are none.
    pub fn slots(&self, weekday: Weekday) -> &[ActivitySlot] {
        self.activities_by_weekday
            .get(&weekday)
            .map_or(&[], Vec::as_slice)
    }

    /// Weekdays carrying at least one slot, Monday first.
    pub fn weekdays(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.activities_by_weekday.keys().copied()
    }

    /// Iterates `(weekday, slots)` pairs Monday first.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[ActivitySlot])> + '_ {
        self.activities_by_weekday
            .iter()
            .map(|(day, slots)| (*day, slots.as_slice()))
    }

    /// Total number of slots across all weekdays.
    pub fn slot_count(&self) -> usize {
        self.activities_by_weekday.values().map(Vec::len).sum()
    }

    /// Returns a copy of this school restricted to `kept` weekday slots.
    ///
    /// Weekdays whose slot list is empty are left out so the non-empty
    /// invariant holds on the copy.
    pub(crate) fn filtered(&self, kept: BTreeMap<Weekday, Vec<ActivitySlot>>) -> Self {
        Self {
            name: self.name.clone(),
            address: self.address.clone(),
            course_start: self.course_start,
            activities_by_weekday: kept
                .into_iter()
                .filter(|(_, slots)| !slots.is_empty())
                .collect(),
        }
    }
}

/// Placeholder address for schools whose row carried none.
pub fn placeholder_address(name: &str) -> String {
    format!("{name}, Barcelona")
}

/// A non-working day that blocks deliveries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

impl Holiday {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }
}

/// Delivery timing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryMode {
    /// Deliver only for courses that start in the target week.
    #[default]
    CourseStart,
    /// One delivery per term; no date window.
    PerTerm,
    /// Deliveries on request; no date window.
    AdHoc,
}

impl DeliveryMode {
    /// Accepted spellings, for error messages.
    pub const NAMES: &[&str] = &["course-start", "per-term", "ad-hoc"];

    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryMode::CourseStart => "course-start",
            DeliveryMode::PerTerm => "per-term",
            DeliveryMode::AdHoc => "ad-hoc",
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "course-start" => Ok(DeliveryMode::CourseStart),
            "per-term" => Ok(DeliveryMode::PerTerm),
            "ad-hoc" => Ok(DeliveryMode::AdHoc),
            _ => Err(format!(
                "unknown delivery mode \"{s}\", expected one of: {}",
                Self::NAMES.join(", ")
            )),
        }
    }
}

/// One activity carried by a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedActivity {
    pub weekday: Weekday,
    pub turn: String,
    pub activity_code: String,
    pub start_time: Option<NaiveTime>,
    pub student_count: Option<u32>,
}

impl From<&ActivitySlot> for PlannedActivity {
    fn from(slot: &ActivitySlot) -> Self {
        Self {
            weekday: slot.weekday,
            turn: slot.turn.clone(),
            activity_code: slot.activity_code.clone(),
            start_time: slot.start_time,
            student_count: slot.student_count,
        }
    }
}

/// The consolidated delivery for one school in one target week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryPlan {
    /// The school, restricted to the slots that survived filtering.
    pub school: SchoolActivities,
    /// Concrete delivery day within the target week.
    pub delivery_date: NaiveDate,
    /// Weekday of `delivery_date`.
    pub delivery_weekday: Weekday,
    /// Every surviving activity, Monday first.
    pub activities: Vec<PlannedActivity>,
    /// `true` when more than one weekday contributed activities.
    pub consolidated: bool,
    /// Why this date was chosen.
    pub rationale: String,
}

impl DeliveryPlan {
    /// Distinct weekdays contributing activities, Monday first.
    pub fn source_weekdays(&self) -> Vec<Weekday> {
        let mut days: Vec<Weekday> = self.activities.iter().map(|a| a.weekday).collect();
        days.dedup();
        days
    }

    /// Sum of known student counts across all activities.
    ///
    /// Widened to `u64` so sheets with very large counts cannot overflow.
    pub fn total_students(&self) -> u64 {
        self.activities
            .iter()
            .filter_map(|a| a.student_count)
            .map(u64::from)
            .sum()
    }
}

impl fmt::Display for DeliveryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self
            .activities
            .iter()
            .map(|a| a.activity_code.as_str())
            .collect();
        write!(
            f,
            "{} {:<9} {} [{}]{}",
            self.delivery_date,
            self.delivery_weekday,
            self.school.name,
            codes.join(", "),
            if self.consolidated { " (consolidated)" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn empty_address_gets_placeholder() {
        let school = SchoolActivities::new("Escola Gaudí", "  ", date(2026, 10, 19));
        assert_eq!(school.address, "Escola Gaudí, Barcelona");
    }

    #[test]
    fn slots_keep_insertion_order_per_weekday() {
        let start = Some(date(2026, 10, 19));
        let school = SchoolActivities::new("A", "Carrer 1", date(2026, 10, 19))
            .with_slot(ActivitySlot::new(Weekday::Wednesday, "Tarda", "CO2", start))
            .with_slot(ActivitySlot::new(Weekday::Monday, "Matí", "TC1", start))
            .with_slot(ActivitySlot::new(Weekday::Wednesday, "Matí", "CO3", start));

        let codes: Vec<&str> = school
            .slots(Weekday::Wednesday)
            .iter()
            .map(|s| s.activity_code.as_str())
            .collect();
        assert_eq!(codes, vec!["CO2", "CO3"]);
        assert_eq!(
            school.weekdays().collect::<Vec<_>>(),
            vec![Weekday::Monday, Weekday::Wednesday]
        );
        assert_eq!(school.slot_count(), 3);
        assert!(school.slots(Weekday::Friday).is_empty());
    }

    #[test]
    fn filtered_drops_empty_weekdays() {
        let school = SchoolActivities::new("A", "Carrer 1", date(2026, 10, 19));
        let mut kept = BTreeMap::new();
        kept.insert(Weekday::Monday, Vec::new());
        let copy = school.filtered(kept);
        assert_eq!(copy.weekdays().count(), 0);
    }

    #[test]
    fn total_students_does_not_overflow_u32() {
        let start = Some(date(2026, 10, 19));
        let slots = [
            ActivitySlot::new(Weekday::Monday, "Matí", "TC1", start).with_students(4_000_000_000),
            ActivitySlot::new(Weekday::Tuesday, "Matí", "TC2", start).with_students(4_000_000_000),
            ActivitySlot::new(Weekday::Tuesday, "Tarda", "TC3", start),
        ];
        let plan = DeliveryPlan {
            school: SchoolActivities::new("A", "Carrer 1", date(2026, 10, 19)),
            delivery_date: date(2026, 10, 19),
            delivery_weekday: Weekday::Monday,
            activities: slots.iter().map(PlannedActivity::from).collect(),
            consolidated: true,
            rationale: String::new(),
        };
        assert_eq!(plan.total_students(), 8_000_000_000);
    }

    #[test]
    fn delivery_mode_parses_loosely() {
        assert_eq!("course_start".parse(), Ok(DeliveryMode::CourseStart));
        assert_eq!("Per-Term".parse(), Ok(DeliveryMode::PerTerm));
        assert_eq!("ad-hoc".parse(), Ok(DeliveryMode::AdHoc));
        let err = "weekly".parse::<DeliveryMode>();
        assert!(err.is_err_and(|e| e.contains("course-start")));
    }
}
