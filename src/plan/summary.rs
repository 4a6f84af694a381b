//! Post-hoc grouping of delivery plans by weekday.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{DeliveryPlan, Weekday};

/// One stop on a day's route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteStop {
    pub school: String,
    pub address: String,
    pub activities: usize,
    pub students: u64,
}

/// Deliveries scheduled on one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRoute {
    pub weekday: Weekday,
    pub date: NaiveDate,
    /// Stops sorted by address, then school name.
    pub stops: Vec<RouteStop>,
}

impl DayRoute {
    pub fn activity_count(&self) -> usize {
        self.stops.iter().map(|s| s.activities).sum()
    }
}

/// Aggregate view of a week's plans, computed from the builder's output.
///
/// The builder never accumulates this itself; it is always derived from an
/// already-produced plan list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekSummary {
    /// Number of deliveries across the week.
    pub deliveries: usize,
    /// Deliveries that merged more than one weekday.
    pub consolidated: usize,
    /// Activities carried across all deliveries.
    pub activities: usize,
    /// Known students served across all deliveries.
    pub students: u64,
    /// Per-weekday routes, Monday first. Days without deliveries are absent.
    pub routes: Vec<DayRoute>,
}

impl WeekSummary {
    /// Groups `plans` by delivery weekday.
    pub fn from_plans(plans: &[DeliveryPlan]) -> Self {
        let mut by_day: BTreeMap<Weekday, DayRoute> = BTreeMap::new();

        for plan in plans {
            let route = by_day
                .entry(plan.delivery_weekday)
                .or_insert_with(|| DayRoute {
                    weekday: plan.delivery_weekday,
                    date: plan.delivery_date,
                    stops: Vec::new(),
                });
            route.stops.push(RouteStop {
                school: plan.school.name.clone(),
                address: plan.school.address.clone(),
                activities: plan.activities.len(),
                students: plan.total_students(),
            });
        }

        let mut routes: Vec<DayRoute> = by_day.into_values().collect();
        for route in &mut routes {
            route.stops.sort_by(|a, b| {
                a.address
                    .cmp(&b.address)
                    .then_with(|| a.school.cmp(&b.school))
            });
        }

        Self {
            deliveries: plans.len(),
            consolidated: plans.iter().filter(|p| p.consolidated).count(),
            activities: plans.iter().map(|p| p.activities.len()).sum(),
            students: plans.iter().map(DeliveryPlan::total_students).sum(),
            routes,
        }
    }

    /// The route for `weekday`, if any delivery lands on it.
    pub fn route(&self, weekday: Weekday) -> Option<&DayRoute> {
        self.routes.iter().find(|r| r.weekday == weekday)
    }
}

impl fmt::Display for WeekSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Week Summary ---")?;
        writeln!(f, "Deliveries planned:    {}", self.deliveries)?;
        writeln!(f, "Consolidated:          {}", self.consolidated)?;
        writeln!(f, "Activities carried:    {}", self.activities)?;
        writeln!(f, "Students served:       {}", self.students)?;
        for route in &self.routes {
            writeln!(
                f,
                "{:<22} {} stop(s), {} activities ({})",
                format!("{}:", route.weekday),
                route.stops.len(),
                route.activity_count(),
                route.date
            )?;
        }
        Ok(())
    }
}
