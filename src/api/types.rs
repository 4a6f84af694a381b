//! API response and query types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{DeliveryMode, DeliveryPlan};
use crate::plan::WeekSummary;

/// Optional week/mode selection shared by the plan endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PlanQuery {
    /// Any date in the target week. Invalid values select the current week.
    pub week: Option<String>,
    /// Delivery mode override.
    pub mode: Option<String>,
}

/// Plans for one week.
#[derive(Debug, Serialize)]
pub struct PlansResponse {
    /// Monday of the planned week.
    pub week: NaiveDate,
    pub mode: DeliveryMode,
    pub plans: Vec<DeliveryPlan>,
}

/// Weekday grouping for one week.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Monday of the planned week.
    pub week: NaiveDate,
    pub mode: DeliveryMode,
    pub summary: WeekSummary,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
