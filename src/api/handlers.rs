//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{ErrorResponse, PlanQuery, PlansResponse, SummaryResponse};
use crate::model::{DeliveryMode, DeliveryPlan, Holiday};
use crate::plan::{TargetWeek, WeekSummary, build_delivery_plans};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Resolves the query against configured defaults and builds the plans.
fn plans_for(
    state: &AppState,
    query: &PlanQuery,
) -> Result<(TargetWeek, DeliveryMode, Vec<DeliveryPlan>), ApiError> {
    let week = match &query.week {
        Some(raw) => TargetWeek::parse_or(raw, state.today),
        None => state.config.week(state.today),
    };
    let mode = match &query.mode {
        Some(raw) => raw.parse::<DeliveryMode>().map_err(|error| {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
        })?,
        None => state.config.mode(),
    };
    let plans = build_delivery_plans(&state.schools, week, mode, &state.config.holidays());
    Ok((week, mode, plans))
}

/// Returns delivery plans for the selected week.
///
/// `GET /plans` → 200 + `PlansResponse` JSON
/// `GET /plans?mode=weekly` → 400 + `ErrorResponse`
pub async fn get_plans(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlanQuery>,
) -> Result<Json<PlansResponse>, ApiError> {
    let (week, mode, plans) = plans_for(&state, &query)?;
    Ok(Json(PlansResponse {
        week: week.monday(),
        mode,
        plans,
    }))
}

/// Returns the selected week's plans grouped by delivery weekday.
///
/// `GET /summary` → 200 + `SummaryResponse` JSON
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlanQuery>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let (week, mode, plans) = plans_for(&state, &query)?;
    Ok(Json(SummaryResponse {
        week: week.monday(),
        mode,
        summary: WeekSummary::from_plans(&plans),
    }))
}

/// Returns the configured holidays.
///
/// `GET /holidays` → 200 + `Vec<Holiday>` JSON
pub async fn get_holidays(State(state): State<Arc<AppState>>) -> Json<Vec<Holiday>> {
    Json(state.config.holidays())
}
