//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{
    ErrorResponse, SummaryResponse, TrajectoryQuery, TrajectoryRecord, parse_scenario,
};
use crate::model::types::ScenarioType;

/// Returns utility identity, summary figures, and the final-year record per
/// scenario.
///
/// `GET /summary` → 200 + `SummaryResponse` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    let final_year = ScenarioType::ALL
        .into_iter()
        .filter_map(|scenario| {
            state
                .trajectory
                .scenario(scenario)
                .last()
                .map(|point| TrajectoryRecord::new(scenario, point))
        })
        .collect();

    Json(SummaryResponse {
        utility: state.utility_name.clone(),
        market: state.market,
        summary: state.summary.clone(),
        final_year,
    })
}

/// Returns trajectory records, optionally filtered by scenario and year
/// range.
///
/// `GET /trajectory` → 200 + `Vec<TrajectoryRecord>` JSON
/// `GET /trajectory?scenario=firm&from=N&to=M` → filtered (inclusive range)
/// `GET /trajectory?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_trajectory(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrajectoryQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(u32::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let scenario_filter = match &query.scenario {
        Some(name) => match parse_scenario(name) {
            Some(scenario) => Some(scenario),
            None => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!(
                            "unknown scenario \"{name}\", expected one of: Baseline, Firm, \
                             Flexible, Dispatchable"
                        ),
                    }),
                ));
            }
        },
        None => None,
    };

    let records: Vec<TrajectoryRecord> = state
        .trajectory
        .iter()
        .filter(|(scenario, _)| scenario_filter.is_none_or(|wanted| *scenario == wanted))
        .flat_map(|(scenario, points)| {
            points
                .iter()
                .filter(|point| point.year >= from && point.year <= to)
                .map(move |point| TrajectoryRecord::new(scenario, point))
        })
        .collect();

    Ok(Json(records))
}
