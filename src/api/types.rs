//! API response and query types.
//!
//! Field names follow CSV schema v1 conventions for consistency across
//! export formats.

use serde::{Deserialize, Serialize};

use crate::model::market::MarketType;
use crate::model::summary::Summary;
use crate::model::types::{ScenarioType, YearPoint};

/// Combined summary response: utility identity, comparison figures, and the
/// final-year record per scenario.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Utility display name.
    pub utility: String,
    /// Market structure.
    pub market: MarketType,
    /// Final-year bills and deltas.
    pub summary: Summary,
    /// Final-year record per scenario, in declaration order.
    pub final_year: Vec<TrajectoryRecord>,
}

/// Single trajectory record using CSV schema v1 field names.
#[derive(Debug, Serialize)]
pub struct TrajectoryRecord {
    /// Scenario label (`"Baseline"`, `"Firm"`, ...).
    pub scenario: &'static str,
    /// Year index from projection start.
    pub year: u32,
    /// Projected average residential monthly bill ($).
    pub monthly_bill: f64,
    /// Annualized transmission interconnection cost ($/year).
    pub transmission_cost: f64,
    /// Annualized distribution interconnection cost ($/year).
    pub distribution_cost: f64,
    /// Generation capacity cost ($/year).
    pub capacity_cost: f64,
    /// Revenue offset after flow-through ($/year).
    pub revenue_offset: f64,
    /// Socialized capacity cost ($/year).
    pub socialized_capacity_cost: f64,
    /// Residential allocation as a percentage (20.0–55.0).
    pub residential_allocation_pct: f64,
}

impl TrajectoryRecord {
    pub fn new(scenario: ScenarioType, point: &YearPoint) -> Self {
        let m = &point.metrics;
        Self {
            scenario: scenario.label(),
            year: point.year,
            monthly_bill: point.monthly_bill,
            transmission_cost: m.transmission_cost,
            distribution_cost: m.distribution_cost,
            capacity_cost: m.capacity_cost,
            revenue_offset: m.revenue_offset,
            socialized_capacity_cost: m.socialized_capacity_cost,
            residential_allocation_pct: m.residential_allocation * 100.0,
        }
    }
}

/// Optional filters for the trajectory endpoint.
#[derive(Debug, Deserialize)]
pub struct TrajectoryQuery {
    /// Scenario name filter (case-insensitive label).
    pub scenario: Option<String>,
    /// Start year (inclusive).
    pub from: Option<u32>,
    /// End year (inclusive).
    pub to: Option<u32>,
}

/// Parses a scenario label from a query parameter.
pub fn parse_scenario(name: &str) -> Option<ScenarioType> {
    ScenarioType::ALL
        .into_iter()
        .find(|s| s.label().eq_ignore_ascii_case(name))
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
