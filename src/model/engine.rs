//! Trajectory engine: drives the year loop and composes the four scenarios.

use tracing::debug;

use super::allocation::allocation_for_year;
use super::error::InputError;
use super::infrastructure::{CostRates, baseline_bill, connection_cost};
use super::revenue::{TariffRates, revenue_offset};
use super::spillover::spillover;
use super::supply_curve::{SupplyCurve, reserve_margin};
use super::types::{
    DataCenterProfile, HOURS_PER_YEAR, ScenarioType, Trajectory, UtilityProfile, YearMetrics,
    YearPoint,
};

/// Model-wide assumptions: cost rates, tariff, supply curve, and connection
/// timing. Supplied as configuration; [`Assumptions::default`] carries the
/// documented defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Assumptions {
    /// Infrastructure cost rates.
    pub rates: CostRates,
    /// Retail tariff the new load is billed under.
    pub tariff: TariffRates,
    /// Capacity supply curve and CONE.
    pub supply_curve: SupplyCurve,
    /// Years between input year 0 and the connection year.
    pub construction_lag_years: u32,
    /// Years over which the new load's capacity phases in linearly;
    /// values <= 1 mean full size at connection.
    pub ramp_years: u32,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            rates: CostRates::default(),
            tariff: TariffRates::default(),
            supply_curve: SupplyCurve::default_vrr(),
            construction_lag_years: 1,
            ramp_years: 3,
        }
    }
}

/// Connection state of the new load in a given year.
///
/// Transitions are a pure function of the year index against the configured
/// connection and ramp years; there are no external triggers and no backward
/// transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnectionPhase {
    NotYetConnected,
    Ramping {
        /// Fraction of nameplate capacity online this year (0.0–1.0).
        fraction: f64,
    },
    FullyOnline,
}

impl ConnectionPhase {
    /// Phase for `year` given the connection year and ramp length.
    pub fn at(year: u32, connection_year: u32, ramp_years: u32) -> Self {
        if year < connection_year {
            return ConnectionPhase::NotYetConnected;
        }
        let steps_online = year - connection_year + 1;
        if ramp_years <= 1 || steps_online >= ramp_years {
            ConnectionPhase::FullyOnline
        } else {
            ConnectionPhase::Ramping {
                fraction: f64::from(steps_online) / f64::from(ramp_years),
            }
        }
    }

    /// Online fraction of nameplate capacity for this phase.
    pub fn fraction(&self) -> f64 {
        match self {
            ConnectionPhase::NotYetConnected => 0.0,
            ConnectionPhase::Ramping { fraction } => *fraction,
            ConnectionPhase::FullyOnline => 1.0,
        }
    }
}

/// Per-scenario operating parameters resolved from the data center profile.
struct ScenarioParams {
    load_factor: f64,
    peak_coincidence: f64,
    onsite_generation_mw: f64,
}

fn scenario_params(scenario: ScenarioType, dc: &DataCenterProfile) -> Option<ScenarioParams> {
    match scenario {
        ScenarioType::Baseline => None,
        ScenarioType::Firm => Some(ScenarioParams {
            load_factor: dc.firm_load_factor,
            peak_coincidence: dc.firm_peak_coincidence,
            onsite_generation_mw: 0.0,
        }),
        ScenarioType::Flexible => Some(ScenarioParams {
            load_factor: dc.flex_load_factor,
            peak_coincidence: dc.flex_peak_coincidence,
            onsite_generation_mw: 0.0,
        }),
        ScenarioType::Dispatchable => Some(ScenarioParams {
            load_factor: dc.flex_load_factor,
            peak_coincidence: dc.flex_peak_coincidence,
            onsite_generation_mw: dc.onsite_generation_mw,
        }),
    }
}

/// Pure, deterministic projection engine.
///
/// `(UtilityProfile, DataCenterProfile, projection_years) → Trajectory` with
/// no I/O, no shared mutable state, and no concurrency requirements; safe to
/// invoke repeatedly on every input change. Memoization lives outside, in
/// [`crate::model::memo::ProjectionCache`].
#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    assumptions: Assumptions,
}

impl Engine {
    pub fn new(assumptions: Assumptions) -> Self {
        Self { assumptions }
    }

    pub fn with_defaults() -> Self {
        Self::new(Assumptions::default())
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Projects all four scenarios across `projection_years`.
    ///
    /// Each scenario sequence has `projection_years + 1` points; year 0 is
    /// the pre-connection snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] when either profile fails boundary validation.
    pub fn project(
        &self,
        utility: &UtilityProfile,
        datacenter: &DataCenterProfile,
        projection_years: u32,
    ) -> Result<Trajectory, InputError> {
        utility.validate()?;
        datacenter.validate()?;
        debug!(
            utility = %utility.name,
            market = %utility.market,
            capacity_mw = datacenter.capacity_mw,
            years = projection_years,
            "projecting trajectory"
        );

        let capacity_price = self.resolve_capacity_price(utility)?;
        Ok(Trajectory {
            baseline: self.compose_baseline(utility, capacity_price, projection_years),
            firm: self.compose_scenario(
                utility,
                datacenter,
                ScenarioType::Firm,
                capacity_price,
                projection_years,
            )?,
            flexible: self.compose_scenario(
                utility,
                datacenter,
                ScenarioType::Flexible,
                capacity_price,
                projection_years,
            )?,
            dispatchable: self.compose_scenario(
                utility,
                datacenter,
                ScenarioType::Dispatchable,
                capacity_price,
                projection_years,
            )?,
        })
    }

    /// Capacity price feeding the allocation multiplier: the profile's known
    /// auction price, else the curve price at the current reserve margin for
    /// capacity markets, else nothing.
    fn resolve_capacity_price(&self, utility: &UtilityProfile) -> Result<Option<f64>, InputError> {
        if let Some(price) = utility.current_capacity_price {
            return Ok(Some(price));
        }
        match (utility.has_capacity_market, &utility.capacity_market) {
            (true, Some(state)) => {
                let margin = reserve_margin(state.installed_capacity_mw, state.peak_load_mw)?;
                Ok(Some(self.assumptions.supply_curve.price(margin)))
            }
            _ => Ok(None),
        }
    }

    fn compose_baseline(
        &self,
        utility: &UtilityProfile,
        capacity_price: Option<f64>,
        projection_years: u32,
    ) -> Vec<YearPoint> {
        (0..=projection_years)
            .map(|year| YearPoint {
                year,
                monthly_bill: baseline_bill(
                    utility.average_monthly_bill,
                    &self.assumptions.rates,
                    year,
                ),
                metrics: YearMetrics {
                    residential_allocation: allocation_for_year(
                        utility,
                        capacity_price,
                        0.0,
                        0.0,
                        -1,
                    ),
                    ..YearMetrics::default()
                },
            })
            .collect()
    }

    fn compose_scenario(
        &self,
        utility: &UtilityProfile,
        datacenter: &DataCenterProfile,
        scenario: ScenarioType,
        capacity_price: Option<f64>,
        projection_years: u32,
    ) -> Result<Vec<YearPoint>, InputError> {
        let params = match scenario_params(scenario, datacenter) {
            Some(params) => params,
            None => return Ok(self.compose_baseline(utility, capacity_price, projection_years)),
        };
        let connection_year = self.assumptions.construction_lag_years;
        let residential_customers = utility.residential_customers as f64;

        let mut points = Vec::with_capacity(projection_years as usize + 1);
        for year in 0..=projection_years {
            let base_bill =
                baseline_bill(utility.average_monthly_bill, &self.assumptions.rates, year);
            let years_online = i64::from(year) - i64::from(connection_year);
            let phase = ConnectionPhase::at(year, connection_year, self.assumptions.ramp_years);

            if phase == ConnectionPhase::NotYetConnected {
                points.push(YearPoint {
                    year,
                    monthly_bill: base_bill,
                    metrics: YearMetrics {
                        residential_allocation: allocation_for_year(
                            utility,
                            capacity_price,
                            0.0,
                            0.0,
                            years_online,
                        ),
                        ..YearMetrics::default()
                    },
                });
                continue;
            }

            // 1. Ramped size for this year
            let fraction = phase.fraction();
            let ramped_mw = datacenter.capacity_mw * fraction;
            let ramped_onsite_mw = params.onsite_generation_mw * fraction;
            let peak_contribution_mw =
                (ramped_mw * params.peak_coincidence - ramped_onsite_mw).max(0.0);

            // 2. Direct infrastructure cost
            let infrastructure =
                connection_cost(ramped_mw, peak_contribution_mw, &self.assumptions.rates);

            // 3. Revenue the load pays back
            let revenue = revenue_offset(
                ramped_mw,
                params.load_factor,
                params.peak_coincidence,
                utility.market,
                &self.assumptions.tariff,
            );

            // 4. Capacity-market spillover onto existing load
            let socialized = match (utility.has_capacity_market, &utility.capacity_market) {
                (true, Some(state)) => {
                    let result = spillover(
                        state,
                        &self.assumptions.supply_curve,
                        utility.system_peak_mw,
                        peak_contribution_mw,
                    )?;
                    result.socialized_cost * utility.capacity_cost_pass_through
                }
                _ => 0.0,
            };

            // 5. Residential share of the net cost
            let dc_energy_mwh = ramped_mw * params.load_factor * HOURS_PER_YEAR;
            let allocation = allocation_for_year(
                utility,
                capacity_price,
                dc_energy_mwh,
                peak_contribution_mw,
                years_online,
            );

            // 6. Monthly bill
            let net_cost = infrastructure.total() + socialized - revenue.offset;
            let monthly_delta = net_cost * allocation / residential_customers / 12.0;

            points.push(YearPoint {
                year,
                monthly_bill: base_bill + monthly_delta,
                metrics: YearMetrics {
                    transmission_cost: infrastructure.transmission,
                    distribution_cost: infrastructure.distribution,
                    capacity_cost: infrastructure.generation_capacity,
                    revenue_offset: revenue.offset,
                    socialized_capacity_cost: socialized,
                    residential_allocation: allocation,
                },
            });
        }
        Ok(points)
    }
}
