//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::model::engine::Assumptions;
use crate::model::infrastructure::CostRates;
use crate::model::market::MarketType;
use crate::model::revenue::TariffRates;
use crate::model::supply_curve::{CurvePoint, SupplyCurve};
use crate::model::types::{CapacityMarketState, DataCenterProfile, UtilityProfile};

/// Top-level projection configuration parsed from TOML.
///
/// All fields have defaults matching the PJM reference preset. Load from
/// TOML with [`ProjectionConfig::from_toml_file`] or use a named preset via
/// [`ProjectionConfig::from_preset`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Horizon and connection timing.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Utility under study.
    #[serde(default)]
    pub utility: UtilityConfig,
    /// New large load parameters.
    #[serde(default)]
    pub datacenter: DataCenterConfig,
    /// Infrastructure cost rates.
    #[serde(default)]
    pub costs: CostsConfig,
    /// Retail tariff rates.
    #[serde(default)]
    pub tariff: TariffConfig,
    /// Capacity supply curve.
    #[serde(default)]
    pub supply_curve: SupplyCurveConfig,
}

/// Horizon and connection timing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Projection horizon in years (must be in 1..=50).
    pub projection_years: u32,
    /// Construction lag between input year 0 and connection.
    pub construction_lag_years: u32,
    /// Linear capacity ramp length in years (<= 1 means no ramp).
    pub ramp_years: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            projection_years: 10,
            construction_lag_years: 1,
            ramp_years: 3,
        }
    }
}

/// Utility under study, including optional ISO-scope capacity figures.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UtilityConfig {
    /// Display name.
    pub name: String,
    /// Residential meter count.
    pub residential_customers: u64,
    /// All meters, residential included.
    pub total_customers: u64,
    /// Utility system peak (MW).
    pub system_peak_mw: f64,
    /// Current average residential monthly bill ($).
    pub average_monthly_bill: f64,
    /// Current average residential monthly usage (kWh).
    pub average_monthly_usage_kwh: f64,
    /// Market structure (`"regulated"`, `"pjm"`, `"ercot"`, ...).
    pub market: MarketType,
    /// Residential base allocation (0.0–1.0).
    pub base_residential_allocation: f64,
    /// Socialized-cost pass-through fraction (0.0–1.0).
    pub capacity_cost_pass_through: f64,
    /// Whether capacity-market spillover applies.
    pub has_capacity_market: bool,
    /// Last auction clearing price ($/MW-day), if known.
    pub current_capacity_price: Option<f64>,
    /// ISO-scope capacity figures; required when `has_capacity_market`.
    pub capacity_market: Option<CapacityMarketConfig>,
}

impl Default for UtilityConfig {
    fn default() -> Self {
        // PJM reference values.
        Self {
            name: "PJM Mid-Atlantic".to_string(),
            residential_customers: 1_600_000,
            total_customers: 1_950_000,
            system_peak_mw: 8_200.0,
            average_monthly_bill: 132.0,
            average_monthly_usage_kwh: 870.0,
            market: MarketType::Pjm,
            base_residential_allocation: MarketType::Pjm.default_residential_allocation(),
            capacity_cost_pass_through: 0.92,
            has_capacity_market: true,
            current_capacity_price: Some(270.0),
            capacity_market: Some(CapacityMarketConfig {
                installed_capacity_mw: 13_100.0,
                peak_load_mw: 11_900.0,
            }),
        }
    }
}

/// ISO-scope capacity and peak figures.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapacityMarketConfig {
    /// Accredited capacity in the market (MW).
    pub installed_capacity_mw: f64,
    /// Market coincident peak (MW).
    pub peak_load_mw: f64,
}

/// New large load parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataCenterConfig {
    /// Nameplate capacity (MW).
    pub capacity_mw: f64,
    /// Firm-operation load factor ((0.0, 1.0]).
    pub firm_load_factor: f64,
    /// Flexible-operation load factor ((0.0, 1.0]).
    pub flex_load_factor: f64,
    /// Firm peak coincidence ([0.0, 1.0]).
    pub firm_peak_coincidence: f64,
    /// Flexible peak coincidence ([0.0, 1.0]).
    pub flex_peak_coincidence: f64,
    /// On-site dispatchable generation (MW).
    pub onsite_generation_mw: f64,
}

impl Default for DataCenterConfig {
    fn default() -> Self {
        Self {
            capacity_mw: 1_000.0,
            firm_load_factor: 0.80,
            flex_load_factor: 0.78,
            firm_peak_coincidence: 1.0,
            flex_peak_coincidence: 0.75,
            onsite_generation_mw: 200.0,
        }
    }
}

/// Infrastructure cost rates.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostsConfig {
    /// General inflation rate (fraction per year).
    pub inflation_rate: f64,
    /// Aging-infrastructure replacement rate (fraction per year).
    pub infrastructure_upgrade_rate: f64,
    /// One-time transmission interconnection cost ($/MW).
    pub transmission_cost_per_mw: f64,
    /// One-time distribution interconnection cost ($/MW).
    pub distribution_cost_per_mw: f64,
    /// Annualization rate for one-time costs (fraction per year).
    pub fixed_charge_rate: f64,
    /// Generation capacity cost ($/MW-year).
    pub capacity_cost_per_mw_year: f64,
}

impl Default for CostsConfig {
    fn default() -> Self {
        let rates = CostRates::default();
        Self {
            inflation_rate: rates.inflation_rate,
            infrastructure_upgrade_rate: rates.infrastructure_upgrade_rate,
            transmission_cost_per_mw: rates.transmission_cost_per_mw,
            distribution_cost_per_mw: rates.distribution_cost_per_mw,
            fixed_charge_rate: rates.fixed_charge_rate,
            capacity_cost_per_mw_year: rates.capacity_cost_per_mw_year,
        }
    }
}

/// Retail tariff rates.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    /// Coincident-peak demand charge ($/MW-month).
    pub coincident_peak_charge_per_mw_month: f64,
    /// Non-coincident demand charge ($/MW-month).
    pub non_coincident_charge_per_mw_month: f64,
    /// Tariff energy rate ($/kWh).
    pub energy_rate_per_kwh: f64,
}

impl Default for TariffConfig {
    fn default() -> Self {
        let tariff = TariffRates::default();
        Self {
            coincident_peak_charge_per_mw_month: tariff.coincident_peak_charge_per_mw_month,
            non_coincident_charge_per_mw_month: tariff.non_coincident_charge_per_mw_month,
            energy_rate_per_kwh: tariff.energy_rate_per_kwh,
        }
    }
}

/// Capacity supply curve: CONE plus `[reserve_margin, multiplier]` pairs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SupplyCurveConfig {
    /// Cost of new entry ($/MW-day).
    pub cone_per_mw_day: f64,
    /// Breakpoints as `[reserve_margin, multiplier]`, descending margins.
    pub points: Vec<[f64; 2]>,
}

impl Default for SupplyCurveConfig {
    fn default() -> Self {
        Self {
            cone_per_mw_day: 300.0,
            points: vec![
                [0.25, 0.20],
                [0.20, 0.50],
                [0.15, 1.00],
                [0.10, 1.25],
                [0.05, 2.00],
                [0.02, 3.00],
            ],
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"utility.system_peak_mw"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

/// Resolved model inputs produced from a validated configuration.
#[derive(Debug, Clone)]
pub struct ResolvedInputs {
    pub utility: UtilityProfile,
    pub datacenter: DataCenterProfile,
    pub assumptions: Assumptions,
    pub projection_years: u32,
}

impl ProjectionConfig {
    /// Returns the PJM reference preset (capacity market near its VRR knee).
    pub fn pjm_mid_atlantic() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            utility: UtilityConfig::default(),
            datacenter: DataCenterConfig::default(),
            costs: CostsConfig::default(),
            tariff: TariffConfig::default(),
            supply_curve: SupplyCurveConfig::default(),
        }
    }

    /// Returns the ERCOT reference preset: energy-only market, no capacity
    /// spillover, wholesale-exposed large loads.
    pub fn ercot_gulf_coast() -> Self {
        Self {
            utility: UtilityConfig {
                name: "ERCOT Gulf Coast".to_string(),
                residential_customers: 1_100_000,
                total_customers: 1_300_000,
                system_peak_mw: 6_800.0,
                average_monthly_bill: 145.0,
                average_monthly_usage_kwh: 1_150.0,
                market: MarketType::Ercot,
                base_residential_allocation: MarketType::Ercot.default_residential_allocation(),
                capacity_cost_pass_through: 1.0,
                has_capacity_market: false,
                current_capacity_price: None,
                capacity_market: None,
            },
            ..Self::pjm_mid_atlantic()
        }
    }

    /// Returns the vertically-integrated reference preset.
    pub fn regulated_southeast() -> Self {
        Self {
            utility: UtilityConfig {
                name: "Regulated Southeast".to_string(),
                residential_customers: 1_400_000,
                total_customers: 1_650_000,
                system_peak_mw: 7_500.0,
                average_monthly_bill: 138.0,
                average_monthly_usage_kwh: 1_050.0,
                market: MarketType::Regulated,
                base_residential_allocation: MarketType::Regulated
                    .default_residential_allocation(),
                capacity_cost_pass_through: 0.85,
                has_capacity_market: false,
                current_capacity_price: None,
                capacity_market: None,
            },
            ..Self::pjm_mid_atlantic()
        }
    }

    /// Returns the MISO reference preset: capacity market with a smaller
    /// utility footprint and data center.
    pub fn miso_upper_midwest() -> Self {
        Self {
            utility: UtilityConfig {
                name: "MISO Upper Midwest".to_string(),
                residential_customers: 900_000,
                total_customers: 1_080_000,
                system_peak_mw: 5_600.0,
                average_monthly_bill: 118.0,
                average_monthly_usage_kwh: 820.0,
                market: MarketType::Miso,
                base_residential_allocation: MarketType::Miso.default_residential_allocation(),
                capacity_cost_pass_through: 0.90,
                has_capacity_market: true,
                current_capacity_price: Some(230.0),
                capacity_market: Some(CapacityMarketConfig {
                    installed_capacity_mw: 6_450.0,
                    peak_load_mw: 5_900.0,
                }),
            },
            datacenter: DataCenterConfig {
                capacity_mw: 600.0,
                onsite_generation_mw: 120.0,
                ..DataCenterConfig::default()
            },
            ..Self::pjm_mid_atlantic()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &[
        "pjm_mid_atlantic",
        "ercot_gulf_coast",
        "regulated_southeast",
        "miso_upper_midwest",
    ];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "pjm_mid_atlantic" => Ok(Self::pjm_mid_atlantic()),
            "ercot_gulf_coast" => Ok(Self::ercot_gulf_coast()),
            "regulated_southeast" => Ok(Self::regulated_southeast()),
            "miso_upper_midwest" => Ok(Self::miso_upper_midwest()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let push = |errors: &mut Vec<ConfigError>, field: &str, message: &str| {
            errors.push(ConfigError {
                field: field.into(),
                message: message.into(),
            });
        };

        let sim = &self.simulation;
        if !(1..=50).contains(&sim.projection_years) {
            push(&mut errors, "simulation.projection_years", "must be in 1..=50");
        }

        let u = &self.utility;
        if u.residential_customers == 0 {
            push(&mut errors, "utility.residential_customers", "must be > 0");
        }
        if u.total_customers < u.residential_customers {
            push(
                &mut errors,
                "utility.total_customers",
                "must be >= residential_customers",
            );
        }
        if !(u.system_peak_mw > 0.0) {
            push(&mut errors, "utility.system_peak_mw", "must be > 0");
        }
        if !(u.average_monthly_bill > 0.0) {
            push(&mut errors, "utility.average_monthly_bill", "must be > 0");
        }
        if !(u.average_monthly_usage_kwh > 0.0) {
            push(&mut errors, "utility.average_monthly_usage_kwh", "must be > 0");
        }
        if !(0.0..=1.0).contains(&u.base_residential_allocation) {
            push(
                &mut errors,
                "utility.base_residential_allocation",
                "must be in [0.0, 1.0]",
            );
        }
        if !(0.0..=1.0).contains(&u.capacity_cost_pass_through) {
            push(
                &mut errors,
                "utility.capacity_cost_pass_through",
                "must be in [0.0, 1.0]",
            );
        }
        if u.has_capacity_market && u.capacity_market.is_none() {
            push(
                &mut errors,
                "utility.capacity_market",
                "required when has_capacity_market is true",
            );
        }
        if let Some(cm) = &u.capacity_market {
            if !(cm.installed_capacity_mw > 0.0) {
                push(
                    &mut errors,
                    "utility.capacity_market.installed_capacity_mw",
                    "must be > 0",
                );
            }
            if !(cm.peak_load_mw > 0.0) {
                push(&mut errors, "utility.capacity_market.peak_load_mw", "must be > 0");
            }
        }

        let dc = &self.datacenter;
        if !(dc.capacity_mw > 0.0) {
            push(&mut errors, "datacenter.capacity_mw", "must be > 0");
        }
        if !(dc.firm_load_factor > 0.0 && dc.firm_load_factor <= 1.0) {
            push(&mut errors, "datacenter.firm_load_factor", "must be in (0.0, 1.0]");
        }
        if !(dc.flex_load_factor > 0.0 && dc.flex_load_factor <= 1.0) {
            push(&mut errors, "datacenter.flex_load_factor", "must be in (0.0, 1.0]");
        }
        if !(0.0..=1.0).contains(&dc.firm_peak_coincidence) {
            push(
                &mut errors,
                "datacenter.firm_peak_coincidence",
                "must be in [0.0, 1.0]",
            );
        }
        if !(0.0..=1.0).contains(&dc.flex_peak_coincidence) {
            push(
                &mut errors,
                "datacenter.flex_peak_coincidence",
                "must be in [0.0, 1.0]",
            );
        }
        if !(dc.onsite_generation_mw >= 0.0) || dc.onsite_generation_mw > dc.capacity_mw {
            push(
                &mut errors,
                "datacenter.onsite_generation_mw",
                "must be in [0.0, capacity_mw]",
            );
        }

        let c = &self.costs;
        for (field, value) in [
            ("costs.inflation_rate", c.inflation_rate),
            ("costs.infrastructure_upgrade_rate", c.infrastructure_upgrade_rate),
            ("costs.transmission_cost_per_mw", c.transmission_cost_per_mw),
            ("costs.distribution_cost_per_mw", c.distribution_cost_per_mw),
            ("costs.fixed_charge_rate", c.fixed_charge_rate),
            ("costs.capacity_cost_per_mw_year", c.capacity_cost_per_mw_year),
        ] {
            if !(value >= 0.0) {
                push(&mut errors, field, "must be >= 0");
            }
        }

        let t = &self.tariff;
        for (field, value) in [
            (
                "tariff.coincident_peak_charge_per_mw_month",
                t.coincident_peak_charge_per_mw_month,
            ),
            (
                "tariff.non_coincident_charge_per_mw_month",
                t.non_coincident_charge_per_mw_month,
            ),
            ("tariff.energy_rate_per_kwh", t.energy_rate_per_kwh),
        ] {
            if !(value >= 0.0) {
                push(&mut errors, field, "must be >= 0");
            }
        }

        let sc = &self.supply_curve;
        if !(sc.cone_per_mw_day > 0.0) {
            push(&mut errors, "supply_curve.cone_per_mw_day", "must be > 0");
        }
        if sc.points.len() < 2 {
            push(&mut errors, "supply_curve.points", "need at least two breakpoints");
        }
        for pair in sc.points.windows(2) {
            if !(pair[1][0] < pair[0][0]) {
                push(
                    &mut errors,
                    "supply_curve.points",
                    "reserve margins must be strictly decreasing",
                );
                break;
            }
        }

        errors
    }

    /// Converts the validated configuration into model inputs.
    ///
    /// # Errors
    ///
    /// Returns the first validation error, or a `ConfigError` if the supply
    /// curve table is malformed.
    pub fn resolve(&self) -> Result<ResolvedInputs, ConfigError> {
        if let Some(error) = self.validate().into_iter().next() {
            return Err(error);
        }

        let points = self
            .supply_curve
            .points
            .iter()
            .map(|[reserve_margin, multiplier]| CurvePoint {
                reserve_margin: *reserve_margin,
                multiplier: *multiplier,
            })
            .collect();
        let supply_curve =
            SupplyCurve::new(points, self.supply_curve.cone_per_mw_day).map_err(|e| ConfigError {
                field: "supply_curve".to_string(),
                message: e.to_string(),
            })?;

        let u = &self.utility;
        let utility = UtilityProfile {
            name: u.name.clone(),
            residential_customers: u.residential_customers,
            total_customers: u.total_customers,
            system_peak_mw: u.system_peak_mw,
            average_monthly_bill: u.average_monthly_bill,
            average_monthly_usage_kwh: u.average_monthly_usage_kwh,
            market: u.market,
            base_residential_allocation: u.base_residential_allocation,
            capacity_cost_pass_through: u.capacity_cost_pass_through,
            has_capacity_market: u.has_capacity_market,
            current_capacity_price: u.current_capacity_price,
            capacity_market: u.capacity_market.map(|cm| CapacityMarketState {
                installed_capacity_mw: cm.installed_capacity_mw,
                peak_load_mw: cm.peak_load_mw,
            }),
        };

        let dc = &self.datacenter;
        let datacenter = DataCenterProfile {
            capacity_mw: dc.capacity_mw,
            firm_load_factor: dc.firm_load_factor,
            flex_load_factor: dc.flex_load_factor,
            firm_peak_coincidence: dc.firm_peak_coincidence,
            flex_peak_coincidence: dc.flex_peak_coincidence,
            onsite_generation_mw: dc.onsite_generation_mw,
        };

        let c = &self.costs;
        let t = &self.tariff;
        let assumptions = Assumptions {
            rates: CostRates {
                inflation_rate: c.inflation_rate,
                infrastructure_upgrade_rate: c.infrastructure_upgrade_rate,
                transmission_cost_per_mw: c.transmission_cost_per_mw,
                distribution_cost_per_mw: c.distribution_cost_per_mw,
                fixed_charge_rate: c.fixed_charge_rate,
                capacity_cost_per_mw_year: c.capacity_cost_per_mw_year,
            },
            tariff: TariffRates {
                coincident_peak_charge_per_mw_month: t.coincident_peak_charge_per_mw_month,
                non_coincident_charge_per_mw_month: t.non_coincident_charge_per_mw_month,
                energy_rate_per_kwh: t.energy_rate_per_kwh,
            },
            supply_curve,
            construction_lag_years: self.simulation.construction_lag_years,
            ramp_years: self.simulation.ramp_years,
        };

        Ok(ResolvedInputs {
            utility,
            datacenter,
            assumptions,
            projection_years: self.simulation.projection_years,
        })
    }
}
