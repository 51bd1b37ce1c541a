//! Core projection types: profiles, scenarios, and trajectory records.

use std::fmt;

use super::error::InputError;
use super::market::MarketType;

/// Hours in a projection year.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Days in a projection year, for $/MW-day capacity prices.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Utility under study, resolved from a preset or user selection.
///
/// Immutable per computation; the engine never mutates a profile
/// mid-projection.
#[derive(Debug, Clone, PartialEq)]
pub struct UtilityProfile {
    /// Display name (e.g., `"PJM Mid-Atlantic"`).
    pub name: String,
    /// Residential meter count (must be > 0).
    pub residential_customers: u64,
    /// All meters, residential included (must be >= residential).
    pub total_customers: u64,
    /// Utility system peak demand (MW, must be > 0).
    pub system_peak_mw: f64,
    /// Current average residential monthly bill ($, must be > 0).
    pub average_monthly_bill: f64,
    /// Current average residential monthly usage (kWh, must be > 0).
    pub average_monthly_usage_kwh: f64,
    /// Wholesale market structure.
    pub market: MarketType,
    /// Residential share of system cost before dynamic adjustment (0.0–1.0).
    pub base_residential_allocation: f64,
    /// Fraction of socialized capacity cost passed through to retail rates
    /// (0.0–1.0).
    pub capacity_cost_pass_through: f64,
    /// Whether capacity-market spillover applies to this utility.
    pub has_capacity_market: bool,
    /// Most recent capacity auction clearing price ($/MW-day), when known.
    pub current_capacity_price: Option<f64>,
    /// ISO-scope capacity and peak figures; required when
    /// `has_capacity_market` is set.
    pub capacity_market: Option<CapacityMarketState>,
}

/// Resolved ISO-scope market figures for reserve-margin math.
///
/// The catalog that produces these is an external collaborator; the core
/// only consumes the resolved numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityMarketState {
    /// Total accredited capacity in the market (MW, must be > 0).
    pub installed_capacity_mw: f64,
    /// Market coincident peak load (MW, must be > 0).
    pub peak_load_mw: f64,
}

impl UtilityProfile {
    /// Validates every field against its documented domain.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as an
    /// [`InputError::InvalidInput`].
    pub fn validate(&self) -> Result<(), InputError> {
        if self.residential_customers == 0 {
            return Err(InputError::invalid(
                "utility.residential_customers",
                "must be > 0",
            ));
        }
        if self.total_customers < self.residential_customers {
            return Err(InputError::invalid(
                "utility.total_customers",
                "must be >= residential_customers",
            ));
        }
        if !(self.system_peak_mw > 0.0) {
            return Err(InputError::invalid("utility.system_peak_mw", "must be > 0"));
        }
        if !(self.average_monthly_bill > 0.0) {
            return Err(InputError::invalid(
                "utility.average_monthly_bill",
                "must be > 0",
            ));
        }
        if !(self.average_monthly_usage_kwh > 0.0) {
            return Err(InputError::invalid(
                "utility.average_monthly_usage_kwh",
                "must be > 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.base_residential_allocation) {
            return Err(InputError::invalid(
                "utility.base_residential_allocation",
                "must be in [0.0, 1.0]",
            ));
        }
        if !(0.0..=1.0).contains(&self.capacity_cost_pass_through) {
            return Err(InputError::invalid(
                "utility.capacity_cost_pass_through",
                "must be in [0.0, 1.0]",
            ));
        }
        if let Some(price) = self.current_capacity_price {
            if !(price >= 0.0) {
                return Err(InputError::invalid(
                    "utility.current_capacity_price",
                    "must be >= 0",
                ));
            }
        }
        match (self.has_capacity_market, self.capacity_market) {
            (true, None) => Err(InputError::invalid(
                "utility.capacity_market",
                "required when has_capacity_market is true",
            )),
            (_, Some(state)) => state.validate(),
            (false, None) => Ok(()),
        }
    }
}

impl CapacityMarketState {
    pub fn validate(&self) -> Result<(), InputError> {
        if !(self.installed_capacity_mw > 0.0) {
            return Err(InputError::invalid(
                "utility.capacity_market.installed_capacity_mw",
                "must be > 0",
            ));
        }
        if !(self.peak_load_mw > 0.0) {
            return Err(InputError::invalid(
                "utility.capacity_market.peak_load_mw",
                "must be > 0",
            ));
        }
        Ok(())
    }
}

/// New large load connecting to the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataCenterProfile {
    /// Nameplate capacity (MW, must be > 0).
    pub capacity_mw: f64,
    /// Average draw over the year as a fraction of nameplate, firm operation
    /// (must be in (0.0, 1.0]).
    pub firm_load_factor: f64,
    /// Average draw as a fraction of nameplate, flexible operation
    /// (must be in (0.0, 1.0]).
    pub flex_load_factor: f64,
    /// Fraction of nameplate drawn during system peak, firm operation
    /// (must be in [0.0, 1.0]).
    pub firm_peak_coincidence: f64,
    /// Fraction of nameplate drawn during system peak, flexible operation
    /// (must be in [0.0, 1.0]).
    pub flex_peak_coincidence: f64,
    /// On-site dispatchable generation (MW, 0 <= value <= capacity_mw).
    pub onsite_generation_mw: f64,
}

impl DataCenterProfile {
    /// Portion of flexible load reducible during peak events.
    pub fn curtailable_fraction(&self) -> f64 {
        1.0 - self.flex_peak_coincidence
    }

    /// Validates every field against its documented domain.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as an
    /// [`InputError::InvalidInput`].
    pub fn validate(&self) -> Result<(), InputError> {
        if !(self.capacity_mw > 0.0) {
            return Err(InputError::invalid("datacenter.capacity_mw", "must be > 0"));
        }
        for (field, value) in [
            ("datacenter.firm_load_factor", self.firm_load_factor),
            ("datacenter.flex_load_factor", self.flex_load_factor),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(InputError::invalid(field, "must be in (0.0, 1.0]"));
            }
        }
        for (field, value) in [
            ("datacenter.firm_peak_coincidence", self.firm_peak_coincidence),
            ("datacenter.flex_peak_coincidence", self.flex_peak_coincidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(InputError::invalid(field, "must be in [0.0, 1.0]"));
            }
        }
        if !(self.onsite_generation_mw >= 0.0) {
            return Err(InputError::invalid(
                "datacenter.onsite_generation_mw",
                "must be >= 0",
            ));
        }
        if self.onsite_generation_mw > self.capacity_mw {
            return Err(InputError::invalid(
                "datacenter.onsite_generation_mw",
                "must be <= capacity_mw",
            ));
        }
        Ok(())
    }
}

/// Operating strategy for the new load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScenarioType {
    /// No new load; baseline escalation only.
    Baseline,
    /// Constantly-on load, full peak coincidence.
    Firm,
    /// Curtails during peak hours.
    Flexible,
    /// Flexible plus on-site generation netted against peak draw.
    Dispatchable,
}

impl ScenarioType {
    /// All scenarios, in trajectory order.
    pub const ALL: [ScenarioType; 4] = [
        ScenarioType::Baseline,
        ScenarioType::Firm,
        ScenarioType::Flexible,
        ScenarioType::Dispatchable,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ScenarioType::Baseline => "Baseline",
            ScenarioType::Firm => "Firm",
            ScenarioType::Flexible => "Flexible",
            ScenarioType::Dispatchable => "Dispatchable",
        }
    }
}

impl fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Annual cost components behind one [`YearPoint`], all in $/year except the
/// allocation fraction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct YearMetrics {
    /// Annualized transmission interconnection cost.
    pub transmission_cost: f64,
    /// Annualized distribution interconnection cost.
    pub distribution_cost: f64,
    /// Generation capacity cost for the load's effective peak contribution.
    pub capacity_cost: f64,
    /// Tariff revenue offsetting system cost (after flow-through).
    pub revenue_offset: f64,
    /// Capacity-market cost imposed on existing load.
    pub socialized_capacity_cost: f64,
    /// Residential share of net cost (0.20–0.55).
    pub residential_allocation: f64,
}

/// One projected year for one scenario. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearPoint {
    /// Year index from the start of the projection (0 = today).
    pub year: u32,
    /// Projected average residential monthly bill ($).
    pub monthly_bill: f64,
    /// Cost components behind the bill.
    pub metrics: YearMetrics,
}

/// Complete multi-scenario projection: one chronological year sequence per
/// scenario, each `projection_years + 1` long.
///
/// Scenario sequences are typed fields rather than a map keyed by
/// [`ScenarioType`] since the scenario set is fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub baseline: Vec<YearPoint>,
    pub firm: Vec<YearPoint>,
    pub flexible: Vec<YearPoint>,
    pub dispatchable: Vec<YearPoint>,
}

impl Trajectory {
    /// Year sequence for one scenario.
    pub fn scenario(&self, scenario: ScenarioType) -> &[YearPoint] {
        match scenario {
            ScenarioType::Baseline => &self.baseline,
            ScenarioType::Firm => &self.firm,
            ScenarioType::Flexible => &self.flexible,
            ScenarioType::Dispatchable => &self.dispatchable,
        }
    }

    /// Iterates scenarios in [`ScenarioType::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (ScenarioType, &[YearPoint])> {
        ScenarioType::ALL
            .into_iter()
            .map(move |s| (s, self.scenario(s)))
    }

    /// Number of projected years (points per scenario minus the year-0
    /// snapshot).
    pub fn projection_years(&self) -> u32 {
        (self.baseline.len() as u32).saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_utility() -> UtilityProfile {
        UtilityProfile {
            name: "Test Utility".to_string(),
            residential_customers: 1_000_000,
            total_customers: 1_200_000,
            system_peak_mw: 8_000.0,
            average_monthly_bill: 130.0,
            average_monthly_usage_kwh: 900.0,
            market: MarketType::Pjm,
            base_residential_allocation: 0.35,
            capacity_cost_pass_through: 0.9,
            has_capacity_market: true,
            current_capacity_price: Some(270.0),
            capacity_market: Some(CapacityMarketState {
                installed_capacity_mw: 13_100.0,
                peak_load_mw: 11_900.0,
            }),
        }
    }

    fn test_datacenter() -> DataCenterProfile {
        DataCenterProfile {
            capacity_mw: 1_000.0,
            firm_load_factor: 0.80,
            flex_load_factor: 0.78,
            firm_peak_coincidence: 1.0,
            flex_peak_coincidence: 0.75,
            onsite_generation_mw: 200.0,
        }
    }

    #[test]
    fn valid_profiles_pass() {
        assert_eq!(test_utility().validate(), Ok(()));
        assert_eq!(test_datacenter().validate(), Ok(()));
    }

    #[test]
    fn zero_residential_customers_rejected() {
        let mut utility = test_utility();
        utility.residential_customers = 0;
        let err = utility.validate().expect_err("must fail");
        assert!(err.to_string().contains("residential_customers"));
    }

    #[test]
    fn capacity_market_state_required_when_flagged() {
        let mut utility = test_utility();
        utility.capacity_market = None;
        let err = utility.validate().expect_err("must fail");
        assert!(err.to_string().contains("capacity_market"));
    }

    #[test]
    fn ercot_without_market_state_is_fine() {
        let mut utility = test_utility();
        utility.market = MarketType::Ercot;
        utility.has_capacity_market = false;
        utility.current_capacity_price = None;
        utility.capacity_market = None;
        assert_eq!(utility.validate(), Ok(()));
    }

    #[test]
    fn load_factor_domain_is_half_open() {
        let mut dc = test_datacenter();
        dc.firm_load_factor = 0.0;
        assert!(dc.validate().is_err());
        dc.firm_load_factor = 1.0;
        assert_eq!(dc.validate(), Ok(()));
    }

    #[test]
    fn onsite_generation_cannot_exceed_nameplate() {
        let mut dc = test_datacenter();
        dc.onsite_generation_mw = dc.capacity_mw + 1.0;
        let err = dc.validate().expect_err("must fail");
        assert!(err.to_string().contains("onsite_generation_mw"));
    }

    #[test]
    fn nan_peak_rejected() {
        let mut utility = test_utility();
        utility.system_peak_mw = f64::NAN;
        assert!(utility.validate().is_err());
    }

    #[test]
    fn curtailable_fraction_complements_coincidence() {
        let dc = test_datacenter();
        assert!((dc.curtailable_fraction() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn trajectory_scenario_accessor_matches_fields() {
        let point = YearPoint {
            year: 0,
            monthly_bill: 100.0,
            metrics: YearMetrics::default(),
        };
        let trajectory = Trajectory {
            baseline: vec![point],
            firm: vec![point, point],
            flexible: vec![point],
            dispatchable: vec![point],
        };
        assert_eq!(trajectory.scenario(ScenarioType::Firm).len(), 2);
        assert_eq!(trajectory.iter().count(), 4);
        assert_eq!(trajectory.projection_years(), 0);
    }
}
