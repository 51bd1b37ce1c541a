//! Infrastructure cost model: baseline escalation and connection costs.

/// System-wide cost rates, independent of any particular utility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostRates {
    /// General inflation rate (fraction per year).
    pub inflation_rate: f64,
    /// Aging-infrastructure replacement rate (fraction per year), compounded
    /// on top of inflation.
    pub infrastructure_upgrade_rate: f64,
    /// One-time transmission interconnection cost ($/MW of nameplate).
    pub transmission_cost_per_mw: f64,
    /// One-time distribution interconnection cost ($/MW of nameplate).
    pub distribution_cost_per_mw: f64,
    /// Annual fixed charge rate converting one-time costs to an annual
    /// revenue requirement (fraction per year).
    pub fixed_charge_rate: f64,
    /// Generation capacity cost per MW of effective peak contribution
    /// ($/MW-year).
    pub capacity_cost_per_mw_year: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            inflation_rate: 0.025,
            infrastructure_upgrade_rate: 0.012,
            transmission_cost_per_mw: 450_000.0,
            distribution_cost_per_mw: 170_000.0,
            fixed_charge_rate: 0.12,
            capacity_cost_per_mw_year: 110_000.0,
        }
    }
}

/// Baseline residential bill after `year` years of two-rate compounding.
///
/// Applies in every scenario, new load or not:
/// `bill(0) × ((1 + inflation)(1 + upgrade))^year`.
pub fn baseline_bill(base_bill: f64, rates: &CostRates, year: u32) -> f64 {
    let combined = (1.0 + rates.inflation_rate) * (1.0 + rates.infrastructure_upgrade_rate);
    base_bill * combined.powi(year as i32)
}

/// Baseline bill increase split into its two driving rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillEscalation {
    /// Total increase over the base bill ($/month).
    pub total_increase: f64,
    /// Share of the increase attributable to inflation ($/month).
    pub inflation_component: f64,
    /// Share attributable to infrastructure replacement ($/month).
    pub infrastructure_component: f64,
}

/// Decomposes the baseline increase proportionally to each rate's share of
/// the combined rate, so the two components sum exactly to the total.
pub fn escalation_components(base_bill: f64, rates: &CostRates, year: u32) -> BillEscalation {
    let total_increase = baseline_bill(base_bill, rates, year) - base_bill;
    let rate_sum = rates.inflation_rate + rates.infrastructure_upgrade_rate;
    let inflation_share = if rate_sum > 0.0 {
        rates.inflation_rate / rate_sum
    } else {
        0.0
    };
    let inflation_component = total_increase * inflation_share;
    BillEscalation {
        total_increase,
        inflation_component,
        infrastructure_component: total_increase - inflation_component,
    }
}

/// Annualized connection costs for one online year.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConnectionCost {
    /// Transmission interconnection, annualized ($/year).
    pub transmission: f64,
    /// Distribution interconnection, annualized ($/year).
    pub distribution: f64,
    /// Generation capacity for the effective peak contribution ($/year).
    pub generation_capacity: f64,
}

impl ConnectionCost {
    pub fn total(&self) -> f64 {
        self.transmission + self.distribution + self.generation_capacity
    }
}

/// Costs of serving `ramped_mw` of new load whose effective peak
/// contribution is `effective_peak_mw` this year.
///
/// One-time transmission/distribution costs are carried as an annual revenue
/// requirement via the fixed charge rate; generation capacity is a direct
/// annual cost and is recomputed each year as the ramp progresses.
pub fn connection_cost(ramped_mw: f64, effective_peak_mw: f64, rates: &CostRates) -> ConnectionCost {
    ConnectionCost {
        transmission: ramped_mw * rates.transmission_cost_per_mw * rates.fixed_charge_rate,
        distribution: ramped_mw * rates.distribution_cost_per_mw * rates.fixed_charge_rate,
        generation_capacity: effective_peak_mw * rates.capacity_cost_per_mw_year,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_bill_compounds_both_rates() {
        let rates = CostRates {
            inflation_rate: 0.02,
            infrastructure_upgrade_rate: 0.01,
            ..CostRates::default()
        };
        let bill = baseline_bill(100.0, &rates, 2);
        let expected = 100.0 * (1.02_f64 * 1.01).powi(2);
        assert!((bill - expected).abs() < 1e-9);
    }

    #[test]
    fn baseline_bill_year_zero_is_identity() {
        let rates = CostRates::default();
        assert_eq!(baseline_bill(132.0, &rates, 0), 132.0);
    }

    #[test]
    fn baseline_bill_non_decreasing_for_nonnegative_rates() {
        let rates = CostRates::default();
        let mut previous = 0.0;
        for year in 0..=20 {
            let bill = baseline_bill(130.0, &rates, year);
            assert!(bill >= previous, "year {year}: {bill} < {previous}");
            previous = bill;
        }
    }

    #[test]
    fn escalation_components_sum_exactly() {
        let rates = CostRates::default();
        let split = escalation_components(130.0, &rates, 10);
        let reconstructed = split.inflation_component + split.infrastructure_component;
        assert_eq!(reconstructed, split.total_increase);
        assert!(split.inflation_component > split.infrastructure_component);
    }

    #[test]
    fn escalation_components_zero_rates() {
        let rates = CostRates {
            inflation_rate: 0.0,
            infrastructure_upgrade_rate: 0.0,
            ..CostRates::default()
        };
        let split = escalation_components(130.0, &rates, 5);
        assert_eq!(split.total_increase, 0.0);
        assert_eq!(split.inflation_component, 0.0);
    }

    #[test]
    fn connection_cost_scales_with_ramp() {
        let rates = CostRates::default();
        let full = connection_cost(1_000.0, 1_000.0, &rates);
        let third = connection_cost(1_000.0 / 3.0, 1_000.0 / 3.0, &rates);
        assert!((full.total() - 3.0 * third.total()).abs() < 1e-6);
        assert!((full.transmission - 1_000.0 * 450_000.0 * 0.12).abs() < 1e-6);
        assert!((full.generation_capacity - 1_000.0 * 110_000.0).abs() < 1e-6);
    }

    #[test]
    fn effective_peak_drives_capacity_cost_only() {
        let rates = CostRates::default();
        let firm = connection_cost(1_000.0, 1_000.0, &rates);
        let flex = connection_cost(1_000.0, 750.0, &rates);
        assert_eq!(firm.transmission, flex.transmission);
        assert_eq!(firm.distribution, flex.distribution);
        assert!(firm.generation_capacity > flex.generation_capacity);
    }
}
