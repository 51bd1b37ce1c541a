//! Revenue offset model: what the new load pays the utility.

use super::market::MarketType;
use super::types::HOURS_PER_YEAR;

/// Retail tariff rates the new load is billed under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TariffRates {
    /// Coincident-peak demand charge ($/MW-month).
    pub coincident_peak_charge_per_mw_month: f64,
    /// Non-coincident-peak demand charge ($/MW-month), billed on installed
    /// capacity regardless of scenario.
    pub non_coincident_charge_per_mw_month: f64,
    /// Tariff energy rate ($/kWh).
    pub energy_rate_per_kwh: f64,
}

impl Default for TariffRates {
    fn default() -> Self {
        Self {
            coincident_peak_charge_per_mw_month: 9_000.0,
            non_coincident_charge_per_mw_month: 4_500.0,
            energy_rate_per_kwh: 0.058,
        }
    }
}

/// Annual revenue components for one scenario-year, all in $/year.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RevenueOffset {
    /// Coincident-peak demand charge revenue.
    pub coincident_peak: f64,
    /// Non-coincident-peak demand charge revenue.
    pub non_coincident_peak: f64,
    /// Energy margin over the market wholesale cost.
    pub energy_margin: f64,
    /// Portion of total billed revenue that offsets system cost, after the
    /// market flow-through rate.
    pub offset: f64,
}

impl RevenueOffset {
    /// Total billed before flow-through.
    pub fn total_billed(&self) -> f64 {
        self.coincident_peak + self.non_coincident_peak + self.energy_margin
    }
}

/// Revenue the new load pays this year, given its ramped capacity and the
/// scenario's load factor and peak coincidence.
///
/// Flexible and dispatchable loads pay less on the coincident-peak component
/// because they curtail during system peak; the non-coincident charge is on
/// installed (ramped) capacity either way.
pub fn revenue_offset(
    ramped_mw: f64,
    load_factor: f64,
    peak_coincidence: f64,
    market: MarketType,
    tariff: &TariffRates,
) -> RevenueOffset {
    let coincident_peak =
        peak_coincidence * ramped_mw * tariff.coincident_peak_charge_per_mw_month * 12.0;
    let non_coincident_peak = ramped_mw * tariff.non_coincident_charge_per_mw_month * 12.0;
    let energy_kwh = ramped_mw * 1_000.0 * HOURS_PER_YEAR * load_factor;
    let energy_margin = energy_kwh * (tariff.energy_rate_per_kwh - market.wholesale_energy_price());
    let total = coincident_peak + non_coincident_peak + energy_margin;
    RevenueOffset {
        coincident_peak,
        non_coincident_peak,
        energy_margin,
        offset: total * market.revenue_flow_through(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firm_load_pays_full_coincident_charge() {
        let tariff = TariffRates::default();
        let rev = revenue_offset(1_000.0, 0.80, 1.0, MarketType::Pjm, &tariff);
        assert!((rev.coincident_peak - 1_000.0 * 9_000.0 * 12.0).abs() < 1e-6);
        assert!((rev.non_coincident_peak - 1_000.0 * 4_500.0 * 12.0).abs() < 1e-6);
    }

    #[test]
    fn flexible_load_pays_less_coincident_charge() {
        let tariff = TariffRates::default();
        let firm = revenue_offset(1_000.0, 0.80, 1.0, MarketType::Pjm, &tariff);
        let flex = revenue_offset(1_000.0, 0.80, 0.75, MarketType::Pjm, &tariff);
        assert!(flex.coincident_peak < firm.coincident_peak);
        assert_eq!(flex.non_coincident_peak, firm.non_coincident_peak);
        assert_eq!(flex.energy_margin, firm.energy_margin);
    }

    #[test]
    fn energy_margin_uses_market_wholesale() {
        let tariff = TariffRates::default();
        let rev = revenue_offset(100.0, 0.80, 1.0, MarketType::Ercot, &tariff);
        let expected_kwh = 100.0 * 1_000.0 * HOURS_PER_YEAR * 0.80;
        let expected = expected_kwh * (0.058 - MarketType::Ercot.wholesale_energy_price());
        assert!((rev.energy_margin - expected).abs() < 1.0);
    }

    #[test]
    fn offset_applies_flow_through() {
        let tariff = TariffRates::default();
        let rev = revenue_offset(500.0, 0.75, 0.9, MarketType::Regulated, &tariff);
        let expected = rev.total_billed() * MarketType::Regulated.revenue_flow_through();
        assert!((rev.offset - expected).abs() < 1e-6);
        assert!(rev.offset < rev.total_billed());
    }

    #[test]
    fn regulated_recovers_more_than_capacity_markets() {
        let tariff = TariffRates::default();
        let regulated = revenue_offset(1_000.0, 0.80, 1.0, MarketType::Regulated, &tariff);
        let pjm = revenue_offset(1_000.0, 0.80, 1.0, MarketType::Pjm, &tariff);
        // Same billed components apart from the energy wholesale constant;
        // the flow-through gap dominates.
        assert!(regulated.offset / regulated.total_billed() > pjm.offset / pjm.total_billed());
    }

    #[test]
    fn zero_capacity_yields_zero_revenue() {
        let tariff = TariffRates::default();
        let rev = revenue_offset(0.0, 0.80, 1.0, MarketType::Pjm, &tariff);
        assert_eq!(rev.total_billed(), 0.0);
        assert_eq!(rev.offset, 0.0);
    }
}
