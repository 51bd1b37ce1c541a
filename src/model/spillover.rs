//! Capacity spillover: what existing load pays when the clearing price moves.

use super::error::InputError;
use super::supply_curve::{SupplyCurve, reserve_margin};
use super::types::{CapacityMarketState, DAYS_PER_YEAR};

/// Residential fraction of system peak, used to size the existing load
/// exposed to the price change.
pub const RESIDENTIAL_PEAK_SHARE: f64 = 0.35;

/// Reserve margins and prices before/after the new load, plus the resulting
/// socialized cost.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpilloverResult {
    /// Reserve margin before the new load connects.
    pub margin_before: f64,
    /// Reserve margin with the new load's peak contribution added.
    pub margin_after: f64,
    /// Clearing price at the pre-connection margin ($/MW-day).
    pub price_before: f64,
    /// Clearing price at the post-connection margin ($/MW-day).
    pub price_after: f64,
    /// Annual cost imposed on existing residential peak load ($/year).
    pub socialized_cost: f64,
}

/// Computes the capacity-market cost spillover onto existing load.
///
/// The new load's peak contribution erodes the reserve margin and moves the
/// clearing price for every MW of existing load; the share borne by
/// residential customers is sized by [`RESIDENTIAL_PEAK_SHARE`] of the
/// utility's system peak. The hit lands immediately at connection — near-term
/// auctions already price in near-term demand growth, so no multi-year lag
/// is modeled.
///
/// # Errors
///
/// Returns [`InputError::DivisionByZero`] if the market peak load is not
/// positive (guarded earlier by profile validation).
pub fn spillover(
    market: &CapacityMarketState,
    curve: &SupplyCurve,
    system_peak_mw: f64,
    peak_contribution_mw: f64,
) -> Result<SpilloverResult, InputError> {
    let margin_before = reserve_margin(market.installed_capacity_mw, market.peak_load_mw)?;
    let peak_after = market.peak_load_mw + peak_contribution_mw;
    let margin_after = reserve_margin(market.installed_capacity_mw, peak_after)?;
    let price_before = curve.price(margin_before);
    let price_after = curve.price(margin_after);
    let existing_residential_peak_mw = system_peak_mw * RESIDENTIAL_PEAK_SHARE;
    let socialized_cost =
        existing_residential_peak_mw * (price_after - price_before) * DAYS_PER_YEAR;
    Ok(SpilloverResult {
        margin_before,
        margin_after,
        price_before,
        price_after,
        socialized_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market() -> CapacityMarketState {
        CapacityMarketState {
            installed_capacity_mw: 13_100.0,
            peak_load_mw: 11_900.0,
        }
    }

    #[test]
    fn new_load_erodes_margin_and_raises_price() {
        let curve = SupplyCurve::default_vrr();
        let result = spillover(&market(), &curve, 8_200.0, 1_000.0).expect("valid inputs");
        assert!(result.margin_before > 0.10 && result.margin_before < 0.11);
        assert!(result.margin_after < 0.02, "margin_after {}", result.margin_after);
        assert!(result.price_after > result.price_before);
        assert!(result.socialized_cost > 0.0);
    }

    #[test]
    fn zero_contribution_costs_nothing() {
        let curve = SupplyCurve::default_vrr();
        let result = spillover(&market(), &curve, 8_200.0, 0.0).expect("valid inputs");
        assert_eq!(result.margin_before, result.margin_after);
        assert_eq!(result.socialized_cost, 0.0);
    }

    #[test]
    fn smaller_contribution_costs_less() {
        let curve = SupplyCurve::default_vrr();
        let firm = spillover(&market(), &curve, 8_200.0, 1_000.0).expect("valid inputs");
        let flex = spillover(&market(), &curve, 8_200.0, 750.0).expect("valid inputs");
        assert!(flex.socialized_cost < firm.socialized_cost);
        assert!(flex.socialized_cost > 0.0);
    }

    #[test]
    fn cost_scales_with_existing_residential_peak() {
        let curve = SupplyCurve::default_vrr();
        let small = spillover(&market(), &curve, 4_000.0, 500.0).expect("valid inputs");
        let large = spillover(&market(), &curve, 8_000.0, 500.0).expect("valid inputs");
        assert!((large.socialized_cost - 2.0 * small.socialized_cost).abs() < 1e-6);
    }

    #[test]
    fn zero_peak_market_fails_fast() {
        let curve = SupplyCurve::default_vrr();
        let broken = CapacityMarketState {
            installed_capacity_mw: 1_000.0,
            peak_load_mw: 0.0,
        };
        assert_eq!(
            spillover(&broken, &curve, 8_200.0, 100.0),
            Err(InputError::DivisionByZero("peak_load_mw"))
        );
    }
}
