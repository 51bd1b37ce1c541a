//! Residential cost allocation: base share, market multiplier, dynamic
//! blend, and regulatory-lag phase-in.

use super::types::{HOURS_PER_YEAR, UtilityProfile};

/// Hard floor on the residential allocation fraction.
pub const ALLOCATION_FLOOR: f64 = 0.20;

/// Hard ceiling on the residential allocation fraction.
pub const ALLOCATION_CEILING: f64 = 0.55;

/// Years over which a cost-allocation change phases into rates.
pub const PHASE_IN_YEARS: u32 = 5;

/// Weight on the residential energy share in the dynamic blend.
const ENERGY_WEIGHT: f64 = 0.40;
/// Weight on the residential peak share.
const PEAK_WEIGHT: f64 = 0.40;
/// Weight on the residential customer-count share.
const CUSTOMER_WEIGHT: f64 = 0.20;

/// Assumed system-wide load factor used to size total system energy from the
/// system peak.
const SYSTEM_LOAD_FACTOR: f64 = 0.55;

/// Allocation in force before the new load connects:
/// `clamp(base × market multiplier)` with no dynamic adjustment.
pub fn pre_connection_allocation(utility: &UtilityProfile, capacity_price: Option<f64>) -> f64 {
    let multiplier = utility.market.allocation_multiplier(capacity_price);
    clamp(utility.base_residential_allocation * multiplier)
}

/// Fully-adjusted allocation once the new load's energy and peak are in the
/// billing determinants.
///
/// The dynamic adjustment blends three shares: residential energy share
/// (falls as the new load's energy grows), residential peak share (falls
/// with the new load's peak contribution — less for flexible scenarios), and
/// residential customer-count share (essentially constant; the new load is
/// one customer).
pub fn target_allocation(
    utility: &UtilityProfile,
    capacity_price: Option<f64>,
    dc_energy_mwh: f64,
    dc_peak_contribution_mw: f64,
) -> f64 {
    let base_energy_mwh = utility.system_peak_mw * HOURS_PER_YEAR * SYSTEM_LOAD_FACTOR;
    let energy_ratio = base_energy_mwh / (base_energy_mwh + dc_energy_mwh);
    let peak_ratio =
        utility.system_peak_mw / (utility.system_peak_mw + dc_peak_contribution_mw);
    let customers = utility.total_customers as f64;
    let customer_ratio = customers / (customers + 1.0);

    let dynamic =
        ENERGY_WEIGHT * energy_ratio + PEAK_WEIGHT * peak_ratio + CUSTOMER_WEIGHT * customer_ratio;
    let multiplier = utility.market.allocation_multiplier(capacity_price);
    clamp(utility.base_residential_allocation * multiplier * dynamic)
}

/// Allocation for a given year, phased in linearly over
/// [`PHASE_IN_YEARS`] starting at the connection year.
///
/// `years_online` is negative before connection (pre-connection allocation
/// applies unchanged) and 0 in the first online year, which already moves
/// one phase-in step — the allocation never jumps discontinuously.
pub fn allocation_for_year(
    utility: &UtilityProfile,
    capacity_price: Option<f64>,
    dc_energy_mwh: f64,
    dc_peak_contribution_mw: f64,
    years_online: i64,
) -> f64 {
    let pre = pre_connection_allocation(utility, capacity_price);
    if years_online < 0 {
        return pre;
    }
    let target = target_allocation(utility, capacity_price, dc_energy_mwh, dc_peak_contribution_mw);
    let step = (years_online + 1).min(PHASE_IN_YEARS as i64) as f64;
    let fraction = step / PHASE_IN_YEARS as f64;
    clamp(pre + (target - pre) * fraction)
}

fn clamp(allocation: f64) -> f64 {
    allocation.clamp(ALLOCATION_FLOOR, ALLOCATION_CEILING)
}
