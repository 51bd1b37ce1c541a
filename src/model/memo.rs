//! Memoization wrapper around the projection engine.
//!
//! The engine itself is pure; callers that recompute on every input change
//! (sliders, form edits) can wrap it here. The cache key is an exact image
//! of the input tuple — f64 fields by bit pattern — so a hit can only mean
//! identical inputs.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::engine::Engine;
use super::error::InputError;
use super::types::{DataCenterProfile, Trajectory, UtilityProfile};

/// Exact cache key for one projection input tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct InputKey {
    utility_name: String,
    residential_customers: u64,
    total_customers: u64,
    system_peak_bits: u64,
    bill_bits: u64,
    usage_bits: u64,
    market: crate::model::market::MarketType,
    base_allocation_bits: u64,
    pass_through_bits: u64,
    has_capacity_market: bool,
    capacity_price_bits: Option<u64>,
    market_state_bits: Option<(u64, u64)>,
    dc_bits: [u64; 6],
    projection_years: u32,
}

impl InputKey {
    fn new(utility: &UtilityProfile, datacenter: &DataCenterProfile, years: u32) -> Self {
        Self {
            utility_name: utility.name.clone(),
            residential_customers: utility.residential_customers,
            total_customers: utility.total_customers,
            system_peak_bits: utility.system_peak_mw.to_bits(),
            bill_bits: utility.average_monthly_bill.to_bits(),
            usage_bits: utility.average_monthly_usage_kwh.to_bits(),
            market: utility.market,
            base_allocation_bits: utility.base_residential_allocation.to_bits(),
            pass_through_bits: utility.capacity_cost_pass_through.to_bits(),
            has_capacity_market: utility.has_capacity_market,
            capacity_price_bits: utility.current_capacity_price.map(f64::to_bits),
            market_state_bits: utility
                .capacity_market
                .map(|s| (s.installed_capacity_mw.to_bits(), s.peak_load_mw.to_bits())),
            dc_bits: [
                datacenter.capacity_mw.to_bits(),
                datacenter.firm_load_factor.to_bits(),
                datacenter.flex_load_factor.to_bits(),
                datacenter.firm_peak_coincidence.to_bits(),
                datacenter.flex_peak_coincidence.to_bits(),
                datacenter.onsite_generation_mw.to_bits(),
            ],
            projection_years: years,
        }
    }
}

/// Caching front for [`Engine::project`].
///
/// Not a correctness requirement — the engine is idempotent — purely an
/// optimization for interactive callers.
#[derive(Debug)]
pub struct ProjectionCache {
    engine: Engine,
    cache: HashMap<InputKey, Trajectory>,
}

impl ProjectionCache {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            cache: HashMap::new(),
        }
    }

    /// Projects through the cache; errors are never cached.
    ///
    /// # Errors
    ///
    /// Propagates [`InputError`] from [`Engine::project`].
    pub fn project(
        &mut self,
        utility: &UtilityProfile,
        datacenter: &DataCenterProfile,
        projection_years: u32,
    ) -> Result<&Trajectory, InputError> {
        let key = InputKey::new(utility, datacenter, projection_years);
        match self.cache.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let trajectory = self.engine.project(utility, datacenter, projection_years)?;
                Ok(entry.insert(trajectory))
            }
        }
    }

    /// Number of cached trajectories.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drops every cached trajectory, e.g. after assumptions change.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
