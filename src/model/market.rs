//! Market types and per-market constants.
//!
//! Every market-specific branch in the model goes through an exhaustive
//! `match` on [`MarketType`], so adding a market is a compile-time-checked
//! change rather than a lookup-table edit.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Capacity price ($/MW-day) at which the allocation multiplier starts
/// rising for capacity-market jurisdictions.
pub const CAPACITY_PRICE_THRESHOLD: f64 = 100.0;

/// Capacity price ($/MW-day) at which the allocation multiplier reaches its
/// 1.15 cap.
pub const CAPACITY_PRICE_CEILING: f64 = 200.0;

/// Wholesale/market structure a utility operates under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketType {
    /// Vertically integrated, state-regulated utility.
    Regulated,
    Pjm,
    Ercot,
    Miso,
    Spp,
    Nyiso,
    Tva,
    Caiso,
}

impl MarketType {
    /// All market variants, in display order.
    pub const ALL: [MarketType; 8] = [
        MarketType::Regulated,
        MarketType::Pjm,
        MarketType::Ercot,
        MarketType::Miso,
        MarketType::Spp,
        MarketType::Nyiso,
        MarketType::Tva,
        MarketType::Caiso,
    ];

    /// Whether this market runs a mandatory capacity auction (or an
    /// equivalent resource-adequacy procurement) whose clearing price is
    /// exposed to existing load.
    pub fn runs_capacity_market(self) -> bool {
        match self {
            MarketType::Pjm | MarketType::Miso | MarketType::Nyiso | MarketType::Caiso => true,
            MarketType::Regulated | MarketType::Ercot | MarketType::Spp | MarketType::Tva => false,
        }
    }

    /// Default residential share of system cost before any dynamic
    /// adjustment. Used to seed presets; the profile field is authoritative.
    pub fn default_residential_allocation(self) -> f64 {
        match self {
            MarketType::Regulated => 0.40,
            MarketType::Pjm => 0.35,
            MarketType::Ercot => 0.30,
            MarketType::Miso => 0.38,
            MarketType::Spp => 0.40,
            MarketType::Nyiso => 0.33,
            MarketType::Tva => 0.42,
            MarketType::Caiso => 0.36,
        }
    }

    /// Documented default wholesale energy cost for the market ($/kWh).
    ///
    /// Used when computing the energy margin a new load pays over wholesale;
    /// a missing market-specific figure falls back to this constant rather
    /// than erroring.
    pub fn wholesale_energy_price(self) -> f64 {
        match self {
            MarketType::Regulated => 0.035,
            MarketType::Pjm => 0.042,
            MarketType::Ercot => 0.038,
            MarketType::Miso => 0.036,
            MarketType::Spp => 0.032,
            MarketType::Nyiso => 0.048,
            MarketType::Tva => 0.034,
            MarketType::Caiso => 0.052,
        }
    }

    /// Fraction of the new load's tariff revenue that offsets system cost.
    ///
    /// Regulated territories recover most tariff revenue against the revenue
    /// requirement; restructured markets have a weaker cost-causation
    /// linkage and recover roughly half.
    pub fn revenue_flow_through(self) -> f64 {
        match self {
            MarketType::Regulated => 0.88,
            MarketType::Spp => 0.87,
            MarketType::Tva => 0.90,
            MarketType::Ercot => 0.60,
            MarketType::Pjm => 0.55,
            MarketType::Miso => 0.58,
            MarketType::Nyiso => 0.52,
            MarketType::Caiso => 0.55,
        }
    }

    /// Market multiplier applied to the base residential allocation.
    ///
    /// ERCOT is fixed at 0.85 (large loads face wholesale price signals
    /// directly). Capacity markets ramp linearly from 1.0 at
    /// [`CAPACITY_PRICE_THRESHOLD`] to 1.15 at [`CAPACITY_PRICE_CEILING`] as
    /// the current capacity price rises; everyone else stays at 1.0.
    pub fn allocation_multiplier(self, capacity_price: Option<f64>) -> f64 {
        match self {
            MarketType::Ercot => 0.85,
            MarketType::Regulated | MarketType::Spp | MarketType::Tva => 1.0,
            MarketType::Pjm | MarketType::Miso | MarketType::Nyiso | MarketType::Caiso => {
                match capacity_price {
                    Some(price) if price > CAPACITY_PRICE_THRESHOLD => {
                        let span = CAPACITY_PRICE_CEILING - CAPACITY_PRICE_THRESHOLD;
                        let frac = ((price - CAPACITY_PRICE_THRESHOLD) / span).min(1.0);
                        1.0 + 0.15 * frac
                    }
                    _ => 1.0,
                }
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarketType::Regulated => "Regulated",
            MarketType::Pjm => "PJM",
            MarketType::Ercot => "ERCOT",
            MarketType::Miso => "MISO",
            MarketType::Spp => "SPP",
            MarketType::Nyiso => "NYISO",
            MarketType::Tva => "TVA",
            MarketType::Caiso => "CAISO",
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
