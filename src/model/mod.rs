//! Bill-trajectory projection core.
//!
//! Pure and deterministic: `(UtilityProfile, DataCenterProfile,
//! projection_years) → Trajectory`, no I/O and no shared state. Presentation
//! surfaces (CLI, CSV, API) live outside this module.

pub mod allocation;
pub mod engine;
pub mod error;
pub mod infrastructure;
pub mod market;
pub mod memo;
pub mod revenue;
pub mod spillover;
pub mod summary;
pub mod supply_curve;
pub mod types;

pub use engine::{Assumptions, ConnectionPhase, Engine};
pub use error::InputError;
pub use market::MarketType;
pub use memo::ProjectionCache;
pub use summary::Summary;
pub use types::{
    CapacityMarketState, DataCenterProfile, ScenarioType, Trajectory, UtilityProfile, YearMetrics,
    YearPoint,
};
