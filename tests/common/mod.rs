//! Shared test fixtures for integration tests.

use rate_sim::config::ProjectionConfig;
use rate_sim::model::engine::Engine;
use rate_sim::model::types::{DataCenterProfile, Trajectory, UtilityProfile};

/// Resolved projection inputs plus a ready engine for one preset.
pub struct ProjectionFixture {
    pub utility: UtilityProfile,
    pub datacenter: DataCenterProfile,
    pub engine: Engine,
    pub projection_years: u32,
}

impl ProjectionFixture {
    /// Runs the projection with the fixture's own horizon.
    pub fn project(&self) -> Trajectory {
        self.engine
            .project(&self.utility, &self.datacenter, self.projection_years)
            .expect("preset inputs should project")
    }
}

/// Builds a fixture from a named preset.
pub fn preset_fixture(name: &str) -> ProjectionFixture {
    let resolved = ProjectionConfig::from_preset(name)
        .expect("preset should load")
        .resolve()
        .expect("preset should resolve");
    ProjectionFixture {
        utility: resolved.utility,
        datacenter: resolved.datacenter,
        engine: Engine::new(resolved.assumptions),
        projection_years: resolved.projection_years,
    }
}

/// PJM reference fixture: capacity market near its VRR knee.
pub fn pjm_fixture() -> ProjectionFixture {
    preset_fixture("pjm_mid_atlantic")
}

/// ERCOT reference fixture: energy-only market.
pub fn ercot_fixture() -> ProjectionFixture {
    preset_fixture("ercot_gulf_coast")
}
