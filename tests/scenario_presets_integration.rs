//! Preset and export integration: every preset projects end to end and the
//! CSV surface stays consistent with the computed trajectory.

mod common;

use rate_sim::config::ProjectionConfig;
use rate_sim::io::export::write_csv;
use rate_sim::model::memo::ProjectionCache;
use rate_sim::model::summary::Summary;

#[test]
fn every_preset_projects_end_to_end() {
    for name in ProjectionConfig::PRESETS {
        let fixture = common::preset_fixture(name);
        let trajectory = fixture.project();
        let summary = Summary::from_trajectory(&trajectory);
        assert!(
            summary.baseline_final_bill > fixture.utility.average_monthly_bill,
            "{name}: escalation should raise the baseline bill"
        );
    }
}

#[test]
fn presets_produce_distinct_market_dynamics() {
    let pjm = common::pjm_fixture().project();
    let ercot = common::ercot_fixture().project();

    let pjm_spill: f64 = pjm
        .firm
        .iter()
        .map(|p| p.metrics.socialized_capacity_cost)
        .sum();
    let ercot_spill: f64 = ercot
        .firm
        .iter()
        .map(|p| p.metrics.socialized_capacity_cost)
        .sum();
    assert!(pjm_spill > 0.0, "capacity market should socialize cost");
    assert_eq!(ercot_spill, 0.0, "energy-only market should not");
}

#[test]
fn csv_export_covers_the_whole_trajectory() {
    let fixture = common::pjm_fixture();
    let trajectory = fixture.project();

    let mut buf = Vec::new();
    write_csv(&trajectory, &mut buf).expect("export should succeed");
    let csv = String::from_utf8(buf).expect("csv output should be valid UTF-8");

    let expected_rows = 4 * (fixture.projection_years as usize + 1);
    assert_eq!(csv.lines().count(), expected_rows + 1, "header + one row per scenario-year");
    for label in ["Baseline", "Firm", "Flexible", "Dispatchable"] {
        assert!(csv.contains(label), "missing scenario {label}");
    }
}

#[test]
fn csv_export_is_deterministic_for_fixed_config() {
    let run_a = common::pjm_fixture().project();
    let run_b = common::pjm_fixture().project();

    let mut out_a = Vec::new();
    write_csv(&run_a, &mut out_a).expect("first export should succeed");

    let mut out_b = Vec::new();
    write_csv(&run_b, &mut out_b).expect("second export should succeed");

    assert_eq!(out_a, out_b);
}

#[test]
fn memoized_projection_equals_direct_projection() {
    let fixture = common::pjm_fixture();
    let direct = fixture.project();

    let mut cache = ProjectionCache::new(fixture.engine.clone());
    let first = cache
        .project(&fixture.utility, &fixture.datacenter, fixture.projection_years)
        .expect("projects")
        .clone();
    assert_eq!(direct, first);

    // Second call is served from cache and stays identical.
    let second = cache
        .project(&fixture.utility, &fixture.datacenter, fixture.projection_years)
        .expect("projects")
        .clone();
    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);
}

#[test]
fn custom_toml_projects_like_its_resolved_inputs() {
    let toml = r#"
[simulation]
projection_years = 8
ramp_years = 2

[utility]
name = "TVA Valley"
residential_customers = 800000
total_customers = 930000
system_peak_mw = 5200.0
average_monthly_bill = 125.0
average_monthly_usage_kwh = 1000.0
market = "tva"
base_residential_allocation = 0.42
capacity_cost_pass_through = 0.85
has_capacity_market = false

[datacenter]
capacity_mw = 400.0
onsite_generation_mw = 0.0
"#;
    let cfg = ProjectionConfig::from_toml_str(toml).expect("parses");
    let resolved = cfg.resolve().expect("resolves");
    let engine = rate_sim::model::engine::Engine::new(resolved.assumptions);
    let trajectory = engine
        .project(&resolved.utility, &resolved.datacenter, resolved.projection_years)
        .expect("projects");

    assert_eq!(trajectory.baseline.len(), 9);
    // TVA runs no capacity market: spillover is identically zero.
    for (_, points) in trajectory.iter() {
        for point in points {
            assert_eq!(point.metrics.socialized_capacity_cost, 0.0);
        }
    }
}
