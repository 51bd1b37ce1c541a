//! Market-specific integration scenarios: capacity-market spillover in PJM,
//! energy-only gating in ERCOT, and the regulatory-lag phase-in.

mod common;

use rate_sim::model::supply_curve::reserve_margin;

/// PJM utility, 1,000 MW firm data center, 10-year horizon: the reserve
/// margin collapses from ~10% to ~1.5% and the clearing price runs from
/// near-CONE to a multiple of CONE.
#[test]
fn pjm_firm_load_collapses_reserve_margin() {
    let fixture = common::pjm_fixture();
    let market = fixture.utility.capacity_market.expect("pjm preset has market state");
    let curve = &fixture.engine.assumptions().supply_curve;

    let margin_before =
        reserve_margin(market.installed_capacity_mw, market.peak_load_mw).expect("valid");
    let margin_after = reserve_margin(
        market.installed_capacity_mw,
        market.peak_load_mw + fixture.datacenter.capacity_mw,
    )
    .expect("valid");
    assert!((0.09..0.11).contains(&margin_before), "before: {margin_before}");
    assert!((0.01..0.02).contains(&margin_after), "after: {margin_after}");

    let cone = curve.cone_per_mw_day();
    let price_before = curve.price(margin_before);
    let price_after = curve.price(margin_after);
    assert!(
        price_before < 1.5 * cone,
        "pre-connection price should be near CONE, got {price_before}"
    );
    assert!(
        price_after > 2.5 * cone,
        "post-connection price should be a multiple of CONE, got {price_after}"
    );
}

#[test]
fn pjm_spillover_positive_and_smaller_for_flexible() {
    let fixture = common::pjm_fixture();
    let trajectory = fixture.project();
    // Compare fully-ramped years.
    for year in 4..=fixture.projection_years as usize {
        let firm = trajectory.firm[year].metrics.socialized_capacity_cost;
        let flexible = trajectory.flexible[year].metrics.socialized_capacity_cost;
        let dispatchable = trajectory.dispatchable[year].metrics.socialized_capacity_cost;
        assert!(firm > 0.0, "year {year}: firm spillover should be positive");
        assert!(
            flexible < firm,
            "year {year}: flexible spillover {flexible} should be below firm {firm}"
        );
        assert!(
            dispatchable < flexible,
            "year {year}: on-site generation should shrink spillover further"
        );
    }
}

#[test]
fn pjm_firm_bills_exceed_baseline() {
    let trajectory = common::pjm_fixture().project();
    let last = trajectory.firm.last().expect("non-empty");
    let baseline = trajectory.baseline.last().expect("non-empty");
    assert!(
        last.monthly_bill > baseline.monthly_bill,
        "firm load in a tight capacity market should raise bills"
    );
}

#[test]
fn ercot_never_accrues_socialized_cost() {
    let trajectory = common::ercot_fixture().project();
    for (scenario, points) in trajectory.iter() {
        for point in points {
            assert_eq!(
                point.metrics.socialized_capacity_cost, 0.0,
                "{scenario} year {}: energy-only market must not socialize capacity cost",
                point.year
            );
        }
    }
}

#[test]
fn ercot_still_has_direct_infrastructure_impact() {
    let fixture = common::ercot_fixture();
    let trajectory = fixture.project();
    let online = &trajectory.firm[fixture.projection_years as usize].metrics;
    assert!(online.transmission_cost > 0.0);
    assert!(online.distribution_cost > 0.0);
    assert!(online.capacity_cost > 0.0);
    assert!(online.revenue_offset > 0.0);
}

#[test]
fn ercot_allocation_reflects_the_downscaled_multiplier() {
    let fixture = common::ercot_fixture();
    let trajectory = fixture.project();
    // Year 0 is pre-connection: allocation is exactly base x 0.85.
    let expected = fixture.utility.base_residential_allocation * 0.85;
    let year0 = trajectory.firm[0].metrics.residential_allocation;
    assert!(
        (year0 - expected).abs() < 1e-12,
        "year 0 allocation {year0} should equal base x 0.85 = {expected}"
    );
}

#[test]
fn regulatory_lag_steps_are_bounded_by_the_phase_in() {
    let fixture = common::pjm_fixture();
    let trajectory = fixture.project();
    let points = &trajectory.firm;

    // Pre-connection allocation: base x market multiplier (PJM price above
    // the ramp ceiling pins the multiplier at 1.15).
    let pre = points[0].metrics.residential_allocation;
    assert!(
        (pre - fixture.utility.base_residential_allocation * 1.15).abs() < 1e-12,
        "pre-connection allocation should be undistorted: {pre}"
    );

    // The fully-adjusted target is reached five years after connection and
    // held thereafter.
    let settled = points[6].metrics.residential_allocation;
    for point in &points[6..] {
        assert!((point.metrics.residential_allocation - settled).abs() < 1e-9);
    }

    // The first online year moves at most one fifth of the eventual total
    // adjustment.
    let per_year_step = (settled - pre).abs() / 5.0;
    let first_move = (points[1].metrics.residential_allocation - pre).abs();
    assert!(
        first_move <= per_year_step + 1e-9,
        "first online year moved {first_move}, more than one phase-in step {per_year_step}"
    );

    // Once the capacity ramp completes (year 3) the target is constant, so
    // no later year moves more than one linear phase-in step.
    for pair in points[3..].windows(2) {
        let step = (pair[1].metrics.residential_allocation
            - pair[0].metrics.residential_allocation)
            .abs();
        assert!(
            step <= per_year_step + 1e-9,
            "year {}: step {step} exceeds phase-in step {per_year_step}",
            pair[1].year
        );
    }
}
