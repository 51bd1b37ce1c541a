//! Post-hoc summary of a computed trajectory.

use std::fmt;

use serde::Serialize;

use super::types::{ScenarioType, Trajectory};

/// Final-year comparison figures derived from a complete trajectory.
///
/// Computed post-hoc from the [`Trajectory`] so reported figures always
/// agree with the per-year data. Pure read; nothing here recomputes model
/// terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Projection horizon in years.
    pub projection_years: u32,
    /// Final-year monthly bill, no new load ($).
    pub baseline_final_bill: f64,
    /// Final-year monthly bill, firm load ($).
    pub firm_final_bill: f64,
    /// Final-year monthly bill, flexible load ($).
    pub flexible_final_bill: f64,
    /// Final-year monthly bill, flexible load with on-site generation ($).
    pub dispatchable_final_bill: f64,
}

impl Summary {
    /// Reads final-year bills for every scenario.
    pub fn from_trajectory(trajectory: &Trajectory) -> Self {
        let final_bill = |scenario| {
            trajectory
                .scenario(scenario)
                .last()
                .map_or(0.0, |point| point.monthly_bill)
        };
        Self {
            projection_years: trajectory.projection_years(),
            baseline_final_bill: final_bill(ScenarioType::Baseline),
            firm_final_bill: final_bill(ScenarioType::Firm),
            flexible_final_bill: final_bill(ScenarioType::Flexible),
            dispatchable_final_bill: final_bill(ScenarioType::Dispatchable),
        }
    }

    /// Final-year bill for one scenario.
    pub fn final_bill(&self, scenario: ScenarioType) -> f64 {
        match scenario {
            ScenarioType::Baseline => self.baseline_final_bill,
            ScenarioType::Firm => self.firm_final_bill,
            ScenarioType::Flexible => self.flexible_final_bill,
            ScenarioType::Dispatchable => self.dispatchable_final_bill,
        }
    }

    /// Final-year bill delta vs the baseline scenario ($/month).
    pub fn delta(&self, scenario: ScenarioType) -> f64 {
        self.final_bill(scenario) - self.baseline_final_bill
    }

    /// Delta as a percentage of the baseline final bill; 0 when the baseline
    /// bill is zero.
    pub fn delta_percent(&self, scenario: ScenarioType) -> f64 {
        if self.baseline_final_bill == 0.0 {
            0.0
        } else {
            100.0 * self.delta(scenario) / self.baseline_final_bill
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Bill Projection, Year {} ---", self.projection_years)?;
        writeln!(f, "Baseline:      ${:>8.2}/mo", self.baseline_final_bill)?;
        for scenario in [
            ScenarioType::Firm,
            ScenarioType::Flexible,
            ScenarioType::Dispatchable,
        ] {
            writeln!(
                f,
                "{:<13} ${:>8.2}/mo  ({:+.2}/mo, {:+.1}%)",
                format!("{scenario}:"),
                self.final_bill(scenario),
                self.delta(scenario),
                self.delta_percent(scenario),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{YearMetrics, YearPoint};

    fn point(year: u32, bill: f64) -> YearPoint {
        YearPoint {
            year,
            monthly_bill: bill,
            metrics: YearMetrics::default(),
        }
    }

    fn trajectory() -> Trajectory {
        Trajectory {
            baseline: vec![point(0, 130.0), point(1, 134.0)],
            firm: vec![point(0, 130.0), point(1, 149.5)],
            flexible: vec![point(0, 130.0), point(1, 141.0)],
            dispatchable: vec![point(0, 130.0), point(1, 137.0)],
        }
    }

    #[test]
    fn reads_final_year_bills() {
        let summary = Summary::from_trajectory(&trajectory());
        assert_eq!(summary.projection_years, 1);
        assert_eq!(summary.baseline_final_bill, 134.0);
        assert_eq!(summary.firm_final_bill, 149.5);
    }

    #[test]
    fn deltas_are_against_baseline() {
        let summary = Summary::from_trajectory(&trajectory());
        assert!((summary.delta(ScenarioType::Firm) - 15.5).abs() < 1e-12);
        assert!((summary.delta(ScenarioType::Flexible) - 7.0).abs() < 1e-12);
        assert_eq!(summary.delta(ScenarioType::Baseline), 0.0);
    }

    #[test]
    fn delta_percent_relative_to_baseline() {
        let summary = Summary::from_trajectory(&trajectory());
        let expected = 100.0 * 15.5 / 134.0;
        assert!((summary.delta_percent(ScenarioType::Firm) - expected).abs() < 1e-9);
    }

    #[test]
    fn empty_trajectory_yields_zeroes() {
        let empty = Trajectory {
            baseline: Vec::new(),
            firm: Vec::new(),
            flexible: Vec::new(),
            dispatchable: Vec::new(),
        };
        let summary = Summary::from_trajectory(&empty);
        assert_eq!(summary.baseline_final_bill, 0.0);
        assert_eq!(summary.delta_percent(ScenarioType::Firm), 0.0);
    }

    #[test]
    fn display_mentions_every_scenario() {
        let text = Summary::from_trajectory(&trajectory()).to_string();
        for name in ["Baseline", "Firm", "Flexible", "Dispatchable"] {
            assert!(text.contains(name), "missing {name} in:\n{text}");
        }
    }
}
