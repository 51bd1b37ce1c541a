//! CSV export for computed trajectories.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::model::types::Trajectory;

/// Schema v1 column header for CSV trajectory export.
const HEADER: &str = "scenario,year,monthly_bill,transmission_cost,\
                      distribution_cost,capacity_cost,revenue_offset,\
                      socialized_capacity_cost,residential_allocation_pct";

/// Exports a trajectory to a CSV file at the given path.
///
/// Writes a header row followed by one data row per (scenario, year) using
/// the schema v1 column layout. Produces deterministic output for identical
/// inputs.
///
/// # Arguments
///
/// * `trajectory` - Complete multi-scenario projection
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(trajectory: &Trajectory, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(trajectory, buf)
}

/// Writes a trajectory as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(trajectory: &Trajectory, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    // Data rows, scenarios in declaration order, years chronological
    for (scenario, points) in trajectory.iter() {
        for point in points {
            let m = &point.metrics;
            wtr.write_record(&[
                scenario.label().to_string(),
                point.year.to_string(),
                format!("{:.2}", point.monthly_bill),
                format!("{:.2}", m.transmission_cost),
                format!("{:.2}", m.distribution_cost),
                format!("{:.2}", m.capacity_cost),
                format!("{:.2}", m.revenue_offset),
                format!("{:.2}", m.socialized_capacity_cost),
                format!("{:.2}", m.residential_allocation * 100.0),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
