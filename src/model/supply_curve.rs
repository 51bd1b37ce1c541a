//! Capacity supply curve: reserve margin in, clearing price out.

use super::error::InputError;

/// One breakpoint of the variable-resource-requirement curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    /// Reserve margin at this breakpoint (fraction, e.g. 0.15).
    pub reserve_margin: f64,
    /// Price as a multiple of the cost of new entry.
    pub multiplier: f64,
}

/// Piecewise-linear mapping from reserve margin to capacity clearing price.
///
/// Points are held in descending reserve-margin order. Prices interpolate
/// linearly between bracketing breakpoints; margins above the table clamp to
/// the first multiplier, and margins below it extrapolate along the last
/// segment's slope (emergency pricing, by policy not error).
#[derive(Debug, Clone, PartialEq)]
pub struct SupplyCurve {
    points: Vec<CurvePoint>,
    cone_per_mw_day: f64,
}

impl SupplyCurve {
    /// Builds a curve from breakpoints and a cost of new entry ($/MW-day).
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidInput`] when the table has fewer than two
    /// points, margins are not strictly decreasing, multipliers decrease as
    /// margin falls, or CONE is not positive.
    pub fn new(points: Vec<CurvePoint>, cone_per_mw_day: f64) -> Result<Self, InputError> {
        if points.len() < 2 {
            return Err(InputError::invalid(
                "supply_curve.points",
                "need at least two breakpoints",
            ));
        }
        if !(cone_per_mw_day > 0.0) {
            return Err(InputError::invalid(
                "supply_curve.cone_per_mw_day",
                "must be > 0",
            ));
        }
        for pair in points.windows(2) {
            if !(pair[1].reserve_margin < pair[0].reserve_margin) {
                return Err(InputError::invalid(
                    "supply_curve.points",
                    "reserve margins must be strictly decreasing",
                ));
            }
            if pair[1].multiplier < pair[0].multiplier {
                return Err(InputError::invalid(
                    "supply_curve.points",
                    "multipliers must not decrease as margin falls",
                ));
            }
        }
        if points.iter().any(|p| !p.reserve_margin.is_finite() || !(p.multiplier >= 0.0)) {
            return Err(InputError::invalid(
                "supply_curve.points",
                "breakpoints must be finite with multiplier >= 0",
            ));
        }
        Ok(Self {
            points,
            cone_per_mw_day,
        })
    }

    /// Default VRR-style table anchored at multiplier 1.0 on a 15% target
    /// reserve margin, CONE $300/MW-day.
    pub fn default_vrr() -> Self {
        let points = vec![
            CurvePoint { reserve_margin: 0.25, multiplier: 0.20 },
            CurvePoint { reserve_margin: 0.20, multiplier: 0.50 },
            CurvePoint { reserve_margin: 0.15, multiplier: 1.00 },
            CurvePoint { reserve_margin: 0.10, multiplier: 1.25 },
            CurvePoint { reserve_margin: 0.05, multiplier: 2.00 },
            CurvePoint { reserve_margin: 0.02, multiplier: 3.00 },
        ];
        Self::new(points, 300.0).expect("default table is well-formed")
    }

    /// Cost of new entry anchoring the multiplier scale ($/MW-day).
    pub fn cone_per_mw_day(&self) -> f64 {
        self.cone_per_mw_day
    }

    /// Capacity clearing price ($/MW-day) at the given reserve margin.
    pub fn price(&self, reserve_margin: f64) -> f64 {
        self.multiplier_at(reserve_margin) * self.cone_per_mw_day
    }

    fn multiplier_at(&self, margin: f64) -> f64 {
        let first = self.points[0];
        if margin >= first.reserve_margin {
            return first.multiplier;
        }
        for pair in self.points.windows(2) {
            let (hi, lo) = (pair[0], pair[1]);
            if margin >= lo.reserve_margin {
                return lerp(margin, hi, lo);
            }
        }
        // Below the lowest breakpoint: continue the last segment's slope.
        let n = self.points.len();
        lerp(margin, self.points[n - 2], self.points[n - 1])
    }
}

/// Linear interpolation (or extrapolation) along the segment from `hi` to
/// `lo` in reserve-margin space.
fn lerp(margin: f64, hi: CurvePoint, lo: CurvePoint) -> f64 {
    let span = hi.reserve_margin - lo.reserve_margin;
    let t = (hi.reserve_margin - margin) / span;
    hi.multiplier + t * (lo.multiplier - hi.multiplier)
}

/// Reserve margin: `(capacity − peak) / peak`.
///
/// # Errors
///
/// Returns [`InputError::DivisionByZero`] when `peak_load_mw <= 0`.
pub fn reserve_margin(capacity_mw: f64, peak_load_mw: f64) -> Result<f64, InputError> {
    if !(peak_load_mw > 0.0) {
        return Err(InputError::DivisionByZero("peak_load_mw"));
    }
    Ok((capacity_mw - peak_load_mw) / peak_load_mw)
}
