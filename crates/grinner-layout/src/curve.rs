//! Grin curve fitting.
//!
//! The curved keys of a row hang below the baseline on
//! `y = sag * sin²(π s)`, where `s` is the shaped position across the
//! curved span. The shape is 0 with zero slope at both ends of the span, so
//! the curve meets the flat end keys tangentially, and reaches `sag` at its
//! apex.

use std::f64::consts::PI;

use grinner_core::{AngleProfile, ConfigError, CurveParams};
use serde::Serialize;

use crate::row::{baseline_centers, check_width, curved_range, Role, RowEntry};

/// Largest apex shift applied by the asymmetric correction, as a fraction of
/// the curved span.
pub const ASYMMETRY_SHIFT: f64 = 0.15;

/// Computed pose of one key. `y_mm` is the downward drop below the baseline.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Placement {
    pub index: usize,
    pub role: Role,
    pub x_mm: f64,
    pub y_mm: f64,
    pub rotation_deg: f64,
}

/// Place every key of `row` on the curve described by `params`.
///
/// Pure: the same inputs always produce the same placements.
pub fn compute_placements(
    row: &[RowEntry],
    params: &CurveParams,
) -> Result<Vec<Placement>, ConfigError> {
    params.validate()?;
    for entry in row {
        check_width(entry.index, entry.key.width_units)?;
    }

    let centers = baseline_centers(row);
    let curve = Curve::fit(row, &centers, params);
    if let Some(c) = &curve {
        tracing::debug!(
            keys = row.len(),
            curved = c.keys,
            span_mm = c.span,
            apex = c.apex,
            profile = %c.profile,
            "fitted grin curve"
        );
    }

    Ok(row
        .iter()
        .zip(centers)
        .map(|(entry, x)| {
            let (y, rotation) = match (&curve, entry.role) {
                (Some(c), Role::Curved) => c.sample(x),
                _ => (0.0, 0.0),
            };
            Placement {
                index: entry.index,
                role: entry.role,
                x_mm: x,
                y_mm: y,
                rotation_deg: rotation,
            }
        })
        .collect())
}

/// Apex position as a fraction of the curved span.
///
/// 0.5 unless asymmetric correction is on and the end keys differ, in which
/// case the apex moves toward the wider end by up to [`ASYMMETRY_SHIFT`].
#[must_use]
pub fn apex_fraction(row: &[RowEntry], params: &CurveParams) -> f64 {
    if !params.asymmetric_correction {
        return 0.5;
    }
    let (Some(first), Some(last)) = (row.first(), row.last()) else {
        return 0.5;
    };
    let left = first.key.width_mm();
    let right = last.key.width_mm();
    let total = left + right;
    if total <= 1e-6 || (left - right).abs() <= 1e-9 {
        return 0.5;
    }
    0.5 - ASYMMETRY_SHIFT * (left - right) / total
}

#[derive(Debug)]
struct Curve {
    start: f64,
    span: f64,
    sag: f64,
    apex: f64,
    profile: AngleProfile,
    keys: usize,
}

impl Curve {
    fn fit(row: &[RowEntry], centers: &[f64], params: &CurveParams) -> Option<Self> {
        let range = curved_range(row)?;
        let first = &row[range.start];
        let last = &row[range.end - 1];
        let start = centers[range.start] - first.key.width_mm() / 2.0;
        let end = centers[range.end - 1] + last.key.width_mm() / 2.0;
        Some(Self {
            start,
            span: end - start,
            sag: params.sag_mm,
            apex: apex_fraction(row, params),
            profile: params.angle_profile,
            keys: range.len(),
        })
    }

    /// Drop and rotation (degrees) at baseline position `x`.
    fn sample(&self, x: f64) -> (f64, f64) {
        if self.sag == 0.0 {
            return (0.0, 0.0);
        }
        if self.keys == 1 {
            return (self.sag, 0.0);
        }

        let t = ((x - self.start) / self.span).clamp(0.0, 1.0);
        let (u, du_dt) = self.skew(t);
        let s = self.profile.shape(u);
        let ds_du = self.profile.slope(u);

        let y = self.sag * (PI * s).sin().powi(2);
        let dy_ds = self.sag * PI * (2.0 * PI * s).sin();
        let dy_dx = dy_ds * ds_du * du_dt / self.span;
        (y, dy_dx.atan().to_degrees())
    }

    /// Piecewise-linear remap sending the apex fraction to 0.5 while keeping
    /// both ends fixed. Returns the remapped value and its derivative.
    fn skew(&self, t: f64) -> (f64, f64) {
        let c = self.apex;
        if t <= c {
            (0.5 * t / c, 0.5 / c)
        } else {
            (0.5 + 0.5 * (t - c) / (1.0 - c), 0.5 / (1.0 - c))
        }
    }
}
