use std::ops::Range;

use grinner_core::{ConfigError, KeySpec};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    FlatLeft,
    Curved,
    FlatRight,
}

impl Role {
    #[must_use]
    pub fn is_flat(self) -> bool {
        !matches!(self, Role::Curved)
    }
}

/// One key of a row, 0-indexed from the left.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct RowEntry {
    pub index: usize,
    pub key: KeySpec,
    pub role: Role,
}

/// Build a row from key widths in units.
///
/// The first `flat_left` keys and the last `flat_right` keys stay flat; the
/// remainder (possibly none) follows the curve.
pub fn build_row(
    widths: &[f64],
    flat_left: usize,
    flat_right: usize,
) -> Result<Vec<RowEntry>, ConfigError> {
    let keys: Vec<KeySpec> = widths.iter().copied().map(KeySpec::wide).collect();
    build_row_from_keys(&keys, flat_left, flat_right)
}

/// Same as [`build_row`], keeping each key's height.
pub fn build_row_from_keys(
    keys: &[KeySpec],
    flat_left: usize,
    flat_right: usize,
) -> Result<Vec<RowEntry>, ConfigError> {
    let total = keys.len();
    if flat_left + flat_right > total {
        return Err(ConfigError::TooManyFlatKeys {
            flat: flat_left + flat_right,
            total,
        });
    }
    for (index, key) in keys.iter().enumerate() {
        check_width(index, key.width_units)?;
    }

    Ok(keys
        .iter()
        .enumerate()
        .map(|(index, &key)| {
            let role = if index < flat_left {
                Role::FlatLeft
            } else if index >= total - flat_right {
                Role::FlatRight
            } else {
                Role::Curved
            };
            RowEntry { index, key, role }
        })
        .collect())
}

pub(crate) fn check_width(index: usize, width: f64) -> Result<(), ConfigError> {
    if !width.is_finite() || width <= 0.0 {
        return Err(ConfigError::InvalidWidth { index, width });
    }
    Ok(())
}

/// Key centers along the baseline, in mm, measured from the left edge of the
/// first key.
#[must_use]
pub fn baseline_centers(row: &[RowEntry]) -> Vec<f64> {
    let mut edge = 0.0;
    row.iter()
        .map(|entry| {
            let w = entry.key.width_mm();
            let center = edge + w / 2.0;
            edge += w;
            center
        })
        .collect()
}

/// Index range of the curved keys, `None` for an all-flat row.
#[must_use]
pub fn curved_range(row: &[RowEntry]) -> Option<Range<usize>> {
    let first = row.iter().position(|e| e.role == Role::Curved)?;
    let last = row.iter().rposition(|e| e.role == Role::Curved)?;
    Some(first..last + 1)
}
