//! Row model, Grin curve engine and the placement boundary to host documents.

pub mod curve;
pub mod error;
pub mod row;
pub mod store;
pub mod transform;

pub use curve::{apex_fraction, compute_placements, ASYMMETRY_SHIFT, Placement};
pub use error::{ApplyError, HostError, LayoutError};
pub use row::{baseline_centers, build_row, build_row_from_keys, curved_range, Role, RowEntry};
pub use store::{load_row, save_row};
pub use transform::{apply, footprint_pose, ApplyReport, Footprint, Origin};

use grinner_core::{CurveParams, KeySpec};
use grinner_parser::parse_unit;

/// Parse key-size tokens and lay them out in one step.
pub fn layout_tokens<S: AsRef<str>>(
    tokens: &[S],
    params: &CurveParams,
) -> Result<Vec<Placement>, LayoutError> {
    let keys = tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            parse_unit(token.as_ref()).map_err(|source| LayoutError::KeySize { index, source })
        })
        .collect::<Result<Vec<KeySpec>, _>>()?;
    layout_keys(&keys, params)
}

/// Build the row for `keys` and compute its placements.
pub fn layout_keys(keys: &[KeySpec], params: &CurveParams) -> Result<Vec<Placement>, LayoutError> {
    let row = build_row_from_keys(
        keys,
        usize::from(params.flat_left),
        usize::from(params.flat_right),
    )?;
    Ok(compute_placements(&row, params)?)
}
