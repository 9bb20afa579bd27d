//! Grin-curve placement for rows of keyboard switch footprints.
//!
//! A row's end keys stay on a straight baseline while the keys between them
//! hang on a smooth downward curve, each turned to follow the curve's slope.
//!
//! ```
//! use keyboard_grinner::{CurveParams, layout_tokens};
//!
//! let params = CurveParams { sag_mm: 8.0, ..CurveParams::default() };
//! let placements = layout_tokens(&["1.5u", "1u", "1u", "1u", "1.5u"], &params).unwrap();
//! assert_eq!(placements.len(), 5);
//! assert!((placements[2].y_mm - 8.0).abs() < 1e-9);
//! ```

pub use grinner_core as core;
pub use grinner_layout as layout;
pub use grinner_parser as parser;

pub use grinner_core::{AngleProfile, ConfigError, CurveParams, KeySpec, UNIT_MM};
pub use grinner_layout::{
    apply, build_row, compute_placements, layout_keys, layout_tokens, load_row, save_row,
    ApplyError, ApplyReport, Footprint, LayoutError, Origin, Placement, Role, RowEntry,
};
pub use grinner_parser::{decode, encode, parse_unit, SavedRow};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wide_ends_keep_the_middle_key_at_the_apex() {
        let params = CurveParams {
            sag_mm: 8.0,
            ..CurveParams::default()
        };
        let p = layout_tokens(&["1.5u", "1u", "1u", "1u", "1.5u"], &params).unwrap();
        assert_abs_diff_eq!(p[2].x_mm, 3.0 * UNIT_MM, epsilon = 1e-9);
        assert_abs_diff_eq!(p[2].y_mm, 8.0, epsilon = 1e-9);
        assert_eq!(p[0].role, Role::FlatLeft);
    }

    #[test]
    fn saved_parameters_round_trip_through_the_facade() {
        let params = CurveParams::default().with_flat(2);
        let (back, widths) = decode(&encode(&params, &[1.0; 6])).unwrap();
        assert_eq!(back, params);
        assert_eq!(widths.len(), 6);
    }
}
