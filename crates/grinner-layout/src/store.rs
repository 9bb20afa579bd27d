use grinner_parser::{decode_field, encode_row, DecodeError, FIELD_NAME, SavedRow};

use crate::error::HostError;
use crate::transform::Footprint;

/// Saved row carried by `footprint`, if any.
pub fn load_row<F: Footprint + ?Sized>(footprint: &F) -> Result<Option<SavedRow>, DecodeError> {
    decode_field(footprint.field(FIELD_NAME).as_deref())
}

/// Store `row` on the leftmost footprint of the row.
pub fn save_row<F: Footprint + ?Sized>(leftmost: &mut F, row: &SavedRow) -> Result<(), HostError> {
    let text = encode_row(row);
    tracing::debug!(reference = leftmost.reference(), len = text.len(), "saving row parameters");
    leftmost.set_field(FIELD_NAME, &text)
}
