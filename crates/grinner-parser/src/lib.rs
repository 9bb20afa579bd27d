//! Text formats: key-size tokens and the persisted row parameters.

pub mod codec;
pub mod error;
pub mod units;

pub use codec::{decode, decode_field, encode, encode_row, FIELD_NAME, FORMAT_VERSION, SavedRow};
pub use error::{DecodeError, ParseError};
pub use units::{
    find_key_size, infer_key_spec, parse_unit, parse_unit_value, quantize_units, SizeHints,
};
