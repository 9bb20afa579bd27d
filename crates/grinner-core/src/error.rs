use thiserror::Error;

/// An invalid parameter combination for a row or a curve.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("sag must be a finite value >= 0 mm, got {value}")]
    InvalidSag { value: f64 },

    #[error("{side} flat key count must be 0, 1 or 2, got {count}")]
    FlatCountOutOfRange { side: &'static str, count: u8 },

    #[error("cannot have {flat} flat keys in a row of {total} keys")]
    TooManyFlatKeys { flat: usize, total: usize },

    #[error("key {index} has invalid width {width}u")]
    InvalidWidth { index: usize, width: f64 },

    #[error("unknown angle profile \"{name}\"")]
    UnknownProfile { name: String },

    #[error("a row needs at least {min} keys, got {got}")]
    RowTooShort { min: usize, got: usize },
}
