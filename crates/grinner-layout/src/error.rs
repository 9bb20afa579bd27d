use grinner_core::ConfigError;
use grinner_parser::{DecodeError, ParseError};
use thiserror::Error;

/// Failure reported by a host document while mutating a footprint.
pub type HostError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("key {index}: {source}")]
    KeySize {
        index: usize,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Apply(#[from] ApplyError),
}

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("{placements} placements computed for {footprints} footprints")]
    CountMismatch { placements: usize, footprints: usize },

    #[error("{updated} of {total} footprints updated before {reference} failed: {source}")]
    Partial {
        updated: usize,
        total: usize,
        reference: String,
        #[source]
        source: HostError,
    },
}
