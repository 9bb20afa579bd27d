//! Plain data shared by the grinner crates: key sizes, curve parameters and
//! the point math used to place footprints.

pub mod error;
pub mod key;
pub mod params;
pub mod profile;
pub mod point;

pub use error::ConfigError;
pub use key::{KeySpec, UNIT_MM};
pub use params::{CurveParams, MAX_FLAT_KEYS};
pub use profile::AngleProfile;
pub use point::Point;
