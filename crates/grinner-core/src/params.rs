use serde::{Deserialize, Serialize};

use crate::{AngleProfile, ConfigError};

/// Largest number of flat keys allowed at either end of a row.
pub const MAX_FLAT_KEYS: u8 = 2;

/// Parameters of one Grin row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CurveParams {
    /// Downward sag of the lowest point of the curve, in mm.
    pub sag_mm: f64,
    pub flat_left: u8,
    pub flat_right: u8,
    pub angle_profile: AngleProfile,
    /// Shift the apex toward the wider end key when the end keys differ.
    pub asymmetric_correction: bool,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            sag_mm: 20.0,
            flat_left: 1,
            flat_right: 1,
            angle_profile: AngleProfile::Cosine,
            asymmetric_correction: false,
        }
    }
}

impl CurveParams {
    /// Same flat count on both ends.
    #[must_use]
    pub fn with_flat(mut self, flat: u8) -> Self {
        self.flat_left = flat;
        self.flat_right = flat;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sag_mm.is_finite() || self.sag_mm < 0.0 {
            return Err(ConfigError::InvalidSag { value: self.sag_mm });
        }
        check_flat("left", self.flat_left)?;
        check_flat("right", self.flat_right)?;
        Ok(())
    }

    #[must_use]
    pub fn flat_total(&self) -> usize {
        usize::from(self.flat_left) + usize::from(self.flat_right)
    }
}

fn check_flat(side: &'static str, count: u8) -> Result<(), ConfigError> {
    if count > MAX_FLAT_KEYS {
        return Err(ConfigError::FlatCountOutOfRange { side, count });
    }
    Ok(())
}
