use serde::{Deserialize, Serialize};

/// Physical pitch of one key unit (1u), in millimeters.
pub const UNIT_MM: f64 = 19.05;

/// Key footprint size in key units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct KeySpec {
    pub width_units: f64,
    #[serde(default = "default_height")]
    pub height_units: f64,
}

fn default_height() -> f64 {
    1.0
}

impl KeySpec {
    #[must_use]
    pub fn new(width_units: f64, height_units: f64) -> Self {
        Self {
            width_units,
            height_units,
        }
    }

    /// A key of the given width and the default 1u height.
    #[must_use]
    pub fn wide(width_units: f64) -> Self {
        Self::new(width_units, default_height())
    }

    #[must_use]
    pub fn width_mm(&self) -> f64 {
        self.width_units * UNIT_MM
    }
}

impl Default for KeySpec {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}
