//! Optional YAML settings file.
//!
//! ```yaml
//! sag: 12.5
//! flat: 1          # both ends, or flat_left / flat_right
//! profile: quadratic
//! asymmetric: true
//! ```

use std::path::Path;

use grinner_core::{AngleProfile, CurveParams};
use serde::Deserialize;

use crate::error::CliError;

/// Partial parameter overrides. Unset entries leave the base value alone.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub sag: Option<f64>,
    pub flat: Option<u8>,
    pub flat_left: Option<u8>,
    pub flat_right: Option<u8>,
    pub profile: Option<AngleProfile>,
    pub asymmetric: Option<bool>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CliError::input(format!("could not read settings {}: {e}", path.display()))
        })?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw)
            .map_err(|e| CliError::input(format!("invalid settings {}: {e}", path.display())))
    }

    /// Layer these overrides on top of `base`. Per-side flat counts win over
    /// `flat`.
    #[must_use]
    pub fn apply_to(&self, base: CurveParams) -> CurveParams {
        let mut params = base;
        if let Some(sag) = self.sag {
            params.sag_mm = sag;
        }
        if let Some(flat) = self.flat {
            params = params.with_flat(flat);
        }
        if let Some(n) = self.flat_left {
            params.flat_left = n;
        }
        if let Some(n) = self.flat_right {
            params.flat_right = n;
        }
        if let Some(profile) = self.profile {
            params.angle_profile = profile;
        }
        if let Some(on) = self.asymmetric {
            params.asymmetric_correction = on;
        }
        params
    }
}

/// Final parameters: defaults, then the settings file, then a saved row when
/// re-opening one, then command-line flags.
pub fn resolve_params(
    config: Option<&Path>,
    saved: Option<CurveParams>,
    flags: &Settings,
) -> Result<CurveParams, CliError> {
    let mut params = CurveParams::default();
    if let Some(path) = config {
        params = Settings::load(path)?.apply_to(params);
        tracing::debug!(path = %path.display(), "loaded settings");
    }
    if let Some(saved) = saved {
        params = saved;
    }
    let params = flags.apply_to(params);
    params.validate()?;
    Ok(params)
}
