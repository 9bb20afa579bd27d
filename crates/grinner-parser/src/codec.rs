use grinner_core::{AngleProfile, ConfigError, CurveParams};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::DecodeError;

/// Name of the hidden footprint field holding the saved row.
pub const FIELD_NAME: &str = "grinner_params";

/// Current format version written by [`encode`].
pub const FORMAT_VERSION: u64 = 2;

/// A row snapshot read back from a footprint field.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedRow {
    pub params: CurveParams,
    /// Key widths in units, left to right. Empty for fields written by the
    /// legacy format, which did not store them.
    pub widths: Vec<f64>,
    /// Footprint references of the row, left to right.
    pub footprints: Vec<String>,
}

impl SavedRow {
    /// `"SW1〜SW5"`, or `None` when no references were saved.
    #[must_use]
    pub fn row_name(&self) -> Option<String> {
        let first = self.footprints.first()?;
        let last = self.footprints.last()?;
        Some(format!("{first}〜{last}"))
    }

    /// Human readable label for row pickers.
    #[must_use]
    pub fn label(&self) -> String {
        let name = self.row_name().unwrap_or_else(|| "Unknown".to_string());
        format!("{name} ({} keys)", self.footprints.len())
    }
}

/// Encode `params` and the row's key widths for the footprint field.
#[must_use]
pub fn encode(params: &CurveParams, widths: &[f64]) -> String {
    to_value(params, widths).to_string()
}

/// Encode a row together with the references of its footprints.
#[must_use]
pub fn encode_row(row: &SavedRow) -> String {
    let mut value = to_value(&row.params, &row.widths);
    if let Value::Object(map) = &mut value {
        map.insert("footprints".to_string(), json!(row.footprints));
        if let Some(name) = row.row_name() {
            map.insert("row_name".to_string(), Value::String(name));
        }
    }
    value.to_string()
}

/// Decode a field written by [`encode`] or [`encode_row`].
pub fn decode(text: &str) -> Result<(CurveParams, Vec<f64>), DecodeError> {
    let row = decode_row(text)?;
    Ok((row.params, row.widths))
}

/// Decode an optional field value. A missing or blank field means the
/// footprint carries no saved row and is not an error.
pub fn decode_field(text: Option<&str>) -> Result<Option<SavedRow>, DecodeError> {
    match text.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => decode_row(text).map(Some),
    }
}

fn to_value(params: &CurveParams, widths: &[f64]) -> Value {
    json!({
        "version": FORMAT_VERSION,
        "sag": params.sag_mm,
        "flat_left": params.flat_left,
        "flat_right": params.flat_right,
        "profile": params.angle_profile,
        "use_asymmetric_curve": params.asymmetric_correction,
        "widths": widths,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Current {
    #[allow(dead_code)]
    version: u64,
    sag: f64,
    flat_left: u8,
    flat_right: u8,
    profile: AngleProfile,
    use_asymmetric_curve: bool,
    widths: Vec<f64>,
    #[serde(default)]
    footprints: Vec<String>,
    #[serde(default)]
    #[allow(dead_code)]
    row_name: Option<String>,
}

// Dated versions ("2025.10.2") used one flat count for both ends and did not
// store widths.
#[derive(Debug, Deserialize)]
struct Legacy {
    sag: f64,
    end_flat: u8,
    profile: AngleProfile,
    #[serde(default)]
    use_asymmetric_curve: bool,
    #[serde(default)]
    footprints: Vec<String>,
}

fn decode_row(text: &str) -> Result<SavedRow, DecodeError> {
    let value: Value = serde_json::from_str(text).map_err(DecodeError::Json)?;
    let Value::Object(map) = value else {
        return Err(DecodeError::NotAnObject);
    };

    let dated = match map.get("version") {
        None | Some(Value::Null) => return Err(DecodeError::MissingVersion),
        Some(Value::Number(n)) if n.as_u64() == Some(FORMAT_VERSION) => None,
        Some(Value::String(dated)) => Some(dated.clone()),
        Some(other) => {
            return Err(DecodeError::UnsupportedVersion {
                found: other.to_string(),
            });
        }
    };
    let row = match dated {
        None => decode_current(map)?,
        Some(dated) => decode_legacy(map, &dated)?,
    };

    row.params.validate()?;
    for (index, &value) in row.widths.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 {
            return Err(DecodeError::Width { index, value });
        }
    }
    if !row.widths.is_empty() && row.params.flat_total() > row.widths.len() {
        return Err(DecodeError::Params(ConfigError::TooManyFlatKeys {
            flat: row.params.flat_total(),
            total: row.widths.len(),
        }));
    }
    Ok(row)
}

fn decode_current(map: Map<String, Value>) -> Result<SavedRow, DecodeError> {
    let raw: Current =
        serde_json::from_value(Value::Object(map)).map_err(|source| DecodeError::Field {
            version: FORMAT_VERSION.to_string(),
            source,
        })?;
    Ok(SavedRow {
        params: CurveParams {
            sag_mm: raw.sag,
            flat_left: raw.flat_left,
            flat_right: raw.flat_right,
            angle_profile: raw.profile,
            asymmetric_correction: raw.use_asymmetric_curve,
        },
        widths: raw.widths,
        footprints: raw.footprints,
    })
}

fn decode_legacy(map: Map<String, Value>, version: &str) -> Result<SavedRow, DecodeError> {
    let raw: Legacy =
        serde_json::from_value(Value::Object(map)).map_err(|source| DecodeError::Field {
            version: version.to_string(),
            source,
        })?;
    tracing::debug!(version, "decoding legacy saved row");
    Ok(SavedRow {
        params: CurveParams {
            sag_mm: raw.sag,
            flat_left: raw.end_flat,
            flat_right: raw.end_flat,
            angle_profile: raw.profile,
            asymmetric_correction: raw.use_asymmetric_curve,
        },
        widths: Vec::new(),
        footprints: raw.footprints,
    })
}
