use std::sync::LazyLock;

use grinner_core::{KeySpec, UNIT_MM};
use regex::{Captures, Regex};

use crate::error::ParseError;

const NUMBER: &str = r"(\d+(?:\.\d*)?|\.\d+)";

static PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^{NUMBER}\s*(u|mm)?(?:\s*(?:x|\*|×)\s*{NUMBER}\s*(u|mm)?)?$"
    ))
    .expect("valid key size pattern")
});

// Size embedded in a longer name, e.g. "SW_MX_1.25u" or "Key 2u x 1u". The
// first dimension must carry a unit so part numbers are not read as sizes.
static EMBEDDED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i){NUMBER}\s*(u|mm)(?:\s*(?:x|\*|×)\s*{NUMBER}\s*(u|mm)?)?"
    ))
    .expect("valid key size pattern")
});

/// Parse a key-size token such as `"1.25u"`, `"2u x 1u"` or `"1u×1.5u"`.
///
/// A bare number is read in key units, `mm` values are converted through
/// [`UNIT_MM`]. The height defaults to 1u.
pub fn parse_unit(token: &str) -> Result<KeySpec, ParseError> {
    let text = token.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }
    let caps = PAIR_RE
        .captures(text)
        .ok_or_else(|| ParseError::Unrecognized {
            token: token.to_string(),
        })?;

    let width = dimension(&caps, 1, 2, token)?;
    let height = match caps.get(3) {
        Some(_) => dimension(&caps, 3, 4, token)?,
        None => 1.0,
    };
    Ok(KeySpec::new(width, height))
}

/// Parse a single dimension such as `"1.5u"` or `"28.575mm"`, in key units.
pub fn parse_unit_value(token: &str) -> Result<f64, ParseError> {
    let spec = parse_unit(token)?;
    if token.contains(['x', 'X', '*', '×']) {
        return Err(ParseError::Unrecognized {
            token: token.to_string(),
        });
    }
    Ok(spec.width_units)
}

/// Snap a measured size to the nearest quarter unit, never below 1u.
#[must_use]
pub fn quantize_units(value_units: f64) -> f64 {
    if !value_units.is_finite() || value_units <= 0.0 {
        return 1.0;
    }
    let stepped = (value_units.max(1.0) / 0.25).round() * 0.25;
    stepped.max(1.0)
}

/// Size pair found in free text such as a footprint name or a size field.
///
/// Unlike [`parse_unit`], a bare number is not a size here: the text needs an
/// explicit `u` or `mm`.
#[must_use]
pub fn find_key_size(text: &str) -> Option<KeySpec> {
    let caps = EMBEDDED_RE.captures(text)?;
    let width = dimension(&caps, 1, 2, text).ok()?;
    let height = match caps.get(3) {
        Some(_) => dimension(&caps, 3, 4, text).ok()?,
        None => 1.0,
    };
    Some(KeySpec::new(width, height))
}

/// Footprint metadata a key size can be read from, strongest first.
#[derive(Debug, Clone, Default)]
pub struct SizeHints<'a> {
    /// Single width values (`KEY_WIDTH`). Bare numbers count as units.
    pub width: Vec<&'a str>,
    /// Single height values (`KEY_HEIGHT`).
    pub height: Vec<&'a str>,
    /// Size pairs (`KEY_SIZE`), used for whichever dimension is still missing.
    pub pairs: Vec<&'a str>,
    /// Width values read after the pairs (`SW_WIDTH`).
    pub late_width: Vec<&'a str>,
    /// Names, values and descriptions searched for an embedded size.
    pub names: Vec<&'a str>,
    /// Measured body size in mm, snapped with [`quantize_units`].
    pub body_mm: Option<[f64; 2]>,
}

/// Resolve a key size from `hints`, one dimension at a time.
///
/// Dimensions nothing provides fall back to 1u with a warning.
#[must_use]
pub fn infer_key_spec(hints: &SizeHints<'_>) -> KeySpec {
    fn single(texts: &[&str]) -> Option<f64> {
        texts.iter().find_map(|t| parse_unit_value(t).ok())
    }

    fn fill(texts: &[&str], width: &mut Option<f64>, height: &mut Option<f64>) {
        for spec in texts.iter().filter_map(|t| find_key_size(t)) {
            if width.is_some() && height.is_some() {
                break;
            }
            width.get_or_insert(spec.width_units);
            height.get_or_insert(spec.height_units);
        }
    }

    let mut width = single(&hints.width);
    let mut height = single(&hints.height);

    fill(&hints.pairs, &mut width, &mut height);
    if width.is_none() {
        width = single(&hints.late_width);
    }
    fill(&hints.names, &mut width, &mut height);

    if let Some([w, h]) = hints.body_mm {
        width.get_or_insert_with(|| quantize_units(w / UNIT_MM));
        height.get_or_insert_with(|| quantize_units(h / UNIT_MM));
    }
    if width.is_none() || height.is_none() {
        tracing::warn!(?hints, "no key size found, assuming 1u");
    }
    KeySpec::new(width.unwrap_or(1.0), height.unwrap_or(1.0))
}

fn dimension(
    caps: &Captures<'_>,
    num: usize,
    unit: usize,
    token: &str,
) -> Result<f64, ParseError> {
    let raw = caps.get(num).map_or("", |m| m.as_str());
    let value: f64 = raw.parse().map_err(|_| ParseError::Unrecognized {
        token: token.to_string(),
    })?;
    let value = match caps.get(unit).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(u) if u == "mm" => value / UNIT_MM,
        _ => value,
    };
    if value <= 0.0 {
        return Err(ParseError::NonPositive {
            token: token.to_string(),
        });
    }
    Ok(value)
}
