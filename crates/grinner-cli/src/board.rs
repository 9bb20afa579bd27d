//! JSON board documents.
//!
//! A board is a list of footprint records. Keys the tool does not know about
//! are carried through untouched so a placed board round-trips.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use grinner_core::KeySpec;
use grinner_layout::{load_row, Footprint, HostError};
use grinner_parser::{infer_key_spec, parse_unit, SavedRow, SizeHints};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const WIDTH_FIELDS: [&str; 2] = ["KEY_WIDTH", "KeyWidth"];
const HEIGHT_FIELDS: [&str; 2] = ["KEY_HEIGHT", "KeyHeight"];
const SIZE_FIELDS: [&str; 5] = ["KEY_SIZE", "KeySize", "KEY_DIM", "KeyDim", "SW_SIZE"];
const LATE_WIDTH_FIELDS: [&str; 1] = ["SW_WIDTH"];

static SWITCH_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^SW\d+$").expect("valid switch reference pattern"));

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Board {
    pub footprints: Vec<FootprintRecord>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FootprintRecord {
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub library: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Explicit key size such as `"1.25u"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Measured body `[width, height]` in mm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_size: Option<[f64; 2]>,
    pub position: [f64; 2],
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "is_origin")]
    pub key_center_offset: [f64; 2],
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

fn is_origin(v: &[f64; 2]) -> bool {
    *v == [0.0, 0.0]
}

impl FootprintRecord {
    /// Key size of this footprint.
    ///
    /// An explicit `size` token wins. Otherwise the width and height fields,
    /// then size-pair fields, then `SW_WIDTH`, then sizes embedded in the
    /// library name, value or description, then the snapped body size.
    pub fn key_spec(&self) -> KeySpec {
        if let Some(spec) = self.size.as_deref().and_then(|s| parse_unit(s).ok()) {
            return spec;
        }
        infer_key_spec(&SizeHints {
            width: self.field_texts(&WIDTH_FIELDS),
            height: self.field_texts(&HEIGHT_FIELDS),
            pairs: self.field_texts(&SIZE_FIELDS),
            late_width: self.field_texts(&LATE_WIDTH_FIELDS),
            names: [&self.library, &self.value, &self.description]
                .into_iter()
                .map(String::as_str)
                .filter(|text| !text.trim().is_empty())
                .collect(),
            body_mm: self.body_size,
        })
    }

    fn field_texts(&self, names: &[&str]) -> Vec<&str> {
        names
            .iter()
            .filter_map(|name| self.fields.get(*name))
            .map(String::as_str)
            .collect()
    }

    pub fn is_switch(&self) -> bool {
        SWITCH_REF.is_match(&self.reference)
    }
}

impl Footprint for FootprintRecord {
    fn reference(&self) -> &str {
        &self.reference
    }

    fn position(&self) -> [f64; 2] {
        self.position
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn set_position(&mut self, position: [f64; 2]) -> Result<(), HostError> {
        if self.locked {
            return Err(format!("{} is locked", self.reference).into());
        }
        self.position = position;
        Ok(())
    }

    fn set_rotation(&mut self, rotation_deg: f64) -> Result<(), HostError> {
        if self.locked {
            return Err(format!("{} is locked", self.reference).into());
        }
        self.rotation = rotation_deg;
        Ok(())
    }

    fn key_center_offset(&self) -> [f64; 2] {
        self.key_center_offset
    }

    fn field(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), HostError> {
        self.fields.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

impl Board {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read board {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse board {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("failed to serialize board")?;
        std::fs::write(path, text + "\n")
            .with_context(|| format!("failed to write board {}", path.display()))
    }

    /// Selected switch footprints (`SW<n>`), in natural reference order.
    pub fn gather_targets(&mut self) -> Vec<&mut FootprintRecord> {
        let mut targets: Vec<&mut FootprintRecord> = self
            .footprints
            .iter_mut()
            .filter(|fp| fp.selected && fp.is_switch())
            .collect();
        targets.sort_by(|a, b| natural_key(&a.reference).cmp(&natural_key(&b.reference)));
        targets
    }

    /// Rows saved on this board, keyed by the footprint carrying them.
    ///
    /// Unreadable fields are skipped with a warning.
    pub fn find_saved_rows(&self) -> Vec<(String, SavedRow)> {
        let mut rows: Vec<(String, SavedRow)> = self
            .footprints
            .iter()
            .filter_map(|fp| match load_row(fp) {
                Ok(row) => row.map(|row| (fp.reference.clone(), row)),
                Err(err) => {
                    tracing::warn!(reference = %fp.reference, error = %err, "skipping saved row");
                    None
                }
            })
            .collect();
        rows.sort_by(|a, b| natural_key(&a.0).cmp(&natural_key(&b.0)));
        rows
    }

    /// Select exactly the footprints of `row`. Returns how many were found.
    pub fn reselect(&mut self, row: &SavedRow) -> usize {
        let mut found = 0;
        for fp in &mut self.footprints {
            fp.selected = row.footprints.contains(&fp.reference);
            found += usize::from(fp.selected);
        }
        if found < row.footprints.len() {
            tracing::warn!(
                found,
                saved = row.footprints.len(),
                "some footprints of the saved row are missing"
            );
        }
        found
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Chunk {
    Number(u64),
    Text(String),
}

/// Sort key that orders embedded numbers by value, so `SW2 < SW10`.
fn natural_key(reference: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut rest = reference;
    while let Some(first) = rest.chars().next() {
        let digit = first.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != digit)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(end);
        chunks.push(match head.parse() {
            Ok(n) if digit => Chunk::Number(n),
            _ => Chunk::Text(head.to_ascii_lowercase()),
        });
        rest = tail;
    }
    chunks
}
