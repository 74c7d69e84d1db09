//! WellDataNormalizer — the transformation core.
//!
//! Converts the flat, spreadsheet-export-shaped JSON document (rows keyed by
//! positional well-slot column names, serial-encoded dates) into the
//! normalized per-well stage model. Total and side-effect free: malformed
//! input degrades to empty or default structures, never an error, and a bad
//! cell never affects its neighbours.

pub mod serial;

use serde_json::Value;

use crate::types::{NormalizedModel, NormalizedWell, RawDocument, Stage, WELL_SLOTS};

/// Header cell filler meaning "no name here".
const NAME_PLACEHOLDER: &str = "X";

/// Normalize the raw export into the per-well stage model.
///
/// Always produces exactly [`WELL_SLOTS`] wells, in slot order, so downstream
/// controls and table columns stay stable when a slot temporarily has no
/// rows. Stage `k` of every well corresponds to the `k`-th data row with a
/// non-blank `Fila` label, preserving row alignment across wells.
pub fn normalize(raw: &RawDocument) -> NormalizedModel {
    let mut model = NormalizedModel {
        wells: default_wells(),
        stock: raw.stock.clone(),
        last_update: raw.last_update.clone(),
    };

    let Some(items) = raw.items.as_array() else {
        return model;
    };
    if items.is_empty() {
        return model;
    }

    // Row 0 carries the well display names.
    if let Some(header) = items.first() {
        for slot in 1..=WELL_SLOTS {
            model.wells[slot - 1].name = resolve_well_name(header, slot);
        }
    }

    // Row 1 is reserved; stage data starts at index 2.
    for row in items.iter().skip(2) {
        let Some(label) = cell_text(row, "Fila") else {
            // A row without a stage label contributes to no well, even if
            // its slot columns hold values.
            continue;
        };
        for slot in 1..=WELL_SLOTS {
            let stage = extract_stage(row, slot, &label);
            model.wells[slot - 1].stages.push(stage);
        }
    }

    model
}

/// Six empty wells with synthesized names, the shape every degraded path
/// falls back to.
fn default_wells() -> Vec<NormalizedWell> {
    (1..=WELL_SLOTS)
        .map(|slot| NormalizedWell {
            name: format!("Pozo {slot}"),
            stages: Vec::new(),
        })
        .collect()
}

/// Resolve a well display name from the header row.
///
/// The alternate key (`FechaFracPozo{i}`) holds the well identifier in
/// current exports (e.g. `Lca-3001(h)`); the primary key (`TPNPozo{i}`) is
/// the older layout. Blank cells and the `"X"` filler are skipped, falling
/// back to a synthesized `Pozo {i}`.
fn resolve_well_name(header: &Value, slot: usize) -> String {
    let alternate = cell_text(header, &format!("FechaFracPozo{slot}"));
    let primary = cell_text(header, &format!("TPNPozo{slot}"));

    [alternate, primary]
        .into_iter()
        .flatten()
        .find(|name| !name.eq_ignore_ascii_case(NAME_PLACEHOLDER))
        .unwrap_or_else(|| format!("Pozo {slot}"))
}

/// Extract one stage for one well slot from a data row.
///
/// Each cell converts independently: a non-numeric depth or unparseable date
/// degrades that field alone.
fn extract_stage(row: &Value, slot: usize, label: &str) -> Stage {
    let sequence = cell_text(row, &format!("SecuenciaPozo{slot}"));
    let depth = cell_number(row, &format!("TPNPozo{slot}"));
    let fracture = cell_text(row, &format!("FechaFracPozo{slot}"));

    let date_time = match sequence {
        None => String::new(),
        Some(text) => match parse_serial(&text) {
            Some(dt) => serial::format_datetime(&dt),
            None => match serial::parse_text_datetime(&text) {
                Some(dt) => serial::format_datetime(&dt),
                // Conversion failed entirely: keep the raw text rather than
                // discarding the cell silently.
                None => text,
            },
        },
    };

    let fracture_date = match fracture {
        None => String::new(),
        Some(text) => match parse_serial(&text) {
            Some(dt) => serial::format_date(&dt),
            // Free text may already be a human-readable date or annotation.
            None => text,
        },
    };

    Stage {
        label: label.to_string(),
        date_time,
        depth,
        fracture_date,
    }
}

fn parse_serial(text: &str) -> Option<chrono::NaiveDateTime> {
    text.parse::<f64>().ok().and_then(serial::serial_to_datetime)
}

/// Cell rendered as trimmed text; `None` when absent, blank, or not a scalar.
fn cell_text(row: &Value, key: &str) -> Option<String> {
    let text = match row.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Strict numeric read: JSON numbers directly, strings via a full-string
/// float parse. No leading-prefix parsing — `"123abc"` is not a number.
fn cell_number(row: &Value, key: &str) -> Option<f64> {
    match row.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
