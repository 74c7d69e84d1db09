//! Shared data model: the raw spreadsheet export and the normalized output.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of fixed well slots in the source export.
///
/// The export always carries positional columns for six wells; slots with no
/// data still exist so that dashboard controls and table columns stay stable
/// across refreshes.
pub const WELL_SLOTS: usize = 6;

/// Raw JSON document produced by the external export job.
///
/// The schema is not owned by this system, so parsing is deliberately
/// lenient: `items` stays a raw JSON value and is interpreted by the
/// normalizer, which degrades to defaults instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Row objects. Row 0 is a header row carrying well display names,
    /// row 1 is reserved, rows >= 2 are stage data.
    #[serde(default)]
    pub items: Value,

    /// Stock levels, passed through to the dashboard unchanged.
    #[serde(default)]
    pub stock: Vec<StockItem>,

    /// ISO timestamp of the last export run.
    #[serde(rename = "lastUpdate", default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
}

/// One stock line item, independent of wells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    #[serde(rename = "ITEM", default)]
    pub item: String,
    /// Free-form value (number or string in the export).
    #[serde(rename = "STOCK", default)]
    pub stock: Value,
}

/// One fracturing stage of one well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    /// Stage label from the `Fila` column. Never empty — rows without a
    /// label are skipped upstream.
    pub label: String,

    /// Sequence timestamp formatted `"dd/mm/yyyy, HH:MM:SS"`. The raw cell
    /// text when it could not be converted, empty when absent.
    pub date_time: String,

    /// Depth in meters; absent when the source cell is not numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,

    /// Fracture date formatted `"dd/mm/yyyy"`, verbatim text when the cell
    /// holds a non-serial annotation, empty when absent.
    pub fracture_date: String,
}

/// One well with its ordered stage list.
///
/// Stage index `k` in every well corresponds to the `k`-th qualifying data
/// row of the export, which is how the unified table keeps rows aligned
/// across wells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWell {
    pub name: String,
    pub stages: Vec<Stage>,
}

/// Output of the normalizer. Rebuilt from scratch on every refresh; never
/// mutated incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedModel {
    /// Always exactly [`WELL_SLOTS`] entries, even when a slot has no stages.
    pub wells: Vec<NormalizedWell>,
    /// Stock lines carried through unchanged.
    pub stock: Vec<StockItem>,
    /// Export timestamp carried through unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
}

impl NormalizedModel {
    /// Total number of stages across all wells.
    pub fn stage_count(&self) -> usize {
        self.wells.iter().map(|w| w.stages.len()).sum()
    }
}
