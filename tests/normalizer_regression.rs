//! Normalizer Regression Tests
//!
//! Pins the end-to-end behavior of the transformation core on a realistic
//! export document: well-count stability, name resolution, row alignment,
//! per-cell degradation, serial-date output, and the KPI aggregates derived
//! from the result.

use chrono::NaiveDate;
use fracboard::kpi;
use fracboard::normalize;
use fracboard::types::{RawDocument, WELL_SLOTS};
use serde_json::json;

/// A trimmed-down but structurally faithful export document: header row,
/// reserved row, then data rows with the positional slot columns.
fn sample_export() -> RawDocument {
    serde_json::from_value(json!({
        "items": [
            {
                "Fila": "Pozo",
                "FechaFracPozo1": "Lca-3001(h)", "TPNPozo1": "X",
                "FechaFracPozo2": "Lca-3002(h)",
                "FechaFracPozo3": "X", "TPNPozo3": "X"
            },
            {"Fila": "unidades"},
            {
                "Fila": "1",
                "SecuenciaPozo1": 44927.354166666664, "TPNPozo1": 2512, "FechaFracPozo1": 44927,
                "SecuenciaPozo2": 44927.5, "TPNPozo2": "2600.5", "FechaFracPozo2": 44927,
                "TPNPozo3": "X"
            },
            {
                "Fila": "2",
                "SecuenciaPozo1": 44928.0, "TPNPozo1": 2515, "FechaFracPozo1": 44928,
                "SecuenciaPozo2": "en curso", "FechaFracPozo2": "reprogramada"
            },
            {"Fila": "", "SecuenciaPozo1": 44929.0, "TPNPozo1": 9999},
            {
                "Fila": "3",
                "SecuenciaPozo2": 44929.25, "TPNPozo2": 2700, "FechaFracPozo2": 44929
            }
        ],
        "stock": [
            {"ITEM": "Arena 100", "STOCK": 1200},
            {"ITEM": "Agua", "STOCK": "8500 m3"}
        ],
        "lastUpdate": "2023-01-03T12:00:00Z"
    }))
    .expect("sample export is valid JSON")
}

#[test]
fn always_six_wells_regardless_of_data() {
    let model = normalize(&sample_export());
    assert_eq!(model.wells.len(), WELL_SLOTS);

    let empty = normalize(&RawDocument::default());
    assert_eq!(empty.wells.len(), WELL_SLOTS);
}

#[test]
fn empty_items_yields_named_empty_wells() {
    let raw: RawDocument = serde_json::from_value(json!({"items": []})).expect("valid");
    let model = normalize(&raw);
    let names: Vec<_> = model.wells.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["Pozo 1", "Pozo 2", "Pozo 3", "Pozo 4", "Pozo 5", "Pozo 6"]);
    assert!(model.wells.iter().all(|w| w.stages.is_empty()));
}

#[test]
fn header_name_resolution() {
    let model = normalize(&sample_export());
    assert_eq!(model.wells[0].name, "Lca-3001(h)");
    assert_eq!(model.wells[1].name, "Lca-3002(h)");
    // Both header cells are the "X" placeholder.
    assert_eq!(model.wells[2].name, "Pozo 3");
    // No header cells at all.
    assert_eq!(model.wells[3].name, "Pozo 4");
}

#[test]
fn row_alignment_and_blank_row_skipping() {
    let model = normalize(&sample_export());

    // Three qualifying rows (the blank-Fila row is dropped for every well).
    for well in &model.wells {
        assert_eq!(well.stages.len(), 3, "well {} misaligned", well.name);
    }
    let labels: Vec<_> = model.wells[5].stages.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["1", "2", "3"]);

    // The blank row's values leaked nowhere.
    assert!(model.wells[0]
        .stages
        .iter()
        .all(|s| s.depth != Some(9999.0)));

    // Row 3 has data only for well 2; the other wells carry empty cells at
    // the same index.
    assert_eq!(model.wells[1].stages[2].depth, Some(2700.0));
    assert_eq!(model.wells[0].stages[2].depth, None);
    assert_eq!(model.wells[0].stages[2].date_time, "");
}

#[test]
fn serial_conversion_in_context() {
    let model = normalize(&sample_export());

    // 44927 = 2023-01-01; .354166666664 of a day = 08:30:00.
    assert_eq!(model.wells[0].stages[0].date_time, "01/01/2023, 08:30:00");
    assert_eq!(model.wells[1].stages[0].date_time, "01/01/2023, 12:00:00");
    assert_eq!(model.wells[0].stages[0].fracture_date, "01/01/2023");
    assert_eq!(model.wells[0].stages[1].fracture_date, "02/01/2023");
}

#[test]
fn unconvertible_cells_degrade_independently() {
    let model = normalize(&sample_export());

    // Non-numeric, non-date sequence text is preserved verbatim.
    assert_eq!(model.wells[1].stages[1].date_time, "en curso");
    // Free-text fracture annotation kept unchanged.
    assert_eq!(model.wells[1].stages[1].fracture_date, "reprogramada");
    // "X" depth is not a number.
    assert_eq!(model.wells[2].stages[0].depth, None);
    // String-typed numeric depth still parses.
    assert_eq!(model.wells[1].stages[0].depth, Some(2600.5));
}

#[test]
fn stock_and_last_update_pass_through() {
    let model = normalize(&sample_export());
    assert_eq!(model.stock.len(), 2);
    assert_eq!(model.stock[0].item, "Arena 100");
    assert_eq!(model.last_update.as_deref(), Some("2023-01-03T12:00:00Z"));
}

#[test]
fn normalize_is_idempotent() {
    let raw = sample_export();
    assert_eq!(normalize(&raw), normalize(&raw));
}

#[test]
fn kpi_aggregates_over_sample() {
    let model = normalize(&sample_export());
    let today = NaiveDate::from_ymd_opt(2023, 1, 3).expect("valid date");
    let summary = kpi::compute_for_day(&model, today);

    // Fracture dates: 2x 01/01, 1x 02/01, 1x 03/01, plus one free-text.
    assert_eq!(summary.total_stages, 5);
    assert_eq!(summary.stages_today, 1);
    assert_eq!(summary.stages_yesterday, 1);
    // Mean of {2, 1, 1} over 3 active days.
    assert_eq!(summary.average_stages_per_day, Some(1.33));
    assert_eq!(summary.wells, WELL_SLOTS);
}
