//! Aggregate KPI derivations over the normalized model.
//!
//! Stage counts group by the calendar day of each parseable fracture date.
//! The daily average divides by the number of distinct days that actually
//! had stages, not by a fixed calendar window, and reports two decimals.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::normalizer::serial;
use crate::types::NormalizedModel;

/// KPI aggregates rendered on the dashboard header cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    /// Number of well slots (always 6 under the current export layout).
    pub wells: usize,

    /// Stages with a non-empty fracture date, parsed or not.
    pub total_stages: usize,

    /// Mean stages per distinct active day, rounded to two decimals.
    /// `None` is the "N/A" sentinel — no day had a parseable fracture date.
    pub average_stages_per_day: Option<f64>,

    /// Stages whose fracture date is the current local calendar day.
    pub stages_today: u32,

    /// Stages whose fracture date is the preceding local calendar day.
    pub stages_yesterday: u32,

    /// Per-day stage counts, ISO-keyed and sorted.
    pub stages_per_day: BTreeMap<NaiveDate, u32>,
}

impl KpiSummary {
    /// Two-decimal display for the average card, or the `N/A` sentinel.
    pub fn average_display(&self) -> String {
        match self.average_stages_per_day {
            Some(avg) => format!("{avg:.2}"),
            None => "N/A".to_string(),
        }
    }
}

/// Compute KPI aggregates relative to the current local day.
pub fn compute(model: &NormalizedModel) -> KpiSummary {
    compute_for_day(model, Local::now().date_naive())
}

/// Compute KPI aggregates with `today` injected, so the calendar-relative
/// counts are deterministic under test.
pub fn compute_for_day(model: &NormalizedModel, today: NaiveDate) -> KpiSummary {
    let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    let mut total_stages = 0usize;

    for well in &model.wells {
        for stage in &well.stages {
            if stage.fracture_date.is_empty() {
                continue;
            }
            // Counted as performed even when the date is free text.
            total_stages += 1;
            if let Some(day) = serial::parse_text_date(&stage.fracture_date) {
                *per_day.entry(day).or_insert(0) += 1;
            }
        }
    }

    let average_stages_per_day = if per_day.is_empty() {
        None
    } else {
        let sum: u32 = per_day.values().sum();
        #[allow(clippy::cast_precision_loss)]
        Some(round2(f64::from(sum) / per_day.len() as f64))
    };

    let stages_today = per_day.get(&today).copied().unwrap_or(0);
    let stages_yesterday = today
        .pred_opt()
        .and_then(|day| per_day.get(&day).copied())
        .unwrap_or(0);

    KpiSummary {
        wells: model.wells.len(),
        total_stages,
        average_stages_per_day,
        stages_today,
        stages_yesterday,
        stages_per_day: per_day,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
