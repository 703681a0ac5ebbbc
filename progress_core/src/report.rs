//! Exports: verbatim CSV and a printable progress report.

use crate::chart::render_line_chart;
use crate::metrics::compute_deficit;
use crate::{DailyRecord, RecordStore, Result};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const REPORT_TITLE: &str = "Health & Fitness Progress Report";

/// Number of most recent days listed in the report
pub const REPORT_DAYS: usize = 7;

const CHART_HEIGHT: usize = 8;

/// Write the store to `path` in the persisted CSV format
pub fn export_csv(store: &RecordStore, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    store.write_to(&mut writer)?;
    writer.flush()?;

    tracing::info!("Exported {} records to {:?}", store.len(), path);
    Ok(())
}

/// Render the printable report for `records` (ascending by date)
///
/// Per-day deficits use the current `maintenance_calories`, not a value
/// recomputed for each historical day.
/// The weight chart only plots measured (non-zero) weights, so it can have
/// fewer points than the calories chart.
pub fn render_report(records: &[DailyRecord], maintenance_calories: i64) -> String {
    let mut out = String::new();
    let rule = "=".repeat(REPORT_TITLE.len());

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{}", REPORT_TITLE);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out);

    let start = records.len().saturating_sub(REPORT_DAYS);
    for record in &records[start..] {
        let deficit = compute_deficit(maintenance_calories, record.calories);
        let _ = writeln!(out, "Date: {}", record.date.format("%Y-%m-%d"));
        let _ = writeln!(
            out,
            "Calories: {} kcal, Protein: {} g, Weight: {} kg",
            record.calories, record.protein, record.weight
        );
        let _ = writeln!(out, "Deficit: {} kcal", deficit);
        let _ = writeln!(out);
    }

    let calories: Vec<_> = records.iter().map(|r| (r.date, r.calories)).collect();
    out.push_str(&render_line_chart(
        "Calories Over Time",
        "Calories",
        &calories,
        CHART_HEIGHT,
    ));
    let _ = writeln!(out);

    let weights: Vec<_> = records
        .iter()
        .filter_map(|r| r.weight_measured().map(|w| (r.date, w)))
        .collect();
    out.push_str(&render_line_chart(
        "Weight Over Time",
        "Weight (kg)",
        &weights,
        CHART_HEIGHT,
    ));

    out
}

/// Render the report and write it to `path`
pub fn write_report(records: &[DailyRecord], maintenance_calories: i64, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, render_report(records, maintenance_calories))?;
    tracing::info!("Wrote report for {} records to {:?}", records.len(), path);
    Ok(())
}
