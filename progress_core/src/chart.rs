//! Plain-text time-series charts for the printable report.

use chrono::NaiveDate;
use std::fmt::Write;

const MARKER: char = 'o';
const COLUMN_WIDTH: usize = 2;

/// Render `points` as a fixed-height text chart
///
/// Each point takes one column, left to right in the order given. The y
/// axis is labelled with the minimum and maximum values.
pub fn render_line_chart(
    title: &str,
    y_label: &str,
    points: &[(NaiveDate, f64)],
    height: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);

    if points.is_empty() {
        let _ = writeln!(out, "  (no data)");
        return out;
    }

    let height = height.max(2);
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, v)| {
            (lo.min(v), hi.max(v))
        });

    let row_of = |v: f64| -> usize {
        if max > min {
            ((v - min) / (max - min) * (height - 1) as f64).round() as usize
        } else {
            height / 2
        }
    };

    let max_label = format!("{:.1}", max);
    let min_label = format!("{:.1}", min);
    let label_width = max_label.len().max(min_label.len()).max(y_label.len());

    let _ = writeln!(out, "{:>width$}", y_label, width = label_width);
    for row in (0..height).rev() {
        let label = if row == height - 1 {
            max_label.as_str()
        } else if row == 0 {
            min_label.as_str()
        } else {
            ""
        };

        let line: String = points
            .iter()
            .map(|&(_, v)| {
                let cell = if row_of(v) == row { MARKER } else { ' ' };
                format!("{:<w$}", cell, w = COLUMN_WIDTH)
            })
            .collect();
        let _ = writeln!(
            out,
            "{:>width$} |{}",
            label,
            line.trim_end(),
            width = label_width
        );
    }

    let _ = writeln!(
        out,
        "{:>width$} +{}",
        "",
        "-".repeat(points.len() * COLUMN_WIDTH),
        width = label_width
    );

    let first = points[0].0;
    let last = points[points.len() - 1].0;
    let range = if first == last {
        first.to_string()
    } else {
        format!("{} .. {}", first, last)
    };
    let _ = writeln!(out, "{:>width$}  {}", "", range, width = label_width);

    out
}
