//! Text rendering of BMI history: a table and a trend chart.
//!
//! Records arrive newest first, as the store returns them. The table keeps
//! that order; the chart plots oldest to newest.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::observation::{Measurement, Record};

/// Title printed above the trend chart.
pub const CHART_TITLE: &str = "BMI Trend Analysis";

/// Printed in place of a chart when there is nothing to plot.
pub const NO_HISTORY_MESSAGE: &str = "No BMI history to plot.";

/// Shown instead of a result when weight or height is rejected.
pub const INVALID_INPUT_MESSAGE: &str = "Please enter valid numeric values for weight and height.";

/// Printed in place of a table when the store is empty.
pub const NO_RECORDS_MESSAGE: &str = "No records yet.";

/// Width of the weight and height columns, wide enough for `Weight (kg)`.
const MEASUREMENT_WIDTH: usize = 11;

/// Width of the y-axis label column.
const LABEL_WIDTH: usize = 7;

const MARKER: char = 'o';
const CONNECTOR: char = '.';

/// Render records as an aligned Date / BMI / Weight / Height table.
#[must_use]
pub fn render_table(records: &[Record]) -> String {
    if records.is_empty() {
        return format!("{NO_RECORDS_MESSAGE}\n");
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<19}  {:>6}  {:>MEASUREMENT_WIDTH$}  {:>MEASUREMENT_WIDTH$}",
        "Date",
        "BMI",
        column_heading("Weight", Measurement::Weight),
        column_heading("Height", Measurement::Height)
    );
    let _ = writeln!(
        out,
        "{}",
        "-".repeat(19 + 2 + 6 + 2 + MEASUREMENT_WIDTH + 2 + MEASUREMENT_WIDTH)
    );
    for record in records {
        let _ = writeln!(
            out,
            "{:<19}  {:>6.2}  {:>MEASUREMENT_WIDTH$.1}  {:>MEASUREMENT_WIDTH$.1}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            record.bmi,
            record.weight,
            record.height
        );
    }
    out
}

fn column_heading(label: &str, measurement: Measurement) -> String {
    format!("{label} ({})", measurement.unit())
}

/// Render records as one `timestamp<TAB>bmi` line each.
#[must_use]
pub fn render_plain(records: &[Record]) -> String {
    records.iter().fold(String::new(), |mut out, record| {
        let _ = writeln!(out, "{}\t{:.2}", record.timestamp.to_rfc3339(), record.bmi);
        out
    })
}

/// A `(timestamp, bmi)` series in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    points: Vec<(DateTime<Utc>, f64)>,
}

impl TrendChart {
    /// Build a chart from records in any order.
    ///
    /// Points are sorted oldest first, ties broken by id.
    #[must_use]
    pub fn from_records(records: &[Record]) -> Self {
        let mut ordered: Vec<&Record> = records.iter().collect();
        ordered.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));

        Self {
            points: ordered.into_iter().map(|r| (r.timestamp, r.bmi)).collect(),
        }
    }

    /// The plotted points, oldest first.
    #[must_use]
    pub fn points(&self) -> &[(DateTime<Utc>, f64)] {
        &self.points
    }

    /// Whether there is anything to plot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Draw the chart into a `width` x `height` character plot area.
    ///
    /// Points are spread evenly across the width, so more points than
    /// columns will overlap.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn render(&self, width: usize, height: usize) -> String {
        if self.points.is_empty() {
            return format!("{NO_HISTORY_MESSAGE}\n");
        }

        let width = width.max(2);
        let height = height.max(2);
        let (low, high) = self.value_range();
        let last_row = height - 1;

        let row_of = |value: f64| -> usize {
            let scaled = (high - value) / (high - low) * last_row as f64;
            (scaled.round().max(0.0) as usize).min(last_row)
        };
        let count = self.points.len();
        let col_of = |index: usize| -> usize {
            if count == 1 {
                0
            } else {
                index * (width - 1) / (count - 1)
            }
        };

        let mut grid = vec![vec![' '; width]; height];

        for (index, pair) in self.points.windows(2).enumerate() {
            let (start, end) = (col_of(index), col_of(index + 1));
            let (from, to) = (pair[0].1, pair[1].1);
            for col in start + 1..end {
                let t = (col - start) as f64 / (end - start) as f64;
                grid[row_of(from + (to - from) * t)][col] = CONNECTOR;
            }
        }
        for (index, &(_, value)) in self.points.iter().enumerate() {
            grid[row_of(value)][col_of(index)] = MARKER;
        }

        let mut out = String::new();
        let _ = writeln!(out, "{CHART_TITLE}");
        let _ = writeln!(out);
        let _ = writeln!(out, "{:>LABEL_WIDTH$}", "BMI");

        let mid_row = last_row / 2;
        for (row, cells) in grid.iter().enumerate() {
            let label = if row == 0 || row == mid_row || row == last_row {
                let value = high - (high - low) * row as f64 / last_row as f64;
                format!("{value:.2}")
            } else {
                String::new()
            };
            let line: String = cells.iter().collect();
            let _ = writeln!(out, "{label:>LABEL_WIDTH$} |{}", line.trim_end());
        }

        let _ = writeln!(out, "{:>LABEL_WIDTH$} +{}", "", "-".repeat(width));
        let _ = writeln!(out, "{:>LABEL_WIDTH$}  {}", "", self.date_axis(width));
        let _ = writeln!(out, "{:>LABEL_WIDTH$}  {:^width$}", "", "Date");
        out
    }

    /// Min and max BMI, widened when all points share one value.
    fn value_range(&self) -> (f64, f64) {
        let (low, high) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), &(_, v)| {
                (low.min(v), high.max(v))
            });
        if high - low < f64::EPSILON {
            (low - 0.5, high + 0.5)
        } else {
            (low, high)
        }
    }

    /// First date at the left edge, last date at the right edge.
    fn date_axis(&self, width: usize) -> String {
        let first = self.points[0].0.format("%Y-%m-%d").to_string();
        let last = self.points[self.points.len() - 1].0.format("%Y-%m-%d").to_string();
        if self.points.len() == 1 || first == last {
            return first;
        }
        let gap = width.saturating_sub(first.len() + last.len()).max(1);
        format!("{first}{}{last}", " ".repeat(gap))
    }
}
