//! Column width planning.
//!
//! [`plan`] turns measured columns into rendered widths for one render pass:
//!
//! 1. Optionally prepend a synthetic `Nr` row-number column.
//! 2. Sum the natural (content) widths.
//! 3. If the sum exceeds the available width, every column wider than
//!    `available / columns - 30` is clamped to that budget (never below 1).
//!    Clamped values wrap onto extra rows at render time.
//! 4. Center each header in its column.
//!
//! Column order is preserved; the row-number column is always first.

use tracing::debug;

use crate::align::{align, display_width, AlignedText};

/// Name of the synthetic row-number column.
pub const ROW_NUMBER_COLUMN: &str = "Nr";

/// Safety margin subtracted from each column's share when clamping.
pub const CLAMP_MARGIN: usize = 30;

/// Where a planned column takes its values from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnSource {
    /// The column at this index of the grid's column list.
    Field(usize),
    /// The running 0-based record counter.
    RowNumber,
}

/// A column's name and natural width, as measured from the current records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeasuredColumn {
    pub name: String,
    pub content_width: usize,
    pub auto_generated: bool,
}

/// A column with its final width for this render pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedColumn {
    pub name: String,
    pub source: ColumnSource,
    pub auto_generated: bool,
    /// Natural width of the widest value or header.
    pub content_width: usize,
    /// Width assigned by the planner. Always at least 1.
    pub rendered_width: usize,
    /// The header name centered (and wrapped if needed) in `rendered_width`.
    pub header: AlignedText,
}

/// Result of planning a render pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutPlan {
    pub columns: Vec<PlannedColumn>,
    /// Sum of all rendered widths, without borders or padding.
    pub total_width: usize,
    /// Whether the width budget had to be applied.
    pub clamped: bool,
}

impl LayoutPlan {
    pub fn widths(&self) -> Vec<usize> {
        self.columns.iter().map(|c| c.rendered_width).collect()
    }

    /// Number of lines the tallest header occupies.
    pub fn header_rows(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.header.row_count())
            .max()
            .unwrap_or(0)
    }
}

/// Per-column width budget used when the natural widths do not fit.
pub fn clamp_budget(available_width: usize, column_count: usize) -> usize {
    if column_count == 0 {
        return available_width.max(1);
    }
    (available_width / column_count)
        .saturating_sub(CLAMP_MARGIN)
        .max(1)
}

/// Plans rendered widths for `measured` within `available_width`.
///
/// `row_numbers` carries the record count when a row-number column is
/// wanted. It is skipped if a column named `Nr` already exists.
pub fn plan(
    measured: &[MeasuredColumn],
    available_width: usize,
    row_numbers: Option<usize>,
) -> LayoutPlan {
    let mut columns: Vec<(ColumnSource, &str, usize, bool)> =
        Vec::with_capacity(measured.len() + 1);

    if let Some(count) = row_numbers {
        if !measured.iter().any(|c| c.name == ROW_NUMBER_COLUMN) {
            let digits = count.to_string().len();
            let width = digits.max(display_width(ROW_NUMBER_COLUMN));
            columns.push((ColumnSource::RowNumber, ROW_NUMBER_COLUMN, width, true));
        }
    }

    columns.extend(measured.iter().enumerate().map(|(i, c)| {
        (
            ColumnSource::Field(i),
            c.name.as_str(),
            c.content_width,
            c.auto_generated,
        )
    }));

    let natural_total: usize = columns.iter().map(|(_, _, width, _)| width).sum();
    let clamped = natural_total > available_width;
    let budget = clamp_budget(available_width, columns.len());

    if clamped {
        debug!(
            natural_total,
            available_width,
            budget,
            "column widths exceed available width, clamping"
        );
    }

    let planned: Vec<PlannedColumn> = columns
        .into_iter()
        .map(|(source, name, content_width, auto_generated)| {
            let rendered_width = if clamped && content_width > budget {
                budget
            } else {
                content_width.max(1)
            };
            PlannedColumn {
                name: name.to_string(),
                source,
                auto_generated,
                content_width,
                rendered_width,
                header: align(name, rendered_width),
            }
        })
        .collect();

    let total_width = planned.iter().map(|c| c.rendered_width).sum();

    LayoutPlan {
        columns: planned,
        total_width,
        clamped,
    }
}
