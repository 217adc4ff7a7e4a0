//! One render pass: extraction, planning, and emission through a style.
//!
//! A [`RenderSession`] is built for every pass from the grid's columns and a
//! snapshot of its records. It owns the planned layout and the aligned text
//! of every cell, so nothing observed from the records can change while the
//! style hooks run. Rendering walks the records in order and, for each record,
//! emits as many physical lines as its tallest cell needs:
//!
//! ```text
//! header            render_header
//! for each record
//!   for each line   begin_cell/emit_cell per cell, end_cell
//! footer            render_footer
//! summary           render_summary (optional)
//! extra info        render_extra_info (when pending)
//! ```
//!
//! Output goes into a [`GridBuffer`] and is only handed to a sink once the
//! whole pass has succeeded.

use std::borrow::Borrow;
use std::fmt;

use console::{Color, Style};
use tracing::trace;

use crate::align::{align, display_width, AlignedText};
use crate::column::{content_widths, extract_cells, Column};
use crate::config::GridOptions;
use crate::error::Result;
use crate::layout::{plan, ColumnSource, LayoutPlan, MeasuredColumn};
use crate::style::{GridStyle, RowState};

/// A run of text with optional colors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Segment {
    fn styled(&self) -> String {
        if self.fg.is_none() && self.bg.is_none() {
            return self.text.clone();
        }
        let mut style = Style::new().force_styling(true);
        if let Some(fg) = self.fg {
            style = style.fg(fg);
        }
        if let Some(bg) = self.bg {
            style = style.bg(bg);
        }
        style.apply_to(&self.text).to_string()
    }
}

/// Line-oriented output buffer the style hooks write into.
#[derive(Clone, Debug, Default)]
pub struct GridBuffer {
    lines: Vec<Vec<Segment>>,
    current: Vec<Segment>,
}

impl GridBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends uncolored text to the current line.
    pub fn push(&mut self, text: impl Into<String>) {
        self.push_colored(text, None, None);
    }

    /// Appends text with optional foreground and background colors.
    pub fn push_colored(&mut self, text: impl Into<String>, fg: Option<Color>, bg: Option<Color>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.current.push(Segment { text, fg, bg });
    }

    /// Ends the current line.
    pub fn newline(&mut self) {
        self.lines.push(std::mem::take(&mut self.current));
    }

    /// Number of completed lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn finish(mut self) -> RenderedGrid {
        if !self.current.is_empty() {
            self.newline();
        }
        RenderedGrid { lines: self.lines }
    }
}

/// The output of a successful render pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedGrid {
    lines: Vec<Vec<Segment>>,
}

impl RenderedGrid {
    /// Plain text lines, without color escapes.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| line.iter().map(|s| s.text.as_str()).collect())
            .collect()
    }

    /// Lines with ANSI color escapes applied.
    pub fn styled_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| line.iter().map(Segment::styled).collect())
            .collect()
    }

    /// The colored segments of every line.
    pub fn segments(&self) -> &[Vec<Segment>] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Display width of the widest line.
    pub fn width(&self) -> usize {
        self.lines()
            .iter()
            .map(|line| display_width(line))
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for RenderedGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Selection and focus used to compute each record's [`RowState`].
pub struct Highlight<'a, T> {
    pub selection: &'a [T],
    pub focused: Option<&'a T>,
}

impl<T> Default for Highlight<'_, T> {
    fn default() -> Self {
        Highlight {
            selection: &[],
            focused: None,
        }
    }
}

struct SessionRow {
    cells: Vec<AlignedText>,
    state: RowState,
}

impl SessionRow {
    fn line_count(&self) -> usize {
        self.cells.iter().map(AlignedText::row_count).max().unwrap_or(1)
    }
}

/// The prepared state of one render pass.
pub struct RenderSession {
    plan: LayoutPlan,
    rows: Vec<SessionRow>,
    index_width: usize,
    show_summary: bool,
}

impl RenderSession {
    /// Extracts, measures, and aligns every cell.
    ///
    /// Returns `Ok(None)` when there are no records: an empty grid renders
    /// nothing at all.
    pub fn prepare<T, R>(
        columns: &[Column<T>],
        records: &[R],
        highlight: &Highlight<'_, T>,
        options: &GridOptions,
        available_width: usize,
    ) -> Result<Option<Self>>
    where
        T: PartialEq,
        R: Borrow<T>,
    {
        if records.is_empty() {
            trace!("no records, skipping render");
            return Ok(None);
        }

        let cells = extract_cells(columns, records, &options.null_text)?;
        let names: Vec<&str> = columns.iter().map(Column::name).collect();
        let widths = content_widths(&names, &cells);
        let measured: Vec<MeasuredColumn> = columns
            .iter()
            .zip(widths)
            .map(|(column, content_width)| MeasuredColumn {
                name: column.name().to_string(),
                content_width,
                auto_generated: column.is_auto_generated(),
            })
            .collect();

        let row_numbers = options.show_row_numbers.then_some(records.len());
        let plan = plan(&measured, available_width, row_numbers);

        let rows = records
            .iter()
            .zip(cells)
            .enumerate()
            .map(|(index, (record, values))| {
                let record: &T = <R as Borrow<T>>::borrow(record);
                let cells = plan
                    .columns
                    .iter()
                    .map(|column| match column.source {
                        ColumnSource::RowNumber => {
                            align(&index.to_string(), column.rendered_width)
                        }
                        ColumnSource::Field(i) => align(&values[i], column.rendered_width),
                    })
                    .collect();
                SessionRow {
                    cells,
                    state: RowState {
                        record_index: index,
                        selected: highlight.selection.contains(record),
                        focused: highlight.focused == Some(record),
                    },
                }
            })
            .collect();

        Ok(Some(RenderSession {
            plan,
            rows,
            index_width: records.len().to_string().len(),
            show_summary: options.show_summary,
        }))
    }

    pub fn plan(&self) -> &LayoutPlan {
        &self.plan
    }

    pub fn record_count(&self) -> usize {
        self.rows.len()
    }

    /// Runs the style hooks over the prepared cells.
    pub fn render(&self, style: &dyn GridStyle, extra_info: &str) -> RenderedGrid {
        let mut out = GridBuffer::new();

        style.render_header(&mut out, &self.plan.columns);
        out.newline();

        for row in &self.rows {
            for line in 0..row.line_count() {
                for (cell_index, cell) in row.cells.iter().enumerate() {
                    style.begin_cell(&mut out, cell_index, self.index_width, row.state);
                    style.emit_cell(&mut out, &cell.line(line), cell_index, row.state);
                }
                style.end_cell(&mut out, line, row.state);
                out.newline();
            }
        }

        style.render_footer(&mut out, &self.plan.columns);
        out.newline();

        if self.show_summary {
            style.render_summary(&mut out, self.rows.len());
            out.newline();
        }

        if !extra_info.is_empty() {
            style.render_extra_info(&mut out, extra_info);
            out.newline();
        }

        out.finish()
    }
}

/// Renders `records` into a buffer without touching any sink.
pub fn render_records<T, R>(
    columns: &[Column<T>],
    records: &[R],
    highlight: &Highlight<'_, T>,
    options: &GridOptions,
    style: &dyn GridStyle,
    available_width: usize,
) -> Result<Option<RenderedGrid>>
where
    T: PartialEq,
    R: Borrow<T>,
{
    let session = RenderSession::prepare(columns, records, highlight, options, available_width)?;
    Ok(session.map(|session| session.render(style, "")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::DefaultStyle;

    #[derive(PartialEq)]
    struct Person {
        name: &'static str,
        age: u32,
    }

    fn columns() -> Vec<Column<Person>> {
        vec![
            Column::display("Name", |p: &Person| p.name),
            Column::display("Age", |p: &Person| p.age),
        ]
    }

    fn people() -> Vec<Person> {
        vec![
            Person { name: "Al", age: 30 },
            Person { name: "Bo", age: 7 },
        ]
    }

    fn plain_options() -> GridOptions {
        GridOptions {
            show_row_numbers: false,
            ..GridOptions::default()
        }
    }

    #[test]
    fn renders_boxed_grid() {
        let grid = render_records(
            &columns(),
            &people(),
            &Highlight::default(),
            &plain_options(),
            &DefaultStyle::new(),
            80,
        )
        .unwrap()
        .unwrap();

        assert_eq!(
            grid.lines(),
            vec![
                "┌──────┬─────┐",
                "│ Name │ Age │",
                "├──────┼─────┤",
                "│  Al  │  30 │",
                "│  Bo  │  7  │",
                "└──────┴─────┘",
            ]
        );
        assert_eq!(grid.width(), 14);
    }

    #[test]
    fn empty_records_render_nothing() {
        let records: Vec<Person> = Vec::new();
        let grid = render_records(
            &columns(),
            &records,
            &Highlight::default(),
            &plain_options(),
            &DefaultStyle::new(),
            80,
        )
        .unwrap();
        assert!(grid.is_none());
    }

    #[test]
    fn summary_and_extra_info_follow_footer() {
        let options = GridOptions {
            show_summary: true,
            ..plain_options()
        };
        let session = RenderSession::prepare(
            &columns(),
            &people(),
            &Highlight::default(),
            &options,
            80,
        )
        .unwrap()
        .unwrap();
        let lines = session.render(&DefaultStyle::new(), "note").lines();
        assert_eq!(lines[5], "└──────┴─────┘");
        assert_eq!(lines[6], "Total: 2");
        assert_eq!(lines[7], "note");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn row_numbers_count_from_zero() {
        let options = GridOptions {
            show_row_numbers: true,
            ..GridOptions::default()
        };
        let grid = render_records(
            &columns(),
            &people(),
            &Highlight::default(),
            &options,
            &DefaultStyle::new(),
            80,
        )
        .unwrap()
        .unwrap();
        let lines = grid.lines();
        assert_eq!(lines[1], "│ Nr │ Name │ Age │");
        assert_eq!(lines[3], "│  0 │  Al  │  30 │");
        assert_eq!(lines[4], "│  1 │  Bo  │  7  │");
    }

    #[test]
    fn tall_cells_pad_shorter_neighbours() {
        let columns = vec![
            Column::display("A", |s: &String| s.clone()),
            Column::display("B", |_: &String| "x"),
        ];
        let records = vec!["abcdefghij".to_string()];
        // natural total 11 exceeds 5, so both columns clamp to 1
        let grid = render_records(
            &columns,
            &records,
            &Highlight::default(),
            &plain_options(),
            &DefaultStyle::new(),
            5,
        )
        .unwrap()
        .unwrap();
        let lines = grid.lines();
        // top, header, separator, 10 body lines, bottom
        assert_eq!(lines.len(), 14);
        assert_eq!(lines[3], "│ a │ x │");
        assert_eq!(lines[4], "│ b │   │");
    }

    #[test]
    fn wide_glyphs_in_clamped_cells_keep_borders_aligned() {
        let columns = vec![
            Column::display("A", |s: &String| s.clone()),
            Column::display("B", |_: &String| "x"),
        ];
        let records = vec!["日本語".to_string()];
        let grid = render_records(
            &columns,
            &records,
            &Highlight::default(),
            &plain_options(),
            &DefaultStyle::new(),
            5,
        )
        .unwrap()
        .unwrap();
        let lines = grid.lines();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "┌───┬───┐");
        assert_eq!(lines[3], "│ ? │ x │");
        assert_eq!(lines[5], "│ ? │   │");
        assert!(lines.iter().all(|l| display_width(l) == 9));
    }

    #[test]
    fn control_characters_in_headers_are_blanked() {
        let columns = vec![Column::display("A\tB", |s: &String| s.clone())];
        let records = vec!["x".to_string()];
        let grid = render_records(
            &columns,
            &records,
            &Highlight::default(),
            &plain_options(),
            &DefaultStyle::new(),
            80,
        )
        .unwrap()
        .unwrap();
        let lines = grid.lines();
        assert_eq!(lines[0], "┌─────┐");
        assert_eq!(lines[1], "│ A B │");
        assert_eq!(lines[3], "│  x  │");
    }

    #[test]
    fn highlight_colors_selected_and_focused_rows() {
        let people = people();
        let selection = [Person { name: "Al", age: 30 }];
        let focused = Person { name: "Bo", age: 7 };
        let highlight = Highlight {
            selection: &selection,
            focused: Some(&focused),
        };
        let grid = render_records(
            &columns(),
            &people,
            &highlight,
            &plain_options(),
            &DefaultStyle::new(),
            80,
        )
        .unwrap()
        .unwrap();

        let first = &grid.segments()[3];
        assert_eq!(first[1].bg, Some(Color::Cyan));
        let second = &grid.segments()[4];
        assert_eq!(second[1].bg, Some(Color::Yellow));
        assert!(grid.styled_lines()[3].contains("\u{1b}["));
    }

    #[test]
    fn buffer_finish_keeps_open_line() {
        let mut out = GridBuffer::new();
        out.push("a");
        out.newline();
        out.push("b");
        assert_eq!(out.line_count(), 1);
        assert_eq!(out.finish().lines(), vec!["a", "b"]);
    }
}
