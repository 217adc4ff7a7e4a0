//! Pluggable grid styling.
//!
//! The renderer never draws borders or picks colors itself. It calls a
//! [`GridStyle`] at fixed hook points:
//!
//! | Hook | When |
//! |------|------|
//! | `render_header` | once, before the body |
//! | `begin_cell` / `emit_cell` | for every cell of every physical line |
//! | `end_cell` | after the last cell of a physical line |
//! | `render_footer` | once, after the body |
//! | `render_summary` | when the summary option is on |
//! | `render_extra_info` | when extra info text is pending |
//!
//! The renderer terminates each section with a line break, so hooks never
//! write a trailing newline themselves.
//!
//! [`DefaultStyle`] draws a boxed grid:
//!
//! ```text
//! ┌──────┬─────┐
//! │ Name │ Age │
//! ├──────┼─────┤
//! │  Al  │  30 │
//! │  Bo  │  7  │
//! └──────┴─────┘
//! ```

use console::Color;
use serde::Deserialize;

use crate::layout::PlannedColumn;
use crate::render::GridBuffer;

/// Border style for the default grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    /// No borders; columns are separated by spaces.
    None,
    /// ASCII borders: +, -, |
    Ascii,
    /// Light Unicode box-drawing characters: ┌, ─, ┐, │, └, ┘, ├, ┼, ┤, ┬, ┴
    #[default]
    Light,
    /// Heavy Unicode box-drawing characters: ┏, ━, ┓, ┃, ┗, ┛, ┣, ╋, ┫, ┳, ┻
    Heavy,
    /// Double-line Unicode box-drawing: ╔, ═, ╗, ║, ╚, ╝, ╠, ╬, ╣, ╦, ╩
    Double,
    /// Rounded corners with light lines: ╭, ─, ╮, │, ╰, ╯, ├, ┼, ┤, ┬, ┴
    Rounded,
}

impl BorderStyle {
    /// The box-drawing characters for this border style.
    pub fn glyphs(&self) -> BorderGlyphs {
        match self {
            BorderStyle::None => BorderGlyphs::blank(),
            BorderStyle::Ascii => BorderGlyphs {
                horizontal: '-',
                vertical: '|',
                top_left: '+',
                top_right: '+',
                bottom_left: '+',
                bottom_right: '+',
                left_t: '+',
                cross: '+',
                right_t: '+',
                top_t: '+',
                bottom_t: '+',
            },
            BorderStyle::Light => BorderGlyphs {
                horizontal: '─',
                vertical: '│',
                top_left: '┌',
                top_right: '┐',
                bottom_left: '└',
                bottom_right: '┘',
                left_t: '├',
                cross: '┼',
                right_t: '┤',
                top_t: '┬',
                bottom_t: '┴',
            },
            BorderStyle::Heavy => BorderGlyphs {
                horizontal: '━',
                vertical: '┃',
                top_left: '┏',
                top_right: '┓',
                bottom_left: '┗',
                bottom_right: '┛',
                left_t: '┣',
                cross: '╋',
                right_t: '┫',
                top_t: '┳',
                bottom_t: '┻',
            },
            BorderStyle::Double => BorderGlyphs {
                horizontal: '═',
                vertical: '║',
                top_left: '╔',
                top_right: '╗',
                bottom_left: '╚',
                bottom_right: '╝',
                left_t: '╠',
                cross: '╬',
                right_t: '╣',
                top_t: '╦',
                bottom_t: '╩',
            },
            BorderStyle::Rounded => BorderGlyphs {
                horizontal: '─',
                vertical: '│',
                top_left: '╭',
                top_right: '╮',
                bottom_left: '╰',
                bottom_right: '╯',
                left_t: '├',
                cross: '┼',
                right_t: '┤',
                top_t: '┬',
                bottom_t: '┴',
            },
        }
    }
}

/// Box-drawing characters for a border style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BorderGlyphs {
    pub horizontal: char,
    pub vertical: char,
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub left_t: char,
    pub cross: char,
    pub right_t: char,
    pub top_t: char,
    pub bottom_t: char,
}

impl BorderGlyphs {
    fn blank() -> Self {
        BorderGlyphs {
            horizontal: ' ',
            vertical: ' ',
            top_left: ' ',
            top_right: ' ',
            bottom_left: ' ',
            bottom_right: ' ',
            left_t: ' ',
            cross: ' ',
            right_t: ' ',
            top_t: ' ',
            bottom_t: ' ',
        }
    }
}

/// Row highlight colors. `None` leaves the terminal default in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub alternating_fg: Option<Color>,
    pub alternating_bg: Option<Color>,
    pub selected_fg: Option<Color>,
    pub selected_bg: Option<Color>,
    pub focused_fg: Option<Color>,
    pub focused_bg: Option<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            alternating_fg: None,
            alternating_bg: Some(Color::Color256(236)),
            selected_fg: Some(Color::Black),
            selected_bg: Some(Color::Cyan),
            focused_fg: Some(Color::Black),
            focused_bg: Some(Color::Yellow),
        }
    }
}

impl Palette {
    /// A palette that never colors anything.
    pub fn plain() -> Self {
        Palette {
            alternating_fg: None,
            alternating_bg: None,
            selected_fg: None,
            selected_bg: None,
            focused_fg: None,
            focused_bg: None,
        }
    }

    /// Foreground and background for a row. Focus wins over selection,
    /// selection wins over alternation.
    pub fn colors_for(&self, state: RowState) -> (Option<Color>, Option<Color>) {
        if state.focused {
            (self.focused_fg, self.focused_bg)
        } else if state.selected {
            (self.selected_fg, self.selected_bg)
        } else if state.record_index % 2 == 1 {
            (self.alternating_fg, self.alternating_bg)
        } else {
            (None, None)
        }
    }
}

/// Highlight state of the record a cell belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowState {
    /// Position of the record in the source list.
    pub record_index: usize,
    pub selected: bool,
    pub focused: bool,
}

/// The hooks a grid style implements.
pub trait GridStyle {
    /// Writes the header section and returns the number of lines written.
    fn render_header(&self, out: &mut GridBuffer, columns: &[PlannedColumn]) -> usize;

    /// Called before each cell. `index_width` is the digit count of the
    /// number of records.
    fn begin_cell(&self, out: &mut GridBuffer, cell_index: usize, index_width: usize, state: RowState);

    /// Writes one cell's text for the current physical line.
    fn emit_cell(&self, out: &mut GridBuffer, text: &str, cell_index: usize, state: RowState);

    /// Closes a physical line. `line_index` counts lines within the record.
    fn end_cell(&self, out: &mut GridBuffer, line_index: usize, state: RowState);

    fn render_footer(&self, out: &mut GridBuffer, columns: &[PlannedColumn]);

    fn render_summary(&self, out: &mut GridBuffer, count: usize);

    fn render_extra_info(&self, out: &mut GridBuffer, info: &str);

    fn glyphs(&self) -> BorderGlyphs;

    fn palette(&self) -> &Palette;
}

/// The boxed grid style used unless another one is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultStyle {
    border: BorderStyle,
    palette: Palette,
    padding: usize,
}

impl Default for DefaultStyle {
    fn default() -> Self {
        DefaultStyle {
            border: BorderStyle::Light,
            palette: Palette::default(),
            padding: 1,
        }
    }
}

impl DefaultStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain ASCII borders.
    pub fn ascii() -> Self {
        Self::default().border(BorderStyle::Ascii)
    }

    pub fn border(mut self, border: BorderStyle) -> Self {
        self.border = border;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Spaces on each side of a cell's text.
    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    fn horizontal_line(&self, columns: &[PlannedColumn], left: char, joint: char, right: char) -> String {
        let horizontal = self.border.glyphs().horizontal;
        let mut line = String::new();
        line.push(left);
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                line.push(joint);
            }
            line.extend(std::iter::repeat_n(
                horizontal,
                column.rendered_width + 2 * self.padding,
            ));
        }
        line.push(right);
        line
    }

    fn pad(&self) -> String {
        " ".repeat(self.padding)
    }
}

impl GridStyle for DefaultStyle {
    fn render_header(&self, out: &mut GridBuffer, columns: &[PlannedColumn]) -> usize {
        let glyphs = self.border.glyphs();
        let pad = self.pad();
        let header_rows = columns
            .iter()
            .map(|c| c.header.row_count())
            .max()
            .unwrap_or(1);

        let mut lines = Vec::with_capacity(header_rows + 2);
        if self.border != BorderStyle::None {
            lines.push(self.horizontal_line(
                columns,
                glyphs.top_left,
                glyphs.top_t,
                glyphs.top_right,
            ));
        }
        for row in 0..header_rows {
            let mut line = String::new();
            for column in columns {
                line.push(glyphs.vertical);
                line.push_str(&pad);
                line.push_str(&column.header.line(row));
                line.push_str(&pad);
            }
            line.push(glyphs.vertical);
            lines.push(line);
        }
        if self.border != BorderStyle::None {
            lines.push(self.horizontal_line(columns, glyphs.left_t, glyphs.cross, glyphs.right_t));
        }

        let count = lines.len();
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                out.newline();
            }
            out.push(line);
        }
        count
    }

    fn begin_cell(&self, out: &mut GridBuffer, _cell_index: usize, _index_width: usize, _state: RowState) {
        out.push(self.border.glyphs().vertical.to_string());
    }

    fn emit_cell(&self, out: &mut GridBuffer, text: &str, _cell_index: usize, state: RowState) {
        let pad = self.pad();
        let (fg, bg) = self.palette.colors_for(state);
        out.push_colored(format!("{pad}{text}{pad}"), fg, bg);
    }

    fn end_cell(&self, out: &mut GridBuffer, _line_index: usize, _state: RowState) {
        out.push(self.border.glyphs().vertical.to_string());
    }

    fn render_footer(&self, out: &mut GridBuffer, columns: &[PlannedColumn]) {
        if self.border == BorderStyle::None {
            return;
        }
        let glyphs = self.border.glyphs();
        out.push(self.horizontal_line(
            columns,
            glyphs.bottom_left,
            glyphs.bottom_t,
            glyphs.bottom_right,
        ));
    }

    fn render_summary(&self, out: &mut GridBuffer, count: usize) {
        out.push(format!("Total: {count}"));
    }

    fn render_extra_info(&self, out: &mut GridBuffer, info: &str) {
        for (i, line) in info.trim_end_matches('\n').lines().enumerate() {
            if i > 0 {
                out.newline();
            }
            out.push(line);
        }
    }

    fn glyphs(&self) -> BorderGlyphs {
        self.border.glyphs()
    }

    fn palette(&self) -> &Palette {
        &self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{plan, MeasuredColumn};

    fn columns() -> Vec<PlannedColumn> {
        let measured = vec![
            MeasuredColumn {
                name: "Name".into(),
                content_width: 4,
                auto_generated: true,
            },
            MeasuredColumn {
                name: "Age".into(),
                content_width: 3,
                auto_generated: true,
            },
        ];
        plan(&measured, 80, None).columns
    }

    #[test]
    fn header_with_light_border() {
        let mut out = GridBuffer::new();
        let written = DefaultStyle::new().render_header(&mut out, &columns());
        let lines = out.finish().lines();
        assert_eq!(written, 3);
        assert_eq!(
            lines,
            vec!["┌──────┬─────┐", "│ Name │ Age │", "├──────┼─────┤"]
        );
    }

    #[test]
    fn header_with_ascii_border() {
        let mut out = GridBuffer::new();
        DefaultStyle::ascii().render_header(&mut out, &columns());
        let lines = out.finish().lines();
        assert_eq!(lines[0], "+------+-----+");
        assert_eq!(lines[1], "| Name | Age |");
    }

    #[test]
    fn header_without_border_has_no_rules() {
        let mut out = GridBuffer::new();
        let written = DefaultStyle::new()
            .border(BorderStyle::None)
            .render_header(&mut out, &columns());
        assert_eq!(written, 1);
        assert_eq!(out.finish().lines(), vec!["  Name   Age  "]);
    }

    #[test]
    fn footer_closes_the_box() {
        let mut out = GridBuffer::new();
        DefaultStyle::new()
            .border(BorderStyle::Rounded)
            .render_footer(&mut out, &columns());
        assert_eq!(out.finish().lines(), vec!["╰──────┴─────╯"]);
    }

    #[test]
    fn cells_are_padded_and_bordered() {
        let style = DefaultStyle::new().border(BorderStyle::Heavy);
        let state = RowState::default();
        let mut out = GridBuffer::new();
        style.begin_cell(&mut out, 0, 1, state);
        style.emit_cell(&mut out, " Al ", 0, state);
        style.end_cell(&mut out, 0, state);
        assert_eq!(out.finish().lines(), vec!["┃  Al  ┃"]);
    }

    #[test]
    fn extra_info_keeps_lines() {
        let mut out = GridBuffer::new();
        DefaultStyle::new().render_extra_info(&mut out, "first\nsecond\n");
        assert_eq!(out.finish().lines(), vec!["first", "second"]);
    }

    #[test]
    fn palette_priority() {
        let palette = Palette::default();
        let focused = RowState {
            record_index: 1,
            selected: true,
            focused: true,
        };
        assert_eq!(palette.colors_for(focused), (Some(Color::Black), Some(Color::Yellow)));

        let selected = RowState {
            focused: false,
            ..focused
        };
        assert_eq!(palette.colors_for(selected), (Some(Color::Black), Some(Color::Cyan)));

        let odd = RowState {
            record_index: 3,
            ..RowState::default()
        };
        assert_eq!(palette.colors_for(odd), (None, Some(Color::Color256(236))));
        assert_eq!(palette.colors_for(RowState::default()), (None, None));
    }

    #[test]
    fn border_style_names_deserialize() {
        let style: BorderStyle = serde_yaml::from_str("double").unwrap();
        assert_eq!(style, BorderStyle::Double);
        assert!(serde_yaml::from_str::<BorderStyle>("fancy").is_err());
        assert_eq!(BorderStyle::default(), BorderStyle::Light);
    }
}
