//! Centering and wrapping of a single value into a fixed-width cell.
//!
//! [`align`] is the only layout primitive the renderer needs per cell: it
//! centers a value inside `cell_width` display columns and, when the value
//! does not fit, stacks it into as many rows of `cell_width` as required.
//!
//! Widths are display widths (`unicode-width`), so CJK glyphs count as two
//! columns. Padding is split evenly; an odd leftover space goes on the left.
//!
//! ```rust
//! use consolegrid::align::align;
//!
//! assert_eq!(align("Hi", 6).text(), "  Hi  ");
//! assert_eq!(align("Hi", 5).text(), "  Hi ");
//!
//! let wrapped = align("abcdefghijklmnopqrst", 5);
//! assert_eq!(wrapped.row_count(), 4);
//! assert_eq!(wrapped.line(1), "fghij");
//! ```

use std::borrow::Cow;

use unicode_width::UnicodeWidthChar;

/// A value centered (and possibly wrapped) into a fixed-width cell.
///
/// The text is kept as a list of rows, each exactly `cell_width` display
/// columns wide. Concatenating the rows gives the padded text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlignedText {
    lines: Vec<String>,
    cell_width: usize,
    unused_padding: usize,
}

impl AlignedText {
    /// The padded text with all rows concatenated.
    pub fn text(&self) -> String {
        self.lines.concat()
    }

    /// The individual rows of the cell.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of stacked rows the value occupies.
    pub fn row_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of columns the value spans. Always 1.
    pub fn column_span(&self) -> usize {
        1
    }

    /// Width of each row in display columns.
    pub fn cell_width(&self) -> usize {
        self.cell_width
    }

    /// Total number of padding spaces added around the value.
    pub fn unused_padding(&self) -> usize {
        self.unused_padding
    }

    /// Returns row `index`, or a blank row of `cell_width` if the value has
    /// fewer rows than that.
    pub fn line(&self, index: usize) -> Cow<'_, str> {
        match self.lines.get(index) {
            Some(line) => Cow::Borrowed(line.as_str()),
            None => Cow::Owned(" ".repeat(self.cell_width)),
        }
    }
}

/// Centers `source` in `cell_width` columns, wrapping onto more rows when it
/// is wider than the cell.
///
/// A value of width `w` occupies `ceil(w / cell_width)` rows (at least one)
/// and is centered within the combined width of those rows before being cut
/// into row-sized pieces. A `cell_width` of zero yields a single empty row.
/// Glyphs wider than the cell are shown as [`OVERSIZED_GLYPH`].
pub fn align(source: &str, cell_width: usize) -> AlignedText {
    if cell_width == 0 {
        return AlignedText {
            lines: vec![String::new()],
            cell_width: 0,
            unused_padding: 0,
        };
    }

    let source = fit_glyphs(source, cell_width);
    let source: &str = &source;
    let width = display_width(source);
    let rows = width.div_ceil(cell_width).max(1);
    let padding = rows * cell_width - width;
    let left = padding / 2 + padding % 2;
    let right = padding / 2;

    let mut padded = String::with_capacity(source.len() + padding);
    padded.extend(std::iter::repeat_n(' ', left));
    padded.push_str(source);
    padded.extend(std::iter::repeat_n(' ', right));

    AlignedText {
        lines: split_to_width(&padded, cell_width),
        cell_width,
        unused_padding: padding,
    }
}

/// Stands in for a glyph wider than the whole cell.
pub const OVERSIZED_GLYPH: char = '?';

/// Replaces glyphs wider than `cell_width` with [`OVERSIZED_GLYPH`] so every
/// row keeps the cell's width.
fn fit_glyphs(source: &str, cell_width: usize) -> Cow<'_, str> {
    let oversized = |c: char| c.width().unwrap_or(0) > cell_width;
    if !source.chars().any(oversized) {
        return Cow::Borrowed(source);
    }
    Cow::Owned(
        source
            .chars()
            .map(|c| if oversized(c) { OVERSIZED_GLYPH } else { c })
            .collect(),
    )
}

/// Display width of a string, counting control characters as zero.
pub fn display_width(s: &str) -> usize {
    s.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Cuts `text` into consecutive pieces of exactly `width` display columns.
///
/// A wide glyph that would straddle a boundary starts the next piece; the
/// short piece is padded with spaces.
fn split_to_width(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for c in text.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > width && current_width > 0 {
            current.extend(std::iter::repeat_n(' ', width.saturating_sub(current_width)));
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(c);
        current_width += char_width;
    }

    if current_width > 0 || lines.is_empty() {
        if current_width < width {
            current.extend(std::iter::repeat_n(' ', width - current_width));
        }
        lines.push(current);
    }

    lines
}
