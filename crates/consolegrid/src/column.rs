//! Column schema: display names and value extractors.
//!
//! A grid is described by an ordered list of [`Column`]s. Each column pairs a
//! display name with an extractor that turns a record into the text shown in
//! its cell (`None` renders as the grid's null placeholder).
//!
//! Column lists are usually produced by `#[derive(GridRecord)]`, which emits
//! one column per named field in declaration order. Scalar types (numbers,
//! `bool`, `char`, `String`) implement [`GridRecord`] with a single `Value`
//! column. Columns can also be built by hand:
//!
//! ```rust
//! use consolegrid::column::Column;
//!
//! struct User { name: String, email: Option<String> }
//!
//! let columns = vec![
//!     Column::display("Name", |u: &User| u.name.clone()),
//!     Column::new("Email", |u: &User| u.email.clone()),
//! ];
//! assert_eq!(columns[1].name(), "Email");
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::rc::Rc;

use crate::align::display_width;
use crate::error::{BoxError, GridError, Result};

/// Shared, fallible value extractor.
pub type Extractor<T> = Rc<dyn Fn(&T) -> std::result::Result<Option<String>, BoxError>>;

/// One column of a grid.
pub struct Column<T> {
    name: String,
    extractor: Extractor<T>,
    auto_generated: bool,
}

impl<T> Column<T> {
    /// Creates a column whose extractor may return `None` for absent values.
    pub fn new<F>(name: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&T) -> Option<String> + 'static,
    {
        Column {
            name: sanitize(name.into()),
            extractor: Rc::new(move |record| Ok(extract(record))),
            auto_generated: false,
        }
    }

    /// Creates a column from any `Display` value.
    pub fn display<V, F>(name: impl Into<String>, extract: F) -> Self
    where
        V: fmt::Display,
        F: Fn(&T) -> V + 'static,
    {
        Column::new(name, move |record| Some(extract(record).to_string()))
    }

    /// Creates a column whose extractor can fail.
    ///
    /// An extraction error aborts the render pass and is returned to the
    /// caller as [`GridError::Extract`].
    pub fn try_new<F>(name: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&T) -> std::result::Result<Option<String>, BoxError> + 'static,
    {
        Column {
            name: sanitize(name.into()),
            extractor: Rc::new(extract),
            auto_generated: false,
        }
    }

    /// Marks the column as generated from the record's schema.
    pub fn auto_generated(mut self, auto_generated: bool) -> Self {
        self.auto_generated = auto_generated;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_auto_generated(&self) -> bool {
        self.auto_generated
    }

    /// Runs the extractor for one record.
    pub fn extract(&self, record: &T) -> Result<Option<String>> {
        (self.extractor)(record).map_err(|source| GridError::Extract {
            column: self.name.clone(),
            source,
        })
    }
}

impl<T: fmt::Display + 'static> Column<T> {
    /// The identity column used for scalar records.
    pub fn value() -> Self {
        Column::display("Value", |record: &T| record.to_string()).auto_generated(true)
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Column {
            name: self.name.clone(),
            extractor: Rc::clone(&self.extractor),
            auto_generated: self.auto_generated,
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("auto_generated", &self.auto_generated)
            .finish_non_exhaustive()
    }
}

/// Types that can describe their own grid columns.
///
/// Implemented by `#[derive(GridRecord)]` for structs and by hand for
/// scalar types.
///
/// # Example
///
/// ```rust
/// use consolegrid::GridRecord;
///
/// #[derive(GridRecord)]
/// struct Task {
///     id: u32,
///     #[grid(rename = "Title")]
///     title: String,
///     #[grid(skip)]
///     internal: bool,
/// }
///
/// let columns = Task::grid_columns(true);
/// assert_eq!(columns[0].name(), "id <u32>");
/// assert_eq!(columns[1].name(), "Title <String>");
/// assert_eq!(columns.len(), 2);
/// ```
pub trait GridRecord: Sized {
    /// Returns the columns for this type, optionally suffixing each name
    /// with the field's type.
    fn grid_columns(show_type_names: bool) -> Vec<Column<Self>>;
}

macro_rules! scalar_grid_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl GridRecord for $ty {
                fn grid_columns(_show_type_names: bool) -> Vec<Column<Self>> {
                    vec![Column::value()]
                }
            }
        )*
    };
}

scalar_grid_record!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String,
);

/// Cell conversion for `Display` fields, used by the derive macro.
pub trait CellDisplay {
    fn to_grid_cell(&self) -> Option<String>;
}

impl<T: fmt::Display> CellDisplay for T {
    fn to_grid_cell(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// Cell conversion for `Option` fields, used by the derive macro.
///
/// `None` becomes an absent value and renders as the null placeholder.
pub trait CellOption {
    fn to_grid_cell(&self) -> Option<String>;
}

impl<T: fmt::Display> CellOption for Option<T> {
    fn to_grid_cell(&self) -> Option<String> {
        self.as_ref().map(|v| v.to_string())
    }
}

/// Extracts the display text of every cell, substituting `null_text` for
/// absent values.
///
/// Control characters are replaced by spaces so a cell never breaks the
/// line structure of the grid. Returns one row per record.
pub fn extract_cells<T, R: Borrow<T>>(
    columns: &[Column<T>],
    records: &[R],
    null_text: &str,
) -> Result<Vec<Vec<String>>> {
    records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| -> Result<String> {
                    let value = column
                        .extract(<R as Borrow<T>>::borrow(record))?
                        .unwrap_or_else(|| null_text.to_string());
                    Ok(sanitize(value))
                })
                .collect::<Result<Vec<String>>>()
        })
        .collect()
}

/// Maximum display width per column across the header names and the cells.
pub fn content_widths<S: AsRef<str>>(names: &[S], cells: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = names.iter().map(|n| display_width(n.as_ref())).collect();
    for row in cells {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(display_width(cell));
            }
        }
    }
    widths
}

/// Computes the content width of each column for the given records.
///
/// With no records only the header names are measured.
pub fn measure<T, R: Borrow<T>>(
    columns: &[Column<T>],
    records: &[R],
    null_text: &str,
) -> Result<Vec<usize>> {
    let cells = extract_cells(columns, records, null_text)?;
    let names: Vec<&str> = columns.iter().map(|c| c.name()).collect();
    Ok(content_widths(&names, &cells))
}

fn sanitize(value: String) -> String {
    if value.chars().any(char::is_control) {
        value
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect()
    } else {
        value
    }
}
