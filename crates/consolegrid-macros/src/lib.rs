//! Derive macro for consolegrid column schemas.
//!
//! - [`GridRecord`] - one grid column per named struct field
//!
//! The generated code refers to `::consolegrid`, so the derive is meant to be
//! used through the `consolegrid` crate's re-export.

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `consolegrid::GridRecord` for a struct with named fields.
///
/// Each field becomes a column, in declaration order. The column is named
/// after the field, and when type names are requested the field's type is
/// appended as `name <Type>`.
///
/// # Field Attributes
///
/// | Attribute | Effect |
/// |-----------|--------|
/// | `#[grid(rename = "...")]` | Use a different column name |
/// | `#[grid(skip)]` | Leave the field out of the grid |
///
/// Fields must implement `Display`. `Option<T>` fields render `None` as the
/// grid's null placeholder.
///
/// # Example
///
/// ```ignore
/// use consolegrid::GridRecord;
///
/// #[derive(GridRecord)]
/// struct Host {
///     #[grid(rename = "Host name")]
///     name: String,
///     port: u16,
///     last_seen: Option<String>,
///     #[grid(skip)]
///     secret: String,
/// }
///
/// let columns = Host::grid_columns(false);
/// assert_eq!(columns[0].name(), "Host name");
/// ```
#[proc_macro_derive(GridRecord, attributes(grid))]
pub fn grid_record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::grid_record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
