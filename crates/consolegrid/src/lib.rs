//! # ConsoleGrid - aligned, bordered text grids for the terminal
//!
//! ConsoleGrid renders a list of records as a table of centered cells with
//! box-drawing borders. Columns come from the record type, values wider than
//! the terminal wrap onto extra lines inside their cell, and the grid can
//! re-render itself whenever the list it shows changes.
//!
//! ## Quick Start
//!
//! ```rust
//! use consolegrid::prelude::*;
//!
//! #[derive(GridRecord, PartialEq)]
//! struct Task {
//!     id: u32,
//!     title: String,
//!     done: Option<bool>,
//! }
//!
//! let sink = MemorySink::new(120);
//! let rendered = ConsoleGrid::render_list_to(
//!     vec![
//!         Task { id: 1, title: "Write docs".into(), done: Some(true) },
//!         Task { id: 2, title: "Ship".into(), done: None },
//!     ],
//!     sink.clone(),
//! )
//! .unwrap()
//! .unwrap();
//!
//! assert_eq!(rendered.line_count(), 6);
//! assert!(rendered.lines()[4].contains("{NULL}"));
//! ```
//!
//! ## Parts
//!
//! - [`align`]: centering and wrapping of a single value into a cell.
//! - [`column`]: column names and extractors, and the [`GridRecord`] schema.
//! - [`layout`]: per-pass column widths, clamped to the available width.
//! - [`render`]: the render pass and its output buffer.
//! - [`style`]: the [`GridStyle`] hooks and the boxed [`DefaultStyle`].
//! - [`sink`]: output surfaces (stdout, memory).
//! - [`observe`]: the observable record list.
//! - [`grid`]: [`ConsoleGrid`], tying all of the above together.
//! - [`config`]: options and YAML configuration.
//!
//! ## Logging
//!
//! Layout decisions and render passes are reported through `tracing`. The
//! crate never installs a subscriber.

// Lets the derive macro's `::consolegrid::` paths resolve inside this crate.
extern crate self as consolegrid;

pub mod align;
pub mod color;
pub mod column;
pub mod config;
mod error;
pub mod grid;
pub mod layout;
pub mod observe;
pub mod prelude;
pub mod render;
pub mod sink;
pub mod style;

// Error type
pub use error::{BoxError, GridError, Result};

// Schema
pub use column::{Column, GridRecord};
pub use consolegrid_macros::GridRecord;

// Grid
pub use grid::{ColumnGenerationMode, ConsoleGrid, GridHandle};

// Options
pub use config::{GridConfig, GridOptions, DEFAULT_NULL_TEXT};

// Rendering
pub use align::{align, AlignedText};
pub use render::{GridBuffer, RenderedGrid};
pub use style::{BorderStyle, DefaultStyle, GridStyle, Palette, RowState};

// Collaborators
pub use observe::{ListChange, ObservableList, Subscription};
pub use sink::{MemorySink, OutputSink, TermSink};
