//! Convenient imports.
//!
//! ```rust
//! use consolegrid::prelude::*;
//! ```

pub use crate::column::{Column, GridRecord};
pub use crate::config::{GridConfig, GridOptions};
pub use crate::error::{GridError, Result};
pub use crate::grid::{ColumnGenerationMode, ConsoleGrid};
pub use crate::observe::ObservableList;
pub use crate::render::RenderedGrid;
pub use crate::sink::{MemorySink, OutputSink, TermSink};
pub use crate::style::{BorderStyle, DefaultStyle, GridStyle};
pub use consolegrid_macros::GridRecord;
