//! The grid: columns, records, selection, focus, and the render entry points.
//!
//! A [`ConsoleGrid`] renders the records of an [`ObservableList`] through a
//! [`GridStyle`] into an [`OutputSink`]. With `observe` on (the default) it
//! subscribes to the list once and re-renders after every change.
//!
//! ```rust
//! use consolegrid::prelude::*;
//!
//! #[derive(GridRecord, PartialEq)]
//! struct Person {
//!     #[grid(rename = "Name")]
//!     name: String,
//!     #[grid(rename = "Age")]
//!     age: u32,
//! }
//!
//! let sink = MemorySink::new(80);
//! let mut grid: ConsoleGrid<Person> = ConsoleGrid::new();
//! grid.update_options(|o| o.show_type_names = false);
//! grid.regenerate_columns();
//! grid.set_sink(Box::new(sink.clone()));
//! grid.set_items(vec![
//!     Person { name: "Al".into(), age: 30 },
//!     Person { name: "Bo".into(), age: 7 },
//! ]);
//!
//! grid.render().unwrap();
//! assert_eq!(sink.last_write().unwrap()[1], "│ Name │ Age │");
//! ```
//!
//! Rendering is single-threaded and guarded against re-entry: a render
//! started while another is running fails with [`GridError::Reentrant`],
//! while a list change that arrives mid-render is queued and rendered once
//! the running pass returns. Only the latest queued snapshot is rendered.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::column::{Column, GridRecord};
use crate::config::{GridConfig, GridOptions};
use crate::error::{GridError, Result};
use crate::observe::{ObservableList, Subscription};
use crate::render::{Highlight, RenderSession, RenderedGrid};
use crate::sink::{OutputSink, TermSink};
use crate::style::{DefaultStyle, GridStyle};

/// How a grid obtains its initial columns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColumnGenerationMode {
    /// Generate columns from the record type's [`GridRecord`] schema.
    #[default]
    AutoGenerate,
    /// Start without columns; add them with [`ConsoleGrid::add_column`].
    NoColumns,
}

struct GridCore<T> {
    columns: Vec<Column<T>>,
    selection: Vec<T>,
    focused: Option<T>,
    options: GridOptions,
    extra_info: String,
    style: Box<dyn GridStyle>,
    sink: Box<dyn OutputSink>,
}

impl<T: PartialEq> GridCore<T> {
    fn render(&mut self, records: &[Rc<T>], flush: bool) -> Result<Option<RenderedGrid>> {
        let started = Instant::now();
        let available_width = self.sink.width();
        let highlight = Highlight {
            selection: &self.selection,
            focused: self.focused.as_ref(),
        };
        let Some(session) = RenderSession::prepare(
            &self.columns,
            records,
            &highlight,
            &self.options,
            available_width,
        )?
        else {
            return Ok(None);
        };

        let rendered = session.render(self.style.as_ref(), &self.extra_info);
        if flush {
            self.flush(&rendered)?;
        }
        if !self.options.persist_extra_info {
            self.extra_info.clear();
        }

        trace!(
            records = records.len(),
            lines = rendered.line_count(),
            flush,
            elapsed_us = started.elapsed().as_micros() as u64,
            "rendered grid"
        );
        Ok(Some(rendered))
    }

    fn flush(&mut self, rendered: &RenderedGrid) -> Result<()> {
        if self.options.auto_expand {
            self.expand_sink(rendered.width());
        }
        if self.options.clear_before_render {
            self.sink.clear()?;
        }
        let lines = if self.sink.supports_color() {
            rendered.styled_lines()
        } else {
            rendered.lines()
        };
        self.sink.write_lines(&lines)?;
        Ok(())
    }

    /// Best effort: a surface that cannot grow keeps its width.
    fn expand_sink(&mut self, needed: usize) {
        let current = self.sink.width();
        let max_width = self.sink.max_width();
        if current >= needed || max_width < needed {
            return;
        }
        let requested = (needed + 1).min(max_width);
        debug!(current, needed, requested, "growing output surface");
        if let Err(err) = self.sink.set_width(requested) {
            warn!(%err, "could not resize output surface");
        }
    }
}

struct Shared<T> {
    core: RefCell<GridCore<T>>,
    source: RefCell<ObservableList<T>>,
    pending: RefCell<Option<Vec<Rc<T>>>>,
}

impl<T: PartialEq> Shared<T> {
    fn render_now(&self, flush: bool) -> Result<Option<RenderedGrid>> {
        let records = self.source.borrow().snapshot();
        let result = match self.core.try_borrow_mut() {
            Ok(mut core) => core.render(&records, flush),
            Err(_) => Err(GridError::Reentrant),
        };
        self.drain();
        result
    }

    fn queue(&self, snapshot: Vec<Rc<T>>) {
        *self.pending.borrow_mut() = Some(snapshot);
        self.drain();
    }

    fn drain(&self) {
        loop {
            let Ok(mut core) = self.core.try_borrow_mut() else {
                debug!("render in progress, change queued");
                return;
            };
            let Some(records) = self.pending.borrow_mut().take() else {
                return;
            };
            if let Err(err) = core.render(&records, true) {
                warn!(%err, "render after list change failed");
            }
        }
    }
}

/// A bordered text grid over an observable list of records.
pub struct ConsoleGrid<T: 'static> {
    subscription: Option<Subscription<T>>,
    shared: Rc<Shared<T>>,
    mode: ColumnGenerationMode,
}

impl<T: GridRecord + PartialEq + 'static> ConsoleGrid<T> {
    /// A grid with generated columns and default options.
    pub fn new() -> Self {
        Self::with_mode(ColumnGenerationMode::AutoGenerate)
    }

    pub fn with_mode(mode: ColumnGenerationMode) -> Self {
        Self::with_options(mode, GridOptions::default())
    }

    pub fn with_options(mode: ColumnGenerationMode, options: GridOptions) -> Self {
        let columns = match mode {
            ColumnGenerationMode::AutoGenerate => T::grid_columns(options.show_type_names),
            ColumnGenerationMode::NoColumns => Vec::new(),
        };
        Self::build(mode, columns, options)
    }

    /// A grid configured from a [`GridConfig`], using its default style.
    pub fn from_config(config: &GridConfig) -> Result<Self> {
        let style = config.build_style()?;
        let mut grid = Self::with_options(ColumnGenerationMode::AutoGenerate, config.options.clone());
        grid.set_style(Box::new(style));
        Ok(grid)
    }

    /// Rebuilds the generated columns, e.g. after `show_type_names` changed.
    ///
    /// Hand-added columns are kept after the generated ones.
    pub fn regenerate_columns(&mut self) {
        let mut core = self.shared.core.borrow_mut();
        let mut columns = T::grid_columns(core.options.show_type_names);
        columns.extend(
            core.columns
                .drain(..)
                .filter(|column| !column.is_auto_generated()),
        );
        core.columns = columns;
    }

    /// Renders `items` once to standard output.
    pub fn render_list<I>(items: I) -> Result<Option<RenderedGrid>>
    where
        I: IntoIterator<Item = T>,
    {
        Self::render_list_to(items, TermSink::new())
    }

    /// Renders `items` once to `sink`.
    pub fn render_list_to<I, S>(items: I, sink: S) -> Result<Option<RenderedGrid>>
    where
        I: IntoIterator<Item = T>,
        S: OutputSink + 'static,
    {
        let options = GridOptions {
            observe: false,
            ..GridOptions::default()
        };
        let mut grid = Self::with_options(ColumnGenerationMode::AutoGenerate, options);
        grid.set_sink(Box::new(sink));
        grid.set_items(items);
        grid.render()
    }
}

impl<T: GridRecord + PartialEq + 'static> Default for ConsoleGrid<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq + 'static> ConsoleGrid<T> {
    /// A grid with hand-written columns and no generation.
    pub fn with_columns(columns: Vec<Column<T>>, options: GridOptions) -> Self {
        Self::build(ColumnGenerationMode::NoColumns, columns, options)
    }

    fn build(mode: ColumnGenerationMode, columns: Vec<Column<T>>, options: GridOptions) -> Self {
        let core = GridCore {
            columns,
            selection: Vec::new(),
            focused: None,
            options,
            extra_info: String::new(),
            style: Box::new(DefaultStyle::new()),
            sink: Box::new(TermSink::new()),
        };
        let mut grid = ConsoleGrid {
            subscription: None,
            shared: Rc::new(Shared {
                core: RefCell::new(core),
                source: RefCell::new(ObservableList::new()),
                pending: RefCell::new(None),
            }),
            mode,
        };
        grid.sync_subscription();
        grid
    }

    /// Subscribes to the current source when observation is on.
    fn sync_subscription(&mut self) {
        self.subscription = None;
        if !self.shared.core.borrow().options.observe {
            return;
        }
        let weak: Weak<Shared<T>> = Rc::downgrade(&self.shared);
        let subscription = self.shared.source.borrow().subscribe(move |change, snapshot| {
            if let Some(shared) = weak.upgrade() {
                trace!(?change, "source list changed");
                shared.queue(snapshot.to_vec());
            }
        });
        self.subscription = Some(subscription);
    }

    pub fn column_generation_mode(&self) -> ColumnGenerationMode {
        self.mode
    }

    pub fn columns(&self) -> Vec<Column<T>> {
        self.shared.core.borrow().columns.clone()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.shared
            .core
            .borrow()
            .columns
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Appends a column after the existing ones.
    pub fn add_column(&mut self, column: Column<T>) {
        self.shared.core.borrow_mut().columns.push(column);
    }

    pub fn clear_columns(&mut self) {
        self.shared.core.borrow_mut().columns.clear();
    }

    /// A handle to the list being displayed.
    pub fn source(&self) -> ObservableList<T> {
        self.shared.source.borrow().clone()
    }

    /// Displays `source`, moving the subscription to it when observing.
    pub fn set_source(&mut self, source: ObservableList<T>) {
        debug!(records = source.len(), "attaching source list");
        self.subscription = None;
        *self.shared.source.borrow_mut() = source;
        self.sync_subscription();
    }

    /// Displays a new list built from `items`.
    pub fn set_items<I: IntoIterator<Item = T>>(&mut self, items: I) {
        self.set_source(items.into_iter().collect());
    }

    pub fn is_observing(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn select(&mut self, item: T) {
        let mut core = self.shared.core.borrow_mut();
        if !core.selection.contains(&item) {
            core.selection.push(item);
        }
    }

    /// Removes `item` from the selection. Returns whether it was selected.
    pub fn deselect(&mut self, item: &T) -> bool {
        let mut core = self.shared.core.borrow_mut();
        let before = core.selection.len();
        core.selection.retain(|selected| selected != item);
        core.selection.len() != before
    }

    pub fn set_selection<I: IntoIterator<Item = T>>(&mut self, items: I) {
        let mut core = self.shared.core.borrow_mut();
        core.selection.clear();
        for item in items {
            if !core.selection.contains(&item) {
                core.selection.push(item);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.shared.core.borrow_mut().selection.clear();
    }

    pub fn is_selected(&self, item: &T) -> bool {
        self.shared.core.borrow().selection.contains(item)
    }

    /// Sets the focused record. Focusing a record renders the grid at once;
    /// clearing the focus does not.
    pub fn set_focused(&mut self, item: Option<T>) -> Result<Option<RenderedGrid>> {
        let render = item.is_some();
        self.shared.core.borrow_mut().focused = item;
        if render {
            self.render()
        } else {
            Ok(None)
        }
    }

    pub fn is_focused(&self, item: &T) -> bool {
        self.shared.core.borrow().focused.as_ref() == Some(item)
    }

    pub fn options(&self) -> GridOptions {
        self.shared.core.borrow().options.clone()
    }

    /// Replaces the options. Switching `observe` subscribes or unsubscribes.
    pub fn set_options(&mut self, options: GridOptions) {
        let observe = options.observe;
        self.shared.core.borrow_mut().options = options;
        if observe != self.is_observing() {
            self.sync_subscription();
        }
    }

    pub fn update_options<F: FnOnce(&mut GridOptions)>(&mut self, update: F) {
        let mut options = self.options();
        update(&mut options);
        self.set_options(options);
    }

    pub fn set_style(&mut self, style: Box<dyn GridStyle>) {
        self.shared.core.borrow_mut().style = style;
    }

    pub fn set_sink(&mut self, sink: Box<dyn OutputSink>) {
        self.shared.core.borrow_mut().sink = sink;
    }

    /// Text written after the grid on the next render.
    pub fn extra_info(&self) -> String {
        self.shared.core.borrow().extra_info.clone()
    }

    pub fn append_extra_info(&mut self, text: &str) {
        self.shared.core.borrow_mut().extra_info.push_str(text);
    }

    pub fn append_extra_info_line(&mut self, text: &str) {
        let mut core = self.shared.core.borrow_mut();
        core.extra_info.push_str(text);
        core.extra_info.push('\n');
    }

    pub fn clear_extra_info(&mut self) {
        self.shared.core.borrow_mut().extra_info.clear();
    }

    /// Renders the current records and writes them to the sink.
    ///
    /// Returns `Ok(None)` without touching the sink when there are no
    /// records.
    pub fn render(&self) -> Result<Option<RenderedGrid>> {
        self.shared.render_now(true)
    }

    /// Renders the current records without writing them anywhere.
    pub fn render_buffer(&self) -> Result<Option<RenderedGrid>> {
        self.shared.render_now(false)
    }

    /// A weak handle that can render this grid from callbacks.
    pub fn handle(&self) -> GridHandle<T> {
        GridHandle {
            shared: Rc::downgrade(&self.shared),
        }
    }
}

impl<T: Clone + PartialEq + 'static> ConsoleGrid<T> {
    pub fn selection(&self) -> Vec<T> {
        self.shared.core.borrow().selection.clone()
    }

    pub fn focused(&self) -> Option<T> {
        self.shared.core.borrow().focused.clone()
    }
}

/// Renders a grid without keeping it alive.
pub struct GridHandle<T> {
    shared: Weak<Shared<T>>,
}

impl<T> Clone for GridHandle<T> {
    fn clone(&self) -> Self {
        GridHandle {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<T: PartialEq> GridHandle<T> {
    /// Renders and flushes the grid. A dropped grid renders nothing.
    pub fn render(&self) -> Result<Option<RenderedGrid>> {
        match self.shared.upgrade() {
            Some(shared) => shared.render_now(true),
            None => Ok(None),
        }
    }

    pub fn render_buffer(&self) -> Result<Option<RenderedGrid>> {
        match self.shared.upgrade() {
            Some(shared) => shared.render_now(false),
            None => Ok(None),
        }
    }
}
