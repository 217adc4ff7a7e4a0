//! Output surfaces a grid can be flushed to.
//!
//! [`TermSink`] writes to stdout. [`MemorySink`] keeps everything in memory
//! and is what tests use; clones share the same state, so a test can hand one
//! clone to a grid and inspect the other.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use console::Term;

/// Width assumed when the terminal size cannot be determined.
pub const FALLBACK_WIDTH: usize = 80;

/// Largest width a terminal sink will try to grow to.
pub const DEFAULT_MAX_WIDTH: usize = 512;

/// A text surface with a width, optionally resizable and clearable.
pub trait OutputSink {
    /// Current width in columns.
    fn width(&self) -> usize;

    /// Largest width the surface can be grown to.
    fn max_width(&self) -> usize;

    /// Asks the surface to become `width` columns wide.
    fn set_width(&mut self, width: usize) -> io::Result<()>;

    fn clear(&mut self) -> io::Result<()>;

    /// Writes the lines of one render. Implementations should emit them as a
    /// single write.
    fn write_lines(&mut self, lines: &[String]) -> io::Result<()>;

    /// Whether the surface understands ANSI color escapes.
    fn supports_color(&self) -> bool {
        false
    }
}

/// Standard output.
#[derive(Debug)]
pub struct TermSink {
    term: Term,
    max_width: usize,
}

impl Default for TermSink {
    fn default() -> Self {
        TermSink {
            term: Term::stdout(),
            max_width: DEFAULT_MAX_WIDTH,
        }
    }
}

impl TermSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }
}

impl OutputSink for TermSink {
    fn width(&self) -> usize {
        terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(FALLBACK_WIDTH)
    }

    fn max_width(&self) -> usize {
        self.max_width
    }

    fn set_width(&mut self, width: usize) -> io::Result<()> {
        if !self.term.is_term() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "stdout is not a terminal",
            ));
        }
        let rows = terminal_size::terminal_size()
            .map(|(_, h)| h.0)
            .unwrap_or(24);
        // xterm window manipulation: resize text area to rows x columns
        self.term.write_str(&format!("\x1b[8;{rows};{width}t"))?;
        self.term.flush()
    }

    fn clear(&mut self) -> io::Result<()> {
        self.term.clear_screen()
    }

    fn write_lines(&mut self, lines: &[String]) -> io::Result<()> {
        let mut text = lines.join("\n");
        text.push('\n');
        self.term.write_str(&text)?;
        self.term.flush()
    }

    fn supports_color(&self) -> bool {
        self.term.features().colors_supported()
    }
}

/// Everything a [`MemorySink`] has received.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryState {
    pub width: usize,
    pub max_width: usize,
    pub color: bool,
    /// Lines of every write, one entry per write.
    pub writes: Vec<Vec<String>>,
    pub clears: usize,
    /// Every width requested through `set_width`.
    pub resizes: Vec<usize>,
    /// When set, `set_width` fails with this message.
    pub reject_resize: Option<String>,
}

/// In-memory sink with shared state.
#[derive(Clone, Debug)]
pub struct MemorySink {
    state: Rc<RefCell<MemoryState>>,
}

impl Default for MemorySink {
    fn default() -> Self {
        MemorySink::new(FALLBACK_WIDTH)
    }
}

impl MemorySink {
    pub fn new(width: usize) -> Self {
        MemorySink {
            state: Rc::new(RefCell::new(MemoryState {
                width,
                max_width: DEFAULT_MAX_WIDTH,
                ..MemoryState::default()
            })),
        }
    }

    pub fn with_max_width(self, max_width: usize) -> Self {
        self.state.borrow_mut().max_width = max_width;
        self
    }

    pub fn with_color(self, color: bool) -> Self {
        self.state.borrow_mut().color = color;
        self
    }

    /// Makes every resize request fail.
    pub fn rejecting_resize(self, message: &str) -> Self {
        self.state.borrow_mut().reject_resize = Some(message.to_string());
        self
    }

    /// A copy of the current state.
    pub fn state(&self) -> MemoryState {
        self.state.borrow().clone()
    }

    /// Lines of the most recent write.
    pub fn last_write(&self) -> Option<Vec<String>> {
        self.state.borrow().writes.last().cloned()
    }

    pub fn write_count(&self) -> usize {
        self.state.borrow().writes.len()
    }
}

impl OutputSink for MemorySink {
    fn width(&self) -> usize {
        self.state.borrow().width
    }

    fn max_width(&self) -> usize {
        self.state.borrow().max_width
    }

    fn set_width(&mut self, width: usize) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some(message) = &state.reject_resize {
            return Err(io::Error::new(io::ErrorKind::Unsupported, message.clone()));
        }
        state.resizes.push(width);
        state.width = width;
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.state.borrow_mut().clears += 1;
        Ok(())
    }

    fn write_lines(&mut self, lines: &[String]) -> io::Result<()> {
        self.state.borrow_mut().writes.push(lines.to_vec());
        Ok(())
    }

    fn supports_color(&self) -> bool {
        self.state.borrow().color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_clones_share_state() {
        let sink = MemorySink::new(40);
        let mut handle = sink.clone();
        handle.write_lines(&["a".to_string()]).unwrap();
        handle.clear().unwrap();
        assert_eq!(sink.write_count(), 1);
        assert_eq!(sink.last_write(), Some(vec!["a".to_string()]));
        assert_eq!(sink.state().clears, 1);
    }

    #[test]
    fn memory_sink_resize_updates_width() {
        let mut sink = MemorySink::new(40).with_max_width(100);
        sink.set_width(90).unwrap();
        assert_eq!(sink.width(), 90);
        assert_eq!(sink.max_width(), 100);
        assert_eq!(sink.state().resizes, vec![90]);
    }

    #[test]
    fn memory_sink_can_reject_resize() {
        let mut sink = MemorySink::new(40).rejecting_resize("fixed size");
        let err = sink.set_width(90).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
        assert_eq!(sink.width(), 40);
    }
}
