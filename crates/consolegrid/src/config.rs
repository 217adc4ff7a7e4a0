//! Grid options and YAML configuration.
//!
//! [`GridOptions`] holds the behavior switches of a grid. [`GridConfig`]
//! adds the look of the default style and can be loaded from YAML:
//!
//! ```rust
//! use consolegrid::config::GridConfig;
//! use consolegrid::style::BorderStyle;
//!
//! let config = GridConfig::from_yaml(r#"
//! null_text: "-"
//! show_row_numbers: true
//! border: rounded
//! palette:
//!   selected_bg: blue
//!   alternating_bg: none
//! "#).unwrap();
//!
//! assert_eq!(config.options.null_text, "-");
//! assert!(config.options.show_row_numbers);
//! assert_eq!(config.border, BorderStyle::Rounded);
//! let style = config.build_style().unwrap();
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use serde::Deserialize;
use serde_yaml::Value;

use crate::color::parse_color;
use crate::error::Result;
use crate::style::{BorderStyle, DefaultStyle, Palette};

/// Placeholder rendered for absent values.
pub const DEFAULT_NULL_TEXT: &str = "{NULL}";

/// Behavior switches of a grid.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Text shown for absent values.
    pub null_text: String,
    /// Suffix generated column names with the field type.
    pub show_type_names: bool,
    /// Prepend a 0-based `Nr` column.
    pub show_row_numbers: bool,
    /// Write a `Total: <count>` line after the footer.
    pub show_summary: bool,
    /// Keep extra info text across renders instead of clearing it.
    pub persist_extra_info: bool,
    /// Ask the output surface to grow when the grid is wider than it.
    pub auto_expand: bool,
    /// Clear the output surface before writing.
    pub clear_before_render: bool,
    /// Re-render whenever the source list changes.
    pub observe: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        GridOptions {
            null_text: DEFAULT_NULL_TEXT.to_string(),
            show_type_names: true,
            show_row_numbers: false,
            show_summary: false,
            persist_extra_info: false,
            auto_expand: true,
            clear_before_render: true,
            observe: true,
        }
    }
}

/// Color overrides for the default palette.
///
/// Each entry is a color (see [`crate::color`]) or `none` to disable it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub alternating_fg: Option<Value>,
    pub alternating_bg: Option<Value>,
    pub selected_fg: Option<Value>,
    pub selected_bg: Option<Value>,
    pub focused_fg: Option<Value>,
    pub focused_bg: Option<Value>,
}

impl PaletteConfig {
    /// Applies the overrides on top of `base`.
    pub fn apply(&self, base: Palette) -> Result<Palette> {
        Ok(Palette {
            alternating_fg: override_color(&self.alternating_fg, base.alternating_fg)?,
            alternating_bg: override_color(&self.alternating_bg, base.alternating_bg)?,
            selected_fg: override_color(&self.selected_fg, base.selected_fg)?,
            selected_bg: override_color(&self.selected_bg, base.selected_bg)?,
            focused_fg: override_color(&self.focused_fg, base.focused_fg)?,
            focused_bg: override_color(&self.focused_bg, base.focused_bg)?,
        })
    }
}

fn override_color(
    value: &Option<Value>,
    base: Option<console::Color>,
) -> Result<Option<console::Color>> {
    match value {
        None => Ok(base),
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("none") => Ok(None),
        Some(value) => parse_color(value).map(Some),
    }
}

/// Options plus default-style settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    #[serde(flatten)]
    pub options: GridOptions,
    pub border: BorderStyle,
    pub padding: usize,
    pub palette: PaletteConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            options: GridOptions::default(),
            border: BorderStyle::default(),
            padding: 1,
            palette: PaletteConfig::default(),
        }
    }
}

impl GridConfig {
    /// Parses a configuration document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Builds the default style described by this configuration.
    pub fn build_style(&self) -> Result<DefaultStyle> {
        Ok(DefaultStyle::new()
            .border(self.border)
            .padding(self.padding)
            .with_palette(self.palette.apply(Palette::default())?))
    }
}
