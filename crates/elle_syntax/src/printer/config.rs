//! Printer configuration
//!
//! There is no config file: callers build a [`PrintConfig`] from defaults and builder methods.

/// Printer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintConfig {
    /// Number of spaces per indentation level
    pub indent_width: usize,
    /// Number of blank lines between top-level declarations
    pub blank_lines_top_level: usize,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            blank_lines_top_level: 1,
        }
    }
}

impl PrintConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set blank lines between top-level declarations
    pub fn with_blank_lines_top_level(mut self, lines: usize) -> Self {
        self.blank_lines_top_level = lines;
        self
    }
}
