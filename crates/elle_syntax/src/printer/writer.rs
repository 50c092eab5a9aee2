//! Output writer with indentation tracking

use super::config::PrintConfig;

/// Writer that tracks indentation and builds printed output
pub struct SourceWriter {
    output: String,
    indent_level: usize,
    config: PrintConfig,
    at_line_start: bool,
}

impl SourceWriter {
    pub fn new(config: PrintConfig) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            config,
            at_line_start: true,
        }
    }

    pub fn config(&self) -> &PrintConfig {
        &self.config
    }

    /// Get the printed output
    pub fn finish(self) -> String {
        self.output
    }

    pub fn current_indent(&self) -> usize {
        self.indent_level
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Continue an already indented line, e.g. when rendering a fragment mid-line.
    pub fn resume_line(&mut self) {
        self.at_line_start = false;
    }

    fn write_indent(&mut self) {
        if self.at_line_start {
            let width = self.indent_level * self.config.indent_width;
            self.output.extend(std::iter::repeat_n(' ', width));
            self.at_line_start = false;
        }
    }

    /// Write a string, indenting first if at line start
    pub fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(s);
    }

    pub fn writeln(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Write `count` empty lines
    pub fn blank_lines(&mut self, count: usize) {
        for _ in 0..count {
            self.newline();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_writer() -> SourceWriter {
        SourceWriter::new(PrintConfig::default())
    }

    #[test]
    fn test_new_writer_empty_output() {
        let writer = default_writer();
        assert_eq!(writer.current_indent(), 0);
        assert_eq!(writer.finish(), "");
    }

    #[test]
    fn test_write_multiple() {
        let mut writer = default_writer();
        writer.write("hello");
        writer.write("");
        writer.write(" world");
        assert_eq!(writer.finish(), "hello world");
    }

    #[test]
    fn test_indent_applies_at_line_start_only() {
        let mut writer = default_writer();
        writer.writeln("{");
        writer.indent();
        writer.write("a");
        writer.writeln(";");
        writer.dedent();
        writer.writeln("}");
        assert_eq!(writer.finish(), "{\n    a;\n}\n");
    }

    #[test]
    fn test_custom_indent_width() {
        let mut writer = SourceWriter::new(PrintConfig::new().with_indent_width(2));
        writer.indent();
        writer.indent();
        writer.writeln("x");
        assert_eq!(writer.config().indent_width, 2);
        assert_eq!(writer.finish(), "    x\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let mut writer = default_writer();
        writer.dedent();
        writer.writeln("x");
        assert_eq!(writer.finish(), "x\n");
    }

    #[test]
    fn test_blank_lines() {
        let mut writer = default_writer();
        writer.writeln("a");
        writer.blank_lines(2);
        writer.writeln("b");
        assert_eq!(writer.finish(), "a\n\n\nb\n");
    }
}
