//! Indentation-aware text emission
//!
//! The [`Writer`] normalizes multi-line snippets and writes them line by line,
//! prefixed by the current indentation, to any [`LineSink`].

use std::io::{self, Write};

use tracing::warn;

/// Default indent unit: four spaces.
pub const DEFAULT_INDENT: &str = "    ";

const TAB_SIZE: usize = 8;

/// A destination that accepts whole lines
pub trait LineSink {
    /// Write one line; the sink appends the line terminator.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl LineSink for String {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push_str(line);
        self.push('\n');
        Ok(())
    }
}

/// Adapts any [`io::Write`] (a file, a socket, stdout) into a [`LineSink`]
#[derive(Debug)]
pub struct IoSink<W: Write> {
    inner: W,
}

impl<W: Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> LineSink for IoSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.inner.write_all(line.as_bytes())?;
        self.inner.write_all(b"\n")
    }
}

/// Writes normalized, indented content to a sink.
///
/// The first sink error is kept and every later write is skipped; it is
/// reported by [`Writer::finish`].
#[derive(Debug)]
pub struct Writer<S: LineSink = String> {
    sink: S,
    indent_unit: String,
    level: usize,
    warnings: usize,
    error: Option<io::Error>,
}

impl Writer<String> {
    /// A writer collecting output in memory
    pub fn in_memory() -> Self {
        Self::new(String::new())
    }
}

impl<S: LineSink> Writer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            indent_unit: DEFAULT_INDENT.to_string(),
            level: 0,
            warnings: 0,
            error: None,
        }
    }

    /// Use `unit` as the indent string instead of four spaces
    pub fn with_indent(mut self, unit: impl Into<String>) -> Self {
        self.indent_unit = unit.into();
        self
    }

    /// Write `content` at the current indentation.
    ///
    /// The block's common leading indentation is stripped, tabs are expanded
    /// and leading/trailing blank lines are dropped. Empty content writes a
    /// single blank line.
    pub fn write(&mut self, content: &str) -> &mut Self {
        let lines = clean_block(content);
        if lines.is_empty() {
            self.emit("");
            return self;
        }

        let prefix = self.indent_unit.repeat(self.level);
        for line in lines {
            if line.trim().is_empty() {
                self.emit("");
            } else {
                self.emit(&format!("{prefix}{line}"));
            }
        }
        self
    }

    /// Write a single blank line
    pub fn blank(&mut self) -> &mut Self {
        self.emit("");
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.level += 1;
        self
    }

    /// Dedent by one level; at level 0 this warns and leaves the level as is.
    pub fn dedent(&mut self) -> &mut Self {
        if self.level > 0 {
            self.level -= 1;
        } else {
            self.warnings += 1;
            warn!("can't dedent further");
        }
        self
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Number of recoverable warnings raised so far
    pub fn warnings(&self) -> usize {
        self.warnings
    }

    /// Finish writing and return the sink, or the first sink error.
    pub fn finish(self) -> io::Result<S> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.sink),
        }
    }

    fn emit(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.sink.write_line(line) {
            self.error = Some(err);
        }
    }
}

/// Normalize a multi-line block.
///
/// The first line loses its leading whitespace on its own; the remaining lines
/// lose the smallest indentation found among their non-blank lines.
fn clean_block(content: &str) -> Vec<String> {
    let expanded: Vec<String> = content.split('\n').map(expand_tabs).collect();

    let margin = expanded
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min();

    let mut lines: Vec<String> = expanded
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                return line.trim_start().to_string();
            }
            match margin {
                Some(m) => line.get(m..).unwrap_or_else(|| line.trim_start()).to_string(),
                None => line.trim_start().to_string(),
            }
        })
        .collect();

    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| l.trim().is_empty()).count();
    lines.drain(..leading);
    lines
}

fn expand_tabs(line: &str) -> String {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let spaces = TAB_SIZE - column % TAB_SIZE;
            out.extend(std::iter::repeat(' ').take(spaces));
            column += spaces;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn output(writer: Writer) -> String {
        writer.finish().unwrap()
    }

    #[test]
    fn test_writing_lines() {
        let mut writer = Writer::in_memory();
        writer.write("Here's a sample line...").blank();
        writer.write("List of random items:");
        writer.indent();
        writer.write("- First");
        writer.write("- Second");
        writer.write("- Third");

        assert_eq!(
            output(writer),
            "Here's a sample line...\n\nList of random items:\n    - First\n    - Second\n    - Third\n"
        );
    }

    #[test]
    fn test_writing_multilines() {
        let mut writer = Writer::in_memory();
        writer.write(
            "\n\n\n            Here's a sample line...\n\n            List of random items:\n                - Table\n            \t- Second\n                - Third\n\n\n        ",
        );

        assert_snapshot!(output(writer), @r"
        Here's a sample line...

        List of random items:
            - Table
            - Second
            - Third
        ");
    }

    #[test]
    fn test_extra_dedentation() {
        let mut writer = Writer::in_memory();
        writer.indent().write("Here's a sample indented line...");
        writer
            .dedent()
            .write("Here's another line before an extra dedent...");

        writer.dedent();
        assert_eq!(writer.warnings(), 1);
        assert_eq!(writer.level(), 0);

        writer.write("And here's a third line after the extra dedent.");

        assert_eq!(
            output(writer),
            "    Here's a sample indented line...\nHere's another line before an extra dedent...\nAnd here's a third line after the extra dedent.\n"
        );
    }

    #[test]
    fn test_empty_write_is_blank_line() {
        let mut writer = Writer::in_memory();
        writer.indent().write("");
        writer.write("   \n  ");
        assert_eq!(output(writer), "\n\n");
    }

    #[test]
    fn test_nested_block_indentation() {
        let mut writer = Writer::in_memory();
        writer.indent().indent();
        writer.write(
            "
            a.addListener('click', function() {
                a.setMap(null);
            });
            ",
        );
        assert_eq!(
            output(writer),
            "        a.addListener('click', function() {\n            a.setMap(null);\n        });\n"
        );
    }

    #[test]
    fn test_interior_blank_lines_carry_no_indent() {
        let mut writer = Writer::in_memory();
        writer.indent();
        writer.write("a\n\nb");
        assert_eq!(output(writer), "    a\n\n    b\n");
    }

    #[test]
    fn test_custom_indent_unit() {
        let mut writer = Writer::in_memory().with_indent("\t");
        writer.indent().write("x");
        assert_eq!(output(writer), "\tx\n");
    }

    #[test]
    fn test_identical_calls_identical_output() {
        let run = || {
            let mut writer = Writer::in_memory();
            writer.write("a").indent().write("b\n  c").dedent().blank();
            output(writer)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_io_sink() {
        let mut writer = Writer::new(IoSink::new(Vec::new()));
        writer.write("x").indent().write("y");
        let bytes = writer.finish().unwrap().into_inner().unwrap();
        assert_eq!(bytes, b"x\n    y\n");
    }

    #[test]
    fn test_sink_error_is_reported() {
        struct Broken;
        impl LineSink for Broken {
            fn write_line(&mut self, _line: &str) -> io::Result<()> {
                Err(io::Error::other("broken"))
            }
        }
        let mut writer = Writer::new(Broken);
        writer.write("x").write("y");
        assert!(writer.finish().is_err());
    }

    #[test]
    fn test_expand_tabs() {
        assert_eq!(expand_tabs("\tx"), "        x");
        assert_eq!(expand_tabs("ab\tx"), "ab      x");
    }
}
