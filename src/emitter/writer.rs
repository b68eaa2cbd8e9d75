//! Indenting text writer.

use crate::prelude::*;

/// Line oriented writer that indents each line to the current nesting level.
#[derive(Debug)]
pub struct Writer<W: Write> {
    out         : W,
    indent_width: usize,
    depth       : usize,
    line_start  : bool,
}

impl<W: Write> Writer<W> {
    /// Creates a new writer instance.
    pub fn new(out: W, indent_width: usize) -> Self {
        Writer {
            out,
            indent_width,
            depth       : 0,
            line_start  : true,
        }
    }
    /// Writes text to the current line, indenting it first if nothing was written to the line yet.
    pub fn write(self: &mut Self, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        if self.line_start {
            write!(self.out, "{:1$}", "", self.depth * self.indent_width)?;
            self.line_start = false;
        }
        self.out.write_all(text.as_bytes())
    }
    /// Support for the `write!` macro.
    pub fn write_fmt(self: &mut Self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.write(&fmt::format(args))
    }
    /// Writes text and ends the line.
    pub fn line(self: &mut Self, text: &str) -> io::Result<()> {
        self.write(text)?;
        self.newline()
    }
    /// Ends the current line. Empty lines are not indented.
    pub fn newline(self: &mut Self) -> io::Result<()> {
        self.line_start = true;
        self.out.write_all(b"\n")
    }
    /// Increases the nesting level of following lines.
    pub fn indent(self: &mut Self) {
        self.depth += 1;
    }
    /// Decreases the nesting level of following lines.
    pub fn dedent(self: &mut Self) {
        self.depth = self.depth.saturating_sub(1);
    }
    /// Runs the given function one nesting level deeper.
    pub fn indented<F>(self: &mut Self, write_fn: F) -> io::Result<()>
        where F: FnOnce(&mut Self) -> io::Result<()>
    {
        self.indent();
        let result = write_fn(self);
        self.dedent();
        result
    }
    pub fn flush(self: &mut Self) -> io::Result<()> {
        self.out.flush()
    }
    /// Converts the writer into the underlying output.
    pub fn into_inner(self: Self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_nested_lines() {
        let mut writer = Writer::new(Vec::new(), 2);
        writer.line("a {").unwrap();
        writer.indented(|w| {
            w.write("b")?;
            w.line(";")?;
            w.newline()
        }).unwrap();
        writer.line("}").unwrap();
        assert_eq!(String::from_utf8(writer.into_inner()).unwrap(), "a {\n  b;\n\n}\n");
    }
}
