//! Renders resolved programs as C++ or as canonical source text.

pub mod writer;
pub mod cpp;
pub mod source;

use tracing::debug;
use crate::prelude::*;
use crate::config::INDENT_WIDTH;
use crate::frontend::ast::{Program, Expression};

pub use writer::Writer;
pub use cpp::Cpp;
pub use source::Source;

/// Emitter configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitOptions {
    /// Number of spaces per nesting level.
    pub indent_width: usize,
    /// Whether to emit the builtin vector helpers. Disable when linking against a shared definition.
    pub prelude     : bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            indent_width: INDENT_WIDTH,
            prelude     : true,
        }
    }
}

/// Renders a program to text.
pub trait Render {
    /// Writes the complete program.
    fn program<W: Write>(self: &Self, program: &Program, writer: &mut Writer<W>) -> io::Result<()>;
}

/// Wraps the rendered text of an operand in parentheses unless it is a single value.
pub(crate) fn parenthesize(expr: &Expression, text: String) -> String {
    if expr.is_leaf() {
        text
    } else {
        format!("({})", text)
    }
}

/// Formats a real so that it always contains a fractional part.
pub(crate) fn real_literal(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') { text } else { text + ".0" }
}

/// Renders the program with the given renderer.
#[tracing::instrument(skip_all, fields(program = program.name()))]
pub fn render_with<R: Render>(renderer: &R, program: &Program, out: &mut impl Write, indent_width: usize) -> io::Result<()> {
    let mut writer = Writer::new(out, indent_width);
    renderer.program(program, &mut writer)?;
    writer.flush()?;
    debug!("rendered program");
    Ok(())
}

/// Renders the program as C++ with default options.
pub fn render(program: &Program, out: &mut impl Write) -> io::Result<()> {
    render_with_options(program, out, &EmitOptions::default())
}

/// Renders the program as C++.
pub fn render_with_options(program: &Program, out: &mut impl Write, options: &EmitOptions) -> io::Result<()> {
    render_with(&Cpp::new(options), program, out, options.indent_width)
}

/// Renders the program in its own syntax.
pub fn render_source(program: &Program, out: &mut impl Write) -> io::Result<()> {
    render_with(&Source, program, out, INDENT_WIDTH)
}

fn into_string(buffer: Vec<u8>) -> crate::Result<String> {
    String::from_utf8(buffer).map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error).into())
}

/// Renders the program as C++ into a string.
pub fn render_to_string(program: &Program) -> crate::Result<String> {
    let mut buffer = Vec::new();
    render(program, &mut buffer)?;
    into_string(buffer)
}

/// Renders the program in its own syntax into a string.
pub fn render_source_to_string(program: &Program) -> crate::Result<String> {
    let mut buffer = Vec::new();
    render_source(program, &mut buffer)?;
    into_string(buffer)
}
