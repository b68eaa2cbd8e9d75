//! Algoc, a front end for a small imperative teaching language.
//!
//! Source text is parsed into an AST by [parse](crate::frontend::parser::parse), validated by
//! [resolve](crate::frontend::resolver::resolve) and rendered as C++ by [render](crate::emitter::render).

pub mod config;
pub mod frontend;
pub mod emitter;
pub mod error;

pub(crate) mod prelude {
    pub use std::fmt::{self, Debug, Display};
    pub use std::io::{self, Write};
    pub use std::rc::Rc;
    pub use std::cell::{Cell, RefCell};
}

pub use crate::frontend::{parser::{parse, parse_expression, ParseError, ParseErrorKind, ParseResult}, resolver::{resolve, Diagnostics, ResolveError, ResolveErrorKind}};
pub use crate::emitter::{render, render_source, render_to_string, render_source_to_string, EmitOptions};
pub use crate::error::{Error, Result};

use crate::frontend::ast::Program;

/// One stop shop to `parse` and `resolve` the given source code.
///
/// Parse errors are reported as soon as they are encountered, semantic errors are collected over the
/// whole program and reported together.
/// ```
/// let program = algoc::build("
/// program hello
///
/// function hello(in args : vector of string) : integer
///     print \"hello world\\n\"
///     return 0
/// end
/// ").unwrap();
/// let cpp = algoc::render_to_string(&program).unwrap();
/// assert!(cpp.contains("int main(int argc, char** argv)"));
/// ```
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn build(source: &str) -> Result<Program> {
    let program = parse(source)?;
    resolve(&program).map_err(|diagnostics| diagnostics.located(source))?;
    Ok(program)
}
