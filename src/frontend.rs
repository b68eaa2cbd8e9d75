//! Compiler frontend. Generates a parsed and validated AST.

pub mod ast;
pub mod parser;
pub mod resolver;
