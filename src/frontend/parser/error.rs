use crate::config::MAX_IDENT_LENGTH;
use crate::frontend::ast::Position;

/// Represents the various possible parser error-kinds.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    /// No alternative matched. Reported at the furthest position any parser reached.
    #[error("Syntax error")]
    SyntaxError,
    /// A construct was started but a required part is missing.
    #[error("Expected {0}")]
    Expected(&'static str),
    #[error("Invalid numeric value")]
    InvalidNumerical,
    #[error("Identifier exceeds {} characters", MAX_IDENT_LENGTH)]
    IdentifierTooLong,
    #[error("Undefined structure '{0}'")]
    UndefinedStructure(String),
}

/// An error reported by the parser (e.g. syntax error).
#[derive(Clone, Debug, thiserror::Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct ParseError {
    kind: ParseErrorKind,
    position: Position,
    line: u32,
    column: u32,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, position: Position, input: &str) -> ParseError {
        let (line, column) = position.loc(input);
        Self { kind, position, line, column }
    }
    /// 1-based line/column number of the error.
    pub fn loc(self: &Self) -> (u32, u32) {
        (self.line, self.column)
    }
    /// The kind of the error.
    pub fn kind(self: &Self) -> &ParseErrorKind {
        &self.kind
    }
    pub fn position(self: &Self) -> Position {
        self.position
    }
}

pub type ParseResult<T = ()> = Result<T, ParseError>;
