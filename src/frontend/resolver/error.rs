use crate::prelude::*;
use crate::frontend::ast::{Position, Positioned, Type, BinaryOperator, UnaryOperator};

/// Represents the various possible resolver error-kinds.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ResolveErrorKind {
    #[error("Undefined identifier '{0}'")]
    UndefinedIdentifier(String),
    #[error("Undefined function '{0}'")]
    UndefinedFunction(String),
    #[error("Undefined structure '{0}'")]
    UndefinedStructure(String),
    #[error("Structure '{structure}' has no member '{member}'")]
    UndefinedMember { structure: String, member: String },
    #[error("Type {ty} has no method '{name}'")]
    UndefinedMethod { ty: Type, name: String },
    #[error("Expected type {expected}, got {given}")]
    TypeMismatch { expected: Type, given: Type },
    #[error("Cannot index value of non-vector type {0}")]
    NotAVector(Type),
    #[error("Cannot access member '{member}' of non-structure type {ty}")]
    NotAStructure { ty: Type, member: String },
    #[error("Invalid number of arguments. '{name}' expects {expected}, got {given}")]
    NumberOfArguments { name: String, expected: usize, given: usize },
    #[error("'{0}' does not yield a value")]
    NoValue(String),
    #[error("Operator '{op}' cannot be applied to {left} and {right}")]
    InvalidOperands { op: BinaryOperator, left: Type, right: Type },
    #[error("Operator '{op}' cannot be applied to {ty}")]
    InvalidOperand { op: UnaryOperator, ty: Type },
    #[error("Cannot write to '{0}'")]
    NotWritable(String),
    #[error("Cannot print or read value of type {0}")]
    NotScalar(Type),
    #[error("Expression has no effect. Only calls may be used as instructions")]
    NotAnInstruction,
    #[error("Procedure '{0}' cannot return a value")]
    ReturnInProcedure(String),
    #[error("Loop variable '{0}' must be a writable integral variable")]
    InvalidLoopVariable(String),
    #[error("Constant initializer may only refer to previously declared constants, found '{0}'")]
    NotConstant(String),
    #[error("Duplicate declaration of '{0}'")]
    Duplicate(String),
    #[error("'{0}' shadows a structure, function or procedure of the same name")]
    ShadowsDeclaration(String),
    #[error("Entry function '{0}' is not defined")]
    MissingEntry(String),
    #[error("Entry function must be declared as 'function {0}(in args : vector of string) : integer'")]
    InvalidEntrySignature(String),
    #[error("Program name '{0}' is reserved")]
    ReservedProgramName(String),
}

/// An error reported by the resolver (e.g. unknown/mismatching types).
#[derive(Clone, Debug, PartialEq)]
pub struct ResolveError {
    kind: ResolveErrorKind,
    position: Position,
    loc: Option<(u32, u32)>,
}

impl ResolveError {
    pub(crate) fn new(item: &impl Positioned, kind: ResolveErrorKind) -> ResolveError {
        Self::at(item.position(), kind)
    }
    pub(crate) fn at(position: Position, kind: ResolveErrorKind) -> ResolveError {
        Self { kind, position, loc: None }
    }
    /// The kind of the error.
    pub fn kind(self: &Self) -> &ResolveErrorKind {
        &self.kind
    }
    pub fn position(self: &Self) -> Position {
        self.position
    }
    /// 1-based line/column number of the error, if it was located against its source.
    pub fn loc(self: &Self) -> Option<(u32, u32)> {
        self.loc
    }
}

impl Display for ResolveError {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.loc {
            Some((line, column)) => write!(f, "{} at line {}, column {}", self.kind, line, column),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for ResolveError { }

pub type ResolveResult<T = ()> = Result<T, ResolveError>;

/// All errors found while resolving a program, in the order they were encountered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diagnostics(Vec<ResolveError>);

impl Diagnostics {
    pub(crate) fn push(self: &mut Self, error: ResolveError) {
        self.0.push(error);
    }
    pub fn errors(self: &Self) -> &[ResolveError] {
        &self.0
    }
    pub fn len(self: &Self) -> usize {
        self.0.len()
    }
    pub fn is_empty(self: &Self) -> bool {
        self.0.is_empty()
    }
    /// Returns true if any error is of the given kind.
    pub fn contains(self: &Self, kind: &ResolveErrorKind) -> bool {
        self.0.iter().any(|e| e.kind() == kind)
    }
    /// Computes line/column numbers of all errors from the source the program was parsed from.
    pub fn located(mut self: Self, source: &str) -> Self {
        for error in &mut self.0 {
            error.loc = Some(error.position.loc(source));
        }
        self
    }
    pub(crate) fn into_result(self: Self) -> Result<(), Diagnostics> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Display for Diagnostics {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics { }

impl IntoIterator for Diagnostics {
    type Item = ResolveError;
    type IntoIter = std::vec::IntoIter<ResolveError>;
    fn into_iter(self: Self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
