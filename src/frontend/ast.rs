//! AST datastructures and helpers.

use crate::prelude::*;

/// Position of an item in the source, stored as the number of bytes following it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(pub u32);

impl Position {
    /// Compute 1-based line/column number in string.
    pub fn loc(self: &Self, input: &str) -> (u32, u32) {
        let offset = input.len().saturating_sub(self.0 as usize);
        compute_loc(input, offset)
    }
}

/// Compute 1-based line/column number from absolute offset in string.
pub(crate) fn compute_loc(input: &str, offset: usize) -> (u32, u32) {
    let mut parsed = &input[0..offset.min(input.len())];
    let mut line = 1;
    while { // can't use parsed.lines() here as a line-break at the end is ignored
        let mut break_char = '\0';
        if let Some(nl) = parsed.find(|c| if c == '\n' || c == '\r' { break_char = c; true } else { false }) {
            parsed = &parsed[nl+1..];
            if break_char == '\r' && parsed.starts_with('\n') { // skip \n after \r on windows
                parsed = &parsed[1..];
            }
            line += 1;
            true
        } else {
            false
        }
    } {}
    (line, parsed.chars().count() as u32 + 1)
}

/// Implemented by AST items that know their source position.
pub trait Positioned {
    fn position(self: &Self) -> Position;
}

macro_rules! impl_positioned {
    ($($name:ident),+) => { $(
        impl Positioned for $name {
            fn position(self: &Self) -> Position {
                self.position
            }
        }
    )+ };
}

impl_positioned!(Ident, ValueRef, UnaryOp, BinaryOp, Print, Return, Assignment, IfBlock, ElsIf, WhileLoop, LoopUntil, ForLoop, OnGuard);

/// A name. Never one of the reserved keywords.
#[derive(Clone, Debug, PartialEq)]
pub struct Ident {
    pub position: Position,
    pub name    : String,
}

impl Ident {
    pub fn as_str(self: &Self) -> &str {
        &self.name
    }
}

impl Display for Ident {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Type of a symbol or expression. Equality is structural.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Boolean,
    Integer,
    Natural,
    Real,
    Char,
    String,
    Vector(Box<Type>),
    /// Refers to a structure declared by the program.
    Structure(String),
}

impl Type {
    /// Returns the scalar type named by the given keyword.
    pub fn from_keyword(name: &str) -> Option<Type> {
        Some(match name {
            "boolean"   => Type::Boolean,
            "integer"   => Type::Integer,
            "natural"   => Type::Natural,
            "real"      => Type::Real,
            "char"      => Type::Char,
            "string"    => Type::String,
            _           => return None,
        })
    }
    pub fn vector_of(element: Type) -> Type {
        Type::Vector(Box::new(element))
    }
    /// Element type of a vector.
    pub fn element(self: &Self) -> Option<&Type> {
        match self {
            Type::Vector(element) => Some(element),
            _ => None,
        }
    }
    /// Name of the referenced structure.
    pub fn structure(self: &Self) -> Option<&str> {
        match self {
            Type::Structure(name) => Some(name),
            _ => None,
        }
    }
    pub fn is_integral(self: &Self) -> bool {
        matches!(self, Type::Integer | Type::Natural)
    }
    pub fn is_numeric(self: &Self) -> bool {
        matches!(self, Type::Integer | Type::Natural | Type::Real)
    }
    pub fn is_textual(self: &Self) -> bool {
        matches!(self, Type::String | Type::Char)
    }
    /// Scalar types can be printed and read.
    pub fn is_scalar(self: &Self) -> bool {
        !matches!(self, Type::Vector(_) | Type::Structure(_))
    }
}

impl Display for Type {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Boolean           => write!(f, "boolean"),
            Type::Integer           => write!(f, "integer"),
            Type::Natural           => write!(f, "natural"),
            Type::Real              => write!(f, "real"),
            Type::Char              => write!(f, "char"),
            Type::String            => write!(f, "string"),
            Type::Vector(element)   => write!(f, "vector of {}", element),
            Type::Structure(name)   => write!(f, "{}", name),
        }
    }
}

/// A named and typed item: local, argument, structure member, global or constant.
#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub ident   : Ident,
    pub ty      : Type,
}

impl Symbol {
    pub fn name(self: &Self) -> &str {
        &self.ident.name
    }
}

/// A structure definition. Members keep their declared order.
#[derive(Clone, Debug, PartialEq)]
pub struct Structure {
    pub ident   : Ident,
    pub members : Vec<Symbol>,
}

impl Structure {
    pub fn member(self: &Self, name: &str) -> Option<&Symbol> {
        self.members.iter().find(|m| m.name() == name)
    }
}

/// How an argument is passed to a function or procedure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PassingMode {
    In,
    Out,
    InOut,
}

impl PassingMode {
    pub fn from_keyword(name: &str) -> Option<PassingMode> {
        match name {
            "in"    => Some(PassingMode::In),
            "out"   => Some(PassingMode::Out),
            "inout" => Some(PassingMode::InOut),
            _       => None,
        }
    }
    /// Whether the callee may write the argument.
    pub fn is_writable(self: &Self) -> bool {
        *self != PassingMode::In
    }
}

impl Display for PassingMode {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassingMode::In     => write!(f, "in"),
            PassingMode::Out    => write!(f, "out"),
            PassingMode::InOut  => write!(f, "inout"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub mode    : PassingMode,
    pub symbol  : Symbol,
}

/// A function, or a procedure if it has no return type.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub ident   : Ident,
    pub args    : Vec<Argument>,
    pub locals  : Vec<Symbol>,
    pub body    : Vec<Instruction>,
    pub ret     : Option<Type>,
}

impl Function {
    pub fn name(self: &Self) -> &str {
        &self.ident.name
    }
    pub fn is_procedure(self: &Self) -> bool {
        self.ret.is_none()
    }
    pub fn argument(self: &Self, name: &str) -> Option<&Argument> {
        self.args.iter().find(|a| a.symbol.name() == name)
    }
    pub fn local(self: &Self, name: &str) -> Option<&Symbol> {
        self.locals.iter().find(|l| l.name() == name)
    }
}

/// A named constant and its initializer.
#[derive(Clone, Debug, PartialEq)]
pub struct Constant {
    pub symbol  : Symbol,
    pub value   : Expression,
}

/// The program unit. Owns the entire tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub ident       : Ident,
    pub globals     : Vec<Symbol>,
    pub constants   : Vec<Constant>,
    pub structures  : Vec<Structure>,
    pub functions   : Vec<Function>,
    pub procedures  : Vec<Function>,
}

impl Program {
    pub fn new(ident: Ident) -> Self {
        Program {
            ident,
            globals     : Vec::new(),
            constants   : Vec::new(),
            structures  : Vec::new(),
            functions   : Vec::new(),
            procedures  : Vec::new(),
        }
    }
    pub fn name(self: &Self) -> &str {
        &self.ident.name
    }
    pub fn global(self: &Self, name: &str) -> Option<&Symbol> {
        self.globals.iter().find(|g| g.name() == name)
    }
    pub fn constant(self: &Self, name: &str) -> Option<&Constant> {
        self.constants.iter().find(|c| c.symbol.name() == name)
    }
    pub fn structure(self: &Self, name: &str) -> Option<&Structure> {
        self.structures.iter().find(|s| s.ident.name == name)
    }
    pub fn function(self: &Self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name() == name)
    }
    pub fn procedure(self: &Self, name: &str) -> Option<&Function> {
        self.procedures.iter().find(|p| p.name() == name)
    }
    /// The function sharing the program's name.
    pub fn entry_function(self: &Self) -> Option<&Function> {
        self.function(self.name())
    }
    /// Adds a parsed declaration to the matching collection.
    pub(crate) fn declare(self: &mut Self, declaration: Declaration) {
        match declaration {
            Declaration::Global(symbol) => self.globals.push(symbol),
            Declaration::Constant(constant) => self.constants.push(constant),
            Declaration::Structure(structure) => self.structures.push(structure),
            Declaration::Function(function) if function.is_procedure() => self.procedures.push(function),
            Declaration::Function(function) => self.functions.push(function),
        }
    }
}

/// A program level declaration as produced by the parser.
#[derive(Clone, Debug, PartialEq)]
pub enum Declaration {
    Global(Symbol),
    Constant(Constant),
    Structure(Structure),
    Function(Function),
}

/// Expression tree. Parenthesized groups do not appear as nodes.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Value(Value),
    UnaryOp(Box<UnaryOp>),
    BinaryOp(Box<BinaryOp>),
}

impl Expression {
    /// Whether the expression is a single value (a leaf of the tree).
    pub fn is_leaf(self: &Self) -> bool {
        matches!(self, Expression::Value(_))
    }
    /// Position of the expression, unless it is a literal.
    pub fn position(self: &Self) -> Option<Position> {
        match self {
            Expression::Value(Value::Ref(valref)) => Some(valref.position),
            Expression::Value(_) => None,
            Expression::UnaryOp(op) => Some(op.position),
            Expression::BinaryOp(op) => Some(op.position),
        }
    }
    /// Returns the value reference if the expression consists of nothing else.
    pub fn as_valref(self: &Self) -> Option<&ValueRef> {
        match self {
            Expression::Value(Value::Ref(valref)) => Some(valref),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
}

impl UnaryOperator {
    /// Precedence weight. Lower binds tighter.
    pub fn weight(self: &Self) -> u8 {
        match self {
            UnaryOperator::Not => 2,
        }
    }
}

impl Display for UnaryOperator {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Not => write!(f, "not"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnaryOp {
    pub position: Position,
    pub op      : UnaryOperator,
    pub expr    : Expression,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    // arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    // comparison
    Less,
    Greater,
    LessOrEq,
    GreaterOrEq,
    Equal,
    NotEqual,
    // boolean
    And,
    Or,
}

impl BinaryOperator {
    /// Converts source operator to BinaryOperator.
    pub fn from_string(op: &str) -> Option<Self> {
        Some(match op {
            "+"     => BinaryOperator::Add,
            "-"     => BinaryOperator::Sub,
            "*"     => BinaryOperator::Mul,
            "/"     => BinaryOperator::Div,
            "%"     => BinaryOperator::Rem,
            "<"     => BinaryOperator::Less,
            ">"     => BinaryOperator::Greater,
            "<="    => BinaryOperator::LessOrEq,
            ">="    => BinaryOperator::GreaterOrEq,
            "=="    => BinaryOperator::Equal,
            "!="    => BinaryOperator::NotEqual,
            "and"   => BinaryOperator::And,
            "or"    => BinaryOperator::Or,
            _       => return None,
        })
    }
    /// Precedence weight. Lower binds tighter, equal weights associate left to right.
    pub fn weight(self: &Self) -> u8 {
        match self {
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Rem => 3,
            BinaryOperator::Add | BinaryOperator::Sub => 4,
            BinaryOperator::Less | BinaryOperator::Greater | BinaryOperator::LessOrEq | BinaryOperator::GreaterOrEq => 6,
            BinaryOperator::Equal | BinaryOperator::NotEqual => 7,
            BinaryOperator::And => 11,
            BinaryOperator::Or => 12,
        }
    }
    pub fn is_arithmetic(self: &Self) -> bool {
        matches!(self, BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Rem)
    }
    pub fn is_ordering(self: &Self) -> bool {
        matches!(self, BinaryOperator::Less | BinaryOperator::Greater | BinaryOperator::LessOrEq | BinaryOperator::GreaterOrEq)
    }
    pub fn is_equality(self: &Self) -> bool {
        matches!(self, BinaryOperator::Equal | BinaryOperator::NotEqual)
    }
    pub fn is_boolean(self: &Self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

impl Display for BinaryOperator {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            BinaryOperator::Add         => "+",
            BinaryOperator::Sub         => "-",
            BinaryOperator::Mul         => "*",
            BinaryOperator::Div         => "/",
            BinaryOperator::Rem         => "%",
            BinaryOperator::Less        => "<",
            BinaryOperator::Greater     => ">",
            BinaryOperator::LessOrEq    => "<=",
            BinaryOperator::GreaterOrEq => ">=",
            BinaryOperator::Equal       => "==",
            BinaryOperator::NotEqual    => "!=",
            BinaryOperator::And         => "and",
            BinaryOperator::Or          => "or",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BinaryOp {
    pub position: Position,
    pub op      : BinaryOperator,
    pub left    : Expression,
    pub right   : Expression,
}

/// A literal or a reference.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// String literal as written between the quotes, escapes included.
    String(String),
    Real(f64),
    Integer(i64),
    Natural(u64),
    Boolean(bool),
    Ref(ValueRef),
}

/// A possibly chained access path, e.g. `a(1)[2].b`.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueRef {
    pub position: Position,
    pub ident   : Ident,
    /// Call arguments. Present if the segment is a call.
    pub args    : Option<Vec<Expression>>,
    /// Index expressions, each unwrapping one vector level.
    pub indices : Vec<Expression>,
    /// Following `.member` or `.method()` segment.
    pub next    : Option<Box<ValueRef>>,
}

impl ValueRef {
    pub fn name(self: &Self) -> &str {
        &self.ident.name
    }
    pub fn is_call(self: &Self) -> bool {
        self.args.is_some()
    }
    /// Iterates over this segment and all following segments.
    pub fn segments(self: &Self) -> impl Iterator<Item=&ValueRef> {
        std::iter::successors(Some(self), |segment| segment.next.as_deref())
    }
    /// Whether the path denotes storage, i.e. it contains no calls.
    pub fn is_storage(self: &Self) -> bool {
        self.segments().all(|segment| !segment.is_call())
    }
}

/// A single statement within a function or procedure body.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    Print(Print),
    Read(ValueRef),
    Return(Return),
    FlowControl(FlowControl),
    Expression(Expression),
    Assignment(Assignment),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Print {
    pub position: Position,
    pub exprs   : Vec<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Return {
    pub position: Position,
    pub expr    : Expression,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub position: Position,
    pub target  : ValueRef,
    pub value   : Expression,
}

/// Structured control flow.
#[derive(Clone, Debug, PartialEq)]
pub enum FlowControl {
    If(IfBlock),
    While(WhileLoop),
    Loop(LoopUntil),
    For(ForLoop),
    On(OnGuard),
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfBlock {
    pub position    : Position,
    pub cond        : Expression,
    pub body        : Vec<Instruction>,
    pub elsifs      : Vec<ElsIf>,
    pub else_body   : Option<Vec<Instruction>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ElsIf {
    pub position: Position,
    pub cond    : Expression,
    pub body    : Vec<Instruction>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileLoop {
    pub position: Position,
    pub cond    : Expression,
    pub body    : Vec<Instruction>,
}

/// Body runs at least once and repeats until the condition holds.
#[derive(Clone, Debug, PartialEq)]
pub struct LoopUntil {
    pub position: Position,
    pub body    : Vec<Instruction>,
    pub until   : Expression,
}

/// Counting loop over the inclusive range `from` to `to`.
#[derive(Clone, Debug, PartialEq)]
pub struct ForLoop {
    pub position: Position,
    pub iter    : Ident,
    pub from    : Expression,
    pub to      : Expression,
    pub body    : Vec<Instruction>,
}

/// Runs a single instruction if the condition holds.
#[derive(Clone, Debug, PartialEq)]
pub struct OnGuard {
    pub position    : Position,
    pub cond        : Expression,
    pub instruction : Box<Instruction>,
}
