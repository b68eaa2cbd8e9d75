//! Builtin vector methods.

use crate::frontend::ast::Type;

/// Kind of a builtin parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Param {
    /// A position within the vector. Accepts integer or natural.
    Index,
    /// A value of the vector's element type.
    Element,
}

/// What a builtin call evaluates to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Yields {
    Nothing,
    Element,
    Size,
}

/// Signature of a builtin vector method.
#[derive(Debug)]
pub struct Builtin {
    pub name    : &'static str,
    pub params  : &'static [Param],
    pub yields  : Yields,
    /// Whether the method modifies the vector.
    pub mutates : bool,
}

impl Builtin {
    /// Result type when invoked on a vector of the given element type.
    pub fn result(self: &Self, element: &Type) -> Option<Type> {
        match self.yields {
            Yields::Nothing => None,
            Yields::Element => Some(element.clone()),
            Yields::Size => Some(Type::Natural),
        }
    }
}

pub const BUILTINS: &[Builtin] = &[
    Builtin { name: "push",     params: &[ Param::Element ],                yields: Yields::Nothing,    mutates: true },
    Builtin { name: "insert",   params: &[ Param::Index, Param::Element ],  yields: Yields::Nothing,    mutates: true },
    Builtin { name: "remove",   params: &[ Param::Index ],                  yields: Yields::Nothing,    mutates: true },
    Builtin { name: "pop",      params: &[ ],                               yields: Yields::Element,    mutates: true },
    Builtin { name: "clear",    params: &[ ],                               yields: Yields::Nothing,    mutates: true },
    Builtin { name: "size",     params: &[ ],                               yields: Yields::Size,       mutates: false },
    Builtin { name: "at",       params: &[ Param::Index ],                  yields: Yields::Element,    mutates: false },
];

/// Looks up a builtin vector method by name.
pub fn builtin(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}
