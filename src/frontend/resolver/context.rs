//! Identifier and expression type lookup.

use crate::frontend::ast::*;
use crate::frontend::resolver::{builtins::{self, Param}, coercion, error::{ResolveError, ResolveErrorKind as Kind, ResolveResult}};

/// What an identifier resolved to.
#[derive(Copy, Clone, Debug)]
pub enum Binding<'a> {
    Argument(&'a Argument),
    Local(&'a Symbol),
    Global(&'a Symbol),
    Constant(&'a Constant),
}

impl<'a> Binding<'a> {
    pub fn ty(self: &Self) -> &'a Type {
        match *self {
            Binding::Argument(argument) => &argument.symbol.ty,
            Binding::Local(symbol) | Binding::Global(symbol) => &symbol.ty,
            Binding::Constant(constant) => &constant.symbol.ty,
        }
    }
    /// Whether the binding may be assigned to or mutated.
    pub fn is_writable(self: &Self) -> bool {
        match self {
            Binding::Argument(argument) => argument.mode.is_writable(),
            Binding::Local(_) | Binding::Global(_) => true,
            Binding::Constant(_) => false,
        }
    }
}

/// Read-only view of the program and, within a body, the function being resolved.
#[derive(Copy, Clone, Debug)]
pub struct Context<'a> {
    program : &'a Program,
    function: Option<&'a Function>,
}

impl<'a> Context<'a> {
    pub fn new(program: &'a Program, function: Option<&'a Function>) -> Self {
        Context { program, function }
    }
    pub fn program(self: &Self) -> &'a Program {
        self.program
    }
    pub fn function(self: &Self) -> Option<&'a Function> {
        self.function
    }

    /// Resolves an identifier. Arguments shadow locals, locals shadow globals, globals shadow constants.
    pub fn lookup(self: &Self, name: &str) -> Option<Binding<'a>> {
        let function = self.function;
        function.and_then(|f| f.argument(name)).map(Binding::Argument)
            .or_else(|| function.and_then(|f| f.local(name)).map(Binding::Local))
            .or_else(|| self.program.global(name).map(Binding::Global))
            .or_else(|| self.program.constant(name).map(Binding::Constant))
    }

    /// Whether the given reference denotes storage that may be written to.
    pub fn is_writable(self: &Self, valref: &ValueRef) -> bool {
        valref.is_storage() && self.lookup(valref.name()).map_or(false, |binding| binding.is_writable())
    }

    /// Resolves the type of an expression that is required to yield a value.
    pub fn type_of(self: &Self, expr: &Expression) -> ResolveResult<Type> {
        match expr {
            Expression::Value(value) => self.type_of_value(value),
            Expression::UnaryOp(unary) => {
                let ty = self.type_of(&unary.expr)?;
                coercion::unary_result(unary.op, &ty)
                    .ok_or_else(|| ResolveError::new(unary.as_ref(), Kind::InvalidOperand { op: unary.op, ty }))
            }
            Expression::BinaryOp(binary) => {
                let left = self.type_of(&binary.left)?;
                let right = self.type_of(&binary.right)?;
                coercion::binary_result(binary.op, &left, &right)
                    .ok_or_else(|| ResolveError::new(binary.as_ref(), Kind::InvalidOperands { op: binary.op, left, right }))
            }
        }
    }

    fn type_of_value(self: &Self, value: &Value) -> ResolveResult<Type> {
        Ok(match value {
            Value::String(_) => Type::String,
            Value::Real(_) => Type::Real,
            Value::Integer(_) => Type::Integer,
            Value::Natural(_) => Type::Natural,
            Value::Boolean(_) => Type::Boolean,
            Value::Ref(valref) => {
                self.type_of_valref(valref)?
                    .ok_or_else(|| ResolveError::new(valref, Kind::NoValue(valref.name().to_string())))?
            }
        })
    }

    /// Checks that an expression yields a value acceptable for the expected type.
    pub fn expect_type(self: &Self, expr: &Expression, expected: &Type, fallback: Position) -> ResolveResult<Type> {
        let given = self.type_of(expr)?;
        if coercion::accepts(expected, &given) {
            Ok(given)
        } else {
            Err(ResolveError::at(expr.position().unwrap_or(fallback), Kind::TypeMismatch { expected: expected.clone(), given }))
        }
    }

    /// Resolves the type of a possibly chained reference. Returns None if the last segment is a call that
    /// does not yield a value.
    pub fn type_of_valref(self: &Self, valref: &ValueRef) -> ResolveResult<Option<Type>> {
        let (mut ty, mut writable) = match &valref.args {
            Some(args) => (self.call(valref, args)?, false),
            None => {
                let binding = self.lookup(valref.name())
                    .ok_or_else(|| ResolveError::new(&valref.ident, Kind::UndefinedIdentifier(valref.name().to_string())))?;
                (Some(binding.ty().clone()), binding.is_writable())
            }
        };
        ty = self.apply_indices(valref, ty)?;
        let mut segment = valref;
        while let Some(next) = segment.next.as_deref() {
            let current = ty.ok_or_else(|| ResolveError::new(segment, Kind::NoValue(segment.name().to_string())))?;
            ty = match &next.args {
                Some(args) => {
                    let result = self.method(next, &current, args, writable)?;
                    writable = false;
                    result
                }
                None => Some(self.member(next, &current)?.clone()),
            };
            ty = self.apply_indices(next, ty)?;
            segment = next;
        }
        Ok(ty)
    }

    /// Unwraps one vector level per index of the given segment.
    fn apply_indices(self: &Self, segment: &ValueRef, mut ty: Option<Type>) -> ResolveResult<Option<Type>> {
        for index in &segment.indices {
            let current = ty.ok_or_else(|| ResolveError::new(segment, Kind::NoValue(segment.name().to_string())))?;
            let element = current.element()
                .ok_or_else(|| ResolveError::new(segment, Kind::NotAVector(current.clone())))?;
            self.expect_index(index, segment)?;
            ty = Some(element.clone());
        }
        Ok(ty)
    }

    fn expect_index(self: &Self, index: &Expression, segment: &ValueRef) -> ResolveResult {
        let given = self.type_of(index)?;
        if given.is_integral() {
            Ok(())
        } else {
            Err(ResolveError::at(index.position().unwrap_or(segment.position), Kind::TypeMismatch { expected: Type::Integer, given }))
        }
    }

    /// Resolves a structure member access.
    fn member(self: &Self, segment: &ValueRef, ty: &Type) -> ResolveResult<&'a Type> {
        let structure = ty.structure()
            .ok_or_else(|| ResolveError::new(segment, Kind::NotAStructure { ty: ty.clone(), member: segment.name().to_string() }))?;
        let definition = self.program.structure(structure)
            .ok_or_else(|| ResolveError::new(segment, Kind::UndefinedStructure(structure.to_string())))?;
        definition.member(segment.name())
            .map(|member| &member.ty)
            .ok_or_else(|| ResolveError::new(segment, Kind::UndefinedMember { structure: structure.to_string(), member: segment.name().to_string() }))
    }

    /// Resolves a builtin method call on the given receiver type.
    fn method(self: &Self, segment: &ValueRef, receiver: &Type, args: &[Expression], writable: bool) -> ResolveResult<Option<Type>> {
        let undefined = || ResolveError::new(segment, Kind::UndefinedMethod { ty: receiver.clone(), name: segment.name().to_string() });
        let element = receiver.element().ok_or_else(undefined)?;
        let builtin = builtins::builtin(segment.name()).ok_or_else(undefined)?;
        if builtin.params.len() != args.len() {
            return Err(ResolveError::new(segment, Kind::NumberOfArguments { name: builtin.name.to_string(), expected: builtin.params.len(), given: args.len() }));
        }
        for (param, arg) in builtin.params.iter().zip(args) {
            match param {
                Param::Index => self.expect_index(arg, segment)?,
                Param::Element => { self.expect_type(arg, element, segment.position)?; }
            }
        }
        if builtin.mutates && !writable {
            return Err(ResolveError::new(segment, Kind::NotWritable(segment.name().to_string())));
        }
        Ok(builtin.result(element))
    }

    /// Resolves a call to a user function or procedure.
    fn call(self: &Self, segment: &ValueRef, args: &[Expression]) -> ResolveResult<Option<Type>> {
        let callee = self.program.function(segment.name())
            .or_else(|| self.program.procedure(segment.name()))
            .ok_or_else(|| ResolveError::new(&segment.ident, Kind::UndefinedFunction(segment.name().to_string())))?;
        if callee.args.len() != args.len() {
            return Err(ResolveError::new(segment, Kind::NumberOfArguments { name: callee.name().to_string(), expected: callee.args.len(), given: args.len() }));
        }
        for (param, arg) in callee.args.iter().zip(args) {
            if param.mode.is_writable() {
                // passed by reference, must be storage of the exact type
                let target = arg.as_valref().filter(|valref| self.is_writable(valref))
                    .ok_or_else(|| ResolveError::at(arg.position().unwrap_or(segment.position), Kind::NotWritable(param.symbol.name().to_string())))?;
                let given = self.type_of_valref(target)?
                    .ok_or_else(|| ResolveError::new(target, Kind::NoValue(target.name().to_string())))?;
                if given != param.symbol.ty {
                    return Err(ResolveError::new(target, Kind::TypeMismatch { expected: param.symbol.ty.clone(), given }));
                }
            } else {
                self.expect_type(arg, &param.symbol.ty, segment.position)?;
            }
        }
        Ok(callee.ret.clone())
    }
}
