//! AST type checker and resolver.

pub mod error;
pub mod context;
pub mod coercion;
pub mod builtins;

use std::collections::HashSet;
use tracing::{debug, trace};
use crate::config::TARGET_ENTRY;
use crate::frontend::ast::*;
use crate::frontend::resolver::context::Context;
use crate::frontend::resolver::error::ResolveErrorKind as Kind;

pub use error::{Diagnostics, ResolveError, ResolveErrorKind, ResolveResult};

/// Temporary internal state during program validation.
struct Resolver<'a> {
    program     : &'a Program,
    /// Errors found so far.
    diagnostics : Diagnostics,
}

/// Validates the given program AST structure.
///
/// Resolution continues after an error so that all errors of a program are reported at once. The check
/// does not modify the program and may be repeated.
///
/// ```
/// let program = algoc::parse("
/// program demo
///
/// function demo(in args : vector of string) : integer
///     return true
/// end
/// ").unwrap();
/// let diagnostics = algoc::resolve(&program).unwrap_err();
/// assert_eq!(diagnostics.len(), 1);
/// ```
#[tracing::instrument(skip_all, fields(program = program.name()))]
pub fn resolve(program: &Program) -> Result<(), Diagnostics> {
    let mut resolver = Resolver { program, diagnostics: Diagnostics::default() };
    resolver.check_program();
    debug!(errors = resolver.diagnostics.len(), "resolved program");
    resolver.diagnostics.into_result()
}

impl<'a> Resolver<'a> {

    /// Records the error of a failed check.
    fn report<T>(self: &mut Self, result: ResolveResult<T>) {
        if let Err(error) = result {
            self.push(error);
        }
    }

    fn error(self: &mut Self, item: &impl Positioned, kind: ResolveErrorKind) {
        self.push(ResolveError::new(item, kind));
    }

    fn push(self: &mut Self, error: ResolveError) {
        trace!(%error, "resolve error");
        self.diagnostics.push(error);
    }

    fn check_program(self: &mut Self) {
        let program = self.program;
        if program.name() == TARGET_ENTRY {
            self.error(&program.ident, Kind::ReservedProgramName(program.name().to_string()));
        }
        // program level names share one namespace
        let names = program.structures.iter().map(|s| &s.ident)
            .chain(program.constants.iter().map(|c| &c.symbol.ident))
            .chain(program.globals.iter().map(|g| &g.ident))
            .chain(program.functions.iter().map(|f| &f.ident))
            .chain(program.procedures.iter().map(|p| &p.ident));
        self.check_unique(names);
        for structure in &program.structures {
            self.check_unique(structure.members.iter().map(|m| &m.ident));
            for member in &structure.members {
                self.check_type(&member.ident, &member.ty);
            }
        }
        for (index, constant) in program.constants.iter().enumerate() {
            self.check_constant(index, constant);
        }
        for global in &program.globals {
            self.check_type(&global.ident, &global.ty);
        }
        for function in program.functions.iter().chain(program.procedures.iter()) {
            self.check_function(function);
        }
        self.check_entry();
    }

    /// Reports every identifier whose name was already used by a previous one.
    fn check_unique(self: &mut Self, idents: impl Iterator<Item=&'a Ident>) {
        let mut seen = HashSet::new();
        for ident in idents {
            if !seen.insert(ident.as_str()) {
                self.error(ident, Kind::Duplicate(ident.name.clone()));
            }
        }
    }

    /// Checks that all structures referenced by the type are defined.
    fn check_type(self: &mut Self, item: &impl Positioned, ty: &Type) {
        match ty {
            Type::Vector(element) => self.check_type(item, element),
            Type::Structure(name) if self.program.structure(name).is_none() => {
                self.error(item, Kind::UndefinedStructure(name.clone()));
            }
            _ => { }
        }
    }

    fn check_constant(self: &mut Self, index: usize, constant: &'a Constant) {
        let program = self.program;
        self.check_type(&constant.symbol.ident, &constant.symbol.ty);
        let result = check_constant_expression(&constant.value, &program.constants[..index])
            .and_then(|_| Context::new(program, None).expect_type(&constant.value, &constant.symbol.ty, constant.symbol.ident.position));
        self.report(result);
    }

    fn check_function(self: &mut Self, function: &'a Function) {
        debug!(function = function.name(), "resolving function");
        let names = function.args.iter().map(|a| &a.symbol.ident).chain(function.locals.iter().map(|l| &l.ident));
        self.check_unique(names);
        let program = self.program;
        for symbol in function.args.iter().map(|a| &a.symbol).chain(function.locals.iter()) {
            let name = symbol.name();
            if program.structure(name).is_some() || program.function(name).is_some() || program.procedure(name).is_some() {
                self.error(&symbol.ident, Kind::ShadowsDeclaration(name.to_string()));
            }
            self.check_type(&symbol.ident, &symbol.ty);
        }
        if let Some(ret) = &function.ret {
            self.check_type(&function.ident, ret);
        }
        let context = Context::new(self.program, Some(function));
        self.check_body(&context, &function.body);
    }

    /// Checks the signature of the entry function.
    fn check_entry(self: &mut Self) {
        let program = self.program;
        let entry = match program.entry_function() {
            Some(entry) => entry,
            None => return self.error(&program.ident, Kind::MissingEntry(program.name().to_string())),
        };
        let valid = match entry.args.as_slice() {
            [ arg ] => arg.mode == PassingMode::In && arg.symbol.ty == Type::vector_of(Type::String),
            _ => false,
        };
        if !valid || entry.ret != Some(Type::Integer) {
            self.error(&entry.ident, Kind::InvalidEntrySignature(entry.name().to_string()));
        }
    }

    fn check_body(self: &mut Self, context: &Context<'a>, body: &[Instruction]) {
        for instruction in body {
            self.check_instruction(context, instruction);
        }
    }

    fn check_instruction(self: &mut Self, context: &Context<'a>, instruction: &Instruction) {
        match instruction {
            Instruction::Print(print) => {
                for expr in &print.exprs {
                    let result = context.type_of(expr).and_then(|ty| expect_scalar(expr.position().unwrap_or(print.position), ty));
                    self.report(result);
                }
            }
            Instruction::Read(valref) => {
                let result = check_writable(context, valref).and_then(|ty| expect_scalar(valref.position, ty));
                self.report(result);
            }
            Instruction::Return(ret) => {
                let result = match context.function().and_then(|f| f.ret.as_ref()) {
                    Some(ty) => context.expect_type(&ret.expr, ty, ret.position).map(|_| ()),
                    None => {
                        let name = context.function().map_or(String::new(), |f| f.name().to_string());
                        Err(ResolveError::new(ret, Kind::ReturnInProcedure(name)))
                    }
                };
                self.report(result);
            }
            Instruction::Expression(expr) => {
                let result = match expr.as_valref() {
                    Some(valref) if is_call_path(valref) => context.type_of_valref(valref).map(|_| ()),
                    _ => Err(ResolveError::at(expr.position().unwrap_or_default(), Kind::NotAnInstruction)),
                };
                self.report(result);
            }
            Instruction::Assignment(assignment) => {
                let result = check_writable(context, &assignment.target)
                    .and_then(|ty| context.expect_type(&assignment.value, &ty, assignment.position));
                self.report(result);
            }
            Instruction::FlowControl(flow) => self.check_flow_control(context, flow),
        }
    }

    fn check_flow_control(self: &mut Self, context: &Context<'a>, flow: &FlowControl) {
        match flow {
            FlowControl::If(if_block) => {
                self.check_condition(context, &if_block.cond, if_block.position);
                self.check_body(context, &if_block.body);
                for elsif in &if_block.elsifs {
                    self.check_condition(context, &elsif.cond, elsif.position);
                    self.check_body(context, &elsif.body);
                }
                if let Some(else_body) = &if_block.else_body {
                    self.check_body(context, else_body);
                }
            }
            FlowControl::While(while_loop) => {
                self.check_condition(context, &while_loop.cond, while_loop.position);
                self.check_body(context, &while_loop.body);
            }
            FlowControl::Loop(loop_until) => {
                self.check_body(context, &loop_until.body);
                self.check_condition(context, &loop_until.until, loop_until.position);
            }
            FlowControl::For(for_loop) => {
                let valid = context.lookup(for_loop.iter.as_str())
                    .map_or(false, |binding| binding.is_writable() && binding.ty().is_integral());
                if !valid {
                    self.error(&for_loop.iter, Kind::InvalidLoopVariable(for_loop.iter.name.clone()));
                }
                for bound in [ &for_loop.from, &for_loop.to ] {
                    let result = context.type_of(bound).and_then(|given| {
                        if given.is_integral() {
                            Ok(())
                        } else {
                            Err(ResolveError::at(bound.position().unwrap_or(for_loop.position), Kind::TypeMismatch { expected: Type::Integer, given }))
                        }
                    });
                    self.report(result);
                }
                self.check_body(context, &for_loop.body);
            }
            FlowControl::On(on_guard) => {
                self.check_condition(context, &on_guard.cond, on_guard.position);
                self.check_instruction(context, &on_guard.instruction);
            }
        }
    }

    fn check_condition(self: &mut Self, context: &Context<'a>, cond: &Expression, fallback: Position) {
        let result = context.type_of(cond).and_then(|given| {
            if given == Type::Boolean {
                Ok(())
            } else {
                Err(ResolveError::at(cond.position().unwrap_or(fallback), Kind::TypeMismatch { expected: Type::Boolean, given }))
            }
        });
        self.report(result);
    }
}

/// Whether the reference ends in a call, i.e. it may be used as an instruction.
fn is_call_path(valref: &ValueRef) -> bool {
    valref.segments().last().map_or(false, |segment| segment.is_call() && segment.indices.is_empty())
}

fn expect_scalar(position: Position, ty: Type) -> ResolveResult {
    if ty.is_scalar() {
        Ok(())
    } else {
        Err(ResolveError::at(position, Kind::NotScalar(ty)))
    }
}

/// Checks that the reference is writable storage and returns its type.
fn check_writable(context: &Context<'_>, valref: &ValueRef) -> ResolveResult<Type> {
    let ty = context.type_of_valref(valref)?
        .ok_or_else(|| ResolveError::new(valref, Kind::NoValue(valref.name().to_string())))?;
    if context.is_writable(valref) {
        Ok(ty)
    } else {
        Err(ResolveError::new(valref, Kind::NotWritable(valref.name().to_string())))
    }
}

/// Checks that a constant initializer refers to nothing but previously declared constants.
fn check_constant_expression(expr: &Expression, earlier: &[Constant]) -> ResolveResult {
    match expr {
        Expression::Value(Value::Ref(valref)) => {
            let is_constant = valref.next.is_none() && valref.args.is_none() && valref.indices.is_empty()
                && earlier.iter().any(|c| c.symbol.name() == valref.name());
            if is_constant {
                Ok(())
            } else {
                Err(ResolveError::new(valref, Kind::NotConstant(valref.name().to_string())))
            }
        }
        Expression::Value(_) => Ok(()),
        Expression::UnaryOp(unary) => check_constant_expression(&unary.expr, earlier),
        Expression::BinaryOp(binary) => {
            check_constant_expression(&binary.left, earlier)?;
            check_constant_expression(&binary.right, earlier)
        }
    }
}
