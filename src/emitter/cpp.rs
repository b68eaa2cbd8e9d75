//! C++ renderer.

use std::borrow::Cow;
use crate::prelude::*;
use crate::config::{BUILTIN_PREFIX, TARGET_ENTRY, target_types};
use crate::frontend::ast::*;
use crate::frontend::resolver::{context::Context, coercion};
use crate::emitter::{Render, Writer, EmitOptions, parenthesize, real_literal};

const INCLUDES: &[&str] = &[ "iostream", "string", "vector" ];

/// Template helpers backing the builtin vector methods. The value parameters are not deduced so that
/// literals convert to the element type.
const PRELUDE: &[&str] = &[
    "template <typename T> using algo_elem = typename std::vector<T>::value_type;",
    "template <typename T> void algo_push(std::vector<T>& v, const algo_elem<T>& x) { v.push_back(x); }",
    "template <typename T> void algo_insert(std::vector<T>& v, unsigned long long i, const algo_elem<T>& x) { v.insert(v.begin() + i, x); }",
    "template <typename T> void algo_remove(std::vector<T>& v, unsigned long long i) { v.erase(v.begin() + i); }",
    "template <typename T> T algo_pop(std::vector<T>& v) { T x = v.back(); v.pop_back(); return x; }",
    "template <typename T> void algo_clear(std::vector<T>& v) { v.clear(); }",
    "template <typename T> unsigned long long algo_size(const std::vector<T>& v) { return v.size(); }",
    "template <typename T> const T& algo_at(const std::vector<T>& v, unsigned long long i) { return v.at(i); }",
];

/// Words that are valid identifiers in the source language but reserved in C++.
const RESERVED: &[&str] = &[
    "alignas", "alignof", "asm", "auto", "bool", "break", "case", "catch", "class", "const", "constexpr",
    "const_cast", "continue", "decltype", "default", "delete", "double", "dynamic_cast", "enum", "explicit",
    "export", "extern", "float", "friend", "goto", "inline", "int", "long", "mutable", "namespace", "new",
    "noexcept", "nullptr", "operator", "private", "protected", "public", "register", "reinterpret_cast",
    "short", "signed", "sizeof", "static", "static_assert", "static_cast", "struct", "switch", "template",
    "this", "throw", "try", "typedef", "typeid", "typename", "union", "unsigned", "using", "virtual",
    "void", "volatile", "wchar_t", "xor", "xor_eq", "and_eq", "or_eq", "not_eq", "bitand", "bitor", "compl",
    "char8_t", "char16_t", "char32_t", "thread_local", "concept", "requires", "co_await", "co_yield",
    "co_return", "consteval", "constinit", "std", "argc", "argv",
];

/// Renders programs as a single C++17 translation unit.
#[derive(Clone, Debug)]
pub struct Cpp {
    prelude: bool,
}

impl Cpp {
    pub fn new(options: &EmitOptions) -> Self {
        Cpp { prelude: options.prelude }
    }

    /// Target name of a source identifier.
    fn name<'a>(self: &Self, name: &'a str) -> Cow<'a, str> {
        if RESERVED.contains(&name) || name == TARGET_ENTRY || name.starts_with(BUILTIN_PREFIX) {
            Cow::Owned(format!("{}_", name))
        } else {
            Cow::Borrowed(name)
        }
    }

    fn ty(self: &Self, ty: &Type) -> String {
        match ty {
            Type::Boolean           => target_types::BOOLEAN.to_string(),
            Type::Integer           => target_types::INTEGER.to_string(),
            Type::Natural           => target_types::NATURAL.to_string(),
            Type::Real              => target_types::REAL.to_string(),
            Type::Char              => target_types::CHAR.to_string(),
            Type::String            => target_types::STRING.to_string(),
            Type::Vector(element)   => format!("{}<{}>", target_types::VECTOR, self.ty(element)),
            Type::Structure(name)   => self.name(name).into_owned(),
        }
    }

    /// Declaration of a variable or parameter, e.g. `const std::string& name`.
    fn declaration(self: &Self, symbol: &Symbol) -> String {
        format!("{} {}", self.ty(&symbol.ty), self.name(symbol.name()))
    }

    fn parameter(self: &Self, argument: &Argument) -> String {
        let ty = self.ty(&argument.symbol.ty);
        let name = self.name(argument.symbol.name());
        match argument.mode {
            PassingMode::Out | PassingMode::InOut => format!("{}& {}", ty, name),
            PassingMode::In if argument.symbol.ty.is_scalar() && argument.symbol.ty != Type::String => format!("{} {}", ty, name),
            PassingMode::In => format!("const {}& {}", ty, name),
        }
    }

    fn signature(self: &Self, function: &Function) -> String {
        let ret = function.ret.as_ref().map_or("void".to_string(), |ret| self.ty(ret));
        let params: Vec<_> = function.args.iter().map(|arg| self.parameter(arg)).collect();
        format!("{} {}({})", ret, self.name(function.name()), params.join(", "))
    }

    fn structure<W: Write>(self: &Self, structure: &Structure, w: &mut Writer<W>) -> io::Result<()> {
        w.line(&format!("struct {} {{", self.name(structure.ident.as_str())))?;
        w.indented(|w| {
            for member in &structure.members {
                w.line(&format!("{}{{}};", self.declaration(member)))?;
            }
            Ok(())
        })?;
        w.line("};")
    }

    fn function<W: Write>(self: &Self, cx: &Context, function: &Function, w: &mut Writer<W>) -> io::Result<()> {
        w.line(&format!("{} {{", self.signature(function)))?;
        w.indented(|w| {
            for local in &function.locals {
                w.line(&format!("{}{{}};", self.declaration(local)))?;
            }
            self.block(cx, &function.body, w)
        })?;
        w.line("}")
    }

    fn block<W: Write>(self: &Self, cx: &Context, body: &[Instruction], w: &mut Writer<W>) -> io::Result<()> {
        for instruction in body {
            self.instruction(cx, instruction, w)?;
        }
        Ok(())
    }

    fn instruction<W: Write>(self: &Self, cx: &Context, instruction: &Instruction, w: &mut Writer<W>) -> io::Result<()> {
        match instruction {
            Instruction::Print(print) => {
                w.write("std::cout")?;
                for expr in &print.exprs {
                    write!(w, " << {}", self.operand(cx, expr))?;
                }
                w.line(";")
            }
            Instruction::Read(valref) => w.line(&format!("std::cin >> {};", self.valref(cx, valref))),
            Instruction::Return(ret) => w.line(&format!("return {};", self.expression(cx, &ret.expr))),
            Instruction::Expression(expr) => w.line(&format!("{};", self.expression(cx, expr))),
            Instruction::Assignment(assignment) => {
                w.line(&format!("{} = {};", self.valref(cx, &assignment.target), self.expression(cx, &assignment.value)))
            }
            Instruction::FlowControl(flow) => self.flow_control(cx, flow, w),
        }
    }

    fn flow_control<W: Write>(self: &Self, cx: &Context, flow: &FlowControl, w: &mut Writer<W>) -> io::Result<()> {
        match flow {
            FlowControl::If(if_block) => {
                w.line(&format!("if ({}) {{", self.expression(cx, &if_block.cond)))?;
                w.indented(|w| self.block(cx, &if_block.body, w))?;
                for elsif in &if_block.elsifs {
                    w.line(&format!("}} else if ({}) {{", self.expression(cx, &elsif.cond)))?;
                    w.indented(|w| self.block(cx, &elsif.body, w))?;
                }
                if let Some(else_body) = &if_block.else_body {
                    w.line("} else {")?;
                    w.indented(|w| self.block(cx, else_body, w))?;
                }
                w.line("}")
            }
            FlowControl::While(while_loop) => {
                w.line(&format!("while ({}) {{", self.expression(cx, &while_loop.cond)))?;
                w.indented(|w| self.block(cx, &while_loop.body, w))?;
                w.line("}")
            }
            FlowControl::Loop(loop_until) => {
                w.line("do {")?;
                w.indented(|w| self.block(cx, &loop_until.body, w))?;
                w.line(&format!("}} while (!({}));", self.expression(cx, &loop_until.until)))
            }
            FlowControl::For(for_loop) => {
                let iter = self.name(for_loop.iter.as_str());
                // the bound comparison converts like `iter <= to` would in the source
                let iter_ty = cx.lookup(for_loop.iter.as_str()).map(|binding| binding.ty().clone());
                let to_ty = cx.type_of(&for_loop.to).ok();
                let common = match (&iter_ty, &to_ty) {
                    (Some(iter_ty), Some(to_ty)) => coercion::operand_type(BinaryOperator::LessOrEq, iter_ty, to_ty),
                    _ => None,
                };
                let bound = self.converted(cx, &for_loop.to, to_ty.as_ref(), common.as_ref());
                let test = match self.conversion(iter_ty.as_ref(), common.as_ref()) {
                    Some(target) => format!("static_cast<{}>({})", target, iter),
                    None => iter.to_string(),
                };
                w.line(&format!("for ({iter} = {}; {} <= {}; ++{iter}) {{", self.expression(cx, &for_loop.from), test, bound, iter = iter))?;
                w.indented(|w| self.block(cx, &for_loop.body, w))?;
                w.line("}")
            }
            FlowControl::On(on_guard) => {
                w.line(&format!("if ({}) {{", self.expression(cx, &on_guard.cond)))?;
                w.indented(|w| self.instruction(cx, &on_guard.instruction, w))?;
                w.line("}")
            }
        }
    }

    /// Returns the text of the given expression.
    fn expression(self: &Self, cx: &Context, expr: &Expression) -> String {
        match expr {
            Expression::Value(value) => self.value(cx, value),
            Expression::UnaryOp(unary) => match unary.op {
                UnaryOperator::Not => format!("!{}", self.operand(cx, &unary.expr)),
            },
            Expression::BinaryOp(binary) => {
                let op = match binary.op {
                    BinaryOperator::And => "&&".to_string(),
                    BinaryOperator::Or => "||".to_string(),
                    op => op.to_string(),
                };
                let left = cx.type_of(&binary.left).ok();
                let right = cx.type_of(&binary.right).ok();
                let common = match (&left, &right) {
                    (Some(left), Some(right)) => coercion::operand_type(binary.op, left, right),
                    _ => None,
                };
                format!(
                    "{} {} {}",
                    self.converted(cx, &binary.left, left.as_ref(), common.as_ref()),
                    op,
                    self.converted(cx, &binary.right, right.as_ref(), common.as_ref())
                )
            }
        }
    }

    /// Returns the text of an operand. Anything but a single value is parenthesized.
    fn operand(self: &Self, cx: &Context, expr: &Expression) -> String {
        parenthesize(expr, self.expression(cx, expr))
    }

    /// Target type a natural operand is converted to when the operation is performed on signed or floating
    /// point values. C++ would convert the other operand to unsigned instead.
    fn conversion(self: &Self, ty: Option<&Type>, common: Option<&Type>) -> Option<String> {
        match (ty, common) {
            (Some(Type::Natural), Some(common @ (Type::Integer | Type::Real))) => Some(self.ty(common)),
            _ => None,
        }
    }

    /// Returns the text of an operand converted to the type the operation is performed in.
    fn converted(self: &Self, cx: &Context, expr: &Expression, ty: Option<&Type>, common: Option<&Type>) -> String {
        match self.conversion(ty, common) {
            Some(target) => format!("static_cast<{}>({})", target, self.expression(cx, expr)),
            None => self.operand(cx, expr),
        }
    }

    fn value(self: &Self, cx: &Context, value: &Value) -> String {
        match value {
            Value::String(string) => format!("\"{}\"s", string),
            Value::Real(real) => real_literal(*real),
            Value::Integer(i64::MIN) => format!("({}LL - 1)", i64::MIN + 1),
            Value::Integer(integer) => format!("{}LL", integer),
            Value::Natural(natural) => format!("{}ULL", natural),
            Value::Boolean(boolean) => boolean.to_string(),
            Value::Ref(valref) => self.valref(cx, valref),
        }
    }

    fn arguments(self: &Self, cx: &Context, args: &[Expression]) -> String {
        args.iter().map(|arg| self.expression(cx, arg)).collect::<Vec<_>>().join(", ")
    }

    fn indices(self: &Self, cx: &Context, text: &mut String, segment: &ValueRef) {
        for index in &segment.indices {
            text.push_str(&format!(".at({})", self.expression(cx, index)));
        }
    }

    /// Renders a reference chain. Builtin method calls wrap everything preceding them.
    fn valref(self: &Self, cx: &Context, valref: &ValueRef) -> String {
        let mut text = self.name(valref.name()).into_owned();
        if let Some(args) = &valref.args {
            text.push_str(&format!("({})", self.arguments(cx, args)));
        }
        self.indices(cx, &mut text, valref);
        let mut segment = valref;
        while let Some(next) = segment.next.as_deref() {
            text = match &next.args {
                Some(args) if args.is_empty() => format!("{}{}({})", BUILTIN_PREFIX, next.name(), text),
                Some(args) => format!("{}{}({}, {})", BUILTIN_PREFIX, next.name(), text, self.arguments(cx, args)),
                None => format!("{}.{}", text, self.name(next.name())),
            };
            self.indices(cx, &mut text, next);
            segment = next;
        }
        text
    }
}

impl Render for Cpp {
    fn program<W: Write>(self: &Self, program: &Program, w: &mut Writer<W>) -> io::Result<()> {
        for include in INCLUDES {
            w.line(&format!("#include <{}>", include))?;
        }
        w.newline()?;
        w.line("using namespace std::string_literals;")?;
        if self.prelude {
            w.newline()?;
            for line in PRELUDE {
                w.line(line)?;
            }
        }
        for structure in &program.structures {
            w.newline()?;
            self.structure(structure, w)?;
        }
        if !program.constants.is_empty() || !program.globals.is_empty() {
            w.newline()?;
        }
        let cx = Context::new(program, None);
        for constant in &program.constants {
            w.line(&format!("const {} = {};", self.declaration(&constant.symbol), self.expression(&cx, &constant.value)))?;
        }
        for global in &program.globals {
            w.line(&format!("{}{{}};", self.declaration(global)))?;
        }
        let functions: Vec<_> = program.functions.iter().chain(program.procedures.iter()).collect();
        if !functions.is_empty() {
            w.newline()?;
        }
        for function in &functions {
            w.line(&format!("{};", self.signature(function)))?;
        }
        for function in &functions {
            w.newline()?;
            self.function(&Context::new(program, Some(*function)), function, w)?;
        }
        w.newline()?;
        w.line(&format!("int {}(int argc, char** argv) {{", TARGET_ENTRY))?;
        w.indented(|w| {
            w.line("std::cout << std::boolalpha;")?;
            w.line(&format!("{}<{}> args(argv + 1, argv + argc);", target_types::VECTOR, target_types::STRING))?;
            w.line(&format!("return static_cast<int>({}(args));", self.name(program.name())))
        })?;
        w.line("}")
    }
}
