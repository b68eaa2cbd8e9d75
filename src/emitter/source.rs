//! Canonical source formatter.

use crate::prelude::*;
use crate::frontend::ast::*;
use crate::emitter::{Render, Writer, parenthesize, real_literal};

/// Renders programs back into their own syntax. Parsing the output yields an equivalent program.
#[derive(Clone, Copy, Debug, Default)]
pub struct Source;

impl Source {
    /// Returns the text of the given expression.
    pub fn expression(self: &Self, expr: &Expression) -> String {
        match expr {
            Expression::Value(value) => match value {
                Value::String(string) => format!("\"{}\"", string),
                Value::Real(real) => real_literal(*real),
                Value::Integer(integer) => integer.to_string(),
                Value::Natural(natural) => natural.to_string(),
                Value::Boolean(boolean) => boolean.to_string(),
                Value::Ref(valref) => self.valref(valref),
            },
            Expression::UnaryOp(unary) => format!("{} {}", unary.op, self.operand(&unary.expr)),
            Expression::BinaryOp(binary) => {
                format!("{} {} {}", self.operand(&binary.left), binary.op, self.operand(&binary.right))
            }
        }
    }

    /// Returns the text of an operand. Anything but a single value is parenthesized.
    pub fn operand(self: &Self, expr: &Expression) -> String {
        parenthesize(expr, self.expression(expr))
    }

    fn symbol(self: &Self, symbol: &Symbol) -> String {
        format!("{} : {}", symbol.name(), symbol.ty)
    }

    fn function<W: Write>(self: &Self, function: &Function, w: &mut Writer<W>) -> io::Result<()> {
        let args: Vec<_> = function.args.iter().map(|arg| format!("{} {}", arg.mode, self.symbol(&arg.symbol))).collect();
        match &function.ret {
            Some(ret) => w.line(&format!("function {}({}) : {}", function.name(), args.join(", "), ret))?,
            None => w.line(&format!("procedure {}({})", function.name(), args.join(", ")))?,
        }
        w.indented(|w| {
            for local in &function.locals {
                w.line(&format!("local {}", self.symbol(local)))?;
            }
            self.block(&function.body, w)
        })?;
        w.line("end")
    }

    fn block<W: Write>(self: &Self, body: &[Instruction], w: &mut Writer<W>) -> io::Result<()> {
        for instruction in body {
            self.instruction(instruction, w)?;
        }
        Ok(())
    }

    fn instruction<W: Write>(self: &Self, instruction: &Instruction, w: &mut Writer<W>) -> io::Result<()> {
        match instruction {
            Instruction::Print(print) => {
                let exprs: Vec<_> = print.exprs.iter().map(|expr| self.expression(expr)).collect();
                w.line(&format!("print {}", exprs.join(", ")))
            }
            Instruction::Read(valref) => w.line(&format!("read {}", self.valref(valref))),
            Instruction::Return(ret) => w.line(&format!("return {}", self.expression(&ret.expr))),
            Instruction::Expression(expr) => w.line(&self.expression(expr)),
            Instruction::Assignment(assignment) => {
                w.line(&format!("{} = {}", self.valref(&assignment.target), self.expression(&assignment.value)))
            }
            Instruction::FlowControl(flow) => self.flow_control(flow, w),
        }
    }

    fn flow_control<W: Write>(self: &Self, flow: &FlowControl, w: &mut Writer<W>) -> io::Result<()> {
        match flow {
            FlowControl::If(if_block) => {
                w.line(&format!("if {} then", self.expression(&if_block.cond)))?;
                w.indented(|w| self.block(&if_block.body, w))?;
                for elsif in &if_block.elsifs {
                    w.line(&format!("elsif {} then", self.expression(&elsif.cond)))?;
                    w.indented(|w| self.block(&elsif.body, w))?;
                }
                if let Some(else_body) = &if_block.else_body {
                    w.line("else")?;
                    w.indented(|w| self.block(else_body, w))?;
                }
                w.line("endif")
            }
            FlowControl::While(while_loop) => {
                w.line(&format!("while {}", self.expression(&while_loop.cond)))?;
                w.indented(|w| self.block(&while_loop.body, w))?;
                w.line("endwhile")
            }
            FlowControl::Loop(loop_until) => {
                w.line("loop")?;
                w.indented(|w| self.block(&loop_until.body, w))?;
                w.line(&format!("until {}", self.expression(&loop_until.until)))
            }
            FlowControl::For(for_loop) => {
                w.line(&format!("for {} in {} to {} do", for_loop.iter, self.expression(&for_loop.from), self.expression(&for_loop.to)))?;
                w.indented(|w| self.block(&for_loop.body, w))?;
                w.line("endfor")
            }
            FlowControl::On(on_guard) => {
                // the guarded instruction continues the line
                w.write(&format!("on {} do ", self.expression(&on_guard.cond)))?;
                self.instruction(&on_guard.instruction, w)
            }
        }
    }

    fn valref(self: &Self, valref: &ValueRef) -> String {
        let mut text = String::new();
        for (index, segment) in valref.segments().enumerate() {
            if index > 0 {
                text.push('.');
            }
            text.push_str(segment.name());
            if let Some(args) = &segment.args {
                let args: Vec<_> = args.iter().map(|arg| self.expression(arg)).collect();
                text.push_str(&format!("({})", args.join(", ")));
            }
            for index in &segment.indices {
                text.push_str(&format!("[{}]", self.expression(index)));
            }
        }
        text
    }
}

impl Render for Source {
    fn program<W: Write>(self: &Self, program: &Program, w: &mut Writer<W>) -> io::Result<()> {
        w.line(&format!("program {}", program.name()))?;
        for structure in &program.structures {
            w.newline()?;
            w.line(&format!("structure {}", structure.ident))?;
            w.indented(|w| {
                for member in &structure.members {
                    w.line(&self.symbol(member))?;
                }
                Ok(())
            })?;
            w.line("end")?;
        }
        if !program.constants.is_empty() || !program.globals.is_empty() {
            w.newline()?;
        }
        for constant in &program.constants {
            w.line(&format!("constant {} = {}", self.symbol(&constant.symbol), self.expression(&constant.value)))?;
        }
        for global in &program.globals {
            w.line(&format!("global {}", self.symbol(global)))?;
        }
        for function in program.functions.iter().chain(program.procedures.iter()) {
            w.newline()?;
            self.function(function, w)?;
        }
        Ok(())
    }
}
