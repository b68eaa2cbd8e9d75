//! Nom parsers used to generate the AST.

pub mod error;
mod nomutil;
mod types;
mod precedence;

use tracing::{debug, trace};
use nom::character::complete::{char, digit1, none_of, one_of, satisfy};
use nom::bytes::complete::{escaped, take_while};
use nom::combinator::{all_consuming, eof, map, map_opt, not, opt, peek, recognize};
use nom::multi::{many0, separated_list1};
use nom::branch::alt;
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use crate::config::MAX_IDENT_LENGTH;
use crate::frontend::ast::*;
use types::{Input, Output, Failure};
use nomutil::*;

pub use error::{ParseError, ParseErrorKind, ParseResult};

/// Words that cannot be used as identifiers.
pub const KEYWORDS: &[&str] = &[
    "program", "structure", "constant", "global", "local", "function", "procedure", "end",
    "if", "then", "elsif", "else", "endif", "while", "endwhile", "loop", "until",
    "for", "in", "to", "do", "endfor", "on", "print", "read", "return",
    "boolean", "integer", "natural", "real", "char", "string", "vector", "of",
    "true", "false", "and", "or", "not", "out", "inout",
];

/// Returns true if the given name is a reserved keyword.
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

// identifier ([a-zA-Z_][a-zA-Z0-9_]*)

fn label(i: Input<'_>) -> Output<&str> {
    map(
        recognize(pair(satisfy(is_ident_start), take_while(is_ident_char))),
        move |l: Input<'_>| *l
    )(i)
}

fn ident(i: Input<'_>) -> Output<Ident> {
    let position = i.position();
    let (remaining, name) = label(i.clone())?;
    if is_keyword(name) {
        Err(nom::Err::Error(nom::error::ParseError::from_error_kind(i, nom::error::ErrorKind::Verify)))
    } else if name.chars().count() > MAX_IDENT_LENGTH {
        Err(nom::Err::Failure(Failure { input: i, kind: ParseErrorKind::IdentifierTooLong }))
    } else {
        Ok((remaining, Ident { position, name: name.to_string() }))
    }
}

// type (integer, vector of string, my_structure)

fn inline_type(i: Input<'_>) -> Output<Type> {
    fn scalar(i: Input<'_>) -> Output<Type> {
        map_opt(
            alt((word("boolean"), word("integer"), word("natural"), word("real"), word("char"), word("string"))),
            |m: Input<'_>| Type::from_keyword(*m)
        )(i)
    }
    fn vector(i: Input<'_>) -> Output<Type> {
        map(
            preceded(
                pair(word("vector"), expect("'of' after 'vector'", preceded(sp0, word("of")))),
                expect("element type", preceded(sp0, inline_type))
            ),
            Type::vector_of
        )(i)
    }
    fn structure(i: Input<'_>) -> Output<Type> {
        let (remaining, ident) = ident(i.clone())?;
        if i.has_structure(&ident.name) {
            Ok((remaining, Type::Structure(ident.name)))
        } else {
            Err(nom::Err::Failure(Failure { input: i, kind: ParseErrorKind::UndefinedStructure(ident.name) }))
        }
    }
    alt((scalar, vector, structure))(i)
}

// name : type

fn symbol(i: Input<'_>) -> Output<Symbol> {
    map(
        tuple((ident, expect("':' after name", ws(char(':'))), expect("type", inline_type))),
        |(ident, _, ty)| Symbol { ident, ty }
    )(i)
}

// literal string ("hello \"world\"")

fn string(i: Input<'_>) -> Output<Value> {
    preceded(
        char('"'),
        expect("closing '\"'", map(
            terminated(opt(escaped(none_of("\\\"\r\n"), '\\', one_of("\"\\nrt0"))), char('"')),
            |m: Option<Input<'_>>| Value::String(m.map_or(String::new(), |m| m.to_string()))
        ))
    )(i)
}

// literal real (-3.14)

fn real(i: Input<'_>) -> Output<Value> {
    let (remaining, numerical) = terminated(
        recognize(tuple((opt(one_of("+-")), digit1, char('.'), digit1))),
        not(char('.'))
    )(i.clone())?;
    match str::parse::<f64>(*numerical) {
        Ok(float) => Ok((remaining, Value::Real(float))),
        Err(_) => Err(nom::Err::Failure(Failure { input: i, kind: ParseErrorKind::InvalidNumerical })),
    }
}

// literal integer (-42)

fn integer(i: Input<'_>) -> Output<Value> {
    let (remaining, numerical) = recognize(pair(opt(one_of("+-")), digit1))(i.clone())?;
    if let Ok(integer) = str::parse::<i64>(*numerical) {
        Ok((remaining, Value::Integer(integer)))
    } else if let Ok(natural) = str::parse::<u64>(numerical.trim_start_matches('+')) {
        Ok((remaining, Value::Natural(natural)))
    } else {
        Err(nom::Err::Failure(Failure { input: i, kind: ParseErrorKind::InvalidNumerical }))
    }
}

// literal boolean (true, false)

fn boolean(i: Input<'_>) -> Output<Value> {
    map(alt((word("true"), word("false"))), |m: Input<'_>| Value::Boolean(*m == "true"))(i)
}

// value reference (a, f(1), v[0][1], s.member.method())

fn call_arguments(i: Input<'_>) -> Output<Vec<Expression>> {
    delimited(
        char('('),
        alt((
            map(peek(preceded(sp0, char(')'))), |_| Vec::new()),
            separated_list1(char(','), ws(expression)),
        )),
        expect("')' after call arguments", preceded(sp0, char(')')))
    )(i)
}

fn index(i: Input<'_>) -> Output<Expression> {
    delimited(
        char('['),
        expect("index expression", ws(expression)),
        expect("']' after index", char(']'))
    )(i)
}

fn valref(i: Input<'_>) -> Output<ValueRef> {
    let position = i.position();
    map(
        tuple((
            ident,
            opt(call_arguments),
            many0(index),
            opt(preceded(char('.'), expect("member name after '.'", valref))),
        )),
        move |(ident, args, indices, next)| ValueRef {
            position,
            ident,
            args,
            indices,
            next: next.map(Box::new),
        }
    )(i)
}

// value

fn value(i: Input<'_>) -> Output<Value> {
    alt((
        string,
        real,
        integer,
        boolean,
        map(valref, Value::Ref),
    ))(i)
}

// expression

fn binary_operator(i: Input<'_>) -> Output<(Position, BinaryOperator)> {
    let position = i.position();
    map_opt(
        alt((
            nom::bytes::complete::tag("<="),
            nom::bytes::complete::tag(">="),
            nom::bytes::complete::tag("=="),
            nom::bytes::complete::tag("!="),
            nom::bytes::complete::tag("<"),
            nom::bytes::complete::tag(">"),
            nom::bytes::complete::tag("+"),
            nom::bytes::complete::tag("-"),
            nom::bytes::complete::tag("*"),
            terminated(nom::bytes::complete::tag("/"), not(one_of("/*"))), // not a comment
            nom::bytes::complete::tag("%"),
            word("and"),
            word("or"),
        )),
        move |o: Input<'_>| BinaryOperator::from_string(*o).map(|op| (position, op))
    )(i)
}

fn operand(i: Input<'_>) -> Output<Expression> {
    fn parens(i: Input<'_>) -> Output<Expression> {
        delimited(
            char('('),
            expect("expression after '('", ws(expression)),
            expect("closing ')'", char(')'))
        )(i)
    }
    fn not_op(i: Input<'_>) -> Output<Expression> {
        let position = i.position();
        map(
            preceded(word("not"), expect("operand after 'not'", preceded(sp0, operand))),
            move |expr| Expression::UnaryOp(Box::new(UnaryOp {
                position,
                op: UnaryOperator::Not,
                expr,
            }))
        )(i)
    }
    alt((
        not_op,
        parens,
        map(value, Expression::Value),
    ))(i)
}

fn expression(i: Input<'_>) -> Output<Expression> {
    let (remaining, (first, rest)) = pair(
        operand,
        many0(map(
            pair(preceded(sp0, binary_operator), expect("operand after operator", preceded(sp0, operand))),
            |((position, op), operand)| (position, op, operand)
        ))
    )(i)?;
    Ok((remaining, precedence::build(first, rest)))
}

// instruction body, ends before any of the given keywords

fn body<'a>(terminators: &'static [&'static str]) -> impl FnMut(Input<'a>) -> Output<'a, Vec<Instruction>> {
    many0(preceded(not(peek_word(terminators)), instruction))
}

// print a, "b", c + 1

fn print(i: Input<'_>) -> Output<Print> {
    let position = i.position();
    map(
        preceded(
            word("print"),
            terminated(
                expect("expression after 'print'", preceded(sp0, separated_list1(ws(char(',')), expression))),
                expect("end of line after print", eol)
            )
        ),
        move |exprs| Print { position, exprs }
    )(i)
}

// read a.b

fn read(i: Input<'_>) -> Output<ValueRef> {
    preceded(
        word("read"),
        terminated(
            expect("value reference after 'read'", preceded(sp0, valref)),
            expect("end of line after read", eol)
        )
    )(i)
}

// return a + 1

fn return_statement(i: Input<'_>) -> Output<Return> {
    let position = i.position();
    map(
        preceded(
            word("return"),
            terminated(
                expect("expression after 'return'", preceded(sp0, expression)),
                expect("end of line after return", eol)
            )
        ),
        move |expr| Return { position, expr }
    )(i)
}

// if ... then / elsif ... then / else / endif

fn if_block(i: Input<'_>) -> Output<IfBlock> {
    fn elsif(i: Input<'_>) -> Output<ElsIf> {
        let position = i.position();
        map(
            preceded(
                word("elsif"),
                tuple((
                    expect("condition after 'elsif'", preceded(sp0, expression)),
                    expect("'then' after condition", preceded(sp0, word("then"))),
                    expect("end of line after 'then'", eol),
                    body(&[ "elsif", "else", "endif" ]),
                ))
            ),
            move |(cond, _, _, body)| ElsIf { position, cond, body }
        )(i)
    }
    fn else_body(i: Input<'_>) -> Output<Vec<Instruction>> {
        preceded(
            pair(word("else"), expect("end of line after 'else'", eol)),
            body(&[ "endif" ])
        )(i)
    }
    let position = i.position();
    map(
        preceded(
            word("if"),
            tuple((
                expect("condition after 'if'", preceded(sp0, expression)),
                expect("'then' after condition", preceded(sp0, word("then"))),
                expect("end of line after 'then'", eol),
                body(&[ "elsif", "else", "endif" ]),
                many0(elsif),
                opt(else_body),
                expect("'endif'", word("endif")),
                expect("end of line after 'endif'", eol),
            ))
        ),
        move |(cond, _, _, body, elsifs, else_body, _, _)| IfBlock {
            position,
            cond,
            body,
            elsifs,
            else_body,
        }
    )(i)
}

// while ... / endwhile

fn while_loop(i: Input<'_>) -> Output<WhileLoop> {
    let position = i.position();
    map(
        preceded(
            word("while"),
            tuple((
                expect("condition after 'while'", preceded(sp0, expression)),
                expect("end of line after condition", eol),
                body(&[ "endwhile" ]),
                expect("'endwhile'", word("endwhile")),
                expect("end of line after 'endwhile'", eol),
            ))
        ),
        move |(cond, _, body, _, _)| WhileLoop { position, cond, body }
    )(i)
}

// loop / until ...

fn loop_until(i: Input<'_>) -> Output<LoopUntil> {
    let position = i.position();
    map(
        preceded(
            word("loop"),
            tuple((
                expect("end of line after 'loop'", eol),
                body(&[ "until" ]),
                expect("'until'", word("until")),
                expect("condition after 'until'", preceded(sp0, expression)),
                expect("end of line after condition", eol),
            ))
        ),
        move |(_, body, _, until, _)| LoopUntil { position, body, until }
    )(i)
}

// for i in 1 to 10 do / endfor

fn for_loop(i: Input<'_>) -> Output<ForLoop> {
    let position = i.position();
    map(
        preceded(
            word("for"),
            tuple((
                expect("loop variable after 'for'", preceded(sp0, ident)),
                expect("'in' after loop variable", preceded(sp0, word("in"))),
                expect("range start after 'in'", preceded(sp0, expression)),
                expect("'to' after range start", preceded(sp0, word("to"))),
                expect("range end after 'to'", preceded(sp0, expression)),
                expect("'do' after range", preceded(sp0, word("do"))),
                expect("end of line after 'do'", eol),
                body(&[ "endfor" ]),
                expect("'endfor'", word("endfor")),
                expect("end of line after 'endfor'", eol),
            ))
        ),
        move |(iter, _, from, _, to, _, _, body, _, _)| ForLoop { position, iter, from, to, body }
    )(i)
}

// on ... do instruction

fn on_guard(i: Input<'_>) -> Output<OnGuard> {
    let position = i.position();
    map(
        preceded(
            word("on"),
            tuple((
                expect("condition after 'on'", preceded(sp0, expression)),
                expect("'do' after condition", preceded(sp0, word("do"))),
                expect("instruction after 'do'", preceded(sp0, instruction)),
            ))
        ),
        move |(cond, _, instruction)| OnGuard { position, cond, instruction: Box::new(instruction) }
    )(i)
}

fn flow_control(i: Input<'_>) -> Output<FlowControl> {
    alt((
        map(if_block, FlowControl::If),
        map(while_loop, FlowControl::While),
        map(loop_until, FlowControl::Loop),
        map(for_loop, FlowControl::For),
        map(on_guard, FlowControl::On),
    ))(i)
}

// a.b[1] = expression

fn assignment(i: Input<'_>) -> Output<Assignment> {
    let position = i.position();
    map(
        tuple((
            valref,
            preceded(sp0, terminated(char('='), not(char('=')))),
            expect("expression after '='", preceded(sp0, expression)),
            expect("end of line after assignment", eol),
        )),
        move |(target, _, value, _)| Assignment { position, target, value }
    )(i)
}

// instruction

fn instruction(i: Input<'_>) -> Output<Instruction> {
    alt((
        map(print, Instruction::Print),
        map(read, Instruction::Read),
        map(return_statement, Instruction::Return),
        map(flow_control, Instruction::FlowControl),
        map(assignment, Instruction::Assignment),
        map(terminated(expression, expect("end of line after expression", eol)), Instruction::Expression),
    ))(i)
}

// declarations

fn structure(i: Input<'_>) -> Output<Structure> {
    let (remaining, structure) = map(
        preceded(
            word("structure"),
            tuple((
                expect("structure name", preceded(sp0, ident)),
                expect("end of line after structure name", eol),
                many0(terminated(symbol, expect("end of line after member", eol))),
                expect("'end' after structure members", word("end")),
                expect("end of line after 'end'", eol),
            ))
        ),
        |(ident, _, members, _, _)| Structure { ident, members }
    )(i)?;
    remaining.declare_structure(&structure.ident.name);
    Ok((remaining, structure))
}

fn constant(i: Input<'_>) -> Output<Constant> {
    map(
        preceded(
            word("constant"),
            tuple((
                expect("constant name", preceded(sp0, symbol)),
                expect("'=' after constant type", ws(char('='))),
                expect("constant value", expression),
                expect("end of line after constant", eol),
            ))
        ),
        |(symbol, _, value, _)| Constant { symbol, value }
    )(i)
}

fn global(i: Input<'_>) -> Output<Symbol> {
    preceded(
        word("global"),
        terminated(
            expect("global name", preceded(sp0, symbol)),
            expect("end of line after global", eol)
        )
    )(i)
}

fn local(i: Input<'_>) -> Output<Symbol> {
    preceded(
        word("local"),
        terminated(
            expect("local name", preceded(sp0, symbol)),
            expect("end of line after local", eol)
        )
    )(i)
}

fn arguments(i: Input<'_>) -> Output<Vec<Argument>> {
    fn passing_mode(i: Input<'_>) -> Output<PassingMode> {
        map_opt(alt((word("inout"), word("in"), word("out"))), |m: Input<'_>| PassingMode::from_keyword(*m))(i)
    }
    fn argument(i: Input<'_>) -> Output<Argument> {
        map(
            pair(
                expect("passing mode 'in', 'out' or 'inout'", passing_mode),
                expect("argument name", preceded(sp0, symbol))
            ),
            |(mode, symbol)| Argument { mode, symbol }
        )(i)
    }
    delimited(
        expect("'(' after name", preceded(sp0, char('('))),
        alt((
            map(peek(preceded(sp0, char(')'))), |_| Vec::new()),
            separated_list1(char(','), ws(argument)),
        )),
        expect("')' after arguments", preceded(sp0, char(')')))
    )(i)
}

fn function(i: Input<'_>) -> Output<Function> {
    map(
        preceded(
            word("function"),
            tuple((
                expect("function name", preceded(sp0, ident)),
                arguments,
                expect("':' before return type", ws(char(':'))),
                expect("return type", inline_type),
                expect("end of line after signature", eol),
                many0(local),
                body(&[ "end" ]),
                expect("'end'", word("end")),
                expect("end of line after 'end'", eol),
            ))
        ),
        |(ident, args, _, ret, _, locals, body, _, _)| Function { ident, args, locals, body, ret: Some(ret) }
    )(i)
}

fn procedure(i: Input<'_>) -> Output<Function> {
    map(
        preceded(
            word("procedure"),
            tuple((
                expect("procedure name", preceded(sp0, ident)),
                arguments,
                expect("end of line after signature", eol),
                many0(local),
                body(&[ "end" ]),
                expect("'end'", word("end")),
                expect("end of line after 'end'", eol),
            ))
        ),
        |(ident, args, _, locals, body, _, _)| Function { ident, args, locals, body, ret: None }
    )(i)
}

fn declaration(i: Input<'_>) -> Output<Declaration> {
    alt((
        map(structure, Declaration::Structure),
        map(constant, Declaration::Constant),
        map(global, Declaration::Global),
        map(function, Declaration::Function),
        map(procedure, Declaration::Function),
    ))(i)
}

// root

fn program(i: Input<'_>) -> Output<Program> {
    let (i, _) = blank0(i)?;
    let (i, ident) = preceded(
        expect("'program'", word("program")),
        terminated(expect("program name", preceded(sp0, ident)), expect("end of line after program name", eol))
    )(i)?;
    let mut program = Program::new(ident);
    let (i, declarations) = many0(declaration)(i)?;
    let (i, _) = expect("declaration", eof)(i)?;
    for declaration in declarations {
        trace!(?declaration, "parsed declaration");
        program.declare(declaration);
    }
    Ok((i, program))
}

/// Converts the result of a root parser into a ParseResult.
fn finish<T>(input: &Input<'_>, src: &str, result: Output<T>) -> ParseResult<T> {
    match result {
        Ok((_, output)) => Ok(output),
        // a committed failure, positioned where it was raised
        Err(nom::Err::Failure(failure)) => Err(ParseError::new(failure.kind, failure.input.position(), src)),
        // nom error is useless to us, but we stored the highest parsed offset on the input which is the most likely error position
        Err(nom::Err::Error(_)) | Err(nom::Err::Incomplete(_)) => {
            Err(ParseError::new(ParseErrorKind::SyntaxError, Position(input.max_parsed() as u32), src))
        }
    }
}

/// Parses source code into a program AST structure.
///
/// ```
/// let program = algoc::parse("
/// program demo
/// global counter : integer
///
/// function demo(in args : vector of string) : integer
///     counter = args.size()
///     return 0
/// end
/// ").unwrap();
/// assert_eq!(program.name(), "demo");
/// assert_eq!(program.globals.len(), 1);
/// ```
///
/// The returned [Program] is ready for validation by [resolve](crate::frontend::resolver::resolve).
#[tracing::instrument(skip_all, fields(source_len = src.len()))]
pub fn parse(src: &str) -> ParseResult<Program> {
    let input = Input::new(src);
    let result = program(input.clone());
    let program = finish(&input, src, result)?;
    debug!(
        program = program.name(),
        structures = program.structures.len(),
        functions = program.functions.len(),
        procedures = program.procedures.len(),
        "parsed program"
    );
    Ok(program)
}

/// Parses a single expression. Surrounding inline whitespace is permitted, nothing else.
pub fn parse_expression(src: &str) -> ParseResult<Expression> {
    let input = Input::new(src);
    let result = all_consuming(ws(expression))(input.clone());
    finish(&input, src, result)
}
