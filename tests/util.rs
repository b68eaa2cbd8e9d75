#![allow(dead_code)]

pub use algoc::{parse, parse_expression, resolve, build, ParseErrorKind, ResolveErrorKind};
pub use algoc::emitter::Source;
pub use algoc::frontend::ast::*;

/// A program exercising every construct of the language. Resolves without errors.
pub const SHAPES: &str = r#"// shapes and points
program test

structure point
    x : integer
    y : real
end

structure shape
    name : string
    points : vector of point
end

constant limit : integer = 10
constant half : real = limit / 2
global counter : natural
global grid : vector of vector of integer

function area(in s : shape) : real
    local total : real
    local i : integer
    for i in 0 to s.points.size() - 1 do
        total = total + s.points[i].x * s.points[i].y
    endfor
    return total
end

procedure grow(inout s : shape, in by : integer)
    local p : point
    p.x = by
    p.y = 1.5
    s.points.push(p)
end

function test(in args : vector of string) : integer
    local s : shape
    local n : integer
    local text : string
    local r : real
    s.name = "box"
    grow(s, 3)
    read n
    if n > limit and not (n == 0) then
        print "big ", n, "\n"
    elsif n < 0 then
        print "negative\n"
    else
        text = s.name + "!"
    endif
    while counter < 10
        counter = counter + 1
    endwhile
    loop
        n = n - 1
    until n <= 0
    on n == 3 do print "three\n"
    grid[0][1] = 5
    r = area(s)
    counter = args.size()
    return n
end
"#;

/// Wraps declarations, locals and body lines into a program with a valid entry function `test`.
pub fn program(declarations: &str, locals: &str, body: &str) -> String {
    format!(
        "program test\n{}\nfunction test(in args : vector of string) : integer\n{}{}    return 0\nend\n",
        declarations, locals, body
    )
}

/// Parses and resolves the source, returning the kinds of all resolve errors.
pub fn resolve_errors(source: &str) -> Vec<ResolveErrorKind> {
    let program = parse(source).unwrap();
    match resolve(&program) {
        Ok(()) => Vec::new(),
        Err(diagnostics) => diagnostics.into_iter().map(|error| error.kind().clone()).collect(),
    }
}

/// Parses the expression and renders it with every nested operation parenthesized.
pub fn tree(source: &str) -> String {
    Source.expression(&parse_expression(source).unwrap())
}

/// Returns the kind of the parse error of the given source.
pub fn parse_error(source: &str) -> ParseErrorKind {
    parse(source).unwrap_err().kind().clone()
}

/// Asserts that the source resolves without errors.
pub fn assert_resolves(source: &str) {
    let errors = resolve_errors(source);
    assert!(errors.is_empty(), "unexpected resolve errors: {:?}", errors);
}
