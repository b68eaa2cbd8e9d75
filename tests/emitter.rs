mod util;
use util::*;
use algoc::{render_to_string, render_source_to_string, EmitOptions};
use algoc::emitter::render_with_options;

fn cpp(source: &str) -> String {
    render_to_string(&build(source).unwrap()).unwrap()
}

#[test]
fn declarations() {
    let output = cpp(SHAPES);
    for expected in [
        "#include <iostream>",
        "#include <vector>",
        "struct point {\n    long long x{};\n    double y{};\n};",
        "std::vector<point> points{};",
        "const long long limit = 10LL;",
        "const double half = limit / 2LL;",
        "unsigned long long counter{};",
        "std::vector<std::vector<long long>> grid{};",
        "double area(const shape& s);",
        "long long test(const std::vector<std::string>& args);",
        "void grow(shape& s, long long by);",
        "int main(int argc, char** argv) {",
        "    std::vector<std::string> args(argv + 1, argv + argc);",
        "    return static_cast<int>(test(args));",
    ] {
        assert!(output.contains(expected), "missing {:?} in\n{}", expected, output);
    }
}

#[test]
fn instructions() {
    let output = cpp(SHAPES);
    for expected in [
        "    for (i = 0LL; i <= (static_cast<long long>(algo_size(s.points)) - 1LL); ++i) {",
        "        total = total + (s.points.at(i).x * s.points.at(i).y);",
        "    algo_push(s.points, p);",
        "    grow(s, 3LL);",
        "    std::cin >> n;",
        "    if ((n > limit) && (!(n == 0LL))) {",
        "        std::cout << \"big \"s << n << \"\\n\"s;",
        "    } else if (n < 0LL) {",
        "    } else {",
        "        text = s.name + \"!\"s;",
        "    while (static_cast<long long>(counter) < 10LL) {",
        "    do {",
        "    } while (!(n <= 0LL));",
        "    if (n == 3LL) {\n        std::cout << \"three\\n\"s;\n    }",
        "    grid.at(0LL).at(1LL) = 5LL;",
        "    counter = algo_size(args);",
    ] {
        assert!(output.contains(expected), "missing {:?} in\n{}", expected, output);
    }
}

#[test]
fn prelude() {
    let program = build(SHAPES).unwrap();
    let mut with = Vec::new();
    render_with_options(&program, &mut with, &EmitOptions::default()).unwrap();
    assert!(String::from_utf8(with).unwrap().contains("void algo_push(std::vector<T>& v"));
    let mut without = Vec::new();
    render_with_options(&program, &mut without, &EmitOptions { prelude: false, ..EmitOptions::default() }).unwrap();
    assert!(!String::from_utf8(without).unwrap().contains("void algo_push(std::vector<T>& v"));
}

#[test]
fn indent_width() {
    let program = build(SHAPES).unwrap();
    let mut output = Vec::new();
    render_with_options(&program, &mut output, &EmitOptions { indent_width: 2, ..EmitOptions::default() }).unwrap();
    assert!(String::from_utf8(output).unwrap().contains("struct point {\n  long long x{};"));
}

#[test]
fn reserved_names() {
    let source = program("", "    local int : integer\n    local algo_x : integer\n", "    int = algo_x\n");
    let output = cpp(&source);
    assert!(output.contains("long long int_{};"));
    assert!(output.contains("int_ = algo_x_;"));
}

#[test]
fn reserved_alternative_tokens() {
    let source = program("", "    local not_eq : integer\n    local requires : boolean\n    local co_yield : real\n", "    not_eq = 1\n    requires = not_eq == 1\n");
    let output = cpp(&source);
    assert!(output.contains("long long not_eq_{};"));
    assert!(output.contains("requires_ = not_eq_ == 1LL;"));
    assert!(output.contains("double co_yield_{};"));
}

#[test]
fn natural_operands() {
    let locals = "    local v : vector of integer\n    local i : integer\n    local k : natural\n    local r : real\n";
    let body = "    if v.size() - 1 < 0 then\n        print \"empty\\n\"\n    endif\n    for i in 0 to v.size() - 1 do\n        print v[i]\n    endfor\n    for i in 0 to v.size() do\n    endfor\n    for k in 0 to -1 do\n    endfor\n    r = k * 0.5\n    k = k + k\n";
    let output = cpp(&program("", locals, body));
    for expected in [
        "    if ((static_cast<long long>(algo_size(v)) - 1LL) < 0LL) {",
        "    for (i = 0LL; i <= (static_cast<long long>(algo_size(v)) - 1LL); ++i) {",
        "    for (i = 0LL; i <= static_cast<long long>(algo_size(v)); ++i) {",
        "    for (k = 0LL; static_cast<long long>(k) <= -1LL; ++k) {",
        "    r = static_cast<double>(k) * 0.5;",
        "    k = k + k;",
    ] {
        assert!(output.contains(expected), "missing {:?} in\n{}", expected, output);
    }
}

#[test]
fn entry_arguments_skip_program_path() {
    let output = cpp(&program("", "", ""));
    assert!(output.contains("std::vector<std::string> args(argv + 1, argv + argc);"));
    assert!(!output.contains("args(argv, argv + argc)"));
}

#[test]
fn parenthesizes_operands() {
    let source = program("", "    local b : boolean\n    local n : integer\n", "    b = n - 1 - 2 < 3 * (n + 1) or not b\n");
    let output = cpp(&source);
    assert!(output.contains("b = (((n - 1LL) - 2LL) < (3LL * (n + 1LL))) || (!b);"), "{}", output);
}

#[test]
fn literals() {
    let source = program("", "    local r : real\n    local n : natural\n    local i : integer\n", "    r = 2.0\n    n = 18446744073709551615\n    i = -9223372036854775808\n");
    let output = cpp(&source);
    assert!(output.contains("r = 2.0;"));
    assert!(output.contains("n = 18446744073709551615ULL;"));
    assert!(output.contains("i = (-9223372036854775807LL - 1);"));
}

#[test]
fn idempotent() {
    let program = build(SHAPES).unwrap();
    assert_eq!(render_to_string(&program).unwrap(), render_to_string(&program).unwrap());
}

#[test]
fn source_round_trip() {
    let first = render_source_to_string(&parse(SHAPES).unwrap()).unwrap();
    let reparsed = parse(&first).unwrap();
    resolve(&reparsed).unwrap();
    let second = render_source_to_string(&reparsed).unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with("program test\n\nstructure point\n    x : integer\n    y : real\nend\n"));
    assert!(first.contains("    for i in 0 to s.points.size() - 1 do\n"));
    assert!(first.contains("    on n == 3 do print \"three\\n\"\n"));
    assert!(first.contains("procedure grow(inout s : shape, in by : integer)\n    local p : point\n"));
}

#[test]
fn source_round_trip_preserves_cpp() {
    let program = build(SHAPES).unwrap();
    let reparsed = build(&render_source_to_string(&program).unwrap()).unwrap();
    assert_eq!(render_to_string(&program).unwrap(), render_to_string(&reparsed).unwrap());
}
