mod util;
use util::*;
use algoc::frontend::resolver::context::Context;

#[test]
fn complete_program() {
    assert_resolves(SHAPES);
}

#[test]
fn repeatable() {
    let program = parse(SHAPES).unwrap();
    resolve(&program).unwrap();
    resolve(&program).unwrap();
}

#[test]
fn undefined_identifier() {
    let errors = resolve_errors(&program("", "", "    x = 1\n"));
    assert_eq!(errors, [ ResolveErrorKind::UndefinedIdentifier("x".to_string()) ]);
}

#[test]
fn lookup_order() {
    let source = program("global n : string\n", "    local n : integer\n", "    n = 1\n");
    assert_resolves(&source);
    let source = program("constant n : integer = 1\n", "", "    n = 2\n");
    assert_eq!(resolve_errors(&source), [ ResolveErrorKind::NotWritable("n".to_string()) ]);
}

#[test]
fn vector_chain() {
    let source = program("", "    local m : vector of vector of integer\n    local n : integer\n", "    n = m[0][1]\n");
    assert_resolves(&source);
    let program = parse(&source).unwrap();
    let context = Context::new(&program, program.entry_function());
    assert_eq!(context.type_of(&parse_expression("m[0][1]").unwrap()).unwrap(), Type::Integer);
    assert_eq!(context.type_of(&parse_expression("m[0]").unwrap()).unwrap(), Type::vector_of(Type::Integer));
    assert_eq!(context.type_of(&parse_expression("m.size()").unwrap()).unwrap(), Type::Natural);
    let error = context.type_of(&parse_expression("m[0][1][2]").unwrap()).unwrap_err();
    assert_eq!(error.kind(), &ResolveErrorKind::NotAVector(Type::Integer));
    let error = context.type_of(&parse_expression("m[true]").unwrap()).unwrap_err();
    assert_eq!(error.kind(), &ResolveErrorKind::TypeMismatch { expected: Type::Integer, given: Type::Boolean });
}

#[test]
fn index_non_vector() {
    let source = program("", "    local n : integer\n", "    n = n[0]\n");
    assert_eq!(resolve_errors(&source), [ ResolveErrorKind::NotAVector(Type::Integer) ]);
}

#[test]
fn structure_members() {
    let declarations = "structure point\n    x : integer\nend\n";
    let source = program(declarations, "    local p : point\n", "    p.x = 1\n    p.z = 2\n");
    assert_eq!(resolve_errors(&source), [
        ResolveErrorKind::UndefinedMember { structure: "point".to_string(), member: "z".to_string() }
    ]);
    let source = program("", "    local n : integer\n", "    n.x = 1\n");
    assert_eq!(resolve_errors(&source), [
        ResolveErrorKind::NotAStructure { ty: Type::Integer, member: "x".to_string() }
    ]);
}

#[test]
fn entry_function_without_arguments() {
    let source = "program test\nfunction test() : integer\n    return 0\nend\n";
    assert_eq!(resolve_errors(source), [ ResolveErrorKind::InvalidEntrySignature("test".to_string()) ]);
}

#[test]
fn entry_function_return_type() {
    let source = "program test\nfunction test(in args : vector of string) : real\n    return 0\nend\n";
    assert_eq!(resolve_errors(source), [ ResolveErrorKind::InvalidEntrySignature("test".to_string()) ]);
    let source = "program test\nfunction test(inout args : vector of string) : integer\n    return 0\nend\n";
    assert_eq!(resolve_errors(source), [ ResolveErrorKind::InvalidEntrySignature("test".to_string()) ]);
}

#[test]
fn missing_entry_function() {
    let source = "program test\nprocedure test(in args : vector of string)\nend\n";
    assert_eq!(resolve_errors(source), [ ResolveErrorKind::MissingEntry("test".to_string()) ]);
}

#[test]
fn reserved_program_name() {
    let source = "program main\nfunction main(in args : vector of string) : integer\n    return 0\nend\n";
    assert_eq!(resolve_errors(source), [ ResolveErrorKind::ReservedProgramName("main".to_string()) ]);
}

#[test]
fn builtin_arity() {
    let source = program("", "    local v : vector of integer\n    local n : natural\n", "    n = v.size(1)\n");
    assert_eq!(resolve_errors(&source), [
        ResolveErrorKind::NumberOfArguments { name: "size".to_string(), expected: 0, given: 1 }
    ]);
    let source = program("", "    local v : vector of integer\n", "    v.insert(0)\n");
    assert_eq!(resolve_errors(&source), [
        ResolveErrorKind::NumberOfArguments { name: "insert".to_string(), expected: 2, given: 1 }
    ]);
}

#[test]
fn builtin_argument_types() {
    let source = program("", "    local v : vector of integer\n", "    v.push(\"x\")\n");
    assert_eq!(resolve_errors(&source), [
        ResolveErrorKind::TypeMismatch { expected: Type::Integer, given: Type::String }
    ]);
    let source = program("", "    local v : vector of integer\n", "    v.push(args.size())\n    v.insert(v.size(), 1)\n    v.remove(0)\n");
    assert_resolves(&source);
}

#[test]
fn builtin_on_non_vector() {
    let source = program("", "    local n : integer\n", "    n.push(1)\n");
    assert_eq!(resolve_errors(&source), [
        ResolveErrorKind::UndefinedMethod { ty: Type::Integer, name: "push".to_string() }
    ]);
}

#[test]
fn mutating_read_only() {
    let source = program("", "", "    args.push(\"x\")\n");
    assert_eq!(resolve_errors(&source), [ ResolveErrorKind::NotWritable("push".to_string()) ]);
    let source = program("", "    local n : natural\n", "    n = args.size()\n");
    assert_resolves(&source);
}

#[test]
fn procedure_as_value() {
    let source = program("procedure p()\nend\n", "    local n : integer\n", "    n = p()\n    p()\n");
    assert_eq!(resolve_errors(&source), [ ResolveErrorKind::NoValue("p".to_string()) ]);
}

#[test]
fn return_in_procedure() {
    let source = program("procedure p()\n    return 1\nend\n", "", "");
    assert_eq!(resolve_errors(&source), [ ResolveErrorKind::ReturnInProcedure("p".to_string()) ]);
}

#[test]
fn call_arguments() {
    let declarations = "procedure set(out x : integer)\n    x = 1\nend\nfunction twice(in x : real) : real\n    return x * 2\nend\n";
    let source = program(declarations, "    local n : integer\n    local r : real\n", "    set(n)\n    r = twice(n)\n");
    assert_resolves(&source);
    let source = program(declarations, "", "    set(5)\n");
    assert_eq!(resolve_errors(&source), [ ResolveErrorKind::NotWritable("x".to_string()) ]);
    let source = program(declarations, "    local r : real\n", "    r = twice(1, 2)\n");
    assert_eq!(resolve_errors(&source), [
        ResolveErrorKind::NumberOfArguments { name: "twice".to_string(), expected: 1, given: 2 }
    ]);
    let source = program(declarations, "", "    nope()\n");
    assert_eq!(resolve_errors(&source), [ ResolveErrorKind::UndefinedFunction("nope".to_string()) ]);
}

#[test]
fn conditions() {
    let source = program("", "    local n : integer\n", "    if n then\n        n = 1\n    endif\n    while n < 1\n    endwhile\n");
    assert_eq!(resolve_errors(&source), [
        ResolveErrorKind::TypeMismatch { expected: Type::Boolean, given: Type::Integer }
    ]);
}

#[test]
fn operators() {
    let source = program("", "    local b : boolean\n", "    b = 1 and true\n    b = not 1\n    b = \"a\" < \"b\"\n");
    assert_eq!(resolve_errors(&source), [
        ResolveErrorKind::InvalidOperands { op: BinaryOperator::And, left: Type::Integer, right: Type::Boolean },
        ResolveErrorKind::InvalidOperand { op: UnaryOperator::Not, ty: Type::Integer },
    ]);
}

#[test]
fn for_loop() {
    let source = program("constant limit : integer = 3\n", "    local i : integer\n    local r : real\n", "    for i in 1 to limit do\n    endfor\n    for r in 1 to 2 do\n    endfor\n    for limit in 1 to 2.5 do\n    endfor\n");
    assert_eq!(resolve_errors(&source), [
        ResolveErrorKind::InvalidLoopVariable("r".to_string()),
        ResolveErrorKind::InvalidLoopVariable("limit".to_string()),
        ResolveErrorKind::TypeMismatch { expected: Type::Integer, given: Type::Real },
    ]);
}

#[test]
fn instructions() {
    let source = program("", "    local n : integer\n", "    n + 1\n    print args\n    read args.size()\n");
    assert_eq!(resolve_errors(&source), [
        ResolveErrorKind::NotAnInstruction,
        ResolveErrorKind::NotScalar(Type::vector_of(Type::String)),
        ResolveErrorKind::NotWritable("args".to_string()),
    ]);
}

#[test]
fn duplicates() {
    let source = program("global n : integer\nconstant n : integer = 1\n", "    local args : integer\n", "");
    assert_eq!(resolve_errors(&source), [
        ResolveErrorKind::Duplicate("n".to_string()),
        ResolveErrorKind::Duplicate("args".to_string()),
    ]);
    let source = program("structure point\n    x : integer\n    x : real\nend\n", "", "");
    assert_eq!(resolve_errors(&source), [ ResolveErrorKind::Duplicate("x".to_string()) ]);
}

#[test]
fn shadowed_declarations() {
    let declarations = "structure point\n    x : integer\nend\nfunction f(in x : integer) : integer\n    return x\nend\n";
    let source = program(declarations, "    local f : integer\n    local point : integer\n", "    f = f(1)\n");
    assert_eq!(resolve_errors(&source), [
        ResolveErrorKind::ShadowsDeclaration("f".to_string()),
        ResolveErrorKind::ShadowsDeclaration("point".to_string()),
    ]);
    let source = program("procedure p(in test : integer)\nend\n", "", "");
    assert_eq!(resolve_errors(&source), [ ResolveErrorKind::ShadowsDeclaration("test".to_string()) ]);
}

#[test]
fn constant_initializers() {
    let source = program("global g : integer\nconstant a : integer = 1\nconstant b : integer = a * 2\nconstant c : integer = g\nconstant d : integer = e\nconstant e : integer = 1\nconstant f : integer = 1.5\n", "", "");
    assert_eq!(resolve_errors(&source), [
        ResolveErrorKind::NotConstant("g".to_string()),
        ResolveErrorKind::NotConstant("e".to_string()),
        ResolveErrorKind::TypeMismatch { expected: Type::Integer, given: Type::Real },
    ]);
}

#[test]
fn coercion() {
    let source = program("", "    local n : natural\n    local i : integer\n    local r : real\n    local s : string\n", "    n = i\n    i = n\n    r = i\n    s = \"x\"\n    i = r\n");
    assert_eq!(resolve_errors(&source), [
        ResolveErrorKind::TypeMismatch { expected: Type::Integer, given: Type::Real }
    ]);
}

#[test]
fn located_errors() {
    let source = "program test\n\nfunction test(in args : vector of string) : integer\n    x = 1\n    return y\nend\n";
    match build(source) {
        Err(algoc::Error::Resolve(diagnostics)) => {
            assert_eq!(diagnostics.len(), 2);
            assert_eq!(diagnostics.errors()[0].loc(), Some((4, 5)));
            assert_eq!(diagnostics.errors()[1].loc(), Some((5, 12)));
            assert_eq!(diagnostics.errors()[0].to_string(), "Undefined identifier 'x' at line 4, column 5");
        }
        other => panic!("expected resolve errors, got {:?}", other),
    }
}
