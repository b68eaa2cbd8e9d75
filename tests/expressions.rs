mod util;
use util::*;
use proptest::prelude::*;

#[test]
fn precedence() {
    assert_eq!(tree("1 + 2 * 3"), "1 + (2 * 3)");
    assert_eq!(tree("1 * 2 + 3 * 4"), "(1 * 2) + (3 * 4)");
    assert_eq!(tree("a or b and c"), "a or (b and c)");
    assert_eq!(tree("a < b + c * d == e"), "(a < (b + (c * d))) == e");
    assert_eq!(tree("a == b and c != d or e"), "((a == b) and (c != d)) or e");
    assert_eq!(tree("a % 2 - b / 3"), "(a % 2) - (b / 3)");
}

#[test]
fn left_associativity() {
    assert_eq!(tree("1 - 2 - 3"), "(1 - 2) - 3");
    assert_eq!(tree("8 / 4 / 2"), "(8 / 4) / 2");
    assert_eq!(tree("1 - 2 * 3 - 4"), "(1 - (2 * 3)) - 4");
}

#[test]
fn unary_not() {
    assert_eq!(tree("not a and b"), "(not a) and b");
    assert_eq!(tree("not (a and b)"), "not (a and b)");
    assert_eq!(tree("not not a"), "not (not a)");
}

#[test]
fn parentheses() {
    assert_eq!(tree("(1 + 2) * 3"), "(1 + 2) * 3");
    assert_eq!(tree("((1))"), "1");
    assert_eq!(tree("1 - (2 - 3)"), "1 - (2 - 3)");
}

#[test]
fn negative_operands() {
    assert_eq!(tree("a - -1"), "a - -1");
    assert_eq!(tree("a-1"), "a - 1");
}

#[test]
fn comments_in_expression() {
    assert_eq!(tree("1 /* one */ + 2"), "1 + 2");
}

/// Evaluates an arithmetic tree of integer literals.
fn eval(expr: &Expression) -> i64 {
    match expr {
        Expression::Value(Value::Integer(value)) => *value,
        Expression::BinaryOp(binary) => {
            let (left, right) = (eval(&binary.left), eval(&binary.right));
            match binary.op {
                BinaryOperator::Add => left.wrapping_add(right),
                BinaryOperator::Sub => left.wrapping_sub(right),
                BinaryOperator::Mul => left.wrapping_mul(right),
                op => panic!("unexpected operator {}", op),
            }
        }
        other => panic!("unexpected expression {:?}", other),
    }
}

/// Evaluates `n0 op n1 op n2 ...` with products bound tighter than sums.
fn eval_reference(numbers: &[i64], ops: &[&str]) -> i64 {
    let mut sum = 0i64;
    let mut sign = 1i64;
    let mut product = numbers[0];
    for (op, &number) in ops.iter().zip(&numbers[1..]) {
        match *op {
            "*" => product = product.wrapping_mul(number),
            _ => {
                sum = sum.wrapping_add(sign.wrapping_mul(product));
                sign = if *op == "-" { -1 } else { 1 };
                product = number;
            }
        }
    }
    sum.wrapping_add(sign.wrapping_mul(product))
}

fn chain(numbers: &[i64], ops: &[&str]) -> String {
    let mut source = numbers[0].to_string();
    for (op, number) in ops.iter().zip(&numbers[1..]) {
        source.push_str(&format!(" {} {}", op, number));
    }
    source
}

proptest! {
    #[test]
    fn equal_weight_chains_associate_left(ops in prop::collection::vec(prop_oneof![Just("+"), Just("-")], 1..8), numbers in prop::collection::vec(0i64..100, 9)) {
        let mut expected = numbers[0].to_string();
        for (index, (op, number)) in ops.iter().zip(&numbers[1..]).enumerate() {
            expected = if index == 0 {
                format!("{} {} {}", expected, op, number)
            } else {
                format!("({}) {} {}", expected, op, number)
            };
        }
        prop_assert_eq!(tree(&chain(&numbers, &ops)), expected);
    }

    #[test]
    fn mixed_chains_respect_precedence(ops in prop::collection::vec(prop_oneof![Just("+"), Just("-"), Just("*")], 1..10), numbers in prop::collection::vec(0i64..1000, 11)) {
        let expr = parse_expression(&chain(&numbers, &ops)).unwrap();
        prop_assert_eq!(eval(&expr), eval_reference(&numbers, &ops));
    }
}
