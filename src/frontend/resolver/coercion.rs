//! Type compatibility and operator typing.

use crate::frontend::ast::{Type, BinaryOperator, UnaryOperator};

/// Returns true if a value of type `given` may be stored in a location of type `target`.
///
/// Equal types always accept each other. Integer and natural accept each other, real accepts both
/// and string accepts char. Everything else requires structural equality.
pub fn accepts(target: &Type, given: &Type) -> bool {
    target == given || match (target, given) {
        (Type::Integer, Type::Natural) | (Type::Natural, Type::Integer) => true,
        (Type::Real, given) => given.is_integral(),
        (Type::String, Type::Char) => true,
        _ => false,
    }
}

/// Result type of a numeric operation, widest operand type wins.
fn numeric_result(left: &Type, right: &Type) -> Type {
    if *left == Type::Real || *right == Type::Real {
        Type::Real
    } else if *left == Type::Integer || *right == Type::Integer {
        Type::Integer
    } else {
        Type::Natural
    }
}

/// Returns the result type of the given binary operation or None if the operands are not supported.
pub fn binary_result(op: BinaryOperator, left: &Type, right: &Type) -> Option<Type> {
    let numeric = left.is_numeric() && right.is_numeric();
    if op.is_boolean() {
        (*left == Type::Boolean && *right == Type::Boolean).then_some(Type::Boolean)
    } else if op.is_equality() {
        (numeric || (left == right && left.is_scalar())).then_some(Type::Boolean)
    } else if op.is_ordering() {
        (numeric || (left == right && left.is_textual())).then_some(Type::Boolean)
    } else if op == BinaryOperator::Rem {
        (left.is_integral() && right.is_integral()).then(|| numeric_result(left, right))
    } else if numeric {
        Some(numeric_result(left, right))
    } else if op == BinaryOperator::Add && left.is_textual() && right.is_textual() && (*left == Type::String || *right == Type::String) {
        Some(Type::String)
    } else {
        None
    }
}

/// Returns the type both operands of a numeric operation or comparison are converted to before it is
/// applied, or None if the operation does not convert its operands.
pub fn operand_type(op: BinaryOperator, left: &Type, right: &Type) -> Option<Type> {
    (!op.is_boolean() && left.is_numeric() && right.is_numeric()).then(|| numeric_result(left, right))
}

/// Returns the result type of the given unary operation or None if the operand is not supported.
pub fn unary_result(op: UnaryOperator, ty: &Type) -> Option<Type> {
    match op {
        UnaryOperator::Not => (*ty == Type::Boolean).then_some(Type::Boolean),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_matrix() {
        assert!(accepts(&Type::Integer, &Type::Natural));
        assert!(accepts(&Type::Natural, &Type::Integer));
        assert!(accepts(&Type::Real, &Type::Integer));
        assert!(!accepts(&Type::Integer, &Type::Real));
        assert!(accepts(&Type::String, &Type::Char));
        assert!(!accepts(&Type::Char, &Type::String));
        assert!(!accepts(&Type::vector_of(Type::Real), &Type::vector_of(Type::Integer)));
        assert!(accepts(&Type::vector_of(Type::Integer), &Type::vector_of(Type::Integer)));
    }

    #[test]
    fn operator_typing() {
        assert_eq!(binary_result(BinaryOperator::Add, &Type::Natural, &Type::Integer), Some(Type::Integer));
        assert_eq!(binary_result(BinaryOperator::Mul, &Type::Integer, &Type::Real), Some(Type::Real));
        assert_eq!(binary_result(BinaryOperator::Add, &Type::String, &Type::Char), Some(Type::String));
        assert_eq!(binary_result(BinaryOperator::Add, &Type::Char, &Type::Char), None);
        assert_eq!(binary_result(BinaryOperator::Rem, &Type::Real, &Type::Integer), None);
        assert_eq!(binary_result(BinaryOperator::Less, &Type::String, &Type::String), Some(Type::Boolean));
        assert_eq!(binary_result(BinaryOperator::Equal, &Type::Boolean, &Type::Integer), None);
        assert_eq!(binary_result(BinaryOperator::And, &Type::Boolean, &Type::Boolean), Some(Type::Boolean));
        assert_eq!(unary_result(UnaryOperator::Not, &Type::Integer), None);
    }

    #[test]
    fn operand_conversion() {
        assert_eq!(operand_type(BinaryOperator::Sub, &Type::Natural, &Type::Integer), Some(Type::Integer));
        assert_eq!(operand_type(BinaryOperator::Less, &Type::Natural, &Type::Integer), Some(Type::Integer));
        assert_eq!(operand_type(BinaryOperator::Equal, &Type::Natural, &Type::Real), Some(Type::Real));
        assert_eq!(operand_type(BinaryOperator::Add, &Type::Natural, &Type::Natural), Some(Type::Natural));
        assert_eq!(operand_type(BinaryOperator::Add, &Type::String, &Type::Char), None);
        assert_eq!(operand_type(BinaryOperator::Less, &Type::String, &Type::String), None);
    }
}
