//! Builds expression trees from flat operand/operator sequences.

use std::iter::Peekable;
use crate::frontend::ast::{Expression, BinaryOp, BinaryOperator, Position};

/// An operator and the operand following it.
pub(super) type Link = (Position, BinaryOperator, Expression);

/// Builds the tree for `first (op operand)*`. Operators of lower weight end up deeper in the tree,
/// operators of equal weight associate left to right.
pub(super) fn build(first: Expression, rest: Vec<Link>) -> Expression {
    climb(first, u8::MAX, &mut rest.into_iter().peekable())
}

fn climb(mut left: Expression, max_weight: u8, rest: &mut Peekable<impl Iterator<Item=Link>>) -> Expression {
    while let Some((position, op, mut right)) = rest.next_if(|(_, op, _)| op.weight() <= max_weight) {
        // operators binding tighter than op take the right operand first
        while rest.peek().map_or(false, |(_, next, _)| next.weight() < op.weight()) {
            right = climb(right, op.weight().saturating_sub(1), rest);
        }
        left = Expression::BinaryOp(Box::new(BinaryOp { position, op, left, right }));
    }
    left
}
