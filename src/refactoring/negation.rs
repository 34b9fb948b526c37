//! Minimal logical negation of an expression.
//!
//! Produces the text of `!E` with as few added operators and parentheses as
//! possible: comparisons flip, `&&`/`||` go through De Morgan, double
//! negations cancel out.

use crate::syntax::javascript::{
    self, BINARY, COMPARISON_OPERATORS, LOGICAL_OPERATORS, PARENTHESIZED, Precedence, UNARY,
    binary_precedence, precedence_of,
};
use crate::syntax::{NodeId, SyntaxTree};

/// Negated expression text and how tightly it binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negation {
    pub text: String,
    pub precedence: Precedence,
}

impl Negation {
    fn new(text: impl Into<String>, precedence: Precedence) -> Self {
        Self {
            text: text.into(),
            precedence,
        }
    }

    /// Text safe to use where an expression binding at least as tight as
    /// `required` is expected.
    pub fn wrapped_for(&self, required: Precedence) -> String {
        if self.precedence < required {
            format!("({})", self.text)
        } else {
            self.text.clone()
        }
    }
}

pub fn inverse_comparison(operator: &str) -> Option<&'static str> {
    Some(match operator {
        "==" => "!=",
        "!=" => "==",
        "===" => "!==",
        "!==" => "===",
        "<" => ">=",
        ">=" => "<",
        ">" => "<=",
        "<=" => ">",
        _ => return None,
    })
}

/// Negate the expression at `id`.
pub fn negate(tree: &SyntaxTree, id: NodeId) -> Negation {
    match tree.kind(id) {
        // callers parenthesise by precedence, so the original parentheses go
        PARENTHESIZED => match tree.nth_significant(id, 0) {
            Some(inner) => negate(tree, inner),
            None => prefixed(tree, id),
        },
        "true" => Negation::new("false", Precedence::Primary),
        "false" => Negation::new("true", Precedence::Primary),
        UNARY if tree.operator(id) == Some("!") => match javascript::logical_not_argument(tree, id) {
            Some(argument) => {
                let inner = javascript::unparenthesized(tree, argument);
                Negation::new(tree.text(inner), precedence_of(tree, inner))
            }
            None => prefixed(tree, id),
        },
        BINARY => negate_binary(tree, id).unwrap_or_else(|| prefixed(tree, id)),
        _ => prefixed(tree, id),
    }
}

fn negate_binary(tree: &SyntaxTree, id: NodeId) -> Option<Negation> {
    let (left, operator_node, right) = javascript::binary_parts(tree, id)?;
    let operator = tree.kind(operator_node);

    if COMPARISON_OPERATORS.contains(&operator) {
        let inverse = inverse_comparison(operator)?;
        let range = tree.range(id);
        let operator_range = tree.range(operator_node);
        let source = tree.source();
        let text = format!(
            "{}{}{}",
            &source[range.start..operator_range.start],
            inverse,
            &source[operator_range.end..range.end]
        );
        return Some(Negation::new(
            text,
            Precedence::Binary(binary_precedence(inverse)),
        ));
    }

    if LOGICAL_OPERATORS.contains(&operator) {
        let inverse = if operator == "&&" { "||" } else { "&&" };
        let rank = Precedence::Binary(binary_precedence(inverse));
        let left = negate(tree, left);
        let right = negate(tree, right);
        let text = format!(
            "{} {} {}",
            left.wrapped_for(rank),
            inverse,
            right.wrapped_for(rank)
        );
        return Some(Negation::new(text, rank));
    }

    None
}

/// `!X`, parenthesising `X` unless it already binds at unary level.
fn prefixed(tree: &SyntaxTree, id: NodeId) -> Negation {
    let text = tree.text(id);
    if precedence_of(tree, id) >= Precedence::Unary {
        Negation::new(format!("!{text}"), Precedence::Unary)
    } else {
        Negation::new(format!("!({text})"), Precedence::Unary)
    }
}
