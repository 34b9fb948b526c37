//! Structural accessors over the JavaScript/TypeScript tree-sitter grammars.
//!
//! Children are found by position among the significant (named, non-comment)
//! children, which is stable across the JavaScript, TypeScript and TSX
//! grammars for the node kinds used here.

use super::tree::{NodeId, SyntaxTree};

pub const IF_STATEMENT: &str = "if_statement";
pub const ELSE_CLAUSE: &str = "else_clause";
pub const TERNARY: &str = "ternary_expression";
pub const BINARY: &str = "binary_expression";
pub const UNARY: &str = "unary_expression";
pub const PARENTHESIZED: &str = "parenthesized_expression";
pub const BLOCK: &str = "statement_block";
pub const RETURN: &str = "return_statement";
pub const THROW: &str = "throw_statement";
pub const EXPRESSION_STATEMENT: &str = "expression_statement";
pub const VARIABLE_DECLARATOR: &str = "variable_declarator";
pub const IDENTIFIER: &str = "identifier";
pub const SHORTHAND_PROPERTY: &str = "shorthand_property_identifier";

pub const DECLARATIONS: &[&str] = &["lexical_declaration", "variable_declaration"];
pub const ASSIGNMENTS: &[&str] = &["assignment_expression", "augmented_assignment_expression"];

/// Nodes whose children form a list of statements.
pub const STATEMENT_CONTAINERS: &[&str] = &[
    "program",
    "statement_block",
    "switch_case",
    "switch_default",
    "class_static_block",
];

/// Nodes that introduce a new function body.
pub const FUNCTION_LIKE: &[&str] = &[
    "function_declaration",
    "function_expression",
    "function",
    "generator_function_declaration",
    "generator_function",
    "arrow_function",
    "method_definition",
];

pub const COMPARISON_OPERATORS: &[&str] = &["==", "!=", "===", "!==", "<", ">", "<=", ">="];
pub const LOGICAL_OPERATORS: &[&str] = &["&&", "||"];

/// Parts of an `if` statement.
#[derive(Debug, Clone, Copy)]
pub struct IfParts {
    /// The `parenthesized_expression` guard.
    pub condition: NodeId,
    pub consequence: NodeId,
    pub else_clause: Option<NodeId>,
    /// The statement inside the else clause.
    pub alternative: Option<NodeId>,
}

pub fn if_parts(tree: &SyntaxTree, id: NodeId) -> Option<IfParts> {
    if tree.kind(id) != IF_STATEMENT {
        return None;
    }
    let children = tree.significant_children(id);
    let condition = *children.first()?;
    let consequence = *children.get(1)?;
    let else_clause = children
        .get(2)
        .copied()
        .filter(|&c| tree.kind(c) == ELSE_CLAUSE);
    let alternative = else_clause.and_then(|clause| tree.nth_significant(clause, 0));
    Some(IfParts {
        condition,
        consequence,
        else_clause,
        alternative,
    })
}

/// Parts of a `C ? X : Y` expression.
#[derive(Debug, Clone, Copy)]
pub struct TernaryParts {
    pub condition: NodeId,
    pub consequence: NodeId,
    pub alternative: NodeId,
}

pub fn ternary_parts(tree: &SyntaxTree, id: NodeId) -> Option<TernaryParts> {
    if tree.kind(id) != TERNARY {
        return None;
    }
    let children = tree.significant_children(id);
    match children.as_slice() {
        [condition, consequence, alternative] => Some(TernaryParts {
            condition: *condition,
            consequence: *consequence,
            alternative: *alternative,
        }),
        _ => None,
    }
}

/// `(left, operator, right)` of a binary expression.
pub fn binary_parts(tree: &SyntaxTree, id: NodeId) -> Option<(NodeId, NodeId, NodeId)> {
    if tree.kind(id) != BINARY {
        return None;
    }
    let children = tree.significant_children(id);
    let operator = tree.operator_node(id)?;
    match children.as_slice() {
        [left, right] => Some((*left, operator, *right)),
        _ => None,
    }
}

/// Operand of a `!x` expression.
pub fn logical_not_argument(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    if tree.kind(id) == UNARY && tree.operator(id) == Some("!") {
        tree.nth_significant(id, 0)
    } else {
        None
    }
}

/// Expression wrapped by parentheses.
pub fn unparenthesized(tree: &SyntaxTree, id: NodeId) -> NodeId {
    let mut current = id;
    while tree.kind(current) == PARENTHESIZED {
        match tree.nth_significant(current, 0) {
            Some(inner) => current = inner,
            None => break,
        }
    }
    current
}

pub fn is_comparison_or_logical(tree: &SyntaxTree, id: NodeId) -> bool {
    tree.kind(id) == BINARY
        && tree.operator(id).is_some_and(|op| {
            COMPARISON_OPERATORS.contains(&op) || LOGICAL_OPERATORS.contains(&op)
        })
}

pub fn is_statement_container(tree: &SyntaxTree, id: NodeId) -> bool {
    tree.is_kind(id, STATEMENT_CONTAINERS)
}

pub fn is_function_like(tree: &SyntaxTree, id: NodeId) -> bool {
    tree.is_kind(id, FUNCTION_LIKE)
}

/// Whether `id` is a statement sitting directly in a statement list.
pub fn is_listed_statement(tree: &SyntaxTree, id: NodeId) -> bool {
    tree.parent(id)
        .is_some_and(|parent| is_statement_container(tree, parent))
        && tree.node(id).named
        && tree.kind(id) != "comment"
}

/// Innermost ancestor statement of `id` that sits in a statement list,
/// without leaving the function `id` belongs to.
///
/// `None` when the climb crosses a part of a control statement that does not
/// run exactly once before it: a braceless loop or branch body, a loop
/// condition or update, an `else` clause. Code placed before the statement
/// would run in a different order there.
pub fn enclosing_listed_statement(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    let mut current = id;
    loop {
        if is_listed_statement(tree, current) {
            return Some(current);
        }
        let parent = tree.parent(current)?;
        if is_function_like(tree, parent)
            || tree.kind(parent) == "class_body"
            || !runs_once_before(tree, current, parent)
        {
            return None;
        }
        current = parent;
    }
}

/// Whether child `id` of `parent` is evaluated once, before the rest of
/// `parent` runs.
fn runs_once_before(tree: &SyntaxTree, id: NodeId, parent: NodeId) -> bool {
    match tree.kind(parent) {
        "while_statement" | "do_statement" | "with_statement" | ELSE_CLAUSE => false,
        // only a declaring initializer, e.g. `let i = 0`
        "for_statement" => {
            tree.is_kind(id, DECLARATIONS) && tree.nth_significant(parent, 0) == Some(id)
        }
        // only the iterated value of `for (x of value)`
        "for_in_statement" => tree.nth_significant(parent, 1) == Some(id),
        IF_STATEMENT => tree.nth_significant(parent, 0) == Some(id),
        _ => true,
    }
}

/// Whether `id` is the leftmost token of an expression statement or of a
/// concise arrow body, where `{` or `function` would change how it parses.
pub fn begins_statement_or_arrow_body(tree: &SyntaxTree, id: NodeId) -> bool {
    let mut current = id;
    while let Some(parent) = tree.parent(current) {
        if tree.kind(parent) == "arrow_function" {
            return tree.significant_children(parent).last() == Some(&current);
        }
        if tree.range(parent).start != tree.range(current).start {
            return false;
        }
        if tree.kind(parent) == EXPRESSION_STATEMENT {
            return true;
        }
        if is_statement_container(tree, parent) {
            return false;
        }
        current = parent;
    }
    false
}

/// The single statement a branch boils down to: the branch itself, or the
/// only statement of a block without comments.
pub fn single_statement(tree: &SyntaxTree, branch: NodeId) -> Option<NodeId> {
    if tree.kind(branch) != BLOCK {
        return Some(branch);
    }
    let has_comment = tree
        .children(branch)
        .iter()
        .any(|&child| tree.kind(child) == "comment");
    match tree.significant_children(branch).as_slice() {
        [only] if !has_comment => Some(*only),
        _ => None,
    }
}

/// Statements of a block, comments included, without the braces.
pub fn block_body(tree: &SyntaxTree, block: NodeId) -> Vec<NodeId> {
    tree.children(block)
        .iter()
        .copied()
        .filter(|&child| tree.node(child).named)
        .collect()
}

/// Whether executing `id` always ends in `return` or `throw`.
pub fn always_transfers_control(tree: &SyntaxTree, id: NodeId) -> bool {
    match tree.kind(id) {
        RETURN | THROW => true,
        BLOCK => tree
            .significant_children(id)
            .into_iter()
            .any(|statement| always_transfers_control(tree, statement)),
        IF_STATEMENT => if_parts(tree, id).is_some_and(|parts| {
            always_transfers_control(tree, parts.consequence)
                && parts
                    .alternative
                    .is_some_and(|alternative| always_transfers_control(tree, alternative))
        }),
        _ => false,
    }
}

/// `(name, value)` of a declarator; `value` is absent for `let a;`.
pub fn declarator_parts(tree: &SyntaxTree, id: NodeId) -> Option<(NodeId, Option<NodeId>)> {
    if tree.kind(id) != VARIABLE_DECLARATOR {
        return None;
    }
    let name = tree.nth_significant(id, 0)?;
    // TypeScript puts a type_annotation between the name and the value
    let equals = tree.child_of_kind(id, "=");
    let value = equals.and_then(|eq| {
        tree.children(id)
            .iter()
            .copied()
            .skip_while(|&child| child != eq)
            .find(|&child| tree.node(child).named && tree.kind(child) != "comment")
    });
    Some((name, value))
}

/// Assignment target and value of `target op value`.
pub fn assignment_parts(tree: &SyntaxTree, id: NodeId) -> Option<(NodeId, &str, NodeId)> {
    if !tree.is_kind(id, ASSIGNMENTS) {
        return None;
    }
    let children = tree.significant_children(id);
    match children.as_slice() {
        [left, right] => Some((*left, tree.operator(id)?, *right)),
        _ => None,
    }
}

/// Binding strength of an expression, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Sequence,
    Assignment,
    Conditional,
    /// Binary operators, ranked by [`binary_precedence`].
    Binary(u8),
    Unary,
    Primary,
}

/// Rank of a binary operator; higher binds tighter.
pub fn binary_precedence(operator: &str) -> u8 {
    match operator {
        "??" => 1,
        "||" => 2,
        "&&" => 3,
        "|" => 4,
        "^" => 5,
        "&" => 6,
        "==" | "!=" | "===" | "!==" => 7,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 8,
        "<<" | ">>" | ">>>" => 9,
        "+" | "-" => 10,
        "*" | "/" | "%" => 11,
        "**" => 12,
        _ => 0,
    }
}

pub fn precedence_of(tree: &SyntaxTree, id: NodeId) -> Precedence {
    match tree.kind(id) {
        "sequence_expression" => Precedence::Sequence,
        "assignment_expression"
        | "augmented_assignment_expression"
        | "arrow_function"
        | "yield_expression" => Precedence::Assignment,
        TERNARY => Precedence::Conditional,
        BINARY => Precedence::Binary(tree.operator(id).map_or(0, binary_precedence)),
        "as_expression" | "satisfies_expression" => Precedence::Binary(8),
        UNARY | "await_expression" | "update_expression" | "type_assertion" => Precedence::Unary,
        _ => Precedence::Primary,
    }
}

/// Whether an expression binding with `precedence` needs parentheses when it
/// replaces the node `id`.
pub fn needs_parens_in(tree: &SyntaxTree, id: NodeId, precedence: Precedence) -> bool {
    let Some(parent) = tree.parent(id) else {
        return false;
    };
    match tree.kind(parent) {
        PARENTHESIZED | EXPRESSION_STATEMENT | RETURN | THROW | "template_substitution" => false,
        BINARY => {
            let Some(operator) = tree.operator(parent) else {
                return true;
            };
            let rank = binary_precedence(operator);
            let is_left = tree.nth_significant(parent, 0) == Some(id);
            // `??` cannot be mixed with `&&` or `||` without parentheses
            let mixes_nullish = match precedence {
                Precedence::Binary(1) => LOGICAL_OPERATORS.contains(&operator),
                Precedence::Binary(2) | Precedence::Binary(3) => operator == "??",
                _ => false,
            };
            if mixes_nullish {
                return true;
            }
            match (operator, is_left) {
                ("**", true) => precedence <= Precedence::Unary,
                ("**", false) => precedence < Precedence::Binary(rank),
                (_, true) => precedence < Precedence::Binary(rank),
                (_, false) => precedence <= Precedence::Binary(rank),
            }
        }
        UNARY | "await_expression" | "update_expression" => precedence < Precedence::Unary,
        TERNARY => {
            if tree.nth_significant(parent, 0) == Some(id) {
                precedence <= Precedence::Conditional
            } else {
                precedence < Precedence::Assignment
            }
        }
        "member_expression" | "subscript_expression" | "call_expression" | "new_expression" => {
            let is_object = tree.nth_significant(parent, 0) == Some(id);
            if is_object {
                precedence < Precedence::Primary
            } else {
                precedence < Precedence::Assignment
            }
        }
        _ => precedence < Precedence::Assignment,
    }
}
