//! Expand a statement built around a ternary into an if/else.

use super::{Transformation, write_or_refuse};
use crate::editor::{Editor, ErrorReason, Selection};
use crate::errors::ServiceError;
use crate::syntax::javascript::{
    self, DECLARATIONS, EXPRESSION_STATEMENT, IDENTIFIER, Precedence, RETURN, TERNARY, THROW,
    precedence_of,
};
use crate::syntax::text::{detect_indent_unit, indentation_at, reindent};
use crate::syntax::{NodeId, SyntaxTree, TextEdit, locate};

pub async fn convert_ternary_to_if_else(
    code: &str,
    selection: Selection,
    editor: &dyn Editor,
) -> Result<(), ServiceError> {
    let tree = SyntaxTree::parse(code, editor.language())?;
    write_or_refuse(code, transform(&tree, selection), editor).await
}

pub fn transform(tree: &SyntaxTree, selection: Selection) -> Transformation {
    let target = locate(tree, selection, |tree, id| expansion(tree, id).is_some())
        .ok_or(ErrorReason::DidNotFoundTernaryToConvert)?;
    let expansion = expansion(tree, target).ok_or(ErrorReason::DidNotFoundTernaryToConvert)?;

    let source = tree.source();
    let parts = javascript::ternary_parts(tree, target)
        .ok_or(ErrorReason::DidNotFoundTernaryToConvert)?;
    let indent = indentation_at(source, tree.range(expansion.statement).start);
    let inner = format!("{indent}{}", detect_indent_unit(source));
    let condition = javascript::unparenthesized(tree, parts.condition);

    let branch = |value: NodeId| {
        let statement = expansion.shape.statement_for(&value_text(tree, value, &expansion.shape));
        reindent(&statement, indent, &inner)
    };
    let mut replacement = match &expansion.shape {
        Shape::Declaration { keyword, head, .. } => format!("{keyword} {head};\n{indent}"),
        _ => String::new(),
    };
    replacement.push_str(&format!(
        "if ({}) {{\n{inner}{}\n{indent}}} else {{\n{inner}{}\n{indent}}}",
        tree.text(condition),
        branch(parts.consequence),
        branch(parts.alternative),
    ));

    Ok(vec![TextEdit::replace(
        tree.range(expansion.statement),
        replacement,
    )])
}

/// How the branches of the ternary are turned into statements.
#[derive(Debug)]
enum Shape {
    Expression,
    Return,
    Throw,
    Assignment { target: String, operator: String },
    Declaration {
        keyword: &'static str,
        head: String,
        name: String,
    },
}

impl Shape {
    fn statement_for(&self, value: &str) -> String {
        match self {
            Shape::Expression => format!("{value};"),
            Shape::Return => format!("return {value};"),
            Shape::Throw => format!("throw {value};"),
            Shape::Assignment { target, operator } => format!("{target} {operator} {value};"),
            Shape::Declaration { name, .. } => format!("{name} = {value};"),
        }
    }
}

#[derive(Debug)]
struct Expansion {
    statement: NodeId,
    shape: Shape,
}

/// Whether the ternary at `id` is the whole value of a statement we can expand.
fn expansion(tree: &SyntaxTree, id: NodeId) -> Option<Expansion> {
    if tree.kind(id) != TERNARY {
        return None;
    }
    // climb through parentheses to the position the ternary occupies
    let mut value = id;
    let mut parent = tree.parent(value)?;
    while tree.kind(parent) == javascript::PARENTHESIZED {
        value = parent;
        parent = tree.parent(value)?;
    }

    let (statement, shape) = match tree.kind(parent) {
        EXPRESSION_STATEMENT => (parent, Shape::Expression),
        RETURN => (parent, Shape::Return),
        THROW => (parent, Shape::Throw),
        kind if javascript::ASSIGNMENTS.contains(&kind) => {
            let (target, operator, right) = javascript::assignment_parts(tree, parent)?;
            let statement = tree.parent(parent)?;
            if right != value || tree.kind(statement) != EXPRESSION_STATEMENT {
                return None;
            }
            let shape = Shape::Assignment {
                target: tree.text(target).to_string(),
                operator: operator.to_string(),
            };
            (statement, shape)
        }
        javascript::VARIABLE_DECLARATOR => declaration(tree, parent, value)?,
        _ => return None,
    };
    javascript::is_listed_statement(tree, statement).then_some(Expansion { statement, shape })
}

fn declaration(tree: &SyntaxTree, declarator: NodeId, value: NodeId) -> Option<(NodeId, Shape)> {
    let (name, initializer) = javascript::declarator_parts(tree, declarator)?;
    if initializer != Some(value) || tree.kind(name) != IDENTIFIER {
        return None;
    }
    let statement = tree.parent(declarator)?;
    if !tree.is_kind(statement, DECLARATIONS) {
        return None;
    }
    let declarators = tree
        .significant_children(statement)
        .into_iter()
        .filter(|&child| tree.kind(child) == javascript::VARIABLE_DECLARATOR)
        .count();
    if declarators != 1 {
        return None;
    }

    let keyword = if tree.kind(statement) == "variable_declaration" {
        "var"
    } else {
        "let"
    };
    // name plus any type annotation, up to the `=`
    let equals = tree.child_of_kind(declarator, "=")?;
    let head = tree.source()[tree.range(declarator).start..tree.range(equals).start].trim_end();
    let shape = Shape::Declaration {
        keyword,
        head: head.to_string(),
        name: tree.text(name).to_string(),
    };
    Some((statement, shape))
}

fn value_text(tree: &SyntaxTree, value: NodeId, shape: &Shape) -> String {
    let text = tree.text(value);
    let starts_statement = matches!(shape, Shape::Expression)
        && tree.is_kind(
            value,
            &["object", "function_expression", "function", "class"],
        );
    if starts_statement || precedence_of(tree, value) < Precedence::Assignment {
        format!("({text})")
    } else {
        text.to_string()
    }
}
