//! Remove an `else` whose `if` branch always returns or throws.

use super::{Transformation, write_or_refuse};
use crate::editor::{Editor, ErrorReason, Selection};
use crate::errors::ServiceError;
use crate::syntax::javascript::{self, BLOCK};
use crate::syntax::text::{indentation_at, reindent};
use crate::syntax::{NodeId, SyntaxTree, TextEdit, locate};

pub async fn remove_redundant_else(
    code: &str,
    selection: Selection,
    editor: &dyn Editor,
) -> Result<(), ServiceError> {
    let tree = SyntaxTree::parse(code, editor.language())?;
    write_or_refuse(code, transform(&tree, selection), editor).await
}

pub fn transform(tree: &SyntaxTree, selection: Selection) -> Transformation {
    let target =
        locate(tree, selection, has_redundant_else).ok_or(ErrorReason::DidNotFoundRedundantElse)?;
    let parts =
        javascript::if_parts(tree, target).ok_or(ErrorReason::DidNotFoundRedundantElse)?;
    let alternative = parts
        .alternative
        .ok_or(ErrorReason::DidNotFoundRedundantElse)?;

    let source = tree.source();
    let indent = indentation_at(source, tree.range(target).start);

    let start = tree.range(parts.consequence).end;
    let end = tree.range(alternative).end;

    let mut hoisted: Vec<String> = dangling_comments(tree, target, alternative, start)
        .into_iter()
        .map(|comment| tree.text(comment).to_string())
        .collect();
    if let Some(range) = hoisted_range(tree, alternative) {
        let from = indentation_at(source, range.start);
        hoisted.push(reindent(&source[range], from, indent));
    }

    if hoisted.is_empty() {
        return Ok(vec![TextEdit::delete(start..end)]);
    }
    let separator = format!("\n{indent}");
    let text = format!("\n\n{indent}{}", hoisted.join(separator.as_str()));

    // a blank line only separates the hoisted code from a multi-line statement
    match single_line_successor(tree, target, end) {
        Some(next) => Ok(vec![TextEdit::replace(
            start..tree.range(next).start,
            format!("{text}\n{indent}"),
        )]),
        None => Ok(vec![TextEdit::replace(start..end, text)]),
    }
}

fn has_redundant_else(tree: &SyntaxTree, id: NodeId) -> bool {
    let Some(parts) = javascript::if_parts(tree, id) else {
        return false;
    };
    parts.else_clause.is_some()
        && javascript::always_transfers_control(tree, parts.consequence)
        && tree
            .parent(id)
            .is_some_and(|parent| javascript::is_statement_container(tree, parent))
}

/// Comments between the if branch and the else body, `} // done\n else {`.
fn dangling_comments(
    tree: &SyntaxTree,
    if_statement: NodeId,
    alternative: NodeId,
    branch_end: usize,
) -> Vec<NodeId> {
    let body_start = tree.range(alternative).start;
    let else_clause = tree.parent(alternative);
    tree.children(if_statement)
        .iter()
        .chain(else_clause.iter().flat_map(|clause| tree.children(*clause)))
        .copied()
        .filter(|&child| tree.kind(child) == "comment")
        .filter(|&child| (branch_end..body_start).contains(&tree.range(child).start))
        .collect()
}

/// The statement following `if_statement` when only whitespace separates it
/// from `end` and it fits on one line.
fn single_line_successor(tree: &SyntaxTree, if_statement: NodeId, end: usize) -> Option<NodeId> {
    let parent = tree.parent(if_statement)?;
    let siblings = tree.children(parent);
    let position = siblings.iter().position(|&child| child == if_statement)?;
    let next = siblings[position + 1..]
        .iter()
        .copied()
        .find(|&child| tree.node(child).named)?;
    let gap = tree.source().get(end..tree.range(next).start)?;
    let fits = tree.kind(next) != "comment" && !tree.text(next).contains('\n');
    (fits && gap.trim().is_empty()).then_some(next)
}

/// Source range of the statements an else branch contributes, if any.
fn hoisted_range(tree: &SyntaxTree, alternative: NodeId) -> Option<std::ops::Range<usize>> {
    if tree.kind(alternative) != BLOCK {
        return Some(tree.range(alternative));
    }
    let body = javascript::block_body(tree, alternative);
    let first = body.first()?;
    let last = body.last()?;
    Some(tree.range(*first).start..tree.range(*last).end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::apply_text_edits;
    use ast_grep_language::SupportLang as Language;

    fn apply(code: &str, selection: Selection) -> Result<String, ErrorReason> {
        let tree = SyntaxTree::parse(code, Language::JavaScript).unwrap();
        transform(&tree, selection).map(|edits| apply_text_edits(code, edits).unwrap())
    }

    #[test]
    fn test_hoists_single_statement_else() {
        let code = "function f() {\n  if (a) return 1;\n  else log();\n}";
        let result = apply(code, Selection::cursor_at(1, 4)).unwrap();
        assert_eq!(result, "function f() {\n  if (a) return 1;\n\n  log();\n}");
    }

    #[test]
    fn test_empty_else_is_dropped() {
        let code = "if (a) {\n  throw error;\n} else {\n}";
        let result = apply(code, Selection::cursor_at(0, 0)).unwrap();
        assert_eq!(result, "if (a) {\n  throw error;\n}");
    }

    #[test]
    fn test_nested_if_else_that_always_returns() {
        let code = "function f() {\n  if (a) {\n    if (b) {\n      return 1;\n    } else {\n      return 2;\n    }\n  } else {\n    go();\n  }\n}";
        let result = apply(code, Selection::cursor_at(1, 2)).unwrap();
        assert!(result.ends_with("    }\n  }\n\n  go();\n}"));
    }

    #[test]
    fn test_keeps_comments_before_else() {
        let code = "function f() {\n  if (a) {\n    return;\n  } // done\n  else {\n    b();\n  }\n}";
        let result = apply(code, Selection::cursor_at(1, 2)).unwrap();
        assert_eq!(result, "function f() {\n  if (a) {\n    return;\n  }\n\n  // done\n  b();\n}");
    }

    #[test]
    fn test_blank_line_only_before_multi_line_successor() {
        let code = "function f() {\n  if (a) {\n    return;\n  } else {\n    b();\n  }\n\n  c();\n}";
        let result = apply(code, Selection::cursor_at(1, 2)).unwrap();
        assert_eq!(result, "function f() {\n  if (a) {\n    return;\n  }\n\n  b();\n  c();\n}");

        let code = "function f() {\n  if (a) {\n    return;\n  } else {\n    b();\n  }\n\n  while (c) {\n    d();\n  }\n}";
        let result = apply(code, Selection::cursor_at(1, 2)).unwrap();
        assert!(result.contains("  b();\n\n  while (c) {"));
    }

    #[test]
    fn test_refuses_when_branch_can_fall_through() {
        let code = "if (a) {\n  if (b) {\n    return;\n  }\n} else {\n  go();\n}";
        assert_eq!(
            apply(code, Selection::cursor_at(0, 0)),
            Err(ErrorReason::DidNotFoundRedundantElse)
        );
    }
}
