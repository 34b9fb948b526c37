//! # Inline Variable
//!
//! Replaces every reference to a variable with its initializer, then removes
//! the declaration. Destructured declarations are inlined one binding at a
//! time: `const { a } = obj` turns references to `a` into `obj.a`.

use super::scope_analysis::{Binding, Reference, Scopes, UsageType};
use super::{Transformation, read_then_write_or_refuse};
use crate::editor::{Editor, ErrorReason, Selection};
use crate::errors::ServiceError;
use crate::syntax::javascript::{
    self, DECLARATIONS, IDENTIFIER, Precedence, VARIABLE_DECLARATOR, needs_parens_in,
    precedence_of,
};
use crate::syntax::text::whole_lines;
use crate::syntax::{NodeId, SyntaxTree, TextEdit, locate};
use std::ops::Range;
use tracing::debug;

pub async fn inline_variable(
    code: &str,
    selection: Selection,
    editor: &dyn Editor,
) -> Result<(), ServiceError> {
    let tree = SyntaxTree::parse(code, editor.language())?;
    read_then_write_or_refuse(&tree, transform(&tree, selection), editor).await
}

/// What replaces the references of the inlined binding.
#[derive(Debug)]
struct Inlined {
    text: String,
    precedence: Precedence,
    /// An object literal or function, which cannot start a statement.
    starts_with_brace: bool,
}

/// The binding to inline and the code removing it.
#[derive(Debug)]
struct Target {
    binding: NodeId,
    inlined: Inlined,
    removal: Range<usize>,
}

pub fn transform(tree: &SyntaxTree, selection: Selection) -> Transformation {
    let declarator = locate(tree, selection, is_inlinable_declarator)
        .ok_or(ErrorReason::DidNotFoundInlinableCode)?;
    let (name, value) = javascript::declarator_parts(tree, declarator)
        .ok_or(ErrorReason::DidNotFoundInlinableCode)?;
    let value = value.ok_or(ErrorReason::DidNotFoundInlinableCode)?;

    let target = match tree.kind(name) {
        IDENTIFIER => Target {
            binding: name,
            inlined: Inlined {
                text: tree.text(value).to_string(),
                precedence: precedence_of(tree, value),
                starts_with_brace: starts_with_brace(tree, value),
            },
            removal: remove_declarator(tree, declarator),
        },
        "object_pattern" | "array_pattern" => {
            destructured_target(tree, selection, declarator, name, value)?
        }
        _ => return Err(ErrorReason::DidNotFoundInlinableCodeIdentifiers),
    };

    let scopes = Scopes::analyze(tree);
    let binding = scopes
        .binding_at(tree, target.binding)
        .ok_or(ErrorReason::DidNotFoundInlinableCodeIdentifiers)?;
    let references = scopes.references(tree, binding);
    debug!(
        "Inlining '{}' into {} references",
        binding.name,
        references.len()
    );

    if references.is_empty() {
        return Err(ErrorReason::DidNotFoundInlinableCodeIdentifiers);
    }
    if references
        .iter()
        .any(|reference| reference.usage != UsageType::Read)
    {
        return Err(ErrorReason::CantInlineReassignedVariable);
    }
    let declaration_range = tree.range(declarator);
    if references.iter().any(|reference| {
        let range = tree.range(reference.id);
        declaration_range.start <= range.start && range.end <= declaration_range.end
    }) {
        return Err(ErrorReason::DidNotFoundInlinableCodeIdentifiers);
    }
    if would_collide(tree, &scopes, binding, value, &references) {
        return Err(ErrorReason::InlinedIdentifiersWouldCollide);
    }

    let mut edits: Vec<TextEdit> = references
        .iter()
        .map(|reference| {
            let text = if reference.shorthand {
                let value = if target.inlined.precedence < Precedence::Assignment {
                    format!("({})", target.inlined.text)
                } else {
                    target.inlined.text.clone()
                };
                format!("{}: {value}", binding.name)
            } else {
                replacement(tree, reference.id, &target.inlined)
            };
            TextEdit::replace(tree.range(reference.id), text)
        })
        .collect();
    edits.push(TextEdit::delete(target.removal));
    Ok(edits)
}

fn is_inlinable_declarator(tree: &SyntaxTree, id: NodeId) -> bool {
    if tree.kind(id) != VARIABLE_DECLARATOR {
        return false;
    }
    let has_value = javascript::declarator_parts(tree, id).is_some_and(|(_, value)| value.is_some());
    has_value
        && tree.parent(id).is_some_and(|declaration| {
            tree.is_kind(declaration, DECLARATIONS) && javascript::is_listed_statement(tree, declaration)
        })
}

/// Identifiers of the initializer must mean the same thing at every reference.
fn would_collide(
    tree: &SyntaxTree,
    scopes: &Scopes,
    binding: &Binding,
    value: NodeId,
    references: &[Reference],
) -> bool {
    scopes
        .free_identifiers(tree, value)
        .into_iter()
        .filter(|(name, _)| *name != binding.name)
        .any(|(name, resolved)| {
            references.iter().any(|reference| {
                scopes.resolve(tree, reference.id, &name).map(|b| b.id) != resolved
            })
        })
}

fn replacement(tree: &SyntaxTree, reference: NodeId, inlined: &Inlined) -> String {
    let begins_statement_or_body =
        inlined.starts_with_brace && javascript::begins_statement_or_arrow_body(tree, reference);
    if begins_statement_or_body || needs_parens_in(tree, reference, inlined.precedence) {
        format!("({})", inlined.text)
    } else {
        inlined.text.clone()
    }
}

fn starts_with_brace(tree: &SyntaxTree, id: NodeId) -> bool {
    tree.is_kind(id, &["object", "function_expression", "function", "class"])
}

/// Pick the destructured binding under the selection and build its access path.
fn destructured_target(
    tree: &SyntaxTree,
    selection: Selection,
    declarator: NodeId,
    pattern: NodeId,
    value: NodeId,
) -> Result<Target, ErrorReason> {
    let elements = tree.significant_children(pattern);
    let element = elements
        .iter()
        .copied()
        .find(|&element| tree.span(element).contains(&selection))
        .or_else(|| match elements.as_slice() {
            [only] => Some(*only),
            _ => None,
        })
        .ok_or(ErrorReason::DidNotFoundInlinableCodeIdentifiers)?;

    let (binding, access) = if tree.kind(pattern) == "object_pattern" {
        object_access(tree, element)?
    } else {
        (element, format!("[{}]", array_index(tree, pattern, element)))
    };
    if tree.kind(binding) != IDENTIFIER && tree.kind(binding) != "shorthand_property_identifier_pattern" {
        return Err(ErrorReason::DidNotFoundInlinableCodeIdentifiers);
    }

    let object = if precedence_of(tree, value) < Precedence::Primary || starts_with_brace(tree, value) {
        format!("({})", tree.text(value))
    } else {
        tree.text(value).to_string()
    };
    let removal = if elements.len() == 1 {
        remove_declarator(tree, declarator)
    } else if tree.kind(pattern) == "array_pattern" && elements.last() != Some(&element) {
        // keep the comma so later elements keep their index
        tree.range(element)
    } else {
        remove_list_item(tree, pattern, element)
    };

    Ok(Target {
        binding,
        inlined: Inlined {
            text: format!("{object}{access}"),
            precedence: Precedence::Primary,
            starts_with_brace: false,
        },
        removal,
    })
}

/// `(binding, access)` for an element of an object pattern.
fn object_access(tree: &SyntaxTree, element: NodeId) -> Result<(NodeId, String), ErrorReason> {
    match tree.kind(element) {
        "shorthand_property_identifier_pattern" => {
            Ok((element, format!(".{}", tree.text(element))))
        }
        "pair_pattern" => {
            let children = tree.significant_children(element);
            let [key, value] = children.as_slice() else {
                return Err(ErrorReason::DidNotFoundInlinableCodeIdentifiers);
            };
            let access = match tree.kind(*key) {
                "property_identifier" => format!(".{}", tree.text(*key)),
                "string" | "number" => format!("[{}]", tree.text(*key)),
                _ => return Err(ErrorReason::DidNotFoundInlinableCodeIdentifiers),
            };
            Ok((*value, access))
        }
        _ => Err(ErrorReason::DidNotFoundInlinableCodeIdentifiers),
    }
}

/// Position of `element` in an array pattern, holes included.
fn array_index(tree: &SyntaxTree, pattern: NodeId, element: NodeId) -> usize {
    tree.children(pattern)
        .iter()
        .take_while(|&&child| child != element)
        .filter(|&&child| tree.kind(child) == ",")
        .count()
}

/// Remove a declarator with its comma, or its whole declaration when alone.
fn remove_declarator(tree: &SyntaxTree, declarator: NodeId) -> Range<usize> {
    let Some(declaration) = tree.parent(declarator) else {
        return tree.range(declarator);
    };
    let declarators = tree
        .children(declaration)
        .iter()
        .filter(|&&child| tree.kind(child) == VARIABLE_DECLARATOR)
        .count();
    if declarators == 1 {
        whole_lines(tree.source(), tree.range(declaration))
    } else {
        remove_list_item(tree, declaration, declarator)
    }
}

/// Range of `item` in a comma separated list, with the comma that goes with it.
fn remove_list_item(tree: &SyntaxTree, list: NodeId, item: NodeId) -> Range<usize> {
    let children = tree.children(list);
    let Some(position) = children.iter().position(|&child| child == item) else {
        return tree.range(item);
    };
    let range = tree.range(item);

    let next = children.get(position + 1).copied();
    if let Some(comma) = next.filter(|&child| tree.kind(child) == ",") {
        let end = match children.get(position + 2) {
            Some(&after) if tree.node(after).named => tree.range(after).start,
            _ => tree.range(comma).end,
        };
        return range.start..end;
    }
    let previous = position.checked_sub(1).and_then(|i| children.get(i)).copied();
    match previous.filter(|&child| tree.kind(child) == ",") {
        Some(comma) => tree.range(comma).start..range.end,
        None => range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::apply_text_edits;
    use ast_grep_language::SupportLang as Language;

    fn inline(code: &str, selection: Selection) -> Result<String, ErrorReason> {
        let tree = SyntaxTree::parse(code, Language::JavaScript).unwrap();
        transform(&tree, selection).map(|edits| apply_text_edits(code, edits).unwrap())
    }

    #[test]
    fn test_inlines_and_removes_declaration() {
        let code = "const a = 1;\nlog(a + a);";
        assert_eq!(inline(code, Selection::cursor_at(0, 6)).unwrap(), "log(1 + 1);");
    }

    #[test]
    fn test_parenthesises_by_precedence() {
        let code = "const sum = a + b;\nconst total = sum * 2;\nconst other = 2 + sum;";
        assert_eq!(
            inline(code, Selection::cursor_at(0, 7)).unwrap(),
            "const total = (a + b) * 2;\nconst other = 2 + (a + b);"
        );
    }

    #[test]
    fn test_parenthesises_object_starting_a_statement() {
        let code = "const o = { a: 1 };\no.a;";
        assert_eq!(inline(code, Selection::cursor_at(0, 6)).unwrap(), "({ a: 1 }).a;");

        let code = "const f = function () {};\nf.call(this);";
        assert_eq!(
            inline(code, Selection::cursor_at(0, 6)).unwrap(),
            "(function () {}).call(this);"
        );

        let code = "const o = { a: 1 };\nconst get = () => o.a;\nlog(o.a);";
        assert_eq!(
            inline(code, Selection::cursor_at(0, 6)).unwrap(),
            "const get = () => ({ a: 1 }).a;\nlog({ a: 1 }.a);"
        );
    }

    #[test]
    fn test_expands_shorthand_property() {
        let code = "const name = \"Jane\";\nsend({ name });";
        assert_eq!(
            inline(code, Selection::cursor_at(0, 7)).unwrap(),
            "send({ name: \"Jane\" });"
        );
    }

    #[test]
    fn test_removes_one_of_several_declarators() {
        let code = "const a = 1, b = 2;\nlog(a, b);";
        assert_eq!(
            inline(code, Selection::cursor_at(0, 6)).unwrap(),
            "const b = 2;\nlog(1, b);"
        );
        assert_eq!(
            inline(code, Selection::cursor_at(0, 13)).unwrap(),
            "const a = 1;\nlog(a, 2);"
        );
    }

    #[test]
    fn test_inlines_destructured_property() {
        let code = "const { x, y: vertical } = point;\nlog(x, vertical);";
        assert_eq!(
            inline(code, Selection::cursor_at(0, 8)).unwrap(),
            "const { y: vertical } = point;\nlog(point.x, vertical);"
        );
        assert_eq!(
            inline(code, Selection::cursor_at(0, 16)).unwrap(),
            "const { x } = point;\nlog(x, point.y);"
        );
    }

    #[test]
    fn test_inlines_array_element() {
        let code = "const [first, second] = items;\nlog(first, second);";
        assert_eq!(
            inline(code, Selection::cursor_at(0, 8)).unwrap(),
            "const [, second] = items;\nlog(items[0], second);"
        );
        assert_eq!(
            inline(code, Selection::cursor_at(0, 16)).unwrap(),
            "const [first] = items;\nlog(first, items[1]);"
        );
    }

    #[test]
    fn test_refusals() {
        assert_eq!(
            inline("log(x);", Selection::cursor_at(0, 4)),
            Err(ErrorReason::DidNotFoundInlinableCode)
        );
        assert_eq!(
            inline("let a;\nlog(a);", Selection::cursor_at(0, 4)),
            Err(ErrorReason::DidNotFoundInlinableCode)
        );
        assert_eq!(
            inline("const a = 1;", Selection::cursor_at(0, 6)),
            Err(ErrorReason::DidNotFoundInlinableCodeIdentifiers)
        );
        assert_eq!(
            inline("let a = 1;\na = 2;", Selection::cursor_at(0, 4)),
            Err(ErrorReason::CantInlineReassignedVariable)
        );
        assert_eq!(
            inline(
                "const a = b;\nfunction f(b) {\n  return a;\n}",
                Selection::cursor_at(0, 6)
            ),
            Err(ErrorReason::InlinedIdentifiersWouldCollide)
        );
        assert_eq!(
            inline("const { a = 1 } = obj;\nlog(a);", Selection::cursor_at(0, 8)),
            Err(ErrorReason::DidNotFoundInlinableCodeIdentifiers)
        );
    }
}
